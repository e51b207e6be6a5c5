//! # Amount arithmetic
//!
//! All monetary values are `i128` minor units. Every operation is checked;
//! nothing here ever produces a negative amount or wraps.
//!
//! Share computations round **down** at every step, so the sum of shares
//! handed out from a pool can never exceed the pool. Whatever the rounding
//! leaves behind stays with the payer.

use crate::Error;

/// Upper bound for a funding cap (10^30 minor units).
pub const MAX_FUNDING_CAP: i128 = 1_000_000_000_000_000_000_000_000_000_000;

/// Basis points in 100%.
pub const BPS_DENOMINATOR: i128 = 10_000;

pub fn add(a: i128, b: i128) -> Result<i128, Error> {
    if a < 0 || b < 0 {
        return Err(Error::InvalidAmount);
    }
    a.checked_add(b).ok_or(Error::Overflow)
}

/// `a - b`; fails if the result would be negative.
pub fn sub(a: i128, b: i128) -> Result<i128, Error> {
    if a < 0 || b < 0 {
        return Err(Error::InvalidAmount);
    }
    match a.checked_sub(b) {
        Some(v) if v >= 0 => Ok(v),
        _ => Err(Error::Overflow),
    }
}

/// `floor(amount * percent / 100)`.
pub fn percent_of(amount: i128, percent: u32) -> Result<i128, Error> {
    if amount < 0 {
        return Err(Error::InvalidAmount);
    }
    amount
        .checked_mul(percent as i128)
        .map(|v| v / 100)
        .ok_or(Error::Overflow)
}

/// `floor(pool * part / whole)`. A zero `whole` yields zero.
pub fn pro_rata(pool: i128, part: i128, whole: i128) -> Result<i128, Error> {
    if pool < 0 || part < 0 || whole < 0 || part > whole {
        return Err(Error::InvalidAmount);
    }
    if whole == 0 {
        return Ok(0);
    }
    pool.checked_mul(part)
        .map(|v| v / whole)
        .ok_or(Error::Overflow)
}

/// The funding threshold is reached inclusively.
#[inline]
pub fn reaches(amount: i128, min: i128) -> bool {
    amount >= min
}

/// The cap itself is a legal total; anything above is not.
#[inline]
pub fn fits_under_cap(amount: i128, cap: i128) -> bool {
    amount <= cap
}

#[inline]
pub fn is_within(amount: i128, min: i128, max: i128) -> bool {
    reaches(amount, min) && fits_under_cap(amount, max)
}
