//! # RBAC — platform administration
//!
//! Two roles govern the platform itself. Proposal-level authority never goes
//! through here: only a proposal's own proposer may execute or distribute it.
//!
//! ```text
//! SuperAdmin
//!     └── Admin
//! ```
//!
//! ## Storage layout
//!
//! - `RbacKey::SuperAdmin` → `Address` — the one and only super-admin.
//! - `RbacKey::Role(addr)` → `Role`    — the role held by `addr`, if any.
//!
//! Both are persistent entries whose TTL is extended on every read and write.
//!
//! ## Event emissions
//!
//! | Event topic prefix | Trigger |
//! |--------------------|---------|
//! | `role_set`         | Role granted or replaced |
//! | `role_del`         | Role revoked |
//!
//! `SuperAdmin` cannot be removed via `revoke_admin`; use
//! `transfer_super_admin`.

use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

use crate::storage::{get_persistent, remove_persistent, set_persistent};
use crate::Error;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Role {
    /// Grants and revokes admins; may do everything an admin may.
    SuperAdmin,
    /// Pauses the platform and adjusts the reopen policy.
    Admin,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RbacKey {
    Role(Address),
    SuperAdmin,
}

fn store_role(env: &Env, address: &Address, role: &Role) {
    set_persistent(env, &RbacKey::Role(address.clone()), role);
}

fn clear_role(env: &Env, address: &Address) {
    remove_persistent(env, &RbacKey::Role(address.clone()));
}

pub fn get_role(env: &Env, address: &Address) -> Option<Role> {
    get_persistent(env, &RbacKey::Role(address.clone()))
}

pub fn get_super_admin(env: &Env) -> Option<Address> {
    get_persistent(env, &RbacKey::SuperAdmin)
}

/// Set the initial SuperAdmin. Fails with `AlreadyInitialized` on a second call.
pub fn init_super_admin(env: &Env, super_admin: &Address) -> Result<(), Error> {
    if get_super_admin(env).is_some() {
        return Err(Error::AlreadyInitialized);
    }
    set_persistent(env, &RbacKey::SuperAdmin, super_admin);
    store_role(env, super_admin, &Role::SuperAdmin);
    emit_set(env, super_admin, &Role::SuperAdmin, None);
    Ok(())
}

/// Make `target` an Admin. Only the SuperAdmin may do this, and the
/// SuperAdmin cannot demote itself this way.
pub fn grant_admin(env: &Env, caller: &Address, target: &Address) -> Result<(), Error> {
    require_role(env, caller, &Role::SuperAdmin)?;
    if get_role(env, target) == Some(Role::SuperAdmin) {
        return Err(Error::Unauthorized);
    }
    store_role(env, target, &Role::Admin);
    emit_set(env, target, &Role::Admin, Some(caller.clone()));
    Ok(())
}

/// Remove the Admin role from `target`. Revoking a non-admin is a no-op.
pub fn revoke_admin(env: &Env, caller: &Address, target: &Address) -> Result<(), Error> {
    require_role(env, caller, &Role::SuperAdmin)?;
    if get_super_admin(env).as_ref() == Some(target) {
        return Err(Error::Unauthorized);
    }
    if get_role(env, target).is_some() {
        clear_role(env, target);
        emit_del(env, target, Some(caller.clone()));
    }
    Ok(())
}

/// Hand the SuperAdmin role to `new`. The previous holder loses it.
pub fn transfer_super_admin(env: &Env, current: &Address, new: &Address) -> Result<(), Error> {
    require_role(env, current, &Role::SuperAdmin)?;

    clear_role(env, current);
    emit_del(env, current, Some(current.clone()));

    set_persistent(env, &RbacKey::SuperAdmin, new);
    store_role(env, new, &Role::SuperAdmin);
    emit_set(env, new, &Role::SuperAdmin, Some(current.clone()));
    Ok(())
}

pub fn require_role(env: &Env, address: &Address, required: &Role) -> Result<(), Error> {
    match get_role(env, address) {
        Some(ref r) if r == required => Ok(()),
        _ => Err(Error::Unauthorized),
    }
}

#[inline]
pub fn require_admin_or_above(env: &Env, address: &Address) -> Result<(), Error> {
    match get_role(env, address) {
        Some(Role::SuperAdmin) | Some(Role::Admin) => Ok(()),
        None => Err(Error::Unauthorized),
    }
}

pub fn is_admin(env: &Env, address: &Address) -> bool {
    require_admin_or_above(env, address).is_ok()
}

fn emit_set(env: &Env, target: &Address, role: &Role, by: Option<Address>) {
    env.events().publish(
        (symbol_short!("role_set"), target.clone(), role_symbol(role)),
        by,
    );
}

fn emit_del(env: &Env, target: &Address, by: Option<Address>) {
    env.events()
        .publish((symbol_short!("role_del"), target.clone()), by);
}

fn role_symbol(role: &Role) -> Symbol {
    match role {
        Role::SuperAdmin => symbol_short!("supadmin"),
        Role::Admin => symbol_short!("admin"),
    }
}
