//! Lock helpers shared by the engine's state owners.
//!
//! A panic while a guard is held poisons the lock. The guarded values here
//! are plain data that stay consistent between statements, so the guard is
//! recovered instead of propagating the panic into every later caller.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

pub(crate) fn read_lock<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn write_lock<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
