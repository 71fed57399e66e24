//! Synchronization utilities for lock poisoning
//!
//! Storage backends guard their records with `std::sync::RwLock`. A panic
//! while a guard is held poisons the lock; these helpers turn that into the
//! backend's own error type instead of propagating the panic.

use std::sync::{LockResult, RwLockReadGuard, RwLockWriteGuard};

/// Convert a poisoned RwLock read into an application error
///
/// # Examples
/// ```
/// use std::sync::RwLock;
/// use clinic_queue::core::sync::handle_rwlock_read;
///
/// let lock = RwLock::new(42);
/// let guard = handle_rwlock_read(lock.read(), |msg| msg).unwrap();
/// assert_eq!(*guard, 42);
/// ```
pub fn handle_rwlock_read<T, E>(
    result: LockResult<RwLockReadGuard<'_, T>>,
    error_constructor: impl FnOnce(String) -> E,
) -> Result<RwLockReadGuard<'_, T>, E> {
    result.map_err(|poison_err| {
        error_constructor(format!(
            "Internal synchronisation error (RwLock read poisoned). A writer panicked while holding the lock: {poison_err}"
        ))
    })
}

/// Convert a poisoned RwLock write into an application error
pub fn handle_rwlock_write<T, E>(
    result: LockResult<RwLockWriteGuard<'_, T>>,
    error_constructor: impl FnOnce(String) -> E,
) -> Result<RwLockWriteGuard<'_, T>, E> {
    result.map_err(|poison_err| {
        error_constructor(format!(
            "Internal synchronisation error (RwLock write poisoned). A thread panicked while holding the lock: {poison_err}"
        ))
    })
}
