use std::sync::{Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

/// Lock a state mutex. A panic in another holder leaves plain data behind,
/// so a poisoned lock is still usable.
pub fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

pub fn new_request_id() -> Uuid {
    Uuid::new_v4()
}

pub fn validate_id(id: &str) -> bool {
    !id.trim().is_empty() && !id.contains('/')
}
