//! [`PersonaStore`](satlab_core::traits::PersonaStore) implementations.

pub mod atomic;
pub mod json_dir;
pub mod memory;

pub use json_dir::JsonDirStore;
pub use memory::MemoryStore;

use satlab_core::errors::StoreError;
use satlab_core::saved::is_valid_key;

pub(crate) fn check_session(session: &str) -> Result<(), StoreError> {
    if is_valid_key(session) {
        Ok(())
    } else {
        Err(StoreError::InvalidSession(session.to_string()))
    }
}
