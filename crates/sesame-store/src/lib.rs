//! sesame-store - Credential storage backends.
//!
//! [`FileCredentialStore`] persists the signed-in user to a JSON file with
//! owner-only permissions. [`MemoryCredentialStore`] keeps it in process.

mod file;
mod memory;

pub use file::{FileCredentialStore, StoredSession};
pub use memory::MemoryCredentialStore;
