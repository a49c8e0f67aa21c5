//! Session storage location.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;

use sesame_store::FileCredentialStore;

/// Directory that holds the session document.
fn data_dir() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("", "", "sesame").context("Could not determine data directory")?;

    let data_dir = dirs.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data directory")?;

    Ok(data_dir.to_path_buf())
}

/// The credential store for this user.
pub fn store() -> Result<FileCredentialStore> {
    Ok(FileCredentialStore::new(data_dir()?))
}
