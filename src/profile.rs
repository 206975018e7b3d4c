//! Browser profile directories.
//!
//! The reader's single-page preference lives in the browser profile, so a
//! named profile keeps it between runs while a temporary one starts fresh.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info};

/// Profile directory held for the lifetime of a session
#[derive(Debug)]
pub enum ProfileDir {
    /// Named profile under the profiles root, kept after the run
    Persistent(PathBuf),
    /// Throwaway profile removed when dropped
    Temporary(TempDir),
}

impl ProfileDir {
    pub fn path(&self) -> &Path {
        match self {
            ProfileDir::Persistent(path) => path,
            ProfileDir::Temporary(dir) => dir.path(),
        }
    }
}

/// Resolves named browser profiles
pub struct ProfileManager {
    profiles_dir: PathBuf,
}

impl ProfileManager {
    /// Profiles under `~/.rmanga-scraper/profiles`
    pub fn new() -> Result<Self> {
        let home_dir = dirs::home_dir().context("Unable to determine home directory")?;
        Self::with_root(home_dir.join(".rmanga-scraper").join("profiles"))
    }

    pub fn with_root(profiles_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&profiles_dir).with_context(|| {
            format!("Cannot create profiles directory {}", profiles_dir.display())
        })?;
        Ok(ProfileManager { profiles_dir })
    }

    /// Path of a named profile, created on first use
    pub fn profile_path(&self, name: &str) -> Result<PathBuf> {
        if name.is_empty()
            || name == "."
            || name == ".."
            || name.contains(['/', '\\'])
        {
            anyhow::bail!("Invalid profile name '{}'", name);
        }

        let profile_path = self.profiles_dir.join(name);
        if !profile_path.exists() {
            fs::create_dir_all(&profile_path)?;
            info!("Created profile '{}'", name);
        }
        Ok(profile_path)
    }

    /// Named profile kept after the run
    pub fn persistent(&self, name: &str) -> Result<ProfileDir> {
        Ok(ProfileDir::Persistent(self.profile_path(name)?))
    }
}

/// Fresh profile in the system temp directory
pub fn temporary_profile() -> Result<ProfileDir> {
    let dir = tempfile::Builder::new()
        .prefix("rmanga-scraper-")
        .tempdir()
        .context("Cannot create temporary browser profile")?;
    debug!("Using temporary profile {}", dir.path().display());
    Ok(ProfileDir::Temporary(dir))
}
