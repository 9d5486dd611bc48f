use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeLayout {
    root: PathBuf,
}

impl ScopeLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn deploys_dir(&self) -> PathBuf {
        self.root.join("deploy")
    }

    pub fn deploy_dir(&self, bundle_ref: &str) -> PathBuf {
        self.deploys_dir().join(bundle_ref)
    }

    pub fn deploy_data_path(&self, bundle_ref: &str) -> PathBuf {
        self.deploy_dir(bundle_ref).join("deploy")
    }

    pub fn remotes_config_path(&self) -> PathBuf {
        self.root.join("remotes.toml")
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.root.join("cache")
    }

    pub fn remote_cache_dir(&self, remote: &str) -> PathBuf {
        self.cache_dir().join(remote)
    }

    pub fn ref_cache_dir(&self, remote: &str, bundle_ref: &str) -> PathBuf {
        self.remote_cache_dir(remote).join("refs").join(bundle_ref)
    }

    pub fn ensure_base_dirs(&self) -> Result<()> {
        for dir in [self.deploys_dir(), self.cache_dir()] {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }
        Ok(())
    }
}

pub fn default_user_scope_root() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set; cannot resolve user scope root")?;
    Ok(PathBuf::from(home).join(".podpack"))
}

pub fn default_system_scope_root() -> PathBuf {
    if let Ok(overridden) = std::env::var("PODPACK_SYSTEM_PATH") {
        if !overridden.trim().is_empty() {
            return PathBuf::from(overridden);
        }
    }
    PathBuf::from("/var/lib/podpack")
}
