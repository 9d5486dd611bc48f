use std::fs;
use std::io;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::ScopeLayout;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRecord {
    pub name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemotesFile {
    #[serde(default)]
    pub remotes: Vec<RemoteRecord>,
}

pub fn load_remotes(layout: &ScopeLayout) -> Result<RemotesFile> {
    let path = layout.remotes_config_path();
    let raw = match fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(RemotesFile::default()),
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read remote config: {}", path.display()));
        }
    };

    toml::from_str(&raw).with_context(|| format!("failed parsing remote config: {}", path.display()))
}

pub fn save_remotes(layout: &ScopeLayout, remotes: &RemotesFile) -> Result<()> {
    let path = layout.remotes_config_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let content = toml::to_string(remotes)
        .with_context(|| format!("failed serializing remote config: {}", path.display()))?;
    fs::write(&path, content)
        .with_context(|| format!("failed to write remote config: {}", path.display()))
}

pub fn add_remote(layout: &ScopeLayout, remote: RemoteRecord) -> Result<()> {
    let mut remotes = load_remotes(layout)?;
    if remotes
        .remotes
        .iter()
        .any(|existing| existing.name == remote.name)
    {
        return Err(anyhow!("remote '{}' already exists", remote.name));
    }

    remotes.remotes.push(remote);
    save_remotes(layout, &remotes)
}
