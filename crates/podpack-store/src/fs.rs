use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use podpack_core::{pretty_ref, CancellationToken, Subpaths, TransactionError};
use serde::Deserialize;

use crate::deploy::{read_deploy_data, write_deploy_data};
use crate::remotes::{load_remotes, save_remotes};
use crate::{BundleStore, DeployData, PullOptions, RelatedRef, RemoteRecord, ScopeLayout};

const ENTRY_COMMIT: &str = "commit";
const ENTRY_METADATA: &str = "metadata";
const ENTRY_RELATED: &str = "related.toml";

#[derive(Debug, Clone, Deserialize)]
struct RelatedEntryFile {
    #[serde(rename = "ref")]
    bundle_ref: String,
    #[serde(default = "default_download")]
    download: bool,
    #[serde(default)]
    subpaths: Vec<String>,
}

fn default_download() -> bool {
    true
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RelatedFile {
    #[serde(default)]
    related: Vec<RelatedEntryFile>,
}

// A scope rooted in a directory. Remote "pulls" copy per-ref entries from
// the remote's directory into the scope cache; content transfer itself lives
// behind this boundary.
#[derive(Debug)]
pub struct FsStore {
    layout: ScopeLayout,
    user: bool,
    system_store: Option<Box<FsStore>>,
}

impl FsStore {
    pub fn system_scope(root: impl Into<PathBuf>) -> Self {
        Self {
            layout: ScopeLayout::new(root),
            user: false,
            system_store: None,
        }
    }

    pub fn user_scope(root: impl Into<PathBuf>, system_root: impl Into<PathBuf>) -> Self {
        Self {
            layout: ScopeLayout::new(root),
            user: true,
            system_store: Some(Box::new(Self::system_scope(system_root))),
        }
    }

    pub fn layout(&self) -> &ScopeLayout {
        &self.layout
    }

    pub fn list_deployed(&self) -> Result<Vec<(String, DeployData)>> {
        let mut deployed = Vec::new();
        let deploys = self.layout.deploys_dir();
        if deploys.exists() {
            collect_deploys(&deploys, String::new(), &mut deployed)?;
        }

        let mut resolved = Vec::with_capacity(deployed.len());
        for bundle_ref in deployed {
            if let Some(data) = read_deploy_data(&self.layout, &bundle_ref)? {
                resolved.push((bundle_ref, data));
            }
        }
        resolved.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(resolved)
    }

    fn remote_record(&self, remote: &str) -> Result<Option<RemoteRecord>> {
        let remotes = load_remotes(&self.layout)?;
        Ok(remotes
            .remotes
            .into_iter()
            .find(|record| record.name == remote))
    }

    fn remote_entry_dir(&self, remote: &str, bundle_ref: &str) -> Option<PathBuf> {
        let record = self.remote_record(remote).ok().flatten()?;
        Some(PathBuf::from(record.url).join("refs").join(bundle_ref))
    }

    fn read_entry_file(&self, remote: &str, bundle_ref: &str, name: &str) -> Option<Vec<u8>> {
        let cached = self.layout.ref_cache_dir(remote, bundle_ref).join(name);
        if let Ok(bytes) = fs::read(&cached) {
            return Some(bytes);
        }

        let source = self.remote_entry_dir(remote, bundle_ref)?.join(name);
        fs::read(source).ok()
    }

    fn ref_entry_commit(&self, remote: &str, bundle_ref: &str) -> Option<String> {
        let bytes = self.read_entry_file(remote, bundle_ref, ENTRY_COMMIT)?;
        let text = String::from_utf8(bytes).ok()?;
        let commit = text.trim();
        if commit.is_empty() {
            return None;
        }
        Some(commit.to_string())
    }

    fn pull_ref_entry(&self, remote: &str, bundle_ref: &str) -> Result<()> {
        let source = self
            .remote_entry_dir(remote, bundle_ref)
            .ok_or_else(|| anyhow!("remote '{remote}' is not configured"))?;
        if !source.join(ENTRY_COMMIT).exists() {
            return Err(anyhow!("{bundle_ref} not found in remote '{remote}'"));
        }

        let cache = self.layout.ref_cache_dir(remote, bundle_ref);
        fs::create_dir_all(&cache)
            .with_context(|| format!("failed to create {}", cache.display()))?;
        for entry in [ENTRY_COMMIT, ENTRY_METADATA, ENTRY_RELATED] {
            let from = source.join(entry);
            if !from.exists() {
                continue;
            }
            let to = cache.join(entry);
            fs::copy(&from, &to).with_context(|| {
                format!("failed to pull {} into {}", from.display(), to.display())
            })?;
        }
        Ok(())
    }

    fn parse_related_bytes(&self, bytes: &[u8]) -> Result<Vec<RelatedRef>> {
        let text = std::str::from_utf8(bytes).context("related index is not valid UTF-8")?;
        let parsed: RelatedFile = toml::from_str(text).context("failed parsing related index")?;
        Ok(parsed
            .related
            .into_iter()
            .map(|entry| RelatedRef {
                bundle_ref: entry.bundle_ref,
                subpaths: Subpaths::from_list(entry.subpaths),
                download: entry.download,
            })
            .collect())
    }
}

impl BundleStore for FsStore {
    fn is_user(&self) -> bool {
        self.user
    }

    fn system(&self) -> Option<&dyn BundleStore> {
        self.system_store
            .as_ref()
            .map(|store| store.as_ref() as &dyn BundleStore)
    }

    fn get_if_deployed(&self, bundle_ref: &str) -> Option<PathBuf> {
        let dir = self.layout.deploy_dir(bundle_ref);
        if self.layout.deploy_data_path(bundle_ref).exists() {
            Some(dir)
        } else {
            None
        }
    }

    fn get_deploy_data(&self, bundle_ref: &str) -> Option<DeployData> {
        read_deploy_data(&self.layout, bundle_ref).ok().flatten()
    }

    fn remote_disabled(&self, remote: &str) -> bool {
        self.remote_record(remote)
            .ok()
            .flatten()
            .map(|record| record.disabled)
            .unwrap_or(false)
    }

    fn fetch_ref_cache(&self, remote: &str, bundle_ref: &str) -> Option<Vec<u8>> {
        self.read_entry_file(remote, bundle_ref, ENTRY_METADATA)
    }

    fn find_local_related(&self, bundle_ref: &str, remote: &str) -> Result<Vec<RelatedRef>> {
        let cached = self
            .layout
            .ref_cache_dir(remote, bundle_ref)
            .join(ENTRY_RELATED);
        match fs::read(&cached) {
            Ok(bytes) => self.parse_related_bytes(&bytes),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(err) => Err(err)
                .with_context(|| format!("failed to read related index: {}", cached.display())),
        }
    }

    fn find_remote_related(&self, bundle_ref: &str, remote: &str) -> Result<Vec<RelatedRef>> {
        if self.remote_record(remote)?.is_none() {
            return Err(anyhow!("remote '{remote}' is not configured"));
        }

        match self.read_entry_file(remote, bundle_ref, ENTRY_RELATED) {
            Some(bytes) => self.parse_related_bytes(&bytes),
            None => Ok(Vec::new()),
        }
    }

    fn search_for_dependency(&self, bundle_ref: &str) -> Vec<String> {
        let Ok(remotes) = load_remotes(&self.layout) else {
            return Vec::new();
        };

        remotes
            .remotes
            .into_iter()
            .filter(|record| !record.disabled)
            .filter(|record| {
                PathBuf::from(&record.url)
                    .join("refs")
                    .join(bundle_ref)
                    .join(ENTRY_COMMIT)
                    .exists()
                    || self
                        .layout
                        .ref_cache_dir(&record.name, bundle_ref)
                        .join(ENTRY_COMMIT)
                        .exists()
            })
            .map(|record| record.name)
            .collect()
    }

    fn install(
        &self,
        options: &PullOptions,
        bundle_ref: &str,
        remote: &str,
        subpaths: &Subpaths,
        cancel: &CancellationToken,
    ) -> Result<()> {
        cancel.check()?;
        let pretty = pretty_ref(bundle_ref)?.to_string();

        if read_deploy_data(&self.layout, bundle_ref)?.is_some() {
            return Err(TransactionError::AlreadyInstalled(pretty).into());
        }

        if !options.no_pull {
            self.pull_ref_entry(remote, bundle_ref)?;
        }
        let commit = self
            .ref_entry_commit(remote, bundle_ref)
            .ok_or_else(|| anyhow!("{bundle_ref} not found in remote '{remote}'"))?;

        if options.no_deploy {
            return Ok(());
        }

        let recorded = match subpaths {
            Subpaths::Inherit | Subpaths::All => Vec::new(),
            Subpaths::Only(list) => list.clone(),
        };
        write_deploy_data(
            &self.layout,
            bundle_ref,
            &DeployData {
                origin: remote.to_string(),
                commit,
                subpaths: recorded,
            },
        )
    }

    fn update(
        &self,
        options: &PullOptions,
        bundle_ref: &str,
        remote: &str,
        commit: Option<&str>,
        subpaths: &Subpaths,
        cancel: &CancellationToken,
    ) -> Result<()> {
        cancel.check()?;
        let pretty = pretty_ref(bundle_ref)?.to_string();

        let Some(current) = read_deploy_data(&self.layout, bundle_ref)? else {
            return Err(TransactionError::NotInstalled(pretty).into());
        };

        if !options.no_pull {
            self.pull_ref_entry(remote, bundle_ref)?;
        }
        let target = match commit {
            Some(pinned) => pinned.to_string(),
            None => self
                .ref_entry_commit(remote, bundle_ref)
                .unwrap_or_else(|| current.commit.clone()),
        };

        if target == current.commit {
            return Err(TransactionError::AlreadyInstalled(pretty).into());
        }

        if options.no_deploy {
            return Ok(());
        }

        let recorded = match subpaths {
            Subpaths::Inherit => current.subpaths,
            Subpaths::All => Vec::new(),
            Subpaths::Only(list) => list.clone(),
        };
        write_deploy_data(
            &self.layout,
            bundle_ref,
            &DeployData {
                origin: remote.to_string(),
                commit: target,
                subpaths: recorded,
            },
        )
    }

    fn create_origin_remote(
        &self,
        id: &str,
        title: &str,
        bundle_ref: &str,
        uri: &str,
        tag: &str,
    ) -> Result<String> {
        let mut remotes = load_remotes(&self.layout)?;

        let mut name = id.to_string();
        let mut suffix = 1;
        while remotes.remotes.iter().any(|record| record.name == name) {
            name = format!("{id}-{suffix}");
            suffix += 1;
        }

        remotes.remotes.push(RemoteRecord {
            name: name.clone(),
            url: uri.to_string(),
            title: Some(title.to_string()),
            disabled: false,
            tag: Some(tag.to_string()),
        });
        save_remotes(&self.layout, &remotes)?;

        log::debug!("created origin remote {name} for {bundle_ref}");
        Ok(name)
    }

    fn recreate_repo(&self) -> Result<()> {
        // Remote configuration is re-read from disk on every query, so a new
        // origin remote is visible without further work.
        log::debug!("reopened repo at {}", self.layout.root().display());
        Ok(())
    }
}

fn collect_deploys(dir: &Path, prefix: String, out: &mut Vec<String>) -> Result<()> {
    if dir.join("deploy").is_file() {
        out.push(prefix);
        return Ok(());
    }

    let entries =
        fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))?;
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        let child_prefix = if prefix.is_empty() {
            name
        } else {
            format!("{prefix}/{name}")
        };
        collect_deploys(&entry.path(), child_prefix, out)?;
    }
    Ok(())
}
