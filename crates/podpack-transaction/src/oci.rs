use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

pub const ANNOTATION_REF: &str = "org.podpack.ref";
pub const ANNOTATION_COMMIT: &str = "org.podpack.commit";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OciImageManifest {
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
}

pub trait OciClient {
    fn open_registry(&self, uri: &str) -> Result<Box<dyn OciRegistryHandle>>;
}

pub trait OciRegistryHandle {
    fn choose_image(&self, tag: &str) -> Result<OciImageManifest>;
}

pub fn parse_commit_annotations(
    annotations: &BTreeMap<String, String>,
) -> (Option<String>, Option<String>) {
    (
        annotations.get(ANNOTATION_REF).cloned(),
        annotations.get(ANNOTATION_COMMIT).cloned(),
    )
}

// Registry stored as a local OCI layout directory: manifests/<tag>.json.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirOciClient;

struct DirOciRegistry {
    root: PathBuf,
}

impl OciClient for DirOciClient {
    fn open_registry(&self, uri: &str) -> Result<Box<dyn OciRegistryHandle>> {
        let root = PathBuf::from(uri);
        if !root.is_dir() {
            return Err(anyhow!("cannot open OCI registry at {uri}"));
        }
        Ok(Box::new(DirOciRegistry { root }))
    }
}

impl OciRegistryHandle for DirOciRegistry {
    fn choose_image(&self, tag: &str) -> Result<OciImageManifest> {
        let path = manifest_path(&self.root, tag);
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read image manifest: {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed parsing image manifest: {}", path.display()))
    }
}

fn manifest_path(root: &Path, tag: &str) -> PathBuf {
    root.join("manifests").join(format!("{tag}.json"))
}
