use std::fs;
use std::io;

use anyhow::{anyhow, Context, Result};

use crate::{DeployData, ScopeLayout};

pub fn read_deploy_data(layout: &ScopeLayout, bundle_ref: &str) -> Result<Option<DeployData>> {
    let path = layout.deploy_data_path(bundle_ref);
    let raw = match fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read deploy record: {}", path.display()));
        }
    };

    let data = parse_deploy_data(&raw)
        .with_context(|| format!("failed parsing deploy record: {}", path.display()))?;
    Ok(Some(data))
}

pub fn write_deploy_data(
    layout: &ScopeLayout,
    bundle_ref: &str,
    data: &DeployData,
) -> Result<()> {
    let path = layout.deploy_data_path(bundle_ref);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(&path, serialize_deploy_data(data))
        .with_context(|| format!("failed to write deploy record: {}", path.display()))
}

pub fn parse_deploy_data(raw: &str) -> Result<DeployData> {
    let mut origin = None;
    let mut commit = None;
    let mut subpaths = Vec::new();

    for line in raw.lines().map(str::trim).filter(|line| !line.is_empty()) {
        let (key, value) = line
            .split_once('=')
            .ok_or_else(|| anyhow!("invalid deploy record line: {line}"))?;
        match key {
            "origin" => origin = Some(value.to_string()),
            "commit" => commit = Some(value.to_string()),
            "subpath" => subpaths.push(value.to_string()),
            _ => {}
        }
    }

    Ok(DeployData {
        origin: origin.ok_or_else(|| anyhow!("missing deploy record field: origin"))?,
        commit: commit.ok_or_else(|| anyhow!("missing deploy record field: commit"))?,
        subpaths,
    })
}

pub fn serialize_deploy_data(data: &DeployData) -> String {
    let mut out = format!("origin={}\ncommit={}\n", data.origin, data.commit);
    for subpath in &data.subpaths {
        out.push_str(&format!("subpath={subpath}\n"));
    }
    out
}
