use anyhow::Result;

use crate::TransactionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    App,
    Runtime,
}

impl RefKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::App => "app",
            Self::Runtime => "runtime",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        match input {
            "app" => Some(Self::App),
            "runtime" => Some(Self::Runtime),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefParts {
    pub kind: RefKind,
    pub name: String,
    pub arch: String,
    pub branch: String,
}

impl RefParts {
    pub fn pretty(&self) -> String {
        format!("{}/{}/{}", self.name, self.arch, self.branch)
    }
}

pub fn decompose_ref(bundle_ref: &str) -> Result<RefParts> {
    let malformed = || TransactionError::MalformedRef(bundle_ref.to_string());

    let mut segments = bundle_ref.split('/');
    let kind = segments
        .next()
        .and_then(RefKind::parse)
        .ok_or_else(malformed)?;
    let name = segments.next().ok_or_else(malformed)?;
    let arch = segments.next().ok_or_else(malformed)?;
    let branch = segments.next().ok_or_else(malformed)?;

    if segments.next().is_some() {
        return Err(malformed().into());
    }
    if name.is_empty() || arch.is_empty() || branch.is_empty() {
        return Err(malformed().into());
    }

    Ok(RefParts {
        kind,
        name: name.to_string(),
        arch: arch.to_string(),
        branch: branch.to_string(),
    })
}

pub fn pretty_ref(bundle_ref: &str) -> Result<&str> {
    let (_, rest) = bundle_ref
        .split_once('/')
        .ok_or_else(|| TransactionError::MalformedRef(bundle_ref.to_string()))?;
    Ok(rest)
}

pub fn is_app_ref(bundle_ref: &str) -> bool {
    bundle_ref.starts_with("app/")
}

pub fn runtime_ref(name_arch_branch: &str) -> String {
    format!("runtime/{name_arch_branch}")
}
