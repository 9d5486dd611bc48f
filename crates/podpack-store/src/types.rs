use podpack_core::Subpaths;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployData {
    pub origin: String,
    pub commit: String,
    pub subpaths: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedRef {
    pub bundle_ref: String,
    pub subpaths: Subpaths,
    pub download: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PullOptions {
    pub no_pull: bool,
    pub no_deploy: bool,
}
