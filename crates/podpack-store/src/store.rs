use std::path::PathBuf;

use anyhow::Result;
use podpack_core::{CancellationToken, Subpaths};

use crate::{DeployData, PullOptions, RelatedRef};

// One installation scope. A user-scope store exposes the system scope via
// system() so callers can satisfy dependencies from either; a system-scope
// store must never consult user deployments.
pub trait BundleStore {
    fn is_user(&self) -> bool;

    fn system(&self) -> Option<&dyn BundleStore>;

    fn get_if_deployed(&self, bundle_ref: &str) -> Option<PathBuf>;

    fn get_deploy_data(&self, bundle_ref: &str) -> Option<DeployData>;

    fn remote_disabled(&self, remote: &str) -> bool;

    fn fetch_ref_cache(&self, remote: &str, bundle_ref: &str) -> Option<Vec<u8>>;

    fn find_local_related(&self, bundle_ref: &str, remote: &str) -> Result<Vec<RelatedRef>>;

    fn find_remote_related(&self, bundle_ref: &str, remote: &str) -> Result<Vec<RelatedRef>>;

    fn search_for_dependency(&self, bundle_ref: &str) -> Vec<String>;

    fn install(
        &self,
        options: &PullOptions,
        bundle_ref: &str,
        remote: &str,
        subpaths: &Subpaths,
        cancel: &CancellationToken,
    ) -> Result<()>;

    fn update(
        &self,
        options: &PullOptions,
        bundle_ref: &str,
        remote: &str,
        commit: Option<&str>,
        subpaths: &Subpaths,
        cancel: &CancellationToken,
    ) -> Result<()>;

    fn create_origin_remote(
        &self,
        id: &str,
        title: &str,
        bundle_ref: &str,
        uri: &str,
        tag: &str,
    ) -> Result<String>;

    fn recreate_repo(&self) -> Result<()>;
}
