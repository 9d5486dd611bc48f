mod deploy;
mod fs;
mod layout;
mod remotes;
mod store;
mod types;

pub use deploy::{parse_deploy_data, read_deploy_data, serialize_deploy_data, write_deploy_data};
pub use fs::FsStore;
pub use layout::{default_system_scope_root, default_user_scope_root, ScopeLayout};
pub use remotes::{add_remote, load_remotes, save_remotes, RemoteRecord, RemotesFile};
pub use store::BundleStore;
pub use types::{DeployData, PullOptions, RelatedRef};
