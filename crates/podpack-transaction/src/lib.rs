mod chooser;
mod deps;
mod executor;
mod oci;
mod operation;
mod transaction;

pub use chooser::{FirstRemoteChooser, RemoteChooser, TerminalChooser};
pub use oci::{
    parse_commit_annotations, DirOciClient, OciClient, OciImageManifest, OciRegistryHandle,
    ANNOTATION_COMMIT, ANNOTATION_REF,
};
pub use operation::Operation;
pub use transaction::{Transaction, TransactionOptions};
