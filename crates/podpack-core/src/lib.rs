mod cancel;
mod error;
mod metadata;
mod refs;
mod subpaths;

pub use cancel::CancellationToken;
pub use error::TransactionError;
pub use metadata::{keyfile_value, runtime_from_metadata};
pub use refs::{decompose_ref, is_app_ref, pretty_ref, runtime_ref, RefKind, RefParts};
pub use subpaths::Subpaths;

#[cfg(test)]
mod tests;
