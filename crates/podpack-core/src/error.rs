use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransactionError {
    #[error("invalid ref: {0}")]
    MalformedRef(String),

    #[error("{0} not installed")]
    NotInstalled(String),

    #[error("{0} already installed")]
    AlreadyInstalled(String),

    #[error("the application {app} requires the runtime {runtime} which is not installed")]
    RuntimeMissing { app: String, runtime: String },

    #[error("OCI image is not an application bundle (missing ref)")]
    NotABundleImage,

    #[error("operation cancelled")]
    Cancelled,

    #[error("One or more operations failed")]
    Failed,
}
