//! Error types for trust-store resolution and validator use.

use std::io;
use std::path::{Path, PathBuf};

/// Why a trust store could not be loaded.
///
/// Callers only ever see this as the source of a [`StoreError`].
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("trust store not found: {}", path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("open trust store: {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("read trust store stream")]
    Read(#[source] io::Error),
    #[error("corrupt trust store content: {0}")]
    Corrupt(String),
    #[error("unsupported trust store type: {0}")]
    UnsupportedType(String),
}

impl LoadError {
    /// Classify an error raised while opening `path`.
    pub(crate) fn open(path: &Path, source: io::Error) -> Self {
        let path = path.to_path_buf();
        if source.kind() == io::ErrorKind::NotFound {
            LoadError::NotFound { path, source }
        } else {
            LoadError::Open { path, source }
        }
    }
}

/// The trust store could not be initialized.
///
/// Every load failure collapses into this one kind; the underlying
/// [`LoadError`] is kept as the error source for diagnostics.
#[derive(Debug, thiserror::Error)]
#[error("trust store could not be initialized")]
pub struct StoreError {
    #[from]
    cause: LoadError,
}

impl StoreError {
    pub fn cause(&self) -> &LoadError {
        &self.cause
    }
}

/// Parameter-object initialization is not supported.
#[derive(Debug, thiserror::Error)]
#[error("ManagerFactoryParameters not supported")]
pub struct UnsupportedError;

/// Validators were requested before the factory was initialized.
#[derive(Debug, thiserror::Error)]
#[error("trust manager factory is not initialized")]
pub struct UninitializedError;

/// A presented chain could not be verified against a validator's store.
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error("no certificates presented")]
    EmptyChain,
    #[error("invalid server name")]
    ServerName(#[from] rustls::pki_types::InvalidDnsNameError),
    #[error("build verifier")]
    Verifier(#[from] rustls::server::VerifierBuilderError),
    #[error("certificate rejected")]
    Rejected(#[from] rustls::Error),
}
