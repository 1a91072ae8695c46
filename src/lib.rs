//! trustroots - resolve, load and hand out the TLS trust store.

pub mod cert;
pub mod cli;
pub mod config;
pub mod doctor;
pub mod error;
pub mod factory;
pub mod logging;
pub mod resolver;
pub mod store;
pub mod validator;

pub use config::{Settings, TrustConfig};
pub use error::{LoadError, StoreError, UninitializedError, UnsupportedError, VerifyError};
pub use factory::{ManagerFactoryParameters, TrustManagerFactory};
pub use resolver::{StoreResolver, TrustSource};
pub use store::{StoreType, TrustStore};
pub use validator::TrustValidator;
