//! Trust manager factory: resolve once, hand out validators.

use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::config::Settings;
use crate::error::{StoreError, UninitializedError, UnsupportedError};
use crate::resolver::StoreResolver;
use crate::store::TrustStore;
use crate::validator::TrustValidator;

/// Parameter objects for the alternate initialization form.
///
/// Accepted for interface compatibility; every implementation is rejected.
pub trait ManagerFactoryParameters: fmt::Debug {}

/// Holds the active trust store and builds validators from it.
///
/// Uninitialized until [`init`](Self::init) succeeds. Each `init` replaces
/// the held store; a failed `init` leaves the factory uninitialized.
/// Not internally synchronized: wrap in a lock to share across threads.
#[derive(Debug, Clone)]
pub struct TrustManagerFactory {
    resolver: StoreResolver,
    store: Option<Arc<TrustStore>>,
}

impl Default for TrustManagerFactory {
    fn default() -> Self {
        Self::new(Settings::global().clone())
    }
}

impl TrustManagerFactory {
    pub fn new(settings: Settings) -> Self {
        Self {
            resolver: StoreResolver::new(settings),
            store: None,
        }
    }

    pub fn resolver(&self) -> &StoreResolver {
        &self.resolver
    }

    /// Adopt `store`, or resolve one from settings when `None`.
    pub fn init(&mut self, store: Option<Arc<TrustStore>>) -> Result<(), StoreError> {
        match self.resolver.resolve(store) {
            Ok(store) => {
                self.store = Some(store);
                Ok(())
            }
            Err(e) => {
                self.store = None;
                Err(e)
            }
        }
    }

    /// Always fails; parameter objects are not a supported configuration form.
    pub fn init_with_parameters(
        &mut self,
        params: &dyn ManagerFactoryParameters,
    ) -> Result<(), UnsupportedError> {
        debug!(?params, "rejecting parameter-object initialization");
        Err(UnsupportedError)
    }

    pub fn is_initialized(&self) -> bool {
        self.store.is_some()
    }

    pub fn store(&self) -> Option<&Arc<TrustStore>> {
        self.store.as_ref()
    }

    /// One validator bound to the current store.
    pub fn validators(&self) -> Result<Vec<TrustValidator>, UninitializedError> {
        let store = self.store.as_ref().ok_or(UninitializedError)?;
        Ok(vec![TrustValidator::new(Arc::clone(store))])
    }
}
