//! Trust source selection and loading.
//!
//! A caller-supplied store always wins. Otherwise the location comes from
//! [`Settings`], which is seeded with the platform default when unset.

use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::error::{LoadError, StoreError};
use crate::store::{StoreType, TrustStore};

/// Location value meaning "no persistent trust material" (any case).
pub const NONE_LOCATION: &str = "NONE";

/// Where the active trust store comes from.
#[derive(Clone)]
pub enum TrustSource {
    /// Caller-supplied, already open.
    Explicit(Arc<TrustStore>),
    /// Location and passphrase from settings.
    Configured {
        location: PathBuf,
        passphrase: Zeroizing<String>,
    },
    /// Location seeded from the install root. The configured passphrase,
    /// if any, still applies.
    PlatformDefault {
        location: PathBuf,
        passphrase: Zeroizing<String>,
    },
    /// Location unset, `NONE`, or empty: a store with no entries.
    Empty,
}

impl fmt::Debug for TrustSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrustSource::Explicit(store) => f
                .debug_tuple("Explicit")
                .field(&format_args!("{} entries", store.len()))
                .finish(),
            TrustSource::Configured { location, .. } => f
                .debug_struct("Configured")
                .field("location", location)
                .finish_non_exhaustive(),
            TrustSource::PlatformDefault { location, .. } => f
                .debug_struct("PlatformDefault")
                .field("location", location)
                .finish_non_exhaustive(),
            TrustSource::Empty => f.write_str("Empty"),
        }
    }
}

impl TrustSource {
    /// Location read by this source, if it is file-backed.
    pub fn location(&self) -> Option<&Path> {
        match self {
            TrustSource::Configured { location, .. }
            | TrustSource::PlatformDefault { location, .. } => Some(location),
            TrustSource::Explicit(_) | TrustSource::Empty => None,
        }
    }
}

/// True for locations that select an empty store.
pub fn is_none_location(location: &Path) -> bool {
    let raw = location.as_os_str();
    raw.is_empty() || raw.eq_ignore_ascii_case(NONE_LOCATION)
}

/// Produces the active trust store from an explicit store or from settings.
#[derive(Debug, Clone)]
pub struct StoreResolver {
    settings: Settings,
}

impl StoreResolver {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Pick the configured source, seeding the default location if unset.
    ///
    /// Re-reads settings on every call.
    pub fn select_source(&self) -> TrustSource {
        let seeded = self.settings.seed_default_location();
        if let Some(ref location) = seeded {
            info!(
                location = %location.display(),
                "no trust store configured; using platform default"
            );
        }

        match self.settings.trust_store() {
            None => TrustSource::Empty,
            Some(location) if is_none_location(&location) => TrustSource::Empty,
            Some(location) if seeded.as_ref() == Some(&location) => TrustSource::PlatformDefault {
                location,
                passphrase: self.settings.passphrase(),
            },
            Some(location) => TrustSource::Configured {
                location,
                passphrase: self.settings.passphrase(),
            },
        }
    }

    /// Store type named in settings, or the default.
    pub fn store_type(&self) -> Result<StoreType, LoadError> {
        match self.settings.trust_store_type() {
            Some(name) => StoreType::from_name(&name),
            None => Ok(StoreType::default()),
        }
    }

    /// Adopt `explicit` as-is, or resolve and load from settings.
    pub fn resolve(
        &self,
        explicit: Option<Arc<TrustStore>>,
    ) -> Result<Arc<TrustStore>, StoreError> {
        let source = match explicit {
            Some(store) => TrustSource::Explicit(store),
            None => self.select_source(),
        };
        self.open(source)
    }

    /// Load the store a source describes. No fallback on failure.
    pub fn open(&self, source: TrustSource) -> Result<Arc<TrustStore>, StoreError> {
        let store = match source {
            TrustSource::Explicit(store) => {
                debug!(entries = store.len(), "adopting caller-supplied trust store");
                return Ok(store);
            }
            TrustSource::Empty => {
                let store_type = self.store_type()?;
                debug!(%store_type, "trust store location is NONE; using empty store");
                store_type.load_empty()
            }
            TrustSource::PlatformDefault {
                location,
                passphrase,
            }
            | TrustSource::Configured {
                location,
                passphrase,
            } => {
                let store_type = self.store_type()?;
                load_file(store_type, &location, &passphrase)?
            }
        };
        info!(
            entries = store.len(),
            store_type = %store.store_type(),
            "loaded trust store"
        );
        Ok(Arc::new(store))
    }
}

/// Open `location` and load it. The reader is dropped on every exit path.
fn load_file(
    store_type: StoreType,
    location: &Path,
    passphrase: &str,
) -> Result<TrustStore, LoadError> {
    debug!(location = %location.display(), %store_type, "loading trust store");
    let file = File::open(location).map_err(|e| LoadError::open(location, e))?;
    let mut reader = BufReader::new(file);
    store_type.load(&mut reader, passphrase)
}
