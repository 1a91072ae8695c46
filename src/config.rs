//! Trust-store configuration and install-root resolution.
//!
//! Supports TRUSTROOTS_HOME env var override for testing.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::warn;
use zeroize::Zeroizing;

pub const ENV_HOME: &str = "TRUSTROOTS_HOME";
pub const ENV_TRUST_STORE: &str = "TRUSTROOTS_TRUST_STORE";
pub const ENV_TRUST_STORE_PASSWORD: &str = "TRUSTROOTS_TRUST_STORE_PASSWORD";
pub const ENV_TRUST_STORE_TYPE: &str = "TRUSTROOTS_TRUST_STORE_TYPE";

/// File name of the platform-default trust store under `<root>/etc/security`.
pub const DEFAULT_STORE_FILE: &str = "cacerts.pem";

/// Trust-store settings (config.toml or environment).
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustConfig {
    /// Path to the trust store, `NONE`, or empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trust_store: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trust_store_password: Option<String>,
    /// Store type name; `pem` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trust_store_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_root: Option<PathBuf>,
}

impl fmt::Debug for TrustConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrustConfig")
            .field("trust_store", &self.trust_store)
            .field(
                "trust_store_password",
                &self.trust_store_password.as_ref().map(|_| "<redacted>"),
            )
            .field("trust_store_type", &self.trust_store_type)
            .field("install_root", &self.install_root)
            .finish()
    }
}

/// Install root when none is configured: platform data dir, or `.trustroots`.
pub fn default_install_root() -> PathBuf {
    if let Some(dirs) = directories::ProjectDirs::from("org", "trustroots", "trustroots") {
        dirs.data_dir().to_path_buf()
    } else {
        PathBuf::from(".trustroots")
    }
}

fn lossy_var(key: &str, value: OsString) -> String {
    value.into_string().unwrap_or_else(|raw| {
        warn!(key, "environment value is not valid UTF-8");
        raw.to_string_lossy().into_owned()
    })
}

impl TrustConfig {
    /// Config built from environment variables only.
    pub fn from_env() -> Self {
        let mut cfg = TrustConfig::default();
        cfg.merge_env();
        cfg
    }

    /// Overlay every set TRUSTROOTS_* variable onto this config.
    pub fn merge_env(&mut self) {
        self.merge_vars(|key| std::env::var_os(key));
    }

    /// Overlay values from `lookup` (keyed by env var name).
    ///
    /// Paths are kept as raw OS strings. A non-UTF-8 password or type name is
    /// kept lossily; such a type name never matches a known store type.
    pub fn merge_vars(&mut self, lookup: impl Fn(&str) -> Option<OsString>) {
        if let Some(v) = lookup(ENV_TRUST_STORE) {
            self.trust_store = Some(PathBuf::from(v));
        }
        if let Some(v) = lookup(ENV_TRUST_STORE_PASSWORD) {
            self.trust_store_password = Some(lossy_var(ENV_TRUST_STORE_PASSWORD, v));
        }
        if let Some(v) = lookup(ENV_TRUST_STORE_TYPE) {
            self.trust_store_type = Some(lossy_var(ENV_TRUST_STORE_TYPE, v));
        }
        if let Some(v) = lookup(ENV_HOME) {
            self.install_root = Some(PathBuf::from(v));
        }
    }

    pub fn install_root(&self) -> PathBuf {
        self.install_root.clone().unwrap_or_else(default_install_root)
    }

    /// `<install_root>/etc/security/cacerts.pem`.
    pub fn default_trust_store_path(&self) -> PathBuf {
        self.install_root()
            .join("etc")
            .join("security")
            .join(DEFAULT_STORE_FILE)
    }

    /// Load config from path (with shared lock when file exists).
    pub fn load(path: &Path) -> Result<TrustConfig> {
        if path.is_file() {
            let mut file = fs::OpenOptions::new().read(true).open(path)?;
            fs2::FileExt::lock_shared(&file)?;
            use std::io::Read;
            let mut s = String::new();
            file.read_to_string(&mut s)?;
            let cfg: TrustConfig = toml::from_str(&s)?;
            Ok(cfg)
        } else {
            Ok(TrustConfig::default())
        }
    }

    /// Save config to path (with exclusive lock). Creates parent dirs if needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(p) = path.parent() {
            fs::create_dir_all(p)?;
        }
        let mut file = fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        fs2::FileExt::lock_exclusive(&file)?;
        let s = toml::to_string_pretty(self)?;
        use std::io::Write;
        file.write_all(s.as_bytes())?;
        Ok(())
    }
}

/// Shared handle to the settings consulted at every initialization.
///
/// Clones observe the same values. Nothing is cached by readers: each
/// resolution reads whatever is current.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    inner: Arc<RwLock<TrustConfig>>,
}

impl Settings {
    pub fn new(config: TrustConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    /// Process-wide settings, seeded from the environment on first use.
    pub fn global() -> &'static Settings {
        static GLOBAL: OnceLock<Settings> = OnceLock::new();
        GLOBAL.get_or_init(|| Settings::new(TrustConfig::from_env()))
    }

    fn read(&self) -> RwLockReadGuard<'_, TrustConfig> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, TrustConfig> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> TrustConfig {
        self.read().clone()
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut TrustConfig) -> R) -> R {
        let mut cfg = self.write();
        f(&mut *cfg)
    }

    pub fn trust_store(&self) -> Option<PathBuf> {
        self.read().trust_store.clone()
    }

    pub fn set_trust_store(&self, location: Option<PathBuf>) {
        self.write().trust_store = location;
    }

    pub fn trust_store_type(&self) -> Option<String> {
        self.read().trust_store_type.clone()
    }

    /// Configured passphrase, or empty. Wiped when the returned value drops.
    pub fn passphrase(&self) -> Zeroizing<String> {
        Zeroizing::new(self.read().trust_store_password.clone().unwrap_or_default())
    }

    /// Point `trust_store` at the platform default when it is unset.
    ///
    /// Returns the seeded location if this call set it.
    pub fn seed_default_location(&self) -> Option<PathBuf> {
        let mut cfg = self.write();
        if cfg.trust_store.is_some() {
            return None;
        }
        let location = cfg.default_trust_store_path();
        cfg.trust_store = Some(location.clone());
        Some(location)
    }
}
