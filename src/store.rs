//! In-memory trust store and the formats it is loaded from.

use rustls::pki_types::CertificateDer;
use std::collections::BTreeMap;
use std::fmt;
use std::io::{BufRead, Read};
use std::str::FromStr;
use tracing::debug;

use crate::cert::TrustEntry;
use crate::error::LoadError;

/// On-disk encodings a trust store can be loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreType {
    /// Concatenated PEM `CERTIFICATE` blocks.
    #[default]
    Pem,
    /// A single DER certificate.
    Der,
}

impl StoreType {
    pub const DEFAULT_NAME: &'static str = "pem";

    /// Look up a store type by name (case-insensitive).
    pub fn from_name(name: &str) -> Result<Self, LoadError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "pem" => Ok(StoreType::Pem),
            "der" => Ok(StoreType::Der),
            _ => Err(LoadError::UnsupportedType(name.to_string())),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            StoreType::Pem => "pem",
            StoreType::Der => "der",
        }
    }

    /// A valid store with no backing source and no entries.
    pub fn load_empty(self) -> TrustStore {
        TrustStore {
            store_type: self,
            entries: BTreeMap::new(),
        }
    }

    /// Load entries from `reader`.
    ///
    /// Neither format carries an integrity envelope, so the passphrase is
    /// consumed without effect.
    pub fn load(
        self,
        reader: &mut dyn BufRead,
        passphrase: &str,
    ) -> Result<TrustStore, LoadError> {
        if !passphrase.is_empty() {
            debug!(
                store_type = self.name(),
                "passphrase ignored: format has no integrity envelope"
            );
        }

        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).map_err(LoadError::Read)?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(LoadError::Corrupt("empty trust store stream".to_string()));
        }

        let certs = match self {
            StoreType::Pem => {
                let certs = rustls_pemfile::certs(&mut bytes.as_slice())
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|e| LoadError::Corrupt(format!("parse PEM: {e}")))?;
                if certs.is_empty() {
                    return Err(LoadError::Corrupt("no certificates in PEM data".to_string()));
                }
                certs
            }
            StoreType::Der => vec![CertificateDer::from(bytes)],
        };
        TrustStore::from_certificates(self, certs)
    }
}

impl FromStr for StoreType {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StoreType::from_name(s)
    }
}

impl fmt::Display for StoreType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Trusted certificates keyed by alias. Immutable once built.
#[derive(Debug, Clone)]
pub struct TrustStore {
    store_type: StoreType,
    entries: BTreeMap<String, TrustEntry>,
}

impl TrustStore {
    /// Build a store from DER certificates, assigning unique aliases.
    pub fn from_certificates(
        store_type: StoreType,
        certs: impl IntoIterator<Item = CertificateDer<'static>>,
    ) -> Result<Self, LoadError> {
        let mut entries = BTreeMap::new();
        for (index, der) in certs.into_iter().enumerate() {
            let mut entry = TrustEntry::from_der(der)?;
            let base = entry.preferred_alias(index);
            let mut alias = base.clone();
            let mut n = 1;
            while entries.contains_key(&alias) {
                alias = format!("{base}-{n}");
                n += 1;
            }
            entry.alias = alias.clone();
            entries.insert(alias, entry);
        }
        Ok(Self {
            store_type,
            entries,
        })
    }

    pub fn store_type(&self) -> StoreType {
        self.store_type
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn contains_alias(&self, alias: &str) -> bool {
        self.entries.contains_key(alias)
    }

    pub fn get(&self, alias: &str) -> Option<&TrustEntry> {
        self.entries.get(alias)
    }

    /// Entries in alias order.
    pub fn entries(&self) -> impl Iterator<Item = &TrustEntry> {
        self.entries.values()
    }
}
