//! Certificate parsing for trust entries and presented chains.

use anyhow::{Context, Result};
use rustls::pki_types::CertificateDer;
use std::fs;
use std::path::Path;
use time::OffsetDateTime;
use x509_parser::prelude::FromDer;

use crate::error::LoadError;

/// One trusted certificate, addressable by alias.
#[derive(Debug, Clone)]
pub struct TrustEntry {
    pub(crate) alias: String,
    der: CertificateDer<'static>,
    subject: String,
    common_name: Option<String>,
    not_after: OffsetDateTime,
}

impl TrustEntry {
    /// Parse a DER certificate. The alias is assigned by the owning store.
    pub fn from_der(der: CertificateDer<'static>) -> Result<Self, LoadError> {
        let (subject, common_name, not_after) = describe(der.as_ref())?;
        Ok(Self {
            alias: String::new(),
            der,
            subject,
            common_name,
            not_after,
        })
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn der(&self) -> &CertificateDer<'static> {
        &self.der
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn common_name(&self) -> Option<&str> {
        self.common_name.as_deref()
    }

    pub fn not_after(&self) -> OffsetDateTime {
        self.not_after
    }

    /// True if the certificate expires within `days` days from now.
    pub fn expires_within_days(&self, days: u32) -> bool {
        let threshold =
            OffsetDateTime::now_utc().saturating_add(time::Duration::days(i64::from(days)));
        self.not_after < threshold
    }

    /// Alias this entry would take before collision handling.
    pub(crate) fn preferred_alias(&self, index: usize) -> String {
        match self.common_name.as_deref().map(str::trim) {
            Some(cn) if !cn.is_empty() => cn.to_lowercase(),
            _ => format!("entry-{index}"),
        }
    }
}

/// Subject, common name and expiry of a DER certificate.
fn describe(der: &[u8]) -> Result<(String, Option<String>, OffsetDateTime), LoadError> {
    let (rest, cert) = x509_parser::prelude::X509Certificate::from_der(der)
        .map_err(|e| LoadError::Corrupt(format!("parse X.509: {e}")))?;
    if !rest.is_empty() {
        return Err(LoadError::Corrupt(format!(
            "{} trailing bytes after certificate",
            rest.len()
        )));
    }

    let subject = cert.subject().to_string();
    let common_name = cert
        .subject()
        .iter_common_name()
        .next()
        .and_then(|cn| cn.as_str().ok())
        .map(str::to_string);
    let expiry_ts = cert.validity().not_after.timestamp();
    let not_after = OffsetDateTime::from_unix_timestamp(expiry_ts)
        .map_err(|e| LoadError::Corrupt(format!("invalid expiry: {e}")))?;
    Ok((subject, common_name, not_after))
}

/// Read a PEM chain (leaf first) from `path`.
pub fn read_pem_chain(path: &Path) -> Result<Vec<CertificateDer<'static>>> {
    let pem = fs::read(path).with_context(|| format!("read chain: {}", path.display()))?;
    let chain = rustls_pemfile::certs(&mut pem.as_slice())
        .collect::<Result<Vec<_>, _>>()
        .context("parse chain PEM")?;
    if chain.is_empty() {
        anyhow::bail!("no certificates in {}", path.display());
    }
    Ok(chain)
}
