//! Shared test helpers.
#![allow(dead_code)]

use rcgen::{CertificateParams, IsCa, KeyPair};
use rustls::pki_types::CertificateDer;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use trustroots::{Settings, TrustConfig};

/// Create a temp directory for use as TRUSTROOTS_HOME.
/// Uses current dir (workspace) so sandbox allows full access.
pub fn temp_home() -> TempDir {
    tempfile::Builder::new()
        .prefix("trustroots_test_")
        .tempdir_in(std::env::current_dir().unwrap_or_else(|_| std::path::Path::new(".").into()))
        .expect("temp dir")
}

/// Settings rooted at `home` with nothing else configured.
pub fn settings_for(home: &Path) -> Settings {
    Settings::new(TrustConfig {
        install_root: Some(home.to_path_buf()),
        ..TrustConfig::default()
    })
}

/// `<home>/etc/security/cacerts.pem`.
pub fn default_store_path(home: &Path) -> PathBuf {
    home.join("etc").join("security").join("cacerts.pem")
}

pub struct TestCa {
    pub cert: rcgen::Certificate,
    pub key: KeyPair,
}

/// Self-signed CA with common name "Test CA (<name>)".
pub fn create_ca(name: &str) -> TestCa {
    let key = KeyPair::generate().expect("generate CA key pair");

    let mut params = CertificateParams::default();
    params.distinguished_name = rcgen::DistinguishedName::new();
    params.distinguished_name.push(
        rcgen::DnType::CommonName,
        rcgen::DnValue::Utf8String(format!("Test CA ({name})")),
    );
    params.is_ca = IsCa::Ca(rcgen::BasicConstraints::Unconstrained);
    params.key_usages = vec![
        rcgen::KeyUsagePurpose::KeyCertSign,
        rcgen::KeyUsagePurpose::CrlSign,
    ];

    let cert = params.self_signed(&key).expect("create CA certificate");
    TestCa { cert, key }
}

impl TestCa {
    pub fn pem(&self) -> String {
        self.cert.pem()
    }

    pub fn der(&self) -> CertificateDer<'static> {
        self.cert.der().clone()
    }

    /// Server certificate for `domain` signed by this CA.
    pub fn sign_leaf(&self, domain: &str) -> (rcgen::Certificate, KeyPair) {
        let key = KeyPair::generate().expect("generate domain key");
        let mut params =
            CertificateParams::new(vec![domain.to_string()]).expect("create cert params");
        params.distinguished_name = rcgen::DistinguishedName::new();
        params.distinguished_name.push(
            rcgen::DnType::CommonName,
            rcgen::DnValue::Utf8String(domain.to_string()),
        );
        params.is_ca = IsCa::NoCa;
        params.extended_key_usages = vec![rcgen::ExtendedKeyUsagePurpose::ServerAuth];
        let cert = params
            .signed_by(&key, &self.cert, &self.key)
            .expect("sign domain cert");
        (cert, key)
    }
}

/// Write the CAs as one PEM bundle, creating parent dirs.
pub fn write_bundle(path: &Path, cas: &[&TestCa]) {
    if let Some(p) = path.parent() {
        std::fs::create_dir_all(p).unwrap();
    }
    let bundle: String = cas.iter().map(|ca| ca.pem()).collect();
    std::fs::write(path, bundle).unwrap();
}

/// trustroots binary isolated from the caller's TRUSTROOTS_* environment.
pub fn trustroots_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::cargo_bin("trustroots").unwrap();
    cmd.env("TRUSTROOTS_HOME", home)
        .env_remove("TRUSTROOTS_TRUST_STORE")
        .env_remove("TRUSTROOTS_TRUST_STORE_PASSWORD")
        .env_remove("TRUSTROOTS_TRUST_STORE_TYPE");
    cmd
}
