//! Peer-certificate validators bound to a loaded trust store.

use rustls::client::danger::{ServerCertVerified, ServerCertVerifier};
use rustls::client::WebPkiServerVerifier;
use rustls::crypto::CryptoProvider;
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::server::danger::ClientCertVerifier;
use rustls::server::{VerifierBuilderError, WebPkiClientVerifier};
use rustls::RootCertStore;
use std::sync::Arc;
use tracing::debug;

use crate::error::VerifyError;
use crate::store::TrustStore;

/// Checks presented certificate chains against one trust store.
///
/// Holds the store by reference count; no entries are copied until a
/// rustls verifier is built from it.
#[derive(Debug, Clone)]
pub struct TrustValidator {
    store: Arc<TrustStore>,
}

impl TrustValidator {
    pub fn new(store: Arc<TrustStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<TrustStore> {
        &self.store
    }

    /// Trust anchors for rustls, one per parsable entry.
    pub fn root_store(&self) -> RootCertStore {
        let mut roots = RootCertStore::empty();
        let (added, ignored) =
            roots.add_parsable_certificates(self.store.entries().map(|e| e.der().clone()));
        debug!(added, ignored, "built root store");
        roots
    }

    fn provider() -> Arc<CryptoProvider> {
        rustls::ClientConfig::builder().crypto_provider().clone()
    }

    /// Verifier for server certificates presented to a TLS client.
    ///
    /// Fails when the store has no usable anchors.
    pub fn server_verifier(&self) -> Result<Arc<WebPkiServerVerifier>, VerifierBuilderError> {
        WebPkiServerVerifier::builder_with_provider(Arc::new(self.root_store()), Self::provider())
            .build()
    }

    /// Verifier for client certificates presented to a TLS server.
    pub fn client_verifier(&self) -> Result<Arc<dyn ClientCertVerifier>, VerifierBuilderError> {
        WebPkiClientVerifier::builder_with_provider(Arc::new(self.root_store()), Self::provider())
            .build()
    }

    /// Verify `chain` (leaf first) as a server certificate for `server_name`.
    pub fn verify_server_chain(
        &self,
        chain: &[CertificateDer<'_>],
        server_name: &str,
    ) -> Result<ServerCertVerified, VerifyError> {
        let (end_entity, intermediates) = chain.split_first().ok_or(VerifyError::EmptyChain)?;
        let server_name = ServerName::try_from(server_name.to_string())?;
        let verifier = self.server_verifier()?;
        let verified = verifier.verify_server_cert(
            end_entity,
            intermediates,
            &server_name,
            &[],
            UnixTime::now(),
        )?;
        Ok(verified)
    }
}
