//! NONE or empty location yields an empty store, never an error.

mod common;

use std::path::{Path, PathBuf};
use trustroots::{Settings, StoreType, TrustConfig, TrustManagerFactory};

fn settings_with_location(location: &str) -> Settings {
    Settings::new(TrustConfig {
        trust_store: Some(PathBuf::from(location)),
        trust_store_password: Some("changeit".to_string()),
        ..TrustConfig::default()
    })
}

#[test]
fn none_in_any_case_gives_empty_store() {
    for location in ["NONE", "none", "NoNe", ""] {
        let mut factory = TrustManagerFactory::new(settings_with_location(location));
        factory
            .init(None)
            .unwrap_or_else(|e| panic!("location {location:?}: {e}"));
        let validators = factory.validators().unwrap();
        assert_eq!(validators.len(), 1);
        assert!(validators[0].store().is_empty(), "location {location:?}");
    }
}

#[test]
fn none_location_is_not_replaced_by_default() {
    let settings = settings_with_location("none");
    let mut factory = TrustManagerFactory::new(settings.clone());
    factory.init(None).unwrap();
    assert_eq!(settings.trust_store().as_deref(), Some(Path::new("none")));
}

#[test]
fn empty_store_uses_configured_type() {
    let settings = Settings::new(TrustConfig {
        trust_store: Some(PathBuf::from("NONE")),
        trust_store_type: Some("der".to_string()),
        ..TrustConfig::default()
    });
    let mut factory = TrustManagerFactory::new(settings);
    factory.init(None).unwrap();
    assert_eq!(factory.store().unwrap().store_type(), StoreType::Der);
}

#[test]
fn empty_store_cannot_build_verifiers() {
    let mut factory = TrustManagerFactory::new(settings_with_location("NONE"));
    factory.init(None).unwrap();
    let validator = &factory.validators().unwrap()[0];
    assert!(validator.root_store().is_empty());
    assert!(validator.server_verifier().is_err());
    assert!(validator.client_verifier().is_err());
}
