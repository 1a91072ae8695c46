//! A caller-supplied store is adopted as-is; last init wins.

mod common;

use std::sync::Arc;
use trustroots::{Settings, StoreType, TrustConfig, TrustManagerFactory, TrustStore};

#[test]
fn explicit_store_adopted_without_touching_settings() {
    let dir = common::temp_home();
    let settings = common::settings_for(dir.path());
    let ca = common::create_ca("explicit");
    let store = Arc::new(TrustStore::from_certificates(StoreType::Pem, [ca.der()]).unwrap());

    let mut factory = TrustManagerFactory::new(settings.clone());
    factory.init(Some(Arc::clone(&store))).unwrap();

    // No default seeding happened and nothing was read from disk.
    assert_eq!(settings.trust_store(), None);
    assert!(!common::default_store_path(dir.path()).exists());

    let validators = factory.validators().unwrap();
    assert_eq!(validators.len(), 1);
    assert!(Arc::ptr_eq(validators[0].store(), &store));
}

#[test]
fn explicit_store_bypasses_broken_configuration() {
    let dir = common::temp_home();
    let settings = Settings::new(TrustConfig {
        trust_store: Some(dir.path().join("missing.pem")),
        trust_store_type: Some("bogus".to_string()),
        ..TrustConfig::default()
    });
    let store = Arc::new(StoreType::Pem.load_empty());

    let mut factory = TrustManagerFactory::new(settings);
    factory.init(Some(Arc::clone(&store))).unwrap();
    assert!(Arc::ptr_eq(factory.store().unwrap(), &store));
}

#[test]
fn second_explicit_init_replaces_first() {
    let first_ca = common::create_ca("first");
    let second_ca = common::create_ca("second");
    let first = Arc::new(TrustStore::from_certificates(StoreType::Pem, [first_ca.der()]).unwrap());
    let second =
        Arc::new(TrustStore::from_certificates(StoreType::Pem, [second_ca.der()]).unwrap());

    let mut factory = TrustManagerFactory::new(Settings::default());
    factory.init(Some(Arc::clone(&first))).unwrap();
    factory.init(Some(Arc::clone(&second))).unwrap();

    let validators = factory.validators().unwrap();
    assert_eq!(validators.len(), 1);
    assert!(Arc::ptr_eq(validators[0].store(), &second));
    assert!(validators[0].store().contains_alias("test ca (second)"));
    assert!(!validators[0].store().contains_alias("test ca (first)"));
}
