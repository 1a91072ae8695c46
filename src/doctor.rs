//! Doctor command: health checks for the resolved trust store.

use crate::resolver::{StoreResolver, TrustSource};

/// Result of a single check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub ok: bool,
    pub message: String,
}

impl CheckResult {
    fn pass(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    fn fail(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

/// Run all doctor checks. Entries expiring within `days` are reported.
pub fn run_checks(resolver: &StoreResolver, days: u32) -> Vec<CheckResult> {
    let mut results = Vec::new();

    // 1. Which source initialization would use
    let source = resolver.select_source();
    match &source {
        TrustSource::Configured { location, .. } => {
            results.push(CheckResult::pass(format!(
                "Trust store configured: {}",
                location.display()
            )));
        }
        TrustSource::PlatformDefault { location, .. } => {
            results.push(CheckResult::pass(format!(
                "No trust store configured; using platform default {}",
                location.display()
            )));
        }
        TrustSource::Empty => {
            results.push(CheckResult::fail(
                "Trust store location is NONE; no certificates are trusted.",
            ));
            return results;
        }
        TrustSource::Explicit(_) => {}
    }

    // 2. Backing file present
    if let Some(location) = source.location() {
        if !location.is_file() {
            results.push(CheckResult::fail(format!(
                "Trust store file missing: {}. Set TRUSTROOTS_TRUST_STORE or create it.",
                location.display()
            )));
            return results;
        }
    }

    // 3. Store loads
    let store = match resolver.open(source) {
        Ok(store) => store,
        Err(e) => {
            results.push(CheckResult::fail(format!("{:#}", anyhow::Error::new(e))));
            return results;
        }
    };
    if store.is_empty() {
        results.push(CheckResult::fail("Trust store has no certificates."));
        return results;
    }
    results.push(CheckResult::pass(format!(
        "Loaded {} certificate(s) ({} store)",
        store.len(),
        store.store_type()
    )));

    // 4. Expiry
    let mut expiring = 0;
    for entry in store.entries() {
        let alias = entry.alias();
        if entry.expires_within_days(0) {
            expiring += 1;
            results.push(CheckResult::fail(format!(
                "[{alias}] expired on {}",
                entry.not_after().date()
            )));
        } else if entry.expires_within_days(days) {
            expiring += 1;
            results.push(CheckResult::fail(format!(
                "[{alias}] expires on {} (within {days} days)",
                entry.not_after().date()
            )));
        }
    }
    if expiring == 0 {
        results.push(CheckResult::pass(format!(
            "No certificates expire within {days} days"
        )));
    }

    results
}
