//! Test fixtures and helpers.
//!
//! Common setup code for unit and integration tests.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use star_notary_core::{Clock, Keypair, StarSubmission, ValidationRequest};

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now_ms: AtomicI64,
}

impl ManualClock {
    pub fn new(now_ms: i64) -> Self {
        Self {
            now_ms: AtomicI64::new(now_ms),
        }
    }

    pub fn set(&self, now_ms: i64) {
        self.now_ms.store(now_ms, Ordering::SeqCst);
    }

    pub fn advance(&self, delta_ms: i64) {
        self.now_ms.fetch_add(delta_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}

/// A test fixture with a wallet keypair and a manual clock.
pub struct TestFixture {
    pub keypair: Keypair,
    clock: Arc<ManualClock>,
}

impl TestFixture {
    /// Clock start for every fixture, 2023-11-14T22:13:20Z.
    pub const START_MS: i64 = 1_700_000_000_000;

    /// Create a new test fixture with a random keypair.
    pub fn new() -> Self {
        Self {
            keypair: Keypair::generate(),
            clock: Arc::new(ManualClock::new(Self::START_MS)),
        }
    }

    /// Create with a deterministic keypair from seed.
    pub fn with_seed(seed: [u8; 32]) -> Self {
        Self {
            keypair: Keypair::from_seed(&seed),
            clock: Arc::new(ManualClock::new(Self::START_MS)),
        }
    }

    /// The wallet address.
    pub fn address(&self) -> String {
        self.keypair.address()
    }

    pub fn clock(&self) -> Arc<ManualClock> {
        Arc::clone(&self.clock)
    }

    /// Sign the challenge of `request` with the fixture's wallet.
    pub fn sign(&self, request: &ValidationRequest) -> String {
        self.keypair.sign_message(&request.message)
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Create multiple test fixtures for multi-party tests.
pub fn multi_party_fixtures(count: usize) -> Vec<TestFixture> {
    (0..count)
        .map(|i| {
            let mut seed = [0u8; 32];
            seed[0] = i as u8;
            TestFixture::with_seed(seed)
        })
        .collect()
}

/// Antares, as used in the service's walkthrough.
pub fn sample_star() -> StarSubmission {
    StarSubmission::new(
        "16h 29m 1.0s",
        "-26° 29' 24.9",
        "2.9",
        "Sco",
        "Found star using https://www.google.com/sky/",
    )
    .expect("sample star is valid")
}

#[cfg(test)]
mod tests {
    use super::*;
    use star_notary_core::{Ed25519Verifier, SignatureVerifier};

    #[test]
    fn test_manual_clock() {
        let clock = ManualClock::new(1_000);
        clock.advance(1_500);
        assert_eq!(clock.now_millis(), 2_500);
        assert_eq!(clock.now_secs(), 2);
        clock.set(0);
        assert_eq!(clock.now_millis(), 0);
    }

    #[test]
    fn test_fixture_signature_verifies() {
        let fixture = TestFixture::new();
        let request = ValidationRequest::new(&fixture.address(), TestFixture::START_MS, 300_000);
        let signature = fixture.sign(&request);
        assert!(Ed25519Verifier.verify(&request.message, &fixture.address(), &signature));
    }

    #[test]
    fn test_multi_party() {
        let parties = multi_party_fixtures(3);

        let addresses: Vec<_> = parties.iter().map(|p| p.address()).collect();
        assert_ne!(addresses[0], addresses[1]);
        assert_ne!(addresses[1], addresses[2]);
        assert_ne!(addresses[0], addresses[2]);
    }

    #[test]
    fn test_sample_star_body() {
        let body = sample_star().into_body("addr");
        assert_eq!(body.address(), Some("addr"));
    }
}
