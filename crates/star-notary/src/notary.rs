//! The Notary: star submission on top of the ledger and the registry.

use std::sync::Arc;

use star_notary_core::{
    Block, Clock, Ed25519Verifier, SignatureVerifier, StarSubmission, SystemClock,
};
use star_notary_store::{BlockStore, ValidationStore};

use crate::blockchain::Blockchain;
use crate::config::NotaryConfig;
use crate::error::Result;
use crate::registry::ValidationRegistry;

/// The main Notary struct.
///
/// Owns one store shared by the ledger and the validation registry.
pub struct Notary<S: BlockStore + ValidationStore> {
    chain: Blockchain<S>,
    registry: ValidationRegistry<S>,
    config: NotaryConfig,
}

impl<S: BlockStore + ValidationStore> Notary<S> {
    /// Open with Ed25519 signatures and the system clock.
    pub async fn open(store: S, config: NotaryConfig) -> Result<Self> {
        Self::open_with(store, config, Arc::new(Ed25519Verifier), Arc::new(SystemClock)).await
    }

    /// Open with an explicit verifier and clock.
    pub async fn open_with(
        store: S,
        config: NotaryConfig,
        verifier: Arc<dyn SignatureVerifier>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let store = Arc::new(store);
        let chain = Blockchain::open(Arc::clone(&store), Arc::clone(&clock)).await?;
        let registry = ValidationRegistry::new(store, verifier, clock, &config);

        Ok(Self {
            chain,
            registry,
            config,
        })
    }

    pub fn blockchain(&self) -> &Blockchain<S> {
        &self.chain
    }

    pub fn registry(&self) -> &ValidationRegistry<S> {
        &self.registry
    }

    /// Get the underlying store.
    pub fn store(&self) -> &S {
        self.chain.store()
    }

    pub fn config(&self) -> &NotaryConfig {
        &self.config
    }

    /// Notarize `star` for `address`.
    ///
    /// The address must hold a valid signature. Its validation is consumed
    /// once the block is written; a second submission needs a new challenge.
    /// The address lock is held throughout, so two concurrent submissions
    /// for one address cannot both pass the check.
    pub async fn submit_star(&self, address: &str, star: StarSubmission) -> Result<Block> {
        let _guard = self.registry.lock_address(address).await;

        self.registry.assert_valid(address).await?;
        let block = self.chain.add_block(star.into_body(address)).await?;
        self.registry.invalidate_locked(address).await?;

        tracing::info!(address, height = block.height, "star notarized");
        Ok(block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use star_notary_core::{BlockBody, ValidationStatus};
    use star_notary_store::MemoryStore;
    use star_notary_testkit::{sample_star, TestFixture};

    use crate::error::NotaryError;

    async fn open_notary(fixture: &TestFixture) -> Notary<MemoryStore> {
        Notary::open_with(
            MemoryStore::new(),
            NotaryConfig::default(),
            Arc::new(Ed25519Verifier),
            fixture.clock(),
        )
        .await
        .unwrap()
    }

    async fn validate(notary: &Notary<MemoryStore>, fixture: &TestFixture) {
        let address = fixture.address();
        let request = notary.registry().request_validation(&address).await.unwrap();
        let outcome = notary
            .registry()
            .validate_message_signature(&address, &fixture.sign(&request))
            .await
            .unwrap();
        assert!(outcome.register_star);
    }

    #[tokio::test]
    async fn test_submit_requires_validation() {
        let fixture = TestFixture::new();
        let notary = open_notary(&fixture).await;

        let err = notary
            .submit_star(&fixture.address(), sample_star())
            .await
            .unwrap_err();
        assert!(matches!(err, NotaryError::Unauthorized(_)));
        assert_eq!(notary.blockchain().height().await.unwrap(), Some(0));
    }

    #[tokio::test]
    async fn test_submit_consumes_validation() {
        let fixture = TestFixture::new();
        let notary = open_notary(&fixture).await;
        validate(&notary, &fixture).await;

        let block = notary
            .submit_star(&fixture.address(), sample_star())
            .await
            .unwrap();
        assert_eq!(block.height, 1);
        assert_eq!(block.body.address(), Some(fixture.address().as_str()));

        let err = notary
            .submit_star(&fixture.address(), sample_star())
            .await
            .unwrap_err();
        assert!(matches!(err, NotaryError::Unauthorized(_)));
        assert_eq!(notary.registry().lock_count(), 0);

        let fresh = notary
            .registry()
            .request_validation(&fixture.address())
            .await
            .unwrap();
        assert_eq!(fresh.status, ValidationStatus::Pending);
    }

    #[tokio::test]
    async fn test_story_is_hex_on_ledger() {
        let fixture = TestFixture::new();
        let notary = open_notary(&fixture).await;
        validate(&notary, &fixture).await;

        let star = StarSubmission::new("1", "2", "3", "Ori", "Hi").unwrap();
        let block = notary.submit_star(&fixture.address(), star).await.unwrap();
        match block.body {
            BlockBody::Star(record) => {
                assert_eq!(record.star.story_hex, "4869");
                assert_eq!(record.star.story_decoded, None);
            }
            BlockBody::Genesis(_) => panic!("expected star body"),
        }
    }

    #[tokio::test]
    async fn test_block_time_follows_clock() {
        let fixture = TestFixture::new();
        let notary = open_notary(&fixture).await;
        validate(&notary, &fixture).await;

        fixture.clock().advance(5_000);
        let block = notary
            .submit_star(&fixture.address(), sample_star())
            .await
            .unwrap();
        assert_eq!(block.time, (TestFixture::START_MS + 5_000) / 1000);
    }

    #[tokio::test]
    async fn test_open_with_defaults() {
        let notary = Notary::open(MemoryStore::new(), NotaryConfig::default())
            .await
            .unwrap();
        assert_eq!(notary.blockchain().height().await.unwrap(), Some(0));
        assert_eq!(notary.config().max_story_bytes, 500);
    }
}
