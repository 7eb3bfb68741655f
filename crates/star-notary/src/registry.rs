//! The address validation registry.
//!
//! Tracks one [`ValidationRequest`] per address and drives it through the
//! challenge/response state machine. Every read-modify-write of a record
//! happens under that address's lock; different addresses never contend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, MutexGuard as StdMutexGuard};

use star_notary_core::{Clock, SignatureVerifier, ValidationOutcome, ValidationRequest};
use star_notary_store::ValidationStore;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::config::NotaryConfig;
use crate::error::{NotaryError, Result};

type LockTable = HashMap<String, Arc<Mutex<()>>>;

/// Per-address async locks. An entry exists only while some task holds or
/// waits on it.
#[derive(Default)]
pub(crate) struct AddressLocks {
    locks: StdMutex<LockTable>,
}

impl AddressLocks {
    fn table(&self) -> StdMutexGuard<'_, LockTable> {
        self.locks.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub(crate) async fn acquire(&self, address: &str) -> AddressGuard<'_> {
        let lock = Arc::clone(self.table().entry(address.to_string()).or_default());
        let mut guard = AddressGuard {
            locks: self,
            address: address.to_string(),
            lock,
            held: None,
        };
        guard.held = Some(Arc::clone(&guard.lock).lock_owned().await);
        guard
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.table().len()
    }
}

/// Holds one address's lock. Dropping it releases the lock and removes the
/// table entry once no other task references it.
pub(crate) struct AddressGuard<'a> {
    locks: &'a AddressLocks,
    address: String,
    lock: Arc<Mutex<()>>,
    held: Option<OwnedMutexGuard<()>>,
}

impl Drop for AddressGuard<'_> {
    fn drop(&mut self) {
        self.held.take();

        let mut table = self.locks.table();
        // Only the table and this guard still point at the lock.
        let unused = Arc::strong_count(&self.lock) == 2
            && table
                .get(&self.address)
                .is_some_and(|entry| Arc::ptr_eq(entry, &self.lock));
        if unused {
            table.remove(&self.address);
        }
    }
}

/// Challenge/response registry over a [`ValidationStore`].
pub struct ValidationRegistry<S: ValidationStore> {
    store: Arc<S>,
    verifier: Arc<dyn SignatureVerifier>,
    clock: Arc<dyn Clock>,
    window_ms: i64,
    locks: AddressLocks,
}

impl<S: ValidationStore> ValidationRegistry<S> {
    pub fn new(
        store: Arc<S>,
        verifier: Arc<dyn SignatureVerifier>,
        clock: Arc<dyn Clock>,
        config: &NotaryConfig,
    ) -> Self {
        Self {
            store,
            verifier,
            clock,
            window_ms: config.validation_window_ms(),
            locks: AddressLocks::default(),
        }
    }

    /// Issue a challenge for `address`, or return the live one.
    ///
    /// An unexpired record is returned with its window recomputed; its
    /// timestamp and message do not change. Otherwise a fresh pending record
    /// replaces whatever was there.
    pub async fn request_validation(&self, address: &str) -> Result<ValidationRequest> {
        let _guard = self.locks.acquire(address).await;
        let now = self.clock.now_millis();

        if let Some(mut request) = self.store.get_request(address).await? {
            if !request.is_expired(now, self.window_ms) {
                request.refresh_window(now, self.window_ms);
                tracing::debug!(
                    address,
                    window = request.validation_window,
                    "reusing validation request"
                );
                return Ok(request);
            }
        }

        let request = ValidationRequest::new(address, now, self.window_ms);
        self.store.put_request(&request).await?;
        tracing::info!(address, "validation requested");
        Ok(request)
    }

    /// Check `signature` against the stored challenge for `address`.
    ///
    /// Expiry is checked first: an expired record becomes terminal and the
    /// verifier is never called. A live record is re-verified even if it
    /// was already valid, so a later bad signature demotes it.
    pub async fn validate_message_signature(
        &self,
        address: &str,
        signature: &str,
    ) -> Result<ValidationOutcome> {
        let _guard = self.locks.acquire(address).await;
        let now = self.clock.now_millis();

        let mut request = self
            .store
            .get_request(address)
            .await?
            .ok_or_else(|| NotaryError::RequestNotFound(address.to_string()))?;

        if request.is_expired(now, self.window_ms) {
            request.expire();
            self.store.put_request(&request).await?;
            tracing::info!(address, "validation window expired");
            return Ok(ValidationOutcome {
                register_star: false,
                status: request,
            });
        }

        let verified = self.verifier.verify(&request.message, address, signature);
        request.record_verification(verified);
        request.refresh_window(now, self.window_ms);
        self.store.put_request(&request).await?;

        tracing::info!(address, verified, "signature checked");
        Ok(ValidationOutcome {
            register_star: verified,
            status: request,
        })
    }

    /// The record for `address`, if it is currently valid.
    pub async fn assert_valid(&self, address: &str) -> Result<ValidationRequest> {
        match self.store.get_request(address).await? {
            Some(request) if request.is_valid() => Ok(request),
            Some(request) => Err(NotaryError::Unauthorized(format!(
                "address {} has status {:?}",
                address, request.status
            ))),
            None => Err(NotaryError::Unauthorized(format!(
                "address {} has no validation request",
                address
            ))),
        }
    }

    /// Drop the record for `address`. Idempotent.
    pub async fn invalidate(&self, address: &str) -> Result<()> {
        let _guard = self.locks.acquire(address).await;
        self.invalidate_locked(address).await
    }

    /// Drop the record for `address`. Caller holds the address lock.
    pub(crate) async fn invalidate_locked(&self, address: &str) -> Result<()> {
        if self.store.delete_request(address).await? {
            tracing::debug!(address, "validation consumed");
        }
        Ok(())
    }

    pub(crate) async fn lock_address(&self, address: &str) -> AddressGuard<'_> {
        self.locks.acquire(address).await
    }

    /// Number of addresses with a live lock entry.
    #[cfg(test)]
    pub(crate) fn lock_count(&self) -> usize {
        self.locks.len()
    }
}
