//! Validation requests: the challenge/response record kept per address.
//!
//! ```text
//! Pending ──verify ok──▶ Valid ──star accepted──▶ (deleted)
//!    │  ▲                  │
//!    │  └──verify fail── Invalid
//!    └──window elapsed──▶ Expired (terminal, re-request)
//! ```
//!
//! All transitions are pure; the registry decides when to persist them.

use serde::{Deserialize, Serialize};

/// Validation window: five minutes.
pub const DEFAULT_VALIDATION_WINDOW_MS: i64 = 5 * 60 * 1000;

/// State of a validation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    /// Created, no signature checked yet.
    Pending,
    /// Signature proven inside the window.
    Valid,
    /// Last signature failed; retry allowed while the window is open.
    Invalid,
    /// Window elapsed. The requester must ask for a new challenge.
    Expired,
}

/// A challenge issued to an address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRequest {
    pub address: String,
    /// `"{address}:{requestTimeStamp}:starRegistry"`, the text to sign.
    pub message: String,
    /// Unix milliseconds.
    pub request_time_stamp: i64,
    /// Seconds left in the window as of the last read.
    pub validation_window: i64,
    pub status: ValidationStatus,
}

impl ValidationRequest {
    /// Issue a fresh pending challenge.
    pub fn new(address: &str, now_ms: i64, window_ms: i64) -> Self {
        Self {
            address: address.to_string(),
            message: Self::challenge_message(address, now_ms),
            request_time_stamp: now_ms,
            validation_window: window_ms / 1000,
            status: ValidationStatus::Pending,
        }
    }

    /// The message a wallet must sign to prove ownership of `address`.
    pub fn challenge_message(address: &str, request_time_stamp: i64) -> String {
        format!("{}:{}:starRegistry", address, request_time_stamp)
    }

    /// Strictly more than `window_ms` has elapsed.
    pub fn is_expired(&self, now_ms: i64, window_ms: i64) -> bool {
        now_ms - self.request_time_stamp > window_ms
    }

    /// Whole seconds left in the window (floor), never negative.
    pub fn remaining_secs(&self, now_ms: i64, window_ms: i64) -> i64 {
        (self.request_time_stamp + window_ms - now_ms)
            .div_euclid(1000)
            .max(0)
    }

    /// Recompute `validation_window` against `now_ms`.
    pub fn refresh_window(&mut self, now_ms: i64, window_ms: i64) {
        self.validation_window = self.remaining_secs(now_ms, window_ms);
    }

    /// Move to the terminal expired state.
    pub fn expire(&mut self) {
        self.status = ValidationStatus::Expired;
        self.validation_window = 0;
    }

    /// Apply the verifier's verdict.
    pub fn record_verification(&mut self, verified: bool) {
        self.status = if verified {
            ValidationStatus::Valid
        } else {
            ValidationStatus::Invalid
        };
    }

    pub fn is_valid(&self) -> bool {
        self.status == ValidationStatus::Valid
    }
}

/// Result of submitting a signature for an address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationOutcome {
    /// Whether the address may now submit a star.
    pub register_star: bool,
    /// The request after the transition.
    pub status: ValidationRequest,
}

#[cfg(test)]
mod tests {
    use super::*;

    const T0: i64 = 1_700_000_000_000;
    const W: i64 = DEFAULT_VALIDATION_WINDOW_MS;

    #[test]
    fn test_new_request() {
        let req = ValidationRequest::new("addr", T0, W);
        assert_eq!(req.message, "addr:1700000000000:starRegistry");
        assert_eq!(req.status, ValidationStatus::Pending);
        assert_eq!(req.validation_window, 300);
    }

    #[test]
    fn test_expiry_boundary() {
        let req = ValidationRequest::new("addr", T0, W);
        assert!(!req.is_expired(T0, W));
        assert!(!req.is_expired(T0 + W, W));
        assert!(req.is_expired(T0 + W + 1, W));
    }

    #[test]
    fn test_remaining_secs_floors() {
        let req = ValidationRequest::new("addr", T0, W);
        assert_eq!(req.remaining_secs(T0, W), 300);
        assert_eq!(req.remaining_secs(T0 + 1, W), 299);
        assert_eq!(req.remaining_secs(T0 + 1000, W), 299);
        assert_eq!(req.remaining_secs(T0 + 1001, W), 298);
        assert_eq!(req.remaining_secs(T0 + W, W), 0);
        assert_eq!(req.remaining_secs(T0 + W + 5000, W), 0);
    }

    #[test]
    fn test_transitions() {
        let mut req = ValidationRequest::new("addr", T0, W);
        req.record_verification(false);
        assert_eq!(req.status, ValidationStatus::Invalid);
        req.record_verification(true);
        assert!(req.is_valid());
        req.expire();
        assert_eq!(req.status, ValidationStatus::Expired);
        assert_eq!(req.validation_window, 0);
    }

    #[test]
    fn test_json_field_names() {
        let outcome = ValidationOutcome {
            register_star: true,
            status: ValidationRequest::new("addr", T0, W),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["registerStar"], true);
        assert_eq!(json["status"]["requestTimeStamp"], T0);
        assert_eq!(json["status"]["validationWindow"], 300);
        assert_eq!(json["status"]["status"], "pending");
    }
}
