//! Cryptographic primitives: SHA-256 block digests and challenge signatures.
//!
//! Addresses are hex-encoded Ed25519 public keys; a challenge signature is the
//! hex-encoded Ed25519 signature over the UTF-8 bytes of the challenge message.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use sha2::{Digest, Sha256};
use std::fmt;

/// A 32-byte SHA-256 hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sha256Hash(pub [u8; 32]);

impl Sha256Hash {
    /// Compute the SHA-256 hash of data.
    pub fn hash(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        Self(hasher.finalize().into())
    }

    /// Convert to lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| hex::FromHexError::InvalidStringLength)?;
        Ok(Self(arr))
    }
}

impl fmt::Debug for Sha256Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SHA256({}...)", &self.to_hex()[..8])
    }
}

impl fmt::Display for Sha256Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Verifies that `signature` over `message` was produced by `address`.
///
/// Implementations must be pure and bounded: no I/O, no blocking. Any
/// malformed input is a failed verification, never an error.
pub trait SignatureVerifier: Send + Sync {
    fn verify(&self, message: &str, address: &str, signature: &str) -> bool;
}

/// Ed25519 verifier: address = hex public key, signature = hex signature.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Verifier;

impl SignatureVerifier for Ed25519Verifier {
    fn verify(&self, message: &str, address: &str, signature: &str) -> bool {
        let Ok(key_bytes) = hex::decode(address) else {
            return false;
        };
        let Ok(key_bytes) = <[u8; 32]>::try_from(key_bytes.as_slice()) else {
            return false;
        };
        let Ok(verifying_key) = VerifyingKey::from_bytes(&key_bytes) else {
            return false;
        };
        let Ok(sig_bytes) = hex::decode(signature) else {
            return false;
        };
        let Ok(sig_bytes) = <[u8; 64]>::try_from(sig_bytes.as_slice()) else {
            return false;
        };

        verifying_key
            .verify(message.as_bytes(), &Signature::from_bytes(&sig_bytes))
            .is_ok()
    }
}

/// A wallet keypair that can answer validation challenges.
///
/// This wraps ed25519-dalek's SigningKey. The ledger never holds one; it
/// exists for clients and tests.
#[derive(Clone)]
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Generate a new random keypair.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        Self {
            signing_key: SigningKey::generate(&mut rng),
        }
    }

    /// Create from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// The wallet address (hex public key).
    pub fn address(&self) -> String {
        hex::encode(self.signing_key.verifying_key().to_bytes())
    }

    /// Sign a challenge message, returning the hex signature.
    pub fn sign_message(&self, message: &str) -> String {
        hex::encode(self.signing_key.sign(message.as_bytes()).to_bytes())
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Keypair({}...)", &self.address()[..16])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_vector() {
        let h = Sha256Hash::hash(b"abc");
        assert_eq!(
            h.to_hex(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_sha256_hex_roundtrip() {
        let h = Sha256Hash::hash(b"star");
        assert_eq!(Sha256Hash::from_hex(&h.to_hex()).unwrap(), h);
        assert!(Sha256Hash::from_hex("abcd").is_err());
    }

    #[test]
    fn test_keypair_sign_verify() {
        let keypair = Keypair::generate();
        let message = "addr:1700000000000:starRegistry";
        let signature = keypair.sign_message(message);

        assert!(Ed25519Verifier.verify(message, &keypair.address(), &signature));

        // Tampered message should fail
        assert!(!Ed25519Verifier.verify("addr:1700000000001:starRegistry", &keypair.address(), &signature));
    }

    #[test]
    fn test_wrong_address_fails() {
        let signer = Keypair::from_seed(&[0x01; 32]);
        let other = Keypair::from_seed(&[0x02; 32]);
        let signature = signer.sign_message("hello");

        assert!(!Ed25519Verifier.verify("hello", &other.address(), &signature));
    }

    #[test]
    fn test_malformed_inputs_are_rejected() {
        let keypair = Keypair::from_seed(&[0x42; 32]);
        let signature = keypair.sign_message("hello");

        assert!(!Ed25519Verifier.verify("hello", "not-hex", &signature));
        assert!(!Ed25519Verifier.verify("hello", "abcd", &signature));
        assert!(!Ed25519Verifier.verify("hello", &keypair.address(), "zz"));
        assert!(!Ed25519Verifier.verify("hello", &keypair.address(), &signature[..64]));
    }

    #[test]
    fn test_keypair_deterministic_from_seed() {
        let kp1 = Keypair::from_seed(&[0x42; 32]);
        let kp2 = Keypair::from_seed(&[0x42; 32]);
        assert_eq!(kp1.address(), kp2.address());
        assert_eq!(kp1.address().len(), 64);
    }
}
