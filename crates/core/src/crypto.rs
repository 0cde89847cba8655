//! Ed25519 cryptographic primitives for signing and verification.
//!
//! A keypair's address is the hex encoding of its verifying key, so any
//! transfer can be checked against its sender address alone.

use crate::hash::Hash;
use ed25519_dalek::{Signature as DalekSignature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Length of an ed25519 signature in bytes.
pub const SIGNATURE_LEN: usize = 64;

/// An address on the ledger.
///
/// Addresses are opaque strings compared for equality. Those derived from
/// a keypair are the lowercase hex of the public key; anything else (e.g.
/// `"B"`) is still a valid recipient but can never sign.
#[derive(Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Wrap an identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the address is unset.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Interpret this address as an ed25519 public key.
    pub fn to_public_key(&self) -> Result<PublicKey, CryptoError> {
        PublicKey::from_hex(&self.0)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.0)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for Address {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A cryptographic signature.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature(pub [u8; SIGNATURE_LEN]);

impl Serialize for Signature {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Signature::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

impl Signature {
    /// Create a signature from raw bytes.
    pub fn from_bytes(bytes: [u8; SIGNATURE_LEN]) -> Self {
        Self(bytes)
    }

    /// Get the underlying bytes.
    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LEN] {
        &self.0
    }

    /// Convert to a hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from a hex string.
    pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
        let bytes = hex::decode(s).map_err(|_| CryptoError::InvalidSignature)?;
        let arr: [u8; SIGNATURE_LEN] = bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidSignature)?;
        Ok(Self(arr))
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({}...)", &self.to_hex()[..16])
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Errors that can occur during cryptographic operations.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("invalid signature encoding")]
    InvalidSignature,
    #[error("invalid public key")]
    InvalidPublicKey,
    #[error("invalid private key")]
    InvalidPrivateKey,
    #[error("signature verification failed")]
    VerificationFailed,
}

/// A public key for signature verification.
#[derive(Clone)]
pub struct PublicKey(pub VerifyingKey);

impl PublicKey {
    /// Parse a hex-encoded 32-byte verifying key.
    pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
        let bytes = hex::decode(s).map_err(|_| CryptoError::InvalidPublicKey)?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidPublicKey)?;
        VerifyingKey::from_bytes(&arr)
            .map(PublicKey)
            .map_err(|_| CryptoError::InvalidPublicKey)
    }

    /// The address for this key.
    pub fn to_address(&self) -> Address {
        Address(hex::encode(self.0.as_bytes()))
    }

    /// Get the raw bytes of the public key.
    pub fn as_bytes(&self) -> [u8; 32] {
        self.0.to_bytes()
    }

    /// Verify a signature against this public key.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> Result<(), CryptoError> {
        let sig = DalekSignature::from_bytes(&signature.0);
        self.0
            .verify(message, &sig)
            .map_err(|_| CryptoError::VerificationFailed)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", hex::encode(&self.0.as_bytes()[..8]))
    }
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_bytes() == other.0.as_bytes()
    }
}

impl Eq for PublicKey {}

/// A keypair for signing and verification.
pub struct Keypair {
    signing_key: SigningKey,
    pub public_key: PublicKey,
}

impl Keypair {
    /// Generate a new random keypair.
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut OsRng);
        Self::from_signing_key(signing_key)
    }

    /// Create a keypair from a private key (32 bytes).
    pub fn from_private_key(bytes: &[u8; 32]) -> Self {
        Self::from_signing_key(SigningKey::from_bytes(bytes))
    }

    /// Create a keypair from a hex-encoded private key.
    pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
        let bytes = hex::decode(s.trim()).map_err(|_| CryptoError::InvalidPrivateKey)?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidPrivateKey)?;
        Ok(Self::from_private_key(&arr))
    }

    fn from_signing_key(signing_key: SigningKey) -> Self {
        let verifying_key = signing_key.verifying_key();
        Self {
            signing_key,
            public_key: PublicKey(verifying_key),
        }
    }

    /// Get the private key bytes.
    pub fn private_key(&self) -> [u8; 32] {
        self.signing_key.to_bytes()
    }

    /// The public half of the keypair.
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Get the address derived from the public key.
    pub fn address(&self) -> Address {
        self.public_key.to_address()
    }

    /// Sign a message.
    pub fn sign(&self, message: &[u8]) -> Signature {
        let sig = self.signing_key.sign(message);
        Signature(sig.to_bytes())
    }

    /// Sign a hash directly.
    pub fn sign_hash(&self, hash: &Hash) -> Signature {
        self.sign(hash.as_bytes())
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("address", &self.address())
            .finish()
    }
}

/// Check that `signature` was produced over `digest` by the key behind
/// `address`. Addresses that are not public keys never verify.
pub fn verify(address: &Address, digest: &Hash, signature: &Signature) -> bool {
    match address.to_public_key() {
        Ok(key) => key.verify(digest.as_bytes(), signature).is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::hash;

    // Fixed key used by the demo wallet.
    const DEMO_KEY: &str = "31fc91751bc83f6b921f343bb4f5271abfd728fc84d1286f22548d2a7e902f08";

    #[test]
    fn test_keypair_generation() {
        let kp = Keypair::generate();
        let addr = kp.address();
        assert_eq!(addr.as_str().len(), 64);
        assert!(addr.to_public_key().is_ok());
    }

    #[test]
    fn test_sign_and_verify() {
        let kp = Keypair::generate();
        let digest = hash(b"hello world");
        let sig = kp.sign_hash(&digest);
        assert!(verify(&kp.address(), &digest, &sig));
    }

    #[test]
    fn test_wrong_message_fails() {
        let kp = Keypair::generate();
        let sig = kp.sign_hash(&hash(b"hello"));
        assert!(!verify(&kp.address(), &hash(b"world"), &sig));
    }

    #[test]
    fn test_wrong_key_fails() {
        let kp1 = Keypair::generate();
        let kp2 = Keypair::generate();
        let digest = hash(b"hello");
        let sig = kp1.sign_hash(&digest);
        assert!(!verify(&kp2.address(), &digest, &sig));
        assert!(kp2.public_key().verify(digest.as_bytes(), &sig).is_err());
    }

    #[test]
    fn test_non_key_address_never_verifies() {
        let kp = Keypair::generate();
        let digest = hash(b"hello");
        let sig = kp.sign_hash(&digest);
        let addr = Address::from("B");
        assert!(matches!(
            addr.to_public_key(),
            Err(CryptoError::InvalidPublicKey)
        ));
        assert!(!verify(&addr, &digest, &sig));
    }

    #[test]
    fn test_keypair_from_hex() {
        let kp1 = Keypair::from_hex(DEMO_KEY).unwrap();
        let kp2 = Keypair::from_hex(DEMO_KEY).unwrap();
        assert_eq!(kp1.address(), kp2.address());
        assert_eq!(hex::encode(kp1.private_key()), DEMO_KEY);
    }

    #[test]
    fn test_keypair_from_bad_hex() {
        assert!(matches!(
            Keypair::from_hex("zz"),
            Err(CryptoError::InvalidPrivateKey)
        ));
        assert!(matches!(
            Keypair::from_hex("abcd"),
            Err(CryptoError::InvalidPrivateKey)
        ));
    }

    #[test]
    fn test_signature_serde_as_hex() {
        let kp = Keypair::generate();
        let sig = kp.sign(b"payload");
        let json = serde_json::to_string(&sig).unwrap();
        assert_eq!(json, format!("\"{}\"", sig.to_hex()));
        let parsed: Signature = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, sig);
    }

    #[test]
    fn test_address_serde_transparent() {
        let addr = Address::from("B");
        assert_eq!(serde_json::to_string(&addr).unwrap(), "\"B\"");
    }
}
