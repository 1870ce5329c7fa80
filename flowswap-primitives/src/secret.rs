use rand::RngCore;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::hashing::sha256;

/// An opaque 32-byte secret, sampled from a CSPRNG.
///
/// Zeroized on drop: once a secret has been published on any public
/// ledger the in-memory copy serves no further purpose, and nothing in
/// this codebase should rely on it surviving past that point.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Secret(pub(crate) [u8; 32]);

impl Secret {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes)?;
        Ok(Self(bytes))
    }

    pub fn hashlock(&self) -> Hashlock {
        Hashlock(sha256(&self.0))
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Secret(<redacted>)")
    }
}

/// `SHA256(Secret)`. Public; identifies a secret in scripts and contract
/// calls without revealing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hashlock(pub [u8; 32]);

impl Hashlock {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes)?;
        Ok(Self(bytes))
    }
}

/// Sample a new secret from a CSPRNG and return it alongside its hashlock.
pub fn gen_secret() -> (Secret, Hashlock) {
    let mut bytes = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    let secret = Secret(bytes);
    let hashlock = secret.hashlock();
    (secret, hashlock)
}

/// `SHA256(secret) == hashlock`.
pub fn verify(secret: &Secret, hashlock: &Hashlock) -> bool {
    sha256(&secret.0) == hashlock.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_generate_and_verify() {
        let (secret, hashlock) = gen_secret();
        assert!(verify(&secret, &hashlock));
    }

    #[test]
    fn wrong_secret_does_not_verify() {
        let (_secret, hashlock) = gen_secret();
        let (other, _) = gen_secret();
        assert!(!verify(&other, &hashlock));
    }

    #[test]
    fn hex_round_trip() {
        let (secret, hashlock) = gen_secret();
        let secret2 = Secret::from_hex(&secret.to_hex()).unwrap();
        let hashlock2 = Hashlock::from_hex(&hashlock.to_hex()).unwrap();
        assert_eq!(secret.0, secret2.0);
        assert_eq!(hashlock, hashlock2);
    }
}
