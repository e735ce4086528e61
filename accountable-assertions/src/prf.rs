//! Pseudorandom function deriving per-node tree material.

use std::fmt;

use hmac::{Hmac, Mac};
use sha2::{Digest as _, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::position::TreePosition;
use crate::{Digest, Rand, SecretKey};

/// PRF key length in bytes.
pub const KEY_LEN: usize = 32;

const PREFIX_X: u8 = b'X';
const PREFIX_R: u8 = b'R';

type HmacSha256 = Hmac<Sha256>;

/// Keyed HMAC-SHA-256 producing the deterministic message and randomness
/// material for every tree node, domain-separated by a one-byte prefix over
/// the node's canonical encoding.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Prf {
    key: [u8; KEY_LEN],
}

impl fmt::Debug for Prf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Prf(<keyed>)")
    }
}

impl Prf {
    /// Use `key` directly.
    #[must_use]
    pub fn from_key(key: [u8; KEY_LEN]) -> Self {
        Self { key }
    }

    /// Derive the PRF key from a secret key as `K = SHA256(sk)`.
    #[must_use]
    pub fn from_secret_key(sk: &SecretKey) -> Self {
        Self {
            key: Sha256::digest(sk).into(),
        }
    }

    /// Per-node message digest material (the `'X'` branch).
    #[must_use]
    pub fn get_x(&self, position: &TreePosition) -> Digest {
        self.keyed(PREFIX_X, position)
    }

    /// Per-node chameleon randomness (the `'R'` branch).
    ///
    /// Outputs are raw 256-bit strings and are not range-checked against the
    /// group order here. An output at or above the order (probability
    /// ≈ 2⁻¹²⁸ per node) surfaces as a randomness-overflow error from the
    /// chameleon hash consuming it.
    #[must_use]
    pub fn get_r(&self, position: &TreePosition) -> Rand {
        self.keyed(PREFIX_R, position)
    }

    fn keyed(&self, prefix: u8, position: &TreePosition) -> [u8; 32] {
        let mut mac = HmacSha256::new_from_slice(&self.key)
            .expect("HMAC-SHA-256 accepts keys of any length");
        mac.update(&[prefix]);
        mac.update(&position.encode());
        mac.finalize().into_bytes().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SK: SecretKey = [0x11; 32];

    #[test]
    fn deterministic_per_node() {
        let prf = Prf::from_secret_key(&SK);
        let node = TreePosition::left_child_of_root();
        assert_eq!(prf.get_x(&node), prf.get_x(&node));
        assert_eq!(prf.get_r(&node), prf.get_r(&node));
    }

    #[test]
    fn branches_are_domain_separated() {
        let prf = Prf::from_secret_key(&SK);
        let node = TreePosition::left_child_of_root();
        assert_ne!(prf.get_x(&node), prf.get_r(&node));
    }

    #[test]
    fn distinct_nodes_yield_distinct_outputs() {
        let prf = Prf::from_secret_key(&SK);
        let node = TreePosition::left_child_of_root();
        let mut sibling = node;
        sibling.move_to_sibling();
        assert_ne!(prf.get_x(&node), prf.get_x(&sibling));
        assert_ne!(prf.get_r(&node), prf.get_r(&sibling));
    }

    #[test]
    fn extract_mode_hashes_the_secret() {
        let derived = Prf::from_secret_key(&SK);
        let direct = Prf::from_key(Sha256::digest(SK).into());
        let node = TreePosition::left_child_of_root();
        assert_eq!(derived.get_x(&node), direct.get_x(&node));
    }

    #[test]
    fn distinct_keys_yield_distinct_streams() {
        let a = Prf::from_secret_key(&SK);
        let b = Prf::from_secret_key(&[0x22; 32]);
        let node = TreePosition::left_child_of_root();
        assert_ne!(a.get_x(&node), b.get_x(&node));
    }
}
