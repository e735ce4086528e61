//! Accountable assertions over secp256k1.
//!
//! An accountable assertion binds a fixed-length *context* to an
//! arbitrary-length *statement* in a publicly verifiable token, with one
//! sharp edge: issuing tokens for two different statements under the same
//! context reveals the issuer's secret key to anybody holding both tokens.
//!
//! The construction layers a binary tree of chameleon hashes
//! (`H(m, r) = g^m · pk^r` over secp256k1) above the context bits. A keyed
//! PRF derives deterministic per-node material, and authentication opens
//! exactly one leaf of the tree to the statement digest by finding a
//! trapdoor collision at each level of the path. Verification replays the
//! path with public operations only; extraction compares two verifying
//! paths and recovers the trapdoor from the level where they collide.
//!
//! Entry point is [`Authenticator`]; the underlying primitives
//! ([`ChameleonHash`], [`Prf`], [`TreePosition`]) are exported for reuse
//! and testing.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod authenticator;
pub mod chameleon;
mod curve;
pub mod position;
pub mod prf;

/// Context length in bytes. The tree has one leaf per possible context.
pub const CT_LEN: usize = 8;

/// Number of non-root tree levels; one bit of context per level.
pub const DEPTH: usize = 8 * CT_LEN;

/// Length of a digest or PRF output in bytes.
pub const MESG_LEN: usize = 32;

/// Length of chameleon-hash randomness in bytes (a scalar mod the group order).
pub const RAND_LEN: usize = 32;

/// Length of a chameleon-hash output in bytes (a compressed secp256k1 point).
pub const HASH_LEN: usize = 33;

/// Length of a secret key in bytes.
pub const SK_LEN: usize = 32;

/// Serialised token length in bytes.
pub const TOKEN_LEN: usize = DEPTH * (HASH_LEN + RAND_LEN);

/// A 32-byte message digest, reduced below the secp256k1 group order when
/// produced by [`ChameleonHash::digest`].
pub type Digest = [u8; MESG_LEN];

/// Chameleon-hash randomness: a big-endian scalar mod the group order.
pub type Rand = [u8; RAND_LEN];

/// A chameleon-hash output: a compressed secp256k1 point (or, for the
/// random-oracle summary, a 32-byte tag padded with a zero byte).
pub type Hash = [u8; HASH_LEN];

/// A secret key: a big-endian non-zero scalar below the group order.
pub type SecretKey = [u8; SK_LEN];

/// A context: the fixed-length label addressing one leaf of the tree.
pub type Context = [u8; CT_LEN];

pub use authenticator::{Authenticator, AuthenticatorError, PublicParams, Token};
pub use chameleon::{ChameleonError, ChameleonHash};
pub use position::TreePosition;
pub use prf::Prf;
