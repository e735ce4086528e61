//! Tree-walking authenticator for accountable assertions.
//!
//! The commitment is a complete binary tree of chameleon hashes whose leaf
//! layer is addressed by contexts. Nothing of the tree is materialised: a
//! keyed PRF derives every node's message and randomness on demand, and the
//! public commitment is only the digest of the two children of the root.
//! Authentication rewrites one root-to-leaf path by finding a trapdoor
//! collision per level; issuing two such openings for the same context with
//! different statements hands the secret key to any verifier.

use rand_core::{CryptoRng, RngCore};
use subtle::ConstantTimeEq;
use thiserror::Error;
use zeroize::Zeroize;

use crate::chameleon::{ChameleonError, ChameleonHash};
use crate::position::TreePosition;
use crate::prf::Prf;
use crate::{Context, DEPTH, Digest, HASH_LEN, Hash, MESG_LEN, RAND_LEN, Rand, SecretKey, TOKEN_LEN};

/// Error raised by authenticator operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthenticatorError {
    /// Failure in the underlying chameleon hash.
    #[error(transparent)]
    Chameleon(#[from] ChameleonError),
    /// The operation needs the secret key but the instance was built from
    /// public parameters.
    #[error("cannot authenticate without secret key")]
    NoSecretKey,
    /// A token handed to extraction does not verify.
    #[error("token {index} does not verify")]
    InvalidToken {
        /// 1-based index of the offending token argument.
        index: usize,
    },
    /// Both tokens verify yet no level yields a chameleon collision.
    #[error(
        "tokens verify but are not extractable; this state should be computationally infeasible to reach"
    )]
    Unextractable,
}

/// Public parameters: the chameleon public key and the root commitment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicParams {
    /// Compressed SEC1 chameleon public key.
    pub public_key: Hash,
    /// Digest of the two children-of-root chameleon hashes.
    pub root_digest: Digest,
}

impl PublicParams {
    /// Serialised length in bytes.
    pub const SIZE: usize = HASH_LEN + MESG_LEN;

    /// Raw serialisation, `public_key ∥ root_digest`.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut out = [0u8; Self::SIZE];
        out[..HASH_LEN].copy_from_slice(&self.public_key);
        out[HASH_LEN..].copy_from_slice(&self.root_digest);
        out
    }

    /// Parse the raw serialisation. Returns `None` on a length mismatch;
    /// point validity is checked when the parameters are used to build an
    /// [`Authenticator`].
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != Self::SIZE {
            return None;
        }
        let mut public_key = [0u8; HASH_LEN];
        public_key.copy_from_slice(&bytes[..HASH_LEN]);
        let mut root_digest = [0u8; MESG_LEN];
        root_digest.copy_from_slice(&bytes[HASH_LEN..]);
        Some(Self {
            public_key,
            root_digest,
        })
    }
}

/// An authentication token: one `(randomness, sibling hash)` pair per tree
/// level, ordered leaf to root.
#[derive(Clone, PartialEq, Eq)]
pub struct Token {
    rs: [Rand; DEPTH],
    chs: [Hash; DEPTH],
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("levels", &DEPTH)
            .finish_non_exhaustive()
    }
}

impl Token {
    /// Serialised length in bytes.
    pub const SIZE: usize = TOKEN_LEN;

    /// Raw serialisation: `DEPTH` slots of `randomness ∥ sibling hash` in
    /// path order.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(TOKEN_LEN);
        for slot in 0..DEPTH {
            out.extend_from_slice(&self.rs[slot]);
            out.extend_from_slice(&self.chs[slot]);
        }
        out
    }

    /// Parse the raw serialisation. Returns `None` on a length mismatch;
    /// scalar range and hash validity are checked by verification.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != TOKEN_LEN {
            return None;
        }
        let mut rs = [[0u8; RAND_LEN]; DEPTH];
        let mut chs = [[0u8; HASH_LEN]; DEPTH];
        for (slot, chunk) in bytes.chunks_exact(RAND_LEN + HASH_LEN).enumerate() {
            rs[slot].copy_from_slice(&chunk[..RAND_LEN]);
            chs[slot].copy_from_slice(&chunk[RAND_LEN..]);
        }
        Some(Self { rs, chs })
    }
}

/// Per-level values recorded while verifying, consumed by extraction.
struct VerifyLog {
    chs: Vec<Hash>,
    xs: Vec<Digest>,
}

impl VerifyLog {
    fn new() -> Self {
        Self {
            chs: Vec::with_capacity(DEPTH),
            xs: Vec::with_capacity(DEPTH),
        }
    }
}

/// An accountable-assertion authenticator.
///
/// Holds the chameleon hash (public key, optionally the trapdoor), the PRF
/// when the secret is present, and the root commitment.
#[derive(Debug)]
pub struct Authenticator {
    ch: ChameleonHash,
    prf: Option<Prf>,
    root_digest: Digest,
}

impl Authenticator {
    /// Build a signing instance from a secret key and derive the root
    /// commitment.
    ///
    /// # Errors
    ///
    /// [`ChameleonError::ZeroSecretKey`] / [`ChameleonError::Overflow`] for
    /// an invalid key.
    pub fn from_secret_key(sk: &SecretKey) -> Result<Self, AuthenticatorError> {
        let ch = ChameleonHash::from_secret_key(sk)?;
        let prf = Prf::from_secret_key(sk);
        let root_digest = derive_root_digest(&ch, &prf)?;
        Ok(Self {
            ch,
            prf: Some(prf),
            root_digest,
        })
    }

    /// Build a verifying instance from public parameters.
    ///
    /// # Errors
    ///
    /// [`ChameleonError::MalformedPublicKey`] if the embedded public key is
    /// not a curve point.
    pub fn from_public_params(params: &PublicParams) -> Result<Self, AuthenticatorError> {
        let ch = ChameleonHash::from_public_key(&params.public_key)?;
        Ok(Self {
            ch,
            prf: None,
            root_digest: params.root_digest,
        })
    }

    /// Generate a signing instance from a cryptographic RNG.
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        loop {
            let mut sk = [0u8; crate::SK_LEN];
            rng.fill_bytes(&mut sk);
            let built = Self::from_secret_key(&sk);
            sk.zeroize();
            if let Ok(instance) = built {
                return instance;
            }
        }
    }

    #[must_use]
    pub fn has_secret_key(&self) -> bool {
        self.ch.has_secret_key()
    }

    /// The public parameters a verifier needs.
    #[must_use]
    pub fn public_params(&self) -> PublicParams {
        PublicParams {
            public_key: self.ch.public_key_bytes(),
            root_digest: self.root_digest,
        }
    }

    /// The secret key in big-endian form.
    ///
    /// # Errors
    ///
    /// [`ChameleonError::NoSecretKey`] on a public-only instance.
    pub fn secret_key(&self) -> Result<SecretKey, AuthenticatorError> {
        Ok(self.ch.secret_key_bytes()?)
    }

    /// Open the leaf addressed by `ct` to the statement `st`.
    ///
    /// Walks leaf to root. At each level the PRF fixes the node's own
    /// chameleon hash, a trapdoor collision re-opens it to the running
    /// subtree digest, and the sibling's hash joins the token. On the leaf
    /// level only, the node hash is replaced by the random-oracle summary of
    /// itself and the collision randomness, binding the opening's
    /// randomness into the path; this is what forces two openings of the
    /// same context to collide somewhere.
    ///
    /// # Errors
    ///
    /// [`AuthenticatorError::NoSecretKey`] on a public-only instance;
    /// [`ChameleonError::Overflow`] in the cryptographically negligible case
    /// of a PRF output at or above the group order.
    pub fn authenticate(&self, ct: &Context, st: &[u8]) -> Result<Token, AuthenticatorError> {
        let prf = self.prf.as_ref().ok_or(AuthenticatorError::NoSecretKey)?;

        let mut node = TreePosition::from_context(ct);
        let mut sub_tree_x = ChameleonHash::digest(st);
        let mut rs = [[0u8; RAND_LEN]; DEPTH];
        let mut chs = [[0u8; HASH_LEN]; DEPTH];

        for slot in 0..DEPTH {
            let prf_x = prf.get_x(&node);
            let prf_r = prf.get_r(&node);
            let mut chash = self.ch.hash_digest(&prf_x, &prf_r)?;
            let sub_tree_r = self.ch.collision_digest(&prf_x, &prf_r, &sub_tree_x)?;

            if slot == 0 {
                chash = ChameleonHash::random_oracle(&chash, &sub_tree_r);
            }

            node.move_to_sibling();
            let sib_x = prf.get_x(&node);
            let sib_r = prf.get_r(&node);
            let sib_chash = self.ch.hash_digest(&sib_x, &sib_r)?;

            rs[slot] = sub_tree_r;
            chs[slot] = sib_chash;

            // `node` is the sibling here, so the branch order is inverted
            // relative to verification
            sub_tree_x = if node.is_left_child() {
                ChameleonHash::digest_pair(&sib_chash, &chash)
            } else {
                ChameleonHash::digest_pair(&chash, &sib_chash)
            };
            node.move_to_parent();
        }

        debug_assert!(node.is_root());
        debug_assert_eq!(
            sub_tree_x, self.root_digest,
            "authentication walk must land on the root commitment"
        );
        Ok(Token { rs, chs })
    }

    /// Check a token against `(ct, st)` using public operations only.
    #[must_use]
    pub fn verify(&self, token: &Token, ct: &Context, st: &[u8]) -> bool {
        self.verify_walk(token, ct, st, None)
    }

    /// Recover the secret key from two verifying tokens for the same
    /// context and different statements, storing it in this instance.
    ///
    /// Both paths are replayed with per-level logs. Because both end on the
    /// same root commitment, some first level must carry equal chameleon
    /// hashes computed from unequal inputs; that pair is a chameleon
    /// collision and yields the trapdoor.
    ///
    /// # Errors
    ///
    /// [`AuthenticatorError::InvalidToken`] if either token fails to
    /// verify; [`AuthenticatorError::Unextractable`] if no level collides
    /// (infeasible for honestly verifying tokens with distinct statements);
    /// [`ChameleonError::NotACollision`] if a candidate level turns out
    /// degenerate.
    pub fn extract(
        &mut self,
        t1: &Token,
        t2: &Token,
        ct: &Context,
        st1: &[u8],
        st2: &[u8],
    ) -> Result<(), AuthenticatorError> {
        let mut log1 = VerifyLog::new();
        let mut log2 = VerifyLog::new();
        if !self.verify_walk(t1, ct, st1, Some(&mut log1)) {
            return Err(AuthenticatorError::InvalidToken { index: 1 });
        }
        if !self.verify_walk(t2, ct, st2, Some(&mut log2)) {
            return Err(AuthenticatorError::InvalidToken { index: 2 });
        }

        for slot in 0..DEPTH {
            let inputs_differ =
                log1.xs[slot] != log2.xs[slot] || t1.rs[slot] != t2.rs[slot];
            if inputs_differ && log1.chs[slot] == log2.chs[slot] {
                self.ch.extract_digest(
                    &log1.xs[slot],
                    &t1.rs[slot],
                    &log2.xs[slot],
                    &t2.rs[slot],
                )?;
            }
        }

        if !self.ch.has_secret_key() {
            return Err(AuthenticatorError::Unextractable);
        }

        let mut sk = self.ch.secret_key_bytes()?;
        self.prf = Some(Prf::from_secret_key(&sk));
        sk.zeroize();
        Ok(())
    }

    fn verify_walk(
        &self,
        token: &Token,
        ct: &Context,
        st: &[u8],
        mut log: Option<&mut VerifyLog>,
    ) -> bool {
        let mut node = TreePosition::from_context(ct);
        let mut sub_tree_x = ChameleonHash::digest(st);

        for slot in 0..DEPTH {
            // out-of-range randomness only appears in forged tokens
            let Ok(mut chash) = self.ch.hash_digest(&sub_tree_x, &token.rs[slot]) else {
                return false;
            };

            if let Some(log) = log.as_deref_mut() {
                log.chs.push(chash);
                log.xs.push(sub_tree_x);
            }

            if slot == 0 {
                chash = ChameleonHash::random_oracle(&chash, &token.rs[slot]);
            }

            sub_tree_x = if node.is_left_child() {
                ChameleonHash::digest_pair(&chash, &token.chs[slot])
            } else {
                ChameleonHash::digest_pair(&token.chs[slot], &chash)
            };
            node.move_to_parent();
        }

        debug_assert!(node.is_root());
        bool::from(sub_tree_x.ct_eq(&self.root_digest))
    }
}

fn derive_root_digest(ch: &ChameleonHash, prf: &Prf) -> Result<Digest, ChameleonError> {
    let mut node = TreePosition::left_child_of_root();
    let left = ch.hash_digest(&prf.get_x(&node), &prf.get_r(&node))?;
    node.move_to_sibling();
    let right = ch.hash_digest(&prf.get_x(&node), &prf.get_r(&node))?;
    Ok(ChameleonHash::digest_pair(&left, &right))
}
