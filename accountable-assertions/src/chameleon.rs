// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chameleon hash over secp256k1.
//!
//! `H(m, r) = g^m · pk^r`, equivalently `g^{m + sk·r}` for the trapdoor
//! holder. The hash is collision-resistant without the trapdoor; with it,
//! for any `(m1, r1)` and target `m2` a second randomness `r2` with
//! `H(m1, r1) = H(m2, r2)` is one scalar computation away. Conversely, any
//! collision algebraically reveals the trapdoor, which is what the
//! authenticator's double-signing accountability rests on.

use std::fmt;

use hmac::{Hmac, Mac};
use rand_core::{CryptoRng, RngCore};
use sha2::{Digest as _, Sha256};
use thiserror::Error;
use zeroize::Zeroize;

use crate::curve::{Point, Scalar};
use crate::{Digest, HASH_LEN, Hash, MESG_LEN, Rand, SK_LEN, SecretKey};

/// HMAC key of the domain-separating random oracle (exactly 32 bytes).
const RANDOM_ORACLE_KEY: &[u8; 32] = b"RandomOracleGRandomOracleGRandom";

type HmacSha256 = Hmac<Sha256>;

/// Error raised by chameleon hash operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChameleonError {
    /// A secret key parsed to the zero scalar.
    #[error("zero is not a valid secret key")]
    ZeroSecretKey,
    /// A public key failed SEC1 parsing or is not a curve point.
    #[error("malformed public key")]
    MalformedPublicKey,
    /// A 32-byte scalar input is not below the group order.
    #[error("overflow in {0}")]
    Overflow(&'static str),
    /// The operation needs the trapdoor but only the public key is present.
    #[error("no secret key available")]
    NoSecretKey,
    /// The inputs handed to extraction do not collide, or are equal.
    #[error("not a collision")]
    NotACollision,
    /// The hash landed on the group identity, which has no 33-byte
    /// encoding. Reaching this means finding the discrete log of `g^m` by
    /// accident.
    #[error("chameleon hash is not a serialisable group element")]
    UnserialisableHash,
}

struct Trapdoor {
    sk: Scalar,
    sk_inv: Scalar,
}

impl Drop for Trapdoor {
    fn drop(&mut self) {
        self.sk.zeroize();
        self.sk_inv.zeroize();
    }
}

/// A chameleon hash instance: always a public key, optionally the trapdoor
/// `(sk, sk⁻¹)`.
pub struct ChameleonHash {
    pk: Point,
    trapdoor: Option<Trapdoor>,
}

impl fmt::Debug for ChameleonHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ChameleonHash({}{})",
            hex::encode(self.public_key_bytes()),
            if self.has_secret_key() {
                ", <secret>"
            } else {
                ""
            }
        )
    }
}

impl ChameleonHash {
    /// Construct a trapdoor instance from a 32-byte big-endian secret key.
    ///
    /// # Errors
    ///
    /// [`ChameleonError::Overflow`] if the key is not below the group order,
    /// [`ChameleonError::ZeroSecretKey`] if it is zero.
    pub fn from_secret_key(sk: &SecretKey) -> Result<Self, ChameleonError> {
        let sk_scalar =
            Scalar::from_be_bytes(sk).ok_or(ChameleonError::Overflow("secret key"))?;
        let sk_inv = sk_scalar.invert().ok_or(ChameleonError::ZeroSecretKey)?;
        let pk = Point::mul_base(&sk_scalar);
        Ok(Self {
            pk,
            trapdoor: Some(Trapdoor {
                sk: sk_scalar,
                sk_inv,
            }),
        })
    }

    /// Construct a public instance from a SEC1 public key, compressed or
    /// uncompressed.
    ///
    /// # Errors
    ///
    /// [`ChameleonError::MalformedPublicKey`] if the bytes are not a curve
    /// point.
    pub fn from_public_key(pk: &[u8]) -> Result<Self, ChameleonError> {
        let pk = Point::from_sec1_bytes(pk).ok_or(ChameleonError::MalformedPublicKey)?;
        Ok(Self { pk, trapdoor: None })
    }

    /// Generate a fresh trapdoor instance from a cryptographic RNG.
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        loop {
            let mut bytes = [0u8; SK_LEN];
            rng.fill_bytes(&mut bytes);
            let parsed = Self::from_secret_key(&bytes);
            bytes.zeroize();
            if let Ok(instance) = parsed {
                return instance;
            }
        }
    }

    #[must_use]
    pub fn has_secret_key(&self) -> bool {
        self.trapdoor.is_some()
    }

    /// The public key in compressed SEC1 form.
    #[must_use]
    pub fn public_key_bytes(&self) -> [u8; HASH_LEN] {
        self.pk
            .to_compressed_bytes()
            .expect("a validated public key is a serialisable group element")
    }

    /// The secret key in big-endian form.
    ///
    /// # Errors
    ///
    /// [`ChameleonError::NoSecretKey`] on a public-only instance.
    pub fn secret_key_bytes(&self) -> Result<SecretKey, ChameleonError> {
        let trapdoor = self.trapdoor.as_ref().ok_or(ChameleonError::NoSecretKey)?;
        Ok(trapdoor.sk.to_be_bytes())
    }

    /// Hash a 32-byte digest under randomness `r`.
    ///
    /// Digests are interpreted mod the group order; [`ChameleonHash::digest`]
    /// outputs are already reduced, and the Merkle-step digests of the
    /// authenticator rely on the implicit reduction here. The randomness is
    /// rejected on overflow instead.
    ///
    /// Both the trapdoor path (`g^{m + sk·r}`, one base multiplication) and
    /// the public path (`pk^r · g^m`) produce identical outputs.
    ///
    /// # Errors
    ///
    /// [`ChameleonError::Overflow`] if `r` is not below the group order.
    pub fn hash_digest(&self, m: &Digest, r: &Rand) -> Result<Hash, ChameleonError> {
        let ms = Scalar::from_be_bytes_reduced(m);
        let rs = Scalar::from_be_bytes(r).ok_or(ChameleonError::Overflow("randomness"))?;
        let point = match &self.trapdoor {
            Some(trapdoor) => Point::mul_base(&(rs * trapdoor.sk + ms)),
            None => self.pk.mul_with_base(&rs, &ms),
        };
        point
            .to_compressed_bytes()
            .ok_or(ChameleonError::UnserialisableHash)
    }

    /// Hash an arbitrary-length message under randomness `r`.
    ///
    /// # Errors
    ///
    /// [`ChameleonError::Overflow`] if `r` is not below the group order.
    pub fn hash(&self, m: &[u8], r: &Rand) -> Result<Hash, ChameleonError> {
        self.hash_digest(&Self::digest(m), r)
    }

    /// Trapdoor collision: randomness `r2` with
    /// `hash_digest(d1, r1) == hash_digest(d2, r2)`, computed as
    /// `r2 = (d1 - d2)·sk⁻¹ + r1`.
    ///
    /// # Errors
    ///
    /// [`ChameleonError::NoSecretKey`] without the trapdoor;
    /// [`ChameleonError::Overflow`] if any scalar input is not below the
    /// group order.
    pub fn collision_digest(
        &self,
        d1: &Digest,
        r1: &Rand,
        d2: &Digest,
    ) -> Result<Rand, ChameleonError> {
        let trapdoor = self.trapdoor.as_ref().ok_or(ChameleonError::NoSecretKey)?;
        let d1s =
            Scalar::from_be_bytes(d1).ok_or(ChameleonError::Overflow("digest of message 1"))?;
        let d2s =
            Scalar::from_be_bytes(d2).ok_or(ChameleonError::Overflow("digest of message 2"))?;
        let r1s = Scalar::from_be_bytes(r1).ok_or(ChameleonError::Overflow("randomness 1"))?;
        let r2s = (d1s - d2s) * trapdoor.sk_inv + r1s;
        Ok(r2s.to_be_bytes())
    }

    /// Message-level convenience around [`ChameleonHash::collision_digest`].
    ///
    /// # Errors
    ///
    /// As [`ChameleonHash::collision_digest`].
    pub fn collision(&self, m1: &[u8], r1: &Rand, m2: &[u8]) -> Result<Rand, ChameleonError> {
        self.collision_digest(&Self::digest(m1), r1, &Self::digest(m2))
    }

    /// Recover the trapdoor from a collision and store it in this instance.
    ///
    /// `d1 + sk·r1 ≡ d2 + sk·r2` gives `sk⁻¹ = (r1 - r2)/(d2 - d1)`; the
    /// division uses variable-time inversion since every input is public,
    /// while the final inversion back to `sk` stays constant-time.
    ///
    /// # Errors
    ///
    /// [`ChameleonError::NotACollision`] if the two pairs are equal, do not
    /// hash to the same value, or cancel to a zero denominator;
    /// [`ChameleonError::Overflow`] if a randomness is not below the group
    /// order.
    pub fn extract_digest(
        &mut self,
        d1: &Digest,
        r1: &Rand,
        d2: &Digest,
        r2: &Rand,
    ) -> Result<(), ChameleonError> {
        let h1 = self.hash_digest(d1, r1)?;
        let h2 = self.hash_digest(d2, r2)?;
        if (d1 == d2 && r1 == r2) || h1 != h2 {
            return Err(ChameleonError::NotACollision);
        }

        // Randomness overflow was caught by the evaluations above; digests
        // take the same implicit reduction they got there.
        let d1s = Scalar::from_be_bytes_reduced(d1);
        let d2s = Scalar::from_be_bytes_reduced(d2);
        let r1s = Scalar::from_be_bytes_reduced(r1);
        let r2s = Scalar::from_be_bytes_reduced(r2);

        let denom = (d2s - d1s)
            .invert_vartime()
            .ok_or(ChameleonError::NotACollision)?;
        let sk_inv = (r1s - r2s) * denom;
        let sk = sk_inv.invert().ok_or(ChameleonError::NotACollision)?;
        self.trapdoor = Some(Trapdoor { sk, sk_inv });
        Ok(())
    }

    /// Message-level convenience around [`ChameleonHash::extract_digest`].
    ///
    /// # Errors
    ///
    /// As [`ChameleonHash::extract_digest`].
    pub fn extract(
        &mut self,
        m1: &[u8],
        r1: &Rand,
        m2: &[u8],
        r2: &Rand,
    ) -> Result<(), ChameleonError> {
        self.extract_digest(&Self::digest(m1), r1, &Self::digest(m2), r2)
    }

    /// Digest an arbitrary-length message to a scalar-safe 32-byte value.
    ///
    /// Rejection resampling: re-hash the digest until it falls below the
    /// group order. The gap between 2²⁵⁶ and the order is ≈ 2⁻¹²⁸ of the
    /// range, so the loop terminates on the first iteration in practice.
    #[must_use]
    pub fn digest(m: &[u8]) -> Digest {
        let mut d: Digest = Sha256::digest(m).into();
        while Scalar::from_be_bytes(&d).is_none() {
            d = Sha256::digest(d).into();
        }
        d
    }

    /// Merkle-step digest of two chameleon hashes, `SHA256(h1 ∥ h2)`.
    ///
    /// The output is deliberately not range-checked: the consuming
    /// [`ChameleonHash::hash_digest`] call interprets it mod the group
    /// order.
    #[must_use]
    pub fn digest_pair(h1: &Hash, h2: &Hash) -> Digest {
        let mut sha = Sha256::new();
        sha.update(h1);
        sha.update(h2);
        sha.finalize().into()
    }

    /// Domain-separated summary binding a hash value and a randomness,
    /// HMAC-SHA-256 under a fixed key.
    ///
    /// The 32-byte tag fills the front of the [`Hash`] container and the
    /// final byte is forced to zero, so the result can never alias a
    /// compressed curve point (whose leading byte is `0x02`/`0x03`).
    #[must_use]
    pub fn random_oracle(in1: &Hash, in2: &Rand) -> Hash {
        let mut mac = HmacSha256::new_from_slice(RANDOM_ORACLE_KEY)
            .expect("HMAC-SHA-256 accepts keys of any length");
        mac.update(in1);
        mac.update(in2);
        let tag: [u8; MESG_LEN] = mac.finalize().into_bytes().into();
        let mut out = [0u8; HASH_LEN];
        out[..MESG_LEN].copy_from_slice(&tag);
        out[MESG_LEN] = 0x00;
        out
    }
}
