// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapter over the `k256` ECC backend.
//!
//! The scheme needs a narrow slice of secp256k1: scalar arithmetic mod the
//! group order, base-point and double-scalar multiplication, and the SEC1
//! point codecs. Everything touching the backend lives behind this module
//! so an alternate arithmetic implementation can be substituted without
//! touching the scheme code.

use core::ops::{Add, Mul, Sub};

use k256::elliptic_curve::bigint::U256;
use k256::elliptic_curve::group::ff::PrimeField;
use k256::elliptic_curve::ops::{Invert, LinearCombination, MulByGenerator, Reduce};
use k256::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use k256::{AffinePoint, EncodedPoint, FieldBytes, ProjectivePoint};
use zeroize::Zeroize;

/// A scalar modulo the secp256k1 group order.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) struct Scalar(k256::Scalar);

impl Scalar {
    /// Parse 32 big-endian bytes, rejecting values that are not below the
    /// group order.
    pub fn from_be_bytes(bytes: &[u8; 32]) -> Option<Self> {
        Option::from(k256::Scalar::from_repr(FieldBytes::from(*bytes))).map(Self)
    }

    /// Parse 32 big-endian bytes with implicit reduction mod the group
    /// order. Used where the reduced interpretation is the contract, never
    /// for inputs that must be rejected on overflow.
    pub fn from_be_bytes_reduced(bytes: &[u8; 32]) -> Self {
        Self(<k256::Scalar as Reduce<U256>>::reduce_bytes(
            &FieldBytes::from(*bytes),
        ))
    }

    pub fn to_be_bytes(&self) -> [u8; 32] {
        self.0.to_bytes().into()
    }

    /// Constant-time inversion; `None` for zero.
    pub fn invert(&self) -> Option<Self> {
        Option::from(Invert::invert(&self.0)).map(Self)
    }

    /// Variable-time inversion, for public inputs only; `None` for zero.
    pub fn invert_vartime(&self) -> Option<Self> {
        Option::from(Invert::invert_vartime(&self.0)).map(Self)
    }
}

impl Add for Scalar {
    type Output = Scalar;

    fn add(self, rhs: Scalar) -> Scalar {
        Scalar(self.0 + rhs.0)
    }
}

impl Sub for Scalar {
    type Output = Scalar;

    fn sub(self, rhs: Scalar) -> Scalar {
        Scalar(self.0 - rhs.0)
    }
}

impl Mul for Scalar {
    type Output = Scalar;

    fn mul(self, rhs: Scalar) -> Scalar {
        Scalar(self.0 * rhs.0)
    }
}

impl Zeroize for Scalar {
    fn zeroize(&mut self) {
        self.0 = k256::Scalar::from(0u64);
    }
}

/// A non-identity point on secp256k1.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) struct Point(ProjectivePoint);

impl Point {
    /// `g^s` for the fixed base point `g`.
    pub fn mul_base(s: &Scalar) -> Self {
        Self(ProjectivePoint::mul_by_generator(&s.0))
    }

    /// `self^a · g^b` as one double-scalar multiplication.
    pub fn mul_with_base(&self, a: &Scalar, b: &Scalar) -> Self {
        Self(ProjectivePoint::lincomb(
            &self.0,
            &a.0,
            &ProjectivePoint::GENERATOR,
            &b.0,
        ))
    }

    /// Parse a SEC1 point, compressed or uncompressed. Rejects anything that
    /// is not an affine curve point, including the identity encoding.
    pub fn from_sec1_bytes(bytes: &[u8]) -> Option<Self> {
        let encoded = EncodedPoint::from_bytes(bytes).ok()?;
        if encoded.is_identity() {
            return None;
        }
        Option::<AffinePoint>::from(AffinePoint::from_encoded_point(&encoded))
            .map(|affine| Self(ProjectivePoint::from(affine)))
    }

    /// Compressed SEC1 encoding. `None` for the identity, which has no
    /// 33-byte representation.
    pub fn to_compressed_bytes(&self) -> Option<[u8; 33]> {
        let encoded = self.0.to_affine().to_encoded_point(true);
        let bytes = encoded.as_bytes();
        if bytes.len() != 33 {
            return None;
        }
        let mut out = [0u8; 33];
        out.copy_from_slice(bytes);
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Group order minus one, big-endian.
    const ORDER_MINUS_ONE: [u8; 32] = [
        0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
        0xfe, 0xba, 0xae, 0xdc, 0xe6, 0xaf, 0x48, 0xa0, 0x3b, 0xbf, 0xd2, 0x5e, 0x8c, 0xd0, 0x36,
        0x41, 0x40,
    ];

    #[test]
    fn scalar_parse_rejects_order() {
        let mut order = ORDER_MINUS_ONE;
        order[31] += 1;
        assert!(Scalar::from_be_bytes(&ORDER_MINUS_ONE).is_some());
        assert!(Scalar::from_be_bytes(&order).is_none());
    }

    #[test]
    fn scalar_reduce_wraps_order() {
        let mut order = ORDER_MINUS_ONE;
        order[31] += 1;
        let reduced = Scalar::from_be_bytes_reduced(&order);
        assert_eq!(reduced.to_be_bytes(), [0u8; 32]);
    }

    #[test]
    fn scalar_round_trips_bytes() {
        let mut bytes = [0u8; 32];
        bytes[31] = 42;
        let s = Scalar::from_be_bytes(&bytes).unwrap();
        assert_eq!(s.to_be_bytes(), bytes);
    }

    #[test]
    fn inversion_agrees_and_rejects_zero() {
        let mut bytes = [0u8; 32];
        bytes[31] = 7;
        let s = Scalar::from_be_bytes(&bytes).unwrap();
        let inv = s.invert().unwrap();
        assert_eq!(inv, s.invert_vartime().unwrap());
        let one = s * inv;
        let mut one_bytes = [0u8; 32];
        one_bytes[31] = 1;
        assert_eq!(one.to_be_bytes(), one_bytes);

        let zero = s - s;
        assert!(zero.invert().is_none());
        assert!(zero.invert_vartime().is_none());
    }

    #[test]
    fn ecmult_branches_agree() {
        let mut a = [0u8; 32];
        a[31] = 5;
        let mut b = [0u8; 32];
        b[31] = 11;
        let a = Scalar::from_be_bytes(&a).unwrap();
        let b = Scalar::from_be_bytes(&b).unwrap();
        let p = Point::mul_base(&a);
        // (g^a)^b · g^b against g^(a·b + b)
        let lhs = p.mul_with_base(&b, &b);
        let rhs = Point::mul_base(&(a * b + b));
        assert_eq!(
            lhs.to_compressed_bytes().unwrap(),
            rhs.to_compressed_bytes().unwrap()
        );
    }

    #[test]
    fn point_parse_rejects_garbage() {
        assert!(Point::from_sec1_bytes(&[0u8; 33]).is_none());
        assert!(Point::from_sec1_bytes(&[]).is_none());
        let mut not_on_curve = [2u8; 33];
        not_on_curve[1] = 0xff;
        // overwhelmingly likely not a valid x coordinate pattern; either way
        // the parse must not panic
        let _ = Point::from_sec1_bytes(&not_on_curve);
    }

    #[test]
    fn point_serialisation_round_trips() {
        let mut bytes = [0u8; 32];
        bytes[31] = 9;
        let s = Scalar::from_be_bytes(&bytes).unwrap();
        let p = Point::mul_base(&s);
        let compressed = p.to_compressed_bytes().unwrap();
        let reparsed = Point::from_sec1_bytes(&compressed).unwrap();
        assert_eq!(reparsed, p);
    }
}
