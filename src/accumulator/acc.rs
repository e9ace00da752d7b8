use super::{
    utils::{batch_invert, cfg_map, g1, generate_fr, invert, sc, SALT},
    Params, PublicKey, SecretKey,
};
use crate::error::{AccumulatorError, Result};
use blsful::inner_types::*;
use core::fmt::{self, Display, Formatter};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// An element in the accumulator
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Element(pub Scalar);

impl Hash for Element {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_be_bytes().hash(state)
    }
}

impl Display for Element {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Element {{ {} }}", self.0)
    }
}

impl TryFrom<&[u8; 32]> for Element {
    type Error = AccumulatorError;

    fn try_from(value: &[u8; 32]) -> Result<Self> {
        sc(value).map(Self)
    }
}

impl From<u64> for Element {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl Element {
    /// The number of bytes in an element
    pub const BYTES: usize = 32;

    /// Return the multiplicative identity element
    pub fn one() -> Self {
        Self(Scalar::ONE)
    }

    /// Return the byte representation
    pub fn to_bytes(&self) -> [u8; Self::BYTES] {
        self.0.to_be_bytes()
    }

    /// Parse an element from 32 big-endian bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        sc(bytes).map(Self)
    }

    /// Construct an element by hashing the specified bytes
    pub fn hash(d: &[u8]) -> Self {
        Self(generate_fr(SALT, Some(d), rand::rngs::OsRng))
    }

    /// The element whose field value is exactly `value`
    pub fn from_u64(value: u64) -> Self {
        Self(Scalar::from(value))
    }

    /// Construct a random element
    pub fn random() -> Self {
        Self(generate_fr(SALT, None, rand::rngs::OsRng))
    }
}

/// The accumulated value `V` of a positive or universal accumulator,
/// and each half of a KB-universal one.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AccumulatorValue(pub G1Projective);

serde_value_record!(AccumulatorValue);

impl Display for AccumulatorValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "AccumulatorValue {{ {} }}", self.0)
    }
}

impl From<AccumulatorValue> for G1Projective {
    fn from(a: AccumulatorValue) -> Self {
        a.0
    }
}

impl From<G1Projective> for AccumulatorValue {
    fn from(g: G1Projective) -> Self {
        Self(g)
    }
}

impl TryFrom<&[u8; 48]> for AccumulatorValue {
    type Error = AccumulatorError;

    fn try_from(value: &[u8; 48]) -> Result<Self> {
        Self::from_bytes(value)
    }
}

impl Default for AccumulatorValue {
    fn default() -> Self {
        Self(G1Projective::GENERATOR)
    }
}

impl AccumulatorValue {
    /// The number of bytes in an accumulator
    pub const BYTES: usize = 48;

    /// The value of an empty accumulator over `params`
    pub fn initial(params: &Params) -> Self {
        Self(params.p)
    }

    /// Initialize a new accumulator prefilled with entries
    pub fn with_elements(params: &Params, key: &SecretKey, m: &[Element]) -> Self {
        Self(params.p * key.batch_additions(m))
    }

    /// `V * (y + alpha)`
    pub fn add(&self, key: &SecretKey, value: &Element) -> Self {
        Self(self.0 * (key.0 + value.0))
    }

    /// `V / (y + alpha)`
    pub fn remove(&self, key: &SecretKey, value: &Element) -> Result<Self> {
        Ok(Self(self.0 * invert(key.0 + value.0)?))
    }

    /// Add many members
    pub fn add_batch(&self, key: &SecretKey, m: &[Element]) -> Self {
        Self(self.0 * key.batch_additions(m))
    }

    /// Remove many members
    pub fn remove_batch(&self, key: &SecretKey, deletions: &[Element]) -> Result<Self> {
        Ok(Self(self.0 * key.batch_deletions(deletions)?))
    }

    /// Performs a batch addition and deletion as described on page 11, section 5 in
    /// <https://eprint.iacr.org/2020/777.pdf>
    pub fn batch_updates(
        &self,
        key: &SecretKey,
        additions: &[Element],
        deletions: &[Element],
    ) -> Result<Self> {
        Ok(Self(self.0 * key.batch_factor(additions, deletions)?))
    }

    /// Multiply by a precomputed field factor
    pub fn scale(&self, factor: Scalar) -> Self {
        Self(self.0 * factor)
    }

    /// `V / (y + alpha)`, the point of a membership witness for `member`
    pub fn membership_witness_point(
        &self,
        key: &SecretKey,
        member: &Element,
    ) -> Result<G1Projective> {
        Ok(self.0 * invert(member.0 + key.0)?)
    }

    /// Membership witness points for many members with a single inversion
    pub fn membership_witness_points(
        &self,
        key: &SecretKey,
        members: &[Element],
    ) -> Result<Vec<G1Projective>> {
        let mut inv: Vec<Scalar> = members.iter().map(|m| m.0 + key.0).collect();
        batch_invert(&mut inv)?;
        let v = self.0;
        Ok(cfg_map(&inv, |i| v * *i))
    }

    /// `e(C, y*P_tilde + Q_tilde) * e(V, -P_tilde) == 1`
    pub fn verify_membership_point(
        &self,
        member: &Element,
        c: &G1Projective,
        pk: &PublicKey,
        params: &Params,
    ) -> bool {
        multi_miller_loop(&[
            (
                &c.to_affine(),
                &G2Prepared::from((params.p_tilde * member.0 + pk.0).to_affine()),
            ),
            (
                &self.0.to_affine(),
                &G2Prepared::from(-params.p_tilde.to_affine()),
            ),
        ])
        .final_exponentiation()
        .is_identity()
        .into()
    }

    /// `d != 0` and `e(C, y*P_tilde + Q_tilde) * e(d*P - V, P_tilde) == 1`
    pub fn verify_non_membership_point(
        &self,
        non_member: &Element,
        d: &Scalar,
        c: &G1Projective,
        pk: &PublicKey,
        params: &Params,
    ) -> bool {
        if *d == Scalar::ZERO {
            return false;
        }
        multi_miller_loop(&[
            (
                &c.to_affine(),
                &G2Prepared::from((params.p_tilde * non_member.0 + pk.0).to_affine()),
            ),
            (
                &(params.p * *d - self.0).to_affine(),
                &G2Prepared::from(params.p_tilde.to_affine()),
            ),
        ])
        .final_exponentiation()
        .is_identity()
        .into()
    }

    /// Convert accumulator to bytes
    pub fn to_bytes(&self) -> [u8; Self::BYTES] {
        self.0.to_compressed()
    }

    /// Parse an accumulator from its compressed form
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        g1(bytes).map(Self)
    }
}
