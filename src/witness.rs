use crate::{
    accumulator::{
        update,
        utils::{g1, sc},
        AccumulatorValue, Element, Omega, Params, PublicKey, SecretKey,
    },
    error::{AccumulatorError, Result},
    public_info::WitnessUpdatePublicInfo,
};
use blsful::inner_types::*;
use core::fmt::{self, Display, Formatter};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Proof that an element was accumulated, `C = V / (y + alpha)`.
/// Valid only against the value it was computed for or one reached from it by
/// applying an update for every intervening change.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct MembershipWitness(pub G1Projective);

serde_value_record!(MembershipWitness);

impl Display for MembershipWitness {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "MembershipWitness {{ {} }}", self.0)
    }
}

impl From<G1Projective> for MembershipWitness {
    fn from(g: G1Projective) -> Self {
        Self(g)
    }
}

impl From<MembershipWitness> for G1Projective {
    fn from(w: MembershipWitness) -> Self {
        w.0
    }
}

impl TryFrom<&[u8; 48]> for MembershipWitness {
    type Error = AccumulatorError;

    fn try_from(value: &[u8; 48]) -> Result<Self> {
        Self::from_bytes(value)
    }
}

impl MembershipWitness {
    /// The number of bytes in a membership witness
    pub const BYTES: usize = 48;

    /// Compute the witness for `member` against `value`
    pub fn new(member: &Element, value: &AccumulatorValue, sk: &SecretKey) -> Result<Self> {
        value.membership_witness_point(sk, member).map(Self)
    }

    /// Check the witness with the public key
    pub fn verify(
        &self,
        member: &Element,
        value: &AccumulatorValue,
        pk: &PublicKey,
        params: &Params,
    ) -> bool {
        value.verify_membership_point(member, &self.0, pk, params)
    }

    /// Follow the addition of `addition` to `old_value`, the value before the addition
    pub fn update_post_add(
        &self,
        member: &Element,
        addition: &Element,
        old_value: &AccumulatorValue,
    ) -> Self {
        Self(update::after_addition(&self.0, member, addition, old_value).0)
    }

    /// Follow the removal of `removal`. `new_value` is the value after the removal.
    pub fn update_post_remove(
        &self,
        member: &Element,
        removal: &Element,
        new_value: &AccumulatorValue,
    ) -> Result<Self> {
        update::after_removal(&self.0, member, removal, new_value).map(|(c, _)| Self(c))
    }

    /// Move the witness across one batch using the published info
    pub fn update_using_public_info_after_batch_update(
        &self,
        member: &Element,
        additions: &[Element],
        removals: &[Element],
        info: &WitnessUpdatePublicInfo,
    ) -> Result<Self> {
        self.update_using_omega(member, additions, removals, info.omega())
    }

    pub(crate) fn update_using_omega(
        &self,
        member: &Element,
        additions: &[Element],
        removals: &[Element],
        omega: &Omega,
    ) -> Result<Self> {
        update::using_public_info(&self.0, member, additions, removals, omega).map(|(c, _)| Self(c))
    }

    /// Move the witness across consecutive batches. `infos[i]` must belong to
    /// `additions[i]` and `removals[i]` and the batches must be given in the order they
    /// were applied.
    pub fn update_using_public_info_after_multiple_batch_updates(
        &self,
        member: &Element,
        additions: &[Vec<Element>],
        removals: &[Vec<Element>],
        infos: &[WitnessUpdatePublicInfo],
    ) -> Result<Self> {
        let omegas = infos.iter().map(|i| i.omega()).collect::<Vec<_>>();
        self.update_using_omegas(member, additions, removals, &omegas)
    }

    pub(crate) fn update_using_omegas(
        &self,
        member: &Element,
        additions: &[Vec<Element>],
        removals: &[Vec<Element>],
        omegas: &[&Omega],
    ) -> Result<Self> {
        update::using_public_info_multiple(&self.0, member, additions, removals, omegas)
            .map(|(c, _)| Self(c))
    }

    /// Manager side update of many witnesses after a batch, using the secret key.
    /// `old_value` is the value before the batch.
    pub fn update_multiple_post_batch_updates(
        witnesses: &[Self],
        members: &[Element],
        additions: &[Element],
        removals: &[Element],
        old_value: &AccumulatorValue,
        sk: &SecretKey,
    ) -> Result<Vec<Self>> {
        let points = witnesses.iter().map(|w| w.0).collect::<Vec<_>>();
        let updated = update::with_secret_key(&points, members, additions, removals, old_value, sk)?;
        Ok(updated.into_iter().map(|(c, _)| Self(c)).collect())
    }

    /// [`Self::update_multiple_post_batch_updates`] for a batch of additions only
    pub fn update_multiple_post_additions(
        witnesses: &[Self],
        members: &[Element],
        additions: &[Element],
        old_value: &AccumulatorValue,
        sk: &SecretKey,
    ) -> Result<Vec<Self>> {
        Self::update_multiple_post_batch_updates(witnesses, members, additions, &[], old_value, sk)
    }

    /// [`Self::update_multiple_post_batch_updates`] for a batch of removals only
    pub fn update_multiple_post_removals(
        witnesses: &[Self],
        members: &[Element],
        removals: &[Element],
        old_value: &AccumulatorValue,
        sk: &SecretKey,
    ) -> Result<Vec<Self>> {
        Self::update_multiple_post_batch_updates(witnesses, members, &[], removals, old_value, sk)
    }

    /// Blind the witness by `r`. The result verifies against the value scaled by the same `r`.
    pub fn randomize(&self, r: &Scalar) -> Self {
        Self(self.0 * *r)
    }

    /// The compressed witness point
    pub fn to_bytes(&self) -> [u8; Self::BYTES] {
        self.0.to_compressed()
    }

    /// Parse a witness from its compressed point
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        g1(bytes).map(Self)
    }
}

/// Universal accumulator proof that an element was not accumulated.
///
/// `d` is the product of `(member - y)` over the accumulated members and
/// `C = (f_V - d) / (y + alpha) * P`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct NonMembershipWitness {
    /// The member product, never zero for a true non-member
    pub d: Scalar,
    /// The witness point
    pub c: G1Projective,
}

#[derive(Serialize)]
struct NonMembershipRecordRef<'a> {
    #[serde(with = "serde_bytes")]
    d: &'a [u8],
    #[serde(with = "serde_bytes")]
    c: &'a [u8],
}

#[derive(Deserialize)]
struct NonMembershipRecord {
    #[serde(with = "serde_bytes")]
    d: Vec<u8>,
    #[serde(with = "serde_bytes")]
    c: Vec<u8>,
}

impl Serialize for NonMembershipWitness {
    fn serialize<S: Serializer>(&self, s: S) -> core::result::Result<S::Ok, S::Error> {
        let d = self.d.to_be_bytes();
        let c = self.c.to_compressed();
        NonMembershipRecordRef { d: &d, c: &c }.serialize(s)
    }
}

impl<'de> Deserialize<'de> for NonMembershipWitness {
    fn deserialize<D: Deserializer<'de>>(d: D) -> core::result::Result<Self, D::Error> {
        let record = NonMembershipRecord::deserialize(d)?;
        Ok(Self {
            d: sc(&record.d).map_err(serde::de::Error::custom)?,
            c: g1(&record.c).map_err(serde::de::Error::custom)?,
        })
    }
}

impl Display for NonMembershipWitness {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "NonMembershipWitness {{ d: {}, c: {} }}", self.d, self.c)
    }
}

impl TryFrom<&[u8; 80]> for NonMembershipWitness {
    type Error = AccumulatorError;

    fn try_from(value: &[u8; 80]) -> Result<Self> {
        Self::from_bytes(value)
    }
}

impl NonMembershipWitness {
    /// The number of bytes in a non-membership witness
    pub const BYTES: usize = 80;

    /// Check the witness with the public key. A zero `d` never verifies.
    pub fn verify(
        &self,
        non_member: &Element,
        value: &AccumulatorValue,
        pk: &PublicKey,
        params: &Params,
    ) -> bool {
        value.verify_non_membership_point(non_member, &self.d, &self.c, pk, params)
    }

    /// Follow the addition of `addition` to `old_value`, the value before the addition
    pub fn update_post_add(
        &self,
        non_member: &Element,
        addition: &Element,
        old_value: &AccumulatorValue,
    ) -> Self {
        let (c, factor) = update::after_addition(&self.c, non_member, addition, old_value);
        Self {
            d: self.d * factor,
            c,
        }
    }

    /// Follow the removal of `removal`. `new_value` is the value after the removal.
    pub fn update_post_remove(
        &self,
        non_member: &Element,
        removal: &Element,
        new_value: &AccumulatorValue,
    ) -> Result<Self> {
        let (c, factor) = update::after_removal(&self.c, non_member, removal, new_value)?;
        Ok(Self {
            d: self.d * factor,
            c,
        })
    }

    /// Move the witness across one batch using the published info
    pub fn update_using_public_info_after_batch_update(
        &self,
        non_member: &Element,
        additions: &[Element],
        removals: &[Element],
        info: &WitnessUpdatePublicInfo,
    ) -> Result<Self> {
        let (c, factor) =
            update::using_public_info(&self.c, non_member, additions, removals, info.omega())?;
        Ok(Self {
            d: self.d * factor,
            c,
        })
    }

    /// Move the witness across consecutive batches, in the order they were applied
    pub fn update_using_public_info_after_multiple_batch_updates(
        &self,
        non_member: &Element,
        additions: &[Vec<Element>],
        removals: &[Vec<Element>],
        infos: &[WitnessUpdatePublicInfo],
    ) -> Result<Self> {
        let omegas = infos.iter().map(|i| i.omega()).collect::<Vec<_>>();
        let (c, factor) =
            update::using_public_info_multiple(&self.c, non_member, additions, removals, &omegas)?;
        Ok(Self {
            d: self.d * factor,
            c,
        })
    }

    /// Manager side update of many witnesses after a batch, using the secret key.
    /// `old_value` is the value before the batch.
    pub fn update_multiple_post_batch_updates(
        witnesses: &[Self],
        non_members: &[Element],
        additions: &[Element],
        removals: &[Element],
        old_value: &AccumulatorValue,
        sk: &SecretKey,
    ) -> Result<Vec<Self>> {
        let points = witnesses.iter().map(|w| w.c).collect::<Vec<_>>();
        let updated =
            update::with_secret_key(&points, non_members, additions, removals, old_value, sk)?;
        Ok(witnesses
            .iter()
            .zip(updated)
            .map(|(w, (c, factor))| Self {
                d: w.d * factor,
                c,
            })
            .collect())
    }

    /// [`Self::update_multiple_post_batch_updates`] for a batch of additions only
    pub fn update_multiple_post_additions(
        witnesses: &[Self],
        non_members: &[Element],
        additions: &[Element],
        old_value: &AccumulatorValue,
        sk: &SecretKey,
    ) -> Result<Vec<Self>> {
        Self::update_multiple_post_batch_updates(
            witnesses,
            non_members,
            additions,
            &[],
            old_value,
            sk,
        )
    }

    /// [`Self::update_multiple_post_batch_updates`] for a batch of removals only
    pub fn update_multiple_post_removals(
        witnesses: &[Self],
        non_members: &[Element],
        removals: &[Element],
        old_value: &AccumulatorValue,
        sk: &SecretKey,
    ) -> Result<Vec<Self>> {
        Self::update_multiple_post_batch_updates(
            witnesses,
            non_members,
            &[],
            removals,
            old_value,
            sk,
        )
    }

    /// Blind the witness point and `d` by `r`. The result verifies against the value
    /// scaled by the same `r`.
    pub fn randomize(&self, r: &Scalar) -> Self {
        Self {
            d: self.d * *r,
            c: self.c * *r,
        }
    }

    /// `d` followed by the compressed `C`
    pub fn to_bytes(&self) -> [u8; Self::BYTES] {
        let mut out = [0u8; Self::BYTES];
        out[..32].copy_from_slice(&self.d.to_be_bytes());
        out[32..].copy_from_slice(&self.c.to_compressed());
        out
    }

    /// Parse a witness written by `to_bytes`
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != Self::BYTES {
            return Err(AccumulatorError::InvalidBytes("non-membership witness length"));
        }
        Ok(Self {
            d: sc(&bytes[..32])?,
            c: g1(&bytes[32..])?,
        })
    }
}
