use super::{KbMembershipWitness, KbNonMembershipWitness};
use crate::{
    accumulator::{
        utils::{g1, invert},
        AccumulatorValue, Element, Omega, Params, PublicKey, SecretKey,
    },
    error::{AccumulatorError, Result},
    persistence::{
        check_absent, check_outside_domain, check_present, check_removable, record,
        KbUniversalState,
    },
    public_info::{
        KbBothWitnessUpdateInfo, KbMembershipWitnessUpdateInfo, KbNonMembershipWitnessUpdateInfo,
    },
    witness::MembershipWitness,
};
use blsful::inner_types::*;
use core::fmt::{self, Display, Formatter};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

/// The pair of accumulated values. Every domain element is in exactly one of them.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct KbUniversalValue {
    /// Accumulates the members
    pub mem: AccumulatorValue,
    /// Accumulates the domain elements that are not members
    pub non_mem: AccumulatorValue,
}

#[derive(Serialize)]
struct KbValueRecordRef<'a> {
    #[serde(with = "serde_bytes")]
    mem: &'a [u8],
    #[serde(with = "serde_bytes")]
    non_mem: &'a [u8],
}

#[derive(Deserialize)]
struct KbValueRecord {
    #[serde(with = "serde_bytes")]
    mem: Vec<u8>,
    #[serde(with = "serde_bytes")]
    non_mem: Vec<u8>,
}

impl Serialize for KbUniversalValue {
    fn serialize<S: Serializer>(&self, s: S) -> core::result::Result<S::Ok, S::Error> {
        let mem = self.mem.to_bytes();
        let non_mem = self.non_mem.to_bytes();
        KbValueRecordRef {
            mem: &mem,
            non_mem: &non_mem,
        }
        .serialize(s)
    }
}

impl<'de> Deserialize<'de> for KbUniversalValue {
    fn deserialize<D: Deserializer<'de>>(d: D) -> core::result::Result<Self, D::Error> {
        let record = KbValueRecord::deserialize(d)?;
        Ok(Self {
            mem: AccumulatorValue(g1(&record.mem).map_err(serde::de::Error::custom)?),
            non_mem: AccumulatorValue(g1(&record.non_mem).map_err(serde::de::Error::custom)?),
        })
    }
}

impl Display for KbUniversalValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "KbUniversalValue {{ mem: {}, non_mem: {} }}",
            self.mem, self.non_mem
        )
    }
}

impl TryFrom<&[u8; 96]> for KbUniversalValue {
    type Error = AccumulatorError;

    fn try_from(value: &[u8; 96]) -> Result<Self> {
        Self::from_bytes(value)
    }
}

impl KbUniversalValue {
    /// The number of bytes in the pair
    pub const BYTES: usize = 96;

    /// `mem` followed by `non_mem`, both compressed
    pub fn to_bytes(&self) -> [u8; Self::BYTES] {
        let mut out = [0u8; Self::BYTES];
        out[..48].copy_from_slice(&self.mem.to_bytes());
        out[48..].copy_from_slice(&self.non_mem.to_bytes());
        out
    }

    /// Parse a pair written by `to_bytes`
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != Self::BYTES {
            return Err(AccumulatorError::InvalidBytes("kb universal value length"));
        }
        Ok(Self {
            mem: AccumulatorValue::from_bytes(&bytes[..48])?,
            non_mem: AccumulatorValue::from_bytes(&bytes[48..])?,
        })
    }
}

/// The public view of a KB-universal accumulator
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct KbUniversalAccumulator(pub KbUniversalValue);

impl Display for KbUniversalAccumulator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "KbUniversalAccumulator {{ {} }}", self.0)
    }
}

impl KbUniversalAccumulator {
    /// Wrap a published value
    pub fn from_value(value: KbUniversalValue) -> Self {
        Self(value)
    }

    /// Both accumulated values
    pub fn value(&self) -> &KbUniversalValue {
        &self.0
    }

    /// The member side
    pub fn mem_value(&self) -> &AccumulatorValue {
        &self.0.mem
    }

    /// The non-member side
    pub fn non_mem_value(&self) -> &AccumulatorValue {
        &self.0.non_mem
    }

    /// Check a membership witness against the member side
    pub fn verify_membership(
        &self,
        member: &Element,
        witness: &KbMembershipWitness,
        pk: &PublicKey,
        params: &Params,
    ) -> bool {
        witness.verify(member, &self.0, pk, params)
    }

    /// Check a non-membership witness against the non-member side
    pub fn verify_non_membership(
        &self,
        non_member: &Element,
        witness: &KbNonMembershipWitness,
        pk: &PublicKey,
        params: &Params,
    ) -> bool {
        witness.verify(non_member, &self.0, pk, params)
    }
}

/// A KB-universal accumulator together with the secret key that may change it.
/// Only the manager's own copy of the key is zeroized on drop.
#[derive(Debug)]
pub struct KbUniversalAccumulatorManager {
    accumulator: KbUniversalAccumulator,
    secret_key: SecretKey,
}

impl Drop for KbUniversalAccumulatorManager {
    fn drop(&mut self) {
        self.secret_key.zeroize();
    }
}

impl KbUniversalAccumulatorManager {
    /// Start with every element of `domain` a non-member. The domain is recorded in `state`.
    pub fn initialize(
        params: &Params,
        secret_key: SecretKey,
        domain: &[Element],
        state: Option<&mut dyn KbUniversalState>,
    ) -> Self {
        let mut manager = Self::initialize_empty(params, secret_key);
        manager.accumulator.0.non_mem = manager
            .accumulator
            .0
            .non_mem
            .add_batch(&manager.secret_key, domain);
        if let Some(state) = state {
            for e in domain {
                state.add_to_domain(*e);
            }
        }
        log::debug!(
            "kb universal accumulator: initialized with a domain of {} elements",
            domain.len()
        );
        manager
    }

    /// Start with an empty domain
    pub fn initialize_empty(params: &Params, secret_key: SecretKey) -> Self {
        let empty = AccumulatorValue::initial(params);
        Self::from_accumulator(
            KbUniversalAccumulator(KbUniversalValue {
                mem: empty,
                non_mem: empty,
            }),
            secret_key,
        )
    }

    /// Resume managing an existing accumulator
    pub fn from_accumulator(accumulator: KbUniversalAccumulator, secret_key: SecretKey) -> Self {
        Self {
            accumulator,
            secret_key,
        }
    }

    /// The public accumulator to publish
    pub fn accumulator(&self) -> &KbUniversalAccumulator {
        &self.accumulator
    }

    /// Both accumulated values
    pub fn value(&self) -> &KbUniversalValue {
        &self.accumulator.0
    }

    fn check_in_domain<S>(state: Option<&S>, elements: &[Element]) -> Result<()>
    where
        S: KbUniversalState + ?Sized,
    {
        if let Some(state) = state {
            if elements.iter().any(|e| !state.in_domain(e)) {
                log::warn!("kb universal accumulator: rejected an element outside the domain");
                return Err(AccumulatorError::ElementNotAcceptable);
            }
        }
        Ok(())
    }

    fn moved(&self, into_mem: Scalar) -> Result<KbUniversalValue> {
        Ok(KbUniversalValue {
            mem: self.value().mem.scale(into_mem),
            non_mem: self.value().non_mem.scale(invert(into_mem)?),
        })
    }

    /// The value after adding `element`, without any checks
    pub fn compute_new_post_add(&self, element: &Element) -> Result<KbUniversalValue> {
        self.moved(element.0 + self.secret_key.0)
    }

    /// The value after adding `elements`, without any checks
    pub fn compute_new_post_add_batch(&self, elements: &[Element]) -> Result<KbUniversalValue> {
        self.moved(self.secret_key.batch_additions(elements))
    }

    /// The value after removing `element`, without any checks
    pub fn compute_new_post_remove(&self, element: &Element) -> Result<KbUniversalValue> {
        self.moved(invert(element.0 + self.secret_key.0)?)
    }

    /// The value after removing `elements`, without any checks
    pub fn compute_new_post_remove_batch(
        &self,
        elements: &[Element],
    ) -> Result<KbUniversalValue> {
        self.moved(self.secret_key.batch_deletions(elements)?)
    }

    /// The value after a combined batch, without any checks
    pub fn compute_new_post_batch_updates(
        &self,
        additions: &[Element],
        removals: &[Element],
    ) -> Result<KbUniversalValue> {
        self.moved(self.secret_key.batch_factor(additions, removals)?)
    }

    /// The value after growing the domain by `new_elements`, without any checks
    pub fn compute_extended(&self, new_elements: &[Element]) -> KbUniversalValue {
        KbUniversalValue {
            mem: self.value().mem,
            non_mem: self.value().non_mem.add_batch(&self.secret_key, new_elements),
        }
    }

    /// Add a member
    pub fn add(
        &mut self,
        element: Element,
        state: Option<&mut dyn KbUniversalState>,
    ) -> Result<()> {
        self.add_batch(&[element], state)
    }

    /// Add many members. Nothing changes if any of them is outside the domain or present.
    pub fn add_batch(
        &mut self,
        elements: &[Element],
        state: Option<&mut dyn KbUniversalState>,
    ) -> Result<()> {
        Self::check_in_domain(state.as_deref(), elements)?;
        check_absent(state.as_deref(), elements)?;
        let value = self.compute_new_post_add_batch(elements)?;
        self.accumulator.0 = value;
        record(state, elements, &[]);
        log::debug!("kb universal accumulator: added {} elements", elements.len());
        Ok(())
    }

    /// Remove a member
    pub fn remove(
        &mut self,
        element: &Element,
        state: Option<&mut dyn KbUniversalState>,
    ) -> Result<()> {
        self.remove_batch(&[*element], state)
    }

    /// Remove many members. Nothing changes if any of them is outside the domain or absent.
    pub fn remove_batch(
        &mut self,
        elements: &[Element],
        state: Option<&mut dyn KbUniversalState>,
    ) -> Result<()> {
        Self::check_in_domain(state.as_deref(), elements)?;
        check_removable(state.as_deref(), elements)?;
        let value = self.compute_new_post_remove_batch(elements)?;
        self.accumulator.0 = value;
        record(state, &[], elements);
        log::debug!(
            "kb universal accumulator: removed {} elements",
            elements.len()
        );
        Ok(())
    }

    /// Add and remove in a single update of both values
    pub fn batch_updates(
        &mut self,
        additions: &[Element],
        removals: &[Element],
        state: Option<&mut dyn KbUniversalState>,
    ) -> Result<()> {
        Self::check_in_domain(state.as_deref(), additions)?;
        Self::check_in_domain(state.as_deref(), removals)?;
        check_absent(state.as_deref(), additions)?;
        check_removable(state.as_deref(), removals)?;
        let value = self.compute_new_post_batch_updates(additions, removals)?;
        self.accumulator.0 = value;
        record(state, additions, removals);
        log::debug!(
            "kb universal accumulator: batch of {} additions and {} removals",
            additions.len(),
            removals.len()
        );
        Ok(())
    }

    /// Like [`Self::batch_updates`] but also returns the info both kinds of witness
    /// holders need to follow the batch
    pub fn batch_updates_with_public_info(
        &mut self,
        additions: &[Element],
        removals: &[Element],
        state: Option<&mut dyn KbUniversalState>,
    ) -> Result<KbBothWitnessUpdateInfo> {
        Self::check_in_domain(state.as_deref(), additions)?;
        Self::check_in_domain(state.as_deref(), removals)?;
        check_absent(state.as_deref(), additions)?;
        check_removable(state.as_deref(), removals)?;
        let info = self.witness_update_info_for_both(additions, removals)?;
        self.batch_updates(additions, removals, state)?;
        Ok(info)
    }

    /// Grow the domain. New elements start as non-members, membership witnesses stay
    /// valid and non-membership witnesses must follow the extension.
    pub fn extend(
        &mut self,
        new_elements: &[Element],
        state: Option<&mut dyn KbUniversalState>,
    ) -> Result<()> {
        check_outside_domain(state.as_deref(), new_elements)?;
        let value = self.compute_extended(new_elements);
        self.accumulator.0 = value;
        if let Some(state) = state {
            for e in new_elements {
                state.add_to_domain(*e);
            }
        }
        log::debug!(
            "kb universal accumulator: domain extended by {} elements",
            new_elements.len()
        );
        Ok(())
    }

    /// Like [`Self::extend`] but also returns the info non-membership witness holders need
    pub fn extend_with_public_info(
        &mut self,
        new_elements: &[Element],
        state: Option<&mut dyn KbUniversalState>,
    ) -> Result<KbNonMembershipWitnessUpdateInfo> {
        check_outside_domain(state.as_deref(), new_elements)?;
        let info = self.witness_update_info_on_domain_extension(new_elements)?;
        self.extend(new_elements, state)?;
        Ok(info)
    }

    /// Info for membership witnesses, for a batch about to be applied
    pub fn witness_update_info_for_membership_witness(
        &self,
        additions: &[Element],
        removals: &[Element],
    ) -> Result<KbMembershipWitnessUpdateInfo> {
        Omega::new(additions, removals, &self.value().mem, &self.secret_key)
            .map(KbMembershipWitnessUpdateInfo)
    }

    /// Info for non-membership witnesses, for a batch about to be applied
    pub fn witness_update_info_for_non_membership_witness(
        &self,
        additions: &[Element],
        removals: &[Element],
    ) -> Result<KbNonMembershipWitnessUpdateInfo> {
        Omega::new(removals, additions, &self.value().non_mem, &self.secret_key)
            .map(KbNonMembershipWitnessUpdateInfo)
    }

    /// Both infos for a batch about to be applied
    pub fn witness_update_info_for_both(
        &self,
        additions: &[Element],
        removals: &[Element],
    ) -> Result<KbBothWitnessUpdateInfo> {
        Ok(KbBothWitnessUpdateInfo {
            membership: self.witness_update_info_for_membership_witness(additions, removals)?,
            non_membership: self
                .witness_update_info_for_non_membership_witness(additions, removals)?,
        })
    }

    /// Info for non-membership witnesses, for a domain extension about to be applied
    pub fn witness_update_info_on_domain_extension(
        &self,
        new_elements: &[Element],
    ) -> Result<KbNonMembershipWitnessUpdateInfo> {
        Omega::new(new_elements, &[], &self.value().non_mem, &self.secret_key)
            .map(KbNonMembershipWitnessUpdateInfo)
    }

    /// Witness for a current member
    pub fn membership_witness(
        &self,
        member: &Element,
        state: Option<&dyn KbUniversalState>,
    ) -> Result<KbMembershipWitness> {
        Ok(self.membership_witnesses_for_batch(&[*member], state)?[0])
    }

    /// Witnesses for many members using one inversion
    pub fn membership_witnesses_for_batch(
        &self,
        members: &[Element],
        state: Option<&dyn KbUniversalState>,
    ) -> Result<Vec<KbMembershipWitness>> {
        Self::check_in_domain(state, members)?;
        check_present(state, members)?;
        log::trace!(
            "kb universal accumulator: {} membership witnesses",
            members.len()
        );
        Ok(self
            .value()
            .mem
            .membership_witness_points(&self.secret_key, members)?
            .into_iter()
            .map(|c| KbMembershipWitness(MembershipWitness(c)))
            .collect())
    }

    /// Witness for a domain element that is not a member
    pub fn non_membership_witness(
        &self,
        non_member: &Element,
        state: Option<&dyn KbUniversalState>,
    ) -> Result<KbNonMembershipWitness> {
        Ok(self.non_membership_witnesses_for_batch(&[*non_member], state)?[0])
    }

    /// Witnesses for many non-members using one inversion
    pub fn non_membership_witnesses_for_batch(
        &self,
        non_members: &[Element],
        state: Option<&dyn KbUniversalState>,
    ) -> Result<Vec<KbNonMembershipWitness>> {
        Self::check_in_domain(state, non_members)?;
        check_absent(state, non_members)?;
        log::trace!(
            "kb universal accumulator: {} non-membership witnesses",
            non_members.len()
        );
        Ok(self
            .value()
            .non_mem
            .membership_witness_points(&self.secret_key, non_members)?
            .into_iter()
            .map(|c| KbNonMembershipWitness(MembershipWitness(c)))
            .collect())
    }

    /// Manager side update of many membership witnesses across a batch applied to `old_value`
    pub fn update_membership_witnesses_post_batch_updates(
        &self,
        witnesses: &[KbMembershipWitness],
        members: &[Element],
        additions: &[Element],
        removals: &[Element],
        old_value: &KbUniversalValue,
    ) -> Result<Vec<KbMembershipWitness>> {
        KbMembershipWitness::update_multiple_post_batch_updates(
            witnesses,
            members,
            additions,
            removals,
            old_value,
            &self.secret_key,
        )
    }

    /// Manager side update of many non-membership witnesses across a batch applied to `old_value`
    pub fn update_non_membership_witnesses_post_batch_updates(
        &self,
        witnesses: &[KbNonMembershipWitness],
        non_members: &[Element],
        additions: &[Element],
        removals: &[Element],
        old_value: &KbUniversalValue,
    ) -> Result<Vec<KbNonMembershipWitness>> {
        KbNonMembershipWitness::update_multiple_post_batch_updates(
            witnesses,
            non_members,
            additions,
            removals,
            old_value,
            &self.secret_key,
        )
    }

    /// Manager side update of many non-membership witnesses across a domain extension
    pub fn update_non_membership_witnesses_post_domain_extension(
        &self,
        witnesses: &[KbNonMembershipWitness],
        non_members: &[Element],
        new_elements: &[Element],
        old_value: &KbUniversalValue,
    ) -> Result<Vec<KbNonMembershipWitness>> {
        KbNonMembershipWitness::update_multiple_post_domain_extension(
            witnesses,
            non_members,
            new_elements,
            old_value,
            &self.secret_key,
        )
    }

    /// Check a membership witness against the member side
    pub fn verify_membership(
        &self,
        member: &Element,
        witness: &KbMembershipWitness,
        pk: &PublicKey,
        params: &Params,
    ) -> bool {
        self.accumulator.verify_membership(member, witness, pk, params)
    }

    /// Check a non-membership witness against the non-member side
    pub fn verify_non_membership(
        &self,
        non_member: &Element,
        witness: &KbNonMembershipWitness,
        pk: &PublicKey,
        params: &Params,
    ) -> bool {
        self.accumulator
            .verify_non_membership(non_member, witness, pk, params)
    }
}
