//! Positive accumulator, membership only. Section 2 and 3 of
//! <https://eprint.iacr.org/2020/777.pdf>
use crate::{
    accumulator::{AccumulatorValue, Element, Params, PublicKey, SecretKey},
    error::Result,
    persistence::{check_absent, check_present, check_removable, record, State},
    public_info::WitnessUpdatePublicInfo,
    witness::MembershipWitness,
};
use core::fmt::{self, Display, Formatter};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// The public view of a positive accumulator. Anyone can hold one to verify witnesses.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PositiveAccumulator(pub AccumulatorValue);

impl Display for PositiveAccumulator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "PositiveAccumulator {{ {} }}", self.0)
    }
}

impl PositiveAccumulator {
    /// An empty accumulator
    pub fn initialize(params: &Params) -> Self {
        Self(AccumulatorValue::initial(params))
    }

    /// Wrap a published value
    pub fn from_value(value: AccumulatorValue) -> Self {
        Self(value)
    }

    /// The current accumulated value
    pub fn value(&self) -> &AccumulatorValue {
        &self.0
    }

    /// Check a membership witness against the current value
    pub fn verify_membership(
        &self,
        member: &Element,
        witness: &MembershipWitness,
        pk: &PublicKey,
        params: &Params,
    ) -> bool {
        witness.verify(member, &self.0, pk, params)
    }
}

/// A positive accumulator together with the secret key that may change it.
///
/// The manager's own copy of the key is zeroized on drop. [`SecretKey`] is `Copy`, so
/// copies held by the caller must be cleared by the caller.
#[derive(Debug)]
pub struct PositiveAccumulatorManager {
    accumulator: PositiveAccumulator,
    secret_key: SecretKey,
}

impl Drop for PositiveAccumulatorManager {
    fn drop(&mut self) {
        self.secret_key.zeroize();
    }
}

impl PositiveAccumulatorManager {
    /// Start an empty accumulator
    pub fn new(params: &Params, secret_key: SecretKey) -> Self {
        Self::from_accumulator(PositiveAccumulator::initialize(params), secret_key)
    }

    /// Resume managing an existing accumulator
    pub fn from_accumulator(accumulator: PositiveAccumulator, secret_key: SecretKey) -> Self {
        Self {
            accumulator,
            secret_key,
        }
    }

    /// The public accumulator to publish
    pub fn accumulator(&self) -> &PositiveAccumulator {
        &self.accumulator
    }

    /// The current accumulated value
    pub fn value(&self) -> &AccumulatorValue {
        &self.accumulator.0
    }

    /// The value after adding `element`, without any checks
    pub fn compute_new_post_add(&self, element: &Element) -> AccumulatorValue {
        self.value().add(&self.secret_key, element)
    }

    /// The value after adding `elements`, without any checks
    pub fn compute_new_post_add_batch(&self, elements: &[Element]) -> AccumulatorValue {
        self.value().add_batch(&self.secret_key, elements)
    }

    /// The value after removing `element`, without any checks
    pub fn compute_new_post_remove(&self, element: &Element) -> Result<AccumulatorValue> {
        self.value().remove(&self.secret_key, element)
    }

    /// The value after removing `elements`, without any checks
    pub fn compute_new_post_remove_batch(&self, elements: &[Element]) -> Result<AccumulatorValue> {
        self.value().remove_batch(&self.secret_key, elements)
    }

    /// The value after a combined batch, without any checks
    pub fn compute_new_post_batch_updates(
        &self,
        additions: &[Element],
        removals: &[Element],
    ) -> Result<AccumulatorValue> {
        self.value().batch_updates(&self.secret_key, additions, removals)
    }

    /// Add a member
    pub fn add(&mut self, element: Element, state: Option<&mut dyn State>) -> Result<()> {
        check_absent(state.as_deref(), &[element])?;
        let value = self.compute_new_post_add(&element);
        self.accumulator.0 = value;
        record(state, &[element], &[]);
        log::debug!("positive accumulator: added 1 element");
        Ok(())
    }

    /// Add many members. Nothing changes if any of them is already present.
    pub fn add_batch(&mut self, elements: &[Element], state: Option<&mut dyn State>) -> Result<()> {
        check_absent(state.as_deref(), elements)?;
        let value = self.compute_new_post_add_batch(elements);
        self.accumulator.0 = value;
        record(state, elements, &[]);
        log::debug!("positive accumulator: added {} elements", elements.len());
        Ok(())
    }

    /// Remove a member
    pub fn remove(&mut self, element: &Element, state: Option<&mut dyn State>) -> Result<()> {
        check_removable(state.as_deref(), &[*element])?;
        let value = self.compute_new_post_remove(element)?;
        self.accumulator.0 = value;
        record(state, &[], &[*element]);
        log::debug!("positive accumulator: removed 1 element");
        Ok(())
    }

    /// Remove many members. Nothing changes if any of them is absent.
    pub fn remove_batch(
        &mut self,
        elements: &[Element],
        state: Option<&mut dyn State>,
    ) -> Result<()> {
        check_removable(state.as_deref(), elements)?;
        let value = self.compute_new_post_remove_batch(elements)?;
        self.accumulator.0 = value;
        record(state, &[], elements);
        log::debug!("positive accumulator: removed {} elements", elements.len());
        Ok(())
    }

    /// Add and remove in a single update of the value
    pub fn batch_updates(
        &mut self,
        additions: &[Element],
        removals: &[Element],
        state: Option<&mut dyn State>,
    ) -> Result<()> {
        check_absent(state.as_deref(), additions)?;
        check_removable(state.as_deref(), removals)?;
        let value = self.compute_new_post_batch_updates(additions, removals)?;
        self.accumulator.0 = value;
        record(state, additions, removals);
        log::debug!(
            "positive accumulator: batch of {} additions and {} removals",
            additions.len(),
            removals.len()
        );
        Ok(())
    }

    /// Like [`Self::batch_updates`] but also returns the info holders need to follow the batch
    pub fn batch_updates_with_public_info(
        &mut self,
        additions: &[Element],
        removals: &[Element],
        state: Option<&mut dyn State>,
    ) -> Result<WitnessUpdatePublicInfo> {
        check_absent(state.as_deref(), additions)?;
        check_removable(state.as_deref(), removals)?;
        let info = self.witness_update_info(additions, removals)?;
        self.batch_updates(additions, removals, state)?;
        Ok(info)
    }

    /// The info for a batch about to be applied to the current value
    pub fn witness_update_info(
        &self,
        additions: &[Element],
        removals: &[Element],
    ) -> Result<WitnessUpdatePublicInfo> {
        WitnessUpdatePublicInfo::new(self.value(), additions, removals, &self.secret_key)
    }

    /// Witness for a current member
    pub fn membership_witness(
        &self,
        member: &Element,
        state: Option<&dyn State>,
    ) -> Result<MembershipWitness> {
        check_present(state, &[*member])?;
        log::trace!("positive accumulator: membership witness");
        MembershipWitness::new(member, self.value(), &self.secret_key)
    }

    /// Witnesses for many members using one inversion
    pub fn membership_witnesses_for_batch(
        &self,
        members: &[Element],
        state: Option<&dyn State>,
    ) -> Result<Vec<MembershipWitness>> {
        check_present(state, members)?;
        log::trace!("positive accumulator: {} membership witnesses", members.len());
        Ok(self
            .value()
            .membership_witness_points(&self.secret_key, members)?
            .into_iter()
            .map(MembershipWitness)
            .collect())
    }

    /// Manager side update of many witnesses across a batch that was applied to `old_value`
    pub fn update_witnesses_post_batch_updates(
        &self,
        witnesses: &[MembershipWitness],
        members: &[Element],
        additions: &[Element],
        removals: &[Element],
        old_value: &AccumulatorValue,
    ) -> Result<Vec<MembershipWitness>> {
        MembershipWitness::update_multiple_post_batch_updates(
            witnesses,
            members,
            additions,
            removals,
            old_value,
            &self.secret_key,
        )
    }

    /// Check a membership witness against the current value
    pub fn verify_membership(
        &self,
        member: &Element,
        witness: &MembershipWitness,
        pk: &PublicKey,
        params: &Params,
    ) -> bool {
        self.accumulator.verify_membership(member, witness, pk, params)
    }
}
