use super::KbUniversalValue;
use crate::{
    accumulator::{AccumulatorValue, Element, Params, PublicKey, SecretKey},
    error::Result,
    public_info::{KbMembershipWitnessUpdateInfo, KbNonMembershipWitnessUpdateInfo},
    witness::MembershipWitness,
};
use core::fmt::{self, Display, Formatter};

/// Membership witness in the member accumulator
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct KbMembershipWitness(pub MembershipWitness);

/// Membership witness in the non-member accumulator
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct KbNonMembershipWitness(pub MembershipWitness);

serde_value_record!(KbMembershipWitness);
serde_value_record!(KbNonMembershipWitness);

impl Display for KbMembershipWitness {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "KbMembershipWitness {{ {} }}", self.0 .0)
    }
}

impl Display for KbNonMembershipWitness {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "KbNonMembershipWitness {{ {} }}", self.0 .0)
    }
}

impl KbMembershipWitness {
    /// The number of bytes in the witness
    pub const BYTES: usize = MembershipWitness::BYTES;

    /// Check the witness against the member side of `value`
    pub fn verify(
        &self,
        member: &Element,
        value: &KbUniversalValue,
        pk: &PublicKey,
        params: &Params,
    ) -> bool {
        self.0.verify(member, &value.mem, pk, params)
    }

    /// Follow the addition of `addition`. `old_value` is the value before the addition.
    pub fn update_post_add(
        &self,
        member: &Element,
        addition: &Element,
        old_value: &KbUniversalValue,
    ) -> Self {
        Self(self.0.update_post_add(member, addition, &old_value.mem))
    }

    /// Follow the removal of `removal`. `new_value` is the value after the removal.
    pub fn update_post_remove(
        &self,
        member: &Element,
        removal: &Element,
        new_value: &KbUniversalValue,
    ) -> Result<Self> {
        self.0
            .update_post_remove(member, removal, &new_value.mem)
            .map(Self)
    }

    /// Move the witness across one batch using the published info
    pub fn update_using_public_info_after_batch_update(
        &self,
        member: &Element,
        additions: &[Element],
        removals: &[Element],
        info: &KbMembershipWitnessUpdateInfo,
    ) -> Result<Self> {
        self.0
            .update_using_omega(member, additions, removals, &info.0)
            .map(Self)
    }

    /// Move the witness across consecutive batches, in the order they were applied
    pub fn update_using_public_info_after_multiple_batch_updates(
        &self,
        member: &Element,
        additions: &[Vec<Element>],
        removals: &[Vec<Element>],
        infos: &[KbMembershipWitnessUpdateInfo],
    ) -> Result<Self> {
        let omegas = infos.iter().map(|i| &i.0).collect::<Vec<_>>();
        self.0
            .update_using_omegas(member, additions, removals, &omegas)
            .map(Self)
    }

    /// Manager side update of many witnesses after a batch applied to `old_value`
    pub fn update_multiple_post_batch_updates(
        witnesses: &[Self],
        members: &[Element],
        additions: &[Element],
        removals: &[Element],
        old_value: &KbUniversalValue,
        sk: &SecretKey,
    ) -> Result<Vec<Self>> {
        let inner = witnesses.iter().map(|w| w.0).collect::<Vec<_>>();
        let updated = MembershipWitness::update_multiple_post_batch_updates(
            &inner,
            members,
            additions,
            removals,
            &old_value.mem,
            sk,
        )?;
        Ok(updated.into_iter().map(Self).collect())
    }

    /// The compressed witness point
    pub fn to_bytes(&self) -> [u8; Self::BYTES] {
        self.0.to_bytes()
    }

    /// Parse a witness from its compressed point
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        MembershipWitness::from_bytes(bytes).map(Self)
    }
}

// Adding to the KB accumulator removes from the non-member side and removing adds to it,
// so every update below runs the opposite positive update.
impl KbNonMembershipWitness {
    /// The number of bytes in the witness
    pub const BYTES: usize = MembershipWitness::BYTES;

    /// Check the witness against the non-member side of `value`
    pub fn verify(
        &self,
        non_member: &Element,
        value: &KbUniversalValue,
        pk: &PublicKey,
        params: &Params,
    ) -> bool {
        self.0.verify(non_member, &value.non_mem, pk, params)
    }

    /// Follow the addition of `addition`. `new_value` is the value **after** the addition
    /// since the addition removes `addition` from the non-member side.
    pub fn update_post_add(
        &self,
        non_member: &Element,
        addition: &Element,
        new_value: &KbUniversalValue,
    ) -> Result<Self> {
        self.0
            .update_post_remove(non_member, addition, &new_value.non_mem)
            .map(Self)
    }

    /// Follow the removal of `removal`. `old_value` is the value **before** the removal
    /// since the removal adds `removal` to the non-member side.
    pub fn update_post_remove(
        &self,
        non_member: &Element,
        removal: &Element,
        old_value: &KbUniversalValue,
    ) -> Self {
        Self(self.0.update_post_add(non_member, removal, &old_value.non_mem))
    }

    /// Move the witness across one batch using the published info
    pub fn update_using_public_info_after_batch_update(
        &self,
        non_member: &Element,
        additions: &[Element],
        removals: &[Element],
        info: &KbNonMembershipWitnessUpdateInfo,
    ) -> Result<Self> {
        self.0
            .update_using_omega(non_member, removals, additions, &info.0)
            .map(Self)
    }

    /// Move the witness across consecutive batches, in the order they were applied
    pub fn update_using_public_info_after_multiple_batch_updates(
        &self,
        non_member: &Element,
        additions: &[Vec<Element>],
        removals: &[Vec<Element>],
        infos: &[KbNonMembershipWitnessUpdateInfo],
    ) -> Result<Self> {
        let omegas = infos.iter().map(|i| &i.0).collect::<Vec<_>>();
        self.0
            .update_using_omegas(non_member, removals, additions, &omegas)
            .map(Self)
    }

    /// Move the witness across a domain extension by `new_elements`
    pub fn update_using_public_info_after_domain_extension(
        &self,
        non_member: &Element,
        new_elements: &[Element],
        info: &KbNonMembershipWitnessUpdateInfo,
    ) -> Result<Self> {
        self.0
            .update_using_omega(non_member, new_elements, &[], &info.0)
            .map(Self)
    }

    /// Move the witness across consecutive domain extensions, in the order they were applied
    pub fn update_using_public_info_after_multiple_domain_extensions(
        &self,
        non_member: &Element,
        new_elements: &[Vec<Element>],
        infos: &[KbNonMembershipWitnessUpdateInfo],
    ) -> Result<Self> {
        let omegas = infos.iter().map(|i| &i.0).collect::<Vec<_>>();
        let nothing = vec![Vec::new(); new_elements.len()];
        self.0
            .update_using_omegas(non_member, new_elements, &nothing, &omegas)
            .map(Self)
    }

    /// Manager side update of many witnesses after a batch applied to `old_value`
    pub fn update_multiple_post_batch_updates(
        witnesses: &[Self],
        non_members: &[Element],
        additions: &[Element],
        removals: &[Element],
        old_value: &KbUniversalValue,
        sk: &SecretKey,
    ) -> Result<Vec<Self>> {
        Self::update_non_member_side(
            witnesses,
            non_members,
            removals,
            additions,
            &old_value.non_mem,
            sk,
        )
    }

    /// Manager side update of many witnesses after extending the domain of `old_value`
    pub fn update_multiple_post_domain_extension(
        witnesses: &[Self],
        non_members: &[Element],
        new_elements: &[Element],
        old_value: &KbUniversalValue,
        sk: &SecretKey,
    ) -> Result<Vec<Self>> {
        Self::update_non_member_side(
            witnesses,
            non_members,
            new_elements,
            &[],
            &old_value.non_mem,
            sk,
        )
    }

    fn update_non_member_side(
        witnesses: &[Self],
        non_members: &[Element],
        added: &[Element],
        removed: &[Element],
        old_non_mem: &AccumulatorValue,
        sk: &SecretKey,
    ) -> Result<Vec<Self>> {
        let inner = witnesses.iter().map(|w| w.0).collect::<Vec<_>>();
        let updated = MembershipWitness::update_multiple_post_batch_updates(
            &inner,
            non_members,
            added,
            removed,
            old_non_mem,
            sk,
        )?;
        Ok(updated.into_iter().map(Self).collect())
    }

    /// The compressed witness point
    pub fn to_bytes(&self) -> [u8; Self::BYTES] {
        self.0.to_bytes()
    }

    /// Parse a witness from its compressed point
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        MembershipWitness::from_bytes(bytes).map(Self)
    }
}
