//! Universal accumulator supporting membership and non-membership witnesses,
//! section 2 of <https://eprint.iacr.org/2020/777.pdf>.
//!
//! Initialization accumulates a set of reserved elements so that `f_V` has enough roots
//! to keep non-membership witnesses unforgeable. Those elements are kept in an
//! [`InitialElementsStore`] owned by the manager and can never be added, removed or
//! given a witness.
use crate::{
    accumulator::{
        utils::{batch_invert, cfg_map, invert, scalar_from_decimal, sc},
        AccumulatorValue, Element, Params, PublicKey, SecretKey,
    },
    error::{AccumulatorError, Result},
    persistence::{
        check_absent, check_present, check_removable, record, InitialElementsStore, State,
        UniversalState,
    },
    public_info::WitnessUpdatePublicInfo,
    witness::{MembershipWitness, NonMembershipWitness},
};
use blsful::inner_types::*;
use core::fmt::{self, Display, Formatter};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// Curve-fixed BLS12-381 scalars accumulated by every universal accumulator at
/// initialization, in addition to the random ones
const FIXED_INITIAL_ELEMENTS: [&str; 12] = [
    "45910016902681717864896679571072475294322032934598173703909760003353935933116",
    "52435875175126190479447740508185965837461563690374988244538805122978187051009",
    "37533245345601403256813828457599989378570083626066733924633634395813390498968",
    "42939921189405567213077474811229290751859625183971855670316936332150258841064",
    "24518586603007977414467141059720982525773565200609287602828525318350257240104",
    "7068825200903980455640497218918153984634398014009947999387811699166394755973",
    "11099127048999275356047760994759979338510697874908724576763630115325423199983",
    "16206340973491634074300543581824154688167728015112494212742147729096110011734",
    "33548451850986140156856751094473866810332892843047892283310584582447242129372",
    "41579556168512365951196638111110702956139037360820703075545264197188086371151",
    "40391639477853709172194404305481070941088466966694331713706272464526707697647",
    "901256629686847939547008227790605515020395723603584292339910499590411164006",
];

/// The reserved elements every universal accumulator starts with
pub fn fixed_initial_elements() -> Vec<Element> {
    FIXED_INITIAL_ELEMENTS
        .iter()
        .map(|d| Element(scalar_from_decimal(d)))
        .collect()
}

/// `d = (member_0 - y) * (member_1 - y) * ... * (member_n - y)` for a non-member `y`.
/// Products over disjoint chunks of members multiply together.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct MemberProduct(pub Scalar);

serde_value_record!(MemberProduct);

impl Default for MemberProduct {
    fn default() -> Self {
        Self(Scalar::ONE)
    }
}

impl MemberProduct {
    /// The number of bytes in a member product
    pub const BYTES: usize = 32;

    /// Big-endian bytes
    pub fn to_bytes(&self) -> [u8; Self::BYTES] {
        self.0.to_be_bytes()
    }

    /// Parse from big-endian bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        sc(bytes).map(Self)
    }
}

/// The public view of a universal accumulator
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct UniversalAccumulator {
    value: AccumulatorValue,
    max_size: u64,
}

impl Display for UniversalAccumulator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "UniversalAccumulator {{ value: {}, max_size: {} }}",
            self.value, self.max_size
        )
    }
}

impl UniversalAccumulator {
    /// Wrap a published value
    pub fn from_value(value: AccumulatorValue, max_size: u64) -> Self {
        Self { value, max_size }
    }

    /// The current accumulated value
    pub fn value(&self) -> &AccumulatorValue {
        &self.value
    }

    /// The size bound fixed at initialization. It sets how many random initial elements
    /// were accumulated and is not checked when members are added.
    pub fn max_size(&self) -> u64 {
        self.max_size
    }

    /// Check a membership witness against the current value
    pub fn verify_membership(
        &self,
        member: &Element,
        witness: &MembershipWitness,
        pk: &PublicKey,
        params: &Params,
    ) -> bool {
        witness.verify(member, &self.value, pk, params)
    }

    /// Check a non-membership witness against the current value
    pub fn verify_non_membership(
        &self,
        non_member: &Element,
        witness: &NonMembershipWitness,
        pk: &PublicKey,
        params: &Params,
    ) -> bool {
        witness.verify(non_member, &self.value, pk, params)
    }
}

/// A universal accumulator together with its secret key, the secret `f_V` and the
/// store of reserved initial elements. The key and `f_V` held here are cleared on drop,
/// other copies of the key are not.
#[derive(Debug)]
pub struct UniversalAccumulatorManager<I: InitialElementsStore> {
    accumulator: UniversalAccumulator,
    params: Params,
    f_v: Scalar,
    secret_key: SecretKey,
    initial_elements: I,
    fixed_initial_elements: Vec<Element>,
    batch_size: usize,
}

impl<I: InitialElementsStore> Drop for UniversalAccumulatorManager<I> {
    fn drop(&mut self) {
        self.secret_key.zeroize();
        self.f_v = Scalar::ZERO;
    }
}

impl<I: InitialElementsStore> UniversalAccumulatorManager<I> {
    /// Create a new accumulator. The fixed initial elements and `max_size + 1` random
    /// elements are written to `initial_elements` and folded into `f_V`, `batch_size`
    /// at a time.
    pub fn initialize(
        params: &Params,
        secret_key: SecretKey,
        max_size: u64,
        mut initial_elements: I,
        batch_size: usize,
    ) -> Self {
        let batch_size = batch_size.max(1);
        let fixed = fixed_initial_elements();
        let mut f_v = Scalar::ONE;
        for chunk in fixed.chunks(batch_size) {
            f_v *= Self::compute_initial_f_v(chunk, &secret_key);
            for e in chunk {
                initial_elements.add(*e);
            }
        }

        let mut remaining = max_size.saturating_add(1);
        while remaining > 0 {
            let n = remaining.min(batch_size as u64);
            let chunk = (0..n).map(|_| Element::random()).collect::<Vec<_>>();
            f_v *= Self::compute_initial_f_v(&chunk, &secret_key);
            for e in chunk {
                initial_elements.add(e);
            }
            remaining -= n;
        }
        log::debug!(
            "universal accumulator: initialized with {} reserved elements",
            (fixed.len() as u64).saturating_add(max_size).saturating_add(1)
        );
        Self::initialize_given_f_v(f_v, params, secret_key, max_size, initial_elements, batch_size)
    }

    /// Create a new accumulator when `f_V` was computed elsewhere, for example with
    /// [`Self::compute_initial_f_v`] over chunks of a store that is already populated
    pub fn initialize_given_f_v(
        f_v: Scalar,
        params: &Params,
        secret_key: SecretKey,
        max_size: u64,
        initial_elements: I,
        batch_size: usize,
    ) -> Self {
        Self {
            accumulator: UniversalAccumulator {
                value: AccumulatorValue(params.p * f_v),
                max_size,
            },
            params: *params,
            f_v,
            secret_key,
            initial_elements,
            fixed_initial_elements: fixed_initial_elements(),
            batch_size: batch_size.max(1),
        }
    }

    /// `(e_0 + alpha) * (e_1 + alpha) * ...`. Results for disjoint chunks multiply together.
    pub fn compute_initial_f_v(elements: &[Element], secret_key: &SecretKey) -> Scalar {
        secret_key.batch_additions(elements)
    }

    /// The public accumulator to publish
    pub fn accumulator(&self) -> &UniversalAccumulator {
        &self.accumulator
    }

    /// The current accumulated value
    pub fn value(&self) -> &AccumulatorValue {
        &self.accumulator.value
    }

    /// The reserved element store
    pub fn initial_elements(&self) -> &I {
        &self.initial_elements
    }

    /// False for the reserved initial elements. The fixed ones are rejected even when
    /// the store does not hold them.
    pub fn is_element_acceptable(&self, element: &Element) -> bool {
        !self.fixed_initial_elements.contains(element) && !self.initial_elements.has(element)
    }

    fn check_acceptable(&self, elements: &[Element]) -> Result<()> {
        if elements.iter().any(|e| !self.is_element_acceptable(e)) {
            log::warn!("universal accumulator: rejected a reserved initial element");
            return Err(AccumulatorError::ElementNotAcceptable);
        }
        Ok(())
    }

    fn apply(&mut self, factor: Scalar) {
        self.f_v *= factor;
        self.accumulator.value = self.accumulator.value.scale(factor);
    }

    /// The value after adding `element`, without any checks
    pub fn compute_new_post_add(&self, element: &Element) -> AccumulatorValue {
        self.value().add(&self.secret_key, element)
    }

    /// The value after removing `element`, without any checks
    pub fn compute_new_post_remove(&self, element: &Element) -> Result<AccumulatorValue> {
        self.value().remove(&self.secret_key, element)
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
        self.check_acceptable(&[element])?;
        check_absent(state.as_deref(), &[element])?;
        self.apply(element.0 + self.secret_key.0);
        record(state, &[element], &[]);
        log::debug!("universal accumulator: added 1 element");
        Ok(())
    }

    /// Add many members. Nothing changes if any of them is unacceptable or present.
    pub fn add_batch(&mut self, elements: &[Element], state: Option<&mut dyn State>) -> Result<()> {
        self.check_acceptable(elements)?;
        check_absent(state.as_deref(), elements)?;
        self.apply(self.secret_key.batch_additions(elements));
        record(state, elements, &[]);
        log::debug!("universal accumulator: added {} elements", elements.len());
        Ok(())
    }

    /// Remove a member
    pub fn remove(&mut self, element: &Element, state: Option<&mut dyn State>) -> Result<()> {
        self.check_acceptable(&[*element])?;
        check_removable(state.as_deref(), &[*element])?;
        let factor = invert(element.0 + self.secret_key.0)?;
        self.apply(factor);
        record(state, &[], &[*element]);
        log::debug!("universal accumulator: removed 1 element");
        Ok(())
    }

    /// Remove many members. Nothing changes if any of them is unacceptable or absent.
    pub fn remove_batch(
        &mut self,
        elements: &[Element],
        state: Option<&mut dyn State>,
    ) -> Result<()> {
        self.check_acceptable(elements)?;
        check_removable(state.as_deref(), elements)?;
        let factor = self.secret_key.batch_deletions(elements)?;
        self.apply(factor);
        record(state, &[], elements);
        log::debug!("universal accumulator: removed {} elements", elements.len());
        Ok(())
    }

    /// Add and remove in a single update of the value
    pub fn batch_updates(
        &mut self,
        additions: &[Element],
        removals: &[Element],
        state: Option<&mut dyn State>,
    ) -> Result<()> {
        self.check_acceptable(additions)?;
        self.check_acceptable(removals)?;
        check_absent(state.as_deref(), additions)?;
        check_removable(state.as_deref(), removals)?;
        let factor = self.secret_key.batch_factor(additions, removals)?;
        self.apply(factor);
        record(state, additions, removals);
        log::debug!(
            "universal accumulator: batch of {} additions and {} removals",
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
        self.check_acceptable(additions)?;
        self.check_acceptable(removals)?;
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
        self.check_acceptable(&[*member])?;
        check_present(state, &[*member])?;
        log::trace!("universal accumulator: membership witness");
        MembershipWitness::new(member, self.value(), &self.secret_key)
    }

    /// Witnesses for many members using one inversion
    pub fn membership_witnesses_for_batch(
        &self,
        members: &[Element],
        state: Option<&dyn State>,
    ) -> Result<Vec<MembershipWitness>> {
        self.check_acceptable(members)?;
        check_present(state, members)?;
        log::trace!("universal accumulator: {} membership witnesses", members.len());
        Ok(self
            .value()
            .membership_witness_points(&self.secret_key, members)?
            .into_iter()
            .map(MembershipWitness)
            .collect())
    }

    /// `d` for `non_member` over a chunk of the current members
    pub fn compute_d(non_member: &Element, members: &[Element]) -> MemberProduct {
        MemberProduct(
            members
                .iter()
                .fold(Scalar::ONE, |d, m| d * (m.0 - non_member.0)),
        )
    }

    /// `d` for every non-member over a chunk of the current members
    pub fn compute_d_for_batch(non_members: &[Element], members: &[Element]) -> Vec<MemberProduct> {
        cfg_map(non_members, |y| Self::compute_d(y, members))
    }

    /// Multiply the products computed over disjoint chunks of members
    pub fn combine_d(ds: &[MemberProduct]) -> MemberProduct {
        MemberProduct(ds.iter().fold(Scalar::ONE, |acc, d| acc * d.0))
    }

    /// Multiply, position by position, batch products computed over disjoint chunks
    pub fn combine_d_for_batch(chunks: &[Vec<MemberProduct>]) -> Result<Vec<MemberProduct>> {
        let Some(first) = chunks.first() else {
            return Ok(Vec::new());
        };
        let mut combined = first.clone();
        for chunk in &chunks[1..] {
            AccumulatorError::check_lengths(combined.len(), chunk.len())?;
            for (c, d) in combined.iter_mut().zip(chunk) {
                c.0 *= d.0;
            }
        }
        Ok(combined)
    }

    fn d_from_state(
        &self,
        non_members: &[Element],
        state: &dyn UniversalState,
    ) -> Vec<MemberProduct> {
        let mut ds = vec![MemberProduct::default(); non_members.len()];
        let mut members = state.elements();
        let mut seen = 0usize;
        loop {
            let chunk = members
                .by_ref()
                .take(self.batch_size)
                .collect::<Vec<_>>();
            if chunk.is_empty() {
                break;
            }
            seen += chunk.len();
            for (d, p) in ds
                .iter_mut()
                .zip(Self::compute_d_for_batch(non_members, &chunk))
            {
                d.0 *= p.0;
            }
            log::trace!("universal accumulator: d accumulated over {} members", seen);
        }
        ds
    }

    /// Non-membership witness from a precomputed `d`
    pub fn non_membership_witness_given_d(
        &self,
        d: MemberProduct,
        non_member: &Element,
    ) -> Result<NonMembershipWitness> {
        self.check_acceptable(&[*non_member])?;
        if d.0 == Scalar::ZERO {
            return Err(AccumulatorError::CannotBeZero);
        }
        let y_plus_alpha_inv = invert(non_member.0 + self.secret_key.0)?;
        log::trace!("universal accumulator: non-membership witness");
        Ok(NonMembershipWitness {
            d: d.0,
            c: self.params.p * ((self.f_v - d.0) * y_plus_alpha_inv),
        })
    }

    /// Non-membership witnesses for many elements from precomputed `d`s, using one inversion
    pub fn non_membership_witnesses_for_batch_given_d(
        &self,
        ds: &[MemberProduct],
        non_members: &[Element],
    ) -> Result<Vec<NonMembershipWitness>> {
        AccumulatorError::check_lengths(non_members.len(), ds.len())?;
        self.check_acceptable(non_members)?;
        if ds.iter().any(|d| d.0 == Scalar::ZERO) {
            return Err(AccumulatorError::CannotBeZero);
        }
        let mut inv = non_members
            .iter()
            .map(|y| y.0 + self.secret_key.0)
            .collect::<Vec<_>>();
        batch_invert(&mut inv)?;
        log::trace!(
            "universal accumulator: {} non-membership witnesses",
            non_members.len()
        );
        let p = self.params.p;
        let f_v = self.f_v;
        let pairs = ds.iter().map(|d| d.0).zip(inv).collect::<Vec<_>>();
        Ok(cfg_map(&pairs, |(d, i)| NonMembershipWitness {
            d: *d,
            c: p * ((f_v - *d) * *i),
        }))
    }

    /// Non-membership witness, computing `d` from every member in `state`
    pub fn non_membership_witness(
        &self,
        non_member: &Element,
        state: &dyn UniversalState,
    ) -> Result<NonMembershipWitness> {
        self.check_acceptable(&[*non_member])?;
        if state.has(non_member) {
            return Err(AccumulatorError::AlreadyPresent);
        }
        let d = self.d_from_state(&[*non_member], state);
        self.non_membership_witness_given_d(d[0], non_member)
    }

    /// Non-membership witnesses for many elements, enumerating `state` once
    pub fn non_membership_witnesses_for_batch(
        &self,
        non_members: &[Element],
        state: &dyn UniversalState,
    ) -> Result<Vec<NonMembershipWitness>> {
        self.check_acceptable(non_members)?;
        if non_members.iter().any(|y| state.has(y)) {
            return Err(AccumulatorError::AlreadyPresent);
        }
        let ds = self.d_from_state(non_members, state);
        self.non_membership_witnesses_for_batch_given_d(&ds, non_members)
    }

    /// Manager side update of many membership witnesses across a batch applied to `old_value`
    pub fn update_membership_witnesses_post_batch_updates(
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

    /// Manager side update of many non-membership witnesses across a batch applied to `old_value`
    pub fn update_non_membership_witnesses_post_batch_updates(
        &self,
        witnesses: &[NonMembershipWitness],
        non_members: &[Element],
        additions: &[Element],
        removals: &[Element],
        old_value: &AccumulatorValue,
    ) -> Result<Vec<NonMembershipWitness>> {
        NonMembershipWitness::update_multiple_post_batch_updates(
            witnesses,
            non_members,
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

    /// Check a non-membership witness against the current value
    pub fn verify_non_membership(
        &self,
        non_member: &Element,
        witness: &NonMembershipWitness,
        pk: &PublicKey,
        params: &Params,
    ) -> bool {
        self.accumulator.verify_non_membership(non_member, witness, pk, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        accumulator::Keypair,
        persistence::test::{InMemoryInitialElements, InMemoryState},
    };

    struct Setup {
        params: Params,
        keypair: Keypair,
        manager: UniversalAccumulatorManager<InMemoryInitialElements>,
        state: InMemoryState,
    }

    fn setup(max_size: u64) -> Setup {
        let params = Params::new(b"universal-tests");
        let keypair = Keypair::generate(&params, None);
        let manager = UniversalAccumulatorManager::initialize(
            &params,
            keypair.secret_key,
            max_size,
            InMemoryInitialElements::new(),
            7,
        );
        Setup {
            params,
            keypair,
            manager,
            state: InMemoryState::new(),
        }
    }

    #[test]
    fn initialization() {
        let s = setup(20);
        assert_eq!(s.manager.initial_elements().db.len(), 12 + 21);
        assert_eq!(s.manager.accumulator().max_size(), 20);

        let initial = s.manager.initial_elements().db.iter().copied().collect::<Vec<_>>();
        let f_v = UniversalAccumulatorManager::<InMemoryInitialElements>::compute_initial_f_v(
            &initial,
            &s.keypair.secret_key,
        );
        assert_eq!(s.manager.value().0, s.params.p * f_v);

        let again = UniversalAccumulatorManager::initialize_given_f_v(
            f_v,
            &s.params,
            s.keypair.secret_key,
            20,
            InMemoryInitialElements::new(),
            7,
        );
        assert_eq!(again.value(), s.manager.value());
    }

    #[test]
    fn fixed_elements_are_rejected() {
        let mut s = setup(5);
        let fixed = fixed_initial_elements();
        assert_eq!(fixed.len(), 12);
        for e in &fixed {
            assert!(!s.manager.is_element_acceptable(e));
            assert_eq!(
                s.manager.non_membership_witness(e, &s.state),
                Err(AccumulatorError::ElementNotAcceptable)
            );
            assert_eq!(
                s.manager
                    .non_membership_witness_given_d(MemberProduct::default(), e),
                Err(AccumulatorError::ElementNotAcceptable)
            );
            assert_eq!(
                s.manager.add(*e, None),
                Err(AccumulatorError::ElementNotAcceptable)
            );
            assert_eq!(
                s.manager.remove(e, None),
                Err(AccumulatorError::ElementNotAcceptable)
            );
            assert_eq!(
                s.manager.membership_witness(e, None),
                Err(AccumulatorError::ElementNotAcceptable)
            );
        }
        let random_reserved = s
            .manager
            .initial_elements()
            .db
            .iter()
            .copied()
            .find(|e| !fixed.contains(e))
            .unwrap();
        assert_eq!(
            s.manager
                .add_batch(&[Element::random(), random_reserved], Some(&mut s.state)),
            Err(AccumulatorError::ElementNotAcceptable)
        );
        assert!(s.state.db.is_empty());
    }

    #[test]
    fn fixed_elements_rejected_without_store() {
        let params = Params::new(b"universal-tests");
        let keypair = Keypair::generate(&params, None);
        let f_v = Scalar::from(7u64);
        let mut manager = UniversalAccumulatorManager::initialize_given_f_v(
            f_v,
            &params,
            keypair.secret_key,
            4,
            InMemoryInitialElements::new(),
            4,
        );
        let mut state = InMemoryState::new();
        for e in &fixed_initial_elements() {
            assert!(!manager.is_element_acceptable(e));
            assert_eq!(
                manager.non_membership_witness(e, &state),
                Err(AccumulatorError::ElementNotAcceptable)
            );
            assert_eq!(
                manager.add(*e, Some(&mut state)),
                Err(AccumulatorError::ElementNotAcceptable)
            );
        }
        assert!(manager.is_element_acceptable(&Element::random()));
        assert_eq!(manager.value().0, params.p * f_v);
        assert!(state.db.is_empty());
    }

    #[test]
    fn repeated_elements_in_a_batch() {
        let mut s = setup(5);
        let x = Element::random();
        let y = Element::random();
        let value = *s.manager.value();
        assert_eq!(
            s.manager.add_batch(&[x, y, x], Some(&mut s.state)),
            Err(AccumulatorError::AlreadyPresent)
        );
        assert_eq!(
            s.manager.batch_updates(&[x, x], &[], None),
            Err(AccumulatorError::AlreadyPresent)
        );
        assert_eq!(*s.manager.value(), value);
        assert!(s.state.db.is_empty());

        s.manager.add_batch(&[x, y], Some(&mut s.state)).unwrap();
        let value = *s.manager.value();
        assert_eq!(
            s.manager.remove_batch(&[x, x], Some(&mut s.state)),
            Err(AccumulatorError::NotPresent)
        );
        assert_eq!(*s.manager.value(), value);
        assert_eq!(s.state.db.len(), 2);
    }

    #[test]
    fn max_size_only_sizes_initialization() {
        let mut s = setup(2);
        let members = (0..4).map(|_| Element::random()).collect::<Vec<_>>();
        s.manager.add_batch(&members, Some(&mut s.state)).unwrap();
        assert_eq!(s.state.db.len(), 4);
        assert_eq!(s.manager.accumulator().max_size(), 2);
    }

    #[test]
    fn membership_and_non_membership() {
        let mut s = setup(30);
        let pk = s.keypair.public_key;
        let members = (0..10).map(|_| Element::random()).collect::<Vec<_>>();
        s.manager.add_batch(&members, Some(&mut s.state)).unwrap();
        assert_eq!(
            s.manager.add(members[0], Some(&mut s.state)),
            Err(AccumulatorError::AlreadyPresent)
        );

        for m in &members {
            let wit = s.manager.membership_witness(m, Some(&s.state)).unwrap();
            assert!(s.manager.verify_membership(m, &wit, &pk, &s.params));
            assert_eq!(
                s.manager.non_membership_witness(m, &s.state),
                Err(AccumulatorError::AlreadyPresent)
            );
        }

        let non_members = (0..5).map(|_| Element::random()).collect::<Vec<_>>();
        let batch = s
            .manager
            .non_membership_witnesses_for_batch(&non_members, &s.state)
            .unwrap();
        for (y, wit) in non_members.iter().zip(batch.iter()) {
            let single = s.manager.non_membership_witness(y, &s.state).unwrap();
            assert_eq!(&single, wit);
            assert!(s.manager.verify_non_membership(y, wit, &pk, &s.params));
            assert!(s
                .manager
                .accumulator()
                .verify_non_membership(y, wit, &pk, &s.params));
        }

        s.manager.remove(&members[0], Some(&mut s.state)).unwrap();
        let wit = s.manager.non_membership_witness(&members[0], &s.state).unwrap();
        assert!(s.manager.verify_non_membership(&members[0], &wit, &pk, &s.params));
    }

    #[test]
    fn d_in_chunks() {
        let s = setup(5);
        let members = (0..9).map(|_| Element::random()).collect::<Vec<_>>();
        let non_members = (0..3).map(|_| Element::random()).collect::<Vec<_>>();
        type M = UniversalAccumulatorManager<InMemoryInitialElements>;

        let whole = M::compute_d(&non_members[0], &members);
        let parts = [
            M::compute_d(&non_members[0], &members[..4]),
            M::compute_d(&non_members[0], &members[4..]),
        ];
        assert_eq!(M::combine_d(&parts), whole);

        let whole_batch = M::compute_d_for_batch(&non_members, &members);
        let combined = M::combine_d_for_batch(&[
            M::compute_d_for_batch(&non_members, &members[..2]),
            M::compute_d_for_batch(&non_members, &members[2..5]),
            M::compute_d_for_batch(&non_members, &members[5..]),
        ])
        .unwrap();
        assert_eq!(combined, whole_batch);
        assert!(M::combine_d_for_batch(&[vec![whole], vec![]]).is_err());

        assert_eq!(
            s.manager
                .non_membership_witness_given_d(MemberProduct(Scalar::ZERO), &non_members[0]),
            Err(AccumulatorError::CannotBeZero)
        );
        assert_eq!(
            s.manager
                .non_membership_witnesses_for_batch_given_d(&whole_batch[..2], &non_members),
            Err(AccumulatorError::LengthMismatch {
                expected: 3,
                found: 2
            })
        );
    }

    #[test]
    fn non_membership_witness_updates() {
        let mut s = setup(10);
        let pk = s.keypair.public_key;
        let members = (0..4).map(|_| Element::random()).collect::<Vec<_>>();
        s.manager.add_batch(&members, Some(&mut s.state)).unwrap();
        let y = Element::random();
        let wit = s.manager.non_membership_witness(&y, &s.state).unwrap();

        // direct updates
        let before = *s.manager.value();
        let a = Element::random();
        s.manager.add(a, Some(&mut s.state)).unwrap();
        let wit_a = wit.update_post_add(&y, &a, &before);
        assert!(s.manager.verify_non_membership(&y, &wit_a, &pk, &s.params));
        assert!(!s.manager.verify_non_membership(&y, &wit, &pk, &s.params));

        s.manager.remove(&members[0], Some(&mut s.state)).unwrap();
        let wit_r = wit_a
            .update_post_remove(&y, &members[0], s.manager.value())
            .unwrap();
        assert!(s.manager.verify_non_membership(&y, &wit_r, &pk, &s.params));

        // public info
        let before = *s.manager.value();
        let additions = vec![Element::random(), Element::random()];
        let removals = vec![members[1]];
        let info = s
            .manager
            .batch_updates_with_public_info(&additions, &removals, Some(&mut s.state))
            .unwrap();
        let wit_b = wit_r
            .update_using_public_info_after_batch_update(&y, &additions, &removals, &info)
            .unwrap();
        assert!(s.manager.verify_non_membership(&y, &wit_b, &pk, &s.params));
        assert_eq!(wit_b, s.manager.non_membership_witness(&y, &s.state).unwrap());

        let managed = s
            .manager
            .update_non_membership_witnesses_post_batch_updates(
                &[wit_r],
                &[y],
                &additions,
                &removals,
                &before,
            )
            .unwrap();
        assert_eq!(managed[0], wit_b);
    }
}
