// Scenario tests across the accumulator variants and the witness update protocol

use crate::accumulator::{AccumulatorValue, Element, Keypair, Params};
use crate::persistence::test::{InMemoryInitialElements, InMemoryKbState, InMemoryState};
use crate::*;
use rand::{seq::SliceRandom, RngCore};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn setup() -> (Params, Keypair) {
    init_logger();
    let params = Params::new(b"scenario tests");
    let keypair = Keypair::generate(&params, None);
    (params, keypair)
}

fn elements(range: core::ops::Range<u64>) -> Vec<Element> {
    range.map(|i| Element::hash(&i.to_be_bytes())).collect()
}

// Add a, b, c one at a time, remove a and follow it with a direct update
#[test]
fn positive_remove_and_update() {
    let (params, keypair) = setup();
    let pk = keypair.public_key;
    let mut state = InMemoryState::new();
    let mut manager = PositiveAccumulatorManager::new(&params, keypair.secret_key);

    let a = encode_bytes(b"a");
    let b = encode_bytes(b"b");
    let c = encode_bytes(b"c");
    for e in [a, b, c] {
        manager.add(e, Some(&mut state)).unwrap();
    }

    let original = manager.membership_witness(&b, Some(&state)).unwrap();
    assert!(manager.verify_membership(&b, &original, &pk, &params));

    manager.remove(&a, Some(&mut state)).unwrap();
    let public = *manager.accumulator();
    let updated = original.update_post_remove(&b, &a, public.value()).unwrap();
    assert!(public.verify_membership(&b, &updated, &pk, &params));
    assert!(!public.verify_membership(&b, &original, &pk, &params));

    // a is gone and cannot be removed again
    assert_eq!(
        manager.remove(&a, Some(&mut state)),
        Err(AccumulatorError::NotPresent)
    );
    assert_eq!(
        manager.membership_witness(&a, Some(&state)),
        Err(AccumulatorError::NotPresent)
    );
}

// The value always equals P * prod(e + alpha) over the members of the state
#[test]
fn value_matches_state() {
    let (params, keypair) = setup();
    let mut state = InMemoryState::new();
    let mut manager = PositiveAccumulatorManager::new(&params, keypair.secret_key);
    let pool = elements(0..30);
    let mut rng = rand::rngs::OsRng;

    for round in 0..6 {
        let mut members = state.db.iter().copied().collect::<Vec<_>>();
        members.shuffle(&mut rng);
        let removals = members
            .into_iter()
            .take((rng.next_u32() % 4) as usize)
            .collect::<Vec<_>>();
        let additions = pool[round * 5..round * 5 + 5].to_vec();

        // a rejected batch leaves everything untouched
        let before = *manager.value();
        let members_before = state.db.clone();
        if let Some(present) = removals.first() {
            assert_eq!(
                manager.batch_updates(&[*present], &[], Some(&mut state)),
                Err(AccumulatorError::AlreadyPresent)
            );
            assert_eq!(*manager.value(), before);
            assert_eq!(state.db, members_before);
        }

        manager
            .batch_updates(&additions, &removals, Some(&mut state))
            .unwrap();
        let members = state.db.iter().copied().collect::<Vec<_>>();
        assert_eq!(
            *manager.value(),
            AccumulatorValue::with_elements(&params, &keypair.secret_key, &members)
        );
    }
}

// Three batches are published and a holder who was offline catches up at once
#[test]
fn positive_public_info_multiple_batches() {
    let (params, keypair) = setup();
    let pk = keypair.public_key;
    let mut state = InMemoryState::new();
    let mut manager = PositiveAccumulatorManager::new(&params, keypair.secret_key);
    let pool = elements(0..40);

    manager.add_batch(&pool[..10], Some(&mut state)).unwrap();
    let member = pool[0];
    let witness = manager.membership_witness(&member, Some(&state)).unwrap();

    let additions = vec![pool[10..14].to_vec(), pool[14..17].to_vec(), Vec::new()];
    let removals = vec![pool[1..3].to_vec(), Vec::new(), pool[3..7].to_vec()];
    let mut infos = Vec::new();
    for (adds, rems) in additions.iter().zip(removals.iter()) {
        let before = *manager.value();
        let info = manager
            .batch_updates_with_public_info(adds, rems, Some(&mut state))
            .unwrap();
        assert_eq!(
            info,
            WitnessUpdatePublicInfo::new(&before, adds, rems, &keypair.secret_key).unwrap()
        );
        infos.push(info);
    }

    let updated = witness
        .update_using_public_info_after_multiple_batch_updates(
            &member, &additions, &removals, &infos,
        )
        .unwrap();
    assert!(manager.verify_membership(&member, &updated, &pk, &params));

    let mut step = witness;
    for ((adds, rems), info) in additions.iter().zip(removals.iter()).zip(infos.iter()) {
        step = step
            .update_using_public_info_after_batch_update(&member, adds, rems, info)
            .unwrap();
    }
    assert_eq!(step, updated);

    // batches applied in the wrong order do not give a valid witness
    let reversed = |v: &[Vec<Element>]| v.iter().rev().cloned().collect::<Vec<_>>();
    let infos_rev = infos.iter().rev().cloned().collect::<Vec<_>>();
    let wrong = witness
        .update_using_public_info_after_multiple_batch_updates(
            &member,
            &reversed(&additions),
            &reversed(&removals),
            &infos_rev,
        )
        .unwrap();
    assert!(!manager.verify_membership(&member, &wrong, &pk, &params));

    assert_eq!(
        witness.update_using_public_info_after_multiple_batch_updates(
            &member,
            &additions,
            &removals[..2],
            &infos,
        ),
        Err(AccumulatorError::LengthMismatch {
            expected: 3,
            found: 2
        })
    );
}

// Reserved initial elements cannot be added, removed or witnessed
#[test]
fn universal_forgery_guard() {
    let (params, keypair) = setup();
    let mut state = InMemoryState::new();
    let mut manager = UniversalAccumulatorManager::initialize(
        &params,
        keypair.secret_key,
        10,
        InMemoryInitialElements::new(),
        4,
    );
    assert_eq!(
        manager.initial_elements().db.len(),
        fixed_initial_elements().len() + 11
    );

    let reserved = *manager.initial_elements().db.iter().next().unwrap();
    let fixed = fixed_initial_elements()[0];
    let value = *manager.value();
    for e in [reserved, fixed] {
        assert!(!manager.is_element_acceptable(&e));
        assert_eq!(
            manager.add(e, Some(&mut state)),
            Err(AccumulatorError::ElementNotAcceptable)
        );
        assert_eq!(
            manager.remove(&e, None),
            Err(AccumulatorError::ElementNotAcceptable)
        );
        assert_eq!(
            manager.non_membership_witness(&e, &state),
            Err(AccumulatorError::ElementNotAcceptable)
        );
    }
    assert_eq!(*manager.value(), value);
    assert!(state.db.is_empty());
}

// Members and non-members of a universal accumulator follow the same published batches
#[test]
fn universal_public_info_for_both_witness_kinds() {
    let (params, keypair) = setup();
    let pk = keypair.public_key;
    let mut state = InMemoryState::new();
    let mut manager = UniversalAccumulatorManager::initialize(
        &params,
        keypair.secret_key,
        20,
        InMemoryInitialElements::new(),
        8,
    );
    let pool = elements(100..130);
    manager.add_batch(&pool[..8], Some(&mut state)).unwrap();

    let member = pool[0];
    let non_member = pool[29];
    let mem_wit = manager.membership_witness(&member, Some(&state)).unwrap();
    let non_wit = manager.non_membership_witness(&non_member, &state).unwrap();
    assert!(manager.verify_non_membership(&non_member, &non_wit, &pk, &params));

    let additions = vec![pool[8..12].to_vec(), pool[12..13].to_vec()];
    let removals = vec![pool[1..4].to_vec(), pool[8..10].to_vec()];
    let mut infos = Vec::new();
    for (adds, rems) in additions.iter().zip(removals.iter()) {
        infos.push(
            manager
                .batch_updates_with_public_info(adds, rems, Some(&mut state))
                .unwrap(),
        );
    }
    assert!(!manager.verify_membership(&member, &mem_wit, &pk, &params));
    assert!(!manager.verify_non_membership(&non_member, &non_wit, &pk, &params));

    let mem_wit = mem_wit
        .update_using_public_info_after_multiple_batch_updates(
            &member, &additions, &removals, &infos,
        )
        .unwrap();
    let non_wit = non_wit
        .update_using_public_info_after_multiple_batch_updates(
            &non_member,
            &additions,
            &removals,
            &infos,
        )
        .unwrap();
    assert!(manager.verify_membership(&member, &mem_wit, &pk, &params));
    assert!(manager.verify_non_membership(&non_member, &non_wit, &pk, &params));

    // the updated d matches a witness created from scratch
    let fresh = manager.non_membership_witness(&non_member, &state).unwrap();
    assert_eq!(fresh, non_wit);

    manager.add(non_member, Some(&mut state)).unwrap();
    assert_eq!(
        manager.non_membership_witness(&non_member, &state),
        Err(AccumulatorError::AlreadyPresent)
    );
}

// Witnesses in a KB-universal accumulator survive membership changes and domain growth
#[test]
fn kb_universal_lifecycle() {
    let (params, keypair) = setup();
    let pk = keypair.public_key;
    let mut state = InMemoryKbState::new();
    let domain = elements(0..10);
    let mut manager = KbUniversalAccumulatorManager::initialize(
        &params,
        keypair.secret_key,
        &domain,
        Some(&mut state),
    );

    manager.add_batch(&domain[..3], Some(&mut state)).unwrap();
    let member = domain[0];
    let non_member = domain[9];
    let mem_wit = manager.membership_witness(&member, Some(&state)).unwrap();
    let non_wit = manager
        .non_membership_witness(&non_member, Some(&state))
        .unwrap();

    let extension_1 = elements(10..13);
    let extension_2 = elements(13..20);
    let info_1 = manager
        .extend_with_public_info(&extension_1, Some(&mut state))
        .unwrap();
    let info_2 = manager
        .extend_with_public_info(&extension_2, Some(&mut state))
        .unwrap();
    assert_eq!(
        manager.extend(&extension_1[..1], Some(&mut state)),
        Err(AccumulatorError::AlreadyInDomain)
    );

    assert!(manager.verify_membership(&member, &mem_wit, &pk, &params));
    let non_wit = non_wit
        .update_using_public_info_after_multiple_domain_extensions(
            &non_member,
            &[extension_1.clone(), extension_2.clone()],
            &[info_1, info_2],
        )
        .unwrap();
    assert!(manager.verify_non_membership(&non_member, &non_wit, &pk, &params));

    // new domain elements can now become members
    let info = manager
        .batch_updates_with_public_info(&extension_2[..2], &domain[1..2], Some(&mut state))
        .unwrap();
    let bytes = info.to_bytes();
    let info = KbBothWitnessUpdateInfo::from_bytes(&bytes).unwrap();

    let mem_wit = mem_wit
        .update_using_public_info_after_batch_update(
            &member,
            &extension_2[..2],
            &domain[1..2],
            &info.membership,
        )
        .unwrap();
    let non_wit = non_wit
        .update_using_public_info_after_batch_update(
            &non_member,
            &extension_2[..2],
            &domain[1..2],
            &info.non_membership,
        )
        .unwrap();
    let public = *manager.accumulator();
    assert!(public.verify_membership(&member, &mem_wit, &pk, &params));
    assert!(public.verify_non_membership(&non_member, &non_wit, &pk, &params));
    assert!(state.has(&extension_2[0]));
    assert!(!state.has(&domain[1]));
}

// Values and witnesses keep their bytes through serde
#[test]
fn serialization_records() {
    let (params, keypair) = setup();
    let mut manager = PositiveAccumulatorManager::new(&params, keypair.secret_key);
    let e = Element::random();
    manager.add(e, None).unwrap();
    let witness = manager.membership_witness(&e, None).unwrap();

    let json = serde_json::to_string(manager.accumulator()).unwrap();
    let accumulator: PositiveAccumulator = serde_json::from_str(&json).unwrap();
    assert_eq!(accumulator, *manager.accumulator());

    let bare = serde_bare::to_vec(&witness).unwrap();
    let witness2: MembershipWitness = serde_bare::from_slice(&bare).unwrap();
    assert_eq!(witness2.to_bytes(), witness.to_bytes());
    assert!(accumulator.verify_membership(&e, &witness2, &keypair.public_key, &params));
}
