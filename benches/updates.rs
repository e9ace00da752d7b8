use agora_vb_accumulator::{
    accumulator::{Element, Keypair, Params},
    MembershipWitness, PositiveAccumulatorManager, WitnessUpdatePublicInfo,
};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

const BATCH_SIZES: [usize; 4] = [10, 20, 40, 100];

fn random_elements(n: usize) -> Vec<Element> {
    (0..n).map(|_| Element::random()).collect()
}

fn setup() -> (Params, Keypair, PositiveAccumulatorManager, Vec<Element>) {
    let params = Params::new(b"updates bench");
    let keypair = Keypair::generate(&params, None);
    let mut manager = PositiveAccumulatorManager::new(&params, keypair.secret_key);
    let members = random_elements(100);
    manager.add_batch(&members, None).unwrap();
    (params, keypair, manager, members)
}

fn batch(c: &mut Criterion) {
    let (_, _, mut manager, _) = setup();

    for batch_size in BATCH_SIZES {
        c.bench_function(format!("Add batch of size {}", batch_size).as_str(), |b| {
            b.iter_batched(
                || random_elements(batch_size),
                |elements| black_box(manager.add_batch(&elements, None).unwrap()),
                BatchSize::SmallInput,
            )
        });
    }

    for batch_size in BATCH_SIZES {
        c.bench_function(
            format!("Witnesses for a batch of size {}", batch_size).as_str(),
            |b| {
                let members = random_elements(batch_size);
                manager.add_batch(&members, None).unwrap();
                b.iter(|| black_box(manager.membership_witnesses_for_batch(&members, None)))
            },
        );
    }
}

fn witness_updates(c: &mut Criterion) {
    let (params, keypair, mut manager, members) = setup();
    let member = members[0];
    let witness = manager.membership_witness(&member, None).unwrap();

    for batch_size in BATCH_SIZES {
        let old_value = *manager.value();
        let additions = random_elements(batch_size);
        let removals = members[1..=batch_size / 2].to_vec();
        let info = WitnessUpdatePublicInfo::new(
            &old_value,
            &additions,
            &removals,
            &keypair.secret_key,
        )
        .unwrap();

        c.bench_function(
            format!("Public info for a batch of size {}", batch_size + batch_size / 2).as_str(),
            |b| {
                b.iter(|| {
                    black_box(WitnessUpdatePublicInfo::new(
                        &old_value,
                        &additions,
                        &removals,
                        &keypair.secret_key,
                    ))
                })
            },
        );

        c.bench_function(
            format!(
                "Update witness with public info for a batch of size {}",
                batch_size + batch_size / 2
            )
            .as_str(),
            |b| {
                b.iter(|| {
                    black_box(witness.update_using_public_info_after_batch_update(
                        &member, &additions, &removals, &info,
                    ))
                })
            },
        );

        c.bench_function(
            format!(
                "Update witness with secret key for a batch of size {}",
                batch_size + batch_size / 2
            )
            .as_str(),
            |b| {
                b.iter(|| {
                    black_box(MembershipWitness::update_multiple_post_batch_updates(
                        &[witness],
                        &[member],
                        &additions,
                        &removals,
                        &old_value,
                        &keypair.secret_key,
                    ))
                })
            },
        );
    }

    let pk = keypair.public_key;
    manager.add(Element::random(), None).unwrap();
    let witness = manager.membership_witness(&member, None).unwrap();
    c.bench_function("Verify membership", |b| {
        b.iter(|| black_box(manager.verify_membership(&member, &witness, &pk, &params)))
    });
}

criterion_group!(benches, batch, witness_updates);
criterion_main!(benches);
