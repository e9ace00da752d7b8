//! Witness update algebra on the raw witness point `C`. Membership and non-membership
//! witnesses move `C` identically; a non-membership witness additionally scales its `d`
//! by the returned factor `d_A(y) / d_D(y)`.
use super::{
    utils::{batch_invert, eval_roots_direct, invert},
    AccumulatorValue, Element, Omega, SecretKey,
};
use crate::error::{AccumulatorError, Result};
use blsful::inner_types::*;

/// `C' = (a - y) * C + V` where `V` is the value before adding `a`
pub(crate) fn after_addition(
    c: &G1Projective,
    element: &Element,
    addition: &Element,
    old_value: &AccumulatorValue,
) -> (G1Projective, Scalar) {
    let factor = addition.0 - element.0;
    (*c * factor + old_value.0, factor)
}

/// `C' = (C - V') / (r - y)` where `V'` is the value after removing `r`
pub(crate) fn after_removal(
    c: &G1Projective,
    element: &Element,
    removal: &Element,
    new_value: &AccumulatorValue,
) -> Result<(G1Projective, Scalar)> {
    let inv = invert(removal.0 - element.0)?;
    Ok(((*c - new_value.0) * inv, inv))
}

fn d_a_d_d(element: &Element, additions: &[Element], removals: &[Element]) -> (Scalar, Scalar) {
    let d_a = eval_roots_direct(additions.iter().map(|a| a.0), &element.0);
    let d_d = eval_roots_direct(removals.iter().map(|r| r.0), &element.0);
    (d_a, d_d)
}

/// `C' = (d_A(y) * C + <powers of y, Omega>) / d_D(y)`
pub(crate) fn using_public_info(
    c: &G1Projective,
    element: &Element,
    additions: &[Element],
    removals: &[Element],
    omega: &Omega,
) -> Result<(G1Projective, Scalar)> {
    let (d_a, d_d) = d_a_d_d(element, additions, removals);
    let d_d_inv = invert(d_d)?;
    let c_new = (*c * d_a + omega.inner_product_with_powers_of_y(element)) * d_d_inv;
    Ok((c_new, d_a * d_d_inv))
}

/// Apply several consecutive batches at once. Batch `t` contributes
/// `d_A(batches after t)(y) * d_D(batches before t)(y) * <powers of y, Omega_t>`
/// and the sum is divided by the product of every `d_D(y)`.
pub(crate) fn using_public_info_multiple(
    c: &G1Projective,
    element: &Element,
    additions: &[Vec<Element>],
    removals: &[Vec<Element>],
    omegas: &[&Omega],
) -> Result<(G1Projective, Scalar)> {
    AccumulatorError::check_lengths(omegas.len(), additions.len())?;
    AccumulatorError::check_lengths(omegas.len(), removals.len())?;

    let factors: Vec<(Scalar, Scalar)> = additions
        .iter()
        .zip(removals.iter())
        .map(|(a, r)| d_a_d_d(element, a, r))
        .collect();

    // suffix[t] = product of d_A over batches t+1..
    let mut suffix = vec![Scalar::ONE; factors.len() + 1];
    for t in (0..factors.len()).rev() {
        suffix[t] = suffix[t + 1] * factors[t].0;
    }

    let mut sum = G1Projective::IDENTITY;
    let mut prefix_d_d = Scalar::ONE;
    for (t, omega) in omegas.iter().enumerate() {
        let factor = suffix[t + 1] * prefix_d_d;
        sum += omega.inner_product_with_powers_of_y(element) * factor;
        prefix_d_d *= factors[t].1;
    }

    let d_d_inv = invert(prefix_d_d)?;
    let c_new = (*c * suffix[0] + sum) * d_d_inv;
    Ok((c_new, suffix[0] * d_d_inv))
}

/// Manager side update of many witness points after one batch:
/// `C' = (d_A(y) * C + v_AD(y) * V) / d_D(y)` for each element `y`
pub(crate) fn with_secret_key(
    points: &[G1Projective],
    elements: &[Element],
    additions: &[Element],
    removals: &[Element],
    old_value: &AccumulatorValue,
    sk: &SecretKey,
) -> Result<Vec<(G1Projective, Scalar)>> {
    AccumulatorError::check_lengths(elements.len(), points.len())?;
    let poly = sk.create_coefficients(additions, removals)?;

    let mut d_a = Vec::with_capacity(elements.len());
    let mut d_d_inv = Vec::with_capacity(elements.len());
    for e in elements {
        let (a, d) = d_a_d_d(e, additions, removals);
        d_a.push(a);
        d_d_inv.push(d);
    }
    batch_invert(&mut d_d_inv)?;

    Ok(points
        .iter()
        .zip(elements.iter())
        .zip(d_a.into_iter().zip(d_d_inv))
        .map(|((c, e), (a, d_inv))| {
            let c_new = (*c * a + old_value.0 * poly.evaluate(&e.0)) * d_inv;
            (c_new, a * d_inv)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accumulator::{Keypair, Params};

    fn fresh() -> (Params, Keypair, Vec<Element>, AccumulatorValue) {
        let params = Params::new(b"update-tests");
        let kp = Keypair::generate(&params, None);
        let members = (0..5).map(|_| Element::random()).collect::<Vec<_>>();
        let value = AccumulatorValue::with_elements(&params, &kp.secret_key, &members);
        (params, kp, members, value)
    }

    #[test]
    fn single_steps() {
        let (params, kp, members, value) = fresh();
        let sk = &kp.secret_key;
        let y = members[0];
        let c = value.membership_witness_point(sk, &y).unwrap();

        let a = Element::random();
        let added = value.add(sk, &a);
        let (c_add, _) = after_addition(&c, &y, &a, &value);
        assert!(added.verify_membership_point(&y, &c_add, &kp.public_key, &params));

        let removed = added.remove(sk, &members[1]).unwrap();
        let (c_rem, _) = after_removal(&c_add, &y, &members[1], &removed).unwrap();
        assert!(removed.verify_membership_point(&y, &c_rem, &kp.public_key, &params));

        assert_eq!(
            after_removal(&c_add, &y, &y, &removed),
            Err(AccumulatorError::CannotBeZero)
        );
    }

    #[test]
    fn public_info_and_secret_key_agree() {
        let (_, kp, members, value) = fresh();
        let sk = &kp.secret_key;
        let adds = vec![Element::random(), Element::random()];
        let dels = vec![members[3], members[4]];
        let new_value = value.batch_updates(sk, &adds, &dels).unwrap();
        let omega = Omega::new(&adds, &dels, &value, sk).unwrap();

        let points = value.membership_witness_points(sk, &members[..3]).unwrap();
        let updated = with_secret_key(&points, &members[..3], &adds, &dels, &value, sk).unwrap();
        for ((c, y), (expected, _)) in points.iter().zip(&members[..3]).zip(updated) {
            let (c_new, _) = using_public_info(c, y, &adds, &dels, &omega).unwrap();
            assert_eq!(c_new, expected);
            assert_eq!(c_new, new_value.membership_witness_point(sk, y).unwrap());
        }
    }

    #[test]
    fn multiple_batches() {
        let (_, kp, members, v0) = fresh();
        let sk = &kp.secret_key;
        let adds = vec![vec![Element::random()], vec![Element::random(), Element::random()]];
        let dels = vec![vec![members[4]], vec![members[3]]];
        let o0 = Omega::new(&adds[0], &dels[0], &v0, sk).unwrap();
        let v1 = v0.batch_updates(sk, &adds[0], &dels[0]).unwrap();
        let o1 = Omega::new(&adds[1], &dels[1], &v1, sk).unwrap();
        let v2 = v1.batch_updates(sk, &adds[1], &dels[1]).unwrap();

        let y = members[0];
        let c = v0.membership_witness_point(sk, &y).unwrap();
        let (c_new, _) = using_public_info_multiple(&c, &y, &adds, &dels, &[&o0, &o1]).unwrap();
        assert_eq!(c_new, v2.membership_witness_point(sk, &y).unwrap());

        assert_eq!(
            using_public_info_multiple(&c, &y, &adds, &dels[..1], &[&o0, &o1]),
            Err(AccumulatorError::LengthMismatch {
                expected: 2,
                found: 1
            })
        );
    }
}
