use super::{utils::g1, AccumulatorValue, Element, Polynomial, SecretKey};
use crate::error::{AccumulatorError, Result};
use blsful::inner_types::*;
use core::fmt::{self, Display, Formatter};

/// The coefficients of `v_AD(x)` multiplied by the accumulator value before a batch,
/// `Omega = (c_0 * V, c_1 * V, ..., c_n * V)`. Holders evaluate it at their own element.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Omega(pub Vec<G1Projective>);

serde_value_record!(Omega);

impl Display for Omega {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Omega {{ ")?;
        for c in &self.0 {
            write!(f, "{} ", c)?;
        }
        write!(f, "}}")
    }
}

impl Omega {
    /// Compute Omega for a batch of `additions` and `removals` applied to `old_value`
    pub fn new(
        additions: &[Element],
        removals: &[Element],
        old_value: &AccumulatorValue,
        sk: &SecretKey,
    ) -> Result<Self> {
        let poly = sk.create_coefficients(additions, removals)?;
        Ok(Self::from_polynomial(&poly, old_value))
    }

    /// Multiply every coefficient of `poly` by `value`
    pub fn from_polynomial(poly: &Polynomial, value: &AccumulatorValue) -> Self {
        Self(poly.0.iter().map(|c| value.0 * *c).collect())
    }

    /// `<(1, y, y^2, ..., y^n), Omega>`
    pub fn inner_product_with_powers_of_y(&self, y: &Element) -> G1Projective {
        self.0
            .iter()
            .rev()
            .fold(G1Projective::IDENTITY, |acc, c| acc * y.0 + *c)
    }

    /// Number of coefficients
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the batch was empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Concatenation of the compressed coefficients
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.0.len() * 48);
        for c in &self.0 {
            out.extend_from_slice(&c.to_compressed());
        }
        out
    }

    /// Parse coefficients written by `to_bytes`
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() % 48 != 0 {
            return Err(AccumulatorError::InvalidBytes("omega length"));
        }
        bytes
            .chunks_exact(48)
            .map(g1)
            .collect::<Result<Vec<_>>>()
            .map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accumulator::Params;

    #[test]
    fn evaluates_like_the_polynomial() {
        let sk = SecretKey::new(None);
        let params = Params::default();
        let value = AccumulatorValue::with_elements(&params, &sk, &[Element::random()]);
        let adds = [Element::random(), Element::random()];
        let dels = [Element::random()];
        let omega = Omega::new(&adds, &dels, &value, &sk).unwrap();
        let poly = sk.create_coefficients(&adds, &dels).unwrap();
        let y = Element::random();
        assert_eq!(omega.len(), poly.len());
        assert_eq!(
            omega.inner_product_with_powers_of_y(&y),
            value.0 * poly.evaluate(&y.0)
        );
    }

    #[test]
    fn bytes() {
        let sk = SecretKey::new(None);
        let value = AccumulatorValue::default();
        let omega = Omega::new(&[Element::random()], &[Element::random()], &value, &sk).unwrap();
        let bytes = omega.to_bytes();
        assert_eq!(bytes.len(), 48 * omega.len());
        assert_eq!(Omega::from_bytes(&bytes).unwrap(), omega);
        assert!(Omega::from_bytes(&bytes[1..]).is_err());
        assert!(Omega::from_bytes(&[]).unwrap().is_empty());
    }
}
