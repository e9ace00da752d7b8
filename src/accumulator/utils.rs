//! Field helpers shared by the accumulator primitives
use crate::error::{AccumulatorError, Result};
use blsful::inner_types::*;
use core::ops::{AddAssign, MulAssign, SubAssign};
use rand::{CryptoRng, RngCore};
use sha3::{
    digest::{ExtendableOutput, Update, XofReader},
    Shake256,
};

/// Domain separation for hashing arbitrary data to elements
pub const SALT: &[u8] = b"VB-ACC-HASH-SALT-";

/// Hash `seed` to a scalar. When no seed is given, 32 bytes are drawn from `rng`
pub fn generate_fr(salt: &[u8], seed: Option<&[u8]>, mut rng: impl RngCore + CryptoRng) -> Scalar {
    let mut hasher = Shake256::default();
    hasher.update(salt);
    match seed {
        Some(seed) => hasher.update(seed),
        None => {
            let mut buffer = [0u8; 32];
            rng.fill_bytes(&mut buffer);
            hasher.update(&buffer);
        }
    }
    let mut okm = [0u8; 64];
    hasher.finalize_xof().read(&mut okm);
    Scalar::from_bytes_wide(&okm)
}

/// Dense univariate polynomial, coefficients in ascending order of degree
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Polynomial(pub Vec<Scalar>);

impl Polynomial {
    /// Create an empty polynomial with room for `size` coefficients
    pub fn with_capacity(size: usize) -> Self {
        Self(Vec::with_capacity(size))
    }

    /// The polynomial `(roots[0] - x) * (roots[1] - x) * ... * (roots[n-1] - x)`.
    /// The empty product is the constant 1.
    pub fn from_roots(roots: &[Scalar]) -> Self {
        let mut poly = Self::with_capacity(roots.len() + 1);
        poly.push(Scalar::ONE);
        for r in roots {
            poly.mul_by_root(*r);
        }
        poly
    }

    /// Append the next highest coefficient
    pub fn push(&mut self, value: Scalar) {
        self.0.push(value)
    }

    /// Number of coefficients
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when there are no coefficients
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Multiply in place by `(root - x)`
    pub fn mul_by_root(&mut self, root: Scalar) {
        // (c_0 + c_1 x + ...)(root - x)
        let mut result = vec![Scalar::ZERO; self.0.len() + 1];
        for (i, c) in self.0.iter().enumerate() {
            result[i] += *c * root;
            result[i + 1] -= *c;
        }
        self.0 = result;
    }

    /// Horner evaluation at `x`
    pub fn evaluate(&self, x: &Scalar) -> Scalar {
        self.0
            .iter()
            .rev()
            .fold(Scalar::ZERO, |acc, c| acc * *x + *c)
    }
}

impl AddAssign<Polynomial> for Polynomial {
    fn add_assign(&mut self, rhs: Polynomial) {
        if self.0.len() < rhs.0.len() {
            self.0.resize(rhs.0.len(), Scalar::ZERO);
        }
        for (l, r) in self.0.iter_mut().zip(rhs.0) {
            *l += r;
        }
    }
}

impl SubAssign<Polynomial> for Polynomial {
    fn sub_assign(&mut self, rhs: Polynomial) {
        if self.0.len() < rhs.0.len() {
            self.0.resize(rhs.0.len(), Scalar::ZERO);
        }
        for (l, r) in self.0.iter_mut().zip(rhs.0) {
            *l -= r;
        }
    }
}

impl MulAssign<Scalar> for Polynomial {
    fn mul_assign(&mut self, rhs: Scalar) {
        for c in self.0.iter_mut() {
            *c *= rhs;
        }
    }
}

/// `(values[0] - x) * (values[1] - x) * ... * (values[n-1] - x)` without building the polynomial
pub fn eval_roots_direct(values: impl IntoIterator<Item = Scalar>, x: &Scalar) -> Scalar {
    values.into_iter().fold(Scalar::ONE, |acc, v| acc * (v - *x))
}

/// Invert every value in place with a single field inversion
pub fn batch_invert(values: &mut [Scalar]) -> Result<()> {
    let mut acc = Scalar::ONE;
    let mut prefix = Vec::with_capacity(values.len());
    for v in values.iter() {
        prefix.push(acc);
        acc *= *v;
    }
    let mut inv = Option::<Scalar>::from(acc.invert()).ok_or(AccumulatorError::CannotBeZero)?;
    for (v, p) in values.iter_mut().zip(prefix).rev() {
        let next = inv * *v;
        *v = inv * p;
        inv = next;
    }
    Ok(())
}

/// Invert a single scalar
pub fn invert(value: Scalar) -> Result<Scalar> {
    Option::<Scalar>::from(value.invert()).ok_or(AccumulatorError::CannotBeZero)
}

/// Parse a base 10 integer constant into the scalar field
pub(crate) fn scalar_from_decimal(digits: &str) -> Scalar {
    let ten = Scalar::from(10u64);
    digits
        .bytes()
        .filter(u8::is_ascii_digit)
        .fold(Scalar::ZERO, |acc, b| acc * ten + Scalar::from(u64::from(b - b'0')))
}

/// Map over a slice, in parallel when the `parallel` feature is enabled
pub(crate) fn cfg_map<I, T, F>(items: &[I], f: F) -> Vec<T>
where
    I: Sync,
    T: Send,
    F: Fn(&I) -> T + Send + Sync,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        items.par_iter().map(f).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        items.iter().map(f).collect()
    }
}

pub(crate) fn g1(b: &[u8]) -> Result<G1Projective> {
    let buf = <[u8; 48]>::try_from(b).map_err(|_| AccumulatorError::InvalidBytes("G1 length"))?;
    Option::<G1Projective>::from(G1Projective::from_compressed(&buf))
        .ok_or(AccumulatorError::InvalidBytes("G1 point"))
}

pub(crate) fn g2(b: &[u8]) -> Result<G2Projective> {
    let buf = <[u8; 96]>::try_from(b).map_err(|_| AccumulatorError::InvalidBytes("G2 length"))?;
    Option::<G2Projective>::from(G2Projective::from_compressed(&buf))
        .ok_or(AccumulatorError::InvalidBytes("G2 point"))
}

pub(crate) fn sc(b: &[u8]) -> Result<Scalar> {
    let buf =
        <[u8; 32]>::try_from(b).map_err(|_| AccumulatorError::InvalidBytes("scalar length"))?;
    Option::<Scalar>::from(Scalar::from_be_bytes(&buf))
        .ok_or(AccumulatorError::InvalidBytes("scalar"))
}
