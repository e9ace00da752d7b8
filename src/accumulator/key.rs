use super::{
    utils::{batch_invert, g1, g2, generate_fr, invert, sc, Polynomial},
    Element,
};
use crate::error::{AccumulatorError, Result};
use blsful::inner_types::*;
use core::convert::TryFrom;
use merlin::Transcript;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use zeroize::DefaultIsZeroes;

const DST_G1: &[u8] = b"BLS12381G1_XMD:SHA-256_SSWU_RO_";
const DST_G2: &[u8] = b"BLS12381G2_XMD:SHA-256_SSWU_RO_";

/// The generators every accumulator value, witness and public key is computed over.
///
/// `p` lives in G1 and is the starting accumulator value, `p_tilde` lives in G2 and
/// is the base of the public key.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Params {
    /// The G1 generator
    pub p: G1Projective,
    /// The G2 generator
    pub p_tilde: G2Projective,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            p: G1Projective::GENERATOR,
            p_tilde: G2Projective::GENERATOR,
        }
    }
}

impl core::fmt::Display for Params {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Params {{ p: {}, p_tilde: {} }}", self.p, self.p_tilde)
    }
}

impl TryFrom<&[u8; 144]> for Params {
    type Error = AccumulatorError;

    fn try_from(bytes: &[u8; 144]) -> Result<Self> {
        Self::from_bytes(bytes)
    }
}

impl Params {
    /// The number of bytes in the params
    pub const BYTES: usize = 144;

    /// Derive both generators by hashing `label`. The same label always yields the same params.
    pub fn new(label: &[u8]) -> Self {
        let mut transcript = Transcript::new(b"VB accumulator params");
        transcript.append_message(b"label", label);
        let mut okm = [0u8; 64];
        transcript.challenge_bytes(b"P", &mut okm);
        let p = G1Projective::hash::<ExpandMsgXmd<sha2::Sha256>>(&okm, DST_G1);
        transcript.challenge_bytes(b"P_tilde", &mut okm);
        let p_tilde = G2Projective::hash::<ExpandMsgXmd<sha2::Sha256>>(&okm, DST_G2);
        Self { p, p_tilde }
    }

    /// Params from a random label
    pub fn random(mut rng: impl RngCore + CryptoRng) -> Self {
        let mut label = [0u8; 64];
        rng.fill_bytes(&mut label);
        Self::new(&label)
    }

    /// Compressed `p` followed by compressed `p_tilde`
    pub fn to_bytes(&self) -> [u8; Self::BYTES] {
        let mut d = [0u8; Self::BYTES];
        d[..48].copy_from_slice(&self.p.to_compressed());
        d[48..].copy_from_slice(&self.p_tilde.to_compressed());
        d
    }

    /// Parse params written by `to_bytes`
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != Self::BYTES {
            return Err(AccumulatorError::InvalidBytes("params length"));
        }
        Ok(Self {
            p: g1(&bytes[..48])?,
            p_tilde: g2(&bytes[48..])?,
        })
    }
}

/// Represents \alpha (secret key) on page 6 in
/// <https://eprint.iacr.org/2020/777.pdf>
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct SecretKey(pub Scalar);

impl DefaultIsZeroes for SecretKey {}

impl From<SecretKey> for [u8; 32] {
    fn from(s: SecretKey) -> Self {
        s.0.to_be_bytes()
    }
}

impl TryFrom<&[u8; 32]> for SecretKey {
    type Error = AccumulatorError;

    fn try_from(bytes: &[u8; 32]) -> Result<Self> {
        sc(bytes).map(Self)
    }
}

impl SecretKey {
    /// The number of bytes in a secret key
    pub const BYTES: usize = 32;

    /// Create a new secret key
    pub fn new(seed: Option<&[u8]>) -> Self {
        // Giuseppe Vitto, Alex Biryukov = VB
        // Accumulator = ACC
        Self(generate_fr(b"VB-ACC-KEYGEN-SALT-", seed, rand::rngs::OsRng))
    }

    /// Return the raw byte representation of the key
    pub fn to_bytes(&self) -> [u8; Self::BYTES] {
        self.0.to_be_bytes()
    }

    /// Parse a key from its raw bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        sc(bytes).map(Self)
    }

    /// `(y_0 + alpha) * (y_1 + alpha) * ... * (y_n-1 + alpha)`
    pub fn batch_additions(&self, additions: &[Element]) -> Scalar {
        additions
            .iter()
            .map(|v| v.0 + self.0)
            .fold(Scalar::ONE, |a, y| a * y)
    }

    /// The inverse of [`Self::batch_additions`]
    pub fn batch_deletions(&self, deletions: &[Element]) -> Result<Scalar> {
        invert(self.batch_additions(deletions))
    }

    /// `d_A(-alpha) / d_D(-alpha)`, the factor a batch update multiplies the accumulator by
    pub fn batch_factor(&self, additions: &[Element], deletions: &[Element]) -> Result<Scalar> {
        Ok(self.batch_additions(additions) * self.batch_deletions(deletions)?)
    }

    /// The polynomial `v_AD(x) = v_A(x) - v_D(x) * (a_0 + alpha) * ... * (a_n-1 + alpha)`
    /// from section 5 of <https://eprint.iacr.org/2020/777.pdf>
    pub fn create_coefficients(
        &self,
        additions: &[Element],
        deletions: &[Element],
    ) -> Result<Polynomial> {
        // vD(x) = ∑^{m}_{s=1}{ ∏ 1..s {yD_i + alpha}^-1 ∏ 1 ..s-1 {yD_j - x}
        let mut prefix_inv: Vec<Scalar> = deletions
            .iter()
            .scan(Scalar::ONE, |acc, d| {
                *acc *= d.0 + self.0;
                Some(*acc)
            })
            .collect();
        batch_invert(&mut prefix_inv)?;

        let mut v_d = Polynomial::with_capacity(deletions.len());
        let mut roots = Polynomial::from_roots(&[]);
        for (s, c) in prefix_inv.into_iter().enumerate() {
            if s > 0 {
                roots.mul_by_root(deletions[s - 1].0);
            }
            let mut term = roots.clone();
            term *= c;
            v_d += term;
        }
        v_d *= self.batch_additions(additions);

        // vA(x) = ∑^n_{s=1}{ ∏ 1..s-1 {yA_i + alpha} ∏ s+1..n {yA_j - x} }
        let mut v_a = Polynomial::with_capacity(additions.len());
        let mut c = Scalar::ONE;
        for s in 0..additions.len() {
            let tail: Vec<Scalar> = additions[s + 1..].iter().map(|a| a.0).collect();
            let mut term = Polynomial::from_roots(&tail);
            term *= c;
            v_a += term;
            c *= additions[s].0 + self.0;
        }

        v_a -= v_d;
        Ok(v_a)
    }
}

/// Represents \overline{Q} = \overline{P}*\alpha (public key) on page 6 in
/// <https://eprint.iacr.org/2020/777.pdf>
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PublicKey(pub G2Projective);

impl core::fmt::Display for PublicKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "PublicKey {{ {} }}", self.0)
    }
}

impl From<PublicKey> for G2Projective {
    fn from(p: PublicKey) -> Self {
        p.0
    }
}

impl From<G2Projective> for PublicKey {
    fn from(g: G2Projective) -> Self {
        Self(g)
    }
}

impl PublicKey {
    /// The number of bytes in a public key
    pub const BYTES: usize = 96;

    /// Derive the public key for `sk` over `params`
    pub fn new(sk: &SecretKey, params: &Params) -> Self {
        Self(params.p_tilde * sk.0)
    }

    /// Return the byte representation for this public key
    pub fn to_bytes(&self) -> [u8; Self::BYTES] {
        self.0.to_compressed()
    }

    /// Parse a public key from its compressed form
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        g2(bytes).map(Self)
    }

    /// A public key must be checked before a verifier trusts it.
    /// Rejects the identity and points outside the prime order subgroup.
    pub fn is_valid(&self) -> bool {
        let affine = self.0.to_affine();
        !bool::from(self.0.is_identity())
            && bool::from(affine.is_on_curve())
            && bool::from(affine.is_torsion_free())
    }
}

impl TryFrom<&[u8; 96]> for PublicKey {
    type Error = AccumulatorError;

    fn try_from(bytes: &[u8; 96]) -> Result<Self> {
        Self::from_bytes(bytes)
    }
}

/// A secret key and the public key derived from it over some params
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Keypair {
    /// The manager's secret key
    pub secret_key: SecretKey,
    /// The matching public key
    pub public_key: PublicKey,
}

impl Keypair {
    /// Generate a keypair, deterministically when a seed is supplied
    pub fn generate(params: &Params, seed: Option<&[u8]>) -> Self {
        let secret_key = SecretKey::new(seed);
        let public_key = PublicKey::new(&secret_key, params);
        Self {
            secret_key,
            public_key,
        }
    }
}
