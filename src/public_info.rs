use crate::{
    accumulator::{AccumulatorValue, Element, Omega, SecretKey},
    error::{AccumulatorError, Result},
};
use core::fmt::{self, Display, Formatter};

/// Published by the manager once per batch. Lets a holder who only knows the batch's
/// additions and removals move a witness across it without the secret key.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct WitnessUpdatePublicInfo(pub Omega);

serde_value_record!(WitnessUpdatePublicInfo);

impl Display for WitnessUpdatePublicInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "WitnessUpdatePublicInfo {{ {} }}", self.0)
    }
}

impl From<Omega> for WitnessUpdatePublicInfo {
    fn from(omega: Omega) -> Self {
        Self(omega)
    }
}

impl WitnessUpdatePublicInfo {
    /// Derive the info for `additions` and `removals` applied to `old_value`
    pub fn new(
        old_value: &AccumulatorValue,
        additions: &[Element],
        removals: &[Element],
        sk: &SecretKey,
    ) -> Result<Self> {
        Omega::new(additions, removals, old_value, sk).map(Self)
    }

    /// The underlying coefficients
    pub fn omega(&self) -> &Omega {
        &self.0
    }

    /// Raw bytes, 48 per coefficient
    pub fn to_bytes(&self) -> Vec<u8> {
        self.0.to_bytes()
    }

    /// Parse the info from its raw bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Omega::from_bytes(bytes).map(Self)
    }
}

/// Info to move KB-universal membership witnesses across a batch
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct KbMembershipWitnessUpdateInfo(pub Omega);

/// Info to move KB-universal non-membership witnesses across a batch or a domain extension
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct KbNonMembershipWitnessUpdateInfo(pub Omega);

serde_value_record!(KbMembershipWitnessUpdateInfo);
serde_value_record!(KbNonMembershipWitnessUpdateInfo);

impl KbMembershipWitnessUpdateInfo {
    /// Raw bytes, 48 per coefficient
    pub fn to_bytes(&self) -> Vec<u8> {
        self.0.to_bytes()
    }

    /// Parse the info from its raw bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Omega::from_bytes(bytes).map(Self)
    }
}

impl KbNonMembershipWitnessUpdateInfo {
    /// Raw bytes, 48 per coefficient
    pub fn to_bytes(&self) -> Vec<u8> {
        self.0.to_bytes()
    }

    /// Parse the info from its raw bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Omega::from_bytes(bytes).map(Self)
    }
}

/// Both KB-universal infos for one batch.
///
/// Encoded as a little-endian `u32` byte length of the membership part,
/// the membership part, then the non-membership part.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct KbBothWitnessUpdateInfo {
    /// For membership witnesses
    pub membership: KbMembershipWitnessUpdateInfo,
    /// For non-membership witnesses
    pub non_membership: KbNonMembershipWitnessUpdateInfo,
}

serde_value_record!(KbBothWitnessUpdateInfo);

impl KbBothWitnessUpdateInfo {
    /// Length prefixed concatenation of both parts
    pub fn to_bytes(&self) -> Vec<u8> {
        let mem = self.membership.to_bytes();
        let non_mem = self.non_membership.to_bytes();
        let mut out = Vec::with_capacity(4 + mem.len() + non_mem.len());
        out.extend_from_slice(&(mem.len() as u32).to_le_bytes());
        out.extend_from_slice(&mem);
        out.extend_from_slice(&non_mem);
        out
    }

    /// Split bytes written by `to_bytes`
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < 4 {
            return Err(AccumulatorError::InvalidBytes("missing length prefix"));
        }
        let (prefix, rest) = bytes.split_at(4);
        let mut len = [0u8; 4];
        len.copy_from_slice(prefix);
        let len = u32::from_le_bytes(len) as usize;
        if len > rest.len() {
            return Err(AccumulatorError::InvalidBytes("length prefix too large"));
        }
        let (mem, non_mem) = rest.split_at(len);
        Ok(Self {
            membership: KbMembershipWitnessUpdateInfo::from_bytes(mem)?,
            non_membership: KbNonMembershipWitnessUpdateInfo::from_bytes(non_mem)?,
        })
    }
}
