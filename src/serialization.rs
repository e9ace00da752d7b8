//! Serde support. Every opaque value serializes as a record `{ value: bytes }`
//! holding exactly its `to_bytes` output.
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
pub(crate) struct ValueRef<'a> {
    #[serde(with = "serde_bytes")]
    pub(crate) value: &'a [u8],
}

#[derive(Deserialize)]
pub(crate) struct ValueOwned {
    #[serde(with = "serde_bytes")]
    pub(crate) value: Vec<u8>,
}

/// Implement `Serialize` and `Deserialize` as a `{ value }` record for a type with
/// `to_bytes(&self)` and `from_bytes(&[u8]) -> Result<Self>`
macro_rules! serde_value_record {
    ($name:ident) => {
        impl serde::Serialize for $name {
            fn serialize<S>(&self, s: S) -> core::result::Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                let bytes = self.to_bytes();
                serde::Serialize::serialize(
                    &$crate::serialization::ValueRef {
                        value: bytes.as_ref(),
                    },
                    s,
                )
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(d: D) -> core::result::Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let record =
                    <$crate::serialization::ValueOwned as serde::Deserialize>::deserialize(d)?;
                Self::from_bytes(&record.value).map_err(serde::de::Error::custom)
            }
        }
    };
}
