//! Primitive operations: the keyed algebra on accumulated values, elements and
//! witness points. Nothing here consults a state store or keeps custody of a key.
mod acc;
mod key;
mod omega;
pub(crate) mod update;
pub mod utils;

pub use acc::*;
pub use key::*;
pub use omega::*;
pub use utils::*;
