/*
    Copyright Hyperledger Foundation. All Rights Reserved.
    SPDX-License-Identifier: Apache-2.0
*/
//! Dynamic accumulators and the witness synchronization protocol from
//! <https://eprint.iacr.org/2020/777> (VB accumulators) and the KB-universal
//! construction built from two positive accumulators.
//!
//! The accumulator manager holds the secret key and mutates the accumulated value
//! through a [`PositiveAccumulatorManager`], [`UniversalAccumulatorManager`] or
//! [`KbUniversalAccumulatorManager`]. Every change can be published together with a
//! [`WitnessUpdatePublicInfo`] so that witness holders who missed it can bring their
//! [`MembershipWitness`] or [`NonMembershipWitness`] up to date without the secret key.
//! Verifiers only ever see the public accumulators ([`PositiveAccumulator`],
//! [`UniversalAccumulator`], [`KbUniversalAccumulator`]).
#![deny(
    missing_docs,
    unused_import_braces,
    unused_qualifications,
    unused_parens,
    unused_lifetimes,
    unconditional_recursion,
    unused_extern_crates,
    trivial_casts,
    trivial_numeric_casts
)]
#[macro_use]
mod serialization;

mod config;
mod encoding;
mod error;
mod kb_universal;
mod persistence;
mod positive;
mod public_info;
mod universal;
mod witness;

#[cfg(test)]
mod tests;

pub mod accumulator;
pub use config::*;
pub use encoding::*;
pub use error::*;
pub use kb_universal::*;
pub use persistence::*;
pub use positive::*;
pub use public_info::*;
pub use universal::*;
pub use witness::*;
