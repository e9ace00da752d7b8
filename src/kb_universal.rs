//! KB-universal accumulator: two positive accumulators over a domain, one holding the
//! members and one holding every domain element that is not a member.
//!
//! A non-membership witness is a membership witness in the non-member accumulator, so
//! non-membership proofs cost the same as membership proofs. The domain can grow with
//! [`KbUniversalAccumulatorManager::extend`], which only changes the non-member side.
mod accumulator;
mod witness;

pub use accumulator::*;
pub use witness::*;
