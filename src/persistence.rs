//! Interfaces to the stores the host application keeps next to an accumulator.
//!
//! Stores are consulted only to check presence before a change and are updated only
//! after the new accumulated value has been computed.
use crate::{
    accumulator::Element,
    error::{AccumulatorError, Result},
};
use std::collections::HashSet;

/// Holds the members baked into a universal accumulator when it is initialized.
/// These are never added or removed afterwards and only the manager needs to keep them.
pub trait InitialElementsStore {
    /// Add element
    fn add(&mut self, element: Element);

    /// Check if element is present
    fn has(&self, element: &Element) -> bool;
}

/// Tracks the elements currently accumulated
pub trait State {
    /// Add element
    fn add(&mut self, element: Element);

    /// Remove element
    fn remove(&mut self, element: &Element);

    /// Check if element is present
    fn has(&self, element: &Element) -> bool;
}

/// A [`State`] that can enumerate its members, needed to compute universal
/// non-membership witnesses
pub trait UniversalState: State {
    /// Iterate over every element currently present
    fn elements(&self) -> Box<dyn Iterator<Item = Element> + '_>;
}

/// A [`State`] that also knows the KB-universal domain
pub trait KbUniversalState: State {
    /// Check if the element is part of the domain
    fn in_domain(&self, element: &Element) -> bool;

    /// Grow the domain
    fn add_to_domain(&mut self, element: Element);
}

fn has_repeats(elements: &[Element]) -> bool {
    let mut seen = HashSet::with_capacity(elements.len());
    !elements.iter().all(|e| seen.insert(*e))
}

/// Fails with `AlreadyPresent` if any element is a member or appears twice in `elements`
pub(crate) fn check_absent<S>(state: Option<&S>, elements: &[Element]) -> Result<()>
where
    S: State + ?Sized,
{
    if has_repeats(elements) {
        return Err(AccumulatorError::AlreadyPresent);
    }
    match state {
        Some(state) if elements.iter().any(|e| state.has(e)) => {
            Err(AccumulatorError::AlreadyPresent)
        }
        _ => Ok(()),
    }
}

/// Fails with `NotPresent` if any element is not a member
pub(crate) fn check_present<S>(state: Option<&S>, elements: &[Element]) -> Result<()>
where
    S: State + ?Sized,
{
    match state {
        Some(state) if elements.iter().any(|e| !state.has(e)) => {
            Err(AccumulatorError::NotPresent)
        }
        _ => Ok(()),
    }
}

/// Like [`check_present`], and a removal listed twice is already gone the second time
pub(crate) fn check_removable<S>(state: Option<&S>, elements: &[Element]) -> Result<()>
where
    S: State + ?Sized,
{
    if has_repeats(elements) {
        return Err(AccumulatorError::NotPresent);
    }
    check_present(state, elements)
}

/// Fails with `AlreadyInDomain` if any element is in the domain or appears twice in `elements`
pub(crate) fn check_outside_domain<S>(state: Option<&S>, elements: &[Element]) -> Result<()>
where
    S: KbUniversalState + ?Sized,
{
    if has_repeats(elements) {
        return Err(AccumulatorError::AlreadyInDomain);
    }
    match state {
        Some(state) if elements.iter().any(|e| state.in_domain(e)) => {
            Err(AccumulatorError::AlreadyInDomain)
        }
        _ => Ok(()),
    }
}

/// Record a finished batch
pub(crate) fn record<S>(state: Option<&mut S>, additions: &[Element], removals: &[Element])
where
    S: State + ?Sized,
{
    if let Some(state) = state {
        for e in additions {
            state.add(*e);
        }
        for e in removals {
            state.remove(e);
        }
    }
}
