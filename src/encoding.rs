//! Mapping application values to accumulator elements.
//!
//! Both encodings are one-way. Holders keep the original value and re-encode it when
//! they need the element.

use crate::{
    accumulator::Element,
    error::{AccumulatorError, Result},
};

const NUMBER_PREFIX: &[u8] = b"VB-ACC-NUMBER-";

/// Encode `value`, which is declared to fit in `max_bits` bits.
///
/// Fails with `EncodingOverflow` if `max_bits` is above 64 or `value` needs more bits.
/// The declared width is part of the encoding so the same number under two widths
/// gives two different elements.
pub fn encode_positive_number(value: u64, max_bits: u32) -> Result<Element> {
    if max_bits > u64::BITS || u64::BITS - value.leading_zeros() > max_bits {
        return Err(AccumulatorError::EncodingOverflow { bits: max_bits });
    }
    let width = max_bits.div_ceil(8) as usize;
    let mut input = Vec::with_capacity(NUMBER_PREFIX.len() + 1 + width);
    input.extend_from_slice(NUMBER_PREFIX);
    input.push(max_bits as u8);
    input.extend_from_slice(&value.to_be_bytes()[8 - width..]);
    Ok(Element::hash(&input))
}

/// Encode arbitrary bytes
pub fn encode_bytes(data: &[u8]) -> Element {
    Element::hash(data)
}
