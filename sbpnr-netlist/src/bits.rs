// SPDX-License-Identifier: Apache-2.0

//! Fixed-width bit vectors used for attribute and parameter constants.

use bitvec::prelude::*;

/// Little-endian bit vector: index 0 is the least significant bit.
pub type Bits = BitVec<u64, Lsb0>;

/// Returns a `width`-bit vector holding the low bits of `value`.
pub fn bits_from_u64(width: usize, value: u64) -> Bits {
    let mut bits = Bits::repeat(false, width);
    for i in 0..width.min(64) {
        bits.set(i, (value >> i) & 1 == 1);
    }
    bits
}

/// Returns the unsigned value of `bits`, or `None` if a bit at or above
/// position 64 is set.
pub fn bits_to_u64(bits: &Bits) -> Option<u64> {
    let mut value = 0u64;
    for (i, bit) in bits.iter().by_vals().enumerate() {
        if !bit {
            continue;
        }
        if i >= 64 {
            return None;
        }
        value |= 1 << i;
    }
    Some(value)
}

/// Formats `bits` most-significant-bit first, e.g. `4'b0101`.
pub fn bits_to_string(bits: &Bits) -> String {
    let digits: String = bits
        .iter()
        .by_vals()
        .rev()
        .map(|b| if b { '1' } else { '0' })
        .collect();
    format!("{}'b{}", bits.len(), digits)
}
