// SPDX-License-Identifier: Apache-2.0

//! Decoders for the constant text that appears in `.attr` and `.param`
//! lines.
//!
//! Two dialects are accepted:
//! - Bare bit strings such as `0101x`, as written by Yosys. Every character
//!   is one bit, least significant last.
//! - Radiant-style numeric text inside quotes: `0x1A`, `0b101`, `017`
//!   (octal) or plain decimal. Text that does not look numeric is not an
//!   error here; the caller keeps it as a string.

use std::fmt;

use crate::bits::{bits_from_u64, Bits};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiteralError {
    /// A bit string contained something other than `0`, `1`, `x` or `X`.
    InvalidCharacter(char),
    /// A decimal literal does not fit in 64 bits.
    DecimalOverflow,
}

impl fmt::Display for LiteralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralError::InvalidCharacter(c) => {
                write!(f, "invalid character {:?} in integer constant", c)
            }
            LiteralError::DecimalOverflow => write!(f, "decimal integer overflow in parameter"),
        }
    }
}

impl std::error::Error for LiteralError {}

/// Decodes a bit string; the rightmost character is bit 0. Don't-care bits
/// (`x`/`X`) decode as 0.
pub fn parse_bit_string(s: &str) -> Result<Bits, LiteralError> {
    let mut bits = Bits::with_capacity(s.len());
    for c in s.chars().rev() {
        match c {
            '1' => bits.push(true),
            '0' | 'x' | 'X' => bits.push(false),
            other => return Err(LiteralError::InvalidCharacter(other)),
        }
    }
    Ok(bits)
}

/// Value of `c` in the base-36 digit alphabet, case-insensitive.
fn digit_value(c: char) -> Option<u32> {
    c.to_digit(36)
}

/// Decodes Radiant-style numeric text.
///
/// Returns `Ok(None)` when `s` is not a numeric literal at all. Only a
/// decimal value too large for 64 bits is an error.
///
/// Based literals are as wide as their digits: `0x1A` is 8 bits, `017` is 6.
/// Digits are not checked against the radix; each contributes its low bits.
pub fn parse_based_literal(s: &str) -> Result<Option<Bits>, LiteralError> {
    if s.is_empty() {
        return Ok(None);
    }
    let bytes = s.as_bytes();
    let (digits, bits_per_digit) = if bytes.len() >= 2 && bytes[0] == b'0' {
        match bytes[1] {
            b'x' => (&s[2..], 4),
            b'b' => (&s[2..], 1),
            _ => (&s[1..], 3),
        }
    } else {
        return parse_decimal(s);
    };

    let count = digits.chars().count();
    let mut bits = Bits::repeat(false, count * bits_per_digit);
    for (i, c) in digits.chars().rev().enumerate() {
        let Some(value) = digit_value(c) else {
            return Ok(None);
        };
        for j in 0..bits_per_digit {
            bits.set(i * bits_per_digit + j, (value >> j) & 1 == 1);
        }
    }
    Ok(Some(bits))
}

fn parse_decimal(s: &str) -> Result<Option<Bits>, LiteralError> {
    let mut value: u64 = 0;
    for c in s.chars() {
        let Some(digit) = c.to_digit(10) else {
            return Ok(None);
        };
        value = value
            .checked_mul(10)
            .and_then(|v| v.checked_add(u64::from(digit)))
            .ok_or(LiteralError::DecimalOverflow)?;
    }
    Ok(Some(bits_from_u64(64, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::bits_to_u64;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case("101", &[true, false, true]; "plain")]
    #[test_case("1x0", &[false, false, true]; "lowercase dont care")]
    #[test_case("X1", &[true, false]; "uppercase dont care")]
    #[test_case("", &[]; "empty")]
    fn test_bit_string(input: &str, want_lsb_first: &[bool]) {
        let bits = parse_bit_string(input).unwrap();
        let got: Vec<bool> = bits.iter().by_vals().collect();
        assert_eq!(got, want_lsb_first);
    }

    #[test]
    fn test_bit_string_rejects_other_digits() {
        assert_eq!(
            parse_bit_string("12"),
            Err(LiteralError::InvalidCharacter('2'))
        );
        assert_eq!(
            parse_bit_string("0z"),
            Err(LiteralError::InvalidCharacter('z'))
        );
    }

    #[test_case("0x1A", 8, 26; "hex")]
    #[test_case("0xff", 8, 255; "hex lowercase digits")]
    #[test_case("0b101", 3, 5; "binary")]
    #[test_case("017", 6, 15; "octal")]
    #[test_case("42", 64, 42; "decimal")]
    #[test_case("0", 64, 0; "lone zero is decimal")]
    #[test_case("18446744073709551615", 64, u64::MAX; "decimal max")]
    fn test_based_literal(input: &str, want_width: usize, want_value: u64) {
        let bits = parse_based_literal(input).unwrap().unwrap();
        assert_eq!(bits.len(), want_width);
        assert_eq!(bits_to_u64(&bits), Some(want_value));
    }

    #[test_case(""; "empty")]
    #[test_case("abc"; "word")]
    #[test_case("12ab"; "decimal with letters")]
    #[test_case("0x1G_"; "hex with punctuation")]
    #[test_case("SB_LVCMOS"; "io standard name")]
    fn test_based_literal_soft_failure(input: &str) {
        assert_eq!(parse_based_literal(input), Ok(None));
    }

    #[test]
    fn test_decimal_overflow_is_an_error() {
        assert_eq!(
            parse_based_literal("18446744073709551616"),
            Err(LiteralError::DecimalOverflow)
        );
        assert_eq!(
            parse_based_literal("99999999999999999999"),
            Err(LiteralError::DecimalOverflow)
        );
    }

    #[test]
    fn test_out_of_radix_digit_keeps_low_bits() {
        // '9' in an octal literal contributes 0b001.
        let bits = parse_based_literal("09").unwrap().unwrap();
        assert_eq!(bits.len(), 3);
        assert_eq!(bits_to_u64(&bits), Some(1));
    }

    #[test]
    fn test_prefix_without_digits_is_zero_width() {
        let bits = parse_based_literal("0x").unwrap().unwrap();
        assert!(bits.is_empty());
    }
}
