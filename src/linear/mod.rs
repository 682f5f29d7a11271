//! One dimensional symbologies. Every encoder accumulates its module
//! sequence (1 = bar, 0 = space) in a [`BitStream`] and hands it to
//! [`LinearSymbol::from_modules`], which run-length encodes it into widths.

mod code128;
mod code39;
mod ean;
mod itf;

pub use code128::encode_code128;
pub use code39::encode_code39;
pub use ean::{encode_ean13, encode_ean8, encode_upc_a};
pub use itf::encode_itf;

use crate::common::bitstream::BitStream;
use crate::common::error::{EncodeError, EncodeResult, InputIssue};
use crate::encode::Symbology;

// Linear symbol
//------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinearSymbol {
    symbology: Symbology,
    widths: Vec<u8>,
    final_digits: String,
}

impl LinearSymbol {
    pub(crate) fn from_modules(
        symbology: Symbology,
        modules: &BitStream,
        final_digits: String,
    ) -> Self {
        debug_assert!(modules.is_empty() || modules.get(0), "Pattern must start with a bar");

        let mut widths: Vec<u8> = Vec::new();
        let mut last = None;
        for bit in modules.iter() {
            match widths.last_mut() {
                Some(w) if last == Some(bit) => *w += 1,
                _ => widths.push(1),
            }
            last = Some(bit);
        }
        Self { symbology, widths, final_digits }
    }

    pub fn symbology(&self) -> Symbology {
        self.symbology
    }

    /// Alternating bar and space widths in modules, starting with a bar
    pub fn widths(&self) -> &[u8] {
        &self.widths
    }

    /// Human readable text, including any computed check digit
    pub fn final_digits(&self) -> &str {
        &self.final_digits
    }

    /// Total width in modules
    pub fn modules(&self) -> usize {
        self.widths.iter().map(|&w| w as usize).sum()
    }

    /// Expands widths back into one flag per module, true for bars
    pub fn to_modules(&self) -> Vec<bool> {
        self.widths
            .iter()
            .enumerate()
            .flat_map(|(i, &w)| std::iter::repeat(i % 2 == 0).take(w as usize))
            .collect()
    }
}


// Shared helpers
//------------------------------------------------------------------------------

pub(crate) fn non_empty(symbology: Symbology, payload: &str) -> EncodeResult<()> {
    if payload.is_empty() {
        return Err(EncodeError::invalid(symbology, InputIssue::Empty));
    }
    Ok(())
}

/// Parses a payload made only of ASCII digits
pub(crate) fn parse_digits(symbology: Symbology, payload: &str) -> EncodeResult<Vec<u8>> {
    non_empty(symbology, payload)?;
    payload
        .chars()
        .enumerate()
        .map(|(pos, ch)| match ch.to_digit(10) {
            Some(d) => Ok(d as u8),
            _ => Err(EncodeError::invalid(symbology, InputIssue::IllegalChar { ch, pos })),
        })
        .collect()
}

/// Mod 10 check digit with alternating weights, `first_weight` applied to index 0
pub(crate) fn mod10_check_digit(digits: &[u8], first_weight: u32) -> u8 {
    let other_weight = 4 - first_weight;
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, &d)| d as u32 * if i % 2 == 0 { first_weight } else { other_weight })
        .sum();
    ((10 - sum % 10) % 10) as u8
}

pub(crate) fn digits_to_string(digits: &[u8]) -> String {
    digits.iter().map(|&d| char::from(b'0' + d)).collect()
}
