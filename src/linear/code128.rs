use tracing::debug;

use super::LinearSymbol;
use crate::common::bitstream::BitStream;
use crate::common::error::{EncodeError, EncodeResult, InputIssue};
use crate::encode::Symbology;

// Code 128 subset B
//------------------------------------------------------------------------------

/// Encodes printable ASCII (and DEL) with start B, a mod 103 check symbol,
/// the stop symbol and the final 2 module termination bar.
pub fn encode_code128(payload: &str) -> EncodeResult<LinearSymbol> {
    super::non_empty(Symbology::Code128, payload)?;
    let values = payload
        .chars()
        .enumerate()
        .map(|(pos, ch)| match ch {
            ' '..='\u{7f}' => Ok(ch as usize - 32),
            _ => {
                let issue = InputIssue::IllegalChar { ch, pos };
                Err(EncodeError::invalid(Symbology::Code128, issue))
            }
        })
        .collect::<EncodeResult<Vec<usize>>>()?;

    let checksum = checksum(&values);
    let mut modules = BitStream::new((values.len() + 3) * SYMBOL_WIDTH + TERMINATION_WIDTH);
    modules.push_bits(PATTERNS[START_B], SYMBOL_WIDTH);
    for &v in values.iter() {
        modules.push_bits(PATTERNS[v], SYMBOL_WIDTH);
    }
    modules.push_bits(PATTERNS[checksum], SYMBOL_WIDTH);
    modules.push_bits(PATTERNS[STOP], SYMBOL_WIDTH);
    modules.push_bits(TERMINATION_BAR, TERMINATION_WIDTH);

    debug!(len = values.len(), checksum, modules = modules.len(), "Encoded code128");
    Ok(LinearSymbol::from_modules(Symbology::Code128, &modules, payload.to_string()))
}

fn checksum(values: &[usize]) -> usize {
    let weighted: usize = values.iter().enumerate().map(|(i, &v)| v * (i + 1)).sum();
    (START_B + weighted) % 103
}


// Global constants
//------------------------------------------------------------------------------

const START_B: usize = 104;

const STOP: usize = 106;

const SYMBOL_WIDTH: usize = 11;

const TERMINATION_BAR: u8 = 0b11;

const TERMINATION_WIDTH: usize = 2;

// Module patterns indexed by symbol value, bar first
static PATTERNS: [u16; 107] = [
    0b11011001100, 0b11001101100, 0b11001100110, 0b10010011000, 0b10010001100, 0b10001001100,
    0b10011001000, 0b10011000100, 0b10001100100, 0b11001001000, 0b11001000100, 0b11000100100,
    0b10110011100, 0b10011011100, 0b10011001110, 0b10111001100, 0b10011101100, 0b10011100110,
    0b11001110010, 0b11001011100, 0b11001001110, 0b11011100100, 0b11001110100, 0b11101101110,
    0b11101001100, 0b11100101100, 0b11100100110, 0b11101100100, 0b11100110100, 0b11100110010,
    0b11011011000, 0b11011000110, 0b11000110110, 0b10100011000, 0b10001011000, 0b10001000110,
    0b10110001000, 0b10001101000, 0b10001100010, 0b11010001000, 0b11000101000, 0b11000100010,
    0b10110111000, 0b10110001110, 0b10001101110, 0b10111011000, 0b10111000110, 0b10001110110,
    0b11101110110, 0b11010001110, 0b11000101110, 0b11011101000, 0b11011100010, 0b11011101110,
    0b11101011000, 0b11101000110, 0b11100010110, 0b11101101000, 0b11101100010, 0b11100011010,
    0b11101111010, 0b11001000010, 0b11110001010, 0b10100110000, 0b10100001100, 0b10010110000,
    0b10010000110, 0b10000101100, 0b10000100110, 0b10110010000, 0b10110000100, 0b10011010000,
    0b10011000010, 0b10000110100, 0b10000110010, 0b11000010010, 0b11001010000, 0b11110111010,
    0b11000010100, 0b10001111010, 0b10100111100, 0b10010111100, 0b10010011110, 0b10111100100,
    0b10011110100, 0b10011110010, 0b11110100100, 0b11110010100, 0b11110010010, 0b11011011110,
    0b11011110110, 0b11110110110, 0b10101111000, 0b10100011110, 0b10001011110, 0b10111101000,
    0b10111100010, 0b11110101000, 0b11110100010, 0b10111011110, 0b10111101110, 0b11101011110,
    0b11110101110, 0b11010000100, 0b11010010000, 0b11010011100, 0b11000111010,
];
