use tracing::debug;

use super::{digits_to_string, parse_digits, LinearSymbol};
use crate::common::bitstream::BitStream;
use crate::common::error::EncodeResult;
use crate::encode::Symbology;

// Interleaved 2 of 5
//------------------------------------------------------------------------------

/// Digits are encoded in pairs, the first digit of each pair in the bars and
/// the second in the spaces. Odd length input gets a leading zero.
pub fn encode_itf(payload: &str) -> EncodeResult<LinearSymbol> {
    let mut digits = parse_digits(Symbology::Itf, payload)?;
    if digits.len() % 2 == 1 {
        digits.insert(0, 0);
    }

    let pairs = digits.len() / 2;
    let mut modules = BitStream::new(START_WIDTH + pairs * PAIR_WIDTH + STOP_WIDTH);
    push_elements(&START, &mut modules);
    for pair in digits.chunks_exact(2) {
        let (bars, spaces) = (PATTERNS[pair[0] as usize], PATTERNS[pair[1] as usize]);
        for i in (0..5).rev() {
            push_element(true, (bars >> i) & 1 == 1, &mut modules);
            push_element(false, (spaces >> i) & 1 == 1, &mut modules);
        }
    }
    push_elements(&STOP, &mut modules);

    debug!(pairs, modules = modules.len(), "Encoded itf");
    Ok(LinearSymbol::from_modules(Symbology::Itf, &modules, digits_to_string(&digits)))
}

fn push_element(bar: bool, wide: bool, out: &mut BitStream) {
    let width = if wide { WIDE } else { 1 };
    out.push_bits(if bar { (1u8 << width) - 1 } else { 0 }, width);
}

fn push_elements(elements: &[(bool, bool)], out: &mut BitStream) {
    for &(bar, wide) in elements {
        push_element(bar, wide, out);
    }
}


// Global constants
//------------------------------------------------------------------------------

const WIDE: usize = 3;

const PAIR_WIDTH: usize = 2 * (3 * WIDE + 2);

const START_WIDTH: usize = 4;

const STOP_WIDTH: usize = WIDE + 2;

// (bar, wide)
static START: [(bool, bool); 4] = [(true, false), (false, false), (true, false), (false, false)];

static STOP: [(bool, bool); 3] = [(true, true), (false, false), (true, false)];

// Five elements per digit, MSB first, 1 = wide
static PATTERNS: [u8; 10] =
    [0b00110, 0b10001, 0b01001, 0b11000, 0b00101, 0b10100, 0b01100, 0b00011, 0b10010, 0b01010];
