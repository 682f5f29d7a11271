use tracing::debug;

use super::{digits_to_string, mod10_check_digit, parse_digits, LinearSymbol};
use crate::common::bitstream::BitStream;
use crate::common::error::{EncodeError, EncodeResult, InputIssue};
use crate::encode::Symbology;

// EAN / UPC family
//------------------------------------------------------------------------------

/// EAN-13 from 12 data digits, or 13 digits with a check digit to verify.
/// The first digit is implied by the parity of the left half.
pub fn encode_ean13(payload: &str) -> EncodeResult<LinearSymbol> {
    let digits = complete_digits(Symbology::Ean13, payload, 12, 1)?;
    let parity = PARITY[digits[0] as usize];

    let mut modules = BitStream::new(95);
    modules.push_bits(EDGE_GUARD, EDGE_GUARD_WIDTH);
    for (i, &d) in digits[1..7].iter().enumerate() {
        let even = (parity >> (5 - i)) & 1 == 1;
        let pattern = if even { G_PATTERNS[d as usize] } else { L_PATTERNS[d as usize] };
        modules.push_bits(pattern, DIGIT_WIDTH);
    }
    push_right_half(&digits[7..], &mut modules);

    Ok(finish(Symbology::Ean13, &modules, &digits))
}

/// EAN-8 from 7 data digits, or 8 digits with a check digit to verify
pub fn encode_ean8(payload: &str) -> EncodeResult<LinearSymbol> {
    let digits = complete_digits(Symbology::Ean8, payload, 7, 3)?;

    let mut modules = BitStream::new(67);
    modules.push_bits(EDGE_GUARD, EDGE_GUARD_WIDTH);
    push_left_half(&digits[..4], &mut modules);
    push_right_half(&digits[4..], &mut modules);

    Ok(finish(Symbology::Ean8, &modules, &digits))
}

/// UPC-A from 11 data digits, or 12 digits with a check digit to verify
pub fn encode_upc_a(payload: &str) -> EncodeResult<LinearSymbol> {
    let digits = complete_digits(Symbology::Upc, payload, 11, 3)?;

    let mut modules = BitStream::new(95);
    modules.push_bits(EDGE_GUARD, EDGE_GUARD_WIDTH);
    push_left_half(&digits[..6], &mut modules);
    push_right_half(&digits[6..], &mut modules);

    Ok(finish(Symbology::Upc, &modules, &digits))
}

/// Left pads short input with zeros and appends the check digit. Input that
/// already carries a check digit is verified instead.
fn complete_digits(
    symbology: Symbology,
    payload: &str,
    data_len: usize,
    first_weight: u32,
) -> EncodeResult<Vec<u8>> {
    let digits = parse_digits(symbology, payload)?;
    let max = data_len + 1;
    match digits.len() {
        n if n > max => {
            Err(EncodeError::invalid(symbology, InputIssue::TooLong { max, got: n }))
        }
        n if n == max => {
            let expected = mod10_check_digit(&digits[..data_len], first_weight);
            let found = digits[data_len];
            if expected != found {
                let issue = InputIssue::CheckDigitMismatch { expected, found };
                return Err(EncodeError::invalid(symbology, issue));
            }
            Ok(digits)
        }
        n => {
            let mut full = vec![0; data_len - n];
            full.extend(digits);
            full.push(mod10_check_digit(&full, first_weight));
            Ok(full)
        }
    }
}

fn push_left_half(digits: &[u8], out: &mut BitStream) {
    for &d in digits {
        out.push_bits(L_PATTERNS[d as usize], DIGIT_WIDTH);
    }
}

fn push_right_half(digits: &[u8], out: &mut BitStream) {
    out.push_bits(CENTER_GUARD, CENTER_GUARD_WIDTH);
    for &d in digits {
        out.push_bits(R_PATTERNS[d as usize], DIGIT_WIDTH);
    }
    out.push_bits(EDGE_GUARD, EDGE_GUARD_WIDTH);
}

fn finish(symbology: Symbology, modules: &BitStream, digits: &[u8]) -> LinearSymbol {
    debug_assert_eq!(modules.len(), modules.capacity());
    let text = digits_to_string(digits);
    debug!(%symbology, digits = %text, "Encoded symbol");
    LinearSymbol::from_modules(symbology, modules, text)
}

#[cfg(test)]
mod ean_tests {
    use test_case::test_case;

    use super::{encode_ean13, encode_ean8, encode_upc_a};
    use crate::common::error::{EncodeError, InputIssue};
    use crate::encode::Symbology;

    #[test_case("400638133393", "4006381333931")]
    #[test_case("4006381333931", "4006381333931")]
    #[test_case("590123412345", "5901234123457")]
    #[test_case("123", "0000000001236")]
    fn test_ean13_digits(payload: &str, exp: &str) {
        let sym = encode_ean13(payload).unwrap();
        assert_eq!(sym.final_digits(), exp);
        assert_eq!(sym.modules(), 95);
        // 3 guards + 12 digits of 4 elements each
        assert_eq!(sym.widths().len(), 59);
    }

    #[test]
    fn test_ean13_left_half_parity() {
        // Leading 4 selects LGLLGG, so the first 0 is L and the second 0 is G
        let sym = encode_ean13("400638133393").unwrap();
        assert_eq!(&sym.widths()[..3], [1, 1, 1]);
        assert_eq!(&sym.widths()[3..7], [3, 2, 1, 1]);
        assert_eq!(&sym.widths()[7..11], [1, 1, 2, 3]);
    }

    #[test]
    fn test_ean8() {
        let sym = encode_ean8("9638507").unwrap();
        assert_eq!(sym.final_digits(), "96385074");
        assert_eq!(sym.modules(), 67);
        assert_eq!(sym.widths().len(), 3 + 16 + 5 + 16 + 3);
        assert_eq!(encode_ean8("96385074").unwrap(), sym);
    }

    #[test]
    fn test_upc_a() {
        let sym = encode_upc_a("03600029145").unwrap();
        assert_eq!(sym.final_digits(), "036000291452");
        assert_eq!(sym.modules(), 95);
    }

    #[test]
    fn test_upc_a_is_ean13_with_leading_zero() {
        let upc = encode_upc_a("03600029145").unwrap();
        let ean = encode_ean13("003600029145").unwrap();
        assert_eq!(upc.widths(), ean.widths());
    }

    #[test]
    fn test_check_digit_mismatch() {
        let err = encode_ean13("4006381333932").unwrap_err();
        let issue = InputIssue::CheckDigitMismatch { expected: 1, found: 2 };
        assert_eq!(err, EncodeError::invalid(Symbology::Ean13, issue));
        let err = encode_ean8("96385075").unwrap_err();
        let issue = InputIssue::CheckDigitMismatch { expected: 4, found: 5 };
        assert_eq!(err, EncodeError::invalid(Symbology::Ean8, issue));
    }

    #[test_case(Symbology::Ean13, 13)]
    #[test_case(Symbology::Ean8, 8)]
    #[test_case(Symbology::Upc, 12)]
    fn test_too_long(symbology: Symbology, max: usize) {
        let payload = "1".repeat(max + 1);
        let res = match symbology {
            Symbology::Ean13 => encode_ean13(&payload),
            Symbology::Ean8 => encode_ean8(&payload),
            _ => encode_upc_a(&payload),
        };
        let issue = InputIssue::TooLong { max, got: max + 1 };
        assert_eq!(res.unwrap_err(), EncodeError::invalid(symbology, issue));
    }

    #[test]
    fn test_rejects_non_digits() {
        assert!(encode_ean13("12345-789012").is_err());
        assert!(encode_upc_a("").is_err());
    }
}

// Global constants
//------------------------------------------------------------------------------

const DIGIT_WIDTH: usize = 7;

const EDGE_GUARD: u8 = 0b101;

const EDGE_GUARD_WIDTH: usize = 3;

const CENTER_GUARD: u8 = 0b01010;

const CENTER_GUARD_WIDTH: usize = 5;

// Odd parity, left half
static L_PATTERNS: [u8; 10] = [
    0b0001101, 0b0011001, 0b0010011, 0b0111101, 0b0100011, 0b0110001, 0b0101111, 0b0111011,
    0b0110111, 0b0001011,
];

// Even parity, left half
static G_PATTERNS: [u8; 10] = [
    0b0100111, 0b0110011, 0b0011011, 0b0100001, 0b0011101, 0b0111001, 0b0000101, 0b0010001,
    0b0001001, 0b0010111,
];

static R_PATTERNS: [u8; 10] = [
    0b1110010, 0b1100110, 0b1101100, 0b1000010, 0b1011100, 0b1001110, 0b1010000, 0b1000100,
    0b1001000, 0b1110100,
];

// Parity of the six left digits per leading digit, MSB first, 1 = G
static PARITY: [u8; 10] = [
    0b000000, 0b001011, 0b001101, 0b001110, 0b010011, 0b011001, 0b011100, 0b010101, 0b010110,
    0b011010,
];
