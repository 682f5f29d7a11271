use tracing::debug;

use super::LinearSymbol;
use crate::common::bitstream::BitStream;
use crate::common::error::{EncodeError, EncodeResult, InputIssue};
use crate::encode::Symbology;

// Code 39
//------------------------------------------------------------------------------

/// Uppercases the payload and wraps it in `*` delimiters. Characters are
/// separated by a narrow gap, there is no check character.
pub fn encode_code39(payload: &str) -> EncodeResult<LinearSymbol> {
    super::non_empty(Symbology::Code39, payload)?;
    let text = payload.to_ascii_uppercase();
    let indices = text
        .chars()
        .enumerate()
        .map(|(pos, ch)| {
            let index = if ch == '*' { None } else { CHARSET.find(ch) };
            let issue = InputIssue::IllegalChar { ch, pos };
            index.ok_or(EncodeError::invalid(Symbology::Code39, issue))
        })
        .collect::<EncodeResult<Vec<usize>>>()?;

    let symbols = indices.len() + 2;
    let mut modules = BitStream::new(symbols * (SYMBOL_WIDTH + 1) - 1);
    modules.push_bits(PATTERNS[DELIMITER], SYMBOL_WIDTH);
    for i in indices.into_iter().chain([DELIMITER]) {
        modules.push(false);
        modules.push_bits(PATTERNS[i], SYMBOL_WIDTH);
    }

    debug!(len = symbols - 2, modules = modules.len(), "Encoded code39");
    Ok(LinearSymbol::from_modules(Symbology::Code39, &modules, text))
}

#[cfg(test)]
mod code39_tests {
    use super::{encode_code39, CHARSET, PATTERNS};
    use crate::common::error::{EncodeError, InputIssue};
    use crate::encode::Symbology;

    #[test]
    fn test_single_char() {
        let sym = encode_code39("A").unwrap();
        // *A* is 3 symbols of 12 modules and 2 gaps
        assert_eq!(sym.modules(), 38);
        assert_eq!(&sym.widths()[..9], [1, 2, 1, 1, 2, 1, 2, 1, 1]);
        // Gap, then A = 110101001011
        assert_eq!(&sym.widths()[9..19], [1, 2, 1, 1, 1, 1, 2, 1, 1, 2]);
        assert_eq!(sym.widths().len() % 2, 1);
    }

    #[test]
    fn test_uppercases() {
        let lower = encode_code39("code-39").unwrap();
        let upper = encode_code39("CODE-39").unwrap();
        assert_eq!(lower, upper);
        assert_eq!(lower.final_digits(), "CODE-39");
    }

    #[test]
    fn test_full_charset() {
        let payload = &CHARSET[..CHARSET.len() - 1];
        let sym = encode_code39(payload).unwrap();
        assert_eq!(sym.modules(), (payload.len() + 2) * 13 - 1);
    }

    #[test]
    fn test_illegal_char() {
        let err = encode_code39("AB*C").unwrap_err();
        let issue = InputIssue::IllegalChar { ch: '*', pos: 2 };
        assert_eq!(err, EncodeError::invalid(Symbology::Code39, issue));
        assert!(encode_code39("a_b").is_err());
        assert!(encode_code39("").is_err());
    }

    #[test]
    fn test_patterns_have_three_wide_elements() {
        for p in PATTERNS {
            let bits: Vec<bool> = (0..12).rev().map(|i| (p >> i) & 1 == 1).collect();
            let mut runs = vec![1];
            for w in bits.windows(2) {
                if w[0] == w[1] {
                    *runs.last_mut().unwrap() += 1;
                } else {
                    runs.push(1);
                }
            }
            assert_eq!(runs.len(), 9, "{p:012b}");
            assert_eq!(runs.iter().filter(|&&r| r == 2).count(), 3, "{p:012b}");
        }
    }
}

// Global constants
//------------------------------------------------------------------------------

static CHARSET: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ-. $/+%*";

const DELIMITER: usize = 43;

const SYMBOL_WIDTH: usize = 12;

// Narrow element = 1 module, wide = 2, bar first
static PATTERNS: [u16; 44] = [
    0b101001101101, 0b110100101011, 0b101100101011, 0b110110010101, 0b101001101011, 0b110100110101,
    0b101100110101, 0b101001011011, 0b110100101101, 0b101100101101, 0b110101001011, 0b101101001011,
    0b110110100101, 0b101011001011, 0b110101100101, 0b101101100101, 0b101010011011, 0b110101001101,
    0b101101001101, 0b101011001101, 0b110101010011, 0b101101010011, 0b110110101001, 0b101011010011,
    0b110101101001, 0b101101101001, 0b101010110011, 0b110101011001, 0b101101011001, 0b101011011001,
    0b110010101011, 0b100110101011, 0b110011010101, 0b100101101011, 0b110010110101, 0b100110110101,
    0b100101011011, 0b110010101101, 0b100110101101, 0b100100100101, 0b100100101001, 0b100101001001,
    0b101001001001, 0b100101101101,
];
