use std::borrow::Cow;

use encoding_rs::mem::{encode_latin1_lossy, is_str_latin1};
use tracing::debug;

use super::bitstream::BitStream;
use super::error::{EncodeError, EncodeResult, InputIssue};
use super::metadata::{Charset, ECLevel, Version};
use crate::encode::Symbology;

// Charset conversion
//------------------------------------------------------------------------------

/// Converts the payload into the bytes carried by the byte segment
pub fn to_bytes(text: &str, charset: Charset) -> EncodeResult<Cow<'_, [u8]>> {
    match charset {
        Charset::Utf8 => Ok(Cow::Borrowed(text.as_bytes())),
        Charset::Utf8Bom if text.is_ascii() => Ok(Cow::Borrowed(text.as_bytes())),
        Charset::Utf8Bom => {
            let mut bytes = Vec::with_capacity(UTF8_BOM.len() + text.len());
            bytes.extend_from_slice(&UTF8_BOM);
            bytes.extend_from_slice(text.as_bytes());
            Ok(Cow::Owned(bytes))
        }
        Charset::Iso8859_1 => {
            // Strict Latin-1: every code point maps to the byte of equal value
            if !is_str_latin1(text) {
                let issue = InputIssue::Unmappable { charset };
                return Err(EncodeError::invalid(Symbology::Qr, issue));
            }
            Ok(encode_latin1_lossy(text))
        }
    }
}


// Encoder
//------------------------------------------------------------------------------

/// Data codewords needed to carry `len` bytes in one byte segment at `ver`
pub fn required_codewords(len: usize, ver: Version) -> usize {
    (MODE_INDICATOR_BITS + ver.char_cnt_bits() + (len << 3) + 7) >> 3
}

/// Picks the smallest version able to hold `data` and encodes it
pub fn encode(data: &[u8], ecl: ECLevel) -> EncodeResult<(BitStream, Version)> {
    let ver = find_min_version(data.len(), ecl)?;
    debug!(version = *ver, ?ecl, len = data.len(), "Selected version");
    Ok((write(data, ver, ecl), ver))
}

pub fn encode_with_version(data: &[u8], ver: Version, ecl: ECLevel) -> EncodeResult<BitStream> {
    let needed = required_codewords(data.len(), ver);
    let capacity = ver.data_codewords(ecl);
    if needed > capacity {
        return Err(EncodeError::CapacityExceeded { needed, capacity, ec_level: ecl });
    }
    Ok(write(data, ver, ecl))
}

fn find_min_version(len: usize, ecl: ECLevel) -> EncodeResult<Version> {
    Version::all().find(|v| required_codewords(len, *v) <= v.data_codewords(ecl)).ok_or_else(|| {
        EncodeError::CapacityExceeded {
            needed: required_codewords(len, Version::MAX),
            capacity: Version::MAX.data_codewords(ecl),
            ec_level: ecl,
        }
    })
}

fn write(data: &[u8], ver: Version, ecl: ECLevel) -> BitStream {
    let mut bs = BitStream::new(ver.data_bit_capacity(ecl));
    writer::push_segment(data, ver, &mut bs);
    writer::push_terminator(&mut bs);
    writer::pad_remaining_capacity(&mut bs);
    bs
}

#[cfg(test)]
mod encode_tests {
    use test_case::test_case;

    use super::{encode, encode_with_version, required_codewords, to_bytes};
    use crate::common::error::EncodeError;
    use crate::common::metadata::{Charset, ECLevel, Version};

    #[test]
    fn test_required_codewords() {
        let v1 = Version::new(1).unwrap();
        let v10 = Version::new(10).unwrap();
        assert_eq!(required_codewords(0, v1), 2);
        assert_eq!(required_codewords(17, v1), 19);
        assert_eq!(required_codewords(17, v10), 20);
    }

    #[test]
    fn test_encode_single_byte() {
        let (bs, ver) = encode(b"A", ECLevel::L).unwrap();
        assert_eq!(*ver, 1);
        let exp = [
            0x40, 0x14, 0x10, 0xEC, 0x11, 0xEC, 0x11, 0xEC, 0x11, 0xEC, 0x11, 0xEC, 0x11, 0xEC,
            0x11, 0xEC, 0x11, 0xEC, 0x11,
        ];
        assert_eq!(bs.data(), exp);
    }

    #[test]
    fn test_encode_utf8_bom_segment() {
        let data = to_bytes("é", Charset::Utf8Bom).unwrap();
        let (bs, ver) = encode(&data, ECLevel::L).unwrap();
        assert_eq!(*ver, 1);
        assert_eq!(&bs.data()[..7], [0x40, 0x5E, 0xFB, 0xBB, 0xFC, 0x3A, 0x90]);
    }

    #[test]
    fn test_encode_empty() {
        let (bs, ver) = encode(b"", ECLevel::H).unwrap();
        assert_eq!(*ver, 1);
        assert_eq!(bs.len(), 9 * 8);
        assert_eq!(&bs.data()[..4], [0x40, 0x00, 0xEC, 0x11]);
    }

    // Byte mode capacity boundaries
    #[test_case(17, ECLevel::L, 1)]
    #[test_case(18, ECLevel::L, 2)]
    #[test_case(7, ECLevel::H, 1)]
    #[test_case(8, ECLevel::H, 2)]
    #[test_case(2953, ECLevel::L, 40)]
    #[test_case(1273, ECLevel::H, 40)]
    fn test_version_selection(len: usize, ecl: ECLevel, exp: u8) {
        let data = vec![b'a'; len];
        let (bs, ver) = encode(&data, ecl).unwrap();
        assert_eq!(*ver, exp);
        assert_eq!(bs.len(), bs.capacity());
    }

    #[test]
    fn test_capacity_exceeded() {
        let data = vec![b'a'; 2954];
        let err = encode(&data, ECLevel::L).unwrap_err();
        assert_eq!(
            err,
            EncodeError::CapacityExceeded { needed: 2957, capacity: 2956, ec_level: ECLevel::L }
        );
    }

    #[test]
    fn test_explicit_version_too_small() {
        let v1 = Version::new(1).unwrap();
        let err = encode_with_version(&[0; 18], v1, ECLevel::L).unwrap_err();
        assert!(matches!(err, EncodeError::CapacityExceeded { needed: 20, capacity: 19, .. }));
        assert!(encode_with_version(&[0; 17], v1, ECLevel::L).is_ok());
    }
}

// Writer
//------------------------------------------------------------------------------

mod writer {
    use crate::common::bitstream::BitStream;
    use crate::common::metadata::Version;
    use super::{MODE_INDICATOR_BITS, MODE_INDICATOR_BYTE, PADDING_CODEWORDS};

    pub fn push_segment(data: &[u8], ver: Version, out: &mut BitStream) {
        push_header(data.len(), ver, out);
        for &b in data {
            out.push_bits(b, 8);
        }
    }

    fn push_header(char_cnt: usize, ver: Version, out: &mut BitStream) {
        let len_bits = ver.char_cnt_bits();
        debug_assert!(
            char_cnt < (1 << len_bits),
            "Char count exceeds bit length: Char count {char_cnt}, Char count bits {len_bits}"
        );
        out.push_bits(MODE_INDICATOR_BYTE, MODE_INDICATOR_BITS);
        out.push_bits(char_cnt as u16, len_bits);
    }

    pub fn push_terminator(out: &mut BitStream) {
        let bit_len = out.len();
        let bit_capacity = out.capacity();
        if bit_len < bit_capacity {
            let term_len = std::cmp::min(4, bit_capacity - bit_len);
            out.push_bits(0u8, term_len);
        }
    }

    pub fn pad_remaining_capacity(out: &mut BitStream) {
        push_padding_bits(out);
        push_padding_codewords(out);
    }

    fn push_padding_bits(out: &mut BitStream) {
        let offset = out.len() & 7;
        if offset > 0 {
            out.push_bits(0u8, 8 - offset);
        }
    }

    fn push_padding_codewords(out: &mut BitStream) {
        debug_assert!(
            out.len() & 7 == 0,
            "Bit offset should be zero before padding codewords: {}",
            out.len() & 7
        );

        let remain_byte_capacity = (out.capacity() - out.len()) >> 3;
        PADDING_CODEWORDS.iter().copied().cycle().take(remain_byte_capacity).for_each(|pc| {
            out.push_bits(pc, 8);
        });
    }

}

// Global constants
//------------------------------------------------------------------------------

const MODE_INDICATOR_BYTE: u8 = 0b0100;

const MODE_INDICATOR_BITS: usize = 4;

static PADDING_CODEWORDS: [u8; 2] = [0b1110_1100, 0b0001_0001];

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];
