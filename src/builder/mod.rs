mod qr;

pub use qr::{Module, QR};

use std::ops::Deref;

use tracing::debug;

use crate::common::{
    bitstream::BitStream,
    codec::{encode, encode_with_version},
    ec::ecc,
    error::EncodeResult,
    mask::{apply_best_mask, MaskPattern},
    metadata::{ECLevel, Version},
};

pub struct QRBuilder<'a> {
    data: &'a [u8],
    version: Option<Version>,
    ec_level: ECLevel,
    mask: Option<MaskPattern>,
}

impl<'a> QRBuilder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, version: None, ec_level: ECLevel::default(), mask: None }
    }

    pub fn data(&mut self, data: &'a [u8]) -> &mut Self {
        self.data = data;
        self
    }

    pub fn version(&mut self, version: Version) -> &mut Self {
        self.version = Some(version);
        self
    }

    pub fn unset_version(&mut self) -> &mut Self {
        self.version = None;
        self
    }

    pub fn ec_level(&mut self, ec_level: ECLevel) -> &mut Self {
        self.ec_level = ec_level;
        self
    }

    /// Skips mask selection and applies `mask` as is
    pub fn mask(&mut self, mask: MaskPattern) -> &mut Self {
        self.mask = Some(mask);
        self
    }

    pub fn metadata(&self) -> String {
        match self.version {
            Some(v) => format!("{{ Version: {:?}, Ec level: {:?} }}", *v, self.ec_level),
            None => format!("{{ Version: None, Ec level: {:?} }}", self.ec_level),
        }
    }
}


impl QRBuilder<'_> {
    pub fn build(&self) -> EncodeResult<QR> {
        let mut qr = self.unmasked()?;

        let mask = match self.mask {
            Some(m) => {
                debug!(mask = ?m, "Applying requested mask");
                qr.apply_mask(m);
                m
            }
            None => {
                debug!("Finding and applying best mask");
                apply_best_mask(&mut qr)
            }
        };

        debug!(
            version = *qr.version(),
            ec_level = ?qr.ec_level(),
            ?mask,
            dark_modules = qr.count_dark_modules(),
            "QR generated"
        );
        Ok(qr)
    }

    // Symbol with every module drawn but no mask or format info applied
    pub(crate) fn unmasked(&self) -> EncodeResult<QR> {
        debug!(len = self.data.len(), metadata = %self.metadata(), "Encoding data");
        let (encoded_data, version) = match self.version {
            Some(v) => (encode_with_version(self.data, v, self.ec_level)?, v),
            None => encode(self.data, self.ec_level)?,
        };

        debug!("Constructing payload with ecc and interleaving");
        let payload = Self::build_codewords(&encoded_data, version, self.ec_level)?;

        debug!("Drawing function patterns and encoding region");
        let mut qr = QR::new(version, self.ec_level);
        qr.draw_all_function_patterns();
        qr.draw_encoding_region(&payload);
        Ok(qr)
    }

    /// Splits data codewords into blocks, appends ecc and interleaves both
    pub(crate) fn build_codewords(
        encoded_data: &BitStream,
        version: Version,
        ec_level: ECLevel,
    ) -> EncodeResult<BitStream> {
        let total_codewords = version.total_codewords();
        let mut payload = BitStream::new(total_codewords << 3);

        let (data_blocks, ecc_blocks) = Self::compute_ecc(encoded_data.data(), version, ec_level)?;
        payload.extend(&Self::interleave(&data_blocks));
        payload.extend(&Self::interleave(&ecc_blocks));

        debug_assert_eq!(payload.len(), payload.capacity(), "Payload doesn't fill the symbol");
        Ok(payload)
    }

    // ECC: Error Correction Codeword generator
    #[allow(clippy::type_complexity)]
    fn compute_ecc(
        data: &[u8],
        version: Version,
        ec_level: ECLevel,
    ) -> EncodeResult<(Vec<&[u8]>, Vec<Vec<u8>>)> {
        let data_blocks = Self::blockify(data, version, ec_level);

        let ecc_size_per_block = version.ecc_per_block(ec_level);
        let ecc_blocks = data_blocks
            .iter()
            .map(|b| ecc(b, ecc_size_per_block))
            .collect::<EncodeResult<Vec<_>>>()?;

        Ok((data_blocks, ecc_blocks))
    }

    pub(crate) fn blockify(data: &[u8], version: Version, ec_level: ECLevel) -> Vec<&[u8]> {
        let (block1_size, block1_count, block2_size, block2_count) =
            version.data_codewords_per_block(ec_level);

        let total_blocks = block1_count + block2_count;
        let total_block1_size = block1_size * block1_count;
        let total_size = total_block1_size + block2_size * block2_count;

        debug_assert!(
            total_size == data.len(),
            "Data len doesn't match total size of blocks: Data len {}, Total block size {}",
            data.len(),
            total_size
        );

        let mut data_blocks = Vec::with_capacity(total_blocks);
        data_blocks.extend(data[..total_block1_size].chunks(block1_size));
        if block2_size > 0 {
            data_blocks.extend(data[total_block1_size..].chunks(block2_size));
        }
        data_blocks
    }

    /// Column major merge: i-th codeword of every block before the (i+1)-th
    pub fn interleave<T: Copy, V: Deref<Target = [T]>>(blocks: &[V]) -> Vec<T> {
        let max_block_size = blocks.iter().map(|b| b.len()).max().unwrap_or(0);
        let total_size = blocks.iter().map(|b| b.len()).sum::<usize>();
        let mut res = Vec::with_capacity(total_size);
        for i in 0..max_block_size {
            for b in blocks {
                if i < b.len() {
                    res.push(b[i]);
                }
            }
        }
        res
    }
}

#[cfg(test)]
mod builder_tests {
    use test_case::test_case;

    use super::{Module, QRBuilder};
    use crate::common::{
        codec::encode_with_version,
        error::EncodeError,
        iter::EncRegionIter,
        mask::MaskPattern,
        metadata::{Color, ECLevel, Version},
    };

    fn ver(v: u8) -> Version {
        Version::new(v).unwrap()
    }

    #[test]
    fn test_add_ec_simple() {
        let msg = b" [\x0bx\xd1r\xdcMC@\xec\x11\xec\x11\xec\x11";
        let expected_ecc = [b"\xc4\x23\x27\x77\xeb\xd7\xe7\xe2\x5d\x17"];
        let (_, ecc) = QRBuilder::compute_ecc(msg, ver(1), ECLevel::M).unwrap();
        assert_eq!(&*ecc, expected_ecc);
    }

    #[test]
    fn test_add_ec_complex() {
        let msg = b"CUF\x86W&U\xc2w2\x06\x12\x06g&\xf6\xf6B\x07v\x86\xf2\x07&V\x16\xc6\xc7\x92\x06\
                    \xb6\xe6\xf7w2\x07v\x86W&R\x06\x86\x972\x07F\xf7vV\xc2\x06\x972\x10\xec\x11\xec\
                    \x11\xec\x11\xec";
        let expected_ec = [
            b"\xd5\xc7\x0b\x2d\x73\xf7\xf1\xdf\xe5\xf8\x9a\x75\x9a\x6f\x56\xa1\x6f\x27",
            b"\x57\xcc\x60\x3c\xca\xb6\x7c\x9d\xc8\x86\x1b\x81\xd1\x11\xa3\xa3\x78\x85",
            b"\x94\x74\xb1\xd4\x4c\x85\x4b\xf2\xee\x4c\xc3\xe6\xbd\x0a\x6c\xf0\xc0\x8d",
            b"\xeb\x9f\x05\xad\x18\x93\x3b\x21\x6a\x28\xff\xac\x52\x02\x83\x20\xb2\xec",
        ];
        let (data, ecc) = QRBuilder::compute_ecc(msg, ver(5), ECLevel::Q).unwrap();
        assert_eq!(data.iter().map(|b| b.len()).collect::<Vec<_>>(), [15, 15, 16, 16]);
        assert_eq!(&*ecc, &expected_ec[..]);
    }

    #[test]
    fn test_interleave() {
        let blocks = vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 9, 0]];
        let interleaved = QRBuilder::interleave(&blocks);
        let exp_interleaved = vec![1, 4, 7, 2, 5, 8, 3, 6, 9, 0];
        assert_eq!(interleaved, exp_interleaved);
        assert!(QRBuilder::interleave::<u8, Vec<u8>>(&[]).is_empty());
    }

    #[test]
    fn test_codeword_count_matches_blocks() {
        for v in Version::all() {
            for ecl in [ECLevel::L, ECLevel::M, ECLevel::Q, ECLevel::H] {
                let encoded = encode_with_version(b"", v, ecl).unwrap();
                let payload = QRBuilder::build_codewords(&encoded, v, ecl).unwrap();
                let block_total: usize = v.rs_blocks(ecl).iter().map(|b| b.total).sum();
                assert_eq!(payload.len() >> 3, block_total);
            }
        }
    }

    #[test_case("Hello, world!🌎".to_string(), 1, ECLevel::L)]
    #[test_case("TEST".to_string(), 1, ECLevel::M)]
    #[test_case("12345".to_string(), 1, ECLevel::Q)]
    #[test_case("OK".to_string(), 1, ECLevel::H)]
    #[test_case("A11111111111111".repeat(8), 7, ECLevel::M)]
    #[test_case("1234567890".repeat(11), 10, ECLevel::H)]
    #[test_case("aAAAAAAAAA111111111111111111AAAAAAAAAAa".repeat(20), 27, ECLevel::Q)]
    #[test_case("1234567890".repeat(127), 40, ECLevel::H)]
    fn test_builder(data: String, v: u8, ec_level: ECLevel) {
        let qr = QRBuilder::new(data.as_bytes())
            .version(ver(v))
            .ec_level(ec_level)
            .build()
            .unwrap();
        assert_eq!(qr.version(), ver(v));
        assert_eq!(qr.width(), v as usize * 4 + 17);
        assert_eq!(qr.ec_level(), ec_level);
        assert!(qr.mask().is_some());
        assert!(!qr.grid().contains(&Module::Empty));
    }

    #[test]
    fn test_placed_codewords_read_back() {
        let data = b"Read me back, including the ecc";
        let (v, ecl, mask) = (ver(3), ECLevel::Q, MaskPattern::Diamonds);
        let mut qr = QRBuilder::new(data).version(v).ec_level(ecl).mask(mask).build().unwrap();

        // Masking twice restores the unmasked data modules
        qr.apply_mask(mask);
        let bits: Vec<bool> = EncRegionIter::new(v)
            .filter_map(|(r, c)| match qr.get(r, c) {
                Module::Data(clr) => Some(clr == Color::Dark),
                _ => None,
            })
            .take(v.total_codewords() * 8)
            .collect();

        let encoded = encode_with_version(data, v, ecl).unwrap();
        let payload = QRBuilder::build_codewords(&encoded, v, ecl).unwrap();
        assert_eq!(bits, payload.iter().collect::<Vec<_>>());
    }

    #[test]
    fn test_empty_payload() {
        let qr = QRBuilder::new(b"").build().unwrap();
        assert_eq!(*qr.version(), 1);
        assert_eq!(qr.ec_level(), ECLevel::H);
    }

    #[test]
    fn test_auto_version() {
        let data = "a".repeat(100);
        let qr = QRBuilder::new(data.as_bytes()).ec_level(ECLevel::L).build().unwrap();
        // 100 bytes need 102 codewords, version 5-L holds 108
        assert_eq!(*qr.version(), 5);
    }

    #[test]
    fn test_builder_data_overflow() {
        let data = "1234567890".repeat(128);
        let res = QRBuilder::new(data.as_bytes()).version(ver(40)).ec_level(ECLevel::H).build();
        assert!(matches!(res, Err(EncodeError::CapacityExceeded { .. })));
    }
}
