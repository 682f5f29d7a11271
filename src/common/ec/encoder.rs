use super::poly::Poly;
use crate::common::error::EncodeResult;

// Reed-Solomon encoder
//------------------------------------------------------------------------------

// Performs polynomial long division with data polynomial(num)
// and generator polynomial(den) to compute remainder polynomial,
// the coefficients of which are the ecc
pub fn ecc(data: &[u8], ec_count: usize) -> EncodeResult<Vec<u8>> {
    let gen = Poly::generator(ec_count);
    let rem = Poly::with_shift(data, ec_count).rem(&gen)?;

    let mut res = vec![0u8; ec_count];
    let offset = ec_count - rem.len();
    for (r, &g) in res[offset..].iter_mut().zip(rem.coeffs()) {
        *r = g.into();
    }
    Ok(res)
}

#[cfg(test)]
mod encoder_tests {
    use super::ecc;

    #[test]
    fn test_poly_mod_1() {
        let res = ecc(b" [\x0bx\xd1r\xdcMC@\xec\x11\xec\x11\xec\x11", 10).unwrap();
        assert_eq!(&*res, b"\xc4#'w\xeb\xd7\xe7\xe2]\x17");
    }

    #[test]
    fn test_poly_mod_2() {
        let res = ecc(b" [\x0bx\xd1r\xdcMC@\xec\x11\xec", 13).unwrap();
        assert_eq!(&*res, b"\xa8H\x16R\xd96\x9c\x00.\x0f\xb4z\x10");
    }

    #[test]
    fn test_poly_mod_3() {
        let res = ecc(b"CUF\x86W&U\xc2w2\x06\x12\x06g&", 18).unwrap();
        assert_eq!(&*res, b"\xd5\xc7\x0b-s\xf7\xf1\xdf\xe5\xf8\x9au\x9aoV\xa1o'");
    }

    #[test]
    fn test_zero_data() {
        assert_eq!(ecc(&[0, 0, 0, 0], 7).unwrap(), vec![0; 7]);
    }

    #[test]
    fn test_length() {
        for ec_count in [7, 10, 13, 17, 22, 28, 30] {
            assert_eq!(ecc(b"hello world", ec_count).unwrap().len(), ec_count);
        }
    }
}
