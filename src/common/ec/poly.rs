use super::galois::{exp, G};
use crate::common::error::EncodeResult;

// Polynomial over GF(256)
//------------------------------------------------------------------------------

/// Coefficients are stored highest degree first with leading zeros stripped.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Poly {
    coeffs: Vec<G>,
}

impl Poly {
    pub fn new(coeffs: &[u8]) -> Self {
        Self::with_shift(coeffs, 0)
    }

    /// Builds coeffs · x^shift
    pub fn with_shift(coeffs: &[u8], shift: usize) -> Self {
        let offset = coeffs.iter().take_while(|&&c| c == 0).count();
        let mut res: Vec<G> = coeffs[offset..].iter().map(|&c| G(c)).collect();
        if !res.is_empty() {
            res.resize(res.len() + shift, G(0));
        }
        Self { coeffs: res }
    }

    fn from_coeffs(coeffs: Vec<G>) -> Self {
        let offset = coeffs.iter().take_while(|c| c.0 == 0).count();
        Self { coeffs: coeffs[offset..].to_vec() }
    }

    pub fn len(&self) -> usize {
        self.coeffs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coeffs.is_empty()
    }

    pub fn coeffs(&self) -> &[G] {
        &self.coeffs
    }

    pub fn multiply(&self, other: &Poly) -> Poly {
        if self.is_empty() || other.is_empty() {
            return Poly { coeffs: Vec::new() };
        }
        let mut res = vec![G(0); self.len() + other.len() - 1];
        for (i, &a) in self.coeffs.iter().enumerate() {
            for (j, &b) in other.coeffs.iter().enumerate() {
                res[i + j] += a * b;
            }
        }
        Self::from_coeffs(res)
    }

    /// Remainder of long division by `divisor`
    pub fn rem(&self, divisor: &Poly) -> EncodeResult<Poly> {
        let mut rem = self.coeffs.clone();
        let div_lead = divisor.coeffs.first().copied().unwrap_or_default().log()?;
        while rem.len() >= divisor.len() {
            let factor = exp(255 + rem[0].log()? - div_lead);
            for (r, &d) in rem.iter_mut().zip(divisor.coeffs.iter()) {
                *r += d * factor;
            }
            let offset = rem.iter().take_while(|c| c.0 == 0).count();
            rem.drain(..offset);
        }
        Ok(Poly { coeffs: rem })
    }

    /// Generator polynomial: product of (x - α^i) for i in 0..ec_count
    pub fn generator(ec_count: usize) -> Poly {
        (0..ec_count).fold(Poly::new(&[1]), |acc, i| {
            acc.multiply(&Poly { coeffs: vec![G(1), G::gen_pow(i)] })
        })
    }
}

#[cfg(test)]
mod poly_tests {
    use super::Poly;
    use crate::common::error::EncodeError;

    fn to_bytes(p: &Poly) -> Vec<u8> {
        p.coeffs().iter().map(|&g| g.into()).collect()
    }

    #[test]
    fn test_strip_leading_zeros() {
        let p = Poly::new(&[0, 0, 3, 0, 1]);
        assert_eq!(to_bytes(&p), vec![3, 0, 1]);
        assert!(Poly::with_shift(&[0, 0], 4).is_empty());
    }

    #[test]
    fn test_shift() {
        let p = Poly::with_shift(&[1, 2], 3);
        assert_eq!(to_bytes(&p), vec![1, 2, 0, 0, 0]);
    }

    #[test]
    fn test_multiply() {
        // (x + 1)(x + 1) = x^2 + 1 in characteristic 2
        let p = Poly::new(&[1, 1]);
        assert_eq!(to_bytes(&p.multiply(&p)), vec![1, 0, 1]);
        let q = Poly::new(&[2, 3]);
        assert_eq!(to_bytes(&q.multiply(&Poly::new(&[1]))), vec![2, 3]);
    }

    #[test]
    fn test_generator() {
        assert_eq!(to_bytes(&Poly::generator(1)), vec![1, 1]);
        assert_eq!(to_bytes(&Poly::generator(2)), vec![1, 3, 2]);
        // Log form: 0, 251, 67, 46, 61, 118, 70, 64, 94, 32, 45
        let exp = [1, 216, 194, 159, 111, 199, 94, 95, 113, 157, 193];
        assert_eq!(to_bytes(&Poly::generator(10)), exp);
    }

    #[test]
    fn test_rem_degree() {
        let gen = Poly::generator(7);
        let msg = Poly::with_shift(&[32, 91, 11, 120, 209, 114, 220], 7);
        let rem = msg.rem(&gen).unwrap();
        assert!(rem.len() < gen.len());
    }

    #[test]
    fn test_rem_by_zero_poly() {
        let msg = Poly::new(&[1, 2, 3]);
        let zero = Poly::new(&[0]);
        assert!(matches!(msg.rem(&zero), Err(EncodeError::Domain(_))));
    }
}
