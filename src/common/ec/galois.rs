use std::ops::{Add, AddAssign, Mul, MulAssign, Sub};

use crate::common::error::{EncodeError, EncodeResult};

// Galois field element
//------------------------------------------------------------------------------

/// Element of GF(256) under the QR primitive polynomial x^8 + x^4 + x^3 + x^2 + 1
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct G(pub u8);

impl G {
    /// α^i
    pub fn gen_pow(i: usize) -> Self {
        exp(i)
    }

    pub fn log(self) -> EncodeResult<usize> {
        log(self.0)
    }
}

impl From<G> for u8 {
    fn from(g: G) -> Self {
        g.0
    }
}

impl Add for G {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 ^ rhs.0)
    }
}

impl AddAssign for G {
    fn add_assign(&mut self, rhs: Self) {
        self.0 ^= rhs.0
    }
}

impl Sub for G {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        self + rhs
    }
}

impl Mul for G {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self::Output {
        if self.0 == 0 || rhs.0 == 0 {
            return Self(0);
        }
        let log_sum = LOG_TABLE[self.0 as usize] as usize + LOG_TABLE[rhs.0 as usize] as usize;
        exp(log_sum)
    }
}

impl MulAssign for G {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs
    }
}

// Table lookups
//------------------------------------------------------------------------------

pub fn exp(n: usize) -> G {
    G(EXP_TABLE[n % 255])
}

pub fn log(n: u8) -> EncodeResult<usize> {
    match n {
        0 => Err(EncodeError::Domain("log(0) is undefined")),
        _ => Ok(LOG_TABLE[n as usize] as usize),
    }
}

const fn build_exp_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut x: u16 = 1;
    let mut i = 0;
    while i < 256 {
        table[i] = x as u8;
        x <<= 1;
        if x & 0x100 != 0 {
            x ^= PRIMITIVE_POLY;
        }
        i += 1;
    }
    table
}

const fn build_log_table() -> [u8; 256] {
    let exp = build_exp_table();
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 255 {
        table[exp[i] as usize] = i as u8;
        i += 1;
    }
    table
}


// Global constants
//------------------------------------------------------------------------------

const PRIMITIVE_POLY: u16 = 0x11d;

static EXP_TABLE: [u8; 256] = build_exp_table();

static LOG_TABLE: [u8; 256] = build_log_table();
