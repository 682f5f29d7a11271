use thiserror::Error;

use super::metadata::{Charset, ECLevel};
use crate::encode::Symbology;

// Error
//------------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum EncodeError {
    /// Payload does not fit the requested (or the largest) version at this level.
    #[error(
        "Capacity exceeded: {needed} data codewords needed, {capacity} available at ec level {ec_level:?}"
    )]
    CapacityExceeded { needed: usize, capacity: usize, ec_level: ECLevel },

    #[error("Invalid input for {symbology}: {issue}")]
    InvalidInputFormat { symbology: Symbology, issue: InputIssue },

    #[error("Unsupported symbology: {0}")]
    UnsupportedSymbology(String),

    #[error("Invalid version {0}, expected 1..=40 or 0 for auto")]
    InvalidVersion(u8),

    #[error("Invalid mask pattern {0}, expected 0..=7")]
    InvalidMask(u8),

    /// Undefined field arithmetic. Only reachable through a broken invariant.
    #[error("Galois field domain error: {0}")]
    Domain(&'static str),
}

/// Why a payload was rejected by a symbology.
#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum InputIssue {
    #[error("empty payload")]
    Empty,

    #[error("illegal character {ch:?} at position {pos}")]
    IllegalChar { ch: char, pos: usize },

    #[error("too long, at most {max} characters allowed, got {got}")]
    TooLong { max: usize, got: usize },

    #[error("check digit mismatch, expected {expected}, found {found}")]
    CheckDigitMismatch { expected: u8, found: u8 },

    #[error("character cannot be represented in {charset:?}")]
    Unmappable { charset: Charset },
}

impl EncodeError {
    pub(crate) fn invalid(symbology: Symbology, issue: InputIssue) -> Self {
        Self::InvalidInputFormat { symbology, issue }
    }
}

pub type EncodeResult<T> = Result<T, EncodeError>;
