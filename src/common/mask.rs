use tracing::trace;

use super::error::{EncodeError, EncodeResult};
use super::metadata::Color;
use crate::builder::QR;

// Mask pattern
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone, PartialOrd, Ord)]
#[repr(u8)]
pub enum MaskPattern {
    Checkerboard = 0,
    HorizontalLines = 1,
    VerticalLines = 2,
    DiagonalLines = 3,
    LargeCheckerboard = 4,
    Fields = 5,
    Diamonds = 6,
    Meadow = 7,
}

impl MaskPattern {
    pub const ALL: [MaskPattern; 8] = [
        Self::Checkerboard,
        Self::HorizontalLines,
        Self::VerticalLines,
        Self::DiagonalLines,
        Self::LargeCheckerboard,
        Self::Fields,
        Self::Diamonds,
        Self::Meadow,
    ];

    /// Whether the module at row `r`, column `c` gets flipped
    pub fn is_masked(self, r: i16, c: i16) -> bool {
        let (r, c) = (r as i32, c as i32);
        match self {
            Self::Checkerboard => (r + c) & 1 == 0,
            Self::HorizontalLines => r & 1 == 0,
            Self::VerticalLines => c % 3 == 0,
            Self::DiagonalLines => (r + c) % 3 == 0,
            Self::LargeCheckerboard => ((r >> 1) + (c / 3)) & 1 == 0,
            Self::Fields => ((r * c) & 1) + ((r * c) % 3) == 0,
            Self::Diamonds => (((r * c) & 1) + ((r * c) % 3)) & 1 == 0,
            Self::Meadow => (((r + c) & 1) + ((r * c) % 3)) & 1 == 0,
        }
    }
}

impl TryFrom<u8> for MaskPattern {
    type Error = EncodeError;

    fn try_from(pattern: u8) -> EncodeResult<Self> {
        Self::ALL.get(pattern as usize).copied().ok_or(EncodeError::InvalidMask(pattern))
    }
}


// Mask selection
//------------------------------------------------------------------------------

/// Evaluates all 8 patterns on copies of `qr` and keeps the one with the
/// lowest penalty. Ties go to the lower pattern index.
pub fn apply_best_mask(qr: &mut QR) -> MaskPattern {
    let mut best: Option<(MaskPattern, u32, QR)> = None;
    for mask in MaskPattern::ALL {
        let mut candidate = qr.clone();
        candidate.apply_mask(mask);
        let penalty = compute_total_penalty(&candidate);
        trace!(?mask, penalty, "Scored mask candidate");
        if best.as_ref().map_or(true, |(_, p, _)| penalty < *p) {
            best = Some((mask, penalty, candidate));
        }
    }

    match best {
        Some((mask, _, masked)) => {
            *qr = masked;
            mask
        }
        None => unreachable!("Mask candidates are never empty"),
    }
}

pub fn compute_total_penalty(qr: &QR) -> u32 {
    let adj_pen = compute_adjacent_penalty(qr);
    let blk_pen = compute_block_penalty(qr);
    let fp_pen_h = compute_finder_pattern_penalty(qr, true);
    let fp_pen_v = compute_finder_pattern_penalty(qr, false);
    let bal_pen = compute_balance_penalty(qr);
    adj_pen + blk_pen + fp_pen_h + fp_pen_v + bal_pen
}

fn line(qr: &QR, i: i16, is_hor: bool) -> Vec<Color> {
    let w = qr.width() as i16;
    (0..w).map(|j| if is_hor { *qr.get(i, j) } else { *qr.get(j, i) }).collect()
}

// N1: runs of 5 or more same coloured modules in a row or column
fn compute_adjacent_penalty(qr: &QR) -> u32 {
    let w = qr.width() as i16;
    let mut pen = 0;
    for i in 0..w {
        for is_hor in [true, false] {
            let mut run_len = 0;
            let mut last = None;
            for clr in line(qr, i, is_hor) {
                if last == Some(clr) {
                    run_len += 1;
                } else {
                    pen += run_penalty(run_len);
                    last = Some(clr);
                    run_len = 1;
                }
            }
            pen += run_penalty(run_len);
        }
    }
    pen
}

fn run_penalty(run_len: u32) -> u32 {
    if run_len >= 5 {
        3 + (run_len - 5)
    } else {
        0
    }
}

// N2: uniform 2x2 blocks, overlaps counted
fn compute_block_penalty(qr: &QR) -> u32 {
    let mut pen = 0;
    let w = qr.width() as i16;
    for r in 0..w - 1 {
        for c in 0..w - 1 {
            let clr = *qr.get(r, c);
            if clr == *qr.get(r + 1, c) && clr == *qr.get(r, c + 1) && clr == *qr.get(r + 1, c + 1)
            {
                pen += 3;
            }
        }
    }
    pen
}

// N3: 1:1:3:1:1 finder-like runs with 4 light modules on either side
fn compute_finder_pattern_penalty(qr: &QR, is_hor: bool) -> u32 {
    let w = qr.width() as i16;
    let mut pen = 0;
    for i in 0..w {
        let modules = line(qr, i, is_hor);
        let is_light = |x: i16| x < 0 || x >= w || modules[x as usize] == Color::Light;
        for j in 0..=w - 7 {
            let is_match =
                (0..7).all(|k| modules[(j + k) as usize] == FINDER_LIKE_PATTERN[k as usize]);
            if !is_match {
                continue;
            }
            if (j - 4..j).all(is_light) || (j + 7..j + 11).all(is_light) {
                pen += 40;
            }
        }
    }
    pen
}

// N4: deviation of dark proportion from 50% in steps of 5%
fn compute_balance_penalty(qr: &QR) -> u32 {
    let dark = qr.count_dark_modules() as i64;
    let total = (qr.width() * qr.width()) as i64;
    let k = (20 * dark - 10 * total).abs() / total;
    10 * k as u32
}


// Global constants
//------------------------------------------------------------------------------

static FINDER_LIKE_PATTERN: [Color; 7] = [
    Color::Dark,
    Color::Light,
    Color::Dark,
    Color::Dark,
    Color::Dark,
    Color::Light,
    Color::Dark,
];
