use std::ops::Deref;

use crate::common::bitstream::BitStream;
use crate::common::iter::EncRegionIter;
use crate::common::mask::{compute_total_penalty, MaskPattern};
use crate::common::metadata::{
    generate_format_info_qr, Color, ECLevel, Version, FORMAT_INFO_BIT_LEN,
    FORMAT_INFO_COORDS_QR_MAIN, FORMAT_INFO_COORDS_QR_SIDE, VERSION_INFO_BIT_LEN,
    VERSION_INFO_COORDS_BL, VERSION_INFO_COORDS_TR,
};

/// A single cell of the symbol, tagged with the structure it belongs to.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Module {
    Empty,
    /// Light ring separating a finder pattern from the rest of the symbol
    Quiet(Color),
    FinderOuter(Color),
    FinderInner(Color),
    AlignmentOuter(Color),
    AlignmentInner(Color),
    Timing(Color),
    Version(Color),
    Format(Color),
    Data(Color),
}

impl Deref for Module {
    type Target = Color;
    fn deref(&self) -> &Self::Target {
        match self {
            Module::Empty => &Color::Light,
            Module::Quiet(c)
            | Module::FinderOuter(c)
            | Module::FinderInner(c)
            | Module::AlignmentOuter(c)
            | Module::AlignmentInner(c)
            | Module::Timing(c)
            | Module::Version(c)
            | Module::Format(c)
            | Module::Data(c) => c,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QR {
    grid: Vec<Module>,
    w: usize,
    ver: Version,
    ecl: ECLevel,
    mask: Option<MaskPattern>,
}

// QR type for builder
//------------------------------------------------------------------------------

impl QR {
    pub(crate) fn new(ver: Version, ecl: ECLevel) -> Self {
        let w = ver.width();
        Self { grid: vec![Module::Empty; w * w], w, ver, ecl, mask: None }
    }

    pub fn grid(&self) -> &[Module] {
        &self.grid
    }

    pub fn version(&self) -> Version {
        self.ver
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn ec_level(&self) -> ECLevel {
        self.ecl
    }

    pub fn mask(&self) -> Option<MaskPattern> {
        self.mask
    }

    pub fn count_dark_modules(&self) -> usize {
        self.grid.iter().filter(|&m| matches!(**m, Color::Dark)).count()
    }

    /// Sum of the four mask evaluation penalties for the current grid
    pub fn penalty(&self) -> u32 {
        compute_total_penalty(self)
    }

    pub fn is_dark(&self, r: usize, c: usize) -> bool {
        assert!(r < self.w && c < self.w, "Module ({r}, {c}) outside width {}", self.w);
        *self.grid[r * self.w + c] == Color::Dark
    }

    /// Row major grid of dark modules
    pub fn to_bool_grid(&self) -> Vec<Vec<bool>> {
        self.grid
            .chunks(self.w)
            .map(|row| row.iter().map(|m| **m == Color::Dark).collect())
            .collect()
    }

    #[cfg(test)]
    pub fn to_debug_str(&self) -> String {
        let w = self.w as i16;
        let mut res = String::with_capacity((w * (w + 1)) as usize);
        res.push('\n');
        for i in 0..w {
            for j in 0..w {
                let m = self.get(i, j);
                let c = match m {
                    Module::Empty => '.',
                    Module::Version(clr) => clr.select('V', 'v'),
                    Module::Format(clr) => clr.select('M', 'm'),
                    Module::Data(clr) => clr.select('D', 'd'),
                    _ => m.select('F', 'f'),
                };
                res.push(c);
            }
            res.push('\n');
        }
        res
    }

    fn coord_to_index(&self, r: i16, c: i16) -> usize {
        let w = self.w as i16;
        debug_assert!(-w <= r && r < w, "row should be greater than or equal to w");
        debug_assert!(-w <= c && c < w, "column should be greater than or equal to w");

        let r = if r < 0 { r + w } else { r };
        let c = if c < 0 { c + w } else { c };
        (r * w + c) as _
    }

    /// Negative indices count from the bottom or right edge
    pub fn get(&self, r: i16, c: i16) -> Module {
        self.grid[self.coord_to_index(r, c)]
    }

    pub(crate) fn set(&mut self, r: i16, c: i16, module: Module) {
        let index = self.coord_to_index(r, c);
        self.grid[index] = module;
    }
}


// Finder pattern
//------------------------------------------------------------------------------

impl QR {
    fn draw_finder_patterns(&mut self) {
        self.draw_finder_pattern_at(3, 3);
        self.draw_finder_pattern_at(3, -4);
        self.draw_finder_pattern_at(-4, 3);
    }

    // Draws the 7x7 pattern centred at (r, c) with its separator on the inner sides
    fn draw_finder_pattern_at(&mut self, r: i16, c: i16) {
        let (dr_top, dr_bottom) = if r > 0 { (-3, 4) } else { (-4, 3) };
        let (dc_left, dc_right) = if c > 0 { (-3, 4) } else { (-4, 3) };
        for i in dr_top..=dr_bottom {
            for j in dc_left..=dc_right {
                self.set(
                    r + i,
                    c + j,
                    match (i, j) {
                        (4 | -4, _) | (_, 4 | -4) => Module::Quiet(Color::Light),
                        (3 | -3, _) | (_, 3 | -3) => Module::FinderOuter(Color::Dark),
                        (2 | -2, _) | (_, 2 | -2) => Module::FinderOuter(Color::Light),
                        _ => Module::FinderInner(Color::Dark),
                    },
                );
            }
        }
    }
}


// Alignment pattern
//------------------------------------------------------------------------------

impl QR {
    fn draw_alignment_patterns(&mut self) {
        let poses = self.ver.alignment_pattern();
        for &r in poses {
            for &c in poses {
                self.draw_alignment_pattern_at(r, c)
            }
        }
    }

    fn draw_alignment_pattern_at(&mut self, r: i16, c: i16) {
        let w = self.w as i16;
        if (r == 6 && (c == 6 || c - w == -7)) || (r - w == -7 && c == 6) {
            return;
        }
        for i in -2..=2 {
            for j in -2..=2 {
                self.set(
                    r + i,
                    c + j,
                    match (i, j) {
                        (0, 0) => Module::AlignmentInner(Color::Dark),
                        (-2 | 2, _) | (_, -2 | 2) => Module::AlignmentOuter(Color::Dark),
                        _ => Module::AlignmentOuter(Color::Light),
                    },
                )
            }
        }
    }
}

#[cfg(test)]
mod alignment_pattern_tests {
    use crate::builder::{Module, QR};
    use crate::common::metadata::{Color, ECLevel, Version};

    #[test]
    fn test_alignment_pattern_1() {
        let mut qr = QR::new(Version::new(1).unwrap(), ECLevel::L);
        qr.draw_alignment_patterns();
        assert_eq!(qr.count_dark_modules(), 0);
        assert!(qr.grid().iter().all(|m| *m == Module::Empty));
    }

    #[test]
    fn test_alignment_pattern_2() {
        let mut qr = QR::new(Version::new(2).unwrap(), ECLevel::L);
        qr.draw_finder_patterns();
        qr.draw_alignment_patterns();
        assert_eq!(
            qr.to_debug_str(),
            "\n\
             fffffffF.........Ffffffff\n\
             fFFFFFfF.........FfFFFFFf\n\
             fFfffFfF.........FfFfffFf\n\
             fFfffFfF.........FfFfffFf\n\
             fFfffFfF.........FfFfffFf\n\
             fFFFFFfF.........FfFFFFFf\n\
             fffffffF.........Ffffffff\n\
             FFFFFFFF.........FFFFFFFF\n\
             .........................\n\
             .........................\n\
             .........................\n\
             .........................\n\
             .........................\n\
             .........................\n\
             .........................\n\
             .........................\n\
             ................fffff....\n\
             FFFFFFFF........fFFFf....\n\
             fffffffF........fFfFf....\n\
             fFFFFFfF........fFFFf....\n\
             fFfffFfF........fffff....\n\
             fFfffFfF.................\n\
             fFfffFfF.................\n\
             fFFFFFfF.................\n\
             fffffffF.................\n"
        );
        assert_eq!(qr.get(18, 18), Module::AlignmentInner(Color::Dark));
        assert_eq!(qr.get(17, 17), Module::AlignmentOuter(Color::Light));
        assert_eq!(qr.get(16, 16), Module::AlignmentOuter(Color::Dark));
    }

    #[test]
    fn test_alignment_pattern_7_skips_finders() {
        let mut qr = QR::new(Version::new(7).unwrap(), ECLevel::L);
        qr.draw_finder_patterns();
        qr.draw_alignment_patterns();
        // Positions 6, 22, 38 give 9 centres, 3 of which overlap finders
        let centres = qr.grid().iter().filter(|m| matches!(m, Module::AlignmentInner(_))).count();
        assert_eq!(centres, 6);
        assert_eq!(qr.get(6, 6), Module::FinderOuter(Color::Dark));
        assert_eq!(qr.get(6, 22), Module::AlignmentInner(Color::Dark));
        assert_eq!(qr.get(38, 38), Module::AlignmentInner(Color::Dark));
    }
}

// Timing pattern
//------------------------------------------------------------------------------

impl QR {
    fn draw_timing_pattern(&mut self) {
        let w = self.w as i16;
        self.draw_line(TIMING_OFFSET, 0, TIMING_OFFSET, w - 1);
        self.draw_line(0, TIMING_OFFSET, w - 1, TIMING_OFFSET);
    }

    // Alternates dark and light by parity, leaving modules already set untouched
    fn draw_line(&mut self, r1: i16, c1: i16, r2: i16, c2: i16) {
        debug_assert!(r1 == r2 || c1 == c2, "Line is neither vertical nor horizontal");

        let coords: Vec<(i16, i16)> = if r1 == r2 {
            (c1..=c2).map(|j| (r1, j)).collect()
        } else {
            (r1..=r2).map(|i| (i, c1)).collect()
        };
        for (r, c) in coords {
            if self.get(r, c) != Module::Empty {
                continue;
            }
            let k = if r1 == r2 { c } else { r };
            self.set(r, c, Module::Timing(Color::from(k & 1 == 0)));
        }
    }
}


// All function patterns
//------------------------------------------------------------------------------

impl QR {
    pub(crate) fn draw_all_function_patterns(&mut self) {
        self.draw_finder_patterns();
        self.draw_alignment_patterns();
        self.draw_timing_pattern();
    }
}


// Format & version info
//------------------------------------------------------------------------------

impl QR {
    fn reserve_format_area(&mut self) {
        self.draw_format_info((1 << FORMAT_INFO_BIT_LEN) - 1);
    }

    fn draw_format_info(&mut self, format_info: u32) {
        let (off, on) = (Module::Format(Color::Light), Module::Format(Color::Dark));
        self.draw_number(format_info, FORMAT_INFO_BIT_LEN, off, on, &FORMAT_INFO_COORDS_QR_MAIN);
        self.draw_number(format_info, FORMAT_INFO_BIT_LEN, off, on, &FORMAT_INFO_COORDS_QR_SIDE);
        // Always dark module next to the bottom left finder
        self.set(-8, 8, on);
    }

    fn draw_version_info(&mut self) {
        if *self.ver < 7 {
            return;
        }
        let ver_info = self.ver.info();
        let (off, on) = (Module::Version(Color::Light), Module::Version(Color::Dark));
        self.draw_number(ver_info, VERSION_INFO_BIT_LEN, off, on, &VERSION_INFO_COORDS_BL);
        self.draw_number(ver_info, VERSION_INFO_BIT_LEN, off, on, &VERSION_INFO_COORDS_TR);
    }

    // Writes `number` MSB first along `coords`
    fn draw_number(
        &mut self,
        number: u32,
        bit_len: usize,
        off_clr: Module,
        on_clr: Module,
        coords: &[(i16, i16)],
    ) {
        let mut mask = 1 << (bit_len - 1);
        for (r, c) in coords {
            if number & mask == 0 {
                self.set(*r, *c, off_clr);
            } else {
                self.set(*r, *c, on_clr);
            }
            mask >>= 1;
        }
    }
}


// Encoding region
//------------------------------------------------------------------------------

impl QR {
    pub(crate) fn draw_encoding_region(&mut self, payload: &BitStream) {
        self.reserve_format_area();
        self.draw_version_info();
        self.draw_payload(payload);

        debug_assert!(!self.grid.contains(&Module::Empty), "Empty module found after drawing");
    }

    fn draw_payload(&mut self, payload: &BitStream) {
        let mut coords = EncRegionIter::new(self.ver);
        for bit in payload.iter() {
            let module = Module::Data(Color::from(bit));
            for (r, c) in coords.by_ref() {
                if matches!(self.get(r, c), Module::Empty) {
                    self.set(r, c, module);
                    break;
                }
            }
        }
        self.fill_remainder_bits(coords);
    }

    fn fill_remainder_bits(&mut self, coords: impl Iterator<Item = (i16, i16)>) {
        for (r, c) in coords {
            if matches!(self.get(r, c), Module::Empty) {
                self.set(r, c, Module::Data(Color::Light));
            }
        }
    }

    /// Flips data modules selected by `pattern` and writes the matching format info
    pub(crate) fn apply_mask(&mut self, pattern: MaskPattern) {
        self.mask = Some(pattern);
        let w = self.w as i16;
        for r in 0..w {
            for c in 0..w {
                if pattern.is_masked(r, c) {
                    if let Module::Data(clr) = self.get(r, c) {
                        self.set(r, c, Module::Data(!clr))
                    }
                }
            }
        }
        let format_info = generate_format_info_qr(self.ecl, pattern);
        self.draw_format_info(format_info);
    }
}


// Global constants
//------------------------------------------------------------------------------

const TIMING_OFFSET: i16 = 6;
