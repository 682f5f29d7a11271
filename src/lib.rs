//! # barqode
//!
//! Encodes payload strings into scannable symbols: QR codes with Reed-Solomon
//! error correction and penalty based mask selection, and the linear
//! symbologies Code128-B, Code39, EAN-13, EAN-8, UPC-A and ITF.
//!
//! The output is a module grid (QR) or a run of bar and space widths (linear).
//! Rasterizing either one is left to the caller.
//!
//! ## Quick Start
//!
//! ### One entry point for every symbology
//!
//! ```rust
//! use barqode::{encode, EncodeConfig, Symbol, Symbology};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = EncodeConfig::new(Symbology::Ean13);
//! let symbol = encode("400638133393", &config)?;
//!
//! if let Symbol::Linear(bars) = symbol {
//!     assert_eq!(bars.final_digits(), "4006381333931");
//!     assert_eq!(bars.modules(), 95);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### QR configuration
//!
//! ```rust
//! use barqode::{ECLevel, MaskPattern, QRBuilder, Version};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let qr = QRBuilder::new(b"Hello, World!")
//!     .version(Version::new(2)?)      // Smallest fitting version if not provided
//!     .ec_level(ECLevel::M)           // Defaults to ECLevel::H
//!     .mask(MaskPattern::try_from(3)?) // Lowest penalty mask if not provided
//!     .build()?;
//!
//! assert_eq!(qr.width(), 25);
//! let rows = qr.to_bool_grid();
//! assert!(rows[0][0]);
//! # Ok(())
//! # }
//! ```
//!
//! ### Configuration from external input
//!
//! [`EncodeConfig`] deserializes with serde and [`Symbology`] parses the
//! lowercase keys `qr`, `code128`, `code39`, `ean13`, `ean8`, `upc` and `itf`.
//!
//! ## Error Correction Levels
//! - **L (Low)**: ~7% error correction
//! - **M (Medium)**: ~15% error correction
//! - **Q (Quartile)**: ~25% error correction
//! - **H (High)**: ~30% error correction

#![allow(clippy::items_after_test_module)]

pub mod builder;
pub(crate) mod common;
pub mod encode;
pub mod linear;

pub use builder::{Module, QRBuilder, QR};
pub use common::error::{EncodeError, EncodeResult, InputIssue};
pub use common::mask::MaskPattern;
pub use common::metadata::{Charset, Color, ECLevel, Version};
pub use common::version_db::RSBlock;
pub use encode::{encode, EncodeConfig, Symbol, Symbology};
pub use linear::LinearSymbol;
