use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::builder::{QRBuilder, QR};
use crate::common::codec::to_bytes;
use crate::common::error::{EncodeError, EncodeResult};
use crate::common::metadata::{Charset, ECLevel, Version};
use crate::linear::{self, LinearSymbol};

// Symbology
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Symbology {
    Qr,
    Code128,
    Code39,
    Ean13,
    Ean8,
    Upc,
    Itf,
}

impl Symbology {
    pub const ALL: [Symbology; 7] = [
        Self::Qr,
        Self::Code128,
        Self::Code39,
        Self::Ean13,
        Self::Ean8,
        Self::Upc,
        Self::Itf,
    ];

    /// External key, as accepted by [`FromStr`]
    pub fn key(self) -> &'static str {
        match self {
            Self::Qr => "qr",
            Self::Code128 => "code128",
            Self::Code39 => "code39",
            Self::Ean13 => "ean13",
            Self::Ean8 => "ean8",
            Self::Upc => "upc",
            Self::Itf => "itf",
        }
    }
}

impl Display for Symbology {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.pad(self.key())
    }
}

impl FromStr for Symbology {
    type Err = EncodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|sym| sym.key() == s)
            .ok_or_else(|| EncodeError::UnsupportedSymbology(s.to_string()))
    }
}


// Config
//------------------------------------------------------------------------------

/// Everything `encode` needs besides the payload. `version` 0 selects the
/// smallest version that fits. Only `Qr` reads `ec_level`, `version` and
/// `charset`. `symbology` has no default and must always be given.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Serialize, Deserialize)]
pub struct EncodeConfig {
    pub symbology: Symbology,
    #[serde(default)]
    pub ec_level: ECLevel,
    #[serde(default)]
    pub version: u8,
    #[serde(default)]
    pub charset: Charset,
}

impl EncodeConfig {
    pub fn new(symbology: Symbology) -> Self {
        Self { symbology, ec_level: ECLevel::H, version: 0, charset: Charset::Utf8 }
    }

    pub fn ec_level(mut self, ec_level: ECLevel) -> Self {
        self.ec_level = ec_level;
        self
    }

    pub fn version(mut self, version: u8) -> Self {
        self.version = version;
        self
    }

    pub fn charset(mut self, charset: Charset) -> Self {
        self.charset = charset;
        self
    }
}

#[cfg(test)]
mod config_tests {
    use super::{EncodeConfig, Symbology};
    use crate::common::metadata::{Charset, ECLevel};

    #[test]
    fn test_defaults() {
        let cfg = EncodeConfig::new(Symbology::Qr);
        assert_eq!(cfg.symbology, Symbology::Qr);
        assert_eq!(cfg.ec_level, ECLevel::H);
        assert_eq!(cfg.version, 0);
        assert_eq!(cfg.charset, Charset::Utf8);
    }

    #[test]
    fn test_deserialize_partial() {
        let cfg: EncodeConfig =
            serde_json::from_str(r#"{ "symbology": "ean13", "ec_level": "M" }"#).unwrap();
        assert_eq!(cfg, EncodeConfig::new(Symbology::Ean13).ec_level(ECLevel::M));

        let cfg: EncodeConfig =
            serde_json::from_str(r#"{ "symbology": "qr", "version": 5, "charset": "iso-8859-1" }"#)
                .unwrap();
        assert_eq!(cfg, EncodeConfig::new(Symbology::Qr).version(5).charset(Charset::Iso8859_1));
    }

    #[test]
    fn test_deserialize_utf8_bom() {
        let cfg: EncodeConfig =
            serde_json::from_str(r#"{ "symbology": "qr", "charset": "utf8-bom" }"#).unwrap();
        assert_eq!(cfg.charset, Charset::Utf8Bom);
        assert_eq!(serde_json::to_string(&Charset::Utf8Bom).unwrap(), r#""utf8-bom""#);
    }

    #[test]
    fn test_deserialize_missing_symbology() {
        let json = r#"{ "version": 5, "charset": "iso-8859-1" }"#;
        let err = serde_json::from_str::<EncodeConfig>(json).unwrap_err();
        assert!(err.to_string().contains("missing field `symbology`"), "{err}");
        assert!(serde_json::from_str::<EncodeConfig>("{}").is_err());
    }

    #[test]
    fn test_deserialize_unknown_symbology() {
        assert!(serde_json::from_str::<EncodeConfig>(r#"{ "symbology": "aztec" }"#).is_err());
    }
}

// Symbol
//------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Symbol {
    Qr(QR),
    Linear(LinearSymbol),
}

impl Symbol {
    pub fn symbology(&self) -> Symbology {
        match self {
            Self::Qr(_) => Symbology::Qr,
            Self::Linear(sym) => sym.symbology(),
        }
    }

    pub fn as_qr(&self) -> Option<&QR> {
        match self {
            Self::Qr(qr) => Some(qr),
            Self::Linear(_) => None,
        }
    }

    pub fn as_linear(&self) -> Option<&LinearSymbol> {
        match self {
            Self::Qr(_) => None,
            Self::Linear(sym) => Some(sym),
        }
    }
}

// Encode
//------------------------------------------------------------------------------

/// Encodes `payload` into the symbology named by `config`
pub fn encode(payload: &str, config: &EncodeConfig) -> EncodeResult<Symbol> {
    debug!(symbology = %config.symbology, len = payload.len(), "Encoding payload");
    let symbol = match config.symbology {
        Symbology::Qr => Symbol::Qr(encode_qr(payload, config)?),
        Symbology::Code128 => Symbol::Linear(linear::encode_code128(payload)?),
        Symbology::Code39 => Symbol::Linear(linear::encode_code39(payload)?),
        Symbology::Ean13 => Symbol::Linear(linear::encode_ean13(payload)?),
        Symbology::Ean8 => Symbol::Linear(linear::encode_ean8(payload)?),
        Symbology::Upc => Symbol::Linear(linear::encode_upc_a(payload)?),
        Symbology::Itf => Symbol::Linear(linear::encode_itf(payload)?),
    };
    Ok(symbol)
}

fn encode_qr(payload: &str, config: &EncodeConfig) -> EncodeResult<QR> {
    let data = to_bytes(payload, config.charset)?;
    let mut builder = QRBuilder::new(&data);
    builder.ec_level(config.ec_level);
    if config.version != 0 {
        builder.version(Version::new(config.version)?);
    }
    builder.build()
}
