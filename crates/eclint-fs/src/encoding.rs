//! Text encodings recognised in `charset` properties

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Error, Result};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// A text encoding a file can be read and stored with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Encoding {
    Latin1,
    #[default]
    Utf8,
    Utf8Bom,
    Utf16Be,
    Utf16Le,
}

impl Encoding {
    /// Canonical lowercase name, as written in a `charset` property.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Latin1 => "latin1",
            Self::Utf8 => "utf-8",
            Self::Utf8Bom => "utf-8-bom",
            Self::Utf16Be => "utf-16be",
            Self::Utf16Le => "utf-16le",
        }
    }

    /// Decode raw file bytes. `path` is only used for error context.
    pub fn decode(&self, bytes: &[u8], path: &Path) -> Result<String> {
        match self {
            Self::Latin1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
            Self::Utf8 => String::from_utf8(bytes.to_vec())
                .map_err(|e| self.decode_error(path, e.to_string())),
            Self::Utf8Bom => {
                let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
                String::from_utf8(body.to_vec())
                    .map_err(|e| self.decode_error(path, e.to_string()))
            }
            Self::Utf16Be | Self::Utf16Le => {
                if bytes.len() % 2 != 0 {
                    return Err(self.decode_error(path, "odd number of bytes".to_string()));
                }
                let units: Vec<u16> = bytes
                    .chunks_exact(2)
                    .map(|pair| match self {
                        Self::Utf16Be => u16::from_be_bytes([pair[0], pair[1]]),
                        _ => u16::from_le_bytes([pair[0], pair[1]]),
                    })
                    .collect();
                // A leading U+FEFF stays in the text so `encode` writes it back
                String::from_utf16(&units).map_err(|e| self.decode_error(path, e.to_string()))
            }
        }
    }

    /// Encode text for storage. `path` is only used for error context.
    pub fn encode(&self, text: &str, path: &Path) -> Result<Vec<u8>> {
        match self {
            Self::Latin1 => text
                .chars()
                .map(|c| {
                    u8::try_from(u32::from(c)).map_err(|_| Error::Encode {
                        path: path.to_path_buf(),
                        encoding: self.name().to_string(),
                        message: format!("character {:?} is outside latin1", c),
                    })
                })
                .collect(),
            Self::Utf8 => Ok(text.as_bytes().to_vec()),
            Self::Utf8Bom => {
                let mut out = Vec::with_capacity(text.len() + UTF8_BOM.len());
                if !text.starts_with('\u{FEFF}') {
                    out.extend_from_slice(UTF8_BOM);
                }
                out.extend_from_slice(text.as_bytes());
                Ok(out)
            }
            Self::Utf16Be => Ok(text.encode_utf16().flat_map(u16::to_be_bytes).collect()),
            Self::Utf16Le => Ok(text.encode_utf16().flat_map(u16::to_le_bytes).collect()),
        }
    }

    fn decode_error(&self, path: &Path, message: String) -> Error {
        Error::Decode {
            path: path.to_path_buf(),
            encoding: self.name().to_string(),
            message,
        }
    }
}

impl FromStr for Encoding {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "latin1" | "iso-8859-1" | "iso8859-1" | "us-ascii" | "ascii" => Ok(Self::Latin1),
            "utf-8" | "utf8" => Ok(Self::Utf8),
            "utf-8-bom" | "utf8-bom" => Ok(Self::Utf8Bom),
            "utf-16be" | "utf16be" => Ok(Self::Utf16Be),
            "utf-16le" | "utf16le" => Ok(Self::Utf16Le),
            _ => Err(Error::UnsupportedEncoding {
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Encoding {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Encoding {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}
