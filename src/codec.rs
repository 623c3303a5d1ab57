//! Text decoding for stored region names.
//!
//! Region strings are stored in GBK. Decoding sits behind [`TextDecoder`] so
//! the table can be swapped without touching record resolution.

use encoding::all::GBK;
use encoding::{DecoderTrap, Encoding};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::Error;

/// Converts raw region bytes to text. Never fails; malformed input is
/// replaced with U+FFFD.
pub trait TextDecoder: Send + Sync {
    /// Decode `bytes` to text.
    fn decode(&self, bytes: &[u8]) -> String;

    /// Name of the encoding.
    fn name(&self) -> &'static str;
}

/// GBK decoder, the native encoding of QQWry databases.
#[derive(Debug, Clone, Copy, Default)]
pub struct GbkDecoder;

impl TextDecoder for GbkDecoder {
    fn decode(&self, bytes: &[u8]) -> String {
        if bytes.is_ascii() {
            // ASCII is a subset of GBK.
            return String::from_utf8_lossy(bytes).into_owned();
        }
        let text = match GBK.decode(bytes, DecoderTrap::Replace) {
            Ok(text) => text,
            Err(_) => String::from_utf8_lossy(bytes).into_owned(),
        };
        if text.contains(char::REPLACEMENT_CHARACTER) {
            log::warn!("Replaced malformed GBK sequence in {:02x?}", bytes);
        }
        text
    }

    fn name(&self) -> &'static str {
        "gbk"
    }
}

/// Lossy UTF-8 decoder for databases written in UTF-8.
#[derive(Debug, Clone, Copy, Default)]
pub struct Utf8Decoder;

impl TextDecoder for Utf8Decoder {
    fn decode(&self, bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes).into_owned()
    }

    fn name(&self) -> &'static str {
        "utf8"
    }
}

/// Built-in encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextEncoding {
    #[default]
    Gbk,
    Utf8,
}

impl TextEncoding {
    /// Decoder for this encoding.
    pub fn decoder(self) -> Arc<dyn TextDecoder> {
        match self {
            TextEncoding::Gbk => Arc::new(GbkDecoder),
            TextEncoding::Utf8 => Arc::new(Utf8Decoder),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TextEncoding::Gbk => "gbk",
            TextEncoding::Utf8 => "utf8",
        }
    }
}

impl FromStr for TextEncoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gbk" | "gb2312" => Ok(TextEncoding::Gbk),
            "utf8" | "utf-8" => Ok(TextEncoding::Utf8),
            other => Err(Error::Config(format!("unknown encoding: {}", other))),
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
