use anyhow::{anyhow, Result};
use encoding_rs::SHIFT_JIS;
use flate2::read::{DeflateDecoder, GzDecoder};
use std::io::Read;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentEncoding {
    Identity,
    Gzip,
    Deflate,
    Zstd,
}

impl ContentEncoding {
    /// Reads a `Content-Encoding` value. Only the first coding of a list is
    /// honoured; unknown codings are treated as identity.
    pub fn from_header(value: Option<&str>) -> Self {
        let coding = value
            .and_then(|v| v.split(',').next())
            .map(|v| v.trim().to_ascii_lowercase())
            .unwrap_or_default();
        match coding.as_str() {
            "gzip" | "x-gzip" => ContentEncoding::Gzip,
            "deflate" => ContentEncoding::Deflate,
            "zstd" => ContentEncoding::Zstd,
            _ => ContentEncoding::Identity,
        }
    }

    pub fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut decoded = Vec::new();
        match self {
            ContentEncoding::Identity => decoded.extend_from_slice(data),
            ContentEncoding::Gzip => {
                GzDecoder::new(data).read_to_end(&mut decoded)?;
            }
            ContentEncoding::Deflate => {
                DeflateDecoder::new(data).read_to_end(&mut decoded)?;
            }
            ContentEncoding::Zstd => decoded = zstd::decode_all(data)?,
        }
        Ok(decoded)
    }
}

/// Decompresses a response body and decodes it as text. UTF-8 is tried
/// first, then Shift_JIS.
pub fn decode_body(data: &[u8], encoding: ContentEncoding) -> Result<String> {
    let bytes = encoding.decompress(data)?;
    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(utf8e) => {
            let (text, _, had_errors) = SHIFT_JIS.decode(utf8e.as_bytes());
            if had_errors {
                return Err(anyhow!("Failed to decode body with utf8/shift-jis: {utf8e}"));
            }
            Ok(text.into_owned())
        }
    }
}
