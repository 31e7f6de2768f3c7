//! This module holds traits for extending functionalities for existing datatypes
//! & inbuilt datatypes.

use std::borrow::Cow;

use error_stack::ResultExt;

use crate::errors::{CustomResult, ParsingError};

/// Extending functionalities of `str` for values carried in gateway payloads
pub trait StringExt {
    /// Decode `%XX` escape sequences the way the gateway encodes them.
    ///
    /// A `%` that does not introduce two hex digits is kept literally, and `+` is
    /// left alone rather than turned into a space. Escapes that decode to bytes
    /// which are not UTF-8 are rejected.
    fn unescape_data_string(&self) -> CustomResult<String, ParsingError>;

    /// Like [`StringExt::unescape_data_string`], but escapes that do not form valid
    /// UTF-8 are kept as their `%XX` text instead of failing the whole value.
    fn unescape_data_string_lenient(&self) -> String;
}

impl StringExt for str {
    fn unescape_data_string(&self) -> CustomResult<String, ParsingError> {
        percent_encoding::percent_decode_str(self)
            .decode_utf8()
            .map(|decoded| decoded.into_owned())
            .change_context(ParsingError::PercentDecodingFailure)
            .attach_printable_lazy(|| format!("Unable to unescape value of length {}", self.len()))
    }

    fn unescape_data_string_lenient(&self) -> String {
        let decoded: Cow<'_, [u8]> = percent_encoding::percent_decode_str(self).into();
        let mut unescaped = String::with_capacity(self.len());

        // `self` is valid UTF-8, so every invalid byte came out of an escape.
        for chunk in decoded.utf8_chunks() {
            unescaped.push_str(chunk.valid());
            for byte in chunk.invalid() {
                unescaped.push_str(&format!("%{byte:02X}"));
            }
        }

        unescaped
    }
}

/// Extending functionalities of raw response and request bodies
pub trait BytesExt {
    /// Read the bytes as text, replacing invalid UTF-8 sequences
    fn to_text_lossy(&self) -> String;

    /// Read the bytes as text, failing on invalid UTF-8
    fn parse_text(&self, type_name: &'static str) -> CustomResult<String, ParsingError>;
}

impl BytesExt for [u8] {
    fn to_text_lossy(&self) -> String {
        String::from_utf8_lossy(self).into_owned()
    }

    fn parse_text(&self, type_name: &'static str) -> CustomResult<String, ParsingError> {
        std::str::from_utf8(self)
            .map(ToOwned::to_owned)
            .change_context(ParsingError::Utf8ConversionFailure(type_name))
    }
}
