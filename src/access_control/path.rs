//! Media path representation
//!
//! Paths reach the access layer either as text (routing parameters) or as raw
//! bytes (percent-decoded URLs, OS paths that are not valid UTF-8). Prefix
//! matching is performed in whichever representation the path arrives in.

use std::borrow::Cow;
use std::fmt;
use std::path::Path;

/// A borrowed media path, relative to the media root (e.g. `images/a.jpg`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaPath<'a> {
    /// UTF-8 path
    Text(&'a str),
    /// Raw byte path
    Bytes(&'a [u8]),
}

impl<'a> MediaPath<'a> {
    /// Wrap raw bytes, preferring the text form when they are valid UTF-8
    pub fn from_utf8_or_bytes(bytes: &'a [u8]) -> Self {
        match std::str::from_utf8(bytes) {
            Ok(text) => MediaPath::Text(text),
            Err(_) => MediaPath::Bytes(bytes),
        }
    }

    /// Check whether the path starts with `prefix`.
    ///
    /// The prefix is converted to the path's representation before comparing,
    /// so a text prefix matches byte paths too. Literal, not segment-aware.
    pub fn starts_with(&self, prefix: &str) -> bool {
        match self {
            MediaPath::Text(text) => text.starts_with(prefix),
            MediaPath::Bytes(bytes) => bytes.starts_with(prefix.as_bytes()),
        }
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        match *self {
            MediaPath::Text(text) => text.as_bytes(),
            MediaPath::Bytes(bytes) => bytes,
        }
    }

    /// The path as text, if it is valid UTF-8
    pub fn as_str(&self) -> Option<&'a str> {
        match *self {
            MediaPath::Text(text) => Some(text),
            MediaPath::Bytes(bytes) => std::str::from_utf8(bytes).ok(),
        }
    }

    pub fn to_string_lossy(&self) -> Cow<'a, str> {
        match *self {
            MediaPath::Text(text) => Cow::Borrowed(text),
            MediaPath::Bytes(bytes) => String::from_utf8_lossy(bytes),
        }
    }

    pub fn is_bytes(&self) -> bool {
        matches!(self, MediaPath::Bytes(_))
    }
}

impl fmt::Display for MediaPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

impl<'a> From<&'a str> for MediaPath<'a> {
    fn from(value: &'a str) -> Self {
        MediaPath::Text(value)
    }
}

impl<'a> From<&'a String> for MediaPath<'a> {
    fn from(value: &'a String) -> Self {
        MediaPath::Text(value.as_str())
    }
}

impl<'a> From<&'a [u8]> for MediaPath<'a> {
    fn from(value: &'a [u8]) -> Self {
        MediaPath::Bytes(value)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for MediaPath<'a> {
    fn from(value: &'a [u8; N]) -> Self {
        MediaPath::Bytes(value.as_slice())
    }
}

impl<'a> From<&'a Vec<u8>> for MediaPath<'a> {
    fn from(value: &'a Vec<u8>) -> Self {
        MediaPath::Bytes(value.as_slice())
    }
}

impl<'a> From<&'a Path> for MediaPath<'a> {
    fn from(value: &'a Path) -> Self {
        match value.to_str() {
            Some(text) => MediaPath::Text(text),
            None => MediaPath::Bytes(value.as_os_str().as_encoded_bytes()),
        }
    }
}
