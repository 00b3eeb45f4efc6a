//! Utility functions shared across the application.

mod secret;

pub use secret::SecretString;

use crate::error::ServerError;
use std::net::SocketAddr;

/// Decode the media-relative part of a request path.
///
/// Strips leading slashes and percent-decodes the rest. The result is raw
/// bytes because a decoded path need not be valid UTF-8.
///
/// # Example
/// ```
/// use secure_media::util::decode_media_path;
///
/// assert_eq!(decode_media_path("/images/a%20b.jpg"), b"images/a b.jpg");
/// assert_eq!(decode_media_path("/raw/%FF.bin"), b"raw/\xff.bin");
/// ```
pub fn decode_media_path(uri_path: &str) -> Vec<u8> {
    urlencoding::decode_binary(uri_path.trim_start_matches('/').as_bytes()).into_owned()
}

/// Resolve a decoded media path the way the file server walks it.
///
/// Empty and `.` segments are dropped and a trailing slash is kept, so the
/// policy check sees the same file the server would open. Returns `None` for
/// paths containing `..`, which are never served.
///
/// # Example
/// ```
/// use secure_media::util::normalize_media_path;
///
/// assert_eq!(normalize_media_path(b"./images//a.jpg").unwrap(), b"images/a.jpg");
/// assert_eq!(normalize_media_path(b"images/./thumbs/").unwrap(), b"images/thumbs/");
/// assert!(normalize_media_path(b"images/../secret.txt").is_none());
/// ```
pub fn normalize_media_path(decoded: &[u8]) -> Option<Vec<u8>> {
    let mut normalized = Vec::with_capacity(decoded.len());
    for segment in decoded.split(|&b| b == b'/') {
        match segment {
            b"" | b"." => {}
            b".." => return None,
            _ => {
                if !normalized.is_empty() {
                    normalized.push(b'/');
                }
                normalized.extend_from_slice(segment);
            }
        }
    }
    if decoded.ends_with(b"/") && !normalized.is_empty() {
        normalized.push(b'/');
    }
    Some(normalized)
}

/// Parse `host:port` into a socket address.
pub fn parse_bind_addr(host: &str, port: u16) -> Result<SocketAddr, ServerError> {
    let address = if host.contains(':') && !host.starts_with('[') {
        // Bare IPv6 literal
        format!("[{}]:{}", host, port)
    } else {
        format!("{}:{}", host, port)
    };

    address
        .parse()
        .map_err(|e: std::net::AddrParseError| ServerError::InvalidAddress {
            address,
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_media_path_plain() {
        assert_eq!(decode_media_path("/images/a.jpg"), b"images/a.jpg");
        assert_eq!(decode_media_path("images/a.jpg"), b"images/a.jpg");
        assert_eq!(decode_media_path("//images/a.jpg"), b"images/a.jpg");
    }

    #[test]
    fn test_decode_media_path_non_utf8() {
        let decoded = decode_media_path("/raw/%C3%28");
        assert_eq!(decoded, vec![b'r', b'a', b'w', b'/', 0xC3, 0x28]);
        assert!(std::str::from_utf8(&decoded).is_err());
    }

    #[test]
    fn test_decode_media_path_encoded_prefix() {
        // Encoding must not let a request slip past a prefix
        assert_eq!(decode_media_path("/%69mages/a.jpg"), b"images/a.jpg");
    }

    #[test]
    fn test_normalize_media_path_drops_empty_and_dot_segments() {
        assert_eq!(normalize_media_path(b"images/a.jpg").unwrap(), b"images/a.jpg");
        assert_eq!(normalize_media_path(b"./images/a.jpg").unwrap(), b"images/a.jpg");
        assert_eq!(normalize_media_path(b"images/./a.jpg").unwrap(), b"images/a.jpg");
        assert_eq!(
            normalize_media_path(b"images//private/x").unwrap(),
            b"images/private/x"
        );
        assert_eq!(normalize_media_path(b"././").unwrap(), b"");
        assert_eq!(normalize_media_path(b"").unwrap(), b"");
    }

    #[test]
    fn test_normalize_media_path_keeps_trailing_slash() {
        assert_eq!(normalize_media_path(b"images/").unwrap(), b"images/");
        assert_eq!(normalize_media_path(b"images/.").unwrap(), b"images");
        assert_eq!(normalize_media_path(b"images//").unwrap(), b"images/");
    }

    #[test]
    fn test_normalize_media_path_rejects_parent_segments() {
        assert!(normalize_media_path(b"..").is_none());
        assert!(normalize_media_path(b"images/../secret.txt").is_none());
        assert!(normalize_media_path(b"public/..").is_none());
        // Only whole segments count
        assert_eq!(normalize_media_path(b"a..b/..c").unwrap(), b"a..b/..c");
    }

    #[test]
    fn test_normalize_decoded_dot_segment() {
        let decoded = decode_media_path("/%2E/images/a.jpg");
        assert_eq!(normalize_media_path(&decoded).unwrap(), b"images/a.jpg");
    }

    #[test]
    fn test_parse_bind_addr() {
        assert_eq!(
            parse_bind_addr("127.0.0.1", 8000).unwrap().to_string(),
            "127.0.0.1:8000"
        );
        assert_eq!(parse_bind_addr("::1", 8000).unwrap().port(), 8000);
        assert!(matches!(
            parse_bind_addr("not a host", 8000),
            Err(ServerError::InvalidAddress { .. })
        ));
    }
}
