// src/status.rs
// =============================================================================
// This module turns numeric status codes into short human-readable labels.
//
// A status code is either:
// - A real HTTP status (100-999), e.g. 200 or 404
// - A sentinel (zero or negative) meaning "we never got an HTTP response",
//   e.g. the request timed out or the host could not be resolved
//
// The label table is total: every i32 maps to *some* label. Unknown codes
// simply render as their number.
//
// Rust concepts:
// - Constants: Named sentinel values shared with the HTTP checker
// - match with ranges: Classifying numbers by range
// =============================================================================

use reqwest::StatusCode;

/// No HTTP response was received (generic transport failure)
pub const NO_RESPONSE: i32 = 0;
/// The request timed out
pub const TIMEOUT: i32 = -1;
/// The server refused the connection
pub const CONNECTION_REFUSED: i32 = -2;
/// The URL could not be parsed or requested
pub const MALFORMED_URL: i32 = -3;
/// DNS lookup for the host failed
pub const UNKNOWN_HOST: i32 = -4;
/// The redirect limit was exceeded
pub const TOO_MANY_REDIRECTS: i32 = -5;
/// TLS handshake or certificate failure
pub const SSL_ERROR: i32 = -6;

// Returns true when the status code means the URL is reachable
//
// 2xx (success) and 3xx (redirect) count as working. Everything else,
// including all sentinel codes, is broken.
pub fn is_working(status_code: i32) -> bool {
    (200..400).contains(&status_code)
}

// Maps a status code to a short label
//
// Examples:
//   200 -> "OK"
//   404 -> "Not Found"
//   -1  -> "Timeout"
//   799 -> "799" (valid range, but no reason phrase)
pub fn friendly_name(status_code: i32) -> String {
    match status_code {
        NO_RESPONSE => "No response".to_string(),
        TIMEOUT => "Timeout".to_string(),
        CONNECTION_REFUSED => "Connection refused".to_string(),
        MALFORMED_URL => "Malformed URL".to_string(),
        UNKNOWN_HOST => "Unknown host".to_string(),
        TOO_MANY_REDIRECTS => "Too many redirects".to_string(),
        SSL_ERROR => "SSL error".to_string(),
        code => http_reason(code).unwrap_or_else(|| code.to_string()),
    }
}

// Looks up the canonical HTTP reason phrase, if the code has one
fn http_reason(code: i32) -> Option<String> {
    let code = u16::try_from(code).ok()?;
    StatusCode::from_u16(code)
        .ok()?
        .canonical_reason()
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_http_codes() {
        assert_eq!(friendly_name(200), "OK");
        assert_eq!(friendly_name(301), "Moved Permanently");
        assert_eq!(friendly_name(404), "Not Found");
        assert_eq!(friendly_name(500), "Internal Server Error");
    }

    #[test]
    fn test_sentinel_codes() {
        assert_eq!(friendly_name(NO_RESPONSE), "No response");
        assert_eq!(friendly_name(TIMEOUT), "Timeout");
        assert_eq!(friendly_name(UNKNOWN_HOST), "Unknown host");
        assert_eq!(friendly_name(SSL_ERROR), "SSL error");
    }

    #[test]
    fn test_unknown_codes_fall_back_to_number() {
        assert_eq!(friendly_name(799), "799");
        assert_eq!(friendly_name(-42), "-42");
        assert_eq!(friendly_name(70_000), "70000");
    }

    #[test]
    fn test_working_classification() {
        assert!(is_working(200));
        assert!(is_working(204));
        assert!(is_working(302));
        assert!(!is_working(404));
        assert!(!is_working(500));
        assert!(!is_working(TIMEOUT));
        assert!(!is_working(NO_RESPONSE));
    }
}
