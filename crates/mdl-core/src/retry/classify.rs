//! Maps fetch failures onto [`ErrorKind`].

use super::policy::ErrorKind;
use crate::fetch::FetchError;

pub fn classify(err: &FetchError) -> ErrorKind {
    match err {
        _ if err.is_timeout() => ErrorKind::Timeout,
        FetchError::Curl(e) => classify_curl_error(e),
        FetchError::Http(status) => classify_http_status(*status),
    }
}

pub fn classify_http_status(status: u32) -> ErrorKind {
    match status {
        429 | 503 => ErrorKind::Throttled,
        500..=599 => ErrorKind::Http5xx(status as u16),
        _ => ErrorKind::Permanent,
    }
}

/// Timeouts and transport-level failures are transient; everything else
/// (bad URL, unsupported protocol, TLS setup) is not.
pub fn classify_curl_error(err: &curl::Error) -> ErrorKind {
    let transport = [
        err.is_couldnt_connect(),
        err.is_couldnt_resolve_host(),
        err.is_couldnt_resolve_proxy(),
        err.is_got_nothing(),
        err.is_partial_file(),
        err.is_recv_error(),
        err.is_send_error(),
        err.is_read_error(),
    ];
    if err.is_operation_timedout() {
        ErrorKind::Timeout
    } else if transport.contains(&true) {
        ErrorKind::Connection
    } else {
        ErrorKind::Permanent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses() {
        assert_eq!(classify_http_status(429), ErrorKind::Throttled);
        assert_eq!(classify_http_status(503), ErrorKind::Throttled);
        assert_eq!(classify_http_status(500), ErrorKind::Http5xx(500));
        assert_eq!(classify_http_status(404), ErrorKind::Permanent);
        assert_eq!(classify_http_status(301), ErrorKind::Permanent);
    }

    #[test]
    fn curl_codes() {
        // 28 timed out, 7 couldn't connect, 6 couldn't resolve, 18 partial file, 3 bad URL.
        assert_eq!(classify_curl_error(&curl::Error::new(28)), ErrorKind::Timeout);
        assert_eq!(classify_curl_error(&curl::Error::new(7)), ErrorKind::Connection);
        assert_eq!(classify_curl_error(&curl::Error::new(6)), ErrorKind::Connection);
        assert_eq!(classify_curl_error(&curl::Error::new(18)), ErrorKind::Connection);
        assert_eq!(classify_curl_error(&curl::Error::new(3)), ErrorKind::Permanent);
    }

    #[test]
    fn fetch_error_dispatch() {
        assert_eq!(classify(&FetchError::Http(502)), ErrorKind::Http5xx(502));
        assert_eq!(classify(&FetchError::Curl(curl::Error::new(7))), ErrorKind::Connection);
        assert_eq!(classify(&FetchError::Curl(curl::Error::new(28))), ErrorKind::Timeout);
        assert_eq!(classify(&FetchError::Http(504)), ErrorKind::Http5xx(504));
    }
}
