//! Remote leaf: HTTP GET via the curl crate (libcurl), body streamed to the sink.

use url::Url;

use super::FetchError;
use crate::config::HttpConfig;

/// Map a curl error to a fetch error: malformed URLs are the locator's fault,
/// everything else is transport.
pub(super) fn classify_curl_error(e: curl::Error) -> FetchError {
    if e.is_url_malformed() || e.is_unsupported_protocol() {
        return FetchError::InvalidLocator {
            reason: e.to_string(),
        };
    }
    FetchError::RemoteTransport(e)
}

/// Only absolute http(s) URLs are fetched.
fn validate_url(raw: &str) -> Result<Url, FetchError> {
    let url = Url::parse(raw).map_err(|e| FetchError::InvalidLocator {
        reason: format!("invalid URL {:?}: {}", raw, e),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(FetchError::InvalidLocator {
            reason: format!("unsupported URL scheme {:?}", other),
        }),
    }
}

/// Performs a GET and streams the body to `sink`.
///
/// The body of a non-2xx response may already have reached the sink when
/// `RemoteStatus` is returned; callers discard what they counted.
/// Runs in the current thread; call from `spawn_blocking` if used from async code.
pub fn fetch_remote(
    url: &str,
    http: &HttpConfig,
    sink: &mut dyn FnMut(&[u8]),
) -> Result<(), FetchError> {
    if url.is_empty() {
        return Err(FetchError::empty_locator());
    }
    let url = validate_url(url)?;

    let mut easy = curl::easy::Easy::new();
    easy.url(url.as_str())?;
    easy.get(true)?;
    easy.follow_location(http.follow_redirects)?;
    if http.follow_redirects {
        easy.max_redirections(http.max_redirects)?;
    }
    easy.connect_timeout(http.connect_timeout())?;
    if let Some(t) = http.timeout() {
        easy.timeout(t)?;
    }

    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            sink(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }

    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        return Err(FetchError::RemoteStatus { status: code });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_relative_url() {
        let err = validate_url("/go").unwrap_err();
        assert!(matches!(err, FetchError::InvalidLocator { .. }));
    }

    #[test]
    fn rejects_non_http_scheme() {
        let err = validate_url("ftp://example.com/file").unwrap_err();
        assert!(matches!(err, FetchError::InvalidLocator { .. }));
        assert!(validate_url("file:///etc/hosts").is_err());
    }

    #[test]
    fn accepts_http_and_https() {
        assert!(validate_url("http://127.0.0.1:8080/go").is_ok());
        assert!(validate_url("https://example.com/").is_ok());
    }

    #[test]
    fn invalid_url_fails_before_io() {
        let mut called = false;
        let err = fetch_remote("not a url", &HttpConfig::default(), &mut |_| called = true)
            .unwrap_err();
        assert!(matches!(err, FetchError::InvalidLocator { .. }));
        assert!(!called);
    }

    #[test]
    fn connection_refused_is_transport_error() {
        // Bind then drop to get a port nothing listens on.
        let port = {
            let l = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            l.local_addr().unwrap().port()
        };
        let http = HttpConfig {
            connect_timeout_secs: 2,
            timeout_secs: 5,
            ..HttpConfig::default()
        };
        let err = fetch_remote(&format!("http://127.0.0.1:{}/", port), &http, &mut |_| {})
            .unwrap_err();
        assert!(matches!(err, FetchError::RemoteTransport(_)), "{:?}", err);
    }
}
