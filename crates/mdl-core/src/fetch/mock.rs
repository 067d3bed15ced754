//! In-memory [`Fetcher`] for unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use super::{FetchError, FetchResponse, Fetcher};

enum Canned {
    Body {
        body: Vec<u8>,
        content_type: Option<String>,
        final_url: Option<String>,
    },
    Status(u32),
    ConnectionRefused,
    TimedOut,
}

/// Serves canned responses by exact URL; unknown URLs return HTTP 404.
#[derive(Default)]
pub(crate) struct MockFetcher {
    routes: HashMap<String, Canned>,
    delay: Option<Duration>,
    requests: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_body(mut self, url: &str, body: impl Into<Vec<u8>>) -> Self {
        self.routes.insert(
            url.to_string(),
            Canned::Body {
                body: body.into(),
                content_type: None,
                final_url: None,
            },
        );
        self
    }

    pub(crate) fn with_typed_body(mut self, url: &str, content_type: &str, body: impl Into<Vec<u8>>) -> Self {
        self.routes.insert(
            url.to_string(),
            Canned::Body {
                body: body.into(),
                content_type: Some(content_type.to_string()),
                final_url: None,
            },
        );
        self
    }

    pub(crate) fn with_redirect(mut self, url: &str, final_url: &str, body: impl Into<Vec<u8>>) -> Self {
        self.routes.insert(
            url.to_string(),
            Canned::Body {
                body: body.into(),
                content_type: None,
                final_url: Some(final_url.to_string()),
            },
        );
        self
    }

    pub(crate) fn with_status(mut self, url: &str, status: u32) -> Self {
        self.routes.insert(url.to_string(), Canned::Status(status));
        self
    }

    pub(crate) fn with_connection_refused(mut self, url: &str) -> Self {
        self.routes.insert(url.to_string(), Canned::ConnectionRefused);
        self
    }

    pub(crate) fn with_timeout(mut self, url: &str) -> Self {
        self.routes.insert(url.to_string(), Canned::TimedOut);
        self
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl Fetcher for MockFetcher {
    fn get(&self, url: &str) -> Result<FetchResponse, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(d) = self.delay {
            std::thread::sleep(d);
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match self.routes.get(url) {
            Some(Canned::Body {
                body,
                content_type,
                final_url,
            }) => Ok(FetchResponse {
                status: 200,
                final_url: final_url.clone().unwrap_or_else(|| url.to_string()),
                content_type: content_type.clone(),
                body: body.clone(),
            }),
            Some(Canned::Status(code)) => Err(FetchError::Http(*code)),
            // CURLE_COULDNT_CONNECT
            Some(Canned::ConnectionRefused) => Err(FetchError::Curl(curl::Error::new(7))),
            // CURLE_OPERATION_TIMEDOUT
            Some(Canned::TimedOut) => Err(FetchError::Curl(curl::Error::new(28))),
            None => Err(FetchError::Http(404)),
        }
    }
}
