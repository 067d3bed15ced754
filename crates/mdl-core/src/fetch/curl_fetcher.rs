//! libcurl-backed [`Fetcher`].

use super::{FetchError, FetchOptions, FetchResponse, Fetcher};

/// Issues GETs with a fresh curl Easy handle per request.
#[derive(Debug, Clone, Default)]
pub struct CurlFetcher {
    opts: FetchOptions,
}

impl CurlFetcher {
    pub fn new(opts: FetchOptions) -> Self {
        Self { opts }
    }
}

impl Fetcher for CurlFetcher {
    fn get(&self, url: &str) -> Result<FetchResponse, FetchError> {
        let mut body = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.get(true)?;
        easy.follow_location(true)?;
        easy.max_redirections(self.opts.max_redirections)?;
        easy.useragent(&self.opts.user_agent)?;
        // Empty string = every encoding this libcurl build can decode.
        easy.accept_encoding("")?;
        easy.connect_timeout(self.opts.connect_timeout)?;
        easy.timeout(self.opts.timeout)?;

        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let status = easy.response_code()?;
        if !(200..300).contains(&status) {
            tracing::debug!(url, status, "GET returned non-success status");
            return Err(FetchError::Http(status));
        }

        let final_url = easy.effective_url()?.unwrap_or(url).to_string();
        let content_type = easy.content_type()?.map(str::to_string);

        Ok(FetchResponse {
            status,
            final_url,
            content_type,
            body,
        })
    }
}
