//! Canonical hash lookup for arbitrary URLs.

use crate::client::Bitly;
use crate::http::HttpTransport;
use crate::request::Overrides;
use crate::types::Target;

const SHORT_PREFIX: &str = "http://bit.ly/";

impl<T: HttpTransport> Bitly<T> {
    /// The canonical bit.ly hash of `url`.
    ///
    /// Short bit.ly URLs are resolved through `info`; anything else is
    /// shortened first. Failures are logged and reported as `None`.
    pub fn hash_for(&self, url: &str) -> Option<String> {
        if url.is_empty() {
            return None;
        }

        let (key, outcome) = match url.split_once(SHORT_PREFIX) {
            Some((_, hash)) => (
                hash,
                self.info(
                    &Target::Hash(hash.to_string()),
                    Some("hash"),
                    &Overrides::default(),
                ),
            ),
            None => (url, self.shorten(url, &Overrides::default())),
        };

        match outcome {
            Ok(result) if result.code == 200 => result
                .result
                .pointer([key, "hash"])
                .and_then(|v| v.as_str())
                .filter(|hash| !hash.is_empty())
                .map(str::to_string),
            Ok(result) => {
                tracing::warn!(url, code = result.code, "unexpected status while looking up hash");
                None
            }
            Err(err) => {
                tracing::warn!(url, error = %err, "could not look up hash");
                None
            }
        }
    }
}
