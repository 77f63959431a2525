// src/core/net.rs
//
// Retried, paced HTTP GET of documentation pages.

use std::error::Error as StdError;
use std::thread;
use std::time::Duration;

use crate::config::consts::{
    FETCH_ATTEMPTS, FETCH_BACKOFF_SECS, HTTP_TIMEOUT_SECS, MIN_CONTENT_LEN, USER_AGENT,
};
use crate::core::{DiagnosticKind, Diagnostics};

type BoxError = Box<dyn StdError + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("could not build HTTP client: {0}")]
    Client(String),
    #[error("fetch of {url} failed after {attempts} attempts: {last}")]
    Exhausted { url: String, attempts: u32, last: String },
}

/// One GET round-trip. Non-success statuses are errors.
pub trait Transport {
    fn get(&mut self, url: &str) -> Result<String, BoxError>;
}

/// HTTPS transport over a blocking reqwest client.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn get(&mut self, url: &str) -> Result<String, BoxError> {
        let resp = self.client.get(url).send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(format!("HTTP error: {status} {url}").into());
        }
        Ok(resp.text()?)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub backoff: Duration,
    /// Bodies shorter than this (in chars) are treated as truncated.
    pub min_len: usize,
    /// Pause after every successful fetch.
    pub pace: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: FETCH_ATTEMPTS,
            backoff: Duration::from_secs(FETCH_BACKOFF_SECS),
            min_len: MIN_CONTENT_LEN,
            pace: Duration::ZERO,
        }
    }
}

/// Up to `policy.attempts` GETs of `url`. An error or a short body waits
/// `policy.backoff` before the next try; a short body on the final try is
/// returned as-is. On success the caller is paced by `policy.pace`.
pub fn fetch(
    transport: &mut dyn Transport,
    url: &str,
    policy: &RetryPolicy,
    diags: &mut Diagnostics,
) -> Result<String, FetchError> {
    let attempts = policy.attempts.max(1);
    let mut last = s!("no attempt made");

    for attempt in 1..=attempts {
        let final_try = attempt == attempts;
        match transport.get(url) {
            Ok(body) => {
                let len = body.chars().count();
                if len >= policy.min_len || final_try {
                    if len < policy.min_len {
                        diags.push(
                            DiagnosticKind::Fetch,
                            format!("{url}: accepting short response ({len} chars) on final attempt"),
                        );
                    }
                    logf!("Fetched {url} ({len} chars, attempt {attempt}/{attempts})");
                    pause(policy.pace);
                    return Ok(body);
                }
                logw!("{url}: response only {len} chars, retrying (attempt {attempt}/{attempts})");
                last = format!("response truncated ({len} chars)");
            }
            Err(e) => {
                logw!("{url}: {e} (attempt {attempt}/{attempts})");
                last = e.to_string();
            }
        }
        if !final_try {
            pause(policy.backoff);
        }
    }

    loge!("Giving up on {url}: {last}");
    Err(FetchError::Exhausted { url: url.to_string(), attempts, last })
}

pub(crate) fn pause(d: Duration) {
    if !d.is_zero() {
        thread::sleep(d);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    struct Scripted {
        replies: VecDeque<Result<String, String>>,
        calls: u32,
    }

    impl Scripted {
        fn new(replies: Vec<Result<String, String>>) -> Self {
            Self { replies: replies.into(), calls: 0 }
        }
    }

    impl Transport for Scripted {
        fn get(&mut self, _url: &str) -> Result<String, BoxError> {
            self.calls += 1;
            match self.replies.pop_front() {
                Some(Ok(body)) => Ok(body),
                Some(Err(e)) => Err(e.into()),
                None => Err("script exhausted".into()),
            }
        }
    }

    fn quick() -> RetryPolicy {
        RetryPolicy { backoff: Duration::ZERO, min_len: 10, ..RetryPolicy::default() }
    }

    #[test]
    fn first_good_response_wins() {
        let mut t = Scripted::new(vec![Ok("x".repeat(20))]);
        let mut diags = Diagnostics::new();
        assert_eq!(fetch(&mut t, "u", &quick(), &mut diags).unwrap().len(), 20);
        assert_eq!(t.calls, 1);
        assert!(diags.is_empty());
    }

    #[test]
    fn retries_error_then_short_body() {
        let mut t = Scripted::new(vec![Err("timeout".into()), Ok("tiny".into()), Ok("y".repeat(30))]);
        let mut diags = Diagnostics::new();
        let body = fetch(&mut t, "u", &quick(), &mut diags).unwrap();
        assert_eq!(body.len(), 30);
        assert_eq!(t.calls, 3);
    }

    #[test]
    fn exhaustion_is_an_error() {
        let mut t = Scripted::new(vec![Err("500".into()), Err("500".into()), Err("503".into()), Ok("z".repeat(30))]);
        let mut diags = Diagnostics::new();
        let err = fetch(&mut t, "u", &quick(), &mut diags).unwrap_err();
        assert_eq!(t.calls, 3);
        match err {
            FetchError::Exhausted { attempts, last, .. } => {
                assert_eq!(attempts, 3);
                assert_eq!(last, "503");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn successful_fetch_is_paced() {
        let mut t = Scripted::new(vec![Ok("x".repeat(20))]);
        let policy = RetryPolicy { pace: Duration::from_millis(30), ..quick() };
        let started = std::time::Instant::now();
        fetch(&mut t, "u", &policy, &mut Diagnostics::new()).unwrap();
        assert!(started.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn short_body_on_last_attempt_is_kept() {
        let mut t = Scripted::new(vec![Ok("a".into()), Ok("b".into()), Ok("c".into())]);
        let mut diags = Diagnostics::new();
        assert_eq!(fetch(&mut t, "u", &quick(), &mut diags).unwrap(), "c");
        assert_eq!(diags.count(DiagnosticKind::Fetch), 1);
    }
}
