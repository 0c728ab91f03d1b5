// src/checker/http.rs
// =============================================================================
// This module checks if URLs are alive by making HTTP requests.
//
// Key functionality:
// - Makes HTTP GET requests (not HEAD: some servers answer HEAD with a
//   status that doesn't match what a browser would get)
// - Follows redirects ourselves, one hop at a time, with a hop budget so a
//   redirect loop can't keep us busy forever
// - Turns transport problems (timeout, DNS, TLS...) into a result instead of
//   an error, so one bad host never stops the run
//
// Rust concepts:
// - Traits: `Fetch` hides the HTTP client so tests can script responses
// - async/await: network I/O without blocking other checks
// - Enums: to represent the different ways a link can fail
// =============================================================================

use reqwest::{header::LOCATION, redirect::Policy, Client};
use serde::{Deserialize, Serialize};
use std::future::Future;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use super::rules::{classify, LocalVerdict, RejectReason};
use crate::config::CheckConfig;

/// How many redirects we follow before giving up on a link
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

/// What a single GET request told us.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    /// The HTTP status code
    pub status: u16,
    /// The Location header, if the server sent one
    pub location: Option<String>,
}

impl HttpReply {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            location: None,
        }
    }

    pub fn redirect(status: u16, location: impl Into<String>) -> Self {
        Self {
            status,
            location: Some(location.into()),
        }
    }
}

/// Ways a request can fail before we get any HTTP status back
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum TransportError {
    /// Request timed out
    #[error("request timed out")]
    Timeout,
    /// Could not resolve hostname
    #[error("could not resolve hostname")]
    Dns,
    /// SSL/TLS certificate error
    #[error("TLS error")]
    Tls,
    /// Connection refused, reset, unreachable host...
    #[error("connection failed")]
    Connect,
    /// Anything else, with the client's description
    #[error("{0}")]
    Other(String),
}

/// Performs one GET request without following redirects.
pub trait Fetch {
    fn get(&self, url: &str) -> impl Future<Output = Result<HttpReply, TransportError>>;
}

/// Why a link that looked fine could not be reached
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UnreachableReason {
    /// The last response had a status that is neither 2xx nor 3xx
    Status { code: u16 },
    /// The redirect budget ran out (redirect loop or very long chain)
    TooManyRedirects,
    /// A 3xx response without a usable Location header
    MissingLocation { code: u16 },
    /// The request never got a response
    Transport { error: TransportError },
}

impl std::fmt::Display for UnreachableReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnreachableReason::Status { code } => write!(f, "HTTP {}", code),
            UnreachableReason::TooManyRedirects => f.write_str("too many redirects"),
            UnreachableReason::MissingLocation { code } => {
                write!(f, "HTTP {} without Location header", code)
            }
            UnreachableReason::Transport { error } => write!(f, "{}", error),
        }
    }
}

/// Represents the status of a link after checking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LinkStatus {
    /// Fetched and ended in a 2xx response
    Ok,
    /// Accepted without fetching (mailto:, relative path, anchor, placeholder)
    Exempt,
    /// Failed the local syntax rules
    Rejected { reason: RejectReason },
    /// Looked fine but could not be reached
    Unreachable { reason: UnreachableReason },
}

impl LinkStatus {
    /// Helper method to check if the link is OK
    ///
    /// Returns true for Ok and Exempt statuses
    pub fn is_ok(&self) -> bool {
        matches!(self, LinkStatus::Ok | LinkStatus::Exempt)
    }
}

impl std::fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinkStatus::Ok => f.write_str("ok"),
            LinkStatus::Exempt => f.write_str("exempt"),
            LinkStatus::Rejected { reason } => write!(f, "rejected: {}", reason),
            LinkStatus::Unreachable { reason } => write!(f, "unreachable: {}", reason),
        }
    }
}

/// Decides whether a single link is okay.
///
/// The local rules run first; only links that pass them are fetched.
pub async fn check_link<F: Fetch>(fetcher: &F, link: &str, max_redirects: usize) -> LinkStatus {
    match classify(link) {
        LocalVerdict::Exempt => LinkStatus::Exempt,
        LocalVerdict::Rejected(reason) => LinkStatus::Rejected { reason },
        LocalVerdict::NeedsFetch => match fetchable(fetcher, link, max_redirects).await {
            Ok(()) => LinkStatus::Ok,
            Err(reason) => LinkStatus::Unreachable { reason },
        },
    }
}

/// Fetches `url`, following up to `max_redirects` redirects.
///
/// Every request uses up one unit of the budget, so a URL that redirects to
/// itself is requested exactly `max_redirects` times before we give up.
/// A budget of 0 fails without any request.
pub async fn fetchable<F: Fetch>(
    fetcher: &F,
    url: &str,
    max_redirects: usize,
) -> Result<(), UnreachableReason> {
    let mut current = url.to_string();
    let mut remaining = max_redirects;

    loop {
        if remaining == 0 {
            debug!(url, "redirect budget exhausted");
            return Err(UnreachableReason::TooManyRedirects);
        }
        remaining -= 1;

        let reply = fetcher.get(&current).await.map_err(|error| {
            warn!(url = %current, %error, "request failed");
            UnreachableReason::Transport { error }
        })?;
        debug!(url = %current, status = reply.status, "fetched");

        match reply.status {
            200..=299 => return Ok(()),
            300..=399 => {
                let code = reply.status;
                let location = reply
                    .location
                    .filter(|l| !l.trim().is_empty())
                    .ok_or(UnreachableReason::MissingLocation { code })?;
                // The target may be on a completely different host
                current = resolve_location(&current, &location);
            }
            code => return Err(UnreachableReason::Status { code }),
        }
    }
}

// Location headers are allowed to be relative ("/new-page"); resolve them
// against the URL we just requested.
fn resolve_location(current: &str, location: &str) -> String {
    match Url::parse(current).and_then(|base| base.join(location)) {
        Ok(url) => url.to_string(),
        Err(_) => location.to_string(),
    }
}

/// The real HTTP client.
///
/// reqwest's own redirect handling is turned off: `fetchable` follows
/// redirects itself so the hop budget is ours to count.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &CheckConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(config.timeout)
            .redirect(Policy::none())
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    async fn get(&self, url: &str) -> Result<HttpReply, TransportError> {
        // We only need the status and headers; dropping the response
        // without reading the body is fine.
        let response = self.client.get(url).send().await.map_err(categorize_error)?;

        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        Ok(HttpReply {
            status: response.status().as_u16(),
            location,
        })
    }
}

// Categorizes the different error types from reqwest
//
// The top-level message is usually just "error sending request", the useful
// part (dns error, certificate...) is further down the source chain.
fn categorize_error(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        return TransportError::Timeout;
    }

    let description = error_chain(&error).to_lowercase();

    if description.contains("dns") || description.contains("resolve") {
        TransportError::Dns
    } else if description.contains("certificate")
        || description.contains("tls")
        || description.contains("ssl")
    {
        TransportError::Tls
    } else if error.is_connect() {
        TransportError::Connect
    } else {
        TransportError::Other(error_chain(&error))
    }
}

fn error_chain(error: &(dyn std::error::Error + 'static)) -> String {
    let mut parts = vec![error.to_string()];
    let mut source = error.source();
    while let Some(cause) = source {
        parts.push(cause.to_string());
        source = cause.source();
    }
    parts.join(": ")
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a loop instead of recursion for redirects?
//    - Each hop only needs the next URL and the remaining budget
//    - A loop keeps the call stack flat no matter how long the chain is
//    - `remaining` goes down by one per request, so the loop always ends
//
// 2. What is `impl Future` in the Fetch trait?
//    - It says "get() returns something you can .await"
//    - Implementations can simply write `async fn get(...)`
//    - Tests plug in a fake fetcher, the real program uses reqwest
//
// 3. Why turn errors into values?
//    - A dead host is a normal finding for a link checker, not a crash
//    - UnreachableReason::Transport keeps the details for the report
// -----------------------------------------------------------------------------
