// src/checker/mod.rs
// =============================================================================
// This module contains all link checking logic.
//
// Submodules:
// - extract: walks a translation tree and pulls out href="..." values
// - rules: checks a link can pass without touching the network
// - http: fetches links, following redirects up to a limit
// - validate: runs the above over whole locales, remembering good links
//
// This file (mod.rs) is the module root - it ties everything together and
// exports the public API that other parts of our application can use.
// =============================================================================

mod extract;
mod http;
mod rules;
mod validate;

#[cfg(test)]
mod testing;

pub use extract::{collect_links, href_links, walk, LinkOccurrence};
pub use http::{
    check_link, fetchable, Fetch, HttpFetcher, HttpReply, LinkStatus, TransportError,
    UnreachableReason, DEFAULT_MAX_REDIRECTS,
};
pub use rules::{classify, LocalVerdict, RejectReason};
pub use validate::{Failure, RunSummary, Validator};
