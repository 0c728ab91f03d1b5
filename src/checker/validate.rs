// src/checker/validate.rs
// =============================================================================
// This module ties extraction and checking together for a whole run.
//
// The Validator owns the "seen" set: every link that has been checked and
// found okay. Once a link is in there, later occurrences of it (in the same
// locale or any other) are skipped without a request.
//
// Links that fail are never added to the set, so every place a bad link
// appears gets its own failure record. Fixing a broken link in one file and
// forgetting the copy in another is exactly what we want to catch.
//
// Per locale we:
// 1. collect every link occurrence in traversal order
// 2. check each distinct link that isn't in the seen set yet, up to
//    `concurrency` of them at the same time
// 3. walk the occurrences in order and apply the results
// =============================================================================

use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

use super::extract::collect_links;
use super::http::{check_link, Fetch, LinkStatus};
use crate::catalog::{CatalogError, LocaleCatalog, NodePath, TranslationNode};
use crate::config::CheckConfig;

/// One occurrence of a link that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    /// The locale whose tree contained the link
    pub locale: String,
    /// Where in that tree, e.g. `home.footer.0`
    pub path: NodePath,
    /// The link exactly as written in the translation
    pub link: String,
    /// Why it failed
    #[serde(flatten)]
    pub status: LinkStatus,
}

/// Totals for a whole run, for the summary line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub locales: usize,
    pub occurrences: usize,
    pub validated: usize,
    pub failures: Vec<Failure>,
}

pub struct Validator<F> {
    fetcher: F,
    seen: HashSet<String>,
    max_redirects: usize,
    concurrency: usize,
}

impl<F: Fetch> Validator<F> {
    pub fn new(fetcher: F, config: &CheckConfig) -> Self {
        Self {
            fetcher,
            seen: HashSet::new(),
            max_redirects: config.max_redirects,
            concurrency: config.concurrency.max(1),
        }
    }

    /// Links validated so far in this run
    pub fn seen(&self) -> &HashSet<String> {
        &self.seen
    }

    /// Checks one occurrence of `link`, found at `path` in `locale`.
    ///
    /// Already-validated links are skipped. A link that passes is remembered;
    /// one that fails is returned as a Failure and not remembered.
    pub async fn validate_link_occurrence(
        &mut self,
        locale: &str,
        link: &str,
        path: &NodePath,
    ) -> Option<Failure> {
        if self.seen.contains(link) {
            return None;
        }
        let status = check_link(&self.fetcher, link, self.max_redirects).await;
        self.record(locale, link, path, status)
    }

    /// Validates every link in one locale's tree.
    pub async fn validate_locale(&mut self, locale: &str, tree: &TranslationNode) -> Vec<Failure> {
        self.validate_locale_counted(locale, tree).await.1
    }

    // Same as validate_locale, also returning how many occurrences were found
    async fn validate_locale_counted(
        &mut self,
        locale: &str,
        tree: &TranslationNode,
    ) -> (usize, Vec<Failure>) {
        let occurrences = collect_links(tree);

        // Distinct links that still need a verdict, in first-seen order
        let mut queued = HashSet::new();
        let pending: Vec<String> = occurrences
            .iter()
            .filter(|o| !self.seen.contains(&o.link) && queued.insert(o.link.as_str()))
            .map(|o| o.link.clone())
            .collect();

        debug!(
            locale,
            occurrences = occurrences.len(),
            pending = pending.len(),
            "checking links"
        );

        let fetcher = &self.fetcher;
        let max_redirects = self.max_redirects;
        let verdicts: HashMap<String, LinkStatus> = stream::iter(pending)
            .map(|link| async move {
                let status = check_link(fetcher, &link, max_redirects).await;
                (link, status)
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let mut failures = Vec::new();
        for occurrence in &occurrences {
            if self.seen.contains(&occurrence.link) {
                continue;
            }
            let Some(status) = verdicts.get(&occurrence.link) else {
                continue;
            };
            if let Some(failure) =
                self.record(locale, &occurrence.link, &occurrence.path, status.clone())
            {
                failures.push(failure);
            }
        }

        (occurrences.len(), failures)
    }

    /// Validates the given locales of `catalog`, in order.
    ///
    /// Only catalog errors are returned as Err; link problems end up in the
    /// summary's failures.
    pub async fn validate_catalog<C: LocaleCatalog + ?Sized>(
        &mut self,
        catalog: &C,
        locales: &[String],
    ) -> Result<RunSummary, CatalogError> {
        let mut summary = RunSummary::default();

        for locale in locales {
            let tree = catalog.load(locale)?;
            let (occurrences, failures) = self.validate_locale_counted(locale, &tree).await;
            info!(
                %locale,
                occurrences,
                failures = failures.len(),
                "locale checked"
            );

            summary.locales += 1;
            summary.occurrences += occurrences;
            summary.failures.extend(failures);
        }

        summary.validated = self.seen.len();
        Ok(summary)
    }

    fn record(
        &mut self,
        locale: &str,
        link: &str,
        path: &NodePath,
        status: LinkStatus,
    ) -> Option<Failure> {
        if status.is_ok() {
            self.seen.insert(link.to_string());
            None
        } else {
            debug!(locale, %path, link, %status, "link failed");
            Some(Failure {
                locale: locale.to_string(),
                path: path.clone(),
                link: link.to_string(),
                status,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{MemoryCatalog, PathSegment};
    use crate::checker::http::{HttpReply, UnreachableReason};
    use crate::checker::rules::RejectReason;
    use crate::checker::testing::ScriptedFetcher;

    fn page(body: &str) -> TranslationNode {
        TranslationNode::Mapping(vec![(
            "page".to_string(),
            TranslationNode::Leaf(body.to_string()),
        )])
    }

    fn anchor(url: &str) -> String {
        format!(r#"<a href="{}">link</a>"#, url)
    }

    fn validator(fetcher: ScriptedFetcher) -> Validator<ScriptedFetcher> {
        Validator::new(fetcher, &CheckConfig::default())
    }

    #[tokio::test]
    async fn test_reachable_link_is_remembered() {
        let url = "https://example.com/page";
        let mut v = validator(ScriptedFetcher::new().reply(url, HttpReply::new(200)));

        let failures = v.validate_locale("en", &page(&anchor(url))).await;

        assert!(failures.is_empty());
        assert!(v.seen().contains(url));
    }

    #[tokio::test]
    async fn test_redirect_then_ok_is_success() {
        let fetcher = ScriptedFetcher::new()
            .reply(
                "https://example.com/old",
                HttpReply::redirect(301, "https://example.com/new"),
            )
            .reply("https://example.com/new", HttpReply::new(200));
        let mut v = validator(fetcher);

        let failures = v
            .validate_locale("en", &page(&anchor("https://example.com/old")))
            .await;

        assert!(failures.is_empty());
        assert!(v.seen().contains("https://example.com/old"));
    }

    #[tokio::test]
    async fn test_wrong_scheme_rejected_without_request() {
        let mut v = validator(ScriptedFetcher::new());

        let failures = v.validate_locale("en", &page(&anchor("ftp://bad.example"))).await;

        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].link, "ftp://bad.example");
        assert_eq!(failures[0].path.to_string(), "page");
        assert_eq!(
            failures[0].status,
            LinkStatus::Rejected {
                reason: RejectReason::UnsupportedScheme
            }
        );
        assert!(v.fetcher.calls().is_empty());
        assert!(v.seen().is_empty());
    }

    #[tokio::test]
    async fn test_link_with_space_rejected() {
        let mut v = validator(ScriptedFetcher::new());
        let failures = v
            .validate_locale("en", &page(&anchor("https://example.com/a b")))
            .await;
        assert_eq!(failures.len(), 1);
        assert!(matches!(failures[0].status, LinkStatus::Rejected { .. }));
        assert!(v.fetcher.calls().is_empty());
    }

    #[tokio::test]
    async fn test_self_redirect_reported_once() {
        let url = "https://example.com/loop";
        let mut v = validator(ScriptedFetcher::new().reply(url, HttpReply::redirect(302, url)));

        let failures = v.validate_locale("en", &page(&anchor(url))).await;

        assert_eq!(failures.len(), 1);
        assert_eq!(
            failures[0].status,
            LinkStatus::Unreachable {
                reason: UnreachableReason::TooManyRedirects
            }
        );
        assert_eq!(v.fetcher.call_count(url), 10);
    }

    #[tokio::test]
    async fn test_successful_duplicate_is_checked_once() {
        let url = "https://example.com/page";
        let mut catalog = MemoryCatalog::new();
        let tree = TranslationNode::Mapping(vec![
            ("a".to_string(), TranslationNode::Leaf(anchor(url))),
            ("b".to_string(), TranslationNode::Leaf(anchor(url))),
        ]);
        catalog.insert("en", tree.clone());
        catalog.insert("fr", tree);
        let mut v = validator(ScriptedFetcher::new().reply(url, HttpReply::new(200)));

        let summary = v
            .validate_catalog(&catalog, &["en".to_string(), "fr".to_string()])
            .await
            .unwrap();

        assert!(summary.failures.is_empty());
        assert_eq!(summary.locales, 2);
        assert_eq!(summary.occurrences, 4);
        assert_eq!(summary.validated, 1);
        assert_eq!(v.fetcher.call_count(url), 1);
    }

    #[tokio::test]
    async fn test_failing_duplicate_is_reported_every_time() {
        let url = "https://example.com/missing";
        let mut catalog = MemoryCatalog::new();
        catalog.insert("en", page(&anchor(url)));
        catalog.insert(
            "fr",
            TranslationNode::Sequence(vec![
                TranslationNode::Leaf(anchor(url)),
                TranslationNode::Leaf(anchor(url)),
            ]),
        );
        let mut v = validator(ScriptedFetcher::new());

        let summary = v
            .validate_catalog(&catalog, &["en".to_string(), "fr".to_string()])
            .await
            .unwrap();

        let places: Vec<(String, String)> = summary
            .failures
            .iter()
            .map(|f| (f.locale.clone(), f.path.to_string()))
            .collect();
        assert_eq!(
            places,
            vec![
                ("en".to_string(), "page".to_string()),
                ("fr".to_string(), "0".to_string()),
                ("fr".to_string(), "1".to_string()),
            ]
        );
        assert!(v.seen().is_empty());
    }

    #[tokio::test]
    async fn test_occurrence_api_skips_seen_links() {
        let url = "https://example.com/page";
        let mut v = validator(ScriptedFetcher::new().reply(url, HttpReply::new(200)));
        let mut path = NodePath::new();
        path.push(PathSegment::Key("x".to_string()));

        assert_eq!(v.validate_link_occurrence("en", url, &path).await, None);
        assert_eq!(v.validate_link_occurrence("fr", url, &path).await, None);
        assert_eq!(v.fetcher.call_count(url), 1);

        let failure = v
            .validate_link_occurrence("en", "https://example.com/404", &path)
            .await
            .unwrap();
        assert_eq!(failure.path.to_string(), "x");
        assert!(v
            .validate_link_occurrence("en", "https://example.com/404", &path)
            .await
            .is_some());
        assert_eq!(v.fetcher.call_count("https://example.com/404"), 2);
    }

    #[tokio::test]
    async fn test_exempt_links_make_no_request() {
        let body = [
            anchor("mailto:hi@example.com"),
            anchor("/relative"),
            anchor("#anchor"),
            anchor("%{terms_url}"),
        ]
        .join(" ");
        let mut v = validator(ScriptedFetcher::new());

        assert!(v.validate_locale("en", &page(&body)).await.is_empty());
        assert!(v.fetcher.calls().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_locale_is_an_error() {
        let catalog = MemoryCatalog::new();
        let mut v = validator(ScriptedFetcher::new());
        assert!(matches!(
            v.validate_catalog(&catalog, &["xx".to_string()]).await,
            Err(CatalogError::UnknownLocale(_))
        ));
    }
}
