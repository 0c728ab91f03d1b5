// src/checker/extract.rs
// =============================================================================
// This module finds links inside a translation tree.
//
// Two steps:
// 1. walk() visits every translated string in the tree, depth first, and
//    remembers the path of keys/indices that led to it
// 2. href_links() pulls the value out of every href="..." / href='...'
//    attribute in that string
//
// We deliberately use a regex instead of an HTML parser: translated strings
// are fragments like `Read the <a href="...">guide</a>`, not documents.
// =============================================================================

use regex::Regex;
use std::sync::OnceLock;

use crate::catalog::{NodePath, PathSegment, TranslationNode};

// The closing quote is not required to match the opening one, so
// href="...' is accepted too. Real catalogs contain such typos and the
// link inside is still worth checking.
const HREF_PATTERN: &str = r#"href=["']([^"']+)["']"#;

fn href_regex() -> &'static Regex {
    static HREF: OnceLock<Regex> = OnceLock::new();
    HREF.get_or_init(|| Regex::new(HREF_PATTERN).expect("HREF_PATTERN is a valid regex"))
}

/// A link found in the tree, together with where it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkOccurrence {
    pub path: NodePath,
    pub link: String,
}

/// Visits every leaf string under `node`, calling `visit` with its path.
///
/// `path` is the path of `node` itself; it is extended while descending and
/// restored before returning.
pub fn walk<F>(node: &TranslationNode, path: &mut NodePath, visit: &mut F)
where
    F: FnMut(&NodePath, &str),
{
    match node {
        TranslationNode::Sequence(items) => {
            for (index, item) in items.iter().enumerate() {
                path.push(PathSegment::Index(index));
                walk(item, path, visit);
                path.pop();
            }
        }
        TranslationNode::Mapping(entries) => {
            for (key, value) in entries {
                path.push(PathSegment::Key(key.clone()));
                walk(value, path, visit);
                path.pop();
            }
        }
        TranslationNode::Leaf(text) => visit(path, text),
        TranslationNode::Empty => {}
    }
}

/// All link candidates in one translated string, in order of appearance.
///
/// Example:
///   `See <a href="https://example.com">this</a> or <a href='/help'>help</a>`
///   -> ["https://example.com", "/help"]
pub fn href_links(text: &str) -> Vec<String> {
    href_regex()
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Every link in the tree, in traversal order, duplicates included.
pub fn collect_links(tree: &TranslationNode) -> Vec<LinkOccurrence> {
    let mut occurrences = Vec::new();
    let mut path = NodePath::new();

    walk(tree, &mut path, &mut |path, text| {
        for link in href_links(text) {
            occurrences.push(LinkOccurrence {
                path: path.clone(),
                link,
            });
        }
    });

    occurrences
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why does walk() take `&mut NodePath` instead of building new paths?
//    - We push a segment before descending and pop it after
//    - Only leaves that contain links ever need their own copy (clone)
//
// 2. What is OnceLock?
//    - A value that is initialised the first time it is used
//    - The regex is compiled once, not once per translated string
// -----------------------------------------------------------------------------
