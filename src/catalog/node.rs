// src/catalog/node.rs
// =============================================================================
// The in-memory shape of one locale's translations.
//
// A locale file is a tree: mappings of keys to values, lists of values, and
// plain strings at the leaves. We convert whatever format the file was in
// (YAML or JSON) into one closed enum so the rest of the program only has to
// match on four cases.
// =============================================================================

use std::fmt;

/// One node of a locale's translation tree.
#[derive(Debug, Clone, PartialEq)]
pub enum TranslationNode {
    /// An ordered list of nodes
    Sequence(Vec<TranslationNode>),
    /// Keyed children, in the order they appeared in the file (keys are unique)
    Mapping(Vec<(String, TranslationNode)>),
    /// A translated string
    Leaf(String),
    /// Null, numbers, booleans: nothing to scan
    Empty,
}

impl TranslationNode {
    /// An empty mapping, the starting point when merging several files
    pub fn empty_mapping() -> Self {
        TranslationNode::Mapping(Vec::new())
    }

    /// Looks up a direct child of a mapping by key.
    pub fn get(&self, key: &str) -> Option<&TranslationNode> {
        match self {
            TranslationNode::Mapping(entries) => entries
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v),
            _ => None,
        }
    }

    /// Deep-merges `other` into `self`.
    ///
    /// Two mappings merge key by key (recursively). In every other
    /// combination `other` replaces `self`, so the file loaded last wins.
    pub fn merge(&mut self, other: TranslationNode) {
        match (self, other) {
            (TranslationNode::Mapping(ours), TranslationNode::Mapping(theirs)) => {
                for (key, value) in theirs {
                    match ours.iter_mut().find(|(k, _)| *k == key) {
                        Some((_, existing)) => existing.merge(value),
                        None => ours.push((key, value)),
                    }
                }
            }
            (slot, other) => *slot = other,
        }
    }

    /// If this node is a single-key mapping keyed by `locale`, returns the
    /// child. This is the Rails layout where `en.yml` starts with `en:`.
    pub fn unwrap_locale_root(self, locale: &str) -> TranslationNode {
        match self {
            TranslationNode::Mapping(mut entries)
                if entries.len() == 1 && entries[0].0 == locale =>
            {
                // The guard guarantees exactly one entry
                entries.remove(0).1
            }
            other => other,
        }
    }

    /// Number of leaf strings in the tree
    pub fn leaf_count(&self) -> usize {
        match self {
            TranslationNode::Sequence(items) => items.iter().map(Self::leaf_count).sum(),
            TranslationNode::Mapping(entries) => entries.iter().map(|(_, v)| v.leaf_count()).sum(),
            TranslationNode::Leaf(_) => 1,
            TranslationNode::Empty => 0,
        }
    }
}

impl From<serde_yaml::Value> for TranslationNode {
    fn from(value: serde_yaml::Value) -> Self {
        use serde_yaml::Value;

        match value {
            Value::Sequence(items) => {
                TranslationNode::Sequence(items.into_iter().map(Into::into).collect())
            }
            Value::Mapping(map) => {
                let mut node = TranslationNode::empty_mapping();
                for (key, value) in map {
                    let Some(key) = yaml_key(key) else { continue };
                    node.merge(TranslationNode::Mapping(vec![(key, value.into())]));
                }
                node
            }
            Value::String(s) => TranslationNode::Leaf(s),
            // `!tag value` - the tag carries no meaning for translations
            Value::Tagged(tagged) => tagged.value.into(),
            Value::Null | Value::Bool(_) | Value::Number(_) => TranslationNode::Empty,
        }
    }
}

// YAML allows any scalar as a key (`1:`, `true:`). We keep those under their
// printed form so they still show up in diagnostic paths.
fn yaml_key(key: serde_yaml::Value) -> Option<String> {
    use serde_yaml::Value;

    match key {
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Null => Some("null".to_string()),
        Value::Tagged(tagged) => yaml_key(tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

impl From<serde_json::Value> for TranslationNode {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Array(items) => {
                TranslationNode::Sequence(items.into_iter().map(Into::into).collect())
            }
            Value::Object(map) => {
                TranslationNode::Mapping(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
            Value::String(s) => TranslationNode::Leaf(s),
            Value::Null | Value::Bool(_) | Value::Number(_) => TranslationNode::Empty,
        }
    }
}

/// One step in a path through the tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => f.write_str(key),
            PathSegment::Index(index) => write!(f, "{}", index),
        }
    }
}

/// Where in a tree a leaf was found. Only used for reporting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NodePath(Vec<PathSegment>);

impl NodePath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, segment: PathSegment) {
        self.0.push(segment);
    }

    pub fn pop(&mut self) -> Option<PathSegment> {
        self.0.pop()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Joins the segments with `separator`, e.g. `home.footer.0`
    pub fn join(&self, separator: &str) -> String {
        self.0
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(separator)
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.join("."))
    }
}

impl serde::Serialize for NodePath {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.join("."))
    }
}
