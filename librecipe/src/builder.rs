//! Phase 3: Tree building
//!
//! Splits bracketed keys into path segments and inserts decoded values into
//! the manifest tree. An empty segment (`[]`) stands for the next index of
//! its container. Intermediate containers are created on demand; a fresh one
//! is a sequence when the segment below it is `[]` or `[0]`, and a mapping
//! otherwise.
//!
//! At the last segment a later value always wins, even over a subtree built
//! by earlier lines. That overwrite is reported through `tracing`, never as an
//! error.

use crate::error::ParseContext;
use crate::value::{ManifestNode, Mapping, Scalar};

/// Split a key expression into path segments.
///
/// `foo[bar][baz]` gives `["foo", "bar", "baz"]`, `foo[]` gives `["foo", ""]`.
pub fn split_key(key: &str) -> Vec<&str> {
    let key = key.strip_suffix(']').unwrap_or(key);
    let pieces: Vec<&str> = key.split('[').collect();
    let last = pieces.len() - 1;
    pieces
        .into_iter()
        .enumerate()
        .map(|(i, piece)| {
            if i < last {
                piece.strip_suffix(']').unwrap_or(piece)
            } else {
                piece
            }
        })
        .collect()
}

/// Accumulates assignments into a manifest tree.
pub struct TreeBuilder<'c> {
    root: ManifestNode,
    ctx: &'c ParseContext,
}

impl<'c> TreeBuilder<'c> {
    pub fn new(ctx: &'c ParseContext) -> Self {
        Self {
            root: ManifestNode::empty(),
            ctx,
        }
    }

    /// Store `value` at `path`. `line_num` is only used for diagnostics.
    pub fn insert(&mut self, path: &[&str], value: Scalar, line_num: usize) {
        let Some((last, parents)) = path.split_last() else {
            return;
        };

        let mut node = &mut self.root;
        for (i, segment) in parents.iter().enumerate() {
            let below = path[i + 1];
            let slot = child_slot(node, segment);
            if slot.is_scalar() {
                *slot = new_container(below);
            }
            node = slot;
        }

        let slot = child_slot(node, last);
        let previous = std::mem::replace(slot, ManifestNode::Scalar(value));
        if !previous.is_scalar() {
            tracing::warn!(
                "{} overwrites a nested {} with {} entries{}",
                path.join("/"),
                if previous.is_sequence() { "sequence" } else { "mapping" },
                previous.len(),
                self.ctx.loc_suffix(line_num, 0),
            );
        }
    }

    /// Finish building and hand the tree to the caller.
    pub fn finish(self) -> ManifestNode {
        self.root
    }
}

/// Create the container that will hold `below` as its first segment.
fn new_container(below: &str) -> ManifestNode {
    if below.is_empty() || below == "0" {
        ManifestNode::Sequence(Vec::new())
    } else {
        ManifestNode::empty()
    }
}

/// The sequence position a segment addresses, if it can stay a sequence.
fn sequence_index(len: usize, segment: &str) -> Option<usize> {
    if segment.is_empty() {
        return Some(len);
    }
    let index: usize = segment.parse().ok()?;
    // "01" or "+1" would not survive as keys, so they force a mapping
    if index.to_string() != segment || index > len {
        return None;
    }
    Some(index)
}

fn sequence_to_mapping(items: Vec<ManifestNode>) -> Mapping {
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| (i.to_string(), item))
        .collect()
}

/// Find or create the child of `node` named by `segment`.
///
/// Missing children are created as null placeholders for the caller to fill.
/// A sequence the segment cannot index, or a scalar, becomes a mapping first.
fn child_slot<'n>(node: &'n mut ManifestNode, segment: &str) -> &'n mut ManifestNode {
    let indexable = matches!(
        node,
        ManifestNode::Sequence(items) if sequence_index(items.len(), segment).is_some()
    );
    if !indexable && !matches!(node, ManifestNode::Mapping(_)) {
        let mapping = match std::mem::replace(node, ManifestNode::empty()) {
            ManifestNode::Sequence(items) => sequence_to_mapping(items),
            _ => Mapping::new(),
        };
        *node = ManifestNode::Mapping(mapping);
    }
    match node {
        ManifestNode::Mapping(map) => {
            let key = if segment.is_empty() {
                map.len().to_string()
            } else {
                segment.to_string()
            };
            map.entry(key).or_insert(ManifestNode::Scalar(Scalar::Null))
        }
        ManifestNode::Sequence(items) => {
            let len = items.len();
            let index = sequence_index(len, segment).unwrap_or(len);
            if index == len {
                items.push(ManifestNode::Scalar(Scalar::Null));
            }
            &mut items[index]
        }
        _ => unreachable!("non-container was converted to a mapping above"),
    }
}
