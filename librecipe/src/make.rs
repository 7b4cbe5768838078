//! Bracket-path (`.make`) recipe parser.

use crate::builder::{split_key, TreeBuilder};
use crate::decode::{decode_value, Constants, NoConstants};
use crate::error::{ParseContext, Result};
use crate::format::{has_extension, ManifestParser};
use crate::scanner::scan;
use crate::value::ManifestNode;

/// Parser for the INI-like `key[sub][sub] = value` dialect.
///
/// Parsing never fails: lines that are not assignments are skipped, and an
/// input without any assignment gives an empty root mapping.
#[derive(Debug, Clone, Default)]
pub struct MakeParser<C = NoConstants> {
    constants: C,
}

impl MakeParser {
    pub fn new() -> Self {
        Self {
            constants: NoConstants,
        }
    }
}

impl<C: Constants> MakeParser<C> {
    /// A parser that resolves bare words against `constants`.
    pub fn with_constants(constants: C) -> Self {
        Self { constants }
    }

    pub fn constants(&self) -> &C {
        &self.constants
    }

    /// Parse with a filename used in diagnostics.
    pub fn parse_with_filename(&self, input: &str, filename: Option<&str>) -> ManifestNode {
        let ctx = ParseContext::new(filename);
        build_tree(input, &self.constants, &ctx)
    }
}

impl<C: Constants> ManifestParser for MakeParser<C> {
    fn supported_file(&self, path: &str) -> bool {
        has_extension(path, &["make"])
    }

    fn parse(&self, input: &str) -> Result<ManifestNode> {
        Ok(self.parse_with_filename(input, None))
    }
}

/// Scan, decode and build in one pass over the assignments.
fn build_tree<C: Constants + ?Sized>(
    input: &str,
    constants: &C,
    ctx: &ParseContext,
) -> ManifestNode {
    let assignments = scan(input);
    let mut builder = TreeBuilder::new(ctx);

    for assignment in &assignments {
        let path = split_key(assignment.key);
        let value = decode_value(assignment.value, constants);
        builder.insert(&path, value, assignment.line);
    }

    let tree = builder.finish();
    tracing::debug!(
        assignments = assignments.len(),
        entries = tree.len(),
        "parsed make recipe{}",
        ctx.file_suffix()
    );
    tree
}
