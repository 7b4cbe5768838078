//! The contract shared by recipe parsers, and a minimal dispatcher.

use crate::error::{ParseError, Result};
use crate::make::MakeParser;
use crate::value::ManifestNode;
use crate::yaml::YamlParser;
use std::path::Path;

/// A recipe parser for one surface syntax.
pub trait ManifestParser {
    /// Whether this parser handles `path`. Looks at the path string only.
    fn supported_file(&self, path: &str) -> bool;

    /// Parse recipe text into a tree whose root is a mapping.
    fn parse(&self, input: &str) -> Result<ManifestNode>;
}

/// Whether the final extension of `path` is one of `extensions`.
pub(crate) fn has_extension(path: &str, extensions: &[&str]) -> bool {
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.contains(&ext))
}

/// The recipe syntaxes this crate reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    /// Bracket-path `.make` dialect.
    Make,
    /// YAML recipe, also used for stdin.
    Yaml,
}

impl ManifestFormat {
    /// Pick the format whose parser accepts `path`, make first.
    pub fn detect(path: &str) -> Option<Self> {
        if MakeParser::new().supported_file(path) {
            Some(ManifestFormat::Make)
        } else if YamlParser.supported_file(path) {
            Some(ManifestFormat::Yaml)
        } else {
            None
        }
    }

    /// Like [`ManifestFormat::detect`], but an unknown path is an error.
    pub fn for_path(path: &str) -> Result<Self> {
        Self::detect(path).ok_or_else(|| ParseError::UnsupportedFormat(path.to_string()))
    }

    /// Parse from a format name such as `make`, `yaml` or `yml`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "make" => Some(ManifestFormat::Make),
            "yaml" | "yml" => Some(ManifestFormat::Yaml),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ManifestFormat::Make => "make",
            ManifestFormat::Yaml => "yaml",
        }
    }
}
