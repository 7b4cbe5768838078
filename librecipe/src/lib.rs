//! Build recipe parser.
//!
//! A recipe describes what a site build should fetch and assemble. It comes
//! in one of two surface syntaxes that decode into the same tree of ordered
//! mappings, sequences and scalars ([`ManifestNode`]):
//!
//! - the bracket-path `.make` dialect, `projects[views][version] = 3.8`;
//! - YAML, `projects: {views: {version: "3.8"}}`.
//!
//! # Parsing Pipeline
//!
//! The bracket-path parser operates in three phases:
//!
//! 1. **Scanner**: Matches each line against the assignment pattern, skipping
//!    comments and lines of any other shape.
//!
//! 2. **Value Decoder**: Strips quotes and backslash escapes, and resolves
//!    bare words against an injected [`Constants`] table.
//!
//! 3. **Tree Builder**: Splits `a[b][]` keys into paths and inserts each value,
//!    synthesizing indices for `[]`.
//!
//! YAML goes through `serde_yaml` and is converted node by node.

mod builder;
mod decode;
mod encode;
mod error;
mod format;
mod make;
mod scanner;
mod value;
mod yaml;

pub use decode::{Constants, NoConstants};
pub use encode::{encode, Format};
pub use error::{EncodeError, ParseError, Result};
pub use format::{ManifestFormat, ManifestParser};
pub use make::MakeParser;
pub use value::{ManifestNode, Mapping, Scalar};
pub use yaml::YamlParser;

/// Parse a bracket-path recipe. Never fails; see [`MakeParser`].
///
/// # Example
///
/// ```
/// use librecipe::parse_make;
///
/// let tree = parse_make("projects[] = drupal");
/// assert_eq!(tree.get("projects").unwrap().len(), 1);
/// ```
pub fn parse_make(input: &str) -> ManifestNode {
    MakeParser::new().parse_with_filename(input, None)
}

/// Parse a bracket-path recipe, resolving bare words against `constants`.
pub fn parse_make_with_constants<C: Constants>(input: &str, constants: C) -> ManifestNode {
    MakeParser::with_constants(constants).parse_with_filename(input, None)
}

/// Parse a YAML recipe.
pub fn parse_yaml(input: &str) -> Result<ManifestNode> {
    YamlParser.parse_with_filename(input, None)
}

/// Parse a YAML recipe with a filename for error messages.
pub fn parse_yaml_with_filename(input: &str, filename: Option<&str>) -> Result<ManifestNode> {
    YamlParser.parse_with_filename(input, filename)
}

/// Parse a recipe in an already chosen format.
pub fn parse_with_format<C: Constants>(
    format: ManifestFormat,
    input: &str,
    filename: Option<&str>,
    constants: C,
) -> Result<ManifestNode> {
    match format {
        ManifestFormat::Make => {
            Ok(MakeParser::with_constants(constants).parse_with_filename(input, filename))
        }
        ManifestFormat::Yaml => YamlParser.parse_with_filename(input, filename),
    }
}
