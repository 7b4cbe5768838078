//! YAML recipes: convert between YAML text and manifest trees.
//!
//! Mapping from YAML to manifest nodes:
//!   - YAML null          -> Scalar::Null
//!   - YAML bool          -> Scalar::Bool
//!   - YAML integer       -> Scalar::Integer (BigInt)
//!   - YAML float         -> Scalar::Float
//!   - YAML string        -> Scalar::String
//!   - YAML sequence      -> Sequence
//!   - YAML mapping       -> Mapping (keys stringified, order kept)
//!   - YAML tagged value  -> the untagged inner value
//!
//! An empty document is an empty manifest. Any other non-mapping root is an
//! error.

use crate::error::{EncodeError, ParseContext, ParseError, Result};
use crate::format::{has_extension, ManifestParser};
use crate::value::{ManifestNode, Mapping, Scalar};
use num_bigint::BigInt;
use num_traits::ToPrimitive;

/// Parser for YAML recipes. Also the parser for stdin (`-`).
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlParser;

impl YamlParser {
    /// Parse with a filename used in error messages.
    pub fn parse_with_filename(&self, input: &str, filename: Option<&str>) -> Result<ManifestNode> {
        let ctx = ParseContext::new(filename);
        decode(input, &ctx)
    }
}

impl ManifestParser for YamlParser {
    fn supported_file(&self, path: &str) -> bool {
        path == "-" || has_extension(path, &["yml", "yaml"])
    }

    fn parse(&self, input: &str) -> Result<ManifestNode> {
        self.parse_with_filename(input, None)
    }
}

/// Decode YAML text into a manifest tree with a mapping root.
fn decode(input: &str, ctx: &ParseContext) -> Result<ManifestNode> {
    let yaml_value: serde_yaml::Value =
        serde_yaml::from_str(input).map_err(|e| ParseError::from_yaml(&e, ctx))?;

    let root = match yaml_value {
        serde_yaml::Value::Null => ManifestNode::empty(),
        value => yaml_to_node(&value, ctx)?,
    };
    if !root.is_mapping() {
        return Err(ParseError::RootNotMapping(kind_name(&root), ctx.file_suffix()));
    }

    tracing::debug!(entries = root.len(), "parsed YAML recipe{}", ctx.file_suffix());
    Ok(root)
}

fn kind_name(node: &ManifestNode) -> &'static str {
    match node {
        ManifestNode::Scalar(_) => "a scalar",
        ManifestNode::Sequence(_) => "a sequence",
        ManifestNode::Mapping(_) => "a mapping",
    }
}

fn yaml_to_node(yaml: &serde_yaml::Value, ctx: &ParseContext) -> Result<ManifestNode> {
    match yaml {
        serde_yaml::Value::Sequence(seq) => {
            let items: Result<Vec<ManifestNode>> =
                seq.iter().map(|v| yaml_to_node(v, ctx)).collect();
            Ok(ManifestNode::Sequence(items?))
        }
        serde_yaml::Value::Mapping(map) => {
            let mut mapping = Mapping::with_capacity(map.len());
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    serde_yaml::Value::Null => "null".to_string(),
                    serde_yaml::Value::Sequence(_) => {
                        return Err(ParseError::UnsupportedKey("sequence", ctx.file_suffix()))
                    }
                    serde_yaml::Value::Mapping(_) => {
                        return Err(ParseError::UnsupportedKey("mapping", ctx.file_suffix()))
                    }
                    serde_yaml::Value::Tagged(_) => {
                        return Err(ParseError::UnsupportedKey("tagged", ctx.file_suffix()))
                    }
                };
                mapping.insert(key, yaml_to_node(v, ctx)?);
            }
            Ok(ManifestNode::Mapping(mapping))
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_node(&tagged.value, ctx),
        scalar => Ok(ManifestNode::Scalar(yaml_to_scalar(scalar))),
    }
}

fn yaml_to_scalar(yaml: &serde_yaml::Value) -> Scalar {
    match yaml {
        serde_yaml::Value::Bool(b) => Scalar::Bool(*b),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Scalar::Integer(BigInt::from(i))
            } else if let Some(u) = n.as_u64() {
                Scalar::Integer(BigInt::from(u))
            } else {
                // serde_yaml numbers are always one of i64, u64 or f64
                Scalar::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        serde_yaml::Value::String(s) => Scalar::String(s.clone()),
        _ => Scalar::Null,
    }
}

/// Encode a manifest tree as YAML text, keeping mapping order.
pub fn encode(node: &ManifestNode) -> std::result::Result<String, EncodeError> {
    serde_yaml::to_string(&node_to_yaml(node)).map_err(|e| EncodeError::Yaml(e.to_string()))
}

fn node_to_yaml(node: &ManifestNode) -> serde_yaml::Value {
    match node {
        ManifestNode::Scalar(scalar) => scalar_to_yaml(scalar),
        ManifestNode::Sequence(items) => {
            serde_yaml::Value::Sequence(items.iter().map(node_to_yaml).collect())
        }
        ManifestNode::Mapping(map) => {
            let mut mapping = serde_yaml::Mapping::new();
            for (k, v) in map {
                mapping.insert(serde_yaml::Value::String(k.clone()), node_to_yaml(v));
            }
            serde_yaml::Value::Mapping(mapping)
        }
    }
}

fn scalar_to_yaml(scalar: &Scalar) -> serde_yaml::Value {
    match scalar {
        Scalar::Null => serde_yaml::Value::Null,
        Scalar::Bool(b) => serde_yaml::Value::Bool(*b),
        Scalar::Integer(n) => {
            if let Some(i) = n.to_i64() {
                serde_yaml::Value::Number(serde_yaml::Number::from(i))
            } else if let Some(u) = n.to_u64() {
                serde_yaml::Value::Number(serde_yaml::Number::from(u))
            } else {
                // YAML doesn't have native arbitrary-precision integers
                serde_yaml::Value::String(n.to_string())
            }
        }
        Scalar::Float(f) => serde_yaml::Value::Number(serde_yaml::Number::from(*f)),
        Scalar::String(s) => serde_yaml::Value::String(s.clone()),
    }
}
