//! Encode manifest trees to recipe and interchange formats.

use crate::error::EncodeError;
use crate::value::{ManifestNode, Scalar};
use crate::yaml;

/// Output format for encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Bracket-path `.make` lines
    Make,
    /// YAML recipe
    Yaml,
    /// JSON (pretty-printed)
    Json,
}

impl Format {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "make" => Some(Format::Make),
            "yaml" | "yml" => Some(Format::Yaml),
            "json" => Some(Format::Json),
            _ => None,
        }
    }

    /// File extension for output written next to the input.
    pub fn extension(self) -> &'static str {
        match self {
            Format::Make => "make",
            Format::Yaml => "make.yml",
            Format::Json => "json",
        }
    }
}

/// Encode a manifest tree to a string in the specified format.
pub fn encode(node: &ManifestNode, format: Format) -> Result<String, EncodeError> {
    match format {
        Format::Make => encode_make(node),
        Format::Yaml => yaml::encode(node),
        Format::Json => Ok(encode_json(node, 0)),
    }
}

// =============================================================================
// Make Encoder
// =============================================================================

fn encode_make(node: &ManifestNode) -> Result<String, EncodeError> {
    let map = node.as_mapping().ok_or(EncodeError::RootNotMapping)?;

    let mut blocks = Vec::new();
    for (key, value) in map {
        check_key(key)?;
        let mut lines = Vec::new();
        encode_make_entry(key.clone(), value, &mut lines)?;
        if !lines.is_empty() {
            blocks.push(lines.join("\n"));
        }
    }

    let mut result = blocks.join("\n\n");
    if !result.is_empty() {
        result.push('\n');
    }
    Ok(result)
}

/// Emit every leaf below `node`, prefixing each with `path`.
fn encode_make_entry(
    path: String,
    node: &ManifestNode,
    lines: &mut Vec<String>,
) -> Result<(), EncodeError> {
    match node {
        ManifestNode::Scalar(scalar) => {
            let value = encode_make_scalar(scalar)
                .ok_or_else(|| EncodeError::UnrepresentableValue(path.clone()))?;
            lines.push(format!("{} = {}", path, value));
        }
        ManifestNode::Sequence(items) => {
            for (i, item) in items.iter().enumerate() {
                // `[]` appends, which lands on `i` only for leaves; nested
                // items span several lines and need a stable index.
                let segment = if item.is_scalar() {
                    String::new()
                } else {
                    i.to_string()
                };
                encode_make_entry(format!("{}[{}]", path, segment), item, lines)?;
            }
        }
        ManifestNode::Mapping(map) => {
            for (key, value) in map {
                check_key(key)?;
                encode_make_entry(format!("{}[{}]", path, key), value, lines)?;
            }
        }
    }
    Ok(())
}

fn check_key(key: &str) -> Result<(), EncodeError> {
    let invalid = key.is_empty()
        || key.trim() != key
        || key.contains(|c: char| matches!(c, '[' | ']' | '=' | ';' | '\n' | '\r'))
        || key.starts_with('#');
    if invalid {
        return Err(EncodeError::InvalidKey(key.to_string()));
    }
    Ok(())
}

/// `None` when the value cannot be spelled on a single line.
fn encode_make_scalar(scalar: &Scalar) -> Option<String> {
    match scalar {
        Scalar::Null => Some("\"\"".to_string()),
        Scalar::Bool(b) => Some(b.to_string()),
        Scalar::Integer(n) => Some(n.to_string()),
        Scalar::Float(f) => Some(f.to_string()),
        Scalar::String(s) => encode_make_string(s),
    }
}

/// Plain words go out bare; anything else is double-quoted. The dialect has
/// no line-break escape, so strings containing one are rejected.
fn encode_make_string(s: &str) -> Option<String> {
    if s.contains(|c: char| matches!(c, '\n' | '\r')) {
        return None;
    }
    let plain = !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || "._-/:+@~,".contains(c));
    if plain {
        return Some(s.to_string());
    }

    let mut result = String::from("\"");
    for c in s.chars() {
        match c {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            c => result.push(c),
        }
    }
    result.push('"');
    Some(result)
}

// =============================================================================
// JSON Encoder
// =============================================================================

fn encode_json(node: &ManifestNode, indent: usize) -> String {
    let pad = "  ".repeat(indent);
    let pad1 = "  ".repeat(indent + 1);

    match node {
        ManifestNode::Scalar(scalar) => encode_json_scalar(scalar),
        ManifestNode::Sequence(items) => {
            if items.is_empty() {
                "[]".to_string()
            } else {
                let items: Vec<String> = items
                    .iter()
                    .map(|v| format!("{}{}", pad1, encode_json(v, indent + 1)))
                    .collect();
                format!("[\n{}\n{}]", items.join(",\n"), pad)
            }
        }
        ManifestNode::Mapping(map) => {
            if map.is_empty() {
                "{}".to_string()
            } else {
                let items: Vec<String> = map
                    .iter()
                    .map(|(k, v)| {
                        format!(
                            "{}{}: {}",
                            pad1,
                            encode_json_string(k),
                            encode_json(v, indent + 1)
                        )
                    })
                    .collect();
                format!("{{\n{}\n{}}}", items.join(",\n"), pad)
            }
        }
    }
}

fn encode_json_scalar(scalar: &Scalar) -> String {
    match scalar {
        Scalar::Null => "null".to_string(),
        Scalar::Bool(b) => b.to_string(),
        Scalar::Integer(n) => n.to_string(),
        Scalar::Float(f) => {
            if f.is_nan() || f.is_infinite() {
                "null".to_string() // JSON doesn't support NaN/Infinity
            } else {
                format!("{:?}", f)
            }
        }
        Scalar::String(s) => encode_json_string(s),
    }
}

fn encode_json_string(s: &str) -> String {
    let mut result = String::from("\"");
    for c in s.chars() {
        match c {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            '\x08' => result.push_str("\\b"),
            '\x0c' => result.push_str("\\f"),
            c if c.is_control() => {
                result.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => result.push(c),
        }
    }
    result.push('"');
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::make::MakeParser;
    use crate::ManifestParser;

    fn parse_make(input: &str) -> ManifestNode {
        MakeParser::new().parse(input).unwrap()
    }

    #[test]
    fn test_encode_make_layout() {
        let tree = parse_make(
            "core = 7.x\nprojects[] = drupal\nprojects[] = ctools\nlibraries[jquery][download][type] = get\n",
        );
        let text = encode(&tree, Format::Make).unwrap();
        assert_eq!(
            text,
            "core = 7.x\n\nprojects[] = drupal\nprojects[] = ctools\n\nlibraries[jquery][download][type] = get\n"
        );
    }

    #[test]
    fn test_encode_make_quotes_when_needed() {
        assert_eq!(encode_make_string("3.x").as_deref(), Some("3.x"));
        assert_eq!(encode_make_string("a; b=c").as_deref(), Some("\"a; b=c\""));
        assert_eq!(
            encode_make_string("say \"hi\"").as_deref(),
            Some("\"say \\\"hi\\\"\"")
        );
        assert_eq!(encode_make_string("").as_deref(), Some("\"\""));
    }

    #[test]
    fn test_encode_make_rejects_line_breaks() {
        let tree = crate::parse_yaml("desc: \"line one\\nline two\"\nok: fine\n").unwrap();
        let err = encode(&tree, Format::Make).unwrap_err();
        assert!(matches!(err, EncodeError::UnrepresentableValue(ref p) if p == "desc"));

        let tree = crate::parse_yaml("notes: [\"a\\rb\"]").unwrap();
        let err = encode(&tree, Format::Make).unwrap_err();
        assert!(matches!(err, EncodeError::UnrepresentableValue(ref p) if p == "notes[]"));
    }

    #[test]
    fn test_encode_make_round_trip() {
        let input = concat!(
            "core = 7.x\n",
            "projects[views][version] = 3.8\n",
            "projects[views][patch][] = \"http://example.com/a b.patch\"\n",
            "projects[views][patch][] = 'it\\'s'\n",
            "libraries[][name] = one\n",
            "libraries[][name] = two\n",
            "note = \"semi; colon = here\"\n",
        );
        let tree = parse_make(input);
        let text = encode(&tree, Format::Make).unwrap();
        assert_eq!(parse_make(&text), tree);
    }

    #[test]
    fn test_encode_make_rejects_bracket_key() {
        let mut map = crate::Mapping::new();
        map.insert("a[b]".to_string(), ManifestNode::from("x"));
        let err = encode(&ManifestNode::Mapping(map), Format::Make).unwrap_err();
        assert!(matches!(err, EncodeError::InvalidKey(ref k) if k == "a[b]"));
    }

    #[test]
    fn test_encode_make_needs_mapping_root() {
        let seq = ManifestNode::from(vec![ManifestNode::from("x")]);
        assert!(matches!(encode(&seq, Format::Make), Err(EncodeError::RootNotMapping)));
    }

    #[test]
    fn test_encode_json() {
        let tree = parse_make("core = 7.x\nprojects[] = \"a\\\"b\"\n");
        let text = encode(&tree, Format::Json).unwrap();
        assert_eq!(
            text,
            "{\n  \"core\": \"7.x\",\n  \"projects\": [\n    \"a\\\"b\"\n  ]\n}"
        );
    }

    #[test]
    fn test_encode_json_scalars() {
        assert_eq!(encode_json_scalar(&Scalar::Float(f64::NAN)), "null");
        assert_eq!(encode_json_scalar(&Scalar::Float(1.0)), "1.0");
        assert_eq!(encode_json_scalar(&Scalar::from(7)), "7");
        assert_eq!(encode_json_scalar(&Scalar::Null), "null");
    }
}
