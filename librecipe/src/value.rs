//! Manifest tree representation.

use indexmap::IndexMap;
use num_bigint::BigInt;
use std::fmt;

/// Ordered mapping of keys to nodes. Insertion order is declaration order.
pub type Mapping = IndexMap<String, ManifestNode>;

/// A leaf value in a manifest tree.
#[derive(Clone, PartialEq)]
pub enum Scalar {
    /// Null value (YAML `~` or an empty value).
    Null,
    /// Boolean value.
    Bool(bool),
    /// Arbitrary-precision integer.
    Integer(BigInt),
    /// 64-bit floating-point number.
    Float(f64),
    /// UTF-8 string.
    String(String),
}

impl Scalar {
    /// Returns a reference to the string if this is a `String`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<&BigInt> {
        match self {
            Scalar::Integer(n) => Some(n),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }
}

impl fmt::Debug for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => write!(f, "null"),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Integer(n) => write!(f, "{}", n),
            Scalar::Float(n) => write!(f, "{:?}", n),
            Scalar::String(s) => write!(f, "{:?}", s),
        }
    }
}

/// A node of a parsed manifest.
///
/// Both the bracket-path dialect and YAML decode into this one shape. A
/// `Sequence` compares equal to a `Mapping` keyed `"0".."n-1"` in order, so
/// `projects[] = x` and `projects[0] = x` and YAML `projects: [x]` are all the
/// same manifest.
#[derive(Clone)]
pub enum ManifestNode {
    Scalar(Scalar),
    Mapping(Mapping),
    Sequence(Vec<ManifestNode>),
}

impl ManifestNode {
    /// An empty mapping, the shape of every manifest root.
    pub fn empty() -> Self {
        ManifestNode::Mapping(Mapping::new())
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self, ManifestNode::Mapping(_))
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, ManifestNode::Sequence(_))
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, ManifestNode::Scalar(_))
    }

    /// Returns a reference to the mapping if this is a `Mapping`.
    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            ManifestNode::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Returns a reference to the items if this is a `Sequence`.
    pub fn as_sequence(&self) -> Option<&Vec<ManifestNode>> {
        match self {
            ManifestNode::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            ManifestNode::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the string if this is a string scalar.
    pub fn as_str(&self) -> Option<&str> {
        self.as_scalar().and_then(Scalar::as_str)
    }

    /// Look up a child by key. Sequences accept decimal indices.
    pub fn get(&self, key: &str) -> Option<&ManifestNode> {
        match self {
            ManifestNode::Mapping(map) => map.get(key),
            ManifestNode::Sequence(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
            ManifestNode::Scalar(_) => None,
        }
    }

    /// Number of children; zero for scalars.
    pub fn len(&self) -> usize {
        match self {
            ManifestNode::Mapping(map) => map.len(),
            ManifestNode::Sequence(items) => items.len(),
            ManifestNode::Scalar(_) => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Whether `map` is the keyed form of a list: keys exactly "0".."n-1", in
/// any order, like mapping equality.
fn list_like_equal(items: &[ManifestNode], map: &Mapping) -> bool {
    items.len() == map.len()
        && items
            .iter()
            .enumerate()
            .all(|(i, item)| map.get(&i.to_string()) == Some(item))
}

impl PartialEq for ManifestNode {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ManifestNode::Scalar(a), ManifestNode::Scalar(b)) => a == b,
            (ManifestNode::Mapping(a), ManifestNode::Mapping(b)) => {
                a.len() == b.len() && a.iter().all(|(k, v)| b.get(k).is_some_and(|bv| v == bv))
            }
            (ManifestNode::Sequence(a), ManifestNode::Sequence(b)) => a == b,
            (ManifestNode::Sequence(items), ManifestNode::Mapping(map))
            | (ManifestNode::Mapping(map), ManifestNode::Sequence(items)) => {
                list_like_equal(items, map)
            }
            _ => false,
        }
    }
}

impl fmt::Debug for ManifestNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManifestNode::Scalar(s) => s.fmt(f),
            ManifestNode::Mapping(map) => f.debug_map().entries(map).finish(),
            ManifestNode::Sequence(items) => f.debug_list().entries(items).finish(),
        }
    }
}

impl From<Scalar> for ManifestNode {
    fn from(s: Scalar) -> Self {
        ManifestNode::Scalar(s)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

impl From<BigInt> for Scalar {
    fn from(n: BigInt) -> Self {
        Scalar::Integer(n)
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Integer(BigInt::from(n))
    }
}

impl From<f64> for Scalar {
    fn from(f: f64) -> Self {
        Scalar::Float(f)
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::String(s)
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::String(s.to_string())
    }
}

impl From<&str> for ManifestNode {
    fn from(s: &str) -> Self {
        ManifestNode::Scalar(Scalar::from(s))
    }
}

impl From<String> for ManifestNode {
    fn from(s: String) -> Self {
        ManifestNode::Scalar(Scalar::String(s))
    }
}

impl From<Vec<ManifestNode>> for ManifestNode {
    fn from(items: Vec<ManifestNode>) -> Self {
        ManifestNode::Sequence(items)
    }
}

impl From<Mapping> for ManifestNode {
    fn from(map: Mapping) -> Self {
        ManifestNode::Mapping(map)
    }
}
