use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Fully qualified name of a native declaration.
///
/// Primary key of the entity catalog. Template arguments are part of the
/// simple name, so `::` inside angle brackets never splits a segment.
///
/// # Examples
///
/// ```
/// use bindsurface_core::QualifiedName;
///
/// let point = QualifiedName::global("point");
/// assert_eq!(point.to_string(), "point");
///
/// let inst = QualifiedName::from_qualified_string("Faunus::interaction<Faunus::pot_coulomb>");
/// assert_eq!(inst.simple_name(), "interaction<Faunus::pot_coulomb>");
/// assert_eq!(inst.namespace_string(), "Faunus");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedName {
    /// Enclosing path (namespaces and classes), outermost first.
    pub namespace: Vec<String>,
    /// Simple name, including any template argument list.
    pub name: String,
}

impl QualifiedName {
    /// Create a new qualified name with an enclosing path.
    pub fn new(name: impl Into<String>, namespace: Vec<String>) -> Self {
        Self {
            name: name.into(),
            namespace,
        }
    }

    /// Create a qualified name at the top level.
    pub fn global(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: Vec::new(),
        }
    }

    /// Create from a qualified string (e.g. "Faunus::point").
    ///
    /// Splits on "::" outside template brackets; the last segment is the name.
    /// A leading "::" is normalized: "::Faunus::point" == "Faunus::point".
    pub fn from_qualified_string(s: &str) -> Self {
        let mut parts = split_segments(s);
        match parts.pop() {
            None => Self::global(""),
            Some(name) => Self {
                name,
                namespace: parts,
            },
        }
    }

    /// Check if this is a top-level name.
    pub fn is_global(&self) -> bool {
        self.namespace.is_empty()
    }

    /// Get the simple (unqualified) name.
    pub fn simple_name(&self) -> &str {
        &self.name
    }

    /// Get the enclosing path.
    pub fn namespace_path(&self) -> &[String] {
        &self.namespace
    }

    /// Get the enclosing path as a joined string.
    pub fn namespace_string(&self) -> String {
        self.namespace.join("::")
    }

    /// Create a child name within this scope.
    ///
    /// Example: `Faunus::box` + `len` = `Faunus::box::len`
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut child_ns = self.namespace.clone();
        child_ns.push(self.name.clone());
        Self {
            name: name.into(),
            namespace: child_ns,
        }
    }

    /// Get the enclosing scope as a QualifiedName (if any).
    pub fn parent(&self) -> Option<Self> {
        let (name, namespace) = self.namespace.split_last()?;
        Some(Self {
            name: name.clone(),
            namespace: namespace.to_vec(),
        })
    }
}

/// Split on `::` at template-bracket depth zero, dropping empty segments.
fn split_segments(s: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    let bytes = s.as_bytes();
    let mut i = 0usize;
    while i < bytes.len() {
        match bytes[i] {
            b'<' => depth += 1,
            b'>' => depth = depth.saturating_sub(1),
            b':' if depth == 0 && bytes.get(i + 1) == Some(&b':') => {
                parts.push(&s[start..i]);
                i += 2;
                start = i;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    parts.push(&s[start..]);
    parts
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}::{}", self.namespace.join("::"), self.name)
        }
    }
}

impl From<&str> for QualifiedName {
    fn from(s: &str) -> Self {
        Self::from_qualified_string(s)
    }
}

impl From<String> for QualifiedName {
    fn from(s: String) -> Self {
        Self::from_qualified_string(&s)
    }
}

impl Serialize for QualifiedName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for QualifiedName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from_qualified_string(&s))
    }
}
