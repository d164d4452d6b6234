//! Policy rules and the name targets they match.

use std::fmt;

use bindsurface_core::{Access, ConfigurationError, QualifiedName};
use regex::Regex;

/// A glob over qualified names.
///
/// `*` matches any run of characters (including `::`), `?` matches exactly
/// one character. Everything else is literal, so template brackets need no
/// escaping: `Faunus::interaction<*>`.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    /// Compile a glob.
    pub fn new(glob: &str) -> Result<Self, ConfigurationError> {
        let mut re = String::with_capacity(glob.len() + 8);
        re.push('^');
        let mut buf = [0u8; 4];
        for ch in glob.chars() {
            match ch {
                '*' => re.push_str(".*"),
                '?' => re.push('.'),
                other => re.push_str(&regex::escape(other.encode_utf8(&mut buf))),
            }
        }
        re.push('$');
        let regex = Regex::new(&re).map_err(|e| ConfigurationError::InvalidPattern {
            pattern: glob.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            source: glob.to_string(),
            regex,
        })
    }

    /// The glob as written.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, qualified_name: &str) -> bool {
        self.regex.is_match(qualified_name)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for Pattern {}

/// What an include or exclude rule names.
///
/// Exact names are never resolved through enclosing namespaces: `point`
/// names only a top-level `point`, not `Faunus::point`. Likewise `*::point`
/// needs at least one namespace segment, so it misses a top-level `point`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// One entity, by exact qualified name.
    Exact(QualifiedName),
    /// Every entity whose qualified name matches the glob.
    Pattern(Pattern),
}

impl Target {
    /// Parse a target: strings containing `*` or `?` are globs, everything
    /// else is an exact qualified name.
    pub fn parse(s: &str) -> Result<Self, ConfigurationError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ConfigurationError::Invalid("empty rule target".to_string()));
        }
        if s.contains(['*', '?']) {
            Pattern::new(s).map(Target::Pattern)
        } else {
            Ok(Target::Exact(QualifiedName::from_qualified_string(s)))
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Exact(name) => write!(f, "`{name}`"),
            Target::Pattern(p) => write!(f, "`{}`", p.as_str()),
        }
    }
}

impl From<QualifiedName> for Target {
    fn from(name: QualifiedName) -> Self {
        Target::Exact(name)
    }
}

/// One step of an exposure policy.
///
/// Rules are evaluated in sequence order and the last rule matching an
/// entity decides it. Including a class also includes everything declared
/// inside it, which later rules may hide again.
///
/// [`PolicyRule::ExcludeAccess`] is usually meant to be unconditional, so it
/// is conventionally the last rule of a policy. The resolver never reorders
/// rules: an include placed after it re-exposes what it hid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyRule {
    /// Hide every entity. Always the first rule; later occurrences reset everything.
    DefaultDenyAll,
    /// Expose the target, and the members of any class it names.
    Include(Target),
    /// Hide the target, and the members of any class it names.
    Exclude(Target),
    /// Hide every method and field with this access level.
    ExcludeAccess(Access),
}

impl PolicyRule {
    /// Include by name or glob.
    pub fn include(target: &str) -> Result<Self, ConfigurationError> {
        Target::parse(target).map(PolicyRule::Include)
    }

    /// Exclude by name or glob.
    pub fn exclude(target: &str) -> Result<Self, ConfigurationError> {
        Target::parse(target).map(PolicyRule::Exclude)
    }

    /// The decision this rule gives to the entities it matches.
    pub fn exposes(&self) -> bool {
        matches!(self, PolicyRule::Include(_))
    }
}

impl fmt::Display for PolicyRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyRule::DefaultDenyAll => write!(f, "default deny"),
            PolicyRule::Include(t) => write!(f, "include {t}"),
            PolicyRule::Exclude(t) => write!(f, "exclude {t}"),
            PolicyRule::ExcludeAccess(a) => write!(f, "exclude {a} members"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glob_matching() {
        let p = Pattern::new("Faunus::pot_*").unwrap();
        assert!(p.is_match("Faunus::pot_coulomb"));
        assert!(p.is_match("Faunus::pot_lj"));
        assert!(!p.is_match("Faunus::point"));
        assert!(!p.is_match("Other::Faunus::pot_lj"));

        let any_ns = Pattern::new("*::point").unwrap();
        assert!(any_ns.is_match("Faunus::point"));
        assert!(any_ns.is_match("a::b::point"));
        assert!(!any_ns.is_match("point"));

        let one = Pattern::new("random?").unwrap();
        assert!(one.is_match("randomX"));
        assert!(!one.is_match("random"));
    }

    #[test]
    fn glob_escapes_regex_syntax() {
        let p = Pattern::new("Faunus::interaction<*>").unwrap();
        assert!(p.is_match("Faunus::interaction<Faunus::pot_coulomb>"));
        let dots = Pattern::new("a.b*").unwrap();
        assert!(dots.is_match("a.bc"));
        assert!(!dots.is_match("axbc"));
    }

    #[test]
    fn target_parse() {
        assert_eq!(
            Target::parse("Faunus::point").unwrap(),
            Target::Exact(QualifiedName::from("Faunus::point"))
        );
        assert!(matches!(
            Target::parse("Faunus::*").unwrap(),
            Target::Pattern(_)
        ));
        assert!(Target::parse("  ").is_err());
    }

    #[test]
    fn rule_display() {
        assert_eq!(PolicyRule::DefaultDenyAll.to_string(), "default deny");
        assert_eq!(
            PolicyRule::include("Foo").unwrap().to_string(),
            "include `Foo`"
        );
        assert_eq!(
            PolicyRule::ExcludeAccess(Access::Private).to_string(),
            "exclude private members"
        );
    }

    #[test]
    fn only_includes_expose() {
        assert!(PolicyRule::include("Foo").unwrap().exposes());
        assert!(!PolicyRule::exclude("Foo").unwrap().exposes());
        assert!(!PolicyRule::ExcludeAccess(Access::Protected).exposes());
        assert!(!PolicyRule::DefaultDenyAll.exposes());
    }
}
