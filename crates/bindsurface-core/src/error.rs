//! Error types shared by every phase of a binding pass.
//!
//! ## Error Hierarchy
//!
//! ```text
//! ConfigurationError - invalid instantiation table, policy or header options
//! CatalogError       - inconsistent entity catalog
//! ParseError         - failure reported by the introspection front end
//! ```
//!
//! All of them are fatal to a pass. Resolution itself has no error type.

use thiserror::Error;

use crate::SourceLocation;

// ============================================================================
// Configuration Errors
// ============================================================================

/// Errors in operator-supplied configuration, detected before any parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// Two instantiation requests share an alias.
    #[error(
        "duplicate alias '{alias}': requested for '{first_generic}' and again for '{second_generic}'"
    )]
    DuplicateAlias {
        alias: String,
        first_generic: String,
        second_generic: String,
    },

    /// An instantiation request has no template arguments.
    #[error("empty argument list for '{generic}' (alias '{alias}')")]
    EmptyArgumentList { generic: String, alias: String },

    /// One template argument of a request is blank.
    #[error("blank template argument #{position} for '{generic}' (alias '{alias}')")]
    BlankArgument {
        generic: String,
        alias: String,
        position: usize,
    },

    /// An instantiation request names no template.
    #[error("missing template name for alias '{alias}'")]
    MissingGeneric { alias: String },

    /// An alias is declared in the same scope as another header name.
    #[error("alias '{alias}' collides with the {what} of the same name")]
    AliasCollision { alias: String, what: &'static str },

    /// An alias is not a valid identifier.
    #[error("invalid alias '{alias}': must be an identifier")]
    InvalidAlias { alias: String },

    /// A header option is not a valid identifier.
    #[error("invalid {what} '{value}': must be an identifier")]
    InvalidIdentifier { what: &'static str, value: String },

    /// A policy does not start with the default rule.
    #[error("policy must start with a default-deny rule")]
    MissingDefaultRule,

    /// A name pattern could not be compiled.
    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Explicit rules were mixed with the conventional expose/hide lists.
    #[error("explicit 'rules' cannot be combined with {0}")]
    ConflictingPolicy(&'static str),

    /// Any other malformed configuration value.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

// ============================================================================
// Catalog Errors
// ============================================================================

/// Errors raised while assembling an entity catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// Two entities share a qualified name.
    #[error("duplicate entity: {0}")]
    DuplicateEntity(String),

    /// An entity refers to a scope that is not in the catalog.
    #[error("entity '{entity}' refers to unknown scope '{scope}'")]
    UnknownScope { entity: String, scope: String },

    /// The access level does not fit the entity kind or its scope.
    #[error("entity '{entity}': {reason}")]
    InvalidAccess { entity: String, reason: String },
}

// ============================================================================
// Parse Errors
// ============================================================================

/// A failure reported by the introspection front end.
///
/// Front ends are deterministic, so a parse error is never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}{message}", .location.as_ref().map(|l| format!("{l}: ")).unwrap_or_default())]
pub struct ParseError {
    /// Where the front end failed, when it can tell.
    pub location: Option<SourceLocation>,
    pub message: String,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            location: None,
            message: message.into(),
        }
    }

    pub fn at(location: SourceLocation, message: impl Into<String>) -> Self {
        Self {
            location: Some(location),
            message: message.into(),
        }
    }
}

impl From<CatalogError> for ParseError {
    fn from(err: CatalogError) -> Self {
        Self::new(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Span;

    #[test]
    fn duplicate_alias_display() {
        let err = ConfigurationError::DuplicateAlias {
            alias: "IntBox".into(),
            first_generic: "Box".into(),
            second_generic: "Crate".into(),
        };
        assert_eq!(
            err.to_string(),
            "duplicate alias 'IntBox': requested for 'Box' and again for 'Crate'"
        );
    }

    #[test]
    fn blank_argument_display() {
        let err = ConfigurationError::BlankArgument {
            generic: "Box".into(),
            alias: "IntBox".into(),
            position: 1,
        };
        assert_eq!(
            err.to_string(),
            "blank template argument #1 for 'Box' (alias 'IntBox')"
        );
    }

    #[test]
    fn parse_error_display_with_location() {
        let err = ParseError::at(
            SourceLocation::new("generated.h", Span::new(4, 9, 1)),
            "expected ';'",
        );
        assert_eq!(err.to_string(), "generated.h:4:9: expected ';'");
        assert_eq!(ParseError::new("boom").to_string(), "boom");
    }

    #[test]
    fn catalog_error_converts_to_parse_error() {
        let err: ParseError = CatalogError::DuplicateEntity("Foo".into()).into();
        assert!(err.location.is_none());
        assert_eq!(err.message, "duplicate entity: Foo");
    }
}
