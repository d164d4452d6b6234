//! Access levels for native declarations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Access level of a declaration.
///
/// Class members carry one of the three C++ access specifiers; free functions
/// and namespaces carry `NotApplicable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    #[default]
    Public,
    Protected,
    Private,
    NotApplicable,
}

impl Access {
    /// Whether this is a concrete access specifier.
    pub fn is_specifier(self) -> bool {
        !matches!(self, Access::NotApplicable)
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Access::Public => write!(f, "public"),
            Access::Protected => write!(f, "protected"),
            Access::Private => write!(f, "private"),
            Access::NotApplicable => write!(f, "n/a"),
        }
    }
}

impl FromStr for Access {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(Access::Public),
            "protected" => Ok(Access::Protected),
            "private" => Ok(Access::Private),
            "not_applicable" | "n/a" => Ok(Access::NotApplicable),
            other => Err(format!("unknown access level '{other}'")),
        }
    }
}
