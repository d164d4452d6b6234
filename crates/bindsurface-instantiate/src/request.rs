//! Instantiation request table.
//!
//! The table is an ordered sequence of rows rather than a map keyed by
//! template name, so iteration order is the operator's order and a repeated
//! alias is caught by [`InstantiationTable::validate`] instead of silently
//! replacing an earlier row.

use bindsurface_core::ConfigurationError;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// A request to materialize `generic_name<argument_list...>` under `alias`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstantiationRequest {
    pub generic_name: String,
    pub argument_list: Vec<String>,
    pub alias: String,
}

impl InstantiationRequest {
    pub fn new<I, S>(generic_name: impl Into<String>, argument_list: I, alias: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            generic_name: generic_name.into(),
            argument_list: argument_list.into_iter().map(Into::into).collect(),
            alias: alias.into(),
        }
    }

    /// Spell the instantiated type, e.g. `Box<int>`.
    ///
    /// A space separates a trailing `>` in the last argument from the closing
    /// bracket so that pre-C++11 front ends do not lex `>>`.
    pub fn type_expr(&self) -> String {
        let args = self
            .argument_list
            .iter()
            .map(|a| a.trim())
            .collect::<Vec<_>>()
            .join(", ");
        let pad = if args.ends_with('>') { " " } else { "" };
        format!("{}<{}{}>", self.generic_name.trim(), args, pad)
    }
}

/// Ordered, read-only set of instantiation requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstantiationTable {
    rows: Vec<InstantiationRequest>,
}

impl InstantiationTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a `template -> [(arguments, alias)]` mapping.
    ///
    /// Groups and the rows inside them keep the order they are given in.
    ///
    /// # Example
    ///
    /// ```
    /// use bindsurface_instantiate::InstantiationTable;
    ///
    /// let table = InstantiationTable::from_groups([(
    ///     "Faunus::interaction",
    ///     vec![
    ///         (vec!["Faunus::pot_coulomb"], "interaction_coulomb"),
    ///         (vec!["Faunus::pot_hscoulomb"], "interaction_hscoulomb"),
    ///     ],
    /// )]);
    /// assert_eq!(table.len(), 2);
    /// assert!(table.validate().is_ok());
    /// ```
    pub fn from_groups<G, N, R, A, S, L>(groups: G) -> Self
    where
        G: IntoIterator<Item = (N, R)>,
        N: Into<String>,
        R: IntoIterator<Item = (A, L)>,
        A: IntoIterator<Item = S>,
        S: Into<String>,
        L: Into<String>,
    {
        let mut rows = Vec::new();
        for (generic, instances) in groups {
            let generic = generic.into();
            for (args, alias) in instances {
                rows.push(InstantiationRequest::new(generic.clone(), args, alias));
            }
        }
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate rows in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, InstantiationRequest> {
        self.rows.iter()
    }

    /// All aliases, in insertion order.
    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r.alias.as_str())
    }

    /// Check the table before it is used to generate anything.
    ///
    /// Rows are checked in order and the first problem is reported.
    ///
    /// # Errors
    ///
    /// - [`ConfigurationError::MissingGeneric`] for a row without a template name
    /// - [`ConfigurationError::EmptyArgumentList`] for a row without arguments
    /// - [`ConfigurationError::BlankArgument`] for a blank argument among real ones
    /// - [`ConfigurationError::InvalidAlias`] for an alias that is not an identifier
    /// - [`ConfigurationError::DuplicateAlias`] when an alias repeats
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let mut seen: FxHashMap<&str, &str> = FxHashMap::default();
        for row in &self.rows {
            if row.generic_name.trim().is_empty() {
                return Err(ConfigurationError::MissingGeneric {
                    alias: row.alias.clone(),
                });
            }
            if row.argument_list.iter().all(|a| a.trim().is_empty()) {
                return Err(ConfigurationError::EmptyArgumentList {
                    generic: row.generic_name.clone(),
                    alias: row.alias.clone(),
                });
            }
            if let Some(position) = row.argument_list.iter().position(|a| a.trim().is_empty()) {
                return Err(ConfigurationError::BlankArgument {
                    generic: row.generic_name.clone(),
                    alias: row.alias.clone(),
                    position,
                });
            }
            if !is_identifier(&row.alias) {
                return Err(ConfigurationError::InvalidAlias {
                    alias: row.alias.clone(),
                });
            }
            if let Some(first) = seen.insert(row.alias.as_str(), row.generic_name.as_str()) {
                return Err(ConfigurationError::DuplicateAlias {
                    alias: row.alias.clone(),
                    first_generic: first.to_string(),
                    second_generic: row.generic_name.clone(),
                });
            }
        }
        Ok(())
    }
}

impl FromIterator<InstantiationRequest> for InstantiationTable {
    fn from_iter<T: IntoIterator<Item = InstantiationRequest>>(iter: T) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a InstantiationTable {
    type Item = &'a InstantiationRequest;
    type IntoIter = std::slice::Iter<'a, InstantiationRequest>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// C/C++ identifier: `[A-Za-z_][A-Za-z0-9_]*`.
pub(crate) fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_keep_order() {
        let table = InstantiationTable::from_groups([
            ("Zeta", vec![(vec!["int"], "ZInt"), (vec!["float"], "ZFloat")]),
            ("Alpha", vec![(vec!["char"], "AChar")]),
        ]);
        let aliases: Vec<&str> = table.aliases().collect();
        assert_eq!(aliases, vec!["ZInt", "ZFloat", "AChar"]);
    }

    #[test]
    fn duplicate_alias_across_templates() {
        let table: InstantiationTable = [
            InstantiationRequest::new("Box", ["int"], "Shared"),
            InstantiationRequest::new("Crate", ["int"], "Other"),
            InstantiationRequest::new("Crate", ["float"], "Shared"),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            table.validate(),
            Err(ConfigurationError::DuplicateAlias {
                alias: "Shared".into(),
                first_generic: "Box".into(),
                second_generic: "Crate".into(),
            })
        );
    }

    #[test]
    fn empty_argument_list() {
        let table: InstantiationTable = [InstantiationRequest::new(
            "Box",
            Vec::<String>::new(),
            "EmptyBox",
        )]
        .into_iter()
        .collect();
        assert_eq!(
            table.validate(),
            Err(ConfigurationError::EmptyArgumentList {
                generic: "Box".into(),
                alias: "EmptyBox".into(),
            })
        );
    }

    #[test]
    fn blank_argument_among_real_ones() {
        let table: InstantiationTable = [InstantiationRequest::new("Box", ["int", " "], "IntBox")]
            .into_iter()
            .collect();
        assert_eq!(
            table.validate(),
            Err(ConfigurationError::BlankArgument {
                generic: "Box".into(),
                alias: "IntBox".into(),
                position: 1,
            })
        );
    }

    #[test]
    fn template_name_required() {
        let table: InstantiationTable = [
            InstantiationRequest::new("Box", ["int"], "IntBox"),
            InstantiationRequest::new("", ["int"], "X"),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            table.validate(),
            Err(ConfigurationError::MissingGeneric { alias: "X".into() })
        );
    }

    #[test]
    fn alias_must_be_identifier() {
        let table: InstantiationTable = [InstantiationRequest::new("Box", ["int"], "int box")]
            .into_iter()
            .collect();
        assert!(matches!(
            table.validate(),
            Err(ConfigurationError::InvalidAlias { .. })
        ));
        assert!(is_identifier("_x9"));
        assert!(!is_identifier("9x"));
        assert!(!is_identifier(""));
    }

    #[test]
    fn type_expr_spacing() {
        let simple = InstantiationRequest::new("Box", ["int"], "IntBox");
        assert_eq!(simple.type_expr(), "Box<int>");

        let pair = InstantiationRequest::new("std::map", ["std::string", " int "], "Dict");
        assert_eq!(pair.type_expr(), "std::map<std::string, int>");

        let nested = InstantiationRequest::new("Box", ["std::vector<int>"], "VecBox");
        assert_eq!(nested.type_expr(), "Box<std::vector<int> >");
    }

    #[test]
    fn same_type_under_two_aliases_is_allowed() {
        let table: InstantiationTable = [
            InstantiationRequest::new("Box", ["int"], "IntBox"),
            InstantiationRequest::new("Box", ["int"], "Counter"),
        ]
        .into_iter()
        .collect();
        assert!(table.validate().is_ok());
    }
}
