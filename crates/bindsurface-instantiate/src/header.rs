//! Forced-instantiation header generation.
//!
//! The generated fragment has three parts:
//!
//! ```text
//! #include <a.h>                       one line per header, caller's order
//! #include <b.h>
//!
//! namespace bindsurface { namespace aliases {
//!
//!     typedef Box<int> IntBox;         one alias per request
//!
//!     inline void instantiate() {
//!         (void) sizeof(Box<int>);      one probe per request
//!     }
//!
//! } }
//! ```
//!
//! `sizeof` needs a complete type, so every probe makes the front end
//! instantiate the template with all its members even if nothing else
//! names the alias.

use bindsurface_core::ConfigurationError;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::InstantiationTable;
use crate::request::is_identifier;

/// How `#include` directives are spelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncludeStyle {
    /// `#include <path>`
    #[default]
    Angle,
    /// `#include "path"`
    Quoted,
}

/// How alias declarations are spelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AliasStyle {
    /// `typedef T alias;`, understood by pre-C++11 front ends.
    #[default]
    Typedef,
    /// `using alias = T;`
    Using,
}

/// Layout options for the generated header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HeaderOptions {
    /// Nested namespace enclosing the aliases and the probe function.
    pub namespace: Vec<String>,
    /// Name of the function holding the probes.
    pub probe_fn: String,
    pub include_style: IncludeStyle,
    pub alias_style: AliasStyle,
}

impl Default for HeaderOptions {
    fn default() -> Self {
        Self {
            namespace: vec!["bindsurface".to_string(), "aliases".to_string()],
            probe_fn: "instantiate".to_string(),
            include_style: IncludeStyle::Angle,
            alias_style: AliasStyle::Typedef,
        }
    }
}

impl HeaderOptions {
    fn validate(&self) -> Result<(), ConfigurationError> {
        if let Some(bad) = self.namespace.iter().find(|s| !is_identifier(s)) {
            return Err(ConfigurationError::InvalidIdentifier {
                what: "namespace",
                value: bad.clone(),
            });
        }
        if !is_identifier(&self.probe_fn) {
            return Err(ConfigurationError::InvalidIdentifier {
                what: "probe function",
                value: self.probe_fn.clone(),
            });
        }
        Ok(())
    }
}

/// Generates the header handed to the introspection front end.
#[derive(Debug, Clone, Default)]
pub struct HeaderGenerator {
    options: HeaderOptions,
}

impl HeaderGenerator {
    pub fn new(options: HeaderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &HeaderOptions {
        &self.options
    }

    /// Check `table` against these options without generating anything.
    ///
    /// Aliases share a scope with the probe function and sit inside the
    /// namespace segments, so none of them may reuse those names.
    pub fn check(&self, table: &InstantiationTable) -> Result<(), ConfigurationError> {
        table.validate()?;
        self.options.validate()?;
        for alias in table.aliases() {
            if alias == self.options.probe_fn {
                return Err(ConfigurationError::AliasCollision {
                    alias: alias.to_string(),
                    what: "probe function",
                });
            }
            if self.options.namespace.iter().any(|ns| ns == alias) {
                return Err(ConfigurationError::AliasCollision {
                    alias: alias.to_string(),
                    what: "namespace",
                });
            }
        }
        Ok(())
    }

    /// Produce the header fragment. Performs no I/O.
    ///
    /// The table and options are checked before anything is emitted, so a
    /// configuration error never yields partial output.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn generate<S: AsRef<str>>(
        &self,
        header_paths: &[S],
        table: &InstantiationTable,
    ) -> Result<String, ConfigurationError> {
        self.check(table)?;

        let mut out = String::new();
        for path in header_paths {
            let path = path.as_ref();
            out.push_str(&match self.options.include_style {
                IncludeStyle::Angle => format!("#include <{path}>\n"),
                IncludeStyle::Quoted => format!("#include \"{path}\"\n"),
            });
        }

        if !table.is_empty() {
            if !out.is_empty() {
                out.push('\n');
            }
            self.push_probe_block(&mut out, table);
        }

        debug!(
            headers = header_paths.len(),
            instantiations = table.len(),
            bytes = out.len(),
            "generated instantiation header"
        );
        Ok(out)
    }

    fn push_probe_block(&self, out: &mut String, table: &InstantiationTable) {
        let namespace = &self.options.namespace;
        if !namespace.is_empty() {
            let open: Vec<String> = namespace.iter().map(|ns| format!("namespace {ns} {{")).collect();
            out.push_str(&open.join(" "));
            out.push_str("\n\n");
        }

        for row in table {
            let ty = row.type_expr();
            out.push_str(&match self.options.alias_style {
                AliasStyle::Typedef => format!("    typedef {ty} {};\n", row.alias),
                AliasStyle::Using => format!("    using {} = {ty};\n", row.alias),
            });
        }

        out.push_str(&format!("\n    inline void {}() {{\n", self.options.probe_fn));
        for row in table {
            out.push_str(&format!("        (void) sizeof({});\n", row.type_expr()));
        }
        out.push_str("    }\n");

        if !namespace.is_empty() {
            out.push('\n');
            out.push_str(&vec!["}"; namespace.len()].join(" "));
            out.push('\n');
        }
    }
}

/// Generate a header with the default layout.
pub fn generate<S: AsRef<str>>(
    header_paths: &[S],
    table: &InstantiationTable,
) -> Result<String, ConfigurationError> {
    HeaderGenerator::default().generate(header_paths, table)
}
