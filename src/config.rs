//! YAML configuration of a binding pass.
//!
//! ```yaml
//! module: faunus
//! include_paths: [../../include]
//! headers: [faunus/faunus.h, faunus/point.h]
//! expose:
//!   classes: ["Faunus::point"]
//!   declarations: ["Faunus::faunus_splash"]
//! hide: []
//! hide_access: [private, protected]
//! instantiations:
//!   - template: Faunus::interaction
//!     instances:
//!       - { args: ["Faunus::pot_coulomb"], alias: interaction_coulomb }
//! output:
//!   header: generated/generated_header.h
//! ```
//!
//! `expose`, `hide` and `hide_access` build the conventional policy, where
//! access exclusions always come last. An explicit `rules` list replaces all
//! three and is used in the order written.

use std::path::{Path, PathBuf};

use bindsurface_core::{Access, ConfigurationError};
use bindsurface_instantiate::{
    HeaderGenerator, HeaderOptions, InstantiationRequest, InstantiationTable,
};
use bindsurface_policy::{Policy, PolicyRule, Target};
use serde::Deserialize;

use crate::{BindError, Result};

fn default_module() -> String {
    "bindings".to_string()
}

/// Conventional default: private and protected members are never exposed.
fn default_hidden_access() -> Vec<Access> {
    vec![Access::Private, Access::Protected]
}

/// Root of the configuration file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BindConfig {
    /// Name of the generated host-language module.
    #[serde(default = "default_module")]
    pub module: String,
    /// Include directories handed to the front end.
    #[serde(default)]
    pub include_paths: Vec<PathBuf>,
    /// Headers seen by the front end, in include order.
    #[serde(default)]
    pub headers: Vec<String>,
    /// Emit header paths as absolute paths (resolved against the config directory).
    #[serde(default)]
    pub absolute_headers: bool,
    #[serde(default)]
    pub expose: ExposeConfig,
    /// Names or globs hidden after the includes.
    #[serde(default)]
    pub hide: Vec<String>,
    /// Access levels hidden last. Defaults to private and protected.
    #[serde(default)]
    pub hide_access: Option<Vec<Access>>,
    /// Explicit ordered rules, replacing `expose`, `hide` and `hide_access`.
    #[serde(default)]
    pub rules: Option<Vec<RuleConfig>>,
    #[serde(default)]
    pub instantiations: Vec<TemplateConfig>,
    #[serde(default)]
    pub header: HeaderOptions,
    #[serde(default)]
    pub output: OutputConfig,
    /// Directory relative paths are resolved against.
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

/// Entities to expose under the conventional policy.
///
/// Targets are fully qualified names (`Faunus::point`) or globs. Short names
/// are not looked up in enclosing namespaces: `point` only matches a
/// top-level `point`, and `*::point` only matches a nested one. Use both to
/// cover either.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExposeConfig {
    /// Classes; each one brings its members along.
    #[serde(default)]
    pub classes: Vec<String>,
    /// Any other declarations (free functions, variables).
    #[serde(default)]
    pub declarations: Vec<String>,
}

/// One explicit rule. Exactly one field must be set.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleConfig {
    #[serde(default)]
    pub default_deny: bool,
    pub include: Option<String>,
    pub exclude: Option<String>,
    pub exclude_access: Option<Access>,
}

impl RuleConfig {
    fn to_rule(&self) -> std::result::Result<PolicyRule, ConfigurationError> {
        let set = usize::from(self.default_deny)
            + usize::from(self.include.is_some())
            + usize::from(self.exclude.is_some())
            + usize::from(self.exclude_access.is_some());
        if set != 1 {
            return Err(ConfigurationError::Invalid(
                "each rule needs exactly one of default_deny, include, exclude, exclude_access"
                    .to_string(),
            ));
        }
        if self.default_deny {
            return Ok(PolicyRule::DefaultDenyAll);
        }
        if let Some(target) = &self.include {
            return Target::parse(target).map(PolicyRule::Include);
        }
        if let Some(target) = &self.exclude {
            return Target::parse(target).map(PolicyRule::Exclude);
        }
        match self.exclude_access {
            Some(access) => Ok(PolicyRule::ExcludeAccess(access)),
            None => Err(ConfigurationError::Invalid("empty rule".to_string())),
        }
    }
}

/// Instantiations requested for one template.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemplateConfig {
    pub template: String,
    pub instances: Vec<InstanceConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InstanceConfig {
    pub args: Vec<String>,
    pub alias: String,
}

/// Files the driver writes.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Where to persist the generated header. Front ends that resolve
    /// includes relative to the header need it on disk.
    pub header: Option<PathBuf>,
    /// Directory for emitted artifacts.
    pub artifacts: Option<PathBuf>,
}

/// Directory of a configuration file. A bare file name has none, so its
/// paths stay relative to the working directory.
fn config_dir(path: &Path) -> Option<PathBuf> {
    path.parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(Path::to_path_buf)
}

impl BindConfig {
    /// Parse a configuration. Relative paths stay relative to the working directory.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: BindConfig = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Load a configuration file. Relative paths are resolved against its directory.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| BindError::io(path, e))?;
        let mut config = Self::from_yaml_str(&text)?;
        config.base_dir = config_dir(path);
        Ok(config)
    }

    /// Resolve a configured path against the configuration's directory.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Build the exposure policy.
    pub fn policy(&self) -> std::result::Result<Policy, ConfigurationError> {
        match &self.rules {
            Some(rules) => {
                if !self.expose.classes.is_empty() || !self.expose.declarations.is_empty() {
                    return Err(ConfigurationError::ConflictingPolicy("'expose'"));
                }
                if !self.hide.is_empty() {
                    return Err(ConfigurationError::ConflictingPolicy("'hide'"));
                }
                if self.hide_access.is_some() {
                    return Err(ConfigurationError::ConflictingPolicy("'hide_access'"));
                }
                let mut parsed = rules
                    .iter()
                    .map(RuleConfig::to_rule)
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                if parsed.first() != Some(&PolicyRule::DefaultDenyAll) {
                    parsed.insert(0, PolicyRule::DefaultDenyAll);
                }
                Policy::from_rules(parsed)
            }
            None => Policy::conventional(
                &self.expose.classes,
                &self.expose.declarations,
                &self.hide,
                self.hide_access.clone().unwrap_or_else(default_hidden_access),
            ),
        }
    }

    /// Build the instantiation table, in file order.
    pub fn instantiation_table(&self) -> InstantiationTable {
        self.instantiations
            .iter()
            .flat_map(|t| {
                t.instances.iter().map(|i| {
                    InstantiationRequest::new(t.template.clone(), i.args.clone(), i.alias.clone())
                })
            })
            .collect()
    }

    /// Header paths as they should appear in include directives.
    pub fn header_paths(&self) -> Result<Vec<String>> {
        if !self.absolute_headers {
            return Ok(self.headers.clone());
        }
        let base = match &self.base_dir {
            Some(base) => base.clone(),
            None => std::env::current_dir().map_err(|e| BindError::io(".", e))?,
        };
        let base = std::path::absolute(&base).map_err(|e| BindError::io(&base, e))?;
        Ok(self
            .headers
            .iter()
            .map(|h| base.join(h).display().to_string())
            .collect())
    }

    /// Include directories, resolved against the configuration's directory.
    pub fn resolved_include_paths(&self) -> Vec<PathBuf> {
        self.include_paths
            .iter()
            .map(|p| self.resolve_path(p))
            .collect()
    }

    /// Check everything that can be checked before the front end runs, and
    /// hand back the policy and table that passed.
    pub fn validate(
        &self,
    ) -> std::result::Result<(Policy, InstantiationTable), ConfigurationError> {
        if self.module.trim().is_empty() {
            return Err(ConfigurationError::Invalid("module name is empty".to_string()));
        }
        let policy = self.policy()?;
        let table = self.instantiation_table();
        HeaderGenerator::new(self.header.clone()).check(&table)?;
        Ok((policy, table))
    }
}
