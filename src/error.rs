//! Top-level error type for a binding pass.
//!
//! ```text
//! BindError
//! ├── Configuration - invalid table, policy or header options (before parsing)
//! ├── ConfigFile    - unreadable YAML configuration
//! ├── Catalog       - inconsistent catalog handed back by a front end
//! ├── Parse         - front-end failure, surfaced unchanged
//! ├── Emit          - emission backend failure
//! └── Io            - reading or writing a file the driver owns
//! ```

use std::io;
use std::path::PathBuf;

use bindsurface_core::{CatalogError, ConfigurationError, ParseError};
use thiserror::Error;

use crate::emit::EmitError;

pub type Result<T> = std::result::Result<T, BindError>;

/// Any error that aborts a pass.
#[derive(Debug, Error)]
pub enum BindError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("invalid configuration file: {0}")]
    ConfigFile(#[from] serde_yaml::Error),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Emit(#[from] EmitError),

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl BindError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        BindError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the operator's configuration is at fault.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            BindError::Configuration(_) | BindError::ConfigFile(_)
        )
    }

    /// Whether the introspection front end failed.
    pub fn is_parse(&self) -> bool {
        matches!(self, BindError::Parse(_) | BindError::Catalog(_))
    }
}
