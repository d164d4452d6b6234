//! Declarative binding-surface compiler.
//!
//! A pass takes a [`BindConfig`], generates the instantiation header, hands
//! it to an [`Introspector`], resolves the exposure policy against the
//! returned catalog and passes the exposed surface to an [`Emitter`].

pub mod config;
pub mod driver;
pub mod emit;
pub mod error;
pub mod introspect;

pub use config::BindConfig;
pub use driver::{Driver, PassReport};
pub use emit::{Artifact, EmitError, Emitter, ExposedSurface, ManifestEmitter};
pub use error::{BindError, Result};
pub use introspect::{CatalogDumpIntrospector, Introspector, ParseRequest};

pub mod prelude {
    pub use crate::config::*;
    pub use crate::driver::*;
    pub use crate::emit::*;
    pub use crate::error::{BindError, Result};
    pub use crate::introspect::*;
    pub use bindsurface_core::{
        Access, Catalog, CatalogBuilder, Entity, EntityId, EntityKind, ParseError, QualifiedName,
    };
    pub use bindsurface_instantiate::{HeaderGenerator, InstantiationRequest, InstantiationTable};
    pub use bindsurface_policy::{Decision, Policy, PolicyRule, Resolution, Target, resolve};
}
