//! Entity catalog model for the bindsurface binding compiler.
//!
//! The introspection front end reports every declaration it finds as an
//! [`Entity`]; a pass collects them into an immutable [`Catalog`] that the
//! visibility resolver reads.
//!
//! - [`QualifiedName`] - catalog key, template-aware `::` splitting
//! - [`Access`], [`EntityKind`], [`KindSet`] - static entity attributes
//! - [`Catalog`], [`CatalogBuilder`] - indexed entity storage
//! - [`ConfigurationError`], [`CatalogError`], [`ParseError`] - error taxonomy

mod access;
mod catalog;
mod entity;
mod error;
mod qualified_name;
mod span;

pub use access::Access;
pub use catalog::{Catalog, CatalogBuilder};
pub use entity::{Entity, EntityId, EntityKind, KindSet};
pub use error::{CatalogError, ConfigurationError, ParseError};
pub use qualified_name::QualifiedName;
pub use span::{SourceLocation, Span};
