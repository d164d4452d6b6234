//! Template instantiation support.
//!
//! Introspection front ends only report the members of templates that are
//! actually instantiated. This crate turns an operator's list of requested
//! specializations into a header that forces each one:
//!
//! - [`InstantiationTable`] - ordered, validated request rows
//! - [`HeaderGenerator`] - emits includes, aliases and `sizeof` probes

mod header;
mod request;

pub use header::{AliasStyle, HeaderGenerator, HeaderOptions, IncludeStyle, generate};
pub use request::{InstantiationRequest, InstantiationTable};
