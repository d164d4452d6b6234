//! Exposure policy and visibility resolution.
//!
//! A [`Policy`] is an ordered list of [`PolicyRule`]s starting with a
//! default deny. [`resolve`] applies it to a catalog and returns a
//! [`Resolution`]: one [`Decision`] per entity, with the index of the rule
//! that made it.
//!
//! ```
//! use bindsurface_core::{Access, Catalog, EntityKind};
//! use bindsurface_policy::{Policy, PolicyRule, resolve};
//!
//! let mut catalog = Catalog::builder();
//! let foo = catalog.add("Foo", EntityKind::Class, Access::NotApplicable, None)?;
//! catalog.add_member(foo, "baz", EntityKind::Field, Access::Private)?;
//! let catalog = catalog.build();
//!
//! let mut policy = Policy::new();
//! policy
//!     .push(PolicyRule::include("Foo")?)
//!     .push(PolicyRule::ExcludeAccess(Access::Private));
//!
//! let resolution = resolve(&catalog, &policy);
//! assert!(resolution.is_exposed(&"Foo".into()));
//! assert!(!resolution.is_exposed(&"Foo::baz".into()));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod policy;
mod resolve;
mod rule;

pub use policy::Policy;
pub use resolve::{Decision, Resolution, resolve};
pub use rule::{Pattern, PolicyRule, Target};
