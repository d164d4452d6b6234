//! Entity types discovered by the introspection front end.

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::{Access, QualifiedName};

/// Index of an entity within its catalog.
///
/// Ids are dense and assigned in insertion order, so they double as
/// positions in the catalog's entity sequence.
///
/// # Example
///
/// ```
/// use bindsurface_core::EntityId;
///
/// let id = EntityId::new(3);
/// assert_eq!(id.index(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u32);

impl EntityId {
    /// Create an id from a raw index.
    #[inline]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Get the underlying index.
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }

    #[inline]
    pub(crate) fn slot(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity_{}", self.0)
    }
}

impl From<u32> for EntityId {
    fn from(index: u32) -> Self {
        Self::new(index)
    }
}

/// Kind of a discovered declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Class,
    Function,
    Method,
    Field,
    Namespace,
    Other,
}

impl EntityKind {
    /// Whether this kind is a class member that carries an access specifier.
    pub fn is_member(self) -> bool {
        matches!(self, EntityKind::Method | EntityKind::Field)
    }

    /// The singleton set for this kind.
    pub fn as_set(self) -> KindSet {
        match self {
            EntityKind::Class => KindSet::CLASS,
            EntityKind::Function => KindSet::FUNCTION,
            EntityKind::Method => KindSet::METHOD,
            EntityKind::Field => KindSet::FIELD,
            EntityKind::Namespace => KindSet::NAMESPACE,
            EntityKind::Other => KindSet::OTHER,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EntityKind::Class => "class",
            EntityKind::Function => "function",
            EntityKind::Method => "method",
            EntityKind::Field => "field",
            EntityKind::Namespace => "namespace",
            EntityKind::Other => "other",
        };
        f.write_str(s)
    }
}

bitflags! {
    /// A set of entity kinds, used by rules that only apply to some kinds.
    ///
    /// ```rust
    /// use bindsurface_core::{EntityKind, KindSet};
    ///
    /// assert!(KindSet::MEMBERS.contains(EntityKind::Field.as_set()));
    /// assert!(!KindSet::MEMBERS.contains(EntityKind::Class.as_set()));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct KindSet: u8 {
        const CLASS = 1 << 0;
        const FUNCTION = 1 << 1;
        const METHOD = 1 << 2;
        const FIELD = 1 << 3;
        const NAMESPACE = 1 << 4;
        const OTHER = 1 << 5;

        /// Class members subject to access-level rules.
        const MEMBERS = Self::METHOD.bits() | Self::FIELD.bits();
    }
}

impl KindSet {
    /// Check whether `kind` is in this set.
    #[inline]
    pub fn has(self, kind: EntityKind) -> bool {
        self.contains(kind.as_set())
    }
}

/// One declaration discovered by the front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    /// Catalog-unique name.
    pub qualified_name: QualifiedName,
    pub kind: EntityKind,
    pub access: Access,
    /// Parent entity, if any. A back reference only; the catalog owns all entities.
    pub enclosing_scope: Option<EntityId>,
}

impl Entity {
    /// Whether this entity is a class member subject to access rules.
    pub fn is_member(&self) -> bool {
        self.kind.is_member()
    }
}
