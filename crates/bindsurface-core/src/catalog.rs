//! Entity catalog - the immutable snapshot of one introspection pass.
//!
//! Uses `petgraph::DiGraph` for the containment hierarchy:
//! - Nodes: one per entity, node index == entity index
//! - Edges: enclosing scope -> member
//!
//! A name index gives O(1) lookup by qualified name.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::{Access, CatalogError, Entity, EntityId, EntityKind, QualifiedName};

/// An ordered, immutable set of entities.
///
/// Built once per pass with [`CatalogBuilder`]; never mutated afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "CatalogDump", into = "CatalogDump")]
pub struct Catalog {
    entities: Vec<Entity>,
    by_name: FxHashMap<QualifiedName, EntityId>,
    scopes: DiGraph<EntityId, ()>,
}

impl Catalog {
    /// Start building a catalog.
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::new()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Get an entity by id.
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id.slot())
    }

    /// Find an entity by qualified name.
    pub fn lookup(&self, name: &QualifiedName) -> Option<EntityId> {
        self.by_name.get(name).copied()
    }

    /// Iterate entities in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.entities
            .iter()
            .enumerate()
            .map(|(i, e)| (EntityId::new(i as u32), e))
    }

    /// Direct members of `scope`, in insertion order.
    pub fn members(&self, scope: EntityId) -> Vec<EntityId> {
        let mut members: Vec<EntityId> = self
            .scopes
            .neighbors(NodeIndex::new(scope.slot()))
            .map(|n| self.scopes[n])
            .collect();
        members.sort_unstable();
        members
    }

    /// All entities enclosed by `scope` at any depth, in insertion order.
    ///
    /// `scope` itself is not included.
    pub fn members_transitive(&self, scope: EntityId) -> Vec<EntityId> {
        if self.get(scope).is_none() {
            return Vec::new();
        }
        let start = NodeIndex::new(scope.slot());
        let mut dfs = Dfs::new(&self.scopes, start);
        let mut members = Vec::new();
        while let Some(node) = dfs.next(&self.scopes) {
            if node != start {
                members.push(self.scopes[node]);
            }
        }
        members.sort_unstable();
        members
    }

    /// Whether `entity` is enclosed (at any depth) by `scope`.
    pub fn is_member_of(&self, entity: EntityId, scope: EntityId) -> bool {
        let mut current = self.get(entity).and_then(|e| e.enclosing_scope);
        while let Some(id) = current {
            if id == scope {
                return true;
            }
            current = self.get(id).and_then(|e| e.enclosing_scope);
        }
        false
    }
}

/// Builder enforcing the catalog invariants as entities are added.
///
/// Parents must be added before their members.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    catalog: Catalog,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::DuplicateEntity`] if the name is already present
    /// - [`CatalogError::UnknownScope`] if `scope` is not a known entity
    /// - [`CatalogError::InvalidAccess`] if `access` does not fit the entity
    pub fn add(
        &mut self,
        qualified_name: impl Into<QualifiedName>,
        kind: EntityKind,
        access: Access,
        scope: Option<EntityId>,
    ) -> Result<EntityId, CatalogError> {
        let qualified_name = qualified_name.into();
        let display = qualified_name.to_string();

        if self.catalog.by_name.contains_key(&qualified_name) {
            return Err(CatalogError::DuplicateEntity(display));
        }

        let scope_kind = match scope {
            Some(id) => match self.catalog.get(id) {
                Some(parent) => Some(parent.kind),
                None => {
                    return Err(CatalogError::UnknownScope {
                        entity: display,
                        scope: id.to_string(),
                    });
                }
            },
            None => None,
        };
        check_access(&display, kind, access, scope_kind)?;

        let id = EntityId::new(self.catalog.entities.len() as u32);
        let node = self.catalog.scopes.add_node(id);
        debug_assert_eq!(node.index(), id.slot());
        if let Some(parent) = scope {
            self.catalog
                .scopes
                .add_edge(NodeIndex::new(parent.slot()), node, ());
        }
        self.catalog.by_name.insert(qualified_name.clone(), id);
        self.catalog.entities.push(Entity {
            qualified_name,
            kind,
            access,
            enclosing_scope: scope,
        });
        Ok(id)
    }

    /// Add a member of `parent`, named relative to it.
    pub fn add_member(
        &mut self,
        parent: EntityId,
        simple_name: impl Into<String>,
        kind: EntityKind,
        access: Access,
    ) -> Result<EntityId, CatalogError> {
        let name = match self.catalog.get(parent) {
            Some(p) => p.qualified_name.child(simple_name),
            None => {
                return Err(CatalogError::UnknownScope {
                    entity: simple_name.into(),
                    scope: parent.to_string(),
                });
            }
        };
        self.add(name, kind, access, Some(parent))
    }

    /// Look up an entity added so far.
    pub fn lookup(&self, name: &QualifiedName) -> Option<EntityId> {
        self.catalog.lookup(name)
    }

    pub fn build(self) -> Catalog {
        self.catalog
    }
}

/// Class members carry an access specifier; nothing else does.
fn check_access(
    entity: &str,
    kind: EntityKind,
    access: Access,
    scope_kind: Option<EntityKind>,
) -> Result<(), CatalogError> {
    let in_class = scope_kind == Some(EntityKind::Class);
    let reason = if kind.is_member() && !in_class {
        Some(format!("a {kind} must be declared inside a class"))
    } else if in_class && !access.is_specifier() {
        Some("class members need a public, protected or private access level".to_string())
    } else if !in_class && access.is_specifier() {
        Some(format!("only class members can be {access}"))
    } else {
        None
    };
    match reason {
        Some(reason) => Err(CatalogError::InvalidAccess {
            entity: entity.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

// ============================================================================
// Serialized form
// ============================================================================

/// One entity in a catalog dump.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct EntityRecord {
    name: QualifiedName,
    kind: EntityKind,
    #[serde(default = "not_applicable")]
    access: Access,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    scope: Option<QualifiedName>,
}

fn not_applicable() -> Access {
    Access::NotApplicable
}

/// Catalog dump as exported by a front end: scopes are referenced by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CatalogDump {
    entities: Vec<EntityRecord>,
}

impl TryFrom<CatalogDump> for Catalog {
    type Error = CatalogError;

    fn try_from(dump: CatalogDump) -> Result<Self, Self::Error> {
        let mut builder = CatalogBuilder::new();
        for record in dump.entities {
            let scope = match &record.scope {
                Some(scope) => match builder.lookup(scope) {
                    Some(id) => Some(id),
                    None => {
                        return Err(CatalogError::UnknownScope {
                            entity: record.name.to_string(),
                            scope: scope.to_string(),
                        });
                    }
                },
                None => None,
            };
            builder.add(record.name, record.kind, record.access, scope)?;
        }
        Ok(builder.build())
    }
}

impl From<Catalog> for CatalogDump {
    fn from(catalog: Catalog) -> Self {
        let entities = catalog
            .entities
            .iter()
            .map(|e| EntityRecord {
                name: e.qualified_name.clone(),
                kind: e.kind,
                access: e.access,
                scope: e
                    .enclosing_scope
                    .and_then(|s| catalog.get(s))
                    .map(|p| p.qualified_name.clone()),
            })
            .collect();
        Self { entities }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Catalog, EntityId, EntityId, EntityId, EntityId) {
        let mut b = Catalog::builder();
        let ns = b
            .add("Faunus", EntityKind::Namespace, Access::NotApplicable, None)
            .unwrap();
        let class = b
            .add("Faunus::box", EntityKind::Class, Access::NotApplicable, Some(ns))
            .unwrap();
        let nested = b
            .add_member(class, "corner", EntityKind::Class, Access::Public)
            .unwrap();
        let field = b
            .add_member(nested, "x", EntityKind::Field, Access::Private)
            .unwrap();
        (b.build(), ns, class, nested, field)
    }

    #[test]
    fn lookup_by_name() {
        let (catalog, _, class, _, field) = sample();
        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.lookup(&"Faunus::box".into()), Some(class));
        assert_eq!(catalog.lookup(&"Faunus::box::corner::x".into()), Some(field));
        assert_eq!(catalog.lookup(&"Faunus::cell".into()), None);
    }

    #[test]
    fn iteration_preserves_insertion_order() {
        let (catalog, ..) = sample();
        let names: Vec<String> = catalog
            .iter()
            .map(|(_, e)| e.qualified_name.to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "Faunus",
                "Faunus::box",
                "Faunus::box::corner",
                "Faunus::box::corner::x"
            ]
        );
    }

    #[test]
    fn transitive_members() {
        let (catalog, ns, class, nested, field) = sample();
        assert_eq!(catalog.members(class), vec![nested]);
        assert_eq!(catalog.members_transitive(class), vec![nested, field]);
        assert_eq!(catalog.members_transitive(ns), vec![class, nested, field]);
        assert!(catalog.members_transitive(field).is_empty());
        assert!(catalog.is_member_of(field, class));
        assert!(!catalog.is_member_of(class, field));
    }

    #[test]
    fn duplicate_names_rejected() {
        let mut b = Catalog::builder();
        b.add("Foo", EntityKind::Class, Access::NotApplicable, None)
            .unwrap();
        let err = b
            .add("Foo", EntityKind::Function, Access::NotApplicable, None)
            .unwrap_err();
        assert_eq!(err, CatalogError::DuplicateEntity("Foo".into()));
    }

    #[test]
    fn unknown_scope_rejected() {
        let mut b = Catalog::builder();
        let err = b
            .add(
                "Foo::bar",
                EntityKind::Method,
                Access::Public,
                Some(EntityId::new(9)),
            )
            .unwrap_err();
        assert!(matches!(err, CatalogError::UnknownScope { .. }));
    }

    #[test]
    fn access_must_fit_kind() {
        let mut b = Catalog::builder();
        let class = b
            .add("Foo", EntityKind::Class, Access::NotApplicable, None)
            .unwrap();

        let err = b
            .add_member(class, "bar", EntityKind::Method, Access::NotApplicable)
            .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidAccess { .. }));

        let err = b
            .add("free", EntityKind::Function, Access::Private, None)
            .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidAccess { .. }));

        let err = b
            .add("stray", EntityKind::Field, Access::Public, None)
            .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidAccess { .. }));
    }

    #[test]
    fn dump_round_trip_keeps_scopes() {
        let (catalog, _, class, _, field) = sample();
        let json = serde_json::to_string(&catalog).unwrap();
        let back: Catalog = serde_json::from_str(&json).unwrap();
        assert_eq!(back.len(), catalog.len());
        assert!(back.is_member_of(field, class));
        assert_eq!(back.get(field).unwrap().access, Access::Private);
    }

    #[test]
    fn dump_requires_parents_first() {
        let json = r#"{"entities": [
            {"name": "Foo::bar", "kind": "method", "access": "public", "scope": "Foo"},
            {"name": "Foo", "kind": "class"}
        ]}"#;
        assert!(serde_json::from_str::<Catalog>(json).is_err());
    }
}
