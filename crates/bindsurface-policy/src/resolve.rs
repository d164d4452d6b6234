//! Visibility resolution - the final exposed/hidden decision per entity.
//!
//! # Semantics
//!
//! Last match wins, evaluated independently per entity:
//!
//! 1. Every entity starts hidden, decided by rule 0.
//! 2. Each later rule overwrites the decision of every entity it matches.
//! 3. Entities no later rule matches keep the default.
//!
//! A rule that matches nothing is inert. That is not an error; the resolver
//! records it in [`Resolution::inert_rules`] so callers can warn about typos
//! in the policy.
//!
//! Exact targets are looked up through the catalog's name index and classes
//! expand through its containment graph; only globs and access rules scan
//! the whole catalog.

use std::collections::BTreeMap;

use bindsurface_core::{Catalog, EntityId, KindSet, QualifiedName};
use rustc_hash::FxHashMap;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{Policy, PolicyRule, Target};

/// The outcome for one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Decision {
    pub exposed: bool,
    /// Position in the policy of the rule that decided this entity.
    pub rule_index: usize,
}

/// Decisions for every entity of a catalog, in catalog order.
#[derive(Debug, Clone)]
pub struct Resolution {
    entries: Vec<(QualifiedName, Decision)>,
    index: FxHashMap<QualifiedName, usize>,
    rules: Vec<String>,
    inert: Vec<usize>,
}

impl Resolution {
    /// Decision for an entity by name.
    pub fn decision(&self, name: &QualifiedName) -> Option<Decision> {
        self.index.get(name).map(|&i| self.entries[i].1)
    }

    /// Decision for an entity by catalog id.
    pub fn decision_for(&self, id: EntityId) -> Option<Decision> {
        self.entries.get(id.index() as usize).map(|(_, d)| *d)
    }

    /// Whether the named entity is exposed. Unknown names are not.
    pub fn is_exposed(&self, name: &QualifiedName) -> bool {
        self.decision(name).is_some_and(|d| d.exposed)
    }

    /// All decisions, in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (&QualifiedName, Decision)> {
        self.entries.iter().map(|(n, d)| (n, *d))
    }

    /// Exposed entity names, in catalog order.
    pub fn exposed(&self) -> impl Iterator<Item = &QualifiedName> {
        self.entries
            .iter()
            .filter(|(_, d)| d.exposed)
            .map(|(n, _)| n)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn exposed_count(&self) -> usize {
        self.entries.iter().filter(|(_, d)| d.exposed).count()
    }

    pub fn hidden_count(&self) -> usize {
        self.len() - self.exposed_count()
    }

    /// Indices of rules after the default that matched no entity.
    pub fn inert_rules(&self) -> &[usize] {
        &self.inert
    }

    /// Describe why an entity ended up exposed or hidden.
    ///
    /// ```text
    /// `Foo::baz` hidden by rule #2 (exclude private members)
    /// ```
    pub fn explain(&self, name: &QualifiedName) -> Option<String> {
        let decision = self.decision(name)?;
        let verdict = if decision.exposed { "exposed" } else { "hidden" };
        let rule = self
            .rules
            .get(decision.rule_index)
            .map(String::as_str)
            .unwrap_or("unknown rule");
        Some(format!(
            "`{name}` {verdict} by rule #{} ({rule})",
            decision.rule_index
        ))
    }

    /// The decision map keyed by qualified name, ordered by name.
    pub fn into_map(self) -> BTreeMap<String, Decision> {
        self.entries
            .into_iter()
            .map(|(n, d)| (n.to_string(), d))
            .collect()
    }
}

/// Resolve every entity of `catalog` against `policy`.
///
/// Never fails: every well-formed catalog and policy pair has exactly one
/// resolution, and the result does not depend on hash iteration order.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn resolve(catalog: &Catalog, policy: &Policy) -> Resolution {
    let mut decisions = vec![
        Decision {
            exposed: false,
            rule_index: 0,
        };
        catalog.len()
    ];
    let mut inert = Vec::new();
    let mut matcher = Matcher::new(catalog);

    for (rule_index, rule) in policy.rules().iter().enumerate().skip(1) {
        let matched = matcher.matches(rule);
        if matched.is_empty() {
            warn!(rule = rule_index, %rule, "policy rule matched no entity");
            inert.push(rule_index);
            continue;
        }
        let exposed = rule.exposes();
        for id in &matched {
            decisions[id.index() as usize] = Decision {
                exposed,
                rule_index,
            };
        }
        debug!(rule = rule_index, %rule, matched = matched.len(), "applied policy rule");
    }

    let mut entries = Vec::with_capacity(catalog.len());
    let mut index = FxHashMap::default();
    for ((_, entity), decision) in catalog.iter().zip(decisions) {
        index.insert(entity.qualified_name.clone(), entries.len());
        entries.push((entity.qualified_name.clone(), decision));
    }

    let resolution = Resolution {
        entries,
        index,
        rules: policy.rules().iter().map(|r| r.to_string()).collect(),
        inert,
    };
    info!(
        entities = resolution.len(),
        exposed = resolution.exposed_count(),
        rules = policy.len(),
        "resolved visibility"
    );
    resolution
}

/// Kinds an access rule can hide.
const ACCESS_RULE_KINDS: KindSet = KindSet::MEMBERS;
/// Kinds whose members follow them into an include or exclude.
const EXPANDING_KINDS: KindSet = KindSet::CLASS;

/// Computes the entity set each rule matches.
struct Matcher<'c> {
    catalog: &'c Catalog,
    /// Rendered names, built on the first glob.
    rendered: Option<Vec<String>>,
}

impl<'c> Matcher<'c> {
    fn new(catalog: &'c Catalog) -> Self {
        Self {
            catalog,
            rendered: None,
        }
    }

    /// Matched ids, sorted and without duplicates.
    fn matches(&mut self, rule: &PolicyRule) -> Vec<EntityId> {
        match rule {
            PolicyRule::DefaultDenyAll => self.catalog.iter().map(|(id, _)| id).collect(),
            PolicyRule::Include(target) | PolicyRule::Exclude(target) => {
                self.target_with_members(target)
            }
            PolicyRule::ExcludeAccess(access) => self
                .catalog
                .iter()
                .filter(|(_, e)| ACCESS_RULE_KINDS.has(e.kind) && e.access == *access)
                .map(|(id, _)| id)
                .collect(),
        }
    }

    fn target_with_members(&mut self, target: &Target) -> Vec<EntityId> {
        let roots: Vec<EntityId> = match target {
            Target::Exact(name) => self.catalog.lookup(name).into_iter().collect(),
            Target::Pattern(pattern) => {
                let catalog = self.catalog;
                let rendered = self.rendered.get_or_insert_with(|| {
                    catalog
                        .iter()
                        .map(|(_, e)| e.qualified_name.to_string())
                        .collect()
                });
                rendered
                    .iter()
                    .enumerate()
                    .filter(|(_, name)| pattern.is_match(name))
                    .map(|(i, _)| EntityId::new(i as u32))
                    .collect()
            }
        };

        let mut matched = Vec::with_capacity(roots.len());
        for root in roots {
            matched.push(root);
            if self
                .catalog
                .get(root)
                .is_some_and(|e| EXPANDING_KINDS.has(e.kind))
            {
                matched.extend(self.catalog.members_transitive(root));
            }
        }
        matched.sort_unstable();
        matched.dedup();
        matched
    }
}
