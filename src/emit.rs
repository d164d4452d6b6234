//! The emission-backend seam.
//!
//! A backend receives the exposed surface of a pass and returns the source
//! artifacts it generated. Writing them out is left to the caller.

use std::io;
use std::path::{Path, PathBuf};

use bindsurface_core::{Access, Catalog, Entity, EntityKind, QualifiedName};
use bindsurface_policy::Resolution;
use serde::Serialize;
use thiserror::Error;

/// Errors reported by an emission backend.
#[derive(Debug, Error)]
pub enum EmitError {
    #[error("failed to serialize artifact: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Backend-specific failure.
    #[error("{0}")]
    Backend(String),
}

/// The entities a pass decided to expose.
#[derive(Debug, Clone, Copy)]
pub struct ExposedSurface<'a> {
    pub module: &'a str,
    pub catalog: &'a Catalog,
    pub resolution: &'a Resolution,
}

impl<'a> ExposedSurface<'a> {
    /// Exposed entities, in catalog order.
    pub fn entities(&self) -> impl Iterator<Item = &'a Entity> + 'a {
        let resolution = self.resolution;
        self.catalog
            .iter()
            .filter(move |(id, _)| resolution.decision_for(*id).is_some_and(|d| d.exposed))
            .map(|(_, entity)| entity)
    }

    pub fn len(&self) -> usize {
        self.resolution.exposed_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One generated file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// File name relative to the output directory.
    pub name: String,
    pub contents: String,
}

impl Artifact {
    pub fn new(name: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
        }
    }

    /// Write into `dir`, creating it if needed.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, EmitError> {
        let path = dir.join(&self.name);
        let write = || -> io::Result<()> {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, &self.contents)
        };
        write().map_err(|source| EmitError::Write {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}

/// A code-emission backend.
pub trait Emitter {
    fn emit(&mut self, surface: &ExposedSurface<'_>) -> Result<Vec<Artifact>, EmitError>;
}

impl<F> Emitter for F
where
    F: FnMut(&ExposedSurface<'_>) -> Result<Vec<Artifact>, EmitError>,
{
    fn emit(&mut self, surface: &ExposedSurface<'_>) -> Result<Vec<Artifact>, EmitError> {
        self(surface)
    }
}

/// Backend producing a JSON manifest of the exposed surface.
///
/// Useful on its own as a review artifact, and as input for backends that
/// run out of process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestEmitter;

#[derive(Serialize)]
struct Manifest<'a> {
    module: &'a str,
    entities: Vec<ManifestEntry<'a>>,
}

#[derive(Serialize)]
struct ManifestEntry<'a> {
    name: &'a QualifiedName,
    kind: EntityKind,
    access: Access,
    rule: usize,
}

impl ManifestEmitter {
    pub fn file_name(module: &str) -> String {
        format!("{module}.manifest.json")
    }
}

impl Emitter for ManifestEmitter {
    fn emit(&mut self, surface: &ExposedSurface<'_>) -> Result<Vec<Artifact>, EmitError> {
        let entities = surface
            .catalog
            .iter()
            .filter_map(|(id, entity)| {
                let decision = surface.resolution.decision_for(id)?;
                decision.exposed.then_some(ManifestEntry {
                    name: &entity.qualified_name,
                    kind: entity.kind,
                    access: entity.access,
                    rule: decision.rule_index,
                })
            })
            .collect();
        let manifest = Manifest {
            module: surface.module,
            entities,
        };
        let mut json = serde_json::to_string_pretty(&manifest)?;
        json.push('\n');
        Ok(vec![Artifact::new(Self::file_name(surface.module), json)])
    }
}
