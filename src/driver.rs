//! One binding pass, end to end.

use std::path::PathBuf;

use bindsurface_core::Catalog;
use bindsurface_instantiate::{HeaderGenerator, InstantiationTable};
use bindsurface_policy::{Policy, Resolution, resolve};
use tracing::{debug, info, info_span};

use crate::config::BindConfig;
use crate::emit::{Artifact, Emitter, ExposedSurface};
use crate::introspect::{Introspector, ParseRequest};
use crate::{BindError, Result};

/// Everything a successful pass produced.
#[derive(Debug)]
pub struct PassReport {
    pub header: String,
    /// Set when the header was written to disk.
    pub header_path: Option<PathBuf>,
    pub catalog: Catalog,
    pub resolution: Resolution,
    pub artifacts: Vec<Artifact>,
    /// Files the artifacts were written to, if an artifact directory is configured.
    pub artifact_paths: Vec<PathBuf>,
}

/// Runs binding passes for one configuration.
#[derive(Debug, Clone)]
pub struct Driver {
    config: BindConfig,
}

impl Driver {
    pub fn new(config: BindConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BindConfig {
        &self.config
    }

    /// Validate the configuration and build its policy and table.
    fn prepare(&self) -> Result<(Policy, InstantiationTable)> {
        Ok(self.config.validate()?)
    }

    fn render_header(&self, table: &InstantiationTable) -> Result<String> {
        let generator = HeaderGenerator::new(self.config.header.clone());
        let header = generator.generate(&self.config.header_paths()?, table)?;
        Ok(header)
    }

    /// Generate the instantiation header without running a pass.
    pub fn generate_header(&self) -> Result<String> {
        let (_, table) = self.prepare()?;
        self.render_header(&table)
    }

    /// Run a full pass. Any error aborts it; nothing is emitted on failure.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn run<I, E>(&self, introspector: &mut I, emitter: &mut E) -> Result<PassReport>
    where
        I: Introspector + ?Sized,
        E: Emitter + ?Sized,
    {
        let span = info_span!("pass", module = %self.config.module);
        let _enter = span.enter();

        let (policy, table) = self.prepare()?;
        let header = self.render_header(&table)?;

        let header_path = match &self.config.output.header {
            Some(path) => {
                let path = self.config.resolve_path(path);
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent).map_err(|e| BindError::io(parent, e))?;
                }
                std::fs::write(&path, &header).map_err(|e| BindError::io(&path, e))?;
                debug!(path = %path.display(), "wrote instantiation header");
                Some(path)
            }
            None => None,
        };

        let include_paths = self.config.resolved_include_paths();
        let request = ParseRequest {
            header_fragment: &header,
            header_path: header_path.as_deref(),
            include_paths: &include_paths,
        };
        let catalog = introspector.parse(&request)?;
        debug!(entities = catalog.len(), "front end returned catalog");

        let resolution = resolve(&catalog, &policy);

        let surface = ExposedSurface {
            module: &self.config.module,
            catalog: &catalog,
            resolution: &resolution,
        };
        let artifacts = emitter.emit(&surface)?;

        let mut artifact_paths = Vec::new();
        if let Some(dir) = &self.config.output.artifacts {
            let dir = self.config.resolve_path(dir);
            for artifact in &artifacts {
                artifact_paths.push(artifact.write_to(&dir)?);
            }
        }

        info!(
            entities = catalog.len(),
            exposed = resolution.exposed_count(),
            instantiations = table.len(),
            artifacts = artifacts.len(),
            "pass complete"
        );

        Ok(PassReport {
            header,
            header_path,
            catalog,
            resolution,
            artifacts,
            artifact_paths,
        })
    }
}
