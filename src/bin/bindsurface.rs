use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::Context;
use bindsurface::{BindConfig, CatalogDumpIntrospector, Driver, ManifestEmitter};
use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "bindsurface", about = "Binding-surface compiler")]
struct Cli {
    /// Raise log verbosity (`-v` debug, `-vv` trace). `RUST_LOG` takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate the instantiation header.
    Header {
        /// Binding configuration (YAML).
        #[arg(short, long)]
        config: PathBuf,

        /// Output file; omit for stdout.
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Run a full pass against a JSON catalog dump.
    Resolve {
        /// Binding configuration (YAML).
        #[arg(short, long)]
        config: PathBuf,

        /// Catalog dump exported by the front end.
        #[arg(long)]
        catalog: PathBuf,

        /// Explain the decision for a qualified name. Repeatable.
        #[arg(long, value_name = "NAME")]
        explain: Vec<String>,

        /// Write the exposure manifest to this file.
        #[arg(long)]
        manifest: Option<PathBuf>,
    },
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load(config: &Path) -> anyhow::Result<Driver> {
    let config = BindConfig::from_path(config)
        .with_context(|| format!("loading {}", config.display()))?;
    Ok(Driver::new(config))
}

fn header(config: PathBuf, out: Option<PathBuf>) -> anyhow::Result<()> {
    let header = load(&config)?.generate_header()?;
    match out {
        Some(path) => std::fs::write(&path, header)
            .with_context(|| format!("writing {}", path.display()))?,
        None => std::io::stdout().write_all(header.as_bytes())?,
    }
    Ok(())
}

fn resolve(
    config: PathBuf,
    catalog: PathBuf,
    explain: Vec<String>,
    manifest: Option<PathBuf>,
) -> anyhow::Result<()> {
    let driver = load(&config)?;
    let mut introspector = CatalogDumpIntrospector::from_path(catalog);
    let report = driver.run(&mut introspector, &mut ManifestEmitter)?;

    println!(
        "{}: {} entities, {} exposed, {} hidden",
        driver.config().module,
        report.catalog.len(),
        report.resolution.exposed_count(),
        report.resolution.hidden_count(),
    );
    for name in &explain {
        match report.resolution.explain(&name.as_str().into()) {
            Some(line) => println!("{line}"),
            None => println!("`{name}` is not in the catalog"),
        }
    }

    if let Some(path) = manifest {
        let artifact = report
            .artifacts
            .first()
            .context("manifest emitter produced no artifact")?;
        std::fs::write(&path, &artifact.contents)
            .with_context(|| format!("writing {}", path.display()))?;
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Header { config, out } => header(config, out),
        Command::Resolve {
            config,
            catalog,
            explain,
            manifest,
        } => resolve(config, catalog, explain, manifest),
    };

    if let Err(err) = result {
        eprintln!("error: {err:#}");
        process::exit(1);
    }
}
