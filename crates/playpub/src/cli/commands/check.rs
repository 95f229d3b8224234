//! Check command - offline preview of a publish run

use std::path::PathBuf;

use clap::Args;
use console::style;
use serde::Serialize;
use tracing::info;

use playpub_core::{
    parse_expansion_entry, ArtifactKind, PublishConfig, ReleaseBuilder, ReleaseDescriptor,
};

use super::args::PublishArgs;
use crate::cli::output;
use crate::cli::{Cli, OutputFormat};

/// Validate inputs, read release notes and show the release that would be built
#[derive(Debug, Args)]
pub struct CheckCommand {
    #[command(flatten)]
    pub args: PublishArgs,
}

#[derive(Debug, Serialize)]
struct ArtifactPreview {
    path: PathBuf,
    kind: Option<ArtifactKind>,
    exists: bool,
    expansion_file: Option<String>,
    mapping_file: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct CheckReport {
    config_path: Option<PathBuf>,
    package_name: String,
    track: String,
    artifacts: Vec<ArtifactPreview>,
    release: ReleaseDescriptor,
    warnings: Vec<String>,
}

impl CheckCommand {
    /// Execute the check command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!("executing check command");
        let cwd = std::env::current_dir()?;
        let (config, config_path) = self.args.resolve(&cwd)?;

        let report = build_report(config, config_path)?;

        match cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            OutputFormat::Text => {
                if !cli.quiet {
                    print_report(&report);
                }
            }
        }

        Ok(())
    }
}

/// Run every step of a publish that does not need the network.
///
/// Version codes are only known after upload, so the release is built with
/// placeholders `1..=n`.
fn build_report(
    config: PublishConfig,
    config_path: Option<PathBuf>,
) -> playpub_core::Result<CheckReport> {
    let mut warnings = Vec::new();
    let mut artifacts = Vec::with_capacity(config.app_paths.len());

    for (i, path) in config.app_paths.iter().enumerate() {
        let exists = path.is_file();
        if !exists {
            warnings.push(format!("app file not found: {}", path.display()));
        }

        let expansion_file = match config.expansion_files.get(i) {
            Some(entry) => {
                let spec = parse_expansion_entry(entry)?;
                if !spec.path.is_file() {
                    warnings.push(format!("expansion file not found: {}", spec.path.display()));
                }
                Some(format!("{} {}", spec.file_type, spec.path.display()))
            }
            None => None,
        };

        let mapping_file = config.mapping_files.get(i).cloned();
        if let Some(mapping) = &mapping_file {
            if !mapping.is_file() {
                warnings.push(format!("mapping file not found: {}", mapping.display()));
            }
        }

        artifacts.push(ArtifactPreview {
            path: path.clone(),
            kind: ArtifactKind::from_path(path),
            exists,
            expansion_file,
            mapping_file,
        });
    }

    let placeholder_codes: Vec<i64> = (1..=config.app_paths.len() as i64).collect();
    let release = ReleaseBuilder::new(&config.release).build(&placeholder_codes)?;

    Ok(CheckReport {
        config_path,
        package_name: config.package_name,
        track: config.track,
        artifacts,
        release,
        warnings,
    })
}

fn print_report(report: &CheckReport) {
    println!("{}", output::header("Publish preview"));
    println!();

    if let Some(path) = &report.config_path {
        println!(
            "{}",
            output::key_value("Config", &output::path_style().apply_to(path.display()).to_string())
        );
    }
    println!("{}", output::key_value("Package", &report.package_name));
    println!("{}", output::key_value("Track", &report.track));
    println!();

    println!("{}", output::header("Artifacts"));
    for (i, artifact) in report.artifacts.iter().enumerate() {
        let kind = artifact.kind.map(|k| k.as_str()).unwrap_or("?");
        println!(
            "  {}. {} ({})",
            i + 1,
            output::path_style().apply_to(artifact.path.display()),
            kind
        );
        if let Some(entry) = &artifact.expansion_file {
            println!("     expansion: {}", entry);
        }
        if let Some(mapping) = &artifact.mapping_file {
            println!("     mapping:   {}", mapping.display());
        }
    }
    println!();

    println!("{}", output::header("Release"));
    println!("{}", output::key_value("Status", report.release.status.as_str()));
    if let Some(fraction) = report.release.user_fraction {
        println!("{}", output::key_value("User fraction", &fraction.to_string()));
    }
    if let Some(name) = &report.release.name {
        println!("{}", output::key_value("Name", name));
    }
    println!(
        "{}",
        output::key_value(
            "Update priority",
            &report.release.in_app_update_priority.to_string()
        )
    );
    if report.release.release_notes.is_empty() {
        println!("{}", output::key_value("Release notes", &style("none").dim().to_string()));
    } else {
        let locales: Vec<&str> = report.release.release_notes.keys().map(String::as_str).collect();
        println!("{}", output::key_value("Release notes", &locales.join(", ")));
    }
    println!();

    for warning in &report.warnings {
        output::warning(warning);
    }
    output::success("Inputs are valid");
}
