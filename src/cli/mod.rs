//! CLI module for Kinship

mod args;

pub use args::{Args, Command};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::export::ExportMapper;
use crate::import;
use crate::model::{error_count, FamilyGraph, Finding};
use crate::output::{Generator, GeneratorOptions};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Run the CLI application
pub fn run() -> ExitCode {
    let args = Args::parse_args();

    match execute(args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// JSON shape for `import --format json`
#[derive(Debug, Serialize)]
struct ImportReport<'a> {
    status: &'a str,
    people: usize,
    relationships: usize,
    findings: &'a [Finding],
}

fn execute(args: Args) -> Result<()> {
    match args.command {
        Command::Import {
            file,
            output,
            report,
            config,
            format,
            producer,
            abort_on_warnings,
            verbose,
        } => {
            let mut cfg = load_config(config.as_deref());
            cfg.merge_cli(producer, abort_on_warnings);

            if verbose {
                println!("Importing: {}", file.display());
                println!("Output: {}", output.display());
                println!("Producer: {}", cfg.producer.name);
                println!("Abort on warnings: {}", cfg.import.abort_on_warnings);
            }

            let bytes = read_input(&file)?;

            match import::import_bytes(&bytes, &cfg, verbose) {
                Ok(out) => {
                    let stats = out.graph.stats();

                    let json = serde_json::to_string_pretty(&out.graph)?;
                    std::fs::write(&output, json)?;

                    if let Some(report_path) = &report {
                        write_findings(report_path, &out.warnings)?;
                    }

                    match format.as_str() {
                        "json" => {
                            let report = ImportReport {
                                status: "imported",
                                people: stats.people,
                                relationships: stats.relationships,
                                findings: &out.warnings,
                            };
                            println!("{}", serde_json::to_string_pretty(&report)?);
                        }
                        _ => {
                            println!(
                                "Imported {} people, {} relationships",
                                stats.people, stats.relationships
                            );
                            if !out.warnings.is_empty() {
                                println!("\nWarnings ({}):", out.warnings.len());
                                print_findings(&out.warnings, cfg.import.max_displayed_findings);
                            }
                            println!("Graph written to: {}", output.display());
                        }
                    }

                    Ok(())
                }
                Err(rejection) => {
                    if let Some(report_path) = &report {
                        write_findings(report_path, &rejection.findings)?;
                    }

                    match format.as_str() {
                        "json" => {
                            let report = ImportReport {
                                status: "rejected",
                                people: 0,
                                relationships: 0,
                                findings: &rejection.findings,
                            };
                            println!("{}", serde_json::to_string_pretty(&report)?);
                        }
                        _ => {
                            println!("Import rejected, nothing committed");
                            println!("\nFindings ({}):", rejection.findings.len());
                            print_findings(&rejection.findings, cfg.import.max_displayed_findings);
                        }
                    }

                    Err(Error::import_rejected(rejection.to_string()))
                }
            }
        }

        Command::Validate {
            file,
            format,
            verbose,
        } => {
            if verbose {
                println!("Validating: {}", file.display());
            }

            let bytes = read_input(&file)?;
            let preview = import::preview_bytes(&bytes);

            match format.as_str() {
                "json" => {
                    println!("{}", serde_json::to_string_pretty(&preview)?);
                }
                _ => {
                    println!(
                        "Would import {} people in {} families",
                        preview.people, preview.families
                    );
                    if preview.findings.is_empty() {
                        println!("No findings");
                    } else {
                        println!("\nFindings ({}):", preview.findings.len());
                        print_findings(&preview.findings, usize::MAX);
                    }
                }
            }

            let errors = error_count(&preview.findings);
            if errors > 0 {
                Err(Error::other(format!(
                    "validation found {} error findings",
                    errors
                )))
            } else {
                Ok(())
            }
        }

        Command::Export {
            graph,
            output,
            config,
            producer,
            verbose,
        } => {
            let mut cfg = load_config(config.as_deref());
            cfg.merge_cli(producer, false);

            if verbose {
                println!("Exporting: {}", graph.display());
                println!("Output: {}", output.display());
                println!("Producer: {}", cfg.producer.name);
            }

            let bytes = read_input(&graph)?;
            let family_graph: FamilyGraph = serde_json::from_slice(&bytes)?;

            let mapped = ExportMapper::new().map(&family_graph.people, &family_graph.relationships);

            if !mapped.findings.is_empty() {
                println!("Warnings ({}):", mapped.findings.len());
                print_findings(&mapped.findings, cfg.import.max_displayed_findings);
            }

            let generator = Generator::new(GeneratorOptions {
                source_name: cfg.producer.name.clone(),
                source_version: cfg.producer.version.clone(),
                gedcom_version: cfg.export.gedcom_version.clone(),
                date: None,
            });
            let text = generator.generate(&mapped.individuals, &mapped.families);
            std::fs::write(&output, text)?;

            println!(
                "Exported {} individuals, {} families",
                mapped.individuals.len(),
                mapped.families.len()
            );
            println!("GEDCOM written to: {}", output.display());

            Ok(())
        }

        Command::Version => {
            println!("kinship {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Load config from the given path, or from kinship.toml in the working
/// directory, falling back to defaults
fn load_config(path: Option<&Path>) -> Config {
    match path {
        Some(p) => Config::load_or_default(p),
        None => Config::load_or_default(Path::new("kinship.toml")),
    }
}

fn read_input(path: &Path) -> Result<Vec<u8>> {
    if !path.exists() {
        return Err(Error::PathNotFound(path.to_path_buf()));
    }
    Ok(std::fs::read(path)?)
}

fn write_findings(path: &PathBuf, findings: &[Finding]) -> Result<()> {
    let json = serde_json::to_string_pretty(findings)?;
    std::fs::write(path, json)?;
    Ok(())
}

fn print_findings(findings: &[Finding], limit: usize) {
    for finding in findings.iter().take(limit) {
        println!("  {}", finding);
    }
    if findings.len() > limit {
        println!("  ... and {} more", findings.len() - limit);
    }
}
