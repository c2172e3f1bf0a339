use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use titlepress::{
    Acceptance, DocumentMetadata, EngineBuilder, EngineConfig, Provenance, Record, RenderFailure,
    RenderOptions, Template, ValidatedRecord, ValidationVerdict,
};
use titlepress_layout::{LayoutConfig, LayoutEngine};
use titlepress_resource::{ResourceError, load_template};

/// Certificate of title PDF generator.
#[derive(Parser, Debug)]
#[command(name = "titlepress", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a validated record to PDF.
    Render {
        /// Engine configuration file.
        #[arg(long)]
        config: PathBuf,
        /// Template id.
        #[arg(long)]
        template: String,
        #[arg(long)]
        template_version: Option<u32>,
        /// Record as JSON, or XML when the file ends in `.xml`.
        #[arg(long)]
        record: PathBuf,
        /// Schema validation verdict for the record.
        #[arg(long)]
        verdict: PathBuf,
        /// Confidence of a record back-filled from a legacy PDF.
        #[arg(long)]
        legacy_confidence: Option<f32>,
        /// Render even when the acceptance policy asks for manual review.
        #[arg(long)]
        force: bool,
        #[arg(long)]
        no_archival: bool,
        #[arg(long)]
        no_glyph: bool,
        #[arg(long)]
        title: Option<String>,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Print the content hash of a record.
    Hash {
        record: PathBuf,
    },
    /// Parse templates and report their first defect.
    CheckTemplate {
        templates: Vec<PathBuf>,
        /// Also check font aliases against the fonts of this configuration.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    match run(Cli::parse().command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<ExitCode, RenderFailure> {
    match command {
        Command::Render {
            config,
            template,
            template_version,
            record,
            verdict,
            legacy_confidence,
            force,
            no_archival,
            no_glyph,
            title,
            output,
        } => {
            let config = EngineConfig::from_file(&config)?;
            let engine = EngineBuilder::from_config(&config)?.build();

            let verdict: ValidationVerdict = serde_json::from_str(&read_text(&verdict)?)
                .map_err(|e| ResourceError::InvalidFormat(format!("verdict: {}", e)))?;
            let provenance = match legacy_confidence {
                Some(confidence) => Provenance::LegacyPdf { confidence },
                None => Provenance::Direct,
            };
            let record =
                ValidatedRecord::accept_with_provenance(read_record(&record)?, &verdict, provenance)?;

            if engine.acceptance(&record) == Acceptance::ManualReview {
                if !force {
                    eprintln!("record needs manual review before rendering (use --force to override)");
                    return Ok(ExitCode::from(2));
                }
                log::warn!("Rendering a record that needs manual review (--force)");
            }

            let options = RenderOptions {
                archival: !no_archival,
                verification_glyph: !no_glyph,
                template_version,
                metadata: DocumentMetadata {
                    title,
                    ..DocumentMetadata::default()
                },
            };
            let rendered = engine.render(&record, &template, &options)?;
            for warning in &rendered.warnings {
                eprintln!("warning: {}", warning);
            }
            std::fs::write(&output, &rendered.document).map_err(ResourceError::from)?;
            println!(
                "{} ({} page(s), {}) -> {}",
                rendered.content_hash,
                rendered.page_count,
                if rendered.archival { "PDF/A-2b" } else { "PDF" },
                output.display()
            );
            Ok(ExitCode::SUCCESS)
        }
        Command::Hash { record } => {
            println!("{}", read_record(&record)?.content_hash());
            Ok(ExitCode::SUCCESS)
        }
        Command::CheckTemplate { templates, config } => {
            let fonts = match config {
                Some(path) => {
                    let config = EngineConfig::from_file(&path)?;
                    Some(EngineBuilder::from_config(&config)?.build())
                }
                None => None,
            };
            let mut failed = false;
            for path in &templates {
                let result = load_template(path).map_err(RenderFailure::from).and_then(|t| {
                    if let Some(engine) = &fonts {
                        check_fonts(engine.fonts(), &t)?;
                    }
                    Ok(t)
                });
                match result {
                    Ok(t) => println!(
                        "{}: ok ('{}' version {}, {} page(s))",
                        path.display(),
                        t.id(),
                        t.version(),
                        t.pages().len()
                    ),
                    Err(e) => {
                        failed = true;
                        println!("{}: {}", path.display(), e);
                    }
                }
            }
            Ok(if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS })
        }
    }
}

fn check_fonts(fonts: &titlepress::FontRegistry, template: &Template) -> Result<(), RenderFailure> {
    LayoutEngine::new(fonts, LayoutConfig::default()).check_fonts(template)?;
    Ok(())
}

fn read_text(path: &Path) -> Result<String, RenderFailure> {
    std::fs::read_to_string(path).map_err(|e| {
        ResourceError::LoadFailed {
            path: path.display().to_string(),
            message: e.to_string(),
        }
        .into()
    })
}

fn read_record(path: &Path) -> Result<Record, RenderFailure> {
    let text = read_text(path)?;
    let record = if path.extension().is_some_and(|e| e == "xml") {
        Record::from_xml_str(&text)?
    } else {
        Record::from_json_str(&text)?
    };
    Ok(record)
}
