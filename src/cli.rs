//! Minimal CLI: descriptor → (check | describe)
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use rayon::prelude::*;

use json_guard::{Descriptor, ParseResult, Schema, Value};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// validate JSON/NDJSON documents against a declarative schema descriptor
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    /// more log output (same as JSON_GUARD_LOG=debug)
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// validate every input document and report failures
    Check(CheckOut),
    /// print the JSON-schema-ish view of a descriptor
    Describe(DescribeOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// treat input as newline-delimited JSON (NDJSON)
    #[arg(long, default_value_t = false)]
    ndjson: bool,

    /// JSON Pointer to select a subnode in each document (e.g. /data/items/0/payload)
    #[arg(long)]
    json_pointer: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

#[derive(clap::Parser, Debug)]
struct CheckOut {
    /// schema descriptor (.json)
    #[arg(long, short)]
    schema: PathBuf,

    #[command(flatten)]
    input_settings: InputSettings,

    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    format: ReportFormat,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct DescribeOut {
    /// schema descriptor (.json)
    #[arg(long, short)]
    schema: PathBuf,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

/// One validated document, labelled by where it came from.
struct Checked {
    source: String,
    result: ParseResult,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    /// Every selected document, labelled `file` or `file:line`.
    fn load(&self) -> Result<Vec<(String, serde_json::Value)>> {
        let source_paths = resolve_file_path_patterns(&self.input)?;
        let mut docs = Vec::new();
        for source_path in source_paths {
            let label = source_path.to_string_lossy().to_string();
            let source = std::fs::read_to_string(&source_path)
                .with_context(|| format!("failed to read source file {label}"))?;
            if self.ndjson {
                for (line_no, line) in source.lines().enumerate() {
                    if line.trim().is_empty() {
                        continue;
                    }
                    let label = format!("{label}:{}", line_no + 1);
                    let doc = serde_json::from_str(line)
                        .with_context(|| format!("failed to parse JSON ({label})"))?;
                    docs.push((label, doc));
                }
            } else {
                let doc = serde_json::from_str(&source)
                    .with_context(|| format!("failed to parse JSON source file ({label})"))?;
                docs.push((label, doc));
            }
        }
        tracing::debug!(documents = docs.len(), "inputs loaded");
        Ok(docs)
    }

    /// Apply `--json-pointer`; a pointer that doesn't resolve yields the
    /// absent sentinel so the schema decides whether that's acceptable.
    fn select(&self, doc: serde_json::Value) -> Value {
        match self.json_pointer.as_deref() {
            None => Value::from(doc),
            Some(ptr) => doc.pointer(ptr).map(Value::from).unwrap_or(Value::Undefined),
        }
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    /// Returns whether every document passed.
    pub fn run(&self) -> Result<bool> {
        match &self.cmd {
            Command::Check(target) => {
                let schema = load_schema(&target.schema)?;
                let docs = target.input_settings.load()?;
                let checked: Vec<Checked> = docs
                    .into_par_iter()
                    .map(|(source, doc)| {
                        let data = target.input_settings.select(doc);
                        Checked { source, result: schema.safe_parse(&data) }
                    })
                    .collect();
                let failed = checked.iter().filter(|c| !c.result.is_success()).count();
                tracing::info!(total = checked.len(), failed, "check finished");

                let report = match target.format {
                    ReportFormat::Text => render_text(&checked),
                    ReportFormat::Json => render_json(&checked)?,
                };
                emit(target.out.as_deref(), &report)?;
                Ok(failed == 0)
            }
            Command::Describe(target) => {
                let schema = load_schema(&target.schema)?;
                let src = serde_json::to_string_pretty(&schema.describe())?;
                emit(target.out.as_deref(), &src)?;
                Ok(true)
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn load_schema(path: &Path) -> Result<Schema> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("failed to read schema descriptor {}", path.display()))?;
    let schema = Descriptor::from_slice(&bytes)
        .and_then(|d| d.build())
        .with_context(|| format!("failed to load schema descriptor {}", path.display()))?;
    tracing::debug!(schema = schema.kind().name(), path = %path.display(), "schema loaded");
    Ok(schema)
}

fn render_text(checked: &[Checked]) -> String {
    let mut out = String::new();
    for c in checked {
        match &c.result {
            ParseResult::Success(_) => {
                out.push_str(&format!("{} {}\n", "✓".green(), c.source));
            }
            ParseResult::Failure(error) => {
                out.push_str(&format!("{} {}\n", "✗".red(), c.source.bold()));
                for issue in error.issues() {
                    out.push_str(&format!("    {} {}\n", issue.path.to_string().yellow(), issue.message));
                }
            }
        }
    }
    let failed = checked.iter().filter(|c| !c.result.is_success()).count();
    let summary = format!("{} checked, {} failed", checked.len(), failed);
    if failed == 0 {
        out.push_str(&summary.green().to_string());
    } else {
        out.push_str(&summary.red().to_string());
    }
    out
}

fn render_json(checked: &[Checked]) -> Result<String> {
    let rows: Vec<serde_json::Value> = checked
        .iter()
        .map(|c| -> Result<serde_json::Value> {
            let mut row = serde_json::to_value(&c.result)?;
            row["source"] = serde_json::Value::from(c.source.as_str());
            Ok(row)
        })
        .collect::<Result<_>>()?;
    Ok(serde_json::to_string_pretty(&rows)?)
}

fn emit(out: Option<&Path>, contents: &str) -> Result<()> {
    match out {
        Some(out) => {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(out, contents)
                .with_context(|| format!("failed to write {}", out.display()))?;
        }
        None => println!("{contents}"),
    }
    Ok(())
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{' ))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                return Err(anyhow!("glob pattern matched no files: {pattern}"));
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
