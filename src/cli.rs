//! Minimal CLI: load → (check | dump)
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use rayon::prelude::*;

use crate::error::ModelError;
use crate::model::Interface;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// load interface definitions (JSON interchange form), check them, or re-emit them normalized
#[derive(Parser, Debug)]
#[command(name = "interface-model", version)]
pub struct CommandLineInterface {
    /// debug-level logging (RUST_LOG overrides)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// validate every input and print a per-document summary
    Check(CheckOut),
    /// re-emit the inputs in normalized JSON form
    Dump(DumpOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// treat input as newline-delimited JSON (NDJSON), one interface per line
    #[arg(long, default_value_t = false)]
    ndjson: bool,

    /// JSON Pointer to select a subnode in each document (e.g. /data/interface)
    #[arg(long)]
    json_pointer: Option<String>,

    /// JQ pre-process filter for each document; every output is one interface
    #[arg(long)]
    jq_expr: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct CheckOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// only print violations
    #[arg(short, long)]
    quiet: bool,
}

#[derive(clap::Parser, Debug)]
struct DumpOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// single-line output
    #[arg(long)]
    compact: bool,
}

/// One loaded interface and where it came from.
#[derive(Debug)]
struct Document {
    label: String,
    iface: Interface,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    /// Load every document of every input. Files are read in parallel;
    /// documents come back in input order.
    fn load_all(&self) -> anyhow::Result<Vec<Document>> {
        let source_paths = resolve_file_path_patterns(&self.input)?;
        tracing::info!(files = source_paths.len(), "loading inputs");
        let per_file = source_paths
            .par_iter()
            .map(|path| self.load_file(path))
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(per_file.into_iter().flatten().collect())
    }

    fn load_file(&self, source_path: &Path) -> anyhow::Result<Vec<Document>> {
        let source_path_str = source_path.to_string_lossy().to_string();
        let values = if self.ndjson {
            let source = std::fs::read_to_string(source_path)
                .with_context(|| format!("failed to read source file ({source_path_str})"))?;
            source
                .lines()
                .enumerate()
                .filter(|(_, line)| !line.trim().is_empty())
                .map(|(ix, line)| {
                    serde_json::from_str::<serde_json::Value>(line)
                        .with_context(|| format!("failed to parse line {} of {source_path_str}", ix + 1))
                })
                .collect::<anyhow::Result<Vec<_>>>()?
        } else {
            vec![crate::load::read_value(source_path)
                .with_context(|| format!("failed to parse JSON source file ({source_path_str})"))?]
        };

        let mut docs = Vec::new();
        for value in values {
            let value = match self.json_pointer.as_deref() {
                Some(ptr) => crate::load::select_pointer(value, ptr)
                    .with_context(|| format!("in {source_path_str}"))?,
                None => value,
            };
            let selected = match self.jq_expr.as_deref() {
                None => vec![value],
                Some(jq_expr) => crate::jq_exec::run_jaq(jq_expr, &value)
                    .with_context(|| format!("failed to apply jq expression to source file ({source_path_str})"))?,
            };
            for value in selected {
                let label = if docs.is_empty() {
                    source_path_str.clone()
                } else {
                    format!("{source_path_str}#{}", docs.len())
                };
                let iface = crate::load::from_value(value)
                    .with_context(|| format!("invalid interface in {label}"))?;
                docs.push(Document { label, iface });
            }
        }
        tracing::debug!(path = %source_path_str, documents = docs.len(), "loaded");
        Ok(docs)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> anyhow::Result<()> {
        match &self.cmd {
            Command::Check(target) => {
                let docs = target.input_settings.load_all()?;
                let mut total = 0;
                for doc in &docs {
                    let violations = crate::validate::validate_interface(&doc.iface);
                    total += violations.len();
                    if !target.quiet || !violations.is_empty() {
                        let mark = if violations.is_empty() { "ok".green() } else { "FAIL".red() };
                        println!("{mark} {}: {}", doc.label.bold(), summarize(&doc.iface));
                    }
                    for v in &violations {
                        println!("    {} {v}", "-".red());
                    }
                }
                if total > 0 {
                    return Err(ModelError::Validation { count: total }.into());
                }
                tracing::info!(documents = docs.len(), "all documents valid");
                Ok(())
            }
            Command::Dump(target) => {
                let docs = target.input_settings.load_all()?;
                let ifaces: Vec<Interface> = docs.into_iter().map(|d| d.iface).collect();
                let src = match (ifaces.len(), target.compact) {
                    (1, false) => crate::load::to_string_pretty(&ifaces[0])?,
                    (1, true) => crate::load::to_string(&ifaces[0])?,
                    (_, false) => serde_json::to_string_pretty(&ifaces)?,
                    (_, true) => serde_json::to_string(&ifaces)?,
                };
                if let Some(out) = target.out.as_ref() {
                    if let Some(parent) = out.parent() {
                        std::fs::create_dir_all(parent)
                            .with_context(|| format!("failed to create {}", parent.display()))?;
                    }
                    std::fs::write(out, &src).with_context(|| format!("failed to write {}", out.display()))?;
                    tracing::info!(out = %out.display(), "written");
                } else {
                    println!("{src}");
                }
                Ok(())
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn summarize(iface: &Interface) -> String {
    fn plural(n: usize, word: &str) -> String {
        if n == 1 { format!("{n} {word}") } else { format!("{n} {word}s") }
    }
    let mut s = format!(
        "{}, {}, {}",
        plural(iface.enums.len(), "enum"),
        plural(iface.structs.len(), "struct"),
        plural(iface.functions.len(), "function"),
    );
    if let Some(name) = iface.param("name") {
        s.push_str(&format!(" [{name}"));
        if let Some(version) = iface.param("version") {
            s.push_str(&format!(" {version}"));
        }
        s.push(']');
    }
    s
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>, ModelError>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{' ))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            let entries = glob::glob(pattern).map_err(|e| ModelError::Glob(format!("{pattern}: {e}")))?;
            for entry in entries {
                let p = entry.map_err(|e| ModelError::Glob(e.to_string()))?;
                matched_any = true;
                out.push(p);
            }
            if !matched_any {
                return Err(ModelError::Glob(format!("glob pattern matched no files: {pattern}")));
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::*;

    #[test]
    fn literal_paths_pass_through() {
        let out = resolve_file_path_patterns(["a.json", "dir/b.json"]).unwrap();
        assert_eq!(out, vec![PathBuf::from("a.json"), PathBuf::from("dir/b.json")]);
    }

    #[test]
    fn empty_glob_is_an_error() {
        let err = resolve_file_path_patterns(["/definitely/not/here/*.json"]).unwrap_err();
        assert!(err.to_string().contains("matched no files"));
    }

    #[test]
    fn summary_counts_items() {
        let iface = Interface::new()
            .with_param("name", "climate")
            .with_param("version", "1.0")
            .with_enums([Enum::new("A")])
            .with_functions([
                Function::new("F", "F", MessageType::Request),
                Function::new("F", "F", MessageType::Response),
            ]);
        assert_eq!(summarize(&iface), "1 enum, 0 structs, 2 functions [climate 1.0]");
        assert_eq!(summarize(&Interface::new()), "0 enums, 0 structs, 0 functions");
    }

    #[test]
    fn cli_parses_subcommands() {
        let cli = CommandLineInterface::try_parse_from([
            "interface-model", "dump", "-i", "a.json", "b.json", "--compact", "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.cmd {
            Command::Dump(d) => {
                assert!(d.compact);
                assert_eq!(d.input_settings.input, vec!["a.json", "b.json"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
