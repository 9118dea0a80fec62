use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use walkdir::WalkDir;

use pepcheck::output::{self, OutputFormat};
use pepcheck::report::Diagnostic;

#[derive(Parser)]
#[command(name = "pepcheck", about = "Check Python sources against PEP 8 style rules")]
struct Cli {
    /// File or directory to check.
    path: PathBuf,

    /// Output format: pretty, text, or json.
    #[arg(long, default_value = "pretty")]
    format: String,
}

fn parse_format(s: &str) -> Result<OutputFormat> {
    match s {
        "pretty" => Ok(OutputFormat::Pretty),
        "text" => Ok(OutputFormat::Text),
        "json" => Ok(OutputFormat::Json),
        other => anyhow::bail!("unknown format: {other} (expected pretty, text, or json)"),
    }
}

fn collect_files(path: &PathBuf) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.clone()]);
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(path)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let p = entry.path();
        if p.extension().is_some_and(|ext| ext == "py") {
            files.push(p.to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let fmt = parse_format(&cli.format)?;

    let files = collect_files(&cli.path).context("failed to collect files")?;

    if files.is_empty() {
        anyhow::bail!("no .py files found in {}", cli.path.display());
    }

    // Files are checked strictly in sorted order, so the output is grouped
    // by file with no extra bookkeeping.
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    for file in &files {
        let found = pepcheck::check_file(file)
            .with_context(|| format!("failed to check {}", file.display()))?;
        diagnostics.extend(found);
    }

    let out = match fmt {
        OutputFormat::Json => output::format_json(&diagnostics),
        OutputFormat::Text => output::format_text(&diagnostics),
        OutputFormat::Pretty => output::format_pretty(&diagnostics),
    };
    if !out.is_empty() {
        println!("{out}");
    }

    Ok(())
}
