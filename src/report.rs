//! Output formatting for analysis results.
//!
//! Supports two output formats:
//! - Pretty: colored terminal summary per file
//! - JSON: the full `ParsedModule` records for programmatic consumption

use std::io::{self, Write};

use colored::*;
use serde::Serialize;

use crate::analysis::{ParsedModule, Visibility};
use crate::batch::FileAnalysis;

/// JSON report envelope.
#[derive(Serialize)]
pub struct JsonReport<'a> {
    pub version: &'static str,
    pub path: &'a str,
    pub files_analyzed: usize,
    pub files: &'a [FileAnalysis],
}

/// Render results as pretty-printed JSON.
pub fn render_json(path: &str, results: &[FileAnalysis]) -> anyhow::Result<String> {
    let report = JsonReport {
        version: env!("CARGO_PKG_VERSION"),
        path,
        files_analyzed: results.len(),
        files: results,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

/// Write results in JSON format to stdout.
pub fn write_json(path: &str, results: &[FileAnalysis]) -> anyhow::Result<()> {
    let json = render_json(path, results)?;
    println!("{}", json);
    Ok(())
}

/// Write results in pretty (human-readable) format to stdout.
pub fn write_pretty(path: &str, results: &[FileAnalysis]) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    render_pretty(&mut out, path, results)?;
    Ok(())
}

/// Write the pretty report to any writer.
pub fn render_pretty<W: Write>(out: &mut W, path: &str, results: &[FileAnalysis]) -> io::Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "  {} v{}",
        "contractscope".cyan().bold(),
        env!("CARGO_PKG_VERSION")
    )?;
    writeln!(out)?;
    writeln!(out, "  {}{}", "Analyzing: ".dimmed(), path)?;
    writeln!(out, "  {}{}", "Files:     ".dimmed(), results.len())?;
    writeln!(out)?;

    for result in results {
        write_file(out, result)?;
        writeln!(out)?;
    }

    Ok(())
}

fn write_file<W: Write>(out: &mut W, result: &FileAnalysis) -> io::Result<()> {
    let module = &result.module;
    let metrics = &module.complexity_metrics;

    writeln!(
        out,
        "  {}  {}",
        result.path.blue().bold(),
        format!("({}, {} lines)", module.module_kind, module.total_lines).dimmed()
    )?;
    writeln!(
        out,
        "    functions: {}  structs: {}  constants: {}  complexity: {}",
        metrics.function_count,
        metrics.struct_count,
        metrics.const_count,
        colored_complexity(metrics.cyclomatic_complexity)
    )?;

    write_functions(out, module)?;

    if !module.dependencies.is_empty() {
        writeln!(
            out,
            "    {} {}",
            "dependencies:".dimmed(),
            module.dependencies.join(", ")
        )?;
    }
    if !module.language_features.is_empty() {
        writeln!(
            out,
            "    {} {}",
            "features:".dimmed(),
            module.language_features.join(", ")
        )?;
    }
    for insight in &module.security_insights {
        writeln!(out, "    {} {}", "!".yellow().bold(), insight.yellow())?;
    }

    Ok(())
}

fn write_functions<W: Write>(out: &mut W, module: &ParsedModule) -> io::Result<()> {
    for function in &module.functions {
        let marker = match function.visibility {
            Visibility::Public => "pub ".green(),
            Visibility::Private => "    ".normal(),
        };
        let entry = if function.is_entry_function {
            " entry".magenta().to_string()
        } else {
            String::new()
        };
        writeln!(
            out,
            "      {}{:<28}{}{}{}",
            marker,
            function.name,
            format!(":{}", function.line_number).dimmed(),
            format!("  cc={}", function.complexity_score).dimmed(),
            entry
        )?;
    }
    Ok(())
}

fn colored_complexity(score: u32) -> ColoredString {
    let text = score.to_string();
    match score {
        0..=10 => text.green(),
        11..=25 => text.yellow(),
        _ => text.red(),
    }
}
