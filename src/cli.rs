//! Command-line interface for contractscope.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::analysis::{get_extractor, Analyzer, Language, RuleKind};
use crate::batch;
use crate::config::{Config, DEFAULT_CONFIG_NAMES};
use crate::report;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_ERROR: i32 = 2;

/// Structural analysis for smart-contract source code.
///
/// Contractscope extracts functions, structs, constants, imports and
/// documentation from Rust (Solana/Anchor) and Move sources, scores their
/// complexity and flags security-relevant patterns.
#[derive(Parser)]
#[command(name = "contractscope")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Log level when RUST_LOG is unset: error, warn, info, debug, trace
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a file or directory
    Analyze(AnalyzeArgs),
    /// List the built-in heuristic rules
    Rules(RulesArgs),
}

/// Arguments for the analyze command.
#[derive(Parser)]
pub struct AnalyzeArgs {
    /// Path to analyze (file or directory)
    pub path: PathBuf,

    /// Force a language instead of detecting it from extensions
    #[arg(short, long)]
    pub language: Option<Language>,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,

    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Arguments for the rules command.
#[derive(Parser)]
pub struct RulesArgs {
    /// Only list rules for this language
    #[arg(short, long)]
    pub language: Option<Language>,
}

/// Load the explicit config, or one discovered in the working directory.
fn load_config(explicit: Option<&Path>) -> anyhow::Result<Config> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => Config::discover(Path::new(".")),
    };

    match path {
        Some(path) => {
            info!(config = %path.display(), "loading config");
            Config::parse_file(&path)
        }
        None => {
            debug!(
                "no config file found (looked for {})",
                DEFAULT_CONFIG_NAMES.join(", ")
            );
            Ok(Config::default())
        }
    }
}

/// Run the analyze command.
pub fn run_analyze(args: &AnalyzeArgs) -> anyhow::Result<i32> {
    if args.format != "pretty" && args.format != "json" {
        anyhow::bail!("invalid format {:?} (use pretty or json)", args.format);
    }
    if !args.path.exists() {
        anyhow::bail!("path does not exist: {}", args.path.display());
    }

    let config = load_config(args.config.as_deref())?;
    let analyzer = Analyzer::from_config(&config)?;

    let files = batch::collect_files(&args.path, &config, &analyzer)?;
    info!(files = files.len(), path = %args.path.display(), "analyzing");

    let base = if args.path.is_file() {
        args.path.parent().unwrap_or(Path::new(""))
    } else {
        args.path.as_path()
    };
    let results = batch::analyze_files(&analyzer, &files, base, args.language);

    let display_path = args.path.display().to_string();
    match args.format.as_str() {
        "json" => report::write_json(&display_path, &results)?,
        _ => report::write_pretty(&display_path, &results)?,
    }

    Ok(EXIT_SUCCESS)
}

/// Run the rules command.
pub fn run_rules(args: &RulesArgs) -> anyhow::Result<i32> {
    let languages: Vec<Language> = match args.language {
        Some(language) => vec![language],
        None => Language::ALL.to_vec(),
    };

    for language in languages {
        let extractor = get_extractor(language);
        println!("{}", language);
        for kind in [RuleKind::LanguageFeature, RuleKind::SecurityInsight] {
            println!("  {}:", kind.as_str());
            for rule in extractor.rules(kind).rules() {
                println!("    {:<48} {}", rule.pattern(), rule.label());
            }
        }
        println!();
    }

    Ok(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_analyze_args() {
        let cli = Cli::parse_from([
            "contractscope",
            "analyze",
            "contracts",
            "--language",
            "move",
            "--format",
            "json",
        ]);
        assert_eq!(cli.log_level, "warn");
        match cli.command {
            Commands::Analyze(args) => {
                assert_eq!(args.path, PathBuf::from("contracts"));
                assert_eq!(args.language, Some(Language::Move));
                assert_eq!(args.format, "json");
                assert!(args.config.is_none());
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_unsupported_language_rejected() {
        let result = Cli::try_parse_from(["contractscope", "analyze", ".", "-l", "solidity"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_format_is_error() {
        let args = AnalyzeArgs {
            path: PathBuf::from("."),
            language: None,
            format: "sarif".to_string(),
            config: None,
        };
        let err = run_analyze(&args).unwrap_err();
        assert!(err.to_string().contains("sarif"));
    }
}
