//! Module aggregation: language dispatch plus assembly of `ParsedModule`.

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use super::languages::{self, generic};
use super::{Language, LanguageExtractor, ModuleKind, ParsedModule, RuleKind, RuleTable};
use crate::config::Config;
use crate::error::AnalyzeError;

/// Stateless analyzer front end.
///
/// An `Analyzer` carries only immutable configuration (extension mappings and
/// additional rule tables), so one instance can serve any number of threads.
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    extension_overrides: HashMap<String, Language>,
    extra_rules: HashMap<(Language, RuleKind), RuleTable>,
}

impl Analyzer {
    /// Create an analyzer using only the built-in extractors and rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an analyzer from a loaded configuration, compiling its rules.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let mut analyzer = Self::new();

        for (ext, language) in &config.extensions {
            analyzer = analyzer.with_extension(ext, *language);
        }

        for (language, rules) in &config.rules {
            let features = RuleTable::from_specs(&rules.features)
                .map_err(|e| anyhow::anyhow!("{} feature rules: {}", language, e))?;
            let insights = RuleTable::from_specs(&rules.insights)
                .map_err(|e| anyhow::anyhow!("{} insight rules: {}", language, e))?;
            analyzer = analyzer
                .with_rules(*language, RuleKind::LanguageFeature, features)
                .with_rules(*language, RuleKind::SecurityInsight, insights);
        }

        Ok(analyzer)
    }

    /// Map an additional file extension (without dot) to a language.
    pub fn with_extension(mut self, ext: &str, language: Language) -> Self {
        let ext = ext.trim_start_matches('.').to_lowercase();
        self.extension_overrides.insert(ext, language);
        self
    }

    /// Append rules evaluated after the built-in table for `language`.
    pub fn with_rules(mut self, language: Language, kind: RuleKind, table: RuleTable) -> Self {
        if !table.is_empty() {
            self.extra_rules.insert((language, kind), table);
        }
        self
    }

    /// Infer the language of a file from its extension.
    pub fn detect_language(&self, file_name: &str) -> Option<Language> {
        let ext = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())?
            .to_lowercase();

        if let Some(language) = self.extension_overrides.get(&ext) {
            return Some(*language);
        }
        languages::get_extractor_for_extension(&ext).map(|e| e.language())
    }

    /// Analyze source text.
    ///
    /// Never fails: unknown languages fall back to generic scanning and
    /// malformed declarations simply yield less output.
    pub fn analyze(&self, source: &str, file_name: &str, hint: Option<Language>) -> ParsedModule {
        let name = module_name(file_name);
        let language = hint.or_else(|| self.detect_language(file_name));

        let mut module = match language {
            Some(language) => self.extract(languages::get_extractor(language), source, &name),
            None => extract_generic(source, &name),
        };
        module.total_lines = count_lines(source);
        module.refresh_metrics();

        debug!(
            file = file_name,
            language = language.map(|l| l.as_str()).unwrap_or("unknown"),
            functions = module.complexity_metrics.function_count,
            structs = module.complexity_metrics.struct_count,
            constants = module.complexity_metrics.const_count,
            complexity = module.complexity_metrics.cyclomatic_complexity,
            "analyzed module"
        );

        module
    }

    /// Analyze raw bytes with an optional textual language hint.
    ///
    /// Fails with `InvalidInput` when the bytes are not UTF-8 or the hint
    /// names an unsupported language.
    pub fn analyze_bytes(
        &self,
        bytes: &[u8],
        file_name: &str,
        hint: Option<&str>,
    ) -> Result<ParsedModule, AnalyzeError> {
        let source = std::str::from_utf8(bytes).map_err(|e| {
            AnalyzeError::InvalidInput(format!("{} is not valid UTF-8: {}", file_name, e))
        })?;
        let hint = hint.map(str::parse::<Language>).transpose()?;
        Ok(self.analyze(source, file_name, hint))
    }

    fn extract(
        &self,
        extractor: &dyn LanguageExtractor,
        source: &str,
        name: &str,
    ) -> ParsedModule {
        let language = extractor.language();
        let imports = extractor.extract_imports(source);

        let mut language_features = extractor.detect_features(source);
        let mut security_insights = extractor.detect_insights(source);
        if let Some(table) = self.extra_rules.get(&(language, RuleKind::LanguageFeature)) {
            table.evaluate_into(source, &mut language_features);
        }
        if let Some(table) = self.extra_rules.get(&(language, RuleKind::SecurityInsight)) {
            table.evaluate_into(source, &mut security_insights);
        }

        ParsedModule {
            functions: extractor.extract_functions(source),
            structs: extractor.extract_structs(source),
            constants: extractor.extract_constants(source),
            doc_comments: extractor.module_doc_comments(source),
            imports: imports.imports,
            dependencies: imports.dependencies,
            security_insights,
            language_features,
            ..ParsedModule::empty(name, extractor.module_kind())
        }
    }
}

/// Analyze with the default analyzer.
pub fn analyze(source: &str, file_name: &str, hint: Option<Language>) -> ParsedModule {
    Analyzer::new().analyze(source, file_name, hint)
}

fn extract_generic(source: &str, name: &str) -> ParsedModule {
    ParsedModule {
        functions: generic::extract_functions(source),
        security_insights: vec![generic::GENERIC_PARSING_INSIGHT.to_string()],
        language_features: vec![generic::UNKNOWN_LANGUAGE_FEATURE.to_string()],
        ..ParsedModule::empty(name, ModuleKind::RustCrate)
    }
}

/// File name without directories or extension.
fn module_name(file_name: &str) -> String {
    Path::new(file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| file_name.to_string())
}

/// Number of lines, counting a trailing partial line; empty text has one.
fn count_lines(source: &str) -> usize {
    source.matches('\n').count() + 1
}
