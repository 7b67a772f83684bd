//! Validation engine for analysis specs.
//!
//! The engine runs all registered [`ValidationRule`]s against an
//! [`AnalysisSpec`] and collects every diagnostic into a
//! [`ValidationReport`]. It never short-circuits on the first error, so
//! users see all problems at once.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use kotoba_graph::pipeline::validation::ValidationEngine;
//!
//! let engine = ValidationEngine::with_defaults();
//! let report = engine.validate(&spec);
//! if report.has_errors() {
//!     for err in report.errors() {
//!         eprintln!("{err}");
//!     }
//! }
//! ```

use serde::Serialize;

use super::error_code::ErrorCode;
use super::errors::SpecError;
use super::spec::{AnalysisSpec, PRESETS, SPEC_VERSION};
use crate::types::LexicalCategory;

// ─── Severity ───────────────────────────────────────────────────────────────

/// Whether a diagnostic is a hard error or a soft warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

// ─── Diagnostic ─────────────────────────────────────────────────────────────

/// A single validation finding attached to a [`SpecError`].
#[derive(Debug, Clone, Serialize)]
pub struct ValidationDiagnostic {
    pub severity: Severity,
    #[serde(flatten)]
    pub error: SpecError,
}

impl ValidationDiagnostic {
    pub fn error(err: SpecError) -> Self {
        Self {
            severity: Severity::Error,
            error: err,
        }
    }

    pub fn warning(err: SpecError) -> Self {
        Self {
            severity: Severity::Warning,
            error: err,
        }
    }
}

// ─── Report ─────────────────────────────────────────────────────────────────

/// Collected diagnostics from running all validation rules.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    /// Iterate over error-severity diagnostics.
    pub fn errors(&self) -> impl Iterator<Item = &SpecError> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .map(|d| &d.error)
    }

    /// Iterate over warning-severity diagnostics.
    pub fn warnings(&self) -> impl Iterator<Item = &SpecError> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .map(|d| &d.error)
    }

    /// Returns `true` if any diagnostic is an error.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Returns `true` if there are no errors (warnings are acceptable).
    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }

    /// Total number of diagnostics (errors + warnings).
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Returns `true` if there are no diagnostics at all.
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// All errors on one line, for error messages.
    pub fn summary(&self) -> String {
        let errors: Vec<String> = self.errors().map(ToString::to_string).collect();
        if errors.is_empty() {
            "no errors".to_string()
        } else {
            errors.join("; ")
        }
    }
}

// ─── Rule trait ─────────────────────────────────────────────────────────────

/// A single validation rule that inspects an [`AnalysisSpec`] and returns
/// zero or more diagnostics.
///
/// Rules are stateless and must be `Send + Sync` so one engine can be shared
/// across threads.
pub trait ValidationRule: Send + Sync {
    /// Short, stable identifier for this rule (e.g., `"limits"`).
    fn name(&self) -> &str;

    /// Inspect `spec` and return any findings.
    fn validate(&self, spec: &AnalysisSpec) -> Vec<ValidationDiagnostic>;
}

// ─── Engine ─────────────────────────────────────────────────────────────────

/// Runs a set of [`ValidationRule`]s against an [`AnalysisSpec`].
pub struct ValidationEngine {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl ValidationEngine {
    /// Create an empty engine with no rules.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Create an engine pre-loaded with the default rule set.
    pub fn with_defaults() -> Self {
        let mut engine = Self::new();
        engine.add_rule(Box::new(VersionRule));
        engine.add_rule(Box::new(PresetRule));
        engine.add_rule(Box::new(LimitsRule));
        engine.add_rule(Box::new(KeepCategoriesRule));
        engine.add_rule(Box::new(UnknownFieldsRule));
        engine
    }

    /// Register an additional rule.
    pub fn add_rule(&mut self, rule: Box<dyn ValidationRule>) {
        self.rules.push(rule);
    }

    /// Names of the registered rules, in run order.
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Run all rules against `spec` and return the collected report.
    pub fn validate(&self, spec: &AnalysisSpec) -> ValidationReport {
        let mut report = ValidationReport::default();
        for rule in &self.rules {
            report.diagnostics.extend(rule.validate(spec));
        }
        report
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Concrete rules
// ═══════════════════════════════════════════════════════════════════════════

// ─── 1. Only version 1 is understood ────────────────────────────────────────

struct VersionRule;

impl ValidationRule for VersionRule {
    fn name(&self) -> &str {
        "version"
    }

    fn validate(&self, spec: &AnalysisSpec) -> Vec<ValidationDiagnostic> {
        if spec.v == SPEC_VERSION {
            return vec![];
        }
        vec![ValidationDiagnostic::error(
            SpecError::new(
                ErrorCode::UnsupportedVersion,
                "/v",
                format!("unsupported spec version {}", spec.v),
            )
            .with_hint(format!("Set \"v\": {SPEC_VERSION}")),
        )]
    }
}

// ─── 2. Preset must be known ────────────────────────────────────────────────

struct PresetRule;

impl ValidationRule for PresetRule {
    fn name(&self) -> &str {
        "preset"
    }

    fn validate(&self, spec: &AnalysisSpec) -> Vec<ValidationDiagnostic> {
        match spec.preset.as_deref() {
            Some(name) if !PRESETS.contains(&name) => vec![ValidationDiagnostic::error(
                SpecError::new(
                    ErrorCode::UnknownPreset,
                    "/preset",
                    format!("unknown preset \"{name}\""),
                )
                .with_hint(format!("Use one of: {}", PRESETS.join(", "))),
            )],
            _ => vec![],
        }
    }
}

// ─── 3. Ranking sizes: negative is an error, zero a warning ─────────────────

struct LimitsRule;

impl ValidationRule for LimitsRule {
    fn name(&self) -> &str {
        "limits"
    }

    fn validate(&self, spec: &AnalysisSpec) -> Vec<ValidationDiagnostic> {
        let mut out = Vec::new();

        let checks: &[(&str, Option<i64>)] = &[
            ("frequency_top_n", spec.frequency_top_n),
            ("pair_top_k", spec.pair_top_k),
        ];

        for &(field, value) in checks {
            match value {
                Some(v) if v < 0 => out.push(ValidationDiagnostic::error(
                    SpecError::new(
                        ErrorCode::InvalidValue,
                        format!("/{field}"),
                        format!("{field} must not be negative (got {v})"),
                    )
                    .with_hint(format!("Remove {field} to use the preset value")),
                )),
                Some(0) => out.push(ValidationDiagnostic::warning(SpecError::new(
                    ErrorCode::InvalidValue,
                    format!("/{field}"),
                    format!("{field} is 0; the result will be empty"),
                ))),
                _ => {}
            }
        }

        out
    }
}

// ─── 4. Keep-set must be non-empty; unknown labels are suspicious ───────────

struct KeepCategoriesRule;

impl ValidationRule for KeepCategoriesRule {
    fn name(&self) -> &str {
        "keep_categories"
    }

    fn validate(&self, spec: &AnalysisSpec) -> Vec<ValidationDiagnostic> {
        let Some(categories) = &spec.keep_categories else {
            return vec![];
        };

        if categories.iter().all(|c| c.trim().is_empty()) {
            return vec![ValidationDiagnostic::error(
                SpecError::new(
                    ErrorCode::MissingValue,
                    "/keep_categories",
                    "at least one lexical category must be kept",
                )
                .with_hint("Remove keep_categories to use the preset, or add \"noun\""),
            )];
        }

        categories
            .iter()
            .enumerate()
            .filter_map(|(i, raw)| match raw.parse::<LexicalCategory>() {
                Ok(LexicalCategory::Other(label)) => Some(ValidationDiagnostic::warning(
                    SpecError::new(
                        ErrorCode::UnknownCategory,
                        format!("/keep_categories/{i}"),
                        format!("\"{label}\" is not a known lexical category"),
                    )
                    .with_hint("It is kept verbatim and only matches identical dictionary labels"),
                )),
                _ => None,
            })
            .collect()
    }
}

// ─── 5. Unknown fields (strict → error, non-strict → warning) ──────────────

struct UnknownFieldsRule;

impl ValidationRule for UnknownFieldsRule {
    fn name(&self) -> &str {
        "unknown_fields"
    }

    fn validate(&self, spec: &AnalysisSpec) -> Vec<ValidationDiagnostic> {
        let diag_fn = if spec.strict {
            ValidationDiagnostic::error
        } else {
            ValidationDiagnostic::warning
        };
        let mut keys: Vec<&String> = spec.unknown_fields.keys().collect();
        keys.sort();
        keys.into_iter()
            .map(|key| {
                diag_fn(
                    SpecError::new(
                        ErrorCode::UnknownField,
                        format!("/{key}"),
                        format!("unrecognized field \"{key}\""),
                    )
                    .with_hint("Check spelling or remove this field"),
                )
            })
            .collect()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(json: &str) -> AnalysisSpec {
        serde_json::from_str(json).unwrap()
    }

    fn engine() -> ValidationEngine {
        ValidationEngine::with_defaults()
    }

    // ─── Valid specs ────────────────────────────────────────────────────

    #[test]
    fn test_minimal_spec_is_valid() {
        let report = engine().validate(&spec(r#"{ "v": 1 }"#));
        assert!(report.is_valid());
        assert!(report.is_empty());
        assert_eq!(report.summary(), "no errors");
    }

    #[test]
    fn test_known_presets_are_valid() {
        for preset in PRESETS {
            let json = format!(r#"{{ "v": 1, "preset": "{preset}" }}"#);
            assert!(engine().validate(&spec(&json)).is_valid(), "{preset}");
        }
    }

    #[test]
    fn test_default_rule_order() {
        assert_eq!(
            engine().rule_names(),
            vec!["version", "preset", "limits", "keep_categories", "unknown_fields"]
        );
    }

    // ─── Errors ─────────────────────────────────────────────────────────

    #[test]
    fn test_unsupported_version() {
        let report = engine().validate(&spec(r#"{ "v": 2 }"#));
        let err = report.errors().next().unwrap();
        assert_eq!(err.code, ErrorCode::UnsupportedVersion);
        assert_eq!(err.path, "/v");
    }

    #[test]
    fn test_unknown_preset() {
        let report = engine().validate(&spec(r#"{ "v": 1, "preset": "sentiment" }"#));
        let err = report.errors().next().unwrap();
        assert_eq!(err.code, ErrorCode::UnknownPreset);
        assert!(err.hint.as_deref().unwrap().contains("cooccurrence"));
    }

    #[test]
    fn test_negative_limits_are_errors() {
        let report = engine().validate(&spec(
            r#"{ "v": 1, "frequency_top_n": -1, "pair_top_k": -200 }"#,
        ));
        let paths: Vec<&str> = report.errors().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["/frequency_top_n", "/pair_top_k"]);
        assert!(report.summary().contains("pair_top_k must not be negative"));
    }

    #[test]
    fn test_zero_limit_is_warning() {
        let report = engine().validate(&spec(r#"{ "v": 1, "pair_top_k": 0 }"#));
        assert!(report.is_valid());
        assert_eq!(report.warnings().count(), 1);
    }

    #[test]
    fn test_empty_keep_categories() {
        let report = engine().validate(&spec(r#"{ "v": 1, "keep_categories": [] }"#));
        let err = report.errors().next().unwrap();
        assert_eq!(err.code, ErrorCode::MissingValue);
        assert_eq!(err.path, "/keep_categories");
    }

    #[test]
    fn test_unknown_category_is_warning() {
        let report = engine().validate(&spec(
            r#"{ "v": 1, "keep_categories": ["noun", "フィラー"] }"#,
        ));
        assert!(report.is_valid());
        let warn = report.warnings().next().unwrap();
        assert_eq!(warn.code, ErrorCode::UnknownCategory);
        assert_eq!(warn.path, "/keep_categories/1");
    }

    #[test]
    fn test_japanese_category_labels_are_known() {
        let report = engine().validate(&spec(
            r#"{ "v": 1, "keep_categories": ["名詞", "動詞", "形容詞"] }"#,
        ));
        assert!(report.is_empty());
    }

    // ─── Unknown fields ─────────────────────────────────────────────────

    #[test]
    fn test_unknown_field_warning_when_lenient() {
        let report = engine().validate(&spec(r#"{ "v": 1, "colour": "red" }"#));
        assert!(report.is_valid());
        assert_eq!(report.warnings().next().unwrap().path, "/colour");
    }

    #[test]
    fn test_unknown_field_error_when_strict() {
        let report = engine().validate(&spec(r#"{ "v": 1, "strict": true, "colour": "red" }"#));
        assert!(report.has_errors());
        assert_eq!(report.errors().next().unwrap().code, ErrorCode::UnknownField);
    }

    #[test]
    fn test_all_problems_reported_together() {
        let report = engine().validate(&spec(
            r#"{ "v": 9, "preset": "nope", "pair_top_k": -1, "strict": true, "x": 1 }"#,
        ));
        assert_eq!(report.errors().count(), 4);
    }

    #[test]
    fn test_report_serializes_flat() {
        let report = engine().validate(&spec(r#"{ "v": 2 }"#));
        let json = serde_json::to_value(&report).unwrap();
        let diag = &json["diagnostics"][0];
        assert_eq!(diag["severity"], "error");
        assert_eq!(diag["code"], "unsupported_version");
        assert_eq!(diag["path"], "/v");
    }

    #[test]
    fn test_custom_rule() {
        struct NoStrict;
        impl ValidationRule for NoStrict {
            fn name(&self) -> &str {
                "no_strict"
            }
            fn validate(&self, spec: &AnalysisSpec) -> Vec<ValidationDiagnostic> {
                if spec.strict {
                    vec![ValidationDiagnostic::warning(SpecError::new(
                        ErrorCode::InvalidValue,
                        "/strict",
                        "strict mode is discouraged",
                    ))]
                } else {
                    vec![]
                }
            }
        }

        let mut engine = ValidationEngine::new();
        engine.add_rule(Box::new(NoStrict));
        let report = engine.validate(&spec(r#"{ "v": 1, "strict": true }"#));
        assert_eq!(report.len(), 1);
    }
}
