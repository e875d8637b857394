//! Pipeline configuration.
//!
//! Supports loading configuration from:
//! 1. Configuration files (YAML)
//! 2. Environment variables (with `KICKBACK_` prefix)
//!
//! Configuration precedence (highest to lowest):
//! 1. Environment variables
//! 2. Configuration file
//! 3. Default values
//!
//! Raw values are kept as signed integers so that out-of-range input is
//! reported as a configuration error by [`PipelineConfig::validate`] rather
//! than as a parse failure.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::amplifier::FlipMode;
use crate::assembler::{DEFAULT_CONFIDENCE, check_complement};
use crate::error::{OracleError, OracleResult};
use crate::predicate::{MarkedSet, check_width};

/// Complete pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Number of data qubits `n`.
    #[serde(default = "default_register_width")]
    pub register_width: i64,

    /// Members of the marked set `S_n`.
    #[serde(default = "default_marked_set")]
    pub marked_set: Vec<i64>,

    /// Threshold `Σ_T`; any integer.
    #[serde(default = "default_threshold")]
    pub threshold: i64,

    /// Rounds of oracle + diffusion.
    #[serde(default = "default_grover_iterations")]
    pub grover_iterations: i64,

    /// Value assigned outside the marked set (0 or 1).
    #[serde(default)]
    pub complement_value: i64,

    /// Shots per executed circuit.
    #[serde(default = "default_shots")]
    pub shots: i64,

    /// Share of all-zero outcomes needed for a `Constant` verdict.
    #[serde(default = "default_confidence")]
    pub confidence: f64,

    /// Marking strategy for the Grover stage.
    #[serde(default)]
    pub flip: FlipMode,

    /// Measure the ancillas under their own label.
    #[serde(default = "default_true")]
    pub measure_ancillas: bool,

    /// Apply an H layer to the data between the Grover and DJ stages.
    #[serde(default)]
    pub reprepare_superposition: bool,

    /// Also execute the stand-alone Grover circuit (advisory).
    #[serde(default)]
    pub execute_grover_stage: bool,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive: "trace", "debug", "info", "warn", "error", or a
    /// full `EnvFilter` expression.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable console output.
    #[default]
    Console,
    /// One JSON object per event.
    Json,
}

// Default value functions
fn default_register_width() -> i64 {
    7
}

fn default_marked_set() -> Vec<i64> {
    vec![13, 78, 99]
}

fn default_threshold() -> i64 {
    64
}

fn default_grover_iterations() -> i64 {
    1
}

fn default_shots() -> i64 {
    512
}

fn default_confidence() -> f64 {
    DEFAULT_CONFIDENCE
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_log_level(),
            format: LogFormat::Console,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            register_width: default_register_width(),
            marked_set: default_marked_set(),
            threshold: default_threshold(),
            grover_iterations: default_grover_iterations(),
            complement_value: 0,
            shots: default_shots(),
            confidence: default_confidence(),
            flip: FlipMode::default(),
            measure_ancillas: true,
            reprepare_superposition: false,
            execute_grover_stage: false,
            logging: LoggingConfig::default(),
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, raw: &str) -> OracleResult<T>
where
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| OracleError::Configuration(format!("{key}={raw:?}: {e}")))
}

fn positive_u32(name: &str, value: i64) -> OracleResult<u32> {
    match u32::try_from(value) {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(OracleError::Configuration(format!(
            "{name} must be a positive integer, got {value}"
        ))),
    }
}

impl PipelineConfig {
    /// Parse configuration from YAML text. Missing keys take defaults.
    pub fn from_yaml_str(contents: &str) -> OracleResult<Self> {
        serde_yaml_ng::from_str(contents)
            .map_err(|e| OracleError::Configuration(format!("invalid configuration: {e}")))
    }

    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> OracleResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            OracleError::Configuration(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&contents)
    }

    /// Load configuration with the following precedence:
    /// 1. Load from file if provided
    /// 2. Apply environment variable overrides
    pub fn load(config_file: Option<&Path>) -> OracleResult<Self> {
        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.merge_env()
    }

    /// Merge process environment variables into this configuration.
    pub fn merge_env(self) -> OracleResult<Self> {
        self.merge_env_with(|key| std::env::var(key).ok())
    }

    /// Merge overrides read through `lookup`.
    ///
    /// Only keys for which `lookup` returns a value override fields. A value
    /// that does not parse is a configuration error.
    pub fn merge_env_with(mut self, lookup: impl Fn(&str) -> Option<String>) -> OracleResult<Self> {
        if let Some(v) = lookup("KICKBACK_REGISTER_WIDTH") {
            self.register_width = parse_env("KICKBACK_REGISTER_WIDTH", &v)?;
        }
        if let Some(v) = lookup("KICKBACK_MARKED_SET") {
            self.marked_set = v
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| parse_env("KICKBACK_MARKED_SET", s))
                .collect::<OracleResult<_>>()?;
        }
        if let Some(v) = lookup("KICKBACK_THRESHOLD") {
            self.threshold = parse_env("KICKBACK_THRESHOLD", &v)?;
        }
        if let Some(v) = lookup("KICKBACK_GROVER_ITERATIONS") {
            self.grover_iterations = parse_env("KICKBACK_GROVER_ITERATIONS", &v)?;
        }
        if let Some(v) = lookup("KICKBACK_COMPLEMENT_VALUE") {
            self.complement_value = parse_env("KICKBACK_COMPLEMENT_VALUE", &v)?;
        }
        if let Some(v) = lookup("KICKBACK_SHOTS") {
            self.shots = parse_env("KICKBACK_SHOTS", &v)?;
        }
        if let Some(v) = lookup("KICKBACK_CONFIDENCE") {
            self.confidence = parse_env("KICKBACK_CONFIDENCE", &v)?;
        }
        if let Some(v) = lookup("KICKBACK_LOG_LEVEL") {
            self.logging.level = v;
        }
        Ok(self)
    }

    /// Check every parameter and produce a plan the pipeline can run.
    ///
    /// # Errors
    ///
    /// `Configuration` for a width outside `1..=63`, negative iterations,
    /// non-positive shots, a complement other than 0/1 or a confidence
    /// outside `(0, 1]`; `Domain` for a marked-set member outside the
    /// domain.
    pub fn validate(&self) -> OracleResult<RunPlan> {
        let width = u32::try_from(self.register_width).map_err(|_| {
            OracleError::Configuration(format!(
                "register width must be in 1..=63, got {}",
                self.register_width
            ))
        })?;
        check_width(width)?;

        let grover_iterations = u32::try_from(self.grover_iterations).map_err(|_| {
            OracleError::Configuration(format!(
                "grover iterations must be a non-negative integer, got {}",
                self.grover_iterations
            ))
        })?;
        let shots = positive_u32("shots", self.shots)?;
        check_complement(self.complement_value)?;
        if !(self.confidence > 0.0 && self.confidence <= 1.0) {
            return Err(OracleError::Configuration(format!(
                "confidence must be in (0, 1], got {}",
                self.confidence
            )));
        }
        let marked_set = MarkedSet::new(width, self.marked_set.iter().copied())?;

        Ok(RunPlan {
            width,
            marked_set,
            threshold: self.threshold,
            grover_iterations,
            complement: self.complement_value,
            shots,
            confidence: self.confidence,
            flip: self.flip,
            measure_ancillas: self.measure_ancillas,
            reprepare_superposition: self.reprepare_superposition,
            execute_grover_stage: self.execute_grover_stage,
        })
    }
}

/// A validated set of run parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct RunPlan {
    width: u32,
    marked_set: MarkedSet,
    threshold: i64,
    grover_iterations: u32,
    complement: i64,
    shots: u32,
    confidence: f64,
    flip: FlipMode,
    measure_ancillas: bool,
    reprepare_superposition: bool,
    execute_grover_stage: bool,
}

impl RunPlan {
    /// Register width `n`.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// The marked set `S_n`.
    pub fn marked_set(&self) -> &MarkedSet {
        &self.marked_set
    }

    /// Threshold `Σ_T`.
    pub fn threshold(&self) -> i64 {
        self.threshold
    }

    /// Grover rounds.
    pub fn grover_iterations(&self) -> u32 {
        self.grover_iterations
    }

    /// Complement value, 0 or 1.
    pub fn complement(&self) -> i64 {
        self.complement
    }

    /// Shots per executed circuit.
    pub fn shots(&self) -> u32 {
        self.shots
    }

    /// Verdict confidence.
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Grover marking strategy.
    pub fn flip(&self) -> FlipMode {
        self.flip
    }

    /// Whether ancillas are measured.
    pub fn measure_ancillas(&self) -> bool {
        self.measure_ancillas
    }

    /// Whether an H layer separates the stages.
    pub fn reprepare_superposition(&self) -> bool {
        self.reprepare_superposition
    }

    /// Whether the stand-alone Grover circuit is executed too.
    pub fn execute_grover_stage(&self) -> bool {
        self.execute_grover_stage
    }

    /// The same plan with another complement value.
    pub fn with_complement(&self, complement: i64) -> OracleResult<Self> {
        check_complement(complement)?;
        Ok(Self {
            complement,
            ..self.clone()
        })
    }

    /// The same plan with another shot count.
    pub fn with_shots(&self, shots: i64) -> OracleResult<Self> {
        Ok(Self {
            shots: positive_u32("shots", shots)?,
            ..self.clone()
        })
    }

    /// The same plan with the stand-alone Grover circuit executed or not.
    #[must_use]
    pub fn with_grover_stage(&self, execute: bool) -> Self {
        Self {
            execute_grover_stage: execute,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.register_width, 7);
        assert_eq!(config.marked_set, vec![13, 78, 99]);
        assert_eq!(config.threshold, 64);
        assert_eq!(config.grover_iterations, 1);
        assert_eq!(config.complement_value, 0);
        assert_eq!(config.shots, 512);
        assert_eq!(config.flip, FlipMode::Ancilla);
        assert_eq!(config.logging.format, LogFormat::Console);

        let plan = config.validate().unwrap();
        assert_eq!(plan.width(), 7);
        assert_eq!(plan.marked_set().len(), 3);
    }

    #[test]
    fn test_yaml_partial_uses_defaults() {
        let config = PipelineConfig::from_yaml_str(
            "register_width: 4\nmarked_set: [1, 9]\nflip: in_place\nlogging:\n  format: json\n",
        )
        .unwrap();
        assert_eq!(config.register_width, 4);
        assert_eq!(config.marked_set, vec![1, 9]);
        assert_eq!(config.flip, FlipMode::InPlace);
        assert_eq!(config.shots, 512);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_yaml_invalid() {
        assert!(matches!(
            PipelineConfig::from_yaml_str("shots: [not, a, number]"),
            Err(OracleError::Configuration(_))
        ));
        assert!(matches!(
            PipelineConfig::from_file("/nonexistent/kickback.yaml"),
            Err(OracleError::Configuration(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let config = PipelineConfig::default()
            .merge_env_with(env(&[
                ("KICKBACK_REGISTER_WIDTH", "5"),
                ("KICKBACK_MARKED_SET", " 3, 17 ,30 "),
                ("KICKBACK_SHOTS", "1024"),
                ("KICKBACK_COMPLEMENT_VALUE", "1"),
                ("KICKBACK_LOG_LEVEL", "debug"),
            ]))
            .unwrap();
        assert_eq!(config.register_width, 5);
        assert_eq!(config.marked_set, vec![3, 17, 30]);
        assert_eq!(config.shots, 1024);
        assert_eq!(config.complement_value, 1);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.threshold, 64);
    }

    #[test]
    fn test_env_parse_error() {
        let err = PipelineConfig::default()
            .merge_env_with(env(&[("KICKBACK_SHOTS", "lots")]))
            .unwrap_err();
        assert!(matches!(err, OracleError::Configuration(_)));
    }

    #[test]
    fn test_env_overrides_file() {
        let file = PipelineConfig::from_yaml_str("threshold: 10\nshots: 64\n").unwrap();
        let merged = file
            .merge_env_with(env(&[("KICKBACK_THRESHOLD", "-3")]))
            .unwrap();
        assert_eq!(merged.threshold, -3);
        assert_eq!(merged.shots, 64);
    }

    #[test]
    fn test_validate_rejects() {
        let cases = [
            PipelineConfig {
                grover_iterations: -1,
                ..PipelineConfig::default()
            },
            PipelineConfig {
                shots: 0,
                ..PipelineConfig::default()
            },
            PipelineConfig {
                complement_value: 2,
                ..PipelineConfig::default()
            },
            PipelineConfig {
                register_width: 0,
                ..PipelineConfig::default()
            },
            PipelineConfig {
                register_width: 64,
                ..PipelineConfig::default()
            },
            PipelineConfig {
                confidence: 0.0,
                ..PipelineConfig::default()
            },
        ];
        for config in cases {
            assert!(
                matches!(config.validate(), Err(OracleError::Configuration(_))),
                "{config:?}"
            );
        }
    }

    #[test]
    fn test_validate_domain_error() {
        let config = PipelineConfig {
            register_width: 3,
            marked_set: vec![2, 8],
            ..PipelineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(OracleError::Domain { value: 8, width: 3 })
        ));
    }

    #[test]
    fn test_threshold_outside_domain_is_accepted() {
        let config = PipelineConfig {
            threshold: 10_000,
            ..PipelineConfig::default()
        };
        assert_eq!(config.validate().unwrap().threshold(), 10_000);
    }

    #[test]
    fn test_plan_variants() {
        let plan = PipelineConfig::default().validate().unwrap();
        assert_eq!(plan.with_complement(1).unwrap().complement(), 1);
        assert!(plan.with_complement(3).is_err());
        assert_eq!(plan.with_shots(8).unwrap().shots(), 8);
        assert!(plan.with_shots(-8).is_err());
        assert!(plan.with_grover_stage(true).execute_grover_stage());
    }
}
