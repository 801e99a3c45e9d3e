use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One external-script invocation unit of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDefinition {
    /// Script file name, relative to the scripts directory. Unique per pipeline.
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Files the script is expected to (re)write inside the data directory.
    #[serde(default)]
    pub output_files: Vec<String>,

    #[serde(default)]
    pub critical: bool,
}

impl StepDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            output_files: Vec::new(),
            critical: false,
        }
    }

    pub fn with_outputs<I, S>(mut self, outputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.output_files = outputs.into_iter().map(Into::into).collect();
        self
    }

    pub fn critical(mut self, critical: bool) -> Self {
        self.critical = critical;
        self
    }

    /// Label used in log lines: the description when present, the script name otherwise.
    pub fn label(&self) -> &str {
        if self.description.trim().is_empty() {
            &self.name
        } else {
            &self.description
        }
    }
}

pub const MISSING_FILE: &str = "missing file";
pub const PARSE_ERROR: &str = "parse error";

/// Verification result for a single declared output file.
///
/// `valid` implies `exists`; a missing file is never valid and has zero records.
/// The constructors are the only way this crate builds one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputStatus {
    pub exists: bool,
    pub valid: bool,
    pub records: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OutputStatus {
    pub fn missing() -> Self {
        Self {
            exists: false,
            valid: false,
            records: 0,
            error: Some(MISSING_FILE.to_string()),
        }
    }

    pub fn unparseable() -> Self {
        Self {
            exists: true,
            valid: false,
            records: 0,
            error: Some(PARSE_ERROR.to_string()),
        }
    }

    pub fn parsed(records: usize) -> Self {
        Self {
            exists: true,
            valid: true,
            records,
            error: None,
        }
    }
}

/// Why an attempt failed before (or instead of) producing an exit code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StepError {
    #[error("missing script")]
    MissingScript,

    #[error("timeout")]
    Timeout,

    #[error("{0}")]
    Launch(String),
}

impl Serialize for StepError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for StepError {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(match s.as_str() {
            "missing script" => StepError::MissingScript,
            "timeout" => StepError::Timeout,
            _ => StepError::Launch(s),
        })
    }
}

/// Result of one execution attempt of one step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepOutcome {
    pub script: String,
    pub success: bool,

    #[serde(rename = "returncode", default, skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,

    /// Seconds.
    #[serde(default)]
    pub duration: f64,

    pub attempt: u32,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub output_files: IndexMap<String, OutputStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<StepError>,
}

impl StepOutcome {
    pub fn failed(script: impl Into<String>, attempt: u32, error: StepError) -> Self {
        Self {
            script: script.into(),
            success: false,
            exit_code: None,
            duration: 0.0,
            attempt,
            output_files: IndexMap::new(),
            error: Some(error),
        }
    }

    pub fn exited(script: impl Into<String>, attempt: u32, exit_code: i32, duration: f64) -> Self {
        Self {
            script: script.into(),
            success: false,
            exit_code: Some(exit_code),
            duration,
            attempt,
            output_files: IndexMap::new(),
            error: None,
        }
    }

    /// Attach verification results. Success requires a zero exit code and every output valid.
    pub fn with_outputs(mut self, outputs: IndexMap<String, OutputStatus>) -> Self {
        self.success = self.exit_code == Some(0) && outputs.values().all(|s| s.valid);
        self.output_files = outputs;
        self
    }

    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = duration;
        self
    }
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.error, self.exit_code) {
            (Some(err), _) => write!(f, "{} failed: {err}", self.script),
            (None, Some(code)) if self.success => {
                write!(f, "{} ok (exit {code}, {:.1}s)", self.script, self.duration)
            }
            (None, Some(0)) => write!(f, "{} produced invalid output", self.script),
            (None, Some(code)) => write!(f, "{} exited with code {code}", self.script),
            (None, None) => write!(f, "{} failed", self.script),
        }
    }
}
