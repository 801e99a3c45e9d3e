//! Stable re-exports for consumers (`cli` and integration tests).
//!
//! Prefer importing from `collector_core::api` instead of reaching into internal modules.

pub use crate::archive::{ArchiveStatus, Archiver};
pub use crate::config::{
    load_env_file, read_config_file, apply_env_overrides, AppConfig, EnvFileStatus,
    ExecutionConfig, InterpreterConfig, PathsConfig, ResolvedPaths,
};
pub use crate::error::{ConfigError, ReportError, SetupError};
pub use crate::interpreter::{
    resolve_interpreter, verify_interpreter, InterpreterSource, ResolvedInterpreter,
};
pub use crate::pipeline::Pipeline;
pub use crate::preflight::{check_scripts, ensure_directories, missing_scripts};
pub use crate::report::ReportWriter;
pub use crate::retry::{RetryController, RetryPolicy, RetryState, Sleeper, TokioSleeper};
pub use crate::runner::{StepExecutor, StepRunner};
pub use crate::step::{OutputStatus, StepDefinition, StepError, StepOutcome};
pub use crate::summary::{RunStatus, RunSummary, EXIT_FAILURE, EXIT_INTERRUPTED, EXIT_SUCCESS};
pub use crate::verify::verify_output;
