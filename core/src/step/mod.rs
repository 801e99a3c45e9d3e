mod defaults;
mod types;

pub use defaults::reference_pipeline;
pub use types::{OutputStatus, StepDefinition, StepError, StepOutcome, MISSING_FILE, PARSE_ERROR};
