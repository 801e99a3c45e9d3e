mod process;
mod step_runner;
mod traits;

pub use process::{decode_output, run_process, ProcessError, ProcessOutput, ProcessSpec};
pub use step_runner::StepRunner;
pub use traits::StepExecutor;
