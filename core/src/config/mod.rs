mod env_file;
mod load;
mod types;

pub use env_file::{load_env_file, EnvFileStatus, ENV_FILE_NAME};
pub use load::{
    apply_env_overrides, load_default, load_from, read_config_file, DEFAULT_CONFIG_FILE,
};
pub use types::{AppConfig, ExecutionConfig, InterpreterConfig, PathsConfig, ResolvedPaths};
