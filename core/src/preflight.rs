//! Setup checks that must pass before the first step runs.

use crate::config::ResolvedPaths;
use crate::error::SetupError;
use crate::step::StepDefinition;

pub fn ensure_directories(paths: &ResolvedPaths) -> Result<(), SetupError> {
    for dir in paths.working_dirs() {
        std::fs::create_dir_all(dir).map_err(|source| SetupError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

pub fn missing_scripts(paths: &ResolvedPaths, steps: &[StepDefinition]) -> Vec<String> {
    steps
        .iter()
        .filter(|s| !paths.script_path(s).is_file())
        .map(|s| s.name.clone())
        .collect()
}

pub fn check_scripts(paths: &ResolvedPaths, steps: &[StepDefinition]) -> Result<(), SetupError> {
    let missing = missing_scripts(paths, steps);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(SetupError::MissingScripts(missing))
    }
}
