//! Locating and sanity-checking the script interpreter (`Rscript`).

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::InterpreterConfig;
use crate::error::SetupError;
use crate::runner::{run_process, ProcessSpec};

#[cfg(windows)]
const PLATFORM_DEFAULTS: &[&str] = &[
    r"C:\Program Files\R\R-4.5.1\bin\x64\Rscript.exe",
    r"C:\Program Files\R\R-4.4.2\bin\x64\Rscript.exe",
    r"C:\Program Files\R\R-4.4.0\bin\x64\Rscript.exe",
];

#[cfg(not(windows))]
const PLATFORM_DEFAULTS: &[&str] = &["/usr/bin/Rscript", "/usr/local/bin/Rscript"];

#[cfg(windows)]
const PATH_NAMES: &[&str] = &["Rscript.exe", "Rscript"];

#[cfg(not(windows))]
const PATH_NAMES: &[&str] = &["Rscript"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpreterSource {
    Config,
    Env,
    PlatformDefault,
    SearchPath,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedInterpreter {
    pub path: PathBuf,
    pub source: InterpreterSource,
}

pub fn resolve_interpreter(cfg: &InterpreterConfig) -> Result<ResolvedInterpreter, SetupError> {
    resolve_with(
        cfg,
        |k| std::env::var(k).ok(),
        |p| p.is_file(),
        |name| which::which(name).ok(),
    )
}

/// Explicit config value, then the env var, then platform install locations, then `PATH`.
pub fn resolve_with<E, X, W>(
    cfg: &InterpreterConfig,
    env: E,
    exists: X,
    search: W,
) -> Result<ResolvedInterpreter, SetupError>
where
    E: Fn(&str) -> Option<String>,
    X: Fn(&Path) -> bool,
    W: Fn(&str) -> Option<PathBuf>,
{
    let explicit = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());

    if let Some(path) = explicit(cfg.path.clone()) {
        return Ok(ResolvedInterpreter {
            path: path.into(),
            source: InterpreterSource::Config,
        });
    }
    if let Some(path) = explicit(env(&cfg.env_var)) {
        return Ok(ResolvedInterpreter {
            path: path.into(),
            source: InterpreterSource::Env,
        });
    }
    if let Some(path) = PLATFORM_DEFAULTS.iter().map(Path::new).find(|p| exists(*p)) {
        return Ok(ResolvedInterpreter {
            path: path.to_path_buf(),
            source: InterpreterSource::PlatformDefault,
        });
    }
    if let Some(path) = PATH_NAMES.iter().find_map(|name| search(*name)) {
        return Ok(ResolvedInterpreter {
            path,
            source: InterpreterSource::SearchPath,
        });
    }

    let mut tried = vec![format!("${}", cfg.env_var)];
    tried.extend(PLATFORM_DEFAULTS.iter().map(|s| s.to_string()));
    tried.extend(PATH_NAMES.iter().map(|s| format!("PATH:{s}")));
    Err(SetupError::InterpreterNotFound {
        tried: tried.join(", "),
    })
}

/// Run `<path> --version` and return the first non-empty line of its output.
pub async fn verify_interpreter(path: &Path, timeout: Duration) -> Result<String, SetupError> {
    let unusable = |reason: String| SetupError::InterpreterUnusable {
        path: path.display().to_string(),
        reason,
    };

    let spec = ProcessSpec {
        program: path.to_path_buf(),
        args: vec!["--version".to_string()],
        cwd: None,
        timeout,
    };
    let output = run_process(&spec).await.map_err(|e| unusable(e.to_string()))?;
    if output.exit_code != 0 {
        return Err(unusable(format!(
            "exit code {}: {}",
            output.exit_code,
            output.stderr.trim()
        )));
    }

    // Rscript prints its version banner on stderr.
    let version = first_line(&output.stdout)
        .or_else(|| first_line(&output.stderr))
        .unwrap_or_default();
    Ok(version.to_string())
}

fn first_line(s: &str) -> Option<&str> {
    s.lines().map(str::trim).find(|l| !l.is_empty())
}
