use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{IcepackError, Result};
use crate::naming::{library_file_name, LIB_BASE};
use crate::native::NativeBackend;

/// Environment variable naming an explicit backend library file.
pub const LIB_ENV_VAR: &str = "ICEPACK_LIB";

/// Where to look for the native library, and in what order.
///
/// The resolver is a pure function of this config: there is no hidden
/// global state and nothing is cached across calls, so tests can hand it
/// a fully deterministic candidate list. [`SearchConfig::from_env`] builds
/// the conventional production config.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Caller-supplied library path, tried before everything else.
    pub explicit_path: Option<PathBuf>,
    /// Override from [`LIB_ENV_VAR`]. Must name a `base_name` library.
    pub override_path: Option<PathBuf>,
    /// Directories holding a library bundled with the distribution.
    pub bundled_dirs: Vec<PathBuf>,
    /// Conventional local-build output directories.
    pub build_dirs: Vec<PathBuf>,
    /// Base library name, `unice68` in production.
    pub base_name: String,
    /// Whether to finally ask the platform loader's own search path.
    pub use_system_path: bool,
}

impl SearchConfig {
    /// The conventional search order: `ICEPACK_LIB` override, then a
    /// library bundled next to the executable (or under its `lib/`
    /// subdirectory), then a local `build/` output, then the system
    /// loader path.
    pub fn from_env() -> Self {
        let mut bundled_dirs = Vec::new();
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                bundled_dirs.push(dir.to_path_buf());
                bundled_dirs.push(dir.join("lib"));
            }
        }
        Self {
            explicit_path: None,
            override_path: std::env::var_os(LIB_ENV_VAR).map(PathBuf::from),
            bundled_dirs,
            build_dirs: vec![PathBuf::from("build")],
            base_name: LIB_BASE.to_string(),
            use_system_path: true,
        }
    }
}

/// Walk the candidate locations and return the first backend that loads
/// and binds. Candidates that fail to load or lack a symbol are rejected
/// and the walk continues; only a malformed override aborts early.
pub fn resolve(config: &SearchConfig) -> Result<NativeBackend> {
    let file_name = library_file_name(&config.base_name)?;

    if let Some(path) = &config.explicit_path {
        if let Some(backend) = try_candidate(path, "explicit path") {
            return Ok(backend);
        }
    }

    if let Some(path) = &config.override_path {
        let names_base = path
            .file_name()
            .map(|n| n.to_string_lossy().contains(&config.base_name))
            .unwrap_or(false);
        if !names_base {
            return Err(IcepackError::InvalidOverride {
                path: path.clone(),
                base: config.base_name.clone(),
            });
        }
        if let Some(backend) = try_candidate(path, "environment override") {
            return Ok(backend);
        }
    }

    for dir in config.bundled_dirs.iter() {
        if let Some(backend) = try_candidate(&dir.join(&file_name), "bundled library") {
            return Ok(backend);
        }
    }

    for dir in config.build_dirs.iter() {
        if let Some(backend) = try_candidate(&dir.join(&file_name), "local build") {
            return Ok(backend);
        }
    }

    if config.use_system_path {
        // A bare file name defers to the loader's own search path.
        if let Some(backend) = try_candidate(Path::new(&file_name), "system path") {
            return Ok(backend);
        }
    }

    Err(IcepackError::BackendNotFound {
        base: config.base_name.clone(),
    })
}

fn try_candidate(path: &Path, source: &str) -> Option<NativeBackend> {
    // Bare names (no parent component) are handed straight to the loader;
    // real paths must exist before we bother dlopen-ing them.
    if path.parent().map_or(false, |p| !p.as_os_str().is_empty()) && !path.exists() {
        debug!(candidate = %path.display(), source, "candidate does not exist");
        return None;
    }
    match NativeBackend::load(path) {
        Ok(backend) => {
            debug!(candidate = %path.display(), source, "backend bound");
            Some(backend)
        }
        Err(err) => {
            debug!(candidate = %path.display(), source, %err, "candidate rejected");
            None
        }
    }
}
