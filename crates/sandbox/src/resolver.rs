//! SandboxResolver - confines log files to one base directory

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR_STR};
use tracing::{debug, instrument, warn};

use crate::error::SandboxError;

/// Owner read/write
pub const PERM_OWNER_ONLY: u32 = 0o600;
/// Owner read/write, group/world read
pub const PERM_WORLD_READ: u32 = 0o644;

/// Request for one sandboxed log file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandboxConfig {
    /// Bare file name, no separators
    pub filename: String,
    /// Open read-write with world-readable permissions
    pub allow_read: bool,
    /// Truncate instead of append
    pub clear_on_restart: bool,
}

impl SandboxConfig {
    pub fn new(filename: impl Into<String>, allow_read: bool, clear_on_restart: bool) -> Self {
        Self {
            filename: filename.into(),
            allow_read,
            clear_on_restart,
        }
    }

    /// Permission bits applied when the file is created
    pub fn permissions(&self) -> u32 {
        if self.allow_read {
            PERM_WORLD_READ
        } else {
            PERM_OWNER_ONLY
        }
    }
}

/// Opened log file and the resolved absolute path it was opened at
#[derive(Debug)]
pub struct SandboxedFile {
    pub file: File,
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
enum BaseDir {
    /// Directory of the running executable
    CurrentExe,
    /// Caller-pinned directory
    Fixed(PathBuf),
}

/// Resolves bare file names to files directly inside a base directory.
///
/// The base directory is re-resolved (symlinks included) on every
/// [`open`](Self::open), never cached.
#[derive(Debug, Clone)]
pub struct SandboxResolver {
    base: BaseDir,
}

impl Default for SandboxResolver {
    fn default() -> Self {
        Self::for_current_exe()
    }
}

impl SandboxResolver {
    /// Resolver rooted at the directory holding the running binary
    pub fn for_current_exe() -> Self {
        Self {
            base: BaseDir::CurrentExe,
        }
    }

    /// Resolver rooted at `dir`
    pub fn with_base_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            base: BaseDir::Fixed(dir.into()),
        }
    }

    /// Canonical base directory as of now
    pub fn base_dir(&self) -> Result<PathBuf, SandboxError> {
        match &self.base {
            BaseDir::CurrentExe => {
                let exe = std::env::current_exe().map_err(SandboxError::ExecutablePath)?;
                let exe = fs::canonicalize(&exe).map_err(|e| SandboxError::resolve(&exe, e))?;
                exe.parent().map(Path::to_path_buf).ok_or_else(|| {
                    SandboxError::ExecutablePath(std::io::Error::other(
                        "executable has no parent directory",
                    ))
                })
            }
            BaseDir::Fixed(dir) => fs::canonicalize(dir).map_err(|e| SandboxError::resolve(dir, e)),
        }
    }

    /// Validate `config.filename` and open it inside the base directory
    ///
    /// # Errors
    /// - Policy rejection (bad name, escape, unverifiable symlink)
    /// - OS failure resolving or opening the path
    #[instrument(
        name = "sandbox_open",
        skip(self, config),
        fields(
            filename = %config.filename,
            allow_read = config.allow_read,
            clear_on_restart = config.clear_on_restart
        )
    )]
    pub fn open(&self, config: &SandboxConfig) -> Result<SandboxedFile, SandboxError> {
        let base = self.base_dir()?;
        let name = validate_file_name(&config.filename)?;
        let path = resolve_target(&base, name)?;
        ensure_within(&base, &path)?;

        let file = open_options(config)
            .open(&path)
            .map_err(|e| SandboxError::open(&config.filename, e))?;
        verify_opened(&file, &path, &config.filename)?;

        debug!(path = %path.display(), "Log file opened");
        Ok(SandboxedFile { file, path })
    }
}

/// Open `filename` next to the running executable
pub fn open_log_file(
    filename: &str,
    allow_read: bool,
    clear_on_restart: bool,
) -> Result<SandboxedFile, SandboxError> {
    SandboxResolver::for_current_exe().open(&SandboxConfig::new(
        filename,
        allow_read,
        clear_on_restart,
    ))
}

/// Check that `name` addresses a single entry directly in the base directory
fn validate_file_name(name: &str) -> Result<&str, SandboxError> {
    if name.is_empty() {
        return Err(SandboxError::invalid_name(name, "empty name"));
    }
    if name == "." || name == ".." {
        return Err(SandboxError::invalid_name(name, "directory token"));
    }
    if name.contains(['/', '\\']) {
        return Err(SandboxError::invalid_name(name, "contains a path separator"));
    }
    if !name.is_ascii() {
        return Err(SandboxError::invalid_name(name, "contains non-ASCII bytes"));
    }
    if name.chars().any(|c| c.is_ascii_control()) {
        return Err(SandboxError::invalid_name(name, "contains control characters"));
    }

    // Normalization must leave exactly one plain component, byte-identical
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(c)), None) if c == name => Ok(name),
        _ => Err(SandboxError::invalid_name(name, "not a normalized file name")),
    }
}

/// Join `name` onto `base` and resolve symlinks on the result
fn resolve_target(base: &Path, name: &str) -> Result<PathBuf, SandboxError> {
    let joined = base.join(name);
    match fs::canonicalize(&joined) {
        Ok(resolved) => Ok(resolved),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => match fs::symlink_metadata(&joined) {
            // Dangling link: creating through it would place the file at the
            // link target, which we cannot check
            Ok(meta) if meta.file_type().is_symlink() => {
                warn!(path = %joined.display(), "Rejected dangling symlink");
                Err(SandboxError::SymlinkRejected { path: joined })
            }
            Ok(_) => Err(SandboxError::resolve(joined, e)),
            Err(_) => Ok(joined),
        },
        Err(e) => Err(SandboxError::resolve(joined, e)),
    }
}

fn with_trailing_separator(path: &Path) -> OsString {
    let mut s = path.as_os_str().to_os_string();
    if !path.as_os_str().as_encoded_bytes().ends_with(MAIN_SEPARATOR_STR.as_bytes()) {
        s.push(MAIN_SEPARATOR_STR);
    }
    s
}

/// `path` must lie strictly under `base`.
///
/// Both sides get a trailing separator so `/base-evil` never matches `/base`.
fn ensure_within(base: &Path, path: &Path) -> Result<(), SandboxError> {
    let base_sep = with_trailing_separator(base);
    let path_sep = with_trailing_separator(path);

    let inside = path_sep
        .as_encoded_bytes()
        .starts_with(base_sep.as_encoded_bytes())
        && path_sep.len() > base_sep.len();

    if inside {
        Ok(())
    } else {
        warn!(path = %path.display(), base = %base.display(), "Log path escapes base directory");
        Err(SandboxError::EscapesBaseDirectory {
            path: path.to_path_buf(),
            base: base.to_path_buf(),
        })
    }
}

fn open_options(config: &SandboxConfig) -> OpenOptions {
    let mut options = OpenOptions::new();
    options.create(true);

    if config.allow_read {
        options.read(true);
    }

    if config.clear_on_restart {
        options.write(true).truncate(true);
    } else {
        options.append(true);
    }

    #[cfg(unix)]
    {
        use nix::fcntl::OFlag;
        use std::os::unix::fs::OpenOptionsExt;

        options.mode(config.permissions());
        // A symlink swapped in after validation fails the open
        options.custom_flags(OFlag::O_NOFOLLOW.bits());
    }

    options
}

/// The opened descriptor must refer to the entry that was validated
#[cfg(unix)]
fn verify_opened(file: &File, path: &Path, name: &str) -> Result<(), SandboxError> {
    use std::os::unix::fs::MetadataExt;

    let opened = file.metadata().map_err(|e| SandboxError::open(name, e))?;
    let on_disk = fs::symlink_metadata(path).map_err(|e| SandboxError::open(name, e))?;

    if !opened.is_file() || opened.dev() != on_disk.dev() || opened.ino() != on_disk.ino() {
        warn!(path = %path.display(), "Log path changed between validation and open");
        return Err(SandboxError::SymlinkRejected {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

#[cfg(not(unix))]
fn verify_opened(file: &File, path: &Path, name: &str) -> Result<(), SandboxError> {
    let opened = file.metadata().map_err(|e| SandboxError::open(name, e))?;
    if !opened.is_file() {
        return Err(SandboxError::SymlinkRejected {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}
