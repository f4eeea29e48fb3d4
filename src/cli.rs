// ── Command line ──────────────────────────────────────────────────────────────
//
// `cadshell [FILE]`.  Only the first file is opened; anything after it is
// accepted and reported as ignored rather than rejected.  Every argument is
// a file name, so there are no flags: `-part.slvs` and `--help` are
// documents like any other.

use std::{
    ffi::{OsStr, OsString},
    path::{Component, Path, PathBuf},
};

use clap::Parser;
use tracing::debug;

use crate::error::{Result, ShellError};

#[derive(Debug, Parser)]
#[command(
    name = "cadshell",
    version,
    about = "Parametric CAD workbench",
    disable_help_flag = true,
    disable_version_flag = true
)]
pub struct Cli {
    /// Document to open at startup.
    #[arg(value_name = "FILE", allow_hyphen_values = true)]
    file: Option<OsString>,

    /// Further files; only the first one is opened.
    #[arg(hide = true, allow_hyphen_values = true, trailing_var_arg = true)]
    extra: Vec<OsString>,
}

impl Cli {
    /// Parse `args` (program name first).  Never fails: whatever clap does
    /// not accept is taken verbatim, first argument as the document.
    pub fn from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
        Self::try_parse_from(args.iter()).unwrap_or_else(|e| {
            debug!(kind = ?e.kind(), "taking command line verbatim");
            let mut positional = args.into_iter().skip(1);
            Self {
                file: positional.next(),
                extra: positional.collect(),
            }
        })
    }

    /// The document argument, if any.
    pub fn document(&self) -> Option<&OsStr> {
        self.file.as_deref()
    }

    /// Number of positional arguments after the first.
    pub fn ignored(&self) -> usize {
        self.extra.len()
    }
}

/// Check that `arg` is UTF-8 and make it absolute against `cwd`.
pub fn resolve_document(arg: &OsStr, cwd: &Path) -> Result<PathBuf> {
    let text = arg
        .to_str()
        .ok_or_else(|| ShellError::InvalidArgument(arg.to_string_lossy().into_owned()))?;
    Ok(expand(Path::new(text), cwd))
}

/// Join a relative `path` onto `cwd` and fold `.` and `..` lexically.
/// Symlinks are not resolved.
pub fn expand(path: &Path, cwd: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    };

    let mut out = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `/..` is `/`.
                if !matches!(out.components().next_back(), Some(Component::RootDir) | None) {
                    out.pop();
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
