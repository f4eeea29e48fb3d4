// ── Central error type ────────────────────────────────────────────────────────
//
// All fallible operations in cadshell return `error::Result<T>`.  No panics
// in production paths; startup errors are logged by `main()` and turn into a
// non-zero exit status.

use std::path::PathBuf;

/// Every error that cadshell can produce.
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    /// The host locale does not use UTF-8.  Fatal: nothing above the locale
    /// layer is ever initialised.
    #[error("Sorry, only UTF-8 locales are supported (host character set is {charset})")]
    UnsupportedCharset {
        /// Codeset name reported by the host, or `"unknown"`.
        charset: String,
    },

    /// A GTK / GLib call failed.
    #[error("{function} failed: {message}")]
    Toolkit {
        /// The name of the failing function, for display purposes.
        function: &'static str,
        message: String,
    },

    /// The font configuration service could not be queried.
    #[error("font service unavailable: {0}")]
    FontService(String),

    /// A command-line argument is not valid UTF-8.
    #[error("argument {0:?} is not valid UTF-8")]
    InvalidArgument(String),

    /// The collaborator refused to load a document.
    #[error("cannot open {path:?}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The embedded locale table did not parse.
    #[error("locale catalog is malformed: {0}")]
    Catalog(#[from] serde_json::Error),

    /// The embedded locale table has a version this build does not read.
    #[error("locale catalog version {0} is not supported")]
    CatalogVersion(u32),

    /// A standard I/O error (current directory lookup, …).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ShellError {
    /// Process exit status for an error that aborts startup.
    pub fn exit_code(&self) -> u8 {
        1
    }
}

// Convert glib errors directly so that `?` works on toolkit calls inside
// `platform::linux`.
#[cfg(feature = "native")]
impl From<glib::Error> for ShellError {
    fn from(e: glib::Error) -> Self {
        Self::Toolkit {
            function: "glib",
            message: e.to_string(),
        }
    }
}

#[cfg(feature = "native")]
impl From<glib::BoolError> for ShellError {
    fn from(e: glib::BoolError) -> Self {
        Self::Toolkit {
            function: "gtk_init",
            message: e.to_string(),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ShellError>;
