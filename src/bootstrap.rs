// ── Startup sequence ──────────────────────────────────────────────────────────
//
// The order below is load-bearing:
//   1. charset first: the toolkit must never start in a non-UTF-8 locale;
//   2. GTK's own setlocale() is disabled before init, or it would undo the
//      "C" locale and printf would start writing "1,5";
//   8. the device can only be bound once the main window exists;
//  11. core state is cleared after the loop, while the toolkit is still
//      alive to release anything it shares with it.
//
// Toolkit and application are traits so the sequence is testable without a
// display; the GTK implementations live in `platform::linux::window`.

use std::{
    path::{Path, PathBuf},
    rc::Rc,
    time::Instant,
};

use tracing::{debug, info, warn};

use crate::{
    cli::{self, Cli},
    device::{BridgeState, Viewport},
    error::Result,
    locale::{self, Catalog, HostLocale, ProcessLocale},
};

/// Application style rules, layered over the GTK theme.
pub const STYLE_OVERRIDE: &str = include_str!("../res/style.css");

/// `GTK_STYLE_PROVIDER_PRIORITY_APPLICATION`: above theme defaults, below
/// the user's own settings.
pub const STYLE_PRIORITY_APPLICATION: u32 = 600;

// ── Seams ─────────────────────────────────────────────────────────────────────

/// The native toolkit and its event loop.
pub trait Toolkit {
    type Window;

    /// Stop `init` from calling `setlocale(LC_ALL, "")`.
    fn disable_setlocale(&mut self);

    fn init(&mut self) -> Result<()>;

    fn add_style_override(&mut self, css: &str, priority: u32) -> Result<()>;

    /// Register the space navigator filter.  `Uninstalled` when the build
    /// has no device support.
    fn install_device_filter(&mut self, viewport: Rc<dyn Viewport>) -> BridgeState;

    /// Host UI language preferences, most preferred first.
    fn language_names(&self) -> Vec<String>;

    /// Connect the device to `window`.  Failure is not an error.
    fn bind_device(&mut self, window: &Self::Window) -> bool;

    /// Block until the application asks to quit.
    fn run(&mut self);
}

/// The core application, as far as startup is concerned.
pub trait Application {
    type Window;

    /// Viewport handle for the device filter.  Must be valid before `init`.
    fn viewport(&self) -> Rc<dyn Viewport>;

    fn init(&mut self, locale: &ProcessLocale) -> Result<()>;

    fn main_window(&self) -> Option<&Self::Window>;

    fn load(&mut self, path: &Path) -> Result<()>;

    fn clear(&mut self);
}

// ── Report ────────────────────────────────────────────────────────────────────

/// Something worth telling the user that did not stop startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartupWarning {
    /// Positional arguments after the first were ignored.
    ExtraArguments { ignored: usize },
    /// The document argument could not be used.
    BadArgument(String),
    /// The document could not be loaded.
    LoadFailed { path: PathBuf, reason: String },
}

/// What startup decided, returned once the event loop has exited.
#[derive(Debug, Clone)]
pub struct SessionReport {
    pub locale: ProcessLocale,
    pub bridge: BridgeState,
    pub device_bound: bool,
    pub document: Option<PathBuf>,
    pub warnings: Vec<StartupWarning>,
}

// ── Sequence ──────────────────────────────────────────────────────────────────

/// Run the application from charset negotiation to teardown.
///
/// Returns `Err` only for failures that stop startup: a non-UTF-8 host, a
/// toolkit that cannot initialise, or a core that cannot initialise.
pub fn run<H, T, A>(
    cli: &Cli,
    host: &mut H,
    toolkit: &mut T,
    app: &mut A,
    catalog: &Catalog,
) -> Result<SessionReport>
where
    H: HostLocale + ?Sized,
    T: Toolkit,
    A: Application<Window = T::Window>,
{
    let t0 = Instant::now();
    let charset = locale::negotiate_charset(host)?;
    let mut process_locale = ProcessLocale::new(charset);

    toolkit.disable_setlocale();
    toolkit.init()?;
    toolkit.add_style_override(STYLE_OVERRIDE, STYLE_PRIORITY_APPLICATION)?;

    let bridge = toolkit.install_device_filter(app.viewport());
    debug!(?bridge, "space navigator filter");

    let languages = toolkit.language_names();
    process_locale.negotiate_ui_locale(&languages, catalog);

    app.init(&process_locale)?;

    // We don't care if the device can't be bound; just continue without.
    let device_bound = bridge == BridgeState::Installed
        && app.main_window().is_some_and(|w| toolkit.bind_device(w));
    if bridge == BridgeState::Installed && !device_bound {
        debug!("no space navigator connection");
    }

    let mut warnings = Vec::new();
    let document = match cli.document() {
        Some(arg) => open_document(arg, cli.ignored(), app, &mut warnings),
        None => None,
    };

    info!(
        startup_ms = t0.elapsed().as_secs_f64() * 1000.0,
        "entering event loop"
    );
    toolkit.run();

    app.clear();

    Ok(SessionReport {
        locale: process_locale,
        bridge,
        device_bound,
        document,
        warnings,
    })
}

/// Resolve and load the command-line document.  Every failure here is a
/// warning; the application starts with an empty sketch instead.
fn open_document<A: Application + ?Sized>(
    arg: &std::ffi::OsStr,
    ignored: usize,
    app: &mut A,
    warnings: &mut Vec<StartupWarning>,
) -> Option<PathBuf> {
    if ignored > 0 {
        warn!("Only the first file passed on command line will be opened.");
        warnings.push(StartupWarning::ExtraArguments { ignored });
    }

    let cwd = match std::env::current_dir() {
        Ok(cwd) => cwd,
        Err(e) => {
            warn!("cannot resolve {arg:?}: {e}");
            warnings.push(StartupWarning::BadArgument(e.to_string()));
            return None;
        }
    };

    let path = match cli::resolve_document(arg, &cwd) {
        Ok(path) => path,
        Err(e) => {
            warn!("{e}");
            warnings.push(StartupWarning::BadArgument(e.to_string()));
            return None;
        }
    };

    match app.load(&path) {
        Ok(()) => Some(path),
        Err(e) => {
            warn!("{e}");
            warnings.push(StartupWarning::LoadFailed {
                path,
                reason: e.to_string(),
            });
            None
        }
    }
}
