// ── Application state ─────────────────────────────────────────────────────────
//
// A single `Workbench` is created on startup and owned by the platform
// layer for the lifetime of the main window.  All mutations happen on the UI
// thread; there is no global mutable state.  The geometry engine and the
// renderer are external: the workbench only records what the bridge feeds
// it (UI language, font snapshot, document path, navigator motion).

use std::{
    cell::RefCell,
    path::{Path, PathBuf},
    rc::Rc,
};

use tracing::{info, warn};

use crate::{
    device::Viewport,
    error::{Result, ShellError},
    fonts::{list_system_fonts, FontRecord, FontService},
    locale::ProcessLocale,
};

// ── Viewport ──────────────────────────────────────────────────────────────────

/// Camera state driven by the space navigator.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ViewportState {
    /// Accumulated pan, in device units.
    pub offset: [f64; 3],
    /// Accumulated rotation, in viewport rotation units.
    pub rotation: [f64; 3],
    /// Shift modifier of the most recent motion.
    pub shift_held: bool,
    /// Button-up notifications received; each one asks for a zoom-to-fit.
    pub fit_requests: u32,
}

/// The 3D view as seen by the device bridge.
#[derive(Debug, Default)]
pub struct NavigatorView {
    state: RefCell<ViewportState>,
}

impl NavigatorView {
    pub fn snapshot(&self) -> ViewportState {
        *self.state.borrow()
    }

    fn reset(&self) {
        *self.state.borrow_mut() = ViewportState::default();
    }
}

impl Viewport for NavigatorView {
    fn space_navigator_moved(
        &self,
        tx: f64,
        ty: f64,
        tz: f64,
        rx: f64,
        ry: f64,
        rz: f64,
        shift: bool,
    ) {
        let mut s = self.state.borrow_mut();
        for (acc, d) in s.offset.iter_mut().zip([tx, ty, tz]) {
            *acc += d;
        }
        for (acc, d) in s.rotation.iter_mut().zip([rx, ry, rz]) {
            *acc += d;
        }
        s.shift_held = shift;
    }

    fn space_navigator_button_up(&self) {
        self.state.borrow_mut().fit_requests += 1;
    }
}

// ── Workbench ─────────────────────────────────────────────────────────────────

/// Core application state.
#[derive(Debug, Default)]
pub struct Workbench {
    view: Rc<NavigatorView>,
    ui_locale: Option<String>,
    fonts: Vec<FontRecord>,
    /// Absolute path of the open document, `None` for a new sketch.
    document: Option<PathBuf>,
}

impl Workbench {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle for the device bridge.  Valid before `init`.
    pub fn view(&self) -> Rc<NavigatorView> {
        Rc::clone(&self.view)
    }

    /// Take the negotiated UI language and a font snapshot.
    ///
    /// A missing font service leaves the workbench without system fonts
    /// (the built-in vector font still works); it is not an error.
    pub fn init<F: FontService + ?Sized>(&mut self, locale: &ProcessLocale, fonts: &F) {
        self.ui_locale = Some(locale.ui_locale().to_owned());
        self.fonts = match list_system_fonts(fonts) {
            Ok(fonts) => fonts,
            Err(e) => {
                warn!("{e}; continuing without system fonts");
                Vec::new()
            }
        };
        info!(
            locale = locale.ui_locale(),
            fonts = self.fonts.len(),
            "workbench initialised"
        );
    }

    /// Open `path` as the current document.  Format parsing is done by the
    /// geometry engine; here the file only has to exist.
    pub fn load(&mut self, path: &Path) -> Result<()> {
        let meta = std::fs::metadata(path).map_err(|source| ShellError::Load {
            path: path.to_path_buf(),
            source,
        })?;
        if meta.is_dir() {
            return Err(ShellError::Load {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "is a directory"),
            });
        }
        info!(path = %path.display(), "document opened");
        self.document = Some(path.to_path_buf());
        Ok(())
    }

    /// Release everything.  Called once after the event loop returns.
    pub fn clear(&mut self) {
        self.document = None;
        self.fonts.clear();
        self.ui_locale = None;
        self.view.reset();
    }

    pub fn document(&self) -> Option<&Path> {
        self.document.as_deref()
    }

    pub fn fonts(&self) -> &[FontRecord] {
        &self.fonts
    }

    pub fn ui_locale(&self) -> Option<&str> {
        self.ui_locale.as_deref()
    }

    /// Window title: document file name, or "(new sketch)".
    pub fn title(&self) -> String {
        let name = self
            .document
            .as_deref()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "(new sketch)".to_owned());
        format!("{name} - cadshell")
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{device::dispatch, device::MotionEvent, locale::CharsetStatus};

    struct TwoFonts;

    impl FontService for TwoFonts {
        fn font_files(&self) -> Result<Vec<PathBuf>> {
            Ok(vec!["/f/a.ttf".into(), "/f/b.otf".into()])
        }
    }

    struct NoFonts;

    impl FontService for NoFonts {
        fn font_files(&self) -> Result<Vec<PathBuf>> {
            Err(ShellError::FontService("down".into()))
        }
    }

    #[test]
    fn navigator_motion_accumulates() {
        let bench = Workbench::new();
        let view = bench.view();
        view.space_navigator_moved(1.0, 2.0, -3.0, 0.5, 0.0, -0.25, false);
        view.space_navigator_moved(1.0, 0.0, 0.0, 0.5, 0.0, 0.0, true);
        let s = bench.view().snapshot();
        assert_eq!(s.offset, [2.0, 2.0, -3.0]);
        assert_eq!(s.rotation, [1.0, 0.0, -0.25]);
        assert!(s.shift_held);
        assert_eq!(s.fit_requests, 0);
    }

    #[test]
    fn button_up_requests_fit() {
        let bench = Workbench::new();
        dispatch(MotionEvent::ButtonRelease { button: 0 }, bench.view().as_ref());
        assert_eq!(bench.view().snapshot().fit_requests, 1);
    }

    #[test]
    fn init_records_locale_and_fonts() {
        let mut bench = Workbench::new();
        let mut locale = ProcessLocale::new(CharsetStatus::Utf8);
        locale.negotiate_ui_locale(&["de_DE"], &crate::locale::Catalog::from_tags(["de_DE"]));
        bench.init(&locale, &TwoFonts);
        assert_eq!(bench.ui_locale(), Some("de_DE"));
        assert_eq!(bench.fonts().len(), 2);
    }

    #[test]
    fn init_survives_missing_font_service() {
        let mut bench = Workbench::new();
        bench.init(&ProcessLocale::new(CharsetStatus::Utf8), &NoFonts);
        assert!(bench.fonts().is_empty());
        assert_eq!(bench.ui_locale(), Some("en_US"));
    }

    #[test]
    fn loading_missing_file_fails() {
        let mut bench = Workbench::new();
        let err = bench.load(Path::new("/definitely/not/here.slvs")).unwrap_err();
        assert!(matches!(err, ShellError::Load { .. }));
        assert!(bench.document().is_none());
        assert_eq!(bench.title(), "(new sketch) - cadshell");
    }

    #[test]
    fn loading_directory_fails() {
        let mut bench = Workbench::new();
        let dir = std::env::temp_dir();
        assert!(bench.load(&dir).is_err());
    }

    #[test]
    fn load_then_clear() {
        let mut bench = Workbench::new();
        let path = std::env::current_exe().expect("test binary path");
        bench.load(&path).expect("test binary exists");
        assert_eq!(bench.document(), Some(path.as_path()));
        assert!(bench.title().ends_with(" - cadshell"));

        bench.view().space_navigator_button_up();
        bench.clear();
        assert!(bench.document().is_none());
        assert!(bench.ui_locale().is_none());
        assert_eq!(bench.view().snapshot(), ViewportState::default());
    }
}
