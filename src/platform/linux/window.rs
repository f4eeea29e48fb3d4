// ── Main window ───────────────────────────────────────────────────────────────
//
// Responsibilities in this file:
//   • Implement `bootstrap::Toolkit` on top of GTK 3.
//   • Create the top-level window and attach a menu bar.
//   • Run the GTK main loop.
//   • Expose `open_website` and the process entry point used by main().

use std::{path::Path, rc::Rc};

use gtk::prelude::*;
use tracing::{debug, warn};

use super::{fonts::FontconfigService, locale::LibcLocale};
use crate::{
    app::Workbench,
    bootstrap::{self, Application, SessionReport, Toolkit},
    cli::Cli,
    device::{BridgeState, Viewport},
    error::{Result, ShellError},
    locale::{Catalog, ProcessLocale},
};

// ── Window identity ───────────────────────────────────────────────────────────

/// Default client width in pixels.
const DEFAULT_WIDTH: i32 = 960;

/// Default client height in pixels.
const DEFAULT_HEIGHT: i32 = 640;

/// Online manual opened from Help.
const WEBSITE: &str = "https://solvespace.com/helpmenu";

/// `GDK_CURRENT_TIME`.
const CURRENT_TIME: u32 = 0;

// ── Public API ────────────────────────────────────────────────────────────────

/// Run the whole application on GTK: negotiate locales, initialise the
/// toolkit, open the command-line document, and drive the main loop until
/// the window is closed.
pub fn run(cli: &Cli) -> Result<SessionReport> {
    let catalog = Catalog::embedded()?;
    let mut host = LibcLocale;
    let mut toolkit = GtkToolkit::default();
    let mut app = GtkWorkbench::default();
    bootstrap::run(cli, &mut host, &mut toolkit, &mut app, &catalog)
}

/// Open `url` in the user's default viewer.  Failure is logged, not returned.
pub fn open_website(url: &str) {
    if let Err(e) = gtk::show_uri_on_window(None::<&gtk::Window>, url, CURRENT_TIME) {
        warn!("cannot open {url}: {e}");
    }
}

// ── Toolkit ───────────────────────────────────────────────────────────────────

/// GTK 3 as seen by the bootstrap.
#[derive(Debug, Default)]
pub struct GtkToolkit {
    bridge: BridgeState,
}

impl Toolkit for GtkToolkit {
    type Window = gtk::Window;

    fn disable_setlocale(&mut self) {
        gtk::disable_setlocale();
    }

    fn init(&mut self) -> Result<()> {
        gtk::init()?;
        Ok(())
    }

    fn add_style_override(&mut self, css: &str, priority: u32) -> Result<()> {
        let provider = gtk::CssProvider::new();
        provider.load_from_data(css.as_bytes())?;
        let screen = gdk::Screen::default().ok_or_else(|| ShellError::Toolkit {
            function: "gdk_screen_get_default",
            message: "no default screen".to_owned(),
        })?;
        gtk::StyleContext::add_provider_for_screen(&screen, &provider, priority);
        Ok(())
    }

    #[cfg(feature = "spaceware")]
    fn install_device_filter(&mut self, viewport: Rc<dyn Viewport>) -> BridgeState {
        self.bridge = super::spnav::install(viewport);
        self.bridge
    }

    #[cfg(not(feature = "spaceware"))]
    fn install_device_filter(&mut self, _viewport: Rc<dyn Viewport>) -> BridgeState {
        debug!("built without space navigator support");
        self.bridge
    }

    fn language_names(&self) -> Vec<String> {
        glib::language_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect()
    }

    #[cfg(feature = "spaceware")]
    fn bind_device(&mut self, window: &gtk::Window) -> bool {
        if self.bridge != BridgeState::Installed {
            return false;
        }
        let Some(display) = gdk::Display::default() else {
            return false;
        };
        // Wayland sessions have no spacenavd X11 protocol.
        let Ok(display) = display.downcast::<gdkx11::X11Display>() else {
            debug!("display is not X11; space navigator unavailable");
            return false;
        };
        let Some(gdk_window) = window.window() else {
            return false;
        };
        let Ok(xwindow) = gdk_window.downcast::<gdkx11::X11Window>() else {
            return false;
        };
        super::spnav::open(&display, &xwindow)
    }

    #[cfg(not(feature = "spaceware"))]
    fn bind_device(&mut self, _window: &gtk::Window) -> bool {
        false
    }

    fn run(&mut self) {
        gtk::main();
    }
}

// ── Application ───────────────────────────────────────────────────────────────

/// The workbench plus its GTK main window.
#[derive(Debug, Default)]
pub struct GtkWorkbench {
    bench: Workbench,
    window: Option<gtk::Window>,
}

impl Application for GtkWorkbench {
    type Window = gtk::Window;

    fn viewport(&self) -> Rc<dyn Viewport> {
        self.bench.view()
    }

    fn init(&mut self, locale: &ProcessLocale) -> Result<()> {
        self.bench.init(locale, &FontconfigService);
        let window = create_window(&self.bench.title());
        self.window = Some(window);
        Ok(())
    }

    fn main_window(&self) -> Option<&gtk::Window> {
        self.window.as_ref()
    }

    fn load(&mut self, path: &Path) -> Result<()> {
        self.bench.load(path)?;
        if let Some(window) = &self.window {
            window.set_title(&self.bench.title());
        }
        Ok(())
    }

    fn clear(&mut self) {
        self.bench.clear();
        self.window = None;
    }
}

// ── Window creation ───────────────────────────────────────────────────────────

fn create_window(title: &str) -> gtk::Window {
    let window = gtk::Window::new(gtk::WindowType::Toplevel);
    window.set_title(title);
    window.set_default_size(DEFAULT_WIDTH, DEFAULT_HEIGHT);
    window.connect_destroy(|_| gtk::main_quit());

    let layout = gtk::Box::new(gtk::Orientation::Vertical, 0);
    layout.pack_start(&build_menu(), false, false, 0);

    // The renderer attaches its GL context here.
    let canvas = gtk::DrawingArea::new();
    canvas.set_can_focus(true);
    layout.pack_start(&canvas, true, true, 0);

    window.add(&layout);
    // Realize now: binding the space navigator needs the native window.
    window.show_all();
    window
}

// ── Menu bar ──────────────────────────────────────────────────────────────────

fn build_menu() -> gtk::MenuBar {
    let bar = gtk::MenuBar::new();

    let file = submenu(&bar, "_File");
    let quit = gtk::MenuItem::with_mnemonic("_Quit");
    quit.connect_activate(|_| gtk::main_quit());
    file.append(&quit);

    let help = submenu(&bar, "_Help");
    let website = gtk::MenuItem::with_mnemonic("_Website / Manual");
    website.connect_activate(|_| open_website(WEBSITE));
    help.append(&website);

    bar
}

fn submenu(bar: &gtk::MenuBar, label: &str) -> gtk::Menu {
    let item = gtk::MenuItem::with_mnemonic(label);
    let menu = gtk::Menu::new();
    item.set_submenu(Some(&menu));
    bar.append(&item);
    menu
}
