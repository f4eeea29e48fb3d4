use std::{
    cell::RefCell,
    path::{Path, PathBuf},
    rc::Rc,
};

use cadshell::{
    bootstrap::{self, Application, StartupWarning, Toolkit, STYLE_PRIORITY_APPLICATION},
    cli::Cli,
    device::{BridgeState, Viewport},
    error::{Result, ShellError},
    locale::{Catalog, HostLocale, ProcessLocale},
};

// ============================================================================
// Recording doubles
// ============================================================================

type CallLog = Rc<RefCell<Vec<String>>>;

fn record(log: &CallLog, call: impl Into<String>) {
    log.borrow_mut().push(call.into());
}

struct Host {
    log: CallLog,
    codeset: &'static str,
    active: String,
}

impl HostLocale for Host {
    fn set_locale(&mut self, name: &str) -> bool {
        record(&self.log, format!("setlocale({name:?})"));
        self.active = name.to_owned();
        true
    }

    fn codeset(&self) -> Option<String> {
        record(&self.log, "codeset");
        Some(if self.active.is_empty() { self.codeset } else { "ANSI_X3.4-1968" }.to_owned())
    }
}

struct FakeToolkit {
    log: CallLog,
    device: bool,
    bind_ok: bool,
    languages: Vec<String>,
}

impl Toolkit for FakeToolkit {
    type Window = &'static str;

    fn disable_setlocale(&mut self) {
        record(&self.log, "toolkit.disable_setlocale");
    }

    fn init(&mut self) -> Result<()> {
        record(&self.log, "toolkit.init");
        Ok(())
    }

    fn add_style_override(&mut self, css: &str, priority: u32) -> Result<()> {
        assert!(css.contains("entry"));
        record(&self.log, format!("toolkit.style({priority})"));
        Ok(())
    }

    fn install_device_filter(&mut self, _viewport: Rc<dyn Viewport>) -> BridgeState {
        record(&self.log, "toolkit.install_device_filter");
        if self.device {
            BridgeState::Installed
        } else {
            BridgeState::Uninstalled
        }
    }

    fn language_names(&self) -> Vec<String> {
        record(&self.log, "toolkit.language_names");
        self.languages.clone()
    }

    fn bind_device(&mut self, window: &&'static str) -> bool {
        record(&self.log, format!("toolkit.bind_device({window})"));
        self.bind_ok
    }

    fn run(&mut self) {
        record(&self.log, "toolkit.run");
    }
}

struct NullView;

impl Viewport for NullView {
    fn space_navigator_moved(&self, _: f64, _: f64, _: f64, _: f64, _: f64, _: f64, _: bool) {}
    fn space_navigator_button_up(&self) {}
}

struct FakeApp {
    log: CallLog,
    window: Option<&'static str>,
    loaded: Vec<PathBuf>,
    ui_locale: Option<String>,
    fail_load: bool,
}

impl Application for FakeApp {
    type Window = &'static str;

    fn viewport(&self) -> Rc<dyn Viewport> {
        Rc::new(NullView)
    }

    fn init(&mut self, locale: &ProcessLocale) -> Result<()> {
        record(&self.log, "app.init");
        self.ui_locale = Some(locale.ui_locale().to_owned());
        self.window = Some("main");
        Ok(())
    }

    fn main_window(&self) -> Option<&&'static str> {
        self.window.as_ref()
    }

    fn load(&mut self, path: &Path) -> Result<()> {
        record(&self.log, "app.load");
        if self.fail_load {
            return Err(ShellError::Load {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
            });
        }
        self.loaded.push(path.to_path_buf());
        Ok(())
    }

    fn clear(&mut self) {
        record(&self.log, "app.clear");
    }
}

struct Rig {
    log: CallLog,
    host: Host,
    toolkit: FakeToolkit,
    app: FakeApp,
    catalog: Catalog,
}

impl Rig {
    fn new(codeset: &'static str) -> Self {
        let log: CallLog = Rc::default();
        Self {
            host: Host {
                log: log.clone(),
                codeset,
                active: "C".to_owned(),
            },
            toolkit: FakeToolkit {
                log: log.clone(),
                device: true,
                bind_ok: true,
                languages: vec!["en_US.UTF-8".into(), "en_US".into(), "en".into(), "C".into()],
            },
            app: FakeApp {
                log: log.clone(),
                window: None,
                loaded: Vec::new(),
                ui_locale: None,
                fail_load: false,
            },
            catalog: Catalog::from_tags(["de_DE", "en_US", "fr_FR"]),
            log,
        }
    }

    fn run(&mut self, args: &[&str]) -> Result<bootstrap::SessionReport> {
        let cli = Cli::from_args(args);
        bootstrap::run(&cli, &mut self.host, &mut self.toolkit, &mut self.app, &self.catalog)
    }

    fn calls(&self) -> Vec<String> {
        self.log.borrow().clone()
    }
}

fn cwd_join(name: &str) -> PathBuf {
    std::env::current_dir().expect("cwd").join(name)
}

// ============================================================================
// Ordering
// ============================================================================

#[test]
fn full_sequence_runs_in_order() {
    let mut rig = Rig::new("UTF-8");
    rig.run(&["cadshell", "a.txt"]).expect("startup");
    let style = format!("toolkit.style({STYLE_PRIORITY_APPLICATION})");

    assert_eq!(
        rig.calls(),
        [
            "setlocale(\"\")",
            "codeset",
            "setlocale(\"C\")",
            "toolkit.disable_setlocale",
            "toolkit.init",
            style.as_str(),
            "toolkit.install_device_filter",
            "toolkit.language_names",
            "app.init",
            "toolkit.bind_device(main)",
            "app.load",
            "toolkit.run",
            "app.clear",
        ]
    );
}

#[test]
fn non_utf8_host_stops_before_the_toolkit() {
    let mut rig = Rig::new("ISO-8859-15");
    let err = rig.run(&["cadshell", "a.txt"]).unwrap_err();

    assert!(matches!(
        err,
        ShellError::UnsupportedCharset { ref charset } if charset == "ISO-8859-15"
    ));
    assert_eq!(err.exit_code(), 1);
    let calls = rig.calls();
    assert!(
        calls.iter().all(|c| !c.starts_with("toolkit.") && !c.starts_with("app.")),
        "no toolkit or app call expected, got {calls:?}"
    );
}

#[test]
fn charset_completes_before_first_toolkit_call() {
    let mut rig = Rig::new("UTF-8");
    rig.run(&["cadshell"]).expect("startup");
    let calls = rig.calls();
    let pinned = calls.iter().position(|c| c == "setlocale(\"C\")").expect("pinned to C");
    let first_toolkit = calls.iter().position(|c| c.starts_with("toolkit.")).expect("toolkit used");
    assert!(pinned < first_toolkit);
    assert_eq!(calls[first_toolkit], "toolkit.disable_setlocale");
}

// ============================================================================
// Command line
// ============================================================================

#[test]
fn single_argument_loads_absolute_path() {
    let mut rig = Rig::new("UTF-8");
    let report = rig.run(&["cadshell", "a.txt"]).expect("startup");

    assert_eq!(rig.app.loaded, [cwd_join("a.txt")]);
    assert_eq!(report.document, Some(cwd_join("a.txt")));
    assert!(report.warnings.is_empty());
}

#[test]
fn extra_arguments_warn_and_only_first_loads() {
    let mut rig = Rig::new("UTF-8");
    let report = rig.run(&["cadshell", "a.txt", "b.txt"]).expect("startup");

    assert_eq!(rig.app.loaded, [cwd_join("a.txt")]);
    assert_eq!(report.warnings, [StartupWarning::ExtraArguments { ignored: 1 }]);
}

#[test]
fn dash_prefixed_extra_argument_is_only_a_warning() {
    let mut rig = Rig::new("UTF-8");
    let report = rig.run(&["cadshell", "a.slvs", "-x"]).expect("startup");

    assert_eq!(rig.app.loaded, [cwd_join("a.slvs")]);
    assert_eq!(report.warnings, [StartupWarning::ExtraArguments { ignored: 1 }]);
    assert!(rig.calls().iter().any(|c| c == "toolkit.run"));
}

#[test]
fn dash_prefixed_document_is_loaded() {
    let mut rig = Rig::new("UTF-8");
    let report = rig.run(&["cadshell", "-part.slvs"]).expect("startup");

    assert_eq!(report.document, Some(cwd_join("-part.slvs")));
    assert!(report.warnings.is_empty());
}

#[test]
fn no_argument_means_no_load() {
    let mut rig = Rig::new("UTF-8");
    let report = rig.run(&["cadshell"]).expect("startup");

    assert!(rig.app.loaded.is_empty());
    assert!(!rig.calls().iter().any(|c| c == "app.load"));
    assert_eq!(report.document, None);
}

#[test]
fn failed_load_is_a_warning_and_the_loop_still_runs() {
    let mut rig = Rig::new("UTF-8");
    rig.app.fail_load = true;
    let report = rig.run(&["cadshell", "missing.slvs"]).expect("startup");

    assert_eq!(report.document, None);
    assert!(matches!(report.warnings.as_slice(), [StartupWarning::LoadFailed { .. }]));
    assert!(rig.calls().iter().any(|c| c == "toolkit.run"));
    assert_eq!(rig.calls().last().map(String::as_str), Some("app.clear"));
}

// ============================================================================
// Device and UI language
// ============================================================================

#[test]
fn missing_device_support_skips_binding() {
    let mut rig = Rig::new("UTF-8");
    rig.toolkit.device = false;
    let report = rig.run(&["cadshell"]).expect("startup");

    assert_eq!(report.bridge, BridgeState::Uninstalled);
    assert!(!report.device_bound);
    assert!(!rig.calls().iter().any(|c| c.starts_with("toolkit.bind_device")));
}

#[test]
fn bind_failure_is_tolerated() {
    let mut rig = Rig::new("UTF-8");
    rig.toolkit.bind_ok = false;
    let report = rig.run(&["cadshell"]).expect("startup");

    assert_eq!(report.bridge, BridgeState::Installed);
    assert!(!report.device_bound);
    assert!(rig.calls().iter().any(|c| c == "toolkit.run"));
}

#[test]
fn ui_locale_skips_unsupported_preferences() {
    let mut rig = Rig::new("UTF-8");
    rig.toolkit.languages = vec!["pt_BR".into(), "fr_FR".into(), "de_DE".into()];
    let report = rig.run(&["cadshell"]).expect("startup");

    assert_eq!(report.locale.ui_locale(), "fr_FR");
    assert_eq!(rig.app.ui_locale.as_deref(), Some("fr_FR"));
}

#[test]
fn ui_locale_falls_back_to_en_us() {
    let mut rig = Rig::new("UTF-8");
    rig.toolkit.languages = vec!["pt_BR".into(), "pt".into(), "C".into()];
    rig.catalog = Catalog::from_tags(["de_DE"]);
    let report = rig.run(&["cadshell"]).expect("startup");

    assert_eq!(report.locale.ui_locale(), "en_US");
    assert_eq!(report.locale.numeric_locale(), "C");
}
