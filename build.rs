/// cadshell build script.
///
/// Gates the native build to X11/Wayland hosts and links libspnav when the
/// `spaceware` feature is enabled.
fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let native = std::env::var_os("CARGO_FEATURE_NATIVE").is_some();
    let spaceware = std::env::var_os("CARGO_FEATURE_SPACEWARE").is_some();

    // Hard gate: the GTK bridge assumes a freedesktop host. Fail loudly on
    // Windows/macOS rather than producing a binary that cannot find its
    // font service or display.
    let target_os = std::env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    if native && matches!(target_os.as_str(), "windows" | "macos" | "ios" | "android") {
        panic!(
            "the `native` feature needs a GTK/fontconfig host \
             (CARGO_CFG_TARGET_OS = {target_os:?}); build with --no-default-features"
        );
    }

    // ── libspnav ──────────────────────────────────────────────────────────────
    // The X11 protocol half of libspnav (spnav_x11_open / spnav_x11_event) is
    // declared in `platform::linux::spnav`; the library itself comes from the
    // system (libspnav-dev on Debian, libspnav on Arch).
    if spaceware {
        println!("cargo:rustc-link-lib=spnav");
    }
}
