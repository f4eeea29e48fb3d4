// ── GTK 3 platform implementation ─────────────────────────────────────────────
//
// This is the only module tree in the codebase where `unsafe` code is
// permitted.  Every `unsafe` block MUST carry a `// SAFETY:` comment that
// states:
//   • which invariant makes the operation sound, and
//   • what the caller is responsible for maintaining.
//
// Nothing in this module is `pub` beyond what callers genuinely need; keep the
// unsafe surface as small as possible.

#![allow(unsafe_code)]

// ── Sub-modules ───────────────────────────────────────────────────────────────

pub mod fonts; // path-only fontconfig listing
pub mod locale; // setlocale / nl_langinfo
pub mod window; // toolkit, main window, event loop

#[cfg(feature = "spaceware")]
pub(crate) mod spnav; // libspnav X11 protocol + GDK event filter

pub use window::{open_website, run};
