// ── Safety policy ────────────────────────────────────────────────────────────
// Unsafe code is forbidden everywhere except `platform::linux` (GTK, libc and
// libspnav FFI).  Each unsafe block in that module MUST carry a `// SAFETY:`
// comment.
#![deny(unsafe_code)]

//! Native platform bridge for the cadshell CAD workbench: locale
//! negotiation, system font listing, space navigator input, and the ordered
//! GTK startup sequence.

pub mod app;
pub mod bootstrap;
pub mod cli;
pub mod device;
pub mod error;
pub mod fonts;
pub mod locale;
pub mod logging;
pub mod platform;
