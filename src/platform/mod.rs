// ── Platform abstraction layer ────────────────────────────────────────────────
//
// The rest of the codebase talks to the OS through the traits in
// `bootstrap`, `locale`, `fonts` and `device`.  No `unsafe` lives here; all
// GTK / libc / libspnav FFI is confined to the `linux` sub-module and never
// leaks outward.

#[cfg(feature = "native")]
pub mod linux;
