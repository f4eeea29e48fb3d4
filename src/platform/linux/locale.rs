#![allow(unsafe_code)]

use std::ffi::{CStr, CString};

use crate::locale::HostLocale;

/// The C library's process-wide locale.
///
/// `setlocale` is not thread-safe; this is only used from the single-threaded
/// bootstrap before the toolkit starts any threads of its own.
#[derive(Debug, Default)]
pub struct LibcLocale;

impl HostLocale for LibcLocale {
    fn set_locale(&mut self, name: &str) -> bool {
        let Ok(name) = CString::new(name) else {
            return false;
        };
        // SAFETY: `name` is NUL-terminated and outlives the call; no other
        // thread exists yet that could read the locale concurrently.
        let ret = unsafe { libc::setlocale(libc::LC_ALL, name.as_ptr()) };
        !ret.is_null()
    }

    fn codeset(&self) -> Option<String> {
        // SAFETY: nl_langinfo returns a pointer into libc-owned storage that
        // stays valid until the next setlocale call; it is copied out below
        // before returning.
        let ptr = unsafe { libc::nl_langinfo(libc::CODESET) };
        if ptr.is_null() {
            return None;
        }
        // SAFETY: non-null, NUL-terminated, see above.
        let name = unsafe { CStr::from_ptr(ptr) };
        Some(name.to_string_lossy().into_owned())
    }
}
