// FcFontList asking for FC_FILE alone.  With no other object requested,
// fontconfig folds the faces of a collection into one entry per file, so
// the listing is exactly what `fc-list : file` prints.

use std::{
    ffi::{CStr, OsStr},
    os::unix::ffi::OsStrExt,
    path::PathBuf,
    ptr, slice,
};

use fontconfig_sys::{
    constants::FC_FILE, FcChar8, FcFontList, FcFontSet, FcFontSetDestroy, FcObjectSet,
    FcObjectSetAdd, FcObjectSetCreate, FcObjectSetDestroy, FcPattern, FcPatternCreate,
    FcPatternDestroy, FcPatternGetString, FcResultMatch,
};
use tracing::debug;

use crate::{
    error::{Result, ShellError},
    fonts::{list_system_fonts, FontRecord, FontService},
};

/// The host fontconfig service.
#[derive(Debug, Default)]
pub struct FontconfigService;

impl FontService for FontconfigService {
    fn font_files(&self) -> Result<Vec<PathBuf>> {
        let query = FileQuery::new()?;
        // SAFETY: `query` owns a live pattern and object set.  A NULL config
        // means the current one, which GTK has already loaded.
        let set = unsafe { FcFontList(ptr::null_mut(), query.pattern, query.objects) };
        // SAFETY: `set` is NULL or the font set just returned.
        let files = unsafe { files_in(set) };
        if !set.is_null() {
            // SAFETY: returned by FcFontList and destroyed exactly once.
            unsafe { FcFontSetDestroy(set) };
        }
        if let Ok(files) = &files {
            debug!(count = files.len(), "fontconfig font files");
        }
        files
    }
}

/// Every installed font file.  Exposed to the text renderer.
pub fn system_fonts() -> Result<Vec<FontRecord>> {
    list_system_fonts(&FontconfigService)
}

// ── Query ─────────────────────────────────────────────────────────────────────

/// Empty pattern (match everything) plus an object set holding only
/// `FC_FILE`.
struct FileQuery {
    pattern: *mut FcPattern,
    objects: *mut FcObjectSet,
}

impl FileQuery {
    fn new() -> Result<Self> {
        // SAFETY: plain allocators; both return NULL on failure, which
        // `Drop` tolerates.
        let query = unsafe {
            Self {
                pattern: FcPatternCreate(),
                objects: FcObjectSetCreate(),
            }
        };
        if query.pattern.is_null() || query.objects.is_null() {
            return Err(unavailable("cannot allocate a font query"));
        }
        // SAFETY: `objects` is live and `FC_FILE` is NUL-terminated.
        if unsafe { FcObjectSetAdd(query.objects, FC_FILE.as_ptr()) } == 0 {
            return Err(unavailable("cannot request the file attribute"));
        }
        Ok(query)
    }
}

impl Drop for FileQuery {
    fn drop(&mut self) {
        // SAFETY: each pointer is NULL or was created in `new` and is
        // destroyed only here.
        unsafe {
            if !self.objects.is_null() {
                FcObjectSetDestroy(self.objects);
            }
            if !self.pattern.is_null() {
                FcPatternDestroy(self.pattern);
            }
        }
    }
}

/// Collect the `file` of every pattern in `set`, in fontconfig's order.
/// A NULL set means the query failed; an empty set is a valid answer.
///
/// # Safety
/// `set` must be NULL or point to a live `FcFontSet`.
unsafe fn files_in(set: *const FcFontSet) -> Result<Vec<PathBuf>> {
    // SAFETY: caller contract.
    let Some(set) = (unsafe { set.as_ref() }) else {
        return Err(unavailable("FcFontList returned no font set"));
    };
    let count = usize::try_from(set.nfont).unwrap_or(0);
    if count == 0 || set.fonts.is_null() {
        return Ok(Vec::new());
    }

    // SAFETY: fontconfig stores `nfont` valid pattern pointers in `fonts`.
    let patterns = unsafe { slice::from_raw_parts(set.fonts, count) };
    let mut files = Vec::with_capacity(count);
    for &pattern in patterns {
        let mut file: *mut FcChar8 = ptr::null_mut();
        // SAFETY: `pattern` belongs to `set`; the returned string is owned
        // by the pattern and copied out before `set` is destroyed.
        let found = unsafe { FcPatternGetString(pattern, FC_FILE.as_ptr(), 0, &mut file) };
        // Every listed pattern carries the requested attribute.
        if found != FcResultMatch || file.is_null() {
            continue;
        }
        // SAFETY: fontconfig strings are NUL-terminated.
        let bytes = unsafe { CStr::from_ptr(file.cast()) }.to_bytes();
        files.push(PathBuf::from(OsStr::from_bytes(bytes)));
    }
    Ok(files)
}

fn unavailable(message: &str) -> ShellError {
    ShellError::FontService(message.to_owned())
}
