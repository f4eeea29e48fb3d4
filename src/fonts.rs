// ── System font enumeration ───────────────────────────────────────────────────
//
// The text renderer needs every installed font file.  The listing comes from
// the host font configuration service behind the `FontService` seam; the
// fontconfig implementation lives in `platform::linux::fonts`.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Result;

/// One installed font file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FontRecord(PathBuf);

impl FontRecord {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

/// A host font configuration service.
pub trait FontService {
    /// File path of every installed font, in the service's own order.
    ///
    /// Errors when the service is unavailable; never returns a partial list.
    fn font_files(&self) -> Result<Vec<PathBuf>>;
}

/// Snapshot of the installed fonts.
///
/// Order and duplicates are exactly what the service reported.
pub fn list_system_fonts<S: FontService + ?Sized>(service: &S) -> Result<Vec<FontRecord>> {
    let fonts: Vec<FontRecord> = service.font_files()?.into_iter().map(FontRecord).collect();
    debug!(count = fonts.len(), "system fonts listed");
    Ok(fonts)
}
