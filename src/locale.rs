// ── Locale negotiation ────────────────────────────────────────────────────────
//
// Two decisions are made once at startup and never revisited:
//   • the text encoding: the host default locale must be UTF-8, after which
//     the C library locale is pinned to "C" so that numbers always format
//     and parse with a '.' decimal point;
//   • the UI language: the first host-preferred tag the translation catalog
//     knows, or `en_US`.
//
// The result lives in a single `ProcessLocale` value owned by the bootstrap
// and handed out by reference.  Nothing here touches libc directly; the
// `HostLocale` seam is implemented in `platform::linux::locale`.

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{Result, ShellError};

/// UI language used when no host preference is in the catalog.
pub const DEFAULT_UI_LOCALE: &str = "en_US";

/// C library locale kept for the whole process after negotiation.
pub const NUMERIC_LOCALE: &str = "C";

/// The host default locale, as understood by `setlocale(LC_ALL, "")`.
const HOST_DEFAULT_LOCALE: &str = "";

// ── Host seam ─────────────────────────────────────────────────────────────────

/// Access to the process-wide C library locale.
pub trait HostLocale {
    /// Equivalent of `setlocale(LC_ALL, name)`.  Returns `false` if the host
    /// rejected the name.
    fn set_locale(&mut self, name: &str) -> bool;

    /// Character set of the currently active locale (`nl_langinfo(CODESET)`).
    fn codeset(&self) -> Option<String>;
}

// ── Charset ───────────────────────────────────────────────────────────────────

/// Outcome of the charset probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CharsetStatus {
    Utf8,
    /// Any other codeset, by the name the host reported.
    Unsupported(String),
}

impl CharsetStatus {
    pub fn is_utf8(&self) -> bool {
        matches!(self, Self::Utf8)
    }

    fn classify(codeset: Option<String>) -> Self {
        match codeset {
            Some(name) if is_utf8_codeset(&name) => Self::Utf8,
            Some(name) => Self::Unsupported(name),
            None => Self::Unsupported("unknown".to_owned()),
        }
    }
}

/// glibc reports "UTF-8"; some BSD libcs report "utf8".
fn is_utf8_codeset(name: &str) -> bool {
    name.eq_ignore_ascii_case("UTF-8") || name.eq_ignore_ascii_case("utf8")
}

/// Confirm that the host default locale is UTF-8, then pin the process to
/// the "C" locale.
///
/// On a non-UTF-8 host the locale is left as-is and
/// `ShellError::UnsupportedCharset` is returned; the caller must stop before
/// touching the toolkit.
pub fn negotiate_charset<H: HostLocale + ?Sized>(host: &mut H) -> Result<CharsetStatus> {
    // The codeset is only meaningful once the host locale is active;
    // before that libc always reports ANSI_X3.4-1968.
    if !host.set_locale(HOST_DEFAULT_LOCALE) {
        debug!("host rejected its own default locale; probing the current one");
    }

    let status = CharsetStatus::classify(host.codeset());
    match status {
        CharsetStatus::Utf8 => {
            host.set_locale(NUMERIC_LOCALE);
            debug!(numeric = NUMERIC_LOCALE, "UTF-8 host confirmed");
            Ok(status)
        }
        CharsetStatus::Unsupported(charset) => Err(ShellError::UnsupportedCharset { charset }),
    }
}

// ── Translation catalog ───────────────────────────────────────────────────────

/// One UI language the application ships translations for.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LocaleEntry {
    /// Tag in `language_REGION` form, e.g. `de_DE`.
    pub tag: String,
    /// Native display name, e.g. `Deutsch`.
    pub name: String,
}

#[derive(Deserialize)]
struct CatalogFile {
    version: u32,
    locales: Vec<LocaleEntry>,
}

const CATALOG_VERSION: u32 = 1;

/// The set of UI languages with translations.  Lookup is by exact tag.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<LocaleEntry>,
}

impl Catalog {
    /// The table compiled into the binary from `res/locales.json`.
    pub fn embedded() -> Result<Self> {
        Self::from_json(include_str!("../res/locales.json"))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(json)?;
        if file.version != CATALOG_VERSION {
            return Err(ShellError::CatalogVersion(file.version));
        }
        Ok(Self {
            entries: file.locales,
        })
    }

    /// Build a catalog from bare tags; display names repeat the tag.
    pub fn from_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries = tags
            .into_iter()
            .map(|t| {
                let tag = t.into();
                LocaleEntry {
                    name: tag.clone(),
                    tag,
                }
            })
            .collect();
        Self { entries }
    }

    pub fn lookup(&self, tag: &str) -> Option<&LocaleEntry> {
        self.entries.iter().find(|e| e.tag == tag)
    }

    pub fn supports(&self, tag: &str) -> bool {
        self.lookup(tag).is_some()
    }

    pub fn entries(&self) -> &[LocaleEntry] {
        &self.entries
    }
}

// ── Process locale ────────────────────────────────────────────────────────────

/// Locale state for the whole process.  Created once by the bootstrap after
/// the charset is confirmed; everything else borrows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessLocale {
    charset: CharsetStatus,
    ui_locale: String,
}

impl ProcessLocale {
    pub fn new(charset: CharsetStatus) -> Self {
        Self {
            charset,
            ui_locale: DEFAULT_UI_LOCALE.to_owned(),
        }
    }

    pub fn charset(&self) -> &CharsetStatus {
        &self.charset
    }

    /// The C library locale in effect for numeric formatting.
    pub fn numeric_locale(&self) -> &'static str {
        NUMERIC_LOCALE
    }

    pub fn ui_locale(&self) -> &str {
        &self.ui_locale
    }

    /// Display name of the selected UI language, as listed in `catalog`.
    pub fn ui_locale_name<'c>(&self, catalog: &'c Catalog) -> Option<&'c str> {
        catalog.lookup(&self.ui_locale).map(|e| e.name.as_str())
    }

    /// Apply the first candidate present in `catalog`, scanning left to
    /// right.  Falls back to `DEFAULT_UI_LOCALE` and returns `false` when no
    /// candidate matches.
    pub fn negotiate_ui_locale<S: AsRef<str>>(
        &mut self,
        candidates: &[S],
        catalog: &Catalog,
    ) -> bool {
        let chosen = candidates
            .iter()
            .map(AsRef::as_ref)
            .find(|tag| catalog.supports(tag));

        match chosen {
            Some(tag) => {
                info!(locale = tag, "UI language selected");
                self.ui_locale = tag.to_owned();
                true
            }
            None => {
                debug!(
                    candidates = candidates.len(),
                    fallback = DEFAULT_UI_LOCALE,
                    "no preferred UI language has a translation"
                );
                self.ui_locale = DEFAULT_UI_LOCALE.to_owned();
                false
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
