use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};

/// Extension used when a category name is blank
pub const DEFAULT_EXTENSION: &str = ".bin";

// Rendered as `yyMMdd_HHmmss`; parsed back from the two `_` segments joined together
const FILE_STAMP_FORMAT: &str = "%y%m%d_%H%M%S";
const COMPACT_STAMP_FORMAT: &str = "%y%m%d%H%M%S";

/// Directory and file naming for the history tree
///
/// Layout is `<root>/<category>/<yyMMdd_HHmmss><ext>`. The timestamp embedded in the
/// file name is rendered in local time, which lets the store order and filter a
/// category by listing its directory without opening any file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathScheme {
    root: PathBuf,
}

impl PathScheme {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding a category's files, without touching the file system
    pub fn category_path(&self, category: &str) -> PathBuf {
        self.root.join(category.trim())
    }

    /// Directory holding a category's files, created if missing
    ///
    /// # Errors
    ///
    /// Returns an error if the category is not a plain directory name (contains a
    /// separator or `..`) or the directory cannot be created.
    pub fn category_dir(&self, category: &str) -> io::Result<PathBuf> {
        validate_category(category)?;
        let dir = self.category_path(category);
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// Full path of the file a record received at `unix_ts` is written to
    pub fn file_path(&self, category: &str, unix_ts: u32) -> io::Result<PathBuf> {
        Ok(self.category_dir(category)?.join(file_name(category, unix_ts)))
    }
}

/// Builds the file name for a record received at `unix_ts`
///
/// # Examples
///
/// ```
/// use record_history::utils::paths::{file_name, parse_timestamp};
///
/// let name = file_name("ECS_MsgModel", 1_700_000_000);
/// assert!(name.ends_with(".ECS_MsgModel"));
/// assert_eq!(parse_timestamp(&name).map(|t| t.timestamp()), Some(1_700_000_000));
/// ```
pub fn file_name(category: &str, unix_ts: u32) -> String {
    let utc = DateTime::from_timestamp(i64::from(unix_ts), 0).unwrap_or(DateTime::UNIX_EPOCH);
    let stamp = utc.with_timezone(&Local).format(FILE_STAMP_FORMAT);
    format!("{}{}", stamp, extension(category))
}

/// File extension for a category, including the leading dot
pub fn extension(category: &str) -> String {
    let candidate = category.trim();
    if candidate.is_empty() {
        return DEFAULT_EXTENSION.to_string();
    }
    if candidate.starts_with('.') { candidate.to_string() } else { format!(".{}", candidate) }
}

/// Glob matching only a category's files, e.g. `*.ECS_MsgModel`
pub fn search_pattern(category: &str) -> String {
    format!("*{}", extension(category))
}

/// Whether `file_name` matches [`search_pattern`] for `category`
pub fn matches_category(category: &str, file_name: &str) -> bool {
    let ext = extension(category);
    file_name.len() > ext.len() && file_name.ends_with(&ext)
}

/// Recovers the receive time embedded in a file name
///
/// The name (without extension) is split on `_`; the first two segments are joined
/// and parsed with the inverse of [`file_name`]'s format. Returns `None` for any name
/// that does not fit, so callers need their own fallback.
pub fn parse_timestamp(file_name: &str) -> Option<DateTime<Local>> {
    let name = Path::new(file_name).file_name()?.to_str()?;
    // Extensions can contain `_` (category names do), so cut at the first dot
    let stem = name.split('.').next()?;

    let mut segments = stem.split('_').filter(|s| !s.is_empty());
    let date = segments.next()?;
    let time = segments.next()?;

    let compact = format!("{}{}", date, time);
    let naive = NaiveDateTime::parse_from_str(&compact, COMPACT_STAMP_FORMAT).ok()?;
    Local.from_local_datetime(&naive).earliest()
}

/// Rejects category names that would escape the history root
pub fn validate_category(category: &str) -> io::Result<()> {
    let trimmed = category.trim();
    let mut components = Path::new(trimmed).components();
    let valid = trimmed.is_empty()
        || (matches!(components.next(), Some(Component::Normal(_))) && components.next().is_none());

    if !valid {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("Category must be a plain directory name: {:?}", category),
        ));
    }
    Ok(())
}
