use std::cmp::Ordering;
use std::path::Path;

/// One run of a file name: either text or a run of ASCII digits.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Text(String),
    Number(String),
}

impl Segment {
    fn number(digits: &str) -> Self {
        let trimmed = digits.trim_start_matches('0');
        Segment::Number(if trimmed.is_empty() { "0".to_owned() } else { trimmed.to_owned() })
    }
}

impl Ord for Segment {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Segment::Text(a), Segment::Text(b)) => a.cmp(b),
            // Leading zeros are gone, so a longer digit run is the larger number.
            (Segment::Number(a), Segment::Number(b)) => a.len().cmp(&b.len()).then_with(|| a.cmp(b)),
            (Segment::Number(_), Segment::Text(_)) => Ordering::Less,
            (Segment::Text(_), Segment::Number(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for Segment {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Numeric-aware sort key, so that `2` orders before `10`.
///
/// The key alternates text and number segments and always starts and ends
/// with a (possibly empty) text segment, so segments at the same position are
/// always of the same kind.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct NaturalKey(Vec<Segment>);

pub fn natural_key(name: &str) -> NaturalKey {
    let mut segments = Vec::new();
    let mut text = String::new();
    let mut chars = name.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        if c.is_ascii_digit() {
            let mut end = start + 1;
            while let Some(&(i, d)) = chars.peek() {
                if !d.is_ascii_digit() {
                    break;
                }
                end = i + 1;
                chars.next();
            }
            segments.push(Segment::Text(std::mem::take(&mut text)));
            segments.push(Segment::number(&name[start..end]));
        } else {
            text.push(c);
        }
    }
    segments.push(Segment::Text(text));
    NaturalKey(segments)
}

/// Compare two paths by the natural key of their stems, falling back to the
/// full file name so the order is total.
pub fn natural_cmp(a: &Path, b: &Path) -> Ordering {
    let stem = |p: &Path| natural_key(&p.file_stem().unwrap_or_default().to_string_lossy());
    let name = |p: &Path| p.file_name().unwrap_or_default().to_string_lossy().into_owned();
    stem(a).cmp(&stem(b)).then_with(|| name(a).cmp(&name(b)))
}

#[cfg(not(target_arch = "wasm32"))]
pub use fs::discover_images;

#[cfg(not(target_arch = "wasm32"))]
mod fs {
    use std::path::{Path, PathBuf};

    use log::debug;
    use walkdir::WalkDir;

    use super::natural_cmp;
    use crate::GraphError;

    const IMAGE_EXTENSION: &str = "png";

    /// List the PNG files directly inside `dir`, in natural order.
    ///
    /// Symlinks are resolved to their targets. Subdirectories, hidden files and
    /// files with other extensions are ignored.
    pub fn discover_images(dir: &Path) -> Result<Vec<PathBuf>, GraphError> {
        let mut files = Vec::new();
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true) {
            let entry = entry.map_err(|source| GraphError::InputDirectory {
                dir: dir.to_path_buf(),
                source,
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let hidden = entry.file_name().to_string_lossy().starts_with('.');
            let is_png = !hidden
                && entry
                    .path()
                    .extension()
                    .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(IMAGE_EXTENSION));
            if is_png {
                files.push(entry.into_path());
            } else {
                debug!("skipping {}", entry.path().display());
            }
        }
        files.sort_by(|a, b| natural_cmp(a, b));
        Ok(files)
    }
}
