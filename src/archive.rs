//! In-memory archive reading with safety limits.

use crate::errors::{ParserError, ParserResult};
use crate::options::ParserOptions;
use crate::publication::basename;
use indexmap::IndexMap;
use std::io::{self, Cursor, Read};
use zip::ZipArchive;

/// Contents of one ZIP archive, fully buffered.
///
/// Entries keep their archive order, making document iteration
/// deterministic. Directory entries are skipped.
#[derive(Debug)]
pub(crate) struct RawArchive {
    entries: IndexMap<String, Vec<u8>>,
}

impl RawArchive {
    /// Reads an archive from a byte buffer, enforcing the configured
    /// entry-count and total-decompressed-size caps and rejecting
    /// entry paths that escape the archive root.
    ///
    /// # Errors
    /// - [`ParserError::InvalidArchive`]: the buffer is not a readable ZIP.
    /// - [`ParserError::TooManyFiles`] / [`ParserError::FileTooLarge`]:
    ///   a configured cap is exceeded.
    /// - [`ParserError::SuspiciousContent`]: an entry path is unsafe.
    pub(crate) fn read(data: &[u8], options: &ParserOptions) -> ParserResult<Self> {
        let mut zip = ZipArchive::new(Cursor::new(data))
            .map_err(|error| ParserError::InvalidArchive(io::Error::from(error)))?;

        let mut entries = IndexMap::new();
        let mut total_bytes: u64 = 0;
        let mut entry_count: usize = 0;

        for index in 0..zip.len() {
            let mut file = zip
                .by_index(index)
                .map_err(|error| ParserError::InvalidArchive(io::Error::from(error)))?;

            entry_count += 1;
            if entry_count > options.max_entries {
                return Err(ParserError::TooManyFiles {
                    limit: options.max_entries,
                });
            }

            let name = file.name().to_owned();
            if is_unsafe_entry_path(&name) {
                return Err(ParserError::SuspiciousContent { entry: name });
            }

            if file.is_dir() {
                continue;
            }

            total_bytes = total_bytes.saturating_add(file.size());
            if total_bytes > options.max_total_bytes {
                return Err(ParserError::FileTooLarge {
                    limit: options.max_total_bytes,
                });
            }

            let mut content = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut content)
                .map_err(ParserError::InvalidArchive)?;
            entries.insert(name, content);
        }

        Ok(Self { entries })
    }

    /// Looks up an entry by its exact stored name.
    pub(crate) fn get(&self, name: &str) -> Option<&[u8]> {
        self.entries.get(name).map(Vec::as_slice)
    }

    /// The first entry whose name ends with `suffix`, case-sensitive.
    pub(crate) fn find_by_suffix(&self, suffix: &str) -> Option<&[u8]> {
        self.iter()
            .find(|(name, _)| name.ends_with(suffix))
            .map(|(_, content)| content)
    }

    /// The first entry whose basename, or basename minus extension,
    /// equals `target`.
    pub(crate) fn find_by_basename(&self, target: &str) -> Option<&[u8]> {
        self.iter()
            .find(|(name, _)| {
                let base = basename(name);
                base == target || base.rsplit_once('.').is_some_and(|(stem, _)| stem == target)
            })
            .map(|(_, content)| content)
    }

    /// Iterates entries in archive order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.entries
            .iter()
            .map(|(name, content)| (name.as_str(), content.as_slice()))
    }
}

/// Whether an entry name escapes the logical archive root.
///
/// After normalizing `\` to `/`, a name is rejected when it is absolute,
/// starts with `..`, contains a `/../` segment, or resolves above the
/// root once `.`/`..` segments are applied.
fn is_unsafe_entry_path(entry_name: &str) -> bool {
    let normalized = entry_name.replace('\\', "/");

    if normalized.starts_with('/') || normalized.starts_with("..") || normalized.contains("/../") {
        return true;
    }

    let mut depth: i32 = 0;
    for segment in normalized.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                depth -= 1;
                if depth < 0 {
                    return true;
                }
            }
            _ => depth += 1,
        }
    }
    false
}
