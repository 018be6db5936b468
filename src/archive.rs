//! In-memory archive writer
//!
//! Wraps [`zip::ZipWriter`] over a growable buffer. The pipeline funnels all
//! completions through a single owner of this writer, so it needs no internal
//! locking. Entries are deflate-compressed at a stable level; names must be
//! unique.

use std::collections::HashSet;
use std::io::{Cursor, Write};

use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::ArchiveError;

/// Single-writer zip builder backed by an in-memory buffer
pub struct ArchiveWriter {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    options: FileOptions,
    names: HashSet<String>,
}

impl ArchiveWriter {
    /// Create an empty archive with the given deflate level (0-9)
    pub fn new(compression_level: i32) -> Self {
        let writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(compression_level));

        Self {
            writer,
            options,
            names: HashSet::new(),
        }
    }

    /// Write one complete payload as a named entry
    ///
    /// The payload must already be fully fetched and validated; this writer
    /// never sees partial data. Duplicate names are rejected rather than
    /// silently shadowed.
    pub fn add_entry(&mut self, name: &str, payload: &[u8]) -> Result<(), ArchiveError> {
        if !self.names.insert(name.to_string()) {
            return Err(ArchiveError::DuplicateEntry {
                name: name.to_string(),
            });
        }

        self.writer
            .start_file(name, self.options)
            .map_err(|e| ArchiveError::EntryWrite {
                name: name.to_string(),
                reason: e.to_string(),
            })?;
        self.writer
            .write_all(payload)
            .map_err(|e| ArchiveError::EntryWrite {
                name: name.to_string(),
                reason: e.to_string(),
            })?;

        Ok(())
    }

    /// Number of entries written so far
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no entries have been written yet
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Seal the archive and hand back the buffer, read position rewound to 0
    pub fn finish(mut self) -> Result<Cursor<Vec<u8>>, ArchiveError> {
        let mut cursor = self
            .writer
            .finish()
            .map_err(|e| ArchiveError::Finish(e.to_string()))?;
        cursor.set_position(0);
        Ok(cursor)
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn empty_archive_is_valid_and_openable() {
        let writer = ArchiveWriter::new(6);
        assert!(writer.is_empty());

        let cursor = writer.finish().unwrap();
        assert_eq!(cursor.position(), 0, "sealed buffer must be rewound");

        let archive = zip::ZipArchive::new(cursor).unwrap();
        assert_eq!(archive.len(), 0);
    }

    #[test]
    fn entries_round_trip_through_the_buffer() {
        let mut writer = ArchiveWriter::new(6);
        writer.add_entry("gelbooru_1.jpg", b"first payload").unwrap();
        writer.add_entry("gelbooru_2.jpg", b"second payload").unwrap();
        assert_eq!(writer.len(), 2);

        let cursor = writer.finish().unwrap();
        let mut archive = zip::ZipArchive::new(cursor).unwrap();
        assert_eq!(archive.len(), 2);

        let mut content = Vec::new();
        archive
            .by_name("gelbooru_1.jpg")
            .unwrap()
            .read_to_end(&mut content)
            .unwrap();
        assert_eq!(content, b"first payload");

        content.clear();
        archive
            .by_name("gelbooru_2.jpg")
            .unwrap()
            .read_to_end(&mut content)
            .unwrap();
        assert_eq!(content, b"second payload");
    }

    #[test]
    fn duplicate_entry_name_is_rejected() {
        let mut writer = ArchiveWriter::new(6);
        writer.add_entry("gelbooru_1.jpg", b"a").unwrap();

        let err = writer.add_entry("gelbooru_1.jpg", b"b").unwrap_err();
        assert!(matches!(err, ArchiveError::DuplicateEntry { name } if name == "gelbooru_1.jpg"));
    }

    #[test]
    fn stored_level_zero_still_produces_readable_entries() {
        let mut writer = ArchiveWriter::new(0);
        writer.add_entry("gelbooru_1.jpg", b"uncompressed-ish").unwrap();

        let cursor = writer.finish().unwrap();
        let mut archive = zip::ZipArchive::new(cursor).unwrap();
        let mut content = Vec::new();
        archive
            .by_index(0)
            .unwrap()
            .read_to_end(&mut content)
            .unwrap();
        assert_eq!(content, b"uncompressed-ish");
    }
}
