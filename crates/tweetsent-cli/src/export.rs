//! CSV export of enriched collections, one file per account.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;
use tweetsent_core::EnrichedRecord;
use tweetsent_sentiment::Collection;

/// Timestamps are written in UTC with this layout.
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Header row, in column order. No index column.
pub(crate) const COLUMNS: [&str; 8] = [
    "date",
    "favorite_count",
    "retweet_count",
    "text",
    "lexicon_positive",
    "lexicon_neutral",
    "lexicon_negative",
    "polarity_class",
];

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    date: String,
    favorite_count: u64,
    retweet_count: u64,
    text: &'a str,
    lexicon_positive: f64,
    lexicon_neutral: f64,
    lexicon_negative: f64,
    polarity_class: i8,
}

impl<'a> From<&'a EnrichedRecord> for ExportRow<'a> {
    fn from(record: &'a EnrichedRecord) -> Self {
        Self {
            date: record.date.format(DATE_FORMAT).to_string(),
            favorite_count: record.favorite_count,
            retweet_count: record.retweet_count,
            text: &record.text,
            lexicon_positive: record.lexicon_positive,
            lexicon_neutral: record.lexicon_neutral,
            lexicon_negative: record.lexicon_negative,
            polarity_class: record.polarity_class.as_i8(),
        }
    }
}

/// Writes `records` as CSV with a header row, even when there are no records.
pub(crate) fn write_records<W: Write>(writer: W, records: &[EnrichedRecord]) -> Result<(), csv::Error> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(COLUMNS)?;
    for record in records {
        csv_writer.serialize(ExportRow::from(record))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Path of the export file for `account` inside `dir`.
pub(crate) fn export_path(dir: &Path, account: &str) -> PathBuf {
    dir.join(format!("{account}.csv"))
}

/// Writes `collection` to `<dir>/<account>.csv`, creating `dir` if needed.
/// An existing file for the account is replaced.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be created or written.
pub(crate) fn export_collection(dir: &Path, collection: &Collection) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))?;

    let path = export_path(dir, &collection.account);
    let file =
        File::create(&path).with_context(|| format!("failed to create {}", path.display()))?;
    write_records(BufWriter::new(file), &collection.records)
        .with_context(|| format!("failed to write {}", path.display()))?;

    Ok(path)
}
