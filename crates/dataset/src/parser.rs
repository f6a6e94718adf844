//! CSV readers and writers for the rating tables.
//!
//! Inbound files are MovieLens-style CSVs with a header row:
//! - ratings.csv: `userId,movieId,rating,timestamp`
//! - movies.csv: `movieId,title,genres`
//!
//! Titles may contain commas, so everything goes through the csv crate
//! rather than a hand-rolled split.

use crate::error::{DatasetError, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::Read;
use std::path::Path;

fn read_records<T, R>(reader: R, file: &str) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut records = Vec::new();

    for (idx, row) in csv_reader.deserialize().enumerate() {
        let record: T = row.map_err(|e| DatasetError::Parse {
            file: file.to_string(),
            record: idx as u64 + 1,
            reason: e.to_string(),
        })?;
        records.push(record);
    }

    Ok(records)
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(DatasetError::Io)
}

/// Load a raw ratings table from a CSV file
pub fn load_raw_ratings(path: &Path) -> Result<Vec<crate::types::RawRating>> {
    let file = open(path)?;
    read_records(file, &path.display().to_string())
}

/// Load a raw movies table from a CSV file
pub fn load_raw_movies(path: &Path) -> Result<Vec<crate::types::RawMovie>> {
    let file = open(path)?;
    read_records(file, &path.display().to_string())
}

/// Write any serializable table out as a headered CSV file
pub fn write_table<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let label = path.display().to_string();
    let mut writer = csv::Writer::from_path(path).map_err(|e| DatasetError::Csv {
        file: label.clone(),
        source: e,
    })?;

    for row in rows {
        writer.serialize(row).map_err(|e| DatasetError::Csv {
            file: label.clone(),
            source: e,
        })?;
    }

    writer.flush()?;
    Ok(())
}
