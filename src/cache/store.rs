//! # Delimited-text cache file.
//!
//! [`CsvFile`] persists a tabular result (a `Vec` of serde rows) as a CSV file
//! with a header row. The file's modification time is the only freshness
//! signal kept on disk.
//!
//! An empty result still gets its header: column names are read from the row
//! type's serde field list. Row types serde cannot describe up front (maps,
//! `#[serde(flatten)]`) produce an empty file instead.

use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::de::{self, DeserializeOwned, Visitor};
use serde::{Deserializer, Serialize};
use tokio::fs;

use crate::error::CacheError;

/// On-disk tier of the freshness cache.
#[derive(Debug, Clone)]
pub(crate) struct CsvFile {
    path: PathBuf,
}

impl CsvFile {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: io::Error) -> CacheError {
        CacheError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn csv_err(&self, source: csv::Error) -> CacheError {
        CacheError::Csv {
            path: self.path.clone(),
            source,
        }
    }

    /// Modification time, `None` if the file does not exist.
    pub(crate) async fn modified(&self) -> Result<Option<SystemTime>, CacheError> {
        match fs::metadata(&self.path).await {
            Ok(meta) => meta.modified().map(Some).map_err(|e| self.io_err(e)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_err(e)),
        }
    }

    /// Reads every row.
    pub(crate) async fn load<R: DeserializeOwned>(&self) -> Result<Vec<R>, CacheError> {
        let bytes = fs::read(&self.path).await.map_err(|e| self.io_err(e))?;
        csv::Reader::from_reader(bytes.as_slice())
            .deserialize()
            .collect::<Result<Vec<R>, _>>()
            .map_err(|e| self.csv_err(e))
    }

    /// Replaces the file with `rows`.
    pub(crate) async fn save<R>(&self, rows: &[R]) -> Result<(), CacheError>
    where
        R: Serialize + DeserializeOwned,
    {
        let mut writer = csv::Writer::from_writer(Vec::new());
        if rows.is_empty() {
            if let Some(header) = field_names::<R>() {
                writer.write_record(header).map_err(|e| self.csv_err(e))?;
            }
        }
        for row in rows {
            writer.serialize(row).map_err(|e| self.csv_err(e))?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| self.io_err(io::Error::new(e.error().kind(), e.to_string())))?;
        fs::write(&self.path, bytes).await.map_err(|e| self.io_err(e))
    }
}

/// Column names of a struct row type, as serde sees them (renames applied).
fn field_names<R: DeserializeOwned>() -> Option<&'static [&'static str]> {
    let mut fields = None;
    // Always fails: the deserializer stops as soon as it has the field list.
    let _ = R::deserialize(FieldNames(&mut fields));
    fields
}

/// Deserializer that records the field list of a struct and reads nothing.
struct FieldNames<'a>(&'a mut Option<&'static [&'static str]>);

impl<'de> Deserializer<'de> for FieldNames<'_> {
    type Error = de::value::Error;

    fn deserialize_any<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value, Self::Error> {
        Err(de::Error::custom("row type is not a struct"))
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        _visitor: V,
    ) -> Result<V::Value, Self::Error> {
        *self.0 = Some(fields);
        Err(de::Error::custom("field names only"))
    }

    serde::forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf option unit unit_struct newtype_struct seq tuple
        tuple_struct map enum identifier ignored_any
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Quote {
        symbol: String,
        close: f64,
    }

    #[tokio::test]
    async fn test_missing_file_has_no_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let file = CsvFile::new(dir.path().join("absent.csv"));
        assert!(file.modified().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rows_written_with_header_are_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let file = CsvFile::new(dir.path().join("quotes.csv"));
        let rows = vec![
            Quote { symbol: "AAPL".into(), close: 189.5 },
            Quote { symbol: "MSFT".into(), close: 402.25 },
        ];

        file.save(&rows).await.unwrap();

        let text = std::fs::read_to_string(file.path()).unwrap();
        assert!(text.starts_with("symbol,close\n"));
        assert_eq!(file.load::<Quote>().await.unwrap(), rows);
        assert!(file.modified().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_empty_result_keeps_header_row() {
        let dir = tempfile::tempdir().unwrap();
        let file = CsvFile::new(dir.path().join("quotes.csv"));

        file.save::<Quote>(&[]).await.unwrap();

        let text = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(text, "symbol,close\n");
        assert!(file.load::<Quote>().await.unwrap().is_empty());
    }

    #[test]
    fn test_field_names_follow_serde_renames() {
        #[derive(Deserialize)]
        #[allow(dead_code)]
        struct Renamed {
            #[serde(rename = "Ticker")]
            symbol: String,
            close: f64,
        }

        assert_eq!(field_names::<Renamed>(), Some(&["Ticker", "close"][..]));
        assert_eq!(field_names::<u32>(), None);
    }

    #[tokio::test]
    async fn test_malformed_file_is_a_codec_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quotes.csv");
        std::fs::write(&path, "symbol,close\nAAPL,not-a-number\n").unwrap();

        let err = CsvFile::new(path).load::<Quote>().await.unwrap_err();
        assert_eq!(err.as_label(), "cache_csv");
    }
}
