//! Historical trial files: parsing a two-header-line CSV into a [`TrialDataset`].
//!
//! File layout:
//!
//! ```text
//! Ensaio,Hora,Medir,Real          <- display labels
//! ...                             <- secondary header, skipped
//! 0,10:00:00,12.5,12.0            <- trialIndex,timestamp,measuredCm,realCm
//! 1,10:00:01,13.0,12.8
//! ```
//!
//! Loading is fail-fast: the first bad row rejects the whole file.

use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::error::MalformedInputError;

/// One recorded trial.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialRow {
    pub trial_index: u32,
    /// Passed through verbatim from the file.
    pub captured_at: String,
    pub measured_distance_cm: f64,
    pub real_distance_cm: f64,
}

/// All trials of one file, in file order. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialDataset {
    source: PathBuf,
    header_labels: Vec<String>,
    rows: Vec<TrialRow>,
}

impl TrialDataset {
    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn header_labels(&self) -> &[String] {
        &self.header_labels
    }

    pub fn rows(&self) -> &[TrialRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Load and validate a trial file.
pub fn load(path: impl AsRef<Path>) -> Result<TrialDataset, MalformedInputError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|source| MalformedInputError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset = load_from_reader(file, path)?;
    info!(
        "loaded {} trials from {}",
        dataset.len(),
        path.display()
    );
    Ok(dataset)
}

/// Physical lines before the first data row.
const HEADER_LINES: u64 = 2;

/// Parse trial CSV from any reader. `origin` is only used for error messages.
///
/// The two header lines are taken as physical lines, so a blank line 1 gives
/// no labels and a blank line 2 is still the discarded one. Blank lines after
/// the headers carry no fields and are skipped.
pub fn load_from_reader<R: Read>(
    reader: R,
    origin: &Path,
) -> Result<TrialDataset, MalformedInputError> {
    let mut reader = BufReader::new(reader);
    let read_err = |source: std::io::Error| MalformedInputError::Read {
        path: origin.to_path_buf(),
        source,
    };
    let csv_err = |source: csv::Error| MalformedInputError::Csv {
        path: origin.to_path_buf(),
        source,
    };

    let mut first = String::new();
    if reader.read_line(&mut first).map_err(read_err)? == 0 {
        return Err(MalformedInputError::MissingHeader {
            path: origin.to_path_buf(),
            found: 0,
        });
    }
    let header_labels = parse_labels(&first).map_err(csv_err)?;

    let mut second = String::new();
    if reader.read_line(&mut second).map_err(read_err)? == 0 {
        return Err(MalformedInputError::MissingHeader {
            path: origin.to_path_buf(),
            found: 1,
        });
    }

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows: Vec<TrialRow> = Vec::new();
    for record in rdr.records() {
        let record = record.map_err(csv_err)?;
        let line = record.position().map_or(0, |p| p.line()) + HEADER_LINES;
        let row = parse_row(&record, origin, line)?;
        if let Some(prev) = rows.last() {
            if row.trial_index <= prev.trial_index {
                return Err(MalformedInputError::NonIncreasingIndex {
                    path: origin.to_path_buf(),
                    line,
                    index: row.trial_index,
                    previous: prev.trial_index,
                });
            }
        }
        rows.push(row);
    }
    debug!("{}: {} data rows", origin.display(), rows.len());

    Ok(TrialDataset {
        source: origin.to_path_buf(),
        header_labels,
        rows,
    })
}

/// Split the label line into fields. A blank line has no labels.
fn parse_labels(line: &str) -> Result<Vec<String>, csv::Error> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.is_empty() {
        return Ok(Vec::new());
    }
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());
    match rdr.records().next() {
        Some(record) => Ok(record?.iter().map(str::to_string).collect()),
        None => Ok(Vec::new()),
    }
}

fn parse_row(
    record: &csv::StringRecord,
    origin: &Path,
    line: u64,
) -> Result<TrialRow, MalformedInputError> {
    if record.len() < 4 {
        return Err(MalformedInputError::ShortRow {
            path: origin.to_path_buf(),
            line,
            found: record.len(),
        });
    }
    let field = |i: usize| record.get(i).unwrap_or_default();

    let raw_index = field(0);
    let trial_index = raw_index
        .trim()
        .parse::<u32>()
        .map_err(|_| MalformedInputError::BadTrialIndex {
            path: origin.to_path_buf(),
            line,
            value: raw_index.to_string(),
        })?;

    let distance = |i: usize, column: &'static str| {
        let raw = field(i);
        raw.trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| MalformedInputError::BadDistance {
                path: origin.to_path_buf(),
                line,
                column,
                value: raw.to_string(),
            })
    };

    Ok(TrialRow {
        trial_index,
        captured_at: field(1).to_string(),
        measured_distance_cm: distance(2, "measured distance")?,
        real_distance_cm: distance(3, "real distance")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<TrialDataset, MalformedInputError> {
        load_from_reader(text.as_bytes(), Path::new("mem.csv"))
    }

    #[test]
    fn reads_labels_and_rows_in_file_order() {
        let ds = parse(
            "Ensaio,Hora,Medir,Real\n(ignored secondary header line)\n0,10:00:00,12.5,12.0\n1,10:00:01,13.0,12.8\n",
        )
        .unwrap();
        assert_eq!(ds.header_labels(), ["Ensaio", "Hora", "Medir", "Real"]);
        assert_eq!(ds.len(), 2);
        assert_eq!(
            ds.rows()[0],
            TrialRow {
                trial_index: 0,
                captured_at: "10:00:00".into(),
                measured_distance_cm: 12.5,
                real_distance_cm: 12.0,
            }
        );
        assert_eq!(ds.rows()[1].trial_index, 1);
        assert_eq!(ds.rows()[1].measured_distance_cm, 13.0);
    }

    #[test]
    fn header_only_file_is_an_empty_dataset() {
        let ds = parse("a,b,c,d\nx,y\n").unwrap();
        assert!(ds.is_empty());
    }

    #[test]
    fn missing_second_header_fails() {
        let err = parse("a,b,c,d\n").unwrap_err();
        assert!(matches!(err, MalformedInputError::MissingHeader { found: 1, .. }));
        let err = parse("").unwrap_err();
        assert!(matches!(err, MalformedInputError::MissingHeader { found: 0, .. }));
    }

    #[test]
    fn blank_second_line_is_the_skipped_header() {
        let ds = parse("Ensaio,Hora,Medir,Real\n\n0,10:00:00,12.5,12.0\n1,10:00:01,13.0,12.8\n")
            .unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.rows()[0].trial_index, 0);
        assert_eq!(ds.header_labels(), ["Ensaio", "Hora", "Medir", "Real"]);
    }

    #[test]
    fn blank_first_line_gives_no_labels() {
        let ds = parse("\nsecond header\n0,t,1.0,2.0\n").unwrap();
        assert!(ds.header_labels().is_empty());
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.rows()[0].real_distance_cm, 2.0);
    }

    #[test]
    fn crlf_headers_and_line_numbers() {
        let ds = parse("a,b,c,d\r\nx\r\n0,t,1,1\r\n").unwrap();
        assert_eq!(ds.header_labels(), ["a", "b", "c", "d"]);
        let err = parse("a,b,c,d\r\n\r\n0,t,1,1\r\n1,t,x,1\r\n").unwrap_err();
        assert!(matches!(err, MalformedInputError::BadDistance { line: 4, .. }));
    }

    #[test]
    fn extra_fields_are_accepted() {
        let ds = parse("h\nh\n3,t,1.5,2.5,extra\n").unwrap();
        assert_eq!(ds.rows()[0].real_distance_cm, 2.5);
    }

    #[test]
    fn short_row_rejects_the_whole_file() {
        let err = parse("h\nh\n0,t,1,1\n1,t,2\n").unwrap_err();
        match err {
            MalformedInputError::ShortRow { line, found, .. } => {
                assert_eq!(line, 4);
                assert_eq!(found, 3);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn numeric_fields_tolerate_surrounding_spaces() {
        let ds = parse("h\nh\n 7 , 10:00 , 1.25 ,2\n").unwrap();
        let row = &ds.rows()[0];
        assert_eq!(row.trial_index, 7);
        assert_eq!(row.captured_at, " 10:00 ");
        assert_eq!(row.measured_distance_cm, 1.25);
    }

    #[test]
    fn bad_numbers_are_reported_per_column() {
        assert!(matches!(
            parse("h\nh\nx,t,1,1\n").unwrap_err(),
            MalformedInputError::BadTrialIndex { .. }
        ));
        assert!(matches!(
            parse("h\nh\n-1,t,1,1\n").unwrap_err(),
            MalformedInputError::BadTrialIndex { .. }
        ));
        match parse("h\nh\n0,t,abc,1\n").unwrap_err() {
            MalformedInputError::BadDistance { column, value, .. } => {
                assert_eq!(column, "measured distance");
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(
            parse("h\nh\n0,t,1,NaN\n").unwrap_err(),
            MalformedInputError::BadDistance { column: "real distance", .. }
        ));
    }

    #[test]
    fn trial_indices_must_increase() {
        let err = parse("h\nh\n0,t,1,1\n0,t,1,1\n").unwrap_err();
        assert!(matches!(
            err,
            MalformedInputError::NonIncreasingIndex { index: 0, previous: 0, .. }
        ));
    }

    #[test]
    fn missing_file_is_malformed_input() {
        let err = load("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, MalformedInputError::Open { .. }));
    }
}
