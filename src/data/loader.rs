use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use csv::StringRecord;

use super::error::{InputError, LoadError};
use super::model::Dataset;
use super::normalize::normalize_all;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Columns that must be present in the header row. Order in the file is free
/// and extra columns are ignored.
pub const REQUIRED_COLUMNS: [&str; 11] = [
    "age",
    "anaemia",
    "diabetes",
    "ejection_fraction",
    "high_blood_pressure",
    "platelets",
    "serum_sodium",
    "sex",
    "smoking",
    "deaths",
    "year",
];

/// One CSV row before normalization.
///
/// Numeric columns are already typed; the coded categorical columns keep
/// their cell text so that decoding them stays inside the normalizer.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub age: f64,
    pub sex: String,
    pub anaemia: String,
    pub diabetes: String,
    pub high_blood_pressure: String,
    pub smoking: String,
    pub ejection_fraction: u32,
    pub platelets: f64,
    pub serum_sodium: u32,
    pub deaths: u64,
    pub year: i32,
}

/// Load and normalize a heart-failure CSV file.
pub fn load_dataset(path: &Path) -> Result<Dataset, LoadError> {
    let raw = load_file(path)?;
    let dataset = Dataset::from_records(normalize_all(&raw)?);
    log::info!("Loaded {} records from {}", dataset.len(), path.display());
    Ok(dataset)
}

/// Load and normalize CSV text from any reader.
pub fn read_dataset<R: Read>(reader: R) -> Result<Dataset, LoadError> {
    let raw = read_raw(reader)?;
    Ok(Dataset::from_records(normalize_all(&raw)?))
}

/// Read the raw rows of a CSV file.
pub fn load_file(path: &Path) -> Result<Vec<RawRecord>, InputError> {
    let file = File::open(path).map_err(|source| InputError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    read_raw(file)
}

/// Read raw rows from CSV text with a header row.
pub fn read_raw<R: Read>(reader: R) -> Result<Vec<RawRecord>, InputError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = reader.headers()?.clone();
    let columns = ColumnIndex::resolve(&headers)?;

    let mut rows = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let record = result?;
        rows.push(columns.parse_row(&record, i + 1)?);
    }
    log::debug!("Read {} raw rows", rows.len());
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Header resolution and cell parsing
// ---------------------------------------------------------------------------

/// Position of every required column in the header row.
struct ColumnIndex {
    age: usize,
    anaemia: usize,
    diabetes: usize,
    ejection_fraction: usize,
    high_blood_pressure: usize,
    platelets: usize,
    serum_sodium: usize,
    sex: usize,
    smoking: usize,
    deaths: usize,
    year: usize,
}

impl ColumnIndex {
    fn resolve(headers: &StringRecord) -> Result<Self, InputError> {
        let position = |column: &'static str| {
            headers
                .iter()
                .position(|h| h == column)
                .ok_or(InputError::MissingColumn { column })
        };

        Ok(ColumnIndex {
            age: position("age")?,
            anaemia: position("anaemia")?,
            diabetes: position("diabetes")?,
            ejection_fraction: position("ejection_fraction")?,
            high_blood_pressure: position("high_blood_pressure")?,
            platelets: position("platelets")?,
            serum_sodium: position("serum_sodium")?,
            sex: position("sex")?,
            smoking: position("smoking")?,
            deaths: position("deaths")?,
            year: position("year")?,
        })
    }

    fn parse_row(&self, record: &StringRecord, row: usize) -> Result<RawRecord, InputError> {
        let text = |idx: usize| cell(record, idx).to_string();

        Ok(RawRecord {
            age: parse_cell(record, self.age, row, "age", "number")?,
            sex: text(self.sex),
            anaemia: text(self.anaemia),
            diabetes: text(self.diabetes),
            high_blood_pressure: text(self.high_blood_pressure),
            smoking: text(self.smoking),
            ejection_fraction: parse_cell(
                record,
                self.ejection_fraction,
                row,
                "ejection_fraction",
                "non-negative integer",
            )?,
            platelets: parse_cell(record, self.platelets, row, "platelets", "number")?,
            serum_sodium: parse_cell(
                record,
                self.serum_sodium,
                row,
                "serum_sodium",
                "non-negative integer",
            )?,
            deaths: parse_cell(record, self.deaths, row, "deaths", "non-negative integer")?,
            year: parse_cell(record, self.year, row, "year", "integer")?,
        })
    }
}

fn cell(record: &StringRecord, idx: usize) -> &str {
    record.get(idx).unwrap_or("")
}

fn parse_cell<T: FromStr>(
    record: &StringRecord,
    idx: usize,
    row: usize,
    column: &'static str,
    expected: &'static str,
) -> Result<T, InputError> {
    let value = cell(record, idx);
    value.parse::<T>().map_err(|_| InputError::InvalidValue {
        row,
        column,
        value: value.to_string(),
        expected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "age,anaemia,diabetes,ejection_fraction,high_blood_pressure,platelets,serum_sodium,sex,smoking,deaths,year";

    #[test]
    fn reads_typed_rows() {
        let csv = format!("{HEADER}\n25,1,0,35,0,500000,130,0,0,1,2015\n60.667,0,1,38,1,265000.00,136,1,1,0,2016\n");
        let rows = read_raw(csv.as_bytes()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].age, 25.0);
        assert_eq!(rows[0].anaemia, "1");
        assert_eq!(rows[0].platelets, 500_000.0);
        assert_eq!(rows[1].age, 60.667);
        assert_eq!(rows[1].sex, "1");
        assert_eq!(rows[1].year, 2016);
    }

    #[test]
    fn columns_resolve_by_name_and_extras_are_ignored() {
        let csv = "DEATH_EVENT,year,deaths,smoking,sex,serum_sodium,creatinine_phosphokinase,platelets,high_blood_pressure,ejection_fraction,diabetes,anaemia,age\n\
                   1,2014,2,1,1,137,582,263358.03,0,20,0,0,75\n";
        let rows = read_raw(csv.as_bytes()).unwrap();

        assert_eq!(rows[0].age, 75.0);
        assert_eq!(rows[0].deaths, 2);
        assert_eq!(rows[0].ejection_fraction, 20);
        assert_eq!(rows[0].serum_sodium, 137);
    }

    #[test]
    fn missing_column_is_named() {
        let csv = "age,anaemia,diabetes,ejection_fraction,high_blood_pressure,platelets,serum_sodium,sex,smoking,year\n";
        let err = read_raw(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, InputError::MissingColumn { column: "deaths" }));
    }

    #[test]
    fn unparseable_cell_reports_row_and_column() {
        let csv = format!("{HEADER}\n25,1,0,35,0,500000,130,0,0,1,2015\n40,0,0,abc,0,200000,140,1,0,0,2015\n");
        let err = read_raw(csv.as_bytes()).unwrap_err();

        match err {
            InputError::InvalidValue { row, column, value, .. } => {
                assert_eq!(row, 2);
                assert_eq!(column, "ejection_fraction");
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn negative_deaths_are_input_errors() {
        let csv = format!("{HEADER}\n25,1,0,35,0,500000,130,0,0,-1,2015\n");
        let err = read_raw(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, InputError::InvalidValue { column: "deaths", .. }));
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn ragged_rows_are_csv_errors() {
        let csv = format!("{HEADER}\n25,1,0\n");
        assert!(matches!(read_raw(csv.as_bytes()), Err(InputError::Csv(_))));
    }

    #[test]
    fn read_dataset_normalizes() {
        let csv = format!("{HEADER}\n25,1,0,35,0,500000,130,0,0,1,2015\n");
        let ds = read_dataset(csv.as_bytes()).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records[0].age_bucket().label(), "21-30");
    }

    #[test]
    fn read_dataset_surfaces_data_errors() {
        let csv = format!("{HEADER}\n100,1,0,35,0,500000,130,0,0,1,2015\n");
        assert!(matches!(read_dataset(csv.as_bytes()), Err(LoadError::Data(_))));
    }
}
