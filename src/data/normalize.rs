use super::error::DataError;
use super::loader::RawRecord;
use super::model::{Age, Record, Sex, YesNo};

// ---------------------------------------------------------------------------
// Raw code → label mapping
// ---------------------------------------------------------------------------

/// Normalize every raw row. Stops at the first row without a valid mapping.
pub fn normalize_all(raw: &[RawRecord]) -> Result<Vec<Record>, DataError> {
    raw.iter()
        .enumerate()
        .map(|(i, r)| normalize(r, i + 1))
        .collect()
}

/// Turn one raw row (1-based `row`) into a labelled [`Record`].
///
/// Coded columns must hold `0` or `1`. A cell that already holds the label
/// ("Male", "Yes", ...) is rejected with [`DataError::AlreadyLabelled`]:
/// normalizing labelled data twice is an error, not a no-op.
pub fn normalize(raw: &RawRecord, row: usize) -> Result<Record, DataError> {
    let age = Age::new(raw.age).ok_or(DataError::AgeOutOfRange { row, age: raw.age })?;

    Ok(Record {
        age,
        sex: decode_sex(&raw.sex, row)?,
        anaemia: decode_flag(&raw.anaemia, row, "anaemia")?,
        diabetes: decode_flag(&raw.diabetes, row, "diabetes")?,
        high_blood_pressure: decode_flag(&raw.high_blood_pressure, row, "high_blood_pressure")?,
        smoking: decode_flag(&raw.smoking, row, "smoking")?,
        ejection_fraction: raw.ejection_fraction,
        platelets: raw.platelets,
        serum_sodium: raw.serum_sodium,
        deaths: raw.deaths,
        year: raw.year,
    })
}

fn decode_sex(cell: &str, row: usize) -> Result<Sex, DataError> {
    let labels = [Sex::Female.label(), Sex::Male.label()];
    Ok(match decode_code(cell, row, "sex", labels)? {
        false => Sex::Female,
        true => Sex::Male,
    })
}

fn decode_flag(cell: &str, row: usize, column: &'static str) -> Result<YesNo, DataError> {
    let labels = [YesNo::No.label(), YesNo::Yes.label()];
    Ok(match decode_code(cell, row, column, labels)? {
        false => YesNo::No,
        true => YesNo::Yes,
    })
}

/// 0 → false, 1 → true; `labels` are the column's human-readable values.
fn decode_code(
    cell: &str,
    row: usize,
    column: &'static str,
    labels: [&str; 2],
) -> Result<bool, DataError> {
    let cell = cell.trim();
    match cell.parse::<i64>() {
        Ok(0) => Ok(false),
        Ok(1) => Ok(true),
        _ if labels.iter().any(|l| l.eq_ignore_ascii_case(cell)) => {
            Err(DataError::AlreadyLabelled {
                row,
                column,
                value: cell.to_string(),
            })
        }
        _ => Err(DataError::UnknownCode {
            row,
            column,
            value: cell.to_string(),
        }),
    }
}
