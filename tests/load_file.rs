use std::io::Write;

use heart_dash::data::aggregate::{labelled, Summary};
use heart_dash::data::error::{DataError, InputError, LoadError};
use heart_dash::data::filter::{filter_records, FilterSelection};
use heart_dash::data::loader::load_dataset;
use heart_dash::data::model::{Category, Dimension, Sex, YesNo};

const HEADER: &str = "age,anaemia,creatinine_phosphokinase,diabetes,ejection_fraction,high_blood_pressure,platelets,serum_creatinine,serum_sodium,sex,smoking,time,deaths,year";

fn write_csv(body: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "{HEADER}").unwrap();
    file.write_all(body.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn single_case_end_to_end() {
    let file = write_csv("25,1,582,0,35,0,500000,1.9,130,0,0,4,1,2015\n");
    let ds = load_dataset(file.path()).unwrap();

    let rec = &ds.records[0];
    assert_eq!(rec.age_bucket().label(), "21-30");
    assert_eq!(rec.sex, Sex::Female);
    assert_eq!(rec.anaemia, YesNo::Yes);

    let summary = Summary::compute(&filter_records(&ds, &FilterSelection::all(&ds)));
    assert_eq!(summary.total_cases, 1);
    assert_eq!(summary.total_deaths, 1);
    assert_eq!(summary.low_ejection_fraction_count, 1);
    assert_eq!(summary.abnormal_platelets_count, 1);
    assert_eq!(
        labelled(&summary.deaths_by_age_bucket),
        vec![("21-30".to_string(), 1)]
    );

    let male_only = FilterSelection::all(&ds).with(Dimension::Sex, [Category::Sex(Sex::Male)]);
    let records = filter_records(&ds, &male_only);
    assert!(records.is_empty());
    let summary = Summary::compute(&records);
    assert_eq!(summary.total_cases, 0);
    assert_eq!(summary.total_deaths, 0);
    assert_eq!(summary.low_ejection_fraction_count, 0);
    assert_eq!(summary.abnormal_platelets_count, 0);
    assert!(summary.deaths_by_age_bucket.is_empty());
    assert!(summary.sex_distribution.is_empty());
}

#[test]
fn options_are_the_distinct_values_present() {
    let file = write_csv(
        "75,0,582,0,20,1,265000,1.9,130,1,0,4,2,2014\n\
         55,0,7861,0,38,0,263358.03,1.1,136,1,0,6,1,2015\n\
         65,0,146,0,20,0,162000,1.3,129,1,1,7,0,2015\n",
    );
    let ds = load_dataset(file.path()).unwrap();

    let sexes: Vec<&str> = ds.options(Dimension::Sex).map(|c| c.label()).collect();
    assert_eq!(sexes, vec!["Male"]);
    let ages: Vec<&str> = ds.options(Dimension::AgeBucket).map(|c| c.label()).collect();
    assert_eq!(ages, vec!["51-60", "61-70", "71-80"]);
    let anaemia: Vec<&str> = ds.options(Dimension::Anaemia).map(|c| c.label()).collect();
    assert_eq!(anaemia, vec!["No"]);
}

#[test]
fn missing_file_is_an_input_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_dataset(&dir.path().join("absent.csv")).unwrap_err();
    assert!(matches!(err, LoadError::Input(InputError::Open { .. })));
}

#[test]
fn labelled_file_is_rejected() {
    let file = write_csv("25,Yes,582,No,35,No,500000,1.9,130,Female,No,4,1,2015\n");
    let err = load_dataset(file.path()).unwrap_err();
    assert!(matches!(
        err,
        LoadError::Data(DataError::AlreadyLabelled { row: 1, column: "sex", .. })
    ));
}

#[test]
fn age_without_band_is_a_data_error() {
    let file = write_csv(
        "25,1,582,0,35,0,500000,1.9,130,0,0,4,1,2015\n\
         100,1,582,0,35,0,500000,1.9,130,0,0,4,1,2015\n",
    );
    let err = load_dataset(file.path()).unwrap_err();
    assert!(matches!(err, LoadError::Data(DataError::AgeOutOfRange { row: 2, .. })));
    assert!(err.to_string().contains("row 2"));
}
