use std::collections::BTreeMap;

use serde::Serialize;

use super::model::{AgeBucket, Record, Sex, YesNo};

// ---------------------------------------------------------------------------
// Thresholds for the clinical counts
// ---------------------------------------------------------------------------

/// Bounds of the "abnormal" counts. The defaults are the usual clinical
/// reference values: ejection fraction below 40 % and platelets outside
/// 150 000 – 450 000 per mL.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Thresholds {
    pub low_ejection_fraction: u32,
    pub platelets_min: f64,
    pub platelets_max: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Thresholds {
            low_ejection_fraction: 40,
            platelets_min: 150_000.0,
            platelets_max: 450_000.0,
        }
    }
}

impl Thresholds {
    pub fn is_low_ejection_fraction(&self, percent: u32) -> bool {
        percent < self.low_ejection_fraction
    }

    /// Strictly outside `[platelets_min, platelets_max]`.
    pub fn is_abnormal_platelets(&self, platelets: f64) -> bool {
        platelets < self.platelets_min || platelets > self.platelets_max
    }
}

// ---------------------------------------------------------------------------
// Group-by primitive
// ---------------------------------------------------------------------------

/// `(key, value)` pairs in ascending key order.
pub type Series<K> = Vec<(K, u64)>;

/// Group `records` by `key` and fold each group with `reduce`, starting from
/// `V::default()`. Only keys that occur are emitted, in ascending order.
pub fn group_by<K, V, F, R>(records: &[&Record], key: F, mut reduce: R) -> Vec<(K, V)>
where
    K: Ord,
    V: Default,
    F: Fn(&Record) -> K,
    R: FnMut(&mut V, &Record),
{
    let mut groups: BTreeMap<K, V> = BTreeMap::new();
    for rec in records {
        reduce(groups.entry(key(*rec)).or_default(), *rec);
    }
    groups.into_iter().collect()
}

fn count(acc: &mut u64, _: &Record) {
    *acc += 1;
}

fn sum_deaths(acc: &mut u64, rec: &Record) {
    *acc += rec.deaths;
}

/// Turns a group key into the label shown on a chart axis.
pub trait GroupKey {
    fn key_label(&self) -> String;
}

impl GroupKey for AgeBucket {
    fn key_label(&self) -> String {
        self.label().to_string()
    }
}

impl GroupKey for Sex {
    fn key_label(&self) -> String {
        self.label().to_string()
    }
}

impl GroupKey for YesNo {
    fn key_label(&self) -> String {
        self.label().to_string()
    }
}

impl GroupKey for i32 {
    fn key_label(&self) -> String {
        self.to_string()
    }
}

impl GroupKey for u32 {
    fn key_label(&self) -> String {
        self.to_string()
    }
}

/// Replace typed keys by their labels.
pub fn labelled<K: GroupKey>(series: &Series<K>) -> Vec<(String, u64)> {
    series.iter().map(|(k, v)| (k.key_label(), *v)).collect()
}

// ---------------------------------------------------------------------------
// Aggregate results
// ---------------------------------------------------------------------------

/// A named statistic handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AggregateResult {
    Scalar {
        name: &'static str,
        value: u64,
    },
    Series {
        name: &'static str,
        points: Vec<(String, u64)>,
    },
}

impl AggregateResult {
    pub fn name(&self) -> &'static str {
        match self {
            AggregateResult::Scalar { name, .. } | AggregateResult::Series { name, .. } => *name,
        }
    }
}

/// The full battery of aggregates over one filtered record set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub thresholds: Thresholds,
    pub total_cases: u64,
    pub total_deaths: u64,
    pub low_ejection_fraction_count: u64,
    pub abnormal_platelets_count: u64,
    pub deaths_by_age_bucket: Series<AgeBucket>,
    pub sex_distribution: Series<Sex>,
    pub cases_by_year: Series<i32>,
    pub deaths_by_anaemia: Series<YesNo>,
    pub deaths_by_diabetes: Series<YesNo>,
    pub deaths_by_high_blood_pressure: Series<YesNo>,
    pub deaths_by_smoking: Series<YesNo>,
    /// Ascending by sodium level.
    pub deaths_by_serum_sodium: Series<u32>,
}

impl Summary {
    /// Compute every aggregate with the default thresholds.
    pub fn compute(records: &[&Record]) -> Self {
        Self::compute_with(records, Thresholds::default())
    }

    pub fn compute_with(records: &[&Record], thresholds: Thresholds) -> Self {
        Summary {
            thresholds,
            total_cases: records.len() as u64,
            total_deaths: records.iter().map(|r| r.deaths).sum(),
            low_ejection_fraction_count: records
                .iter()
                .filter(|r| thresholds.is_low_ejection_fraction(r.ejection_fraction))
                .count() as u64,
            abnormal_platelets_count: records
                .iter()
                .filter(|r| thresholds.is_abnormal_platelets(r.platelets))
                .count() as u64,
            deaths_by_age_bucket: group_by(records, Record::age_bucket, sum_deaths),
            sex_distribution: group_by(records, |r| r.sex, count),
            cases_by_year: group_by(records, |r| r.year, count),
            deaths_by_anaemia: group_by(records, |r| r.anaemia, sum_deaths),
            deaths_by_diabetes: group_by(records, |r| r.diabetes, sum_deaths),
            deaths_by_high_blood_pressure: group_by(records, |r| r.high_blood_pressure, sum_deaths),
            deaths_by_smoking: group_by(records, |r| r.smoking, sum_deaths),
            deaths_by_serum_sodium: group_by(records, |r| r.serum_sodium, sum_deaths),
        }
    }

    /// Flatten into named results, scalars first.
    pub fn results(&self) -> Vec<AggregateResult> {
        let scalar = |name, value| AggregateResult::Scalar { name, value };
        let series = |name, points| AggregateResult::Series { name, points };

        vec![
            scalar("total_cases", self.total_cases),
            scalar("total_deaths", self.total_deaths),
            scalar("low_ejection_fraction_count", self.low_ejection_fraction_count),
            scalar("abnormal_platelets_count", self.abnormal_platelets_count),
            series("deaths_by_age_bucket", labelled(&self.deaths_by_age_bucket)),
            series("sex_distribution", labelled(&self.sex_distribution)),
            series("cases_by_year", labelled(&self.cases_by_year)),
            series("deaths_by_anaemia", labelled(&self.deaths_by_anaemia)),
            series("deaths_by_diabetes", labelled(&self.deaths_by_diabetes)),
            series(
                "deaths_by_high_blood_pressure",
                labelled(&self.deaths_by_high_blood_pressure),
            ),
            series("deaths_by_smoking", labelled(&self.deaths_by_smoking)),
            series("deaths_by_serum_sodium", labelled(&self.deaths_by_serum_sodium)),
        ]
    }

    /// Pretty-printed JSON of the thresholds and every aggregate.
    pub fn to_json(&self) -> serde_json::Result<String> {
        #[derive(Serialize)]
        struct Export<'a> {
            thresholds: &'a Thresholds,
            aggregates: Vec<AggregateResult>,
        }

        serde_json::to_string_pretty(&Export {
            thresholds: &self.thresholds,
            aggregates: self.results(),
        })
    }
}
