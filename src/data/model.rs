use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ---------------------------------------------------------------------------
// Labelled categorical values
// ---------------------------------------------------------------------------

/// Patient sex as recorded in the `sex` column (0 = Female, 1 = Male).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Sex {
    Female,
    Male,
}

impl Sex {
    pub fn label(self) -> &'static str {
        match self {
            Sex::Female => "Female",
            Sex::Male => "Male",
        }
    }
}

/// A boolean-like clinical flag (anaemia, diabetes, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum YesNo {
    No,
    Yes,
}

impl YesNo {
    pub fn label(self) -> &'static str {
        match self {
            YesNo::No => "No",
            YesNo::Yes => "Yes",
        }
    }
}

const AGE_BAND_LABELS: [&str; 10] = [
    "1-10", "11-20", "21-30", "31-40", "41-50", "51-60", "61-70", "71-80", "81-90", "91-100",
];

/// One of the ten decade bands "1-10" … "91-100".
///
/// The band of an age is the one whose lower bound equals
/// `floor(age / 10) * 10 + 1`, so age 10 lands in "11-20" and age 9 in "1-10".
/// Ordering follows the decades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AgeBucket(u8);

impl AgeBucket {
    /// Band for an age in years, or `None` when no band covers it
    /// (below 1, 100 and above, NaN).
    pub fn for_age(years: f64) -> Option<Self> {
        if !years.is_finite() || !(1.0..100.0).contains(&years) {
            return None;
        }
        Some(AgeBucket((years / 10.0).floor() as u8))
    }

    /// All bands in ascending order.
    pub fn all() -> impl Iterator<Item = AgeBucket> {
        (0..AGE_BAND_LABELS.len() as u8).map(AgeBucket)
    }

    /// `floor(age / 10) * 10 + 1` for any age in this band.
    pub fn lower_bound(self) -> u32 {
        u32::from(self.0) * 10 + 1
    }

    pub fn label(self) -> &'static str {
        AGE_BAND_LABELS[usize::from(self.0)]
    }
}

/// A validated age in years. Always covered by exactly one [`AgeBucket`].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Age(f64);

impl Age {
    pub fn new(years: f64) -> Option<Self> {
        AgeBucket::for_age(years).map(|_| Age(years))
    }

    pub fn years(self) -> f64 {
        self.0
    }

    /// Derived on every call; the bucket is never stored next to the age.
    pub fn bucket(self) -> AgeBucket {
        AgeBucket((self.0 / 10.0).floor() as u8)
    }
}

impl fmt::Display for Age {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.fract() == 0.0 {
            write!(f, "{}", self.0 as u32)
        } else {
            write!(f, "{:.1}", self.0)
        }
    }
}

// ---------------------------------------------------------------------------
// Dimensions – the filterable / groupable axes
// ---------------------------------------------------------------------------

/// A categorical field usable as a filter and group-by axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dimension {
    AgeBucket,
    Sex,
    Anaemia,
    Diabetes,
    HighBloodPressure,
    Smoking,
}

impl Dimension {
    /// Sidebar order.
    pub const ALL: [Dimension; 6] = [
        Dimension::AgeBucket,
        Dimension::Sex,
        Dimension::Anaemia,
        Dimension::Diabetes,
        Dimension::HighBloodPressure,
        Dimension::Smoking,
    ];

    /// Field name as used in the dataset and in aggregate names.
    pub fn column(self) -> &'static str {
        match self {
            Dimension::AgeBucket => "age_bucket",
            Dimension::Sex => "sex",
            Dimension::Anaemia => "anaemia",
            Dimension::Diabetes => "diabetes",
            Dimension::HighBloodPressure => "high_blood_pressure",
            Dimension::Smoking => "smoking",
        }
    }

    /// Human-readable caption for filter widgets.
    pub fn title(self) -> &'static str {
        match self {
            Dimension::AgeBucket => "Age group",
            Dimension::Sex => "Gender",
            Dimension::Anaemia => "Anaemia",
            Dimension::Diabetes => "Diabetes",
            Dimension::HighBloodPressure => "High blood pressure",
            Dimension::Smoking => "Smoking",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// A labelled value of some dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    AgeBucket(AgeBucket),
    Sex(Sex),
    Flag(YesNo),
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Category::AgeBucket(b) => b.label(),
            Category::Sex(s) => s.label(),
            Category::Flag(f) => f.label(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Record – one normalized case
// ---------------------------------------------------------------------------

/// One heart-failure case with human-readable categorical fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub age: Age,
    pub sex: Sex,
    pub anaemia: YesNo,
    pub diabetes: YesNo,
    pub high_blood_pressure: YesNo,
    pub smoking: YesNo,
    /// Percent of blood leaving the heart per contraction.
    pub ejection_fraction: u32,
    /// Platelets per millilitre.
    pub platelets: f64,
    /// mEq/L.
    pub serum_sodium: u32,
    pub deaths: u64,
    pub year: i32,
}

impl Record {
    pub fn age_bucket(&self) -> AgeBucket {
        self.age.bucket()
    }

    /// The record's value along `dim`.
    pub fn category(&self, dim: Dimension) -> Category {
        match dim {
            Dimension::AgeBucket => Category::AgeBucket(self.age_bucket()),
            Dimension::Sex => Category::Sex(self.sex),
            Dimension::Anaemia => Category::Flag(self.anaemia),
            Dimension::Diabetes => Category::Flag(self.diabetes),
            Dimension::HighBloodPressure => Category::Flag(self.high_blood_pressure),
            Dimension::Smoking => Category::Flag(self.smoking),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete normalized record set
// ---------------------------------------------------------------------------

/// The normalized dataset with pre-computed per-dimension value sets.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// All records, in file order.
    pub records: Vec<Record>,
    /// For each dimension the sorted set of values present in `records`.
    pub unique_values: BTreeMap<Dimension, BTreeSet<Category>>,
}

impl Dataset {
    /// Build the dimension indices from normalized records.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut unique_values: BTreeMap<Dimension, BTreeSet<Category>> = BTreeMap::new();

        for rec in &records {
            for dim in Dimension::ALL {
                unique_values.entry(dim).or_default().insert(rec.category(dim));
            }
        }
        Dataset {
            records,
            unique_values,
        }
    }

    /// Options of the multi-select for `dim`: every value present, sorted.
    pub fn options(&self, dim: Dimension) -> impl Iterator<Item = Category> + '_ {
        self.unique_values
            .get(&dim)
            .into_iter()
            .flat_map(|vals| vals.iter().copied())
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
