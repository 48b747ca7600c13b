use std::collections::{BTreeMap, BTreeSet};

use super::model::{Category, Dataset, Dimension, Record};

// ---------------------------------------------------------------------------
// Filter selection: which values are allowed per dimension
// ---------------------------------------------------------------------------

/// Allowed values per dimension.
///
/// A dimension absent from the selection is unconstrained; a dimension
/// present with an empty set matches nothing. The value is immutable: every
/// update returns a new selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    allowed: BTreeMap<Dimension, BTreeSet<Category>>,
}

impl FilterSelection {
    /// Every value present in the dataset selected, i.e. show everything.
    pub fn all(dataset: &Dataset) -> Self {
        FilterSelection {
            allowed: dataset.unique_values.clone(),
        }
    }

    /// No dimension constrained.
    pub fn unconstrained() -> Self {
        Self::default()
    }

    /// Replace the allowed set for `dim`.
    pub fn with(&self, dim: Dimension, values: impl IntoIterator<Item = Category>) -> Self {
        let mut next = self.clone();
        next.allowed.insert(dim, values.into_iter().collect());
        next
    }

    /// Drop the constraint on `dim` entirely.
    pub fn without(&self, dim: Dimension) -> Self {
        let mut next = self.clone();
        next.allowed.remove(&dim);
        next
    }

    /// Add `value` to `dim`'s set if absent, remove it otherwise.
    /// An unconstrained dimension becomes constrained to `{value}`.
    pub fn toggled(&self, dim: Dimension, value: Category) -> Self {
        let mut next = self.clone();
        let selected = next.allowed.entry(dim).or_default();
        if !selected.remove(&value) {
            selected.insert(value);
        }
        next
    }

    pub fn allowed(&self, dim: Dimension) -> Option<&BTreeSet<Category>> {
        self.allowed.get(&dim)
    }

    pub fn is_selected(&self, dim: Dimension, value: Category) -> bool {
        self.allowed.get(&dim).map_or(true, |set| set.contains(&value))
    }

    /// Whether `record` passes every constrained dimension.
    pub fn matches(&self, record: &Record) -> bool {
        self.allowed
            .iter()
            .all(|(dim, selected)| selected.contains(&record.category(*dim)))
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Return indices of records that pass all active filters, in dataset order.
///
/// A record passes a dimension when:
/// * The dimension is not present in the selection → passes (no constraint)
/// * The allowed set is empty → nothing selected → fails
/// * The record's value for that dimension is in the allowed set → passes
pub fn filtered_indices(dataset: &Dataset, selection: &FilterSelection) -> Vec<usize> {
    // Dimensions whose selection covers every value present can't reject anything.
    let active: Vec<(Dimension, &BTreeSet<Category>)> = selection
        .allowed
        .iter()
        .filter(|(dim, selected)| {
            selected.is_empty()
                || !dataset
                    .unique_values
                    .get(*dim)
                    .is_some_and(|all_vals| selected.is_superset(all_vals))
        })
        .map(|(dim, selected)| (*dim, selected))
        .collect();

    if active.iter().any(|(_, selected)| selected.is_empty()) {
        return Vec::new();
    }

    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| {
            active
                .iter()
                .all(|(dim, selected)| selected.contains(&rec.category(*dim)))
        })
        .map(|(i, _)| i)
        .collect()
}

/// The records that pass all active filters, in dataset order.
pub fn filter_records<'a>(dataset: &'a Dataset, selection: &FilterSelection) -> Vec<&'a Record> {
    filtered_indices(dataset, selection)
        .into_iter()
        .map(|i| &dataset.records[i])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Age, AgeBucket, Sex, YesNo};

    fn record(age: f64, sex: Sex, smoking: YesNo) -> Record {
        Record {
            age: Age::new(age).unwrap(),
            sex,
            anaemia: YesNo::No,
            diabetes: YesNo::No,
            high_blood_pressure: YesNo::No,
            smoking,
            ejection_fraction: 50,
            platelets: 250_000.0,
            serum_sodium: 137,
            deaths: 1,
            year: 2015,
        }
    }

    fn dataset() -> Dataset {
        Dataset::from_records(vec![
            record(25.0, Sex::Female, YesNo::No),
            record(65.0, Sex::Male, YesNo::Yes),
            record(68.0, Sex::Female, YesNo::Yes),
            record(45.0, Sex::Male, YesNo::No),
        ])
    }

    #[test]
    fn default_selection_keeps_everything_in_order() {
        let ds = dataset();
        let sel = FilterSelection::all(&ds);
        assert_eq!(filtered_indices(&ds, &sel), vec![0, 1, 2, 3]);
        assert_eq!(filter_records(&ds, &sel), ds.records.iter().collect::<Vec<_>>());
    }

    #[test]
    fn empty_dimension_matches_nothing() {
        let ds = dataset();
        let sel = FilterSelection::all(&ds).with(Dimension::Smoking, []);
        assert!(filtered_indices(&ds, &sel).is_empty());
    }

    #[test]
    fn omitted_dimension_is_unconstrained() {
        let ds = dataset();
        let sel = FilterSelection::unconstrained();
        assert_eq!(filtered_indices(&ds, &sel).len(), 4);

        let sel = FilterSelection::all(&ds)
            .with(Dimension::Sex, [Category::Sex(Sex::Male)])
            .without(Dimension::Sex);
        assert_eq!(filtered_indices(&ds, &sel).len(), 4);
    }

    #[test]
    fn and_across_dimensions_or_within() {
        let ds = dataset();
        let sixties = Category::AgeBucket(AgeBucket::for_age(65.0).unwrap());
        let twenties = Category::AgeBucket(AgeBucket::for_age(25.0).unwrap());

        let sel = FilterSelection::all(&ds)
            .with(Dimension::AgeBucket, [sixties, twenties])
            .with(Dimension::Smoking, [Category::Flag(YesNo::Yes)]);
        assert_eq!(filtered_indices(&ds, &sel), vec![1, 2]);

        let sel = sel.with(Dimension::Sex, [Category::Sex(Sex::Female)]);
        assert_eq!(filtered_indices(&ds, &sel), vec![2]);
    }

    #[test]
    fn value_absent_from_dataset_matches_nothing() {
        let ds = Dataset::from_records(vec![record(25.0, Sex::Female, YesNo::No)]);
        let sel = FilterSelection::all(&ds).with(Dimension::Sex, [Category::Sex(Sex::Male)]);
        assert!(filter_records(&ds, &sel).is_empty());
    }

    #[test]
    fn toggled_adds_and_removes() {
        let ds = dataset();
        let all = FilterSelection::all(&ds);
        let male = Category::Sex(Sex::Male);

        let without_male = all.toggled(Dimension::Sex, male);
        assert!(!without_male.is_selected(Dimension::Sex, male));
        assert_eq!(filtered_indices(&ds, &without_male), vec![0, 2]);

        let back = without_male.toggled(Dimension::Sex, male);
        assert_eq!(back, all);
        // `all` itself is unchanged.
        assert!(all.is_selected(Dimension::Sex, male));
    }

    #[test]
    fn matches_agrees_with_filtered_indices() {
        let ds = dataset();
        let sel = FilterSelection::unconstrained().with(Dimension::Smoking, [Category::Flag(YesNo::No)]);
        let by_predicate: Vec<usize> = ds
            .records
            .iter()
            .enumerate()
            .filter(|(_, r)| sel.matches(r))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(by_predicate, filtered_indices(&ds, &sel));
    }

    #[test]
    fn filtering_is_idempotent() {
        let ds = dataset();
        let sel = FilterSelection::all(&ds).with(Dimension::Sex, [Category::Sex(Sex::Female)]);
        let once = filter_records(&ds, &sel);
        let again = Dataset::from_records(once.iter().map(|r| (*r).clone()).collect());
        let twice = filter_records(&again, &sel);
        assert_eq!(once, twice);
        assert_eq!(filtered_indices(&ds, &sel), filtered_indices(&ds, &sel));
    }
}
