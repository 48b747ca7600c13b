use std::path::Path;

use anyhow::{Context, Result};

use crate::config::DashboardConfig;
use crate::data::aggregate::{Summary, Thresholds};
use crate::data::filter::FilterSelection;
use crate::data::loader::load_dataset;
use crate::data::model::{Category, Dataset, Dimension, Record};
use crate::data::{evaluate, Evaluation};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct DashboardState {
    /// Loaded dataset (None until user loads a file).
    pub dataset: Option<Dataset>,

    /// Current sidebar selection. Replaced, never edited, on every change.
    pub selection: FilterSelection,

    /// Selected record indices and their aggregates for `selection`.
    pub evaluation: Evaluation,

    pub thresholds: Thresholds,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether the table of selected records is shown.
    pub show_records: bool,
}

impl DashboardState {
    pub fn new(config: &DashboardConfig) -> Self {
        let mut state = DashboardState {
            thresholds: config.thresholds,
            ..Default::default()
        };
        if let Some(path) = &config.initial_path {
            state.open(path);
        }
        state
    }

    /// Load `path`, reporting failures in the status line.
    pub fn open(&mut self, path: &Path) {
        match self.try_open(path) {
            Ok(()) => self.status_message = None,
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    fn try_open(&mut self, path: &Path) -> Result<()> {
        let dataset =
            load_dataset(path).with_context(|| format!("loading {}", path.display()))?;
        self.set_dataset(dataset);
        Ok(())
    }

    /// Ingest a newly loaded dataset and reset the filters to "everything".
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.selection = FilterSelection::all(&dataset);
        self.dataset = Some(dataset);
        self.refilter();
    }

    /// Recompute the selection's records and aggregates from scratch.
    pub fn refilter(&mut self) {
        self.evaluation = match &self.dataset {
            Some(ds) => evaluate(ds, &self.selection, self.thresholds),
            None => Evaluation::default(),
        };
    }

    pub fn summary(&self) -> &Summary {
        &self.evaluation.summary
    }

    /// Records passing the current selection, in file order.
    pub fn selected_records(&self) -> impl Iterator<Item = &Record> + '_ {
        let records = self.dataset.as_ref().map(|ds| ds.records.as_slice()).unwrap_or(&[]);
        self.evaluation.indices.iter().map(move |&i| &records[i])
    }

    fn apply(&mut self, selection: FilterSelection) {
        if selection != self.selection {
            self.selection = selection;
            self.refilter();
        }
    }

    /// Toggle a single value in a dimension's selection.
    pub fn toggle_filter_value(&mut self, dim: Dimension, value: Category) {
        self.apply(self.selection.toggled(dim, value));
    }

    /// Select every value of a dimension.
    pub fn select_all(&mut self, dim: Dimension) {
        if let Some(ds) = &self.dataset {
            let next = self.selection.with(dim, ds.options(dim));
            self.apply(next);
        }
    }

    /// Deselect every value of a dimension.
    pub fn select_none(&mut self, dim: Dimension) {
        self.apply(self.selection.with(dim, []));
    }

    /// Back to the unfiltered default.
    pub fn reset_filters(&mut self) {
        if let Some(ds) = &self.dataset {
            let next = FilterSelection::all(ds);
            self.apply(next);
        }
    }

    /// Write the current aggregates as JSON.
    pub fn export_summary(&self, path: &Path) -> Result<()> {
        let json = self.summary().to_json().context("serializing summary")?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        log::info!("Exported summary to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::read_dataset;
    use crate::data::model::{Sex, YesNo};

    const CSV: &str = "age,anaemia,diabetes,ejection_fraction,high_blood_pressure,platelets,serum_sodium,sex,smoking,deaths,year
75,0,0,20,1,265000,130,1,0,2,2014
55,0,0,38,0,263358.03,136,1,0,1,2015
65,1,0,20,0,162000,129,0,1,0,2015
50,1,0,60,0,210000,137,0,0,3,2016
";

    fn state() -> DashboardState {
        let mut state = DashboardState::default();
        state.set_dataset(read_dataset(CSV.as_bytes()).unwrap());
        state
    }

    #[test]
    fn loading_selects_everything() {
        let state = state();
        assert_eq!(state.evaluation.indices, vec![0, 1, 2, 3]);
        assert_eq!(state.summary().total_cases, 4);
        assert_eq!(state.summary().total_deaths, 6);
    }

    #[test]
    fn toggling_recomputes_aggregates() {
        let mut state = state();
        state.toggle_filter_value(Dimension::Sex, Category::Sex(Sex::Male));

        assert_eq!(state.evaluation.indices, vec![2, 3]);
        assert_eq!(state.summary().total_deaths, 3);
        assert!(state.selected_records().all(|r| r.sex == Sex::Female));

        state.toggle_filter_value(Dimension::Sex, Category::Sex(Sex::Male));
        assert_eq!(state.summary().total_cases, 4);
    }

    #[test]
    fn select_none_then_all() {
        let mut state = state();
        state.select_none(Dimension::Anaemia);
        assert_eq!(state.summary().total_cases, 0);
        assert!(state.summary().deaths_by_anaemia.is_empty());

        state.select_all(Dimension::Anaemia);
        assert_eq!(state.summary().total_cases, 4);
    }

    #[test]
    fn reset_restores_default_selection() {
        let mut state = state();
        state.toggle_filter_value(Dimension::Smoking, Category::Flag(YesNo::No));
        assert_eq!(state.summary().total_cases, 1);

        state.reset_filters();
        assert_eq!(state.selection, FilterSelection::all(state.dataset.as_ref().unwrap()));
        assert_eq!(state.summary().total_cases, 4);
    }

    #[test]
    fn failed_open_sets_status() {
        let mut state = DashboardState::default();
        state.open(Path::new("/nonexistent/heart.csv"));
        assert!(state.dataset.is_none());
        assert!(state.status_message.as_deref().unwrap().contains("heart.csv"));
    }

    #[test]
    fn export_writes_json() {
        let state = state();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        state.export_summary(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"total_cases\""));
    }
}
