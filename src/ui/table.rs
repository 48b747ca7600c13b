use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::Record;
use crate::state::DashboardState;

const HEADERS: [&str; 12] = [
    "age",
    "age group",
    "sex",
    "anaemia",
    "diabetes",
    "high BP",
    "smoking",
    "ejection fraction",
    "platelets",
    "serum sodium",
    "deaths",
    "year",
];

fn cells(rec: &Record) -> [String; 12] {
    [
        rec.age.to_string(),
        rec.age_bucket().label().to_string(),
        rec.sex.label().to_string(),
        rec.anaemia.label().to_string(),
        rec.diabetes.label().to_string(),
        rec.high_blood_pressure.label().to_string(),
        rec.smoking.label().to_string(),
        format!("{}%", rec.ejection_fraction),
        format!("{:.0}", rec.platelets),
        rec.serum_sodium.to_string(),
        rec.deaths.to_string(),
        rec.year.to_string(),
    ]
}

/// Scrollable table of the records passing the current selection.
pub fn records_table(ui: &mut Ui, state: &DashboardState) {
    let records: Vec<&Record> = state.selected_records().collect();

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .columns(Column::auto().at_least(48.0), HEADERS.len())
        .min_scrolled_height(0.0)
        .max_scroll_height(320.0)
        .header(20.0, |mut header| {
            for title in HEADERS {
                header.col(|ui: &mut Ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, records.len(), |mut row| {
                let rec = records[row.index()];
                for text in cells(rec) {
                    row.col(|ui: &mut Ui| {
                        ui.label(text);
                    });
                }
            });
        });
}
