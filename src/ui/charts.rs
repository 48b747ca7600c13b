use std::f32::consts::{FRAC_PI_2, TAU};

use eframe::egui::{self, Align2, Color32, FontId, RichText, Sense, Shape, Stroke, Ui, Vec2};
use egui_plot::{Bar, BarChart, GridMark, Line, Plot, PlotPoints};

use crate::color::ColorMap;
use crate::data::aggregate::labelled;
use crate::state::DashboardState;
use crate::ui::table;

const BAR_COLOR: Color32 = Color32::from_rgb(0, 255, 255);
const CHART_HEIGHT: f32 = 260.0;

// ---------------------------------------------------------------------------
// Central dashboard
// ---------------------------------------------------------------------------

/// Render headline numbers and every chart for the current selection.
pub fn dashboard(ui: &mut Ui, state: &DashboardState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a heart-failure CSV to begin  (File → Open…)");
        });
        return;
    }

    let summary = state.summary();

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Heart Failure Diagnosis Dashboard");
            ui.separator();

            ui.columns(2, |cols| {
                metric(&mut cols[0], "Total heart failure cases registered", summary.total_cases);
                metric(&mut cols[1], "Total deaths", summary.total_deaths);
            });
            ui.separator();
            ui.columns(2, |cols| {
                metric(
                    &mut cols[0],
                    &format!(
                        "Cases with ejection fraction below {}%",
                        summary.thresholds.low_ejection_fraction
                    ),
                    summary.low_ejection_fraction_count,
                );
                metric(
                    &mut cols[1],
                    "Cases with abnormal platelet count",
                    summary.abnormal_platelets_count,
                );
            });
            ui.separator();

            ui.columns(2, |cols| {
                bar_chart(
                    &mut cols[0],
                    "age_bars",
                    "Deaths by age group",
                    &labelled(&summary.deaths_by_age_bucket),
                    Orientation::Vertical,
                );
                donut_chart(&mut cols[1], "Gender ratio", &labelled(&summary.sex_distribution));
            });

            bar_chart(
                ui,
                "year_bars",
                "Heart failure cases by year",
                &labelled(&summary.cases_by_year),
                Orientation::Horizontal,
            );

            ui.add_space(8.0);
            ui.label(RichText::new("Deaths by clinical condition").heading());

            ui.columns(2, |cols| {
                donut_chart(&mut cols[0], "Anaemia", &labelled(&summary.deaths_by_anaemia));
                bar_chart(
                    &mut cols[1],
                    "diabetes_bars",
                    "Diabetes",
                    &labelled(&summary.deaths_by_diabetes),
                    Orientation::Horizontal,
                );
            });
            ui.columns(2, |cols| {
                bar_chart(
                    &mut cols[0],
                    "hbp_bars",
                    "High blood pressure",
                    &labelled(&summary.deaths_by_high_blood_pressure),
                    Orientation::Vertical,
                );
                donut_chart(&mut cols[1], "Smoking", &labelled(&summary.deaths_by_smoking));
            });

            let sodium: Vec<[f64; 2]> = summary
                .deaths_by_serum_sodium
                .iter()
                .map(|&(level, deaths)| [f64::from(level), deaths as f64])
                .collect();
            line_chart(ui, "sodium_line", "Deaths by serum sodium level", sodium);

            if state.show_records {
                ui.separator();
                ui.label(RichText::new("Selected records").heading());
                table::records_table(ui, state);
            }
        });
}

fn metric(ui: &mut Ui, title: &str, value: u64) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(RichText::new(title).strong());
        ui.label(RichText::new(value.to_string()).size(28.0));
    });
}

// ---------------------------------------------------------------------------
// Chart primitives
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Vertical,
    Horizontal,
}

/// Category label for an axis tick, if the tick sits on a bar.
fn tick_label(labels: &[String], mark: GridMark) -> String {
    let idx = mark.value.round();
    if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

/// One bar per `(label, value)` pair, labels on the category axis.
pub fn bar_chart(
    ui: &mut Ui,
    id: &str,
    title: &str,
    points: &[(String, u64)],
    orientation: Orientation,
) {
    ui.label(RichText::new(title).strong());

    let bars: Vec<Bar> = points
        .iter()
        .enumerate()
        .map(|(i, (label, value))| {
            Bar::new(i as f64, *value as f64)
                .name(label)
                .fill(BAR_COLOR)
                .width(0.6)
        })
        .collect();
    let labels: Vec<String> = points.iter().map(|(label, _)| label.clone()).collect();

    let mut chart = BarChart::new(bars).color(BAR_COLOR);
    let mut plot = Plot::new(id)
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false);

    match orientation {
        Orientation::Vertical => {
            plot = plot
                .show_grid([false, true])
                .x_axis_formatter(move |mark, _range| tick_label(&labels, mark));
        }
        Orientation::Horizontal => {
            chart = chart.horizontal();
            plot = plot
                .show_grid([true, false])
                .y_axis_formatter(move |mark, _range| tick_label(&labels, mark));
        }
    }

    plot.show(ui, |plot_ui| {
        plot_ui.bar_chart(chart);
    });
}

/// Deaths (or counts) against a numeric axis.
pub fn line_chart(ui: &mut Ui, id: &str, title: &str, points: Vec<[f64; 2]>) {
    ui.label(RichText::new(title).strong());

    Plot::new(id)
        .height(CHART_HEIGHT)
        .x_axis_label("serum sodium (mEq/L)")
        .y_axis_label("deaths")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::from(points))
                    .name("deaths")
                    .color(BAR_COLOR)
                    .width(2.0),
            );
        });
}

/// Proportions as a ring with a 30 % hole, followed by a legend.
pub fn donut_chart(ui: &mut Ui, title: &str, points: &[(String, u64)]) {
    ui.label(RichText::new(title).strong());

    let side = ui.available_width().min(CHART_HEIGHT - 60.0);
    let (response, painter) = ui.allocate_painter(egui::vec2(ui.available_width(), side), Sense::hover());
    let center = response.rect.center();
    let radius = side * 0.45;

    let total: u64 = points.iter().map(|(_, v)| v).sum();
    if total == 0 {
        painter.text(
            center,
            Align2::CENTER_CENTER,
            "no data",
            FontId::proportional(14.0),
            ui.visuals().weak_text_color(),
        );
        return;
    }

    let colors = ColorMap::new(points.iter().map(|(label, _)| label.as_str()));
    let mut start = -FRAC_PI_2;
    for (label, value) in points {
        let sweep = TAU * (*value as f32 / total as f32);
        let color = colors.color_for(label);
        // Fan of thin triangles: each one is convex whatever the slice angle.
        let steps = ((sweep / 0.05).ceil() as usize).max(1);
        for s in 0..steps {
            let a0 = start + sweep * s as f32 / steps as f32;
            let a1 = start + sweep * (s + 1) as f32 / steps as f32;
            painter.add(Shape::convex_polygon(
                vec![
                    center,
                    center + radius * Vec2::angled(a0),
                    center + radius * Vec2::angled(a1),
                ],
                color,
                Stroke::NONE,
            ));
        }
        start += sweep;
    }
    painter.circle_filled(center, radius * 0.3, ui.visuals().panel_fill);

    for (label, value) in points {
        let pct = 100.0 * *value as f64 / total as f64;
        ui.horizontal(|ui: &mut Ui| {
            ui.colored_label(colors.color_for(label), "■");
            ui.label(format!("{label}: {value} ({pct:.1}%)"));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_only_label_bar_positions() {
        let labels = vec!["No".to_string(), "Yes".to_string()];
        let mark = |value| GridMark { value, step_size: 0.5 };

        assert_eq!(tick_label(&labels, mark(0.0)), "No");
        assert_eq!(tick_label(&labels, mark(1.0)), "Yes");
        assert_eq!(tick_label(&labels, mark(0.5)), "");
        assert_eq!(tick_label(&labels, mark(2.0)), "");
        assert_eq!(tick_label(&labels, mark(-1.0)), "");
    }
}
