//! Presentation layer: egui panels drawing a [`DashboardState`](crate::state::DashboardState).

pub mod charts;
pub mod panels;
pub mod table;
