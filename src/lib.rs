//! Heart-failure case dashboard.
//!
//! [`data`] holds the load → normalize → filter → aggregate pipeline and has
//! no UI dependency; the remaining modules render it with egui.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod state;
pub mod ui;
