pub mod cli;
mod app;
mod effects;
mod logging;
mod render;
mod report;
mod settings;

pub use app::run_app;
