mod app;
mod effects;
mod persistence;

pub use app::run_app;
