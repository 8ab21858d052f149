//! UI layer: app shell and per-screen rendering.

pub mod app;
pub mod screens;

pub use app::TasksApp;
