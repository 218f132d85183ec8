pub mod browse;
pub mod dashboard;
pub mod listing;
pub mod page;
pub mod report;
pub mod setup;
pub mod terminal;
pub mod ui;
pub mod view;

pub use dashboard::{Dashboard, Render, Selection};
