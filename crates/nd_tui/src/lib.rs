pub mod app;
pub mod notify;
pub mod runner;
pub mod share;
pub mod task;
pub mod ui;
pub mod views;
pub mod widgets;

pub use app::{App, Route};
pub use runner::run;
pub use share::{OsPlatform, SharePlatform};
pub use widgets::preferences::ClosePolicy;
