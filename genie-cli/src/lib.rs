//! Command-line front end for the tax engine: raw entry parsing, CSV import,
//! report rendering and logging setup.

pub mod app;
pub mod csv_loader;
pub mod logging;
pub mod report;
pub mod utils;
