//! Domain types for BreakScan

pub mod bar;
pub mod series;

pub use bar::Bar;
pub use series::{InstrumentSeries, SeriesError};

/// Symbol type alias
pub type Symbol = String;
