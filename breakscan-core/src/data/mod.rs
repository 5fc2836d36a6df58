//! Market data acquisition: the provider trait and its adapters.

pub mod circuit_breaker;
pub mod csv_dir;
pub mod provider;
pub mod synthetic;
pub mod yahoo;

pub use circuit_breaker::CircuitBreaker;
pub use csv_dir::CsvDirProvider;
pub use provider::{DataError, DataProvider, ScanProgress, StderrProgress};
pub use synthetic::SyntheticProvider;
pub use yahoo::YahooProvider;
