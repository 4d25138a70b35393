pub mod aggregator;
pub mod chart;
pub mod error;
pub mod record;
pub mod series;

pub use aggregator::{process_file, SpeedupAggregator, SpeedupReport, DEFAULT_TRIALS};
pub use error::{Error, Result};
