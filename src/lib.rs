pub mod advisor;
pub mod config;
pub mod error;
pub mod model;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod scanner;

pub use advisor::{Advisor, AdvisoryRule};
pub use config::Config;
pub use error::{Error, Result};
pub use model::{ScanRecord, ScanReport};
pub use scanner::Scanner;
