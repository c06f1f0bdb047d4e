pub mod error;
pub mod fetch;
pub mod links;
pub mod results;

pub use error::{Error, Result};

/// Results index for the 2022 CSEE release
pub const DEFAULT_INDEX_URL: &str = "https://matokeo.necta.go.tz/csee2022/";

/// Prefix joined onto every relative school link found on the index page
pub const DEFAULT_BASE_URL: &str = "https://matokeo.necta.go.tz/csee2022/";

/// Output file written in the working directory
pub const DEFAULT_OUTPUT_FILE: &str = "results.csv";
