mod chrome_finder;
mod error;
mod scraper;
mod session;

pub use chrome_finder::ChromeFinder;
pub use error::{Error, Result};
pub use scraper::SchoolScraper;
pub use session::{BrowserSession, LaunchOptions};
