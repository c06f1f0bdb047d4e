pub mod completion;
pub mod links;
pub mod scrape;
