pub mod config;
pub mod markup;
pub mod notifier;
pub mod parser;
pub mod scraper;
pub mod store;
pub mod types;

pub use self::config::Config;
pub use self::notifier::Notifier;
pub use self::scraper::WebScraper;
pub use self::store::ResultStore;
