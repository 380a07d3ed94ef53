pub mod aggregate;
pub mod availability;
pub mod client;
pub mod constants;
pub mod locations;
pub mod scraper;
pub mod slots;
