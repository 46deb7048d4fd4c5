pub mod json;
pub mod rss;

pub use json::{JsonConfig, JsonOutput, convert_to_json};
pub use rss::{Channel, format_rss_date, newest_timestamp, render_rss};
