pub mod colors;
pub mod formatting;
pub mod path;
pub mod table;
pub mod time;

pub use time::{format_seconds, parse_duration};
