pub mod dates;
pub mod test_utils;

pub use dates::{Month, parse_date, format_date, DATE_FMT};
