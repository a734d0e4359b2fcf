//! Panel view: rows, filters, sorting and text rendering

pub mod render;
pub mod table;
pub mod time;

pub use render::{ViewModel, ViewSnapshot, render, render_detail};
pub use table::{Row, SortDirection, SortKey, ViewOptions, sort_rows, visible_rows};
pub use time::{TimeBuckets, format_relative, parse_timestamp};
