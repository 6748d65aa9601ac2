//! Track time spent on tasks and summarize it.
//! Tasks carry a size and any number of tags, and every start/stop pair is kept as a span, so
//! totals can be broken down per task, per size and per tag.

pub mod cli;
pub mod controller;
pub mod error;
pub mod model;
pub mod storage;
pub mod summary;
pub mod utils;
