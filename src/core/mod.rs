//! Core module - session records and query types

mod types;

pub(crate) use types::{DateFilter, LoadResult, SessionRecord, Shift};
