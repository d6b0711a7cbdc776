mod format;
mod json;
mod table;

pub(crate) use json::{output_backup_json, output_session_json};
pub(crate) use table::{print_backup_table, print_session_table};
