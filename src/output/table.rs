use comfy_table::{Cell, Color};
use std::path::PathBuf;

use crate::cli::SortOrder;
use crate::core::{LoadResult, SessionRecord, Shift};
use crate::output::format::{
    create_styled_table, format_size, header_cell, right_cell, styled_cell,
};
use crate::timer::format_elapsed;

fn ordered(records: &[SessionRecord], order: SortOrder) -> Vec<&SessionRecord> {
    let mut rows: Vec<_> = records.iter().collect();
    if order == SortOrder::Desc {
        rows.reverse();
    }
    rows
}

pub(crate) fn render_session_table(result: &LoadResult, order: SortOrder, use_color: bool) -> String {
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Date", use_color),
        header_cell("Shift", use_color),
        header_cell("Topic", use_color),
        header_cell("Duration", use_color),
    ]);

    let shift_color = |record: &SessionRecord| {
        use_color.then_some(match record.shift {
            Shift::Morning => Color::Yellow,
            Shift::Afternoon => Color::Green,
            Shift::Evening => Color::Blue,
        })
    };

    for record in ordered(&result.records, order) {
        table.add_row(vec![
            Cell::new(record.date.to_string()),
            styled_cell(record.shift.as_str(), shift_color(record), false),
            Cell::new(&record.topic),
            right_cell(&record.duration, None, false),
        ]);
    }

    let cyan = if use_color { Some(Color::Cyan) } else { None };
    table.add_row(vec![
        styled_cell("TOTAL", cyan, true),
        Cell::new(""),
        Cell::new(""),
        right_cell(&format_elapsed(result.total_elapsed()), cyan, true),
    ]);

    table.to_string()
}

/// Print the session log with a summary line
pub(crate) fn print_session_table(result: &LoadResult, order: SortOrder, use_color: bool) {
    println!("\n  Study Sessions\n");
    println!("{}", render_session_table(result, order, use_color));
    if result.skipped > 0 {
        println!(
            "\n  {} sessions ({} malformed rows skipped)\n",
            result.records.len(),
            result.skipped
        );
    } else {
        println!("\n  {} sessions\n", result.records.len());
    }
}

/// Print backups oldest first, the one `restore` would use marked
pub(crate) fn print_backup_table(backups: &[PathBuf], use_color: bool) {
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Backup", use_color),
        header_cell("Size", use_color),
    ]);

    let green = if use_color { Some(Color::Green) } else { None };
    let last = backups.len().saturating_sub(1);
    for (idx, path) in backups.iter().enumerate() {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        if idx == last {
            table.add_row(vec![
                styled_cell(&format!("{name} (latest)"), green, true),
                right_cell(&format_size(size), green, false),
            ]);
        } else {
            table.add_row(vec![Cell::new(name), right_cell(&format_size(size), None, false)]);
        }
    }

    println!("\n  Session Log Backups\n");
    println!("{table}");
    println!("\n  {} backups\n", backups.len());
}
