//! Table rendering for queue snapshots and single entries

use prettytable::{format, Cell, Row, Table};

use crate::core::styles::StyleRole;
use crate::serving::api::{
    Entry, EntryKind, EntryStatus, EntryView, QueueSnapshot, Registration, TrackedEntry,
};

const TIME_FORMAT: &str = "%H:%M:%S";

fn styled_cell(text: &str, role: StyleRole, use_color: bool) -> Cell {
    let cell = Cell::new(text);
    match role.to_prettytable_spec() {
        Some(spec) if use_color => cell.style_spec(&spec),
        _ => cell,
    }
}

fn kind_role(kind: EntryKind) -> StyleRole {
    match kind {
        EntryKind::Booked => StyleRole::Booked,
        EntryKind::WalkIn => StyleRole::WalkIn,
    }
}

fn view_row(view: &EntryView, use_color: bool) -> Row {
    let entry = &view.entry;
    let row_role = if entry.status == EntryStatus::InProgress {
        StyleRole::Serving
    } else {
        StyleRole::Value
    };
    let wait = if entry.status == EntryStatus::InProgress {
        "now".to_string()
    } else {
        view.estimated_wait_minutes.to_string()
    };

    Row::new(vec![
        styled_cell(&view.position.to_string(), row_role, use_color),
        styled_cell(&entry.sequence_number.to_string(), row_role, use_color),
        styled_cell(&entry.id.to_string(), StyleRole::Dim, use_color),
        styled_cell(&entry.name, row_role, use_color),
        styled_cell(&entry.kind.to_string(), kind_role(entry.kind), use_color),
        styled_cell(&entry.status.to_string(), row_role, use_color),
        Cell::new(&entry.category),
        styled_cell(&wait, row_role, use_color),
        styled_cell(
            &entry.arrival_time.format(TIME_FORMAT).to_string(),
            StyleRole::Dim,
            use_color,
        ),
    ])
}

/// Tabulate a snapshot in serving order
pub fn snapshot_table(snapshot: &QueueSnapshot, use_color: bool) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);

    let titles = [
        "Pos", "No.", "Id", "Name", "Kind", "Status", "Category", "Wait", "Arrived",
    ];
    table.set_titles(Row::new(
        titles
            .iter()
            .map(|title| styled_cell(title, StyleRole::Header, use_color))
            .collect(),
    ));

    for view in &snapshot.entries {
        table.add_row(view_row(view, use_color));
    }
    table
}

/// One-line summary heading a snapshot table
pub fn snapshot_heading(snapshot: &QueueSnapshot, use_color: bool) -> String {
    let serving = match snapshot.current() {
        Some(entry) => format!("serving #{} {}", entry.sequence_number, entry.name),
        None => "nobody in service".to_string(),
    };
    let text = format!(
        "Queue r{}: {} active, {}",
        snapshot.revision,
        snapshot.len(),
        serving
    );
    StyleRole::Header.paint(&text, use_color)
}

/// Render a snapshot, or a short line when the queue is empty
pub fn render_snapshot(snapshot: &QueueSnapshot, use_color: bool) -> String {
    let heading = snapshot_heading(snapshot, use_color);
    if snapshot.is_empty() {
        return format!("{heading}\n{}\n", StyleRole::Dim.paint("(queue is empty)", use_color));
    }
    format!("{heading}\n{}", snapshot_table(snapshot, use_color))
}

fn timestamp(value: Option<chrono::DateTime<chrono::Utc>>) -> String {
    value
        .map(|at| at.format(TIME_FORMAT).to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Key/value table for a single entry
pub fn entry_table(tracked: &TrackedEntry, use_color: bool) -> Table {
    let entry: &Entry = &tracked.entry;
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_CLEAN);

    let rows = [
        ("Id", entry.id.to_string()),
        ("Number", entry.sequence_number.to_string()),
        ("Name", entry.name.clone()),
        ("Contact", entry.contact.clone()),
        ("Kind", entry.kind.to_string()),
        ("Status", entry.status.to_string()),
        ("Category", entry.category.clone()),
        ("Arrived", timestamp(Some(entry.arrival_time))),
        ("Started", timestamp(entry.started_at)),
        ("Completed", timestamp(entry.completed_at)),
        ("Tracking", tracked.tracking_reference.clone()),
    ];
    for (key, value) in rows {
        table.add_row(Row::new(vec![
            styled_cell(key, StyleRole::Header, use_color),
            Cell::new(&value),
        ]));
    }
    table
}

/// Confirmation line after a registration
pub fn registration_line(registration: &Registration, use_color: bool) -> String {
    let entry = &registration.entry;
    let mut line = format!(
        "Registered #{} {} ({}), id {}, position {}, about {} min. Tracking: {}",
        entry.sequence_number,
        entry.name,
        entry.kind,
        entry.id,
        registration.position,
        registration.estimated_wait_minutes,
        registration.tracking_reference
    );
    if !registration.notified {
        line.push_str(&StyleRole::Error.paint(" (client not notified)", use_color));
    }
    line
}
