use chrono::{DateTime, Local};

use crate::model::{format_time, Issue, Project};

const CSV_SEPARATOR: &str = ";";

fn time_or_empty(value: Option<&DateTime<Local>>) -> String {
    value.map(format_time).unwrap_or_default()
}

/// One line per project for `ls`; `issue_count` is appended when given.
pub fn project_line(project: &Project, issue_count: Option<usize>) -> String {
    let mut line = format!(
        "{} {} {}",
        project.project_id(),
        project.shortname().unwrap_or("-"),
        project.name().unwrap_or("-")
    );
    if let Some(count) = issue_count {
        line.push_str(&format!(" {count}"));
    }
    line
}

pub fn project_headers(verbose: bool) -> Vec<&'static str> {
    let mut headers = vec!["ID", "Short Name", "Name"];
    if verbose {
        headers.push("Issues");
    }
    headers
}

pub fn project_row(project: &Project, issue_count: Option<usize>) -> Vec<String> {
    let mut row = vec![
        project.project_id().to_string(),
        project.shortname().unwrap_or_default().to_string(),
        project.name().unwrap_or_default().to_string(),
    ];
    if let Some(count) = issue_count {
        row.push(count.to_string());
    }
    row
}

pub fn issue_headers(verbose: bool) -> Vec<&'static str> {
    if verbose {
        vec![
            "ID", "Readable ID", "Created", "Updated", "Resolved", "Summary", "Comments",
        ]
    } else {
        vec!["ID", "Created", "Updated", "Resolved", "Summary"]
    }
}

/// Columns shown for an issue; verbose adds the readable id and comment count.
pub fn issue_row(issue: &Issue, verbose: bool) -> Vec<String> {
    let resolved = if issue.is_resolved() { "Yes" } else { "No" };
    let mut row = vec![issue.issue_id().to_string()];
    if verbose {
        row.push(issue.id_readable().unwrap_or_default().to_string());
    }
    row.push(time_or_empty(issue.created.as_ref()));
    row.push(time_or_empty(issue.updated.as_ref()));
    row.push(resolved.to_string());
    row.push(issue.summary().to_string());
    if verbose {
        row.push(issue.comments_count.to_string());
    }
    row
}

pub fn csv_line(row: &[String]) -> String {
    row.join(CSV_SEPARATOR)
}

fn format_row<'a>(widths: &[usize], mut cells: impl Iterator<Item = &'a str>) -> String {
    let padded: Vec<String> = widths
        .iter()
        .map(|width| {
            let cell = cells.next().unwrap_or("");
            let pad = width.saturating_sub(cell.chars().count());
            format!(" {}{} ", cell, " ".repeat(pad))
        })
        .collect();
    format!("|{}|", padded.join("|"))
}

/// Renders a boxed plain-text table with a title and a row-count caption.
pub fn render_table(title: &str, headers: &[&str], rows: &[Vec<String>], caption: &str) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (idx, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(idx) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let border = format!(
        "+{}+",
        widths
            .iter()
            .map(|w| "-".repeat(w + 2))
            .collect::<Vec<_>>()
            .join("+")
    );
    let mut out = String::new();
    out.push_str(title);
    out.push('\n');
    out.push_str(&border);
    out.push('\n');
    out.push_str(&format_row(&widths, headers.iter().copied()));
    out.push('\n');
    out.push_str(&border);
    out.push('\n');
    for row in rows {
        out.push_str(&format_row(&widths, row.iter().map(String::as_str)));
        out.push('\n');
    }
    out.push_str(&border);
    out.push('\n');
    out.push_str(caption);
    out.push('\n');
    out
}
