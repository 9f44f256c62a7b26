use std::io::Write;
use std::path::Path;

use tracing::{error, info};

use crate::backup::backup_project;
use crate::listing::{
    csv_line, issue_headers, issue_row, project_headers, project_line, project_row, render_table,
};
use crate::model::Project;
use crate::youtrack::{YouTrackClient, YouTrackError};

/// Backs up one project, or every project when `project_id` is `None`.
/// Stops at the first failing project. Returns the number of issues saved.
pub fn backup(
    client: &YouTrackClient,
    backup_dir: &Path,
    project_id: Option<&str>,
) -> Result<usize, YouTrackError> {
    let projects = match project_id {
        Some(id) => vec![client.get_project(id)?],
        None => client.list_projects()?,
    };

    let total = projects.len();
    let mut saved = 0;
    for (idx, project) in projects.iter().enumerate() {
        info!("backing up project {} ({}/{})", project, idx + 1, total);
        let count = backup_project(client, project, backup_dir).inspect_err(|err| {
            error!(project = project.project_id(), error = %err, "project backup failed")
        })?;
        info!("project {} saved with {} issues", project, count);
        saved += count;
    }
    Ok(saved)
}

fn issue_count(
    client: &YouTrackClient,
    project: &Project,
    verbose: bool,
) -> Result<Option<usize>, YouTrackError> {
    if !verbose {
        return Ok(None);
    }
    Ok(Some(project.issues(client)?.len()))
}

/// `ls`: one line per project, or a table. Verbose adds issue counts.
pub fn list_projects(
    client: &YouTrackClient,
    out: &mut impl Write,
    as_table: bool,
    verbose: bool,
) -> Result<(), YouTrackError> {
    let projects = client.list_projects()?;

    if as_table {
        let mut rows = Vec::with_capacity(projects.len());
        for project in &projects {
            rows.push(project_row(project, issue_count(client, project, verbose)?));
        }
        let caption = format!("{} projects in total", projects.len());
        write!(
            out,
            "{}",
            render_table("List of projects", &project_headers(verbose), &rows, &caption)
        )?;
    } else {
        for project in &projects {
            writeln!(out, "{}", project_line(project, issue_count(client, project, verbose)?))?;
        }
    }
    Ok(())
}

/// `ls -i`: the issues of one project as `;` separated lines with a
/// header, or as a table.
pub fn list_project_details(
    client: &YouTrackClient,
    out: &mut impl Write,
    project_id: &str,
    as_table: bool,
    verbose: bool,
) -> Result<(), YouTrackError> {
    let project = client.get_project(project_id)?;
    let issues = project.issues(client)?;
    let rows: Vec<Vec<String>> = issues.iter().map(|i| issue_row(i, verbose)).collect();

    if as_table {
        let title = format!("Issues of {}", project);
        let caption = format!("{} issues in total", issues.len());
        write!(
            out,
            "{}",
            render_table(&title, &issue_headers(verbose), &rows, &caption)
        )?;
    } else {
        writeln!(out, "{}", issue_headers(verbose).join(";"))?;
        for row in &rows {
            writeln!(out, "{}", csv_line(row))?;
        }
    }
    Ok(())
}
