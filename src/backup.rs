use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::model::{Issue, Project};
use crate::render::{attachment_file_name, attachments_dir_name, render_issue_markdown};
use crate::sanitize::sanitize_pathname;
use crate::youtrack::{YouTrackClient, YouTrackError};

fn create_dir(path: &Path) -> Result<(), YouTrackError> {
    std::fs::create_dir_all(path).map_err(|source| YouTrackError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn write_file(path: &Path, contents: &[u8]) -> Result<(), YouTrackError> {
    std::fs::write(path, contents).map_err(|source| YouTrackError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes `<summary>.md` into `target_dir` and downloads attachments into
/// `<summary>_attachments/`. Returns the Markdown file path.
///
/// A failed download aborts the issue; files already written are left in place.
pub fn backup_issue(
    client: &YouTrackClient,
    issue: &Issue,
    target_dir: &Path,
) -> Result<PathBuf, YouTrackError> {
    create_dir(target_dir)?;

    let comments = issue.comments(client)?;
    let attachments = issue.attachments(client)?;

    let markdown_path = target_dir.join(format!("{}.md", issue.summary()));
    write_file(
        &markdown_path,
        render_issue_markdown(issue, comments, attachments).as_bytes(),
    )?;

    if !attachments.is_empty() {
        let attachments_dir = target_dir.join(attachments_dir_name(issue));
        create_dir(&attachments_dir)?;
        for attachment in attachments {
            let bytes = client.download(&attachment.url)?;
            let path = attachments_dir.join(attachment_file_name(attachment));
            write_file(&path, &bytes)?;
            debug!(path = %path.display(), size = bytes.len(), "attachment saved");
        }
    }

    info!(
        issue = issue.issue_id(),
        comments = comments.len(),
        attachments = attachments.len(),
        path = %markdown_path.display(),
        "issue backed up"
    );
    Ok(markdown_path)
}

/// Backs up every issue of `project` into `<backup_root>/<displayname>/`
/// in service order, stopping at the first failure. Returns the issue count.
pub fn backup_project(
    client: &YouTrackClient,
    project: &Project,
    backup_root: &Path,
) -> Result<usize, YouTrackError> {
    create_dir(backup_root)?;
    let project_dir = backup_root.join(sanitize_pathname(project.displayname()));
    create_dir(&project_dir)?;

    let issues = project.issues(client)?;
    for issue in issues {
        backup_issue(client, issue, &project_dir)?;
    }

    info!(
        project = project.project_id(),
        issues = issues.len(),
        path = %project_dir.display(),
        "project backed up"
    );
    Ok(issues.len())
}
