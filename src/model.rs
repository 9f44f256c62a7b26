use std::cell::OnceCell;
use std::fmt;

use chrono::{DateTime, Local};

use crate::sanitize::sanitize_filename;
use crate::youtrack::{YouTrackClient, YouTrackError};

/// Format used for every timestamp shown to the user.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

pub fn format_time(value: &DateTime<Local>) -> String {
    value.format(TIME_FORMAT).to_string()
}

/// Runs `load` on the first call only; later calls return the stored value.
/// A failed load leaves the cell empty.
fn memoized<'a, T, F>(cell: &'a OnceCell<T>, load: F) -> Result<&'a T, YouTrackError>
where
    F: FnOnce() -> Result<T, YouTrackError>,
{
    if let Some(value) = cell.get() {
        return Ok(value);
    }
    let value = load()?;
    Ok(cell.get_or_init(|| value))
}

/// A YouTrack project. Its issues are fetched on first access.
#[derive(Debug)]
pub struct Project {
    project_id: String,
    shortname: Option<String>,
    name: Option<String>,
    issues: OnceCell<Vec<Issue>>,
}

impl Project {
    /// Empty short names and names count as absent.
    pub fn new(
        project_id: impl Into<String>,
        shortname: Option<String>,
        name: Option<String>,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            shortname: shortname.filter(|s| !s.is_empty()),
            name: name.filter(|s| !s.is_empty()),
            issues: OnceCell::new(),
        }
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn shortname(&self) -> Option<&str> {
        self.shortname.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Short name, else name, else the identifier.
    pub fn displayname(&self) -> &str {
        self.shortname
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or(&self.project_id)
    }

    pub fn issues(&self, client: &YouTrackClient) -> Result<&[Issue], YouTrackError> {
        memoized(&self.issues, || client.list_issues(&self.project_id)).map(Vec::as_slice)
    }
}

impl PartialEq for Project {
    fn eq(&self, other: &Self) -> bool {
        self.project_id == other.project_id
    }
}

impl Eq for Project {}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.displayname())
    }
}

/// Plain issue data as decoded from the service.
#[derive(Debug, Clone, Default)]
pub struct IssueRecord {
    pub issue_id: String,
    pub project_id: String,
    pub id_readable: Option<String>,
    pub created: Option<DateTime<Local>>,
    pub updated: Option<DateTime<Local>>,
    pub resolved: Option<DateTime<Local>>,
    pub title: String,
    pub description: String,
    pub comments_count: u32,
}

#[derive(Debug)]
pub struct Issue {
    issue_id: String,
    project_id: String,
    id_readable: Option<String>,
    summary: String,
    pub created: Option<DateTime<Local>>,
    pub updated: Option<DateTime<Local>>,
    /// `None` while the issue is open.
    pub resolved: Option<DateTime<Local>>,
    pub title: String,
    pub description: String,
    pub comments_count: u32,
    comments: OnceCell<Vec<Comment>>,
    attachments: OnceCell<Vec<Attachment>>,
}

impl Issue {
    pub fn new(record: IssueRecord) -> Self {
        let summary = Self::create_summary(
            record.created.as_ref(),
            record.id_readable.as_deref(),
            &record.title,
        );
        let summary = if summary.is_empty() {
            sanitize_filename(&record.issue_id)
        } else {
            summary
        };
        Self {
            issue_id: record.issue_id,
            project_id: record.project_id,
            id_readable: record.id_readable,
            summary,
            created: record.created,
            updated: record.updated,
            resolved: record.resolved,
            title: record.title,
            description: record.description,
            comments_count: record.comments_count,
            comments: OnceCell::new(),
            attachments: OnceCell::new(),
        }
    }

    /// `<YYYY-MM-DD> <readable id> <title>` made filename safe; absent parts are skipped.
    pub fn create_summary(
        created: Option<&DateTime<Local>>,
        id_readable: Option<&str>,
        title: &str,
    ) -> String {
        let date = created.map(|c| c.format("%Y-%m-%d").to_string());
        let parts: Vec<&str> = [date.as_deref(), id_readable, Some(title)]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect();
        sanitize_filename(parts.join(" ").trim())
    }

    pub fn issue_id(&self) -> &str {
        &self.issue_id
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn id_readable(&self) -> Option<&str> {
        self.id_readable.as_deref()
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved.is_some()
    }

    pub fn comments(&self, client: &YouTrackClient) -> Result<&[Comment], YouTrackError> {
        memoized(&self.comments, || client.list_comments(&self.issue_id)).map(Vec::as_slice)
    }

    pub fn attachments(&self, client: &YouTrackClient) -> Result<&[Attachment], YouTrackError> {
        memoized(&self.attachments, || client.list_attachments(&self.issue_id))
            .map(Vec::as_slice)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub comment_id: String,
    pub author: String,
    pub created: Option<DateTime<Local>>,
    pub updated: Option<DateTime<Local>>,
    pub text: String,
}

/// Attachment metadata; the content is only fetched while backing up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub issue_id: String,
    pub name: String,
    pub size: u64,
    pub mime_type: Option<String>,
    pub extension: Option<String>,
    pub charset: Option<String>,
    pub url: String,
}
