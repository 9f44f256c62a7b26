use std::borrow::Cow;
use std::path::PathBuf;

use chrono::{DateTime, Local, TimeZone};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ServiceConfig;
use crate::model::{Attachment, Comment, Issue, IssueRecord, Project};

pub const PROJECTS_PATH: &str = "/api/admin/projects";
pub const ISSUES_PATH: &str = "/api/issues";

const PROJECT_FIELDS: &str = "fields=id,name,shortName";
const ISSUE_FIELDS: &str = "fields=id,idReadable,created,updated,resolved,summary,description,commentsCount,project(id)";
const COMMENT_FIELDS: &str = "fields=id,author(fullName,login),created,updated,text";
const ATTACHMENT_FIELDS: &str = "fields=name,size,mimeType,extension,charset,url,issue(id)";

const MAX_ERROR_BODY: usize = 1000;

#[derive(Debug, thiserror::Error)]
pub enum YouTrackError {
    #[error("invalid request: {0}")]
    Validation(String),
    #[error("youtrack returned HTTP {status}: {body}")]
    Remote { status: u16, body: String },
    #[error("not found: {0}")]
    NotFound(String),
    #[error("youtrack request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("failed to decode youtrack response: {source}; body: {body}")]
    Decode {
        source: serde_json::Error,
        body: String,
    },
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl YouTrackError {
    /// HTTP status carried by a [`YouTrackError::Remote`] failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            YouTrackError::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A fully resolved GET request. Building one performs no I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    url: String,
    authorization: String,
}

impl ApiRequest {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn headers(&self) -> [(&'static str, &str); 2] {
        [
            ("Accept", "application/json"),
            ("Authorization", self.authorization.as_str()),
        ]
    }
}

/// Builds a request for `resource` with an optional `fields=` query.
///
/// `resource` must start with `/` and must not end with `/`. `query` is
/// either empty or a field selection such as `fields=id,name`, written
/// without the leading `?`.
pub fn build_request(
    config: &ServiceConfig,
    resource: &str,
    query: &str,
) -> Result<ApiRequest, YouTrackError> {
    if !resource.starts_with('/') {
        return Err(YouTrackError::Validation(format!(
            "resource must start with '/': {resource}"
        )));
    }
    if resource.ends_with('/') {
        return Err(YouTrackError::Validation(format!(
            "resource must not end with '/': {resource}"
        )));
    }
    if resource.contains(['?', '#']) {
        return Err(YouTrackError::Validation(format!(
            "resource must not carry a query or fragment: {resource}"
        )));
    }
    if query.starts_with('?') {
        return Err(YouTrackError::Validation(format!(
            "query must not start with '?': {query}"
        )));
    }
    if !query.is_empty() && !query.starts_with("fields=") {
        return Err(YouTrackError::Validation(format!(
            "query must start with 'fields=': {query}"
        )));
    }

    let url = if query.is_empty() {
        format!("{}{}", config.base_url(), resource)
    } else {
        format!("{}{}?{}", config.base_url(), resource, query)
    };

    Ok(ApiRequest {
        url,
        authorization: format!("Bearer {}", config.token()),
    })
}

/// Percent-encodes an entity id for use as one path segment.
/// A blank id can never name an entity.
fn id_segment<'a>(kind: &str, id: &'a str) -> Result<Cow<'a, str>, YouTrackError> {
    if id.trim().is_empty() {
        return Err(YouTrackError::NotFound(format!("{kind} with an empty id")));
    }
    Ok(urlencoding::encode(id))
}

pub(crate) fn project_resource(project_id: &str) -> Result<String, YouTrackError> {
    Ok(format!("{PROJECTS_PATH}/{}", id_segment("project", project_id)?))
}

pub(crate) fn issue_resource(issue_id: &str, collection: &str) -> Result<String, YouTrackError> {
    Ok(format!(
        "{ISSUES_PATH}/{}/{collection}",
        id_segment("issue", issue_id)?
    ))
}

/// Request for an attachment's relative download URL, which carries its own query.
pub fn build_download_request(
    config: &ServiceConfig,
    relative_url: &str,
) -> Result<ApiRequest, YouTrackError> {
    if !relative_url.starts_with('/') {
        return Err(YouTrackError::Validation(format!(
            "download url must start with '/': {relative_url}"
        )));
    }

    Ok(ApiRequest {
        url: format!("{}{}", config.base_url(), relative_url),
        authorization: format!("Bearer {}", config.token()),
    })
}

#[derive(Debug, Clone)]
pub struct YouTrackClient {
    config: ServiceConfig,
    http: Client,
}

impl YouTrackClient {
    pub fn new(config: ServiceConfig) -> Result<Self, YouTrackError> {
        let http = Client::builder().build()?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    fn send(&self, request: &ApiRequest) -> Result<reqwest::blocking::Response, YouTrackError> {
        debug!(url = request.url(), "youtrack GET");
        let mut builder = self.http.get(request.url());
        for (name, value) in request.headers() {
            builder = builder.header(name, value);
        }
        let response = builder.send()?;

        if response.status() != StatusCode::OK {
            let status = response.status().as_u16();
            let body = response.text().unwrap_or_default();
            warn!(url = request.url(), status, "youtrack request failed");
            return Err(YouTrackError::Remote {
                status,
                body: truncate(&body),
            });
        }
        Ok(response)
    }

    fn load_list<W>(&self, resource: &str, query: &str) -> Result<Vec<W>, YouTrackError>
    where
        W: DeserializeOwned,
    {
        let request = build_request(&self.config, resource, query)?;
        let body = self.send(&request)?.text()?;
        let items = Payload::parse(&body)?.into_entities(&body)?;
        debug!(resource, count = items.len(), "youtrack entities loaded");
        Ok(items)
    }

    pub fn list_projects(&self) -> Result<Vec<Project>, YouTrackError> {
        let items: Vec<ProjectWire> = self.load_list(PROJECTS_PATH, PROJECT_FIELDS)?;
        Ok(items.into_iter().map(ProjectWire::into_project).collect())
    }

    /// Exactly one project must match `project_id`.
    pub fn get_project(&self, project_id: &str) -> Result<Project, YouTrackError> {
        let resource = project_resource(project_id)?;
        let items: Vec<ProjectWire> = self.load_list(&resource, PROJECT_FIELDS)?;
        let mut projects: Vec<Project> =
            items.into_iter().map(ProjectWire::into_project).collect();

        match projects.len() {
            1 => Ok(projects.remove(0)),
            0 => Err(YouTrackError::NotFound(format!("project {project_id}"))),
            n => Err(YouTrackError::NotFound(format!(
                "project {project_id} is ambiguous ({n} matches)"
            ))),
        }
    }

    pub fn list_issues(&self, project_id: &str) -> Result<Vec<Issue>, YouTrackError> {
        let resource = format!("{}/issues", project_resource(project_id)?);
        let items: Vec<IssueWire> = self.load_list(&resource, ISSUE_FIELDS)?;
        Ok(items
            .into_iter()
            .map(|item| item.into_issue(project_id))
            .collect())
    }

    pub fn list_comments(&self, issue_id: &str) -> Result<Vec<Comment>, YouTrackError> {
        let resource = issue_resource(issue_id, "comments")?;
        let items: Vec<CommentWire> = self.load_list(&resource, COMMENT_FIELDS)?;
        Ok(items.into_iter().map(CommentWire::into_comment).collect())
    }

    pub fn list_attachments(&self, issue_id: &str) -> Result<Vec<Attachment>, YouTrackError> {
        let resource = issue_resource(issue_id, "attachments")?;
        let items: Vec<AttachmentWire> = self.load_list(&resource, ATTACHMENT_FIELDS)?;
        Ok(items
            .into_iter()
            .map(|item| item.into_attachment(issue_id))
            .collect())
    }

    /// Fetches raw bytes from `<base_url><relative_url>`.
    pub fn download(&self, relative_url: &str) -> Result<Vec<u8>, YouTrackError> {
        let request = build_download_request(&self.config, relative_url)?;
        let bytes = self.send(&request)?.bytes()?;
        debug!(url = request.url(), size = bytes.len(), "attachment downloaded");
        Ok(bytes.to_vec())
    }
}

/// Shapes a YouTrack response body can take.
#[derive(Debug)]
enum Payload {
    List(Vec<Value>),
    Single(Value),
}

impl Payload {
    fn parse(body: &str) -> Result<Self, YouTrackError> {
        match serde_json::from_str::<Value>(body) {
            Ok(Value::Array(items)) => Ok(Payload::List(items)),
            Ok(other) => Ok(Payload::Single(other)),
            Err(source) => Err(YouTrackError::Decode {
                source,
                body: truncate(body),
            }),
        }
    }

    /// A single object lacking the entity's required keys is an empty result.
    fn into_entities<W>(self, body: &str) -> Result<Vec<W>, YouTrackError>
    where
        W: DeserializeOwned,
    {
        match self {
            Payload::List(items) => items
                .into_iter()
                .map(|item| {
                    serde_json::from_value(item).map_err(|source| YouTrackError::Decode {
                        source,
                        body: truncate(body),
                    })
                })
                .collect(),
            Payload::Single(value) => match serde_json::from_value::<W>(value) {
                Ok(item) => Ok(vec![item]),
                Err(err) => {
                    warn!(error = %err, body = %truncate(body), "youtrack returned a non-entity object");
                    Ok(Vec::new())
                }
            },
        }
    }
}

fn truncate(body: &str) -> String {
    if body.chars().count() > MAX_ERROR_BODY {
        format!("{}...", body.chars().take(MAX_ERROR_BODY).collect::<String>())
    } else {
        body.to_string()
    }
}

/// Converts epoch milliseconds to local time; `None` stays unset.
pub fn local_time(millis: Option<i64>) -> Option<DateTime<Local>> {
    millis.and_then(|ms| Local.timestamp_millis_opt(ms).single())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectWire {
    id: String,
    short_name: Option<String>,
    name: Option<String>,
}

impl ProjectWire {
    fn into_project(self) -> Project {
        Project::new(self.id, self.short_name, self.name)
    }
}

#[derive(Debug, Deserialize)]
struct IdRef {
    id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IssueWire {
    id: String,
    id_readable: Option<String>,
    created: Option<i64>,
    updated: Option<i64>,
    resolved: Option<i64>,
    summary: Option<String>,
    description: Option<String>,
    comments_count: Option<u32>,
    project: Option<IdRef>,
}

impl IssueWire {
    fn into_issue(self, parent_project: &str) -> Issue {
        Issue::new(IssueRecord {
            issue_id: self.id,
            project_id: self
                .project
                .map(|p| p.id)
                .unwrap_or_else(|| parent_project.to_string()),
            id_readable: self.id_readable,
            created: local_time(self.created),
            updated: local_time(self.updated),
            resolved: local_time(self.resolved),
            title: self.summary.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            comments_count: self.comments_count.unwrap_or(0),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthorWire {
    full_name: Option<String>,
    login: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CommentWire {
    id: String,
    author: Option<AuthorWire>,
    created: Option<i64>,
    updated: Option<i64>,
    text: Option<String>,
}

impl CommentWire {
    fn into_comment(self) -> Comment {
        let author = self
            .author
            .and_then(|a| a.full_name.or(a.login))
            .unwrap_or_default();
        Comment {
            comment_id: self.id,
            author,
            created: local_time(self.created),
            updated: local_time(self.updated),
            text: self.text.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AttachmentWire {
    name: String,
    url: String,
    size: Option<u64>,
    mime_type: Option<String>,
    extension: Option<String>,
    charset: Option<String>,
    issue: Option<IdRef>,
}

impl AttachmentWire {
    fn into_attachment(self, parent_issue: &str) -> Attachment {
        Attachment {
            issue_id: self
                .issue
                .map(|i| i.id)
                .unwrap_or_else(|| parent_issue.to_string()),
            name: self.name,
            size: self.size.unwrap_or(0),
            mime_type: self.mime_type,
            extension: self.extension,
            charset: self.charset,
            url: self.url,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use httpmock::Method::GET;
    use httpmock::MockServer;
    use serde_json::json;

    pub(crate) const TOKEN: &str = "perm:not-a-valid-authorization";

    pub(crate) fn client_for(server: &MockServer) -> YouTrackClient {
        let config = ServiceConfig::new(server.base_url(), TOKEN).expect("config");
        YouTrackClient::new(config).expect("client")
    }

    pub(crate) fn three_issues() -> Value {
        json!([
            {
                "id": "2-1", "idReadable": "FIRST-1", "project": {"id": "0-1"},
                "created": 1640995200000_i64, "updated": 1641081600000_i64, "resolved": null,
                "summary": "The title of the first issue",
                "description": "Some explanations of the first issue.",
                "commentsCount": 0, "$type": "Issue"
            },
            {
                "id": "2-2", "idReadable": "FIRST-2", "project": {"id": "0-1"},
                "created": 1641168000000_i64, "updated": 1641254400000_i64, "resolved": null,
                "summary": "The title of the second issue",
                "description": "Some explanations of the second issue.",
                "commentsCount": 1, "$type": "Issue"
            },
            {
                "id": "2-3", "idReadable": "FIRST-3", "project": {"id": "0-1"},
                "created": 1641340800000_i64, "updated": 1641427200000_i64,
                "resolved": 1641513600000_i64,
                "summary": "The title of the third issue",
                "description": "Some explanations of the third issue.",
                "commentsCount": 42, "$type": "Issue"
            }
        ])
    }

    fn test_config() -> ServiceConfig {
        ServiceConfig::new("https://not.a.valid.host/to_test/youtrack", TOKEN).expect("config")
    }

    #[test]
    fn request_requires_leading_slash() {
        let err = build_request(&test_config(), "resource", "fields=x").expect_err("no slash");
        assert!(matches!(err, YouTrackError::Validation(_)));
    }

    #[test]
    fn request_rejects_trailing_slash() {
        let err = build_request(&test_config(), "/resource/", "").expect_err("trailing slash");
        assert!(matches!(err, YouTrackError::Validation(_)));
    }

    #[test]
    fn request_rejects_question_mark_query() {
        let err = build_request(&test_config(), "/resource", "?fields=x").expect_err("'?'");
        assert!(matches!(err, YouTrackError::Validation(_)));
    }

    #[test]
    fn request_requires_field_selection_query() {
        let err = build_request(&test_config(), "/resource", "query").expect_err("no fields=");
        assert!(matches!(err, YouTrackError::Validation(_)));
    }

    #[test]
    fn request_rejects_query_inside_resource() {
        let err = build_request(&test_config(), "/resource?x", "fields=x").expect_err("'?'");
        assert!(matches!(err, YouTrackError::Validation(_)));
        let err = build_request(&test_config(), "/resource#x", "").expect_err("'#'");
        assert!(matches!(err, YouTrackError::Validation(_)));
    }

    #[test]
    fn ids_are_encoded_as_one_path_segment() {
        assert_eq!(project_resource("0-1").expect("id"), "/api/admin/projects/0-1");
        assert_eq!(
            project_resource("0-1?x").expect("id"),
            "/api/admin/projects/0-1%3Fx"
        );
        assert_eq!(
            project_resource("0-1/").expect("id"),
            "/api/admin/projects/0-1%2F"
        );
        assert_eq!(
            issue_resource("2-1#a b", "comments").expect("id"),
            "/api/issues/2-1%23a%20b/comments"
        );
    }

    #[test]
    fn empty_ids_are_not_found() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET);
            then.status(200).body("[]");
        });

        let client = client_for(&server);
        for id in ["", "  "] {
            let err = client.get_project(id).expect_err("empty id");
            assert!(matches!(err, YouTrackError::NotFound(_)));
            let err = client.list_comments(id).expect_err("empty id");
            assert!(matches!(err, YouTrackError::NotFound(_)));
        }
        mock.assert_hits(0);
    }

    #[test]
    fn odd_project_id_keeps_field_selection() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).query_param("fields", "id,name,shortName");
            then.status(200).json_body(json!({"id": "0-1?x", "shortName": "ODD"}));
        });

        let project = client_for(&server).get_project("0-1?x").expect("found");
        mock.assert();
        assert_eq!(project.project_id(), "0-1?x");
        assert_eq!(project.displayname(), "ODD");
    }

    #[test]
    fn id_with_trailing_slash_is_looked_up_not_rejected() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET);
            then.status(200).json_body(json!({"error": "Not Found"}));
        });

        let err = client_for(&server).get_project("0-1/").expect_err("no match");
        assert!(matches!(err, YouTrackError::NotFound(_)));
    }

    #[test]
    fn request_url_with_and_without_query() {
        let cfg = test_config();
        let request = build_request(&cfg, "/resource", "fields=x").expect("valid");
        assert_eq!(
            request.url(),
            "https://not.a.valid.host/to_test/youtrack/resource?fields=x"
        );

        let request = build_request(&cfg, "/resource", "").expect("valid");
        assert_eq!(request.url(), "https://not.a.valid.host/to_test/youtrack/resource");
    }

    #[test]
    fn request_carries_json_and_bearer_headers() {
        let request = build_request(&test_config(), "/resource", "").expect("valid");
        assert_eq!(
            request.headers(),
            [
                ("Accept", "application/json"),
                ("Authorization", "Bearer perm:not-a-valid-authorization"),
            ]
        );
    }

    #[test]
    fn lists_projects_in_service_order() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/admin/projects")
                .query_param("fields", "id,name,shortName")
                .header("Accept", "application/json")
                .header("Authorization", "Bearer perm:not-a-valid-authorization");
            then.status(200).json_body(json!([
                {"shortName": "FIRST", "name": "First Project", "id": "0-1", "$type": "Project"},
                {"shortName": "SECOND", "name": "Second Project", "id": "0-2", "$type": "Project"},
                {"shortName": "THIRD", "name": "Third Project", "id": "0-3", "$type": "Project"}
            ]));
        });

        let projects = client_for(&server).list_projects().expect("list");
        mock.assert();
        let ids: Vec<&str> = projects.iter().map(Project::project_id).collect();
        assert_eq!(ids, ["0-1", "0-2", "0-3"]);
        assert_eq!(projects[1].displayname(), "SECOND");
        assert_eq!(projects[2].name(), Some("Third Project"));
    }

    #[test]
    fn single_object_body_becomes_one_project() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/admin/projects");
            then.status(200).json_body(
                json!({"shortName": "FIRST", "name": "First Project", "id": "0-1", "$type": "Project"}),
            );
        });

        let projects = client_for(&server).list_projects().expect("list");
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].project_id(), "0-1");
    }

    #[test]
    fn error_shaped_body_with_ok_status_is_empty() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/admin/projects");
            then.status(200).json_body(json!({
                "error": "Not Found",
                "error_description": "Entity with id 0-9 not found"
            }));
        });

        let projects = client_for(&server).list_projects().expect("list");
        assert!(projects.is_empty());
    }

    #[test]
    fn empty_list_is_not_an_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/admin/projects");
            then.status(200).body("[]");
        });
        server.mock(|when, then| {
            when.method(GET).path("/api/admin/projects/0-1/issues");
            then.status(200).body("[]");
        });

        let client = client_for(&server);
        assert!(client.list_projects().expect("projects").is_empty());
        assert!(client.list_issues("0-1").expect("issues").is_empty());
    }

    #[test]
    fn non_ok_status_is_remote_error_with_code() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/admin/projects/0-9");
            then.status(404).json_body(json!({
                "error": "Not Found",
                "error_description": "Entity with id 0-9 not found"
            }));
        });
        server.mock(|when, then| {
            when.method(GET).path("/api/admin/projects");
            then.status(500).body("boom");
        });

        let client = client_for(&server);
        let err = client.get_project("0-9").expect_err("404");
        assert!(matches!(err, YouTrackError::Remote { status: 404, .. }));
        assert_eq!(err.status(), Some(404));

        let err = client.list_projects().expect_err("500");
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn malformed_json_is_a_decode_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/admin/projects");
            then.status(200).body("<html>login</html>");
        });

        let err = client_for(&server).list_projects().expect_err("not json");
        assert!(matches!(err, YouTrackError::Decode { .. }));
    }

    #[test]
    fn get_project_returns_the_single_match() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET)
                .path("/api/admin/projects/0-1")
                .query_param("fields", "id,name,shortName");
            then.status(200).json_body(
                json!({"shortName": "FIRST", "name": "First Project", "id": "0-1"}),
            );
        });

        let project = client_for(&server).get_project("0-1").expect("found");
        assert_eq!(project.project_id(), "0-1");
        assert_eq!(project.displayname(), "FIRST");
    }

    #[test]
    fn get_project_requires_exactly_one_match() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/admin/projects/0-2");
            then.status(200).json_body(json!({"error": "Not Found"}));
        });
        server.mock(|when, then| {
            when.method(GET).path("/api/admin/projects/0-3");
            then.status(200).json_body(json!([
                {"id": "0-3", "shortName": "A"},
                {"id": "0-3", "shortName": "B"}
            ]));
        });

        let client = client_for(&server);
        let err = client.get_project("0-2").expect_err("zero matches");
        assert!(matches!(err, YouTrackError::NotFound(_)));
        let err = client.get_project("0-3").expect_err("two matches");
        assert!(matches!(err, YouTrackError::NotFound(_)));
    }

    #[test]
    fn loads_three_issues_with_timestamps() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET)
                .path("/api/admin/projects/0-1/issues")
                .query_param(
                    "fields",
                    "id,idReadable,created,updated,resolved,summary,description,commentsCount,project(id)",
                );
            then.status(200).json_body(three_issues());
        });

        let issues = client_for(&server).list_issues("0-1").expect("issues");
        let ids: Vec<&str> = issues.iter().map(Issue::issue_id).collect();
        assert_eq!(ids, ["2-1", "2-2", "2-3"]);
        let counts: Vec<u32> = issues.iter().map(|i| i.comments_count).collect();
        assert_eq!(counts, [0, 1, 42]);
        assert!(issues[0].resolved.is_none());
        assert!(issues[1].resolved.is_none());
        assert_eq!(
            issues[2].resolved.map(|t| t.timestamp_millis()),
            Some(1641513600000)
        );
        assert_eq!(
            issues[0].created.map(|t| t.timestamp_millis()),
            Some(1640995200000)
        );

        for (number, issue) in ["first", "second", "third"].iter().zip(&issues) {
            assert_eq!(issue.project_id(), "0-1");
            assert_eq!(
                issue.description,
                format!("Some explanations of the {number} issue.")
            );
            assert!(issue
                .summary()
                .ends_with(&format!("The title of the {number} issue")));
        }
    }

    #[test]
    fn null_timestamps_stay_unset() {
        assert!(local_time(None).is_none());
        assert_eq!(local_time(Some(0)).map(|t| t.timestamp_millis()), Some(0));

        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/issues/2-1/comments");
            then.status(200).json_body(json!([
                {"id": "4-1", "author": {"fullName": "Gustavo"}, "created": 1640995200000_i64,
                 "updated": null, "text": "A little comment to the issue."},
                {"id": "4-2", "author": {"login": "root"}, "created": null, "text": null}
            ]));
        });

        let comments = client_for(&server).list_comments("2-1").expect("comments");
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].author, "Gustavo");
        assert!(comments[0].updated.is_none());
        assert_eq!(comments[1].author, "root");
        assert!(comments[1].created.is_none());
        assert_eq!(comments[1].text, "");
    }

    #[test]
    fn loads_attachment_metadata() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET)
                .path("/api/issues/2-1/attachments")
                .query_param("fields", "name,size,mimeType,extension,charset,url,issue(id)");
            then.status(200).json_body(json!([
                {"name": "screen.png", "size": 1024, "mimeType": "image/png", "extension": "png",
                 "charset": null, "url": "/api/files/1-1?sign=abc", "issue": {"id": "2-1"}}
            ]));
        });

        let attachments = client_for(&server).list_attachments("2-1").expect("attachments");
        assert_eq!(attachments.len(), 1);
        let a = &attachments[0];
        assert_eq!(a.issue_id, "2-1");
        assert_eq!(a.name, "screen.png");
        assert_eq!(a.size, 1024);
        assert_eq!(a.mime_type.as_deref(), Some("image/png"));
        assert_eq!(a.extension.as_deref(), Some("png"));
        assert!(a.charset.is_none());
        assert_eq!(a.url, "/api/files/1-1?sign=abc");
    }

    #[test]
    fn downloads_attachment_bytes() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET)
                .path("/api/files/1-1")
                .query_param("sign", "abc")
                .header("Authorization", "Bearer perm:not-a-valid-authorization");
            then.status(200).body(b"\x89PNG".to_vec());
        });
        server.mock(|when, then| {
            when.method(GET).path("/api/files/1-2");
            then.status(403);
        });

        let client = client_for(&server);
        assert_eq!(
            client.download("/api/files/1-1?sign=abc").expect("bytes"),
            b"\x89PNG".to_vec()
        );
        let err = client.download("/api/files/1-2").expect_err("forbidden");
        assert_eq!(err.status(), Some(403));
        let err = client.download("api/files/1-1").expect_err("relative");
        assert!(matches!(err, YouTrackError::Validation(_)));
    }
}
