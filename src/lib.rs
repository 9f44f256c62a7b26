//! `ytissues` exposes the YouTrack API client, lazy entity model, and
//! Markdown backup modules. It lists projects and issues and exports them
//! to local files.

/// Issue and project export to Markdown files.
pub mod backup;
/// `backup` and `ls` command bodies writing to any output.
pub mod commands;
/// Service configuration loading and validation.
pub mod config;
/// Plain list, table, and CSV presentation.
pub mod listing;
/// Logging setup.
pub mod logging;
/// Projects, issues, comments, and attachments with lazy sub-collections.
pub mod model;
/// Markdown renderers for issues and comments.
pub mod render;
/// Filesystem-safe names.
pub mod sanitize;
/// YouTrack API client, request construction, and wire decoding.
pub mod youtrack;
