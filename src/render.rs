use chrono::{DateTime, Local};

use crate::model::{format_time, Attachment, Comment, Issue};
use crate::sanitize::sanitize_attachment_name;

fn time_or_dash(value: Option<&DateTime<Local>>) -> String {
    value.map(format_time).unwrap_or_else(|| "-".to_string())
}

/// Directory next to the issue file that receives its attachments.
pub fn attachments_dir_name(issue: &Issue) -> String {
    format!("{}_attachments", issue.summary())
}

pub fn attachment_file_name(attachment: &Attachment) -> String {
    sanitize_attachment_name(&attachment.name)
}

/// Escapes the brackets that would end a Markdown link text early.
fn link_text(text: &str) -> String {
    text.replace('[', "\\[").replace(']', "\\]")
}

pub fn render_comment(comment: &Comment) -> String {
    format!(
        "\n---\n**Comment by {}, created: {}, updated: {}**\n\n{}",
        comment.author,
        time_or_dash(comment.created.as_ref()),
        time_or_dash(comment.updated.as_ref()),
        comment.text
    )
}

pub fn render_issue_markdown(
    issue: &Issue,
    comments: &[Comment],
    attachments: &[Attachment],
) -> String {
    let resolved = issue
        .resolved
        .as_ref()
        .map(format_time)
        .unwrap_or_else(|| "No".to_string());

    let mut out = String::new();
    out.push_str(&format!("# {}\n", issue.summary()));
    out.push_str(&format!("Created: {}\n", time_or_dash(issue.created.as_ref())));
    out.push_str(&format!("Updated: {}\n", time_or_dash(issue.updated.as_ref())));
    out.push_str(&format!("Resolved: {}\n", resolved));
    out.push('\n');
    out.push_str(&issue.description);
    out.push('\n');

    if !attachments.is_empty() {
        let dir = attachments_dir_name(issue);
        out.push_str(&format!("\nAttachments: {}\n\n", attachments.len()));
        for attachment in attachments {
            out.push_str(&format!(
                "- [{}](<{}/{}>) ({} bytes)\n",
                link_text(&attachment.name),
                dir,
                attachment_file_name(attachment),
                attachment.size
            ));
        }
    }

    out.push('\n');
    for comment in comments {
        out.push_str(&render_comment(comment));
        out.push('\n');
    }

    out
}
