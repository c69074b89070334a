// file: src/parser/fields.rs
// description: derives post title, status and publish date from frontmatter and body
// reference: https://docs.rs/chrono

use crate::models::PostStatus;
use crate::parser::frontmatter::{Frontmatter, MetaValue};
use chrono::{NaiveDate, NaiveDateTime};
use tracing::warn;

pub const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Title plus the body left after the title heading was taken out.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTitle {
    pub title: String,
    pub body: String,
}

/// Metadata title, else the first `# ` heading (removed from the body), else `fallback`.
pub fn resolve_title(frontmatter: &Frontmatter, body: &str, fallback: &str) -> ResolvedTitle {
    if let Some(title) = frontmatter.get_text("title") {
        return ResolvedTitle {
            title,
            body: body.to_string(),
        };
    }

    // only the first `# ` line is considered; it leaves the body even when blank
    let mut offset = 0;
    for line in body.split_inclusive('\n') {
        let text = line.trim_end_matches(['\n', '\r']);
        if let Some(heading) = text.strip_prefix("# ") {
            let heading = heading.trim();
            let title = if heading.is_empty() { fallback } else { heading };

            let mut remaining = String::with_capacity(body.len() - line.len());
            remaining.push_str(&body[..offset]);
            remaining.push_str(&body[offset + line.len()..]);
            return ResolvedTitle {
                title: title.to_string(),
                body: remaining,
            };
        }
        offset += line.len();
    }

    ResolvedTitle {
        title: fallback.to_string(),
        body: body.to_string(),
    }
}

pub fn resolve_status(frontmatter: &Frontmatter) -> PostStatus {
    frontmatter
        .get_text("status")
        .map(|status| PostStatus::from_str_lossy(&status))
        .unwrap_or_default()
}

/// Publish date as `YYYY-MM-DDTHH:MM:SS`, or `None` when absent or unparseable.
pub fn resolve_date(frontmatter: &Frontmatter) -> Option<String> {
    match frontmatter.get("date")? {
        MetaValue::DateTime(dt) => Some(dt.format(ISO_FORMAT).to_string()),
        MetaValue::String(raw) => {
            let parsed = parse_date_string(raw.trim());
            if parsed.is_none() {
                warn!("Unrecognised date '{}', publishing without a date", raw);
            }
            parsed.map(|dt| dt.format(ISO_FORMAT).to_string())
        }
        other => {
            warn!("Unsupported date value '{}', publishing without a date", other);
            None
        }
    }
}

fn parse_date_string(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}
