// file: src/parser/frontmatter.rs
// description: YAML frontmatter extraction from markdown
// reference: https://docs.rs/yaml-rust

use chrono::NaiveDateTime;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use tracing::debug;
use yaml_rust::{Yaml, YamlLoader};

lazy_static! {
    static ref FRONTMATTER_RE: Regex =
        Regex::new(r"(?s)\A---[ \t]*\r?\n(.*?)\r?\n---[ \t]*(?:\r?\n|\z)(.*)\z").unwrap();
}

const TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Scalar value of a frontmatter key.
#[derive(Debug, Clone, PartialEq)]
pub enum MetaValue {
    String(String),
    DateTime(NaiveDateTime),
    Integer(i64),
    Float(f64),
    Boolean(bool),
}

impl MetaValue {
    fn from_yaml(value: &Yaml) -> Option<Self> {
        match value {
            Yaml::String(s) => Some(Self::from_string(s)),
            Yaml::Integer(i) => Some(MetaValue::Integer(*i)),
            Yaml::Real(r) => r.parse().ok().map(MetaValue::Float),
            Yaml::Boolean(b) => Some(MetaValue::Boolean(*b)),
            _ => None,
        }
    }

    fn from_string(s: &str) -> Self {
        // full timestamps are a YAML timestamp, everything shorter stays text
        TIMESTAMP_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(s.trim(), format).ok())
            .map(MetaValue::DateTime)
            .unwrap_or_else(|| MetaValue::String(s.to_string()))
    }
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaValue::String(s) => f.write_str(s),
            MetaValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            MetaValue::Integer(i) => write!(f, "{}", i),
            MetaValue::Float(v) => write!(f, "{}", v),
            MetaValue::Boolean(b) => write!(f, "{}", b),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frontmatter {
    pub fields: HashMap<String, MetaValue>,
}

impl Frontmatter {
    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.fields.get(key)
    }

    /// Value rendered as text, `None` when absent or blank.
    pub fn get_text(&self, key: &str) -> Option<String> {
        self.get(key)
            .map(|value| value.to_string().trim().to_string())
            .filter(|text| !text.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

pub struct FrontmatterParser;

impl FrontmatterParser {
    pub fn new() -> Self {
        Self
    }

    /// Splits `content` into metadata and body. Never fails: anything that is
    /// not a well-formed leading block yields empty metadata and the full input.
    pub fn parse(&self, content: &str) -> (Frontmatter, String) {
        match self.extract(content) {
            Some((frontmatter, body)) => (frontmatter, body),
            None => (Frontmatter::default(), content.to_string()),
        }
    }

    fn extract(&self, content: &str) -> Option<(Frontmatter, String)> {
        let captures = FRONTMATTER_RE.captures(content)?;
        let yaml_content = captures.get(1).map_or("", |m| m.as_str());
        let body = captures.get(2).map_or("", |m| m.as_str());

        let docs = match YamlLoader::load_from_str(yaml_content) {
            Ok(docs) => docs,
            Err(e) => {
                debug!("Frontmatter is not valid YAML, treating as body: {}", e);
                return None;
            }
        };

        let mut fields = HashMap::new();

        match docs.first() {
            None | Some(Yaml::Null) => {}
            Some(Yaml::Hash(hash)) => {
                for (key, value) in hash {
                    if let Yaml::String(k) = key
                        && let Some(v) = MetaValue::from_yaml(value)
                    {
                        fields.insert(k.clone(), v);
                    }
                }
            }
            Some(_) => {
                debug!("Frontmatter is not a mapping, treating as body");
                return None;
            }
        }

        Some((Frontmatter { fields }, body.to_string()))
    }
}

impl Default for FrontmatterParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_frontmatter_extraction() {
        let parser = FrontmatterParser::new();
        let content = "---\ntitle: Test\ncategory: Rust\n---\n\n# Content";

        let (frontmatter, body) = parser.parse(content);
        assert_eq!(frontmatter.get_text("title"), Some("Test".to_string()));
        assert_eq!(frontmatter.get_text("category"), Some("Rust".to_string()));
        assert_eq!(body, "\n# Content");
    }

    #[test]
    fn test_no_frontmatter() {
        let parser = FrontmatterParser::new();
        let content = "# Just a heading\n\nbody";

        let (frontmatter, body) = parser.parse(content);
        assert!(frontmatter.is_empty());
        assert_eq!(body, content);
    }

    #[test]
    fn test_block_must_be_at_start() {
        let parser = FrontmatterParser::new();
        let content = "intro\n---\ntitle: Late\n---\nbody";

        let (frontmatter, body) = parser.parse(content);
        assert!(frontmatter.is_empty());
        assert_eq!(body, content);
    }

    #[test]
    fn test_invalid_yaml_degrades_to_body() {
        let parser = FrontmatterParser::new();
        let content = "---\ntitle: [unclosed\n---\nbody";

        let (frontmatter, body) = parser.parse(content);
        assert!(frontmatter.is_empty());
        assert_eq!(body, content);
    }

    #[test]
    fn test_non_mapping_degrades_to_body() {
        let parser = FrontmatterParser::new();
        let content = "---\n- one\n- two\n---\nbody";

        let (frontmatter, body) = parser.parse(content);
        assert!(frontmatter.is_empty());
        assert_eq!(body, content);
    }

    #[test]
    fn test_empty_block() {
        let parser = FrontmatterParser::new();
        let content = "---\n\n---\nbody";

        let (frontmatter, body) = parser.parse(content);
        assert!(frontmatter.is_empty());
        assert_eq!(body, "body");
    }

    #[test]
    fn test_crlf_and_trailing_spaces() {
        let parser = FrontmatterParser::new();
        let content = "--- \r\ntitle: Windows\r\n---\r\nbody\r\n";

        let (frontmatter, body) = parser.parse(content);
        assert_eq!(frontmatter.get_text("title"), Some("Windows".to_string()));
        assert_eq!(body, "body\r\n");
    }

    #[test]
    fn test_delimiter_must_be_whole_line() {
        let parser = FrontmatterParser::new();
        let content = "---\ntitle: x\n--- not a delimiter\nbody";

        let (frontmatter, body) = parser.parse(content);
        assert!(frontmatter.is_empty());
        assert_eq!(body, content);
    }

    #[test]
    fn test_scalar_kinds() {
        let parser = FrontmatterParser::new();
        let content = "---\ndate: 2026-01-15 18:00:00\nshort: 2026-01-15 18:00\nday: 2026-01-15\ncount: 3\nflag: true\ntags:\n  - a\n---\n";

        let (frontmatter, body) = parser.parse(content);
        let expected = NaiveDate::from_ymd_opt(2026, 1, 15)
            .unwrap()
            .and_hms_opt(18, 0, 0)
            .unwrap();
        assert_eq!(frontmatter.get("date"), Some(&MetaValue::DateTime(expected)));
        assert_eq!(
            frontmatter.get("short"),
            Some(&MetaValue::String("2026-01-15 18:00".to_string()))
        );
        assert_eq!(
            frontmatter.get("day"),
            Some(&MetaValue::String("2026-01-15".to_string()))
        );
        assert_eq!(frontmatter.get("count"), Some(&MetaValue::Integer(3)));
        assert_eq!(frontmatter.get("flag"), Some(&MetaValue::Boolean(true)));
        assert_eq!(frontmatter.get("tags"), None);
        assert_eq!(body, "");
    }
}
