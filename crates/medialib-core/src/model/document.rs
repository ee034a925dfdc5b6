// ── Document domain type ──

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

use super::Entity;
use super::entity_id::EntityId;

/// Coarse document classification derived from the content type.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
    Doc,
    Xls,
    Img,
    Pdf,
    Ppt,
    Video,
    Audio,
    Unknown,
}

impl Role {
    /// Classifiable roles, in the order their predicates are tried.
    pub const PRIORITY: [Role; 7] = [
        Role::Doc,
        Role::Xls,
        Role::Img,
        Role::Pdf,
        Role::Ppt,
        Role::Video,
        Role::Audio,
    ];

    /// Classify a content type. The first matching role in
    /// [`PRIORITY`](Self::PRIORITY) wins; nothing matching is `Unknown`.
    pub fn classify(content_type: &str) -> Role {
        Self::PRIORITY
            .into_iter()
            .find(|role| role.matches(content_type))
            .unwrap_or(Role::Unknown)
    }

    fn matches(self, ct: &str) -> bool {
        match self {
            Self::Doc => ct.contains("document") && ct.contains("wordprocessing"),
            Self::Xls => {
                (ct.contains("document") && ct.contains("spreadsheet")) || ct.contains("ms-excel")
            }
            Self::Img => ct.contains("image"),
            Self::Pdf => ct.contains("pdf"),
            Self::Ppt => {
                (ct.contains("document") && ct.contains("presentation"))
                    || ct.contains("powerpoint")
            }
            Self::Video => ct.contains("video"),
            Self::Audio => ct.contains("audio"),
            Self::Unknown => false,
        }
    }
}

/// The canonical Document type.
///
/// `title`, `role` and `created` are derived once from the payload.
/// A changed payload means a new `Document`.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    pub id: EntityId,
    pub name: Option<String>,
    pub filename: String,
    pub content_type: Option<String>,
    pub size: Option<u64>,
    /// Folder path, `None` at the workspace root.
    pub folder: Option<String>,
    pub owner: Option<String>,
    pub owner_name: Option<String>,
    pub application: Option<String>,
    pub protected: bool,

    pub(crate) title: String,
    pub(crate) role: Role,
    pub(crate) created: Option<NaiveDateTime>,

    /// Payload fields without a typed counterpart.
    #[serde(skip)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Document {
    /// Filename without its extension.
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn created(&self) -> Option<NaiveDateTime> {
        self.created
    }
}

impl Entity for Document {
    fn id(&self) -> &EntityId {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.filename
    }
}

/// Drop the last `.`-separated segment of a filename.
///
/// `"notes.v2.txt"` → `"notes.v2"`, `"readme"` → `"readme"`.
/// A hidden file with no other dot (`".bashrc"`) yields an empty title;
/// that is long-standing portal behavior and is kept as is.
pub fn title_from_filename(filename: &str) -> String {
    match filename.rsplit_once('.') {
        Some((stem, _extension)) => stem.to_owned(),
        None => filename.to_owned(),
    }
}

/// Parse the portal's `created` timestamp.
///
/// The server writes `"2015-01-27 15:26.13.672"`; everything from the
/// first `.` on is dropped before parsing. RFC 3339 is accepted too.
pub fn parse_created(raw: &str) -> Option<NaiveDateTime> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
    ];

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }

    let head = raw.split('.').next().unwrap_or(raw).trim();
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(head, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(head, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{Datelike, Timelike};
    use pretty_assertions::assert_eq;

    use super::*;

    // Each fixture satisfies exactly one predicate.
    const FIXTURES: [(&str, Role); 12] = [
        (
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            Role::Doc,
        ),
        (
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            Role::Xls,
        ),
        ("application/vnd.ms-excel", Role::Xls),
        ("image/png", Role::Img),
        ("image/jpeg", Role::Img),
        ("application/pdf", Role::Pdf),
        (
            "application/vnd.openxmlformats-officedocument.presentationml.presentation",
            Role::Ppt,
        ),
        ("application/vnd.ms-powerpoint", Role::Ppt),
        ("video/mp4", Role::Video),
        ("audio/mpeg", Role::Audio),
        ("text/plain", Role::Unknown),
        ("", Role::Unknown),
    ];

    #[test]
    fn classifies_fixture_content_types() {
        for (ct, expected) in FIXTURES {
            assert_eq!(Role::classify(ct), expected, "content type {ct:?}");
        }
    }

    #[test]
    fn fixtures_match_a_single_predicate() {
        for (ct, expected) in FIXTURES {
            let matching: Vec<Role> = Role::PRIORITY
                .into_iter()
                .filter(|r| r.matches(ct))
                .collect();
            let expected: Vec<Role> = if expected == Role::Unknown {
                vec![]
            } else {
                vec![expected]
            };
            assert_eq!(matching, expected, "content type {ct:?}");
        }
    }

    #[test]
    fn first_declared_predicate_wins() {
        // Matches both `img` and `pdf`; `img` is declared first.
        assert_eq!(Role::classify("image/x-pdf-preview"), Role::Img);
    }

    #[test]
    fn role_parses_case_insensitively() {
        assert_eq!("PDF".parse::<Role>().unwrap(), Role::Pdf);
        assert_eq!(Role::Video.to_string(), "video");
        assert!("spreadsheet".parse::<Role>().is_err());
    }

    #[test]
    fn title_drops_only_the_last_extension() {
        assert_eq!(title_from_filename("report.pdf"), "report");
        assert_eq!(title_from_filename("notes.v2.txt"), "notes.v2");
        assert_eq!(title_from_filename("archive.tar.gz"), "archive.tar");
    }

    #[test]
    fn title_without_dot_is_the_filename() {
        assert_eq!(title_from_filename("readme"), "readme");
        assert_eq!(title_from_filename(""), "");
    }

    #[test]
    fn hidden_file_title_is_empty() {
        assert_eq!(title_from_filename(".bashrc"), "");
    }

    #[test]
    fn created_drops_fractional_suffix() {
        let dt = parse_created("2015-01-27 15:26.13.672").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2015, 1, 27));
        assert_eq!((dt.hour(), dt.minute()), (15, 26));
    }

    #[test]
    fn created_accepts_rfc3339() {
        let dt = parse_created("2024-06-15T10:30:00Z").unwrap();
        assert_eq!(dt.hour(), 10);
    }

    #[test]
    fn created_garbage_is_none() {
        assert!(parse_created("yesterday").is_none());
    }
}
