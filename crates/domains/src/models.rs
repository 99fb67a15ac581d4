//! # Domain Models
//!
//! The entities of the confession wall. Field names on the wire follow the
//! JSON blobs the wall has always written (`type`, `data`, `size`), so an
//! existing store loads without migration.

use std::fmt;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::errors::{DomainError, Result};

/// Per-file ceiling for attachments (50 MiB).
pub const MAX_ATTACHMENT_BYTES: u64 = 50 * 1024 * 1024;

/// Number of history entries kept; older ones are evicted first.
pub const HISTORY_CAPACITY: usize = 100;

/// Author shown when the `from` field is left blank.
pub const ANONYMOUS: &str = "anonymous";

/// Admin sessions expire this long after the last recorded activity.
pub const SESSION_TTL_MINUTES: i64 = 30;

/// Post identifiers are creation instants in epoch milliseconds.
pub type PostId = i64;

/// Formats an instant the way posts and history entries display it,
/// e.g. `2024/5/1 14:03:22`.
pub fn display_timestamp(at: &DateTime<Local>) -> String {
    at.format("%Y/%-m/%-d %H:%M:%S").to_string()
}

/// The closed set of confession categories.
///
/// Unknown strings found in older stores deserialize to [`Category::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Love,
    Friendship,
    Admiration,
    Thanks,
    #[default]
    Other,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Love,
        Category::Friendship,
        Category::Admiration,
        Category::Thanks,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Love => "love",
            Category::Friendship => "friendship",
            Category::Admiration => "admiration",
            Category::Thanks => "thanks",
            Category::Other => "other",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Category::Love => "💘",
            Category::Friendship => "🤝",
            Category::Admiration => "🌟",
            Category::Thanks => "🙏",
            Category::Other => "💕",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Love => "Love",
            Category::Friendship => "Friendship",
            Category::Admiration => "Admiration",
            Category::Thanks => "Thanks",
            Category::Other => "Other",
        }
    }
}

impl From<&str> for Category {
    fn from(raw: &str) -> Self {
        match raw {
            "love" => Category::Love,
            "friendship" => Category::Friendship,
            "admiration" => Category::Admiration,
            "thanks" => Category::Thanks,
            _ => Category::Other,
        }
    }
}

impl From<String> for Category {
    fn from(raw: String) -> Self {
        Category::from(raw.as_str())
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.as_str().to_string()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The wall's category selector: everything, or exactly one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    /// Parses a filter value from a query string. Anything unrecognised
    /// shows the whole wall.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "love" | "friendship" | "admiration" | "thanks" | "other" => {
                CategoryFilter::Only(Category::from(raw))
            }
            _ => CategoryFilter::All,
        }
    }

    pub fn matches(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => *wanted == category,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryFilter::All => "all",
            CategoryFilter::Only(category) => category.as_str(),
        }
    }
}

/// Broad media family of an attachment, derived from its MIME type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn of(mime_type: &str) -> Option<Self> {
        let parsed: mime::Mime = mime_type.parse().ok()?;
        if parsed.type_() == mime::IMAGE {
            Some(MediaKind::Image)
        } else if parsed.type_() == mime::VIDEO {
            Some(MediaKind::Video)
        } else {
            None
        }
    }
}

/// An image or video embedded in a post as a self-contained data URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    #[serde(rename = "size")]
    pub size_bytes: u64,
    /// `data:<mime>;base64,<payload>`
    #[serde(rename = "data")]
    pub inline_data: String,
}

impl Attachment {
    pub fn kind(&self) -> Option<MediaKind> {
        MediaKind::of(&self.mime_type)
    }
}

/// A single confession on the wall.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub to: String,
    pub from: String,
    pub content: String,
    #[serde(rename = "type", default)]
    pub category: Category,
    pub timestamp: String,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub media: Vec<Attachment>,
}

/// User input for a new post, before ids and timestamps are assigned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PostDraft {
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub content: String,
    #[serde(rename = "type", default)]
    pub category: Category,
}

impl PostDraft {
    pub fn new(to: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn from_author(mut self, from: impl Into<String>) -> Self {
        self.from = from.into();
        self
    }

    pub fn in_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Trims every field and fills in the anonymous author.
    ///
    /// Fails when the recipient or the content is blank; nothing is created
    /// from a draft that fails here.
    pub fn normalize(self) -> Result<PostDraft> {
        let to = self.to.trim().to_string();
        let content = self.content.trim().to_string();
        if to.is_empty() {
            return Err(DomainError::MissingField("recipient"));
        }
        if content.is_empty() {
            return Err(DomainError::MissingField("content"));
        }
        let from = match self.from.trim() {
            "" => ANONYMOUS.to_string(),
            name => name.to_string(),
        };
        Ok(PostDraft {
            to,
            from,
            content,
            category: self.category,
        })
    }
}

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryKind {
    Success,
    Error,
    Info,
    Warning,
}

impl HistoryKind {
    pub fn icon(&self) -> &'static str {
        match self {
            HistoryKind::Success => "✅",
            HistoryKind::Error => "❌",
            HistoryKind::Info => "ℹ️",
            HistoryKind::Warning => "⚠️",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HistoryKind::Success => "Success",
            HistoryKind::Error => "Error",
            HistoryKind::Info => "Info",
            HistoryKind::Warning => "Warning",
        }
    }
}

/// A recorded notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: HistoryKind,
    pub content: String,
    pub timestamp: String,
    #[serde(default)]
    pub read: bool,
}

/// A file staged for the next submission. The bytes live in the
/// `MediaStore` under `media_id` until the post is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    pub media_id: String,
    /// Preview image as a data URL, when one could be produced.
    pub thumbnail: Option<String>,
}

impl SelectedFile {
    pub fn kind(&self) -> Option<MediaKind> {
        MediaKind::of(&self.mime_type)
    }
}

/// Aggregate figures shown on the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallStats {
    pub total: usize,
    pub love: usize,
    pub friendship: usize,
    pub total_likes: u64,
}
