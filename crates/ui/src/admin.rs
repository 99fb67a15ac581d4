//! # Admin views
//!
//! Dashboard table, the post detail view and the login form.

use askama::Template;
use chrono::{DateTime, Local};
use domains::{display_timestamp, Post, WallStats};

use crate::format::{format_file_size, format_kib};

#[derive(Debug, Clone)]
pub struct AdminRow {
    pub id: i64,
    pub to: String,
    pub from: String,
    pub content: String,
    pub category: &'static str,
    pub category_label: String,
    pub likes: u64,
    pub timestamp: String,
}

impl AdminRow {
    fn project(post: &Post) -> Self {
        Self {
            id: post.id,
            to: post.to.clone(),
            from: post.from.clone(),
            content: post.content.clone(),
            category: post.category.as_str(),
            category_label: category_label(post),
            likes: post.likes,
            timestamp: post.timestamp.clone(),
        }
    }
}

#[derive(Template)]
#[template(path = "admin.html")]
pub struct AdminView {
    pub rows: Vec<AdminRow>,
    pub search: String,
    pub stats: WallStats,
    pub last_login: String,
    pub data_size: String,
}

impl AdminView {
    /// `posts` are the rows to show, already narrowed by `search`.
    pub fn project(
        posts: &[&Post],
        search: &str,
        stats: WallStats,
        last_login: Option<DateTime<Local>>,
        data_size: usize,
    ) -> Self {
        Self {
            rows: posts.iter().map(|p| AdminRow::project(p)).collect(),
            search: search.to_string(),
            stats,
            last_login: last_login
                .map(|at| display_timestamp(&at))
                .unwrap_or_else(|| "Never".to_string()),
            data_size: format_kib(data_size),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DetailMedia {
    pub name: String,
    pub mime_type: String,
    pub size: String,
}

#[derive(Template)]
#[template(path = "admin_detail.html")]
pub struct DetailView {
    pub id: i64,
    pub to: String,
    pub from: String,
    pub content: String,
    pub category: &'static str,
    pub category_label: String,
    pub likes: u64,
    pub timestamp: String,
    pub media: Vec<DetailMedia>,
}

impl DetailView {
    pub fn project(post: &Post) -> Self {
        Self {
            id: post.id,
            to: post.to.clone(),
            from: post.from.clone(),
            content: post.content.clone(),
            category: post.category.as_str(),
            category_label: category_label(post),
            likes: post.likes,
            timestamp: post.timestamp.clone(),
            media: post
                .media
                .iter()
                .map(|m| DetailMedia {
                    name: m.name.clone(),
                    mime_type: m.mime_type.clone(),
                    size: format_file_size(m.size_bytes),
                })
                .collect(),
        }
    }
}

#[derive(Template, Default)]
#[template(path = "login.html")]
pub struct LoginView {
    pub error: Option<String>,
}

impl LoginView {
    pub fn with_error(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
        }
    }
}

fn category_label(post: &Post) -> String {
    format!("{} {}", post.category.icon(), post.category.label())
}
