//! # Wall views
//!
//! The public page: the submission form with its pending files, the
//! category filter, the cards and the media gallery.

use askama::Template;
use domains::{
    Attachment, Category, CategoryFilter, HistoryEntry, MediaKind, Post, PostDraft, SelectedFile,
};

use crate::format::format_file_size;
use crate::history::HistoryItem;

#[derive(Debug, Clone)]
pub struct CardMediaView {
    pub name: String,
    pub src: String,
    pub is_video: bool,
    pub gallery_href: String,
}

#[derive(Debug, Clone)]
pub struct CardView {
    pub id: i64,
    pub to: String,
    pub from: String,
    pub content: String,
    /// CSS class, one per category.
    pub category: &'static str,
    pub icon: &'static str,
    pub timestamp: String,
    pub likes: u64,
    pub media: Vec<CardMediaView>,
}

impl CardView {
    pub fn project(post: &Post) -> Self {
        let media = post
            .media
            .iter()
            .enumerate()
            .filter_map(|(index, attachment)| {
                let kind = attachment.kind()?;
                Some(CardMediaView {
                    name: attachment.name.clone(),
                    src: attachment.inline_data.clone(),
                    is_video: kind == MediaKind::Video,
                    gallery_href: gallery_href(post.id, index),
                })
            })
            .collect();

        Self {
            id: post.id,
            to: post.to.clone(),
            from: post.from.clone(),
            content: post.content.clone(),
            category: post.category.as_str(),
            icon: post.category.icon(),
            timestamp: post.timestamp.clone(),
            likes: post.likes,
            media,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FilterButton {
    pub href: String,
    pub label: String,
    pub active: bool,
}

#[derive(Debug, Clone)]
pub struct PendingFileView {
    pub name: String,
    pub size: String,
    pub thumbnail: Option<String>,
    pub is_video: bool,
}

#[derive(Debug, Clone)]
pub struct CategoryOption {
    pub value: &'static str,
    pub label: String,
    pub selected: bool,
}

/// The submission form's current values, echoed back after a refusal.
#[derive(Debug, Clone, Default)]
pub struct DraftFields {
    pub to: String,
    pub from: String,
    pub content: String,
}

#[derive(Template)]
#[template(path = "wall.html")]
pub struct WallView {
    pub cards: Vec<CardView>,
    pub filters: Vec<FilterButton>,
    pub pending: Vec<PendingFileView>,
    pub categories: Vec<CategoryOption>,
    pub draft: DraftFields,
    /// The active filter's query value, carried by the like buttons.
    pub filter: &'static str,
    /// Set when the list is empty.
    pub empty_hint: Option<&'static str>,
    /// Inline prompt shown above the form.
    pub prompt: Option<String>,
    /// The newest notification while it is unread.
    pub latest: Option<HistoryItem>,
    pub unread: usize,
}

impl WallView {
    /// Projects the full collection through `filter`, keeping its order.
    pub fn project(
        posts: &[Post],
        filter: CategoryFilter,
        batch: &[SelectedFile],
        unread: usize,
    ) -> Self {
        let cards: Vec<CardView> = posts
            .iter()
            .filter(|p| filter.matches(p.category))
            .map(CardView::project)
            .collect();

        let empty_hint = cards.is_empty().then_some(match filter {
            CategoryFilter::All => "Be the first to post a confession!",
            CategoryFilter::Only(_) => "No confessions in this category yet.",
        });

        let mut filters = vec![FilterButton {
            href: "/?filter=all".to_string(),
            label: "All".to_string(),
            active: filter == CategoryFilter::All,
        }];
        filters.extend(Category::ALL.iter().map(|c| FilterButton {
            href: format!("/?filter={}", c.as_str()),
            label: format!("{} {}", c.icon(), c.label()),
            active: filter == CategoryFilter::Only(*c),
        }));

        let pending = batch
            .iter()
            .map(|f| PendingFileView {
                name: f.name.clone(),
                size: format_file_size(f.size_bytes),
                thumbnail: f.thumbnail.clone(),
                is_video: f.kind() == Some(MediaKind::Video),
            })
            .collect();

        Self {
            cards,
            filters,
            pending,
            categories: category_options(Category::default()),
            draft: DraftFields::default(),
            filter: filter.as_str(),
            empty_hint,
            prompt: None,
            latest: None,
            unread,
        }
    }

    /// Re-renders the form with what the visitor typed and a prompt.
    pub fn with_prompt(mut self, prompt: impl Into<String>, draft: &PostDraft) -> Self {
        self.prompt = Some(prompt.into());
        self.draft = DraftFields {
            to: draft.to.clone(),
            from: draft.from.clone(),
            content: draft.content.clone(),
        };
        self.categories = category_options(draft.category);
        self
    }

    pub fn with_latest(mut self, newest: Option<&HistoryEntry>) -> Self {
        self.latest = newest.filter(|e| !e.read).map(HistoryItem::project);
        self
    }
}

fn category_options(selected: Category) -> Vec<CategoryOption> {
    Category::ALL
        .iter()
        .map(|c| CategoryOption {
            value: c.as_str(),
            label: format!("{} {}", c.icon(), c.label()),
            selected: *c == selected,
        })
        .collect()
}

fn gallery_href(post_id: i64, index: usize) -> String {
    format!("/confessions/{post_id}/media/{index}")
}

/// One attachment of a post, full size, with neighbour links.
#[derive(Template)]
#[template(path = "gallery.html")]
pub struct GalleryView {
    pub name: String,
    pub src: String,
    pub is_video: bool,
    pub size: String,
    pub position: usize,
    pub total: usize,
    pub prev_href: Option<String>,
    pub next_href: Option<String>,
}

impl GalleryView {
    /// `None` when the post has no attachment at `index`.
    pub fn project(post: &Post, index: usize) -> Option<Self> {
        let attachment: &Attachment = post.media.get(index)?;
        let total = post.media.len();

        Some(Self {
            name: attachment.name.clone(),
            src: attachment.inline_data.clone(),
            is_video: attachment.kind() == Some(MediaKind::Video),
            size: format_file_size(attachment.size_bytes),
            position: index + 1,
            total,
            prev_href: (index > 0).then(|| gallery_href(post.id, index - 1)),
            next_href: (index + 1 < total).then(|| gallery_href(post.id, index + 1)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::{HistoryKind, SelectedFile};

    fn post(id: i64, category: Category, content: &str) -> Post {
        Post {
            id,
            to: "Alice".into(),
            from: "Bob".into(),
            content: content.into(),
            category,
            timestamp: "2024/5/1 14:03:22".into(),
            likes: 2,
            media: Vec::new(),
        }
    }

    fn attachment(name: &str, mime_type: &str) -> Attachment {
        Attachment {
            name: name.into(),
            mime_type: mime_type.into(),
            size_bytes: 1536,
            inline_data: format!("data:{mime_type};base64,AAAA"),
        }
    }

    #[test]
    fn test_filter_keeps_order_and_marks_active_button() {
        let posts = vec![
            post(3, Category::Love, "a"),
            post(2, Category::Thanks, "b"),
            post(1, Category::Love, "c"),
        ];
        let view = WallView::project(&posts, CategoryFilter::Only(Category::Love), &[], 0);

        let ids: Vec<_> = view.cards.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![3, 1]);
        let active: Vec<_> = view.filters.iter().filter(|f| f.active).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].href, "/?filter=love");
        assert!(view.empty_hint.is_none());
    }

    #[test]
    fn test_empty_hint_depends_on_filter() {
        let posts = vec![post(1, Category::Love, "a")];
        let all = WallView::project(&[], CategoryFilter::All, &[], 0);
        let thanks = WallView::project(&posts, CategoryFilter::Only(Category::Thanks), &[], 0);

        assert_eq!(all.empty_hint, Some("Be the first to post a confession!"));
        assert_eq!(thanks.empty_hint, Some("No confessions in this category yet."));
    }

    #[test]
    fn test_render_escapes_user_text() {
        let posts = vec![post(1, Category::Other, "<script>alert(1)</script>")];
        let html = WallView::project(&posts, CategoryFilter::All, &[], 0)
            .render()
            .unwrap();

        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>alert(1)</script>"));
    }

    #[test]
    fn test_pending_files_and_badge() {
        let batch = vec![SelectedFile {
            name: "cat.png".into(),
            mime_type: "image/png".into(),
            size_bytes: 2048,
            media_id: "abc".into(),
            thumbnail: Some("data:image/png;base64,AA==".into()),
        }];
        let view = WallView::project(&[], CategoryFilter::All, &batch, 3);
        assert_eq!(view.pending[0].size, "2 KB");

        let html = view.render().unwrap();
        assert!(html.contains("cat.png"));
        assert!(html.contains("class=\"badge\""));
    }

    #[test]
    fn test_prompt_echoes_draft() {
        let draft = PostDraft::new("", "kept text").in_category(Category::Thanks);
        let view = WallView::project(&[], CategoryFilter::All, &[], 0)
            .with_prompt("please fill in the recipient", &draft);

        assert_eq!(view.draft.content, "kept text");
        let selected: Vec<_> = view.categories.iter().filter(|c| c.selected).collect();
        assert_eq!(selected[0].value, "thanks");
        assert!(view.render().unwrap().contains("please fill in the recipient"));
    }

    #[test]
    fn test_latest_only_while_unread() {
        let mut entry = HistoryEntry {
            id: 1,
            kind: HistoryKind::Success,
            content: "Confession posted!".into(),
            timestamp: "2024/5/1 14:03:22".into(),
            read: false,
        };
        let view = WallView::project(&[], CategoryFilter::All, &[], 1).with_latest(Some(&entry));
        assert!(view.latest.is_some());

        entry.read = true;
        let view = WallView::project(&[], CategoryFilter::All, &[], 0).with_latest(Some(&entry));
        assert!(view.latest.is_none());
    }

    #[test]
    fn test_gallery_neighbours() {
        let mut p = post(7, Category::Love, "x");
        p.media = vec![
            attachment("a.png", "image/png"),
            attachment("b.mp4", "video/mp4"),
            attachment("c.gif", "image/gif"),
        ];

        let first = GalleryView::project(&p, 0).unwrap();
        assert!(first.prev_href.is_none());
        assert_eq!(first.next_href.as_deref(), Some("/confessions/7/media/1"));

        let middle = GalleryView::project(&p, 1).unwrap();
        assert!(middle.is_video);
        assert_eq!((middle.position, middle.total), (2, 3));
        assert_eq!(middle.size, "1.5 KB");

        let last = GalleryView::project(&p, 2).unwrap();
        assert!(last.next_href.is_none());
        assert!(GalleryView::project(&p, 3).is_none());
        assert!(GalleryView::project(&post(8, Category::Love, "y"), 0).is_none());
    }

    #[test]
    fn test_single_item_gallery_has_no_links() {
        let mut p = post(7, Category::Love, "x");
        p.media = vec![attachment("a.png", "image/png")];
        let only = GalleryView::project(&p, 0).unwrap();
        assert!(only.prev_href.is_none() && only.next_href.is_none());
    }
}
