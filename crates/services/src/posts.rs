//! # Post Repository
//!
//! Owns the ordered, newest-first collection of posts and mirrors it to the
//! `confessions` key after every mutation.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use domains::{
    display_timestamp, Attachment, Category, CategoryFilter, Clock, Post, PostDraft, PostId,
    Result, WallStats,
};
use tracing::{debug, error, info};

use crate::persistence::{keys, Mutation, PersistentStore};
use crate::sample;

pub struct PostRepository {
    posts: Vec<Post>,
    store: PersistentStore,
    clock: Arc<dyn Clock>,
}

impl PostRepository {
    /// Reads the collection once. A store that never held posts starts with
    /// the welcome post; a malformed one starts empty.
    pub fn load(store: PersistentStore, clock: Arc<dyn Clock>) -> Self {
        let posts = match store.load::<Vec<Post>>(keys::CONFESSIONS) {
            Ok(Some(posts)) => {
                debug!(count = posts.len(), "Loaded confessions");
                posts
            }
            Ok(None) => sample::welcome(clock.now()),
            Err(e) => {
                error!(error = %e, "Failed to load confessions, starting empty");
                Vec::new()
            }
        };
        Self {
            posts,
            store,
            clock,
        }
    }

    pub fn all(&self) -> &[Post] {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn get(&self, id: PostId) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == id)
    }

    /// Assigns id and timestamp, prepends the post and persists.
    ///
    /// Fails without touching the collection when the draft lacks a
    /// recipient or content.
    pub fn create(&mut self, draft: PostDraft, media: Vec<Attachment>) -> Result<Mutation<Post>> {
        let draft = draft.normalize()?;
        let now = self.clock.now();
        let post = Post {
            id: self.next_id(now.timestamp_millis()),
            to: draft.to,
            from: draft.from,
            content: draft.content,
            category: draft.category,
            timestamp: display_timestamp(&now),
            likes: 0,
            media,
        };
        self.posts.insert(0, post.clone());
        info!(
            id = post.id,
            category = %post.category,
            media = post.media.len(),
            "Confession created"
        );
        Ok(Mutation::new(post, self.persist()))
    }

    /// Removes the post with `id`. Unknown ids are a no-op.
    pub fn delete(&mut self, id: PostId) -> Mutation<bool> {
        let before = self.posts.len();
        self.posts.retain(|p| p.id != id);
        if self.posts.len() == before {
            debug!(id, "Delete of unknown confession ignored");
            return Mutation::new(false, Ok(()));
        }
        info!(id, "Confession deleted");
        Mutation::new(true, self.persist())
    }

    /// Adds one like and returns the new count, `None` for unknown ids.
    pub fn like(&mut self, id: PostId) -> Mutation<Option<u64>> {
        let Some(post) = self.posts.iter_mut().find(|p| p.id == id) else {
            debug!(id, "Like of unknown confession ignored");
            return Mutation::new(None, Ok(()));
        };
        post.likes += 1;
        let likes = post.likes;
        Mutation::new(Some(likes), self.persist())
    }

    /// Posts in the selected category, in collection order.
    pub fn filter(&self, filter: CategoryFilter) -> Vec<&Post> {
        self.posts
            .iter()
            .filter(|p| filter.matches(p.category))
            .collect()
    }

    /// Case-insensitive substring search over recipient, author and
    /// content. A blank term matches everything.
    pub fn search(&self, term: &str) -> Vec<&Post> {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return self.posts.iter().collect();
        }
        self.posts
            .iter()
            .filter(|p| {
                p.to.to_lowercase().contains(&needle)
                    || p.from.to_lowercase().contains(&needle)
                    || p.content.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Empties the wall and returns how many posts were removed.
    pub fn clear_all(&mut self) -> Mutation<usize> {
        let removed = self.posts.len();
        self.posts.clear();
        info!(removed, "All confessions cleared");
        Mutation::new(removed, self.persist())
    }

    /// Replaces the collection with the demo data set.
    pub fn reset_to_sample(&mut self) -> Mutation<()> {
        self.posts = sample::demo(self.clock.now());
        info!(count = self.posts.len(), "Confessions reset to demo data");
        Mutation::new((), self.persist())
    }

    pub fn stats(&self) -> WallStats {
        WallStats {
            total: self.posts.len(),
            love: self.count(Category::Love),
            friendship: self.count(Category::Friendship),
            total_likes: self.posts.iter().map(|p| p.likes).sum(),
        }
    }

    /// The whole collection as an indented JSON document.
    pub fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.posts)?)
    }

    /// Size in bytes of the collection in its persisted form.
    pub fn stored_size_bytes(&self) -> usize {
        serde_json::to_string(&self.posts)
            .map(|raw| raw.len())
            .unwrap_or(0)
    }

    fn count(&self, category: Category) -> usize {
        self.posts.iter().filter(|p| p.category == category).count()
    }

    // Ids are creation millis; two posts in the same millisecond, or a
    // clock behind the newest id, take the next free value instead.
    fn next_id(&self, now_ms: i64) -> PostId {
        match self.posts.iter().map(|p| p.id).max() {
            Some(max) if max >= now_ms => max + 1,
            _ => now_ms,
        }
    }

    fn persist(&self) -> Result<()> {
        self.store
            .save(keys::CONFESSIONS, &self.posts)
            .inspect_err(|e| error!(error = %e, "Failed to save confessions"))
    }
}

/// Download name for an export taken on `date`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("confessions-{}.json", date.format("%Y-%m-%d"))
}

/// Export name for "today", using the UTC calendar date.
pub fn export_file_name_for(clock: &dyn Clock) -> String {
    export_file_name(clock.now().with_timezone(&Utc).date_naive())
}
