//! Built-in posts for a fresh wall and for the admin "reset" action.

use chrono::{DateTime, Duration, Local};
use domains::{display_timestamp, Category, Post};

fn post(
    id: i64,
    to: &str,
    from: &str,
    content: &str,
    category: Category,
    at: DateTime<Local>,
    likes: u64,
) -> Post {
    Post {
        id,
        to: to.to_string(),
        from: from.to_string(),
        content: content.to_string(),
        category,
        timestamp: display_timestamp(&at),
        likes,
        media: Vec::new(),
    }
}

/// The single post a wall starts with when nothing was ever stored.
pub fn welcome(now: DateTime<Local>) -> Vec<Post> {
    vec![post(
        1,
        "Everyone",
        "Wall Helper",
        "Welcome to the confession wall! Say what you feel: love, friendship \
         or a simple thank-you all deserve to be seen and cherished.",
        Category::Thanks,
        now,
        5,
    )]
}

/// The demo data set used by the admin reset, newest first.
pub fn demo(now: DateTime<Local>) -> Vec<Post> {
    let mut posts = welcome(now);
    posts.push(post(
        2,
        "Li",
        "Someone who notices you",
        "Every time I see you studying in the library I can't look away. \
         I hope I get the chance to know you!",
        Category::Admiration,
        now - Duration::hours(1),
        3,
    ));
    posts.push(post(
        3,
        "Xiaoming",
        "Your good friend",
        "Thank you for staying with me through my hardest days. \
         You are my best friend!",
        Category::Friendship,
        now - Duration::hours(2),
        8,
    ));
    posts
}
