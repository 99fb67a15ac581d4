mod common;

use axum::http::{header, StatusCode};
use chrono::Duration;
use common::TestApp;

#[tokio::test]
async fn dashboard_requires_login() {
    let app = TestApp::new();

    let response = app.get("/admin").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/admin/login"));

    let form = app.get("/admin/login").await;
    assert_eq!(form.status, StatusCode::OK);
    assert!(form.body.contains("type=\"password\""));
}

#[tokio::test]
async fn wrong_password_is_refused() {
    let app = TestApp::new();

    let response = app.post_form("/admin/login", "password=guess").await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert!(response.body.contains("Wrong password"));
    assert_eq!(app.get("/admin").await.status, StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn dashboard_lists_stats_and_searches() {
    let app = TestApp::new();
    app.login().await;
    app.post_form("/confessions", "to=Carol&content=thanks+for+the+tea&type=love")
        .await;

    let dashboard = app.get("/admin").await;
    assert_eq!(dashboard.status, StatusCode::OK);
    assert!(dashboard.body.contains("Carol"));
    assert!(dashboard.body.contains("Everyone"));
    assert!(!dashboard.body.contains("Last login: Never"));

    let found = app.get("/admin?q=TEA").await.body;
    assert!(found.contains("Carol"));
    assert!(!found.contains("<strong>Everyone</strong>"));

    let none = app.get("/admin?q=zzz").await.body;
    assert!(none.contains("No matching confessions"));
}

#[tokio::test]
async fn login_page_skips_ahead_when_logged_in() {
    let app = TestApp::new();
    app.login().await;
    let response = app.get("/admin/login").await;
    assert_eq!(response.location(), Some("/admin"));
}

#[tokio::test]
async fn detail_and_delete() {
    let app = TestApp::new();
    app.login().await;

    let detail = app.get("/admin/confessions/1").await;
    assert_eq!(detail.status, StatusCode::OK);
    assert!(detail.body.contains("Wall Helper"));
    assert_eq!(app.get("/admin/confessions/77").await.status, StatusCode::NOT_FOUND);

    let deleted = app.post_form("/admin/confessions/1/delete", "").await;
    assert_eq!(deleted.location(), Some("/admin"));

    let again = app.post_form("/admin/confessions/1/delete", "").await;
    assert_eq!(again.location(), Some("/admin"));

    let wall = app.state.wall.lock().await;
    assert!(wall.posts().is_empty());
    let deletions = wall
        .history()
        .entries()
        .iter()
        .filter(|e| e.content == "Confession deleted!")
        .count();
    assert_eq!(deletions, 1);
}

#[tokio::test]
async fn export_downloads_dated_json() {
    let app = TestApp::new();
    app.login().await;

    let response = app.get("/admin/export").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.headers[header::CONTENT_TYPE], "application/json");

    let disposition = response.headers[header::CONTENT_DISPOSITION].to_str().unwrap();
    assert!(disposition.starts_with("attachment; filename=\"confessions-"));
    assert!(disposition.ends_with(".json\""));

    let posts: serde_json::Value = serde_json::from_str(&response.body).unwrap();
    assert_eq!(posts[0]["to"], "Everyone");
    assert_eq!(posts[0]["type"], "thanks");
}

#[tokio::test]
async fn reset_and_clear() {
    let app = TestApp::new();
    app.login().await;

    app.post_form("/admin/reset", "").await;
    {
        let wall = app.state.wall.lock().await;
        let likes: Vec<_> = wall.posts().all().iter().map(|p| p.likes).collect();
        assert_eq!(likes, vec![5, 3, 8]);
    }

    app.post_form("/admin/clear", "").await;
    assert!(app.state.wall.lock().await.posts().is_empty());
    assert!(app.get("/").await.body.contains("Be the first to post a confession!"));
}

#[tokio::test]
async fn session_expires_after_thirty_idle_minutes() {
    let app = TestApp::new();
    app.login().await;

    app.clock.advance(Duration::minutes(29));
    assert_eq!(app.get("/admin").await.status, StatusCode::OK);

    app.clock.advance(Duration::minutes(31));
    let response = app.get("/admin").await;
    assert_eq!(response.location(), Some("/admin/login"));

    let stored = std::fs::read_dir(app.data_dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect::<Vec<_>>();
    assert!(!stored.contains(&"adminLoggedIn.json".to_string()));
    assert!(!stored.contains(&"loginTime.json".to_string()));
}

#[tokio::test]
async fn admin_actions_are_guarded() {
    let app = TestApp::new();

    let response = app.post_form("/admin/clear", "").await;
    assert_eq!(response.location(), Some("/admin/login"));
    assert_eq!(app.state.wall.lock().await.posts().len(), 1);

    let response = app.get("/admin/export").await;
    assert_eq!(response.location(), Some("/admin/login"));
}

#[tokio::test]
async fn logout_ends_the_session() {
    let app = TestApp::new();
    app.login().await;

    let response = app.post_form("/admin/logout", "").await;
    assert_eq!(response.location(), Some("/admin/login"));
    assert_eq!(app.get("/admin").await.location(), Some("/admin/login"));
}
