#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use api_adapters::{build_router, AppState};
use auth_adapters::Argon2AuthProvider;
use axum::body::Body;
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use chrono::{DateTime, Duration, Local};
use domains::Clock;
use services::{Wall, WallSettings};
use storage_adapters::{FileKeyValueStore, LocalMediaStore};
use tempfile::TempDir;
use tower::ServiceExt;

pub const ADMIN_PASSWORD: &str = "letmein";
pub const BOUNDARY: &str = "confession-wall-boundary";

pub struct TestClock {
    now: Mutex<DateTime<Local>>,
}

impl TestClock {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            now: Mutex::new(Local::now()),
        })
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Clock for TestClock {
    fn now(&self) -> DateTime<Local> {
        *self.now.lock().unwrap()
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub clock: Arc<TestClock>,
    pub data_dir: TempDir,
    pub upload_dir: TempDir,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_settings(WallSettings::default())
    }

    pub fn with_settings(settings: WallSettings) -> Self {
        let data_dir = tempfile::tempdir().unwrap();
        let upload_dir = tempfile::tempdir().unwrap();
        Self::in_dirs(data_dir, upload_dir, settings)
    }

    /// Builds the app over existing directories, as a restart would.
    pub fn in_dirs(data_dir: TempDir, upload_dir: TempDir, settings: WallSettings) -> Self {
        let clock = TestClock::new();
        let kv = FileKeyValueStore::open(data_dir.path()).unwrap();
        let media = LocalMediaStore::new(upload_dir.path());
        let hash =
            auth_adapters::hash_password_with_salt(ADMIN_PASSWORD, b"integration-tests").unwrap();
        let auth = Argon2AuthProvider::new(Some(hash.into()));

        let wall = Wall::open(Arc::new(kv), clock.clone(), settings);
        let state = AppState::new(wall, Arc::new(media), Arc::new(auth));
        Self {
            router: build_router(state.clone()),
            state,
            clock,
            data_dir,
            upload_dir,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    pub async fn post_form(&self, uri: &str, form: &str) -> TestResponse {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Posts `files` as `media` fields of one multipart form.
    pub async fn upload(&self, files: &[(&str, &str, Vec<u8>)]) -> TestResponse {
        self.upload_raw(multipart_body(files)).await
    }

    /// Posts a hand-built multipart body, e.g. one that stops mid-file.
    pub async fn upload_raw(&self, body: Vec<u8>) -> TestResponse {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/uploads")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    pub async fn login(&self) {
        let response = self
            .post_form("/admin/login", &format!("password={ADMIN_PASSWORD}"))
            .await;
        assert_eq!(response.status, StatusCode::SEE_OTHER);
        assert_eq!(response.location(), Some("/admin"));
    }
}

pub fn multipart_body(files: &[(&str, &str, Vec<u8>)]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, content_type, data) in files {
        body.extend_from_slice(&part_header(name, content_type));
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// Opening boundary and headers of one `media` part.
pub fn part_header(name: &str, content_type: &str) -> Vec<u8> {
    format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"media\"; filename=\"{name}\"\r\n\
         Content-Type: {content_type}\r\n\r\n"
    )
    .into_bytes()
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([231, 76, 60]));
    let mut out = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    out.into_inner()
}
