#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    extract::Request,
    http::{Method, StatusCode, header},
};
use eventflow::{
    AppState,
    config::{
        Config, DatabaseConfig, ImagesConfig, JwtConfig, ObservabilityConfig, ServerConfig,
        SweepConfig,
    },
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use temp_dir::TempDir;
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    // Dropping the directory removes the database file
    _dir: TempDir,
}

pub struct TestResponse {
    pub status: StatusCode,
    /// `token=<jwt>` taken from Set-Cookie, ready to send back.
    pub cookie: Option<String>,
    pub body: Value,
}

pub fn config(dir: &TempDir) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_owned(),
            port: 3000,
        },
        database: DatabaseConfig {
            url: format!("sqlite:{}", dir.child("db.sqlite3").to_str().unwrap()),
            max_connections: 2,
        },
        jwt: JwtConfig {
            secret: "test_secret_key_minimum_32_characters_long".to_owned(),
            expiration_days: 1,
            issuer: "eventflow".to_owned(),
            audience: "eventflow-api".to_owned(),
            secure_cookie: false,
        },
        images: ImagesConfig {
            dir: dir.child("uploads").to_str().unwrap().to_owned(),
            public_url: "http://localhost:3000/uploads".to_owned(),
        },
        sweep: SweepConfig {
            enabled: false,
            schedule: "0 0 2 * * *".to_owned(),
        },
        observability: ObservabilityConfig::default(),
    }
}

pub async fn setup_test_app() -> anyhow::Result<TestApp> {
    let dir = TempDir::new()?;
    let state = AppState::build(config(&dir)).await?;

    Ok(TestApp {
        router: eventflow::routes::router(state.clone()),
        state,
        _dir: dir,
    })
}

impl TestApp {
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        cookie: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .map(|value| value.to_owned());

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        TestResponse {
            status,
            cookie,
            body,
        }
    }

    /// Number of image files stored by the local image host.
    pub fn uploaded_files(&self) -> usize {
        std::fs::read_dir(&self.state.config.images.dir)
            .map(|entries| entries.count())
            .unwrap_or(0)
    }

    /// Registers an account and returns its id and session cookie.
    pub async fn register(&self, name: &str, mobile_number: &str) -> (String, String) {
        let res = self
            .send(
                Method::POST,
                "/auth/register",
                None,
                Some(json!({
                    "fullName": name,
                    "email": format!("{name}@example.com"),
                    "password": "secret-password",
                    "mobileNumber": mobile_number,
                })),
            )
            .await;

        assert_eq!(res.status, StatusCode::CREATED, "{}", res.body);

        (
            res.body["user"]["id"].as_str().unwrap().to_owned(),
            res.cookie.unwrap(),
        )
    }

    /// Creates an event with hosted images and returns its id.
    pub async fn create_event(&self, cookie: &str, title: &str, max_attendees: i64) -> String {
        let res = self
            .send(
                Method::POST,
                "/event/create-event",
                Some(cookie),
                Some(event_body(title, max_attendees)),
            )
            .await;

        assert_eq!(res.status, StatusCode::CREATED, "{}", res.body);

        res.body["event"]["id"].as_str().unwrap().to_owned()
    }
}

pub fn event_body(title: &str, max_attendees: i64) -> Value {
    json!({
        "title": title,
        "description": "An evening of talks",
        "location": "Pune",
        "date": "2100-01-01",
        "time": "6:00 PM",
        "image": "https://cdn.example.com/image.png",
        "banner1": "https://cdn.example.com/banner1.png",
        "banner2": "https://cdn.example.com/banner2.png",
        "maxAttendees": max_attendees,
    })
}
