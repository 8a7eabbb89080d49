#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use famdoc_core::auth::{self, model::SignUpOutcome};
use famdoc_core::user::{
    self,
    model::{NewUser, Role, User},
};
use famdoc_db::DbPool;
use famdoc_web::mailer::{Email, Mailer};
use famdoc_web::{create_router, state::AppState};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<Email>>,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: &Email) -> anyhow::Result<()> {
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

pub struct TestApp {
    pub state: AppState,
    pub mailer: Arc<RecordingMailer>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub text: String,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.text).unwrap()
    }
}

impl TestApp {
    pub fn new() -> Self {
        let mailer = Arc::new(RecordingMailer::default());
        let state = AppState::new(famdoc_db::in_memory(), "http://localhost:3000").with_mailer(mailer.clone());
        Self { state, mailer }
    }

    pub fn db(&self) -> &DbPool {
        &self.state.db
    }

    /// A signed-in staff member and their session token.
    pub async fn staff(&self, email: &str, role: Role, organization_id: Option<&str>) -> (User, String) {
        let SignUpOutcome::Created(identity) = auth::sign_up(self.db(), email).await.unwrap() else {
            panic!("email {} already taken", email);
        };
        let new = NewUser {
            email: identity.email.clone(),
            role: Some(role),
            ..Default::default()
        };
        let user = user::create_user(self.db(), &identity.auth_id, new, organization_id.map(String::from))
            .await
            .unwrap();
        let session = auth::create_session(self.db(), &identity.auth_id, vec![]).await.unwrap();
        (user, session.token)
    }

    pub async fn request(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::COOKIE, format!("sAccessToken={}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let res = create_router(self.state.clone()).oneshot(request).await.unwrap();
        let status = res.status();
        let headers = res.headers().clone();
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        TestResponse {
            status,
            headers,
            text: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }

    pub async fn get(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::DELETE, uri, Some(token), None).await
    }
}
