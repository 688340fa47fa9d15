//! In-process mock of the queue service for client tests

use axum::extract::{Query, State};
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use serde_json::json;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use xqueue_core::dto::{LoginForm, QueueQuery, ResultForm};

const SESSION_COOKIE: &str = "sessionid=mock-session";

/// Shared state of the mock; every field can be tweaked between requests
#[derive(Default)]
pub(crate) struct MockQueue {
    items: Mutex<VecDeque<String>>,
    hits: Mutex<Vec<String>>,
    logins: Mutex<Vec<(String, String)>>,
    queue_names: Mutex<Vec<String>>,
    pushed: Mutex<Vec<ResultForm>>,
    /// Status forced on routes ending in `/`
    slash_status: Mutex<Option<u16>>,
    /// Status forced on routes without the trailing slash
    plain_status: Mutex<Option<u16>>,
    login_reply: Mutex<Option<String>>,
    queuelen_body: Mutex<Option<String>>,
    push_body: Mutex<Option<String>>,
    push_delay: Mutex<Option<Duration>>,
}

impl MockQueue {
    pub fn push_item(&self, raw: &str) {
        self.items.lock().unwrap().push_back(raw.to_string());
    }

    pub fn set_status(&self, slash: Option<u16>, plain: Option<u16>) {
        *self.slash_status.lock().unwrap() = slash;
        *self.plain_status.lock().unwrap() = plain;
    }

    pub fn set_login_reply(&self, body: &str) {
        *self.login_reply.lock().unwrap() = Some(body.to_string());
    }

    pub fn set_queuelen_body(&self, body: Option<String>) {
        *self.queuelen_body.lock().unwrap() = body;
    }

    pub fn set_push_body(&self, body: &str) {
        *self.push_body.lock().unwrap() = Some(body.to_string());
    }

    pub fn set_push_delay(&self, delay: Option<Duration>) {
        *self.push_delay.lock().unwrap() = delay;
    }

    /// Number of requests seen for `"<METHOD> <path>"`
    pub fn count(&self, request: &str) -> usize {
        self.hits
            .lock()
            .unwrap()
            .iter()
            .filter(|hit| hit.as_str() == request)
            .count()
    }

    pub fn logins(&self) -> Vec<(String, String)> {
        self.logins.lock().unwrap().clone()
    }

    pub fn queue_names(&self) -> Vec<String> {
        self.queue_names.lock().unwrap().clone()
    }

    pub fn pushed(&self) -> Vec<ResultForm> {
        self.pushed.lock().unwrap().clone()
    }

    /// Records the request and returns the forced status for its route, if any
    fn gate(&self, method: &Method, uri: &Uri) -> Option<Response> {
        let path = uri.path();
        self.hits.lock().unwrap().push(format!("{} {}", method, path));

        let forced = if path.ends_with('/') {
            *self.slash_status.lock().unwrap()
        } else {
            *self.plain_status.lock().unwrap()
        };

        forced.map(|code| {
            let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, "forced failure").into_response()
        })
    }
}

fn has_session(headers: &HeaderMap) -> bool {
    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|cookies| cookies.contains(SESSION_COOKIE))
}

async fn login(
    State(mock): State<Arc<MockQueue>>,
    method: Method,
    uri: Uri,
    Form(form): Form<LoginForm>,
) -> Response {
    if let Some(response) = mock.gate(&method, &uri) {
        return response;
    }
    mock.logins
        .lock()
        .unwrap()
        .push((form.username, form.password));

    let body = mock
        .login_reply
        .lock()
        .unwrap()
        .clone()
        .unwrap_or_else(|| json!({"return_code": 0, "content": "Logged in"}).to_string());

    (
        [(header::SET_COOKIE, format!("{}; Path=/", SESSION_COOKIE))],
        body,
    )
        .into_response()
}

async fn get_queuelen(
    State(mock): State<Arc<MockQueue>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Query(query): Query<QueueQuery>,
) -> Response {
    if let Some(response) = mock.gate(&method, &uri) {
        return response;
    }
    if !has_session(&headers) {
        return (StatusCode::FORBIDDEN, "login required").into_response();
    }
    mock.queue_names.lock().unwrap().push(query.queue_name);

    let body = mock.queuelen_body.lock().unwrap().clone().unwrap_or_else(|| {
        let len = mock.items.lock().unwrap().len();
        json!({"return_code": 0, "content": len}).to_string()
    });
    body.into_response()
}

async fn get_submission(
    State(mock): State<Arc<MockQueue>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Query(query): Query<QueueQuery>,
) -> Response {
    if let Some(response) = mock.gate(&method, &uri) {
        return response;
    }
    if !has_session(&headers) {
        return (StatusCode::FORBIDDEN, "login required").into_response();
    }
    mock.queue_names.lock().unwrap().push(query.queue_name.clone());

    let reply = match mock.items.lock().unwrap().pop_front() {
        Some(item) => json!({"return_code": 0, "content": item}),
        None => json!({
            "return_code": 1,
            "content": format!("Queue '{}' is empty", query.queue_name),
        }),
    };
    reply.to_string().into_response()
}

async fn put_result(
    State(mock): State<Arc<MockQueue>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Form(form): Form<ResultForm>,
) -> Response {
    if let Some(response) = mock.gate(&method, &uri) {
        return response;
    }
    if !has_session(&headers) {
        return (StatusCode::FORBIDDEN, "login required").into_response();
    }

    let delay = *mock.push_delay.lock().unwrap();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    mock.pushed.lock().unwrap().push(form);
    mock.push_body
        .lock()
        .unwrap()
        .clone()
        .unwrap_or_else(|| json!({"return_code": 0, "content": ""}).to_string())
        .into_response()
}

/// Serves the mock on an ephemeral port.
///
/// Returns the base URL (including the `/xqueue` prefix) and a shutdown handle.
pub(crate) async fn spawn_mock_queue(mock: Arc<MockQueue>) -> (String, oneshot::Sender<()>) {
    let app = Router::new()
        .route("/xqueue/login/", post(login))
        .route("/xqueue/login", post(login))
        .route("/xqueue/get_queuelen/", get(get_queuelen))
        .route("/xqueue/get_queuelen", get(get_queuelen))
        .route("/xqueue/get_submission/", get(get_submission))
        .route("/xqueue/get_submission", get(get_submission))
        .route("/xqueue/put_result/", post(put_result))
        .route("/xqueue/put_result", post(put_result))
        .with_state(mock);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind should succeed");
    let addr = listener.local_addr().expect("local_addr should succeed");

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await;
    });

    (format!("http://{}/xqueue", addr), shutdown_tx)
}

/// Base URL of a port nothing listens on
pub(crate) async fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind should succeed");
    let addr = listener.local_addr().expect("local_addr should succeed");
    drop(listener);
    format!("http://{}/xqueue", addr)
}
