use axum::{
    body::Bytes,
    extract::Path,
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

/// What `/echo` saw of the request it answered.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Echo {
    /// First header value named `name` (names arrive lowercased).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

pub fn app() -> Router {
    Router::new()
        .route("/hello", get(hello))
        .route("/status/{code}", get(status))
        .route("/echo", get(echo).post(echo).put(echo))
        .route("/cookies", get(cookies))
        .route("/redirect", get(redirect))
        .route("/redirect/echo", get(redirect_to_echo).post(redirect_to_echo).put(redirect_to_echo))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn hello() -> impl IntoResponse {
    ([("x-greeting", "hi")], "Hello")
}

async fn status(Path(code): Path<u16>) -> (StatusCode, String) {
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, format!("status {}", status.as_u16()))
}

async fn echo(method: Method, headers: HeaderMap, body: Bytes) -> Json<Echo> {
    let headers = headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();
    Json(Echo {
        method: method.to_string(),
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

async fn cookies() -> Response {
    let mut response = "cookies".into_response();
    let headers = response.headers_mut();
    headers.append(header::SET_COOKIE, HeaderValue::from_static("a=1"));
    headers.append(header::SET_COOKIE, HeaderValue::from_static("b=2"));
    response
}

async fn redirect() -> Redirect {
    Redirect::temporary("/hello")
}

/// 307 keeps the method and body, so the client must resend its payload.
async fn redirect_to_echo() -> Redirect {
    Redirect::temporary("/echo")
}
