// Shared test helpers: local target sites, database setup and app wiring.
//
// Each integration test file pulls this in with `mod helpers;`, so not every
// helper is used by every file.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{HeaderMap, HeaderName, HeaderValue, Request};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use sqlx::SqlitePool;
use tokio::net::{TcpListener, TcpSocket, TcpStream};
use tower::ServiceExt;

use safescan::config::DEFAULT_SESSION_TTL;
use safescan::initialization::init_client;
use safescan::storage::{run_migrations, SessionIdentityProvider, SqliteHistoryStore};
use safescan::{AppState, Config, HttpProber, ScanStats, Scanner};

/// Creates a test database pool with migrations applied.
/// Uses an in-memory database for fast test execution.
pub async fn create_test_pool() -> SqlitePool {
    let pool = SqlitePool::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database pool");
    run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to get address");

    tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("Server failed to start");
    });

    format!("http://{}", addr)
}

/// Starts a site whose `/` answers with the given headers (HEAD and GET).
///
/// A name may appear more than once to produce a repeated header.
pub async fn start_target_server(headers: &[(&str, &str)]) -> String {
    let mut header_map = HeaderMap::new();
    for (name, value) in headers {
        header_map.append(
            name.parse::<HeaderName>().expect("valid header name"),
            HeaderValue::from_str(value).expect("valid header value"),
        );
    }

    let app = Router::new().route(
        "/",
        get(move || {
            let header_map = header_map.clone();
            async move { (header_map, "ok").into_response() }
        }),
    );
    serve(app).await
}

/// Starts a site that waits `delay` before answering.
pub async fn start_slow_server(delay: Duration) -> String {
    let app = Router::new().route(
        "/",
        get(move || async move {
            tokio::time::sleep(delay).await;
            "finally"
        }),
    );
    serve(app).await
}

/// Starts a site whose `/` redirects to `/final`, which carries a CSP.
pub async fn start_redirecting_server() -> String {
    let app = Router::new()
        .route(
            "/",
            get(|| async { axum::response::Redirect::temporary("/final") }),
        )
        .route(
            "/final",
            get(|| async { ([("content-security-policy", "default-src 'self'")], "final") }),
        );
    serve(app).await
}

/// A URL on a local port nobody listens on.
pub fn refused_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to get address");
    drop(listener);
    format!("http://{}", addr)
}

/// A local listener that never accepts and whose backlog is already full.
///
/// New connections to `url` stall in the TCP handshake, like a firewalled host.
pub struct StalledListener {
    pub url: String,
    _listener: TcpListener,
    _fillers: Vec<TcpStream>,
}

pub async fn start_stalled_listener() -> StalledListener {
    let socket = TcpSocket::new_v4().expect("Failed to create socket");
    socket
        .bind("127.0.0.1:0".parse().expect("valid address"))
        .expect("Failed to bind");
    let listener = socket.listen(0).expect("Failed to listen");
    let addr = listener.local_addr().expect("Failed to get address");

    let mut fillers = Vec::new();
    for _ in 0..4 {
        match tokio::time::timeout(Duration::from_millis(200), TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => fillers.push(stream),
            _ => break,
        }
    }

    StalledListener {
        url: format!("http://{}", addr),
        _listener: listener,
        _fillers: fillers,
    }
}

/// The pieces of a wired-up app, for tests that need to reach past the router.
pub struct TestApp {
    pub state: AppState,
    pub identity: Arc<SessionIdentityProvider>,
    pub pool: SqlitePool,
}

impl TestApp {
    /// App over an in-memory database with a real HTTP prober.
    pub async fn new(scan_timeout: Duration) -> Self {
        let pool = create_test_pool().await;
        let config = Config {
            scan_timeout_secs: scan_timeout.as_secs().max(1),
            ..Default::default()
        };
        let client = init_client(&config).expect("Failed to build client");

        let stats = Arc::new(ScanStats::new());
        let history = Arc::new(SqliteHistoryStore::new(pool.clone()));
        let identity = Arc::new(SessionIdentityProvider::new(pool.clone()));
        let scanner = Scanner::new(
            Arc::new(HttpProber::new(client)),
            history.clone(),
            Arc::clone(&stats),
            scan_timeout,
        );

        TestApp {
            state: AppState {
                scanner: Arc::new(scanner),
                history,
                identity: identity.clone(),
                stats,
            },
            identity,
            pool,
        }
    }

    /// Registers a user and returns a bearer token for them.
    pub async fn login(&self, email: &str) -> (String, String) {
        let user = self
            .identity
            .register_user(email)
            .await
            .expect("Failed to register user");
        let token = self
            .identity
            .issue_session(&user.id, DEFAULT_SESSION_TTL)
            .await
            .expect("Failed to issue session");
        (user.id, token)
    }

    /// Sends one request through a fresh router.
    pub async fn send(&self, request: Request<Body>) -> (u16, serde_json::Value) {
        let response: Response = safescan::router(self.state.clone())
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status().as_u16();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    /// Sends a request and returns the raw text body.
    pub async fn send_text(&self, request: Request<Body>) -> (u16, String) {
        let response: Response = safescan::router(self.state.clone())
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status().as_u16();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Builds a JSON request, optionally authenticated with a bearer token.
pub fn json_request(method: &str, uri: &str, body: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("valid request")
}

/// Builds a bodiless GET request.
pub fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).expect("valid request")
}

/// Polls until `owner_id` has `expected` history records or two seconds pass.
pub async fn wait_for_history(pool: &SqlitePool, owner_id: &str, expected: i64) -> i64 {
    let deadline = std::time::Instant::now() + Duration::from_secs(2);
    loop {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM scans WHERE owner_id = ?")
            .bind(owner_id)
            .fetch_one(pool)
            .await
            .expect("Failed to count scans");
        if count >= expected || std::time::Instant::now() > deadline {
            return count;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
