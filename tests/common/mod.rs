#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

use summer_games_api::config::{AppConfig, StorageBackend};

static SERVER: OnceLock<TestServer> = OnceLock::new();
static COUNTER: AtomicU32 = AtomicU32::new(1);

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut config = AppConfig::development();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = port;
        config.storage.backend = StorageBackend::Memory;
        config.seed.load_on_start = false;
        config.api.enable_request_logging = false;

        // Each #[tokio::test] owns a runtime that dies with the test, so the
        // server gets a thread and runtime of its own for the whole binary.
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .expect("failed to build server runtime");
            runtime.block_on(async move {
                if let Err(e) = summer_games_api::server::serve(config, false).await {
                    eprintln!("test server exited: {e:?}");
                }
            });
        });

        Ok(Self { port, base_url })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn test server"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// Uppercase code of exactly `len` letters, distinct for every call in this process
pub fn unique_code(len: usize) -> String {
    let mut n = COUNTER.fetch_add(1, Ordering::SeqCst);
    let mut letters = vec![b'A'; len];
    for slot in letters.iter_mut().rev() {
        *slot = b'A' + (n % 26) as u8;
        n /= 26;
    }
    String::from_utf8(letters).expect("ascii letters")
}

/// Seven digit athlete code, distinct for every call in this process
pub fn unique_athlete_code() -> String {
    format!("{:07}", 1_000_000 + COUNTER.fetch_add(1, Ordering::SeqCst))
}

/// POST a body and return the created resource, asserting 201
pub async fn create(client: &reqwest::Client, server: &TestServer, resource: &str, body: Value) -> Result<Value> {
    let res = client
        .post(server.url(&format!("/api/{}", resource)))
        .json(&body)
        .send()
        .await?;
    let status = res.status();
    let body = res.json::<Value>().await?;
    anyhow::ensure!(status == StatusCode::CREATED, "expected 201 creating {}, got {}: {}", resource, status, body);
    Ok(body)
}

pub async fn create_sport(client: &reqwest::Client, server: &TestServer) -> Result<Value> {
    create(client, server, "Sport", json!({ "code": unique_code(3), "name": "Test Sport" })).await
}

pub async fn create_contingent(client: &reqwest::Client, server: &TestServer) -> Result<Value> {
    create(client, server, "Contingent", json!({ "code": unique_code(2), "name": "Test Contingent" })).await
}

pub fn athlete_body(sport_id: i64, contingent_id: i64) -> Value {
    json!({
        "firstName": "Jordan",
        "lastName": "Tremblay",
        "athleteCode": unique_athlete_code(),
        "dob": "2004-06-15",
        "height": 175,
        "weight": 68.5,
        "affiliation": "Test Club",
        "mediaInfo": "Competes for the test club.",
        "gender": "M",
        "sportID": sport_id,
        "contingentID": contingent_id
    })
}

pub fn id_of(body: &Value) -> i64 {
    body["id"].as_i64().expect("id in body")
}
