#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;

/// A server process serving the fixture data set on its own port.
/// Each test gets a fresh process so writes never leak between tests.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub client: reqwest::Client,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        // Nothing listens here, so any geocoding attempt fails upstream
        let geocoder_port = portpicker::pick_unused_port().context("failed to pick geocoder port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let child = Command::new(env!("CARGO_BIN_EXE_rentavenue-api"))
            .arg("--port")
            .arg(port.to_string())
            .arg("--fixtures")
            .arg(concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/listings.yaml"))
            .env("GEOCODER_BASE_URL", format!("http://127.0.0.1:{}", geocoder_port))
            .env("GEOCODER_TIMEOUT_SECS", "2")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .context("failed to spawn server binary")?;

        Ok(Self { port, base_url, client: reqwest::Client::new(), child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = self.client.get(&url).send().await {
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

    pub async fn get_json(&self, path: &str) -> Result<(StatusCode, serde_json::Value)> {
        let res = self.client.get(self.url(path)).send().await?;
        let status = res.status();
        Ok((status, res.json().await?))
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

pub async fn start_server() -> Result<TestServer> {
    let server = TestServer::spawn()?;
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// Ids of a JSON array of listings, in response order
pub fn ids(body: &serde_json::Value) -> Vec<i64> {
    body.as_array()
        .map(|items| items.iter().filter_map(|item| item["id"].as_i64()).collect())
        .unwrap_or_default()
}
