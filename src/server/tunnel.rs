//! Public tunnel management
//!
//! Spawns the ngrok agent for the local listener and discovers the public
//! endpoint through the agent's local API. The endpoint scheme is forced to
//! HTTPS so browsers treat the served URLs as a secure origin.

use std::process::{Child, Command, Stdio};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};

/// The agent's local inspection API.
const NGROK_API: &str = "http://127.0.0.1:4040/api/tunnels";
const POLL_ATTEMPTS: u32 = 20;
const POLL_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug, Deserialize)]
struct TunnelList {
    tunnels: Vec<TunnelEntry>,
}

#[derive(Debug, Deserialize)]
struct TunnelEntry {
    public_url: String,
}

/// A running ngrok agent exposing one local port. Killing the child process
/// tears the tunnel down.
pub struct NgrokTunnel {
    child: Child,
    pub public_url: String,
}

impl NgrokTunnel {
    /// Spawn the agent for `port` and wait for its public endpoint to appear
    /// on the local API.
    pub fn open(port: u16) -> Result<Self> {
        let mut child = Command::new("ngrok")
            .args(["http", &port.to_string()])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| Error::ExternalTool {
                command: "ngrok http".to_string(),
                detail: e.to_string(),
            })?;

        let client = reqwest::blocking::Client::new();
        let mut public_url = None;
        for _ in 0..POLL_ATTEMPTS {
            std::thread::sleep(POLL_INTERVAL);
            let Ok(response) = client.get(NGROK_API).send() else {
                continue;
            };
            let Ok(body) = response.text() else { continue };
            if let Ok(list) = serde_json::from_str::<TunnelList>(&body) {
                if let Some(entry) = list.tunnels.into_iter().next() {
                    public_url = Some(entry.public_url);
                    break;
                }
            }
        }

        match public_url {
            Some(url) => {
                let public_url = force_https(&url);
                tracing::info!(url = %public_url, "tunnel established");
                Ok(Self { child, public_url })
            }
            None => {
                let _ = child.kill();
                let _ = child.wait();
                Err(Error::ExternalTool {
                    command: "ngrok http".to_string(),
                    detail: "tunnel endpoint never appeared on the local agent API".to_string(),
                })
            }
        }
    }

    pub fn close(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

impl Drop for NgrokTunnel {
    fn drop(&mut self) {
        self.close();
    }
}

/// Rewrite an `http://` endpoint to `https://`; anything else passes through.
pub fn force_https(url: &str) -> String {
    match url.strip_prefix("http://") {
        Some(rest) => format!("https://{rest}"),
        None => url.to_string(),
    }
}
