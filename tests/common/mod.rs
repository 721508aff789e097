#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::{Response, StatusCode};
use serde_json::{json, Value};

use guardpost_api::app::{app, AppState};
use guardpost_api::database::MemoryStore;
use guardpost_api::services::ResourceService;

/// In-process server backed by a fresh in-memory store
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub client: reqwest::Client,
}

impl TestServer {
    pub async fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let service = ResourceService::with_store(Arc::new(MemoryStore::new()));
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test port")?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app(AppState::new(service))).await;
        });

        let server = Self {
            port,
            base_url,
            client: reqwest::Client::new(),
        };
        server.wait_ready(Duration::from_secs(5)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get(&self, path: &str) -> Result<Response> {
        Ok(self.client.get(self.url(path)).send().await?)
    }

    pub async fn post(&self, path: &str, body: &Value) -> Result<Response> {
        Ok(self.client.post(self.url(path)).json(body).send().await?)
    }

    pub async fn put(&self, path: &str, body: &Value) -> Result<Response> {
        Ok(self.client.put(self.url(path)).json(body).send().await?)
    }

    pub async fn delete(&self, path: &str) -> Result<Response> {
        Ok(self.client.delete(self.url(path)).send().await?)
    }

    /// POST a body that must succeed; returns the created record
    pub async fn create(&self, plural: &str, singular: &str, body: &Value) -> Result<Value> {
        let res = self.post(&format!("/api/v1/{}", plural), body).await?;
        let status = res.status();
        let json = res.json::<Value>().await?;
        anyhow::ensure!(status == StatusCode::CREATED, "create {} failed with {}: {}", plural, status, json);
        Ok(json["data"][singular].clone())
    }
}

pub fn id_of(record: &Value) -> String {
    record["id"].as_str().unwrap_or_default().to_string()
}

pub fn client_body(email: &str, contact_person: &str) -> Value {
    json!({
        "name": "Acme Holdings",
        "contactPerson": contact_person,
        "email": email,
        "phone": 8035551234i64,
        "rate": 150,
        "address": "4 Broad Street, Lagos",
        "startDate": "2024-01-15"
    })
}

pub fn zone_body(name: &str) -> Value {
    json!({ "name": name, "description": "Waterfront sites" })
}

pub fn location_body(name: &str, client_id: &str, zone_id: &str) -> Value {
    json!({
        "name": name,
        "area": "Apapa",
        "client": client_id,
        "zone": zone_id
    })
}

pub fn guard_body(name: &str) -> Value {
    json!({
        "name": name,
        "dateOfBirth": "1990-05-01",
        "address": "12 Marina Road",
        "gender": "Female",
        "shift": "Day",
        "passportPicture": "passport.jpg"
    })
}
