use std::time::Duration;

use anyhow::{Context, Result, bail};

use crate::types::UpdateAccepted;

pub struct DotnoteClient {
    client: reqwest::Client,
    base_url: String,
}

impl DotnoteClient {
    pub fn new(host: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client");
        Self {
            client,
            base_url: format!("http://{host}"),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Submit a message, expecting acceptance.
    pub async fn update(&self, message: &str) -> Result<UpdateAccepted> {
        let resp = self
            .client
            .get(self.url("/update"))
            .query(&[("message", message)])
            .send()
            .await
            .context("GET /update")?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            bail!("GET /update returned {status}: {body}");
        }
        resp.json().await.context("parsing update JSON")
    }

    /// Submit an update with full control over the query string; performs no
    /// status check so rejections can be inspected.
    pub async fn update_raw(&self, query: Option<(&str, &str)>) -> Result<reqwest::Response> {
        let mut request = self.client.get(self.url("/update"));
        if let Some((key, value)) = query {
            request = request.query(&[(key, value)]);
        }
        request.send().await.context("GET /update (raw)")
    }

    pub async fn get_index(&self) -> Result<String> {
        let resp = self
            .client
            .get(self.url("/"))
            .send()
            .await
            .context("GET /")?;
        let status = resp.status();
        if !status.is_success() {
            bail!("GET / returned {status}");
        }
        resp.text().await.context("reading index body")
    }

    pub async fn wait_for_ready(&self, timeout: Duration) -> Result<()> {
        let start = tokio::time::Instant::now();
        loop {
            if start.elapsed() > timeout {
                bail!("daemon did not become ready within {}s", timeout.as_secs());
            }
            match self.get_index().await {
                Ok(_) => return Ok(()),
                Err(_) => tokio::time::sleep(Duration::from_millis(500)).await,
            }
        }
    }
}
