//! CLI Send Command
//!
//! Posts a local file to an upload endpoint the way the exfiltration client
//! does: whole file in memory, `filename` header set to its base name and
//! `Content-Length` taken from the in-memory body.

use std::path::Path;

use anyhow::{Context, Result};
use exfil_sink_core::FILENAME_HEADER;
use reqwest::header::CONTENT_TYPE;
use tracing::info;

/// Reply from the upload endpoint.
#[derive(Debug)]
pub struct SendOutcome {
    pub status: u16,
    pub body: String,
}

pub async fn run(endpoint: &str, file: &Path) -> Result<()> {
    let outcome = send_file(&reqwest::Client::new(), endpoint, file).await?;
    println!("Server response ({}): {}", outcome.status, outcome.body);
    Ok(())
}

pub async fn send_file(client: &reqwest::Client, endpoint: &str, file: &Path) -> Result<SendOutcome> {
    let contents = tokio::fs::read(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let name = file
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("No usable file name in {}", file.display()))?
        .to_string();

    info!(endpoint, filename = %name, bytes = contents.len(), "Sending file");

    let response = client
        .post(endpoint)
        .header(CONTENT_TYPE, "application/octet-stream")
        .header(FILENAME_HEADER, name.as_str())
        .body(contents)
        .send()
        .await
        .with_context(|| format!("Failed to send {} to {endpoint}", file.display()))?;

    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .context("Failed to read response body")?;

    Ok(SendOutcome { status, body })
}
