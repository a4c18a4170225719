//! Append-only record of succeeded payments (one JSON object per line).

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// One ledger line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub payment_id: String,
    pub event: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,
    pub metadata: Value,
    pub recorded_at: DateTime<Utc>,
}

impl PaymentRecord {
    /// Build a record from a webhook payment object.
    pub fn from_webhook(event: &str, payment_id: &str, metadata: &Value) -> Self {
        let service_type = metadata
            .get("service_type")
            .and_then(Value::as_str)
            .map(str::to_string);
        Self {
            payment_id: payment_id.to_string(),
            event: event.to_string(),
            service_type,
            metadata: metadata.clone(),
            recorded_at: Utc::now(),
        }
    }
}

/// JSON-lines ledger file. Appends are serialized through a mutex so
/// concurrent webhooks never interleave lines.
#[derive(Debug)]
pub struct PaymentLedger {
    path: PathBuf,
    lock: Mutex<()>,
}

impl PaymentLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), lock: Mutex::new(()) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a record, creating the file if needed.
    pub async fn append(&self, record: &PaymentRecord) -> anyhow::Result<()> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let _guard = self.lock.lock().await;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        tracing::info!("Recorded payment {} in {}", record.payment_id, self.path.display());
        Ok(())
    }

    /// Read every record back (missing file = empty ledger).
    pub async fn records(&self) -> anyhow::Result<Vec<PaymentRecord>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        contents
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).map_err(anyhow::Error::from))
            .collect()
    }
}
