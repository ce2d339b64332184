use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use crate::error::StoreError;
use crate::models::SecurityEventRecord;

pub const DEFAULT_TABLE: &str = "security_logs";

/// Sink for admitted security events.
#[async_trait]
pub trait EventStore: Send + Sync {
    async fn insert(&self, record: &SecurityEventRecord) -> Result<(), StoreError>;
}

// Supabase REST (PostgREST) backed event log
pub struct SupabaseStore {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl SupabaseStore {
    pub fn new(client: reqwest::Client, base_url: &str, api_key: String, table: &str) -> Self {
        // add https:// if not present
        let base = base_url.trim().trim_end_matches('/');
        let base = if base.starts_with("http") {
            base.to_string()
        } else {
            format!("https://{}", base)
        };

        Self {
            client,
            endpoint: format!("{}/rest/v1/{}", base, table),
            api_key,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl EventStore for SupabaseStore {
    async fn insert(&self, record: &SecurityEventRecord) -> Result<(), StoreError> {
        let res = self
            .client
            .post(&self.endpoint)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "return=minimal")
            .timeout(Duration::from_secs(10))
            .json(record)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(StoreError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        debug!(event_type = %record.event_type, "Security event stored");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_is_built_from_project_url() {
        let client = reqwest::Client::new();
        let store = SupabaseStore::new(
            client.clone(),
            "https://abc.supabase.co/",
            "key".to_string(),
            DEFAULT_TABLE,
        );
        assert_eq!(store.endpoint(), "https://abc.supabase.co/rest/v1/security_logs");

        let bare = SupabaseStore::new(client, "abc.supabase.co", "key".to_string(), "events");
        assert_eq!(bare.endpoint(), "https://abc.supabase.co/rest/v1/events");
    }
}
