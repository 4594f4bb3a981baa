use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use std::time::Duration;

use crate::types::DayResult;

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Webhook request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("Failed to encode webhook payload: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookPayload {
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attachment {
    pub fallback: String,
    pub color: String,
    pub title: String,
    pub title_link: String,
    pub fields: Vec<Field>,
    pub mrkdwn_in: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub value: String,
    pub short: bool,
}

/// `*Location*` followed by its menu, one location after another.
pub fn menu_text(result: &DayResult) -> String {
    let mut text = String::new();
    for record in &result.locations {
        text.push_str(&format!("*{}*\n", record.location));
        text.push_str(&record.menu);
        text.push('\n');
    }
    text
}

pub fn build_payload(result: &DayResult, title: &str) -> WebhookPayload {
    WebhookPayload {
        attachments: vec![Attachment {
            fallback: title.to_string(),
            color: "good".to_string(),
            title: title.to_string(),
            title_link: result.url.clone(),
            fields: vec![Field {
                value: menu_text(result),
                short: false,
            }],
            mrkdwn_in: vec!["fields".to_string()],
        }],
    }
}

#[derive(Debug, Clone)]
pub struct Notifier {
    client: Client,
    webhook_url: String,
}

impl Notifier {
    pub fn new(webhook_url: &str) -> Result<Self, NotifyError> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            client,
            webhook_url: webhook_url.to_string(),
        })
    }

    /// Posts the menu once. A rejected post is logged, not retried.
    pub async fn notify(&self, result: &DayResult, title: &str) -> Result<(), NotifyError> {
        let body = serde_json::to_string(&build_payload(result, title))?;
        log::info!("Posting {} menu to webhook", result.day);

        let response = self
            .client
            .post(&self.webhook_url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .inspect_err(|e| log::error!("HTTP error: {e:?}"))?;

        let status = response.status();
        if status.is_success() {
            log::info!("Webhook accepted menu ({})", status);
        } else {
            log::warn!("Webhook responded with {}", status);
        }

        Ok(())
    }
}
