//! Change notifications sent at the end of a run.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, instrument};
use url::Url;

use crate::errors::Error;

#[cfg(test)]
#[path = "notifier_tests.rs"]
mod tests;

/// Receives the list of changes made during a run.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Sends a single notification for the organization.
    ///
    /// `changes` holds `owner/repo` and `owner/repo#branch` identifiers.
    async fn notify(&self, organization: &str, changes: &[String]) -> Result<(), Error>;
}

const SLACK_COLOR: &str = "#FFA500";
const SLACK_FOOTER: &str = "repo-enforcer";
const SLACK_FOOTER_ICON: &str = "https://platform.slack-edge.com/img/default_application_icon.png";

/// Body of a Slack incoming-webhook message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlackMessage {
    pub attachments: Vec<SlackAttachment>,
}

/// A legacy Slack message attachment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlackAttachment {
    pub mrkdwn_in: Vec<String>,
    pub pretext: String,
    pub color: String,
    pub fields: Vec<SlackField>,
    pub footer: String,
    pub footer_icon: String,
    /// Unix timestamp shown next to the footer
    pub ts: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlackField {
    pub title: String,
    pub value: String,
    pub short: bool,
}

impl SlackMessage {
    /// Builds the change summary for `organization`, one change per line.
    pub fn for_changes(organization: &str, changes: &[String], sent_at: DateTime<Utc>) -> Self {
        Self {
            attachments: vec![SlackAttachment {
                mrkdwn_in: vec!["pretext".to_string(), "footer".to_string()],
                pretext: format!("GitHub Repository Settings Updated for *{}*", organization),
                color: SLACK_COLOR.to_string(),
                fields: vec![SlackField {
                    title: "The following updates were made:".to_string(),
                    value: changes.join("\n"),
                    short: false,
                }],
                footer: SLACK_FOOTER.to_string(),
                footer_icon: SLACK_FOOTER_ICON.to_string(),
                ts: sent_at.timestamp(),
            }],
        }
    }
}

/// Posts change summaries to a Slack incoming webhook.
#[derive(Debug, Clone)]
pub struct SlackNotifier {
    client: reqwest::Client,
    webhook_url: Url,
}

impl SlackNotifier {
    /// Creates a notifier for the given webhook URL.
    ///
    /// # Errors
    /// Returns `Error::Notification` if the URL cannot be parsed.
    pub fn new(webhook_url: &str) -> Result<Self, Error> {
        let webhook_url = Url::parse(webhook_url)
            .map_err(|e| Error::Notification(format!("invalid webhook URL: {}", e)))?;

        Ok(Self {
            client: reqwest::Client::new(),
            webhook_url,
        })
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    #[instrument(skip(self, changes), fields(organization = %organization, change_count = changes.len()))]
    async fn notify(&self, organization: &str, changes: &[String]) -> Result<(), Error> {
        let message = SlackMessage::for_changes(organization, changes, Utc::now());

        self.client
            .post(self.webhook_url.clone())
            .json(&message)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| Error::Notification(e.to_string()))?;

        info!(organization = organization, "Sent change notification to Slack");
        Ok(())
    }
}
