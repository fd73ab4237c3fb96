//! Live adapter for the `TaskBackend` port using the Todoist API.

use std::collections::HashMap;

use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use crate::error::GhtError;
use crate::ports::{CommitReceipt, StateSnapshot, SyncCommand, TaskBackend, TaskItem};

/// Public Todoist API root.
pub const DEFAULT_TODOIST_API_URL: &str = "https://api.todoist.com/api/v1";

const RESOURCE_TYPES: &str = r#"["projects","labels","notes","items"]"#;

/// Task backend that talks to Todoist.
pub struct LiveTodoist {
    client: Client,
    base_url: String,
    token: String,
}

impl LiveTodoist {
    /// Creates a client for the API rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`GhtError::Upstream`] if the HTTP client cannot be built.
    pub fn new(token: impl Into<String>, base_url: impl Into<String>) -> Result<Self, GhtError> {
        let client = Client::builder()
            .user_agent(concat!("ght/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GhtError::Upstream(format!("Failed to build Todoist client: {e}")))?;
        Ok(Self { client, base_url: base_url.into(), token: token.into() })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }

    fn post_sync(&self, form: &[(&str, String)]) -> Result<String, GhtError> {
        let url = self.url("/sync");
        debug!(%url, "Todoist sync request");
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .form(form)
            .send()
            .map_err(|e| GhtError::Upstream(format!("Todoist API request failed: {e}")))?;
        read_success(response)
    }
}

fn read_success(response: Response) -> Result<String, GhtError> {
    let status = response.status();
    let text = response
        .text()
        .map_err(|e| GhtError::Upstream(format!("Failed to read Todoist API response: {e}")))?;
    if status.is_success() {
        Ok(text)
    } else {
        Err(GhtError::from_status("Todoist", status, &text))
    }
}

fn parse<'a, T: Deserialize<'a>>(text: &'a str) -> Result<T, GhtError> {
    serde_json::from_str(text)
        .map_err(|e| GhtError::Upstream(format!("Failed to parse Todoist API response: {e}")))
}

/// Response to a command batch.
#[derive(Deserialize)]
struct CommandResponse {
    #[serde(default)]
    sync_status: HashMap<String, serde_json::Value>,
    #[serde(default)]
    temp_id_mapping: HashMap<String, String>,
}

impl TaskBackend for LiveTodoist {
    fn sync_state(&self) -> Result<StateSnapshot, GhtError> {
        let text = self.post_sync(&[
            ("sync_token", "*".to_string()),
            ("resource_types", RESOURCE_TYPES.to_string()),
        ])?;
        parse(&text)
    }

    fn fetch_task(&self, id: &str) -> Result<Option<TaskItem>, GhtError> {
        let url = self.url(&format!("/tasks/{id}"));
        debug!(%url, "Todoist task lookup");
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .map_err(|e| GhtError::Upstream(format!("Todoist API request failed: {e}")))?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let text = read_success(response)?;
        parse(&text).map(Some)
    }

    fn commit(&self, commands: &[SyncCommand]) -> Result<CommitReceipt, GhtError> {
        if commands.is_empty() {
            return Ok(CommitReceipt::default());
        }

        let uuids: Vec<String> = commands.iter().map(|_| Uuid::new_v4().to_string()).collect();
        let payload: Vec<serde_json::Value> = commands
            .iter()
            .zip(&uuids)
            .map(|(command, uuid)| {
                json!({
                    "type": command.kind(),
                    "uuid": uuid,
                    "temp_id": command.temp_id(),
                    "args": command.args(),
                })
            })
            .collect();

        let text = self.post_sync(&[("commands", serde_json::Value::from(payload).to_string())])?;
        let response: CommandResponse = parse(&text)?;

        for (command, uuid) in commands.iter().zip(&uuids) {
            match response.sync_status.get(uuid) {
                Some(status) if status == "ok" => {}
                Some(status) => {
                    return Err(GhtError::Upstream(format!(
                        "Todoist rejected {} command: {status}",
                        command.kind()
                    )))
                }
                None => {
                    return Err(GhtError::Upstream(format!(
                        "Todoist returned no status for {} command",
                        command.kind()
                    )))
                }
            }
        }

        Ok(CommitReceipt { temp_id_mapping: response.temp_id_mapping })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[test]
    fn sync_state_requests_full_snapshot() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/sync")
            .match_header("authorization", "Bearer td-token")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("sync_token".into(), "*".into()),
                Matcher::UrlEncoded("resource_types".into(), RESOURCE_TYPES.into()),
            ]))
            .with_status(200)
            .with_body(
                json!({
                    "full_sync": true,
                    "projects": [{"id": "p1", "name": "Inbox", "is_deleted": false}],
                    "labels": [{"id": "l1", "name": "github", "is_deleted": false}],
                    "notes": [{"id": "n1", "item_id": "i1", "content": "#managed-by-ght\nghid=5", "is_deleted": false}],
                    "items": [{"id": "i1", "content": "task", "project_id": "p1", "parent_id": null, "checked": false, "is_deleted": false}]
                })
                .to_string(),
            )
            .create();

        let todoist = LiveTodoist::new("td-token", server.url()).unwrap();
        let snapshot = todoist.sync_state().unwrap();
        assert_eq!(snapshot.projects[0].name, "Inbox");
        assert_eq!(snapshot.notes[0].item_id, "i1");
        assert!(snapshot.live_item("i1").is_some());
        mock.assert();
    }

    #[test]
    fn rejected_token_is_authentication_error() {
        let mut server = mockito::Server::new();
        server.mock("POST", "/sync").with_status(401).with_body("Unauthorized").create();

        let todoist = LiveTodoist::new("bad", server.url()).unwrap();
        assert!(matches!(todoist.sync_state(), Err(GhtError::Authentication(_))));
    }

    #[test]
    fn fetch_task_maps_not_found_to_none() {
        let mut server = mockito::Server::new();
        server.mock("GET", "/tasks/gone").with_status(404).create();
        server
            .mock("GET", "/tasks/done")
            .with_status(200)
            .with_body(json!({"id": "done", "content": "x", "checked": true}).to_string())
            .create();

        let todoist = LiveTodoist::new("td-token", server.url()).unwrap();
        assert!(todoist.fetch_task("gone").unwrap().is_none());
        assert!(todoist.fetch_task("done").unwrap().unwrap().checked);
    }

    #[test]
    fn commit_with_no_commands_skips_request() {
        let mut server = mockito::Server::new();
        let mock = server.mock("POST", "/sync").expect(0).create();

        let todoist = LiveTodoist::new("td-token", server.url()).unwrap();
        assert!(todoist.commit(&[]).unwrap().temp_id_mapping.is_empty());
        mock.assert();
    }

    #[test]
    fn commit_fails_when_status_missing() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/sync")
            .with_status(200)
            .with_body(json!({"sync_status": {}, "temp_id_mapping": {}}).to_string())
            .create();

        let todoist = LiveTodoist::new("td-token", server.url()).unwrap();
        let command = SyncCommand::LabelAdd {
            temp_id: "t1".into(),
            name: "github".into(),
            color: "grey".into(),
        };
        let err = todoist.commit(&[command]).unwrap_err();
        assert!(err.to_string().contains("no status for label_add"));
    }
}
