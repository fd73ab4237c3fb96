//! Live adapter for the `IssueSource` port using the GitHub REST API.

use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::error::GhtError;
use crate::ports::{IssueRecord, IssueSource};

/// Public GitHub API root.
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

const GITHUB_API_VERSION: &str = "2022-11-28";
const SEARCH_PAGE_SIZE: usize = 100;
/// The search API never returns more than this many results.
const SEARCH_RESULT_CAP: usize = 1000;

/// Issue source that queries GitHub.
pub struct LiveGitHub {
    client: Client,
    base_url: String,
    token: String,
}

impl LiveGitHub {
    /// Creates a client for the API rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`GhtError::Upstream`] if the HTTP client cannot be built.
    pub fn new(token: impl Into<String>, base_url: impl Into<String>) -> Result<Self, GhtError> {
        let client = Client::builder()
            .user_agent(concat!("ght/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GhtError::Upstream(format!("Failed to build GitHub client: {e}")))?;
        Ok(Self { client, base_url: base_url.into(), token: token.into() })
    }

    fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T, GhtError> {
        let url = format!("{}{path}", self.base_url.trim_end_matches('/'));
        debug!(%url, "GitHub request");

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION)
            .query(query)
            .send()
            .map_err(|e| GhtError::Upstream(format!("GitHub API request failed: {e}")))?;

        let status = response.status();
        let text = response
            .text()
            .map_err(|e| GhtError::Upstream(format!("Failed to read GitHub API response: {e}")))?;

        if !status.is_success() {
            let msg =
                serde_json::from_str::<GitHubError>(&text).map(|e| e.message).unwrap_or(text);
            return Err(GhtError::from_status("GitHub", status, &msg));
        }

        serde_json::from_str(&text)
            .map_err(|e| GhtError::Upstream(format!("Failed to parse GitHub API response: {e}")))
    }
}

/// `GET /user` response.
#[derive(Deserialize)]
struct User {
    login: String,
}

/// One page of `GET /search/issues`.
#[derive(Deserialize)]
struct SearchPage {
    total_count: usize,
    items: Vec<IssueRecord>,
}

/// Error body returned by the GitHub API.
#[derive(Deserialize)]
struct GitHubError {
    message: String,
}

impl IssueSource for LiveGitHub {
    fn current_login(&self) -> Result<String, GhtError> {
        let user: User = self.get("/user", &[])?;
        Ok(user.login)
    }

    fn search_assigned_open(&self, login: &str) -> Result<Vec<IssueRecord>, GhtError> {
        let query = format!("is:issue is:open assignee:{login}");
        let mut records = Vec::new();

        for page in 1_u32.. {
            let result: SearchPage = self.get(
                "/search/issues",
                &[
                    ("q", query.clone()),
                    ("per_page", SEARCH_PAGE_SIZE.to_string()),
                    ("page", page.to_string()),
                ],
            )?;
            let fetched = result.items.len();
            records.extend(result.items);
            debug!(page, fetched, total = result.total_count, "Fetched search page");

            if fetched < SEARCH_PAGE_SIZE
                || records.len() >= result.total_count
                || records.len() >= SEARCH_RESULT_CAP
            {
                break;
            }
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn issue_json(id: u64, number: u64) -> serde_json::Value {
        json!({
            "id": id,
            "number": number,
            "html_url": format!("https://github.com/org/repo/issues/{number}"),
            "title": format!("Issue {number}"),
            "state": "open"
        })
    }

    #[test]
    fn current_login_reads_user() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/user")
            .match_header("authorization", "Bearer gh-token")
            .with_status(200)
            .with_body(json!({"login": "octocat", "id": 1}).to_string())
            .create();

        let github = LiveGitHub::new("gh-token", server.url()).unwrap();
        assert_eq!(github.current_login().unwrap(), "octocat");
        mock.assert();
    }

    #[test]
    fn bad_credentials_are_authentication_errors() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/user")
            .with_status(401)
            .with_body(json!({"message": "Bad credentials"}).to_string())
            .create();

        let github = LiveGitHub::new("wrong", server.url()).unwrap();
        let err = github.current_login().unwrap_err();
        assert!(matches!(err, GhtError::Authentication(_)));
        assert!(err.to_string().contains("Bad credentials"));
    }

    #[test]
    fn search_stops_after_short_page() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/search/issues")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("q".into(), "is:issue is:open assignee:octocat".into()),
                Matcher::UrlEncoded("page".into(), "1".into()),
            ]))
            .with_status(200)
            .with_body(
                json!({"total_count": 2, "items": [issue_json(11, 1), issue_json(12, 2)]})
                    .to_string(),
            )
            .expect(1)
            .create();

        let github = LiveGitHub::new("gh-token", server.url()).unwrap();
        let records = github.search_assigned_open("octocat").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, 11);
        assert_eq!(records[1].html_url, "https://github.com/org/repo/issues/2");
        mock.assert();
    }

    #[test]
    fn search_follows_full_pages() {
        let mut server = mockito::Server::new();
        let first: Vec<_> = (1..=100).map(|n| issue_json(n, n)).collect();
        let page_one = server
            .mock("GET", "/search/issues")
            .match_query(Matcher::UrlEncoded("page".into(), "1".into()))
            .with_status(200)
            .with_body(json!({"total_count": 101, "items": first}).to_string())
            .create();
        let page_two = server
            .mock("GET", "/search/issues")
            .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
            .with_status(200)
            .with_body(json!({"total_count": 101, "items": [issue_json(101, 101)]}).to_string())
            .create();

        let github = LiveGitHub::new("gh-token", server.url()).unwrap();
        let records = github.search_assigned_open("octocat").unwrap();
        assert_eq!(records.len(), 101);
        page_one.assert();
        page_two.assert();
    }

    #[test]
    fn server_errors_are_upstream_errors() {
        let mut server = mockito::Server::new();
        server.mock("GET", "/search/issues").match_query(Matcher::Any).with_status(502).create();

        let github = LiveGitHub::new("gh-token", server.url()).unwrap();
        let err = github.search_assigned_open("octocat").unwrap_err();
        assert!(matches!(err, GhtError::Upstream(_)));
    }
}
