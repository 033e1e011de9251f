//! Directory service client.
//!
//! Translates the four department operations into GraphQL calls. Failures of
//! any kind are logged in full and surfaced to callers only as
//! [`AppError::RemoteOperationFailed`].

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Url, cookie::Jar};
use serde::de::DeserializeOwned;

use crate::config::ApiConfig;
use crate::error::{AppError, Result};
use crate::graphql::{self, GraphqlError, GraphqlRequest, GraphqlResponse};
use crate::models::{CreateDepartmentInput, Department, DepartmentId, Page};
use crate::session::{SessionStore, SharedSession, Token, expired_session_cookie, session_cookie};

/// GraphQL client for the department directory.
///
/// Cheap to clone; clones share the HTTP pool, cookie jar, and session.
#[derive(Clone)]
pub struct DirectoryClient {
    client: Client,
    jar: Arc<Jar>,
    base_url: String,
    graphql_url: String,
    login_url: String,
    tree_depth: usize,
    session: SharedSession,
}

impl DirectoryClient {
    /// Create a new client bound to the configured endpoint.
    pub fn new(api: &ApiConfig, session: SharedSession) -> Result<Self> {
        let jar = Arc::new(Jar::default());
        let mut builder = Client::builder().cookie_provider(jar.clone());
        if let Some(secs) = api.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            jar,
            base_url: api.base_url().to_string(),
            graphql_url: api.graphql_url(),
            login_url: api.login_url(),
            tree_depth: api.tree_depth,
            session,
        })
    }

    /// Underlying HTTP client (shared cookie jar).
    pub fn http(&self) -> &Client {
        &self.client
    }

    pub fn login_url(&self) -> &str {
        &self.login_url
    }

    pub fn session(&self) -> &SharedSession {
        &self.session
    }

    /// Mirror the session token into the cookie jar for the API origin.
    pub fn mirror_session_cookie(&self, token: &Token) {
        match Url::parse(&self.base_url) {
            Ok(url) => self.jar.add_cookie_str(&session_cookie(token), &url),
            Err(e) => tracing::warn!("Cannot mirror session cookie for {}: {}", self.base_url, e),
        }
    }

    /// Expire the mirrored session cookie.
    pub fn clear_session_cookie(&self) {
        match Url::parse(&self.base_url) {
            Ok(url) => self.jar.add_cookie_str(&expired_session_cookie(), &url),
            Err(e) => tracing::warn!("Cannot clear session cookie for {}: {}", self.base_url, e),
        }
    }

    /// Fetch one page of top-level departments.
    pub async fn list_departments(&self, page: u32) -> Result<Page> {
        let page = page.max(1);
        tracing::debug!("Listing departments, page {}", page);
        self.execute("getDepartments", graphql::list_departments(page, self.tree_depth)).await
    }

    /// Create a department together with its sub-departments.
    pub async fn create_department(&self, input: &CreateDepartmentInput) -> Result<Department> {
        tracing::debug!(
            "Creating department '{}' with {} sub-departments",
            input.name,
            input.sub_departments.as_ref().map_or(0, Vec::len)
        );
        self.execute("createDepartment", graphql::create_department(input)).await
    }

    /// Rename a department in place. Children are untouched.
    pub async fn rename_department(&self, id: DepartmentId, name: &str) -> Result<Department> {
        tracing::debug!("Renaming department {} to '{}'", id, name);
        self.execute("updateDepartment", graphql::update_department(id, name)).await
    }

    /// Delete a department and, server-side, all of its descendants.
    pub async fn delete_department(&self, id: DepartmentId) -> Result<bool> {
        tracing::debug!("Deleting department {}", id);
        self.execute("deleteDepartment", graphql::delete_department(id)).await
    }

    async fn execute<T: DeserializeOwned>(&self, operation: &'static str, request: GraphqlRequest) -> Result<T> {
        match self.send(operation, &request).await {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::error!("Directory call {} failed: {}", operation, e);
                Err(AppError::RemoteOperationFailed(operation))
            }
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        field: &str,
        request: &GraphqlRequest,
    ) -> std::result::Result<T, GraphqlError> {
        // The server decides whether a missing token is acceptable.
        let authorization = self.session.token().map(|t| t.bearer()).unwrap_or_default();

        let response = self
            .client
            .post(&self.graphql_url)
            .header(AUTHORIZATION, authorization)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GraphqlError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: GraphqlResponse = response.json().await?;
        envelope.into_field(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemorySessionStore;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, session: SharedSession) -> DirectoryClient {
        let api = ApiConfig {
            url: server.uri(),
            request_timeout_secs: Some(5),
            ..ApiConfig::default()
        };
        DirectoryClient::new(&api, session).unwrap()
    }

    fn with_token(raw: &str) -> SharedSession {
        Arc::new(MemorySessionStore::with_token(Token::new(raw)))
    }

    #[tokio::test]
    async fn test_list_departments_sends_page_and_bearer() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/graphql"))
            .and(header("authorization", "Bearer abc"))
            .and(body_partial_json(json!({ "variables": { "page": 2 } })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "getDepartments": {
                    "departments": [{ "id": 1, "name": "Engineering", "subDepartments": [{ "id": 2, "name": "Backend" }] }],
                    "totalPages": 3
                } }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, with_token("abc"));
        let page = client.list_departments(2).await.unwrap();

        assert_eq!(page.total_pages, 3);
        assert_eq!(page.departments[0].sub_departments[0].name, "Backend");
    }

    #[tokio::test]
    async fn test_call_without_token_is_still_attempted() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/graphql"))
            .and(|req: &wiremock::Request| {
                req.headers.get("authorization").is_none_or(|v| v.is_empty())
            })
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "deleteDepartment": true }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, Arc::new(MemorySessionStore::new()));
        assert!(client.delete_department(9).await.unwrap());
    }

    #[tokio::test]
    async fn test_create_sends_nested_input() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/graphql"))
            .and(body_partial_json(json!({
                "variables": { "input": {
                    "name": "Engineering",
                    "subDepartments": [{ "name": "Backend" }, { "name": "Frontend" }]
                } }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "createDepartment": {
                    "id": 10, "name": "Engineering",
                    "subDepartments": [{ "id": 11, "name": "Backend" }, { "id": 12, "name": "Frontend" }]
                } }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, with_token("abc"));
        let input = CreateDepartmentInput::new("Engineering", ["Backend", "Frontend"]);
        let created = client.create_department(&input).await.unwrap();

        assert_eq!(created.id, 10);
        assert_eq!(created.sub_departments.len(), 2);
    }

    #[tokio::test]
    async fn test_create_without_entries_sends_null() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/graphql"))
            .and(body_partial_json(json!({
                "variables": { "input": { "name": "Finance", "subDepartments": null } }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "createDepartment": { "id": 20, "name": "Finance", "subDepartments": null } }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, with_token("abc"));
        let input = CreateDepartmentInput::new("Finance", Vec::<String>::new());
        let created = client.create_department(&input).await.unwrap();

        assert_eq!(created, Department::new(20, "Finance"));
    }

    #[tokio::test]
    async fn test_list_depth_follows_config() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/graphql"))
            .and(|req: &wiremock::Request| {
                serde_json::from_slice::<serde_json::Value>(&req.body)
                    .ok()
                    .and_then(|body| body["query"].as_str().map(|q| q.matches("subDepartments").count() == 1))
                    .unwrap_or(false)
            })
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "getDepartments": { "departments": [], "totalPages": 1 } }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let api = ApiConfig {
            url: server.uri(),
            tree_depth: 1,
            ..ApiConfig::default()
        };
        let client = DirectoryClient::new(&api, with_token("abc")).unwrap();

        assert!(client.list_departments(1).await.unwrap().departments.is_empty());
    }

    #[tokio::test]
    async fn test_rename_returns_partial_department() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/graphql"))
            .and(body_partial_json(json!({ "variables": { "id": 5, "name": "Revenue" } })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "updateDepartment": { "id": 5, "name": "Revenue" } }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, with_token("abc"));
        let renamed = client.rename_department(5, "Revenue").await.unwrap();

        assert_eq!(renamed, Department::new(5, "Revenue"));
    }

    #[tokio::test]
    async fn test_graphql_errors_become_generic_failure() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/graphql"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": null,
                "errors": [{ "message": "Department name already exists" }]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server, with_token("abc"));
        let err = client.rename_department(5, "Sales").await.unwrap_err();

        assert!(matches!(err, AppError::RemoteOperationFailed("updateDepartment")));
    }

    #[tokio::test]
    async fn test_http_status_becomes_generic_failure() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/graphql"))
            .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
            .mount(&server)
            .await;

        let client = client_for(&server, with_token("expired"));
        let err = client.list_departments(1).await.unwrap_err();

        assert!(matches!(err, AppError::RemoteOperationFailed("getDepartments")));
    }

    #[tokio::test]
    async fn test_token_is_read_per_call() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/graphql"))
            .and(header("authorization", "Bearer second"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "deleteDepartment": true }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let session: SharedSession = with_token("first");
        let client = client_for(&server, session.clone());
        session.set_token(Token::new("second"));

        assert!(client.delete_department(1).await.unwrap());
    }
}
