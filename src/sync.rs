//! Executes view-model requests against the directory service.

use crate::client::DirectoryClient;
use crate::tree::{DepartmentTree, Outcome, Request};

/// Run one request and wrap its result for [`DepartmentTree::apply`].
pub async fn perform(client: &DirectoryClient, request: Request) -> Outcome {
    match request {
        Request::List { page } => Outcome::Listed {
            page,
            result: client.list_departments(page).await,
        },
        Request::Create(input) => Outcome::Created(client.create_department(&input).await),
        Request::Rename { id, name } => Outcome::Renamed(client.rename_department(id, &name).await),
        Request::Delete { id } => Outcome::Deleted {
            id,
            result: client.delete_department(id).await,
        },
    }
}

/// Perform `request` and every follow-up it triggers until the tree settles.
pub async fn drive(client: &DirectoryClient, tree: &mut DepartmentTree, request: Request) {
    let mut next = Some(request);
    while let Some(request) = next.take() {
        let outcome = perform(client, request).await;
        next = tree.apply(outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use crate::models::{Department, Page};
    use crate::session::{MemorySessionStore, SharedSession, Token};
    use serde_json::{Value, json};
    use std::sync::Arc;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> DirectoryClient {
        let api = ApiConfig {
            url: server.uri(),
            request_timeout_secs: Some(5),
            ..ApiConfig::default()
        };
        let session: SharedSession = Arc::new(MemorySessionStore::with_token(Token::new("abc")));
        DirectoryClient::new(&api, session).unwrap()
    }

    fn page_body(departments: Value) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "data": { "getDepartments": { "departments": departments, "totalPages": 1 } }
        }))
    }

    async fn mount_list(server: &MockServer, departments: Value, times: u64) {
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .and(body_partial_json(json!({ "variables": { "page": 1 } })))
            .respond_with(page_body(departments))
            .expect(times)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_rename_then_refetch() {
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

        let client = client_for(&server);
        let mut tree = DepartmentTree::new();

        tree.refresh();
        tree.apply(Outcome::Listed {
            page: 1,
            result: Ok(Page {
                departments: vec![Department::new(5, "Sales")],
                total_pages: 1,
            }),
        });
        assert_eq!(tree.departments()[0].name, "Sales");

        mount_list(&server, json!([{ "id": 5, "name": "Revenue" }]), 1).await;

        tree.begin_edit(5);
        tree.edit_form_mut().unwrap().set_name("Revenue");
        let request = tree.submit_edit().unwrap().unwrap();
        drive(&client, &mut tree, request).await;

        assert!(tree.edit().is_none());
        assert_eq!(tree.departments()[0].name, "Revenue");
    }

    #[tokio::test]
    async fn test_create_then_refetch() {
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
                "data": { "createDepartment": { "id": 1, "name": "Engineering", "subDepartments": [] } }
            })))
            .expect(1)
            .mount(&server)
            .await;
        mount_list(&server, json!([{ "id": 1, "name": "Engineering" }]), 1).await;

        let client = client_for(&server);
        let mut tree = DepartmentTree::new();
        tree.open_create();
        let draft = tree.create_draft_mut().unwrap();
        draft.set_name("Engineering");
        draft.add_entry();
        draft.set_entry(0, "Backend");
        draft.add_entry();
        draft.set_entry(1, "Frontend");

        let request = tree.submit_create().unwrap().unwrap();
        drive(&client, &mut tree, request).await;

        assert!(tree.create().is_none());
        assert_eq!(tree.departments().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_delete_does_not_refetch() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/graphql"))
            .and(body_partial_json(json!({ "variables": { "id": 3 } })))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;
        mount_list(&server, json!([]), 0).await;

        let client = client_for(&server);
        let mut tree = DepartmentTree::new();
        drive(&client, &mut tree, Request::Delete { id: 3 }).await;

        let notices = tree.take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].message, "Failed to delete department. Please try again.");
    }
}
