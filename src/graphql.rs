//! GraphQL documents and envelope handling for the directory service.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;

use crate::models::{CreateDepartmentInput, DepartmentId};

/// Default levels of `subDepartments` requested below each top-level department.
///
/// GraphQL has no recursive selections, so the tree is fetched to a fixed depth.
/// A node at the last level that has children arrives as a leaf.
pub const DEFAULT_TREE_DEPTH: usize = 4;

/// Why a single GraphQL call did not produce data.
#[derive(Error, Debug)]
pub enum GraphqlError {
    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("server errors: {}", .0.join("; "))]
    Server(Vec<String>),

    #[error("response has no `{0}` field")]
    MissingData(String),

    #[error("malformed `{field}`: {source}")]
    Decode {
        field: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Request body posted to the endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct GraphqlRequest {
    pub query: String,
    pub variables: Value,
}

#[derive(Debug, Deserialize)]
struct ErrorMessage {
    message: String,
}

/// Response envelope: `{ data, errors }`.
#[derive(Debug, Deserialize)]
pub struct GraphqlResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Option<Vec<ErrorMessage>>,
}

impl GraphqlResponse {
    /// Extract and decode `data.<field>`. Any server error fails the call.
    pub fn into_field<T: DeserializeOwned>(self, field: &str) -> Result<T, GraphqlError> {
        if let Some(errors) = self.errors
            && !errors.is_empty()
        {
            return Err(GraphqlError::Server(errors.into_iter().map(|e| e.message).collect()));
        }

        let value = self
            .data
            .and_then(|mut data| data.get_mut(field).map(Value::take))
            .filter(|v| !v.is_null())
            .ok_or_else(|| GraphqlError::MissingData(field.to_string()))?;

        serde_json::from_value(value).map_err(|source| GraphqlError::Decode {
            field: field.to_string(),
            source,
        })
    }
}

/// Selection set `{ id name subDepartments { ... } }` nested `depth` levels.
fn department_selection(depth: usize) -> String {
    if depth == 0 {
        return "{ id name }".to_string();
    }
    format!("{{ id name subDepartments {} }}", department_selection(depth - 1))
}

pub fn list_departments(page: u32, depth: usize) -> GraphqlRequest {
    GraphqlRequest {
        query: format!(
            "query GetDepartments($page: Int) {{ getDepartments(page: $page) {{ departments {} totalPages }} }}",
            department_selection(depth)
        ),
        variables: json!({ "page": page }),
    }
}

pub fn create_department(input: &CreateDepartmentInput) -> GraphqlRequest {
    GraphqlRequest {
        query: format!(
            "mutation CreateDepartment($input: CreateDepartmentInput!) {{ createDepartment(input: $input) {} }}",
            department_selection(1)
        ),
        variables: json!({ "input": input }),
    }
}

pub fn update_department(id: DepartmentId, name: &str) -> GraphqlRequest {
    GraphqlRequest {
        query: "mutation UpdateDepartment($id: Int!, $name: String!) { updateDepartment(id: $id, name: $name) { id name } }"
            .to_string(),
        variables: json!({ "id": id, "name": name }),
    }
}

pub fn delete_department(id: DepartmentId) -> GraphqlRequest {
    GraphqlRequest {
        query: "mutation DeleteDepartment($id: Int!) { deleteDepartment(id: $id) }".to_string(),
        variables: json!({ "id": id }),
    }
}
