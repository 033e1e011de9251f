//! Department tree as returned by the directory service, plus mutation inputs.

use serde::{Deserialize, Serialize};

/// Server-assigned department identifier (GraphQL `Int`).
pub type DepartmentId = i64;

/// A department and its nested sub-departments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: DepartmentId,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub sub_departments: Vec<Department>,
}

impl Department {
    /// Create a leaf department.
    pub fn new(id: DepartmentId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            sub_departments: Vec::new(),
        }
    }

    /// Attach children (builder style).
    pub fn with_children(mut self, children: Vec<Department>) -> Self {
        self.sub_departments = children;
        self
    }

    /// Whether this node has at least one sub-department.
    pub fn has_children(&self) -> bool {
        !self.sub_departments.is_empty()
    }

    /// Depth-first search for a department by id, including `self`.
    pub fn find(&self, id: DepartmentId) -> Option<&Department> {
        if self.id == id {
            return Some(self);
        }
        self.sub_departments.iter().find_map(|child| child.find(id))
    }
}

/// One page of top-level departments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub departments: Vec<Department>,
    #[serde(default = "default_total_pages")]
    pub total_pages: u32,
}

fn default_total_pages() -> u32 {
    1
}

impl Default for Page {
    fn default() -> Self {
        Self {
            departments: Vec::new(),
            total_pages: default_total_pages(),
        }
    }
}

impl Page {
    /// Find a department anywhere in the page.
    pub fn find(&self, id: DepartmentId) -> Option<&Department> {
        self.departments.iter().find_map(|d| d.find(id))
    }
}

/// Sub-department entry of a create request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubDepartmentInput {
    pub name: String,
}

/// Input for `createDepartment`.
///
/// An empty sub-department list is sent as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDepartmentInput {
    pub name: String,
    pub sub_departments: Option<Vec<SubDepartmentInput>>,
}

impl CreateDepartmentInput {
    /// Build an input from a name and ordered sub-department names.
    pub fn new<I, S>(name: impl Into<String>, sub_department_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let subs: Vec<SubDepartmentInput> = sub_department_names
            .into_iter()
            .map(|name| SubDepartmentInput { name: name.into() })
            .collect();

        Self {
            name: name.into(),
            sub_departments: if subs.is_empty() { None } else { Some(subs) },
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Department>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<Department>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_nested_department() {
        let value = json!({
            "id": 1,
            "name": "Engineering",
            "subDepartments": [
                { "id": 2, "name": "Backend" },
                { "id": 3, "name": "Frontend", "subDepartments": null }
            ]
        });
        let dept: Department = serde_json::from_value(value).unwrap();

        assert_eq!(dept.name, "Engineering");
        assert_eq!(dept.sub_departments.len(), 2);
        assert!(!dept.sub_departments[0].has_children());
        assert!(dept.sub_departments[1].sub_departments.is_empty());
    }

    #[test]
    fn test_page_total_pages_defaults_to_one() {
        let page: Page = serde_json::from_value(json!({ "departments": [] })).unwrap();
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn test_find_searches_descendants() {
        let tree = Department::new(1, "Root").with_children(vec![
            Department::new(2, "A").with_children(vec![Department::new(4, "A1")]),
            Department::new(3, "B"),
        ]);

        assert_eq!(tree.find(4).map(|d| d.name.as_str()), Some("A1"));
        assert!(tree.find(99).is_none());
    }

    #[test]
    fn test_create_input_without_entries_sends_null() {
        let input = CreateDepartmentInput::new("Sales", Vec::<String>::new());
        let value = serde_json::to_value(&input).unwrap();

        assert_eq!(value, json!({ "name": "Sales", "subDepartments": null }));
    }

    #[test]
    fn test_create_input_with_entries() {
        let input = CreateDepartmentInput::new("Engineering", ["Backend", "Frontend"]);
        let value = serde_json::to_value(&input).unwrap();

        assert_eq!(
            value,
            json!({
                "name": "Engineering",
                "subDepartments": [{ "name": "Backend" }, { "name": "Frontend" }]
            })
        );
    }
}
