//! Form state and validation for creating and renaming departments.

use std::fmt;

use crate::models::{CreateDepartmentInput, Department, DepartmentId};

/// Minimum number of characters in a department name.
pub const MIN_NAME_LEN: usize = 2;

/// Field path of the top-level name.
pub const NAME_FIELD: &str = "name";

const NAME_MESSAGE: &str = "Department name must be at least 2 characters long";
const SUB_NAME_MESSAGE: &str = "Sub-department name must be at least 2 characters long";

/// Field path of the sub-department entry at `index`.
pub fn sub_department_field(index: usize) -> String {
    format!("subDepartments.{index}.name")
}

/// Check a candidate name. The raw input is measured, not a trimmed copy.
pub fn validate_name(raw: &str) -> Result<(), String> {
    if raw.chars().count() < MIN_NAME_LEN {
        return Err(NAME_MESSAGE.to_string());
    }
    Ok(())
}

/// Validation messages keyed by field path, in the order they were raised.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    entries: Vec<(String, String)>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record (or replace) the message for a field.
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        let field = field.into();
        let message = message.into();
        match self.entries.iter_mut().find(|(f, _)| *f == field) {
            Some(entry) => entry.1 = message,
            None => self.entries.push((field, message)),
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, m)| m.as_str())
    }

    pub fn remove(&mut self, field: &str) {
        self.entries.retain(|(f, _)| f != field);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(f, m)| (f.as_str(), m.as_str()))
    }

    /// Shift sub-department paths after the entry at `removed` was deleted.
    fn reindex_after_removal(&mut self, removed: usize) {
        let removed_field = sub_department_field(removed);
        self.entries.retain(|(f, _)| *f != removed_field);
        for (field, _) in &mut self.entries {
            if let Some(index) = parse_sub_index(field)
                && index > removed
            {
                *field = sub_department_field(index - 1);
            }
        }
    }

    /// Shift sub-department paths to make room for an entry at `inserted`.
    fn reindex_after_insert(&mut self, inserted: usize) {
        for (field, _) in &mut self.entries {
            if let Some(index) = parse_sub_index(field)
                && index >= inserted
            {
                *field = sub_department_field(index + 1);
            }
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

fn parse_sub_index(field: &str) -> Option<usize> {
    field
        .strip_prefix("subDepartments.")?
        .strip_suffix(".name")?
        .parse()
        .ok()
}

/// Draft of the create dialog: a name plus ordered sub-department names.
#[derive(Debug, Clone, Default)]
pub struct CreateDraft {
    pub name: String,
    pub entries: Vec<String>,
    pub errors: FieldErrors,
}

impl CreateDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.errors.remove(NAME_FIELD);
    }

    /// Append an empty sub-department row.
    pub fn add_entry(&mut self) {
        self.entries.push(String::new());
    }

    /// Insert an empty row at `index` (clamped to the end).
    pub fn insert_entry(&mut self, index: usize) {
        let index = index.min(self.entries.len());
        self.entries.insert(index, String::new());
        self.errors.reindex_after_insert(index);
    }

    /// Remove the row at `index`. Out-of-range indices are ignored.
    pub fn remove_entry(&mut self, index: usize) {
        if index >= self.entries.len() {
            return;
        }
        self.entries.remove(index);
        self.errors.reindex_after_removal(index);
    }

    /// Replace the row text at `index`, clearing that row's error.
    pub fn set_entry(&mut self, index: usize, name: impl Into<String>) {
        if let Some(entry) = self.entries.get_mut(index) {
            *entry = name.into();
            self.errors.remove(&sub_department_field(index));
        }
    }

    /// Validate every field at once.
    ///
    /// Errors are stored on the draft and also returned; nothing is accepted
    /// unless every field passes.
    pub fn validate(&mut self) -> Result<CreateDepartmentInput, FieldErrors> {
        let mut errors = FieldErrors::new();

        if let Err(message) = validate_name(&self.name) {
            errors.insert(NAME_FIELD, message);
        }
        for (index, entry) in self.entries.iter().enumerate() {
            if validate_name(entry).is_err() {
                errors.insert(sub_department_field(index), SUB_NAME_MESSAGE);
            }
        }

        self.errors = errors.clone();
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(CreateDepartmentInput::new(self.name.clone(), self.entries.iter().cloned()))
    }
}

/// Rename dialog state for a single department.
#[derive(Debug, Clone)]
pub struct RenameForm {
    pub target: Department,
    pub name: String,
    pub error: Option<String>,
}

impl RenameForm {
    /// Open the form prefilled with the department's current name.
    pub fn new(target: Department) -> Self {
        let name = target.name.clone();
        Self {
            target,
            name,
            error: None,
        }
    }

    pub fn target_id(&self) -> DepartmentId {
        self.target.id
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.error = None;
    }

    /// Validate the new name, returning it on success.
    pub fn validate(&mut self) -> Result<String, FieldErrors> {
        match validate_name(&self.name) {
            Ok(()) => {
                self.error = None;
                Ok(self.name.clone())
            }
            Err(message) => {
                self.error = Some(message.clone());
                let mut errors = FieldErrors::new();
                errors.insert(NAME_FIELD, message);
                Err(errors)
            }
        }
    }
}
