//! Department tree view-model.
//!
//! Holds the fetched page, per-node expansion, and the pending edit, delete,
//! and create slots. It performs no I/O: intents return a [`Request`] for the
//! caller to execute, and results come back as an [`Outcome`]. A successful
//! mutation always yields exactly one list request for the current page; the
//! tree is never patched locally.

use std::collections::HashSet;
use std::ops::RangeInclusive;

use crate::error::{AppError, Result};
use crate::forms::{CreateDraft, RenameForm};
use crate::models::{CreateDepartmentInput, Department, DepartmentId, Page};

/// Remote call the view-model wants executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    List { page: u32 },
    Create(CreateDepartmentInput),
    Rename { id: DepartmentId, name: String },
    Delete { id: DepartmentId },
}

/// Result of an executed [`Request`].
#[derive(Debug)]
pub enum Outcome {
    Listed { page: u32, result: Result<Page> },
    Created(Result<Department>),
    Renamed(Result<Department>),
    Deleted { id: DepartmentId, result: Result<bool> },
}

/// Load state of the current page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Loaded,
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// User-facing notification raised by an outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: &'static str,
    pub message: &'static str,
}

impl Notice {
    fn success(message: &'static str) -> Self {
        Self {
            level: NoticeLevel::Success,
            title: "Success",
            message,
        }
    }

    fn error(message: &'static str) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: "Error",
            message,
        }
    }
}

/// One renderable line of the flattened tree.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    pub department: &'a Department,
    pub depth: usize,
    pub has_children: bool,
    pub expanded: bool,
}

/// Edit slot: the rename form plus whether its request is in flight.
#[derive(Debug, Clone)]
pub struct EditSlot {
    pub form: RenameForm,
    pub submitting: bool,
}

/// Delete slot: the department awaiting confirmation.
#[derive(Debug, Clone)]
pub struct DeleteSlot {
    pub target: Department,
    pub submitting: bool,
}

/// Create slot: the open draft.
#[derive(Debug, Clone, Default)]
pub struct CreateSlot {
    pub draft: CreateDraft,
    pub submitting: bool,
}

#[derive(Debug)]
pub struct DepartmentTree {
    load: LoadState,
    page: Page,
    current_page: u32,
    expanded: HashSet<DepartmentId>,
    edit: Option<EditSlot>,
    delete: Option<DeleteSlot>,
    create: Option<CreateSlot>,
    notices: Vec<Notice>,
}

impl Default for DepartmentTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DepartmentTree {
    pub fn new() -> Self {
        Self {
            load: LoadState::Loading,
            page: Page::default(),
            current_page: 1,
            expanded: HashSet::new(),
            edit: None,
            delete: None,
            create: None,
            notices: Vec::new(),
        }
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    pub fn is_loading(&self) -> bool {
        self.load == LoadState::Loading
    }

    pub fn departments(&self) -> &[Department] {
        &self.page.departments
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_pages(&self) -> u32 {
        self.page.total_pages
    }

    /// Pager is only shown when there is more than one page.
    pub fn show_pager(&self) -> bool {
        self.page.total_pages > 1
    }

    pub fn page_numbers(&self) -> RangeInclusive<u32> {
        1..=self.page.total_pages.max(1)
    }

    pub fn has_previous_page(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next_page(&self) -> bool {
        self.current_page < self.page.total_pages
    }

    // ---- Listing ----

    /// Re-fetch the current page.
    pub fn refresh(&mut self) -> Request {
        self.list_request(self.current_page)
    }

    /// Fetch another page. Pages outside `1..=total_pages` are ignored.
    pub fn go_to_page(&mut self, page: u32) -> Option<Request> {
        if !self.page_numbers().contains(&page) {
            return None;
        }
        self.current_page = page;
        Some(self.list_request(page))
    }

    fn list_request(&mut self, page: u32) -> Request {
        self.load = LoadState::Loading;
        Request::List { page }
    }

    // ---- Expansion ----

    /// Flip a node between collapsed and expanded.
    ///
    /// Leaves and ids not on the page are left alone; returns whether the
    /// state changed.
    pub fn toggle(&mut self, id: DepartmentId) -> bool {
        let Some(department) = self.page.find(id) else {
            return false;
        };
        if !department.has_children() {
            return false;
        }
        if !self.expanded.remove(&id) {
            self.expanded.insert(id);
        }
        true
    }

    pub fn is_expanded(&self, id: DepartmentId) -> bool {
        self.expanded.contains(&id)
    }

    /// Depth-first flattening of the page; children of collapsed nodes are
    /// skipped.
    pub fn visible_rows(&self) -> Vec<Row<'_>> {
        let mut rows = Vec::new();
        let mut stack: Vec<(&Department, usize)> = self.page.departments.iter().rev().map(|d| (d, 0)).collect();

        while let Some((department, depth)) = stack.pop() {
            let has_children = department.has_children();
            let expanded = has_children && self.is_expanded(department.id);
            rows.push(Row {
                department,
                depth,
                has_children,
                expanded,
            });
            if expanded {
                stack.extend(department.sub_departments.iter().rev().map(|d| (d, depth + 1)));
            }
        }

        rows
    }

    // ---- Edit ----

    /// Open the rename dialog for `id`, replacing any previous edit target.
    pub fn begin_edit(&mut self, id: DepartmentId) -> bool {
        let Some(department) = self.page.find(id) else {
            return false;
        };
        self.edit = Some(EditSlot {
            form: RenameForm::new(department.clone()),
            submitting: false,
        });
        true
    }

    pub fn edit(&self) -> Option<&EditSlot> {
        self.edit.as_ref()
    }

    pub fn edit_form_mut(&mut self) -> Option<&mut RenameForm> {
        self.edit.as_mut().map(|slot| &mut slot.form)
    }

    /// Validate and submit the rename.
    ///
    /// `Ok(None)` when there is no open edit or one is already in flight.
    pub fn submit_edit(&mut self) -> Result<Option<Request>> {
        let Some(slot) = self.edit.as_mut() else {
            return Ok(None);
        };
        if slot.submitting {
            return Ok(None);
        }
        let name = slot.form.validate().map_err(AppError::Validation)?;
        slot.submitting = true;
        Ok(Some(Request::Rename {
            id: slot.form.target_id(),
            name,
        }))
    }

    pub fn cancel_edit(&mut self) {
        self.edit = None;
    }

    // ---- Delete ----

    /// Mark `id` for deletion and open the confirmation.
    pub fn begin_delete(&mut self, id: DepartmentId) -> bool {
        let Some(department) = self.page.find(id) else {
            return false;
        };
        self.delete = Some(DeleteSlot {
            target: department.clone(),
            submitting: false,
        });
        true
    }

    pub fn delete_target(&self) -> Option<&DeleteSlot> {
        self.delete.as_ref()
    }

    pub fn confirm_delete(&mut self) -> Option<Request> {
        let slot = self.delete.as_mut()?;
        if slot.submitting {
            return None;
        }
        slot.submitting = true;
        Some(Request::Delete { id: slot.target.id })
    }

    /// Decline the pending delete. Has no effect once confirmed.
    pub fn cancel_delete(&mut self) {
        if self.delete.as_ref().is_some_and(|slot| !slot.submitting) {
            self.delete = None;
        }
    }

    // ---- Create ----

    /// Open the create dialog; an already open draft is kept.
    pub fn open_create(&mut self) {
        if self.create.is_none() {
            self.create = Some(CreateSlot::default());
        }
    }

    pub fn create(&self) -> Option<&CreateSlot> {
        self.create.as_ref()
    }

    pub fn create_draft_mut(&mut self) -> Option<&mut CreateDraft> {
        self.create.as_mut().map(|slot| &mut slot.draft)
    }

    /// Validate the whole draft and submit it.
    pub fn submit_create(&mut self) -> Result<Option<Request>> {
        let Some(slot) = self.create.as_mut() else {
            return Ok(None);
        };
        if slot.submitting {
            return Ok(None);
        }
        let input = slot.draft.validate().map_err(AppError::Validation)?;
        slot.submitting = true;
        Ok(Some(Request::Create(input)))
    }

    /// Close the create dialog, discarding the draft.
    pub fn close_create(&mut self) {
        self.create = None;
    }

    // ---- Outcomes ----

    /// Apply a finished request. Returns the follow-up list request when a
    /// mutation succeeded.
    pub fn apply(&mut self, outcome: Outcome) -> Option<Request> {
        match outcome {
            Outcome::Listed { page, result } => {
                self.apply_listed(page, result);
                None
            }
            Outcome::Created(result) => self.apply_created(result),
            Outcome::Renamed(result) => self.apply_renamed(result),
            Outcome::Deleted { id, result } => self.apply_deleted(id, result),
        }
    }

    fn apply_listed(&mut self, page: u32, result: Result<Page>) {
        // Whichever response resolves last replaces the page wholesale.
        match result {
            Ok(fetched) => {
                tracing::debug!(
                    "Loaded page {} of {} ({} top-level departments)",
                    page,
                    fetched.total_pages,
                    fetched.departments.len()
                );
                self.page = fetched;
                self.current_page = page;
                self.load = LoadState::Loaded;
            }
            Err(e) => {
                self.load = LoadState::Failed(e.to_string());
                self.notices
                    .push(Notice::error("Failed to fetch departments. Please try again."));
            }
        }
    }

    fn apply_created(&mut self, result: Result<Department>) -> Option<Request> {
        match result {
            Ok(department) => {
                tracing::info!("Created department {} '{}'", department.id, department.name);
                self.create = None;
                self.notices.push(Notice::success("Department created successfully."));
                Some(self.refresh())
            }
            Err(_) => {
                if let Some(slot) = self.create.as_mut() {
                    slot.submitting = false;
                }
                self.notices
                    .push(Notice::error("Failed to create department. Please try again."));
                None
            }
        }
    }

    fn apply_renamed(&mut self, result: Result<Department>) -> Option<Request> {
        match result {
            Ok(department) => {
                tracing::info!("Renamed department {} to '{}'", department.id, department.name);
                self.edit = None;
                self.notices.push(Notice::success("Department updated successfully."));
                Some(self.refresh())
            }
            Err(_) => {
                if let Some(slot) = self.edit.as_mut() {
                    slot.submitting = false;
                }
                self.notices
                    .push(Notice::error("Failed to update department. Please try again."));
                None
            }
        }
    }

    fn apply_deleted(&mut self, id: DepartmentId, result: Result<bool>) -> Option<Request> {
        // The slot closes once the attempt completes, whatever the result.
        self.delete = None;
        match result {
            Ok(true) => {
                tracing::info!("Deleted department {}", id);
                self.notices.push(Notice::success("Department deleted successfully."));
                Some(self.refresh())
            }
            Ok(false) | Err(_) => {
                self.notices
                    .push(Notice::error("Failed to delete department. Please try again."));
                None
            }
        }
    }

    /// Drain notifications raised since the last call.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}
