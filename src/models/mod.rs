//! Data models for departments and department pages.

pub mod department;

pub use department::{CreateDepartmentInput, Department, DepartmentId, Page, SubDepartmentInput};
