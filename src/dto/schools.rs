use serde::Serialize;

use crate::domain::school::{BranchProfile, Classroom};
use crate::domain::staff::Staff;

#[derive(Serialize)]
pub struct BranchesPageData {
    pub branches: Vec<BranchProfile>,
}

#[derive(Serialize)]
pub struct ClassroomsPageData {
    pub classrooms: Vec<Classroom>,
    pub branches: Vec<BranchProfile>,
    pub teachers: Vec<Staff>,
    /// Branch the list is narrowed to, if any.
    pub selected_branch: Option<i64>,
}
