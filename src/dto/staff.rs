use serde::Serialize;

use crate::domain::school::BranchProfile;
use crate::domain::staff::Staff;
use crate::dto::ListQuery;
use crate::pagination::Paginated;

#[derive(Serialize)]
pub struct StaffPageData {
    pub staff: Paginated<Staff>,
    pub branches: Vec<BranchProfile>,
    pub roles: Vec<&'static str>,
    pub query: ListQuery,
}
