use async_trait::async_trait;

use crate::client::ApiRequest;
use crate::domain::school::{BranchProfile, Classroom, NewBranch, NewClassroom};
use crate::domain::types::BranchId;
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    BackendRepository, BranchReader, BranchWriter, ClassroomListQuery, ClassroomReader,
    ClassroomWriter,
};

#[async_trait]
impl BranchReader for BackendRepository<'_> {
    async fn list_branches(&self) -> RepositoryResult<Vec<BranchProfile>> {
        self.send_list(ApiRequest::get("/schools/branches")).await
    }

    async fn get_branch(&self, id: BranchId) -> RepositoryResult<BranchProfile> {
        self.send(ApiRequest::get(format!("/schools/branches/{id}")))
            .await
    }
}

#[async_trait]
impl BranchWriter for BackendRepository<'_> {
    async fn create_branch(&self, branch: &NewBranch) -> RepositoryResult<BranchProfile> {
        self.send(ApiRequest::post("/schools/branches").json(branch)?)
            .await
    }

    async fn update_branch(
        &self,
        id: BranchId,
        branch: &NewBranch,
    ) -> RepositoryResult<BranchProfile> {
        self.send(ApiRequest::put(format!("/schools/branches/{id}")).json(branch)?)
            .await
    }
}

#[async_trait]
impl ClassroomReader for BackendRepository<'_> {
    async fn list_classrooms(&self, query: ClassroomListQuery) -> RepositoryResult<Vec<Classroom>> {
        let request = ApiRequest::get("/schools/classrooms")
            .query_opt("branch_id", query.branch_id)
            .query_opt("grade", query.grade.as_deref());
        self.send_list(request).await
    }
}

#[async_trait]
impl ClassroomWriter for BackendRepository<'_> {
    async fn create_classroom(&self, classroom: &NewClassroom) -> RepositoryResult<Classroom> {
        self.send(ApiRequest::post("/schools/classrooms").json(classroom)?)
            .await
    }
}
