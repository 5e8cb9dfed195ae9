use async_trait::async_trait;

use crate::client::ApiRequest;
use crate::domain::staff::{NewStaff, Staff};
use crate::domain::student::{NewStudent, Student, StudentPhoto};
use crate::domain::types::{StaffId, StudentId};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    BackendRepository, StaffListQuery, StaffReader, StaffWriter, StudentListQuery, StudentReader,
    StudentWriter,
};

impl StudentListQuery {
    fn to_request(&self) -> ApiRequest {
        ApiRequest::get("/users/students")
            .query_opt("search", self.search.as_deref())
            .query_opt("status", self.status.map(|s| s.as_str()))
            .query_opt("classroom_id", self.classroom_id)
            .query_opt("branch_id", self.branch_id)
            .query_opt("grade", self.grade.as_deref())
    }
}

impl StaffListQuery {
    fn to_request(&self) -> ApiRequest {
        ApiRequest::get("/users/staff")
            .query_opt("search", self.search.as_deref())
            .query_opt("branch_id", self.branch_id)
            .query_opt("role", self.role.as_deref())
    }
}

#[async_trait]
impl StudentReader for BackendRepository<'_> {
    async fn list_students(&self, query: StudentListQuery) -> RepositoryResult<Vec<Student>> {
        self.send_list(query.to_request()).await
    }

    async fn get_student(&self, id: StudentId) -> RepositoryResult<Student> {
        self.send(ApiRequest::get(format!("/users/students/{id}")))
            .await
    }
}

#[async_trait]
impl StudentWriter for BackendRepository<'_> {
    async fn create_student(&self, student: &NewStudent) -> RepositoryResult<Student> {
        self.send(ApiRequest::post("/users/students").json(student)?)
            .await
    }

    async fn update_student(
        &self,
        id: StudentId,
        student: &NewStudent,
    ) -> RepositoryResult<Student> {
        self.send(ApiRequest::put(format!("/users/students/{id}")).json(student)?)
            .await
    }

    async fn upload_student_photo(
        &self,
        id: StudentId,
        photo: &StudentPhoto,
    ) -> RepositoryResult<Student> {
        self.send(ApiRequest::post(format!("/users/students/{id}/photo")).json(photo)?)
            .await
    }
}

#[async_trait]
impl StaffReader for BackendRepository<'_> {
    async fn list_staff(&self, query: StaffListQuery) -> RepositoryResult<Vec<Staff>> {
        self.send_list(query.to_request()).await
    }

    async fn get_staff(&self, id: StaffId) -> RepositoryResult<Staff> {
        self.send(ApiRequest::get(format!("/users/staff/{id}")))
            .await
    }
}

#[async_trait]
impl StaffWriter for BackendRepository<'_> {
    async fn create_staff(&self, staff: &NewStaff) -> RepositoryResult<Staff> {
        self.send(ApiRequest::post("/users/staff").json(staff)?)
            .await
    }

    async fn update_staff(&self, id: StaffId, staff: &NewStaff) -> RepositoryResult<Staff> {
        self.send(ApiRequest::put(format!("/users/staff/{id}")).json(staff)?)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::student::StudentStatus;
    use crate::domain::types::ClassroomId;

    #[test]
    fn student_query_only_sends_present_filters() {
        let request = StudentListQuery::new()
            .status(StudentStatus::Active)
            .classroom(ClassroomId::new(7).unwrap())
            .to_request();

        assert_eq!(request.path, "/users/students");
        assert_eq!(
            request.query,
            vec![
                ("status".to_string(), "ACTIVE".to_string()),
                ("classroom_id".to_string(), "7".to_string()),
            ]
        );
    }
}
