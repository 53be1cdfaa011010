use crate::error::ClientResult;
use crate::http::{ApiClient, ApiRequest};
use crate::models::{Course, CourseRequest};

#[derive(Clone)]
pub struct CourseService {
    api: ApiClient,
}

impl CourseService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    fn admin_url(&self) -> String {
        let p = self.api.paths();
        self.api.url(&[&p.admin, &p.corso])
    }

    pub async fn by_department(&self, department_id: i64) -> ClientResult<Vec<Course>> {
        let p = self.api.paths();
        let id = department_id.to_string();
        let url = self.api.url(&[&p.public, &p.dipartimento, &id, &p.corsi]);
        self.api.send_list(ApiRequest::get(url)).await
    }

    pub async fn get(&self, course_id: i64) -> ClientResult<Course> {
        let p = self.api.paths();
        let id = course_id.to_string();
        let url = self.api.url(&[&p.public, &p.corso, &id]);
        self.api.send_json(ApiRequest::get(url)).await
    }

    /// Course a person is enrolled in.
    pub async fn by_person(&self, person_id: i64) -> ClientResult<Course> {
        let p = self.api.paths();
        let id = person_id.to_string();
        let url = self.api.url(&[&p.public, &p.persona, &id, &p.corso]);
        self.api.send_json(ApiRequest::get(url)).await
    }

    pub async fn create(&self, request: &CourseRequest) -> ClientResult<()> {
        let req = ApiRequest::post(self.admin_url()).json(request)?;
        self.api.send_unit(req).await
    }

    pub async fn update(&self, request: &CourseRequest) -> ClientResult<()> {
        let req = ApiRequest::put(self.admin_url()).json(request)?;
        self.api.send_unit(req).await
    }

    pub async fn delete(&self, request: &CourseRequest) -> ClientResult<()> {
        let req = ApiRequest::delete(self.admin_url()).json(request)?;
        self.api.send_unit(req).await
    }
}
