use crate::error::ClientResult;
use crate::http::{ApiClient, ApiRequest};
use crate::models::{PersonRequest, RepresentativeAssignmentRequest, RepresentativeBody};

/// People and representative assignments.
#[derive(Clone)]
pub struct AdminService {
    api: ApiClient,
}

impl AdminService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn create_person(&self, request: &PersonRequest) -> ClientResult<()> {
        let p = self.api.paths();
        let url = self.api.url(&[&p.admin, &p.persona]);
        self.api.send_unit(ApiRequest::post(url).json(request)?).await
    }

    pub async fn representative_bodies(&self) -> ClientResult<Vec<RepresentativeBody>> {
        let p = self.api.paths();
        let url = self.api.url(&[&p.admin, &p.organi]);
        self.api.send_list(ApiRequest::get(url)).await
    }

    /// Returns the body of the response, which may carry the new assignment id.
    pub async fn assign_representative(
        &self,
        request: &RepresentativeAssignmentRequest,
    ) -> ClientResult<Option<i64>> {
        let p = self.api.paths();
        let url = self.api.url(&[&p.admin, &p.rappresentante]);
        let body = self.api.execute(ApiRequest::post(url).json(request)?).await?;
        Ok(assignment_id(&body))
    }

    pub async fn update_representative(&self, request: &RepresentativeAssignmentRequest) -> ClientResult<()> {
        let p = self.api.paths();
        let url = self.api.url(&[&p.admin, &p.rappresentante]);
        self.api.send_unit(ApiRequest::put(url).json(request)?).await
    }

    pub async fn remove_representative(&self, assignment_id: i64) -> ClientResult<()> {
        let p = self.api.paths();
        let id = assignment_id.to_string();
        let url = self.api.url(&[&p.admin, &p.rappresentante, &id]);
        self.api.send_unit(ApiRequest::delete(url)).await
    }
}

fn assignment_id(body: &str) -> Option<i64> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value.as_i64().or_else(|| value.get("id").and_then(|v| v.as_i64()))
}
