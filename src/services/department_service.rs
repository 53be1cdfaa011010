use crate::error::ClientResult;
use crate::http::{ApiClient, ApiRequest};
use crate::models::{Department, DepartmentRequest};

#[derive(Clone)]
pub struct DepartmentService {
    api: ApiClient,
}

impl DepartmentService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    fn admin_url(&self) -> String {
        let p = self.api.paths();
        self.api.url(&[&p.admin, &p.dipartimento])
    }

    pub async fn list(&self) -> ClientResult<Vec<Department>> {
        let p = self.api.paths();
        let url = self.api.url(&[&p.public, &p.dipartimenti, &p.all]);
        self.api.send_list(ApiRequest::get(url)).await
    }

    pub async fn create(&self, request: &DepartmentRequest) -> ClientResult<()> {
        let req = ApiRequest::post(self.admin_url()).json(request)?;
        self.api.send_unit(req).await
    }

    pub async fn update(&self, request: &DepartmentRequest) -> ClientResult<()> {
        let req = ApiRequest::put(self.admin_url()).json(request)?;
        self.api.send_unit(req).await
    }

    /// The backend identifies the department from the request body.
    pub async fn delete(&self, request: &DepartmentRequest) -> ClientResult<()> {
        let req = ApiRequest::delete(self.admin_url()).json(request)?;
        self.api.send_unit(req).await
    }
}
