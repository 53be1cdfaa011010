use crate::api::encode_segment;
use crate::error::ClientResult;
use crate::http::{ApiClient, ApiRequest};
use crate::models::{GoverningBody, GoverningBodyRequest, Membership, MembershipRequest, Person};

/// Governing bodies and their membership.
#[derive(Clone)]
pub struct GoverningBodyService {
    api: ApiClient,
}

impl GoverningBodyService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> ClientResult<Vec<GoverningBody>> {
        let p = self.api.paths();
        let url = self.api.url(&[&p.admin, &p.direttivi]);
        self.api.send_list(ApiRequest::get(url)).await
    }

    pub async fn create(&self, request: &GoverningBodyRequest) -> ClientResult<()> {
        let p = self.api.paths();
        let req = ApiRequest::post(self.api.url(&[&p.admin, &p.direttivo])).json(request)?;
        self.api.send_unit(req).await
    }

    pub async fn update(&self, request: &GoverningBodyRequest) -> ClientResult<()> {
        let p = self.api.paths();
        let req = ApiRequest::put(self.api.url(&[&p.admin, &p.direttivo])).json(request)?;
        self.api.send_unit(req).await
    }

    pub async fn delete(&self, governing_body_id: i64) -> ClientResult<()> {
        let p = self.api.paths();
        let id = governing_body_id.to_string();
        let req = ApiRequest::delete(self.api.url(&[&p.admin, &p.direttivo, &id]));
        self.api.send_unit(req).await
    }

    pub async fn members(&self, governing_body_id: i64) -> ClientResult<Vec<Membership>> {
        let p = self.api.paths();
        let id = governing_body_id.to_string();
        let url = self.api.url(&[&p.public, &p.direttivo, &id, &p.persone]);
        self.api.send_list(ApiRequest::get(url)).await
    }

    /// People with `role` who are not yet members of the body.
    pub async fn available_persons(&self, role: &str, governing_body_id: i64) -> ClientResult<Vec<Person>> {
        let p = self.api.paths();
        let id = governing_body_id.to_string();
        let role = encode_segment(role);
        let url = self.api.url(&[
            &p.admin,
            &p.direttivo,
            "ruolo",
            &role,
            "non-presenti-direttivo",
            &id,
        ]);
        self.api.send_list(ApiRequest::get(url)).await
    }

    pub async fn add_member(&self, request: &MembershipRequest) -> ClientResult<()> {
        let p = self.api.paths();
        let url = self.api.url(&[&p.admin, &p.direttivo, &p.persona]);
        self.api.send_unit(ApiRequest::post(url).json(request)?).await
    }

    pub async fn change_member_role(&self, request: &MembershipRequest) -> ClientResult<()> {
        let p = self.api.paths();
        let url = self.api.url(&[&p.admin, &p.direttivo, &p.persona]);
        self.api.send_unit(ApiRequest::put(url).json(request)?).await
    }

    pub async fn remove_member(&self, person_id: i64, governing_body_id: i64) -> ClientResult<()> {
        let p = self.api.paths();
        let person = person_id.to_string();
        let body = governing_body_id.to_string();
        let url = self.api.url(&[&p.admin, &p.direttivo, &p.persona, &person, &body]);
        self.api.send_unit(ApiRequest::delete(url)).await
    }
}
