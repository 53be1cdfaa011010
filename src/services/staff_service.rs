use crate::error::ClientResult;
use crate::http::{ApiClient, ApiRequest, FilePart};
use crate::models::{PersonRequest, StaffCard};

/// Image ready to upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoUpload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

#[derive(Clone)]
pub struct StaffService {
    api: ApiClient,
}

impl StaffService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> ClientResult<Vec<StaffCard>> {
        let p = self.api.paths();
        let url = self.api.url(&[&p.staff, &p.all]);
        self.api.send_list(ApiRequest::get(url)).await
    }

    pub async fn update_person(&self, request: &PersonRequest) -> ClientResult<()> {
        let p = self.api.paths();
        let url = self.api.url(&[&p.staff, &p.persona]);
        self.api.send_unit(ApiRequest::put(url).json(request)?).await
    }

    pub async fn delete_person(&self, person_id: i64) -> ClientResult<()> {
        let p = self.api.paths();
        let id = person_id.to_string();
        let url = self.api.url(&[&p.staff, &p.persona, &id]);
        self.api.send_unit(ApiRequest::delete(url)).await
    }

    /// Multipart upload under the form field `file`.
    pub async fn upload_photo(&self, person_id: i64, photo: PhotoUpload) -> ClientResult<()> {
        let p = self.api.paths();
        let id = person_id.to_string();
        let url = self.api.url(&[&p.staff, &p.persona, &id, &p.photo]);
        let request = ApiRequest::post(url).file(FilePart {
            field: "file".to_string(),
            file_name: photo.file_name,
            mime: photo.mime,
            bytes: photo.bytes,
        });
        self.api.send_unit(request).await
    }

    pub async fn delete_photo(&self, person_id: i64) -> ClientResult<()> {
        let p = self.api.paths();
        let id = person_id.to_string();
        let url = self.api.url(&[&p.staff, &p.persona, &id, &p.photo]);
        self.api.send_unit(ApiRequest::delete(url)).await
    }
}
