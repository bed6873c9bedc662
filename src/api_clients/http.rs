use crate::api::{PhotoApi, PhotoPage};
use crate::config::AppConfig;
use crate::error::AppError;
use crate::photo::Photo;
use crate::validation::ValidatedPhoto;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

const PHOTOS_PATH: &str = "photos";

/// URL builders for the photo resource under a configured API base.
#[derive(Debug, Clone)]
pub struct PhotoEndpoints {
    base: Url,
}

impl PhotoEndpoints {
    pub fn new(api_base_url: &str) -> Result<Self, AppError> {
        let mut base = Url::parse(api_base_url)?;
        // Url::join drops the last segment unless the base ends with a slash.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self { base })
    }

    pub fn list(&self, page: u32, query: &str) -> Result<Url, AppError> {
        let mut url = self.base.join(PHOTOS_PATH)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("page", &page.to_string());
            if !query.is_empty() {
                pairs.append_pair("search", query);
            }
        }
        Ok(url)
    }

    pub fn create(&self) -> Result<Url, AppError> {
        Ok(self.base.join(PHOTOS_PATH)?)
    }

    pub fn get(&self, id: u64) -> Result<Url, AppError> {
        self.item(id)
    }

    pub fn update(&self, id: u64) -> Result<Url, AppError> {
        self.item(id)
    }

    pub fn delete(&self, id: u64) -> Result<Url, AppError> {
        self.item(id)
    }

    fn item(&self, id: u64) -> Result<Url, AppError> {
        Ok(self.base.join(&format!("{}/{}", PHOTOS_PATH, id))?)
    }
}

#[derive(Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

/// `PhotoApi` backed by the REST service.
pub struct HttpPhotoApi {
    client: Client,
    endpoints: PhotoEndpoints,
    timeout_secs: u64,
}

impl HttpPhotoApi {
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        log::debug!("Creating photo API client for URL: {}", config.api_base_url);
        let endpoints = PhotoEndpoints::new(&config.api_base_url)?;
        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!("photo-catalog/", env!("CARGO_PKG_VERSION")))
            .build()?;
        log::trace!("Photo API client created successfully.");
        Ok(Self {
            client,
            endpoints,
            timeout_secs: config.request_timeout().as_secs(),
        })
    }

    pub fn endpoints(&self) -> &PhotoEndpoints {
        &self.endpoints
    }

    fn transport_error(&self, error: reqwest::Error) -> AppError {
        if error.is_timeout() {
            AppError::Timeout(self.timeout_secs)
        } else {
            AppError::Http(error)
        }
    }

    /// Reads the body and turns a non-2xx status carrying `{ message }` into a server error.
    async fn read_body(
        &self,
        response: Response,
        fallback_message: &str,
    ) -> Result<String, AppError> {
        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;
        log::trace!("Photo API response {}: {}", status, body);

        if !status.is_success() {
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|value| value["message"].as_str().map(str::to_string))
                .filter(|message| !message.is_empty())
                .unwrap_or_else(|| fallback_message.to_string());
            log::warn!("Photo API returned {}: {}", status, message);
            return Err(AppError::Server { status, message });
        }
        Ok(body)
    }

    /// Decodes `{ data: T }` from a successful response.
    async fn read_data<T: DeserializeOwned>(
        &self,
        response: Response,
        fallback_message: &str,
    ) -> Result<T, AppError> {
        let body = self.read_body(response, fallback_message).await?;
        let envelope: DataEnvelope<T> = serde_json::from_str(&body)?;
        Ok(envelope.data)
    }
}

fn photo_form(photo: ValidatedPhoto) -> Result<Form, AppError> {
    let photo_taken = photo
        .photo_taken
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_default();

    let mut form = Form::new()
        .text("title", photo.title)
        .text("description", photo.description)
        .text("photo_category", photo.photo_category)
        .text("camera_brand", photo.camera_brand)
        .text("gear_used", photo.gear_used)
        .text("location", photo.location)
        .text("photo_taken", photo_taken);

    if let Some(image) = photo.image {
        let part = Part::bytes(image.bytes)
            .file_name(image.file_name)
            .mime_str(image.content_type.as_ref())?;
        form = form.part("photo_path", part);
    }
    Ok(form)
}

#[async_trait]
impl PhotoApi for HttpPhotoApi {
    async fn fetch_photos(&self, page: u32, query: &str) -> Result<PhotoPage, AppError> {
        let url = self.endpoints.list(page, query)?;
        log::debug!("Fetching photos: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        let page: PhotoPage = self.read_data(response, "Failed to fetch photos").await?;
        log::debug!(
            "Fetched {} photos (page {} of {})",
            page.data.len(),
            page.current_page,
            page.last_page
        );
        Ok(page)
    }

    async fn fetch_photo(&self, id: u64) -> Result<Photo, AppError> {
        let url = self.endpoints.get(id)?;
        log::debug!("Fetching photo: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!("photo {}", id)));
        }
        self.read_data(response, "Failed to fetch photo").await
    }

    async fn create_photo(&self, photo: ValidatedPhoto) -> Result<Photo, AppError> {
        let url = self.endpoints.create()?;
        log::debug!("Creating photo '{}' at {}", photo.title, url);

        let response = self
            .client
            .post(url)
            .multipart(photo_form(photo)?)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        self.read_data(response, "Failed to create photo").await
    }

    async fn update_photo(&self, id: u64, photo: ValidatedPhoto) -> Result<Photo, AppError> {
        let url = self.endpoints.update(id)?;
        log::debug!("Updating photo {} at {}", id, url);

        // Multipart bodies only reach the backend's PUT route through a POST override.
        let form = photo_form(photo)?.text("_method", "PUT");
        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        self.read_data(response, "Failed to update photo").await
    }

    async fn delete_photo(&self, id: u64) -> Result<(), AppError> {
        let url = self.endpoints.delete(id)?;
        log::debug!("Deleting photo {} at {}", id, url);

        let response = self
            .client
            .delete(url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        // Any 2xx counts; the body may be `{ message }` with no `data`.
        self.read_body(response, "Failed to delete photo").await?;
        Ok(())
    }
}
