use crate::api::{PhotoApi, PhotoPage};
use crate::error::AppError;
use crate::photo::Photo;
use crate::validation::ValidatedPhoto;
use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

const CATEGORIES: [&str; 3] = ["Nature", "Travel", "Street"];
const BRANDS: [&str; 2] = ["Canon", "Sony"];

pub fn sample_photo(id: u64, title: &str) -> Photo {
    Photo {
        id: Some(id),
        title: title.to_string(),
        description: format!("Description of {}", title),
        camera_brand: BRANDS[id as usize % BRANDS.len()].to_string(),
        photo_category: CATEGORIES[id as usize % CATEGORIES.len()].to_string(),
        gear_used: "Tripod".to_string(),
        location: "Lisbon".to_string(),
        photo_taken: "2024-01-15".to_string(),
        photo_path: format!("photos/{}.jpg", id),
        ..Photo::default()
    }
}

fn photo_from(id: u64, photo: &ValidatedPhoto, photo_path: String) -> Photo {
    Photo {
        id: Some(id),
        title: photo.title.clone(),
        description: photo.description.clone(),
        camera_brand: photo.camera_brand.clone(),
        photo_category: photo.photo_category.clone(),
        gear_used: photo.gear_used.clone(),
        location: photo.location.clone(),
        photo_taken: photo
            .photo_taken
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        photo_path,
        ..Photo::default()
    }
}

fn server_error(status: StatusCode, message: &str) -> AppError {
    AppError::Server {
        status,
        message: message.to_string(),
    }
}

#[derive(Default)]
pub struct FakePhotoApi {
    catalog: Mutex<Vec<Photo>>,
    per_page: u32,
    gates: Mutex<HashMap<u32, Arc<Notify>>>,
    write_gate: Mutex<Option<Arc<Notify>>>,
    fail_next_fetch: Mutex<Option<String>>,
    fail_next_write: Mutex<Option<String>>,
    fetches: Mutex<Vec<(u32, String)>>,
    creates: Mutex<Vec<ValidatedPhoto>>,
    updates: Mutex<Vec<(u64, ValidatedPhoto)>>,
    deletes: Mutex<Vec<u64>>,
}

impl FakePhotoApi {
    /// `count` photos titled "Photo 1".."Photo N", served `per_page` at a time.
    pub fn with_catalog(count: u64, per_page: u32) -> Self {
        Self {
            catalog: Mutex::new((1..=count).map(|id| sample_photo(id, &format!("Photo {}", id))).collect()),
            per_page,
            ..Self::default()
        }
    }

    /// Holds fetches of `page` until `gate` is notified.
    pub fn gate_page(&self, page: u32, gate: Arc<Notify>) {
        self.gates.lock().unwrap().insert(page, gate);
    }

    /// Holds every create/update/delete until `gate` is notified.
    pub fn gate_writes(&self, gate: Arc<Notify>) {
        *self.write_gate.lock().unwrap() = Some(gate);
    }

    pub fn fail_next_fetch(&self, message: &str) {
        *self.fail_next_fetch.lock().unwrap() = Some(message.to_string());
    }

    pub fn fail_next_write(&self, message: &str) {
        *self.fail_next_write.lock().unwrap() = Some(message.to_string());
    }

    pub fn fetch_calls(&self) -> Vec<(u32, String)> {
        self.fetches.lock().unwrap().clone()
    }

    pub fn create_calls(&self) -> Vec<ValidatedPhoto> {
        self.creates.lock().unwrap().clone()
    }

    pub fn update_calls(&self) -> Vec<(u64, ValidatedPhoto)> {
        self.updates.lock().unwrap().clone()
    }

    pub fn delete_calls(&self) -> Vec<u64> {
        self.deletes.lock().unwrap().clone()
    }

    async fn before_write(&self) -> Result<(), AppError> {
        let gate = self.write_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        match self.fail_next_write.lock().unwrap().take() {
            Some(message) => Err(server_error(StatusCode::UNPROCESSABLE_ENTITY, &message)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PhotoApi for FakePhotoApi {
    async fn fetch_photos(&self, page: u32, query: &str) -> Result<PhotoPage, AppError> {
        self.fetches.lock().unwrap().push((page, query.to_string()));
        let gate = self.gates.lock().unwrap().get(&page).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if let Some(message) = self.fail_next_fetch.lock().unwrap().take() {
            return Err(server_error(StatusCode::INTERNAL_SERVER_ERROR, &message));
        }

        let needle = query.to_lowercase();
        let matching: Vec<Photo> = self
            .catalog
            .lock()
            .unwrap()
            .iter()
            .filter(|p| needle.is_empty() || p.title.to_lowercase().contains(&needle))
            .cloned()
            .collect();

        let per_page = self.per_page.max(1);
        let total = matching.len() as u64;
        let last_page = (((total as u32) + per_page - 1) / per_page).max(1);
        let data = matching
            .into_iter()
            .skip(((page.max(1) - 1) * per_page) as usize)
            .take(per_page as usize)
            .collect();

        Ok(PhotoPage {
            data,
            current_page: page,
            last_page,
            per_page,
            total,
            links: Vec::new(),
        })
    }

    async fn fetch_photo(&self, id: u64) -> Result<Photo, AppError> {
        self.catalog
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == Some(id))
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("photo {}", id)))
    }

    async fn create_photo(&self, photo: ValidatedPhoto) -> Result<Photo, AppError> {
        self.creates.lock().unwrap().push(photo.clone());
        self.before_write().await?;

        let mut catalog = self.catalog.lock().unwrap();
        let id = catalog.iter().filter_map(|p| p.id).max().unwrap_or(0) + 1;
        let path = photo
            .image
            .as_ref()
            .map(|image| format!("photos/{}", image.file_name))
            .unwrap_or_default();
        let created = photo_from(id, &photo, path);
        catalog.push(created.clone());
        Ok(created)
    }

    async fn update_photo(&self, id: u64, photo: ValidatedPhoto) -> Result<Photo, AppError> {
        self.updates.lock().unwrap().push((id, photo.clone()));
        self.before_write().await?;

        let mut catalog = self.catalog.lock().unwrap();
        let slot = catalog
            .iter_mut()
            .find(|p| p.id == Some(id))
            .ok_or_else(|| server_error(StatusCode::NOT_FOUND, "Photo not found"))?;
        let path = match &photo.image {
            Some(image) => format!("photos/{}", image.file_name),
            None => slot.photo_path.clone(),
        };
        *slot = photo_from(id, &photo, path);
        Ok(slot.clone())
    }

    async fn delete_photo(&self, id: u64) -> Result<(), AppError> {
        self.deletes.lock().unwrap().push(id);
        self.before_write().await?;

        let mut catalog = self.catalog.lock().unwrap();
        let before = catalog.len();
        catalog.retain(|p| p.id != Some(id));
        if catalog.len() == before {
            return Err(server_error(StatusCode::NOT_FOUND, "Photo not found"));
        }
        Ok(())
    }
}
