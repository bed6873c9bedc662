use crate::error::AppError;
use crate::pagination::{PaginationLink, PaginationMeta};
use crate::photo::Photo;
use crate::validation::ValidatedPhoto;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One page of the list endpoint's `data` envelope.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PhotoPage {
    pub data: Vec<Photo>,
    pub current_page: u32,
    pub last_page: u32,
    pub per_page: u32,
    pub total: u64,
    #[serde(default)]
    pub links: Vec<PaginationLink>,
}

impl PhotoPage {
    pub fn meta(&self) -> PaginationMeta {
        PaginationMeta {
            current_page: self.current_page,
            last_page: self.last_page,
            per_page: self.per_page,
            total: self.total,
        }
    }
}

/// The photo backend as seen by the list controller and the dialogs.
#[async_trait]
pub trait PhotoApi: Send + Sync {
    async fn fetch_photos(&self, page: u32, query: &str) -> Result<PhotoPage, AppError>;
    async fn fetch_photo(&self, id: u64) -> Result<Photo, AppError>;
    async fn create_photo(&self, photo: ValidatedPhoto) -> Result<Photo, AppError>;
    async fn update_photo(&self, id: u64, photo: ValidatedPhoto) -> Result<Photo, AppError>;
    async fn delete_photo(&self, id: u64) -> Result<(), AppError>;
}
