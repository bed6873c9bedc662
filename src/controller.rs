use crate::api::PhotoApi;
use crate::config::{AppConfig, MutationSync};
use crate::error::AppError;
use crate::filter::{self, PhotoFilter};
use crate::pagination::{PageToken, PaginationLink, PaginationMeta};
use crate::photo::Photo;
use std::collections::HashSet;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Errored(String),
}

/// A successful write reported back by a dialog.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    Created(Photo),
    Updated(Photo),
    Deleted(u64),
}

/// Everything the table needs to render, captured under a single lock.
#[derive(Debug, Clone, Default)]
pub struct ListSnapshot {
    pub state: LoadState,
    pub photos: Vec<Photo>,
    pub pagination: PaginationMeta,
    pub links: Vec<PaginationLink>,
    pub search_term: String,
    pub filter: PhotoFilter,
}

impl ListSnapshot {
    pub fn visible_photos(&self) -> Vec<&Photo> {
        self.filter.apply(&self.photos)
    }

    pub fn category_options(&self) -> Vec<String> {
        filter::category_options(&self.photos)
    }

    pub fn brand_options(&self) -> Vec<String> {
        filter::brand_options(&self.photos)
    }

    pub fn window(&self) -> Vec<PageToken> {
        self.pagination.window()
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }
}

#[derive(Default)]
struct ListState {
    list: ListSnapshot,
    latest_request: u64,
    pending_mutations: HashSet<u64>,
}

/// Every fetch is tagged with a sequence number when it starts. A response is
/// applied only if no newer fetch has started since.
pub struct PhotoListController {
    api: Arc<dyn PhotoApi>,
    state: Mutex<ListState>,
    request_timeout: Duration,
    mutation_sync: MutationSync,
}

impl PhotoListController {
    pub fn new(api: Arc<dyn PhotoApi>, config: &AppConfig) -> Self {
        Self::with_options(api, config.request_timeout(), config.mutation_sync)
    }

    pub fn with_options(
        api: Arc<dyn PhotoApi>,
        request_timeout: Duration,
        mutation_sync: MutationSync,
    ) -> Self {
        Self {
            api,
            state: Mutex::new(ListState::default()),
            request_timeout,
            mutation_sync,
        }
    }

    pub fn api(&self) -> &Arc<dyn PhotoApi> {
        &self.api
    }

    pub fn snapshot(&self) -> ListSnapshot {
        self.lock().list.clone()
    }

    fn lock(&self) -> MutexGuard<'_, ListState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs a backend call under the configured timeout.
    pub async fn run_request<T, F>(&self, request: F) -> Result<T, AppError>
    where
        F: Future<Output = Result<T, AppError>>,
    {
        match tokio::time::timeout(self.request_timeout, request).await {
            Ok(result) => result,
            Err(_) => {
                log::warn!("Request timed out after {:?}", self.request_timeout);
                Err(AppError::Timeout(self.request_timeout.as_secs()))
            }
        }
    }

    /// Initial load: page 1 with whatever search term is active.
    pub async fn mount(&self) -> Result<bool, AppError> {
        log::info!("Loading photo list");
        self.refresh().await
    }

    pub async fn refresh(&self) -> Result<bool, AppError> {
        let query = self.lock().list.search_term.clone();
        self.fetch(1, &query).await
    }

    /// Fetches `page` for `query` and applies it if no newer fetch has started.
    ///
    /// Returns `Ok(false)` when the response arrived stale and was dropped. On
    /// failure the previously loaded page stays in place.
    pub async fn fetch(&self, page: u32, query: &str) -> Result<bool, AppError> {
        let sequence = {
            let mut state = self.lock();
            state.latest_request += 1;
            state.list.state = LoadState::Loading;
            state.latest_request
        };
        log::debug!("Fetch #{} started: page={} query={:?}", sequence, page, query);

        let result = self
            .run_request(self.api.fetch_photos(page, query))
            .await;

        let mut state = self.lock();
        if sequence != state.latest_request {
            log::debug!(
                "Discarding stale response #{} (latest is #{})",
                sequence,
                state.latest_request
            );
            return Ok(false);
        }

        match result {
            Ok(photo_page) => {
                state.list.pagination = photo_page.meta();
                state.list.links = photo_page.links;
                state.list.photos = photo_page.data;
                state.list.state = LoadState::Loaded;
                log::info!(
                    "Showing {} photos (page {} of {}, {} total)",
                    state.list.photos.len(),
                    state.list.pagination.current_page,
                    state.list.pagination.last_page,
                    state.list.pagination.total
                );
                Ok(true)
            }
            Err(e) => {
                log::error!("Failed to load photos: {}", e);
                state.list.state = LoadState::Errored(e.user_message());
                Err(e)
            }
        }
    }

    /// Server-side search. Clears the category/brand filters and goes back to page 1.
    pub async fn search(&self, query: &str) -> Result<bool, AppError> {
        let query = query.trim().to_string();
        {
            let mut state = self.lock();
            state.list.search_term = query.clone();
            state.list.filter.reset();
        }
        log::info!("Searching photos for {:?}", query);
        self.fetch(1, &query).await
    }

    /// Clicking a page number. The active page is a no-op and returns `Ok(false)`.
    pub async fn go_to_page(&self, page: u32) -> Result<bool, AppError> {
        let target = self.lock().list.pagination.select(page);
        self.fetch_target(target).await
    }

    pub async fn previous_page(&self) -> Result<bool, AppError> {
        let target = self.lock().list.pagination.previous();
        self.fetch_target(target).await
    }

    pub async fn next_page(&self) -> Result<bool, AppError> {
        let target = self.lock().list.pagination.next();
        self.fetch_target(target).await
    }

    pub async fn last_page(&self) -> Result<bool, AppError> {
        let target = self.lock().list.pagination.last();
        self.fetch_target(target).await
    }

    async fn fetch_target(&self, target: Option<u32>) -> Result<bool, AppError> {
        match target {
            Some(page) => {
                let query = self.lock().list.search_term.clone();
                self.fetch(page, &query).await
            }
            None => Ok(false),
        }
    }

    pub fn set_category(&self, category: Option<String>) {
        self.lock().list.filter.category = category;
    }

    pub fn set_camera_brand(&self, camera_brand: Option<String>) {
        self.lock().list.filter.camera_brand = camera_brand;
    }

    pub fn reset_filters(&self) {
        self.lock().list.filter.reset();
    }

    /// Marks `id` as having a write in flight until the returned guard drops.
    pub fn begin_mutation(&self, id: u64) -> Result<MutationGuard<'_>, AppError> {
        if !self.lock().pending_mutations.insert(id) {
            log::warn!("Photo {} already has a pending change", id);
            return Err(AppError::Busy(id));
        }
        Ok(MutationGuard {
            controller: self,
            id,
        })
    }

    pub fn has_pending_mutation(&self, id: u64) -> bool {
        self.lock().pending_mutations.contains(&id)
    }

    /// Brings the list in line with a successful write.
    ///
    /// With [`MutationSync::Refetch`] page 1 is reloaded and the server response
    /// wins; the local patch is applied only if that reload fails.
    pub async fn apply_mutation(&self, mutation: Mutation) {
        match self.mutation_sync {
            MutationSync::LocalPatch => self.patch(mutation),
            MutationSync::Refetch => {
                if let Err(e) = self.refresh().await {
                    log::warn!("Refresh after change failed, patching locally: {}", e);
                    self.patch(mutation);
                }
            }
        }
    }

    fn patch(&self, mutation: Mutation) {
        let mut state = self.lock();
        let list = &mut state.list;
        match mutation {
            Mutation::Created(photo) => {
                log::debug!("Appending photo {:?}", photo.id);
                list.photos.push(photo);
                list.pagination.total += 1;
            }
            Mutation::Updated(photo) => {
                log::debug!("Replacing photo {:?}", photo.id);
                if let Some(slot) = list.photos.iter_mut().find(|p| p.id.is_some() && p.id == photo.id) {
                    *slot = photo;
                }
            }
            Mutation::Deleted(id) => {
                log::debug!("Removing photo {}", id);
                let before = list.photos.len();
                list.photos.retain(|p| p.id != Some(id));
                if list.photos.len() < before {
                    list.pagination.total = list.pagination.total.saturating_sub(1);
                }
            }
        }
    }
}

pub struct MutationGuard<'a> {
    controller: &'a PhotoListController,
    id: u64,
}

impl Drop for MutationGuard<'_> {
    fn drop(&mut self) {
        self.controller.lock().pending_mutations.remove(&self.id);
    }
}
