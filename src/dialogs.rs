use crate::config::AppConfig;
use crate::controller::{Mutation, PhotoListController};
use crate::error::AppError;
use crate::photo::Photo;
use crate::storage::resolve_photo_url;
use crate::validation::{validate_photo_form, FormMode, PhotoForm, ValidationErrors};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogStatus {
    pub loading: bool,
    pub error: Option<String>,
}

impl DialogStatus {
    fn start(&mut self) {
        self.loading = true;
        self.error = None;
    }

    fn finish<T>(&mut self, result: &Result<T, AppError>) {
        self.loading = false;
        if let Err(e) = result {
            self.error = Some(e.user_message());
        }
    }
}

pub struct CreatePhotoDialog {
    pub form: PhotoForm,
    field_errors: ValidationErrors,
    status: DialogStatus,
    max_upload_bytes: u64,
}

impl CreatePhotoDialog {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            form: PhotoForm::default(),
            field_errors: ValidationErrors::default(),
            status: DialogStatus::default(),
            max_upload_bytes: config.max_upload_bytes,
        }
    }

    pub fn status(&self) -> &DialogStatus {
        &self.status
    }

    pub fn field_errors(&self) -> &ValidationErrors {
        &self.field_errors
    }

    pub async fn submit(&mut self, controller: &PhotoListController) -> Result<Photo, AppError> {
        let validated = match validate_photo_form(&self.form, FormMode::Create, self.max_upload_bytes) {
            Ok(validated) => validated,
            Err(errors) => {
                self.field_errors = errors.clone();
                return Err(errors.into());
            }
        };
        self.field_errors = ValidationErrors::default();

        self.status.start();
        let result = controller
            .run_request(controller.api().create_photo(validated))
            .await;
        self.status.finish(&result);

        let photo = result.map_err(|e| {
            log::error!("Error creating photo: {}", e);
            e
        })?;
        log::info!("Created photo {:?} '{}'", photo.id, photo.title);
        controller.apply_mutation(Mutation::Created(photo.clone())).await;
        self.form = PhotoForm::default();
        Ok(photo)
    }
}

pub struct EditPhotoDialog {
    photo: Photo,
    pub form: PhotoForm,
    field_errors: ValidationErrors,
    status: DialogStatus,
    max_upload_bytes: u64,
}

impl EditPhotoDialog {
    /// Opens the dialog with every field copied from `photo`.
    pub fn new(photo: Photo, config: &AppConfig) -> Self {
        Self {
            form: PhotoForm::from_photo(&photo),
            photo,
            field_errors: ValidationErrors::default(),
            status: DialogStatus::default(),
            max_upload_bytes: config.max_upload_bytes,
        }
    }

    pub fn photo(&self) -> &Photo {
        &self.photo
    }

    pub fn status(&self) -> &DialogStatus {
        &self.status
    }

    pub fn field_errors(&self) -> &ValidationErrors {
        &self.field_errors
    }

    pub async fn submit(&mut self, controller: &PhotoListController) -> Result<Photo, AppError> {
        let Some(id) = self.photo.id else {
            self.status.error = Some(AppError::MissingId.to_string());
            return Err(AppError::MissingId);
        };

        let validated = match validate_photo_form(&self.form, FormMode::Edit, self.max_upload_bytes) {
            Ok(validated) => validated,
            Err(errors) => {
                self.field_errors = errors.clone();
                return Err(errors.into());
            }
        };
        self.field_errors = ValidationErrors::default();

        let _pending = controller.begin_mutation(id).map_err(|e| {
            self.status.error = Some(e.user_message());
            e
        })?;

        self.status.start();
        let result = controller
            .run_request(controller.api().update_photo(id, validated))
            .await;
        self.status.finish(&result);

        let updated = result.map_err(|e| {
            log::error!("Error updating photo {}: {}", id, e);
            e
        })?;
        log::info!("Updated photo {} '{}'", id, updated.title);
        self.photo = updated.clone();
        controller.apply_mutation(Mutation::Updated(updated.clone())).await;
        Ok(updated)
    }
}

pub struct DeletePhotoDialog {
    photo: Photo,
    status: DialogStatus,
}

impl DeletePhotoDialog {
    pub fn new(photo: Photo) -> Self {
        Self {
            photo,
            status: DialogStatus::default(),
        }
    }

    pub fn status(&self) -> &DialogStatus {
        &self.status
    }

    pub fn prompt(&self) -> String {
        format!(
            "Are you sure you want to delete \"{}\"? This action cannot be undone.",
            self.photo.title
        )
    }

    pub async fn confirm(&mut self, controller: &PhotoListController) -> Result<(), AppError> {
        let Some(id) = self.photo.id else {
            self.status.error = Some(AppError::MissingId.to_string());
            return Err(AppError::MissingId);
        };

        let _pending = controller.begin_mutation(id).map_err(|e| {
            self.status.error = Some(e.user_message());
            e
        })?;

        self.status.start();
        let result = controller.run_request(controller.api().delete_photo(id)).await;
        self.status.finish(&result);

        result.map_err(|e| {
            log::error!("Delete error for photo {}: {}", id, e);
            e
        })?;
        log::info!("Deleted photo {}", id);
        controller.apply_mutation(Mutation::Deleted(id)).await;
        Ok(())
    }
}

/// Read-only rendering of every field of a photo.
pub struct ViewPhotoDialog {
    photo: Photo,
    image_url: String,
}

impl ViewPhotoDialog {
    pub fn new(photo: Photo, config: &AppConfig) -> Self {
        let image_url = resolve_photo_url(
            &photo.photo_path,
            &config.storage_base_url,
            &config.placeholder_image_url,
        );
        Self { photo, image_url }
    }

    pub fn photo(&self) -> &Photo {
        &self.photo
    }

    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    pub fn fields(&self) -> Vec<(&'static str, String)> {
        let photo = &self.photo;
        vec![
            ("Title", photo.title.clone()),
            ("Description", photo.description.clone()),
            ("Category", photo.photo_category.clone()),
            ("Camera Brand", photo.camera_brand.clone()),
            ("Gears & Accessories", photo.gear_used.clone()),
            ("Location", photo.location.clone()),
            (
                "Photo Date Taken",
                photo
                    .taken_on()
                    .map(|date| date.format("%Y-%m-%d").to_string())
                    .unwrap_or_default(),
            ),
        ]
    }
}
