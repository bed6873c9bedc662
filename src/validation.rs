use crate::photo::{parse_photo_date, Photo};
use chrono::{Local, NaiveDate};
use mime::Mime;
use std::fmt;
use std::path::Path;

pub const TITLE_MIN_CHARS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit,
}

/// An image picked for upload, already read into memory.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: Mime,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Reads `path` and settles its content type, preferring the sniffed image
    /// format over the extension.
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload".to_string());
        let content_type = sniff_content_type(&bytes)
            .unwrap_or_else(|| mime_guess::from_path(path).first_or_octet_stream());
        log::debug!("Loaded upload {} ({} bytes, {})", file_name, bytes.len(), content_type);

        Ok(Self {
            file_name,
            content_type,
            bytes,
        })
    }

    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

fn sniff_content_type(bytes: &[u8]) -> Option<Mime> {
    let format = image::guess_format(bytes).ok()?;
    format
        .extensions_str()
        .iter()
        .find_map(|ext| mime_guess::from_ext(ext).first())
}

/// Raw form state as typed into a create or edit dialog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhotoForm {
    pub title: String,
    pub description: String,
    pub camera_brand: String,
    pub photo_category: String,
    pub gear_used: String,
    pub location: String,
    /// `YYYY-MM-DD`, or empty when no date was picked.
    pub photo_taken: String,
    pub image: Option<ImageUpload>,
}

impl PhotoForm {
    /// Pre-populates every field from an existing record.
    pub fn from_photo(photo: &Photo) -> Self {
        Self {
            title: photo.title.clone(),
            description: photo.description.clone(),
            camera_brand: photo.camera_brand.clone(),
            photo_category: photo.photo_category.clone(),
            gear_used: photo.gear_used.clone(),
            location: photo.location.clone(),
            photo_taken: photo
                .taken_on()
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            image: None,
        }
    }
}

/// Form values that passed validation, ready to be sent as multipart fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedPhoto {
    pub title: String,
    pub description: String,
    pub camera_brand: String,
    pub photo_category: String,
    pub gear_used: String,
    pub location: String,
    pub photo_taken: Option<NaiveDate>,
    pub image: Option<ImageUpload>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// First message recorded for `field`, as shown under that input.
    pub fn for_field(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

pub fn validate_photo_form(
    form: &PhotoForm,
    mode: FormMode,
    max_upload_bytes: u64,
) -> Result<ValidatedPhoto, ValidationErrors> {
    validate_photo_form_on(form, mode, max_upload_bytes, Local::now().date_naive())
}

/// Same as [`validate_photo_form`] with an explicit "today" for the future-date check.
pub fn validate_photo_form_on(
    form: &PhotoForm,
    mode: FormMode,
    max_upload_bytes: u64,
    today: NaiveDate,
) -> Result<ValidatedPhoto, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    if form.title.trim().is_empty() {
        errors.add("title", "Title is required");
    } else if form.title.chars().count() < TITLE_MIN_CHARS {
        errors.add(
            "title",
            format!("Title must be at least {} characters", TITLE_MIN_CHARS),
        );
    }

    let photo_taken = match form.photo_taken.trim() {
        "" => None,
        raw => match parse_photo_date(raw) {
            Some(date) if date > today => {
                errors.add("photo_taken", "Photo date cannot be in the future");
                None
            }
            Some(date) => Some(date),
            None => {
                errors.add("photo_taken", "Photo date must be a valid date");
                None
            }
        },
    };

    match (&form.image, mode) {
        (None, FormMode::Create) => errors.add("photo_path", "Photo is required"),
        (None, FormMode::Edit) => {}
        (Some(image), _) => {
            if image.is_empty() {
                errors.add("photo_path", "Photo file is empty");
            } else if image.content_type.type_() != mime::IMAGE {
                errors.add("photo_path", "Photo must be an image file");
            } else if image.len() > max_upload_bytes {
                errors.add(
                    "photo_path",
                    format!("Photo must be {} MB or smaller", max_upload_bytes / (1024 * 1024)),
                );
            }
        }
    }

    if !errors.is_empty() {
        log::debug!("Photo form rejected: {}", errors);
        return Err(errors);
    }

    Ok(ValidatedPhoto {
        title: form.title.clone(),
        description: form.description.clone(),
        camera_brand: form.camera_brand.clone(),
        photo_category: form.photo_category.clone(),
        gear_used: form.gear_used.clone(),
        location: form.location.clone(),
        photo_taken,
        image: form.image.clone(),
    })
}
