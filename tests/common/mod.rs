//! A stand-in for the photo REST backend, served by actix-web on an ephemeral port.

#![allow(dead_code)]

use actix_web::{http::header, web, App, HttpRequest, HttpResponse, HttpServer};
use bytes::Bytes;
use futures_util::stream;
use photo_catalog::config::{AppConfig, MutationSync, DEFAULT_MAX_UPLOAD_BYTES};
use photo_catalog::photo::Photo;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

pub const STORAGE_BASE: &str = "http://127.0.0.1:8000/storage";

/// Search term that makes the list endpoint stall past the client timeout.
pub const STALL_QUERY: &str = "stall";

#[derive(Debug, Clone, Default)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub size: usize,
}

#[derive(Debug, Clone, Default)]
pub struct RecordedForm {
    pub text: HashMap<String, String>,
    pub file: Option<UploadedFile>,
}

#[derive(Default)]
pub struct BackendState {
    pub photos: Vec<Photo>,
    pub per_page: usize,
    pub forms: Vec<RecordedForm>,
    pub deleted: Vec<u64>,
}

pub type Backend = web::Data<Mutex<BackendState>>;

pub fn photo(id: u64, title: &str, category: &str, brand: &str) -> Photo {
    Photo {
        id: Some(id),
        title: title.to_string(),
        description: format!("{} description", title),
        camera_brand: brand.to_string(),
        photo_category: category.to_string(),
        gear_used: "Tripod".to_string(),
        location: "Porto".to_string(),
        photo_taken: "2024-02-10".to_string(),
        photo_path: format!("photos/{}.jpg", id),
        ..Photo::default()
    }
}

pub fn seed() -> Vec<Photo> {
    vec![
        photo(1, "Sunset", "Nature", "Canon"),
        photo(2, "Beach", "Travel", "Sony"),
    ]
}

pub fn config_for(api_base_url: &str) -> AppConfig {
    AppConfig {
        api_base_url: api_base_url.to_string(),
        storage_base_url: STORAGE_BASE.to_string(),
        placeholder_image_url: "https://placehold.co/600x400.png".to_string(),
        request_timeout_secs: 1,
        max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        mutation_sync: MutationSync::Refetch,
        log_level: "debug".to_string(),
    }
}

#[derive(Deserialize)]
struct ListQuery {
    page: Option<usize>,
    search: Option<String>,
}

async fn list_photos(backend: Backend, query: web::Query<ListQuery>) -> HttpResponse {
    let search = query.search.clone().unwrap_or_default();
    if search == STALL_QUERY {
        actix_web::rt::time::sleep(Duration::from_secs(3)).await;
    }

    let state = backend.lock().unwrap();
    let page = query.page.unwrap_or(1).max(1);
    let needle = search.to_lowercase();
    let matching: Vec<&Photo> = state
        .photos
        .iter()
        .filter(|p| needle.is_empty() || p.title.to_lowercase().contains(&needle))
        .collect();
    let per_page = state.per_page.max(1);
    let last_page = ((matching.len() + per_page - 1) / per_page).max(1);
    if page > last_page {
        return HttpResponse::InternalServerError().finish();
    }

    let data: Vec<&Photo> = matching
        .iter()
        .skip((page - 1) * per_page)
        .take(per_page)
        .copied()
        .collect();
    let links: Vec<serde_json::Value> = (1..=last_page)
        .map(|n| {
            json!({
                "url": format!("/api/photos?page={}", n),
                "label": n.to_string(),
                "page": n,
                "active": n == page,
            })
        })
        .collect();

    HttpResponse::Ok().json(json!({
        "status": "success",
        "data": {
            "current_page": page,
            "data": data,
            "last_page": last_page,
            "per_page": per_page,
            "total": matching.len(),
            "links": links,
        }
    }))
}

async fn get_photo(backend: Backend, path: web::Path<u64>) -> HttpResponse {
    let id = path.into_inner();
    let state = backend.lock().unwrap();
    match state.photos.iter().find(|p| p.id == Some(id)) {
        Some(photo) => HttpResponse::Ok().json(json!({ "data": photo })),
        None => HttpResponse::NotFound().json(json!({ "message": "Photo not found" })),
    }
}

async fn read_form(req: &HttpRequest, body: Bytes) -> RecordedForm {
    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    let boundary = multer::parse_boundary(content_type).expect("multipart boundary");
    let body_stream = stream::once(async move { Ok::<Bytes, std::io::Error>(body) });
    let mut multipart = multer::Multipart::new(body_stream, boundary);

    let mut form = RecordedForm::default();
    while let Some(field) = multipart.next_field().await.expect("multipart field") {
        let name = field.name().unwrap_or_default().to_string();
        match field.file_name().map(ToString::to_string) {
            Some(file_name) => {
                let content_type = field
                    .content_type()
                    .map(|value| value.to_string())
                    .unwrap_or_default();
                let size = field.bytes().await.expect("file bytes").len();
                form.file = Some(UploadedFile {
                    file_name,
                    content_type,
                    size,
                });
            }
            None => {
                let value = field.text().await.expect("text field");
                form.text.insert(name, value);
            }
        }
    }
    form
}

fn apply_form(photo: &mut Photo, form: &RecordedForm) {
    let text = |key: &str| form.text.get(key).cloned().unwrap_or_default();
    photo.title = text("title");
    photo.description = text("description");
    photo.camera_brand = text("camera_brand");
    photo.photo_category = text("photo_category");
    photo.gear_used = text("gear_used");
    photo.location = text("location");
    photo.photo_taken = text("photo_taken");
    if let Some(file) = &form.file {
        photo.photo_path = format!("photos/{}", file.file_name);
    }
}

async fn create_photo(backend: Backend, req: HttpRequest, body: web::Bytes) -> HttpResponse {
    let form = read_form(&req, body).await;
    let mut state = backend.lock().unwrap();
    state.forms.push(form.clone());

    if form.text.get("title").map(String::as_str) == Some("Rejected photo") {
        return HttpResponse::UnprocessableEntity()
            .json(json!({ "message": "The photo path field must be an image." }));
    }

    let id = state.photos.iter().filter_map(|p| p.id).max().unwrap_or(0) + 1;
    let mut created = Photo {
        id: Some(id),
        ..Photo::default()
    };
    apply_form(&mut created, &form);
    state.photos.push(created.clone());
    HttpResponse::Created().json(json!({ "data": created }))
}

async fn update_photo(
    backend: Backend,
    req: HttpRequest,
    path: web::Path<u64>,
    body: web::Bytes,
) -> HttpResponse {
    let id = path.into_inner();
    let form = read_form(&req, body).await;
    let mut state = backend.lock().unwrap();
    state.forms.push(form.clone());

    if form.text.get("_method").map(String::as_str) != Some("PUT") {
        return HttpResponse::MethodNotAllowed().json(json!({ "message": "Method not allowed" }));
    }
    match state.photos.iter_mut().find(|p| p.id == Some(id)) {
        Some(photo) => {
            apply_form(photo, &form);
            HttpResponse::Ok().json(json!({ "data": photo }))
        }
        None => HttpResponse::NotFound().json(json!({ "message": "Photo not found" })),
    }
}

async fn delete_photo(backend: Backend, path: web::Path<u64>) -> HttpResponse {
    let id = path.into_inner();
    let mut state = backend.lock().unwrap();
    let before = state.photos.len();
    state.photos.retain(|p| p.id != Some(id));
    if state.photos.len() == before {
        // No message body: the client has to fall back to its own wording.
        return HttpResponse::NotFound().finish();
    }
    state.deleted.push(id);
    HttpResponse::Ok().json(json!({ "message": "Photo deleted successfully" }))
}

/// Starts the backend and returns its API base URL with the shared state.
pub fn start_backend(photos: Vec<Photo>, per_page: usize) -> (String, Backend) {
    let backend: Backend = web::Data::new(Mutex::new(BackendState {
        photos,
        per_page,
        ..BackendState::default()
    }));
    let data = backend.clone();

    let server = HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .route("/api/photos", web::get().to(list_photos))
            .route("/api/photos", web::post().to(create_photo))
            .route("/api/photos/{id}", web::get().to(get_photo))
            .route("/api/photos/{id}", web::post().to(update_photo))
            .route("/api/photos/{id}", web::delete().to(delete_photo))
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .expect("bind mock backend");

    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());
    (format!("http://{}/api/", addr), backend)
}
