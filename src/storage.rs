/// Turns a stored `photo_path` into a URL a viewer can load.
///
/// Absolute URLs (seeded sample images) pass through; anything else lives
/// under the storage base. An empty path falls back to the placeholder.
pub fn resolve_photo_url(photo_path: &str, storage_base_url: &str, placeholder: &str) -> String {
    let photo_path = photo_path.trim();
    if photo_path.is_empty() {
        return placeholder.to_string();
    }
    if photo_path.starts_with("http://") || photo_path.starts_with("https://") {
        return photo_path.to_string();
    }

    format!(
        "{}/{}",
        storage_base_url.trim_end_matches('/'),
        photo_path.trim_start_matches('/')
    )
}
