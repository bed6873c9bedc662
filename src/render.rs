use crate::config::AppConfig;
use crate::controller::{ListSnapshot, LoadState};
use crate::dialogs::ViewPhotoDialog;
use crate::pagination::{PageToken, PaginationMeta};
use crate::photo::Photo;
use crate::storage::resolve_photo_url;
use std::fmt::Write;

const EMPTY_TABLE: &str = "No Data Found";

/// `MMM d, yyyy`, or the raw value when it does not parse.
pub fn display_date(photo: &Photo) -> String {
    photo
        .taken_on()
        .map(|date| date.format("%b %-d, %Y").to_string())
        .unwrap_or_else(|| photo.photo_taken.clone())
}

pub fn pagination_bar(meta: &PaginationMeta) -> String {
    let mut parts = Vec::new();
    parts.push(if meta.has_previous() { "< Prev" } else { "(< Prev)" }.to_string());
    for token in meta.window() {
        parts.push(match token {
            PageToken::Page { number, active: true } => format!("[{}]", number),
            PageToken::Page { number, .. } => number.to_string(),
            PageToken::Ellipsis => "...".to_string(),
        });
    }
    parts.push(if meta.has_next() { "Next >" } else { "(Next >)" }.to_string());
    parts.push(if meta.last().is_some() { "Last" } else { "(Last)" }.to_string());
    parts.join(" ")
}

pub fn photo_table(snapshot: &ListSnapshot, config: &AppConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<6} {:<24} {:<12} {:<14} {:<20} {:<14} Image",
        "ID", "Title", "Category", "Camera Brand", "Gears & Accessories", "Photo Taken"
    );

    let visible = snapshot.visible_photos();
    if visible.is_empty() {
        let _ = writeln!(out, "{}", EMPTY_TABLE);
    }
    for photo in visible {
        let _ = writeln!(
            out,
            "{:<6} {:<24} {:<12} {:<14} {:<20} {:<14} {}",
            photo.id.map(|id| id.to_string()).unwrap_or_default(),
            truncate(&photo.title, 24),
            truncate(&photo.photo_category, 12),
            truncate(&photo.camera_brand, 14),
            truncate(&photo.gear_used, 20),
            display_date(photo),
            resolve_photo_url(
                &photo.photo_path,
                &config.storage_base_url,
                &config.placeholder_image_url
            ),
        );
    }
    out
}

/// The whole page: status line, filter options, table and pagination bar.
pub fn photo_page(snapshot: &ListSnapshot, config: &AppConfig) -> String {
    let mut out = String::new();
    if let LoadState::Errored(message) = &snapshot.state {
        let _ = writeln!(out, "Error: {}", message);
    }
    if !snapshot.search_term.is_empty() {
        let _ = writeln!(out, "Search: {}", snapshot.search_term);
    }
    let _ = writeln!(out, "Categories: {}", snapshot.category_options().join(", "));
    let _ = writeln!(out, "Camera brands: {}", snapshot.brand_options().join(", "));
    out.push('\n');
    out.push_str(&photo_table(snapshot, config));
    out.push('\n');
    let _ = writeln!(
        out,
        "{}    ({} photos)",
        pagination_bar(&snapshot.pagination),
        snapshot.pagination.total
    );
    out
}

pub fn view_dialog(dialog: &ViewPhotoDialog) -> String {
    let mut out = String::from("View Photo Details\n");
    let _ = writeln!(out, "{:<20} {}", "Image", dialog.image_url());
    for (label, value) in dialog.fields() {
        let _ = writeln!(out, "{:<20} {}", label, value);
    }
    out
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let kept: String = value.chars().take(width.saturating_sub(1)).collect();
    format!("{}…", kept)
}
