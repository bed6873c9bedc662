use crate::photo::Photo;

/// Category and camera-brand selections applied to the loaded page.
///
/// An empty or absent value places no constraint on that field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhotoFilter {
    pub category: Option<String>,
    pub camera_brand: Option<String>,
}

impl PhotoFilter {
    pub fn new(category: Option<String>, camera_brand: Option<String>) -> Self {
        Self {
            category,
            camera_brand,
        }
    }

    pub fn is_active(&self) -> bool {
        constraint(&self.category).is_some() || constraint(&self.camera_brand).is_some()
    }

    pub fn reset(&mut self) {
        self.category = None;
        self.camera_brand = None;
    }

    pub fn matches(&self, photo: &Photo) -> bool {
        let category_ok = constraint(&self.category).map_or(true, |c| photo.photo_category == c);
        let brand_ok = constraint(&self.camera_brand).map_or(true, |b| photo.camera_brand == b);
        category_ok && brand_ok
    }

    /// Returns the matching subsequence without touching `photos`.
    pub fn apply<'a>(&self, photos: &'a [Photo]) -> Vec<&'a Photo> {
        photos.iter().filter(|photo| self.matches(photo)).collect()
    }
}

fn constraint(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Distinct categories on the page, in first-seen order.
pub fn category_options(photos: &[Photo]) -> Vec<String> {
    distinct(photos.iter().map(|p| p.photo_category.as_str()))
}

pub fn brand_options(photos: &[Photo]) -> Vec<String> {
    distinct(photos.iter().map(|p| p.camera_brand.as_str()))
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for value in values.filter(|v| !v.is_empty()) {
        if !seen.iter().any(|s| s == value) {
            seen.push(value.to_string());
        }
    }
    seen
}
