use serde::{Deserialize, Serialize};

/// Largest page count shown in full before the window starts eliding pages.
pub const MAX_VISIBLE: u32 = 5;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct PaginationMeta {
    pub current_page: u32,
    pub last_page: u32,
    pub per_page: u32,
    pub total: u64,
}

impl Default for PaginationMeta {
    fn default() -> Self {
        Self {
            current_page: 1,
            last_page: 1,
            per_page: 5,
            total: 0,
        }
    }
}

/// Page descriptor supplied by the server alongside each list response.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PaginationLink {
    pub url: Option<String>,
    pub label: String,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageToken {
    Page { number: u32, active: bool },
    Ellipsis,
}

impl PageToken {
    pub fn page_number(&self) -> Option<u32> {
        match self {
            PageToken::Page { number, .. } => Some(*number),
            PageToken::Ellipsis => None,
        }
    }
}

/// Computes the page tokens for `current_page` out of `last_page`.
///
/// Page 1 and the last page are always present once the range exceeds
/// [`MAX_VISIBLE`]; the neighbours of the current page sit between them with
/// an ellipsis marking each gap.
pub fn pagination_window(current_page: u32, last_page: u32) -> Vec<PageToken> {
    let last_page = last_page.max(1);
    let current_page = current_page.clamp(1, last_page);
    let page = |number: u32| PageToken::Page {
        number,
        active: number == current_page,
    };

    if last_page <= MAX_VISIBLE {
        return (1..=last_page).map(page).collect();
    }

    let mut tokens = vec![page(1)];
    let start = current_page.saturating_sub(1).max(2);
    let end = current_page.saturating_add(1).min(last_page - 1);

    if start > 2 {
        tokens.push(PageToken::Ellipsis);
    }
    tokens.extend((start..=end).map(page));
    if end < last_page - 1 {
        tokens.push(PageToken::Ellipsis);
    }
    tokens.push(page(last_page));
    tokens
}

impl PaginationMeta {
    pub fn window(&self) -> Vec<PageToken> {
        pagination_window(self.current_page, self.last_page)
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.last_page
    }

    /// Page to request for the "previous" control, `None` when it is disabled.
    pub fn previous(&self) -> Option<u32> {
        self.has_previous().then(|| self.current_page - 1)
    }

    pub fn next(&self) -> Option<u32> {
        self.has_next().then(|| self.current_page + 1)
    }

    pub fn last(&self) -> Option<u32> {
        (self.current_page != self.last_page).then_some(self.last_page)
    }

    pub fn contains(&self, page: u32) -> bool {
        (1..=self.last_page.max(1)).contains(&page)
    }

    /// Clicking a page number; the active page and out-of-range pages are no-ops.
    pub fn select(&self, page: u32) -> Option<u32> {
        (page != self.current_page && self.contains(page)).then_some(page)
    }
}
