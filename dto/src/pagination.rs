use serde::{Deserialize, Serialize};

/// Spring Data page envelope
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,

    #[serde(default)]
    pub total_elements: i64,

    #[serde(default)]
    pub total_pages: i64,

    /// Zero-based page index
    #[serde(default)]
    pub number: i64,

    #[serde(default)]
    pub size: i64,
}

impl<T> Page<T> {
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            content: self.content.into_iter().map(f).collect(),
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            number: self.number,
            size: self.size,
        }
    }
}

/// Page request parameters forwarded to the backend.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PageParams {
    #[serde(default)]
    pub page: u32,

    #[serde(default = "default_size")]
    pub size: u32,

    pub sort: Option<String>,
}

fn default_size() -> u32 {
    5
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: 0,
            size: default_size(),
            sort: None,
        }
    }
}
