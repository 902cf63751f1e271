//! Response envelope shared by the CRUD endpoints

use serde::Serialize;

/// Every list endpoint echoes this fixed page; nothing is paged server-side.
pub const PAGE: usize = 1;
pub const PAGE_LIMIT: usize = 50;
pub const TOTAL_PAGES: usize = 1;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<usize>,
}

impl<T: Serialize> Envelope<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            total: None,
            page: None,
            limit: None,
            total_pages: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl<T: Serialize> Envelope<Vec<T>> {
    pub fn list(items: Vec<T>) -> Self {
        let total = items.len();
        Self {
            total: Some(total),
            page: Some(PAGE),
            limit: Some(PAGE_LIMIT),
            total_pages: Some(TOTAL_PAGES),
            ..Self::data(items)
        }
    }
}

impl Envelope<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
            total: None,
            page: None,
            limit: None,
            total_pages: None,
        }
    }
}
