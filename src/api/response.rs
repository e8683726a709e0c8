//! JSON response envelope shared by all book endpoints

use serde::Serialize;
use utoipa::ToSchema;

use crate::models::book::{Book, BookSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Fail,
}

/// `{ status, message?, data? }`
#[derive(Debug, Serialize, ToSchema)]
#[aliases(
    BookCreatedResponse = ApiResponse<BookIdData>,
    BookListResponse = ApiResponse<BookListData>,
    BookResponse = ApiResponse<BookData>,
    MessageResponse = ApiResponse<NoData>
)]
pub struct ApiResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub status: ResponseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub fn success(data: T) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: None,
            data: Some(data),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl ApiResponse<NoData> {
    /// Success without a payload
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: Some(message.into()),
            data: None,
        }
    }
}

/// Placeholder for responses that carry no data
#[derive(Debug, Serialize, ToSchema)]
pub struct NoData {}

#[derive(Debug, Serialize, ToSchema)]
pub struct BookIdData {
    #[serde(rename = "bookId")]
    pub book_id: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BookListData {
    pub books: Vec<BookSummary>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BookData {
    pub book: Book,
}
