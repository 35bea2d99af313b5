//! Boundary use-case API for the command line.
//!
//! # Responsibility
//! - Validate inbound JSON documents before they reach the facade.
//! - Map every core error kind to one uniform failure envelope.
//!
//! # Invariants
//! - Functions here never panic; failures become `ApiResponse::failure`.

use bookshelf_core::{
    BookService, ErrorKind, ServiceError, SqliteBookRepository, UserBookRequest, UserDataFacade,
};
use log::error;
use rusqlite::Connection;
use serde::Serialize;
use serde_json::Value;

/// Response envelope written to stdout for every command.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<&'static str>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ApiResponse {
    pub fn success(message: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            ok: true,
            error_kind: None,
            message: message.into(),
            data,
        }
    }

    pub fn failure(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            error_kind: Some(kind.as_str()),
            message: message.into(),
            data: None,
        }
    }
}

impl From<ServiceError> for ApiResponse {
    fn from(value: ServiceError) -> Self {
        let kind = value.kind();
        error!(
            "event=api_error module=cli status=error error_kind={} error={}",
            kind.as_str(),
            value
        );
        Self::failure(kind, value.to_string())
    }
}

/// Parses and validates a `UserBookRequest` JSON document.
pub fn parse_request(payload: &str) -> Result<UserBookRequest, ApiResponse> {
    let request: UserBookRequest = serde_json::from_str(payload).map_err(|err| {
        ApiResponse::failure(ErrorKind::Invalid, format!("malformed request: {err}"))
    })?;
    request
        .validate()
        .map_err(|err| ApiResponse::failure(ErrorKind::Invalid, err.to_string()))?;
    Ok(request)
}

pub fn create(conn: &mut Connection, payload: &str) -> ApiResponse {
    let request = match parse_request(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    respond(
        "user with books created",
        UserDataFacade::new(conn).create_user_with_books(&request),
    )
}

pub fn update(conn: &mut Connection, user_id: i64, payload: &str) -> ApiResponse {
    let request = match parse_request(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    respond(
        "user with books updated",
        UserDataFacade::new(conn).update_user_with_books(user_id, &request),
    )
}

pub fn get(conn: &mut Connection, user_id: i64) -> ApiResponse {
    respond(
        "user with books loaded",
        UserDataFacade::new(conn).get_user_with_books(user_id),
    )
}

pub fn delete(conn: &mut Connection, user_id: i64) -> ApiResponse {
    match UserDataFacade::new(conn).delete_user_with_books(user_id) {
        Ok(()) => ApiResponse::success(format!("user {user_id} deleted"), None),
        Err(err) => err.into(),
    }
}

pub fn book(conn: &Connection, book_id: i64) -> ApiResponse {
    respond(
        "book loaded",
        BookService::new(SqliteBookRepository::new(conn)).get_book_by_id(book_id),
    )
}

fn respond<T: Serialize>(message: &str, result: Result<T, ServiceError>) -> ApiResponse {
    match result {
        Ok(value) => match serde_json::to_value(value) {
            Ok(data) => ApiResponse::success(message, Some(data)),
            Err(err) => ApiResponse::failure(ErrorKind::Store, format!("encode failed: {err}")),
        },
        Err(err) => err.into(),
    }
}
