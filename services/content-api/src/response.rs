//! Success response envelope

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// `200 {"status": "ok", "data": ...}`
pub struct Data<T: Serialize>(pub T);

#[derive(Serialize)]
struct OkEnvelope<T: Serialize> {
    status: &'static str,
    data: T,
}

impl<T: Serialize> IntoResponse for Data<T> {
    fn into_response(self) -> Response {
        Json(OkEnvelope {
            status: "ok",
            data: self.0,
        })
        .into_response()
    }
}

/// `201` with a `Location` header pointing at the new resource
pub struct Created {
    pub location: String,
}

impl Created {
    pub fn at(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
        }
    }
}

#[derive(Serialize)]
struct CreatedData {
    location: String,
}

impl IntoResponse for Created {
    fn into_response(self) -> Response {
        let body = OkEnvelope {
            status: "ok",
            data: CreatedData {
                location: self.location.clone(),
            },
        };
        (
            StatusCode::CREATED,
            [(header::LOCATION, self.location)],
            Json(body),
        )
            .into_response()
    }
}
