//! Session identity of the logged-in admin.
//!
//! The identity cookie stores the JSON-serialized [`AuthenticatedAdmin`].
//! Handlers take the admin as an extractor argument; a missing or unreadable
//! identity sends browsers to the login page and answers API calls with 401.

use std::future::{Ready, ready};

use actix_identity::{Identity, IdentityExt};
use actix_web::dev::Payload;
use actix_web::http::{StatusCode, header};
use actix_web::{FromRequest, HttpMessage, HttpRequest, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use crate::domain::admin::AuthenticatedAdmin;

pub const LOGIN_PATH: &str = "/login";
const API_PREFIX: &str = "/api/";

#[derive(Debug, Error)]
#[error("authentication required")]
pub struct AuthError {
    api: bool,
}

impl AuthError {
    fn for_request(req: &HttpRequest) -> Self {
        Self {
            api: req.path().starts_with(API_PREFIX),
        }
    }
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        if self.api {
            StatusCode::UNAUTHORIZED
        } else {
            StatusCode::SEE_OTHER
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.api {
            HttpResponse::Unauthorized().json(json!({ "error": "unauthorized" }))
        } else {
            HttpResponse::SeeOther()
                .insert_header((header::LOCATION, LOGIN_PATH))
                .finish()
        }
    }
}

fn current_admin(req: &HttpRequest) -> Option<AuthenticatedAdmin> {
    let identity = req.get_identity().ok()?;
    let raw = identity.id().ok()?;
    match serde_json::from_str(&raw) {
        Ok(admin) => Some(admin),
        Err(e) => {
            log::warn!("Discarding unreadable identity cookie: {e}");
            identity.logout();
            None
        }
    }
}

impl FromRequest for AuthenticatedAdmin {
    type Error = AuthError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(current_admin(req).ok_or_else(|| AuthError::for_request(req)))
    }
}

/// Attach `admin` to the session.
pub fn remember(req: &HttpRequest, admin: &AuthenticatedAdmin) -> Result<(), AuthError> {
    let serialized = serde_json::to_string(admin).map_err(|e| {
        log::error!("Failed to serialize identity: {e}");
        AuthError::for_request(req)
    })?;
    Identity::login(&req.extensions(), serialized).map_err(|e| {
        log::error!("Failed to attach identity: {e}");
        AuthError::for_request(req)
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn api_requests_get_unauthorized_json() {
        let req = TestRequest::with_uri("/api/v1/students/1/milestones").to_http_request();

        let response = AuthError::for_request(&req).error_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn page_requests_redirect_to_login() {
        let req = TestRequest::with_uri("/students/1").to_http_request();

        let response = AuthError::for_request(&req).error_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), LOGIN_PATH);
    }
}
