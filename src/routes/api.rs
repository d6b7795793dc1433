use actix_web::error::InternalError;
use actix_web::{HttpResponse, Responder, delete, get, patch, web};
use serde_json::json;

use crate::domain::admin::AuthenticatedAdmin;
use crate::forms::milestones::{UpdateMilestonesForm, UpdateMilestonesFormPayload};
use crate::repository::DieselRepository;
use crate::services::ServiceError;
use crate::services::milestones::{
    list_student_milestones as list_student_milestones_service,
    update_milestones as update_milestones_service,
};
use crate::services::students::delete_student as delete_student_service;

/// JSON extractor settings for the API scope.
///
/// Malformed bodies answer with the same `{ "error": ... }` shape as every
/// other API failure.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        InternalError::from_response(
            err,
            HttpResponse::BadRequest().json(json!({ "error": message })),
        )
        .into()
    })
}

fn error_response(err: ServiceError, action: &str) -> HttpResponse {
    match err {
        ServiceError::NotFound => HttpResponse::NotFound().json(json!({ "error": "not found" })),
        ServiceError::Unauthorized => {
            HttpResponse::Unauthorized().json(json!({ "error": "unauthorized" }))
        }
        ServiceError::Form(message) | ServiceError::TypeConstraint(message) => {
            HttpResponse::BadRequest().json(json!({ "error": message }))
        }
        ServiceError::Internal => {
            log::error!("Failed to {action}");
            HttpResponse::InternalServerError().json(json!({ "error": "internal error" }))
        }
    }
}

#[get("/v1/students/{student_id}/milestones")]
pub async fn api_v1_student_milestones(
    student_id: web::Path<i32>,
    _admin: AuthenticatedAdmin,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match list_student_milestones_service(student_id.into_inner(), repo.get_ref()) {
        Ok(records) => HttpResponse::Ok().json(json!({ "data": records })),
        Err(err) => error_response(err, "list student milestones"),
    }
}

#[patch("/v1/students/{student_id}/milestones")]
pub async fn api_v1_update_student_milestones(
    student_id: web::Path<i32>,
    admin: AuthenticatedAdmin,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<UpdateMilestonesForm>,
) -> impl Responder {
    let payload: UpdateMilestonesFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            let err: ServiceError = e.into();
            return error_response(err, "update student milestones");
        }
    };

    match update_milestones_service(student_id.into_inner(), payload, &admin, repo.get_ref()) {
        Ok(updated) => HttpResponse::Ok().json(json!({ "success": true, "updated": updated })),
        Err(err) => error_response(err, "update student milestones"),
    }
}

#[delete("/v1/students/{student_id}")]
pub async fn api_v1_delete_student(
    student_id: web::Path<i32>,
    admin: AuthenticatedAdmin,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match delete_student_service(student_id.into_inner(), &admin, repo.get_ref()) {
        Ok(()) => HttpResponse::Ok().json(json!({ "success": true })),
        Err(err) => error_response(err, "delete student"),
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::http::header::ContentType;
    use actix_web::{App, test};
    use serde_json::Value;

    use super::*;

    async fn body_json(response: HttpResponse) -> Value {
        let bytes = actix_web::body::to_bytes(response.into_body())
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[actix_web::test]
    async fn service_errors_map_to_status_codes() {
        let cases = [
            (ServiceError::NotFound, StatusCode::NOT_FOUND, "not found"),
            (ServiceError::Unauthorized, StatusCode::UNAUTHORIZED, "unauthorized"),
            (
                ServiceError::Form("bad form".into()),
                StatusCode::BAD_REQUEST,
                "bad form",
            ),
            (
                ServiceError::TypeConstraint("bad value".into()),
                StatusCode::BAD_REQUEST,
                "bad value",
            ),
            (
                ServiceError::Internal,
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal error",
            ),
        ];

        for (err, status, message) in cases {
            let response = error_response(err, "test");
            assert_eq!(response.status(), status);
            assert_eq!(body_json(response).await["error"], message);
        }
    }

    #[actix_web::test]
    async fn malformed_body_is_rejected_with_json_error() {
        let app = test::init_service(App::new().service(
            web::scope("/api").app_data(json_config()).route(
                "/echo",
                web::patch().to(|web::Json(form): web::Json<UpdateMilestonesForm>| async move {
                    HttpResponse::Ok().json(json!({ "count": form.milestones.len() }))
                }),
            ),
        ))
        .await;

        let request = test::TestRequest::patch()
            .uri("/api/echo")
            .insert_header(ContentType::json())
            .set_payload("{\"milestones\": [")
            .to_request();
        let response = test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(response).await;
        assert!(body["error"].is_string());
    }
}
