use actix_web::{HttpResponse, Responder, get, web};
use serde::Deserialize;

use crate::domain::admin::AuthenticatedAdmin;
use crate::repository::DieselRepository;
use crate::services::ServiceError;
use crate::services::reports::download_report as download_report_service;

fn default_format() -> String {
    "xlsx".to_string()
}

#[derive(Deserialize)]
struct ReportQueryParams {
    #[serde(default = "default_format")]
    format: String,
}

#[get("/students/{student_id}/report")]
pub async fn download_report(
    student_id: web::Path<i32>,
    params: web::Query<ReportQueryParams>,
    _admin: AuthenticatedAdmin,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match download_report_service(student_id.into_inner(), &params.format, repo.get_ref()) {
        Ok(file) => HttpResponse::Ok()
            .append_header(("Content-Type", file.content_type))
            .append_header((
                "Content-Disposition",
                format!("attachment; filename=\"{}\"", file.file_name),
            ))
            .body(file.bytes),
        Err(ServiceError::NotFound) => HttpResponse::NotFound().body("No milestones found"),
        Err(ServiceError::Form(message) | ServiceError::TypeConstraint(message)) => {
            HttpResponse::BadRequest().body(message)
        }
        Err(err) => {
            log::error!("Failed to download growth report: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
