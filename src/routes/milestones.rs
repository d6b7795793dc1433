use actix_web::{Responder, post, web};
use actix_web_flash_messages::FlashMessage;

use crate::domain::admin::AuthenticatedAdmin;
use crate::repository::DieselRepository;
use crate::routes::redirect;
use crate::services::ServiceError;
use crate::services::milestones::toggle_milestone as toggle_milestone_service;

#[post("/students/{student_id}/milestones/{student_milestone_id}/toggle")]
pub async fn toggle_milestone(
    path: web::Path<(i32, i32)>,
    admin: AuthenticatedAdmin,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let (student_id, student_milestone_id) = path.into_inner();

    match toggle_milestone_service(student_id, student_milestone_id, &admin, repo.get_ref()) {
        Ok(status) => FlashMessage::success(format!("Marked as {}.", status.label())).send(),
        Err(ServiceError::NotFound | ServiceError::TypeConstraint(_)) => {
            FlashMessage::error("Milestone not found.").send()
        }
        Err(err) => {
            log::error!("Failed to toggle milestone: {err}");
            FlashMessage::error("Failed to update milestone.").send()
        }
    }

    redirect(&format!("/students/{student_id}"))
}
