use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::admin::AuthenticatedAdmin;
use crate::forms::students::{AddStudentForm, AddStudentFormPayload};
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::students::{
    add_student as add_student_service, delete_student as delete_student_service,
    show_dashboard as show_dashboard_service, show_student as show_student_service,
};

#[get("/")]
pub async fn index(
    admin: AuthenticatedAdmin,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_dashboard_service(repo.get_ref()) {
        Ok(dashboard) => {
            let mut context = base_context(&flash_messages, Some(&admin), "index");
            context.insert("students", &dashboard.students);
            context.insert("totals", &dashboard.totals);
            render_template(&tera, "students/index.html", &context)
        }
        Err(err) => {
            log::error!("Failed to render dashboard: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/students/add")]
pub async fn show_add_student(
    admin: AuthenticatedAdmin,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let context = base_context(&flash_messages, Some(&admin), "add_student");
    render_template(&tera, "students/add.html", &context)
}

#[post("/students")]
pub async fn add_student(
    admin: AuthenticatedAdmin,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AddStudentForm>,
) -> impl Responder {
    let payload: AddStudentFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect("/students/add");
        }
    };

    match add_student_service(payload, &admin, repo.get_ref()) {
        Ok(created) => {
            FlashMessage::success(format!(
                "{} added with {} milestones.",
                created.student.full_name, created.milestone_count
            ))
            .send();
            redirect(&format!("/students/{}", created.student.id))
        }
        Err(err) => {
            log::error!("Failed to add student: {err}");
            FlashMessage::error("Failed to add student.").send();
            redirect("/students/add")
        }
    }
}

#[get("/students/{student_id}")]
pub async fn show_student(
    student_id: web::Path<i32>,
    admin: AuthenticatedAdmin,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_student_service(student_id.into_inner(), repo.get_ref()) {
        Ok(page) => {
            let mut context = base_context(&flash_messages, Some(&admin), "student");
            context.insert("student", &page.student);
            context.insert("groups", &page.groups);
            context.insert("progress", &page.progress);
            context.insert("percent_mastered", &page.percent_mastered);
            context.insert("activity", &page.activity);
            render_template(&tera, "students/show.html", &context)
        }
        Err(ServiceError::NotFound | ServiceError::TypeConstraint(_)) => {
            FlashMessage::error("Student not found.").send();
            redirect("/")
        }
        Err(err) => {
            log::error!("Failed to render student page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/students/{student_id}/delete")]
pub async fn delete_student(
    student_id: web::Path<i32>,
    admin: AuthenticatedAdmin,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match delete_student_service(student_id.into_inner(), &admin, repo.get_ref()) {
        Ok(()) => FlashMessage::success("Student deleted.").send(),
        Err(ServiceError::NotFound | ServiceError::TypeConstraint(_)) => {
            FlashMessage::error("Student not found.").send()
        }
        Err(err) => {
            log::error!("Failed to delete student: {err}");
            FlashMessage::error("Failed to delete student.").send()
        }
    }

    redirect("/")
}
