use actix_identity::Identity;
use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::admin::AuthenticatedAdmin;
use crate::forms::auth::{LoginForm, LoginFormPayload};
use crate::identity::{LOGIN_PATH, remember};
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::auth::login as login_service;

#[get("/login")]
pub async fn show_login(
    admin: Option<AuthenticatedAdmin>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    if admin.is_some() {
        return redirect("/");
    }

    let context = base_context(&flash_messages, None, "login");
    render_template(&tera, "auth/login.html", &context)
}

#[post("/login")]
pub async fn login(
    request: HttpRequest,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<LoginForm>,
) -> impl Responder {
    let payload: LoginFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect(LOGIN_PATH);
        }
    };

    match login_service(payload, repo.get_ref()) {
        Ok(admin) => {
            if remember(&request, &admin).is_err() {
                return HttpResponse::InternalServerError().finish();
            }
            FlashMessage::success("Welcome back!").send();
            redirect("/")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Invalid email or password.").send();
            redirect(LOGIN_PATH)
        }
        Err(err) => {
            log::error!("Failed to log in: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/logout")]
pub async fn logout(identity: Option<Identity>) -> impl Responder {
    if let Some(identity) = identity {
        identity.logout();
    }
    redirect(LOGIN_PATH)
}
