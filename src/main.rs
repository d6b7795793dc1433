use std::io;

use actix_files::Files;
use actix_identity::IdentityMiddleware;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::{App, HttpServer, middleware, web};
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tera::Tera;
use validator::Validate;

use milestone_tracker::db::establish_connection_pool;
use milestone_tracker::models::config::ServerConfig;
use milestone_tracker::repository::DieselRepository;
use milestone_tracker::routes::api::{
    api_v1_delete_student, api_v1_student_milestones, api_v1_update_student_milestones,
    json_config,
};
use milestone_tracker::routes::auth::{login, logout, show_login};
use milestone_tracker::routes::milestones::toggle_milestone;
use milestone_tracker::routes::reports::download_report;
use milestone_tracker::routes::students::{
    add_student, delete_student, index, show_add_student, show_student,
};
use milestone_tracker::services::auth::ensure_admin;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let server_config = ServerConfig::load().map_err(|e| {
        log::error!("Failed to load configuration: {e}");
        io::Error::other(e)
    })?;
    server_config.validate().map_err(|e| {
        log::error!("Invalid configuration: {e}");
        io::Error::other(e)
    })?;

    let pool = establish_connection_pool(&server_config.database_url).map_err(|e| {
        log::error!("Failed to open database {}: {e}", server_config.database_url);
        io::Error::other(e)
    })?;

    {
        let mut conn = pool.get().map_err(io::Error::other)?;
        let applied = conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            log::error!("Failed to run migrations: {e}");
            io::Error::other(e.to_string())
        })?;
        if !applied.is_empty() {
            log::info!("Applied {} migrations", applied.len());
        }
    }

    let repo = DieselRepository::new(pool);
    ensure_admin(
        &server_config.admin_email,
        &server_config.admin_password,
        &repo,
    )
    .map_err(|e| {
        log::error!("Failed to provision admin account: {e}");
        io::Error::other(e)
    })?;

    let tera = Tera::new(&server_config.templates_dir).map_err(|e| {
        log::error!("Failed to load templates: {e}");
        io::Error::other(e)
    })?;

    let secret_key = Key::derive_from(server_config.secret.as_bytes());
    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let repo = web::Data::new(repo);
    let tera = web::Data::new(tera);
    let assets_dir = server_config.assets_dir.clone();
    let bind_address = (server_config.address.clone(), server_config.port);

    log::info!("Starting server at http://{}:{}", bind_address.0, bind_address.1);

    HttpServer::new(move || {
        App::new()
            .wrap(message_framework.clone())
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false)
                    .build(),
            )
            .wrap(middleware::Logger::default())
            .app_data(repo.clone())
            .app_data(tera.clone())
            .service(Files::new("/assets", assets_dir.clone()))
            .service(
                web::scope("/api")
                    .app_data(json_config())
                    .service(api_v1_student_milestones)
                    .service(api_v1_update_student_milestones)
                    .service(api_v1_delete_student),
            )
            .service(show_login)
            .service(login)
            .service(logout)
            .service(index)
            .service(show_add_student)
            .service(add_student)
            .service(show_student)
            .service(delete_student)
            .service(toggle_milestone)
            .service(download_report)
    })
    .bind(bind_address)?
    .run()
    .await
}
