use std::io;

use actix_files::Files;
use actix_identity::IdentityMiddleware;
use actix_multipart::form::MultipartFormConfig;
use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::Key;
use actix_web::{App, HttpServer, middleware, web};
use actix_web_flash_messages::FlashMessagesFramework;
use actix_web_flash_messages::storage::CookieMessageStore;
use config::{Config, Environment, File};
use tera::Tera;

use fitvideo_dashboard::db::establish_connection_pool;
use fitvideo_dashboard::models::config::ServerConfig;
use fitvideo_dashboard::repository::{ApiRepository, DieselRepository};
use fitvideo_dashboard::routes::api::{api_v1_categories_tree, api_v1_videos};
use fitvideo_dashboard::routes::auth::{login, logout, register, show_login, show_register};
use fitvideo_dashboard::routes::billing::{checkout, portal};
use fitvideo_dashboard::routes::categories::{
    add_category, delete_category, show_categories, update_category,
};
use fitvideo_dashboard::routes::main::{index, not_assigned, professional};
use fitvideo_dashboard::routes::students::{add_student, remove_student, show_students};
use fitvideo_dashboard::routes::videos::{
    delete_video, edit_video, show_my_videos, upload_video,
};

/// Minimum key length accepted by `Key::from`.
const MIN_SECRET_LEN: usize = 64;

fn load_config() -> Result<ServerConfig, config::ConfigError> {
    let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
    Config::builder()
        .add_source(File::with_name("config/default"))
        .add_source(File::with_name(&format!("config/{app_env}")).required(false))
        .add_source(Environment::with_prefix("APP"))
        .build()?
        .try_deserialize()
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let server_config = load_config().map_err(|e| {
        log::error!("Failed to load configuration: {e}");
        io::Error::other(e)
    })?;

    if server_config.secret.len() < MIN_SECRET_LEN {
        log::error!("Secret must be at least {MIN_SECRET_LEN} bytes long");
        return Err(io::Error::other("secret too short"));
    }
    let secret_key = Key::from(server_config.secret.as_bytes());

    let pool = establish_connection_pool(&server_config.database_url).map_err(|e| {
        log::error!("Failed to open session database: {e}");
        io::Error::other(e)
    })?;
    let store = DieselRepository::new(pool);

    let api = ApiRepository::new(reqwest::Client::new(), &server_config.backend_url).map_err(
        |e| {
            log::error!("Invalid backend URL: {e}");
            io::Error::other(e)
        },
    )?;

    let tera = Tera::new(&server_config.templates_dir).map_err(|e| {
        log::error!("Failed to load templates: {e}");
        io::Error::other(e)
    })?;

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let upload_limit = server_config.upload_limit_mb * 1024 * 1024;
    let bind_address = (server_config.address.clone(), server_config.port);
    log::info!(
        "Starting dashboard on {}:{} against {}",
        bind_address.0,
        bind_address.1,
        api.base_url()
    );

    let store = web::Data::new(store);
    let api = web::Data::new(api);
    let tera = web::Data::new(tera);
    let static_dir = server_config.static_dir.clone();

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
            .app_data(MultipartFormConfig::default().total_limit(upload_limit))
            .app_data(store.clone())
            .app_data(api.clone())
            .app_data(tera.clone())
            .service(Files::new("/assets", &static_dir))
            .service(web::scope("/api").service(api_v1_categories_tree).service(api_v1_videos))
            .service(show_login)
            .service(login)
            .service(show_register)
            .service(register)
            .service(logout)
            .service(index)
            .service(not_assigned)
            .service(professional)
            .service(show_categories)
            .service(add_category)
            .service(update_category)
            .service(delete_category)
            .service(show_my_videos)
            .service(upload_video)
            .service(edit_video)
            .service(delete_video)
            .service(show_students)
            .service(add_student)
            .service(remove_student)
            .service(checkout)
            .service(portal)
    })
    .bind(bind_address)?
    .run()
    .await
}
