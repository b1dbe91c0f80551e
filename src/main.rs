use actix_session::{SessionMiddleware, config::PersistentSession, storage::CookieSessionStore};
use actix_web::{App, HttpServer, cookie::Key, cookie::time::Duration, middleware, web};

use zoomforms::auth;
use zoomforms::config::AppConfig;
use zoomforms::db;
use zoomforms::handlers;
use zoomforms::zoom::ZoomClient;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();

    let config = AppConfig::from_env();

    // Ensure the directory for the default database file exists
    std::fs::create_dir_all("data").expect("Failed to create data directory");

    let pool = db::init_pool(&config.database_url)
        .await
        .expect("Failed to open database");
    db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    // Session encryption key — load from SESSION_KEY env var for persistent sessions across restarts
    let secret_key = match std::env::var("SESSION_KEY") {
        Ok(val) if val.len() >= 64 => {
            log::info!("Using SESSION_KEY from environment");
            Key::from(val.as_bytes())
        }
        Ok(val) => {
            log::warn!(
                "SESSION_KEY too short ({} bytes, need 64+) — generating random key",
                val.len()
            );
            Key::generate()
        }
        Err(_) => {
            log::warn!("No SESSION_KEY set — generating random key (sessions lost on restart)");
            Key::generate()
        }
    };

    let zoom_client = ZoomClient::new(&config.zoom_api_base);
    if config.oauth.is_some() {
        log::info!("Zoom OAuth flow enabled");
    }

    let bind_addr = config.bind_addr.clone();
    log::info!("Starting server at http://{bind_addr}");

    HttpServer::new(move || {
        // Cookie max-age covers the longest "remember me" session; the
        // auth guard enforces the real per-login expiry stored inside.
        let session_mw = SessionMiddleware::builder(
            CookieSessionStore::default(),
            secret_key.clone(),
        )
        .cookie_secure(false)
        .cookie_http_only(true)
        .session_lifecycle(PersistentSession::default().session_ttl(Duration::days(30)))
        .build();

        App::new()
            .wrap(session_mw)
            .wrap(middleware::Logger::default())
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(config.clone()))
            .app_data(web::Data::new(zoom_client.clone()))
            // Static files
            .service(actix_files::Files::new("/static", "./static"))
            // Public routes
            .route("/", web::get().to(handlers::home::index))
            .route("/home", web::get().to(handlers::home::index))
            .route("/register", web::get().to(handlers::auth_handlers::register_page))
            .route("/register", web::post().to(handlers::auth_handlers::register_submit))
            .route("/login", web::get().to(handlers::auth_handlers::login_page))
            .route("/login", web::post().to(handlers::auth_handlers::login_submit))
            .route("/logout", web::get().to(handlers::auth_handlers::logout))
            .route("/logout", web::post().to(handlers::auth_handlers::logout))
            // Public registration form (shareable link, no login)
            .route("/meetingforms/{id}/view", web::get().to(handlers::public_handlers::view))
            .route("/meetingforms/{id}/view", web::post().to(handlers::public_handlers::submit))
            // OAuth variant — no-ops unless client credentials configured
            .route("/zoom/authorize", web::get().to(handlers::oauth_handlers::authorize))
            .route("/zoom/callback", web::get().to(handlers::oauth_handlers::callback))
            // Protected routes
            .service(
                web::scope("")
                    .wrap(actix_web::middleware::from_fn(auth::middleware::require_auth))
                    // Account
                    .route("/account", web::get().to(handlers::account_handlers::form))
                    .route("/account", web::post().to(handlers::account_handlers::submit))
                    // Meeting forms — /create BEFORE /{id} to avoid routing conflict
                    .route("/meetingforms/create", web::get().to(handlers::form_handlers::create_page))
                    .route("/meetingforms/create", web::post().to(handlers::form_handlers::create_submit))
                    .route(
                        "/meetingforms/create/{meeting_id}/{meeting_name}",
                        web::get().to(handlers::form_handlers::create_page_prefilled),
                    )
                    .route("/meetingforms/{id}", web::get().to(handlers::form_handlers::detail))
                    .route("/meetingforms/{id}/toggle", web::post().to(handlers::form_handlers::toggle)),
            )
            // Default 404 handler (must be registered last)
            .default_service(web::to(|| async {
                let html = include_str!("../templates/errors/404.html");
                actix_web::HttpResponse::NotFound()
                    .content_type("text/html; charset=utf-8")
                    .body(html)
            }))
    })
    .bind(bind_addr.as_str())?
    .run()
    .await
}
