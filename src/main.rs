#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use strapi_auth_bridge::{
    configure_services, settings::BridgeSettings, SessionAssembler, StrapiClient, VERSION,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load configuration from Settings.toml and environment variables
    // This also loads .env file and initializes the logger
    let settings = BridgeSettings::load()
        .map_err(|e| std::io::Error::other(format!("Failed to load settings: {e}")))?;

    println!("✓ Using stateless sessions with encrypted cookies");
    start_server(settings).await
}

/// Start the HTTP server
///
/// # Errors
///
/// Returns an error if:
/// - Server binding fails
/// - Server fails to start
async fn start_server(settings: BridgeSettings) -> std::io::Result<()> {
    let bind_address = settings.get_bind_address();
    print_startup_info(&bind_address, &settings);

    let client = StrapiClient::from_settings(&settings.strapi);
    let assembler = SessionAssembler::from_settings(&settings, client.clone());

    // Configure CORS for SPAs
    let cors_origins = settings.get_cors_origins();

    HttpServer::new(move || {
        let cors_origins = cors_origins.clone();
        let cors = Cors::default()
            .allowed_origin_fn(move |origin, _| {
                cors_origins
                    .iter()
                    .any(|allowed| allowed == origin.to_str().unwrap_or(""))
            })
            .allowed_methods(vec!["GET", "POST", "OPTIONS"])
            .allowed_headers(vec!["Authorization", "Content-Type", "Accept"])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(client.clone()))
            .app_data(web::Data::new(assembler.clone()))
            .app_data(web::Data::new(settings.clone()))
            .wrap(cors)
            .wrap(Logger::default())
            .configure(configure_services)
    })
    .bind(&bind_address)?
    .run()
    .await
}

fn print_startup_info(bind_address: &str, settings: &BridgeSettings) {
    println!("Starting Strapi auth bridge {VERSION} on http://{bind_address}");
    println!("Identity provider: {}", settings.strapi.url);
    println!();
    println!("Auth endpoints:");
    println!("  POST /strapi-auth/sign-up         - Register and start a session");
    println!("  POST /strapi-auth/sign-in         - Log in and start a session");
    println!("  POST /strapi-auth/update-password - Reset password with a reset code");
    println!("  POST /strapi-auth/forgot-password - Request a reset code");
    println!("  GET  /strapi-auth/get-session     - Current session, or null");
    println!("  POST /strapi-auth/sign-out        - Clear session");
    println!();
    println!("System endpoints:");
    println!("  GET  /ping                        - Health check");
    if settings.strapi.sign_in_after_reset {
        println!();
        println!("Sign-in after password reset is enabled for confirmed accounts");
    }
}
