mod app;
mod application;
mod domain;
mod infrastructure;
mod interfaces;

#[actix_web::main]
async fn main() {
    dotenvy::dotenv().ok();
    let _ = tracing_subscriber::fmt().with_env_filter("info").try_init();

    if let Err(e) = app::run().await {
        tracing::error!(error = %e, "server exited with error");
        std::process::exit(1);
    }
}
