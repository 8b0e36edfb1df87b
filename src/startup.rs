use crate::configuration::{DatabaseSettings, Settings};
use crate::routes::{broadcast, health_check, home, receive_webhook, webhook_form_config};
use crate::sms_client::SmsClient;
use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub async fn build(configuration: Settings) -> Result<Self, anyhow::Error> {
        let connection_pool = get_connection_pool(&configuration.database);
        let sms_client = configuration.sms_client.client()?;

        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );
        let listener = TcpListener::bind(address)?;
        let port = listener.local_addr()?.port();
        let server = run(listener, connection_pool, sms_client)?;

        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn get_connection_pool(configuration: &DatabaseSettings) -> PgPool {
    PgPoolOptions::new()
        .acquire_timeout(std::time::Duration::from_secs(2))
        .connect_lazy_with(configuration.with_db())
}

pub fn run(
    listener: TcpListener,
    db_pool: PgPool,
    sms_client: SmsClient,
) -> Result<Server, std::io::Error> {
    let db_pool = web::Data::new(db_pool);
    let sms_client = web::Data::new(sms_client);
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .route("/", web::get().to(home))
            .route("/health_check", web::get().to(health_check))
            .service(
                web::resource("/webhook")
                    .app_data(webhook_form_config())
                    .route(web::post().to(receive_webhook)),
            )
            .route("/send", web::post().to(broadcast))
            .app_data(db_pool.clone())
            .app_data(sms_client.clone())
    })
    .listen(listener)?
    .run();
    Ok(server)
}
