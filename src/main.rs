use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Local;
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter

use freelancer_backend::{
    config::Config,
    database::{create_pool, run_migrations},
    handlers,
    middlewares::{AuthMiddleware, create_cors},
    services::*,
    swagger::swagger_config,
    tasks,
    utils::JwtService,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    let config = Config::from_toml().expect("Failed to load configuration file");

    let pool = create_pool(&config.database)
        .await
        .expect("Failed to create database connection pool");

    run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    // Tokens are minted by the identity provider; we only verify them.
    let jwt_service = JwtService::new(&config.auth.jwt_secret, &config.auth.jwt_audience);

    let profile_service = ProfileService::new(pool.clone());
    let service_service = ServiceService::new(pool.clone());
    let client_service = ClientService::new(pool.clone());
    let notification_service =
        NotificationService::new(pool.clone(), config.tasks.expiry_warning_days);
    let membership_service = MembershipService::new(pool.clone(), notification_service.clone());
    let meeting_service = MeetingService::new(pool.clone(), membership_service.clone());
    let recurrence_service = RecurrenceService::new(
        pool.clone(),
        membership_service.clone(),
        meeting_service.clone(),
    );
    let stats_service = StatsService::new(pool.clone());

    tasks::spawn_all(
        &config.tasks,
        meeting_service.clone(),
        membership_service.clone(),
        notification_service.clone(),
    );

    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors())
            .wrap(AuthMiddleware::new(jwt_service.clone()))
            .app_data(web::Data::new(profile_service.clone()))
            .app_data(web::Data::new(service_service.clone()))
            .app_data(web::Data::new(client_service.clone()))
            .app_data(web::Data::new(meeting_service.clone()))
            .app_data(web::Data::new(recurrence_service.clone()))
            .app_data(web::Data::new(membership_service.clone()))
            .app_data(web::Data::new(notification_service.clone()))
            .app_data(web::Data::new(stats_service.clone()))
            .configure(swagger_config)
            .service(
                web::scope("/api/v1")
                    .configure(handlers::health_config)
                    .configure(handlers::profile_config)
                    .configure(handlers::service_config)
                    .configure(handlers::client_config)
                    .configure(handlers::meeting_config)
                    .configure(handlers::recurrence_config)
                    .configure(handlers::membership_config)
                    .configure(handlers::notification_config)
                    .configure(handlers::stats_config),
            )
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
