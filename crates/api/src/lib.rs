mod contact;
mod error;
mod event;
mod job_schedulers;
mod meeting;
mod notification;
mod shared;
mod status;
mod todo;
mod user;

use actix_cors::Cors;
use actix_web::{dev::Server, middleware, web, App, HttpServer};
use job_schedulers::{start_reminder_job, JobHandle};
use klubb_infra::KlubbContext;
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;

pub fn configure_server_api(cfg: &mut web::ServiceConfig) {
    contact::configure_routes(cfg);
    event::configure_routes(cfg);
    meeting::configure_routes(cfg);
    notification::configure_routes(cfg);
    status::configure_routes(cfg);
    todo::configure_routes(cfg);
    user::configure_routes(cfg);
}

pub struct Application {
    server: Server,
    port: u16,
    jobs: Option<JobHandle>,
}

impl Application {
    pub async fn new(context: KlubbContext) -> Result<Self, std::io::Error> {
        let (server, port) = Application::configure_server(context.clone()).await?;
        let jobs = Some(start_reminder_job(context));

        Ok(Self { server, port, jobs })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    async fn configure_server(context: KlubbContext) -> Result<(Server, u16), std::io::Error> {
        let port = context.config.port;
        let address = format!("0.0.0.0:{}", port);
        let listener = TcpListener::bind(&address)?;
        let port = listener.local_addr().unwrap().port();

        let server = HttpServer::new(move || {
            let ctx = context.clone();

            App::new()
                .wrap(Cors::permissive())
                .wrap(middleware::Compress::default())
                .wrap(TracingLogger::default())
                .app_data(web::Data::new(ctx))
                .service(web::scope("/api/v1").configure(configure_server_api))
        })
        .listen(listener)?
        .workers(4)
        .run();

        Ok((server, port))
    }

    pub async fn start(mut self) -> Result<(), std::io::Error> {
        let res = self.server.await;
        if let Some(jobs) = self.jobs.take() {
            jobs.stop();
        }
        res
    }
}
