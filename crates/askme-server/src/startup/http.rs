//! HTTP server setup

use std::sync::Arc;

use actix_web::{App, HttpServer, dev::Server, middleware::Logger, web};

use crate::{api, auth, error::bad_request_handler, middleware::auth::Authentication, model::AppState};

/// Register extractor settings and every route under the context path.
/// Shared by the server and the integration tests.
pub fn configure_app(context_path: String) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(web::JsonConfig::default().error_handler(bad_request_handler))
            .app_data(web::QueryConfig::default().error_handler(bad_request_handler))
            .app_data(web::PathConfig::default().error_handler(bad_request_handler))
            .service(
                web::scope(&context_path)
                    .service(auth::route::routes())
                    .configure(api::routes),
            );
    }
}

/// Create and bind the API server
pub fn api_server(app_state: Arc<AppState>, address: String, port: u16) -> Result<Server, std::io::Error> {
    let context_path = app_state.configuration.server_scope();

    Ok(HttpServer::new(move || {
        App::new()
            .wrap(Authentication)
            .wrap(Logger::default())
            .app_data(web::Data::from(app_state.clone()))
            .configure(configure_app(context_path.clone()))
    })
    .bind((address, port))?
    .run())
}
