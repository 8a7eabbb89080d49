//! famdoc Web Server
//!
//! Axum-based JSON API over the famdoc core services.

pub mod error;
pub mod extract;
pub mod mailer;
pub mod routes;
pub mod session;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use routes::{config, data_fields, families, master_data, method_not_allowed, responses, surveys, users};
use state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Families
        .route(
            "/families",
            get(families::list_families)
                .post(families::create_family)
                .fallback(method_not_allowed),
        )
        .route(
            "/families/{id}",
            get(families::get_family)
                .post(families::update_family)
                .delete(families::delete_family)
                .fallback(method_not_allowed),
        )
        // Users
        .route(
            "/user",
            get(users::list_users)
                .post(users::invite_user)
                .fallback(method_not_allowed),
        )
        .route("/user/me", get(users::me).fallback(method_not_allowed))
        .route(
            "/user/createAdminUser",
            post(users::create_admin_user).fallback(method_not_allowed),
        )
        .route(
            "/user/{id}",
            get(users::get_user)
                .post(users::update_user)
                .delete(users::delete_user)
                .fallback(method_not_allowed),
        )
        // Configuration
        .route(
            "/config",
            get(config::list_configs)
                .post(config::create_config)
                .fallback(method_not_allowed),
        )
        .route(
            "/config/{id}",
            get(config::get_config)
                .post(config::update_config)
                .delete(config::delete_config)
                .fallback(method_not_allowed),
        )
        // Data fields
        .route(
            "/dataFields",
            get(data_fields::list_data_fields)
                .post(data_fields::create_data_field)
                .fallback(method_not_allowed),
        )
        .route(
            "/dataFields/{id}",
            get(data_fields::get_data_field)
                .post(data_fields::update_data_field)
                .delete(data_fields::delete_data_field)
                .fallback(method_not_allowed),
        )
        // Surveys
        .route(
            "/surveys",
            get(surveys::list_surveys)
                .post(surveys::create_survey)
                .fallback(method_not_allowed),
        )
        .route(
            "/surveys/{id}",
            get(surveys::get_survey)
                .post(surveys::update_survey)
                .delete(surveys::delete_survey)
                .fallback(method_not_allowed),
        )
        .route(
            "/surveys/{id}/responses",
            get(surveys::list_responses).fallback(method_not_allowed),
        )
        .route("/surveys/{id}/table", get(surveys::get_table).fallback(method_not_allowed))
        .route("/surveys/{id}/export", get(surveys::export_csv).fallback(method_not_allowed))
        // Responses
        .route(
            "/responses",
            post(responses::create_response).fallback(method_not_allowed),
        )
        .route(
            "/responses/{id}",
            get(responses::get_response)
                .post(responses::update_response)
                .delete(responses::delete_response)
                .fallback(method_not_allowed),
        )
        .route(
            "/responses/{id}/answers/{data_field_id}",
            post(responses::edit_answer).fallback(method_not_allowed),
        )
        // Master data
        .route(
            "/masterDataTypes",
            get(master_data::list_types)
                .post(master_data::create_type)
                .fallback(method_not_allowed),
        )
        .route(
            "/masterData/{type_id}",
            get(master_data::list_records)
                .post(master_data::create_record)
                .fallback(method_not_allowed),
        )
        .route(
            "/masterData/{type_id}/{number}",
            get(master_data::get_record)
                .post(master_data::update_record)
                .delete(master_data::delete_record)
                .fallback(method_not_allowed),
        )
        .route(
            "/masterData/{type_id}/{number}/answers/{data_field_id}",
            post(master_data::edit_answer).fallback(method_not_allowed),
        );

    Router::new()
        .nest("/api", api_routes)
        .fallback(routes::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Run the web server.
pub async fn run_server(state: AppState, host: &str, port: u16) -> anyhow::Result<()> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    tracing::info!("Web server listening on http://{}:{}", host, port);

    axum::serve(listener, app).await?;
    Ok(())
}
