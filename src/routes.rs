// src/routes.rs

use axum::{
    Router,
    http::Method,
    middleware,
    routing::{get, post, put},
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::{handlers::quiz, state::AppState, utils::jwt::session_middleware};

/// Assembles the main application router.
///
/// * Public: session creation and character images.
/// * Session-protected: rendering, answering, submitting, results, reset.
/// * Applies global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        "http://localhost:3000".parse().unwrap(),
        "http://127.0.0.1:3000".parse().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let quiz_routes = Router::new()
        .route("/session", post(quiz::start_session))
        // Session-protected quiz routes
        .merge(
            Router::new()
                .route("/", get(quiz::get_quiz))
                .route("/name", put(quiz::set_name))
                .route("/answers", put(quiz::select_answer))
                .route("/submit", post(quiz::submit_quiz))
                .route("/result", get(quiz::get_result))
                .route("/reset", post(quiz::reset_quiz))
                .layer(middleware::from_fn_with_state(
                    state.clone(),
                    session_middleware,
                )),
        );

    let images = ServeDir::new(&state.config.image_dir);

    Router::new()
        .nest("/api/quiz", quiz_routes)
        .nest_service("/images", images)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
