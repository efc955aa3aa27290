//! HTTP router: a single form endpoint at `/` plus a health check.
//!
//! - `GET /` renders the empty parameter form
//! - `POST /` runs the [pipeline][tiltbec::pipeline] on the submitted form and
//!   renders the results, the form with validation errors, or an error page
//! - `GET /health` returns `OK`

use std::sync::Arc;
use axum::{
    extract::State,
    http::StatusCode,
    response::{ Html, IntoResponse, Response },
    routing::get,
    Form,
    Router,
};
use tiltbec::{
    error::{ PipelineError, Stage },
    params::Grid,
    pipeline,
};
use tracing::{ error, info };
use crate::{
    config::Config,
    pages::{ self, FormValues },
};

/// Shared application state.
#[derive(Clone, Debug)]
pub struct AppState {
    pub config: Arc<Config>,
}

/// Build the application router.
pub fn router(config: Config) -> Router {
    let state = AppState { config: Arc::new(config) };
    Router::new()
        .route("/", get(show_form).post(submit))
        .route("/health", get(|| async { "OK" }))
        .with_state(state)
}

async fn show_form() -> Html<String> {
    Html(pages::form_page(&FormValues::new(), None))
}

async fn submit(State(state): State<AppState>, Form(values): Form<FormValues>)
    -> Response
{
    let render = state.config.render;
    let raw = values.clone();
    let res = tokio::task::spawn_blocking(move || {
        pipeline::run(|key| raw.get(key).cloned(), Grid::default(), render)
    })
    .await;
    match res {
        Ok(Ok(report)) => {
            info!(
                alpha = report.params.alpha,
                g = report.params.g,
                mu = report.params.mu,
                n0 = report.n0,
                "simulation complete"
            );
            (StatusCode::OK, Html(pages::results_page(&report))).into_response()
        },
        Ok(Err(PipelineError::Validation(err))) => {
            let html = pages::form_page(&values, Some(&err));
            (StatusCode::UNPROCESSABLE_ENTITY, Html(html)).into_response()
        },
        Ok(Err(err)) => {
            let status = match err.stage() {
                Stage::Validate | Stage::Evaluate => StatusCode::UNPROCESSABLE_ENTITY,
                Stage::Render | Stage::Encode => StatusCode::INTERNAL_SERVER_ERROR,
            };
            let html = pages::error_page(&err.to_string(), &values);
            (status, Html(html)).into_response()
        },
        Err(join_err) => {
            error!("simulation worker failed: {}", join_err);
            let html = pages::error_page("internal error", &values);
            (StatusCode::INTERNAL_SERVER_ERROR, Html(html)).into_response()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{ self, Body },
        http::{ header, Request },
    };
    use tiltbec::render::RenderConfig;
    use tower::ServiceExt;

    fn app() -> Router {
        router(Config {
            render: RenderConfig { width: 240, height: 200 },
            ..Config::default()
        })
    }

    async fn body_text(resp: Response) -> String {
        let bytes = body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn post(form: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form))
            .unwrap()
    }

    #[tokio::test]
    async fn get_renders_form() {
        let req = Request::builder().uri("/").body(Body::empty()).unwrap();
        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let html = body_text(resp).await;
        assert!(html.contains("<form method=\"post\""));
        assert!(html.contains("value=\"0.05\""));
    }

    #[tokio::test]
    async fn valid_post_renders_results() {
        let resp = app().oneshot(post("alpha=0.05&g=0.5&mu=1.0")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let html = body_text(resp).await;
        assert!(html.contains("Simulation Results"));
        assert!(html.contains("data:image/png;base64,"));
    }

    #[tokio::test]
    async fn invalid_post_rerenders_form() {
        let resp = app().oneshot(post("alpha=2&g=0.5&mu=abc")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let html = body_text(resp).await;
        assert!(html.contains("value=\"abc\""));
        assert!(html.contains("alpha: ensure this value lies in [0, 1]; got 2"));
    }

    #[tokio::test]
    async fn health() {
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(body_text(resp).await, "OK");
    }
}
