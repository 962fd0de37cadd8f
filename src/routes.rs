// src/routes.rs
use std::{sync::Arc, time::Duration};

use axum::{
    extract::{rejection::FormRejection, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{debug, info};

use crate::{
    config::Config,
    effects::Effects,
    error::AppError,
    link::{build_share_link, LinkError, ShareLink},
    page::PageState,
    params::ShareParams,
    render::{self, AdminView},
    types::*,
};

type Pairs = Vec<(String, String)>;

pub fn app(config: Config) -> Router {
    let timeout = Duration::from_secs(config.request_timeout_secs);

    let api = Router::new()
        .route("/api/links", post(create_link))
        .route("/api/validate", get(validate))
        .layer(CorsLayer::permissive());

    Router::new()
        .route("/", get(landing).post(landing_answer))
        .route("/admin", get(admin_page).post(admin_submit))
        .route("/health", get(health))
        .route("/:slug", get(dedicated).post(dedicated_answer))
        .merge(api)
        .with_state(Arc::new(config))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(timeout)),
        )
}

// ---------- PAGE HANDLERS ---------- //

async fn landing(
    State(config): State<Arc<Config>>,
    Query(pairs): Query<Pairs>,
) -> Result<Html<String>, AppError> {
    let state = resolve(&config, &pairs)?;
    Ok(Html(render::landing(
        &state,
        config.landing_locale,
        Effects::default().with_hearts(config.landing_hearts),
    )))
}

async fn landing_answer(
    State(config): State<Arc<Config>>,
    Query(pairs): Query<Pairs>,
    answer: Result<Form<AnswerForm>, FormRejection>,
) -> Result<Html<String>, AppError> {
    // the form echoes name and token back through the query string, so the
    // link is checked again before the body is even looked at
    let state = answered(resolve(&config, &pairs)?, answer);
    if state.is_accepted() {
        info!("share link accepted");
    }
    Ok(Html(render::landing(
        &state,
        config.landing_locale,
        Effects::default().with_hearts(config.landing_hearts),
    )))
}

async fn dedicated(
    State(config): State<Arc<Config>>,
    Path(slug): Path<String>,
) -> Result<Html<String>, AppError> {
    let state = PageState::dedicated(dedicated_name(&config, &slug)?);
    Ok(Html(render::landing(
        &state,
        config.dedicated_locale,
        Effects::default().with_hearts(true),
    )))
}

async fn dedicated_answer(
    State(config): State<Arc<Config>>,
    Path(slug): Path<String>,
    answer: Result<Form<AnswerForm>, FormRejection>,
) -> Result<Html<String>, AppError> {
    let state = answered(
        PageState::dedicated(dedicated_name(&config, &slug)?),
        answer,
    );
    Ok(Html(render::landing(
        &state,
        config.dedicated_locale,
        Effects::default().with_hearts(true),
    )))
}

async fn admin_page() -> Html<String> {
    Html(render::admin(&AdminView::default()))
}

async fn admin_submit(
    State(config): State<Arc<Config>>,
    headers: HeaderMap,
    Form(req): Form<LinkReq>,
) -> Response {
    match build_share_link(&req.name, &origin(&config, &headers)) {
        Ok(link) => {
            info!("generated share link for {}", link.name);
            Html(render::admin(&AdminView {
                name: link.name.clone(),
                link: Some(link),
                empty_name: false,
            }))
            .into_response()
        }
        Err(LinkError::EmptyName) => (
            StatusCode::BAD_REQUEST,
            Html(render::admin(&AdminView {
                name: req.name,
                link: None,
                empty_name: true,
            })),
        )
            .into_response(),
    }
}

// ---------- API HANDLERS ---------- //

async fn create_link(
    State(config): State<Arc<Config>>,
    headers: HeaderMap,
    Json(req): Json<LinkReq>,
) -> Result<Json<ShareLink>, AppError> {
    let link = build_share_link(&req.name, &origin(&config, &headers))?;
    info!("generated share link for {}", link.name);
    Ok(Json(link))
}

async fn validate(Query(pairs): Query<Pairs>) -> Json<ValidateRes> {
    let state = PageState::resolve(&ShareParams::from_pairs(&pairs));
    Json(ValidateRes {
        valid: state != PageState::NotFound,
    })
}

async fn health() -> &'static str {
    "ok"
}

fn resolve(config: &Config, pairs: &[(String, String)]) -> Result<PageState, AppError> {
    match PageState::resolve(&ShareParams::from_pairs(pairs)) {
        PageState::NotFound => Err(AppError::NotFound(config.landing_locale)),
        state => Ok(state),
    }
}

/// Applies a Yes/No answer to an already validated page. A body that does not
/// parse leaves the question open with no clicks counted.
fn answered(state: PageState, answer: Result<Form<AnswerForm>, FormRejection>) -> PageState {
    match answer {
        Ok(Form(answer)) => state.with_no_clicks(answer.no_clicks).press(answer.choice),
        Err(e) => {
            debug!("ignoring malformed answer: {e}");
            state.finish_loading()
        }
    }
}

/// Unknown slugs are not dedicated pages, so they get the site's 404.
fn dedicated_name<'a>(config: &'a Config, slug: &str) -> Result<&'a str, AppError> {
    config
        .dedicated_pages
        .get(&slug.to_lowercase())
        .map(String::as_str)
        .ok_or(AppError::NotFound(config.landing_locale))
}

/// `PUBLIC_ORIGIN` when configured, otherwise rebuilt from the request.
fn origin(config: &Config, headers: &HeaderMap) -> String {
    if let Some(origin) = &config.public_origin {
        return origin.clone();
    }
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("http");
    headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(|host| format!("{scheme}://{host}"))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::Request,
    };
    use tower::ServiceExt;

    use crate::token::generate_token;

    struct TestResponse {
        status: StatusCode,
        body: String,
    }

    async fn send(app: Router, req: Request<Body>) -> TestResponse {
        let res = app.oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        TestResponse {
            status,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }

    async fn get(uri: &str) -> TestResponse {
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        send(app(Config::default()), req).await
    }

    async fn post_form(config: Config, uri: &str, form: &str) -> TestResponse {
        let req = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::HOST, "valentine.test")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .unwrap();
        send(app(config), req).await
    }

    fn maria_url() -> String {
        format!("/?name=Maria&token={}", generate_token("Maria"))
    }

    #[tokio::test]
    async fn landing_without_name_is_404() {
        let res = get("/?foo=bar").await;
        assert_eq!(res.status, StatusCode::NOT_FOUND);
        assert!(res.body.contains("404"));

        assert_eq!(get("/").await.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn landing_with_wrong_or_missing_token_is_404() {
        let res = get("/?name=Maria&token=deadbeef").await;
        assert_eq!(res.status, StatusCode::NOT_FOUND);
        assert!(!res.body.contains("Maria"));

        let res = get("/?name=Maria").await;
        assert_eq!(res.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn landing_with_valid_link_shows_the_name() {
        let res = get(&maria_url()).await;
        assert_eq!(res.status, StatusCode::OK);
        assert!(res.body.contains("Maria, ще бъдеш ли моята Валентинка?"));
        assert!(res.body.contains("Зареждане..."));
    }

    #[tokio::test]
    async fn parameter_keys_are_case_insensitive() {
        let res = get(&format!("/?NAME=Maria&TOKEN={}", generate_token("Maria"))).await;
        assert_eq!(res.status, StatusCode::OK);
        assert!(res.body.contains("Maria, ще бъдеш"));
    }

    #[tokio::test]
    async fn percent_encoded_names_round_trip_from_the_generator() {
        let link = build_share_link("  María  ", "https://x").unwrap();
        let path = link.url.trim_start_matches("https://x");
        let res = get(path).await;
        assert_eq!(res.status, StatusCode::OK);
        assert!(res.body.contains("María, ще бъдеш"));
    }

    #[tokio::test]
    async fn no_escalates_and_yes_accepts() {
        let res = post_form(Config::default(), &maria_url(), "no_clicks=0&choice=no").await;
        assert_eq!(res.status, StatusCode::OK);
        assert!(res.body.contains(r#"name="no_clicks" value="1""#));
        assert!(res.body.contains("Ама наистина ли?"));

        let res = post_form(Config::default(), &maria_url(), "no_clicks=40&choice=no").await;
        assert!(res.body.contains("Последна молба! 🙏"));

        let res = post_form(Config::default(), &maria_url(), "no_clicks=2&choice=yes").await;
        assert_eq!(res.status, StatusCode::OK);
        assert!(res.body.contains("Йей! Знаех си!"));
        assert!(!res.body.contains("<form"));
    }

    #[tokio::test]
    async fn answers_on_a_tampered_link_are_404() {
        let res = post_form(
            Config::default(),
            "/?name=Elena&token=18440cf0",
            "no_clicks=0&choice=yes",
        )
        .await;
        assert_eq!(res.status, StatusCode::NOT_FOUND);
        assert!(!res.body.contains("Elena"));
    }

    #[tokio::test]
    async fn dedicated_page_needs_no_token() {
        let res = get("/bailey").await;
        assert_eq!(res.status, StatusCode::OK);
        assert!(res.body.contains("Bailey, will you be my Valentine?"));
        assert!(res.body.contains(r#""interval_ms":3000"#));

        let res = post_form(Config::default(), "/Bailey", "no_clicks=1&choice=no").await;
        assert!(res.body.contains("Think again! 💔"));

        let res = get("/someone-else").await;
        assert_eq!(res.status, StatusCode::NOT_FOUND);
        assert!(res.body.contains("Страницата не е намерена"));
    }

    #[tokio::test]
    async fn landing_hearts_follow_config() {
        let res = get(&maria_url()).await;
        assert!(res.body.contains(r#""hearts":null"#));
        assert!(!res.body.contains(r#""initial_offsets_ms""#));

        let config = Config {
            landing_hearts: true,
            ..Config::default()
        };
        let req = Request::builder().uri(maria_url()).body(Body::empty()).unwrap();
        let res = send(app(config), req).await;
        assert!(res.body.contains(r#""hearts":{"initial_offsets_ms":[0,2000,4000,6000,8000]"#));
    }

    #[tokio::test]
    async fn admin_generates_link_from_host() {
        let res = post_form(Config::default(), "/admin", "name=++Maria++").await;
        assert_eq!(res.status, StatusCode::OK);
        assert!(res
            .body
            .contains("http://valentine.test/?name=Maria&amp;token=18440cf0"));
    }

    #[tokio::test]
    async fn admin_prefers_configured_origin() {
        let config = Config {
            public_origin: Some("https://love.example".into()),
            ..Config::default()
        };
        let res = post_form(config, "/admin", "name=Maria").await;
        assert!(res
            .body
            .contains("https://love.example/?name=Maria&amp;token=18440cf0"));
    }

    #[tokio::test]
    async fn admin_rejects_blank_name() {
        let res = post_form(Config::default(), "/admin", "name=+++").await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST);
        assert!(res.body.contains("alert('Моля, въведете име!')"));
        assert!(!res.body.contains("token="));
    }

    #[tokio::test]
    async fn api_creates_and_validates_links() {
        let req = Request::builder()
            .method("POST")
            .uri("/api/links")
            .header(header::HOST, "valentine.test")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"name":" Христо "}"#))
            .unwrap();
        let res = send(app(Config::default()), req).await;
        assert_eq!(res.status, StatusCode::OK);
        let link: serde_json::Value = serde_json::from_str(&res.body).unwrap();
        assert_eq!(link["name"], "Христо");
        assert_eq!(link["token"], "4cd91be6");
        let url = link["url"].as_str().unwrap();
        assert!(url.starts_with("http://valentine.test/?name=%D0%A5"));

        let path = url.trim_start_matches("http://valentine.test");
        let check = get(&path.replacen("/?", "/api/validate?", 1)).await;
        assert_eq!(check.body, r#"{"valid":true}"#);

        let check = get("/api/validate?name=Maria&token=deadbeef").await;
        assert_eq!(check.body, r#"{"valid":false}"#);
    }

    #[tokio::test]
    async fn api_rejects_blank_name() {
        let req = Request::builder()
            .method("POST")
            .uri("/api/links")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"name":"   "}"#))
            .unwrap();
        let res = send(app(Config::default()), req).await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST);
        assert_eq!(res.body, "name must not be empty");
    }

    #[tokio::test]
    async fn health_is_ok() {
        let res = get("/health").await;
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(res.body, "ok");
    }

    #[tokio::test]
    async fn malformed_answer_on_a_valid_link_keeps_the_question_open() {
        for body in ["no_clicks=0", "no_clicks=abc&choice=no", "choice=maybe", ""] {
            let res = post_form(Config::default(), &maria_url(), body).await;
            assert_eq!(res.status, StatusCode::OK, "{body}");
            assert!(res.body.contains("Maria, ще бъдеш"), "{body}");
            assert!(res.body.contains(r#"name="no_clicks" value="0""#), "{body}");
            assert!(res.body.contains(">Не</button>"), "{body}");
        }
    }

    #[tokio::test]
    async fn malformed_answer_on_a_bad_link_is_404() {
        let res = post_form(
            Config::default(),
            "/?name=Maria&token=deadbeef",
            "no_clicks=-1&choice=no",
        )
        .await;
        assert_eq!(res.status, StatusCode::NOT_FOUND);
        assert!(res.body.contains("404"));
        assert!(!res.body.contains("Maria"));

        let res = post_form(Config::default(), "/?foo=bar", "").await;
        assert_eq!(res.status, StatusCode::NOT_FOUND);

        let res = post_form(Config::default(), "/someone-else", "no_clicks=x").await;
        assert_eq!(res.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn malformed_answer_on_a_dedicated_page_keeps_the_question_open() {
        let res = post_form(Config::default(), "/bailey", "").await;
        assert_eq!(res.status, StatusCode::OK);
        assert!(res.body.contains("Bailey, will you be my Valentine?"));
        assert!(res.body.contains(">No</button>"));
    }

    #[tokio::test]
    async fn cors_headers_only_on_the_api() {
        let with_origin = |uri: &str| {
            Request::builder()
                .uri(uri)
                .header(header::ORIGIN, "https://elsewhere.example")
                .body(Body::empty())
                .unwrap()
        };

        let res = app(Config::default())
            .oneshot(with_origin("/api/validate?name=Maria&token=18440cf0"))
            .await
            .unwrap();
        assert!(res
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));

        for uri in ["/health", "/admin", "/bailey"] {
            let res = app(Config::default()).oneshot(with_origin(uri)).await.unwrap();
            assert!(
                !res.headers()
                    .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN),
                "{uri}"
            );
        }
    }
}
