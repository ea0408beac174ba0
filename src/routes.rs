use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth;
use crate::config::Config;
use crate::handlers;
use crate::AppState;

fn cors(config: &Config) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = std::iter::once(&config.frontend_url)
        .chain(config.cors_extra_origins.iter())
        .filter_map(|origin| match origin.trim_end_matches('/').parse::<HeaderValue>() {
            Ok(hv) => Some(hv),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}

pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::readyz))
        .route("/api/news/health", get(handlers::news::health_news));

    // Model-backed endpoints, limited per user.
    let llm_routes = Router::new()
        .route(
            "/api/nutrition/analyze-text",
            post(handlers::nutrition::analyze_text),
        )
        // Older clients post here.
        .route("/api/nutrition/analyze", post(handlers::nutrition::analyze_text))
        .route("/api/assistant/query", post(handlers::assistant::query))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::rate_limit::rate_limit_llm,
        ));

    let protected_routes = Router::new()
        // Profile
        .route(
            "/api/user/profile",
            get(handlers::profile::get_profile).put(handlers::profile::update_profile),
        )
        // Tracking
        .route(
            "/api/tracking/weight",
            post(handlers::tracking::add_weight).get(handlers::tracking::list_weights),
        )
        .route(
            "/api/tracking/sleep",
            post(handlers::tracking::add_sleep).get(handlers::tracking::list_sleep),
        )
        .route(
            "/api/tracking/calories",
            post(handlers::tracking::add_calories)
                .put(handlers::tracking::update_calories)
                .get(handlers::tracking::list_calories),
        )
        .route(
            "/api/tracking/activity",
            post(handlers::activity::log_activity).get(handlers::activity::list_activities),
        )
        .route(
            "/api/tracking/activity/summary",
            get(handlers::activity::activity_summary),
        )
        .route(
            "/api/tracking/activity/:id",
            delete(handlers::activity::delete_activity),
        )
        // Nutrition
        .route(
            "/api/nutrition/logs",
            post(handlers::nutrition::create_log).get(handlers::nutrition::list_logs),
        )
        .route(
            "/api/nutrition/logs/:id",
            delete(handlers::nutrition::delete_log),
        )
        // Medical history
        .route(
            "/api/medical/history",
            get(handlers::medical::list_history).post(handlers::medical::add_condition),
        )
        .route(
            "/api/medical/history/:id",
            put(handlers::medical::update_condition).delete(handlers::medical::delete_condition),
        )
        // Assistant
        .route(
            "/api/assistant/contexts",
            get(handlers::assistant::list_contexts).post(handlers::assistant::create_context),
        )
        .route(
            "/api/assistant/contexts/:id",
            delete(handlers::assistant::delete_context),
        )
        .route(
            "/api/assistant/messages",
            get(handlers::assistant::list_messages).post(handlers::assistant::add_message),
        )
        // Dashboard
        .route("/api/dashboard", get(handlers::dashboard::get_dashboard))
        .merge(llm_routes)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::middleware::require_auth,
        ));

    let cors = cors(&state.config);

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::auth::jwt::mint_token;
    use crate::auth::rate_limit::RateLimitState;
    use crate::db::pool::lazy_pool;
    use crate::error::AppResult;
    use crate::services::llm::LlmClient;
    use crate::services::news::NewsClient;

    /// Returns a canned reply for every prompt.
    struct CannedLlm(&'static str);

    #[async_trait]
    impl LlmClient for CannedLlm {
        async fn generate(&self, _prompt: &str) -> AppResult<String> {
            Ok(self.0.to_string())
        }
    }

    const APPLE: &str = "```json\n{\"food_items\": [\"apple\"], \"calories\": 95, \
                         \"macronutrients\": {\"protein\": 0.5, \"carbs\": 25, \"fat\": 0.3, \"fiber\": 4.4}, \
                         \"health_impact\": \"Light snack\", \"recommendations\": []}\n```";

    fn app(reply: &'static str) -> (Router, Config) {
        let config = Config::for_tests();
        let state = AppState {
            db: lazy_pool(&config.database_url),
            config: Arc::new(config.clone()),
            llm: Arc::new(CannedLlm(reply)),
            news: NewsClient::from_config(&config),
            rate_limiter: RateLimitState::new(config.llm_rate_limit_per_minute),
        };
        (router(state), config)
    }

    fn analyze(token: Option<&str>, body: &str) -> Request<Body> {
        analyze_at("/api/nutrition/analyze-text", token, body)
    }

    fn analyze_at(uri: &str, token: Option<&str>, body: &str) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let (app, _) = app(APPLE);
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["service"], "fitpulse-api");
    }

    #[tokio::test]
    async fn test_protected_routes_require_a_bearer_token() {
        let (app, _) = app(APPLE);

        for uri in ["/api/dashboard", "/api/tracking/activity/summary", "/api/user/profile"] {
            let response = app
                .clone()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
            assert_eq!(json_body(response).await["error"]["code"], 401);
        }

        let response = app
            .oneshot(analyze(Some("forged.token.value"), r#"{"foodText": "apple"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_analyze_text_returns_structured_analysis() {
        let (app, config) = app(APPLE);
        let token = mint_token(Uuid::new_v4(), &config, 300);

        let response = app
            .oneshot(analyze(Some(&token), r#"{"foodText": "one apple"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["analysis"]["calories"], 95.0);
        assert_eq!(body["analysis"]["carbohydrates"], 25.0);
        assert_eq!(body["analysis"]["foodItems"][0], "apple");
    }

    #[tokio::test]
    async fn test_legacy_analyze_path_shares_handler_and_limit() {
        let (app, config) = app(APPLE);
        let token = mint_token(Uuid::new_v4(), &config, 300);
        let body = r#"{"foodText": "apple"}"#;

        let response = app
            .clone()
            .oneshot(analyze_at("/api/nutrition/analyze", Some(&token), body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["analysis"]["calories"], 95.0);

        for _ in 1..config.llm_rate_limit_per_minute {
            let response = app.clone().oneshot(analyze(Some(&token), body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }
        let response = app
            .oneshot(analyze_at("/api/nutrition/analyze", Some(&token), body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[tokio::test]
    async fn test_malformed_model_output_is_bad_gateway_without_data() {
        let (app, config) = app("Sorry, I can only describe food in prose.");
        let token = mint_token(Uuid::new_v4(), &config, 300);

        let response = app
            .oneshot(analyze(Some(&token), r#"{"food_text": "mystery stew"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], 502);
        assert!(body.get("analysis").is_none());
        assert!(!body.to_string().contains("prose"));
    }

    #[tokio::test]
    async fn test_empty_food_text_is_rejected() {
        let (app, config) = app(APPLE);
        let token = mint_token(Uuid::new_v4(), &config, 300);

        let response = app
            .oneshot(analyze(Some(&token), r#"{"foodText": "   "}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_llm_routes_are_rate_limited_per_user() {
        let (app, config) = app(APPLE);
        let alice = mint_token(Uuid::new_v4(), &config, 300);
        let bob = mint_token(Uuid::new_v4(), &config, 300);
        let body = r#"{"foodText": "apple"}"#;

        for _ in 0..config.llm_rate_limit_per_minute {
            let response = app.clone().oneshot(analyze(Some(&alice), body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = app.clone().oneshot(analyze(Some(&alice), body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(json_body(response).await["error"]["code"], 429);

        let response = app.oneshot(analyze(Some(&bob), body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
