use actix_web::http::StatusCode;
use actix_web::http::header::{CACHE_CONTROL, CONTENT_TYPE, LOCATION, USER_AGENT};
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use serde::Deserialize;
use tracing::{debug, trace};

use super::pages::{error_page, render_page};
use crate::config::get_config;
use crate::context::ClientRequest;
use crate::services::dispatcher::{FailureKind, Outcome, Render};
use crate::services::resolver::Resolver;
use crate::utils::ip::extract_client_ip;
use crate::utils::is_valid_short_code;

const HTML: &str = "text/html; charset=utf-8";

/// Body of a challenge page submission
#[derive(Debug, Deserialize)]
pub struct ChallengeForm {
    #[serde(default)]
    pub challenge_id: String,
    #[serde(default)]
    pub answer: String,
}

pub struct RedirectService {}

impl RedirectService {
    pub async fn handle_redirect(
        req: HttpRequest,
        path: web::Path<String>,
        resolver: web::Data<Resolver>,
    ) -> impl Responder {
        let code = path.into_inner();

        if code.is_empty() {
            let default_url = get_config().features.default_url.clone();
            return HttpResponse::TemporaryRedirect()
                .insert_header((LOCATION, default_url))
                .finish();
        }
        if !is_valid_short_code(&code) {
            trace!("Invalid short code rejected: {}", code);
            return Self::not_found_response();
        }

        let client = Self::client_request(&req);
        // actix drops this future if the client goes away, which abandons
        // the attempt along with any in-flight upstream calls
        let outcome = resolver.resolve(&code, &client).await;
        Self::outcome_response(&code, outcome)
    }

    pub async fn handle_challenge(
        path: web::Path<String>,
        form: web::Form<ChallengeForm>,
        resolver: web::Data<Resolver>,
    ) -> impl Responder {
        let code = path.into_inner();
        if !is_valid_short_code(&code) {
            return Self::not_found_response();
        }

        let form = form.into_inner();
        let outcome = resolver
            .complete_challenge(&code, form.challenge_id.trim(), &form.answer)
            .await;
        Self::outcome_response(&code, outcome)
    }

    fn client_request(req: &HttpRequest) -> ClientRequest {
        let user_agent = req
            .headers()
            .get(USER_AGENT)
            .and_then(|h| h.to_str().ok())
            .unwrap_or_default();
        let ip = extract_client_ip(req, &get_config().server.trusted_proxies);
        ClientRequest::new(user_agent, ip)
    }

    pub fn outcome_response(code: &str, outcome: Outcome) -> HttpResponse {
        debug!("Outcome for {}: {}", code, outcome.kind());
        match outcome {
            Outcome::Navigate { url } => HttpResponse::TemporaryRedirect()
                .insert_header((LOCATION, url))
                // decisions depend on who is asking
                .insert_header((CACHE_CONTROL, "no-store"))
                .finish(),
            Outcome::Render(render) => {
                let status = match render {
                    Render::Blocked { .. } => StatusCode::FORBIDDEN,
                    _ => StatusCode::OK,
                };
                Self::html(status, render_page(code, &render))
            }
            Outcome::Failed { kind, message } => {
                let status = match kind {
                    FailureKind::NotFound => StatusCode::NOT_FOUND,
                    FailureKind::Upstream => StatusCode::BAD_GATEWAY,
                };
                Self::html(status, error_page(&message))
            }
        }
    }

    #[inline]
    fn html(status: StatusCode, body: String) -> HttpResponse {
        HttpResponse::build(status)
            .insert_header((CONTENT_TYPE, HTML))
            .insert_header((CACHE_CONTROL, "no-store"))
            .body(body)
    }

    #[inline]
    fn not_found_response() -> HttpResponse {
        HttpResponse::build(StatusCode::NOT_FOUND)
            .insert_header((CONTENT_TYPE, HTML))
            .insert_header((CACHE_CONTROL, "public, max-age=60"))
            .body("Not Found")
    }
}

/// Redirect 路由配置
pub fn redirect_routes() -> actix_web::Scope {
    web::scope("")
        .route("/{path}*", web::get().to(RedirectService::handle_redirect))
        .route("/{path}*", web::head().to(RedirectService::handle_redirect))
        .route("/{path}*", web::post().to(RedirectService::handle_challenge))
}
