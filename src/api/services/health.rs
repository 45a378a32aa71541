use actix_web::{HttpResponse, Responder, web};
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, trace};

use crate::config::get_config;
use crate::services::resolver::Resolver;

// 应用启动时间结构体
#[derive(Clone, Debug)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

impl AppStartTime {
    pub fn now() -> Self {
        Self {
            start_datetime: chrono::Utc::now(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthUpstreams {
    pub rules_url: String,
    pub redirect_url: String,
    pub geoip_enabled: bool,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub uptime: u64,
    pub upstreams: HealthUpstreams,
    pub pending_challenges: u64,
    pub response_time_ms: u32,
}

/// Health Service
///
/// Reports on this process only. Upstream services are listed, not probed:
/// a slow rules service must not make the front-end look dead to k8s.
pub struct HealthService;

impl HealthService {
    pub async fn health_check(
        resolver: web::Data<Resolver>,
        app_start_time: web::Data<AppStartTime>,
    ) -> impl Responder {
        let start_time = Instant::now();
        trace!("Received health check request");

        let config = get_config();
        let now = chrono::Utc::now();
        let uptime = (now - app_start_time.start_datetime).num_seconds().max(0) as u64;

        let body = HealthResponse {
            status: "healthy",
            timestamp: now.to_rfc3339(),
            uptime,
            upstreams: HealthUpstreams {
                rules_url: config.upstream.rules_url.clone(),
                redirect_url: config.upstream.redirect_url.clone(),
                geoip_enabled: config.geoip.enabled,
            },
            pending_challenges: resolver.dispatcher().challenges().pending_count().await,
            response_time_ms: start_time.elapsed().as_millis() as u32,
        };

        debug!("Health check completed in {:?}", start_time.elapsed());
        HttpResponse::Ok().json(body)
    }

    // 简单的就绪检查，只返回 200 状态码
    pub async fn readiness_check() -> impl Responder {
        trace!("Received readiness check request");

        HttpResponse::Ok()
            .append_header(("Content-Type", "text/plain"))
            .body("OK")
    }

    // 活跃性检查
    pub async fn liveness_check() -> impl Responder {
        trace!("Received liveness check request");

        HttpResponse::NoContent().finish()
    }
}

/// Health 路由配置
pub fn health_routes() -> actix_web::Scope {
    web::scope("")
        .route("", web::get().to(HealthService::health_check))
        .route("", web::head().to(HealthService::health_check))
        .route("/ready", web::get().to(HealthService::readiness_check))
        .route("/ready", web::head().to(HealthService::readiness_check))
        .route("/live", web::get().to(HealthService::liveness_check))
        .route("/live", web::head().to(HealthService::liveness_check))
}
