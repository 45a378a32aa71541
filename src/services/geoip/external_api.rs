//! 外部 GeoIP API 实现
//!
//! 使用外部 HTTP API 进行 IP 地理位置查询（默认 ipapi.co）
//! 内置 TTL 缓存 + Singleflight 语义，避免重复查询；只缓存成功结果

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tracing::{trace, warn};
use ureq::Agent;

use super::provider::{GeoInfo, GeoIpLookup};
use crate::client::http::build_agent;
use crate::config::GeoIpConfig;

/// 外部 API GeoIP Provider
///
/// - URL 模板使用 `{ip}` 作为占位符
/// - 成功结果按 IP 缓存
/// - 失败不缓存：一次超时或 5xx 只影响当前这次解析，下次请求重新查询
pub struct ExternalApiProvider {
    api_url_template: String,
    agent: Agent,
    /// IP → GeoInfo 缓存（仅成功结果）
    cache: Cache<String, GeoInfo>,
}

impl ExternalApiProvider {
    pub fn new(config: &GeoIpConfig) -> Self {
        let cache = Cache::builder()
            .time_to_live(Duration::from_secs(config.cache_ttl_secs))
            .max_capacity(config.cache_capacity)
            .build();

        Self {
            api_url_template: config.api_url.clone(),
            agent: build_agent(config.timeout_secs),
            cache,
        }
    }

    /// 解析外部 API 返回的 JSON
    ///
    /// 兼容 ipapi.co（`country` / `country_code` / `error`）与
    /// ip-api.com（`countryCode` / `status: fail`）两种格式
    pub fn parse_response(json: &serde_json::Value) -> Option<GeoInfo> {
        if json["status"].as_str() == Some("fail") || json["error"].as_bool() == Some(true) {
            trace!("External API returned failure: {}", json);
            return None;
        }

        let country = json["countryCode"]
            .as_str()
            .or_else(|| json["country_code"].as_str())
            .or_else(|| json["country"].as_str())
            .map(String::from);

        let city = json["city"].as_str().map(String::from);

        if country.is_none() && city.is_none() {
            return None;
        }

        Some(GeoInfo { country, city })
    }

    /// 同步请求（在 spawn_blocking 中调用）
    fn fetch_from_api_sync(agent: Agent, url: String) -> Option<GeoInfo> {
        let resp = match agent.get(&url).call() {
            Ok(r) => r,
            Err(e) => {
                warn!("GeoIP API request to \"{}\" failed: {}", url, e);
                return None;
            }
        };

        let json: serde_json::Value = match resp.into_body().read_json() {
            Ok(j) => j,
            Err(e) => {
                warn!("GeoIP API response from \"{}\" parse failed: {}", url, e);
                return None;
            }
        };

        let info = Self::parse_response(&json);
        trace!("External API lookup {}: {:?}", url, info);
        info
    }

    async fn fetch_from_api(&self, ip: &str) -> Option<GeoInfo> {
        let url = self
            .api_url_template
            .replace("{ip}", &urlencoding::encode(ip));
        let agent = self.agent.clone();

        tokio::task::spawn_blocking(move || Self::fetch_from_api_sync(agent, url))
            .await
            .unwrap_or_else(|e| {
                warn!("GeoIP spawn_blocking failed: {}", e);
                None
            })
    }
}

#[async_trait]
impl GeoIpLookup for ExternalApiProvider {
    /// optionally_get_with 自带 singleflight 语义：同一 IP 的并发调用只发一次 HTTP，
    /// 返回 None 时不写入缓存
    async fn lookup(&self, ip: &str) -> Option<GeoInfo> {
        self.cache
            .optionally_get_with(ip.to_string(), async {
                trace!("GeoIP cache miss for {}, fetching from API", ip);
                self.fetch_from_api(ip).await
            })
            .await
    }

    fn name(&self) -> &'static str {
        "ExternalAPI"
    }
}
