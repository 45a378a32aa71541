use serde::{Deserialize, Serialize};

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 静态配置（从 TOML 加载，启动时使用）
///
/// - server: 监听地址、端口、worker 数量、可信代理
/// - logging: 日志配置
/// - upstream: 规则服务与默认跳转服务
/// - geoip: 地理位置查询
/// - challenge: 人机验证
/// - features: 杂项（根路径跳转）
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub geoip: GeoIpConfig,
    #[serde(default)]
    pub challenge: ChallengeConfig,
    #[serde(default)]
    pub features: FeaturesConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > config.toml > 默认值
    /// ENV 前缀：LG，分隔符：__
    /// 示例：LG__SERVER__PORT=9999
    pub fn load(path: Option<&str>) -> Self {
        use config::{Config, Environment, File};

        let path = path.unwrap_or(DEFAULT_CONFIG_PATH);

        let builder = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("LG")
                    .separator("__")
                    .try_parsing(true),
            );

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<StaticConfig>() {
                Ok(config) => {
                    if std::path::Path::new(path).exists() {
                        eprintln!("[INFO] Configuration loaded from: {}", path);
                    }
                    config
                }
                Err(e) => {
                    eprintln!("[ERROR] Failed to deserialize config: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("[ERROR] Failed to build config: {}", e);
                Self::default()
            }
        }
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> crate::errors::Result<()> {
        let content = toml::to_string_pretty(self)?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_cpu_count")]
    pub cpu_count: usize,
    /// Proxies whose X-Forwarded-For / X-Real-IP headers are believed.
    /// Entries are single IPs or CIDRs. Empty = trust private peers only.
    #[serde(default)]
    pub trusted_proxies: Vec<String>,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

/// 上游服务配置
///
/// URL 模板使用 `{code}` 作为短码占位符（会做 URL 编码）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_rules_url")]
    pub rules_url: String,
    #[serde(default = "default_redirect_url")]
    pub redirect_url: String,
    #[serde(default = "default_upstream_timeout")]
    pub timeout_secs: u64,
    /// Initial bearer token for upstream calls
    #[serde(default)]
    pub api_token: Option<String>,
}

/// GeoIP 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoIpConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// MaxMindDB 文件路径 (GeoLite2-City.mmdb)
    /// 如果配置且文件可读，使用本地解析；否则 fallback 到外部 API
    #[serde(default)]
    pub maxminddb_path: Option<String>,
    /// 外部 GeoIP API URL，使用 {ip} 作为占位符
    #[serde(default = "default_geoip_api_url")]
    pub api_url: String,
    #[serde(default = "default_geoip_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_geoip_cache_ttl")]
    pub cache_ttl_secs: u64,
    #[serde(default = "default_geoip_cache_capacity")]
    pub cache_capacity: u64,
}

/// 人机验证配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengeConfig {
    #[serde(default = "default_operand_min")]
    pub operand_min: i64,
    #[serde(default = "default_operand_max")]
    pub operand_max: i64,
    /// Pending challenges untouched for this long are forgotten
    #[serde(default = "default_challenge_idle_ttl")]
    pub idle_ttl_secs: u64,
    #[serde(default = "default_challenge_max_pending")]
    pub max_pending: u64,
}

/// 杂项功能配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeaturesConfig {
    /// Where `/` redirects to
    #[serde(default = "default_root_url")]
    pub default_url: String,
}

// ============================================================
// Default value functions for static config
// ============================================================

fn default_true() -> bool {
    true
}

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_cpu_count() -> usize {
    num_cpus::get()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

fn default_rules_url() -> String {
    "http://localhost:3104/api/v1/redirect/shortlink/{code}".to_string()
}

fn default_redirect_url() -> String {
    "http://localhost:3104/api/v1/redirect/r/{code}".to_string()
}

fn default_upstream_timeout() -> u64 {
    5
}

fn default_geoip_api_url() -> String {
    "https://ipapi.co/{ip}/json/".to_string()
}

fn default_geoip_timeout() -> u64 {
    2
}

fn default_geoip_cache_ttl() -> u64 {
    15 * 60
}

fn default_geoip_cache_capacity() -> u64 {
    10_000
}

fn default_operand_min() -> i64 {
    1
}

fn default_operand_max() -> i64 {
    10
}

fn default_challenge_idle_ttl() -> u64 {
    10 * 60
}

fn default_challenge_max_pending() -> u64 {
    100_000
}

fn default_root_url() -> String {
    "https://example.com/".to_string()
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            cpu_count: default_cpu_count(),
            trusted_proxies: Vec::new(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            rules_url: default_rules_url(),
            redirect_url: default_redirect_url(),
            timeout_secs: default_upstream_timeout(),
            api_token: None,
        }
    }
}

impl Default for GeoIpConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            maxminddb_path: None,
            api_url: default_geoip_api_url(),
            timeout_secs: default_geoip_timeout(),
            cache_ttl_secs: default_geoip_cache_ttl(),
            cache_capacity: default_geoip_cache_capacity(),
        }
    }
}

impl Default for ChallengeConfig {
    fn default() -> Self {
        Self {
            operand_min: default_operand_min(),
            operand_max: default_operand_max(),
            idle_ttl_secs: default_challenge_idle_ttl(),
            max_pending: default_challenge_max_pending(),
        }
    }
}

impl ChallengeConfig {
    /// Operand range, tolerating a reversed min/max in the file.
    pub fn operand_range(&self) -> std::ops::RangeInclusive<i64> {
        let lo = self.operand_min.min(self.operand_max);
        let hi = self.operand_min.max(self.operand_max);
        lo..=hi
    }
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        Self {
            default_url: default_root_url(),
        }
    }
}
