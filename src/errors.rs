use std::fmt;

#[derive(Debug, Clone)]
pub enum LinkgateError {
    RulesFetch(String),
    DestinationFetch(String),
    DestinationNotFound(String),
    InvalidShortCode(String),
    Serialization(String),
    Config(String),
    FileOperation(String),
}

impl LinkgateError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            LinkgateError::RulesFetch(_) => "E001",
            LinkgateError::DestinationFetch(_) => "E002",
            LinkgateError::DestinationNotFound(_) => "E003",
            LinkgateError::InvalidShortCode(_) => "E004",
            LinkgateError::Serialization(_) => "E005",
            LinkgateError::Config(_) => "E006",
            LinkgateError::FileOperation(_) => "E007",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            LinkgateError::RulesFetch(_) => "Rules Fetch Error",
            LinkgateError::DestinationFetch(_) => "Destination Fetch Error",
            LinkgateError::DestinationNotFound(_) => "Destination Not Found",
            LinkgateError::InvalidShortCode(_) => "Invalid Short Code",
            LinkgateError::Serialization(_) => "Serialization Error",
            LinkgateError::Config(_) => "Configuration Error",
            LinkgateError::FileOperation(_) => "File Operation Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            LinkgateError::RulesFetch(msg)
            | LinkgateError::DestinationFetch(msg)
            | LinkgateError::DestinationNotFound(msg)
            | LinkgateError::InvalidShortCode(msg)
            | LinkgateError::Serialization(msg)
            | LinkgateError::Config(msg)
            | LinkgateError::FileOperation(msg) => msg,
        }
    }

    /// True when the code leads nowhere (unknown upstream or malformed),
    /// as opposed to an upstream being unreachable.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            LinkgateError::DestinationNotFound(_) | LinkgateError::InvalidShortCode(_)
        )
    }

    /// 格式化为彩色输出（用于 Server 模式）
    #[cfg(feature = "server")]
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出（用于 CLI 模式）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for LinkgateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for LinkgateError {}

// 便捷的构造函数
impl LinkgateError {
    pub fn rules_fetch<T: Into<String>>(msg: T) -> Self {
        LinkgateError::RulesFetch(msg.into())
    }

    pub fn destination_fetch<T: Into<String>>(msg: T) -> Self {
        LinkgateError::DestinationFetch(msg.into())
    }

    pub fn destination_not_found<T: Into<String>>(msg: T) -> Self {
        LinkgateError::DestinationNotFound(msg.into())
    }

    pub fn invalid_short_code<T: Into<String>>(msg: T) -> Self {
        LinkgateError::InvalidShortCode(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        LinkgateError::Serialization(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        LinkgateError::Config(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        LinkgateError::FileOperation(msg.into())
    }
}

impl From<std::io::Error> for LinkgateError {
    fn from(err: std::io::Error) -> Self {
        LinkgateError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for LinkgateError {
    fn from(err: serde_json::Error) -> Self {
        LinkgateError::Serialization(err.to_string())
    }
}

impl From<toml::ser::Error> for LinkgateError {
    fn from(err: toml::ser::Error) -> Self {
        LinkgateError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LinkgateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct() {
        let errors = [
            LinkgateError::rules_fetch("a"),
            LinkgateError::destination_fetch("a"),
            LinkgateError::destination_not_found("a"),
            LinkgateError::invalid_short_code("a"),
            LinkgateError::serialization("a"),
            LinkgateError::config("a"),
            LinkgateError::file_operation("a"),
        ];
        let mut codes: Vec<_> = errors.iter().map(|e| e.code()).collect();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_format_simple() {
        let err = LinkgateError::rules_fetch("connection refused");
        assert_eq!(
            err.format_simple(),
            "Rules Fetch Error: connection refused"
        );
        assert_eq!(err.to_string(), err.format_simple());
    }

    #[test]
    fn test_is_not_found() {
        assert!(LinkgateError::destination_not_found("abc").is_not_found());
        assert!(!LinkgateError::destination_fetch("abc").is_not_found());
    }

    #[test]
    fn test_from_serde_json() {
        let err: LinkgateError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert_eq!(err.code(), "E005");
    }
}
