//! 配置校验模块
//!
//! 校验规则：
//! - sink name 非空且唯一
//! - 最多一个 pub/sub sink
//! - pub/sub topic 非空
//! - HTTP sink URL 为绝对 http/https 地址
//! - HTTP 超时 >= 1 秒

use std::collections::HashSet;

use contracts::{ContractError, SinkTarget, UploaderConfig};
use url::Url;
use validator::Validate;

/// 校验 UploaderConfig 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(config: &UploaderConfig) -> Result<(), ContractError> {
    validate_fields(config)?;
    validate_sink_names(config)?;
    validate_pub_sub_count(config)?;
    validate_targets(config)?;
    Ok(())
}

/// 派生规则 (validator)
fn validate_fields(config: &UploaderConfig) -> Result<(), ContractError> {
    config
        .validate()
        .map_err(|e| ContractError::config_validation("sinks", e.to_string()))
}

/// 校验 sink name 唯一性
fn validate_sink_names(config: &UploaderConfig) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for sink in &config.sinks {
        if !seen.insert(sink.name.as_str()) {
            return Err(ContractError::config_validation(
                format!("sinks[name={}]", sink.name),
                "duplicate sink name",
            ));
        }
    }
    Ok(())
}

/// 只允许一个 pub/sub sink
fn validate_pub_sub_count(config: &UploaderConfig) -> Result<(), ContractError> {
    let count = config.sinks.iter().filter(|s| s.target.is_pub_sub()).count();
    if count > 1 {
        return Err(ContractError::config_validation(
            "sinks",
            format!("at most one pub_sub sink is allowed, found {count}"),
        ));
    }
    Ok(())
}

/// 校验各 sink 目标参数
fn validate_targets(config: &UploaderConfig) -> Result<(), ContractError> {
    for (idx, sink) in config.sinks.iter().enumerate() {
        match &sink.target {
            SinkTarget::PubSub { topic } => {
                if topic.trim().is_empty() {
                    return Err(ContractError::config_validation(
                        format!("sinks[{idx}].topic"),
                        "topic cannot be empty",
                    ));
                }
            }
            SinkTarget::Http { url, timeout_secs } => {
                validate_http_url(url)
                    .map_err(|msg| ContractError::config_validation(format!("sinks[{idx}].url"), msg))?;
                if *timeout_secs == 0 {
                    return Err(ContractError::config_validation(
                        format!("sinks[{idx}].timeout_secs"),
                        "timeout_secs must be >= 1",
                    ));
                }
            }
        }
    }
    Ok(())
}

fn validate_http_url(raw: &str) -> Result<(), String> {
    let url = Url::parse(raw).map_err(|e| format!("invalid url '{raw}': {e}"))?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(format!("unsupported scheme '{other}' in '{raw}'")),
    }
    if url.host_str().is_none() {
        return Err(format!("url '{raw}' has no host"));
    }
    // the ingest path is appended to the base as text
    if url.query().is_some() || url.fragment().is_some() {
        return Err(format!("url '{raw}' must not have a query or fragment"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{SessionConfig, SinkConfig};

    fn minimal_config() -> UploaderConfig {
        UploaderConfig {
            session: SessionConfig::default(),
            sinks: vec![
                SinkConfig {
                    name: "public".into(),
                    target: SinkTarget::pub_sub(),
                },
                SinkConfig {
                    name: "private".into(),
                    target: SinkTarget::http("http://localhost:8080/"),
                },
            ],
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(validate(&minimal_config()).is_ok());
    }

    #[test]
    fn test_no_sinks_is_valid() {
        assert!(validate(&UploaderConfig::default()).is_ok());
    }

    #[test]
    fn test_duplicate_sink_name() {
        let mut config = minimal_config();
        config.sinks[1].name = "public".into();
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("duplicate sink name"), "got: {err}");
    }

    #[test]
    fn test_two_pub_sub_sinks() {
        let mut config = minimal_config();
        config.sinks.push(SinkConfig {
            name: "public2".into(),
            target: SinkTarget::pub_sub(),
        });
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("at most one pub_sub"), "got: {err}");
    }

    #[test]
    fn test_empty_topic() {
        let mut config = minimal_config();
        config.sinks[0].target = SinkTarget::PubSub {
            topic: " ".into(),
        };
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("topic cannot be empty"), "got: {err}");
    }

    #[test]
    fn test_invalid_url() {
        let mut config = minimal_config();
        config.sinks[1].target = SinkTarget::http("not a url");
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("invalid url"), "got: {err}");

        config.sinks[1].target = SinkTarget::http("ftp://host/base");
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("unsupported scheme"), "got: {err}");
    }

    #[test]
    fn test_url_with_query_or_fragment() {
        let mut config = minimal_config();
        for url in ["http://h/base?k=v", "http://h/base#top", "http://h/?"] {
            config.sinks[1].target = SinkTarget::http(url);
            let err = validate(&config).unwrap_err().to_string();
            assert!(err.contains("query or fragment"), "{url}: {err}");
        }
    }

    #[test]
    fn test_zero_timeout() {
        let mut config = minimal_config();
        config.sinks[1].target = SinkTarget::Http {
            url: "http://localhost".into(),
            timeout_secs: 0,
        };
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("timeout_secs"), "got: {err}");
    }

    #[test]
    fn test_empty_sink_name() {
        let mut config = minimal_config();
        config.sinks[0].name = String::new();
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("cannot be empty"), "got: {err}");
    }
}
