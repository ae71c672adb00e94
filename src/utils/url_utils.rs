// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use thiserror::Error;
use url::Url;

/// URL验证错误类型
#[derive(Error, Debug)]
pub enum UrlValidationError {
    /// URL无效
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    /// 不支持的协议
    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),
}

/// 将裸主机名补全为完整的扫描URL
///
/// 用户经常只输入 `example.com` 这样的主机名，
/// 在提交给编排器之前统一补上 `https://` 前缀。
pub fn normalize_scan_url(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}

/// 验证扫描目标URL
///
/// 编排器只接受绝对的 http/https URL，其余一律拒绝。
pub fn validate_scan_url(url: &str) -> Result<Url, UrlValidationError> {
    let parsed = Url::parse(url).map_err(|e| UrlValidationError::InvalidUrl(e.to_string()))?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(UrlValidationError::UnsupportedScheme(
            parsed.scheme().to_string(),
        ));
    }

    if parsed.host_str().is_none() {
        return Err(UrlValidationError::InvalidUrl("missing host".to_string()));
    }

    Ok(parsed)
}
