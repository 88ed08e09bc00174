//! # Data URL 编解码
//!
//! ## 设计思路
//!
//! 文件加载的产物是 `data:<mime>;base64,<payload>` 字符串；
//! 动态输入中的 blob 负载也允许以 Data URL 或纯 Base64 形式给出。
//! 两个方向集中在这里，避免在加载器里散落字符串拼接。
//!
//! ## 实现思路
//!
//! - 编码：标准 Base64 字母表，带填充。
//! - 解码：先按长度估算解码后体积，超限直接拒绝，再真正解码。

use base64::{Engine as _, engine::general_purpose};

use super::LoadError;

const BASE64_MARKER: &str = ";base64,";

/// 解析结果：声明的 MIME（纯 Base64 输入时为 `None`）与原始字节。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedDataUrl {
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

/// 将字节编码为 Data URL。
pub fn encode(mime: &str, bytes: &[u8]) -> String {
    let payload = general_purpose::STANDARD.encode(bytes);
    let mut out = String::with_capacity(5 + mime.len() + BASE64_MARKER.len() + payload.len());
    out.push_str("data:");
    out.push_str(mime);
    out.push_str(BASE64_MARKER);
    out.push_str(&payload);
    out
}

/// 解析 Data URL 或纯 Base64，不限制体积。
pub fn parse(data: &str) -> Result<DecodedDataUrl, LoadError> {
    parse_with_limit(data, u64::MAX)
}

fn estimate_decoded_upper_bound_len(base64_data: &str) -> Result<u64, LoadError> {
    let trimmed = base64_data.trim();
    let len = trimmed.len() as u64;
    // 末尾每个 `=` 少解出一个字节，最多两个
    let padding = trimmed.bytes().rev().take(2).take_while(|&b| b == b'=').count() as u64;
    let groups = len
        .checked_add(3)
        .ok_or_else(|| LoadError::InvalidData("base64 input length overflow".to_string()))?
        / 4;

    groups
        .checked_mul(3)
        .map(|upper| upper.saturating_sub(padding))
        .ok_or_else(|| LoadError::InvalidData("base64 decoded size overflow".to_string()))
}

/// 解析 Data URL 或纯 Base64，解码前按 `max_len` 估算体积。
pub fn parse_with_limit(data: &str, max_len: u64) -> Result<DecodedDataUrl, LoadError> {
    let normalized = data.trim();

    let (mime, payload) = match normalized.strip_prefix("data:") {
        Some(rest) => {
            let marker = rest
                .find(BASE64_MARKER)
                .ok_or_else(|| LoadError::InvalidData("data url is missing the base64 marker".to_string()))?;
            let mime = &rest[..marker];
            let mime = (!mime.is_empty()).then(|| mime.to_string());
            (mime, &rest[marker + BASE64_MARKER.len()..])
        }
        None => (None, normalized),
    };

    let estimated_len = estimate_decoded_upper_bound_len(payload)?;
    if estimated_len > max_len {
        return Err(LoadError::InvalidData(format!(
            "decoded payload would be about {} bytes (limit {} bytes)",
            estimated_len, max_len
        )));
    }

    let bytes = general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| LoadError::InvalidData(format!("base64 decode failed: {}", e)))?;

    Ok(DecodedDataUrl { mime, bytes })
}
