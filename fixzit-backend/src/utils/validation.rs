// src/utils/validation.rs

//! DTOで共通利用するカスタムバリデーション

use crate::domain::capability::Capability;
use crate::domain::webhook_model::WebhookEvent;
use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidationError;

pub static SLUG_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+(?:[-_][a-z0-9]+)*$").expect("Invalid slug regex"));

pub static HEX_COLOR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("Invalid hex color regex")
});

pub static SETTING_KEY_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9_.]{1,63}$").expect("Invalid setting key regex"));

pub static PHONE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9 ()-]{6,20}$").expect("Invalid phone regex"));

fn error_with(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

pub fn validate_slug(value: &str) -> Result<(), ValidationError> {
    if value.len() > 64 || !SLUG_REGEX.is_match(value) {
        return Err(error_with(
            "invalid_slug",
            "must contain only lowercase letters, digits, '-' or '_'",
        ));
    }
    Ok(())
}

pub fn validate_hex_color(value: &str) -> Result<(), ValidationError> {
    if !HEX_COLOR_REGEX.is_match(value) {
        return Err(error_with(
            "invalid_color",
            "must be a hex colour such as #1a2b3c",
        ));
    }
    Ok(())
}

pub fn validate_setting_key(value: &str) -> Result<(), ValidationError> {
    if !SETTING_KEY_REGEX.is_match(value) {
        return Err(error_with(
            "invalid_setting_key",
            "must start with a letter and contain only a-z, 0-9, '_' or '.'",
        ));
    }
    Ok(())
}

pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    if !PHONE_REGEX.is_match(value) {
        return Err(error_with("invalid_phone", "must be a valid phone number"));
    }
    Ok(())
}

/// http/https のURLのみ許可
pub fn validate_http_url(value: &str) -> Result<(), ValidationError> {
    let lower = value.to_ascii_lowercase();
    let rest = lower
        .strip_prefix("https://")
        .or_else(|| lower.strip_prefix("http://"));
    match rest {
        Some(host) if !host.is_empty() && !host.starts_with('/') && !value.contains(' ') => Ok(()),
        _ => Err(error_with("invalid_url", "must be an http or https URL")),
    }
}

/// `MODULE:ACTION` 形式の権限文字列の配列を検証
pub fn validate_capability_list(values: &[String]) -> Result<(), ValidationError> {
    if values.is_empty() {
        return Err(error_with(
            "empty_permissions",
            "at least one permission is required",
        ));
    }
    if values.iter().any(|v| v.parse::<Capability>().is_err()) {
        return Err(error_with(
            "invalid_permission",
            "permissions must use the MODULE:ACTION format with known modules and actions",
        ));
    }
    Ok(())
}

/// 既知のイベント名のみ、1件以上
pub fn validate_webhook_events(values: &[String]) -> Result<(), ValidationError> {
    if values.is_empty() {
        return Err(error_with("empty_events", "at least one event is required"));
    }
    if values.iter().any(|v| v.parse::<WebhookEvent>().is_err()) {
        return Err(error_with(
            "unknown_event",
            "events must be chosen from the webhook event catalogue",
        ));
    }
    Ok(())
}

// cron各フィールドの許容範囲（分 時 日 月 曜日）
const CRON_FIELD_RANGES: [(u32, u32); 5] = [(0, 59), (0, 23), (1, 31), (1, 12), (0, 7)];

fn parse_cron_value(raw: &str, min: u32, max: u32) -> Option<u32> {
    let value: u32 = raw.parse().ok()?;
    (min..=max).contains(&value).then_some(value)
}

fn validate_cron_part(part: &str, min: u32, max: u32) -> bool {
    let (range, step) = match part.split_once('/') {
        Some((range, step)) => match step.parse::<u32>() {
            Ok(step) if step >= 1 && step <= max.max(1) => (range, Some(step)),
            _ => return false,
        },
        None => (part, None),
    };

    if range == "*" {
        return true;
    }

    match range.split_once('-') {
        Some((start, end)) => match (
            parse_cron_value(start, min, max),
            parse_cron_value(end, min, max),
        ) {
            (Some(start), Some(end)) => start <= end,
            _ => false,
        },
        // 単一値にステップは付けられない
        None => step.is_none() && parse_cron_value(range, min, max).is_some(),
    }
}

/// 5フィールドのcron式を検証する
pub fn is_valid_cron(expression: &str) -> bool {
    let fields: Vec<&str> = expression.split_whitespace().collect();
    if fields.len() != 5 {
        return false;
    }

    fields
        .iter()
        .zip(CRON_FIELD_RANGES.iter())
        .all(|(field, (min, max))| {
            field
                .split(',')
                .all(|part| !part.is_empty() && validate_cron_part(part, *min, *max))
        })
}

pub fn validate_cron_expression(value: &str) -> Result<(), ValidationError> {
    if !is_valid_cron(value) {
        return Err(error_with(
            "invalid_cron",
            "must be a 5-field cron expression (minute hour day month weekday)",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug() {
        assert!(validate_slug("acme-facilities").is_ok());
        assert!(validate_slug("tier_pro").is_ok());
        assert!(validate_slug("Acme").is_err());
        assert!(validate_slug("-acme").is_err());
        assert!(validate_slug("a b").is_err());
    }

    #[test]
    fn test_hex_color() {
        assert!(validate_hex_color("#fff").is_ok());
        assert!(validate_hex_color("#0061A8").is_ok());
        assert!(validate_hex_color("0061A8").is_err());
        assert!(validate_hex_color("#12345").is_err());
    }

    #[test]
    fn test_setting_key() {
        assert!(validate_setting_key("billing.currency").is_ok());
        assert!(validate_setting_key("a").is_err());
        assert!(validate_setting_key("1abc").is_err());
        assert!(validate_setting_key("Upper").is_err());
    }

    #[test]
    fn test_http_url() {
        assert!(validate_http_url("https://hooks.example.com/fixzit").is_ok());
        assert!(validate_http_url("http://127.0.0.1:9/hook").is_ok());
        assert!(validate_http_url("ftp://example.com").is_err());
        assert!(validate_http_url("https://").is_err());
    }

    #[test]
    fn test_webhook_events() {
        assert!(validate_webhook_events(&["work_order.created".to_string()]).is_ok());
        assert!(validate_webhook_events(&[]).is_err());
        assert!(validate_webhook_events(&["order.shipped".to_string()]).is_err());
    }

    #[test]
    fn test_capability_list() {
        assert!(validate_capability_list(&["VENDOR:VIEW".to_string()]).is_ok());
        assert!(validate_capability_list(&[]).is_err());
        assert!(validate_capability_list(&["VENDOR:FLY".to_string()]).is_err());
        assert!(validate_capability_list(&["vendor".to_string()]).is_err());
    }

    #[test]
    fn test_cron() {
        assert!(is_valid_cron("0 2 * * *"));
        assert!(is_valid_cron("*/15 * * * 1-5"));
        assert!(is_valid_cron("0 0 1,15 * 0"));
        assert!(is_valid_cron("0-30/5 9-17 * 1-12 *"));
        assert!(!is_valid_cron("0 2 * *"));
        assert!(!is_valid_cron("60 * * * *"));
        assert!(!is_valid_cron("0 24 * * *"));
        assert!(!is_valid_cron("0 0 0 * *"));
        assert!(!is_valid_cron("5/2 * * * *"));
        assert!(!is_valid_cron("*/0 * * * *"));
        assert!(!is_valid_cron("10-5 * * * *"));
    }
}
