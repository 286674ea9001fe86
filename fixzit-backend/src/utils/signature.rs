// src/utils/signature.rs

//! Webhook署名（HMAC-SHA256）

use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_HEADER: &str = "X-Fixzit-Signature";

/// `sha256=<hex>` 形式の署名を生成
pub fn sign_payload(secret: &str, payload: &[u8]) -> String {
    // HMACは任意長のキーを受け付けるため new_from_slice は失敗しない
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return String::new(),
    };
    mac.update(payload);
    format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
}

/// 32バイトのランダムなシークレット（hex）
pub fn generate_secret() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// 一覧表示用に先頭4文字以外を伏せる
pub fn mask_secret(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    format!("{}{}", visible, "*".repeat(12))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_payload() {
        let signature = sign_payload("secret", b"{\"event\":\"test\"}");
        assert!(signature.starts_with("sha256="));
        assert_eq!(signature.len(), "sha256=".len() + 64);
        assert_eq!(signature, sign_payload("secret", b"{\"event\":\"test\"}"));
        assert_ne!(signature, sign_payload("other", b"{\"event\":\"test\"}"));
        assert_ne!(signature, sign_payload("secret", b"tampered"));
    }

    #[test]
    fn test_generate_secret_is_hex() {
        let secret = generate_secret();
        assert_eq!(secret.len(), 64);
        assert!(secret.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(secret, generate_secret());
    }

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret("abcdef123456"), "abcd************");
    }
}
