// src/utils/password.rs

use crate::config::PasswordHashConfig;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingError(argon2::password_hash::Error),

    #[error("Argon2 parameter error: {0}")]
    Argon2Error(#[from] argon2::Error),

    #[error("Weak password: {0}")]
    WeakPassword(String),
}

/// パスワード強度要件
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub max_length: usize,
    pub require_uppercase: bool,
    pub require_lowercase: bool,
    pub require_digit: bool,
    pub require_special: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 10,
            max_length: 128,
            require_uppercase: true,
            require_lowercase: true,
            require_digit: true,
            require_special: true,
        }
    }
}

const SPECIAL_CHARS: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?";

/// パスワードハッシュマネージャー（Argon2id）
pub struct PasswordManager {
    argon2: Argon2<'static>,
    policy: PasswordPolicy,
    /// 存在しないアカウントの照合に使う同一パラメータのハッシュ
    dummy_hash: String,
}

impl PasswordManager {
    pub fn new(config: &PasswordHashConfig, policy: PasswordPolicy) -> Result<Self, PasswordError> {
        let params = argon2::Params::new(
            config.memory_cost,
            config.time_cost,
            config.parallelism,
            Some(32),
        )?;
        let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);
        let salt = SaltString::generate(&mut OsRng);
        let dummy_hash = argon2
            .hash_password(b"fixzit-unknown-account", &salt)
            .map_err(PasswordError::HashingError)?
            .to_string();

        Ok(Self {
            argon2,
            policy,
            dummy_hash,
        })
    }

    /// 強度チェックの上でハッシュ化
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.validate_password_strength(password)?;
        self.hash_unchecked(password)
    }

    /// 強度チェックなしでハッシュ化（ブートストラップ用ツール向け）
    pub fn hash_unchecked(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(PasswordError::HashingError)?;
        Ok(hash.to_string())
    }

    /// パスワードを検証。ハッシュ自体が壊れている場合はエラー
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash = PasswordHash::new(hash).map_err(PasswordError::HashingError)?;

        match self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
        {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordError::HashingError(e)),
        }
    }

    /// アカウントが存在しない場合も同じコストで照合し、応答時間の差をなくす
    pub fn verify_against_dummy(&self, password: &str) {
        if let Err(e) = self.verify_password(password, &self.dummy_hash) {
            warn!(error = %e, "Dummy password verification failed");
        }
    }

    pub fn validate_password_strength(&self, password: &str) -> Result<(), PasswordError> {
        let mut errors = Vec::new();
        let length = password.chars().count();

        if length < self.policy.min_length {
            errors.push(format!(
                "Password must be at least {} characters long",
                self.policy.min_length
            ));
        }
        if length > self.policy.max_length {
            errors.push(format!(
                "Password must be no more than {} characters long",
                self.policy.max_length
            ));
        }
        if self.policy.require_uppercase && !password.chars().any(|c| c.is_uppercase()) {
            errors.push("Password must contain at least one uppercase letter".to_string());
        }
        if self.policy.require_lowercase && !password.chars().any(|c| c.is_lowercase()) {
            errors.push("Password must contain at least one lowercase letter".to_string());
        }
        if self.policy.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
            errors.push("Password must contain at least one digit".to_string());
        }
        if self.policy.require_special && !password.chars().any(|c| SPECIAL_CHARS.contains(c)) {
            errors.push("Password must contain at least one special character".to_string());
        }

        if !errors.is_empty() {
            return Err(PasswordError::WeakPassword(errors.join("; ")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> PasswordManager {
        let config = PasswordHashConfig {
            memory_cost: 4096,
            time_cost: 1,
            parallelism: 1,
        };
        PasswordManager::new(&config, PasswordPolicy::default()).unwrap()
    }

    #[test]
    fn test_hash_and_verify() {
        let manager = manager();
        let hash = manager.hash_password("Str0ng!Passw0rd").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(manager.verify_password("Str0ng!Passw0rd", &hash).unwrap());
        assert!(!manager.verify_password("wrong-password", &hash).unwrap());
    }

    #[test]
    fn test_weak_password_rejected() {
        let manager = manager();
        match manager.hash_password("short") {
            Err(PasswordError::WeakPassword(msg)) => {
                assert!(msg.contains("at least 10 characters"));
                assert!(msg.contains("uppercase"));
            }
            other => panic!("Expected WeakPassword, got {:?}", other),
        }
    }

    #[test]
    fn test_dummy_hash_uses_same_cost_parameters() {
        let manager = manager();
        let hash = manager.hash_unchecked("anything").unwrap();
        let params = |h: &str| h.rsplitn(3, '$').nth(2).unwrap().to_string();
        assert_eq!(params(&manager.dummy_hash), params(&hash));
        assert!(!manager
            .verify_password("anything", &manager.dummy_hash)
            .unwrap());
        manager.verify_against_dummy("anything");
    }

    #[test]
    fn test_malformed_hash_is_error() {
        assert!(manager().verify_password("x", "not-a-hash").is_err());
    }
}
