// src/middleware/rate_limit.rs

use crate::config::RateLimitSettings;
use crate::error::AppError;
use crate::middleware::auth::extract_client_ip;
use axum::{
    extract::{Request, State},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::Mutex;
use tracing::warn;

pub const RATE_LIMIT_LIMIT_HEADER: &str = "x-ratelimit-limit";
pub const RATE_LIMIT_REMAINING_HEADER: &str = "x-ratelimit-remaining";

/// ルートグループごとの制限
#[derive(Debug, Clone)]
pub struct RateLimitPolicy {
    pub name: &'static str,
    pub max_requests: u32,
    pub window: Duration,
}

impl RateLimitPolicy {
    pub fn auth(settings: &RateLimitSettings) -> Self {
        Self {
            name: "auth",
            max_requests: settings.auth_max_requests,
            window: Duration::from_secs(settings.window_seconds),
        }
    }

    pub fn superadmin(settings: &RateLimitSettings) -> Self {
        Self {
            name: "superadmin",
            max_requests: settings.superadmin_max_requests,
            window: Duration::from_secs(settings.window_seconds),
        }
    }

    pub fn api(settings: &RateLimitSettings) -> Self {
        Self {
            name: "api",
            max_requests: settings.api_max_requests,
            window: Duration::from_secs(settings.window_seconds),
        }
    }
}

/// クライアントごとの固定ウィンドウ
#[derive(Debug, Clone)]
struct WindowState {
    count: u32,
    window_start: Instant,
    window: Duration,
}

/// 判定結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed { limit: u32, remaining: u32 },
    Limited { retry_after_secs: u64 },
}

/// インメモリの固定ウィンドウ・レートリミッタ
#[derive(Clone, Default)]
pub struct RateLimiter {
    windows: Arc<Mutex<HashMap<(&'static str, String), WindowState>>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn check(&self, policy: &RateLimitPolicy, client_key: &str) -> RateLimitDecision {
        self.check_at(policy, client_key, Instant::now()).await
    }

    async fn check_at(
        &self,
        policy: &RateLimitPolicy,
        client_key: &str,
        now: Instant,
    ) -> RateLimitDecision {
        let mut windows = self.windows.lock().await;
        let state = windows
            .entry((policy.name, client_key.to_string()))
            .or_insert_with(|| WindowState {
                count: 0,
                window_start: now,
                window: policy.window,
            });

        // ウィンドウが終了している場合はリセット
        if now.duration_since(state.window_start) >= policy.window {
            state.count = 0;
            state.window_start = now;
            state.window = policy.window;
        }

        if state.count >= policy.max_requests {
            let elapsed = now.duration_since(state.window_start);
            let remaining = policy.window.saturating_sub(elapsed);
            // 端数は切り上げ、最低1秒
            let retry_after_secs = remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0);
            return RateLimitDecision::Limited {
                retry_after_secs: retry_after_secs.max(1),
            };
        }

        state.count += 1;
        RateLimitDecision::Allowed {
            limit: policy.max_requests,
            remaining: policy.max_requests - state.count,
        }
    }

    /// 期限切れのウィンドウを削除し、削除件数を返す
    pub async fn prune_expired(&self) -> usize {
        self.prune_expired_at(Instant::now()).await
    }

    async fn prune_expired_at(&self, now: Instant) -> usize {
        let mut windows = self.windows.lock().await;
        let before = windows.len();
        windows.retain(|_, state| now.duration_since(state.window_start) < state.window);
        before - windows.len()
    }

    pub async fn tracked_clients(&self) -> usize {
        self.windows.lock().await.len()
    }
}

/// `from_fn_with_state` に渡す状態
#[derive(Clone)]
pub struct RateLimitState {
    pub limiter: RateLimiter,
    pub policy: RateLimitPolicy,
}

impl RateLimitState {
    pub fn new(limiter: RateLimiter, policy: RateLimitPolicy) -> Self {
        Self { limiter, policy }
    }
}

/// レート制限ミドルウェア（認証より前に実行する）
pub async fn rate_limit_middleware(
    State(state): State<RateLimitState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let client_key = extract_client_ip(request.headers()).unwrap_or_else(|| "unknown".to_string());

    match state.limiter.check(&state.policy, &client_key).await {
        RateLimitDecision::Limited { retry_after_secs } => {
            warn!(
                policy = state.policy.name,
                client = %client_key,
                path = %request.uri().path(),
                retry_after_secs,
                "Rate limit exceeded"
            );
            Err(AppError::TooManyRequests {
                message: "Too many requests. Please try again later.".to_string(),
                retry_after_secs,
            })
        }
        RateLimitDecision::Allowed { limit, remaining } => {
            let mut response = next.run(request).await;
            let headers = response.headers_mut();
            headers.insert(RATE_LIMIT_LIMIT_HEADER, HeaderValue::from(limit));
            headers.insert(RATE_LIMIT_REMAINING_HEADER, HeaderValue::from(remaining));
            Ok(response)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(max_requests: u32) -> RateLimitPolicy {
        RateLimitPolicy {
            name: "test",
            max_requests,
            window: Duration::from_secs(60),
        }
    }

    #[tokio::test]
    async fn test_limits_after_max_requests() {
        let limiter = RateLimiter::new();
        let policy = policy(2);
        let now = Instant::now();

        assert_eq!(
            limiter.check_at(&policy, "10.0.0.1", now).await,
            RateLimitDecision::Allowed {
                limit: 2,
                remaining: 1
            }
        );
        assert_eq!(
            limiter.check_at(&policy, "10.0.0.1", now).await,
            RateLimitDecision::Allowed {
                limit: 2,
                remaining: 0
            }
        );
        assert_eq!(
            limiter
                .check_at(&policy, "10.0.0.1", now + Duration::from_secs(20))
                .await,
            RateLimitDecision::Limited {
                retry_after_secs: 40
            }
        );

        // 別クライアントは独立
        assert!(matches!(
            limiter.check_at(&policy, "10.0.0.2", now).await,
            RateLimitDecision::Allowed { .. }
        ));
    }

    #[tokio::test]
    async fn test_window_resets() {
        let limiter = RateLimiter::new();
        let policy = policy(1);
        let now = Instant::now();

        limiter.check_at(&policy, "client", now).await;
        assert!(matches!(
            limiter.check_at(&policy, "client", now).await,
            RateLimitDecision::Limited { .. }
        ));
        assert!(matches!(
            limiter
                .check_at(&policy, "client", now + Duration::from_secs(60))
                .await,
            RateLimitDecision::Allowed { .. }
        ));
    }

    #[tokio::test]
    async fn test_policies_are_counted_separately() {
        let limiter = RateLimiter::new();
        let auth = RateLimitPolicy {
            name: "auth",
            ..policy(1)
        };
        let api = RateLimitPolicy {
            name: "api",
            ..policy(1)
        };
        let now = Instant::now();

        limiter.check_at(&auth, "client", now).await;
        assert!(matches!(
            limiter.check_at(&api, "client", now).await,
            RateLimitDecision::Allowed { .. }
        ));
    }

    #[tokio::test]
    async fn test_prune_expired() {
        let limiter = RateLimiter::new();
        let policy = policy(5);
        let now = Instant::now();

        limiter.check_at(&policy, "a", now).await;
        limiter
            .check_at(&policy, "b", now + Duration::from_secs(30))
            .await;
        assert_eq!(limiter.tracked_clients().await, 2);

        let removed = limiter
            .prune_expired_at(now + Duration::from_secs(61))
            .await;
        assert_eq!(removed, 1);
        assert_eq!(limiter.tracked_clients().await, 1);
    }
}
