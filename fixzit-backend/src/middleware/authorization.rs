// src/middleware/authorization.rs

use crate::domain::capability::{Action, Capability, Module};
use crate::middleware::auth::AuthenticatedUser;
use crate::utils::error_helper::{forbidden_error, unauthorized_error};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

/// ルートに要求する権限
#[derive(Clone, Copy, Debug)]
pub struct RequireCapability {
    pub capability: Capability,
}

impl RequireCapability {
    pub fn new(module: Module, action: Action) -> Self {
        Self {
            capability: Capability::new(module, action),
        }
    }
}

/// 権限チェックミドルウェアマクロ
///
/// ```ignore
/// .route("/vendors", post(create_vendor))
/// .route_layer(require_capability!(Module::Vendor, Action::Create))
/// ```
#[macro_export]
macro_rules! require_capability {
    ($module:expr, $action:expr) => {{
        use axum::middleware::from_fn_with_state;
        use $crate::middleware::authorization::{check_capability_with_state, RequireCapability};

        from_fn_with_state(
            RequireCapability::new($module, $action),
            check_capability_with_state,
        )
    }};
}

/// 状態を持つ権限チェックミドルウェア関数
pub async fn check_capability_with_state(
    State(required): State<RequireCapability>,
    req: Request,
    next: Next,
) -> Result<Response, Response> {
    check_capability(required, req, next).await
}

/// 認証ユーザーがいなければ401、権限がなければ403
pub async fn check_capability(
    required: RequireCapability,
    req: Request,
    next: Next,
) -> Result<Response, Response> {
    let user = req
        .extensions()
        .get::<AuthenticatedUser>()
        .cloned()
        .ok_or_else(|| {
            unauthorized_error(
                "No authenticated user found",
                "authorization::check_capability",
                "Authentication required",
            )
            .into_response()
        })?;

    if !user.can(required.capability) {
        return Err(forbidden_error(
            &format!("Missing capability {}", required.capability),
            "authorization::check_capability",
            Some(&user.user_id().to_string()),
        )
        .into_response());
    }

    debug!(
        user_id = %user.user_id(),
        capability = %required.capability,
        "Capability granted"
    );
    Ok(next.run(req).await)
}
