// src/domain/tenant.rs

use crate::domain::role::RoleName;
use serde::Serialize;
use uuid::Uuid;

/// リクエストごとに解決されたテナント情報
///
/// `/api/fm/*` のハンドラーが抽出器として受け取り（権限チェックの後に解決される）、
/// リポジトリはこの `org_id` で必ず絞り込む。
#[derive(Debug, Clone, Serialize)]
pub struct TenantContext {
    pub user_id: Uuid,
    pub org_id: Uuid,
    pub role: RoleName,
    pub is_super_admin: bool,
}
