// src/repository/settings_repository.rs
use crate::domain::branding_model::{
    ActiveModel as BrandingActiveModel, Entity as BrandingEntity, Model as BrandingModel,
    BRANDING_ROW_ID,
};
use crate::domain::platform_setting_model::{
    self, ActiveModel as SettingActiveModel, Entity as SettingEntity, Model as SettingModel,
};
use sea_orm::{entity::*, query::*, DbConn, DbErr};

/// プラットフォーム設定とブランディング
#[derive(Clone)]
pub struct SettingsRepository {
    db: DbConn,
}

impl SettingsRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    pub async fn find_all(&self) -> Result<Vec<SettingModel>, DbErr> {
        SettingEntity::find()
            .order_by_asc(platform_setting_model::Column::Key)
            .all(&self.db)
            .await
    }

    pub async fn find_by_key(&self, key: &str) -> Result<Option<SettingModel>, DbErr> {
        SettingEntity::find_by_id(key.to_string()).one(&self.db).await
    }

    pub async fn insert_setting(&self, setting: SettingActiveModel) -> Result<SettingModel, DbErr> {
        setting.insert(&self.db).await
    }

    pub async fn update_setting(&self, setting: SettingActiveModel) -> Result<SettingModel, DbErr> {
        setting.update(&self.db).await
    }

    pub async fn delete_setting(&self, key: &str) -> Result<u64, DbErr> {
        let result = SettingEntity::delete_by_id(key.to_string())
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }

    pub async fn find_branding(&self) -> Result<Option<BrandingModel>, DbErr> {
        BrandingEntity::find_by_id(BRANDING_ROW_ID).one(&self.db).await
    }

    pub async fn insert_branding(
        &self,
        branding: BrandingActiveModel,
    ) -> Result<BrandingModel, DbErr> {
        branding.insert(&self.db).await
    }

    pub async fn update_branding(
        &self,
        branding: BrandingActiveModel,
    ) -> Result<BrandingModel, DbErr> {
        branding.update(&self.db).await
    }
}
