// src/domain/mod.rs

/// DBに文字列で保存する列挙型を定義する
///
/// `as_str` / `FromStr` / `Display` / `ALL` とserdeの相互変換を生成する。
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($variant:ident => $value:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $value)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value,)+
                }
            }

            /// 許容値をカンマ区切りで返す（エラーメッセージ用）
            pub fn allowed_values() -> String {
                [$($value),+].join(", ")
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($value => Ok($name::$variant),)+
                    other => Err(format!(
                        "invalid {} '{}', expected one of: {}",
                        stringify!($name),
                        other,
                        $name::allowed_values()
                    )),
                }
            }
        }
    };
}

pub mod audit_log_model;
pub mod billing_tier_model;
pub mod branding_model;
pub mod capability;
pub mod coupon_model;
pub mod feature_flag_model;
pub mod notification_model;
pub mod organization_model;
pub mod permission;
pub mod platform_setting_model;
pub mod pricing_benchmark_model;
pub mod role;
pub mod role_model;
pub mod scheduled_task_model;
pub mod subscription_model;
pub mod tenant;
pub mod user_model;
pub mod vendor_model;
pub mod webhook_model;
pub mod work_order_model;
