use serde::{Deserialize, Serialize};

/// サービス（既知のサブスクリプション提供元）データモデル
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Service {
    pub id: String,                          // UUID文字列
    pub name: String,                        // サービス名（一意）
    pub icon_url: Option<String>,            // アイコン画像URL
    pub url: Option<String>,                 // サービスサイトURL
    pub default_category_id: Option<String>, // 既定カテゴリへの弱参照（整合性は保証しない）
    pub is_default: bool,                    // システム標準サービスかどうか
    pub created_at: String,                  // RFC3339形式（UTC）
    pub updated_at: String,                  // RFC3339形式（UTC）
}

/// サービス作成用DTO
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateServiceDto {
    pub name: String,
    pub icon_url: Option<String>,
    pub url: Option<String>,
    pub default_category_id: Option<String>,
}
