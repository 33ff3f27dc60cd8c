use serde::{Deserialize, Serialize};

/// カテゴリデータモデル
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Category {
    pub id: String,            // UUID文字列
    pub name: String,          // カテゴリ名（一意）
    pub color: Option<String>, // 表示色（HEX文字列）
    pub is_default: bool,      // システム標準カテゴリかどうか
    pub created_at: String,    // RFC3339形式（UTC）
    pub updated_at: String,    // RFC3339形式（UTC）
}

/// カテゴリ作成用DTO
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateCategoryDto {
    pub name: String,
    pub color: Option<String>,
}
