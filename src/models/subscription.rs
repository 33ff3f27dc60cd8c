use super::patch::Patch;
use serde::{Deserialize, Serialize};

/// サブスクリプションデータモデル
///
/// 金額は丸め誤差を避けるため常に最小通貨単位（セント）の整数で保持する。
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Subscription {
    pub id: String,                        // UUID文字列
    pub service_id: Option<String>,        // サービスへの弱参照（整合性は保証しない）
    pub category_id: Option<String>,       // カテゴリへの弱参照（整合性は保証しない）
    pub custom_name: String,               // ユーザー定義の表示名
    pub amount_cents: i64,                 // 金額（最小通貨単位の整数）
    pub currency: String,                  // 3文字通貨コード
    pub billing_cycle: String,             // weekly / monthly / quarterly / semi_annually / yearly
    pub start_date: String,                // 契約開始日
    pub next_billing_date: Option<String>, // 次回請求日（計算はせず入力値をそのまま保持）
    pub payment_method: Option<String>,    // 支払い方法
    pub reminder_days: Option<i64>,        // リマインダー日数
    pub note: Option<String>,              // メモ
    pub is_active: bool,                   // 有効/無効
    pub cancelled_at: Option<String>,      // 解約日時
    pub created_at: String,                // RFC3339形式（UTC）
    pub updated_at: String,                // RFC3339形式（UTC）
}

/// サブスクリプション作成用DTO
///
/// custom_name / amount_cents / start_date は必須。省略可能なフィールドには
/// 既定値（currency="EUR"、billing_cycle="monthly"、reminder_days=0）が適用される。
/// is_active は作成時には指定できない（スキーマの既定値で有効になる）。
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateSubscriptionDto {
    pub service_id: Option<String>,
    pub category_id: Option<String>,
    pub custom_name: String,
    pub amount_cents: i64,
    pub currency: Option<String>,
    pub billing_cycle: Option<String>,
    pub start_date: String,
    pub next_billing_date: Option<String>,
    pub payment_method: Option<String>,
    pub reminder_days: Option<i64>,
    pub note: Option<String>,
}

/// サブスクリプション部分更新用DTO
///
/// 指定されたフィールドのみが更新対象になる。NULL許容カラムは
/// 「省略」と「明示的なnull」を区別するためPatchで表現する。
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct UpdateSubscriptionDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_name: Option<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub service_id: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub category_id: Patch<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_cents: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_cycle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub next_billing_date: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub payment_method: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub reminder_days: Patch<i64>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub note: Patch<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub cancelled_at: Patch<String>,
}

/// 一覧表示用のフラット化されたサブスクリプションビュー
///
/// services / categories をLEFT JOINした読み取り専用の射影。
/// 参照先が存在しない場合、結合フィールドはNULLになる（行は除外されない）。
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SubscriptionView {
    pub id: String,
    pub custom_name: String,
    pub service_name: Option<String>,
    pub service_icon_url: Option<String>,
    pub service_url: Option<String>,
    pub category_name: Option<String>,
    pub category_color: Option<String>,
    pub amount_cents: i64,
    pub currency: String,
    pub billing_cycle: String,
    pub start_date: String,
    pub next_billing_date: Option<String>,
    pub payment_method: Option<String>,
    pub reminder_days: Option<i64>,
    pub note: Option<String>,
    pub is_active: bool,
    pub cancelled_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl SubscriptionView {
    /// 表示名を取得する
    ///
    /// サービス名があればサービス名を、なければユーザー定義名を返す。
    /// 両方存在する場合は常にサービス名が優先される。
    pub fn display_name(&self) -> &str {
        self.service_name.as_deref().unwrap_or(&self.custom_name)
    }
}

/// セント単位の整数金額を小数点以下2桁の文字列に変換する
///
/// # 引数
/// * `cents` - 最小通貨単位の整数金額
///
/// # 戻り値
/// 小数点以下2桁の金額文字列（例: 1499 → "14.99"、-5 → "-0.05"）
///
/// 浮動小数点を経由せず整数演算のみで変換する。
pub fn format_amount(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}
