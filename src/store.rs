//! UI層から呼び出されるストアAPI
//!
//! 各関数は共有データベース接続をロックし、対応するdb操作に委譲する。
//! 接続は初回呼び出し時に一度だけ開かれ、プロセス終了まで再利用される。

use crate::db::{
    category_operations, service_operations, subscription_operations, with_connection,
};
use crate::errors::AppResult;
use crate::models::{
    Category, CreateCategoryDto, CreateServiceDto, CreateSubscriptionDto, Service,
    SubscriptionView, UpdateSubscriptionDto,
};

/// カテゴリ一覧を取得する
///
/// # 戻り値
/// 名前昇順のカテゴリのリスト、または失敗時はエラー
pub fn get_all_categories() -> AppResult<Vec<Category>> {
    with_connection(category_operations::get_categories)
}

/// カテゴリを作成する
///
/// # 引数
/// * `dto` - カテゴリ作成用DTO
///
/// # 戻り値
/// 作成されたカテゴリのID、または失敗時はエラー
pub fn create_category(dto: CreateCategoryDto) -> AppResult<String> {
    with_connection(|conn| category_operations::create_category(conn, dto))
}

/// カテゴリを削除する
///
/// # 引数
/// * `id` - カテゴリID
///
/// # 戻り値
/// 成功時はOk(())、失敗時はエラー
pub fn delete_category(id: &str) -> AppResult<()> {
    with_connection(|conn| category_operations::delete_category(conn, id))
}

/// サービス一覧を取得する
///
/// # 戻り値
/// 名前昇順のサービスのリスト、または失敗時はエラー
pub fn get_all_services() -> AppResult<Vec<Service>> {
    with_connection(service_operations::get_services)
}

/// サービスを作成する
///
/// # 引数
/// * `dto` - サービス作成用DTO
///
/// # 戻り値
/// 作成されたサービスのID、または失敗時はエラー
pub fn create_service(dto: CreateServiceDto) -> AppResult<String> {
    with_connection(|conn| service_operations::create_service(conn, dto))
}

/// サービスを削除する
///
/// # 引数
/// * `id` - サービスID
///
/// # 戻り値
/// 成功時はOk(())、失敗時はエラー
pub fn delete_service(id: &str) -> AppResult<()> {
    with_connection(|conn| service_operations::delete_service(conn, id))
}

/// サブスクリプション一覧をビューとして取得する
///
/// # 戻り値
/// 次回請求日昇順のサブスクリプションビューのリスト、または失敗時はエラー
pub fn get_all_subscriptions() -> AppResult<Vec<SubscriptionView>> {
    with_connection(subscription_operations::get_subscriptions)
}

/// サブスクリプションを作成する
///
/// # 引数
/// * `dto` - サブスクリプション作成用DTO
///
/// # 戻り値
/// 作成されたサブスクリプションのID、または失敗時はエラー
pub fn create_subscription(dto: CreateSubscriptionDto) -> AppResult<String> {
    with_connection(|conn| subscription_operations::create_subscription(conn, dto))
}

/// サブスクリプションを部分更新する
///
/// # 引数
/// * `id` - サブスクリプションID
/// * `dto` - サブスクリプション部分更新用DTO
///
/// # 戻り値
/// 成功時はOk(())、失敗時はエラー
pub fn update_subscription(id: &str, dto: UpdateSubscriptionDto) -> AppResult<()> {
    with_connection(|conn| subscription_operations::update_subscription(conn, id, dto))
}

/// サブスクリプションを削除する
///
/// # 引数
/// * `id` - サブスクリプションID
///
/// # 戻り値
/// 成功時はOk(())、失敗時はエラー
pub fn delete_subscription(id: &str) -> AppResult<()> {
    with_connection(|conn| subscription_operations::delete_subscription(conn, id))
}
