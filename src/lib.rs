pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod store;

use log::{info, warn};

pub use errors::{AppError, AppResult};
pub use models::{
    format_amount, Category, CreateCategoryDto, CreateServiceDto, CreateSubscriptionDto, Patch,
    Service, Subscription, SubscriptionView, UpdateSubscriptionDto,
};

/// ログシステムを初期化する
///
/// アプリケーション起動時に一度だけ呼び出すこと。
/// ログレベルは環境変数 LOG_LEVEL で制御する（既定はinfo）。
pub fn initialize_logging_system() {
    // ログレベルを設定
    let log_level = match std::env::var("LOG_LEVEL")
        .unwrap_or_default()
        .to_lowercase()
        .as_str()
    {
        "error" => log::LevelFilter::Error,
        "warn" => log::LevelFilter::Warn,
        "debug" => log::LevelFilter::Debug,
        "trace" => log::LevelFilter::Trace,
        _ => log::LevelFilter::Info,
    };

    // env_loggerを初期化
    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .format_timestamp_secs()
        .format_module_path(false)
        .format_target(false)
        .init();

    // 環境変数を読み込み（.envファイルがある場合）
    if dotenv::dotenv().is_err() {
        // .envファイルがない場合は無視（本番環境では環境変数が直接設定される）
        warn!(".envファイルが見つかりません。環境変数が直接設定されていることを確認してください。");
    } else {
        info!(".envファイルを読み込みました");
    }

    info!("ログシステムを初期化しました: level={log_level}");
}
