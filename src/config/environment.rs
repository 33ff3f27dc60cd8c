use crate::errors::{AppError, AppResult};
use std::path::PathBuf;

/// アプリケーションの実行環境を表す列挙型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// 開発環境
    Development,
    /// プロダクション環境
    Production,
}

/// 現在の実行環境を判定する
///
/// # 戻り値
/// 現在の実行環境（Development または Production）
///
/// # 判定ロジック
/// 1. コンパイル時埋め込み環境変数を最優先
/// 2. 実行時環境変数 ENVIRONMENT を確認
/// 3. デバッグビルドの場合は Development
/// 4. リリースビルドの場合は Production
pub fn get_environment() -> Environment {
    // コンパイル時埋め込み環境変数を最優先
    if let Some(embedded_env) = option_env!("EMBEDDED_ENVIRONMENT") {
        return match embedded_env {
            "production" => Environment::Production,
            _ => Environment::Development,
        };
    }

    // 実行時環境変数を確認
    if let Ok(env_var) = std::env::var("ENVIRONMENT") {
        return match env_var.as_str() {
            "production" => Environment::Production,
            _ => Environment::Development,
        };
    }

    // フォールバック: ビルド設定に基づく判定
    if cfg!(debug_assertions) {
        Environment::Development
    } else {
        Environment::Production
    }
}

/// 環境に応じたデータベースファイル名を取得する
///
/// # 引数
/// * `env` - 実行環境
///
/// # 戻り値
/// データベースファイル名
///
/// # ファイル名の規則
/// - 開発環境: "dev_siphon.db"
/// - プロダクション環境: "siphon.db"
pub fn get_database_filename(env: Environment) -> &'static str {
    match env {
        Environment::Development => "dev_siphon.db",
        Environment::Production => "siphon.db",
    }
}

/// アプリケーションデータディレクトリを取得する
///
/// # 戻り値
/// データベースファイルを配置するディレクトリのパス、または失敗時はエラー
///
/// # 決定ロジック
/// 1. 環境変数 SIPHON_DATA_DIR が設定されていればそれを使用
/// 2. それ以外はOS標準のデータディレクトリ配下の "siphon"
pub fn get_data_directory() -> AppResult<PathBuf> {
    // 環境変数による明示的な上書きを最優先
    if let Ok(dir) = std::env::var("SIPHON_DATA_DIR") {
        return Ok(PathBuf::from(dir));
    }

    let base_dir = dirs::data_dir()
        .ok_or_else(|| AppError::configuration("OSのデータディレクトリを取得できません"))?;

    Ok(base_dir.join("siphon"))
}
