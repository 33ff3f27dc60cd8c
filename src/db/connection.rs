use crate::config::{get_data_directory, get_database_filename, get_environment};
use crate::db::migrations::run_migrations;
use crate::errors::{AppError, AppResult};
use once_cell::sync::OnceCell;
use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::Mutex;

/// プロセス全体で共有する単一のデータベース接続
///
/// デスクトップアプリのプロセスと同じ寿命を持つため、明示的なクローズは行わない。
static DATABASE: OnceCell<Mutex<Connection>> = OnceCell::new();

/// データベースファイルのパスを取得する
///
/// # 戻り値
/// データベースファイルのパス、または失敗時はエラー
///
/// データディレクトリが存在しない場合は作成する。
pub fn get_database_path() -> AppResult<PathBuf> {
    let data_dir = get_data_directory()?;

    // ディレクトリが存在しない場合は作成
    if !data_dir.exists() {
        std::fs::create_dir_all(&data_dir)?;
        log::info!(
            "アプリケーションデータディレクトリを作成しました: {:?}",
            data_dir
        );
    }

    let db_filename = get_database_filename(get_environment());
    Ok(data_dir.join(db_filename))
}

/// データベース接続を開き、マイグレーションを実行する
///
/// # 戻り値
/// データベース接続、または失敗時はエラー
fn open_database() -> AppResult<Connection> {
    let database_path = get_database_path()?;

    // データベース接続を開く
    let conn = Connection::open(&database_path)?;

    // テーブル作成と初期データ投入を実行
    run_migrations(&conn)?;

    log::info!("データベースを初期化しました: {:?}", database_path);

    Ok(conn)
}

/// 共有データベース接続に対して操作を実行する
///
/// # 引数
/// * `f` - 接続を受け取って実行する操作
///
/// # 戻り値
/// 操作の結果、または失敗時はエラー
///
/// 初回呼び出し時に接続を一度だけ開き、以降は同じ接続を再利用する。
/// 複数の呼び出し元が同時に初回アクセスしても、初期化は一度に収束する。
pub fn with_connection<T, F>(f: F) -> AppResult<T>
where
    F: FnOnce(&Connection) -> AppResult<T>,
{
    let database = DATABASE.get_or_try_init(|| open_database().map(Mutex::new))?;

    let conn = database
        .lock()
        .map_err(|e| AppError::concurrency(format!("データベースロックエラー: {e}")))?;

    f(&conn)
}
