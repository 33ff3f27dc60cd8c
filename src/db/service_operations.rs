use crate::errors::AppResult;
use crate::models::{CreateServiceDto, Service};
use chrono::Utc;
use rusqlite::{params, Connection};
use uuid::Uuid;

/// サービス一覧を取得する
///
/// # 引数
/// * `conn` - データベース接続
///
/// # 戻り値
/// 名前昇順のサービスのリスト、または失敗時はエラー
pub fn get_services(conn: &Connection) -> AppResult<Vec<Service>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, icon_url, url, default_category_id, is_default, created_at, updated_at
         FROM services ORDER BY name ASC",
    )?;

    let services = stmt.query_map([], |row| {
        Ok(Service {
            id: row.get(0)?,
            name: row.get(1)?,
            icon_url: row.get(2)?,
            url: row.get(3)?,
            default_category_id: row.get(4)?,
            is_default: row.get::<_, i64>(5)? != 0,
            created_at: row.get(6)?,
            updated_at: row.get(7)?,
        })
    })?;

    Ok(services.collect::<Result<Vec<_>, _>>()?)
}

/// サービスを作成する
///
/// # 引数
/// * `conn` - データベース接続
/// * `dto` - サービス作成用DTO
///
/// # 戻り値
/// 作成されたサービスのID、または失敗時はエラー
///
/// default_category_idは弱参照であり、参照先カテゴリの存在は確認しない。
pub fn create_service(conn: &Connection, dto: CreateServiceDto) -> AppResult<String> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    conn.execute(
        "INSERT INTO services (id, name, icon_url, url, default_category_id, is_default, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6, ?7)",
        params![
            id,
            dto.name,
            dto.icon_url,
            dto.url,
            dto.default_category_id,
            now,
            now
        ],
    )?;

    Ok(id)
}

/// サービスを削除する
///
/// # 引数
/// * `conn` - データベース接続
/// * `id` - サービスID
///
/// # 戻り値
/// 成功時はOk(())、失敗時はエラー
///
/// 存在しないIDの場合も成功として扱う。参照しているサブスクリプションには
/// カスケードしない。
pub fn delete_service(conn: &Connection, id: &str) -> AppResult<()> {
    conn.execute("DELETE FROM services WHERE id = ?1", params![id])?;
    Ok(())
}
