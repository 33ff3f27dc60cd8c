use crate::errors::AppResult;
use crate::models::{Category, CreateCategoryDto};
use chrono::Utc;
use rusqlite::{params, Connection};
use uuid::Uuid;

/// カテゴリ一覧を取得する
///
/// # 引数
/// * `conn` - データベース接続
///
/// # 戻り値
/// 名前昇順のカテゴリのリスト、または失敗時はエラー
pub fn get_categories(conn: &Connection) -> AppResult<Vec<Category>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, color, is_default, created_at, updated_at
         FROM categories ORDER BY name ASC",
    )?;

    let categories = stmt.query_map([], |row| {
        Ok(Category {
            id: row.get(0)?,
            name: row.get(1)?,
            color: row.get(2)?,
            is_default: row.get::<_, i64>(3)? != 0,
            created_at: row.get(4)?,
            updated_at: row.get(5)?,
        })
    })?;

    Ok(categories.collect::<Result<Vec<_>, _>>()?)
}

/// カテゴリを作成する
///
/// # 引数
/// * `conn` - データベース接続
/// * `dto` - カテゴリ作成用DTO
///
/// # 戻り値
/// 作成されたカテゴリのID、または失敗時はエラー
///
/// ユーザー作成のカテゴリは常にis_default = 0で挿入される。
pub fn create_category(conn: &Connection, dto: CreateCategoryDto) -> AppResult<String> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    conn.execute(
        "INSERT INTO categories (id, name, color, is_default, created_at, updated_at)
         VALUES (?1, ?2, ?3, 0, ?4, ?5)",
        params![id, dto.name, dto.color, now, now],
    )?;

    Ok(id)
}

/// カテゴリを削除する
///
/// # 引数
/// * `conn` - データベース接続
/// * `id` - カテゴリID
///
/// # 戻り値
/// 成功時はOk(())、失敗時はエラー
///
/// 存在しないIDの場合も成功として扱う。参照しているサブスクリプションには
/// カスケードしない。
pub fn delete_category(conn: &Connection, id: &str) -> AppResult<()> {
    conn.execute("DELETE FROM categories WHERE id = ?1", params![id])?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::errors::AppError;

    fn setup_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    #[test]
    fn test_create_and_get_category() {
        let conn = setup_connection();

        let id = create_category(
            &conn,
            CreateCategoryDto {
                name: "Streaming".to_string(),
                color: Some("#FF0000".to_string()),
            },
        )
        .unwrap();

        let categories = get_categories(&conn).unwrap();
        let created = categories.iter().find(|c| c.id == id).unwrap();

        assert_eq!(created.name, "Streaming");
        assert_eq!(created.color, Some("#FF0000".to_string()));
        // ユーザー作成のカテゴリは標準カテゴリ扱いにならない
        assert!(!created.is_default);
        // 作成時はcreated_atとupdated_atが同じタイムスタンプになる
        assert_eq!(created.created_at, created.updated_at);
    }

    #[test]
    fn test_create_category_without_color() {
        let conn = setup_connection();

        let id = create_category(
            &conn,
            CreateCategoryDto {
                name: "Uncolored".to_string(),
                color: None,
            },
        )
        .unwrap();

        let categories = get_categories(&conn).unwrap();
        let created = categories.iter().find(|c| c.id == id).unwrap();
        assert_eq!(created.color, None);
    }

    #[test]
    fn test_get_categories_sorted_by_name() {
        let conn = setup_connection();

        // 初期データ込みで名前昇順になっていることを確認
        let categories = get_categories(&conn).unwrap();
        let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[test]
    fn test_get_categories_empty_table() {
        let conn = setup_connection();

        // 全行削除後は空のリストが返る（エラーにはならない）
        conn.execute("DELETE FROM categories", []).unwrap();
        let categories = get_categories(&conn).unwrap();
        assert!(categories.is_empty());
    }

    #[test]
    fn test_duplicate_name_is_rejected() {
        let conn = setup_connection();

        // nameカラムのUNIQUE制約に違反するとデータベースエラーになる
        let result = create_category(
            &conn,
            CreateCategoryDto {
                name: "Entertainment".to_string(),
                color: None,
            },
        );
        assert!(matches!(result, Err(AppError::Database(_))));
    }

    #[test]
    fn test_delete_category_is_idempotent() {
        let conn = setup_connection();

        let id = create_category(
            &conn,
            CreateCategoryDto {
                name: "Temporary".to_string(),
                color: None,
            },
        )
        .unwrap();

        // 1回目の削除で行が消え、2回目もエラーにならない
        delete_category(&conn, &id).unwrap();
        delete_category(&conn, &id).unwrap();

        let categories = get_categories(&conn).unwrap();
        assert!(!categories.iter().any(|c| c.id == id));
    }
}
