use crate::errors::AppResult;
use crate::models::{CreateSubscriptionDto, SubscriptionView, UpdateSubscriptionDto};
use chrono::Utc;
use rusqlite::{params, params_from_iter, Connection, ToSql};
use uuid::Uuid;

/// 通貨コードの既定値
const DEFAULT_CURRENCY: &str = "EUR";

/// 支払いサイクルの既定値
const DEFAULT_BILLING_CYCLE: &str = "monthly";

/// リマインダー日数の既定値
const DEFAULT_REMINDER_DAYS: i64 = 0;

/// サブスクリプションを作成する
///
/// # 引数
/// * `conn` - データベース接続
/// * `dto` - サブスクリプション作成用DTO
///
/// # 戻り値
/// 作成されたサブスクリプションのID、または失敗時はエラー
///
/// 省略されたフィールドには既定値（currency="EUR"、billing_cycle="monthly"、
/// reminder_days=0）が適用される。is_activeは挿入時に指定せず、
/// スキーマの既定値（有効）に任せる。
pub fn create_subscription(conn: &Connection, dto: CreateSubscriptionDto) -> AppResult<String> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    conn.execute(
        "INSERT INTO subscriptions
            (id, service_id, category_id, custom_name, amount_cents, currency,
             billing_cycle, start_date, next_billing_date, payment_method,
             reminder_days, note, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        params![
            id,
            dto.service_id,
            dto.category_id,
            dto.custom_name,
            dto.amount_cents,
            dto.currency
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            dto.billing_cycle
                .unwrap_or_else(|| DEFAULT_BILLING_CYCLE.to_string()),
            dto.start_date,
            dto.next_billing_date,
            dto.payment_method,
            dto.reminder_days.unwrap_or(DEFAULT_REMINDER_DAYS),
            dto.note,
            now,
            now,
        ],
    )?;

    Ok(id)
}

/// 代入リストにカラムの更新を追加する
fn push_assignment(
    assignments: &mut Vec<String>,
    values: &mut Vec<Box<dyn ToSql>>,
    column: &str,
    value: Box<dyn ToSql>,
) {
    assignments.push(format!("{} = ?{}", column, values.len() + 1));
    values.push(value);
}

/// サブスクリプションを部分更新する
///
/// # 引数
/// * `conn` - データベース接続
/// * `id` - サブスクリプションID
/// * `dto` - サブスクリプション部分更新用DTO
///
/// # 戻り値
/// 成功時はOk(())、失敗時はエラー
///
/// DTOで指定されたフィールドのみを固定順で代入リストに積み、
/// 単一のUPDATE文として実行する。省略されたフィールドは既存値を保持する。
/// updated_atは指定フィールドの有無にかかわらず必ず更新される。
/// 該当するIDがない場合は何もせず成功する（削除と同じ冪等なセマンティクス）。
pub fn update_subscription(
    conn: &Connection,
    id: &str,
    dto: UpdateSubscriptionDto,
) -> AppResult<()> {
    let now = Utc::now().to_rfc3339();

    let mut assignments: Vec<String> = Vec::new();
    let mut values: Vec<Box<dyn ToSql>> = Vec::new();

    if let Some(custom_name) = dto.custom_name {
        push_assignment(
            &mut assignments,
            &mut values,
            "custom_name",
            Box::new(custom_name),
        );
    }
    if let Some(service_id) = dto.service_id.into_update_value() {
        push_assignment(
            &mut assignments,
            &mut values,
            "service_id",
            Box::new(service_id),
        );
    }
    if let Some(category_id) = dto.category_id.into_update_value() {
        push_assignment(
            &mut assignments,
            &mut values,
            "category_id",
            Box::new(category_id),
        );
    }
    if let Some(amount_cents) = dto.amount_cents {
        push_assignment(
            &mut assignments,
            &mut values,
            "amount_cents",
            Box::new(amount_cents),
        );
    }
    if let Some(currency) = dto.currency {
        push_assignment(&mut assignments, &mut values, "currency", Box::new(currency));
    }
    if let Some(billing_cycle) = dto.billing_cycle {
        push_assignment(
            &mut assignments,
            &mut values,
            "billing_cycle",
            Box::new(billing_cycle),
        );
    }
    if let Some(start_date) = dto.start_date {
        push_assignment(
            &mut assignments,
            &mut values,
            "start_date",
            Box::new(start_date),
        );
    }
    if let Some(next_billing_date) = dto.next_billing_date.into_update_value() {
        push_assignment(
            &mut assignments,
            &mut values,
            "next_billing_date",
            Box::new(next_billing_date),
        );
    }
    if let Some(payment_method) = dto.payment_method.into_update_value() {
        push_assignment(
            &mut assignments,
            &mut values,
            "payment_method",
            Box::new(payment_method),
        );
    }
    if let Some(reminder_days) = dto.reminder_days.into_update_value() {
        push_assignment(
            &mut assignments,
            &mut values,
            "reminder_days",
            Box::new(reminder_days),
        );
    }
    if let Some(note) = dto.note.into_update_value() {
        push_assignment(&mut assignments, &mut values, "note", Box::new(note));
    }
    if let Some(is_active) = dto.is_active {
        push_assignment(
            &mut assignments,
            &mut values,
            "is_active",
            Box::new(is_active),
        );
    }
    if let Some(cancelled_at) = dto.cancelled_at.into_update_value() {
        push_assignment(
            &mut assignments,
            &mut values,
            "cancelled_at",
            Box::new(cancelled_at),
        );
    }

    // 指定フィールドがゼロ件でもupdated_atだけは更新する
    push_assignment(&mut assignments, &mut values, "updated_at", Box::new(now));

    let sql = format!(
        "UPDATE subscriptions SET {} WHERE id = ?{}",
        assignments.join(", "),
        values.len() + 1
    );
    values.push(Box::new(id.to_string()));

    conn.execute(
        &sql,
        params_from_iter(values.iter().map(|value| value.as_ref())),
    )?;

    Ok(())
}

/// サブスクリプションを削除する
///
/// # 引数
/// * `conn` - データベース接続
/// * `id` - サブスクリプションID
///
/// # 戻り値
/// 成功時はOk(())、失敗時はエラー
///
/// 存在しないIDの場合も成功として扱う。
pub fn delete_subscription(conn: &Connection, id: &str) -> AppResult<()> {
    conn.execute("DELETE FROM subscriptions WHERE id = ?1", params![id])?;
    Ok(())
}

/// サブスクリプション一覧をビューとして取得する
///
/// # 引数
/// * `conn` - データベース接続
///
/// # 戻り値
/// 次回請求日昇順のサブスクリプションビューのリスト、または失敗時はエラー
///
/// services / categoriesをLEFT JOINするため、参照先が削除済みまたは未設定の
/// サブスクリプションも除外されず、結合フィールドがNULLになる。
/// 並び順はnext_billing_date昇順で、NULLは先頭に来る（SQLiteの既定順序）。
pub fn get_subscriptions(conn: &Connection) -> AppResult<Vec<SubscriptionView>> {
    let mut stmt = conn.prepare(
        "SELECT
            sub.id,
            sub.custom_name,
            svc.name        AS service_name,
            svc.icon_url    AS service_icon_url,
            svc.url         AS service_url,
            cat.name        AS category_name,
            cat.color       AS category_color,
            sub.amount_cents,
            sub.currency,
            sub.billing_cycle,
            sub.start_date,
            sub.next_billing_date,
            sub.payment_method,
            sub.reminder_days,
            sub.note,
            sub.is_active,
            sub.cancelled_at,
            sub.created_at,
            sub.updated_at
         FROM subscriptions sub
         LEFT JOIN services   svc ON sub.service_id  = svc.id
         LEFT JOIN categories cat ON sub.category_id = cat.id
         ORDER BY sub.next_billing_date ASC",
    )?;

    let views = stmt.query_map([], |row| {
        Ok(SubscriptionView {
            id: row.get(0)?,
            custom_name: row.get(1)?,
            service_name: row.get(2)?,
            service_icon_url: row.get(3)?,
            service_url: row.get(4)?,
            category_name: row.get(5)?,
            category_color: row.get(6)?,
            amount_cents: row.get(7)?,
            currency: row.get(8)?,
            billing_cycle: row.get(9)?,
            start_date: row.get(10)?,
            next_billing_date: row.get(11)?,
            payment_method: row.get(12)?,
            reminder_days: row.get(13)?,
            note: row.get(14)?,
            is_active: row.get::<_, i64>(15)? != 0,
            cancelled_at: row.get(16)?,
            created_at: row.get(17)?,
            updated_at: row.get(18)?,
        })
    })?;

    Ok(views.collect::<Result<Vec<_>, _>>()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::category_operations::create_category;
    use crate::db::migrations::run_migrations;
    use crate::db::service_operations::{create_service, delete_service};
    use crate::models::{
        CreateCategoryDto, CreateServiceDto, Patch, Subscription,
    };
    use std::collections::HashSet;

    fn setup_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn minimal_dto(custom_name: &str) -> CreateSubscriptionDto {
        CreateSubscriptionDto {
            service_id: None,
            category_id: None,
            custom_name: custom_name.to_string(),
            amount_cents: 1499,
            currency: None,
            billing_cycle: None,
            start_date: "2024-01-01".to_string(),
            next_billing_date: None,
            payment_method: None,
            reminder_days: None,
            note: None,
        }
    }

    fn get_subscription_row(conn: &Connection, id: &str) -> Subscription {
        conn.query_row(
            "SELECT id, service_id, category_id, custom_name, amount_cents, currency,
                    billing_cycle, start_date, next_billing_date, payment_method,
                    reminder_days, note, is_active, cancelled_at, created_at, updated_at
             FROM subscriptions WHERE id = ?1",
            params![id],
            |row| {
                Ok(Subscription {
                    id: row.get(0)?,
                    service_id: row.get(1)?,
                    category_id: row.get(2)?,
                    custom_name: row.get(3)?,
                    amount_cents: row.get(4)?,
                    currency: row.get(5)?,
                    billing_cycle: row.get(6)?,
                    start_date: row.get(7)?,
                    next_billing_date: row.get(8)?,
                    payment_method: row.get(9)?,
                    reminder_days: row.get(10)?,
                    note: row.get(11)?,
                    is_active: row.get::<_, i64>(12)? != 0,
                    cancelled_at: row.get(13)?,
                    created_at: row.get(14)?,
                    updated_at: row.get(15)?,
                })
            },
        )
        .unwrap()
    }

    #[test]
    fn test_create_applies_defaults() {
        let conn = setup_connection();

        let id = create_subscription(&conn, minimal_dto("Netflix")).unwrap();
        let views = get_subscriptions(&conn).unwrap();
        assert_eq!(views.len(), 1);

        let view = &views[0];
        assert_eq!(view.id, id);
        assert_eq!(view.custom_name, "Netflix");
        assert_eq!(view.amount_cents, 1499);
        assert_eq!(view.start_date, "2024-01-01");
        // 省略されたフィールドには既定値が適用される
        assert_eq!(view.currency, "EUR");
        assert_eq!(view.billing_cycle, "monthly");
        assert_eq!(view.reminder_days, Some(0));
        // is_activeはスキーマの既定値で有効になる
        assert!(view.is_active);
        assert_eq!(view.next_billing_date, None);
        assert_eq!(view.cancelled_at, None);
        assert_eq!(view.created_at, view.updated_at);
    }

    #[test]
    fn test_create_with_explicit_values() {
        let conn = setup_connection();

        let dto = CreateSubscriptionDto {
            currency: Some("USD".to_string()),
            billing_cycle: Some("yearly".to_string()),
            next_billing_date: Some("2025-01-01".to_string()),
            payment_method: Some("card".to_string()),
            reminder_days: Some(7),
            note: Some("annual plan".to_string()),
            ..minimal_dto("iCloud+")
        };
        let id = create_subscription(&conn, dto).unwrap();

        let row = get_subscription_row(&conn, &id);
        assert_eq!(row.currency, "USD");
        assert_eq!(row.billing_cycle, "yearly");
        assert_eq!(row.next_billing_date, Some("2025-01-01".to_string()));
        assert_eq!(row.payment_method, Some("card".to_string()));
        assert_eq!(row.reminder_days, Some(7));
        assert_eq!(row.note, Some("annual plan".to_string()));
    }

    #[test]
    fn test_id_uniqueness_across_entities() {
        let conn = setup_connection();

        // 連続作成したIDがすべて異なることを確認（エンティティ種別混在）
        let mut ids = HashSet::new();
        for i in 0..10 {
            ids.insert(create_subscription(&conn, minimal_dto(&format!("Sub {i}"))).unwrap());
            ids.insert(
                create_category(
                    &conn,
                    CreateCategoryDto {
                        name: format!("Category {i}"),
                        color: None,
                    },
                )
                .unwrap(),
            );
            ids.insert(
                create_service(
                    &conn,
                    CreateServiceDto {
                        name: format!("Service {i}"),
                        icon_url: None,
                        url: None,
                        default_category_id: None,
                    },
                )
                .unwrap(),
            );
        }
        assert_eq!(ids.len(), 30);
    }

    #[test]
    fn test_partial_update_keeps_omitted_fields() {
        let conn = setup_connection();

        let dto = CreateSubscriptionDto {
            payment_method: Some("card".to_string()),
            note: Some("a".to_string()),
            ..minimal_dto("Spotify")
        };
        let id = create_subscription(&conn, dto).unwrap();
        let before = get_subscription_row(&conn, &id);

        // noteだけを更新する
        let update = UpdateSubscriptionDto {
            note: Patch::Value("b".to_string()),
            ..UpdateSubscriptionDto::default()
        };
        update_subscription(&conn, &id, update).unwrap();

        let after = get_subscription_row(&conn, &id);
        assert_eq!(after.note, Some("b".to_string()));
        // 省略されたフィールドは変更されない
        assert_eq!(after.payment_method, Some("card".to_string()));
        assert_eq!(after.custom_name, "Spotify");
        assert_eq!(after.amount_cents, 1499);
        // created_atは不変、updated_atは更新される
        assert_eq!(after.created_at, before.created_at);
        assert_ne!(after.updated_at, before.updated_at);
    }

    #[test]
    fn test_update_with_explicit_null_clears_field() {
        let conn = setup_connection();

        let dto = CreateSubscriptionDto {
            next_billing_date: Some("2025-06-01".to_string()),
            note: Some("keep me".to_string()),
            ..minimal_dto("Disney+")
        };
        let id = create_subscription(&conn, dto).unwrap();

        // 明示的なnull指定はNULLを設定し、省略とは区別される
        let update = UpdateSubscriptionDto {
            next_billing_date: Patch::Null,
            ..UpdateSubscriptionDto::default()
        };
        update_subscription(&conn, &id, update).unwrap();

        let row = get_subscription_row(&conn, &id);
        assert_eq!(row.next_billing_date, None);
        assert_eq!(row.note, Some("keep me".to_string()));
    }

    #[test]
    fn test_update_with_empty_dto_touches_updated_at_only() {
        let conn = setup_connection();

        let id = create_subscription(&conn, minimal_dto("GitHub Pro")).unwrap();
        let before = get_subscription_row(&conn, &id);

        update_subscription(&conn, &id, UpdateSubscriptionDto::default()).unwrap();

        let after = get_subscription_row(&conn, &id);
        assert_ne!(after.updated_at, before.updated_at);
        assert_eq!(after.custom_name, before.custom_name);
        assert_eq!(after.amount_cents, before.amount_cents);
        assert_eq!(after.note, before.note);
        assert_eq!(after.created_at, before.created_at);
    }

    #[test]
    fn test_update_nonexistent_id_is_noop() {
        let conn = setup_connection();

        create_subscription(&conn, minimal_dto("Notion")).unwrap();

        // 存在しないIDの更新はエラーにならず、他の行にも影響しない
        let update = UpdateSubscriptionDto {
            custom_name: Some("Renamed".to_string()),
            ..UpdateSubscriptionDto::default()
        };
        update_subscription(&conn, "sub-nonexistent", update).unwrap();

        let views = get_subscriptions(&conn).unwrap();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].custom_name, "Notion");
    }

    #[test]
    fn test_update_soft_cancellation_fields() {
        let conn = setup_connection();

        let id = create_subscription(&conn, minimal_dto("Xbox Game Pass")).unwrap();

        // is_activeとcancelled_atは汎用の部分更新で設定する
        let update = UpdateSubscriptionDto {
            is_active: Some(false),
            cancelled_at: Patch::Value("2025-02-01T00:00:00+00:00".to_string()),
            ..UpdateSubscriptionDto::default()
        };
        update_subscription(&conn, &id, update).unwrap();

        let row = get_subscription_row(&conn, &id);
        assert!(!row.is_active);
        assert_eq!(
            row.cancelled_at,
            Some("2025-02-01T00:00:00+00:00".to_string())
        );
    }

    #[test]
    fn test_delete_subscription_is_idempotent() {
        let conn = setup_connection();

        let id = create_subscription(&conn, minimal_dto("Dropbox")).unwrap();

        // 2回連続で削除しても2回目は失敗しない
        delete_subscription(&conn, &id).unwrap();
        delete_subscription(&conn, &id).unwrap();

        let views = get_subscriptions(&conn).unwrap();
        assert!(views.is_empty());
    }

    #[test]
    fn test_view_preserves_rows_without_service() {
        let conn = setup_connection();

        // service_idなしのサブスクリプションもビューから除外されない
        let id = create_subscription(&conn, minimal_dto("Local Gym")).unwrap();

        let views = get_subscriptions(&conn).unwrap();
        let view = views.iter().find(|v| v.id == id).unwrap();
        assert_eq!(view.service_name, None);
        assert_eq!(view.service_icon_url, None);
        assert_eq!(view.service_url, None);
        assert_eq!(view.category_name, None);
        assert_eq!(view.display_name(), "Local Gym");
    }

    #[test]
    fn test_view_resolves_service_and_category() {
        let conn = setup_connection();

        let dto = CreateSubscriptionDto {
            service_id: Some("svc-netflix".to_string()),
            category_id: Some("cat-entertainment".to_string()),
            ..minimal_dto("My Netflix")
        };
        let id = create_subscription(&conn, dto).unwrap();

        let views = get_subscriptions(&conn).unwrap();
        let view = views.iter().find(|v| v.id == id).unwrap();
        assert_eq!(view.service_name, Some("Netflix".to_string()));
        assert_eq!(
            view.service_icon_url,
            Some("https://logo.clearbit.com/netflix.com".to_string())
        );
        assert_eq!(view.category_name, Some("Entertainment".to_string()));
        assert_eq!(view.category_color, Some("#E74C3C".to_string()));
        // サービス名がユーザー定義名より優先される
        assert_eq!(view.display_name(), "Netflix");
    }

    #[test]
    fn test_view_yields_null_for_dangling_reference() {
        let conn = setup_connection();

        let dto = CreateSubscriptionDto {
            service_id: Some("svc-todoist".to_string()),
            ..minimal_dto("My Todoist")
        };
        let id = create_subscription(&conn, dto).unwrap();

        // 参照先サービスを削除しても行は残り、結合フィールドがNULLになる
        delete_service(&conn, "svc-todoist").unwrap();

        let views = get_subscriptions(&conn).unwrap();
        let view = views.iter().find(|v| v.id == id).unwrap();
        assert_eq!(view.service_name, None);
        assert_eq!(view.display_name(), "My Todoist");

        // 行自体のservice_idは触らない（カスケードしない）
        let row = get_subscription_row(&conn, &id);
        assert_eq!(row.service_id, Some("svc-todoist".to_string()));
    }

    #[test]
    fn test_view_ordered_by_next_billing_date_nulls_first() {
        let conn = setup_connection();

        let late = CreateSubscriptionDto {
            next_billing_date: Some("2025-03-01".to_string()),
            ..minimal_dto("Late")
        };
        let early = CreateSubscriptionDto {
            next_billing_date: Some("2025-01-01".to_string()),
            ..minimal_dto("Early")
        };
        let undated = minimal_dto("Undated");

        create_subscription(&conn, late).unwrap();
        create_subscription(&conn, early).unwrap();
        create_subscription(&conn, undated).unwrap();

        // next_billing_date昇順、NULLは先頭
        let views = get_subscriptions(&conn).unwrap();
        let names: Vec<&str> = views.iter().map(|v| v.custom_name.as_str()).collect();
        assert_eq!(names, vec!["Undated", "Early", "Late"]);

        // 繰り返し呼んでも並び順は安定している
        let views_again = get_subscriptions(&conn).unwrap();
        let names_again: Vec<&str> = views_again
            .iter()
            .map(|v| v.custom_name.as_str())
            .collect();
        assert_eq!(names, names_again);
    }
}
