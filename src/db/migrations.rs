use crate::errors::AppResult;
use rusqlite::Connection;

/// すべてのデータベースマイグレーションを実行する
///
/// # 引数
/// * `conn` - データベース接続
///
/// # 戻り値
/// 成功時はOk(())、失敗時はエラー
///
/// 何度実行しても安全（テーブル作成はIF NOT EXISTS、初期データはINSERT OR IGNORE）。
pub fn run_migrations(conn: &Connection) -> AppResult<()> {
    // カテゴリテーブルを作成
    conn.execute(
        "CREATE TABLE IF NOT EXISTS categories (
            id          TEXT    PRIMARY KEY NOT NULL,
            name        TEXT    NOT NULL UNIQUE,
            color       TEXT,
            is_default  INTEGER NOT NULL DEFAULT 0,
            created_at  TEXT    NOT NULL DEFAULT (datetime('now')),
            updated_at  TEXT    NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    // サービステーブルを作成
    // default_category_id はカテゴリへの弱参照（外部キー制約は張らない）
    conn.execute(
        "CREATE TABLE IF NOT EXISTS services (
            id                  TEXT    PRIMARY KEY NOT NULL,
            name                TEXT    NOT NULL UNIQUE,
            icon_url            TEXT,
            url                 TEXT,
            default_category_id TEXT,
            is_default          INTEGER NOT NULL DEFAULT 0,
            created_at          TEXT    NOT NULL DEFAULT (datetime('now')),
            updated_at          TEXT    NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    // サブスクリプションテーブルを作成
    // service_id / category_id も弱参照。参照先を削除しても行は残り、
    // 一覧ビューの結合フィールドがNULLになるだけ
    conn.execute(
        "CREATE TABLE IF NOT EXISTS subscriptions (
            id                TEXT    PRIMARY KEY NOT NULL,
            service_id        TEXT,
            category_id       TEXT,
            custom_name       TEXT    NOT NULL,
            amount_cents      INTEGER NOT NULL,
            currency          TEXT    NOT NULL DEFAULT 'EUR',
            billing_cycle     TEXT    NOT NULL DEFAULT 'monthly'
                              CHECK (billing_cycle IN ('weekly','monthly','quarterly','semi_annually','yearly')),
            start_date        TEXT    NOT NULL,
            next_billing_date TEXT,
            payment_method    TEXT,
            reminder_days     INTEGER DEFAULT 0,
            note              TEXT,
            is_active         INTEGER NOT NULL DEFAULT 1,
            cancelled_at      TEXT,
            created_at        TEXT    NOT NULL DEFAULT (datetime('now')),
            updated_at        TEXT    NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    // サブスクリプションテーブルのインデックスを作成
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_sub_service ON subscriptions(service_id)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_sub_category ON subscriptions(category_id)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_sub_active ON subscriptions(is_active)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_sub_next_bill ON subscriptions(next_billing_date)",
        [],
    )?;

    // 初期データを投入
    insert_default_categories(conn)?;
    insert_default_services(conn)?;

    Ok(())
}

/// デフォルトカテゴリを挿入する
///
/// 固定IDでのINSERT OR IGNOREなので、既存データを上書きすることはない。
fn insert_default_categories(conn: &Connection) -> AppResult<()> {
    let categories = [
        ("cat-entertainment", "Entertainment", "#E74C3C"),
        ("cat-productivity", "Productivity", "#3498DB"),
        ("cat-cloud", "Cloud Services", "#9B59B6"),
        ("cat-music", "Music", "#E67E22"),
        ("cat-gaming", "Gaming", "#2ECC71"),
        ("cat-news", "News & Media", "#1ABC9C"),
        ("cat-health", "Health & Fitness", "#F39C12"),
        ("cat-education", "Education", "#34495E"),
        ("cat-other", "Other", "#95A5A6"),
    ];

    for (id, name, color) in categories.iter() {
        conn.execute(
            "INSERT OR IGNORE INTO categories (id, name, color, is_default) VALUES (?1, ?2, ?3, 1)",
            [id, name, color],
        )?;
    }

    Ok(())
}

/// デフォルトサービスを挿入する
fn insert_default_services(conn: &Connection) -> AppResult<()> {
    let services = [
        (
            "svc-netflix",
            "Netflix",
            "https://logo.clearbit.com/netflix.com",
            "https://netflix.com",
            "cat-entertainment",
        ),
        (
            "svc-spotify",
            "Spotify",
            "https://logo.clearbit.com/spotify.com",
            "https://spotify.com",
            "cat-music",
        ),
        (
            "svc-disney",
            "Disney+",
            "https://logo.clearbit.com/disneyplus.com",
            "https://disneyplus.com",
            "cat-entertainment",
        ),
        (
            "svc-youtube",
            "YouTube Premium",
            "https://logo.clearbit.com/youtube.com",
            "https://youtube.com",
            "cat-entertainment",
        ),
        (
            "svc-apple-music",
            "Apple Music",
            "https://logo.clearbit.com/apple.com",
            "https://music.apple.com",
            "cat-music",
        ),
        (
            "svc-github",
            "GitHub Pro",
            "https://logo.clearbit.com/github.com",
            "https://github.com",
            "cat-cloud",
        ),
        (
            "svc-icloud",
            "iCloud+",
            "https://logo.clearbit.com/icloud.com",
            "https://icloud.com",
            "cat-cloud",
        ),
        (
            "svc-dropbox",
            "Dropbox",
            "https://logo.clearbit.com/dropbox.com",
            "https://dropbox.com",
            "cat-cloud",
        ),
        (
            "svc-adobe",
            "Adobe CC",
            "https://logo.clearbit.com/adobe.com",
            "https://adobe.com",
            "cat-productivity",
        ),
        (
            "svc-chatgpt",
            "ChatGPT Plus",
            "https://logo.clearbit.com/openai.com",
            "https://chat.openai.com",
            "cat-productivity",
        ),
        (
            "svc-xbox",
            "Xbox Game Pass",
            "https://logo.clearbit.com/xbox.com",
            "https://xbox.com",
            "cat-gaming",
        ),
        (
            "svc-playstation",
            "PlayStation Plus",
            "https://logo.clearbit.com/playstation.com",
            "https://playstation.com",
            "cat-gaming",
        ),
        (
            "svc-notion",
            "Notion",
            "https://logo.clearbit.com/notion.so",
            "https://notion.so",
            "cat-productivity",
        ),
        (
            "svc-1password",
            "1Password",
            "https://logo.clearbit.com/1password.com",
            "https://1password.com",
            "cat-productivity",
        ),
        (
            "svc-todoist",
            "Todoist",
            "https://logo.clearbit.com/todoist.com",
            "https://todoist.com",
            "cat-productivity",
        ),
    ];

    for (id, name, icon_url, url, default_category_id) in services.iter() {
        conn.execute(
            "INSERT OR IGNORE INTO services (id, name, icon_url, url, default_category_id, is_default)
             VALUES (?1, ?2, ?3, ?4, ?5, 1)",
            [id, name, icon_url, url, default_category_id],
        )?;
    }

    Ok(())
}
