//! Seeds a store database with a working starter configuration: operators,
//! one QR-enabled register, and a small product catalog.
//!
//! ```text
//! cargo run --bin seed -- --db carrito.db
//! ```
//!
//! Seeding is idempotent: a database that already has operators is left
//! untouched.

use std::process::ExitCode;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use carrito_db::{Database, DbConfig, DbResult};

const DEFAULT_DB_PATH: &str = "carrito.db";

/// The fixed token printed on the physical QR sticker of the first
/// register. Subsequent registers get generated tokens.
const FIRST_REGISTER_TOKEN: &str = "CAJA1-SUPER-TOKEN-ABC123XYZ789";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let db_path = parse_db_path();
    info!(db_path = %db_path, "Seeding store database");

    let db = match Database::new(DbConfig::new(&db_path)).await {
        Ok(db) => db,
        Err(err) => {
            error!(error = %err, "Failed to open database");
            return ExitCode::FAILURE;
        }
    };

    let result = seed(&db).await;
    db.close().await;

    match result {
        Ok(true) => {
            info!("Seed data written");
            ExitCode::SUCCESS
        }
        Ok(false) => {
            warn!("Database already seeded, nothing to do");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "Seeding failed");
            ExitCode::FAILURE
        }
    }
}

/// Reads `--db <path>` from the command line, defaulting to
/// [`DEFAULT_DB_PATH`].
fn parse_db_path() -> String {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--db" {
            if let Some(path) = args.next() {
                return path;
            }
        }
    }
    DEFAULT_DB_PATH.to_string()
}

/// Writes the starter rows. Returns `Ok(false)` without writing anything
/// when operators already exist.
async fn seed(db: &Database) -> DbResult<bool> {
    let operator_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM operators")
        .fetch_one(db.pool())
        .await?;
    if operator_count > 0 {
        return Ok(false);
    }

    sqlx::query(
        r#"
        INSERT INTO operators (username, full_name, active) VALUES
            ('admin', 'Administrador', 1),
            ('empleado1', 'Empleado Uno', 1),
            ('caja1', 'Caja Principal', 1)
        "#,
    )
    .execute(db.pool())
    .await?;

    // The first register keeps the token already printed on its sticker,
    // so it is inserted directly instead of through create_register.
    sqlx::query(
        r#"
        INSERT INTO registers (number, name, location, qr_token, cashier_id, state, created_at)
        VALUES (1, 'Caja Móvil 1', 'Entrada Principal - Pasillo 1', ?1, 3, 'active', ?2)
        "#,
    )
    .bind(FIRST_REGISTER_TOKEN)
    .bind(chrono::Utc::now())
    .execute(db.pool())
    .await?;

    sqlx::query(
        r#"
        INSERT INTO products (name, barcode, unit_price_cents, image_url, is_active) VALUES
            ('Agua Mineral 600ml',  '7750100000001', 150,  NULL, 1),
            ('Pan de Molde',        '7750100000002', 450,  NULL, 1),
            ('Leche Entera 1L',     '7750100000003', 380,  NULL, 1),
            ('Arroz Extra 1kg',     '7750100000004', 520,  NULL, 1),
            ('Aceite Vegetal 1L',   '7750100000005', 890,  NULL, 1),
            ('Galletas Surtidas',   '7750100000006', 250,  NULL, 1),
            ('Café Instantáneo',    '7750100000007', 1250, NULL, 1),
            ('Jabón de Tocador',    '7750100000008', 320,  NULL, 1)
        "#,
    )
    .execute(db.pool())
    .await?;

    info!(register_token = %FIRST_REGISTER_TOKEN, "Starter register ready to scan");

    Ok(true)
}
