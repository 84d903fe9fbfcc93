use sqlx::PgPool;

/// Connect, migrate, verify schema.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_full_bootstrap(pool: PgPool) {
    lodge_db::health_check(&pool).await.unwrap();

    let tables = ["users", "profiles", "user_sessions", "bookings", "guests"];

    for table in tables {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert_eq!(count.0, 0, "{table} should start empty");
    }
}

/// The finalize procedure is installed with the expected signature.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_finalize_procedure_exists(pool: PgPool) {
    let moved: i32 = sqlx::query_scalar("SELECT finalize_guests(1::bigint)")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(moved, 0);
}
