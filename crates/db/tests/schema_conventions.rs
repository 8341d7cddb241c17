use sqlx::PgPool;

/// Entity tables use UUID primary keys.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_entity_pks_are_uuid(pool: PgPool) {
    let rows: Vec<(String, String)> = sqlx::query_as(
        "SELECT table_name, data_type
         FROM information_schema.columns
         WHERE column_name = 'id'
           AND table_schema = 'public'
           AND table_name != '_sqlx_migrations'
         ORDER BY table_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert_eq!(rows.len(), 4);
    for (table, data_type) in &rows {
        assert_eq!(data_type, "uuid", "Table {table}.id should be uuid");
    }
}

/// Every entity table carries timestamptz audit columns and `deleted_at`.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_entity_tables_have_timestamps(pool: PgPool) {
    for table in ["categories", "genres", "cast_members", "videos"] {
        let columns: Vec<(String, String)> = sqlx::query_as(
            "SELECT column_name, data_type
             FROM information_schema.columns
             WHERE table_schema = 'public' AND table_name = $1
               AND column_name IN ('created_at', 'updated_at', 'deleted_at')",
        )
        .bind(table)
        .fetch_all(&pool)
        .await
        .unwrap();

        assert_eq!(columns.len(), 3, "{table} is missing audit columns");
        for (column, data_type) in &columns {
            assert_eq!(
                data_type, "timestamp with time zone",
                "{table}.{column} should be timestamptz"
            );
        }
    }
}
