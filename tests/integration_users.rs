mod common;

use campuskit::modules::users::service::UserService;
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
async fn search_matches_any_field_without_duplicates(pool: PgPool) {
    let mut multi_field = common::user_dto("jsmith");
    multi_field.email = Some("j.smith@example.com".to_string());
    multi_field.last_name = Some("Smith".to_string());
    UserService::create_user(&pool, multi_field).await.unwrap();

    let mut by_last_name = common::user_dto("amy");
    by_last_name.first_name = Some("Amy".to_string());
    by_last_name.last_name = Some("Smithson".to_string());
    UserService::create_user(&pool, by_last_name).await.unwrap();

    UserService::create_user(&pool, common::user_dto("bob"))
        .await
        .unwrap();

    let hits = UserService::search_users(&pool, "SMITH").await.unwrap();

    // jsmith matches on username, last name, and email but appears once.
    let usernames: Vec<&str> = hits.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(usernames, vec!["amy", "jsmith"]);
}

#[sqlx::test(migrations = "./migrations")]
async fn duplicate_username_is_a_bad_request(pool: PgPool) {
    UserService::create_user(&pool, common::user_dto("taken"))
        .await
        .unwrap();

    let err = UserService::create_user(&pool, common::user_dto("taken"))
        .await
        .unwrap_err();
    assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn failed_picture_update_discards_the_stored_file(pool: PgPool) {
    let (storage, dir) = common::temp_storage();

    let user = UserService::create_user(&pool, common::user_dto("portrait"))
        .await
        .unwrap();

    // Make the picture-reference update fail after the file has been stored.
    sqlx::query(
        r#"
        CREATE FUNCTION reject_picture_updates() RETURNS trigger AS $$
        BEGIN
            IF NEW.picture IS DISTINCT FROM OLD.picture THEN
                RAISE EXCEPTION 'picture updates are disabled';
            END IF;
            RETURN NEW;
        END;
        $$ LANGUAGE plpgsql
        "#,
    )
    .execute(&pool)
    .await
    .unwrap();
    sqlx::query(
        "CREATE TRIGGER users_picture_guard BEFORE UPDATE ON users \
         FOR EACH ROW EXECUTE FUNCTION reject_picture_updates()",
    )
    .execute(&pool)
    .await
    .unwrap();

    let result =
        UserService::set_picture(&pool, &storage, user.id, Some("me.png"), b"not an image").await;
    assert!(result.is_err());

    // No orphaned file, and the account still points at the default.
    assert_eq!(common::stored_file_count(&dir), 0);
    let unchanged = UserService::get_user(&pool, user.id).await.unwrap();
    assert_eq!(unchanged.picture, "default.png");
}
