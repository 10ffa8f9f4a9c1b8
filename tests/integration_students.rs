mod common;

use campuskit::modules::parents::model::{CreateParentDto, Relationship};
use campuskit::modules::parents::service::ParentService;
use campuskit::modules::students::model::{CreateStudentDto, Level};
use campuskit::modules::students::service::StudentService;
use campuskit::modules::users::service::UserService;
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
async fn enrolling_raises_the_user_flag(pool: PgPool) {
    let user = UserService::create_user(&pool, common::user_dto("freshman"))
        .await
        .unwrap();
    assert!(!user.is_student);

    StudentService::create_student(
        &pool,
        CreateStudentDto {
            user_id: user.id,
            level: Some(Level::Ssc),
            program_id: None,
        },
    )
    .await
    .unwrap();

    let flagged = UserService::get_user(&pool, user.id).await.unwrap();
    assert!(flagged.is_student);
}

#[sqlx::test(migrations = "./migrations")]
async fn deleting_a_student_deletes_the_owning_user(pool: PgPool) {
    let (storage, _dir) = common::temp_storage();

    let user = UserService::create_user(&pool, common::user_dto("enrollee"))
        .await
        .unwrap();
    let student = StudentService::create_student(
        &pool,
        CreateStudentDto {
            user_id: user.id,
            level: Some(Level::Cbsc),
            program_id: None,
        },
    )
    .await
    .unwrap();

    StudentService::delete_student(&pool, &storage, student.id)
        .await
        .unwrap();

    let users_left: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE id = $1")
        .bind(user.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    let students_left: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM students WHERE id = $1")
        .bind(student.id)
        .fetch_one(&pool)
        .await
        .unwrap();

    assert_eq!(users_left, 0);
    assert_eq!(students_left, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn deleting_a_student_nulls_the_parents_link(pool: PgPool) {
    let (storage, _dir) = common::temp_storage();

    let student_user = UserService::create_user(&pool, common::user_dto("kid"))
        .await
        .unwrap();
    let student = StudentService::create_student(
        &pool,
        CreateStudentDto {
            user_id: student_user.id,
            level: None,
            program_id: None,
        },
    )
    .await
    .unwrap();

    let parent_user = UserService::create_user(&pool, common::user_dto("mum"))
        .await
        .unwrap();
    let parent = ParentService::create_parent(
        &pool,
        CreateParentDto {
            user_id: parent_user.id,
            student_id: Some(student.id),
            first_name: "May".to_string(),
            last_name: "Poppins".to_string(),
            phone: None,
            email: None,
            relationship: Relationship::Mother,
        },
    )
    .await
    .unwrap();
    assert_eq!(parent.student_id, Some(student.id));

    StudentService::delete_student(&pool, &storage, student.id)
        .await
        .unwrap();

    // The parent survives its student's removal with the link nulled.
    let survivor = ParentService::get_parent(&pool, parent.id).await.unwrap();
    assert_eq!(survivor.student_id, None);
}
