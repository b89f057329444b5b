//! Integration tests for soft-delete behaviour.
//!
//! Exercises the repository layer against a real database to verify that:
//! - Soft-deleted entities are hidden from `find_by_id` and list queries
//! - Soft-delete is idempotent (second call reports no row)
//! - Removing a folder detaches its favorites instead of deleting them
//! - The pattern is consistent across entity types

use sqlx::PgPool;
use toolhub_db::models::favorite::{CreateFavorite, CreateFolder, FavoriteListParams};
use toolhub_db::models::tool::{CreateTool, ToolListParams};
use toolhub_db::models::user::CreateUser;
use toolhub_db::repositories::{FavoriteFolderRepo, FavoriteRepo, ToolRepo, UserRepo};
use toolhub_core::types::DbId;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_user(pool: &PgPool, name: &str) -> DbId {
    UserRepo::create(
        pool,
        &CreateUser {
            username: name.to_string(),
            email: format!("{name}@example.com"),
            password_hash: "$argon2id$test".to_string(),
            email_verified: true,
        },
    )
    .await
    .unwrap()
    .id
}

async fn new_approved_tool(pool: &PgPool, name: &str, admin: DbId) -> DbId {
    let tool = ToolRepo::create(
        pool,
        &CreateTool {
            name: name.to_string(),
            description: "soft delete test".to_string(),
            category: "coding".to_string(),
            tags: vec![],
            website: None,
            pricing: None,
            features: vec![],
        },
        admin,
    )
    .await
    .unwrap();
    ToolRepo::approve(pool, tool.id, admin).await.unwrap();
    tool.id
}

fn default_list_params() -> ToolListParams {
    ToolListParams {
        category: None,
        sort_by: None,
        order: None,
        limit: None,
        offset: None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn soft_deleted_tool_hidden_from_find_and_list(pool: PgPool) {
    let admin = new_user(&pool, "sd_admin1").await;
    let tool_id = new_approved_tool(&pool, "Hidden Tool", admin).await;

    let before = ToolRepo::list_approved(&pool, &default_list_params()).await.unwrap();
    assert!(before.iter().any(|t| t.id == tool_id));

    let deleted = ToolRepo::soft_delete(&pool, tool_id).await.unwrap();
    assert!(deleted, "soft_delete should report the row on first call");

    assert!(ToolRepo::find_by_id(&pool, tool_id).await.unwrap().is_none());

    let after = ToolRepo::list_approved(&pool, &default_list_params()).await.unwrap();
    assert!(!after.iter().any(|t| t.id == tool_id));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn soft_delete_is_idempotent(pool: PgPool) {
    let admin = new_user(&pool, "sd_admin2").await;
    let tool_id = new_approved_tool(&pool, "Twice Deleted", admin).await;

    assert!(ToolRepo::soft_delete(&pool, tool_id).await.unwrap());
    assert!(
        !ToolRepo::soft_delete(&pool, tool_id).await.unwrap(),
        "second soft_delete should find no live row"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deactivated_user_frees_username_and_email(pool: PgPool) {
    let user_id = new_user(&pool, "sd_ghost").await;

    assert!(UserRepo::is_username_taken(&pool, "sd_ghost").await.unwrap());
    UserRepo::deactivate(&pool, user_id).await.unwrap();

    assert!(UserRepo::find_by_id(&pool, user_id).await.unwrap().is_none());
    assert!(!UserRepo::is_username_taken(&pool, "sd_ghost").await.unwrap());
    assert!(!UserRepo::is_email_taken(&pool, "sd_ghost@example.com").await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn folder_soft_delete_detaches_favorites(pool: PgPool) {
    let admin = new_user(&pool, "sd_admin3").await;
    let alice = new_user(&pool, "sd_alice3").await;
    let tool_id = new_approved_tool(&pool, "Foldered Tool", admin).await;

    let folder = FavoriteFolderRepo::create(
        &pool,
        &CreateFolder {
            name: "ML Picks".to_string(),
            description: None,
            color: None,
        },
        alice,
    )
    .await
    .unwrap();

    FavoriteRepo::create(
        &pool,
        &CreateFavorite {
            tool_id,
            folder_id: Some(folder.id),
            notes: None,
        },
        alice,
    )
    .await
    .unwrap();

    let removed = FavoriteFolderRepo::soft_delete(&pool, folder.id, alice).await.unwrap();
    assert!(removed);

    // The favorite survives with its folder reference nulled.
    let favorite = FavoriteRepo::find_by_user_and_tool(&pool, alice, tool_id)
        .await
        .unwrap()
        .expect("favorite must outlive its folder");
    assert_eq!(favorite.folder_id, None);

    // And it still shows in the listing.
    let listed = FavoriteRepo::list_for_user(
        &pool,
        alice,
        &FavoriteListParams {
            category: None,
            sort_by: None,
            order: None,
            limit: None,
            offset: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(listed.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn soft_deleted_favorite_hidden_from_listing(pool: PgPool) {
    let admin = new_user(&pool, "sd_admin4").await;
    let alice = new_user(&pool, "sd_alice4").await;
    let tool_id = new_approved_tool(&pool, "Unfavorited Tool", admin).await;

    let favorite = FavoriteRepo::create(
        &pool,
        &CreateFavorite {
            tool_id,
            folder_id: None,
            notes: None,
        },
        alice,
    )
    .await
    .unwrap();

    FavoriteRepo::soft_delete(&pool, favorite.id, alice).await.unwrap();

    assert!(FavoriteRepo::find_by_user_and_tool(&pool, alice, tool_id)
        .await
        .unwrap()
        .is_none());
    assert_eq!(FavoriteRepo::count_for_user(&pool, alice, None).await.unwrap(), 0);
}
