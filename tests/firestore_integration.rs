// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore integration tests.
//!
//! These tests require the Firestore emulator to be running
//! (`FIRESTORE_EMULATOR_HOST=localhost:8080`). Without it they are skipped.

use recipe_box::models::{Favourite, Recipe, ResetToken, User};
use recipe_box::services::credentials::{new_id, verify_password, CredentialStore};
use recipe_box::services::password_reset::PasswordResetService;
use recipe_box::services::Mailer;
use recipe_box::time_utils::now_millis;

mod common;
use common::test_db;

/// Unique username for test isolation.
fn unique_username() -> String {
    format!("cook-{}@example.com", new_id().unwrap())
}

fn test_user(username: &str) -> User {
    User {
        id: new_id().unwrap(),
        username: username.to_string(),
        password_hash: "00".to_string(),
        salt: "11".to_string(),
        created_at: "2026-01-15T10:00:00Z".to_string(),
    }
}

#[tokio::test]
async fn test_user_insert_and_lookup() {
    require_emulator!();

    let db = test_db().await;
    let username = unique_username();
    let user = test_user(&username);

    assert!(db.find_user_by_username(&username).await.unwrap().is_none());
    db.insert_user(&user).await.unwrap();

    let fetched = db.find_user_by_username(&username).await.unwrap().unwrap();
    assert_eq!(fetched, user);
    assert_eq!(db.get_user(&user.id).await.unwrap().unwrap(), user);

    // Same username again is refused
    let duplicate = test_user(&username);
    assert!(db.insert_user(&duplicate).await.is_err());
}

#[tokio::test]
async fn test_password_reset_commit_is_single_use() {
    require_emulator!();

    let db = test_db().await;
    let username = unique_username();
    let mut user = test_user(&username);
    db.insert_user(&user).await.unwrap();

    let token = new_id().unwrap();
    db.insert_reset_token(&ResetToken {
        id: new_id().unwrap(),
        username: username.clone(),
        token: Some(token.clone()),
        expires_at: Some(now_millis() + 3_600_000),
    })
    .await
    .unwrap();

    user.password_hash = "ff".to_string();
    assert!(db
        .commit_password_reset(&user, &token, now_millis())
        .await
        .unwrap());
    assert!(!db
        .commit_password_reset(&user, &token, now_millis())
        .await
        .unwrap());

    let stored = db.get_user(&user.id).await.unwrap().unwrap();
    assert_eq!(stored.password_hash, "ff");

    let resets = db.reset_tokens_for(&username).await.unwrap();
    assert_eq!(resets.len(), 1);
    assert_eq!(resets[0].token, None);
    assert_eq!(resets[0].expires_at, None);
}

#[tokio::test]
async fn test_owned_records_round_trip() {
    require_emulator!();

    let db = test_db().await;
    let owner = new_id().unwrap();
    let stranger = new_id().unwrap();

    let recipe = Recipe {
        id: new_id().unwrap(),
        name: "Risotto".to_string(),
        image: String::new(),
        owner_id: owner.clone(),
    };
    db.create_owned(&recipe).await.unwrap();
    let favourite = Favourite {
        id: new_id().unwrap(),
        image: String::new(),
        title: "Risotto".to_string(),
        description: "Creamy".to_string(),
        owner_id: owner.clone(),
    };
    db.create_owned(&favourite).await.unwrap();

    assert_eq!(db.list_owned::<Recipe>(&owner).await.unwrap(), vec![recipe.clone()]);
    assert!(db.list_owned::<Recipe>(&stranger).await.unwrap().is_empty());
    assert!(db
        .delete_owned::<Favourite>(&stranger, &favourite.id)
        .await
        .is_err());

    assert_eq!(db.delete_recipe(&owner, &recipe.id).await.unwrap(), 0);
    db.delete_owned::<Favourite>(&owner, &favourite.id)
        .await
        .unwrap();
    assert!(db.list_owned::<Favourite>(&owner).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_concurrent_reset_across_instances_has_one_winner() {
    require_emulator!();

    let db = test_db().await;
    let username = unique_username();
    CredentialStore::new(db.clone())
        .register(&username, "original")
        .await
        .unwrap();

    // Two services share the database but not their in-process locks
    let mailer = Mailer::outbox("cooking@example.com");
    let first = PasswordResetService::new(db.clone(), mailer.clone(), "http://localhost", 3600);
    let second = PasswordResetService::new(db.clone(), mailer, "http://localhost", 3600);
    let issued = first.issue_token(&username).await.unwrap();

    let (a, b) = tokio::join!(
        first.consume_token(&issued.token, "first", "first"),
        second.consume_token(&issued.token, "second", "second"),
    );
    assert_eq!(a.is_ok() as usize + b.is_ok() as usize, 1);

    let user = db.find_user_by_username(&username).await.unwrap().unwrap();
    let winner = if a.is_ok() { "first" } else { "second" };
    assert!(verify_password(winner, &user.salt, &user.password_hash));
    assert!(first.validate_token(&issued.token).await.is_err());
}
