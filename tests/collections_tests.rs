// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Recipes, ingredients, favourites and schedule over HTTP.

use axum::http::StatusCode;
use recipe_box::models::{Favourite, Ingredient, Recipe, Schedule};
use recipe_box::AppState;

mod common;
use common::{body_json, flash, location, request, send, signup};

async fn user_id(state: &AppState, username: &str) -> String {
    state
        .db
        .find_user_by_username(username)
        .await
        .unwrap()
        .expect("user should exist")
        .id
}

/// Create a recipe through the form and return its id.
async fn create_recipe(app: &axum::Router, state: &AppState, cookie: &str, owner: &str) -> String {
    let response = send(
        app,
        request(
            "POST",
            "/dashboard/newreceipe",
            Some("receipe=Tomato%20soup&logo=https%3A%2F%2Fimg.example.com%2Fsoup.png"),
            Some(cookie),
        ),
    )
    .await;
    assert_eq!(location(&response), "/dashboard/myreceipes");
    assert_eq!(
        flash(&response),
        Some(("success".to_string(), "new receipe added!".to_string()))
    );

    let recipes = state.db.list_owned::<Recipe>(owner).await.unwrap();
    recipes.last().expect("recipe stored").id.clone()
}

#[tokio::test]
async fn test_recipe_with_ingredients_lifecycle() {
    let (app, state) = common::create_test_app();
    let cookie = signup(&app, "cook@example.com", "pw").await;
    let owner = user_id(&state, "cook@example.com").await;

    let recipe_id = create_recipe(&app, &state, &cookie, &owner).await;

    let response = send(
        &app,
        request("GET", "/dashboard/myreceipes", None, Some(&cookie)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_json(response).await;
    assert_eq!(page["view"], "receipe");
    assert_eq!(page["receipe"][0]["name"], "Tomato soup");
    assert_eq!(page["receipe"][0]["image"], "https://img.example.com/soup.png");

    // Add an ingredient
    let recipe_uri = format!("/dashboard/myreceipes/{recipe_id}");
    let response = send(
        &app,
        request(
            "POST",
            &recipe_uri,
            Some("name=Tomato&dish=Soup&quantity=4"),
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(location(&response), recipe_uri);
    assert_eq!(
        flash(&response).unwrap().1,
        "your ingredient has been added!"
    );

    let ingredients = state.db.list_ingredients(&owner, &recipe_id).await.unwrap();
    assert_eq!(ingredients.len(), 1);
    let ingredient_id = ingredients[0].id.clone();
    assert_eq!(ingredients[0].best_dish, "Soup");

    // Detail page lists it
    let response = send(&app, request("GET", &recipe_uri, None, Some(&cookie))).await;
    let page = body_json(response).await;
    assert_eq!(page["view"], "ingredients");
    assert_eq!(page["receipe"]["id"], recipe_id.as_str());
    assert_eq!(page["ingredient"][0]["name"], "Tomato");

    // Edit form, then update through method override
    let ingredient_uri = format!("{recipe_uri}/{ingredient_id}");
    let response = send(
        &app,
        request("POST", &format!("{ingredient_uri}/edit"), None, Some(&cookie)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["view"], "edit");

    let response = send(
        &app,
        request(
            "POST",
            &format!("{ingredient_uri}?_method=PUT"),
            Some("name=Cherry%20tomato&dish=Salad&quantity=12"),
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(location(&response), recipe_uri);
    assert_eq!(
        flash(&response).unwrap().1,
        "Successfully updated ingredient!"
    );
    let ingredients = state.db.list_ingredients(&owner, &recipe_id).await.unwrap();
    assert_eq!(ingredients[0].name, "Cherry tomato");
    assert_eq!(ingredients[0].best_dish, "Salad");
    assert_eq!(ingredients[0].quantity, "12");

    // Delete the ingredient
    let response = send(
        &app,
        request(
            "POST",
            &format!("{ingredient_uri}?_method=DELETE"),
            None,
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(location(&response), recipe_uri);
    assert!(state
        .db
        .list_ingredients(&owner, &recipe_id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_deleting_recipe_removes_its_ingredients() {
    let (app, state) = common::create_test_app();
    let cookie = signup(&app, "cook@example.com", "pw").await;
    let owner = user_id(&state, "cook@example.com").await;
    let recipe_id = create_recipe(&app, &state, &cookie, &owner).await;
    let recipe_uri = format!("/dashboard/myreceipes/{recipe_id}");

    for name in ["Salt", "Pepper"] {
        send(
            &app,
            request(
                "POST",
                &recipe_uri,
                Some(&format!("name={name}&dish=Soup&quantity=1")),
                Some(&cookie),
            ),
        )
        .await;
    }
    assert_eq!(
        state.db.list_ingredients(&owner, &recipe_id).await.unwrap().len(),
        2
    );

    let response = send(
        &app,
        request(
            "POST",
            &format!("{recipe_uri}?_method=DELETE"),
            None,
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(location(&response), "/dashboard/myreceipes");
    assert_eq!(
        flash(&response).unwrap().1,
        "the receipe has been deleted"
    );
    assert!(state.db.list_owned::<Recipe>(&owner).await.unwrap().is_empty());
    assert!(state
        .db
        .list_owned::<Ingredient>(&owner)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_other_users_records_are_protected() {
    let (app, state) = common::create_test_app();
    let alice = signup(&app, "alice@example.com", "pw").await;
    let alice_id = user_id(&state, "alice@example.com").await;
    let bob = signup(&app, "bob@example.com", "pw").await;

    let recipe_id = create_recipe(&app, &state, &alice, &alice_id).await;
    let recipe_uri = format!("/dashboard/myreceipes/{recipe_id}");

    // Bob can neither see nor delete Alice's recipe
    let response = send(&app, request("GET", &recipe_uri, None, Some(&bob))).await;
    assert_eq!(location(&response), "/dashboard/myreceipes");

    let response = send(
        &app,
        request(
            "POST",
            &format!("{recipe_uri}?_method=DELETE"),
            None,
            Some(&bob),
        ),
    )
    .await;
    assert_eq!(location(&response), "/dashboard/myreceipes");
    assert_eq!(
        flash(&response),
        Some((
            "error".to_string(),
            "You are not allowed to change this recipe!".to_string()
        ))
    );
    assert_eq!(
        state.db.list_owned::<Recipe>(&alice_id).await.unwrap().len(),
        1
    );

    // Nor add ingredients to it
    let response = send(
        &app,
        request(
            "POST",
            &recipe_uri,
            Some("name=Sand&dish=Soup&quantity=1"),
            Some(&bob),
        ),
    )
    .await;
    assert_eq!(location(&response), "/dashboard/myreceipes");
    assert!(state
        .db
        .list_ingredients(&alice_id, &recipe_id)
        .await
        .unwrap()
        .is_empty());

    // Bob's own list stays empty
    let response = send(
        &app,
        request("GET", "/dashboard/myreceipes", None, Some(&bob)),
    )
    .await;
    assert_eq!(body_json(response).await["receipe"], serde_json::json!([]));
}

#[tokio::test]
async fn test_favourites() {
    let (app, state) = common::create_test_app();
    let cookie = signup(&app, "cook@example.com", "pw").await;
    let owner = user_id(&state, "cook@example.com").await;

    let response = send(
        &app,
        request(
            "GET",
            "/dashboard/favourites/newfavourite",
            None,
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(body_json(response).await["view"], "newfavourite");

    let response = send(
        &app,
        request(
            "POST",
            "/dashboard/favourites",
            Some("image=&title=Lasagne&description=Sunday%20lunch"),
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(location(&response), "/dashboard/favourites");
    assert_eq!(flash(&response).unwrap().1, "you just added a new fav!");

    let response = send(
        &app,
        request("GET", "/dashboard/favourites", None, Some(&cookie)),
    )
    .await;
    let page = body_json(response).await;
    assert_eq!(page["view"], "favourites");
    assert_eq!(page["favourite"][0]["title"], "Lasagne");
    assert_eq!(page["favourite"][0]["image"], "");

    let favourite_id = state.db.list_owned::<Favourite>(&owner).await.unwrap()[0]
        .id
        .clone();
    let response = send(
        &app,
        request(
            "POST",
            &format!("/dashboard/favourites/{favourite_id}?_method=DELETE"),
            None,
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(location(&response), "/dashboard/favourites");
    assert_eq!(flash(&response).unwrap().1, "your fav has been deleted!");
    assert!(state
        .db
        .list_owned::<Favourite>(&owner)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_schedule() {
    let (app, state) = common::create_test_app();
    let cookie = signup(&app, "cook@example.com", "pw").await;
    let owner = user_id(&state, "cook@example.com").await;

    for (name, date) in [("Curry", "2026-11-02"), ("Pancakes", "2026-11-01")] {
        let response = send(
            &app,
            request(
                "POST",
                "/dashboard/schedule",
                Some(&format!("receipename={name}&scheduleDate={date}&time=19%3A00")),
                Some(&cookie),
            ),
        )
        .await;
        assert_eq!(location(&response), "/dashboard/schedule");
        assert_eq!(
            flash(&response).unwrap().1,
            "you just added a new schedule!"
        );
    }

    let response = send(
        &app,
        request("GET", "/dashboard/schedule", None, Some(&cookie)),
    )
    .await;
    let page = body_json(response).await;
    assert_eq!(page["view"], "schedule");
    assert_eq!(page["schedule"][0]["recipe_name"], "Pancakes");
    assert_eq!(page["schedule"][1]["recipe_name"], "Curry");
    assert_eq!(page["schedule"][1]["time"], "19:00");

    // Another user cannot delete it
    let other = signup(&app, "other@example.com", "pw").await;
    let schedule = state.db.list_owned::<Schedule>(&owner).await.unwrap();
    let uri = format!("/dashboard/schedule/{}?_method=DELETE", schedule[0].id);

    let response = send(&app, request("POST", &uri, None, Some(&other))).await;
    assert_eq!(flash(&response).unwrap().0, "error");
    assert_eq!(state.db.list_owned::<Schedule>(&owner).await.unwrap().len(), 2);

    let response = send(&app, request("POST", &uri, None, Some(&cookie))).await;
    assert_eq!(
        flash(&response).unwrap().1,
        "your schedule has been deleted!"
    );
    assert_eq!(state.db.list_owned::<Schedule>(&owner).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_missing_record_redirects_with_notice() {
    let (app, _) = common::create_test_app();
    let cookie = signup(&app, "cook@example.com", "pw").await;

    let response = send(
        &app,
        request(
            "POST",
            "/dashboard/favourites/does-not-exist?_method=DELETE",
            None,
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(location(&response), "/dashboard/favourites");
    assert_eq!(
        flash(&response),
        Some(("error".to_string(), "favourite not found!".to_string()))
    );
}

#[tokio::test]
async fn test_unprintable_recipe_id_still_redirects() {
    let (app, _) = common::create_test_app();
    let cookie = signup(&app, "cook@example.com", "pw").await;

    for (method, form) in [("DELETE", None), ("PUT", Some("name=Salt"))] {
        let response = send(
            &app,
            request(method, "/dashboard/myreceipes/%0A/x", form, Some(&cookie)),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/dashboard/myreceipes");
        assert_eq!(
            flash(&response),
            Some(("error".to_string(), "ingredient not found!".to_string()))
        );
    }
}
