mod common;

use axum::http::StatusCode;
use common::{recipe_body, TestApp, PNG};
use serde_json::json;

struct Kitchen {
    app: TestApp,
    author_id: i64,
    author: String,
    tag: i64,
    flour: i64,
    sugar: i64,
}

async fn kitchen() -> Kitchen {
    let app = TestApp::new().await;
    let (author_id, author) = app.user("anna").await;
    let tag = app.tag("dessert").await;
    let flour = app.ingredient("flour", "g").await;
    let sugar = app.ingredient("sugar", "g").await;

    Kitchen {
        app,
        author_id,
        author,
        tag,
        flour,
        sugar,
    }
}

#[tokio::test]
async fn create_returns_full_recipe() {
    let k = kitchen().await;

    let response = k
        .app
        .post(
            "/api/recipes/",
            Some(&k.author),
            recipe_body("Cake", &[k.tag], &[(k.flour, 300), (k.sugar, 100)]),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.text);

    let body = response.json();
    assert_eq!(body["name"], "Cake");
    assert_eq!(body["cooking_time"], 25);
    assert_eq!(body["author"]["id"], k.author_id);
    assert_eq!(body["tags"][0]["slug"], "dessert");
    assert_eq!(body["ingredients"].as_array().unwrap().len(), 2);
    assert_eq!(body["is_favorited"], false);
    assert!(body["image"].as_str().unwrap().ends_with(".png"));
    assert_eq!(k.app.images.len().await, 1);
}

#[tokio::test]
async fn create_validates_payload() {
    let k = kitchen().await;
    let cases = [
        recipe_body("No tags", &[], &[(k.flour, 1)]),
        recipe_body("No ingredients", &[k.tag], &[]),
        recipe_body("Twice", &[k.tag], &[(k.flour, 1), (k.flour, 2)]),
        recipe_body("Tags twice", &[k.tag, k.tag], &[(k.flour, 1)]),
        recipe_body("Zero", &[k.tag], &[(k.flour, 0)]),
        recipe_body("Unknown tag", &[999], &[(k.flour, 1)]),
        recipe_body("Unknown ingredient", &[k.tag], &[(999, 1)]),
        json!({
            "name": "No image",
            "text": "text",
            "cooking_time": 10,
            "tags": [k.tag],
            "ingredients": [{ "id": k.flour, "amount": 1 }],
        }),
        json!({
            "name": "Too quick",
            "text": "text",
            "cooking_time": 0,
            "image": PNG,
            "tags": [k.tag],
            "ingredients": [{ "id": k.flour, "amount": 1 }],
        }),
        json!({
            "name": "Bad image",
            "text": "text",
            "cooking_time": 10,
            "image": "not a data uri",
            "tags": [k.tag],
            "ingredients": [{ "id": k.flour, "amount": 1 }],
        }),
    ];

    for body in cases {
        let name = body["name"].clone();
        let response = k.app.post("/api/recipes/", Some(&k.author), body).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "case {name}: {}", response.text);
    }

    assert_eq!(k.app.count("SELECT COUNT(*) FROM recipes").await, 0);
    assert!(k.app.images.is_empty().await);
}

#[tokio::test]
async fn anonymous_cannot_create() {
    let k = kitchen().await;

    let response = k
        .app
        .post("/api/recipes/", None, recipe_body("Cake", &[k.tag], &[(k.flour, 1)]))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn only_author_or_admin_may_modify() {
    let k = kitchen().await;
    let recipe = k.app.recipe(&k.author, "Cake", &[k.tag], &[(k.flour, 300)]).await;
    let uri = format!("/api/recipes/{recipe}/");
    let (_, stranger) = k.app.user("boris").await;

    let patch = json!({
        "name": "Better cake",
        "tags": [k.tag],
        "ingredients": [{ "id": k.sugar, "amount": 50 }],
    });

    let response = k.app.patch(&uri, Some(&stranger), patch.clone()).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    let response = k.app.delete(&uri, Some(&stranger)).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = k.app.patch(&uri, Some(&k.author), patch).await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.text);
    let body = response.json();
    assert_eq!(body["name"], "Better cake");
    assert_eq!(body["cooking_time"], 25);
    assert_eq!(body["ingredients"][0]["name"], "sugar");
    assert_eq!(body["ingredients"].as_array().unwrap().len(), 1);

    k.app.make_admin("boris").await;
    let response = k.app.delete(&uri, Some(&stranger)).await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);
    assert_eq!(k.app.get(&uri, None).await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_requires_tags_and_ingredients() {
    let k = kitchen().await;
    let recipe = k.app.recipe(&k.author, "Cake", &[k.tag], &[(k.flour, 300)]).await;

    let response = k
        .app
        .patch(&format!("/api/recipes/{recipe}/"), Some(&k.author), json!({ "name": "Pie" }))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_with_new_image_replaces_file() {
    let k = kitchen().await;
    let recipe = k.app.recipe(&k.author, "Cake", &[k.tag], &[(k.flour, 300)]).await;
    let before = k.app.get(&format!("/api/recipes/{recipe}/"), None).await.json()["image"].clone();

    let response = k
        .app
        .patch(
            &format!("/api/recipes/{recipe}/"),
            Some(&k.author),
            json!({
                "image": "data:image/gif;base64,R0lGODlh",
                "tags": [k.tag],
                "ingredients": [{ "id": k.flour, "amount": 300 }],
            }),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.text);

    let after = response.json()["image"].clone();
    assert_ne!(before, after);
    assert!(after.as_str().unwrap().ends_with(".gif"));
    assert_eq!(k.app.images.len().await, 1);
}

#[tokio::test]
async fn list_filters_and_paginates() {
    let k = kitchen().await;
    let (boris_id, boris) = k.app.user("boris").await;
    let breakfast = k.app.tag("breakfast").await;

    for i in 0..4 {
        k.app
            .recipe(&k.author, &format!("Cake {i}"), &[k.tag], &[(k.flour, 100)])
            .await;
    }
    let porridge = k
        .app
        .recipe(&boris, "Porridge", &[breakfast], &[(k.sugar, 10)])
        .await;

    let all = k.app.get("/api/recipes/?limit=2", None).await.json();
    assert_eq!(all["count"], 5);
    assert_eq!(all["results"].as_array().unwrap().len(), 2);
    assert!(all["next"].as_str().unwrap().contains("page=2"));
    assert!(all["previous"].is_null());

    let last = k.app.get("/api/recipes/?limit=2&page=3", None).await.json();
    assert_eq!(last["results"].as_array().unwrap().len(), 1);
    assert!(last["next"].is_null());

    let missing = k.app.get("/api/recipes/?limit=2&page=4", None).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);

    let by_author = k.app.get(&format!("/api/recipes/?author={boris_id}"), None).await.json();
    assert_eq!(by_author["count"], 1);
    assert_eq!(by_author["results"][0]["id"], porridge);

    let by_tag = k.app.get("/api/recipes/?tags=breakfast", None).await.json();
    assert_eq!(by_tag["count"], 1);
    let any_tag = k.app.get("/api/recipes/?tags=breakfast&tags=dessert", None).await.json();
    assert_eq!(any_tag["count"], 5);

    k.app
        .post_empty(&format!("/api/recipes/{porridge}/favorite/"), Some(&k.author))
        .await;
    let favorites = k
        .app
        .get("/api/recipes/?is_favorited=1", Some(&k.author))
        .await
        .json();
    assert_eq!(favorites["count"], 1);
    assert_eq!(favorites["results"][0]["is_favorited"], true);

    let anonymous = k.app.get("/api/recipes/?is_favorited=1", None).await.json();
    assert_eq!(anonymous["count"], 0);
}

#[tokio::test]
async fn tags_and_ingredients_are_readable() {
    let k = kitchen().await;

    let tags = k.app.get("/api/tags/", None).await;
    assert_eq!(tags.status, StatusCode::OK);
    assert_eq!(tags.json()[0]["slug"], "dessert");
    assert_eq!(k.app.get(&format!("/api/tags/{}/", k.tag), None).await.status, StatusCode::OK);
    assert_eq!(k.app.get("/api/tags/999/", None).await.status, StatusCode::NOT_FOUND);

    let found = k.app.get("/api/ingredients/?name=fl", None).await.json();
    assert_eq!(found.as_array().unwrap().len(), 1);
    assert_eq!(found[0]["name"], "flour");
    assert_eq!(found[0]["measurement_unit"], "g");
}

#[tokio::test]
async fn ingredient_search_folds_cyrillic_case() {
    let k = kitchen().await;
    k.app.ingredient("Сахар", "г").await;

    // ?name=сах
    let lower = k.app.get("/api/ingredients/?name=%D1%81%D0%B0%D1%85", None).await.json();
    assert_eq!(lower.as_array().unwrap().len(), 1);
    assert_eq!(lower[0]["name"], "Сахар");

    // ?name=САХ
    let upper = k.app.get("/api/ingredients/?name=%D0%A1%D0%90%D0%A5", None).await.json();
    assert_eq!(upper, lower);
}

#[tokio::test]
async fn malformed_input_is_a_validation_error() {
    let k = kitchen().await;

    let response = k
        .app
        .post(
            "/api/recipes/",
            Some(&k.author),
            json!({
                "name": "Cake",
                "text": "text",
                "cooking_time": 10,
                "image": PNG,
                "tags": [k.tag],
                "ingredients": [{ "id": k.flour }],
            }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST, "{}", response.text);
    assert!(response.json()["detail"].as_str().unwrap().contains("amount"));

    let response = k
        .app
        .post(
            "/api/recipes/",
            Some(&k.author),
            json!({ "name": "Cake", "tags": "dessert" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.json()["detail"].is_string());

    let response = k.app.get("/api/recipes/abc/", None).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.json()["detail"].is_string());

    let response = k.app.post_empty("/api/recipes/abc/favorite/", Some(&k.author)).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    assert_eq!(k.app.count("SELECT COUNT(*) FROM recipes").await, 0);
}

#[tokio::test]
async fn ingredient_writes_are_admin_only() {
    let k = kitchen().await;
    let body = json!({ "name": "butter", "measurement_unit": "g" });

    let response = k.app.post("/api/ingredients/", Some(&k.author), body.clone()).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    k.app.make_admin("anna").await;
    let response = k.app.post("/api/ingredients/", Some(&k.author), body).await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.text);
    let id = response.json()["id"].as_i64().unwrap();

    let uri = format!("/api/ingredients/{id}/");
    assert_eq!(k.app.delete(&uri, Some(&k.author)).await.status, StatusCode::NO_CONTENT);
    assert_eq!(k.app.delete(&uri, Some(&k.author)).await.status, StatusCode::NOT_FOUND);
}
