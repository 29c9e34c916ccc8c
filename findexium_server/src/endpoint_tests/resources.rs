use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use findexium_engine::{
    db_types::{Record, Role},
    resource_types::{Bid, Rating},
    test_utils::prepare_env::new_test_database,
    ResourceApi,
    SqliteDatabase,
};
use serde_json::json;

use super::helpers::{bearer, claims, issue_token, send};
use crate::resource_routes::ResourceRoutes;

fn configure_app(db: SqliteDatabase) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        let scope = web::scope("/api")
            .service(ResourceRoutes::<SqliteDatabase, Bid>::new("/bid"))
            .service(ResourceRoutes::<SqliteDatabase, Rating>::new("/rating"));
        cfg.app_data(web::Data::new(ResourceApi::new(db))).service(scope);
    }
}

fn admin_token() -> String {
    issue_token(claims("1", "admin", &[Role::Admin]))
}

fn user_token() -> String {
    issue_token(claims("20", "bob", &[Role::User]))
}

fn bid(account: &str) -> Bid {
    Bid { account: Some(account.into()), bid_type: Some("Spot".into()), bid_quantity: Some(100.0), ..Default::default() }
}

#[actix_web::test]
async fn user_cannot_delete_bids() {
    let db = new_test_database().await;
    let api = ResourceApi::new(db.clone());
    let record = api.create(bid("ACC-1")).await.unwrap();

    let req = TestRequest::delete().uri(&format!("/api/bid/{}", record.id)).insert_header(bearer(&user_token()));
    let reply = send(req, configure_app(db.clone())).await;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);
    let still_there = api.fetch_by_id::<Bid>(record.id).await.unwrap();
    assert_eq!(still_there, Some(record));
}

#[actix_web::test]
async fn admin_deletes_bids() {
    let db = new_test_database().await;
    let api = ResourceApi::new(db.clone());
    let record = api.create(bid("ACC-1")).await.unwrap();
    let path = format!("/api/bid/{}", record.id);

    let reply = send(TestRequest::delete().uri(&path).insert_header(bearer(&admin_token())), configure_app(db.clone())).await;
    assert_eq!(reply.status, StatusCode::NO_CONTENT);
    let reply = send(TestRequest::get().uri(&path).insert_header(bearer(&admin_token())), configure_app(db.clone())).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    let reply = send(TestRequest::delete().uri(&path).insert_header(bearer(&admin_token())), configure_app(db)).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn bids_require_a_token() {
    let db = new_test_database().await;
    let reply = send(TestRequest::get().uri("/api/bid"), configure_app(db)).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn user_creates_and_lists_bids() {
    let db = new_test_database().await;
    let body = json!({"account": "ACC-7", "bid_type": "Forward", "bid_quantity": 12.5});
    let req = TestRequest::post().uri("/api/bid").insert_header(bearer(&user_token())).set_json(body);
    let reply = send(req, configure_app(db.clone())).await;
    assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.body);
    let created: Record<Bid> = reply.json();
    assert_eq!(reply.location, Some(format!("/api/bid/{}", created.id)));
    assert_eq!(created.data.account.as_deref(), Some("ACC-7"));
    assert_eq!(created.data.bid_quantity, Some(12.5));

    let reply = send(TestRequest::get().uri("/api/bid").insert_header(bearer(&user_token())), configure_app(db)).await;
    assert_eq!(reply.status, StatusCode::OK);
    let bids: Vec<Record<Bid>> = reply.json();
    assert_eq!(bids, vec![created]);
}

#[actix_web::test]
async fn created_rating_can_be_fetched_by_id() {
    let db = new_test_database().await;
    let body = json!({"moodys_rating": "Aa1", "order_number": 3});
    let req = TestRequest::post().uri("/api/rating").insert_header(bearer(&user_token())).set_json(body);
    let reply = send(req, configure_app(db.clone())).await;
    assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.body);
    let created: Record<Rating> = reply.json();
    let location = reply.location.clone().unwrap();

    let reply = send(TestRequest::get().uri(&location).insert_header(bearer(&user_token())), configure_app(db)).await;
    assert_eq!(reply.status, StatusCode::OK, "{}", reply.body);
    let fetched: Record<Rating> = reply.json();
    assert_eq!(fetched, created);
    assert_eq!(fetched.data.moodys_rating.as_deref(), Some("Aa1"));
}

#[actix_web::test]
async fn bid_without_account_is_rejected() {
    let db = new_test_database().await;
    let req = TestRequest::post().uri("/api/bid").insert_header(bearer(&user_token())).set_json(json!({"account": " "}));
    let reply = send(req, configure_app(db.clone())).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    let api = ResourceApi::new(db);
    assert!(api.fetch_all::<Bid>().await.unwrap().is_empty());
}

#[actix_web::test]
async fn update_bid() {
    let db = new_test_database().await;
    let record = ResourceApi::new(db.clone()).create(bid("ACC-1")).await.unwrap();
    let path = format!("/api/bid/{}", record.id);

    let body = json!({"id": record.id, "account": "ACC-2", "bid_quantity": 5.0});
    let req = TestRequest::put().uri(&path).insert_header(bearer(&user_token())).set_json(body);
    let reply = send(req, configure_app(db.clone())).await;
    assert_eq!(reply.status, StatusCode::OK, "{}", reply.body);
    let updated: Record<Bid> = reply.json();
    assert_eq!(updated.id, record.id);
    assert_eq!(updated.data.account.as_deref(), Some("ACC-2"));
    // Updates replace the whole record
    assert_eq!(updated.data.bid_type, None);

    let body = json!({"id": record.id + 1, "account": "ACC-3"});
    let req = TestRequest::put().uri(&path).insert_header(bearer(&user_token())).set_json(body);
    let reply = send(req, configure_app(db.clone())).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);

    let req = TestRequest::put().uri("/api/bid/9999").insert_header(bearer(&user_token())).set_json(json!({"account": "X"}));
    let reply = send(req, configure_app(db)).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn non_numeric_ids_are_rejected() {
    let db = new_test_database().await;
    let req = TestRequest::get().uri("/api/bid/abc").insert_header(bearer(&user_token()));
    let reply = send(req, configure_app(db)).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert!(reply.body.starts_with(r#"{"error":"Could not read request path"#), "{}", reply.body);
}

#[actix_web::test]
async fn rating_needs_an_agency() {
    let db = new_test_database().await;
    let req =
        TestRequest::post().uri("/api/rating").insert_header(bearer(&user_token())).set_json(json!({"order_number": 3}));
    let reply = send(req, configure_app(db.clone())).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);

    let body = json!({"fitch_rating": "AA", "order_number": 3});
    let req = TestRequest::post().uri("/api/rating").insert_header(bearer(&user_token())).set_json(body);
    let reply = send(req, configure_app(db)).await;
    assert_eq!(reply.status, StatusCode::CREATED);
    let rating: Record<Rating> = reply.json();
    assert_eq!(rating.data.fitch_rating.as_deref(), Some("AA"));
}
