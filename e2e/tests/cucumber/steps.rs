use std::str::FromStr;

use cucumber::{gherkin::Step, then, when};
use e2e::helpers::json_is_subset_of;
use findexium_engine::db_types::Role;
use log::debug;
use reqwest::Method;
use serde_json::{json, Value};

use crate::cucumber::{
    world::{ADMIN_EMAIL, ADMIN_PASSWORD},
    FdxWorld,
};

#[then("the server is running")]
async fn server_is_running(world: &mut FdxWorld) {
    let (code, body) = world.get("/health").await;
    assert_eq!(code.as_u16(), 200);
    assert_eq!(body, "👍️\n");
}

#[when(expr = "I log in with email {string} and password {string}")]
async fn login_with_email(world: &mut FdxWorld, email: String, password: String) {
    login(world, email, password).await;
}

async fn login(world: &mut FdxWorld, email: String, password: String) {
    // Tokens from earlier logins are not sent along
    world.access_token = None;
    let body = json!({"email": email, "password": password});
    let (code, body) = world.request(Method::POST, "/auth/login", |req| req.json(&body)).await;
    debug!("Got Response: {code} {body}");
    world.logged_in = code == 200;
    if world.logged_in {
        let value: Value = serde_json::from_str(&body).expect("Login response is not JSON");
        let token = value["token"].as_str().expect("No token in login response");
        world.access_token = Some(token.to_string());
    }
    world.response = Some((code, body));
}

#[when("I log in as the administrator")]
async fn admin_login(world: &mut FdxWorld) {
    login(world, ADMIN_EMAIL.into(), ADMIN_PASSWORD.into()).await;
    assert!(world.logged_in, "The administrator could not log in");
}

// Alice logs in with password "Password123!"
#[when(expr = "{word} logs in with password {string}")]
async fn user_login(world: &mut FdxWorld, name: String, password: String) {
    let email = world.user(&name).email.clone();
    login(world, email, password).await;
}

#[when(expr = "I send a {word} request to {string}")]
async fn send_request(world: &mut FdxWorld, method: String, path: String) {
    let method = Method::from_str(method.as_str()).expect("Invalid method");
    let res = world.request(method, path.as_str(), |req| req).await;
    debug!("Got Response: {} {}", res.0, res.1);
    world.response = Some(res);
}

#[when(expr = "I send a {word} request to {string} with body:")]
async fn send_request_with_body(world: &mut FdxWorld, method: String, path: String, step: &Step) {
    let method = Method::from_str(method.as_str()).expect("Invalid method");
    let body = step.docstring().cloned().expect("No request body");
    let res =
        world.request(method, path.as_str(), |req| req.body(body).header("Content-Type", "application/json")).await;
    debug!("Got Response: {} {}", res.0, res.1);
    if res.0.as_u16() == 201 {
        let value: Value = serde_json::from_str(&res.1).expect("Response is not JSON");
        world.last_id = value["id"].as_i64();
    }
    world.response = Some(res);
}

//             I receive a 401 Unauthorized response with the message "Invalid email or password."
#[then(expr = "I receive a {int} {word} response with the message {string}")]
async fn receive_response(world: &mut FdxWorld, status: u16, text: String, message: String) {
    let (res_status, res_msg) = world.response.take().expect("No response received");
    assert_eq!(res_status, status, "Expected {status} {text} response, got {res_status}");
    assert!(res_msg.contains(&message), "Expected response to contain '{message}', got '{res_msg}'");
}

#[then(expr = "I receive a {int} {word} response")]
async fn receive_response_code(world: &mut FdxWorld, status: u16, text: String) {
    let (res_status, res_msg) = world.response.clone().expect("No response received");
    assert_eq!(res_status, status, "Expected {status} {text} response, got {res_status}: {res_msg}");
}

#[then(expr = "I receive a partial JSON response:")]
async fn receive_json_response(world: &mut FdxWorld, step: &Step) {
    let (_res_status, res_msg) = world.response.take().expect("No response received");
    let expected = step.docstring().expect("No expected response");
    assert!(json_is_subset_of(expected, res_msg.as_str()), "Expected response to be '{expected}', got '{res_msg}'");
}

#[then(expr = "the response is a list with {int} entries")]
async fn response_list_length(world: &mut FdxWorld, count: usize) {
    let (_res_status, res_msg) = world.response.take().expect("No response received");
    let value: Value = serde_json::from_str(&res_msg).expect("Response is not JSON");
    let list = value.as_array().expect("Response is not a list");
    assert_eq!(list.len(), count, "Unexpected list: {res_msg}");
}

#[then(expr = "I am logged in")]
fn logged_in(world: &mut FdxWorld) {
    assert!(world.logged_in, "Expected to be logged in");
}

#[then(expr = "I am not logged in")]
fn logged_out(world: &mut FdxWorld) {
    assert!(!world.logged_in, "Expected not to be logged in");
    assert!(world.access_token.is_none());
}

#[then(expr = "my access token has the role {word}")]
fn token_has_role(world: &mut FdxWorld, role: String) {
    let role = Role::from_str(&role).expect("Invalid role");
    let claims = world.access_claims();
    assert!(claims.has_role(role), "Expected {role} in {:?}", claims.roles);
}

#[then(expr = "my access token does not have the role {word}")]
fn token_lacks_role(world: &mut FdxWorld, role: String) {
    let role = Role::from_str(&role).expect("Invalid role");
    let claims = world.access_claims();
    assert!(!claims.has_role(role), "Did not expect {role} in {:?}", claims.roles);
}

#[then(expr = "my access token belongs to {word}")]
fn token_belongs_to(world: &mut FdxWorld, name: String) {
    let claims = world.access_claims();
    assert_eq!(claims.user_id, world.user(&name).id);
}
