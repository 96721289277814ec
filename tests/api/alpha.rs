use wiremock::{
    Mock, ResponseTemplate,
    matchers::{any, body_string_contains, path},
};

use crate::helpers::{
    ADMIN_EMAIL, mount_captcha_verdict, mount_email_api, spawn_app, spawn_app_with,
};

fn valid_body() -> serde_json::Value {
    serde_json::json!({
        "name": "Ann",
        "email": "ann@example.com",
        "github": "ann-dev",
        "discoverySource": "A friend",
        "motivation": "I want to build agents on top of this.",
        "botToken": "turnstile-token"
    })
}

#[tokio::test]
async fn alpha_returns_200_for_a_verified_request() {
    let app = spawn_app().await;
    mount_captcha_verdict(&app.captcha_server, true).await;
    mount_email_api(&app.email_server, 202).await;

    let response = app.post_alpha(&valid_body()).await;

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body,
        serde_json::json!({ "success": true, "message": "Alpha access request received!" })
    );
    assert_eq!(app.email_recipients().await, vec!["ann@example.com", ADMIN_EMAIL]);
}

#[tokio::test]
async fn alpha_forwards_the_token_and_client_ip_to_the_verifier() {
    let app = spawn_app().await;
    Mock::given(path("/siteverify"))
        .and(body_string_contains("secret=test-secret"))
        .and(body_string_contains("response=turnstile-token"))
        .and(body_string_contains("remoteip=203.0.113.7"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "success": true })),
        )
        .expect(1)
        .mount(&app.captcha_server)
        .await;
    mount_email_api(&app.email_server, 202).await;

    let response = app
        .api_client
        .post(format!("{}/api/alpha-signup", &app.address))
        .header("CF-Connecting-IP", "203.0.113.7")
        .json(&valid_body())
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(200, response.status().as_u16());
}

#[tokio::test]
async fn alpha_rejects_a_malformed_github_username() {
    let app = spawn_app().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.captcha_server)
        .await;

    let mut body = valid_body();
    body["github"] = serde_json::json!("bad_name!");
    let response = app.post_alpha(&body).await;

    assert_eq!(400, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Invalid GitHub username format");
}

#[tokio::test]
async fn alpha_rejects_a_short_motivation() {
    let app = spawn_app().await;

    let mut body = valid_body();
    body["motivation"] = serde_json::json!("because");
    let response = app.post_alpha(&body).await;

    assert_eq!(400, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body["error"],
        "Please tell us a bit more about your motivation (at least 20 characters)"
    );
}

#[tokio::test]
async fn alpha_lists_all_missing_fields() {
    let app = spawn_app().await;

    let response = app
        .post_alpha(&serde_json::json!({ "name": "Ann", "botToken": "t" }))
        .await;

    assert_eq!(400, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body["error"],
        "Missing required fields: email, github, discoverySource, motivation"
    );
}

#[tokio::test]
async fn alpha_returns_400_when_bot_verification_fails() {
    let app = spawn_app().await;
    mount_captcha_verdict(&app.captcha_server, false).await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(202))
        .expect(0)
        .mount(&app.email_server)
        .await;

    let response = app.post_alpha(&valid_body()).await;

    assert_eq!(400, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Bot verification failed. Please try again.");
}

#[tokio::test]
async fn alpha_returns_400_without_a_token_when_verification_is_configured() {
    let app = spawn_app().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.captcha_server)
        .await;

    let mut body = valid_body();
    body.as_object_mut().unwrap().remove("botToken");
    let response = app.post_alpha(&body).await;

    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn alpha_skips_verification_when_no_secret_is_configured() {
    let app = spawn_app_with(|c| c.bot_verifier.secret_key = None).await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.captcha_server)
        .await;
    mount_email_api(&app.email_server, 202).await;

    let mut body = valid_body();
    body.as_object_mut().unwrap().remove("botToken");
    let response = app.post_alpha(&body).await;

    assert_eq!(200, response.status().as_u16());
}

#[tokio::test]
async fn alpha_returns_400_when_the_verifier_is_down() {
    let app = spawn_app().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(503))
        .mount(&app.captcha_server)
        .await;

    let response = app.post_alpha(&valid_body()).await;

    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn alpha_succeeds_without_sending_when_the_email_api_is_unconfigured() {
    let app = spawn_app_with(|c| c.email_client.api_key = None).await;
    mount_captcha_verdict(&app.captcha_server, true).await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(202))
        .expect(0)
        .mount(&app.email_server)
        .await;

    let response = app.post_alpha(&valid_body()).await;

    assert_eq!(200, response.status().as_u16());
}
