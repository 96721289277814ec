use crate::helpers::spawn_app;

const ROUTES: [&str; 3] = ["/api/waitlist", "/api/referral", "/api/alpha-signup"];

#[tokio::test]
async fn preflight_requests_are_answered_for_every_form() {
    let app = spawn_app().await;

    for route in ROUTES {
        let response = app
            .api_client
            .request(reqwest::Method::OPTIONS, format!("{}{}", &app.address, route))
            .header("Origin", "https://example.com")
            .header("Access-Control-Request-Method", "POST")
            .header("Access-Control-Request-Headers", "content-type")
            .send()
            .await
            .expect("Failed to execute request.");

        assert_eq!(200, response.status().as_u16(), "preflight failed for {route}");
        let headers = response.headers();
        assert_eq!(headers["access-control-allow-origin"], "*");
        assert_eq!(headers["access-control-max-age"], "86400");
        let methods = headers["access-control-allow-methods"].to_str().unwrap();
        assert!(methods.contains("POST") && methods.contains("OPTIONS"));
        let allowed_headers = headers["access-control-allow-headers"].to_str().unwrap();
        assert!(allowed_headers.eq_ignore_ascii_case("content-type"));
    }
}

#[tokio::test]
async fn other_methods_are_rejected_with_405() {
    let app = spawn_app().await;

    for route in ROUTES {
        for method in [reqwest::Method::GET, reqwest::Method::PUT, reqwest::Method::DELETE] {
            let response = app
                .api_client
                .request(method.clone(), format!("{}{}", &app.address, route))
                .header("Origin", "https://example.com")
                .send()
                .await
                .expect("Failed to execute request.");

            assert_eq!(
                405,
                response.status().as_u16(),
                "{method} {route} was not rejected"
            );
            assert_eq!(response.headers()["allow"], "POST, OPTIONS");
            assert_eq!(response.headers()["access-control-allow-origin"], "*");
            let body: serde_json::Value = response.json().await.unwrap();
            assert_eq!(
                body,
                serde_json::json!({ "success": false, "error": "Method not allowed" })
            );
        }
    }
}

#[tokio::test]
async fn error_responses_carry_cors_headers() {
    let app = spawn_app().await;

    let response = app
        .api_client
        .post(format!("{}/api/waitlist", &app.address))
        .header("Origin", "https://example.com")
        .json(&serde_json::json!({}))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(400, response.status().as_u16());
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn preflight_for_a_disallowed_method_is_refused() {
    let app = spawn_app().await;

    let response = app
        .api_client
        .request(reqwest::Method::OPTIONS, format!("{}/api/waitlist", &app.address))
        .header("Origin", "https://example.com")
        .header("Access-Control-Request-Method", "DELETE")
        .send()
        .await
        .expect("Failed to execute request.");

    assert!(response.status().is_client_error());
    assert!(response.headers().get("access-control-allow-origin").is_none());
}
