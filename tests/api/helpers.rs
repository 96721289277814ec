use once_cell::sync::Lazy;
use secrecy::SecretString;
use signup_api::{
    configuration::{Settings, get_configuration},
    startup::Application,
    telemetry::{get_subscriber, init_subscriber},
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber).expect("Failed to init tracing");
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber).expect("Failed to init tracing");
    }
});

pub const ADMIN_EMAIL: &str = "admin@example.com";

pub struct TestApp {
    pub address: String,
    pub email_server: MockServer,
    pub captcha_server: MockServer,
    pub api_client: reqwest::Client,
}

impl TestApp {
    pub async fn post_json(&self, route: &str, body: &serde_json::Value) -> reqwest::Response {
        self.api_client
            .post(format!("{}{}", &self.address, route))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_waitlist(&self, body: &serde_json::Value) -> reqwest::Response {
        self.post_json("/api/waitlist", body).await
    }

    pub async fn post_referral(&self, body: &serde_json::Value) -> reqwest::Response {
        self.post_json("/api/referral", body).await
    }

    pub async fn post_alpha(&self, body: &serde_json::Value) -> reqwest::Response {
        self.post_json("/api/alpha-signup", body).await
    }

    /// Recipients of every email the app sent, in order.
    pub async fn email_recipients(&self) -> Vec<String> {
        self.email_server
            .received_requests()
            .await
            .unwrap()
            .iter()
            .filter(|r| r.url.path() == "/v3/mail/send")
            .map(|r| {
                let body: serde_json::Value = serde_json::from_slice(&r.body).unwrap();
                body["personalizations"][0]["to"][0]["email"]
                    .as_str()
                    .unwrap()
                    .to_string()
            })
            .collect()
    }

    /// Bodies of every contact upsert the app sent.
    pub async fn contact_upserts(&self) -> Vec<serde_json::Value> {
        self.email_server
            .received_requests()
            .await
            .unwrap()
            .iter()
            .filter(|r| r.url.path() == "/v3/marketing/contacts")
            .map(|r| serde_json::from_slice(&r.body).unwrap())
            .collect()
    }
}

pub struct RecipientMatcher(pub &'static str);

impl wiremock::Match for RecipientMatcher {
    fn matches(&self, request: &wiremock::Request) -> bool {
        serde_json::from_slice::<serde_json::Value>(&request.body)
            .map(|body| body["personalizations"][0]["to"][0]["email"] == self.0)
            .unwrap_or(false)
    }
}

pub async fn mount_email_api(server: &MockServer, status: u16) {
    Mock::given(path("/v3/mail/send"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
    Mock::given(path("/v3/marketing/contacts"))
        .and(method("PUT"))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

pub async fn mount_captcha_verdict(server: &MockServer, success: bool) {
    Mock::given(path("/siteverify"))
        .and(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "success": success })),
        )
        .mount(server)
        .await;
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

pub async fn spawn_app_with(customise: impl FnOnce(&mut Settings)) -> TestApp {
    Lazy::force(&TRACING);

    let email_server = MockServer::start().await;
    let captcha_server = MockServer::start().await;

    let config = {
        let mut c = get_configuration().expect("Failed to read configuration");
        c.app.host = "127.0.0.1".into();
        c.app.port = 0;
        c.email_client.base_url = email_server.uri();
        c.email_client.api_key = Some(SecretString::from("test-api-key".to_string()));
        c.email_client.timeout_ms = 500;
        c.bot_verifier.verify_url = format!("{}/siteverify", captcha_server.uri());
        c.bot_verifier.secret_key = Some(SecretString::from("test-secret".to_string()));
        c.bot_verifier.timeout_ms = 500;
        c.notifications.admin_email = ADMIN_EMAIL.into();
        customise(&mut c);
        c
    };

    let application = Application::build(config).expect("Failed to build application.");
    let port = application.get_port();
    let _ = tokio::spawn(application.run_until_stopped());

    TestApp {
        address: format!("http://127.0.0.1:{port}"),
        email_server,
        captcha_server,
        api_client: reqwest::Client::new(),
    }
}
