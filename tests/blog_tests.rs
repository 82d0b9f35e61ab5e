use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use http_body_util::BodyExt;
use quill::config::Config;
use quill::services::blog_service::today_publish_date;
use quill::web::{AppState, create_app_state, router};
use std::sync::Arc;
use tower::ServiceExt;

struct TestApp {
    router: Router,
    state: Arc<AppState>,
}

/// A browser-ish client: remembers the session cookie between requests.
#[derive(Default)]
struct Client {
    cookie: Option<String>,
}

async fn spawn_app() -> TestApp {
    let path = std::env::temp_dir().join(format!("quill-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_url = format!("sqlite:{}", path.display());
    config.security.secret_key = Some("integration-test-secret".to_string());
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;

    let state = create_app_state(config)
        .await
        .expect("Failed to create app state");

    TestApp {
        router: router(state.clone()),
        state,
    }
}

impl Client {
    async fn send(&mut self, app: &TestApp, mut request: Request<Body>) -> Response {
        if let Some(cookie) = &self.cookie {
            request
                .headers_mut()
                .insert(header::COOKIE, cookie.parse().unwrap());
        }

        let response = app.router.clone().oneshot(request).await.unwrap();

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let pair = set_cookie.to_str().unwrap().split(';').next().unwrap();
            self.cookie = Some(pair.to_string());
        }

        response
    }

    async fn get(&mut self, app: &TestApp, uri: &str) -> Response {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.send(app, request).await
    }

    async fn post_form(&mut self, app: &TestApp, uri: &str, form: &str) -> Response {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .unwrap();
        self.send(app, request).await
    }

    async fn register(&mut self, app: &TestApp, email: &str, name: &str) -> Response {
        self.post_form(
            app,
            "/register",
            &format!("email={email}&password=secret&name={name}"),
        )
        .await
    }
}

async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

const HELLO_POST: &str = "title=Hello+World&subtitle=First+post\
    &img_url=https%3A%2F%2Fexample.com%2Fhello.png&body=%3Cp%3EHi+there%3C%2Fp%3E";

async fn admin_with_post(app: &TestApp) -> Client {
    let mut admin = Client::default();
    admin.register(app, "admin@example.com", "Admin").await;

    let response = admin.post_form(app, "/new-post", HELLO_POST).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    admin
}

#[tokio::test]
async fn test_public_pages() {
    let app = spawn_app().await;
    let mut visitor = Client::default();

    for uri in ["/", "/about", "/contact", "/register", "/login"] {
        let response = visitor.get(&app, uri).await;
        assert_eq!(response.status(), StatusCode::OK, "GET {uri}");
        assert!(response.headers().contains_key("content-security-policy"));
    }

    let response = visitor.get(&app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = visitor.get(&app, "/static/css/styles.css").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/css"
    );

    let response = visitor.get(&app, "/static/missing.js").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = visitor.get(&app, "/no-such-page").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_register_logs_in() {
    let app = spawn_app().await;
    let mut client = Client::default();

    let response = client.register(&app, "writer@example.com", "Writer").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    let html = body_text(client.get(&app, "/").await).await;
    assert!(html.contains("Hi, Writer"));
    assert!(html.contains("/logout"));
}

#[tokio::test]
async fn test_duplicate_email_is_rejected() {
    let app = spawn_app().await;
    let mut first = Client::default();
    first.register(&app, "taken@example.com", "First").await;

    let mut second = Client::default();
    let response = second.register(&app, "taken@example.com", "Second").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/register");

    let html = body_text(second.get(&app, "/register").await).await;
    assert!(html.contains("This email has already been registered, try another"));
    assert!(!html.contains("/logout"));

    assert_eq!(app.state.store().list_users().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_invalid_registration_rerenders_form() {
    let app = spawn_app().await;
    let mut client = Client::default();

    let response = client.register(&app, "not-an-email", "Writer").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Enter a valid email address"));
    assert!(app.state.store().list_users().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_login_and_logout() {
    let app = spawn_app().await;
    Client::default()
        .register(&app, "reader@example.com", "Reader")
        .await;

    let mut client = Client::default();

    let response = client
        .post_form(&app, "/login", "email=reader@example.com&password=wrong")
        .await;
    assert_eq!(location(&response), "/login");
    let html = body_text(client.get(&app, "/login").await).await;
    assert!(html.contains("Password is incorrect, try again"));
    assert!(!html.contains("/logout"));

    let response = client
        .post_form(&app, "/login", "email=nobody@example.com&password=secret")
        .await;
    assert_eq!(location(&response), "/login");
    let html = body_text(client.get(&app, "/login").await).await;
    assert!(html.contains("This email does not exist, please try another"));

    let response = client
        .post_form(&app, "/login", "email=reader@example.com&password=secret")
        .await;
    assert_eq!(location(&response), "/");
    let html = body_text(client.get(&app, "/").await).await;
    assert!(html.contains("Logged in successfully"));
    assert!(html.contains("Hi, Reader"));

    let response = client.get(&app, "/logout").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let html = body_text(client.get(&app, "/").await).await;
    assert!(!html.contains("Hi, Reader"));
    assert!(html.contains("/login"));
}

#[tokio::test]
async fn test_only_admin_manages_posts() {
    let app = spawn_app().await;
    let _admin = admin_with_post(&app).await;

    let mut anonymous = Client::default();
    let mut member = Client::default();
    member.register(&app, "member@example.com", "Member").await;

    for client in [&mut anonymous, &mut member] {
        for uri in ["/new-post", "/edit-post/1", "/delete/1"] {
            let response = client.get(&app, uri).await;
            assert_eq!(response.status(), StatusCode::FORBIDDEN, "GET {uri}");
        }

        let response = client.post_form(&app, "/new-post", HELLO_POST).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = client
            .post_form(
                &app,
                "/edit-post/1",
                "title=Hijacked&subtitle=Nope\
                 &img_url=https%3A%2F%2Fexample.com%2Fx.png&body=%3Cp%3Ex%3C%2Fp%3E",
            )
            .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    assert_eq!(app.state.store().count_posts().await.unwrap(), 1);
    let post = app.state.store().get_post(1).await.unwrap().unwrap();
    assert_eq!(post.title, "Hello World");
    assert_eq!(post.author_id, 1);
}

#[tokio::test]
async fn test_blank_input_is_rejected() {
    let app = spawn_app().await;
    let mut admin = admin_with_post(&app).await;

    let response = admin.post_form(&app, "/post/1", "comment=+++").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Comment cannot be empty"));
    assert_eq!(app.state.store().count_comments(1).await.unwrap(), 0);

    let response = admin
        .post_form(
            &app,
            "/new-post",
            "title=+++&subtitle=+++\
             &img_url=https%3A%2F%2Fexample.com%2Fblank.png&body=%3Cp%3Ex%3C%2Fp%3E",
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Title is required"));
    assert_eq!(app.state.store().count_posts().await.unwrap(), 1);

    let response = admin
        .post_form(
            &app,
            "/edit-post/1",
            "title=+&subtitle=Still+here\
             &img_url=https%3A%2F%2Fexample.com%2Fhello.png&body=%3Cp%3Ex%3C%2Fp%3E",
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let post = app.state.store().get_post(1).await.unwrap().unwrap();
    assert_eq!(post.title, "Hello World");
}

#[tokio::test]
async fn test_create_and_read_post() {
    let app = spawn_app().await;
    let mut admin = admin_with_post(&app).await;

    let post = app.state.store().get_post(1).await.unwrap().unwrap();
    assert_eq!(post.title, "Hello World");
    assert_eq!(post.date, today_publish_date());
    assert_eq!(post.author_id, 1);

    let html = body_text(admin.get(&app, "/").await).await;
    assert!(html.contains("Hello World"));
    assert!(html.contains("/new-post"));
    assert!(html.contains("/delete/1"));

    let response = Client::default().get(&app, "/post/1").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Hello World"));
    assert!(html.contains("<p>Hi there</p>"));
    assert!(html.contains("Posted by Admin"));
    assert!(!html.contains("/edit-post/1"));
}

#[tokio::test]
async fn test_duplicate_title_rerenders_form() {
    let app = spawn_app().await;
    let mut admin = admin_with_post(&app).await;

    let response = admin.post_form(&app, "/new-post", HELLO_POST).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Hello World"));
    assert_eq!(app.state.store().count_posts().await.unwrap(), 1);
}

#[tokio::test]
async fn test_edit_post() {
    let app = spawn_app().await;
    let mut admin = admin_with_post(&app).await;

    let html = body_text(admin.get(&app, "/edit-post/1").await).await;
    assert!(html.contains("value=\"Hello World\""));

    let response = admin
        .post_form(
            &app,
            "/edit-post/1",
            "title=Goodbye+World&subtitle=Edited\
             &img_url=https%3A%2F%2Fexample.com%2Fbye.png&body=%3Cp%3EBye%3C%2Fp%3E",
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/post/1");

    let post = app.state.store().get_post(1).await.unwrap().unwrap();
    assert_eq!(post.title, "Goodbye World");
    assert_eq!(post.body, "<p>Bye</p>");
    assert_eq!(app.state.store().count_posts().await.unwrap(), 1);

    let response = admin.get(&app, "/edit-post/42").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_anonymous_comment_is_not_stored() {
    let app = spawn_app().await;
    let _admin = admin_with_post(&app).await;

    let mut anonymous = Client::default();
    let response = anonymous
        .post_form(&app, "/post/1", "comment=drive-by")
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");

    let html = body_text(anonymous.get(&app, "/login").await).await;
    assert!(html.contains("You need to login or register to comment."));
    assert_eq!(app.state.store().count_comments(1).await.unwrap(), 0);
}

#[tokio::test]
async fn test_comment_is_stored_and_escaped() {
    let app = spawn_app().await;
    let _admin = admin_with_post(&app).await;

    let mut member = Client::default();
    member.register(&app, "member@example.com", "Member").await;

    let response = member
        .post_form(
            &app,
            "/post/1",
            "comment=%3Cscript%3Ealert(1)%3C%2Fscript%3E",
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/post/1");

    let html = body_text(member.get(&app, "/post/1").await).await;
    assert!(html.contains("Member"));
    assert!(html.contains("gravatar.com"));
    assert!(!html.contains("<script>alert(1)</script>"));
    assert_eq!(app.state.store().count_comments(1).await.unwrap(), 1);

    let response = member.post_form(&app, "/post/1", "comment=").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Comment cannot be empty"));
    assert_eq!(app.state.store().count_comments(1).await.unwrap(), 1);
}

#[tokio::test]
async fn test_delete_post_removes_it_from_index() {
    let app = spawn_app().await;
    let mut admin = admin_with_post(&app).await;
    admin.post_form(&app, "/post/1", "comment=bye").await;

    let response = admin.get(&app, "/delete/1").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    let html = body_text(admin.get(&app, "/").await).await;
    assert!(!html.contains("Hello World"));
    assert_eq!(app.state.store().count_comments(1).await.unwrap(), 0);
}

#[tokio::test]
async fn test_missing_post_is_404() {
    let app = spawn_app().await;
    let mut visitor = Client::default();

    let response = visitor.get(&app, "/post/999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = visitor.post_form(&app, "/post/abc", "comment=x").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
