use allo_controller::prelude::*;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tower::ServiceExt;

#[controller]
struct HomepageController {
    ctx: ControllerContext,
}

#[lifecycle]
impl HomepageController {
    fn render_default(&mut self) -> Result<Flow> {
        self.send_text("Default")
    }

    async fn action_about_us(&mut self) -> Result<Flow> {
        self.send_json(&serde_json::json!({ "page": "about" }), false)
    }
}

#[controller]
struct ItemController {
    ctx: ControllerContext,
}

#[lifecycle]
impl ItemController {
    fn action_show(&mut self, params: &Params) -> Result<Flow> {
        let id = params.get("id").cloned().unwrap_or_default();
        self.send_text(format!("item {id}"))
    }
}

#[controller]
struct EmptyController {
    ctx: ControllerContext,
}

#[lifecycle]
impl EmptyController {}

struct TeapotFilter;

impl ExceptionFilter for TeapotFilter {
    fn catch(&self, error: ControllerError) -> Response {
        (StatusCode::IM_A_TEAPOT, error.to_string()).into_response()
    }
}

fn manager() -> Arc<ControllerManager> {
    let mut manager = ControllerManager::default();
    manager
        .register::<HomepageController>()
        .unwrap()
        .register::<ItemController>()
        .unwrap()
        .register::<EmptyController>()
        .unwrap();
    Arc::new(manager)
}

fn routes(list: RouterList) -> Router {
    list.add("/health", get(|| async { "OK" }))
        .add_controller("/", "Homepage:default")
        .unwrap()
        .add_controller("/empty", "Empty:default")
        .unwrap()
        .add_controller("/item/{id}", "Item:show")
        .unwrap()
        .add_controller("/{action}", "Homepage:default")
        .unwrap()
        .add_controller("/{controller}/{action}", "Homepage:default")
        .unwrap()
        .into_router()
}

fn app() -> Router {
    routes(RouterList::new(manager()))
}

async fn call(app: Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn renders_default_view() {
    let (status, body) = call(app(), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Default");
}

#[tokio::test]
async fn path_params_reach_the_action() {
    let (status, body) = call(app(), "/item/42").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "item 42");
}

#[tokio::test]
async fn action_param_overrides_meta() {
    let (status, body) = call(app(), "/about-us").await;
    assert_eq!(status, StatusCode::OK);

    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["page"], "about");
}

#[tokio::test]
async fn controller_param_overrides_meta() {
    let (status, body) = call(app(), "/homepage/about-us").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"page":"about"}"#);
}

#[tokio::test]
async fn unknown_controller_is_not_found() {
    let (status, body) = call(app(), "/missing-page/default").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["statusCode"], 404);
    assert_eq!(json["message"], "Controller not found: MissingPage");
}

#[tokio::test]
async fn incomplete_lifecycle_is_server_error() {
    let (status, body) = call(app(), "/empty").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["statusCode"], 500);
    assert!(json["message"]
        .as_str()
        .unwrap()
        .contains("without sending a response"));
}

#[tokio::test]
async fn unknown_action_without_render_is_server_error() {
    let (status, _) = call(app(), "/contact").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn plain_routes_are_kept() {
    let (status, body) = call(app(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
}

#[tokio::test]
async fn custom_exception_filter() {
    let app = routes(RouterList::new(manager()).with_exception_filter(TeapotFilter));
    let (status, body) = call(app, "/empty").await;
    assert_eq!(status, StatusCode::IM_A_TEAPOT);
    assert!(body.starts_with("Controller EmptyController completed action 'default'"));
}
