#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{arithmetic_api, combine, midpoint, Point};
use serde_json::json;
use tapi::{Api, ApiMethod, ApiRequest, Callable, RegistrationError};

#[tokio::test]
async fn test_get_binds_query_string() {
    let api = arithmetic_api();
    let response = api.handle(ApiRequest::get("/subtract?x=5&y=1")).await;
    assert_eq!(response.status, 200);
    assert_eq!(response.to_json(), json!({"result": 4, "http_code": 200}));
}

#[tokio::test]
async fn test_same_path_get_and_post() {
    let api = arithmetic_api();
    let expected = json!({"result": 15, "http_code": 200});

    let post = api
        .handle(ApiRequest::post("/add", r#"{"x": 5, "y": 10}"#))
        .await;
    assert_eq!(post.to_json(), expected);

    let get = api.handle(ApiRequest::get("/add?x=5&y=10")).await;
    assert_eq!(get.to_json(), expected);
}

#[tokio::test]
async fn test_unknown_path_is_404() {
    let api = arithmetic_api();
    let response = api.handle(ApiRequest::get("/not-found")).await;
    assert_eq!(response.status, 404);
    assert_eq!(
        response.to_json(),
        json!({"message": "Not Found", "http_code": 404})
    );
}

#[tokio::test]
async fn test_wrong_method_is_405() {
    let api = arithmetic_api();
    let response = api.handle(ApiRequest::get("/divide?x=1&y=1")).await;
    assert_eq!(response.status, 405);
}

#[tokio::test]
async fn test_failing_function_is_500() {
    let api = arithmetic_api();
    let response = api
        .handle(ApiRequest::post("/divide", r#"{"x": 5, "y": 0}"#))
        .await;
    assert_eq!(response.status, 500);
    assert_eq!(
        response.to_json(),
        json!({"message": "Internal server error", "http_code": 500})
    );

    let ok = api
        .handle(ApiRequest::post("/divide", r#"{"x": 5, "y": 2}"#))
        .await;
    assert_eq!(ok.to_json(), json!({"result": 2.5, "http_code": 200}));
}

#[tokio::test]
async fn test_invalid_input_is_422() {
    let api = arithmetic_api();
    let cases = [
        ApiRequest::post("/add", r#"{"x": 5}"#),
        ApiRequest::post("/add", r#"{"x": "five", "y": 1}"#),
        ApiRequest::post("/add", "not json"),
        ApiRequest::get("/subtract?x=5&y=one"),
    ];
    for request in cases {
        let response = api.handle(request).await;
        assert_eq!(response.status, 422);
        let body = response.to_json();
        assert_eq!(body["http_code"], 422);
        assert!(body["message"].is_string());
    }
}

#[tokio::test]
async fn test_health_check() {
    let api = arithmetic_api();
    let response = api.handle(ApiRequest::get("/health_check")).await;
    assert_eq!(response.status, 200);
    assert_eq!(
        response.to_json(),
        json!({"message": "Service is running", "http_code": 200})
    );

    let post = api.handle(ApiRequest::post("/health_check", "{}")).await;
    assert_eq!(post.status, 405);
}

#[tokio::test]
async fn test_openapi_document() {
    let api = arithmetic_api();
    let response = api.handle(ApiRequest::get("/openapi.json")).await;
    assert_eq!(response.status, 200);

    let document = response.to_json();
    assert_eq!(document["openapi"], "3.1.0");
    assert_eq!(document["info"]["title"], "arithmetic");
    assert!(document["paths"]["/add"]["get"].is_object());
    assert!(document["paths"]["/add"]["post"]["requestBody"].is_object());
    assert!(document["paths"]["/subtract"]["get"]["parameters"].is_array());
    assert!(document["paths"]["/health_check"]["get"].is_object());
}

#[tokio::test]
async fn test_record_passthrough() {
    let mut api = Api::new();
    let callable = Callable::new("midpoint", &["a", "b"], midpoint);
    api.add_endpoint("midpoint", "/midpoint", &callable, ApiMethod::Post)
        .unwrap();

    let response = api
        .handle(ApiRequest::post(
            "/midpoint",
            r#"{"a": {"x": 0, "y": 0}, "b": {"x": 2, "y": 4}}"#,
        ))
        .await;
    assert_eq!(response.status, 200);
    let result: Point =
        serde_json::from_value(response.to_json()["result"].clone()).unwrap();
    assert_eq!(result, Point { x: 1.0, y: 2.0 });

    let bad = api
        .handle(ApiRequest::post("/midpoint", r#"{"a": {"x": 0}, "b": {"x": 2, "y": 4}}"#))
        .await;
    assert_eq!(bad.status, 422);
}

#[tokio::test]
async fn test_async_function_endpoint() {
    async fn double(value: i64) -> i64 {
        tokio::task::yield_now().await;
        value * 2
    }

    let mut api = Api::new();
    let callable = Callable::new("double", &["value"], double);
    api.add_endpoint("double", "/double", &callable, ApiMethod::Get)
        .unwrap();

    let response = api.handle(ApiRequest::get("/double?value=21")).await;
    assert_eq!(response.to_json(), json!({"result": 42, "http_code": 200}));
}

#[test]
fn test_reserved_and_conflicting_routes() {
    let mut api = arithmetic_api();
    assert!(matches!(
        api.add_endpoint("again", "/add", &common::add(), ApiMethod::Get),
        Err(RegistrationError::RouteConflict { .. })
    ));
    assert!(matches!(
        api.add_endpoint("health", "/health_check", &common::add(), ApiMethod::Post),
        Err(RegistrationError::RouteConflict { .. })
    ));
    assert_eq!(api.len(), 4);
}

#[tokio::test]
async fn test_same_named_records_in_one_signature() {
    let mut api = Api::new();
    let callable = Callable::new("combine", &["a", "b"], combine);
    api.add_endpoint("combine", "/combine", &callable, ApiMethod::Post)
        .unwrap();

    let response = api
        .handle(ApiRequest::post(
            "/combine",
            r#"{"a": {"x": 1, "y": 2}, "b": {"lat": 3}}"#,
        ))
        .await;
    assert_eq!(response.status, 200);
    assert_eq!(response.to_json(), json!({"result": 6.0, "http_code": 200}));

    let swapped = api
        .handle(ApiRequest::post(
            "/combine",
            r#"{"a": {"lat": 3}, "b": {"x": 1, "y": 2}}"#,
        ))
        .await;
    assert_eq!(swapped.status, 422);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_to_one_handler() {
    async fn slow_square(value: i64) -> i64 {
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
        value * value
    }

    let mut api = Api::new();
    let callable = Callable::new("slow_square", &["value"], slow_square);
    api.add_endpoint("square", "/square", &callable, ApiMethod::Get)
        .unwrap();
    let api = std::sync::Arc::new(api);

    let requests = (0..32i64).map(|value| {
        let api = std::sync::Arc::clone(&api);
        tokio::spawn(async move {
            let response = api
                .handle(ApiRequest::get(&format!("/square?value={value}")))
                .await;
            (value, response)
        })
    });
    let responses = futures::future::join_all(requests).await;

    assert_eq!(responses.len(), 32);
    for joined in responses {
        let (value, response) = joined.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(
            response.to_json(),
            json!({"result": value * value, "http_code": 200})
        );
    }
}
