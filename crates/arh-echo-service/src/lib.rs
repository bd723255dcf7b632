// ----- standard library imports
// ----- extra library imports
use axum::routing::{any, get};
use axum::{Json, Router};
use utoipa::OpenApi;
// ----- local modules
mod error;
mod web;
// ----- local imports

// ----- end imports

pub fn routes() -> Router {
    Router::new()
        .route("/v1/echo", any(web::echo))
        .route("/v1/raw", any(web::raw))
        .route("/v1/people/{name}", get(web::lookup_person))
        .route("/v1/gzip", get(web::gzip))
        .route("/v1/slow", get(web::slow))
        .route("/api-docs/openapi.json", get(openapi))
}

async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[derive(utoipa::OpenApi)]
#[openapi(
    components(schemas(
        arh_webapi::echo::EchoReply,
        arh_webapi::echo::HeaderEntry,
        arh_webapi::people::Person,
    ),),
    paths(web::echo, web::raw, web::lookup_person, web::gzip, web::slow)
)]
struct ApiDoc;

#[cfg(feature = "test-utils")]
pub mod test_utils {
    use super::*;

    pub fn build_test_server() -> axum_test::TestServer {
        let cfg = axum_test::TestServerConfig {
            transport: Some(axum_test::Transport::HttpRandomPort),
            ..Default::default()
        };
        axum_test::TestServer::new_with_config(routes(), cfg)
            .expect("failed to start test server")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arh_webapi::{echo::EchoReply, people::Person};
    use axum::http::StatusCode;

    fn server() -> axum_test::TestServer {
        axum_test::TestServer::new(routes()).expect("test server")
    }

    #[tokio::test]
    async fn echo_reports_method_and_body() {
        let server = server();
        let response = server.put("/v1/echo").text("hello").await;
        response.assert_status_ok();
        let reply: EchoReply = response.json();
        assert_eq!(reply.method, "PUT");
        assert_eq!(reply.body, "hello");
    }

    #[tokio::test]
    async fn raw_replies_as_asked() {
        let server = server();
        let response = server
            .get("/v1/raw")
            .add_query_param("status", 418)
            .add_query_param("body", "teapot")
            .await;
        response.assert_status(StatusCode::IM_A_TEAPOT);
        response.assert_text("teapot");
    }

    #[tokio::test]
    async fn raw_rejects_invalid_status() {
        let server = server();
        let response = server.get("/v1/raw").add_query_param("status", 42).await;
        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn lookup_person() {
        let server = server();
        let person: Person = server.get("/v1/people/ada").await.json();
        assert_eq!(person.name, "ada");
    }

    #[tokio::test]
    async fn gzip_is_flagged() {
        let server = server();
        let response = server
            .get("/v1/gzip")
            .add_query_param("body", "{}")
            .await;
        response.assert_status_ok();
        assert_eq!(response.header("content-encoding"), "gzip");
    }

    #[tokio::test]
    async fn openapi_lists_paths() {
        let server = server();
        let doc: serde_json::Value = server.get("/api-docs/openapi.json").await.json();
        assert!(doc["paths"].get("/v1/echo").is_some());
        assert!(doc["paths"].get("/v1/people/{name}").is_some());
    }
}
