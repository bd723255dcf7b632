// ----- standard library imports
// ----- extra library imports
use arh_client::{
    Content, DiagnosticsCarrier, Envelope, Json, RequestOptions, RequestType, RestHandler,
    StatusCode,
};
use arh_webapi::{echo::EchoReply, people::Person};
use serde::Serialize;
// ----- local imports

#[derive(Debug, Serialize)]
struct Order {
    item: String,
    quantity: u32,
    note: Option<String>,
    owner: Person,
}

fn order() -> Order {
    Order {
        item: String::from("book"),
        quantity: 2,
        note: None,
        owner: Person {
            name: String::from("a b"),
        },
    }
}

#[tokio::test]
async fn post_without_body_on_error_status_returns_text() {
    let server = arh_echo_service::test_utils::build_test_server();
    let server_url = server.server_address().expect("address");
    let handler = RestHandler::new(server_url.as_str()).expect("handler");

    let text: String = handler
        .post(
            "v1/raw?status=500&body=server%20error",
            &RequestOptions::default(),
        )
        .await
        .expect("post");
    assert_eq!(text, "server error");
}

#[tokio::test]
async fn post_without_body_sends_empty_body() {
    let server = arh_echo_service::test_utils::build_test_server();
    let server_url = server.server_address().expect("address");
    let handler = RestHandler::new(server_url.as_str()).expect("handler");

    let env: Envelope<EchoReply> = handler
        .post("v1/echo", &RequestOptions::default())
        .await
        .expect("post");
    let reply = env.result().expect("reply");
    assert_eq!(reply.method, "POST");
    assert!(reply.body.is_empty());
    assert!(reply.content_type.is_none());
    assert!(env.request_text().is_none());
}

#[tokio::test]
async fn post_model_as_json() {
    let server = arh_echo_service::test_utils::build_test_server();
    let server_url = server.server_address().expect("address");
    let handler = RestHandler::new(server_url.as_str()).expect("handler");

    let person = Person {
        name: String::from("a"),
    };
    let env: Envelope<EchoReply> = handler
        .post_model("v1/echo", &person, &RequestOptions::default())
        .await
        .expect("post_model");
    assert_eq!(env.status_code(), StatusCode::OK);
    assert_eq!(env.request_text(), Some(r#"{"name":"a"}"#));
    let reply = env.result().expect("reply");
    assert_eq!(reply.body, r#"{"name":"a"}"#);
    assert_eq!(
        reply.content_type.as_deref(),
        Some("application/json; charset=utf-8")
    );
}

#[tokio::test]
async fn post_model_without_content_type_charset() {
    let server = arh_echo_service::test_utils::build_test_server();
    let server_url = server.server_address().expect("address");
    let handler = RestHandler::new(server_url.as_str()).expect("handler");

    let options = RequestOptions::default().omit_content_type_charset();
    let Json(reply): Json<EchoReply> = handler
        .post_model("v1/echo", &order(), &options)
        .await
        .expect("post_model");
    assert_eq!(reply.content_type.as_deref(), Some("application/json"));
    assert_eq!(
        reply.body,
        r#"{"item":"book","quantity":2,"note":null,"owner":{"name":"a b"}}"#
    );
}

#[tokio::test]
async fn post_model_as_form() {
    let server = arh_echo_service::test_utils::build_test_server();
    let server_url = server.server_address().expect("address");
    let handler = RestHandler::new(server_url.as_str()).expect("handler");

    let options = RequestOptions::default().with_request_type(RequestType::FormUrlEncoded);
    let env: Envelope<EchoReply> = handler
        .post_model("v1/echo", &order(), &options)
        .await
        .expect("post_model");
    let expected = "item=book&quantity=2&owner.name=a+b";
    assert_eq!(env.request_text(), Some(expected));
    let reply = env.result().expect("reply");
    assert_eq!(reply.body, expected);
    assert_eq!(
        reply.content_type.as_deref(),
        Some("application/x-www-form-urlencoded")
    );
}

#[tokio::test]
async fn post_model_with_request_charset() {
    let server = arh_echo_service::test_utils::build_test_server();
    let server_url = server.server_address().expect("address");
    let handler = RestHandler::new(server_url.as_str()).expect("handler");

    let person = Person {
        name: String::from("Zoë"),
    };
    let options = RequestOptions::default().with_request_charset("iso-8859-1");
    let env: Envelope<EchoReply> = handler
        .post_model("v1/echo", &person, &options)
        .await
        .expect("post_model");
    assert_eq!(env.request_text(), Some(r#"{"name":"Zoë"}"#));
    let reply = env.result().expect("reply");
    assert_eq!(
        reply.content_type.as_deref(),
        Some("application/json; charset=windows-1252")
    );
    // the echo service reads the body as UTF-8, the single latin1 byte is not valid there
    assert_eq!(reply.body, "{\"name\":\"Zo\u{FFFD}\"}");
}

#[tokio::test]
async fn post_content_is_sent_verbatim() {
    let server = arh_echo_service::test_utils::build_test_server();
    let server_url = server.server_address().expect("address");
    let handler = RestHandler::new(server_url.as_str()).expect("handler");

    let content = Content::new("application/xml", "<person name=\"a\"/>");
    let env: Envelope<EchoReply> = handler
        .post_content("v1/echo", content, &RequestOptions::default())
        .await
        .expect("post_content");
    assert!(env.request_text().is_none());
    let reply = env.result().expect("reply");
    assert_eq!(reply.body, "<person name=\"a\"/>");
    assert_eq!(reply.content_type.as_deref(), Some("application/xml"));
}

#[tokio::test]
async fn post_bytes_without_content_type() {
    let server = arh_echo_service::test_utils::build_test_server();
    let server_url = server.server_address().expect("address");
    let handler = RestHandler::new(server_url.as_str()).expect("handler");

    let Json(reply): Json<EchoReply> = handler
        .post_content("v1/echo", Content::bytes(b"abc".to_vec()), &RequestOptions::default())
        .await
        .expect("post_content");
    assert_eq!(reply.body, "abc");
    assert!(reply.content_type.is_none());
}
