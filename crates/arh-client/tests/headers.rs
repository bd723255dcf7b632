// ----- standard library imports
// ----- extra library imports
use arh_client::{Json, RequestOptions, RestHandler, RestHandlerConfig};
use arh_webapi::{echo::EchoReply, people::Person};
// ----- local imports

#[tokio::test]
async fn default_and_call_headers_are_both_sent() {
    let server = arh_echo_service::test_utils::build_test_server();
    let server_url = server.server_address().expect("address");
    let cfg = RestHandlerConfig {
        base_url: Some(server_url.to_string()),
        default_headers: vec![(String::from("x-tenant"), vec![String::from("acme")])],
        ..Default::default()
    };
    let mut handler = RestHandler::with_config(cfg).expect("handler");
    handler.add_default_header("x-trace", "default");

    let options = RequestOptions::default()
        .with_header("x-trace", "call")
        .with_header_values("x-multi", ["1", "2"]);
    let Json(reply): Json<EchoReply> = handler.get("v1/echo", &options).await.expect("get");
    assert_eq!(reply.header_values("x-tenant"), vec!["acme"]);
    assert_eq!(reply.header_values("x-trace"), vec!["default", "call"]);
    assert_eq!(reply.header_values("x-multi"), vec!["1", "2"]);
}

#[tokio::test]
async fn replaced_default_headers() {
    let server = arh_echo_service::test_utils::build_test_server();
    let server_url = server.server_address().expect("address");
    let mut handler = RestHandler::new(server_url.as_str()).expect("handler");
    handler.add_default_header("x-old", "1");
    handler.set_default_headers(vec![(String::from("x-new"), vec![String::from("2")])]);

    let Json(reply): Json<EchoReply> = handler
        .get("v1/echo", &RequestOptions::default())
        .await
        .expect("get");
    assert!(reply.header_values("x-old").is_empty());
    assert_eq!(reply.header_values("x-new"), vec!["2"]);
}

#[tokio::test]
async fn caller_content_type_wins() {
    let server = arh_echo_service::test_utils::build_test_server();
    let server_url = server.server_address().expect("address");
    let handler = RestHandler::new(server_url.as_str()).expect("handler");

    let person = Person {
        name: String::from("a"),
    };
    let options = RequestOptions::default().with_header("content-type", "application/vnd.person+json");
    let Json(reply): Json<EchoReply> = handler
        .post_model("v1/echo", &person, &options)
        .await
        .expect("post_model");
    assert_eq!(reply.header_values("content-type"), vec!["application/vnd.person+json"]);
    assert_eq!(reply.body, r#"{"name":"a"}"#);
}

#[tokio::test]
async fn invalid_header_value_is_rejected() {
    let server = arh_echo_service::test_utils::build_test_server();
    let server_url = server.server_address().expect("address");
    let handler = RestHandler::new(server_url.as_str()).expect("handler");

    let options = RequestOptions::default().with_header("x-bad", "line\nbreak");
    let res: arh_client::Result<String> = handler.get("v1/echo", &options).await;
    assert!(matches!(res, Err(arh_client::Error::InvalidHeaderValue(_))));
}
