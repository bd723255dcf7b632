// ----- standard library imports
use std::time::Duration;
// ----- extra library imports
use arh_client::{Error, RequestOptions, RestHandler};
// ----- local imports

#[tokio::test]
async fn call_timeout_raises() {
    let server = arh_echo_service::test_utils::build_test_server();
    let server_url = server.server_address().expect("address");
    let handler = RestHandler::new(server_url.as_str()).expect("handler");

    let options = RequestOptions::default().with_timeout(Duration::from_millis(100));
    let res: arh_client::Result<String> = handler.get("v1/slow?millis=2000", &options).await;
    match res {
        Err(Error::Transport(e)) => assert!(e.is_timeout()),
        other => panic!("expected timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn handler_timeout_applies_by_default() {
    let server = arh_echo_service::test_utils::build_test_server();
    let server_url = server.server_address().expect("address");
    let mut handler = RestHandler::new(server_url.as_str()).expect("handler");
    handler.set_timeout(Some(Duration::from_millis(100)));

    let res: arh_client::Result<String> = handler
        .get("v1/slow?millis=2000", &RequestOptions::default())
        .await;
    match res {
        Err(Error::Transport(e)) => assert!(e.is_timeout()),
        other => panic!("expected timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn call_timeout_overrides_handler_timeout() {
    let server = arh_echo_service::test_utils::build_test_server();
    let server_url = server.server_address().expect("address");
    let mut handler = RestHandler::new(server_url.as_str()).expect("handler");
    handler.set_timeout(Some(Duration::from_millis(50)));

    let options = RequestOptions::default().with_timeout(Duration::from_secs(10));
    let text: String = handler
        .get("v1/slow?millis=200", &options)
        .await
        .expect("get");
    assert_eq!(text, "done");
}
