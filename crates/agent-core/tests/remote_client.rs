use std::net::TcpListener;
use std::thread;
use std::time::Duration;

use action_primitives::BrowserAction;
use affine_core_types::{Snapshot, Task};
use agent_core::{
    resolve_act_endpoint, ActRequest, AgentClient, AgentConnector, AgentError, HttpAgentConnector,
    RemoteAgentClient,
};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

fn spawn_agent() -> String {
    let listener = TcpListener::bind(("127.0.0.1", 0)).expect("bind agent");
    listener.set_nonblocking(true).expect("nonblocking");
    let addr = listener.local_addr().expect("addr");

    thread::spawn(move || {
        let runtime = tokio::runtime::Runtime::new().expect("agent runtime");
        runtime.block_on(async move {
            let app = Router::new()
                .route(
                    "/act",
                    post(|Json(body): Json<Value>| async move {
                        let step = body["step_index"].as_u64().unwrap_or(0);
                        Json(json!({
                            "action_index": step,
                            "navigate_url": format!("{}?step={}", body["current_url"].as_str().unwrap_or(""), step),
                            "done": step > 0,
                        }))
                    }),
                )
                .route(
                    "/broken",
                    post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "agent crashed") }),
                )
                .route("/garbage", post(|| async { "not json" }));
            let listener = tokio::net::TcpListener::from_std(listener).expect("tokio listener");
            axum::serve(listener, app).await.expect("serve agent");
        });
    });

    format!("http://{}", addr)
}

fn request(step: u32) -> ActRequest {
    let task = Task::new("t1", "autobooks", "http://books.test/", "Find a book");
    ActRequest::for_step(&task, &Snapshot::default(), step)
}

#[test]
fn bare_base_url_reaches_act_endpoint() {
    let base = spawn_agent();
    let endpoint = resolve_act_endpoint(&base).expect("endpoint");
    let client = HttpAgentConnector::default().connect(&endpoint).expect("client");

    let reply = client.act(&request(0)).expect("reply");
    assert_eq!(
        reply.actions,
        vec![BrowserAction::navigate("http://books.test/?step=0")]
    );
    assert!(!reply.done);

    let reply = client.act(&request(1)).expect("reply");
    assert!(reply.done);
}

#[test]
fn error_status_and_bad_body_are_reported() {
    let base = spawn_agent();
    let broken = RemoteAgentClient::new(
        resolve_act_endpoint(&format!("{base}/broken")).unwrap(),
        Duration::from_secs(5),
    )
    .unwrap();
    match broken.act(&request(0)) {
        Err(AgentError::Status { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "agent crashed");
        }
        other => panic!("unexpected: {other:?}"),
    }

    let garbage = RemoteAgentClient::new(
        resolve_act_endpoint(&format!("{base}/garbage")).unwrap(),
        Duration::from_secs(5),
    )
    .unwrap();
    assert!(matches!(
        garbage.act(&request(0)),
        Err(AgentError::MalformedBody(_))
    ));
}

#[test]
fn unreachable_agent_is_transport_error() {
    let client = RemoteAgentClient::new(
        resolve_act_endpoint("http://127.0.0.1:9/act").unwrap(),
        Duration::from_millis(500),
    )
    .unwrap();
    assert!(matches!(
        client.act(&request(0)),
        Err(AgentError::Transport(_))
    ));
}
