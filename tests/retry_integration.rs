use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};

use accountapi_http::{AccountApiClient, AccountApiError, BackoffSchedule, ClientOptions};
use serde_json::json;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
};

const ACCOUNT_ID: &str = "ad27e265-9605-4b4b-a0e5-3003ea9cc4dc";

/// What the scripted listener does with each accepted connection.
enum Step {
    /// Close the socket without answering.
    Drop,
    Respond { status: u16, body: String },
}

struct ScriptedServer {
    base_url: String,
    accepts: Arc<AtomicUsize>,
    task: tokio::task::JoinHandle<()>,
}

impl Drop for ScriptedServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl ScriptedServer {
    fn accepts(&self) -> usize {
        self.accepts.load(Ordering::SeqCst)
    }
}

// Connections past the end of the script are dropped.
async fn spawn_scripted(steps: Vec<Step>) -> ScriptedServer {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("must bind test listener");
    let address = listener.local_addr().expect("must have local addr");
    let accepts = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&accepts);

    let task = tokio::spawn(async move {
        let mut steps: VecDeque<Step> = steps.into();
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            counter.fetch_add(1, Ordering::SeqCst);
            match steps.pop_front().unwrap_or(Step::Drop) {
                Step::Drop => drop(socket),
                Step::Respond { status, body } => {
                    read_request_head(&mut socket).await;
                    let response = format!(
                        "HTTP/1.1 {status} Scripted\r\n\
                         content-type: application/vnd.api+json\r\n\
                         content-length: {}\r\n\
                         connection: close\r\n\r\n{body}",
                        body.len()
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                }
            }
        }
    });

    ScriptedServer {
        base_url: format!("http://{address}"),
        accepts,
        task,
    }
}

async fn read_request_head(socket: &mut TcpStream) {
    let mut head = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => {
                head.extend_from_slice(&chunk[..n]);
                if head.windows(4).any(|window| window == b"\r\n\r\n") {
                    return;
                }
            }
        }
    }
}

fn scripted_client(base_url: &str, backoff: BackoffSchedule) -> AccountApiClient {
    AccountApiClient::new(base_url).with_options(ClientOptions {
        timeout_ms: 1_000,
        backoff,
    })
}

fn account_body() -> String {
    json!({
        "data": {
            "id": ACCOUNT_ID,
            "type": "accounts",
            "version": 0
        }
    })
    .to_string()
}

#[tokio::test]
async fn persistent_transport_failure_stops_after_schedule_length() {
    let server = spawn_scripted(vec![]).await;
    let client = scripted_client(&server.base_url, BackoffSchedule::immediate(3));

    let err = client.fetch(ACCOUNT_ID).await.expect_err("fetch must fail");

    assert!(matches!(err, AccountApiError::Transport(_)));
    assert_eq!(server.accepts(), 3);
}

#[tokio::test]
async fn empty_schedule_makes_a_single_attempt() {
    let server = spawn_scripted(vec![]).await;
    let client = scripted_client(&server.base_url, BackoffSchedule::new(Vec::new()));

    let err = client.fetch(ACCOUNT_ID).await.expect_err("fetch must fail");

    assert!(matches!(err, AccountApiError::Transport(_)));
    assert_eq!(server.accepts(), 1);
}

#[tokio::test]
async fn transport_failure_then_success_waits_first_backoff() {
    let server = spawn_scripted(vec![
        Step::Drop,
        Step::Respond {
            status: 200,
            body: account_body(),
        },
    ])
    .await;
    let client = scripted_client(&server.base_url, BackoffSchedule::from_millis([50, 50, 50]));

    let started = Instant::now();
    let fetched = client
        .fetch(ACCOUNT_ID)
        .await
        .expect("fetch must succeed after retry");

    assert_eq!(fetched.id, ACCOUNT_ID);
    assert_eq!(server.accepts(), 2);
    assert!(started.elapsed() >= Duration::from_millis(50));
}

#[tokio::test]
async fn error_status_after_transport_failure_stops_retrying() {
    let server = spawn_scripted(vec![
        Step::Drop,
        Step::Respond {
            status: 503,
            body: json!({"error_message": "service unavailable"}).to_string(),
        },
    ])
    .await;
    let client = scripted_client(&server.base_url, BackoffSchedule::immediate(4));

    let err = client.fetch(ACCOUNT_ID).await.expect_err("fetch must fail");

    match err {
        AccountApiError::InternalServerError { message } => {
            assert_eq!(message, "service unavailable")
        }
        other => panic!("expected internal server error, got {other:?}"),
    }
    assert_eq!(server.accepts(), 2);
}

#[tokio::test]
async fn delete_succeeds_after_dropped_connection() {
    let server = spawn_scripted(vec![
        Step::Drop,
        Step::Respond {
            status: 204,
            body: String::new(),
        },
    ])
    .await;
    let client = scripted_client(&server.base_url, BackoffSchedule::immediate(3));

    client
        .delete(ACCOUNT_ID, 0)
        .await
        .expect("delete must succeed after retry");

    assert_eq!(server.accepts(), 2);
}

#[tokio::test]
async fn refused_connection_surfaces_connect_error() {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("must bind test listener");
    let address = listener.local_addr().expect("must have local addr");
    drop(listener);

    let client = scripted_client(&format!("http://{address}"), BackoffSchedule::immediate(2));

    let err = client.fetch(ACCOUNT_ID).await.expect_err("fetch must fail");

    match err {
        AccountApiError::Transport(inner) => assert!(inner.is_connect()),
        other => panic!("expected transport error, got {other:?}"),
    }
}
