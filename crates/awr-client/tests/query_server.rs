//! Client tests against a one-shot loopback HTTP server.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use awr_client::{Client, ErrorKind, QueryError};
use awr_core::{CategoryRuleSet, DEFAULT_TIMEZONE, ReportWindow, aggregate};
use chrono::{TimeZone, Utc};

/// A captured request: path line and JSON body.
struct Captured {
    request_line: String,
    body: serde_json::Value,
}

/// Serves exactly one request with the given status and body.
fn serve_once(status: &'static str, body: &'static str) -> (String, mpsc::Receiver<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());

        let mut request_line = String::new();
        reader.read_line(&mut request_line).unwrap();

        let mut content_length = 0;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                if name.eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().unwrap();
                }
            }
        }

        let mut raw_body = vec![0; content_length];
        reader.read_exact(&mut raw_body).unwrap();
        let _ = tx.send(Captured {
            request_line: request_line.trim_end().to_string(),
            body: serde_json::from_slice(&raw_body).unwrap_or(serde_json::Value::Null),
        });

        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let mut stream = stream;
        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();
    });

    (url, rx)
}

fn new_year_window() -> ReportWindow {
    let now = Utc.with_ymd_and_hms(2024, 1, 2, 12, 0, 0).unwrap();
    ReportWindow::previous_day(now, DEFAULT_TIMEZONE)
}

#[tokio::test]
async fn end_to_end_reports_media_video() {
    let (url, captured) = serve_once(
        "200 OK",
        r#"[[{"id": null, "timestamp": "2024-01-01T15:00:00+00:00", "duration": 7200, "data": {"app": "firefox", "title": "YouTube", "$category": ["Media", "Video"]}}]]"#,
    );
    let client = Client::new(url, Duration::from_secs(5)).unwrap();
    let window = new_year_window();

    let events = client
        .query_events(&CategoryRuleSet::default_rules(), &window)
        .await
        .unwrap();
    let report = aggregate(&events);

    assert_eq!(report.len(), 2);
    assert_eq!(report.get("Media"), Some(2.0));
    assert_eq!(report.get("Media->Video"), Some(2.0));

    let request = captured.recv().unwrap();
    assert_eq!(request.request_line, "POST /api/0/query/ HTTP/1.1");
    assert_eq!(
        request.body["timeperiods"],
        serde_json::json!(["2024-01-01T00:00:00-05:00/2024-01-02T00:00:00-05:00"])
    );
    let statements = request.body["query"].as_array().unwrap();
    assert!(
        statements
            .iter()
            .all(|s| s.as_str().is_some_and(|s| s.ends_with(';')))
    );
}

#[tokio::test]
async fn server_error_status_is_transport_error() {
    let (url, _captured) = serve_once(
        "500 Internal Server Error",
        r#"{"message": "There was an error processing your query"}"#,
    );
    let client = Client::new(url, Duration::from_secs(5)).unwrap();

    let err = client
        .query_events(&CategoryRuleSet::default_rules(), &new_year_window())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
    match err {
        QueryError::Status { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "There was an error processing your query");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn two_result_groups_violate_contract() {
    let (url, _captured) = serve_once("200 OK", "[[], []]");
    let client = Client::new(url, Duration::from_secs(5)).unwrap();

    let err = client
        .query_events(&CategoryRuleSet::default_rules(), &new_year_window())
        .await
        .unwrap_err();

    assert!(matches!(err, QueryError::ContractViolation { groups: 2 }));
}

#[tokio::test]
async fn unreachable_server_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);
    let client = Client::new(url, Duration::from_secs(5)).unwrap();

    let err = client
        .query_events(&CategoryRuleSet::default_rules(), &new_year_window())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[tokio::test]
async fn silent_server_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        thread::sleep(Duration::from_secs(2));
        drop(stream);
    });
    let client = Client::new(url, Duration::from_millis(200)).unwrap();

    let err = client
        .query_events(&CategoryRuleSet::default_rules(), &new_year_window())
        .await
        .unwrap_err();

    match err {
        QueryError::Transport(source) => assert!(source.is_timeout()),
        other => panic!("unexpected error: {other:?}"),
    }
    handle.join().unwrap();
}
