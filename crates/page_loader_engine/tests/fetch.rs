use std::sync::{Arc, Mutex};
use std::time::Duration;

use page_loader_engine::{FailureKind, FetchSettings, HttpClient, HttpObserver, ReqwestClient};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct RecordingObserver {
    lines: Mutex<Vec<String>>,
}

impl RecordingObserver {
    fn take(&self) -> Vec<String> {
        self.lines.lock().unwrap().drain(..).collect()
    }
}

impl HttpObserver for RecordingObserver {
    fn on_request(&self, method: &str, url: &str, _content_type: Option<&str>) {
        self.lines.lock().unwrap().push(format!("request {method} {url}"));
    }

    fn on_response(&self, method: &str, url: &str, status: u16, content_type: Option<&str>) {
        self.lines.lock().unwrap().push(format!(
            "response {status} {method} {url} {}",
            content_type.unwrap_or("-")
        ));
    }
}

fn url(server: &MockServer, route: &str) -> Url {
    Url::parse(&format!("{}{route}", server.uri())).unwrap()
}

#[tokio::test]
async fn binary_get_returns_raw_bytes_and_reports_to_observer() {
    let server = MockServer::start().await;
    let body = vec![0x89, b'P', b'N', b'G', 0x00, 0xff];
    Mock::given(method("GET"))
        .and(path("/a.png"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.clone(), "image/png"))
        .mount(&server)
        .await;

    let observer = Arc::new(RecordingObserver::default());
    let client = ReqwestClient::with_observer(FetchSettings::default(), observer.clone()).unwrap();
    let target = url(&server, "/a.png");

    let output = client.get(&target).await.expect("fetch ok");
    assert_eq!(output.bytes, body);
    assert_eq!(output.content_type.as_deref(), Some("image/png"));

    assert_eq!(
        observer.take(),
        vec![
            format!("request GET {target}"),
            format!("response 200 GET {target} image/png"),
        ]
    );
}

#[tokio::test]
async fn text_get_decodes_declared_charset() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(b"<p>caf\xe9</p>".to_vec(), "text/html; charset=ISO-8859-1"),
        )
        .mount(&server)
        .await;

    let client = ReqwestClient::new(FetchSettings::default()).unwrap();
    let page = client.get_text(&url(&server, "/page")).await.unwrap();
    assert_eq!(page.decoded.html, "<p>caf\u{e9}</p>");
    assert_eq!(page.bytes, b"<p>caf\xe9</p>".to_vec());
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = ReqwestClient::new(FetchSettings::default()).unwrap();
    let err = client.get(&url(&server, "/missing")).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(404));
}

#[tokio::test]
async fn slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_string("slow"),
        )
        .mount(&server)
        .await;

    let settings = FetchSettings {
        request_timeout: Duration::from_millis(50),
        ..FetchSettings::default()
    };
    let client = ReqwestClient::new(settings).unwrap();
    let err = client.get(&url(&server, "/slow")).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn oversized_response_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/large"))
        .respond_with(ResponseTemplate::new(200).set_body_string("01234567890"))
        .mount(&server)
        .await;

    let settings = FetchSettings {
        max_bytes: 10,
        ..FetchSettings::default()
    };
    let client = ReqwestClient::new(settings).unwrap();
    let err = client.get(&url(&server, "/large")).await.unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::TooLarge {
            max_bytes: 10,
            actual: Some(11)
        }
    );
}

#[tokio::test]
async fn non_http_scheme_is_refused_without_a_request() {
    let observer = Arc::new(RecordingObserver::default());
    let client = ReqwestClient::with_observer(FetchSettings::default(), observer.clone()).unwrap();
    let err = client
        .get(&Url::parse("ftp://files.test/a.bin").unwrap())
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
    assert!(observer.take().is_empty());
}
