//! Session lifecycle and configuration tests against a scripted transport.
//!
//! # Design
//! `ScriptedTransport` never touches the network: it records the last
//! configuration it was given and, on `perform`, replays a fixed exchange
//! through a real `Collector` (an interim redirect followed by the final
//! response, body split across chunks). That keeps the client's own
//! bookkeeping under test without depending on a live server.

use hqrp_client::{
    ClientError, ClientOptions, Collector, Method, Request, Response, SessionConfig, Transport,
    TransportError,
};

type Client = hqrp_client::Client<ScriptedTransport>;

const BASE_URL: &str = "http://scripted.test";

const EXCHANGE: &[&[u8]] = &[
    b"HTTP/1.1 302 Found\r\n",
    b"Location: /final\r\n",
    b"\r\n",
    b"HTTP/1.1 200 OK\r\n",
    b"Content-Type: text/plain\r\n",
    b"Set-Cookie: a=1\r\n",
    b"Set-Cookie: b=2\r\n",
    b"\r\n",
];

#[derive(Debug, Default)]
struct ScriptedTransport {
    applied: Option<SessionConfig>,
    collector: Collector,
}

impl Transport for ScriptedTransport {
    fn open() -> Result<Self, TransportError> {
        Ok(Self::default())
    }

    fn configure(&mut self, config: &SessionConfig) -> Result<(), TransportError> {
        self.applied = Some(config.clone());
        Ok(())
    }

    fn perform(&mut self) -> Result<Response, TransportError> {
        let request = self
            .applied
            .as_ref()
            .and_then(|config| config.request.as_ref())
            .ok_or_else(|| TransportError::new(3, "URL using bad/illegal format or missing URL"))?;
        if request.url.contains("unreachable") {
            return Err(TransportError::new(7, "Couldn't connect to server")
                .with_detail("scripted refusal"));
        }

        self.collector.begin();
        for line in EXCHANGE {
            self.collector.header_line(line);
        }
        for chunk in [&b"He"[..], b"llo"] {
            assert_eq!(self.collector.body_chunk(chunk), chunk.len());
        }
        Ok(self.collector.finish())
    }
}

#[derive(Debug)]
struct BrokenTransport;

impl Transport for BrokenTransport {
    fn open() -> Result<Self, TransportError> {
        Err(TransportError::new(2, "Failed initialization"))
    }

    fn configure(&mut self, _config: &SessionConfig) -> Result<(), TransportError> {
        unreachable!("a broken transport never opens")
    }

    fn perform(&mut self) -> Result<Response, TransportError> {
        unreachable!("a broken transport never opens")
    }
}

fn initialized() -> Client {
    let mut client = Client::default();
    assert!(client.init());
    client
}

fn applied(client: &Client) -> SessionConfig {
    client.config().cloned().unwrap()
}

// ---------------------------------------------------------------------------
// Uninitialized clients
// ---------------------------------------------------------------------------

#[test]
fn execute_without_init_fails() {
    let mut client = Client::uninitialized();
    assert!(!client.is_initialized());
    let err = client.execute().unwrap_err();
    assert!(matches!(err, ClientError::UninitializedClient));
}

#[test]
fn configuration_without_init_fails() {
    let mut client = Client::uninitialized();
    let req = Request::get("/");
    assert!(matches!(
        client.set_request(BASE_URL, &req, 80),
        Err(ClientError::UninitializedClient)
    ));
    assert!(matches!(client.verbose(), Err(ClientError::UninitializedClient)));
    assert!(matches!(
        client.with_capath("/etc/ssl/certs"),
        Err(ClientError::UninitializedClient)
    ));
    assert!(matches!(
        client.with_certificate("/etc/ssl/cert.pem"),
        Err(ClientError::UninitializedClient)
    ));
    assert!(client.config().is_none());
}

#[test]
fn failed_init_leaves_client_uninitialized() {
    let mut client = hqrp_client::Client::<BrokenTransport>::default();
    assert!(!client.init());
    assert!(!client.is_initialized());
    assert!(matches!(client.execute(), Err(ClientError::UninitializedClient)));

    let err = hqrp_client::Client::<BrokenTransport>::open().unwrap_err();
    assert!(matches!(err, ClientError::Init(_)));
    assert_eq!(err.transport().map(TransportError::code), Some(2));
}

#[test]
fn init_replaces_existing_session() {
    let mut client = initialized();
    client.verbose().unwrap();
    assert!(client.init());
    assert_eq!(applied(&client), SessionConfig::default());
}

// ---------------------------------------------------------------------------
// Request configuration
// ---------------------------------------------------------------------------

#[test]
fn set_request_records_target_headers_and_payload() {
    let mut client = initialized();
    let req = Request::post("/items")
        .with_header("Content-Type", "application/json")
        .with_header("X-Tag", "a")
        .with_header("X-Tag", "b")
        .with_payload(r#"{"id":1}"#);
    client.set_request(BASE_URL, &req, 8080).unwrap();

    let config = applied(&client);
    let request = config.request.unwrap();
    assert_eq!(request.method, Method::Post);
    assert_eq!(request.url, "http://scripted.test/items");
    assert_eq!(request.port, 8080);
    assert_eq!(request.headers, req.headers);
    assert_eq!(request.payload.as_deref(), Some(&br#"{"id":1}"#[..]));
}

#[test]
fn set_request_drops_previous_request_state() {
    let mut client = initialized();
    let first = Request::put("/a")
        .with_header("X-Leak", "yes")
        .with_payload("old body");
    client.set_request(BASE_URL, &first, 80).unwrap();
    client
        .set_request(BASE_URL, &Request::get("/b"), 80)
        .unwrap();

    let request = applied(&client).request.unwrap();
    assert_eq!(request.method, Method::Get);
    assert_eq!(request.url, "http://scripted.test/b");
    assert!(request.headers.is_none());
    assert!(request.payload.is_none());
}

#[test]
fn session_options_survive_set_request_in_any_order() {
    let mut client = initialized();
    client
        .verbose()
        .unwrap()
        .with_capath("/etc/ssl/certs")
        .unwrap();
    client
        .set_request(BASE_URL, &Request::get("/"), 80)
        .unwrap()
        .with_certificate("/etc/ssl/cert.pem")
        .unwrap();

    let options = applied(&client).options;
    assert!(options.verbose);
    assert_eq!(options.capath.unwrap().to_str(), Some("/etc/ssl/certs"));
    assert_eq!(options.certificate.unwrap().to_str(), Some("/etc/ssl/cert.pem"));
}

#[test]
fn with_options_replaces_all_options() {
    let mut client = initialized();
    client.verbose().unwrap();
    let options = ClientOptions::from_json(r#"{"follow_redirects": true, "timeout_ms": 900}"#)
        .unwrap();
    client.with_options(options.clone()).unwrap();
    assert_eq!(applied(&client).options, options);
    assert!(!applied(&client).options.verbose);
}

#[test]
fn timeouts_are_recorded_in_millis() {
    let mut client = initialized();
    client
        .with_timeout(std::time::Duration::from_secs(2))
        .unwrap()
        .with_connect_timeout(std::time::Duration::from_millis(150))
        .unwrap()
        .follow_redirects(true)
        .unwrap();

    let options = applied(&client).options;
    assert_eq!(options.timeout_ms, Some(2000));
    assert_eq!(options.connect_timeout_ms, Some(150));
    assert!(options.follow_redirects);
}

// ---------------------------------------------------------------------------
// Execute
// ---------------------------------------------------------------------------

#[test]
fn execute_collects_last_status_all_headers_and_body() {
    let mut client = initialized();
    let resp = client
        .set_request(BASE_URL, &Request::get("/start"), 80)
        .unwrap()
        .execute()
        .unwrap();

    assert_eq!(resp.status, "200 OK");
    assert_eq!(resp.version, "HTTP/1.1");
    assert_eq!(resp.header("location"), Some("/final"));
    assert_eq!(resp.header_values("set-cookie").collect::<Vec<_>>(), ["a=1", "b=2"]);
    assert_eq!(resp.headers.len(), 4);
    assert_eq!(resp.body, b"Hello");
}

#[test]
fn repeated_execute_starts_from_an_empty_response() {
    let mut client = initialized();
    client.set_request(BASE_URL, &Request::get("/"), 80).unwrap();
    let first = client.execute().unwrap();
    let second = client.execute().unwrap();
    assert_eq!(first, second);
    assert_eq!(second.body, b"Hello");
}

#[test]
fn transfer_failure_carries_engine_error() {
    let mut client = initialized();
    client
        .set_request("http://unreachable.test", &Request::get("/"), 80)
        .unwrap();

    let err = client.execute().unwrap_err();
    let ClientError::Transfer(cause) = &err else {
        panic!("expected a transfer failure, got {err:?}");
    };
    assert_eq!(cause.code(), 7);
    assert_eq!(cause.detail(), Some("scripted refusal"));
    assert!(client.execute().ok().is_none());
}

// ---------------------------------------------------------------------------
// Copy and move
// ---------------------------------------------------------------------------

#[test]
fn clone_copies_configuration_independently() {
    let mut original = initialized();
    original
        .set_request(BASE_URL, &Request::get("/shared"), 80)
        .unwrap()
        .verbose()
        .unwrap();

    let mut copy = original.clone();
    assert!(copy.is_initialized());
    assert_eq!(copy.config(), original.config());

    copy.set_request(BASE_URL, &Request::post("/copy"), 81).unwrap();

    let original_request = applied(&original).request.unwrap();
    assert_eq!(original_request.method, Method::Get);
    assert_eq!(original_request.url, "http://scripted.test/shared");
    assert_eq!(applied(&copy).request.unwrap().method, Method::Post);
    assert!(applied(&copy).options.verbose);
}

#[test]
fn clone_of_uninitialized_is_uninitialized() {
    let original = Client::uninitialized();
    assert!(!original.clone().is_initialized());
}

#[test]
fn clone_from_replaces_destination_session() {
    let mut source = initialized();
    source.set_request(BASE_URL, &Request::put("/src"), 80).unwrap();
    let mut dest = initialized();
    dest.set_request(BASE_URL, &Request::get("/dest"), 80).unwrap();

    dest.clone_from(&source);
    assert_eq!(dest.config(), source.config());

    let mut empty_dest = initialized();
    empty_dest.clone_from(&Client::uninitialized());
    assert!(!empty_dest.is_initialized());
}

#[test]
fn take_leaves_source_uninitialized() {
    let mut source = initialized();
    source.set_request(BASE_URL, &Request::get("/"), 80).unwrap();

    let mut dest = source.take();
    assert!(dest.is_initialized());
    assert!(!source.is_initialized());
    assert!(dest.execute().is_ok());

    assert!(matches!(
        source.set_request(BASE_URL, &Request::get("/"), 80),
        Err(ClientError::UninitializedClient)
    ));
    assert!(matches!(source.execute(), Err(ClientError::UninitializedClient)));

    assert!(source.init());
    assert!(source.is_initialized());
}

#[test]
fn mem_take_behaves_like_take() {
    let mut source = initialized();
    let dest = std::mem::take(&mut source);
    assert!(dest.is_initialized());
    assert!(!source.is_initialized());
    drop(source);
    drop(dest);
}
