#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use shopwire_core::{InMemoryScopeStorage, ScopeStorage, SessionHost};
use shopwire_domain::ClientConfig;
use shopwire_infra::ApiClient;
use wiremock::MockServer;

/// Host that records every navigation.
pub struct RecordingHost {
    current: Mutex<String>,
    navigations: Mutex<Vec<String>>,
}

impl RecordingHost {
    pub fn at(path: &str) -> Arc<Self> {
        Arc::new(Self {
            current: Mutex::new(path.to_string()),
            navigations: Mutex::new(Vec::new()),
        })
    }

    pub fn navigations(&self) -> Vec<String> {
        self.navigations.lock().expect("navigations lock").clone()
    }
}

impl SessionHost for RecordingHost {
    fn current_path(&self) -> String {
        self.current.lock().expect("current lock").clone()
    }

    fn navigate(&self, path: &str) {
        *self.current.lock().expect("current lock") = path.to_string();
        self.navigations.lock().expect("navigations lock").push(path.to_string());
    }
}

/// Client wired to a mock server, in-memory storage, and a recording host.
pub struct TestClient {
    pub client: ApiClient,
    pub storage: InMemoryScopeStorage,
    pub host: Arc<RecordingHost>,
}

pub fn test_client(server: &MockServer, storage: InMemoryScopeStorage) -> TestClient {
    let host = RecordingHost::at("/orders");
    let client = client_with(server, Arc::new(storage.clone()), host.clone());
    TestClient { client, storage, host }
}

pub fn client_with(
    server: &MockServer,
    storage: Arc<dyn ScopeStorage>,
    host: Arc<RecordingHost>,
) -> ApiClient {
    let config = ClientConfig { base_url: server.uri(), ..ClientConfig::default() };
    ApiClient::builder().config(config).storage(storage).host(host).build().expect("api client")
}

pub fn ok(data: Value) -> Value {
    json!({ "success": true, "data": data })
}

pub fn expired() -> Value {
    json!({ "success": false, "message": "Session expired" })
}
