//! Shared in-memory fakes for engine tests.
#![allow(dead_code)]

use std::sync::Mutex;

use flowgate::prelude::*;
use serde_json::{Value, json};

/// A typed API error as the HTTP layer would produce it.
pub fn api_error(code: u16, message: &str) -> FlowgateError {
    FlowgateError::Api {
        code,
        method: "GET".to_string(),
        url: "/test".to_string(),
        message: message.to_string(),
    }
}

/// In-memory `EntityStore` recording every call it receives.
pub struct FakeEntityStore {
    pub calls: Mutex<Vec<String>>,
    /// entity names whose create/update fails with a 500
    pub fail_names: Vec<String>,
    /// ids whose update answers 404
    pub missing_ids: Vec<String>,
    /// entities addressable by name
    pub named: Vec<(String, Value)>,
    /// entities addressable by id
    pub stored: Vec<(String, Value)>,
    /// status returned when a name lookup misses
    pub search_miss_code: u16,
}

impl Default for FakeEntityStore {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_names: Vec::new(),
            missing_ids: Vec::new(),
            named: Vec::new(),
            stored: Vec::new(),
            search_miss_code: 404,
        }
    }
}

impl FakeEntityStore {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

impl EntityStore for FakeEntityStore {
    async fn create(&self, body: &Value) -> Result<Value, FlowgateError> {
        let name = body["name"].as_str().unwrap_or_default().to_string();
        self.record(format!("create {name}"));
        if self.fail_names.contains(&name) {
            return Err(api_error(500, "remote rejected the entity"));
        }
        let mut stored = body.clone();
        stored["id"] = json!("11111111-1111-4111-8111-111111111111");
        Ok(stored)
    }

    async fn update(&self, id: &str, body: &Value) -> Result<Value, FlowgateError> {
        self.record(format!("update {id}"));
        if self.missing_ids.iter().any(|missing| missing == id) {
            return Err(api_error(404, "no entity with this id"));
        }
        let name = body["name"].as_str().unwrap_or_default().to_string();
        if self.fail_names.contains(&name) {
            return Err(api_error(500, "remote rejected the entity"));
        }
        Ok(body.clone())
    }

    async fn get(&self, id: &str) -> Result<Value, FlowgateError> {
        self.record(format!("get {id}"));
        self.stored
            .iter()
            .find(|(stored_id, _)| stored_id == id)
            .map(|(_, entity)| entity.clone())
            .ok_or_else(|| api_error(404, "id miss"))
    }

    async fn search_by_name(&self, name: &str) -> Result<Value, FlowgateError> {
        self.record(format!("search {name}"));
        self.named
            .iter()
            .find(|(stored_name, _)| stored_name == name)
            .map(|(_, entity)| entity.clone())
            .ok_or_else(|| api_error(self.search_miss_code, "name miss"))
    }

    async fn delete(&self, id: &str) -> Result<Value, FlowgateError> {
        self.record(format!("delete {id}"));
        Ok(json!({"acknowledged": true}))
    }
}
