//! Shared stub collaborators for integration tests.
//!
//! `StubClient` plays the generated contract bindings: each operation gets a
//! script describing what its prepared call does per capability, and every
//! preparation is recorded so tests can assert on the submitted shapes.

// Not every test binary exercises every helper.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use contract_adapter::{CallMode, CallOptions, ClientError, ContractClient, PreparedCall, Signer};

/// Per-capability behavior of one operation's prepared call.
///
/// `None` means the capability is absent, so the adapter's fallbacks kick in.
#[derive(Debug, Clone, Default)]
pub struct OperationScript {
    /// Prepared-call preview response.
    pub simulate: Option<Value>,
    /// Delegated sign-and-send response.
    pub sign_and_send: Option<Value>,
    /// Force the delegated path to fail with this message instead.
    pub sign_and_send_error: Option<String>,
    /// Build-mode payload response.
    pub payload: Option<Value>,
    /// Client-level preview response.
    pub client_simulate: Option<Value>,
    /// Pages served to offset/limit listing reads (overrides `simulate`).
    pub pages: Option<Vec<Vec<Value>>>,
}

/// A write operation whose delegated path yields `hash`.
pub fn write_script(hash: &str) -> OperationScript {
    OperationScript {
        sign_and_send: Some(json!({ "hash": hash })),
        ..OperationScript::default()
    }
}

/// A view operation answering with `result`.
pub fn view_script(result: Value) -> OperationScript {
    OperationScript {
        simulate: Some(result),
        ..OperationScript::default()
    }
}

/// A listing operation serving fixed pages.
pub fn paged_script(pages: Vec<Vec<Value>>) -> OperationScript {
    OperationScript {
        pages: Some(pages),
        ..OperationScript::default()
    }
}

/// One recorded preparation.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub operation: String,
    pub args: Value,
    pub mode: CallMode,
}

struct Inner {
    scripts: Mutex<HashMap<String, OperationScript>>,
    calls: Mutex<Vec<RecordedCall>>,
}

/// Programmable stand-in for a bound contract client.
#[derive(Clone)]
pub struct StubClient {
    inner: Arc<Inner>,
}

impl StubClient {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                scripts: Mutex::new(HashMap::new()),
                calls: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn with_operation(self, name: &str, script: OperationScript) -> Self {
        self.inner
            .scripts
            .lock()
            .unwrap()
            .insert(name.to_string(), script);
        self
    }

    /// Every recorded preparation, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.inner.calls.lock().unwrap().clone()
    }

    /// Recorded preparations of one operation.
    pub fn calls_for(&self, operation: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.operation == operation)
            .collect()
    }

    fn script(&self, operation: &str) -> Option<OperationScript> {
        self.inner.scripts.lock().unwrap().get(operation).cloned()
    }
}

#[async_trait]
impl ContractClient for StubClient {
    fn operations(&self) -> Vec<String> {
        self.inner.scripts.lock().unwrap().keys().cloned().collect()
    }

    async fn prepare(
        &self,
        operation: &str,
        args: Value,
        options: &CallOptions,
    ) -> Result<Box<dyn PreparedCall>, ClientError> {
        let script = self
            .script(operation)
            .ok_or_else(|| ClientError::Transport(format!("unknown operation: {operation}")))?;
        self.inner.calls.lock().unwrap().push(RecordedCall {
            operation: operation.to_string(),
            args: args.clone(),
            mode: options.mode,
        });
        Ok(Box::new(StubPrepared {
            script,
            args,
            mode: options.mode,
        }))
    }

    async fn simulate(&self, operation: &str, _args: Value) -> Result<Value, ClientError> {
        self.script(operation)
            .and_then(|script| script.client_simulate)
            .ok_or(ClientError::Unsupported("client-level preview"))
    }
}

struct StubPrepared {
    script: OperationScript,
    args: Value,
    mode: CallMode,
}

#[async_trait]
impl PreparedCall for StubPrepared {
    async fn simulate(&self) -> Result<Value, ClientError> {
        if let Some(pages) = &self.script.pages {
            let offset = self.args.get("offset").and_then(Value::as_u64).unwrap_or(0);
            let limit = self
                .args
                .get("limit")
                .and_then(Value::as_u64)
                .unwrap_or(1)
                .max(1);
            let page = pages.get((offset / limit) as usize).cloned().unwrap_or_default();
            return Ok(Value::Array(page));
        }
        self.script
            .simulate
            .clone()
            .ok_or(ClientError::Unsupported("prepared-call preview"))
    }

    async fn sign_and_send(&self, _signer: &dyn Signer) -> Result<Value, ClientError> {
        if let Some(message) = &self.script.sign_and_send_error {
            return Err(ClientError::Execution(message.clone()));
        }
        self.script
            .sign_and_send
            .clone()
            .ok_or(ClientError::Unsupported("delegated sign-and-send"))
    }

    async fn payload(&self) -> Result<Value, ClientError> {
        if self.mode != CallMode::Build {
            return Err(ClientError::Unsupported("unsigned payload extraction"));
        }
        self.script
            .payload
            .clone()
            .ok_or(ClientError::Unsupported("unsigned payload extraction"))
    }
}

/// Stand-in for an external signer.
pub struct StubSigner {
    address: String,
    hash: String,
    fail: bool,
    sent: Mutex<Vec<String>>,
}

impl StubSigner {
    pub fn new(address: &str, hash: &str) -> Self {
        Self {
            address: address.to_string(),
            hash: hash.to_string(),
            fail: false,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(address: &str) -> Self {
        Self {
            fail: true,
            ..Self::new(address, "")
        }
    }

    /// Payloads handed to `send`, in order.
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Signer for StubSigner {
    fn address(&self) -> &str {
        &self.address
    }

    async fn send(&self, payload: &str) -> Result<String, ClientError> {
        if self.fail {
            return Err(ClientError::Signing("stub signer configured to fail".to_string()));
        }
        self.sent.lock().unwrap().push(payload.to_string());
        Ok(self.hash.clone())
    }
}
