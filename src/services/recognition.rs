//! Peer recognition facade.
//!
//! The deployed contract has no dedicated recognition storage; recognitions
//! ride on the participation-register operation, with a derived 32-bit id so
//! callers get a stable handle for the record they just wrote.

use std::sync::Arc;

use chrono::Utc;
use serde_json::{json, Value};

use crate::client::{envelope, CallOptions, ContractClient, Signer};
use crate::config::{AdapterConfig, PagingConfig};
use crate::error::{AdapterError, AdapterResult};
use crate::resolve::OperationBinding;
use crate::services::{pick_signer, read_paged, submit_write, WriteResult};
use crate::validate;

const INITIALIZE: &[&str] = &["initialize"];
const REGISTER: &[&str] = &["register_participation", "give_recognition"];
const RECEIVED: &[&str] = &["get_volunteer_participations", "get_received_recognitions"];
const SENT: &[&str] = &["get_organization_participations", "get_sent_recognitions"];

/// Longest task name the register operation accepts.
const MAX_TASK_NAME: usize = 60;

/// One recognition entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionRecord {
    /// Position within the listing; the contract stores no record id.
    pub id: u32,
    pub sender: String,
    pub receiver: String,
    pub message: String,
    pub timestamp: Option<u64>,
}

/// Result of giving recognition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GiveRecognitionResult {
    /// Derived 32-bit id of the written record.
    pub id: u32,
    pub tx_hash: String,
}

/// Typed service over the recognition surface.
pub struct RecognitionService {
    client: Arc<dyn ContractClient>,
    options: CallOptions,
    paging: PagingConfig,
    initialize: OperationBinding,
    register: OperationBinding,
    received: OperationBinding,
    sent: OperationBinding,
    default_signer: Option<Arc<dyn Signer>>,
}

impl RecognitionService {
    pub fn new(client: Arc<dyn ContractClient>, config: &AdapterConfig) -> Self {
        Self {
            initialize: OperationBinding::negotiate(client.as_ref(), INITIALIZE),
            register: OperationBinding::negotiate(client.as_ref(), REGISTER),
            received: OperationBinding::negotiate(client.as_ref(), RECEIVED),
            sent: OperationBinding::negotiate(client.as_ref(), SENT),
            options: config.call_options(),
            paging: config.paging.clone(),
            default_signer: None,
            client,
        }
    }

    pub fn with_default_signer(mut self, signer: Arc<dyn Signer>) -> Self {
        self.default_signer = Some(signer);
        self
    }

    pub async fn initialize(
        &self,
        admin: &str,
        signer: Option<&dyn Signer>,
    ) -> AdapterResult<WriteResult> {
        validate::assert_address(admin, "admin")?;
        let signer = pick_signer(signer, &self.default_signer)?;
        submit_write(
            self.client.as_ref(),
            self.initialize.name()?,
            json!({ "admin": admin }),
            signer,
            &self.options,
        )
        .await
    }

    /// Record a recognition from `sender` to `receiver`.
    pub async fn give_recognition(
        &self,
        sender: &str,
        receiver: &str,
        message: &str,
        signer: Option<&dyn Signer>,
    ) -> AdapterResult<GiveRecognitionResult> {
        validate::assert_address(sender, "sender")?;
        validate::assert_address(receiver, "receiver")?;
        validate::assert_non_empty(message, "message")?;
        let signer = pick_signer(signer, &self.default_signer)?;

        let task_id = format!(
            "{sender}:{receiver}:{}:{}",
            Utc::now().timestamp_millis(),
            fnv1a32(&format!("{sender}{receiver}{message}"))
        );
        let task_name: String = message.chars().take(MAX_TASK_NAME).collect();
        let args = json!({
            "organization": sender,
            "volunteer": receiver,
            "task_id": task_id,
            "task_name": task_name,
            "metadata": { "tag": "some", "values": [message] },
        });

        let written = submit_write(
            self.client.as_ref(),
            self.register.name()?,
            args,
            signer,
            &self.options,
        )
        .await?;
        Ok(GiveRecognitionResult {
            id: fnv1a32(&task_id),
            tx_hash: written.tx_hash,
        })
    }

    /// The current contract cannot remove a written record.
    pub async fn revoke_recognition(
        &self,
        sender: &str,
        _recognition_id: u32,
        _signer: Option<&dyn Signer>,
    ) -> AdapterResult<WriteResult> {
        validate::assert_address(sender, "sender")?;
        Err(AdapterError::Unsupported("recognition revocation"))
    }

    /// Lookup by id is not expressible over the participation surface.
    pub async fn get_recognition(
        &self,
        _recognition_id: u32,
    ) -> AdapterResult<Option<RecognitionRecord>> {
        Ok(None)
    }

    /// All recognitions received by `user`, in listing order.
    pub async fn get_received_recognitions(
        &self,
        user: &str,
    ) -> AdapterResult<Vec<RecognitionRecord>> {
        validate::assert_address(user, "user")?;
        let items = read_paged(
            &self.client,
            self.received.name()?,
            json!({ "volunteer": user }),
            &self.paging,
            &self.options,
            "received recognitions",
        )
        .await?;
        Ok(decode_records(&items))
    }

    /// All recognitions sent by `user`, in listing order.
    pub async fn get_sent_recognitions(&self, user: &str) -> AdapterResult<Vec<RecognitionRecord>> {
        validate::assert_address(user, "user")?;
        let items = read_paged(
            &self.client,
            self.sent.name()?,
            json!({ "organization": user }),
            &self.paging,
            &self.options,
            "sent recognitions",
        )
        .await?;
        Ok(decode_records(&items))
    }

    pub async fn get_total_recognitions(&self, user: &str) -> AdapterResult<u32> {
        let received = self.get_received_recognitions(user).await?;
        validate::bounded_u32(received.len() as u64, "recognition count")
    }
}

fn decode_records(items: &[Value]) -> Vec<RecognitionRecord> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| RecognitionRecord {
            id: index as u32,
            sender: envelope::string_field(item, &["organization", "sender"]),
            receiver: envelope::string_field(item, &["volunteer", "receiver"]),
            message: envelope::string_field(item, &["task_name", "message"]),
            timestamp: envelope::u64_field(item, &["timestamp"]),
        })
        .collect()
}

/// FNV-1a over the input bytes, the id derivation the original records used.
fn fnv1a32(input: &str) -> u32 {
    let mut hash: u32 = 2_166_136_261;
    for byte in input.bytes() {
        hash ^= u32::from(byte);
        hash = hash.wrapping_mul(16_777_619);
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fnv1a32_is_stable() {
        assert_eq!(fnv1a32(""), 2_166_136_261);
        assert_eq!(fnv1a32("a"), 0xe40c_292c);
        assert_eq!(fnv1a32("abc"), fnv1a32("abc"));
        assert_ne!(fnv1a32("abc"), fnv1a32("abd"));
    }

    #[test]
    fn test_decode_records_indexes_and_aliases() {
        let items = vec![
            json!({"organization": "GORG1", "volunteer": "GVOL1", "task_name": "thanks", "timestamp": 99}),
            json!({"sender": "GORG2", "receiver": "GVOL2", "message": "kudos"}),
        ];
        let records = decode_records(&items);
        assert_eq!(records[0].id, 0);
        assert_eq!(records[0].sender, "GORG1");
        assert_eq!(records[0].message, "thanks");
        assert_eq!(records[0].timestamp, Some(99));
        assert_eq!(records[1].id, 1);
        assert_eq!(records[1].sender, "GORG2");
        assert_eq!(records[1].timestamp, None);
    }
}
