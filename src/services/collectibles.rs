//! Collectible (token) issuance facade.

use std::sync::Arc;

use serde_json::json;

use crate::client::{envelope, CallOptions, ContractClient, Signer};
use crate::config::AdapterConfig;
use crate::error::{AdapterError, AdapterResult};
use crate::resolve::OperationBinding;
use crate::services::{call_view, expect_items, pick_signer, submit_write, WriteResult};
use crate::simulate;
use crate::validate;

const INITIALIZE: &[&str] = &["initialize"];
const MINT: &[&str] = &["mint"];
const TRANSFER: &[&str] = &["transfer", "transfer_from"];
const BURN: &[&str] = &["burn"];
const APPROVE: &[&str] = &["approve"];
const GET_TOKEN: &[&str] = &["get_token"];
const GET_OWNER: &[&str] = &["get_owner", "owner_of"];
const GET_APPROVED: &[&str] = &["get_approved"];
const TOTAL_SUPPLY: &[&str] = &["total_supply"];
const TOKENS_OF_OWNER: &[&str] = &["tokens_of_owner", "tokens_of"];

/// A collectible as stored on-chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub id: u64,
    pub owner: String,
    pub metadata: String,
}

/// Result of minting a collectible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintResult {
    /// Id previewed before the commit; `None` when no preview was available.
    pub id: Option<u64>,
    pub tx_hash: String,
}

/// Typed service over the collectible contract.
pub struct CollectibleService {
    client: Arc<dyn ContractClient>,
    options: CallOptions,
    initialize: OperationBinding,
    mint: OperationBinding,
    transfer: OperationBinding,
    burn: OperationBinding,
    approve: OperationBinding,
    get_token: OperationBinding,
    get_owner: OperationBinding,
    get_approved: OperationBinding,
    total_supply: OperationBinding,
    tokens_of_owner: OperationBinding,
    default_signer: Option<Arc<dyn Signer>>,
}

impl CollectibleService {
    pub fn new(client: Arc<dyn ContractClient>, config: &AdapterConfig) -> Self {
        Self {
            initialize: OperationBinding::negotiate(client.as_ref(), INITIALIZE),
            mint: OperationBinding::negotiate(client.as_ref(), MINT),
            transfer: OperationBinding::negotiate(client.as_ref(), TRANSFER),
            burn: OperationBinding::negotiate(client.as_ref(), BURN),
            approve: OperationBinding::negotiate(client.as_ref(), APPROVE),
            get_token: OperationBinding::negotiate(client.as_ref(), GET_TOKEN),
            get_owner: OperationBinding::negotiate(client.as_ref(), GET_OWNER),
            get_approved: OperationBinding::negotiate(client.as_ref(), GET_APPROVED),
            total_supply: OperationBinding::negotiate(client.as_ref(), TOTAL_SUPPLY),
            tokens_of_owner: OperationBinding::negotiate(client.as_ref(), TOKENS_OF_OWNER),
            options: config.call_options(),
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

    /// Mint a collectible, previewing the new token id before the commit.
    pub async fn mint(
        &self,
        owner: &str,
        metadata: &str,
        signer: Option<&dyn Signer>,
    ) -> AdapterResult<MintResult> {
        validate::assert_address(owner, "owner")?;
        validate::assert_non_empty(metadata, "metadata")?;
        let signer = pick_signer(signer, &self.default_signer)?;

        let operation = self.mint.name()?;
        let args = json!({ "owner": owner, "metadata": metadata });

        let id = simulate::preview(self.client.as_ref(), operation, &args, &self.options)
            .await
            .as_ref()
            .and_then(envelope::as_u64);

        let written = submit_write(self.client.as_ref(), operation, args, signer, &self.options).await?;
        Ok(MintResult {
            id,
            tx_hash: written.tx_hash,
        })
    }

    pub async fn transfer(
        &self,
        from: &str,
        to: &str,
        token_id: u64,
        signer: Option<&dyn Signer>,
    ) -> AdapterResult<WriteResult> {
        validate::assert_address(from, "from")?;
        validate::assert_address(to, "to")?;
        let signer = pick_signer(signer, &self.default_signer)?;
        let args = json!({ "from": from, "to": to, "token_id": token_id });
        submit_write(
            self.client.as_ref(),
            self.transfer.name()?,
            args,
            signer,
            &self.options,
        )
        .await
    }

    pub async fn burn(
        &self,
        owner: &str,
        token_id: u64,
        signer: Option<&dyn Signer>,
    ) -> AdapterResult<WriteResult> {
        validate::assert_address(owner, "owner")?;
        let signer = pick_signer(signer, &self.default_signer)?;
        let args = json!({ "owner": owner, "token_id": token_id });
        submit_write(
            self.client.as_ref(),
            self.burn.name()?,
            args,
            signer,
            &self.options,
        )
        .await
    }

    pub async fn approve(
        &self,
        owner: &str,
        spender: &str,
        token_id: u64,
        signer: Option<&dyn Signer>,
    ) -> AdapterResult<WriteResult> {
        validate::assert_address(owner, "owner")?;
        validate::assert_address(spender, "spender")?;
        let signer = pick_signer(signer, &self.default_signer)?;
        let args = json!({ "owner": owner, "spender": spender, "token_id": token_id });
        submit_write(
            self.client.as_ref(),
            self.approve.name()?,
            args,
            signer,
            &self.options,
        )
        .await
    }

    pub async fn get_token(&self, token_id: u64) -> AdapterResult<Token> {
        let value = call_view(
            self.client.as_ref(),
            self.get_token.name()?,
            json!({ "token_id": token_id }),
            &self.options,
        )
        .await?;
        if !value.is_object() {
            return Err(AdapterError::ResponseShape(format!("token: {value}")));
        }
        Ok(Token {
            id: envelope::u64_field(&value, &["id", "token_id"]).unwrap_or(token_id),
            owner: envelope::string_field(&value, &["owner", "address"]),
            metadata: envelope::string_field(&value, &["metadata", "uri"]),
        })
    }

    pub async fn get_owner(&self, token_id: u64) -> AdapterResult<String> {
        let value = call_view(
            self.client.as_ref(),
            self.get_owner.name()?,
            json!({ "token_id": token_id }),
            &self.options,
        )
        .await?;
        envelope::as_string(&value)
            .ok_or_else(|| AdapterError::ResponseShape(format!("token owner: {value}")))
    }

    pub async fn get_approved(&self, token_id: u64) -> AdapterResult<String> {
        let value = call_view(
            self.client.as_ref(),
            self.get_approved.name()?,
            json!({ "token_id": token_id }),
            &self.options,
        )
        .await?;
        envelope::as_string(&value)
            .ok_or_else(|| AdapterError::ResponseShape(format!("approved spender: {value}")))
    }

    pub async fn total_supply(&self) -> AdapterResult<u64> {
        let value = call_view(
            self.client.as_ref(),
            self.total_supply.name()?,
            json!({}),
            &self.options,
        )
        .await?;
        envelope::as_u64(&value)
            .ok_or_else(|| AdapterError::ResponseShape(format!("total supply: {value}")))
    }

    pub async fn tokens_of_owner(&self, owner: &str) -> AdapterResult<Vec<u64>> {
        validate::assert_address(owner, "owner")?;
        let value = call_view(
            self.client.as_ref(),
            self.tokens_of_owner.name()?,
            json!({ "owner": owner }),
            &self.options,
        )
        .await?;
        expect_items(value, "token ids")?
            .iter()
            .map(|item| {
                envelope::as_u64(item)
                    .ok_or_else(|| AdapterError::ResponseShape(format!("token id: {item}")))
            })
            .collect()
    }
}
