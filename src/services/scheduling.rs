//! Availability scheduling facade.
//!
//! Weekly availability windows per volunteer and day, with a client-side
//! conflict check over half-open intervals.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::client::{envelope, CallOptions, ContractClient, Signer};
use crate::config::AdapterConfig;
use crate::conflict::{has_conflict, Interval};
use crate::error::{AdapterError, AdapterResult};
use crate::resolve::OperationBinding;
use crate::services::{call_view, pick_signer, submit_write, WriteResult};
use crate::time::{self, TimeInput};
use crate::validate;

const INITIALIZE: &[&str] = &["initialize"];
const SET_AVAILABILITY: &[&str] = &["set_availability"];
const GET_AVAILABILITY: &[&str] = &["get_availability"];
const GET_ALL_AVAILABILITY: &[&str] = &["get_all_availability"];

/// One availability window, seconds since midnight or epoch as the contract
/// defines it; `end` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvailabilitySlot {
    pub start: u32,
    pub end: u32,
}

/// All windows of one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayAvailability {
    pub day: u32,
    pub slots: Vec<AvailabilitySlot>,
}

/// Typed service over the availability scheduling contract.
pub struct SchedulingService {
    client: Arc<dyn ContractClient>,
    options: CallOptions,
    initialize: OperationBinding,
    set_availability: OperationBinding,
    get_availability: OperationBinding,
    get_all_availability: OperationBinding,
    default_signer: Option<Arc<dyn Signer>>,
}

impl SchedulingService {
    /// Bind against a client, negotiating operation names once.
    pub fn new(client: Arc<dyn ContractClient>, config: &AdapterConfig) -> Self {
        Self {
            initialize: OperationBinding::negotiate(client.as_ref(), INITIALIZE),
            set_availability: OperationBinding::negotiate(client.as_ref(), SET_AVAILABILITY),
            get_availability: OperationBinding::negotiate(client.as_ref(), GET_AVAILABILITY),
            get_all_availability: OperationBinding::negotiate(client.as_ref(), GET_ALL_AVAILABILITY),
            options: config.call_options(),
            default_signer: None,
            client,
        }
    }

    /// Default signer for writes; captured here, immutable afterwards.
    pub fn with_default_signer(mut self, signer: Arc<dyn Signer>) -> Self {
        self.default_signer = Some(signer);
        self
    }

    /// Initialize the contract with an admin account.
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

    /// Replace a volunteer's windows for one day.
    pub async fn set_availability(
        &self,
        user: &str,
        day: u32,
        slots: &[(TimeInput, TimeInput)],
        signer: Option<&dyn Signer>,
    ) -> AdapterResult<WriteResult> {
        validate::assert_address(user, "user")?;
        let signer = pick_signer(signer, &self.default_signer)?;

        let mut normalized = Vec::with_capacity(slots.len());
        for (start, end) in slots {
            time::validate_range(start, end)?;
            normalized.push(json!([
                time::to_u32_seconds(start)?,
                time::to_u32_seconds(end)?
            ]));
        }

        let args = json!({
            "volunteer": user,
            "day": day,
            "time_slots": normalized,
        });
        submit_write(
            self.client.as_ref(),
            self.set_availability.name()?,
            args,
            signer,
            &self.options,
        )
        .await
    }

    /// Alias of [`set_availability`](Self::set_availability).
    pub async fn update_availability(
        &self,
        user: &str,
        day: u32,
        slots: &[(TimeInput, TimeInput)],
        signer: Option<&dyn Signer>,
    ) -> AdapterResult<WriteResult> {
        self.set_availability(user, day, slots, signer).await
    }

    /// Clear a volunteer's windows for one day.
    pub async fn remove_availability(
        &self,
        user: &str,
        day: u32,
        signer: Option<&dyn Signer>,
    ) -> AdapterResult<WriteResult> {
        self.set_availability(user, day, &[], signer).await
    }

    /// Windows of one volunteer on one day.
    pub async fn get_availability(
        &self,
        user: &str,
        day: u32,
    ) -> AdapterResult<Vec<AvailabilitySlot>> {
        validate::assert_address(user, "user")?;
        let value = call_view(
            self.client.as_ref(),
            self.get_availability.name()?,
            json!({ "volunteer": user, "day": day }),
            &self.options,
        )
        .await?;
        decode_slots(&value)
    }

    /// All windows of one volunteer, grouped by day.
    ///
    /// The day-to-windows map arrives either as a JSON object or as an array
    /// of `[day, windows]` pairs, depending on the binding version.
    pub async fn get_all_availability(&self, user: &str) -> AdapterResult<Vec<DayAvailability>> {
        validate::assert_address(user, "user")?;
        let value = call_view(
            self.client.as_ref(),
            self.get_all_availability.name()?,
            json!({ "volunteer": user }),
            &self.options,
        )
        .await?;

        let entries = envelope::entries(value)
            .ok_or_else(|| AdapterError::ResponseShape("availability map".to_string()))?;
        let mut days = Vec::with_capacity(entries.len());
        for (key, slots) in entries {
            let day = envelope::as_u32(&key)
                .ok_or_else(|| AdapterError::ResponseShape("availability day key".to_string()))?;
            days.push(DayAvailability {
                day,
                slots: decode_slots(&slots)?,
            });
        }
        Ok(days)
    }

    /// Whether `[start, end)` overlaps any of the volunteer's existing
    /// windows, across all days.
    pub async fn check_conflict(
        &self,
        user: &str,
        start: TimeInput,
        end: TimeInput,
    ) -> AdapterResult<bool> {
        time::validate_range(&start, &end)?;
        let candidate = Interval::new(time::to_u32_seconds(&start)?, time::to_u32_seconds(&end)?)?;

        let existing: Vec<Interval> = self
            .get_all_availability(user)
            .await?
            .into_iter()
            .flat_map(|day| day.slots)
            .map(|slot| Interval {
                start: slot.start,
                end: slot.end,
            })
            .collect();

        Ok(has_conflict(candidate, &existing))
    }
}

fn decode_slot(value: &Value) -> AdapterResult<AvailabilitySlot> {
    // Pair shape [start, end] or object shape {start, end}.
    if let Some(pair) = value.as_array() {
        if pair.len() == 2 {
            if let (Some(start), Some(end)) =
                (envelope::as_u32(&pair[0]), envelope::as_u32(&pair[1]))
            {
                return Ok(AvailabilitySlot { start, end });
            }
        }
    }
    if let (Some(start), Some(end)) = (
        envelope::u32_field(value, &["start"]),
        envelope::u32_field(value, &["end"]),
    ) {
        return Ok(AvailabilitySlot { start, end });
    }
    Err(AdapterError::ResponseShape(format!(
        "availability slot: {value}"
    )))
}

fn decode_slots(value: &Value) -> AdapterResult<Vec<AvailabilitySlot>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items.iter().map(decode_slot).collect(),
        other => Err(AdapterError::ResponseShape(format!(
            "availability slot list: {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_slot_shapes() {
        let from_pair = decode_slot(&json!([9, 17])).unwrap();
        let from_object = decode_slot(&json!({"start": 9, "end": 17})).unwrap();
        assert_eq!(from_pair, from_object);
        assert!(decode_slot(&json!("9-17")).is_err());
        assert!(decode_slot(&json!([9])).is_err());
    }

    #[test]
    fn test_decode_slots_null_is_empty() {
        assert!(decode_slots(&Value::Null).unwrap().is_empty());
        assert_eq!(
            decode_slots(&json!([[1, 2], [3, 4]])).unwrap().len(),
            2
        );
        assert!(decode_slots(&json!({"start": 1})).is_err());
    }
}
