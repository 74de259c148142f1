pub mod case;
pub mod entity_kind;
pub mod missing_shared_step_policy;
pub mod section;
pub mod shared_step;
pub mod step;
pub mod suite;

use serde_json::{Map, Value};

/// Keep only the `custom_*` fields of an entity's extra payload.
///
/// Read-only server fields (`created_on`, `updated_by`, ...) are rejected by
/// the add endpoints, so only custom fields are forwarded on create.
pub(crate) fn custom_fields(extra: &Map<String, Value>) -> Map<String, Value> {
    extra
        .iter()
        .filter(|(key, value)| key.starts_with("custom_") && !value.is_null())
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
