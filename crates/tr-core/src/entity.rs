use crate::{Case, EntityKind, Section, SharedStep, Suite};

use serde_json::{Map, Value};

/// Common view over every migratable entity.
///
/// `compare_value` resolves the configured compare field. `title` and `name`
/// are aliases so a single setting works for every kind (suites and sections
/// call it `name`, shared steps and cases call it `title`). Any other field
/// is looked up in the entity's extra payload and must be a JSON string.
pub trait Entity: Clone + Send + Sync + 'static {
    const KIND: EntityKind;

    fn id(&self) -> i64;

    /// Human readable label used in logs and error lists.
    fn label(&self) -> &str;

    fn compare_value(&self, field: &str) -> Option<&str>;
}

/// Normalise a compare value: trimmed and case-insensitive.
pub fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

fn extra_str<'a>(extra: &'a Map<String, Value>, field: &str) -> Option<&'a str> {
    extra.get(field).and_then(Value::as_str)
}

impl Entity for SharedStep {
    const KIND: EntityKind = EntityKind::SharedSteps;

    fn id(&self) -> i64 {
        self.id
    }

    fn label(&self) -> &str {
        &self.title
    }

    fn compare_value(&self, field: &str) -> Option<&str> {
        match field {
            "title" | "name" => Some(&self.title),
            _ => extra_str(&self.extra, field),
        }
    }
}

impl Entity for Suite {
    const KIND: EntityKind = EntityKind::Suites;

    fn id(&self) -> i64 {
        self.id
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn compare_value(&self, field: &str) -> Option<&str> {
        match field {
            "title" | "name" => Some(&self.name),
            "description" => self.description.as_deref(),
            _ => extra_str(&self.extra, field),
        }
    }
}

impl Entity for Section {
    const KIND: EntityKind = EntityKind::Sections;

    fn id(&self) -> i64 {
        self.id
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn compare_value(&self, field: &str) -> Option<&str> {
        match field {
            "title" | "name" => Some(&self.name),
            "description" => self.description.as_deref(),
            _ => extra_str(&self.extra, field),
        }
    }
}

impl Entity for Case {
    const KIND: EntityKind = EntityKind::Cases;

    fn id(&self) -> i64 {
        self.id
    }

    fn label(&self) -> &str {
        &self.title
    }

    fn compare_value(&self, field: &str) -> Option<&str> {
        match field {
            "title" | "name" => Some(&self.title),
            "refs" => self.refs.as_deref(),
            _ => extra_str(&self.extra, field),
        }
    }
}
