use serde::de::DeserializeOwned;
use serde_json::Value;
use tr_core::ClientResult;

/// One page of a list endpoint.
///
/// Older servers answer with a bare array. Paginated ones wrap the list under
/// the entity key and point at the next page through `_links.next`, a path
/// relative to `index.php?`.
#[derive(Debug)]
pub(crate) struct Page<T> {
    pub(crate) items: Vec<T>,
    pub(crate) next: Option<String>,
}

impl<T: DeserializeOwned> Page<T> {
    pub(crate) fn parse(body: Value, key: &str) -> ClientResult<Self> {
        match body {
            Value::Array(_) => Ok(Self {
                items: serde_json::from_value(body)?,
                next: None,
            }),
            Value::Object(mut object) => {
                let next = object
                    .get("_links")
                    .and_then(|links| links.get("next"))
                    .and_then(Value::as_str)
                    .filter(|next| !next.is_empty())
                    .map(String::from);
                let items = match object.remove(key) {
                    Some(list) => serde_json::from_value(list)?,
                    None => Vec::new(),
                };
                Ok(Self { items, next })
            }
            other => Ok(Self {
                items: serde_json::from_value(other)?,
                next: None,
            }),
        }
    }
}
