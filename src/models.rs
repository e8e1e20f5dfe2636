use serde::{Deserialize, Serialize};

/// JSON envelope returned on every successful operation.
///
/// GET wraps the stored value; PUT and DELETE return the literal string
/// `"null"` as their result.
#[derive(Serialize, Deserialize)]
pub struct ResultEnvelope {
    pub result: String,
}

impl ResultEnvelope {
    pub fn value(value: String) -> Self {
        Self { result: value }
    }

    pub fn null() -> Self {
        Self {
            result: "null".to_string(),
        }
    }
}
