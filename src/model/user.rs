use serde::{Deserialize, Serialize};

/// The identity resolved by the session gate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl User {
    pub fn new(name: impl Into<String>, email: Option<String>) -> Self {
        User {
            name: name.into(),
            email,
        }
    }
}
