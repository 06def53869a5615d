use serde::{Deserialize, Serialize};

/// One entry in the online-users roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnlineUser {
    pub id: String,
    #[serde(rename = "userName")]
    pub user_name: String,
}
