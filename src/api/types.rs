//! Wire types for the ChillRate API.
//!
//! Identifiers come back as numbers from some deployments and strings from
//! others, so they are normalized to `String` on the way in.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

fn id_from_any<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

fn optional_id_from_any<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Null => None,
        other => Some(other.to_string()),
    })
}

/// A coach or team member
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, deserialize_with = "id_from_any")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: String,
}

impl User {
    /// Local part of the e-mail address, or the whole address if it has no `@`
    pub fn email_local_part(&self) -> &str {
        self.email.split('@').next().unwrap_or(&self.email)
    }

    /// Name shown in the UI: explicit name, e-mail local part, then raw id
    pub fn display_name(&self) -> String {
        if let Some(name) = self.name.as_deref().map(str::trim) {
            if !name.is_empty() {
                return name.to_string();
            }
        }
        let local = self.email_local_part().trim();
        if !local.is_empty() {
            return local.to_string();
        }
        self.id.clone()
    }
}

/// A team and its accepted members
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Team {
    #[serde(deserialize_with = "id_from_any")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub clients: Vec<User>,
}

impl Team {
    pub fn member(&self, user_id: &str) -> Option<&User> {
        self.clients.iter().find(|u| u.id == user_id)
    }
}

/// A user waiting to be accepted into a team
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PendingUser {
    #[serde(default, deserialize_with = "optional_id_from_any")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: String,
}

/// Successful response of the authenticate/register endpoints
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    #[serde(default)]
    pub user: User,
}

/// Credentials posted to the auth endpoints
#[derive(Debug, Clone, Default, Serialize)]
pub struct Credentials {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Resolve the name for `user_id` within `team`, falling back to the id
pub fn display_name(team: Option<&Team>, user_id: &str) -> String {
    team.and_then(|t| t.member(user_id))
        .map(User::display_name)
        .unwrap_or_else(|| user_id.to_string())
}
