use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Open-ended provider user record, keyed by provider-defined field names
pub type ProviderUser = Map<String, Value>;

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

/// Successful registration, login or reset-with-autologin result from the provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderCredentialResult {
    pub user: ProviderUser,
    pub jwt: String,
}

/// Serialized names of the fixed local user fields
pub const FIXED_USER_FIELDS: [&str; 7] = [
    "id",
    "email",
    "name",
    "emailVerified",
    "image",
    "createdAt",
    "updatedAt",
];

/// Local user record, normalized from the provider user
///
/// The fixed fields always exist. `extra` holds every other field plus any
/// value assigned to a fixed name that does not fit its typed slot; on
/// serialization `extra` wins, so each key appears exactly once.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub email_verified: bool,
    pub image: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub extra: Map<String, Value>,
}

impl LocalUser {
    /// The record as a single JSON object, as sealed and returned to clients
    #[must_use]
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("id".to_string(), Value::String(self.id.clone()));
        map.insert("email".to_string(), Value::String(self.email.clone()));
        map.insert("name".to_string(), Value::String(self.name.clone()));
        map.insert("emailVerified".to_string(), Value::Bool(self.email_verified));
        map.insert("image".to_string(), self.image.clone());
        map.insert("createdAt".to_string(), timestamp_value(self.created_at));
        map.insert("updatedAt".to_string(), timestamp_value(self.updated_at));
        for (key, value) in &self.extra {
            map.insert(key.clone(), value.clone());
        }
        map
    }

    /// Rebuild a record from its object form
    ///
    /// Fixed fields missing from `map` keep their defaults (empty strings,
    /// `false`, `null`, the Unix epoch).
    #[must_use]
    pub fn from_map(map: Map<String, Value>) -> Self {
        let mut user = Self {
            id: String::new(),
            email: String::new(),
            name: String::new(),
            email_verified: false,
            image: Value::Null,
            created_at: DateTime::<Utc>::default(),
            updated_at: DateTime::<Utc>::default(),
            extra: Map::new(),
        };
        for (field, value) in map {
            user.set_field(&field, value);
        }
        user
    }
}

fn timestamp_value(date: DateTime<Utc>) -> Value {
    Value::String(date.to_rfc3339_opts(SecondsFormat::AutoSi, true))
}

impl Serialize for LocalUser {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_map().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for LocalUser {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Map::<String, Value>::deserialize(deserializer).map(Self::from_map)
    }
}

/// Stateless session record; it only ever lives inside the sealed cookie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalSession {
    pub id: String,
    pub token: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub ip_address: String,
    pub user_agent: String,
    pub provider_jwt: String,
}

impl LocalSession {
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

/// The `{ session, user }` pair handed to the session hook and sealed into the cookie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionPayload {
    pub session: LocalSession,
    pub user: LocalUser,
}

/// JSON body returned after a local session was established
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub user: LocalUser,
    pub session: LocalSession,
    pub provider_jwt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    pub code: String,
    pub password: String,
    pub password_confirmation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignInRequest {
    pub identifier: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}
