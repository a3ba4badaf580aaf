use secstr::SecStr;
use serde::{Deserialize, Deserializer};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(deserialize_with = "deserialize_secstr")]
    pub webhook_secret: SecStr,
    /// Largest accepted webhook body, in bytes.
    #[serde(default = "default_payload_limit")]
    pub payload_limit: usize,
}

fn default_bind() -> String {
    "127.0.0.1:8080".into()
}

fn default_payload_limit() -> usize {
    256 * 1024
}

fn deserialize_secstr<'de, D>(de: D) -> Result<SecStr, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(de).map(|s| SecStr::new(s.into_bytes()))
}
