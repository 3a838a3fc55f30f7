use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::error::VaultError;
use crate::validate::CredentialPolicy;

/// Environment variables consulted when loading [`Config`].
const ENV_KEYS: &[&str] = &[
    "port",
    "database_path",
    "request_timeout",
    "password_min_length",
    "password_max_length",
    "username_min_length",
    "username_max_length",
    "cors_allowed_origins",
    "loglevel",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub port: u16,
    pub database_path: PathBuf,
    #[serde(with = "duration_str")]
    pub request_timeout: Duration,
    pub password_min_length: usize,
    pub password_max_length: usize,
    pub username_min_length: usize,
    pub username_max_length: usize,
    #[serde(deserialize_with = "string_or_list")]
    pub cors_allowed_origins: Vec<String>,
    pub loglevel: String,
}

impl Default for Config {
    fn default() -> Self {
        let policy = CredentialPolicy::default();
        Self {
            port: 8200,
            database_path: PathBuf::from("./credentials.sqlite"),
            request_timeout: Duration::from_secs(20),
            password_min_length: policy.password_min_length,
            password_max_length: policy.password_max_length,
            username_min_length: policy.username_min_length,
            username_max_length: policy.username_max_length,
            cors_allowed_origins: vec!["http://localhost:5173".to_string()],
            loglevel: "info".to_string(),
        }
    }
}

impl Config {
    /// Defaults overlaid with raw (unprefixed) environment variables.
    /// A variable that is set but blank counts as unset.
    pub fn figment() -> Figment {
        let env = Env::raw().only(ENV_KEYS);
        let blank: Vec<String> = env
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(key, _)| key.as_str().to_string())
            .collect();
        let blank: Vec<&str> = blank.iter().map(String::as_str).collect();
        Figment::from(Serialized::defaults(Config::default())).merge(env.ignore(&blank))
    }

    pub fn load() -> Result<Self, VaultError> {
        Self::from_figment(Self::figment())
    }

    pub fn from_figment(figment: Figment) -> Result<Self, VaultError> {
        let cfg: Config = figment.extract()?;
        cfg.check_bounds()?;
        Ok(cfg)
    }

    pub fn policy(&self) -> CredentialPolicy {
        CredentialPolicy {
            password_min_length: self.password_min_length,
            password_max_length: self.password_max_length,
            username_min_length: self.username_min_length,
            username_max_length: self.username_max_length,
        }
    }

    fn check_bounds(&self) -> Result<(), VaultError> {
        if self.password_min_length > self.password_max_length {
            return Err(figment::Error::from(format!(
                "password_min_length ({}) exceeds password_max_length ({})",
                self.password_min_length, self.password_max_length
            ))
            .into());
        }
        if self.username_min_length > self.username_max_length {
            return Err(figment::Error::from(format!(
                "username_min_length ({}) exceeds username_max_length ({})",
                self.username_min_length, self.username_max_length
            ))
            .into());
        }
        Ok(())
    }
}

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Parse a duration such as `20s`, `1.5h`, `1m30s`, `500ms`, `300us` or `10ns`.
/// A bare integer is read as seconds.
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let s = input.trim();
    if s.is_empty() {
        return Err("empty duration".to_string());
    }
    if let Ok(secs) = s.parse::<u64>() {
        return Ok(Duration::from_secs(secs));
    }

    let invalid = || format!("invalid duration `{input}`");
    let overflow = || format!("duration overflow in `{input}`");

    let mut total: u128 = 0;
    let mut rest = s;
    while !rest.is_empty() {
        let num_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let (number, tail) = rest.split_at(num_len);
        let (whole, frac) = number.split_once('.').unwrap_or((number, ""));
        if (whole.is_empty() && frac.is_empty()) || frac.contains('.') {
            return Err(invalid());
        }

        let unit_len = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, next) = tail.split_at(unit_len);
        let scale: u128 = match unit {
            "ns" => 1,
            "us" | "\u{b5}s" | "\u{3bc}s" => 1_000,
            "ms" => 1_000_000,
            "s" => NANOS_PER_SEC,
            "m" => 60 * NANOS_PER_SEC,
            "h" => 3600 * NANOS_PER_SEC,
            "" => return Err(format!("missing unit in duration `{input}`")),
            unit => return Err(format!("unknown duration unit `{unit}` in `{input}`")),
        };

        // whole holds only ASCII digits, so a parse failure means it is too large
        let whole: u128 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| overflow())?
        };
        let mut part = whole.checked_mul(scale).ok_or_else(overflow)?;

        // digits past nanosecond resolution are dropped
        let (mut frac_value, mut divisor) = (0u128, 1u128);
        for digit in frac.bytes().take(18) {
            frac_value = frac_value * 10 + u128::from(digit - b'0');
            divisor *= 10;
        }
        part = part
            .checked_add(frac_value * scale / divisor)
            .ok_or_else(overflow)?;

        total = total.checked_add(part).ok_or_else(overflow)?;
        rest = next;
    }

    let secs = u64::try_from(total / NANOS_PER_SEC).map_err(|_| overflow())?;
    Ok(Duration::new(secs, (total % NANOS_PER_SEC) as u32))
}

mod duration_str {
    use super::*;

    pub fn serialize<S: Serializer>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let nanos = d.as_nanos();
        if nanos % NANOS_PER_SEC == 0 {
            serializer.serialize_str(&format!("{}s", d.as_secs()))
        } else if nanos % 1_000_000 == 0 {
            serializer.serialize_str(&format!("{}ms", d.as_millis()))
        } else {
            serializer.serialize_str(&format!("{nanos}ns"))
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        struct DurationVisitor;

        impl de::Visitor<'_> for DurationVisitor {
            type Value = Duration;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("seconds as an integer or a duration string like `20s`")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Duration, E> {
                Ok(Duration::from_secs(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Duration, E> {
                u64::try_from(v)
                    .map(Duration::from_secs)
                    .map_err(|_| E::custom("duration must not be negative"))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Duration, E> {
                Duration::try_from_secs_f64(v).map_err(E::custom)
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Duration, E> {
                parse_duration(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_any(DurationVisitor)
    }
}

/// Accept either a list or a single comma-separated string.
fn string_or_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(s) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        OneOrMany::Many(v) => v,
    })
}
