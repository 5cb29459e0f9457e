use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Opaque task identifier.
///
/// Freshly generated ids look like `<unix-millis>-<16 lowercase hex>`. Ids
/// read back from storage are kept verbatim, whatever shape an older writer
/// gave them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(String);

static FALLBACK_SEQUENCE: AtomicU64 = AtomicU64::new(0);

impl TaskId {
    pub const RANDOM_HEX_LEN: usize = 16;

    /// Generate a fresh id from the wall clock and OS-backed CSPRNG entropy.
    ///
    /// Never fails: if the random source is unavailable the random half is
    /// derived from sub-second nanos and a process-wide sequence number.
    pub fn generate() -> Self {
        let now = Utc::now();
        let generated = Self::generate_with(now.timestamp_millis(), |bytes| {
            getrandom::fill(bytes).map_err(TaskIdGenerationError::random_source)
        });
        match generated {
            Ok(id) => id,
            Err(err) => {
                tracing::warn!(error = %err, "falling back to clock-derived task id");
                Self::fallback(now)
            }
        }
    }

    /// Test hook: inject a fixed clock and deterministic random bytes.
    pub(crate) fn generate_with<F>(
        millis: i64,
        mut fill_random: F,
    ) -> std::result::Result<Self, TaskIdGenerationError>
    where
        F: FnMut(&mut [u8]) -> std::result::Result<(), TaskIdGenerationError>,
    {
        let mut bytes = [0_u8; std::mem::size_of::<u64>()];
        fill_random(&mut bytes)?;
        Ok(Self::from_parts(millis, u64::from_be_bytes(bytes)))
    }

    fn fallback(now: DateTime<Utc>) -> Self {
        let sequence = FALLBACK_SEQUENCE.fetch_add(1, Ordering::Relaxed) & 0xffff_ffff;
        let nanos = u64::from(now.timestamp_subsec_nanos());
        Self::from_parts(now.timestamp_millis(), (nanos << 32) | sequence)
    }

    fn from_parts(millis: i64, random: u64) -> Self {
        Self(format!("{millis}-{random:016x}"))
    }

    /// Wrap an id read back from storage without normalizing it.
    pub(crate) fn from_stored(raw: String) -> Self {
        Self(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = TaskIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(TaskIdParseError::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl AsRef<str> for TaskId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<TaskId> for String {
    fn from(value: TaskId) -> Self {
        value.0
    }
}

impl TryFrom<&str> for TaskId {
    type Error = TaskIdParseError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<String> for TaskId {
    type Error = TaskIdParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Serialize for TaskId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TaskId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TaskIdVisitor;

        impl serde::de::Visitor<'_> for TaskIdVisitor {
            type Value = TaskId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a non-empty task id string or a numeric id")
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(TaskId(value.to_string()))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(TaskId(value.to_string()))
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(TaskId(value.to_string()))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                if value.is_empty() {
                    return Err(E::custom(TaskIdParseError::Empty));
                }
                Ok(TaskId::from_stored(value.to_string()))
            }
        }

        deserializer.deserialize_any(TaskIdVisitor)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskIdGenerationError {
    RandomSource(String),
}

impl TaskIdGenerationError {
    fn random_source(error: impl fmt::Display) -> Self {
        Self::RandomSource(error.to_string())
    }
}

impl fmt::Display for TaskIdGenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RandomSource(message) => write!(f, "task id generation failed: {message}"),
        }
    }
}

impl std::error::Error for TaskIdGenerationError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskIdParseError {
    Empty,
}

impl fmt::Display for TaskIdParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "task id cannot be empty"),
        }
    }
}

impl std::error::Error for TaskIdParseError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generate_produces_millis_and_random_hex() {
        let id = TaskId::generate();
        let (millis, random) = id.as_str().split_once('-').unwrap();
        assert!(millis.parse::<i64>().unwrap() > 0);
        assert_eq!(random.len(), TaskId::RANDOM_HEX_LEN);
        assert!(random.bytes().all(|b| b.is_ascii_hexdigit()));
        assert_eq!(random, random.to_ascii_lowercase());
    }

    #[test]
    fn generate_does_not_repeat_in_a_burst() {
        let mut seen = HashSet::new();
        for _ in 0..2048 {
            assert!(seen.insert(TaskId::generate()));
        }
    }

    #[test]
    fn generate_with_allows_deterministic_bytes_for_tests() {
        let id = TaskId::generate_with(1_700_000_000_000, |bytes| {
            bytes.copy_from_slice(&[0xde, 0xad, 0xbe, 0xef, 0xca, 0xfe, 0xba, 0xbe]);
            Ok(())
        })
        .unwrap();

        assert_eq!(id.as_str(), "1700000000000-deadbeefcafebabe");
    }

    #[test]
    fn generate_with_propagates_random_source_errors() {
        let err = TaskId::generate_with(0, |_| {
            Err(TaskIdGenerationError::RandomSource(
                "test entropy failure".to_string(),
            ))
        })
        .unwrap_err();

        assert_eq!(
            err,
            TaskIdGenerationError::RandomSource("test entropy failure".to_string())
        );
    }

    #[test]
    fn fallback_ids_differ_within_the_same_instant() {
        let now = Utc::now();
        let a = TaskId::fallback(now);
        let b = TaskId::fallback(now);
        assert_ne!(a, b);
    }

    #[test]
    fn parse_trims_whitespace() {
        let id: TaskId = "  1700000000000-abc  ".parse().unwrap();
        assert_eq!(id.as_str(), "1700000000000-abc");
    }

    #[test]
    fn parse_rejects_empty_input() {
        assert_eq!("   ".parse::<TaskId>().unwrap_err(), TaskIdParseError::Empty);
    }

    #[test]
    fn serde_round_trip() {
        let id: TaskId = "1700000000000-0123456789abcdef".parse().unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"1700000000000-0123456789abcdef\"");

        let parsed: TaskId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn serde_keeps_stored_ids_verbatim() {
        let parsed: TaskId = serde_json::from_str(r#"" padded ""#).unwrap();
        assert_eq!(parsed.as_str(), " padded ");
    }

    #[test]
    fn serde_accepts_numeric_id() {
        let parsed: TaskId = serde_json::from_str("42").unwrap();
        assert_eq!(parsed.as_str(), "42");
    }

    #[test]
    fn serde_rejects_empty_id() {
        let err = serde_json::from_str::<TaskId>("\"\"").unwrap_err();
        assert!(err.to_string().contains("cannot be empty"));
    }
}
