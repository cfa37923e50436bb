//! Shared domain enums, stored as upper-case text columns

use serde::Serialize;
use sqlx::{Decode, Encode, Postgres};
use utoipa::ToSchema;

/// Implements string conversion and text-column SQLx mapping for a unit enum.
/// Deserialization goes through `FromStr`, so JSON bodies, query strings and
/// stored values all accept the same spellings.
macro_rules! text_enum {
    ($name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_uppercase().as_str() {
                    $($label => Ok($name::$variant),)+
                    _ => Err(format!(
                        "Invalid {} '{}', expected one of: {}",
                        stringify!($name),
                        s,
                        [$($label),+].join(", ")
                    )),
                }
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = <String as serde::Deserialize>::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }

        impl sqlx::Type<Postgres> for $name {
            fn type_info() -> sqlx::postgres::PgTypeInfo {
                <String as sqlx::Type<Postgres>>::type_info()
            }

            fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
                <String as sqlx::Type<Postgres>>::compatible(ty)
            }
        }

        impl<'r> Decode<'r, Postgres> for $name {
            fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
                let s: &str = Decode::<Postgres>::decode(value)?;
                s.parse().map_err(|e: String| e.into())
            }
        }

        impl Encode<'_, Postgres> for $name {
            fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
                <&str as Encode<Postgres>>::encode(self.as_str(), buf)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// RequestStatus
// ---------------------------------------------------------------------------

/// Maintenance request workflow state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    #[default]
    New,
    InProgress,
    Repaired,
    /// Equipment is being retired as unusable
    Scrap,
}

text_enum!(RequestStatus {
    New => "NEW",
    InProgress => "IN_PROGRESS",
    Repaired => "REPAIRED",
    Scrap => "SCRAP",
});

// ---------------------------------------------------------------------------
// RequestType
// ---------------------------------------------------------------------------

/// Kind of maintenance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestType {
    /// Unscheduled breakdown
    Corrective,
    /// Scheduled task shown on the calendar
    Preventive,
}

text_enum!(RequestType {
    Corrective => "CORRECTIVE",
    Preventive => "PREVENTIVE",
});

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,
    Medium,
    High,
}

text_enum!(Priority {
    Low => "LOW",
    Medium => "MEDIUM",
    High => "HIGH",
});

// ---------------------------------------------------------------------------
// EquipmentStatus
// ---------------------------------------------------------------------------

/// Operability of a piece of equipment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EquipmentStatus {
    #[default]
    Operational,
    Unusable,
}

text_enum!(EquipmentStatus {
    Operational => "OPERATIONAL",
    Unusable => "UNUSABLE",
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse() {
        assert_eq!("IN_PROGRESS".parse::<RequestStatus>(), Ok(RequestStatus::InProgress));
        assert_eq!("scrap".parse::<RequestStatus>(), Ok(RequestStatus::Scrap));
        assert!("DONE".parse::<RequestStatus>().is_err());
    }

    #[test]
    fn test_serde_matches_column_text() {
        for status in RequestStatus::ALL {
            let json = serde_json::to_string(status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
        for priority in Priority::ALL {
            let json = serde_json::to_string(priority).unwrap();
            assert_eq!(json, format!("\"{}\"", priority));
        }
    }

    #[test]
    fn test_deserialize_is_case_insensitive() {
        let parsed: RequestType = serde_json::from_str("\"preventive\"").unwrap();
        assert_eq!(parsed, RequestType::Preventive);
        let parsed: RequestStatus = serde_json::from_str("\"in_progress\"").unwrap();
        assert_eq!(parsed, RequestStatus::InProgress);
        assert!(serde_json::from_str::<Priority>("\"urgent\"").is_err());
    }

    #[test]
    fn test_invalid_type_message() {
        let err = "URGENT".parse::<RequestType>().unwrap_err();
        assert!(err.contains("CORRECTIVE, PREVENTIVE"));
    }
}
