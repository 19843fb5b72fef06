use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;

/// A STAC version number.
///
/// This crate only ever produces [Version::v1_1_0], but it round-trips any
/// version string it reads so that catalogs written by older STAC producers
/// still deserialize without loss. Migrating between STAC versions is out of
/// scope for this crate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[allow(non_camel_case_types, missing_docs)]
pub enum Version {
    v1_0_0,
    #[default]
    v1_1_0,
    /// Some other version string, preserved verbatim.
    Other(String),
}

impl Version {
    fn as_str(&self) -> &str {
        match self {
            Version::v1_0_0 => "1.0.0",
            Version::v1_1_0 => "1.1.0",
            Version::Other(s) => s,
        }
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Version {
    type Err = std::convert::Infallible;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1.0.0" => Ok(Version::v1_0_0),
            "1.1.0" => Ok(Version::v1_1_0),
            other => Ok(Version::Other(other.to_string())),
        }
    }
}

impl Serialize for Version {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Version::from_str(&s).expect("Version::from_str is infallible"))
    }
}

#[cfg(test)]
mod tests {
    use super::Version;

    #[test]
    fn default_is_v1_1_0() {
        assert_eq!(Version::default(), Version::v1_1_0);
    }

    #[test]
    fn round_trips_unknown_versions() {
        let json = serde_json::to_value(Version::v1_0_0).unwrap();
        assert_eq!(json, "1.0.0");
        let version: Version = serde_json::from_value(serde_json::json!("0.9.0")).unwrap();
        assert_eq!(version.to_string(), "0.9.0");
    }
}
