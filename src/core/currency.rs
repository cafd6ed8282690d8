//! Currency codes

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use super::error::Error;
use super::validator::validate_code;

/// A three character currency or cryptocurrency code such as `USD` or `BTC`.
///
/// Only the length is checked, the characters are passed to the API as given.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// `EUR` is what the API itself falls back to when no base is given.
impl Default for CurrencyCode {
    fn default() -> Self {
        CurrencyCode("EUR".to_string())
    }
}

impl TryFrom<&str> for CurrencyCode {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        validate_code(value)?;
        Ok(CurrencyCode(value.to_string()))
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        validate_code(&value)?;
        Ok(CurrencyCode(value))
    }
}

impl FromStr for CurrencyCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.try_into()
    }
}

impl AsRef<str> for CurrencyCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CurrencyCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for CurrencyCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for CurrencyCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        CurrencyCode::try_from(code).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_currency_code() {
        let usd: CurrencyCode = "USD".parse().unwrap();
        assert_eq!(usd.as_str(), "USD");
        assert_eq!(usd.to_string(), "USD");
        assert!(matches!("US".parse::<CurrencyCode>(), Err(Error::InvalidCode)));
        assert!(matches!(
            CurrencyCode::try_from("USDT".to_string()),
            Err(Error::InvalidCode)
        ));
    }

    #[test]
    fn test_deserialize_rejects_bad_length() {
        let code: CurrencyCode = serde_yaml::from_str("GBP").unwrap();
        assert_eq!(code.as_str(), "GBP");
        assert!(serde_yaml::from_str::<CurrencyCode>("POUND").is_err());
    }
}
