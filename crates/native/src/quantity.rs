//! Serde helpers for the node's integer encoding.
//!
//! The Theta node writes `uint64` values as decimal strings (`"1024"`). Older endpoints and
//! hand-written fixtures also use bare JSON numbers or `0x`-prefixed hex, so all three are
//! accepted when decoding. Encoding always produces the decimal string form.

use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

#[derive(Deserialize)]
#[serde(untagged)]
enum Repr {
    Number(u64),
    Text(String),
}

pub(crate) fn parse(s: &str) -> Option<u64> {
    let s = s.trim();
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => s.parse().ok(),
    }
}

/// (De)serializes a `u64` as a decimal string.
pub(crate) mod u64_string {
    use super::*;

    pub(crate) fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Number(n) => Ok(n),
            Repr::Text(s) => {
                parse(&s).ok_or_else(|| D::Error::custom(format!("invalid uint64 `{s}`")))
            }
        }
    }
}

/// (De)serializes a [`U256`] amount as a decimal string.
///
/// Coin balances and gas prices are big integers on the node and exceed `u64` routinely.
pub(crate) mod u256_string {
    use super::*;
    use alloy_primitives::U256;
    use std::str::FromStr;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum AmountRepr {
        Number(u64),
        Text(String),
    }

    pub(crate) fn serialize<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
        match AmountRepr::deserialize(deserializer)? {
            AmountRepr::Number(n) => Ok(U256::from(n)),
            AmountRepr::Text(s) => U256::from_str(s.trim())
                .map_err(|err| D::Error::custom(format!("invalid amount `{s}`: {err}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Height {
        #[serde(with = "u64_string")]
        height: u64,
    }

    #[test]
    fn test_decodes_all_integer_forms() {
        for raw in [r#"{"height":"42"}"#, r#"{"height":42}"#, r#"{"height":"0x2a"}"#] {
            let decoded: Height = serde_json::from_str(raw).unwrap();
            assert_eq!(decoded, Height { height: 42 });
        }
    }

    #[test]
    fn test_encodes_decimal_string() {
        let encoded = serde_json::to_string(&Height { height: 1024 }).unwrap();
        assert_eq!(encoded, r#"{"height":"1024"}"#);
    }

    #[test]
    fn test_amount_exceeding_u64() {
        #[derive(Deserialize)]
        struct Amount {
            #[serde(with = "u256_string")]
            wei: alloy_primitives::U256,
        }

        let decoded: Amount = serde_json::from_str(r#"{"wei":"1000000000000000000000"}"#).unwrap();
        assert_eq!(decoded.wei, alloy_primitives::U256::from(10u64).pow(alloy_primitives::U256::from(21)));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(serde_json::from_str::<Height>(r#"{"height":"ten"}"#).is_err());
        assert!(serde_json::from_str::<Height>(r#"{"height":"-1"}"#).is_err());
    }
}
