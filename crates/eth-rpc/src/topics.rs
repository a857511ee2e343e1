//! Topic filter normalization.

use alloy_primitives::{B256, hex};
use serde_json::Value;

use crate::EthRpcError;

/// Flattens a raw topic filter into the list of topic hashes it names.
///
/// Each element is either a hash string or a list of hash strings. Lists are flattened in
/// order, so `["0x01", ["0x02", "0x03"]]` yields three topics. Any other element shape fails
/// the whole filter.
pub fn normalize_topics(raw: &[Value]) -> Result<Vec<B256>, EthRpcError> {
    let mut topics = Vec::with_capacity(raw.len());
    for (position, element) in raw.iter().enumerate() {
        match element {
            Value::String(topic) => topics.push(parse_topic(topic)?),
            Value::Array(nested) => {
                for topic in nested {
                    let Value::String(topic) = topic else {
                        return Err(EthRpcError::InvalidArgument(format!(
                            "topic {position}: expected a string, got {topic}"
                        )));
                    };
                    topics.push(parse_topic(topic)?);
                }
            }
            other => {
                return Err(EthRpcError::InvalidArgument(format!(
                    "topic {position}: expected a string or a list of strings, got {other}"
                )));
            }
        }
    }
    Ok(topics)
}

/// Parses a topic string into a hash.
///
/// The `0x` prefix is optional and an odd number of digits is read with an implicit leading
/// zero. Short values are left padded, long values keep their last 32 bytes.
pub fn parse_topic(topic: &str) -> Result<B256, EthRpcError> {
    let digits = topic.strip_prefix("0x").or_else(|| topic.strip_prefix("0X")).unwrap_or(topic);
    let bytes = if digits.len() % 2 == 1 {
        hex::decode(format!("0{digits}"))
    } else {
        hex::decode(digits)
    }
    .map_err(|err| EthRpcError::InvalidArgument(format!("topic {topic:?}: {err}")))?;

    let tail = &bytes[bytes.len().saturating_sub(B256::len_bytes())..];
    Ok(B256::left_padding_from(tail))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn values(raw: Value) -> Vec<Value> {
        serde_json::from_value(raw).unwrap()
    }

    #[test]
    fn test_flat_list_keeps_order() {
        let topics = normalize_topics(&values(json!(["0x01", "0x02", "0x03"]))).unwrap();
        assert_eq!(
            topics,
            vec![B256::with_last_byte(1), B256::with_last_byte(2), B256::with_last_byte(3)]
        );
    }

    #[test]
    fn test_nested_lists_are_flattened() {
        let topics = normalize_topics(&values(json!([["0x01", "0x02"], "0x03", ["0x04"]]))).unwrap();
        let expected: Vec<_> = (1..=4).map(B256::with_last_byte).collect();
        assert_eq!(topics, expected);
    }

    #[test]
    fn test_empty_filter() {
        assert!(normalize_topics(&[]).unwrap().is_empty());
        assert!(normalize_topics(&values(json!([[]]))).unwrap().is_empty());
    }

    #[rstest]
    #[case::null(json!([null]))]
    #[case::number(json!([1]))]
    #[case::object(json!([{ "topic": "0x01" }]))]
    #[case::nested_number(json!([["0x01", 2]]))]
    #[case::nested_null(json!([[null]]))]
    #[case::doubly_nested(json!([[["0x01"]]]))]
    #[case::not_hex(json!(["0xzz"]))]
    fn test_rejects_malformed_elements(#[case] raw: Value) {
        let err = normalize_topics(&values(raw)).unwrap_err();
        assert!(matches!(err, EthRpcError::InvalidArgument(_)));
    }

    #[rstest]
    #[case::prefixed("0x0a", 0x0a)]
    #[case::unprefixed("0a", 0x0a)]
    #[case::upper_prefix("0X0a", 0x0a)]
    #[case::odd_length("0xa", 0x0a)]
    #[case::empty("0x", 0x00)]
    fn test_short_topics_are_left_padded(#[case] topic: &str, #[case] last: u8) {
        assert_eq!(parse_topic(topic).unwrap(), B256::with_last_byte(last));
    }

    #[test]
    fn test_full_and_oversized_topics() {
        let full = "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef";
        assert_eq!(parse_topic(full).unwrap(), full.parse::<B256>().unwrap());

        let oversized = format!("0xffff{}01", "00".repeat(31));
        assert_eq!(parse_topic(&oversized).unwrap(), B256::with_last_byte(1));
    }
}
