use serde_json::Value;

/// decode one inbound text frame into its JSON array form
pub fn decode(text: &str) -> anyhow::Result<Vec<Value>> {
    Ok(serde_json::from_str::<Vec<Value>>(text)?)
}

/// first element of a frame as the opcode integer
pub fn opcode(frame: &[Value]) -> Option<i64> {
    frame.first().and_then(Value::as_i64)
}

/// positional payload element as an integer
pub fn integer(frame: &[Value], at: usize) -> Option<i64> {
    frame.get(at).and_then(Value::as_i64)
}

/// positional payload element as a string
pub fn text(frame: &[Value], at: usize) -> Option<&str> {
    frame.get(at).and_then(Value::as_str)
}

/// positional payload element as a list of card ids, rejecting anything
/// outside the deck
pub fn cards(frame: &[Value], at: usize) -> Option<Vec<crate::cards::CardId>> {
    frame
        .get(at)
        .and_then(Value::as_array)?
        .iter()
        .map(|v| v.as_u64().filter(|&id| id < crate::DECK_SIZE as u64))
        .map(|id| id.map(|id| id as crate::cards::CardId))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_opcode_first_arrays() {
        let frame = decode(r#"[33, 3]"#).unwrap();
        assert_eq!(opcode(&frame), Some(33));
        assert_eq!(integer(&frame, 1), Some(3));
    }

    #[test]
    fn rejects_non_arrays() {
        assert!(decode(r#"{"op": 33}"#).is_err());
        assert!(decode("not json").is_err());
    }

    #[test]
    fn card_lists_are_bounded() {
        let frame = decode(r#"[37, [0, 17, 53]]"#).unwrap();
        assert_eq!(cards(&frame, 1), Some(vec![0, 17, 53]));
        let frame = decode(r#"[37, [0, 54]]"#).unwrap();
        assert_eq!(cards(&frame, 1), None);
        let frame = decode(r#"[37, [0, -1]]"#).unwrap();
        assert_eq!(cards(&frame, 1), None);
        let frame = decode(r#"[37]"#).unwrap();
        assert_eq!(cards(&frame, 1), None);
    }

    #[test]
    fn missing_payload_is_none() {
        let frame = decode(r#"[43]"#).unwrap();
        assert_eq!(text(&frame, 1), None);
        assert_eq!(integer(&frame, 1), None);
    }
}
