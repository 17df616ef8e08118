//! Plain-text message encoding.
//!
//! A transfer message is a one-byte type tag followed by the text, padded
//! with zeros so the text part is a multiple of 8 bytes. Padding is always
//! between 1 and 8 bytes: a text whose length is already a multiple of 8
//! still gets a full 8 bytes of zeros.

/// Tag byte for an unencrypted text message.
pub const MESSAGE_TYPE_PLAIN: u8 = 0x00;

/// Alignment of the text part of a message.
const MESSAGE_ALIGNMENT: usize = 8;

/// Encodes `text` as a tagged, zero-padded plain message.
///
/// Output length is `1 + len + (8 - len % 8)`, so it is always `≡ 1 (mod 8)`
/// and at least 9 bytes. Total over all inputs.
///
/// ```
/// use memo_protocol::transaction::message::encode_plain_message;
///
/// let encoded = encode_plain_message("Hello Symbol!");
/// assert_eq!(encoded.len(), 17);
/// assert_eq!(encoded[0], 0x00);
/// assert_eq!(&encoded[1..14], b"Hello Symbol!");
/// ```
pub fn encode_plain_message(text: &str) -> Vec<u8> {
    let raw = text.as_bytes();
    let padding = MESSAGE_ALIGNMENT - (raw.len() % MESSAGE_ALIGNMENT);

    let mut out = vec![0u8; 1 + raw.len() + padding];
    out[0] = MESSAGE_TYPE_PLAIN;
    out[1..=raw.len()].copy_from_slice(raw);
    out
}

/// Reverses [`encode_plain_message`]: drops the tag and trailing zeros.
///
/// Returns `None` for a non-plain tag or text that is not UTF-8. Trailing NUL
/// characters that were part of the original text cannot be told apart from
/// padding and are dropped too.
pub fn decode_plain_message(bytes: &[u8]) -> Option<String> {
    let (&tag, body) = bytes.split_first()?;
    if tag != MESSAGE_TYPE_PLAIN {
        return None;
    }
    let end = body.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    String::from_utf8(body[..end].to_vec()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_is_tag_plus_eight_zeros() {
        let encoded = encode_plain_message("");
        assert_eq!(encoded, vec![0u8; 9]);
    }

    #[test]
    fn exact_multiple_of_eight_gets_full_padding() {
        let encoded = encode_plain_message("AAAAAAAA");
        assert_eq!(encoded.len(), 17);
        assert_eq!(&encoded[1..9], b"AAAAAAAA");
        assert!(encoded[9..].iter().all(|&b| b == 0));
    }

    #[test]
    fn length_invariants_hold_for_many_lengths() {
        for len in 0..64 {
            let text = "x".repeat(len);
            let encoded = encode_plain_message(&text);
            assert_eq!(encoded.len() % 8, 1, "len {len}");
            assert!(encoded.len() >= len + 2, "len {len}");
            assert_eq!(encoded[0], MESSAGE_TYPE_PLAIN);
            assert!(encoded[1 + len..].iter().all(|&b| b == 0));
        }
    }

    #[test]
    fn multibyte_text_is_padded_by_byte_length() {
        // 7 characters, 21 bytes of UTF-8.
        let text = "こんにちは世界";
        assert_eq!(text.len(), 21);
        let encoded = encode_plain_message(text);
        assert_eq!(encoded.len(), 1 + 21 + 3);
        assert_eq!(&encoded[1..22], text.as_bytes());
    }

    #[test]
    fn hello_symbol_layout() {
        let encoded = encode_plain_message("Hello Symbol!");
        assert_eq!(
            hex::encode_upper(&encoded),
            "0048656C6C6F2053796D626F6C21000000"
        );
    }

    #[test]
    fn decode_recovers_text() {
        let encoded = encode_plain_message("Hello Symbol!");
        assert_eq!(decode_plain_message(&encoded).as_deref(), Some("Hello Symbol!"));
        assert_eq!(decode_plain_message(&encode_plain_message("")).as_deref(), Some(""));
    }

    #[test]
    fn decode_rejects_other_tags_and_empty_input() {
        assert_eq!(decode_plain_message(&[]), None);
        assert_eq!(decode_plain_message(&[0x01, b'h', b'i']), None);
        assert_eq!(decode_plain_message(&[0x00, 0xFF, 0xFE]), None);
    }
}
