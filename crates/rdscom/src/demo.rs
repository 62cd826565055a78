use rdscom_schema::{FieldKind, Prototype};

/// Prototype id used by the `serve` and `ping` commands.
pub const PING_PROTOTYPE_ID: u8 = 1;

/// Layout carried by ping requests and echoed back in pong responses.
pub fn ping_prototype() -> Prototype {
    Prototype::new(PING_PROTOTYPE_ID)
        .with_field("seq", FieldKind::U32)
        .with_field("sent_at_ms", FieldKind::U64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ping_layout_is_stable() {
        let proto = ping_prototype();
        assert_eq!(proto.identifier(), PING_PROTOTYPE_ID);
        assert_eq!(proto.size(), 12);
        assert_eq!(proto.find_field("seq").unwrap().offset, 0);
        assert_eq!(proto.find_field("sent_at_ms").unwrap().offset, 4);
    }
}
