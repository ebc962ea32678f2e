//! Protocol layer tests — message serialization, kinds, routing, decode errors.

#[cfg(test)]
mod tests {
    use castbot_protocol::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    // ─────────────────────────────────────────────────────────────────────
    // Message
    // ─────────────────────────────────────────────────────────────────────

    #[test]
    fn message_roundtrip_all_fields() {
        let msg = Message {
            author: Some("alice".into()),
            body: Some("<p>!uptime</p>".into()),
            id: Some("msg-1".into()),
            kind: MessageType::Chat,
            visible: Some(true),
            timestamp: Some(Utc.with_ymd_and_hms(2024, 3, 9, 18, 30, 5).unwrap()),
        };

        let wire = msg.encode().unwrap();
        let parsed = Message::decode(wire.as_bytes()).unwrap();
        assert_eq!(parsed, msg);
    }

    #[test]
    fn message_roundtrip_subsecond_timestamp() {
        let ts = Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap();
        let msg = Message {
            timestamp: Some(ts),
            ..Message::chat("bob", "hi")
        };
        let parsed = Message::decode(msg.encode().unwrap().as_bytes()).unwrap();
        assert_eq!(parsed.timestamp, Some(ts));
    }

    #[test]
    fn absent_fields_are_omitted() {
        let wire = Message::pong().encode().unwrap();
        assert_eq!(wire, r#"{"type":"PONG"}"#);
    }

    #[test]
    fn message_deserialized_from_wire_format() {
        // This is what an Owncast server sends for a chat line
        let wire = r#"{"author":"viewer","body":"<p>hello</p>","id":"x1","type":"CHAT","visible":true,"timestamp":"2021-01-02T03:04:05.000Z"}"#;
        let msg = Message::decode(wire.as_bytes()).unwrap();
        assert_eq!(msg.kind, MessageType::Chat);
        assert_eq!(msg.author_str(), "viewer");
        assert_eq!(msg.body_str(), "<p>hello</p>");
        assert_eq!(msg.visible, Some(true));
        assert!(msg.timestamp.is_some());
    }

    #[test]
    fn chat_constructor_sets_kind() {
        let msg = Message::chat("Bot", "@alice 1h2m3s").with_id("r1");
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value, json!({"author": "Bot", "body": "@alice 1h2m3s", "id": "r1", "type": "CHAT"}));
    }

    #[test]
    fn display_is_json() {
        let msg = Message::new(MessageType::System);
        assert_eq!(msg.to_string(), r#"{"type":"SYSTEM"}"#);
    }

    // ─────────────────────────────────────────────────────────────────────
    // MessageType
    // ─────────────────────────────────────────────────────────────────────

    #[test]
    fn known_kinds_map_to_wire_names() {
        let cases = [
            (MessageType::Chat, "CHAT"),
            (MessageType::Ping, "PING"),
            (MessageType::Pong, "PONG"),
            (MessageType::System, "SYSTEM"),
            (MessageType::NameChange, "NAME_CHANGE"),
        ];
        for (kind, name) in cases {
            assert_eq!(serde_json::to_value(&kind).unwrap(), json!(name));
            assert_eq!(MessageType::from(name), kind);
            assert!(kind.is_known());
        }
    }

    #[test]
    fn unknown_kind_is_preserved() {
        let msg = Message::decode(br#"{"type":"USER_JOINED","body":"x"}"#).unwrap();
        assert_eq!(msg.kind, MessageType::Unknown("USER_JOINED".into()));
        assert!(!msg.kind.is_known());
        assert_eq!(msg.encode().unwrap(), r#"{"body":"x","type":"USER_JOINED"}"#);
    }

    #[test]
    fn kind_names_are_case_sensitive() {
        assert_eq!(MessageType::from("chat"), MessageType::Unknown("chat".into()));
    }

    // ─────────────────────────────────────────────────────────────────────
    // Routing
    // ─────────────────────────────────────────────────────────────────────

    #[test]
    fn routing_table() {
        assert_eq!(MessageType::Ping.route(), Route::Keepalive);
        assert_eq!(MessageType::Chat.route(), Route::Content);
        assert_eq!(MessageType::System.route(), Route::Discard);
        assert_eq!(MessageType::NameChange.route(), Route::Discard);
        assert_eq!(MessageType::Pong.route(), Route::Unrecognized);
        assert_eq!(MessageType::Unknown("FOO".into()).route(), Route::Unrecognized);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Decode errors
    // ─────────────────────────────────────────────────────────────────────

    #[test]
    fn missing_type_decodes_as_unrecognized() {
        let msg = Message::decode(br#"{"body":"orphan"}"#).unwrap();
        assert_eq!(msg.body_str(), "orphan");
        assert_eq!(msg.kind, MessageType::Unknown(String::new()));
        assert_eq!(msg.kind.route(), Route::Unrecognized);
    }

    #[test]
    fn decode_error_keeps_best_known_context() {
        // visible has the wrong type, but body and type are still readable
        let err = Message::decode(br#"{"body":"hey","type":"CHAT","visible":"yes"}"#).unwrap_err();
        assert_eq!(err.body, "hey");
        assert_eq!(err.kind, "CHAT");
        assert!(err.to_string().contains("failed to decode chat message"));
    }

    #[test]
    fn garbage_payload_has_empty_context() {
        let err = Message::decode(b"not json").unwrap_err();
        assert!(err.body.is_empty());
        assert!(err.kind.is_empty());
    }
}
