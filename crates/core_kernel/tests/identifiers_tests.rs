//! Unit tests for the Identifiers module
//!
//! Covers creation, parsing, conversion, serialization and display of the
//! list and member identifiers.

use core_kernel::{ListId, MemberId};
use proptest::prelude::*;
use uuid::Uuid;

mod list_id_tests {
    use super::*;

    #[test]
    fn test_new_generates_unique_ids() {
        let id1 = ListId::new();
        let id2 = ListId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_new_v7_generates_time_ordered_ids() {
        let id1 = ListId::new_v7();
        std::thread::sleep(std::time::Duration::from_millis(1));
        let id2 = ListId::new_v7();
        assert!(id1 < id2);
    }

    #[test]
    fn test_from_uuid() {
        let uuid = Uuid::new_v4();
        let id = ListId::from_uuid(uuid);
        assert_eq!(*id.as_uuid(), uuid);
    }

    #[test]
    fn test_entity_name() {
        assert_eq!(ListId::entity(), "MailChimpList");
    }

    #[test]
    fn test_parse_tolerates_surrounding_whitespace() {
        let id = ListId::new();
        let parsed: ListId = format!("  {}\n", id).parse().unwrap();
        assert_eq!(id, parsed);
    }
}

mod member_id_tests {
    use super::*;

    #[test]
    fn test_entity_name() {
        assert_eq!(MemberId::entity(), "MailChimpListMember");
    }

    #[test]
    fn test_serializes_as_bare_uuid() {
        let uuid = Uuid::new_v4();
        let id = MemberId::from_uuid(uuid);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", uuid));
    }

    #[test]
    fn test_deserializes_from_bare_uuid() {
        let uuid = Uuid::new_v4();
        let id: MemberId = serde_json::from_str(&format!("\"{}\"", uuid)).unwrap();
        assert_eq!(*id.as_uuid(), uuid);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!("member-1".parse::<MemberId>().is_err());
    }
}

proptest! {
    #[test]
    fn test_display_parse_roundtrip(bytes in any::<[u8; 16]>()) {
        let id = MemberId::from_uuid(Uuid::from_bytes(bytes));
        let parsed: MemberId = id.to_string().parse().unwrap();
        prop_assert_eq!(id, parsed);
    }
}
