use super::*;
use crate::domain::UserId;
use proptest::prelude::*;
use serde_json::json;

#[test]
fn users_command_writes_null_data_and_omits_user() {
    let body = serde_json::to_value(Command::users()).expect("encode");
    assert_eq!(body, json!({"command": "users", "data": null}));
}

#[test]
fn slots_command_carries_user_scope() {
    let body = serde_json::to_value(Command::slots("2")).expect("encode");
    assert_eq!(body, json!({"command": "slots", "data": null, "user": "2"}));
}

#[test]
fn commands_survive_serialization() {
    let commands = [
        Command::users(),
        Command::slots("all"),
        Command::add(json!({"UID": "alpha", "Comment": "standup"})),
        Command::delete(json!({"UID": "alpha"})),
        Command::add(Value::Null),
        Command::delete(Value::Null),
    ];
    for command in commands {
        let text = serde_json::to_string(&command).expect("encode");
        let parsed: Command = serde_json::from_str(&text).expect("decode");
        assert_eq!(parsed, command);
    }
}

#[test]
fn ok_reply_routes_by_kind_tag() {
    let envelope: ReplyEnvelope = serde_json::from_value(json!({
        "status": "ok",
        "kind": "users",
        "data": [
            {"id": 1, "firstName": "A", "lastName": "B"},
            {"id": "beta", "firstName": "C", "lastName": "D"}
        ]
    }))
    .expect("decode");

    let reply = envelope.into_reply(CommandKind::Slots).expect("typed");
    let Reply::Ok(ReplyPayload::Users(users)) = reply else {
        panic!("expected users payload, got {reply:?}");
    };
    assert_eq!(users.len(), 2);
    assert_eq!(users[0].id, UserId::from(1_i64));
    assert_eq!(users[1].id, UserId::from("beta"));
    assert_eq!(users[1].full_name(), "C D");
}

#[test]
fn ok_reply_without_kind_falls_back_to_answered_command() {
    let envelope: ReplyEnvelope = serde_json::from_value(json!({
        "status": "ok",
        "data": [{
            "UID": "alpha",
            "Comment": "review",
            "Start": "2024-03-01T09:00:00Z",
            "End": "2024-03-01T10:00:00Z"
        }]
    }))
    .expect("decode");

    match envelope.into_reply(CommandKind::Slots).expect("typed") {
        Reply::Ok(ReplyPayload::Slots(slots)) => {
            assert_eq!(slots.len(), 1);
            assert_eq!(slots[0].uid, "alpha");
            assert_eq!(slots[0].comment, "review");
        }
        other => panic!("expected slots payload, got {other:?}"),
    }
}

#[test]
fn null_listing_decodes_as_empty() {
    let envelope: ReplyEnvelope =
        serde_json::from_value(json!({"status": "ok", "kind": "slots", "data": null}))
            .expect("decode");
    assert_eq!(
        envelope.into_reply(CommandKind::Slots).expect("typed"),
        Reply::Ok(ReplyPayload::Slots(Vec::new()))
    );
}

#[test]
fn error_reply_prefers_error_field() {
    let reply = ReplyEnvelope::error("database offline")
        .into_reply(CommandKind::Users)
        .expect("typed");
    assert_eq!(reply, Reply::Error("database offline".to_string()));
}

#[test]
fn error_reply_falls_back_to_string_data() {
    let envelope: ReplyEnvelope = serde_json::from_value(json!({
        "status": "error",
        "data": "XHR decoding failed: unexpected EOF"
    }))
    .expect("decode");
    assert_eq!(
        envelope.into_reply(CommandKind::Users).expect("typed"),
        Reply::Error("XHR decoding failed: unexpected EOF".to_string())
    );
}

#[test]
fn unknown_status_is_rejected() {
    let envelope: ReplyEnvelope =
        serde_json::from_value(json!({"status": "users", "data": []})).expect("decode");
    let err = envelope
        .into_reply(CommandKind::Users)
        .expect_err("must reject");
    assert!(matches!(err, ReplyError::UnknownStatus(status) if status == "users"));
}

#[test]
fn malformed_listing_reports_payload_kind() {
    let err = ReplyEnvelope::ok(CommandKind::Users, json!([{"id": 1}]))
        .into_reply(CommandKind::Users)
        .expect_err("must reject");
    assert!(err.to_string().starts_with("malformed users payload"));
}

#[test]
fn absent_command_data_reads_as_null() {
    let parsed: Command = serde_json::from_value(json!({"command": "users"})).expect("decode");
    assert_eq!(parsed, Command::users());
}

#[test]
fn user_ids_outside_i64_are_kept_as_sent() {
    let users: Vec<User> = serde_json::from_value(json!([
        {"id": 18446744073709551615_u64, "firstName": "A", "lastName": "B"},
        {"id": 1.5, "firstName": "C", "lastName": "D"},
        {"id": -7, "firstName": "E", "lastName": "F"}
    ]))
    .expect("decode");

    assert_eq!(users[0].id, UserId::from(u64::MAX));
    assert_eq!(users[0].id.to_string(), "18446744073709551615");
    assert_eq!(users[1].id.to_string(), "1.5");
    assert_eq!(users[2].id, UserId::from(-7_i64));

    let back = serde_json::to_value(&users[1]).expect("encode");
    assert_eq!(back["id"], json!(1.5));
}

fn arb_kind() -> impl Strategy<Value = CommandKind> {
    prop_oneof![
        Just(CommandKind::Users),
        Just(CommandKind::Slots),
        Just(CommandKind::Add),
        Just(CommandKind::Delete),
    ]
}

fn arb_data() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        "[a-zA-Z0-9 :-]{0,12}".prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[A-Za-z]{1,8}", inner, 0..4)
                .prop_map(|entries| Value::Object(entries.into_iter().collect())),
        ]
    })
}

proptest! {
    #[test]
    fn any_command_round_trips_through_json(
        command in arb_kind(),
        data in arb_data(),
        user in proptest::option::of("[a-z0-9]{1,8}"),
    ) {
        let original = Command { command, data, user };
        let text = serde_json::to_string(&original).expect("encode");
        let parsed: Command = serde_json::from_str(&text).expect("decode");
        prop_assert_eq!(parsed, original);
    }
}
