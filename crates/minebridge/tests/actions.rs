//! Integration tests for the platform action modules, dispatched through a
//! real router with a capturing outbound sink.

mod common;

use std::sync::{Arc, Mutex};

use common::{MockPlatform, moderation_grammar, steve_uuid};
use minebridge::{CommandActions, MessageActions, MessageTable, PlayerActions};
use minebridge_protocol::MessageType;
use minebridge_router::{ActionRouter, DispatchOutcome, Outbound, OutboundError, Responder};

#[derive(Default)]
struct Capture(Mutex<Vec<String>>);

impl Outbound for Capture {
    fn send_frame(&self, frame: String) -> Result<(), OutboundError> {
        self.0.lock().unwrap().push(frame);
        Ok(())
    }
}

struct Fixture {
    platform: Arc<MockPlatform>,
    capture: Arc<Capture>,
    router: ActionRouter,
}

fn fixture() -> Fixture {
    let platform = Arc::new(MockPlatform::network());
    let capture = Arc::new(Capture::default());
    let mut router = ActionRouter::new(Responder::new(capture.clone()));
    router
        .register(MessageActions::new(platform.clone()))
        .unwrap();
    router
        .register(CommandActions::new(platform.clone(), moderation_grammar()))
        .unwrap();
    router
        .register(PlayerActions::new(platform.clone()))
        .unwrap();
    Fixture {
        platform,
        capture,
        router,
    }
}

impl Fixture {
    fn replies(&self) -> Vec<serde_json::Value> {
        self.capture
            .0
            .lock()
            .unwrap()
            .iter()
            .map(|f| serde_json::from_str(f).unwrap())
            .collect()
    }
}

fn pair(name: &str, text: &str) -> (String, String) {
    (name.to_string(), text.to_string())
}

// =========================================================================
// Messages
// =========================================================================

#[test]
fn test_player_message_by_name_and_uuid() {
    let f = fixture();
    assert!(
        f.router
            .dispatch(r#"{"action":"send-player-message","username":"alex","message_type":"SUCCESS","message":"done"}"#)
            .is_handled()
    );
    let by_uuid = format!(
        r#"{{"action":"send-player-message","uuid":"{}","message_type":"no_prefix","message":"psst"}}"#,
        steve_uuid()
    );
    assert!(f.router.dispatch(&by_uuid).is_handled());

    assert_eq!(
        f.platform.delivered(),
        [pair("Alex", "[Success] done"), pair("Steve", "psst")]
    );
}

#[test]
fn test_player_message_edge_cases_deliver_nothing() {
    let f = fixture();
    // Offline player, unknown message type: handled, but silent.
    f.router.dispatch(
        r#"{"action":"send-player-message","username":"Herobrine","message_type":"info","message":"x"}"#,
    );
    f.router.dispatch(
        r#"{"action":"send-player-message","username":"Steve","message_type":"shout","message":"x"}"#,
    );
    assert!(f.platform.delivered().is_empty());

    // A malformed uuid is a handler error.
    let outcome = f.router.dispatch(
        r#"{"action":"send-player-message","uuid":"not-a-uuid","message_type":"info","message":"x"}"#,
    );
    assert!(matches!(outcome, DispatchOutcome::HandlerFailed { .. }));
}

#[test]
fn test_global_message_reaches_everyone() {
    let f = fixture();
    f.router.dispatch(
        r#"{"action":"send-global-message","message_type":"announce","message":"restart"}"#,
    );
    assert_eq!(f.platform.delivered().len(), 3);
    assert!(
        f.platform
            .delivered()
            .iter()
            .all(|(_, text)| text == "[Announcement] restart")
    );
}

#[test]
fn test_server_message_targets() {
    let f = fixture();
    f.router.dispatch(
        r#"{"action":"send-server-message","server":"survival","message_type":"warn","message":"lag"}"#,
    );
    assert_eq!(f.platform.delivered(), [pair("Notch", "[Warn] lag")]);

    f.router.dispatch(
        r#"{"action":"send-server-message","server":"nether","message_type":"warn","message":"lag"}"#,
    );
    assert_eq!(f.platform.delivered().len(), 1);

    f.router.dispatch(
        r#"{"action":"send-server-message","server":"ALL","message_type":"info","message":"hi"}"#,
    );
    assert_eq!(f.platform.delivered().len(), 4);
}

#[test]
fn test_custom_message_table() {
    let platform = Arc::new(MockPlatform::network());
    let mut router = ActionRouter::new(Responder::detached());
    let table = MessageTable::empty().with(MessageType::Info, "» ");
    router
        .register(MessageActions::with_table(platform.clone(), table))
        .unwrap();

    router.dispatch(r#"{"action":"send-global-message","message_type":"info","message":"a"}"#);
    router.dispatch(r#"{"action":"send-global-message","message_type":"error","message":"b"}"#);
    assert_eq!(platform.delivered().len(), 3);
    assert_eq!(platform.delivered()[0].1, "» a");
}

// =========================================================================
// Commands
// =========================================================================

#[test]
fn test_dispatch_command_targets() {
    let f = fixture();
    f.router
        .dispatch(r#"{"action":"dispatch-command","commands":["say hi","","  "]}"#);
    f.router.dispatch(
        r#"{"action":"dispatch-command","server":"lobby","commands":["weather clear"]}"#,
    );
    f.router
        .dispatch(r#"{"action":"dispatch-command","server":"all","commands":["save-all"]}"#);

    assert_eq!(
        f.platform.commands(),
        [
            (None, "say hi".to_string()),
            (Some("lobby".to_string()), "weather clear".to_string()),
            (Some("lobby".to_string()), "save-all".to_string()),
            (Some("survival".to_string()), "save-all".to_string()),
        ]
    );
}

#[test]
fn test_dispatch_to_unknown_server_fails() {
    let f = fixture();
    let outcome = f.router.dispatch(
        r#"{"action":"dispatch-command","server":"nether","commands":["say hi"]}"#,
    );
    assert!(matches!(outcome, DispatchOutcome::HandlerFailed { .. }));
    assert!(f.platform.commands().is_empty());
}

#[test]
fn test_dispatch_without_commands_is_a_payload_mismatch() {
    let f = fixture();
    let outcome = f
        .router
        .dispatch(r#"{"action":"dispatch-command","server":"lobby"}"#);
    assert!(matches!(outcome, DispatchOutcome::PayloadMismatch { .. }));
    assert!(f.platform.commands().is_empty());
}

#[test]
fn test_command_executed_is_compiled_and_run() {
    let f = fixture();
    let outcome = f.router.dispatch(
        r#"{"action":"command-executed","server":"survival","command_type":"kick",
            "executor":"CONSOLE","args":{"target":"Player One","reason":"bad word"}}"#,
    );
    assert!(outcome.is_handled());
    assert_eq!(
        f.platform.commands(),
        [(
            Some("survival".to_string()),
            r#"/kick "Player One" "bad word""#.to_string()
        )]
    );
}

#[test]
fn test_command_executed_missing_required_is_ignored() {
    let f = fixture();
    let outcome = f.router.dispatch(
        r#"{"action":"command-executed","command_type":"tempban","executor":"mod","args":{"target":"Steve"}}"#,
    );
    assert!(outcome.is_handled());
    assert!(f.platform.commands().is_empty());
}

// =========================================================================
// Player queries
// =========================================================================

#[test]
fn test_status_check_replies() {
    let f = fixture();
    f.router
        .dispatch(r#"{"action":"player-status-check","username":"NOTCH"}"#);
    f.router
        .dispatch(r#"{"action":"player-status-check","username":"ghost"}"#);

    let replies = f.replies();
    assert_eq!(replies.len(), 2);
    assert_eq!(replies[0]["username"], "Notch");
    assert_eq!(replies[0]["online"], true);
    assert_eq!(
        replies[1],
        serde_json::json!({
            "action": "player-status-check",
            "username": "ghost",
            "online": false,
        })
    );
}

#[test]
fn test_server_check_replies() {
    let f = fixture();
    let request = format!(
        r#"{{"action":"player-server-check","uuid":"{}"}}"#,
        steve_uuid()
    );
    f.router.dispatch(&request);
    f.router
        .dispatch(r#"{"action":"player-server-check","username":"ghost"}"#);

    let replies = f.replies();
    assert_eq!(replies[0]["server"], "lobby");
    assert_eq!(replies[0]["username"], "Steve");
    assert!(replies[1].get("server").is_none());
}
