//! End-to-end tests for the command grammar using the default moderation
//! command set.

use std::collections::HashMap;

use minebridge_command::{CommandGrammar, ValidationError};

fn moderation_grammar() -> CommandGrammar {
    CommandGrammar::from_tables(
        [
            ("kick", vec!["kick", "ekick", "k"]),
            ("ban", vec!["ban", "eban", "permban"]),
            ("tempban", vec!["tempban", "etempban", "tban"]),
            ("unban", vec!["unban", "pardon"]),
            ("timeout", vec!["timeout", "mute"]),
            ("untimeout", vec!["untimeout", "unmute"]),
        ],
        [
            ("kick", "kick <target> [reason]"),
            ("ban", "ban <target> [reason]"),
            ("tempban", "tempban <target> <duration> [reason]"),
            ("unban", "unban <target>"),
            ("timeout", "timeout <target> <duration> [reason]"),
            ("untimeout", "untimeout <target>"),
        ],
    )
    .expect("default grammar is valid")
}

fn named(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_quoted_target_with_reason() {
    let grammar = moderation_grammar();
    let cmd = grammar.parse(r#"kick "Player One" griefing"#).unwrap();
    assert_eq!(cmd.parameters(), ["Player One", "griefing"]);
    assert_eq!(grammar.validate(&cmd), Ok(()));
}

#[test]
fn test_compile_kick_quotes_both_values() {
    let grammar = moderation_grammar();
    let line = grammar
        .compile_named(
            "kick",
            &named(&[("target", "Player One"), ("reason", "bad word")]),
        )
        .unwrap();
    assert_eq!(line, r#"/kick "Player One" "bad word""#);
}

#[test]
fn test_tempban_without_duration_fails_validation() {
    let grammar = moderation_grammar();
    let cmd = grammar.parse("/tban Steve").unwrap();
    assert_eq!(cmd.command_type(), "tempban");

    match grammar.validate(&cmd) {
        Err(ValidationError::MissingParameter { name, usage }) => {
            assert_eq!(name, "duration");
            assert_eq!(usage, "tempban <target> <duration> [reason]");
        }
        other => panic!("expected missing duration, got {other:?}"),
    }
}

#[test]
fn test_ban_reason_combines_trailing_words() {
    let grammar = moderation_grammar();
    let cmd = grammar.parse("/ban PlayerX griefing the server").unwrap();
    assert_eq!(cmd.named("target"), Some("PlayerX"));
    assert_eq!(
        cmd.combined_named("reason").as_deref(),
        Some("griefing the server")
    );
}

#[test]
fn test_unknown_alias_is_no_match() {
    let grammar = moderation_grammar();
    assert!(grammar.parse("/fly on").is_none());
    assert!(grammar.parse("   ").is_none());
}

#[test]
fn test_compiled_lines_parse_back_to_the_same_values() {
    let grammar = moderation_grammar();
    let cases: &[(&str, &[(&str, &str)])] = &[
        ("kick", &[("target", "Steve")]),
        ("kick", &[("target", "Player One"), ("reason", "bad word")]),
        ("ban", &[("target", "Alex"), ("reason", r#"said "hello""#)]),
        ("ban", &[("target", r"back\slash"), ("reason", "x")]),
        (
            "tempban",
            &[("target", "Steve"), ("duration", "1d"), ("reason", "x-ray")],
        ),
        ("unban", &[("target", "Steve")]),
    ];

    for (command_type, pairs) in cases {
        let line = grammar
            .compile_named(command_type, &named(pairs))
            .unwrap_or_else(|| panic!("compile failed for {command_type}"));
        let cmd = grammar
            .parse(&line)
            .unwrap_or_else(|| panic!("parse failed for {line}"));

        assert_eq!(cmd.command_type(), *command_type, "line: {line}");
        for (name, value) in *pairs {
            assert_eq!(cmd.named(name), Some(*value), "line: {line}");
        }
        assert_eq!(grammar.validate(&cmd), Ok(()));
    }
}

#[test]
fn test_compile_ordered_uses_primary_alias() {
    let grammar = moderation_grammar();
    let line = grammar
        .compile_ordered("timeout", &["Steve", "10m", "spam"])
        .unwrap();
    assert_eq!(line, "/timeout Steve 10m spam");

    let cmd = grammar.parse("/mute Steve 10m spam").unwrap();
    assert_eq!(cmd.command_type(), "timeout");
}

#[test]
fn test_every_command_type_has_usage() {
    let grammar = moderation_grammar();
    let mut types: Vec<_> = grammar.command_types().collect();
    types.sort_unstable();
    assert_eq!(
        types,
        ["ban", "kick", "tempban", "timeout", "unban", "untimeout"]
    );
    for t in types {
        assert!(grammar.usage(t).is_some());
    }
}
