//! Tests for the text presentation layer: parsing, sessions and eval

use std::io::Cursor;

use rstest::rstest;

use xpcalc::application::services::CalculatorService;
use xpcalc::cli::commands::{eval_intents, run_session};
use xpcalc::cli::parse::{parse_line, resolve, Command};
use xpcalc::cli::CliError;
use xpcalc::config::Settings;
use xpcalc::domain::{EntryId, PerkType};
use xpcalc::util::testing;
use xpcalc::Intent;

fn session() -> CalculatorService {
    testing::init_test_setup();
    colored::control::set_override(false);
    CalculatorService::default().with_initial_perks(2)
}

fn run(service: &mut CalculatorService, script: &str) -> String {
    let mut out = Vec::new();
    run_session(service, Cursor::new(script), &mut out, false).expect("session runs");
    String::from_utf8(out).expect("utf8 output")
}

#[rstest]
#[case("s1", EntryId::Stat(0))]
#[case("S7", EntryId::Stat(6))]
#[case("luck", EntryId::Stat(6))]
#[case("Perception", EntryId::Stat(1))]
fn given_stat_reference_when_resolving_then_finds_stat(
    #[case] reference: &str,
    #[case] expected: EntryId,
) {
    assert_eq!(resolve(reference, &session()).unwrap(), expected);
}

#[rstest]
#[case("s0")]
#[case("s8")]
#[case("p3")]
#[case("Charm")]
#[case("")]
fn given_unknown_reference_when_resolving_then_invalid_args(#[case] reference: &str) {
    assert!(matches!(
        resolve(reference, &session()),
        Err(CliError::InvalidArgs(_))
    ));
}

#[test]
fn given_perk_position_when_resolving_then_follows_removals() {
    let mut service = session();
    let second = service.store().perk_at(1).unwrap();
    let first = service.store().perk_at(0).unwrap();
    service.remove_perk(first);

    assert_eq!(resolve("p1", &service).unwrap(), second);
}

#[rstest]
#[case("inc s1", Intent::Increment(EntryId::Stat(0)))]
#[case("+ strength", Intent::Increment(EntryId::Stat(0)))]
#[case("- s2", Intent::Decrement(EntryId::Stat(1)))]
#[case("base s3 4", Intent::SetBase(EntryId::Stat(2), "4".into()))]
#[case("level 5", Intent::SetLevel("5".into()))]
#[case("xp  120 ", Intent::SetXp("120".into()))]
#[case("sync off", Intent::ToggleSync(false))]
#[case("reset", Intent::ResetAll)]
#[case("reset-alloc", Intent::ResetAllocated)]
#[case("add Iron Fist", Intent::AddPerk { name: "Iron Fist".into() })]
#[case("add", Intent::AddPerk { name: String::new() })]
fn given_intent_line_when_parsing_then_yields_intent(#[case] line: &str, #[case] expected: Intent) {
    let parsed = parse_line(line, &session()).unwrap();
    assert_eq!(parsed, Some(Command::Intent(expected)));
}

#[test]
fn given_perk_lines_when_parsing_then_resolve_perk_handles() {
    let service = session();
    let p2 = service.store().perk_at(1).unwrap();

    assert_eq!(
        parse_line("type p2 ability", &service).unwrap(),
        Some(Command::Intent(Intent::SetPerkType(p2, PerkType::Ability)))
    );
    assert_eq!(
        parse_line("name p2 Quick Hands", &service).unwrap(),
        Some(Command::Intent(Intent::RenamePerk(p2, "Quick Hands".into())))
    );
    assert_eq!(
        parse_line("rm p2", &service).unwrap(),
        Some(Command::Intent(Intent::RemovePerk(p2)))
    );
}

#[rstest]
#[case("")]
#[case("   ")]
#[case("# comment")]
fn given_blank_or_comment_when_parsing_then_none(#[case] line: &str) {
    assert_eq!(parse_line(line, &session()).unwrap(), None);
}

#[rstest]
#[case("jump s1")]
#[case("inc")]
#[case("inc s1 s2")]
#[case("base s1")]
#[case("level")]
#[case("sync maybe")]
#[case("type p1 feat")]
fn given_malformed_line_when_parsing_then_errors(#[case] line: &str) {
    assert!(parse_line(line, &session()).is_err());
}

#[test]
fn given_script_when_running_session_then_renders_after_each_intent() {
    let mut service = session();

    let output = run(&mut service, "level 5\ninc s1\ninc s1\ninc s1\nshow\nquit\ninc s1\n");

    assert_eq!(service.store().get(EntryId::Stat(0)).unwrap().current(), 4);
    assert!(output.contains("remaining 42"), "{output}");
    // initial render + 4 intents + show
    assert_eq!(output.matches("available").count(), 6, "{output}");
}

#[test]
fn given_bad_line_when_running_session_then_warns_and_continues() {
    let mut service = session();

    let output = run(&mut service, "fly s1\ninc s9\nlevel 2\n");

    assert_eq!(output.matches("Warning").count(), 2, "{output}");
    assert_eq!(service.available(), 42);
}

#[test]
fn given_refused_intent_when_running_session_then_reports_no_change() {
    let mut service = session();

    let output = run(&mut service, "dec s1\n");

    assert!(output.contains("(no change)"), "{output}");
}

#[test]
fn given_non_ascii_stat_name_when_resolving_then_ignores_case() {
    let settings = Settings {
        stats: vec!["Luck".into(), "Ärger".into()],
        ..Settings::default()
    };
    let intents = vec!["level 10".to_string(), "inc ärger".to_string(), "+ ÄRGER".to_string()];

    let service = eval_intents(&settings, &intents).expect("eval");

    assert_eq!(service.store().get(EntryId::Stat(1)).unwrap().current(), 3);
    assert_eq!(service.store().get(EntryId::Stat(0)).unwrap().current(), 1);
}

#[test]
fn given_reference_shaped_stat_name_when_evaluating_then_config_error() {
    let settings = Settings {
        stats: vec!["Luck".into(), "S1".into()],
        ..Settings::default()
    };

    let result = eval_intents(&settings, &["inc S1".to_string()]);

    match result {
        Err(e) => assert_eq!(e.exit_code(), xpcalc::exitcode::CONFIG),
        Ok(_) => panic!("reference-shaped stat name accepted"),
    }
}

#[test]
fn given_intents_when_evaluating_then_applies_in_order() {
    testing::init_test_setup();
    let intents: Vec<String> = ["sync off", "xp 5", "inc p1", "inc p1", "inc p1"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    let service = eval_intents(&Settings::default(), &intents).expect("eval");

    let view = service.view();
    assert_eq!(view.ledger.available, 5);
    assert_eq!(view.ledger.spent_perks, 3);
    assert_eq!(view.ledger.remaining, 2);
}

#[test]
fn given_bad_intent_when_evaluating_then_invalid_args() {
    let intents = vec!["inc s1".to_string(), "inc nobody".to_string()];

    let result = eval_intents(&Settings::default(), &intents);

    match result {
        Err(e @ CliError::InvalidArgs(_)) => {
            assert!(e.to_string().contains("intent 2"), "{e}");
            assert_eq!(e.exit_code(), xpcalc::exitcode::USAGE);
        }
        other => panic!("expected invalid args, got {other:?}"),
    }
}

#[test]
fn given_session_command_when_evaluating_then_usage_error() {
    let intents = vec!["show".to_string()];
    assert!(matches!(
        eval_intents(&Settings::default(), &intents),
        Err(CliError::Usage(_))
    ));
}

#[test]
fn given_view_when_serializing_to_toml_then_contains_ledger_and_entries() {
    let mut service = session();
    service.set_level("5");
    service.increment(EntryId::Stat(0));

    let text = toml::to_string_pretty(&service.view()).expect("serialize view");

    assert!(text.contains("remaining = 57"), "{text}");
    assert!(text.contains("remaining_is_negative = false"), "{text}");
    assert!(text.contains("label = \"p2\""), "{text}");
    assert!(text.contains("perk_type = \"trait\""), "{text}");
    assert!(text.contains("sync_enabled = true"), "{text}");
}
