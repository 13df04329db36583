//! Tests for CalculatorService: allocation, affordability, sync and resets

use rstest::{fixture, rstest};

use xpcalc::application::services::CalculatorService;
use xpcalc::domain::{EntryId, Kind, PerkType};
use xpcalc::util::testing;
use xpcalc::{Intent, Rules};

#[fixture]
fn service() -> CalculatorService {
    testing::init_test_setup();
    CalculatorService::new(Rules::default())
}

fn current(service: &CalculatorService, id: EntryId) -> u32 {
    service.store().get(id).expect("entry exists").current()
}

/// Session with sync off and a manual XP pool.
fn with_xp(mut service: CalculatorService, xp: u32) -> CalculatorService {
    service.toggle_sync(false);
    service.set_xp(&xp.to_string());
    assert_eq!(service.available(), xp);
    service
}

#[rstest]
fn given_level_five_with_sync_when_viewing_then_sixty_points_remain(
    mut service: CalculatorService,
) {
    // Arrange
    service.set_level("5");

    // Act
    let view = service.view();

    // Assert
    assert_eq!(view.ledger.available, 60);
    assert_eq!(view.entries.iter().filter(|e| e.kind == Kind::Stat).count(), 7);
    assert!(view.entries.iter().all(|e| e.base == 1 && e.current == 1 && e.cost == 0));
    assert_eq!(view.ledger.remaining, 60);
}

#[rstest]
fn given_stat_incremented_three_times_when_incrementing_again_then_fourth_step_is_bought(
    mut service: CalculatorService,
) {
    // Arrange
    service.set_level("5");
    let id = EntryId::Stat(0);

    // Act
    for _ in 0..3 {
        assert!(service.increment(id));
    }

    // Assert
    let view = service.view();
    let entry = view.entry(id).unwrap();
    assert_eq!((entry.current, entry.cost), (4, 18));
    assert_eq!(view.ledger.remaining, 42);
    assert!(entry.can_increment);

    assert!(service.increment(id));
    assert_eq!(current(&service, id), 5);
    assert_eq!(service.ledger().remaining, 30);
}

#[rstest]
fn given_five_points_when_buying_perk_levels_then_third_level_is_refused(
    service: CalculatorService,
) {
    // Arrange
    let mut service = with_xp(service, 5);
    let perk = service.add_perk("Sneak");

    // Act + Assert
    assert!(service.increment(perk));
    assert_eq!(service.ledger().remaining, 4);
    assert!(service.increment(perk));
    assert_eq!(service.ledger().remaining, 2);

    assert!(!service.can_increment(perk));
    assert!(!service.increment(perk));
    assert_eq!(current(&service, perk), 2);
    assert_eq!(service.ledger().remaining, 2);
}

#[rstest]
fn given_increment_not_allowed_when_incrementing_then_state_is_unchanged(
    service: CalculatorService,
) {
    let mut service = with_xp(service, 3);
    let id = EntryId::Stat(3);
    assert!(service.increment(id));
    let before = service.view();

    assert!(!service.view().entry(id).unwrap().can_increment);
    assert!(!service.apply(&Intent::Increment(id)));

    assert_eq!(service.view(), before);
}

#[rstest]
fn given_entry_when_decrementing_then_incrementing_then_round_trips(
    mut service: CalculatorService,
) {
    service.set_level("20");
    let id = EntryId::Stat(1);
    service.increment(id);
    service.increment(id);
    let before = service.view();

    assert!(service.decrement(id));
    assert!(service.increment(id));

    assert_eq!(service.view(), before);
}

#[rstest]
fn given_entry_at_base_when_decrementing_then_noop(mut service: CalculatorService) {
    let id = EntryId::Stat(2);
    assert!(!service.can_decrement(id));
    assert!(!service.decrement(id));
    assert_eq!(current(&service, id), 1);
}

#[rstest]
fn given_any_session_when_viewing_then_affordance_matches_increment_outcome(
    service: CalculatorService,
) {
    let mut service = with_xp(service, 17);
    let perk = service.add_perk("");
    service.set_base(EntryId::Stat(0), "5");

    for _ in 0..12 {
        let view = service.view();
        for entry in &view.entries {
            let mut probe = service.clone();
            assert_eq!(
                probe.increment(entry.id),
                entry.can_increment,
                "{} at {}",
                entry.label,
                entry.current
            );
            assert!(probe.ledger().remaining >= 0);
        }
        service.increment(perk);
        service.increment(EntryId::Stat(4));
    }
}

#[rstest]
fn given_spent_points_when_resetting_allocated_then_refunds_and_is_idempotent(
    mut service: CalculatorService,
) {
    service.set_level("30");
    service.set_base(EntryId::Stat(0), "3");
    service.increment(EntryId::Stat(0));
    let perk = service.add_perk("Sneak");
    service.increment(perk);
    service.increment(perk);

    assert!(service.reset_allocated());
    let once = service.view();
    assert!(!service.reset_allocated());
    let twice = service.view();

    assert_eq!(once, twice);
    assert_eq!(once.ledger.spent_stats + once.ledger.spent_perks, 0);
    let stat = once.entry(EntryId::Stat(0)).unwrap();
    assert_eq!((stat.base, stat.current), (3, 3));
    assert_eq!(once.entry(perk).unwrap().current, 0);
}

#[rstest]
fn given_modified_session_when_resetting_all_then_values_reset_but_perks_stay(
    service: CalculatorService,
) {
    let mut service = with_xp(service, 500);
    service.set_level("12");
    service.set_base(EntryId::Stat(6), "4");
    let perk = service.add_perk("Gunslinger");
    service.set_perk_type(perk, PerkType::Ability);
    service.set_base(perk, "2");
    service.increment(perk);

    service.reset_all();

    let view = service.view();
    assert_eq!(view.sync.level, 1);
    assert!(view.sync.sync_enabled);
    assert_eq!(view.ledger.available, 36);
    assert!(view
        .entries
        .iter()
        .filter(|e| e.kind == Kind::Stat)
        .all(|e| e.base == 1 && e.current == 1));
    let perk_view = view.entry(perk).expect("perk kept");
    assert_eq!((perk_view.base, perk_view.current), (0, 0));
    assert_eq!(perk_view.name, "Gunslinger");
}

#[rstest]
fn given_removed_perk_when_viewing_then_its_cost_is_gone(mut service: CalculatorService) {
    service.set_level("10");
    let keep = service.add_perk("keep");
    let dropped = service.add_perk("drop");
    service.increment(keep);
    service.increment(dropped);
    service.increment(dropped);
    assert_eq!(service.ledger().spent_perks, 1 + 3);

    assert!(service.remove_perk(dropped));

    let view = service.view();
    assert_eq!(view.ledger.spent_perks, 1);
    assert!(view.entry(dropped).is_none());
    let perks: Vec<_> = view.entries.iter().filter(|e| e.kind == Kind::Perk).collect();
    assert_eq!(perks.len(), 1);
    assert_eq!(perks[0].id, keep);
    assert_eq!(perks[0].label, "p1");
}

#[rstest]
fn given_stat_cannot_be_removed_when_removing_then_noop(mut service: CalculatorService) {
    assert!(!service.remove_perk(EntryId::Stat(0)));
    assert_eq!(service.store().stats().len(), 7);
}

#[rstest]
fn given_lowered_base_when_viewing_then_current_kept_and_alert_raised(
    mut service: CalculatorService,
) {
    // Arrange: base 5 costs nothing
    let id = EntryId::Stat(0);
    service.set_base(id, "5");
    assert_eq!(service.ledger().remaining, 36);

    // Act: lowering base keeps current, so levels 2..=5 are now paid for
    service.set_base(id, "1");

    // Assert
    let view = service.view();
    let entry = view.entry(id).unwrap();
    assert_eq!((entry.base, entry.current, entry.cost), (1, 5, 30));
    assert_eq!(view.ledger.remaining, 6);
    assert!(!view.ledger.remaining_is_negative);

    service.set_base(EntryId::Stat(1), "6");
    service.set_base(EntryId::Stat(1), "1");
    let view = service.view();
    assert_eq!(view.ledger.remaining, 6 - 45);
    assert!(view.ledger.remaining_is_negative);
    assert!(view.entries.iter().all(|e| !e.can_increment));
}

#[rstest]
fn given_sync_on_when_setting_xp_then_ignored_until_sync_off(mut service: CalculatorService) {
    service.set_level("3");
    assert!(!service.apply(&Intent::SetXp("400".into())));
    assert_eq!(service.available(), 48);

    assert!(service.apply(&Intent::ToggleSync(false)));
    assert_eq!(service.available(), 48);
    assert!(service.apply(&Intent::SetXp("400".into())));
    assert_eq!(service.available(), 400);

    service.apply(&Intent::SetLevel("7".into()));
    assert_eq!(service.available(), 400);

    service.apply(&Intent::ToggleSync(true));
    assert_eq!(service.available(), 72);
}

#[rstest]
#[case("abc", 0)]
#[case("-10", 0)]
#[case("123456", 9999)]
#[case("250", 250)]
fn given_raw_xp_when_sync_off_then_clamps(
    mut service: CalculatorService,
    #[case] raw: &str,
    #[case] expected: u32,
) {
    service.toggle_sync(false);
    service.set_xp(raw);
    assert_eq!(service.view().ledger.available, expected);
}

#[rstest]
fn given_perk_metadata_intents_when_applied_then_view_reflects_them(
    mut service: CalculatorService,
) {
    service.apply(&Intent::AddPerk { name: "Iron Fist".into() });
    let perk = service.store().perk_at(0).unwrap();
    service.apply(&Intent::SetPerkType(perk, PerkType::Ability));
    service.apply(&Intent::RenamePerk(perk, "Iron Fist II".into()));

    let view = service.view();
    let entry = view.entry(perk).unwrap();
    assert_eq!(entry.name, "Iron Fist II");
    assert_eq!(entry.perk_type, Some(PerkType::Ability));
    assert_eq!(entry.kind, Kind::Perk);
}

#[rstest]
fn given_custom_rules_when_viewing_then_uses_their_tables() {
    let rules = Rules::new(
        vec![0, 0, 10],
        vec![0, 5, 5],
        0,
        10,
        9999,
        10,
        vec!["Might".into(), "Wits".into()],
    )
    .expect("valid rules");
    let mut service = CalculatorService::new(rules);
    service.set_level("2");

    assert!(service.increment(EntryId::Stat(0)));
    assert!(!service.increment(EntryId::Stat(0)));
    let view = service.view();
    assert_eq!(view.entries.len(), 2);
    assert_eq!(view.ledger.remaining, 10);
    assert!(!view.entry(EntryId::Stat(0)).unwrap().can_increment);
}

#[rstest]
#[case("")]
#[case("50")]
#[case("-1")]
fn given_single_level_range_when_setting_level_then_stays_at_one(#[case] raw: &str) {
    let rules = Rules::new(
        vec![0, 0, 3],
        vec![0, 1, 2],
        30,
        6,
        9999,
        1,
        vec!["Might".into()],
    )
    .expect("valid rules");
    assert_eq!(rules.max_character_level(), 1);
    let mut service = CalculatorService::new(rules);

    service.set_level(raw);

    assert_eq!(service.sync_state().level, 1);
    assert_eq!(service.available(), 36);
}
