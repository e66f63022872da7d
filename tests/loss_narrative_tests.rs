//! Fleet-loss narration from raw loss records.

use battle_report::data::parse_fleet_losses_json;
use battle_report::report::{narrate_losses, SideLosses, SideOutcome};
use battle_report::data::Front;

#[test]
fn defender_without_records_never_cites_mp() {
    let records = parse_fleet_losses_json(
        r#"[{"front":"att","fight":{"at":100,"de":100,"cn":1},"frest":{"at":100,"de":100,"cn":1},"survived":true}]"#,
    )
    .expect("parse");
    let narrative = narrate_losses(&records);
    assert_eq!(narrative.defender, SideOutcome::DidNotEngage);
    let [attacker, defender] = narrative.render();
    assert_eq!(attacker, "Attacker lost nothing :confetti_ball:.");
    assert!(defender.contains("didn't engage"));
    assert!(!defender.contains("mp"));
}

#[test]
fn attacker_wipe_cites_full_fighting_mp() {
    let records = parse_fleet_losses_json(
        r#"[
            {"front":"att","fight":{"at":1000,"de":500,"cn":3},"frest":"","survived":false},
            {"front":"att","fight":{"at":300,"de":200,"cn":1},"frest":"","survived":false},
            {"front":"def","fight":{"at":10,"de":10,"cn":1},"frest":{"at":10,"de":10,"cn":1},"survived":true}
        ]"#,
    )
    .expect("parse");
    let narrative = narrate_losses(&records);
    assert_eq!(narrative.attacker, SideOutcome::TotalLoss { fighting_mp: 10.0 });
    assert_eq!(narrative.defender, SideOutcome::Unscathed { surviving_mp: 0.1 });
    let [attacker, defender] = narrative.render();
    assert_eq!(attacker, "Attacker lost all units (10.0mp) :sob:.");
    assert!(defender.starts_with("Defender with their force of 0.1mp"));
}

#[test]
fn partial_losses_report_survivor_share() {
    let records = parse_fleet_losses_json(
        r#"[
            {"front":"att","fight":{"at":600,"de":100,"cn":7},"frest":{"at":400,"de":0,"cn":4},"survived":true},
            {"front":"def","fight":{"at":200,"de":200,"cn":2},"frest":"","survived":false},
            {"front":"def","fight":{"at":100,"de":100,"cn":1},"frest":{"at":100,"de":100,"cn":1},"survived":true}
        ]"#,
    )
    .expect("parse");

    let attacker = SideLosses::tally(&records, Front::Attacker);
    assert_eq!(attacker.fighting_mp(), 3.5);
    assert_eq!(attacker.surviving_mp(), 2.0);
    assert_eq!(attacker.survived_percent(), Some(57.1));

    let [attacker_line, defender_line] = narrate_losses(&records).render();
    assert_eq!(
        attacker_line,
        "Attacker lost some units but 2.0mp (57.1%) survived :piñata:."
    );
    assert_eq!(
        defender_line,
        "Defender lost some units but 1.0mp (33.3%) survived :face_holding_back_tears:."
    );
}

#[test]
fn defender_lost_everything() {
    let records = parse_fleet_losses_json(
        r#"[
            {"front":"att","fight":{"at":100,"de":100},"frest":{"at":100,"de":100},"survived":true},
            {"front":"def","fight":{"at":700,"de":300,"cn":5},"frest":null,"survived":false}
        ]"#,
    )
    .expect("parse");
    let [_, defender] = narrate_losses(&records).render();
    assert_eq!(defender, "Defender lost all units (5.0mp) :sob:.");
}

#[test]
fn narration_ignores_record_order() {
    let json = r#"[
        {"front":"def","fight":{"at":50,"de":50},"frest":{"at":10,"de":10},"survived":true},
        {"front":"att","fight":{"at":80,"de":20},"frest":"","survived":false},
        {"front":"def","fight":{"at":25,"de":75},"frest":"","survived":false},
        {"front":"att","fight":{"at":60,"de":40},"frest":{"at":30,"de":20},"survived":true}
    ]"#;
    let records = parse_fleet_losses_json(json).expect("parse");
    let mut reversed = records.clone();
    reversed.reverse();
    assert_eq!(narrate_losses(&records), narrate_losses(&reversed));
}

#[test]
fn attacker_survivors_without_fighting_value_lost_nothing() {
    let records = parse_fleet_losses_json(
        r#"[
            {"front":"att","fight":{"at":0,"de":0,"cn":4},"frest":{},"survived":true},
            {"front":"def","fight":{"at":100,"de":100,"cn":1},"frest":"","survived":false}
        ]"#,
    )
    .expect("parse");
    let attacker = SideLosses::tally(&records, Front::Attacker);
    assert_eq!(attacker.fighting_mp(), 0.0);
    assert_eq!(attacker.survived_percent(), None);

    let narrative = narrate_losses(&records);
    assert_eq!(narrative.attacker, SideOutcome::LostNothing);
    let [attacker_line, _] = narrative.render();
    assert_eq!(attacker_line, "Attacker lost nothing :confetti_ball:.");
}

#[test]
fn half_step_mp_renders_from_stored_value() {
    let records = parse_fleet_losses_json(
        r#"[
            {"front":"att","fight":{"at":20,"de":10,"cn":1},"frest":"","survived":false},
            {"front":"def","fight":{"at":200,"de":90,"cn":1},"frest":"","survived":false}
        ]"#,
    )
    .expect("parse");
    let [attacker, defender] = narrate_losses(&records).render();
    assert_eq!(attacker, "Attacker lost all units (0.1mp) :sob:.");
    assert_eq!(defender, "Defender lost all units (1.4mp) :sob:.");
}

#[test]
fn records_from_unknown_fronts_are_skipped() {
    let records = parse_fleet_losses_json(
        r#"[
            {"front":"att","fight":{"at":100,"de":100},"frest":{"at":100,"de":100},"survived":true},
            {"front":"observer","fight":{"at":900,"de":900},"frest":"","survived":false}
        ]"#,
    )
    .expect("unknown front must not fail the parse");
    assert_eq!(records.len(), 2);
    let narrative = narrate_losses(&records);
    assert_eq!(narrative.attacker, SideOutcome::LostNothing);
    assert_eq!(narrative.defender, SideOutcome::DidNotEngage);
}
