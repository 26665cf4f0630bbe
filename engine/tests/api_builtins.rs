use encounter_engine::api::turn_order_lines;
use encounter_engine::content::builtin_encounter;
use encounter_engine::{
    run_command, CombatCommand, CombatError, Dice, EncounterStore, InitiativeRequest, MemoryStore,
    TrackerConfig,
};

fn store() -> MemoryStore {
    MemoryStore::with([builtin_encounter("goblin_ambush").expect("built-in encounter parses")])
}

#[test]
fn builtin_encounter_has_a_party() {
    let enc = builtin_encounter("goblin_ambush").unwrap();
    assert_eq!(enc.participants.len(), 4);
    assert!(!enc.combat_state.is_active);
    assert!(builtin_encounter("dragon_lair").is_err());
}

#[test]
fn a_short_fight_through_the_store() {
    let mut store = store();
    let cfg = TrackerConfig::default();
    // fighter 10+2, rogue 12+4, goblin 15+2, boss 3+2
    let mut dice = Dice::from_scripted(vec![10, 12, 15, 3]);
    let commands = [
        CombatCommand::RollInitiative { request: InitiativeRequest::RollAll },
        CombatCommand::Start,
        CombatCommand::NextTurn,
        CombatCommand::Damage { participant_id: "fighter".into(), amount: 5 },
        CombatCommand::SetTemporaryHp { participant_id: "rogue".into(), amount: 3 },
    ];
    for cmd in &commands {
        run_command(&mut store, "goblin_ambush", cmd, &mut dice, &cfg).unwrap();
    }

    let enc = store.load("goblin_ambush").unwrap();
    insta::assert_snapshot!(turn_order_lines(&enc).join("\n"), @r"
    [COMBAT] active round=1 turn=2
    [INIT]  Goblin 17 (dex 14) acted [HP 7/7]
    [INIT]> Rogue 16 (dex 18) [HP 9/9 +3]
    [INIT]  Fighter 12 (dex 14) [HP 7/12]
    [INIT]  Goblin Boss 5 (dex 14) [HP 21/21]
    ");
}

#[test]
fn refused_commands_are_not_saved() {
    let mut store = store();
    let cfg = TrackerConfig::default();
    let mut dice = Dice::from_seed(7);
    let before = store.load("goblin_ambush").unwrap();

    let err = run_command(&mut store, "goblin_ambush", &CombatCommand::NextTurn, &mut dice, &cfg)
        .unwrap_err();
    assert_eq!(err.downcast_ref::<CombatError>(), Some(&CombatError::CombatNotActive));

    let err = run_command(
        &mut store,
        "goblin_ambush",
        &CombatCommand::Heal { participant_id: "nobody".into(), amount: 3 },
        &mut dice,
        &cfg,
    )
    .unwrap_err();
    assert_eq!(
        err.downcast_ref::<CombatError>(),
        Some(&CombatError::ParticipantNotFound("nobody".into()))
    );
    assert_eq!(store.load("goblin_ambush").unwrap(), before);

    assert!(run_command(&mut store, "missing", &CombatCommand::Start, &mut dice, &cfg).is_err());
}

#[test]
fn conditions_are_normalised_and_round_trip_through_json() {
    let mut store = store();
    let cfg = TrackerConfig::default();
    let mut dice = Dice::from_seed(7);
    let add = CombatCommand::AddCondition { participant_id: "rogue".into(), condition: " Poisoned ".into() };
    let enc = run_command(&mut store, "goblin_ambush", &add, &mut dice, &cfg).unwrap();
    assert!(enc.participant("rogue").unwrap().conditions.contains("poisoned"));

    let json = serde_json::to_string(&enc).unwrap();
    let back: encounter_engine::Encounter = serde_json::from_str(&json).unwrap();
    assert_eq!(back, enc);

    let remove = CombatCommand::RemoveCondition { participant_id: "rogue".into(), condition: "POISONED".into() };
    let enc = run_command(&mut store, "goblin_ambush", &remove, &mut dice, &cfg).unwrap();
    assert!(enc.participant("rogue").unwrap().conditions.is_empty());
}

#[test]
fn roster_pools_are_clamped_on_load() {
    let json = r#"{
        "id": "skirmish",
        "name": "Skirmish",
        "participants": [{
            "characterId": "scout",
            "name": "Scout",
            "type": "npc",
            "maxHitPoints": 10,
            "currentHitPoints": 8,
            "temporaryHitPoints": -3
        }]
    }"#;
    let enc: encounter_engine::Encounter = serde_json::from_str(json).unwrap();
    let mut store = MemoryStore::with([enc]);
    let mut dice = Dice::from_seed(1);
    let cmd = CombatCommand::Damage { participant_id: "scout".into(), amount: 2 };
    let enc = run_command(&mut store, "skirmish", &cmd, &mut dice, &TrackerConfig::default()).unwrap();
    let health = enc.participant("scout").unwrap().health;
    assert_eq!((health.current, health.temporary), (6, 0));
}

#[test]
fn clearing_temporary_hp_keeps_current_hp() {
    let mut store = store();
    let cfg = TrackerConfig::default();
    let mut dice = Dice::from_seed(3);
    let grant = CombatCommand::SetTemporaryHp { participant_id: "fighter".into(), amount: 8 };
    run_command(&mut store, "goblin_ambush", &grant, &mut dice, &cfg).unwrap();

    let clear = CombatCommand::ClearTemporaryHp { participant_id: "fighter".into() };
    let enc = run_command(&mut store, "goblin_ambush", &clear, &mut dice, &cfg).unwrap();
    let health = enc.participant("fighter").unwrap().health;
    assert_eq!(health.temporary, 0);
    assert_eq!(health.current, health.max);

    let missing = CombatCommand::ClearTemporaryHp { participant_id: "nobody".into() };
    let err = run_command(&mut store, "goblin_ambush", &missing, &mut dice, &cfg).unwrap_err();
    assert!(matches!(err.downcast_ref::<CombatError>(), Some(CombatError::ParticipantNotFound(_))));
}
