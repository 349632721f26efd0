use throwdown_game::{
    AchievementId, Clock, Difficulty, GameEvent, GameMode, GameSession, GameState, MemoryStore,
    Move, PowerupKind, ProfileStorage, RoundProgress,
};
use std::cell::Cell;

const PROFILE: &str = "itest-profile";
const SEED: u64 = 0x7D;

#[derive(Debug, Clone, Default)]
struct StepClock {
    ticks: Cell<u64>,
}

impl Clock for StepClock {
    fn now_ms(&self) -> u64 {
        let now = self.ticks.get();
        self.ticks.set(now + 1);
        now
    }
}

fn open(store: &MemoryStore) -> GameSession<MemoryStore, StepClock> {
    GameSession::open(store.clone(), StepClock::default(), PROFILE, SEED)
        .expect("memory store cannot fail")
        .0
}

fn play_duel_round(session: &mut GameSession<MemoryStore, StepClock>, first: Move, second: Move) {
    let parked = session.play(first).expect("first move is unlocked");
    assert_eq!(parked, RoundProgress::AwaitingOpponent);
    let resolved = session.play(second).expect("second move is unlocked");
    assert!(matches!(resolved, RoundProgress::Resolved(_)));
}

#[test]
fn partial_blob_merges_with_defaults() {
    let store = MemoryStore::default();
    store
        .save_profile(
            PROFILE,
            r#"{"scores":{"player":7,"opponent":2,"ties":1},"level":3,"xp":40}"#,
        )
        .expect("memory store cannot fail");

    let session = open(&store);
    let state = session.state();
    assert_eq!(state.scores.player, 7);
    assert_eq!(state.level, 3);
    assert_eq!(state.xp, 40);
    // Everything the blob omitted takes its documented default.
    assert_eq!(state.powerups.double, 3);
    assert_eq!(state.powerups.shield, 2);
    assert_eq!(state.powerups.peek, 1);
    assert_eq!(state.history_limit, 10);
    assert_eq!(state.settings.player_name, "PLAYER 1");
    assert_eq!(state.settings.opponent_name, "COMPUTER");
    assert_eq!(state.difficulty, Difficulty::Medium);
    assert!(state.history.is_empty());
}

#[test]
fn unknown_blob_fields_are_ignored() {
    let store = MemoryStore::default();
    store
        .save_profile(PROFILE, r#"{"xp":10,"soundtrack":"synthwave","hats":[1,2]}"#)
        .expect("memory store cannot fail");

    let session = open(&store);
    assert_eq!(session.state().xp, 10);
}

#[test]
fn reload_round_trips_a_played_profile() {
    let store = MemoryStore::default();
    let mut session = open(&store);
    session
        .set_mode(GameMode::VsPlayer)
        .expect("set_mode persists");
    play_duel_round(&mut session, Move::Rock, Move::Scissors);
    play_duel_round(&mut session, Move::Paper, Move::Paper);
    session
        .activate_powerup(PowerupKind::Shield)
        .expect("shield has charges");

    let reloaded = open(&store);
    assert_eq!(reloaded.state(), session.state());

    // Saving an untouched reload keeps the profile semantically identical.
    reloaded.save().expect("memory store cannot fail");
    let reread = open(&store);
    assert_eq!(reread.state(), session.state());
}

#[test]
fn pending_powerup_attribution_survives_reload() {
    let store = MemoryStore::default();
    let mut session = open(&store);
    session
        .set_mode(GameMode::VsPlayer)
        .expect("set_mode persists");
    session
        .activate_powerup(PowerupKind::Peek)
        .expect("peek has charges");

    let mut reloaded = open(&store);
    assert_eq!(reloaded.state().pending_powerup, Some(PowerupKind::Peek));
    play_duel_round(&mut reloaded, Move::Rock, Move::Scissors);
    assert_eq!(
        reloaded.state().history.front().and_then(|r| r.powerup),
        Some(PowerupKind::Peek)
    );
}

#[test]
fn corrupt_blob_recovers_and_stays_recovered() {
    let store = MemoryStore::default();
    store
        .save_profile(PROFILE, "][ not a profile ][")
        .expect("memory store cannot fail");

    let (session, events) = GameSession::open(store.clone(), StepClock::default(), PROFILE, SEED)
        .expect("memory store cannot fail");
    assert_eq!(events.as_slice(), &[GameEvent::ProfileRecovered]);
    assert_eq!(*session.state(), GameState::default());

    // The bad payload was overwritten, so the next open is clean.
    let (_, events) = GameSession::open(store, StepClock::default(), PROFILE, SEED)
        .expect("memory store cannot fail");
    assert!(events.is_empty());
}

#[test]
fn achievements_do_not_reunlock_after_reload() {
    let store = MemoryStore::default();
    let mut session = open(&store);
    session
        .set_mode(GameMode::VsPlayer)
        .expect("set_mode persists");
    play_duel_round(&mut session, Move::Rock, Move::Scissors);
    assert!(session.state().achievements.contains(&AchievementId::FirstWin));
    let xp_after_first = session.state().xp;

    let mut reloaded = open(&store);
    let parked = reloaded.play(Move::Rock).expect("rock is unlocked");
    assert_eq!(parked, RoundProgress::AwaitingOpponent);
    let resolved = reloaded.play(Move::Scissors).expect("scissors is unlocked");
    let RoundProgress::Resolved(outcome) = resolved else {
        panic!("second submission must resolve");
    };
    assert!(!outcome.events.iter().any(|event| matches!(
        event,
        GameEvent::AchievementUnlocked {
            id: AchievementId::FirstWin,
            ..
        }
    )));
    // Second win pays plain win XP, no repeated first-win bonus.
    assert_eq!(reloaded.state().xp, xp_after_first + 20);
}

#[test]
fn cleared_profile_opens_fresh() {
    let store = MemoryStore::default();
    let mut session = open(&store);
    session
        .set_difficulty(Difficulty::Hard)
        .expect("set_difficulty persists");
    store.clear_profile(PROFILE).expect("memory store cannot fail");

    let reopened = open(&store);
    assert_eq!(*reopened.state(), GameState::default());
}

#[test]
fn reset_survives_reload_as_defaults() {
    let store = MemoryStore::default();
    let mut session = open(&store);
    session
        .set_mode(GameMode::VsPlayer)
        .expect("set_mode persists");
    play_duel_round(&mut session, Move::Rock, Move::Scissors);
    session
        .update_settings(|settings| settings.theme = String::from("crt"))
        .expect("settings persist");

    let events = session.reset().expect("reset persists");
    assert_eq!(events.as_slice(), &[GameEvent::ProfileReset]);

    let reopened = open(&store);
    assert_eq!(*reopened.state(), GameState::default());
    assert_eq!(reopened.settings().theme, "default");
}

#[test]
fn mode_and_difficulty_changes_persist_without_touching_scores() {
    let store = MemoryStore::default();
    let mut session = open(&store);
    session
        .set_mode(GameMode::VsPlayer)
        .expect("set_mode persists");
    play_duel_round(&mut session, Move::Rock, Move::Scissors);

    session
        .set_mode(GameMode::VsComputer)
        .expect("set_mode persists");
    session
        .set_difficulty(Difficulty::Impossible)
        .expect("set_difficulty persists");

    let reopened = open(&store);
    assert_eq!(reopened.state().mode, GameMode::VsComputer);
    assert_eq!(reopened.state().difficulty, Difficulty::Impossible);
    assert_eq!(reopened.state().scores.player, 1);
}
