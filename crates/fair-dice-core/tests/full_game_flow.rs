//! Integration tests for the full game flow.
//!
//! These tests play complete sessions against a scripted counterpart and a
//! scripted secret source, so every exchange result is known in advance.

use fair_dice_core::{
    counterpart::{Reply, Request, ScriptedCounterpart},
    crypto::{Commitment, ScriptedSource},
    games::{DieSet, Game, SessionEnd},
    protocol::{CommitNotice, GameEvent, GameResult, Purpose, RevealNotice, Side},
};

fn classic_dice() -> DieSet {
    DieSet::parse(["2,2,4,4,9,9", "1,1,6,6,8,8", "3,3,5,5,7,7"]).unwrap()
}

fn commits(events: &[GameEvent]) -> Vec<CommitNotice> {
    events
        .iter()
        .filter_map(|event| match event {
            GameEvent::Committed(commit) => Some(commit.clone()),
            _ => None,
        })
        .collect()
}

fn reveals(events: &[GameEvent]) -> Vec<RevealNotice> {
    events
        .iter()
        .filter_map(|event| match event {
            GameEvent::Revealed(reveal) => Some(reveal.clone()),
            _ => None,
        })
        .collect()
}

/// Counterpart moves first, takes die 1, and rolls 6 against the program's 7
#[tokio::test]
async fn test_counterpart_first_program_wins() {
    // Program secrets, in draw order:
    //   first move 0, program die pick 1 (of remaining [0, 2] -> die 2),
    //   counterpart roll 0, program roll 4
    let source = ScriptedSource::new([0, 1, 0, 4]);
    // Counterpart: guess 0, die 1, roll contributions 2 and 1
    let mut counterpart = ScriptedCounterpart::numbers([0, 1, 2, 1]);

    let end = Game::with_source(classic_dice(), source)
        .play(&mut counterpart)
        .await
        .unwrap();

    // Phase 1: (0 + 0) mod 2 = 0, counterpart moves first
    assert!(counterpart.events().contains(&GameEvent::FirstMoveDecided {
        first_mover: Side::Counterpart
    }));

    // Phase 2: counterpart is offered every die, program picks from {0, 2}
    assert_eq!(
        counterpart.requests()[1],
        Request::ChooseDie {
            candidates: vec![0, 1, 2]
        }
    );
    assert!(counterpart.events().contains(&GameEvent::DieChosen {
        side: Side::Program,
        index: 2
    }));

    // Phase 3: counterpart rolls [1,1,6,6,8,8] at (0 + 2) mod 6 = 2 -> 6
    //          program rolls [3,3,5,5,7,7] at (4 + 1) mod 6 = 5 -> 7
    assert!(counterpart.events().contains(&GameEvent::Rolled {
        side: Side::Counterpart,
        face_index: 2,
        value: 6
    }));
    assert!(counterpart.events().contains(&GameEvent::Rolled {
        side: Side::Program,
        face_index: 5,
        value: 7
    }));

    // Phase 4
    let SessionEnd::Completed(outcome) = end else {
        panic!("expected a completed session");
    };
    assert_eq!(outcome.first_mover, Side::Counterpart);
    assert_eq!(outcome.counterpart_die, 1);
    assert_eq!(outcome.program_die, 2);
    assert_eq!(outcome.counterpart_roll, 6);
    assert_eq!(outcome.program_roll, 7);
    assert_eq!(outcome.result, GameResult::ProgramWins);
    assert_eq!(
        counterpart.events().last(),
        Some(&GameEvent::Finished(outcome))
    );
}

/// Program moves first and the counterpart may not take the program's die
#[tokio::test]
async fn test_program_first_counterpart_wins() {
    // first move 1 (guess 0 -> 1), program takes die 1 (draw 1 of [0,1,2]),
    // program roll 0, counterpart roll 0
    let source = ScriptedSource::new([1, 1, 0, 0]);
    // guess 0, try die 1 (taken), take die 0, roll contributions 0 and 4
    let mut counterpart = ScriptedCounterpart::numbers([0, 1, 0, 0, 4]);

    let end = Game::with_source(classic_dice(), source)
        .play(&mut counterpart)
        .await
        .unwrap();

    assert_eq!(
        counterpart.requests()[1],
        Request::ChooseDie {
            candidates: vec![0, 2]
        }
    );
    assert!(counterpart
        .events()
        .contains(&GameEvent::InvalidSelection { value: 1 }));

    // program: [1,1,6,6,8,8] at 0 -> 1; counterpart: [2,2,4,4,9,9] at 4 -> 9
    let SessionEnd::Completed(outcome) = end else {
        panic!("expected a completed session");
    };
    assert_eq!(outcome.first_mover, Side::Program);
    assert_eq!(outcome.program_die, 1);
    assert_eq!(outcome.counterpart_die, 0);
    assert_eq!(outcome.program_roll, 1);
    assert_eq!(outcome.counterpart_roll, 9);
    assert_eq!(outcome.result, GameResult::CounterpartWins);
}

/// Equal rolls end the game as a tie without a re-roll
#[tokio::test]
async fn test_equal_rolls_tie() {
    let dice = DieSet::parse(["5,5,5", "5,5,5,5", "1,2,3"]).unwrap();
    let source = ScriptedSource::new([0, 0, 2, 3]);
    let mut counterpart = ScriptedCounterpart::numbers([0, 0, 0, 0]);

    let end = Game::with_source(dice, source)
        .play(&mut counterpart)
        .await
        .unwrap();

    let SessionEnd::Completed(outcome) = end else {
        panic!("expected a completed session");
    };
    assert_eq!(outcome.program_roll, 5);
    assert_eq!(outcome.counterpart_roll, 5);
    assert_eq!(outcome.result, GameResult::Tie);
    assert_eq!(counterpart.remaining(), 0);
}

/// Every reveal matches the HMAC published before the counterpart answered
#[tokio::test]
async fn test_every_reveal_verifies_against_its_commitment() {
    let source = ScriptedSource::new([0, 1, 0, 4]);
    let mut counterpart = ScriptedCounterpart::numbers([0, 1, 2, 1]);

    Game::with_source(classic_dice(), source)
        .play(&mut counterpart)
        .await
        .unwrap();

    let commits = commits(counterpart.events());
    let reveals = reveals(counterpart.events());
    assert_eq!(commits.len(), 3);
    assert_eq!(reveals.len(), 3);

    let purposes: Vec<_> = commits.iter().map(|commit| commit.purpose).collect();
    assert_eq!(
        purposes,
        vec![
            Purpose::FirstMove,
            Purpose::Roll(Side::Counterpart),
            Purpose::Roll(Side::Program)
        ]
    );
    for (commit, reveal) in commits.iter().zip(&reveals) {
        assert!(reveal.verify(commit));
        assert_eq!(commit.hmac, Commitment::new(&reveal.key, reveal.secret));
        assert_eq!(
            reveal.result,
            (reveal.secret + reveal.counterpart_value) % reveal.range
        );
    }

    // fresh key for every exchange
    assert_ne!(reveals[0].key, reveals[1].key);
    assert_ne!(reveals[1].key, reveals[2].key);
}

/// The commitment for an exchange is published before its request is asked
#[tokio::test]
async fn test_commitment_precedes_request() {
    let source = ScriptedSource::new([0, 1, 0, 4]);
    let mut counterpart = ScriptedCounterpart::numbers([0, 1, 2, 1]);

    Game::with_source(classic_dice(), source)
        .play(&mut counterpart)
        .await
        .unwrap();

    let commits = commits(counterpart.events());
    match &counterpart.requests()[0] {
        Request::GuessFirstMove { commitment } => assert_eq!(commitment, &commits[0]),
        other => panic!("unexpected first request {:?}", other),
    }
    match &counterpart.requests()[2] {
        Request::AddToRoll { roller, commitment } => {
            assert_eq!(*roller, Side::Counterpart);
            assert_eq!(commitment, &commits[1]);
        }
        other => panic!("unexpected roll request {:?}", other),
    }
}

/// Abandoning while choosing a die ends the session with no outcome
#[tokio::test]
async fn test_abandon_while_choosing_die() {
    let source = ScriptedSource::new([0]);
    let mut counterpart = ScriptedCounterpart::new([Reply::Number(0), Reply::Abandon]);

    let end = Game::with_source(classic_dice(), source)
        .play(&mut counterpart)
        .await
        .unwrap();

    assert_eq!(end, SessionEnd::Abandoned);
    assert!(!counterpart
        .events()
        .iter()
        .any(|event| matches!(event, GameEvent::Finished(_) | GameEvent::Rolled { .. })));
}
