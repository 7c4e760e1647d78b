//! Password: one seat gives one-word clues, the other guesses the secret
//! word. Roles swap inside a round on a wrong guess and across rounds on a
//! solve or a pass; fewer clues earn more points. First to the target score
//! wins.

use rand::{Rng, RngCore};
use shared::{
    ClueEntry, GameAction, GameKind, GameState, GuessResult, Outcome, PasswordPhase, PasswordState,
};

use crate::registry::{GameMeta, GameModule, TurnCtx};

const META: GameMeta = GameMeta {
    kind: GameKind::Password,
    label: "Password",
    icon: "🔑",
    min_players: 2,
    max_players: 2,
};

const TARGET_SCORE: u32 = 25;
const MAX_CLUES_PER_ROUND: u32 = 8;

const WORDS: [&str; 60] = [
    "ELEPHANT",
    "UMBRELLA",
    "CHOCOLATE",
    "TELESCOPE",
    "LIGHTHOUSE",
    "VOLCANO",
    "SUITCASE",
    "CATHEDRAL",
    "SUBMARINE",
    "ORCHESTRA",
    "BUTTERFLY",
    "CARNIVAL",
    "DETECTIVE",
    "EVERGREEN",
    "FISHERMAN",
    "HAMBURGER",
    "ICEBERG",
    "JELLYFISH",
    "KEYBOARD",
    "LANTERN",
    "MOUNTAIN",
    "NOTEBOOK",
    "OCEAN",
    "PENGUIN",
    "QUARRY",
    "RAINBOW",
    "SANDWICH",
    "TORNADO",
    "UNIVERSE",
    "VACATION",
    "WATERFALL",
    "XYLOPHONE",
    "YEARBOOK",
    "ZIPPER",
    "ASTRONAUT",
    "BLUEPRINT",
    "COMPASS",
    "DIAMOND",
    "ENVELOPE",
    "FORTRESS",
    "GOVERNOR",
    "HIGHWAY",
    "ISLAND",
    "JUNGLE",
    "KINGDOM",
    "LIBRARY",
    "MUSEUM",
    "NECKLACE",
    "ORIGAMI",
    "PORTRAIT",
    "QUICKSAND",
    "RIDDLE",
    "SKELETON",
    "THUNDER",
    "UPSTREAM",
    "VILLAGE",
    "WHISPER",
    "EXPLORER",
    "YESTERDAY",
    "CHAMPION",
];

/// 10 points for a first-clue solve, decreasing by one per extra clue down
/// to a floor of 3.
fn points_for_clue_count(clues: u32) -> u32 {
    (11_u32.saturating_sub(clues)).max(3)
}

fn pick_word(used: &[String], rng: &mut dyn RngCore) -> String {
    let available: Vec<&&str> = WORDS.iter().filter(|w| !used.iter().any(|u| u == **w)).collect();
    if available.is_empty() {
        WORDS[rng.gen_range(0..WORDS.len())].to_string()
    } else {
        available[rng.gen_range(0..available.len())].to_string()
    }
}

pub struct Password;

impl GameModule for Password {
    fn meta(&self) -> &GameMeta {
        &META
    }

    fn init(&self, rng: &mut dyn RngCore) -> GameState {
        let word = pick_word(&[], rng);
        GameState::Password(PasswordState {
            used_words: vec![word.clone()],
            secret_word: word,
            clues: Vec::new(),
            scores: [0, 0],
            clue_giver: 0,
            guesser: 1,
            phase: PasswordPhase::GiveClue,
            clue_count: 0,
            last_result: None,
        })
    }

    fn process_action(
        &self,
        ctx: &TurnCtx<'_>,
        state: &mut GameState,
        action: &GameAction,
        rng: &mut dyn RngCore,
    ) -> Option<Outcome> {
        let GameState::Password(s) = state else {
            return None;
        };
        match action {
            GameAction::GiveClue { clue } => {
                if s.phase != PasswordPhase::GiveClue || ctx.seat != s.clue_giver {
                    return None;
                }
                let clue = clue.trim().to_uppercase();
                if clue.is_empty() || clue.split_whitespace().count() > 1 {
                    return None;
                }
                if clue == s.secret_word {
                    return None;
                }

                s.clues.push(ClueEntry {
                    giver: ctx.seat,
                    clue,
                    guess: None,
                    correct: None,
                });
                s.clue_count += 1;
                s.phase = PasswordPhase::Guess;
                Some(Outcome::ongoing())
            }

            GameAction::WordGuess { guess } => {
                if s.phase != PasswordPhase::Guess || ctx.seat != s.guesser {
                    return None;
                }
                let guess = guess.trim().to_uppercase();
                if guess.is_empty() {
                    return None;
                }

                let correct = guess == s.secret_word;
                if let Some(last) = s.clues.last_mut() {
                    last.guess = Some(guess);
                    last.correct = Some(correct);
                }

                if correct {
                    s.scores[ctx.seat] += points_for_clue_count(s.clue_count);
                    s.last_result = Some(GuessResult::Correct);
                    if s.scores[ctx.seat] >= TARGET_SCORE {
                        return Some(Outcome::win(ctx.seat, ctx.username));
                    }
                    next_round(s, rng);
                    Some(Outcome::ongoing())
                } else {
                    s.last_result = Some(GuessResult::Wrong);
                    if s.clue_count >= MAX_CLUES_PER_ROUND {
                        // Round forfeited, no points.
                        s.last_result = Some(GuessResult::Pass);
                        next_round(s, rng);
                        return Some(Outcome::ongoing());
                    }
                    // Roles swap within the same round.
                    std::mem::swap(&mut s.clue_giver, &mut s.guesser);
                    s.phase = PasswordPhase::GiveClue;
                    Some(Outcome::ongoing())
                }
            }

            _ => None,
        }
    }
}

/// Starts a fresh round with swapped roles and a new secret word drawn from
/// the unused pool (full pool once exhausted).
fn next_round(s: &mut PasswordState, rng: &mut dyn RngCore) {
    let new_giver = 1 - s.clue_giver;
    let new_guesser = s.clue_giver;
    let word = pick_word(&s.used_words, rng);
    s.used_words.push(word.clone());
    s.secret_word = word;
    s.clues.clear();
    s.clue_count = 0;
    s.clue_giver = new_giver;
    s.guesser = new_guesser;
    s.phase = PasswordPhase::GiveClue;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ctx(seat: usize) -> TurnCtx<'static> {
        TurnCtx {
            seat,
            username: if seat == 0 { "Alice" } else { "Bob" },
            names: ["Alice", "Bob"],
        }
    }

    fn init_with(rng: &mut StdRng) -> GameState {
        Password.init(rng)
    }

    fn give_clue(state: &mut GameState, rng: &mut StdRng, seat: usize, clue: &str) -> Option<Outcome> {
        Password.process_action(
            &ctx(seat),
            state,
            &GameAction::GiveClue {
                clue: clue.to_string(),
            },
            rng,
        )
    }

    fn guess(state: &mut GameState, rng: &mut StdRng, seat: usize, word: &str) -> Option<Outcome> {
        Password.process_action(
            &ctx(seat),
            state,
            &GameAction::WordGuess {
                guess: word.to_string(),
            },
            rng,
        )
    }

    fn password(state: &GameState) -> &PasswordState {
        let GameState::Password(s) = state else {
            panic!("wrong variant");
        };
        s
    }

    #[test]
    fn init_draws_a_word_and_seats_roles() {
        let mut rng = StdRng::seed_from_u64(1);
        let state = init_with(&mut rng);
        let s = password(&state);
        assert!(WORDS.contains(&s.secret_word.as_str()));
        assert_eq!(s.used_words, vec![s.secret_word.clone()]);
        assert_eq!(s.clue_giver, 0);
        assert_eq!(s.guesser, 1);
        assert_eq!(s.phase, PasswordPhase::GiveClue);
        assert_eq!(s.scores, [0, 0]);
    }

    #[test]
    fn scoring_schedule_is_monotonically_decreasing_with_a_floor() {
        assert_eq!(points_for_clue_count(1), 10);
        assert_eq!(points_for_clue_count(2), 9);
        assert_eq!(points_for_clue_count(8), 3);
        assert_eq!(points_for_clue_count(12), 3);
        for n in 1..MAX_CLUES_PER_ROUND {
            assert!(points_for_clue_count(n) >= points_for_clue_count(n + 1));
        }
    }

    #[test]
    fn clue_must_be_one_word_and_not_the_secret() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut state = init_with(&mut rng);
        let secret = password(&state).secret_word.clone();
        assert!(give_clue(&mut state, &mut rng, 0, "").is_none());
        assert!(give_clue(&mut state, &mut rng, 0, "two words").is_none());
        assert!(give_clue(&mut state, &mut rng, 0, &secret.to_lowercase()).is_none());
        assert!(give_clue(&mut state, &mut rng, 1, "hint").is_none());
        assert!(give_clue(&mut state, &mut rng, 0, "hint").is_some());
        assert_eq!(password(&state).phase, PasswordPhase::Guess);
    }

    #[test]
    fn guesses_are_rejected_out_of_phase_or_from_the_giver() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut state = init_with(&mut rng);
        assert!(guess(&mut state, &mut rng, 1, "ANYTHING").is_none());
        give_clue(&mut state, &mut rng, 0, "hint");
        assert!(guess(&mut state, &mut rng, 0, "ANYTHING").is_none());
    }

    #[test]
    fn correct_first_clue_guess_awards_ten_points_and_swaps_rounds() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut state = init_with(&mut rng);
        let secret = password(&state).secret_word.clone();
        give_clue(&mut state, &mut rng, 0, "hint");
        let outcome = guess(&mut state, &mut rng, 1, &secret).unwrap();
        assert!(!outcome.game_over);
        let s = password(&state);
        assert_eq!(s.scores, [0, 10]);
        assert_eq!(s.last_result, Some(GuessResult::Correct));
        // Fresh round: roles swapped, new unused word, clue list reset.
        assert_eq!(s.clue_giver, 1);
        assert_eq!(s.guesser, 0);
        assert_eq!(s.clue_count, 0);
        assert!(s.clues.is_empty());
        assert_ne!(s.secret_word, secret);
        assert_eq!(s.used_words.len(), 2);
    }

    #[test]
    fn wrong_guess_swaps_roles_within_the_round() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut state = init_with(&mut rng);
        let secret = password(&state).secret_word.clone();
        give_clue(&mut state, &mut rng, 0, "hint");
        let outcome = guess(&mut state, &mut rng, 1, "DEFINITELYWRONG").unwrap();
        assert!(!outcome.game_over);
        let s = password(&state);
        assert_eq!(s.secret_word, secret);
        assert_eq!(s.clue_giver, 1);
        assert_eq!(s.guesser, 0);
        assert_eq!(s.phase, PasswordPhase::GiveClue);
        assert_eq!(s.last_result, Some(GuessResult::Wrong));
        assert_eq!(s.clue_count, 1);
    }

    #[test]
    fn round_is_forfeited_after_the_clue_cap() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut state = init_with(&mut rng);
        let secret = password(&state).secret_word.clone();
        let mut giver = 0;
        for i in 0..MAX_CLUES_PER_ROUND {
            give_clue(&mut state, &mut rng, giver, &format!("HINT{i}")).unwrap();
            guess(&mut state, &mut rng, 1 - giver, "WRONGWORD").unwrap();
            giver = password(&state).clue_giver;
        }
        let s = password(&state);
        // Eighth wrong guess passed the round with zero points.
        assert_eq!(s.scores, [0, 0]);
        assert_eq!(s.last_result, Some(GuessResult::Pass));
        assert_ne!(s.secret_word, secret);
        assert_eq!(s.clue_count, 0);
    }

    #[test]
    fn reaching_the_target_score_wins() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut state = init_with(&mut rng);
        {
            let GameState::Password(s) = &mut state else {
                panic!("wrong variant");
            };
            s.scores = [0, 20];
        }
        let secret = password(&state).secret_word.clone();
        give_clue(&mut state, &mut rng, 0, "hint");
        let outcome = guess(&mut state, &mut rng, 1, &secret).unwrap();
        assert!(outcome.game_over);
        assert_eq!(outcome.winner, Some(1));
        assert_eq!(outcome.winner_name.as_deref(), Some("Bob"));
        assert_eq!(password(&state).scores[1], 30);
    }

    #[test]
    fn new_rounds_avoid_previously_used_words_until_exhausted() {
        let mut rng = StdRng::seed_from_u64(8);
        let used: Vec<String> = WORDS[..59].iter().map(|w| w.to_string()).collect();
        let word = pick_word(&used, &mut rng);
        assert_eq!(word, WORDS[59]);

        let all: Vec<String> = WORDS.iter().map(|w| w.to_string()).collect();
        let fallback = pick_word(&all, &mut rng);
        assert!(WORDS.contains(&fallback.as_str()));
    }
}
