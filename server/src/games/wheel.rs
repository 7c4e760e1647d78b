//! Wheel of fortune: spin for a dollar value, guess consonants to reveal a
//! hidden phrase, buy vowels, solve to bank the round. A correct consonant
//! guess keeps the turn; bankrupt wipes the round earnings.

use rand::{Rng, RngCore};
use shared::{GameAction, GameKind, GameState, Outcome, SpinResult, WheelPhase, WheelState};

use crate::registry::{GameMeta, GameModule, TurnCtx};

const META: GameMeta = GameMeta {
    kind: GameKind::WheelOfFortune,
    label: "Wheel of Fortune",
    icon: "🎡",
    min_players: 2,
    max_players: 2,
};

const WHEEL: [SpinResult; 20] = [
    SpinResult::Cash(500),
    SpinResult::Cash(600),
    SpinResult::Cash(700),
    SpinResult::Cash(800),
    SpinResult::Cash(900),
    SpinResult::Cash(1000),
    SpinResult::Cash(1500),
    SpinResult::Cash(2500),
    SpinResult::Cash(300),
    SpinResult::Cash(400),
    SpinResult::Cash(850),
    SpinResult::Cash(700),
    SpinResult::Cash(600),
    SpinResult::Cash(500),
    SpinResult::Cash(800),
    SpinResult::Cash(1200),
    SpinResult::Bankrupt,
    SpinResult::LoseATurn,
    SpinResult::Bankrupt,
    SpinResult::LoseATurn,
];

const VOWELS: [char; 5] = ['A', 'E', 'I', 'O', 'U'];
const VOWEL_COST: u32 = 250;

const PUZZLES: [(&str, &str); 20] = [
    ("ELECTRIC SLIDE", "Song & Artist"),
    ("APPLE PIE", "Food & Drink"),
    ("YELLOW BRICK ROAD", "Phrase"),
    ("HAPPY BIRTHDAY TO YOU", "Song & Artist"),
    ("SUNDAY MORNING", "Thing"),
    ("PIZZA DELIVERY", "What Are You Doing?"),
    ("SHOOTING STARS", "Things"),
    ("AROUND THE WORLD", "Phrase"),
    ("FRESH PRINCE OF BEL AIR", "TV Show"),
    ("JURASSIC PARK", "Movie"),
    ("GOLDEN GATE BRIDGE", "Landmark"),
    ("CATCH A FALLING STAR", "Phrase"),
    ("BOARD GAME NIGHT", "Event"),
    ("DANCING IN THE DARK", "Song & Artist"),
    ("MISSION IMPOSSIBLE", "Movie"),
    ("CHOCOLATE CAKE", "Food & Drink"),
    ("ONCE UPON A TIME", "Phrase"),
    ("NIGHT OWL", "Person"),
    ("SILVER LINING", "Phrase"),
    ("BUCKET LIST", "Thing"),
];

pub struct WheelOfFortune;

impl GameModule for WheelOfFortune {
    fn meta(&self) -> &GameMeta {
        &META
    }

    fn init(&self, rng: &mut dyn RngCore) -> GameState {
        let (phrase, category) = PUZZLES[rng.gen_range(0..PUZZLES.len())];
        GameState::Wheel(make_round(phrase, category))
    }

    fn process_action(
        &self,
        ctx: &TurnCtx<'_>,
        state: &mut GameState,
        action: &GameAction,
        rng: &mut dyn RngCore,
    ) -> Option<Outcome> {
        let GameState::Wheel(s) = state else {
            return None;
        };
        if s.current_turn != ctx.seat || s.phase == WheelPhase::Over {
            return None;
        }
        match action {
            GameAction::Spin => {
                let result = WHEEL[rng.gen_range(0..WHEEL.len())];
                apply_spin(s, ctx.seat, result)
            }
            GameAction::GuessLetter { letter } => apply_guess(s, ctx, *letter),
            GameAction::BuyVowel { letter } => apply_buy_vowel(s, ctx, *letter),
            GameAction::Solve { answer } => apply_solve(s, ctx, answer),
            _ => None,
        }
    }
}

fn make_round(phrase: &str, category: &str) -> WheelState {
    let phrase = phrase.to_uppercase();
    let revealed: Vec<Option<char>> = phrase
        .chars()
        .map(|c| if c == ' ' { Some(' ') } else { None })
        .collect();
    let mut unique: Vec<char> = phrase.chars().filter(|c| c.is_ascii_alphabetic()).collect();
    unique.sort_unstable();
    unique.dedup();
    WheelState {
        total_letters: unique.len(),
        category: category.to_string(),
        revealed,
        phrase,
        guessed: Vec::new(),
        scores: [0, 0],
        round_scores: [0, 0],
        current_turn: 0,
        phase: WheelPhase::Spin,
        last_spin: None,
        revealed_count: 0,
    }
}

fn apply_spin(s: &mut WheelState, seat: usize, result: SpinResult) -> Option<Outcome> {
    if s.phase != WheelPhase::Spin {
        return None;
    }
    s.last_spin = Some(result);
    match result {
        SpinResult::Bankrupt => {
            s.round_scores[seat] = 0;
            s.current_turn = 1 - s.current_turn;
        }
        SpinResult::LoseATurn => {
            s.current_turn = 1 - s.current_turn;
        }
        SpinResult::Cash(_) => {
            s.phase = WheelPhase::Act;
        }
    }
    Some(Outcome::ongoing())
}

fn apply_guess(s: &mut WheelState, ctx: &TurnCtx<'_>, letter: char) -> Option<Outcome> {
    if s.phase != WheelPhase::Act {
        return None;
    }
    let letter = letter.to_ascii_uppercase();
    if !letter.is_ascii_uppercase() || VOWELS.contains(&letter) || s.guessed.contains(&letter) {
        return None;
    }

    s.guessed.push(letter);
    let count = reveal_letter(s, letter);

    if count == 0 {
        s.phase = WheelPhase::Spin;
        s.current_turn = 1 - s.current_turn;
    } else {
        let value = match s.last_spin {
            Some(SpinResult::Cash(v)) => v,
            _ => 0,
        };
        s.round_scores[ctx.seat] += count * value;
        // Correct guess keeps the turn.
        s.phase = WheelPhase::Spin;
    }

    check_solved(s, ctx).or(Some(Outcome::ongoing()))
}

fn apply_buy_vowel(s: &mut WheelState, ctx: &TurnCtx<'_>, letter: char) -> Option<Outcome> {
    if s.phase != WheelPhase::Act && s.phase != WheelPhase::Spin {
        return None;
    }
    let letter = letter.to_ascii_uppercase();
    if !VOWELS.contains(&letter) || s.guessed.contains(&letter) {
        return None;
    }

    let seat = ctx.seat;
    // Affordability is judged on round + banked funds together, but the
    // deduction prefers round earnings.
    if s.round_scores[seat] + s.scores[seat] < VOWEL_COST {
        return None;
    }
    if s.round_scores[seat] >= VOWEL_COST {
        s.round_scores[seat] -= VOWEL_COST;
    } else {
        s.scores[seat] -= VOWEL_COST - s.round_scores[seat];
        s.round_scores[seat] = 0;
    }

    s.guessed.push(letter);
    reveal_letter(s, letter);
    s.phase = WheelPhase::Spin;

    check_solved(s, ctx).or(Some(Outcome::ongoing()))
}

fn apply_solve(s: &mut WheelState, ctx: &TurnCtx<'_>, answer: &str) -> Option<Outcome> {
    if answer.trim().is_empty() {
        return None;
    }
    let normalized = answer
        .to_uppercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if normalized != s.phrase {
        s.phase = WheelPhase::Spin;
        s.current_turn = 1 - s.current_turn;
        s.last_spin = None;
        let mut outcome = Outcome::ongoing();
        outcome.solve_failed = true;
        return Some(outcome);
    }

    s.scores[ctx.seat] += s.round_scores[ctx.seat];
    let phrase: Vec<char> = s.phrase.chars().collect();
    for (i, c) in phrase.iter().enumerate() {
        s.revealed[i] = Some(*c);
    }
    s.revealed_count = s.revealed.iter().flatten().filter(|c| **c != ' ').count();
    s.phase = WheelPhase::Over;
    Some(final_outcome(s, ctx))
}

fn reveal_letter(s: &mut WheelState, letter: char) -> u32 {
    let mut count = 0;
    let phrase: Vec<char> = s.phrase.chars().collect();
    for (i, c) in phrase.iter().enumerate() {
        if *c == letter {
            s.revealed[i] = Some(letter);
            count += 1;
        }
    }
    s.revealed_count = s.revealed.iter().flatten().filter(|c| **c != ' ').count();
    count
}

/// Once every letter is revealed through guesses or purchases the round
/// resolves to whoever just acted.
fn check_solved(s: &mut WheelState, ctx: &TurnCtx<'_>) -> Option<Outcome> {
    if s.revealed.iter().any(|c| c.is_none()) {
        return None;
    }
    s.scores[ctx.seat] += s.round_scores[ctx.seat];
    s.phase = WheelPhase::Over;
    Some(final_outcome(s, ctx))
}

fn final_outcome(s: &WheelState, ctx: &TurnCtx<'_>) -> Outcome {
    let [total0, total1] = s.scores;
    match total0.cmp(&total1) {
        std::cmp::Ordering::Greater => Outcome::win(0, ctx.name_of(0)),
        std::cmp::Ordering::Less => Outcome::win(1, ctx.name_of(1)),
        std::cmp::Ordering::Equal => Outcome::draw(),
    }
}
