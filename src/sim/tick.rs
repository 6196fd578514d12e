//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically. Wall-clock time
//! enters only through `now_ms`; all randomness comes from the state's RNG.

use glam::Vec2;

use super::catalog::{FallingFruit, spawn_fruit};
use super::challenge::ChallengeOutcome;
use super::effects::{ActivePowerup, EffectKind, PowerupKind};
use super::particles::{self, ParticleKind, palette};
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Player commands (one per tick at most)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveLeft,
    MoveRight,
    PauseToggle,
    Quit,
    /// Numbered menu entry
    MenuSelect(u8),
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub command: Option<Command>,
}

impl TickInput {
    pub fn command(command: Command) -> Self {
        Self {
            command: Some(command),
        }
    }
}

/// Advance the game state by one step at wall-clock `now_ms`
pub fn tick(state: &mut GameState, input: &TickInput, now_ms: u64) {
    state.events.clear();

    match state.phase {
        GamePhase::Menu => handle_menu(state, input.command, now_ms),
        GamePhase::Paused => match input.command {
            Some(Command::PauseToggle) => {
                log::debug!("Resumed at {}ms", now_ms);
                state.phase = GamePhase::Playing;
                state.push_event(GameEvent::Resumed);
            }
            Some(Command::Quit) => state.finish_game(now_ms),
            _ => {}
        },
        GamePhase::GameOver
        | GamePhase::HighScores
        | GamePhase::Settings
        | GamePhase::Shop
        | GamePhase::Instructions => {
            if input.command.is_some() {
                state.phase = GamePhase::Menu;
            }
        }
        GamePhase::Exited => {}
        GamePhase::Playing => play(state, input.command, now_ms),
    }
}

fn handle_menu(state: &mut GameState, command: Option<Command>, now_ms: u64) {
    let next = match command {
        Some(Command::MenuSelect(1)) => {
            state.start_game(now_ms);
            return;
        }
        Some(Command::MenuSelect(2)) => GamePhase::Shop,
        Some(Command::MenuSelect(3)) => GamePhase::Instructions,
        Some(Command::MenuSelect(4)) => GamePhase::HighScores,
        Some(Command::MenuSelect(5)) => GamePhase::Settings,
        Some(Command::MenuSelect(6)) | Some(Command::Quit) => GamePhase::Exited,
        _ => return,
    };
    log::debug!("Menu -> {:?}", next);
    state.phase = next;
}

fn play(state: &mut GameState, command: Option<Command>, now_ms: u64) {
    match command {
        Some(Command::MoveLeft) => state.baskets.iter_mut().for_each(|b| b.shift(-1)),
        Some(Command::MoveRight) => state.baskets.iter_mut().for_each(|b| b.shift(1)),
        Some(Command::PauseToggle) => {
            log::debug!("Paused at {}ms", now_ms);
            state.phase = GamePhase::Paused;
            state.push_event(GameEvent::Paused);
            return;
        }
        Some(Command::Quit) => {
            state.finish_game(now_ms);
            return;
        }
        Some(Command::MenuSelect(_)) | None => {}
    }

    state.time_ticks += 1;

    if state.fruit.is_none() {
        let fruit = spawn_fruit(
            &mut state.rng,
            &mut state.special_cooldown,
            state.level,
            &state.tuning,
        );
        state.stats.fruits_spawned += 1;
        state.fruit = Some(fruit);
    }

    if !state.is_frozen(now_ms) {
        move_fruit(state, now_ms);
    }

    let landed = state
        .fruit
        .as_ref()
        .is_some_and(|f| f.y >= LANDING_ROW);
    if landed {
        if let Some(fruit) = state.fruit.take() {
            resolve_landing(state, fruit, now_ms);
        }
    }

    // Out of lives: nothing later in the tick may revive the game
    if state.lives == 0 {
        state.finish_game(now_ms);
        return;
    }

    update_level(state);
    update_powerup(state, now_ms);
    update_effects(state, now_ms);
    update_schedule(state, now_ms);
    particles::update(&mut state.particles, now_ms);

    state.check_achievements(false);
}

/// Gravity, speed boost and magnet drift
fn move_fruit(state: &mut GameState, now_ms: u64) {
    let boosted = state.effects.is_active(EffectKind::SpeedBoost, now_ms);
    let magnet = state.magnet_active(now_ms);
    let Some(fruit) = state.fruit.as_mut() else {
        return;
    };

    fruit.vy += state.tuning.gravity;
    let step = if boosted {
        fruit.vy * state.tuning.speed_boost_factor
    } else {
        fruit.vy
    };
    fruit.y += step;

    if magnet {
        let target = state
            .baskets
            .iter()
            .filter(|b| b.kind == fruit.kind)
            .min_by_key(|b| (b.x - fruit.x).abs())
            .map(|b| b.x);
        if let Some(tx) = target {
            fruit.x += (tx - fruit.x).signum();
        }
    }

    if boosted && state.particles_enabled {
        let origin = Vec2::new(fruit.x as f32, fruit.y.min(LANDING_ROW - 1.0));
        particles::burst(
            &mut state.particles,
            &mut state.rng,
            origin,
            ParticleKind::Trail,
            1,
            None,
            now_ms,
        );
    }
}

fn resolve_landing(state: &mut GameState, fruit: FallingFruit, now_ms: u64) {
    let basket_x = state
        .baskets
        .iter()
        .find(|b| b.kind == fruit.kind && b.covers(fruit.x))
        .map(|b| b.x);
    let origin = Vec2::new(fruit.x as f32, LANDING_ROW - 1.0);

    match basket_x {
        Some(bx) => {
            let mut points = fruit.kind.points();
            if state.effects.is_active(EffectKind::DoubleScore, now_ms) {
                points *= 2;
            }
            if state.effects.is_active(EffectKind::Magnet, now_ms)
                && (fruit.x - bx).abs() < state.tuning.magnet_bonus_radius
            {
                points *= 2;
            }
            if state.powerup_active(PowerupKind::DoublePoints, now_ms) {
                points *= 2;
            }
            let multiplier = state.combo.record_catch(&state.tuning);
            let total = points * multiplier as u64;
            state.score += total;

            state.stats.caught += 1;
            if fruit.kind.is_special() {
                state.stats.special_caught += 1;
            }
            *state.stats.caught_by_kind.entry(fruit.kind).or_insert(0) += 1;

            let combo = state.combo.combo;
            for challenge in &mut state.challenges {
                challenge.on_catch(fruit.kind, combo);
            }

            if state.particles_enabled {
                particles::burst(
                    &mut state.particles,
                    &mut state.rng,
                    origin,
                    ParticleKind::Sparkle,
                    5,
                    Some(palette::GREEN),
                    now_ms,
                );
                particles::burst(
                    &mut state.particles,
                    &mut state.rng,
                    origin,
                    ParticleKind::ScorePopup,
                    1,
                    Some(palette::YELLOW),
                    now_ms,
                );
                if fruit.kind.is_special() {
                    particles::burst(
                        &mut state.particles,
                        &mut state.rng,
                        origin,
                        ParticleKind::Explosion,
                        10,
                        None,
                        now_ms,
                    );
                }
            }
            state.push_event(GameEvent::Caught {
                kind: fruit.kind,
                points: total,
            });
        }
        None => {
            state.lives = state.lives.saturating_sub(1);
            state.combo.record_miss();
            state.stats.missed += 1;
            for challenge in &mut state.challenges {
                challenge.on_miss();
            }
            if state.particles_enabled {
                particles::burst(
                    &mut state.particles,
                    &mut state.rng,
                    origin,
                    ParticleKind::Explosion,
                    5,
                    Some(palette::RED),
                    now_ms,
                );
            }
            log::debug!(
                "Missed {} at column {}, {} lives left",
                fruit.kind.name(),
                fruit.x,
                state.lives
            );
            state.push_event(GameEvent::Missed { kind: fruit.kind });
        }
    }
}

/// Fire one level-up per threshold crossed
fn update_level(state: &mut GameState) {
    while state.level < MAX_LEVEL
        && state.score >= state.level as u64 * state.tuning.level_score_step
    {
        state.level += 1;
        let level = state.level;
        state.game_speed_ms = state.tuning.game_speed_ms(level, state.difficulty.index());
        let coins = level as u64 * state.tuning.coins_per_level;
        state.coins += coins;
        log::info!(
            "Level up: {} (speed {}ms, +{} coins)",
            level,
            state.game_speed_ms,
            coins
        );
        state.push_event(GameEvent::LevelUp { level, coins });

        let tuning = &state.tuning;
        if level % tuning.basket_widen_every == 0 && level <= tuning.basket_widen_until_level {
            let max = tuning.max_basket_width;
            for basket in &mut state.baskets {
                basket.width = (basket.width + 1).min(max);
                basket.shift(0);
            }
            let width = state.baskets.first().map_or(0, |b| b.width);
            state.push_event(GameEvent::BasketsWidened { width });
        }
    }
}

/// Apply a power-up now. Instant kinds take effect and are not held.
pub fn grant_powerup(state: &mut GameState, kind: PowerupKind, now_ms: u64) {
    state.stats.powerups_collected += 1;
    log::info!("Power-up granted: {}", kind.name());
    if kind.is_instant() {
        state.powerup = None;
        match kind {
            PowerupKind::ExtraLife => state.lives = (state.lives + 1).min(MAX_LIVES),
            PowerupKind::ScoreBoost => state.score += state.tuning.score_boost_points,
            _ => {}
        }
    } else {
        let duration = state.tuning.powerup_duration_ms;
        state.powerup = Some(ActivePowerup::new(kind, now_ms, duration));
    }
    state.push_event(GameEvent::PowerupGranted(kind));
}

fn update_powerup(state: &mut GameState, now_ms: u64) {
    if let Some(kind) = state
        .powerup
        .as_ref()
        .filter(|p| p.is_expired(now_ms))
        .map(|p| p.kind)
    {
        state.powerup = None;
        log::debug!("Power-up ended: {}", kind.name());
        state.push_event(GameEvent::PowerupEnded(kind));
    }

    if state.powerup.is_none() && state.rng.percent(state.tuning.powerup_chance) {
        if let Some(kind) = state.rng.pick(&PowerupKind::ALL) {
            grant_powerup(state, kind, now_ms);
        }
    }
}

fn update_effects(state: &mut GameState, now_ms: u64) {
    for kind in state.effects.update(now_ms) {
        state.push_event(GameEvent::EffectEnded(kind));
    }

    if state.scheduler.bonus_active(now_ms) || !state.rng.percent(state.tuning.effect_chance) {
        return;
    }
    let duration = state.tuning.effect_duration_ms;
    if let Some(kind) = state
        .effects
        .activate_random_inactive(&mut state.rng, now_ms, duration)
    {
        state.stats.effects_activated += 1;
        log::debug!("Effect activated: {}", kind.name());
        state.push_event(GameEvent::EffectActivated(kind));
    }
}

/// Bonus mode, challenge rotation and challenge outcomes
fn update_schedule(state: &mut GameState, now_ms: u64) {
    if state.scheduler.expire_bonus(now_ms) {
        state.push_event(GameEvent::BonusEnded);
    }

    if state.scheduler.take_bonus(now_ms, &state.tuning) {
        log::info!("Bonus mode at {}ms", now_ms);
        state.push_event(GameEvent::BonusStarted);
        if let Some(kind) = state.rng.pick(&EffectKind::ALL) {
            let color = state.rng.below(COLOR_COUNT as usize) as u8;
            let duration = state.tuning.bonus_duration_ms;
            state.effects.activate(kind, now_ms, duration, color);
            state.stats.effects_activated += 1;
            state.push_event(GameEvent::EffectActivated(kind));
        }
    }

    if state.scheduler.take_challenge(now_ms, &state.tuning) {
        if let Some(challenge) = state.challenges.iter_mut().find(|c| !c.is_active()) {
            challenge.activate(now_ms);
            let kind = challenge.kind;
            log::info!("Challenge started: {:?}", kind);
            state.push_event(GameEvent::ChallengeStarted(kind));
        }
    }

    let timeout = state.tuning.challenge_timeout_ms;
    let outcomes: Vec<_> = state
        .challenges
        .iter_mut()
        .filter_map(|c| c.evaluate(now_ms, timeout).map(|o| (c.kind, o)))
        .collect();
    for (kind, outcome) in outcomes {
        log::info!("Challenge {:?}: {:?}", kind, outcome);
        match outcome {
            ChallengeOutcome::Completed => {
                state.stats.challenges_completed += 1;
                state.push_event(GameEvent::ChallengeCompleted(kind));
            }
            ChallengeOutcome::Failed => {
                state.stats.challenges_failed += 1;
                state.push_event(GameEvent::ChallengeFailed(kind));
            }
        }
    }
}

/// Simple demo AI: steer the basket matching the falling fruit under it
pub fn autopilot(state: &GameState) -> Option<Command> {
    if state.phase != GamePhase::Playing {
        return None;
    }
    let fruit = state.fruit.as_ref()?;
    let basket = state.baskets.iter().find(|b| b.kind == fruit.kind)?;
    match fruit.x.cmp(&basket.x) {
        std::cmp::Ordering::Less => Some(Command::MoveLeft),
        std::cmp::Ordering::Greater => Some(Command::MoveRight),
        std::cmp::Ordering::Equal => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Difficulty;
    use crate::sim::catalog::FruitKind;
    use crate::sim::challenge::{Challenge, ChallengeKind};
    use crate::tuning::Tuning;

    const APPLE_BASKET_X: i32 = 11;

    fn playing_state() -> GameState {
        let mut state = GameState::new(12345, Tuning::calm(), Difficulty::Easy);
        state.start_game(0);
        state
    }

    /// Put a fruit one step above the landing row
    fn drop_on(state: &mut GameState, kind: FruitKind, x: i32) {
        state.fruit = Some(FallingFruit {
            kind,
            x,
            y: LANDING_ROW - 0.5,
            vy: 0.0,
        });
    }

    fn idle() -> TickInput {
        TickInput::default()
    }

    #[test]
    fn test_menu_start_and_exit() {
        let mut state = GameState::new(1, Tuning::calm(), Difficulty::Normal);
        tick(&mut state, &idle(), 0);
        assert_eq!(state.phase, GamePhase::Menu);

        tick(&mut state, &TickInput::command(Command::MenuSelect(4)), 0);
        assert_eq!(state.phase, GamePhase::HighScores);
        tick(&mut state, &TickInput::command(Command::MoveLeft), 0);
        assert_eq!(state.phase, GamePhase::Menu);

        tick(&mut state, &TickInput::command(Command::MenuSelect(1)), 100);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.stats.started_at_ms, 100);

        let mut other = GameState::new(1, Tuning::calm(), Difficulty::Normal);
        tick(&mut other, &TickInput::command(Command::MenuSelect(6)), 0);
        assert_eq!(other.phase, GamePhase::Exited);
    }

    #[test]
    fn test_spawns_single_fruit() {
        let mut state = playing_state();
        tick(&mut state, &idle(), 0);
        let fruit = state.fruit.clone().unwrap();
        assert_eq!(fruit.vy, 1.5);
        assert_eq!(fruit.y, 1.5);
        assert!(fruit.x >= 5 && fruit.x < SCREEN_WIDTH - 5);
        assert_eq!(state.stats.fruits_spawned, 1);

        tick(&mut state, &idle(), 100);
        assert_eq!(state.stats.fruits_spawned, 1);
    }

    #[test]
    fn test_first_catch_scores_base_points() {
        let mut state = playing_state();
        drop_on(&mut state, FruitKind::Apple, APPLE_BASKET_X);
        tick(&mut state, &idle(), 0);

        assert_eq!(state.score, 10);
        assert_eq!(state.combo.combo, 1);
        assert_eq!(state.stats.caught, 1);
        assert!(state.fruit.is_none());
        assert!(state.events.contains(&GameEvent::Caught {
            kind: FruitKind::Apple,
            points: 10
        }));
    }

    #[test]
    fn test_tenth_consecutive_catch_scores_triple() {
        let mut state = playing_state();
        for i in 0..9 {
            drop_on(&mut state, FruitKind::Apple, APPLE_BASKET_X);
            tick(&mut state, &idle(), i * 10);
        }
        let before = state.score;
        drop_on(&mut state, FruitKind::Apple, APPLE_BASKET_X);
        tick(&mut state, &idle(), 100);
        assert_eq!(state.score - before, 30);
        assert_eq!(state.combo.multiplier, 3);
    }

    #[test]
    fn test_miss_resets_combo_and_costs_life() {
        let mut state = playing_state();
        for i in 0..7 {
            drop_on(&mut state, FruitKind::Apple, APPLE_BASKET_X);
            tick(&mut state, &idle(), i * 10);
        }
        assert_eq!(state.combo.multiplier, 2);

        drop_on(&mut state, FruitKind::Apple, 100);
        tick(&mut state, &idle(), 100);
        assert_eq!(state.lives, MAX_LIVES - 1);
        assert_eq!(state.combo.combo, 0);
        assert_eq!(state.combo.multiplier, 1);
        assert_eq!(state.combo.max_combo, 7);
        assert_eq!(state.stats.missed, 1);
        assert_eq!(state.messages.front().map(String::as_str), Some("Missed! Lost a life"));
    }

    #[test]
    fn test_wrong_basket_is_a_miss() {
        let mut state = playing_state();
        // Banana lands inside the apple basket
        drop_on(&mut state, FruitKind::Banana, APPLE_BASKET_X);
        tick(&mut state, &idle(), 0);
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, MAX_LIVES - 1);
    }

    #[test]
    fn test_accuracy_target_drops_per_miss() {
        let mut state = playing_state();
        let mut challenge = Challenge::new(ChallengeKind::Accuracy);
        challenge.activate(0);
        state.challenges = vec![challenge];

        for i in 0..3 {
            drop_on(&mut state, FruitKind::Apple, 100);
            tick(&mut state, &idle(), i * 10);
        }
        assert_eq!(state.challenges[0].target, 97);
        assert!(state.challenges[0].is_active());
    }

    #[test]
    fn test_freeze_holds_fruit_then_resumes() {
        let mut state = playing_state();
        state.fruit = Some(FallingFruit {
            kind: FruitKind::Grape,
            x: 80,
            y: 10.0,
            vy: 1.0,
        });
        grant_powerup(&mut state, PowerupKind::FreezeTime, 0);

        for t in 0..5 {
            tick(&mut state, &idle(), t * 1_000);
            assert_eq!(state.fruit.as_ref().map(|f| f.y), Some(10.0));
        }
        tick(&mut state, &idle(), 5_000);
        assert_eq!(state.fruit.as_ref().map(|f| f.y), Some(11.5));
        assert!(state.powerup.is_none());
        assert!(state.events.contains(&GameEvent::PowerupEnded(PowerupKind::FreezeTime)));
    }

    #[test]
    fn test_magnet_nudges_toward_basket() {
        let mut state = playing_state();
        state.fruit = Some(FallingFruit {
            kind: FruitKind::Apple,
            x: 20,
            y: 5.0,
            vy: 0.0,
        });
        grant_powerup(&mut state, PowerupKind::Magnet, 0);
        tick(&mut state, &idle(), 10);
        tick(&mut state, &idle(), 20);
        assert_eq!(state.fruit.as_ref().map(|f| f.x), Some(18));
    }

    #[test]
    fn test_double_score_and_magnet_bonus_stack() {
        let mut state = playing_state();
        state.effects.activate(EffectKind::DoubleScore, 0, 10_000, 0);
        state.effects.activate(EffectKind::Magnet, 0, 10_000, 0);
        drop_on(&mut state, FruitKind::Apple, APPLE_BASKET_X);
        tick(&mut state, &idle(), 10);
        assert_eq!(state.score, 40);
    }

    #[test]
    fn test_instant_powerups() {
        let mut state = playing_state();
        grant_powerup(&mut state, PowerupKind::ExtraLife, 0);
        assert_eq!(state.lives, MAX_LIVES);

        state.lives = 2;
        grant_powerup(&mut state, PowerupKind::ExtraLife, 0);
        assert_eq!(state.lives, 3);

        grant_powerup(&mut state, PowerupKind::ScoreBoost, 0);
        assert_eq!(state.score, 50);
        assert!(state.powerup.is_none());
        assert_eq!(state.stats.powerups_collected, 3);
    }

    #[test]
    fn test_last_life_ends_game_despite_powerup_roll() {
        let tuning = Tuning {
            powerup_chance: 100,
            ..Tuning::calm()
        };
        for seed in 0..200 {
            let mut state = GameState::new(seed, tuning.clone(), Difficulty::Easy);
            state.start_game(0);
            state.lives = 1;
            drop_on(&mut state, FruitKind::Apple, 100);
            tick(&mut state, &idle(), 10);

            assert_eq!(state.phase, GamePhase::GameOver, "seed {}", seed);
            assert_eq!(state.lives, 0, "seed {}", seed);
            assert!(state.powerup.is_none());
            assert_eq!(state.stats.powerups_collected, 0);
        }
    }

    #[test]
    fn test_level_achievement_sees_new_level() {
        let mut state = playing_state();
        state.level = 9;
        state.score = 895;
        drop_on(&mut state, FruitKind::Apple, APPLE_BASKET_X);
        tick(&mut state, &idle(), 10);

        assert_eq!(state.score, 905);
        assert_eq!(state.level, 10);
        assert!(state.achievements.is_unlocked(crate::sim::AchievementKind::ProPlayer));
        assert!(state.events.contains(&GameEvent::AchievementUnlocked(
            crate::sim::AchievementKind::ProPlayer
        )));
    }

    #[test]
    fn test_power_master_unlocks_on_granting_tick() {
        let mut state = GameState::new(
            5,
            Tuning {
                powerup_chance: 100,
                ..Tuning::calm()
            },
            Difficulty::Easy,
        );
        state.start_game(0);
        state.stats.powerups_collected = 19;
        state.fruit = Some(FallingFruit {
            kind: FruitKind::Grape,
            x: 80,
            y: 5.0,
            vy: 0.0,
        });
        tick(&mut state, &idle(), 10);

        assert_eq!(state.stats.powerups_collected, 20);
        assert!(state.achievements.is_unlocked(crate::sim::AchievementKind::PowerMaster));
    }

    #[test]
    fn test_level_loop_fires_per_threshold() {
        let mut state = playing_state();
        state.score = 450;
        state.fruit = Some(FallingFruit {
            kind: FruitKind::Grape,
            x: 80,
            y: 5.0,
            vy: 0.0,
        });
        tick(&mut state, &idle(), 10);

        assert_eq!(state.level, 5);
        assert_eq!(state.coins, 20 + 30 + 40 + 50);
        assert_eq!(state.game_speed_ms, 225);
        assert!(state.baskets.iter().all(|b| b.width == 4));
        let level_ups = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::LevelUp { .. }))
            .count();
        assert_eq!(level_ups, 4);
    }

    #[test]
    fn test_level_capped() {
        let mut state = playing_state();
        state.score = u64::MAX / 2;
        tick(&mut state, &idle(), 10);
        assert_eq!(state.level, MAX_LEVEL);
        assert!(state.baskets.iter().all(|b| b.width <= state.tuning.max_basket_width));
    }

    #[test]
    fn test_pause_freezes_simulation() {
        let mut state = playing_state();
        tick(&mut state, &idle(), 0);
        tick(&mut state, &TickInput::command(Command::PauseToggle), 100);
        assert_eq!(state.phase, GamePhase::Paused);

        let held = state.fruit.clone();
        tick(&mut state, &TickInput::command(Command::MoveLeft), 200);
        tick(&mut state, &idle(), 300);
        assert_eq!(state.fruit, held);

        tick(&mut state, &TickInput::command(Command::PauseToggle), 400);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_game_over_after_last_life() {
        let mut state = playing_state();
        for i in 0..MAX_LIVES as u64 {
            drop_on(&mut state, FruitKind::Apple, 100);
            tick(&mut state, &idle(), i * 1_000);
        }
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.lives, 0);
        assert_eq!(state.stats.games_played, 1);

        let summary = state.summary.clone().unwrap();
        assert_eq!(summary.missed, 5);
        assert_eq!(summary.duration_ms, 4_000);
        assert!(summary.new_achievements.contains(&crate::sim::AchievementKind::RookieCollector));

        tick(&mut state, &TickInput::command(Command::MoveLeft), 5_000);
        assert_eq!(state.phase, GamePhase::Menu);
    }

    #[test]
    fn test_quit_ends_game() {
        let mut state = playing_state();
        drop_on(&mut state, FruitKind::Apple, APPLE_BASKET_X);
        tick(&mut state, &idle(), 0);
        tick(&mut state, &TickInput::command(Command::Quit), 10);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.fruit.is_none());
        assert!(state.achievements.is_unlocked(crate::sim::AchievementKind::PerfectGame));
    }

    #[test]
    fn test_bonus_mode_window() {
        let mut state = playing_state();
        tick(&mut state, &idle(), 30_000);
        assert!(state.events.contains(&GameEvent::BonusStarted));
        assert!(state.scheduler.bonus_active(30_000));
        assert_eq!(state.effects.active().count(), 1);

        tick(&mut state, &idle(), 40_000);
        assert!(state.events.contains(&GameEvent::BonusEnded));
    }

    #[test]
    fn test_challenge_rotation() {
        let mut state = playing_state();
        state.challenges = vec![Challenge::new(ChallengeKind::Speed)];
        tick(&mut state, &idle(), 60_000);
        assert!(state.challenges[0].is_active());
        assert!(state.events.contains(&GameEvent::ChallengeStarted(ChallengeKind::Speed)));

        tick(&mut state, &idle(), 120_000);
        assert!(state.events.contains(&GameEvent::ChallengeFailed(ChallengeKind::Speed)));
        assert_eq!(state.stats.challenges_failed, 1);
    }

    #[test]
    fn test_determinism() {
        let inputs = [
            TickInput::default(),
            TickInput::command(Command::MoveLeft),
            TickInput::command(Command::MoveRight),
            TickInput::default(),
        ];
        let mut a = GameState::new(99999, Tuning::default(), Difficulty::Hard);
        let mut b = GameState::new(99999, Tuning::default(), Difficulty::Hard);
        a.start_game(0);
        b.start_game(0);

        for i in 0..400u64 {
            let input = &inputs[(i % inputs.len() as u64) as usize];
            tick(&mut a, input, i * 150);
            tick(&mut b, input, i * 150);
        }
        assert_eq!(a.score, b.score);
        assert_eq!(a.level, b.level);
        assert_eq!(a.lives, b.lives);
        assert_eq!(a.fruit, b.fruit);
        assert_eq!(a.messages, b.messages);
    }

    #[test]
    fn test_resume_from_save() {
        let mut state = GameState::new(777, Tuning::default(), Difficulty::Normal);
        state.start_game(0);
        for i in 0..50u64 {
            let input = TickInput {
                command: autopilot(&state),
            };
            tick(&mut state, &input, i * 200);
        }

        let saved = serde_json::to_string(&state).unwrap();
        let mut restored: GameState = serde_json::from_str(&saved).unwrap();

        for i in 50..300u64 {
            let input = TickInput {
                command: autopilot(&state),
            };
            tick(&mut state, &input, i * 200);
            tick(&mut restored, &input, i * 200);
        }
        assert_eq!(
            serde_json::to_string(&state).unwrap(),
            serde_json::to_string(&restored).unwrap()
        );
    }

    #[test]
    fn test_autopilot_steers_matching_basket() {
        let mut state = playing_state();
        state.fruit = Some(FallingFruit {
            kind: FruitKind::Apple,
            x: 30,
            y: 1.0,
            vy: 1.0,
        });
        assert_eq!(autopilot(&state), Some(Command::MoveRight));
        state.fruit.as_mut().unwrap().x = APPLE_BASKET_X;
        assert_eq!(autopilot(&state), None);
    }
}
