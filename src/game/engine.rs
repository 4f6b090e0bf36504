use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::{debug, info, trace};

use super::{
    config::{GameConfig, TailPolicy},
    direction::Direction,
    state::{CollisionType, GameState, Phase, Position, Snake},
};

/// What a single tick did to the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The game is not running; nothing changed
    Idle,
    /// The snake moved one cell
    Moved,
    /// The snake moved onto the food and grew
    Ate,
    /// The new head hit a wall or the snake; the game is over
    Collided(CollisionType),
    /// The snake grew to cover every cell, leaving nowhere for food
    BoardFilled,
}

/// The game engine that owns the game state and handles all game logic
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
    state: GameState,
}

impl GameEngine {
    /// Create a new engine with a game that has not started yet
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Same as `new` but with reproducible food placement
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    /// Resume from an arbitrary state, e.g. a hand-built position
    pub fn with_state(config: GameConfig, state: GameState, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
            state,
        }
    }

    fn with_rng(config: GameConfig, rng: StdRng) -> Self {
        let state = Self::initial_state(&config);
        Self { config, rng, state }
    }

    fn initial_state(config: &GameConfig) -> GameState {
        GameState::new(
            Snake::new(config.initial_head),
            config.initial_food,
            config.initial_direction,
            config.grid_size,
        )
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Start a fresh game, discarding the current one
    pub fn reset(&mut self) {
        self.state = Self::initial_state(&self.config);
        self.state.phase = Phase::Running;
        info!(grid_size = self.config.grid_size, "game started");
    }

    /// Queue a turn for the next tick
    ///
    /// Ignored before the first start and when `direction` would reverse the
    /// snake onto its own neck. Returns whether the request was accepted.
    pub fn request_direction_change(&mut self, direction: Direction) -> bool {
        if !self.state.is_started() {
            return false;
        }

        if self.state.direction.is_opposite(direction) {
            debug!(current = ?self.state.direction, requested = ?direction, "rejected reversal");
            return false;
        }

        self.state.pending_direction = Some(direction);
        true
    }

    /// Flip between running and paused; returns the resulting paused flag
    pub fn toggle_pause(&mut self) -> bool {
        self.state.phase = match self.state.phase {
            Phase::Running => Phase::Paused,
            Phase::Paused => Phase::Running,
            other => other,
        };
        if self.state.is_started() && !self.state.is_over() {
            info!(paused = self.state.is_paused(), "pause toggled");
        }
        self.state.is_paused()
    }

    /// Execute one step of the game
    pub fn tick(&mut self) -> TickOutcome {
        if !self.state.is_running() {
            return TickOutcome::Idle;
        }

        if let Some(direction) = self.state.pending_direction.take() {
            self.state.direction = direction;
        }

        let new_head = self
            .state
            .snake
            .head()
            .moved_in_direction(self.state.direction);

        if let Some(collision_type) = self.check_collision(new_head) {
            self.state.phase = Phase::GameOver;
            info!(
                score = self.state.score,
                length = self.state.snake.len(),
                collision = ?collision_type,
                "game over"
            );
            return TickOutcome::Collided(collision_type);
        }

        let ate_food = self.state.food == Some(new_head);
        self.state.snake.advance(new_head, ate_food);
        self.state.steps += 1;
        trace!(x = new_head.x, y = new_head.y, "snake moved");

        if !ate_food {
            return TickOutcome::Moved;
        }

        self.state.score += self.config.food_score;
        self.state.food = self.spawn_food();
        debug!(score = self.state.score, food = ?self.state.food, "food eaten");

        if self.state.food.is_none() {
            self.state.phase = Phase::GameOver;
            info!(score = self.state.score, "board filled");
            return TickOutcome::BoardFilled;
        }

        TickOutcome::Ate
    }

    /// Check if the new head position causes a collision
    fn check_collision(&self, pos: Position) -> Option<CollisionType> {
        if !self.state.is_in_bounds(pos) {
            return Some(CollisionType::Wall);
        }

        let snake = &self.state.snake;
        let hits_body = match self.config.tail_policy {
            TailPolicy::Strict => snake.contains(pos),
            // Food never lies on the snake, so an eating move cannot reach
            // the tail either.
            TailPolicy::Vacating => snake.collides_ignoring_tail(pos),
        };

        hits_body.then_some(CollisionType::SelfCollision)
    }

    /// Pick a random empty cell, or `None` when the snake covers the grid
    fn spawn_food(&mut self) -> Option<Position> {
        let size = self.state.grid_size;
        if self.state.snake.len() >= size * size {
            return None;
        }

        let size = size as i32;
        loop {
            let x = self.rng.gen_range(0..size);
            let y = self.rng.gen_range(0..size);
            let pos = Position::new(x, y);

            if !self.state.is_occupied_by_snake(pos) {
                return Some(pos);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn snake(cells: &[(i32, i32)]) -> Snake {
        Snake::from_cells(cells.iter().map(|&(x, y)| Position::new(x, y))).unwrap()
    }

    fn running(snake: Snake, food: Position, direction: Direction) -> GameState {
        let mut state = GameState::new(snake, food, direction, 20);
        state.phase = Phase::Running;
        state
    }

    fn engine_with(config: GameConfig, state: GameState) -> GameEngine {
        GameEngine::with_state(config, state, 7)
    }

    #[test]
    fn test_new_game_waits_for_start() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), 1);
        let before = engine.state().clone();

        assert!(!engine.state().is_started());
        assert_eq!(engine.tick(), TickOutcome::Idle);
        assert!(!engine.request_direction_change(Direction::Left));
        assert!(!engine.toggle_pause());
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn test_reset() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), 1);
        engine.reset();

        let state = engine.state();
        assert!(state.is_running());
        assert_eq!(state.score, 0);
        assert_eq!(state.steps, 0);
        assert_eq!(state.snake.len(), 1);
        assert_eq!(state.snake.head(), Position::new(10, 10));
        assert_eq!(state.food, Some(Position::new(15, 15)));
        assert_eq!(state.direction, Direction::Up);
    }

    #[test]
    fn test_basic_movement() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), 1);
        engine.reset();

        assert_eq!(engine.tick(), TickOutcome::Moved);
        assert_eq!(engine.state().snake.head(), Position::new(10, 9));
        assert_eq!(engine.state().snake.len(), 1);
        assert_eq!(engine.state().steps, 1);
    }

    #[test]
    fn test_direction_applies_on_next_tick() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), 1);
        engine.reset();

        assert!(engine.request_direction_change(Direction::Left));
        assert_eq!(engine.state().direction, Direction::Up);
        assert_eq!(engine.state().pending_direction, Some(Direction::Left));

        engine.tick();
        assert_eq!(engine.state().direction, Direction::Left);
        assert_eq!(engine.state().pending_direction, None);
        assert_eq!(engine.state().snake.head(), Position::new(9, 10));
    }

    #[test]
    fn test_prevent_180_degree_turn() {
        let state = running(
            snake(&[(5, 5), (4, 5)]),
            Position::new(0, 0),
            Direction::Right,
        );
        let mut engine = engine_with(GameConfig::default(), state);

        assert!(!engine.request_direction_change(Direction::Left));
        assert_eq!(engine.state().direction, Direction::Right);
        assert_eq!(engine.state().pending_direction, None);

        engine.tick();
        assert_eq!(engine.state().snake.head(), Position::new(6, 5));
    }

    #[test]
    fn test_double_turn_cannot_reverse() {
        // Down then Left within one tick: Left is checked against Right
        let state = running(
            snake(&[(5, 5), (4, 5), (3, 5)]),
            Position::new(0, 0),
            Direction::Right,
        );
        let mut engine = engine_with(GameConfig::default(), state);

        assert!(engine.request_direction_change(Direction::Down));
        assert!(!engine.request_direction_change(Direction::Left));
        assert_eq!(engine.tick(), TickOutcome::Moved);
        assert_eq!(engine.state().snake.head(), Position::new(5, 6));
    }

    #[test]
    fn test_last_accepted_turn_wins() {
        let state = running(snake(&[(5, 5)]), Position::new(0, 0), Direction::Right);
        let mut engine = engine_with(GameConfig::default(), state);

        assert!(engine.request_direction_change(Direction::Down));
        assert!(engine.request_direction_change(Direction::Up));
        engine.tick();
        assert_eq!(engine.state().direction, Direction::Up);
    }

    #[test]
    fn test_wall_collision() {
        let state = running(
            snake(&[(19, 10), (18, 10)]),
            Position::new(3, 3),
            Direction::Right,
        );
        let mut engine = engine_with(GameConfig::default(), state.clone());

        let outcome = engine.tick();

        assert_eq!(outcome, TickOutcome::Collided(CollisionType::Wall));
        assert!(engine.state().is_over());
        assert_eq!(engine.state().snake, state.snake);
        assert_eq!(engine.state().food, state.food);
        assert_eq!(engine.state().score, state.score);
        assert_eq!(engine.state().steps, state.steps);
    }

    #[test]
    fn test_collision_keeps_queued_turn() {
        let state = running(snake(&[(19, 10)]), Position::new(3, 3), Direction::Up);
        let mut engine = engine_with(GameConfig::default(), state.clone());

        assert!(engine.request_direction_change(Direction::Right));
        let outcome = engine.tick();

        assert_eq!(outcome, TickOutcome::Collided(CollisionType::Wall));
        assert_eq!(engine.state().direction, Direction::Right);
        assert_eq!(engine.state().pending_direction, None);
        assert_eq!(engine.state().snake, state.snake);
        assert_eq!(engine.state().food, state.food);
    }

    #[test]
    fn test_wall_collision_every_edge() {
        let cases = [
            ((0, 4), Direction::Left),
            ((19, 4), Direction::Right),
            ((4, 0), Direction::Up),
            ((4, 19), Direction::Down),
        ];
        for ((x, y), direction) in cases {
            let state = running(snake(&[(x, y)]), Position::new(10, 10), direction);
            let mut engine = engine_with(GameConfig::default(), state);
            assert_eq!(
                engine.tick(),
                TickOutcome::Collided(CollisionType::Wall),
                "moving {direction:?} from ({x}, {y})"
            );
        }
    }

    #[test]
    fn test_self_collision() {
        // Head at (5,6) moving Left, body loops through (5,5)
        let state = running(
            snake(&[(5, 6), (6, 6), (6, 5), (5, 5), (4, 5)]),
            Position::new(0, 0),
            Direction::Left,
        );
        let mut engine = engine_with(GameConfig::default(), state.clone());

        assert!(engine.request_direction_change(Direction::Up));
        let outcome = engine.tick();

        assert_eq!(outcome, TickOutcome::Collided(CollisionType::SelfCollision));
        assert!(engine.state().is_over());
        assert_eq!(engine.state().snake, state.snake);
    }

    fn chasing_tail(policy: TailPolicy) -> GameEngine {
        // Square loop: head (5,5) moving Left, tail at (5,6) right below it
        let state = running(
            snake(&[(5, 5), (6, 5), (6, 6), (5, 6)]),
            Position::new(0, 0),
            Direction::Left,
        );
        let config = GameConfig {
            tail_policy: policy,
            ..Default::default()
        };
        engine_with(config, state)
    }

    #[test]
    fn test_head_may_follow_vacating_tail() {
        let mut engine = chasing_tail(TailPolicy::Vacating);
        engine.request_direction_change(Direction::Down);

        assert_eq!(engine.tick(), TickOutcome::Moved);
        assert_eq!(engine.state().snake.head(), Position::new(5, 6));
        assert_eq!(engine.state().snake.len(), 4);
    }

    #[test]
    fn test_strict_policy_counts_tail() {
        let mut engine = chasing_tail(TailPolicy::Strict);
        engine.request_direction_change(Direction::Down);

        assert_eq!(
            engine.tick(),
            TickOutcome::Collided(CollisionType::SelfCollision)
        );
        assert!(engine.state().is_over());
    }

    #[test]
    fn test_food_consumption() {
        let state = running(
            snake(&[(14, 15)]),
            Position::new(15, 15),
            Direction::Right,
        );
        let mut engine = engine_with(GameConfig::default(), state);

        let outcome = engine.tick();

        let state = engine.state();
        assert_eq!(outcome, TickOutcome::Ate);
        assert_eq!(state.snake.head(), Position::new(15, 15));
        assert_eq!(state.snake.tail(), Position::new(14, 15));
        assert_eq!(state.snake.len(), 2);
        assert_eq!(state.score, 10);
        let food = state.food.unwrap();
        assert!(!state.is_occupied_by_snake(food));
        assert!(state.is_in_bounds(food));
    }

    #[test]
    fn test_food_score_is_configurable() {
        let state = running(snake(&[(1, 1)]), Position::new(2, 1), Direction::Right);
        let config = GameConfig {
            food_score: 3,
            ..Default::default()
        };
        let mut engine = engine_with(config, state);

        engine.tick();
        assert_eq!(engine.state().score, 3);
    }

    #[test]
    fn test_board_filled() {
        let mut state = GameState::new(
            snake(&[(0, 0), (1, 0), (1, 1)]),
            Position::new(0, 1),
            Direction::Left,
            2,
        );
        state.phase = Phase::Running;
        let mut engine = engine_with(GameConfig::new(2), state);

        engine.request_direction_change(Direction::Down);
        assert_eq!(engine.tick(), TickOutcome::BoardFilled);
        assert!(engine.state().is_over());
        assert_eq!(engine.state().food, None);
        assert_eq!(engine.state().snake.len(), 4);
    }

    #[test]
    fn test_food_lands_on_last_free_cell() {
        // 3x3 board: the snake covers seven cells, eats the eighth, and only
        // (2,2) is left for the new food
        for seed in 0..20 {
            let mut state = GameState::new(
                snake(&[(0, 2), (0, 1), (1, 1), (2, 1), (2, 0), (1, 0), (0, 0)]),
                Position::new(1, 2),
                Direction::Down,
                3,
            );
            state.phase = Phase::Running;
            let mut engine = GameEngine::with_state(GameConfig::new(3), state, seed);

            assert!(engine.request_direction_change(Direction::Right));
            assert_eq!(engine.tick(), TickOutcome::Ate);
            assert_eq!(engine.state().snake.len(), 8);
            assert_eq!(engine.state().food, Some(Position::new(2, 2)), "seed {seed}");
        }
    }

    #[test]
    fn test_pause_freezes_state() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), 3);
        engine.reset();
        engine.tick();

        assert!(engine.toggle_pause());
        let frozen = engine.state().clone();
        for _ in 0..10 {
            assert_eq!(engine.tick(), TickOutcome::Idle);
        }
        assert_eq!(engine.state(), &frozen);

        assert!(!engine.toggle_pause());
        assert_eq!(engine.tick(), TickOutcome::Moved);
        assert_eq!(engine.state().snake.head(), Position::new(10, 8));
    }

    #[test]
    fn test_turn_while_paused_is_kept() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), 3);
        engine.reset();
        engine.toggle_pause();

        assert!(engine.request_direction_change(Direction::Right));
        engine.toggle_pause();
        engine.tick();
        assert_eq!(engine.state().snake.head(), Position::new(11, 10));
    }

    #[test]
    fn test_terminated_game_no_update() {
        let state = running(snake(&[(19, 0)]), Position::new(5, 5), Direction::Up);
        let mut engine = engine_with(GameConfig::default(), state);
        engine.tick();
        assert!(engine.state().is_over());
        let over = engine.state().clone();

        assert_eq!(engine.tick(), TickOutcome::Idle);
        assert!(!engine.toggle_pause());
        assert_eq!(engine.state(), &over);

        engine.reset();
        assert!(engine.state().is_running());
        assert_eq!(engine.state().snake.head(), Position::new(10, 10));
    }

    #[test]
    fn test_seeded_food_is_reproducible() {
        let run = |seed| {
            let state = running(snake(&[(0, 0)]), Position::new(1, 0), Direction::Right);
            let mut engine = GameEngine::with_state(GameConfig::default(), state, seed);
            engine.tick();
            engine.state().food
        };
        assert_eq!(run(42), run(42));
    }

    #[test]
    fn test_random_play_keeps_invariants() {
        let mut engine = GameEngine::with_seed(GameConfig::small(), 99);
        let mut steering = StdRng::seed_from_u64(5);
        engine.reset();
        let mut meals = 0;

        for _ in 0..5_000 {
            if engine.state().is_over() {
                engine.reset();
            }

            let turn = Direction::ALL[steering.gen_range(0..4)];
            engine.request_direction_change(turn);

            let before = engine.state().clone();
            let outcome = engine.tick();
            let after = engine.state();

            match outcome {
                TickOutcome::Moved => assert_eq!(after.snake.len(), before.snake.len()),
                TickOutcome::Ate => {
                    meals += 1;
                    assert_eq!(after.snake.len(), before.snake.len() + 1);
                    assert_eq!(after.score, before.score + 10);
                }
                TickOutcome::Collided(_) => {
                    assert_eq!(after.snake, before.snake);
                    assert_eq!(after.food, before.food);
                }
                TickOutcome::BoardFilled | TickOutcome::Idle => {
                    panic!("unexpected outcome {outcome:?}")
                }
            }

            let unique: HashSet<Position> = after.snake.cells().collect();
            assert_eq!(unique.len(), after.snake.len());
            assert!(after.snake.cells().all(|cell| after.is_in_bounds(cell)));
            if let Some(food) = after.food {
                assert!(!after.is_occupied_by_snake(food));
            }
        }

        assert!(meals > 0);
    }
}
