use rand::rngs::StdRng;
use serde::Serialize;

use crate::body::{Body, Cell};
use crate::config::{ConfigError, GameConfig, GridSize};
use crate::food::{FoodPlacer, RandomPlacer};
use crate::input::{resolve, Direction, InputBuffer};
use crate::score::HighScoreTable;

/// Current high-level gameplay state.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub enum GameStatus {
    Running,
    GameOver,
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub enum EndCause {
    WallCollision,
    SelfCollision,
    /// The body covers every cell, so no food can be placed.
    BoardFilled,
}

/// Render-ready copy of the visible state.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Snapshot {
    pub body: Vec<Cell>,
    pub food: Option<Cell>,
    pub score: u32,
}

/// Result of one tick.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct TickReport {
    pub status: GameStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<EndCause>,
    pub snapshot: Snapshot,
}

/// Emitted once when a session ends.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct GameOver {
    pub player_name: String,
    pub score: u32,
    pub cause: EndCause,
    /// Rank reached in the high-score table, if the score made it in.
    pub rank: Option<usize>,
}

/// Complete mutable state for one play session.
#[derive(Debug, Clone)]
pub struct Session {
    pub body: Body,
    pub food: Option<Cell>,
    pub heading: Direction,
    pub score: u32,
    pub status: GameStatus,
    pub cause: Option<EndCause>,
    pub tick_count: u64,
    input: InputBuffer,
    player_name: String,
    grid: GridSize,
    food_reward: u32,
}

impl Session {
    /// Creates a fresh session: one-cell body at the origin, score zero,
    /// initial heading, empty input and newly placed food.
    pub fn start<P: FoodPlacer + ?Sized>(
        player_name: &str,
        config: &GameConfig,
        placer: &mut P,
    ) -> Self {
        let player_name = if player_name.trim().is_empty() {
            config.default_player_name.clone()
        } else {
            player_name.to_owned()
        };
        let body = Body::new(config.origin);
        let food = placer.place(config.grid_size, &body);
        let input = match config.input_capacity {
            Some(capacity) => InputBuffer::bounded(capacity),
            None => InputBuffer::new(),
        };

        let mut session = Self {
            body,
            food,
            heading: config.initial_heading,
            score: 0,
            status: GameStatus::Running,
            cause: None,
            tick_count: 0,
            input,
            player_name,
            grid: config.grid_size,
            food_reward: config.food_reward,
        };
        if session.food.is_none() {
            session.finish(EndCause::BoardFilled);
        }
        session
    }

    /// Queues a direction request for a later tick.
    ///
    /// Returns `false` when the request was not kept, either because the
    /// session is over or because a bounded buffer is full.
    pub fn enqueue_direction(&mut self, direction: Direction) -> bool {
        if self.status != GameStatus::Running {
            return false;
        }
        self.input.enqueue(direction)
    }

    /// Advances the simulation by one tick.
    ///
    /// A finished session is left untouched and reports its final state.
    pub fn tick<P: FoodPlacer + ?Sized>(&mut self, placer: &mut P) -> TickReport {
        if self.status != GameStatus::Running {
            return self.report();
        }

        self.tick_count += 1;
        if let Some(requested) = self.input.dequeue() {
            self.heading = resolve(self.heading, requested);
        }

        let candidate = self.body.head().step(self.heading);
        if !self.grid.contains(candidate) {
            self.finish(EndCause::WallCollision);
            return self.report();
        }

        let captures = self.food == Some(candidate);
        if self.body.would_collide(candidate, captures) {
            self.finish(EndCause::SelfCollision);
            return self.report();
        }

        if captures {
            self.body.grow_head(candidate);
            self.score = self.score.saturating_add(self.food_reward);
            log::debug!(
                "tick {}: captured food at ({}, {}), length {}, score {}",
                self.tick_count,
                candidate.x,
                candidate.y,
                self.body.len(),
                self.score,
            );

            self.food = placer.place(self.grid, &self.body);
            if self.food.is_none() {
                self.finish(EndCause::BoardFilled);
            }
        } else {
            self.body.move_to(candidate);
        }

        self.report()
    }

    /// Returns the current status, cause and snapshot.
    #[must_use]
    pub fn report(&self) -> TickReport {
        TickReport {
            status: self.status,
            cause: self.cause,
            snapshot: self.snapshot(),
        }
    }

    /// Copies the body, food and score for rendering.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            body: self.body.to_vec(),
            food: self.food,
            score: self.score,
        }
    }

    /// Returns the name the score will be recorded under.
    #[must_use]
    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    /// Number of direction requests waiting for upcoming ticks.
    #[must_use]
    pub fn pending_inputs(&self) -> usize {
        self.input.len()
    }

    fn finish(&mut self, cause: EndCause) {
        self.status = GameStatus::GameOver;
        self.cause = Some(cause);
        self.input.clear();
    }
}

/// Owns the configuration, the high-score table and the current session.
///
/// This is the boundary a frontend talks to: it feeds directions in, calls
/// [`Game::tick`] on its own schedule and stops ticking once the report says
/// [`GameStatus::GameOver`].
#[derive(Debug)]
pub struct Game<P = RandomPlacer<StdRng>> {
    config: GameConfig,
    placer: P,
    high_scores: HighScoreTable,
    session: Option<Session>,
    game_over: Option<GameOver>,
}

impl Game<RandomPlacer<StdRng>> {
    /// Creates a game whose food placement is reproducible from `seed`.
    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::new(config, RandomPlacer::seeded(seed))
    }
}

impl<P: FoodPlacer> Game<P> {
    /// Validates `config` and creates a game with no session running yet.
    pub fn new(config: GameConfig, placer: P) -> Result<Self, ConfigError> {
        config.validate()?;
        let high_scores = HighScoreTable::with_capacity(config.high_score_capacity);

        Ok(Self {
            config,
            placer,
            high_scores,
            session: None,
            game_over: None,
        })
    }

    /// Replaces any current session with a fresh one.
    ///
    /// An abandoned session's score is not recorded.
    pub fn start_session(&mut self, player_name: &str) -> &Session {
        let session = Session::start(player_name, &self.config, &mut self.placer);
        log::info!(
            "session started for {} at ({}, {})",
            session.player_name(),
            self.config.origin.x,
            self.config.origin.y,
        );

        self.game_over = None;
        let session = self.session.insert(session);
        if let Some(cause) = session.cause {
            // Nowhere to put food on a one-cell grid.
            self.game_over = Some(finalize(&mut self.high_scores, session, cause));
        }
        session
    }

    /// Queues a direction for the running session.
    pub fn enqueue_direction(&mut self, direction: Direction) -> bool {
        self.session
            .as_mut()
            .is_some_and(|session| session.enqueue_direction(direction))
    }

    /// Parses and queues a raw input token; unrecognised tokens are ignored.
    pub fn enqueue_token(&mut self, token: &str) -> bool {
        match Direction::from_token(token) {
            Some(direction) => self.enqueue_direction(direction),
            None => {
                log::trace!("ignoring input token {token:?}");
                false
            }
        }
    }

    /// Advances the current session by one tick.
    ///
    /// Returns `None` before the first [`Game::start_session`]. The tick that
    /// ends a session records its score and makes a [`GameOver`] available
    /// through [`Game::take_game_over`].
    pub fn tick(&mut self) -> Option<TickReport> {
        let session = self.session.as_mut()?;
        let was_running = session.status == GameStatus::Running;
        let report = session.tick(&mut self.placer);

        if let (true, Some(cause)) = (was_running, report.cause) {
            self.game_over = Some(finalize(&mut self.high_scores, session, cause));
        }

        Some(report)
    }

    /// Hands out the pending game-over event, if any.
    pub fn take_game_over(&mut self) -> Option<GameOver> {
        self.game_over.take()
    }

    #[must_use]
    pub fn high_scores(&self) -> &HighScoreTable {
        &self.high_scores
    }

    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Mutable access to the running session, for scenario setup.
    pub fn session_mut(&mut self) -> Option<&mut Session> {
        self.session.as_mut()
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}

fn finalize(high_scores: &mut HighScoreTable, session: &Session, cause: EndCause) -> GameOver {
    let rank = high_scores.record(session.player_name(), session.score);
    log::info!(
        "game over for {}: {:?} after {} ticks, score {}, rank {:?}",
        session.player_name(),
        cause,
        session.tick_count,
        session.score,
        rank,
    );

    GameOver {
        player_name: session.player_name().to_owned(),
        score: session.score,
        cause,
        rank,
    }
}

#[cfg(test)]
mod tests {
    use crate::body::{Body, Cell};
    use crate::config::{GameConfig, GridSize};
    use crate::food::ScriptedPlacer;
    use crate::input::Direction;

    use super::{EndCause, Game, GameStatus, Session};

    fn config(cells: u16, origin: Cell) -> GameConfig {
        GameConfig {
            grid_size: GridSize::new(cells),
            origin,
            ..GameConfig::default()
        }
    }

    fn body(cells: &[(i32, i32)]) -> Body {
        Body::from_cells(cells.iter().map(|&(x, y)| Cell::new(x, y)).collect())
            .expect("test body should not be empty")
    }

    #[test]
    fn session_starts_fresh() {
        let mut placer = ScriptedPlacer::new([Cell::new(0, 0)]);
        let session = Session::start("", &GameConfig::default(), &mut placer);

        assert_eq!(session.body.to_vec(), vec![Cell::new(10, 10)]);
        assert_eq!(session.heading, Direction::Right);
        assert_eq!(session.food, Some(Cell::new(0, 0)));
        assert_eq!(session.score, 0);
        assert_eq!(session.status, GameStatus::Running);
        assert_eq!(session.player_name(), "Anonymous");
    }

    #[test]
    fn snake_moves_one_cell_per_tick() {
        let mut placer = ScriptedPlacer::new([Cell::new(0, 0)]);
        let mut session = Session::start("p", &config(10, Cell::new(5, 5)), &mut placer);

        let report = session.tick(&mut placer);

        assert_eq!(report.status, GameStatus::Running);
        assert_eq!(report.snapshot.body, vec![Cell::new(6, 5)]);
        assert_eq!(session.tick_count, 1);
    }

    #[test]
    fn snake_grows_and_scores_after_eating_food() {
        let mut placer = ScriptedPlacer::new([Cell::new(6, 5), Cell::new(0, 0)]);
        let mut session = Session::start("p", &config(10, Cell::new(5, 5)), &mut placer);

        let report = session.tick(&mut placer);

        assert_eq!(report.snapshot.body, vec![Cell::new(6, 5), Cell::new(5, 5)]);
        assert_eq!(report.snapshot.score, 10);
        assert_eq!(report.snapshot.food, Some(Cell::new(0, 0)));

        session.tick(&mut placer);
        assert_eq!(session.body.len(), 2);
    }

    #[test]
    fn score_saturates_instead_of_overflowing() {
        let config = GameConfig {
            food_reward: u32::MAX,
            ..config(10, Cell::new(0, 0))
        };
        let mut placer = ScriptedPlacer::new([Cell::new(1, 0), Cell::new(2, 0), Cell::new(9, 9)]);
        let mut session = Session::start("p", &config, &mut placer);

        session.tick(&mut placer);
        let report = session.tick(&mut placer);

        assert_eq!(report.status, GameStatus::Running);
        assert_eq!(report.snapshot.score, u32::MAX);
        assert_eq!(report.snapshot.body.len(), 3);
    }

    #[test]
    fn oversized_capacities_do_not_reach_the_game() {
        let config = GameConfig {
            input_capacity: Some(usize::MAX),
            ..GameConfig::default()
        };

        assert!(Game::with_seed(config, 1).is_err());
    }

    #[test]
    fn snake_collision_with_wall_sets_game_over() {
        let mut placer = ScriptedPlacer::new([Cell::new(0, 0)]);
        let mut session = Session::start("p", &config(4, Cell::new(3, 1)), &mut placer);

        let report = session.tick(&mut placer);

        assert_eq!(report.status, GameStatus::GameOver);
        assert_eq!(report.cause, Some(EndCause::WallCollision));
        assert_eq!(report.snapshot.body, vec![Cell::new(3, 1)]);
    }

    #[test]
    fn snake_collision_with_self_sets_game_over() {
        let mut placer = ScriptedPlacer::new([Cell::new(5, 5)]);
        let mut session = Session::start("p", &config(6, Cell::new(2, 2)), &mut placer);
        session.body = body(&[(2, 2), (1, 2), (1, 3), (2, 3), (3, 3), (3, 2)]);
        session.heading = Direction::Down;

        let report = session.tick(&mut placer);

        assert_eq!(report.status, GameStatus::GameOver);
        assert_eq!(report.cause, Some(EndCause::SelfCollision));
    }

    #[test]
    fn following_own_tail_is_not_a_collision() {
        let mut placer = ScriptedPlacer::new([Cell::new(5, 5)]);
        let mut session = Session::start("p", &config(6, Cell::new(1, 0)), &mut placer);
        session.body = body(&[(1, 0), (0, 0), (0, 1), (1, 1)]);
        session.heading = Direction::Down;

        let report = session.tick(&mut placer);

        assert_eq!(report.status, GameStatus::Running);
        assert_eq!(
            report.snapshot.body,
            vec![Cell::new(1, 1), Cell::new(1, 0), Cell::new(0, 0), Cell::new(0, 1)]
        );
    }

    #[test]
    fn one_queued_direction_is_consumed_per_tick() {
        let mut placer = ScriptedPlacer::new([Cell::new(0, 0)]);
        let mut session = Session::start("p", &config(20, Cell::new(5, 5)), &mut placer);

        session.enqueue_direction(Direction::Up);
        session.enqueue_direction(Direction::Left);

        session.tick(&mut placer);
        assert_eq!(session.body.head(), Cell::new(5, 4));
        assert_eq!(session.pending_inputs(), 1);

        session.tick(&mut placer);
        assert_eq!(session.body.head(), Cell::new(4, 4));
        assert_eq!(session.pending_inputs(), 0);
    }

    #[test]
    fn reversal_request_is_ignored() {
        let mut placer = ScriptedPlacer::new([Cell::new(0, 0)]);
        let mut session = Session::start("p", &config(20, Cell::new(5, 5)), &mut placer);

        session.enqueue_direction(Direction::Left);
        session.tick(&mut placer);

        assert_eq!(session.heading, Direction::Right);
        assert_eq!(session.body.head(), Cell::new(6, 5));
    }

    #[test]
    fn finished_session_ignores_ticks_and_input() {
        let mut placer = ScriptedPlacer::new([Cell::new(0, 0)]);
        let mut session = Session::start("p", &config(4, Cell::new(3, 1)), &mut placer);

        let first = session.tick(&mut placer);
        assert!(!session.enqueue_direction(Direction::Up));
        let second = session.tick(&mut placer);

        assert_eq!(first, second);
        assert_eq!(session.tick_count, 1);
    }

    #[test]
    fn filling_the_board_ends_the_session() {
        let mut placer = ScriptedPlacer::new([Cell::new(1, 0)]);
        let mut session = Session::start("p", &config(2, Cell::new(0, 0)), &mut placer);
        session.body = body(&[(0, 0), (0, 1), (1, 1)]);

        let report = session.tick(&mut placer);

        assert_eq!(report.status, GameStatus::GameOver);
        assert_eq!(report.cause, Some(EndCause::BoardFilled));
        assert_eq!(report.snapshot.body.len(), 4);
        assert_eq!(report.snapshot.food, None);
    }

    #[test]
    fn game_records_score_once_on_game_over() {
        let placer = ScriptedPlacer::new([Cell::new(3, 0), Cell::new(0, 3)]);
        let mut game = Game::new(config(4, Cell::new(2, 0)), placer).expect("valid config");
        game.start_session("ada");

        let report = game.tick().expect("session running");
        assert_eq!(report.snapshot.score, 10);
        assert!(game.take_game_over().is_none());

        let report = game.tick().expect("session running");
        assert_eq!(report.cause, Some(EndCause::WallCollision));

        let event = game.take_game_over().expect("game over event");
        assert_eq!(event.player_name, "ada");
        assert_eq!(event.score, 10);
        assert_eq!(event.rank, Some(1));

        game.tick();
        assert!(game.take_game_over().is_none());
        assert_eq!(game.high_scores().len(), 1);
    }

    #[test]
    fn tick_without_session_reports_nothing() {
        let mut game = Game::with_seed(GameConfig::default(), 1).expect("valid config");

        assert!(game.tick().is_none());
        assert!(!game.enqueue_direction(Direction::Up));
    }

    #[test]
    fn unknown_tokens_are_ignored() {
        let mut game = Game::with_seed(GameConfig::default(), 1).expect("valid config");
        game.start_session("p");

        assert!(!game.enqueue_token("Space"));
        assert!(game.enqueue_token("ArrowDown"));
        assert_eq!(game.session().map(Session::pending_inputs), Some(1));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = GameConfig {
            high_score_capacity: 0,
            ..GameConfig::default()
        };

        assert!(Game::with_seed(config, 1).is_err());
    }
}
