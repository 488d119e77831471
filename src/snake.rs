//! Snake on a wrapping board.
//!
//! The board has `H` rows and `W` columns; leaving one edge re-enters from the
//! opposite edge. Each call to [`SnakeGame::move_snake`] advances the snake one
//! cell. Eating the food grows the snake by one segment, and running into its own
//! body ends the game until [`SnakeGame::reset`].
//!
//! The game does not sleep or drive LEDs. When the snake dies,
//! [`MoveOutcome::GameOver`] carries a [`GameOverFlash`] whose frames the driver
//! shows before reading the next input.
//!
//! ```rust
//! use led_panel_games::panel::PanelConfig;
//! use led_panel_games::snake::{Direction, MoveOutcome, Point, SnakeGame};
//! use rand::{SeedableRng, rngs::SmallRng};
//!
//! let mut snake: SnakeGame<SmallRng, 8, 8> =
//!     SnakeGame::new(PanelConfig::new(8, 8), SmallRng::seed_from_u64(3));
//! assert_eq!(snake.body(), &[Point::new(4, 4), Point::new(3, 4), Point::new(2, 4)]);
//!
//! // Up would reverse onto the neck: ignored.
//! assert_eq!(snake.move_snake(Direction::Up), MoveOutcome::Normal);
//! assert_eq!(snake.head(), Point::new(4, 4));
//! ```

use embassy_time::Duration;
use heapless::Vec;
use rand::{Rng, RngCore};

use crate::frame::{Frame1d, RGB8};
use crate::panel::PanelConfig;

/// Default maximum snake length.
pub const DEFAULT_CAPACITY: usize = 64;

/// Color of the head.
pub const HEAD_COLOR: RGB8 = RGB8::new(0, 50, 0);
/// Color of every segment behind the head.
pub const BODY_COLOR: RGB8 = RGB8::new(0, 25, 0);
/// Color of the food.
pub const FOOD_COLOR: RGB8 = RGB8::new(40, 0, 0);

/// Color of the game-over flash.
pub const FLASH_COLOR: RGB8 = RGB8::new(30, 0, 0);
/// How long each lit and each dark flash frame is shown.
pub const FLASH_FRAME_DURATION: Duration = Duration::from_millis(200);
/// Number of game-over flashes.
pub const FLASHES: usize = 3;

/// A board cell. `row` grows downward, `col` to the right.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Point {
    /// Row, `0..H`.
    pub row: usize,
    /// Column, `0..W`.
    pub col: usize,
}

impl Point {
    /// Cell at `row`, `col`.
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// The neighbouring cell in `direction` on a `width` × `height` torus.
    #[must_use]
    pub const fn wrapping_step(self, direction: Direction, width: usize, height: usize) -> Self {
        match direction {
            Direction::Up => Self::new((self.row + height - 1) % height, self.col),
            Direction::Right => Self::new(self.row, (self.col + 1) % width),
            Direction::Down => Self::new((self.row + 1) % height, self.col),
            Direction::Left => Self::new(self.row, (self.col + width - 1) % width),
        }
    }
}

/// Where the head moves next.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// One row up.
    Up,
    /// One column right.
    Right,
    /// One row down.
    Down,
    /// One column left.
    Left,
}

impl Direction {
    /// Decode an input code: 0 = up, 1 = right, 2 = down, 3 = left.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Up),
            1 => Some(Self::Right),
            2 => Some(Self::Down),
            3 => Some(Self::Left),
            _ => None,
        }
    }

    /// The input code of this direction.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Up => 0,
            Self::Right => 1,
            Self::Down => 2,
            Self::Left => 3,
        }
    }
}

/// Result of one move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MoveOutcome {
    /// The game was already over; nothing changed.
    Blocked,
    /// The snake hit itself on this move. The game is now over.
    GameOver(GameOverFlash),
    /// An ordinary move, or an ignored input.
    Normal,
    /// The snake ate the food.
    Ate,
}

impl MoveOutcome {
    /// Numeric result: 0 when blocked or dying, 1 for a normal move, 2 after eating.
    #[must_use]
    pub const fn code(&self) -> u8 {
        match self {
            Self::Blocked | Self::GameOver(_) => 0,
            Self::Normal => 1,
            Self::Ate => 2,
        }
    }

    /// Whether the game is over after this move.
    #[must_use]
    pub const fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked | Self::GameOver(_))
    }
}

/// The game-over animation: the whole panel flashes red three times.
///
/// ```rust
/// use led_panel_games::panel::PanelConfig;
/// use led_panel_games::snake::GameOverFlash;
///
/// let flash = GameOverFlash::new(PanelConfig::new(4, 4));
/// for (frame, duration) in flash.frames::<16>() {
///     // write `frame` to the LEDs, then wait `duration`
///     assert_eq!(duration.as_millis(), 200);
///     let _ = frame;
/// }
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GameOverFlash {
    panel: PanelConfig,
}

impl GameOverFlash {
    /// Flash for `panel`.
    #[must_use]
    pub const fn new(panel: PanelConfig) -> Self {
        Self { panel }
    }

    /// Lit and dark frames, alternating, each with its display time.
    ///
    /// # Panics
    ///
    /// Panics if `N` is not the panel's `width * height`.
    #[must_use]
    pub fn frames<const N: usize>(&self) -> [(Frame1d<N>, Duration); 2 * FLASHES] {
        self.panel.assert_frame_len(N);
        core::array::from_fn(|index| {
            let frame = if index % 2 == 0 {
                Frame1d::filled(FLASH_COLOR)
            } else {
                Frame1d::new()
            };
            (frame, FLASH_FRAME_DURATION)
        })
    }
}

/// Snake game state for an `H`-row × `W`-column board, with room for `CAP`
/// segments.
#[derive(Clone, Debug)]
pub struct SnakeGame<R, const W: usize, const H: usize, const CAP: usize = DEFAULT_CAPACITY> {
    panel: PanelConfig,
    rng: R,
    // body[0] is the head.
    body: Vec<Point, CAP>,
    food: Point,
    game_over: bool,
}

impl<R: RngCore, const W: usize, const H: usize, const CAP: usize> SnakeGame<R, W, H, CAP> {
    /// New game with a three-segment snake in the middle of the board, pointing
    /// down, and food on a random free cell.
    ///
    /// # Panics
    ///
    /// Panics if `panel` is not `W` × `H`, the board has fewer than 3 rows, or
    /// `CAP` is less than 3.
    #[must_use]
    pub fn new(panel: PanelConfig, rng: R) -> Self {
        panel.assert_dimensions(W, H);
        assert!(H >= 3, "the board needs at least 3 rows");
        assert!(CAP >= 3, "capacity must hold the starting snake");
        let mut game = Self {
            panel,
            rng,
            body: Vec::new(),
            food: Point::default(),
            game_over: false,
        };
        game.reset();
        game
    }

    /// Game in a given position: `body[0]` is the head.
    ///
    /// # Panics
    ///
    /// Panics if `panel` is not `W` × `H`, `body` is empty or longer than `CAP`,
    /// or any point is off the board.
    #[must_use]
    pub fn from_parts(panel: PanelConfig, rng: R, body: &[Point], food: Point) -> Self {
        panel.assert_dimensions(W, H);
        assert!(!body.is_empty(), "body must have a head");
        assert!(food.row < H && food.col < W, "food must lie on the board");
        let mut segments = Vec::new();
        for &point in body {
            assert!(point.row < H && point.col < W, "body must lie on the board");
            assert!(segments.push(point).is_ok(), "body must fit within capacity");
        }
        Self {
            panel,
            rng,
            body: segments,
            food,
            game_over: false,
        }
    }

    /// Start over: fresh snake, new food, game over cleared.
    pub fn reset(&mut self) {
        let row = H / 2;
        let col = W / 2;
        self.body.clear();
        for offset in 0..3 {
            // H >= 3 keeps the three rows distinct.
            let point = Point::new((row + H - offset) % H, col);
            if self.body.push(point).is_err() {
                break;
            }
        }
        self.game_over = false;
        self.regenerate_food();
        info!("snake reset; food at ({}, {})", self.food.row, self.food.col);
    }

    /// Panel this game renders for.
    #[must_use]
    pub const fn panel(&self) -> &PanelConfig {
        &self.panel
    }

    /// Snake segments, head first.
    #[must_use]
    pub fn body(&self) -> &[Point] {
        &self.body
    }

    /// The head segment.
    #[must_use]
    pub fn head(&self) -> Point {
        self.body.first().copied().unwrap_or_default()
    }

    /// Number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always `false`: the snake keeps its head.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Where the food is.
    #[must_use]
    pub const fn food(&self) -> Point {
        self.food
    }

    /// Whether the snake has hit itself.
    #[must_use]
    pub const fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Move the food to a random cell not covered by the snake.
    ///
    /// Random cells are tried a bounded number of times; after that the first free
    /// cell in row-major order is used. Returns `false`, leaving the food where it
    /// was, if the snake covers the whole board.
    pub fn regenerate_food(&mut self) -> bool {
        for _ in 0..4 * W * H {
            let candidate = Point::new(self.rng.gen_range(0..H), self.rng.gen_range(0..W));
            if !self.body.contains(&candidate) {
                self.food = candidate;
                return true;
            }
        }

        let free = (0..H)
            .flat_map(|row| (0..W).map(move |col| Point::new(row, col)))
            .find(|point| !self.body.contains(point));
        match free {
            Some(point) => {
                self.food = point;
                true
            }
            None => {
                warn!("no free cell for food");
                false
            }
        }
    }

    /// Advance the snake one cell in `direction`.
    ///
    /// - After game over, returns [`MoveOutcome::Blocked`] and changes nothing.
    /// - A move straight back onto the segment behind the head is ignored and
    ///   reported as [`MoveOutcome::Normal`].
    /// - Moving onto any later segment ends the game.
    /// - Moving onto the food grows the snake by one and places new food. At
    ///   capacity only the head is replaced; the rest of the body stays put and
    ///   new food is still placed.
    pub fn move_snake(&mut self, direction: Direction) -> MoveOutcome {
        if self.game_over {
            return MoveOutcome::Blocked;
        }

        let new_head = self.head().wrapping_step(direction, W, H);

        if self.body.get(1) == Some(&new_head) {
            trace!("reversal ignored");
            return MoveOutcome::Normal;
        }

        if self.body.iter().skip(2).any(|&point| point == new_head) {
            self.game_over = true;
            info!("game over at length {}", self.body.len());
            return MoveOutcome::GameOver(GameOverFlash::new(self.panel));
        }

        let ate = new_head == self.food;
        if ate && self.body.is_full() {
            debug!("snake is at capacity; only the head moves");
        } else {
            if ate {
                // The duplicated tail stays behind after the shift below.
                let tail = self.body.last().copied().unwrap_or(new_head);
                let _ = self.body.push(tail);
            }
            self.body.rotate_right(1);
        }
        if let Some(head) = self.body.first_mut() {
            *head = new_head;
        }

        if ate {
            self.regenerate_food();
            debug!("ate; length {}", self.body.len());
            MoveOutcome::Ate
        } else {
            MoveOutcome::Normal
        }
    }

    /// [`move_snake`](Self::move_snake) with a raw input code (see
    /// [`Direction::from_code`]). Unknown codes change nothing and report
    /// [`MoveOutcome::Normal`], or [`MoveOutcome::Blocked`] after game over.
    pub fn move_code(&mut self, code: u8) -> MoveOutcome {
        if self.game_over {
            return MoveOutcome::Blocked;
        }
        match Direction::from_code(code) {
            Some(direction) => self.move_snake(direction),
            None => {
                debug!("ignoring direction code {}", code);
                MoveOutcome::Normal
            }
        }
    }

    /// Clear `frame` and draw the body, then the head, then the food.
    ///
    /// # Panics
    ///
    /// Panics if `N` is not `W * H`.
    pub fn render<const N: usize>(&self, frame: &mut Frame1d<N>) {
        self.panel.assert_frame_len(N);
        frame.clear();
        for point in self.body.iter().skip(1) {
            frame[self.index_of(*point)] = BODY_COLOR;
        }
        frame[self.index_of(self.head())] = HEAD_COLOR;
        frame[self.index_of(self.food)] = FOOD_COLOR;
    }

    const fn index_of(&self, point: Point) -> usize {
        self.panel.xy_to_index(point.col, point.row)
    }
}
