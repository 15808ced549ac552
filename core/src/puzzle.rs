use alloc::vec::Vec;
use bitflags::bitflags;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::*;
use crate::types::apply_delta;

/// Tile id; in solved order the tile at `(x, y)` is `x + y * width`.
pub type Tile = CellCount;

/// The tile that is left out of the picture and slides around.
pub const BLANK: Tile = 0;

/// Image names of the ship parts, indexed by tile.
pub const PART_NAMES: [&str; 30] = [
    "Main_Engine",
    "Positron_Generator",
    "Eternal_Fuel_Dynamo",
    "Extraordinary_Bolt",
    "Whimsical_Radar",
    "Geiger_Counter",
    "Radiation_Canopy",
    "Sagittarius",
    "Shock_Absorber",
    "Automatic_Gear",
    "Number_1_Ionium_Jet",
    "Anti-Dioxin_Filter",
    "Omega_Stabilizer",
    "Gravity_Jumper",
    "Analog_Computer",
    "Guard_Satellite",
    "Libra",
    "Repair-type_Bolt",
    "Gluon_Drive",
    "Zirconium_Rotor",
    "Interstellar_Radio",
    "Pilot's_Seat",
    "Number_2_Ionium_Jet",
    "Bowsprit",
    "Chronos_Reactor",
    "Nova_Blaster",
    "Space_Float",
    "Massage_Machine",
    "UV_Lamp",
    "Secret_Safe",
];

pub fn part_name(tile: Tile) -> Option<&'static str> {
    PART_NAMES.get(usize::from(tile)).copied()
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Left,
    Right,
    Down,
}

/// Keyboard layout: WASD in either case plus the arrow keys.
const KEY_BINDINGS: [(&str, Direction); 12] = [
    ("w", Direction::Up),
    ("W", Direction::Up),
    ("a", Direction::Left),
    ("A", Direction::Left),
    ("d", Direction::Right),
    ("D", Direction::Right),
    ("s", Direction::Down),
    ("S", Direction::Down),
    ("ArrowUp", Direction::Up),
    ("ArrowLeft", Direction::Left),
    ("ArrowRight", Direction::Right),
    ("ArrowDown", Direction::Down),
];

impl Direction {
    pub const ALL: [Direction; 4] = [Self::Up, Self::Left, Self::Right, Self::Down];

    pub const fn delta(self) -> (i8, i8) {
        match self {
            Self::Up => (0, -1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
            Self::Down => (0, 1),
        }
    }

    pub const fn reverse(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::Down => Self::Up,
        }
    }

    pub const fn flag(self) -> Directions {
        match self {
            Self::Up => Directions::UP,
            Self::Left => Directions::LEFT,
            Self::Right => Directions::RIGHT,
            Self::Down => Directions::DOWN,
        }
    }

    /// Looks a `KeyboardEvent.key` value up in the key bindings.
    pub fn from_key(key: &str) -> Option<Self> {
        KEY_BINDINGS
            .iter()
            .find(|&&(bound, _)| bound == key)
            .map(|&(_, direction)| direction)
    }
}

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Directions: u8 {
        const UP    = 1;
        const LEFT  = 1 << 1;
        const RIGHT = 1 << 2;
        const DOWN  = 1 << 3;
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShufflePolicy {
    /// Every tile avoids its own home cell, but the arrangement may be unreachable by sliding.
    Deranged,
    /// Like `Deranged`, then repaired by one tile swap if the arrangement would be unsolvable.
    Solvable,
}

impl Default for ShufflePolicy {
    fn default() -> Self {
        Self::Solvable
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleConfig {
    pub size: Coord2,
    pub shuffle: ShufflePolicy,
}

impl PuzzleConfig {
    pub const WIDTH: Coord = 5;
    pub const HEIGHT: Coord = 6;

    pub fn new((size_x, size_y): Coord2, shuffle: ShufflePolicy) -> Self {
        Self {
            size: (size_x.max(1), size_y.max(1)),
            shuffle,
        }
    }

    pub const fn total_tiles(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self::new((Self::WIDTH, Self::HEIGHT), ShufflePolicy::default())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PuzzleState {
    NotStarted,
    Running,
    Won,
}

impl PuzzleState {
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }
}

impl Default for PuzzleState {
    fn default() -> Self {
        Self::NotStarted
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MoveOutcome {
    NoChange,
    Moved,
}

impl MoveOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Moved => true,
        }
    }
}

/// Board in solved order.
pub fn solved_board(size: Coord2) -> Grid<Tile> {
    let width = Tile::from(size.0);
    Grid::from_fn(size, |(x, y)| Tile::from(x) + Tile::from(y) * width)
}

pub fn is_solved(board: &Grid<Tile>) -> bool {
    let width = Tile::from(board.width());
    board
        .iter()
        .all(|((x, y), &tile)| tile == Tile::from(x) + Tile::from(y) * width)
}

/// Whether sliding can bring `board` back to solved order.
///
/// Every slide is a transposition with the blank that moves the blank by one cell, so the permutation parity has to
/// match the parity of the blank's distance from its home cell. Single row or column boards can't reorder tiles at
/// all.
pub fn is_solvable(board: &Grid<Tile>) -> bool {
    let tiles: Vec<Tile> = board.iter().map(|(_, &tile)| tile).collect();

    if board.width() < 2 || board.height() < 2 {
        return tiles
            .iter()
            .filter(|&&tile| tile != BLANK)
            .is_sorted();
    }

    let Some(blank_at) = board.index_of(&BLANK) else {
        return false;
    };

    let mut inversions = 0usize;
    for (i, a) in tiles.iter().enumerate() {
        inversions += tiles[i + 1..].iter().filter(|&b| b < a).count();
    }

    let blank_distance = usize::from(blank_at.0) + usize::from(blank_at.1);
    inversions % 2 == blank_distance % 2
}

/// What the render loop needs to draw one frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PuzzleSnapshot<'a> {
    pub board: &'a Grid<Tile>,
    pub blank: Coord2,
    pub state: PuzzleState,
    pub time: TimeDisplay,
}

#[derive(Clone, Debug)]
pub struct PuzzleEngine<C = SystemClock> {
    config: PuzzleConfig,
    board: Grid<Tile>,
    blank: Coord2,
    state: PuzzleState,
    timer: Timer<C>,
    move_count: u32,
    rng: SmallRng,
}

impl PuzzleEngine<SystemClock> {
    pub fn new(config: PuzzleConfig, seed: u64) -> Self {
        Self::with_clock(config, seed, SystemClock::new())
    }
}

impl<C: Clock> PuzzleEngine<C> {
    pub fn with_clock(config: PuzzleConfig, seed: u64, clock: C) -> Self {
        Self {
            config,
            board: solved_board(config.size),
            blank: (0, 0),
            state: PuzzleState::NotStarted,
            timer: Timer::new(clock),
            move_count: 0,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> PuzzleConfig {
        self.config
    }

    pub fn size(&self) -> Coord2 {
        self.board.size()
    }

    pub fn state(&self) -> PuzzleState {
        self.state
    }

    pub fn board(&self) -> &Grid<Tile> {
        &self.board
    }

    pub fn tile_at(&self, coords: Coord2) -> Result<Tile> {
        self.board.get(coords).copied()
    }

    pub fn blank_position(&self) -> Coord2 {
        self.blank
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn timer(&self) -> &Timer<C> {
        &self.timer
    }

    pub fn time_display(&self) -> TimeDisplay {
        self.timer.display()
    }

    pub fn snapshot(&self) -> PuzzleSnapshot<'_> {
        PuzzleSnapshot {
            board: &self.board,
            blank: self.blank,
            state: self.state,
            time: self.time_display(),
        }
    }

    pub fn is_solved(&self) -> bool {
        is_solved(&self.board)
    }

    /// Shuffles the tiles and starts the clock. Ignored unless the game is waiting to start.
    pub fn start(&mut self) -> Transition {
        if !matches!(self.state, PuzzleState::NotStarted) {
            return Transition::NoChange;
        }

        self.shuffle();
        self.move_count = 0;
        self.timer.start();
        self.state = PuzzleState::Running;
        log::debug!("puzzle started, blank at {:?}", self.blank);
        Transition::Changed
    }

    /// Puts the tiles back in solved order and clears the clock.
    pub fn reset(&mut self) -> Transition {
        let was_pristine = matches!(self.state, PuzzleState::NotStarted) && self.is_solved();

        self.board = solved_board(self.config.size);
        self.blank = (0, 0);
        self.move_count = 0;
        self.timer.clear();
        self.state = PuzzleState::NotStarted;

        if was_pristine {
            Transition::NoChange
        } else {
            log::debug!("puzzle reset");
            Transition::Changed
        }
    }

    /// Lays the tiles out in raster order, drawing each from the tiles left over while avoiding the tile whose home
    /// is the current cell, unless it is the only one left.
    pub fn shuffle(&mut self) {
        let mut remaining: Vec<Tile> = (0..self.config.total_tiles()).collect();

        for (i, coords) in self.board.iter_coords().enumerate() {
            let home = i as Tile;
            let has_home = remaining.contains(&home);
            let choices = remaining.len() - usize::from(has_home);

            let pick = if choices == 0 {
                log::debug!("only tile {} left for its own cell", home);
                0
            } else {
                let mut place = self.rng.random_range(0..choices);
                if has_home && remaining[..=place].contains(&home) {
                    place += 1;
                }
                place
            };

            let tile = remaining.remove(pick);
            if tile == BLANK {
                self.blank = coords;
            }
            self.board[coords] = tile;
        }

        if matches!(self.config.shuffle, ShufflePolicy::Solvable) && !is_solvable(&self.board) {
            self.fix_parity();
        }
    }

    /// Swaps one pair of non-blank tiles, which flips the arrangement between solvable and unsolvable.
    fn fix_parity(&mut self) {
        let (width, height) = self.board.size();
        if width < 2 || height < 2 {
            log::warn!(
                "Cannot make a {}x{} board solvable, fallback to deranged shuffle",
                width,
                height
            );
            return;
        }

        let width = Tile::from(width);
        let home_of = |tile: Tile| ((tile % width) as Coord, (tile / width) as Coord);
        let tiles: Vec<(Coord2, Tile)> = self
            .board
            .iter()
            .filter(|&(_, &tile)| tile != BLANK)
            .map(|(coords, &tile)| (coords, tile))
            .collect();

        let mut fallback = None;
        for (i, &(a, tile_a)) in tiles.iter().enumerate() {
            for &(b, tile_b) in &tiles[i + 1..] {
                if home_of(tile_a) != b && home_of(tile_b) != a {
                    self.swap_tiles(a, b);
                    return;
                }
                if fallback.is_none() {
                    fallback = Some((a, b));
                }
            }
        }

        if let Some((a, b)) = fallback {
            self.swap_tiles(a, b);
        }
    }

    fn swap_tiles(&mut self, a: Coord2, b: Coord2) {
        match self.board.swap(a, b) {
            Ok(()) => log::debug!("swapped {:?} and {:?} to make the shuffle solvable", a, b),
            Err(err) => log::error!("failed to swap {:?} and {:?}: {}", a, b, err),
        }
    }

    /// Slides the blank one cell towards `direction`. Ignored unless running or when the blank is at that edge.
    pub fn move_blank(&mut self, direction: Direction) -> MoveOutcome {
        if !self.state.is_running() {
            return MoveOutcome::NoChange;
        }

        let Some(neighbor) = apply_delta(self.blank, direction.delta(), self.board.size()) else {
            return MoveOutcome::NoChange;
        };

        self.board[self.blank] = self.board[neighbor];
        self.board[neighbor] = BLANK;
        self.blank = neighbor;
        self.move_count = self.move_count.saturating_add(1);
        MoveOutcome::Moved
    }

    /// Directions the blank can currently slide in; empty unless running.
    pub fn movable_directions(&self) -> Directions {
        if !self.state.is_running() {
            return Directions::empty();
        }

        Direction::ALL
            .into_iter()
            .filter(|direction| apply_delta(self.blank, direction.delta(), self.board.size()).is_some())
            .fold(Directions::empty(), |set, direction| set | direction.flag())
    }

    /// Per-frame check: ends the game and stops the clock once the board is solved.
    pub fn check_win(&mut self) -> Transition {
        if !self.state.is_running() || !self.is_solved() {
            return Transition::NoChange;
        }

        self.state = PuzzleState::Won;
        if let Err(err) = self.timer.stop() {
            log::error!("failed to stop timer: {}", err);
        }
        log::debug!(
            "puzzle solved in {} moves, {}",
            self.move_count,
            self.time_display()
        );
        Transition::Changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use core::time::Duration;

    fn engine(clock: &ManualClock, shuffle: ShufflePolicy) -> PuzzleEngine<&ManualClock> {
        PuzzleEngine::with_clock(PuzzleConfig::new((5, 6), shuffle), 7, clock)
    }

    fn is_permutation(board: &Grid<Tile>) -> bool {
        let mut tiles: Vec<Tile> = board.iter().map(|(_, &tile)| tile).collect();
        tiles.sort_unstable();
        tiles.into_iter().eq(0..board.total_cells())
    }

    /// Mid-game on a solved board, so moves are predictable.
    fn start_from_solved(engine: &mut PuzzleEngine<&ManualClock>) {
        engine.state = PuzzleState::Running;
        engine.board = solved_board(engine.size());
        engine.blank = (0, 0);
    }

    #[test]
    fn new_engine_is_solved_and_waiting() {
        let clock = ManualClock::new();
        let engine = engine(&clock, ShufflePolicy::Solvable);

        assert!(engine.is_solved());
        assert_eq!(engine.state(), PuzzleState::NotStarted);
        assert_eq!(engine.blank_position(), (0, 0));
        assert_eq!(engine.tile_at((4, 5)), Ok(29));
        assert_eq!(engine.tile_at((5, 0)), Err(GameError::InvalidCoords));
        assert_eq!(engine.time_display(), TimeDisplay::Blank);
    }

    #[test]
    fn solved_board_matches_identity_raster() {
        let board = solved_board((5, 6));

        assert_eq!(board[(0, 0)], 0);
        assert_eq!(board[(4, 0)], 4);
        assert_eq!(board[(0, 1)], 5);
        assert_eq!(board[(4, 5)], 29);
        assert!(is_solved(&board));
    }

    #[test]
    fn any_swap_breaks_solved() {
        let mut board = solved_board((5, 6));
        board.swap((3, 2), (4, 5)).unwrap();

        assert!(!is_solved(&board));
    }

    #[test]
    fn moves_are_ignored_before_start() {
        let clock = ManualClock::new();
        let mut engine = engine(&clock, ShufflePolicy::Solvable);

        assert_eq!(engine.move_blank(Direction::Right), MoveOutcome::NoChange);
        assert_eq!(engine.movable_directions(), Directions::empty());
        assert!(engine.is_solved());
    }

    #[test]
    fn start_shuffles_into_a_deranged_permutation() {
        let clock = ManualClock::new();
        let mut engine = engine(&clock, ShufflePolicy::Deranged);

        assert_eq!(engine.start(), Transition::Changed);

        let board = engine.board();
        assert_eq!(engine.state(), PuzzleState::Running);
        assert!(is_permutation(board));
        assert_eq!(board.count(&BLANK), 1);
        assert_eq!(board.index_of(&BLANK), Some(engine.blank_position()));

        // only the last cell may be left with its own tile
        let last = board.total_cells() - 1;
        for (coords, &tile) in board.iter() {
            let index = board.raster_index(coords).unwrap();
            if index != last {
                assert_ne!(tile, index);
            }
        }
    }

    #[test]
    fn solvable_policy_always_yields_solvable_boards() {
        let clock = ManualClock::new();
        for seed in 0..50 {
            let config = PuzzleConfig::new((5, 6), ShufflePolicy::Solvable);
            let mut engine = PuzzleEngine::with_clock(config, seed, &clock);

            engine.start();

            assert!(is_permutation(engine.board()));
            assert!(is_solvable(engine.board()), "seed {seed} gave {}", engine.board());
            assert_eq!(engine.board().index_of(&BLANK), Some(engine.blank_position()));
        }
    }

    #[test]
    fn parity_repair_swaps_two_tiles() {
        let clock = ManualClock::new();
        let config = PuzzleConfig::new((2, 2), ShufflePolicy::Solvable);
        let mut engine = PuzzleEngine::with_clock(config, 3, &clock);
        engine.board = Grid::from_vec((2, 2), vec![0, 2, 1, 3]).unwrap();
        engine.blank = (0, 0);
        assert!(!is_solvable(engine.board()));

        engine.fix_parity();

        assert!(is_permutation(engine.board()));
        assert!(is_solvable(engine.board()));
        assert_eq!(engine.board()[(0, 0)], BLANK);
        let before = Grid::from_vec((2, 2), vec![0, 2, 1, 3]).unwrap();
        let moved = engine
            .board()
            .iter()
            .filter(|&(coords, tile)| before[coords] != *tile)
            .count();
        assert_eq!(moved, 2);
    }

    #[test]
    fn double_start_is_ignored() {
        let clock = ManualClock::new();
        let mut engine = engine(&clock, ShufflePolicy::Solvable);

        engine.start();
        let board = engine.board().clone();

        assert_eq!(engine.start(), Transition::NoChange);
        assert_eq!(engine.board(), &board);
    }

    #[test]
    fn move_swaps_blank_with_neighbor() {
        let clock = ManualClock::new();
        let mut engine = engine(&clock, ShufflePolicy::Solvable);
        start_from_solved(&mut engine);

        assert_eq!(engine.move_blank(Direction::Right), MoveOutcome::Moved);
        assert_eq!(engine.blank_position(), (1, 0));
        assert_eq!(engine.tile_at((0, 0)), Ok(1));
        assert_eq!(engine.tile_at((1, 0)), Ok(BLANK));

        assert_eq!(engine.move_blank(Direction::Down), MoveOutcome::Moved);
        assert_eq!(engine.blank_position(), (1, 1));
        assert_eq!(engine.tile_at((1, 0)), Ok(6));
        assert_eq!(engine.move_count(), 2);
    }

    #[test]
    fn move_towards_edge_is_noop() {
        let clock = ManualClock::new();
        let mut engine = engine(&clock, ShufflePolicy::Solvable);
        start_from_solved(&mut engine);
        let before = engine.board().clone();

        assert_eq!(engine.move_blank(Direction::Up), MoveOutcome::NoChange);
        assert_eq!(engine.move_blank(Direction::Left), MoveOutcome::NoChange);
        assert_eq!(engine.board(), &before);
        assert_eq!(engine.move_count(), 0);
    }

    #[test]
    fn movable_directions_follow_blank() {
        let clock = ManualClock::new();
        let mut engine = engine(&clock, ShufflePolicy::Solvable);
        start_from_solved(&mut engine);

        assert_eq!(engine.movable_directions(), Directions::RIGHT | Directions::DOWN);

        engine.move_blank(Direction::Right);
        engine.move_blank(Direction::Down);
        assert_eq!(engine.movable_directions(), Directions::all());

        for _ in 0..4 {
            engine.move_blank(Direction::Down);
        }
        for _ in 0..3 {
            engine.move_blank(Direction::Right);
        }
        assert_eq!(engine.blank_position(), (4, 5));
        assert_eq!(engine.movable_directions(), Directions::UP | Directions::LEFT);
    }

    #[test]
    fn check_win_stops_timer() {
        let clock = ManualClock::new();
        let mut engine = engine(&clock, ShufflePolicy::Solvable);
        engine.start();
        assert_eq!(engine.check_win(), Transition::NoChange);

        clock.advance(Duration::from_millis(83_210));
        engine.board = solved_board(engine.size());
        engine.blank = (0, 0);

        assert_eq!(engine.check_win(), Transition::Changed);
        assert_eq!(engine.state(), PuzzleState::Won);
        assert!(!engine.timer().is_running());

        clock.advance(Duration::from_secs(30));
        assert_eq!(engine.timer().elapsed(), Ok(Duration::from_millis(83_210)));
        assert_eq!(engine.move_blank(Direction::Right), MoveOutcome::NoChange);
        assert_eq!(engine.check_win(), Transition::NoChange);
    }

    #[test]
    fn solving_by_hand_wins() {
        let clock = ManualClock::new();
        let mut engine = engine(&clock, ShufflePolicy::Solvable);
        start_from_solved(&mut engine);

        engine.move_blank(Direction::Right);
        engine.move_blank(Direction::Down);
        assert_eq!(engine.check_win(), Transition::NoChange);

        engine.move_blank(Direction::Up);
        engine.move_blank(Direction::Left);
        assert_eq!(engine.check_win(), Transition::Changed);
    }

    #[test]
    fn reset_restores_solved_board() {
        let clock = ManualClock::new();
        let mut engine = engine(&clock, ShufflePolicy::Solvable);
        engine.start();

        assert_eq!(engine.reset(), Transition::Changed);
        assert!(engine.is_solved());
        assert_eq!(engine.state(), PuzzleState::NotStarted);
        assert_eq!(engine.blank_position(), (0, 0));
        assert!(!engine.timer().has_started());
        assert_eq!(engine.reset(), Transition::NoChange);
    }

    #[test]
    fn single_cell_board_shuffles_onto_itself() {
        let clock = ManualClock::new();
        let config = PuzzleConfig::new((0, 0), ShufflePolicy::Solvable);
        let mut engine = PuzzleEngine::with_clock(config, 1, &clock);

        engine.start();

        assert_eq!(engine.size(), (1, 1));
        assert_eq!(engine.check_win(), Transition::Changed);
    }

    #[test]
    fn solvability_uses_blank_distance_parity() {
        let board = Grid::from_vec((2, 2), vec![1, 0, 2, 3]).unwrap();
        assert!(is_solvable(&board));

        let board = Grid::from_vec((2, 2), vec![0, 2, 1, 3]).unwrap();
        assert!(!is_solvable(&board));

        let board = Grid::from_vec((3, 1), vec![1, 0, 2]).unwrap();
        assert!(is_solvable(&board));

        let board = Grid::from_vec((3, 1), vec![2, 0, 1]).unwrap();
        assert!(!is_solvable(&board));
    }

    #[test]
    fn key_bindings_map_wasd_and_arrows() {
        assert_eq!(Direction::from_key("w"), Some(Direction::Up));
        assert_eq!(Direction::from_key("A"), Some(Direction::Left));
        assert_eq!(Direction::from_key("ArrowRight"), Some(Direction::Right));
        assert_eq!(Direction::from_key("s"), Some(Direction::Down));
        assert_eq!(Direction::from_key("x"), None);
        assert_eq!(Direction::from_key(""), None);
    }

    #[test]
    fn part_names_cover_every_tile() {
        assert_eq!(part_name(0), Some("Main_Engine"));
        assert_eq!(part_name(29), Some("Secret_Safe"));
        assert_eq!(part_name(30), None);
    }
}
