use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::*;

/// What an egg turns out to hold once broken. `Egg` is an unbroken cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hatch {
    Egg,
    Nectar,
    DoubleNectar,
    SpicySpray,
    BitterSpray,
    Mitites,
}

impl Hatch {
    /// Everything a broken egg can hold, in tally order.
    pub const CONTENTS: [Hatch; 5] = [
        Self::Nectar,
        Self::DoubleNectar,
        Self::SpicySpray,
        Self::BitterSpray,
        Self::Mitites,
    ];

    /// Maps a uniform roll in `[0, 1)` onto the cumulative odds 50/35/5/5/5.
    pub fn from_roll(roll: f64) -> Self {
        if roll < 0.5 {
            Self::Nectar
        } else if roll < 0.85 {
            Self::DoubleNectar
        } else if roll < 0.9 {
            Self::SpicySpray
        } else if roll < 0.95 {
            Self::BitterSpray
        } else {
            Self::Mitites
        }
    }

    pub fn roll<R: Rng>(rng: &mut R) -> Self {
        Self::from_roll(rng.random::<f64>())
    }

    pub const fn is_broken(self) -> bool {
        !matches!(self, Self::Egg)
    }

    /// Image asset name, without extension.
    pub const fn asset_name(self) -> &'static str {
        match self {
            Self::Egg => "egg",
            Self::Nectar => "nectar",
            Self::DoubleNectar => "wnectar",
            Self::SpicySpray => "spicy",
            Self::BitterSpray => "bitter",
            Self::Mitites => "mitites",
        }
    }

    /// Caption for the tally drawn next to the board.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Egg => "タマゴ",
            Self::Nectar => "エキス",
            Self::DoubleNectar => "2エキス",
            Self::SpicySpray => "ゲキカラ",
            Self::BitterSpray => "ゲキニガ",
            Self::Mitites => "タマゴムシ",
        }
    }
}

impl Default for Hatch {
    fn default() -> Self {
        Self::Egg
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevealState {
    Idle,
    Revealing,
    Complete,
}

impl Default for RevealState {
    fn default() -> Self {
        Self::Idle
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RevealStep {
    NoChange,
    Revealed { coords: Coord2, hatch: Hatch },
    Completed { coords: Coord2, hatch: Hatch },
    /// Nothing was left to break; the board went straight to `Complete`.
    Exhausted,
}

impl RevealStep {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

/// Board of eggs broken one per frame in raster order.
#[derive(Clone, Debug)]
pub struct RevealEngine {
    board: Grid<Hatch>,
    cursor: CellCount,
    state: RevealState,
    rng: SmallRng,
}

impl RevealEngine {
    pub const WIDTH: Coord = 10;
    pub const HEIGHT: Coord = 10;

    pub fn new(seed: u64) -> Self {
        Self::with_size((Self::WIDTH, Self::HEIGHT), seed)
    }

    pub fn with_size(size: Coord2, seed: u64) -> Self {
        Self {
            board: Grid::new(size),
            cursor: 0,
            state: RevealState::Idle,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn size(&self) -> Coord2 {
        self.board.size()
    }

    pub fn state(&self) -> RevealState {
        self.state
    }

    pub fn board(&self) -> &Grid<Hatch> {
        &self.board
    }

    pub fn cell_at(&self, coords: Coord2) -> Result<Hatch> {
        self.board.get(coords).copied()
    }

    /// Number of eggs broken so far.
    pub fn cursor(&self) -> CellCount {
        self.cursor
    }

    pub fn count_of(&self, hatch: Hatch) -> CellCount {
        self.board.count(&hatch)
    }

    /// Counts for every broken-egg content, in `Hatch::CONTENTS` order.
    pub fn tallies(&self) -> impl Iterator<Item = (Hatch, CellCount)> + '_ {
        Hatch::CONTENTS
            .into_iter()
            .map(|hatch| (hatch, self.count_of(hatch)))
    }

    pub fn start_breaking(&mut self) -> Transition {
        if !matches!(self.state, RevealState::Idle) {
            return Transition::NoChange;
        }

        self.cursor = 0;
        self.state = RevealState::Revealing;
        log::debug!("breaking {} eggs", self.board.total_cells());
        Transition::Changed
    }

    /// Per-frame step: breaks the egg under the cursor.
    pub fn reveal_next(&mut self) -> RevealStep {
        if !matches!(self.state, RevealState::Revealing) {
            return RevealStep::NoChange;
        }

        let Some(coords) = self.board.coords_at(self.cursor) else {
            self.finish();
            return RevealStep::Exhausted;
        };

        let hatch = Hatch::roll(&mut self.rng);
        self.board[coords] = hatch;
        self.cursor += 1;
        log::trace!("{:?} hatched {:?}", coords, hatch);

        if self.cursor >= self.board.total_cells() {
            self.finish();
            RevealStep::Completed { coords, hatch }
        } else {
            RevealStep::Revealed { coords, hatch }
        }
    }

    pub fn reset(&mut self) -> Transition {
        let was_pristine = matches!(self.state, RevealState::Idle) && self.cursor == 0;

        self.board.fill(Hatch::Egg);
        self.cursor = 0;
        self.state = RevealState::Idle;

        if was_pristine {
            Transition::NoChange
        } else {
            log::debug!("eggs reset");
            Transition::Changed
        }
    }

    fn finish(&mut self) {
        self.state = RevealState::Complete;
        log::debug!(
            "all eggs broken: {:?}",
            self.tallies().map(|(_, count)| count).collect::<alloc::vec::Vec<_>>()
        );
    }
}
