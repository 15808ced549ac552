use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::*;

pub const PUZZLE_EXPORT_PREFIX: &str = "30parts-puzzle-";
pub const LOTTERY_EXPORT_PREFIX: &str = "egg-lottery-";

/// Games whose board can be saved as an image by the front-end.
pub trait Exportable {
    /// File name for the saved image, or `None` while there is nothing worth saving.
    fn export_filename(&self) -> Option<String>;
}

impl<C: Clock> Exportable for PuzzleEngine<C> {
    fn export_filename(&self) -> Option<String> {
        if !matches!(self.state(), PuzzleState::Won) {
            return None;
        }
        Some(format!(
            "{}{}.png",
            PUZZLE_EXPORT_PREFIX,
            self.time_display().compact()
        ))
    }
}

impl Exportable for RevealEngine {
    fn export_filename(&self) -> Option<String> {
        let counts: Vec<String> = self
            .tallies()
            .map(|(_, count)| format!("{count}"))
            .collect();
        Some(format!("{}{}.png", LOTTERY_EXPORT_PREFIX, counts.join("-")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::time::Duration;

    #[test]
    fn puzzle_name_encodes_final_time() {
        let clock = ManualClock::new();
        let config = PuzzleConfig::new((2, 2), ShufflePolicy::Solvable);
        let mut engine = PuzzleEngine::with_clock(config, 0, &clock);

        assert_eq!(engine.export_filename(), None);

        engine.start();
        clock.advance(Duration::from_millis(125_670));
        // circling the blank visits every solvable 2x2 layout
        let circle = [Direction::Right, Direction::Down, Direction::Left, Direction::Up];
        for direction in circle.into_iter().cycle().take(64) {
            if engine.is_solved() {
                break;
            }
            engine.move_blank(direction);
        }
        assert!(engine.is_solved());
        assert_eq!(engine.export_filename(), None);

        engine.check_win();
        assert_eq!(
            engine.export_filename().as_deref(),
            Some("30parts-puzzle-020567.png")
        );
    }

    #[test]
    fn lottery_name_encodes_counts() {
        let mut engine = RevealEngine::with_size((4, 5), 8);

        assert_eq!(
            engine.export_filename().as_deref(),
            Some("egg-lottery-0-0-0-0-0.png")
        );

        engine.start_breaking();
        for _ in 0..20 {
            engine.reveal_next();
        }

        let name = engine.export_filename().unwrap();
        let counts: Vec<CellCount> = name
            .trim_start_matches(LOTTERY_EXPORT_PREFIX)
            .trim_end_matches(".png")
            .split('-')
            .map(|count| count.parse().unwrap())
            .collect();
        assert_eq!(counts.len(), 5);
        assert_eq!(counts.iter().sum::<CellCount>(), 20);
        assert_eq!(counts[0], engine.count_of(Hatch::Nectar));
        assert_eq!(counts[4], engine.count_of(Hatch::Mitites));
    }
}
