use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::*;

/// Generation strategy that keeps the cells named by its [`FirstMovePolicy`] free of mines, but other than that is
/// purely random.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomLayoutGenerator {
    seed: u64,
    start: Coord2,
    policy: FirstMovePolicy,
}

impl RandomLayoutGenerator {
    pub fn new(seed: u64, start: Coord2, policy: FirstMovePolicy) -> Self {
        Self {
            seed,
            start,
            policy,
        }
    }

    /// Checks that `config` leaves at least one mine-free cell outside the excluded zone.
    pub fn check(config: GameConfig, start: Coord2, policy: FirstMovePolicy) -> Result<()> {
        config.validate()?;
        if !config.contains(start) {
            return Err(GameError::InvalidCoords);
        }

        let excluded: CellCount = policy
            .excluded_cells(config.size, start)
            .len()
            .try_into()
            .unwrap_or(CellCount::MAX);
        let available = config.total_cells().saturating_sub(excluded);
        if config.mines >= available {
            return Err(GameError::InvalidConfiguration);
        }
        Ok(())
    }
}

impl LayoutGenerator for RandomLayoutGenerator {
    fn generate(self, config: GameConfig) -> Result<MineLayout> {
        Self::check(config, self.start, self.policy)?;

        let excluded = self.policy.excluded_cells(config.size, self.start);
        let mut taken: Array2<bool> = Array2::default(nd_index(config.size));
        for &coords in &excluded {
            taken[nd_index(coords)] = true;
        }

        let mut free_cells = usize::from(config.total_cells()) - excluded.len();
        let mut rng = SmallRng::seed_from_u64(self.seed);
        for _ in 0..config.mines {
            let place = rng.random_range(0..free_cells);
            if let Some(cell) = taken.iter_mut().filter(|cell| !**cell).nth(place) {
                *cell = true;
                free_cells -= 1;
            }
        }

        // undo to make the excluded zone safe again
        for &coords in &excluded {
            taken[nd_index(coords)] = false;
        }

        let layout = MineLayout::from_mine_mask(taken);
        if layout.mine_count() != config.mines {
            log::warn!(
                "Generated layout count mismatch, actual: {}, requested: {}",
                layout.mine_count(),
                config.mines
            );
        }
        log::debug!(
            "generated {}x{} layout with {} mines, policy {:?}",
            config.rows(),
            config.columns(),
            layout.mine_count(),
            self.policy
        );
        Ok(layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate(config: GameConfig, seed: u64, start: Coord2, policy: FirstMovePolicy) -> MineLayout {
        RandomLayoutGenerator::new(seed, start, policy)
            .generate(config)
            .unwrap()
    }

    #[test]
    fn places_exactly_the_requested_mines() {
        for seed in 0..32 {
            let layout = generate(GameConfig::EXPERT, seed, (5, 5), FirstMovePolicy::Random);
            assert_eq!(layout.mine_count(), GameConfig::EXPERT.mines);
        }
    }

    #[test]
    fn first_move_zero_keeps_neighborhood_clear() {
        // 25 cells minus the 3x3 zone leaves 16, one of which must stay free
        let config = GameConfig::new((5, 5), 15).unwrap();
        for seed in 0..64 {
            let layout = generate(config, seed, (2, 2), FirstMovePolicy::FirstMoveZero);
            assert_eq!(layout.mine_count(), 15);
            assert!(!layout.contains_mine((2, 2)));
            assert_eq!(layout.adjacent_mine_count((2, 2)), 0);
        }
    }

    #[test]
    fn first_move_zero_rejects_a_full_outer_ring() {
        let config = GameConfig::new((5, 5), 16).unwrap();
        assert_eq!(
            RandomLayoutGenerator::new(0, (2, 2), FirstMovePolicy::FirstMoveZero).generate(config),
            Err(GameError::InvalidConfiguration)
        );
    }

    #[test]
    fn simple_safe_keeps_start_clear() {
        let config = GameConfig::new((3, 3), 7).unwrap();
        for seed in 0..64 {
            let layout = generate(config, seed, (0, 0), FirstMovePolicy::SimpleSafe);
            assert!(!layout.contains_mine((0, 0)));
            assert_eq!(layout.mine_count(), 7);
        }
    }

    #[test]
    fn same_seed_gives_same_layout() {
        let a = generate(GameConfig::INTERMEDIATE, 7, (3, 3), FirstMovePolicy::FirstMoveZero);
        let b = generate(GameConfig::INTERMEDIATE, 7, (3, 3), FirstMovePolicy::FirstMoveZero);
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_mines_that_do_not_fit_outside_exclusion() {
        // corner exclusion covers 4 of 9 cells, leaving 5
        let generator = RandomLayoutGenerator::new(0, (0, 0), FirstMovePolicy::FirstMoveZero);
        assert_eq!(
            generator.clone().generate(GameConfig::new((3, 3), 5).unwrap()),
            Err(GameError::InvalidConfiguration)
        );
        assert!(generator.generate(GameConfig::new((3, 3), 4).unwrap()).is_ok());
    }

    #[test]
    fn rejects_start_outside_board() {
        assert_eq!(
            RandomLayoutGenerator::check(GameConfig::BEGINNER, (9, 0), FirstMovePolicy::SimpleSafe),
            Err(GameError::InvalidCoords)
        );
    }
}
