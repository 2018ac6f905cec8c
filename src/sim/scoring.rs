//! Progression: dodge/destroy tallies, level-ups and rank titles

use serde::{Deserialize, Serialize};

use crate::consts::POINTS_PER_LEVEL;

/// Rank titles, two levels per title; the last one is kept forever
pub const RANK_TITLES: [&str; 50] = [
    "Beginner",
    "Novice",
    "Apprentice",
    "Initiate",
    "Intermediate",
    "Skilled",
    "Adept",
    "Expert",
    "Pro",
    "Master",
    "Elite",
    "Legend",
    "John Wick",
    "Hulk",
    "Yoda",
    "Thor",
    "Iron Man",
    "Darth Vader",
    "Superman",
    "The One",
    "Cosmic Voyager",
    "Star Seeker",
    "Galactic Scout",
    "Nebula Navigator",
    "Astro Ace",
    "Meteor Marauder",
    "Comet Crusader",
    "Orbit Overlord",
    "Stellar Soldier",
    "Nova Knight",
    "Quantum Quill",
    "Pulsar Pioneer",
    "Black Hole Baron",
    "Interstellar Icon",
    "Celestial Champion",
    "Gravity Guru",
    "Starstorm Sovereign",
    "Cosmo Commander",
    "Astral Admiral",
    "Galaxy Guardian",
    "Eclipse Enforcer",
    "Supernova Sage",
    "Void Vanguard",
    "Lunar Lord",
    "Solar Sentinel",
    "Nebula Nomad",
    "Starlight Strategist",
    "Cosmic Conqueror",
    "Universe Utopian",
    "Eternal Explorer",
];

/// Title for a level (levels start at 1)
pub fn rank_title(level: u32) -> &'static str {
    let index = (level.saturating_sub(1) / 2) as usize;
    RANK_TITLES[index.min(RANK_TITLES.len() - 1)]
}

/// What earned the points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Award {
    /// Obstacle left the bottom of the play field
    Dodge,
    /// Obstacle hit by a projectile
    Destroy,
}

/// Score tallies and current level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    pub dodged: u32,
    pub destroyed: u32,
    pub total: u32,
    pub level: u32,
}

impl Default for Scoreboard {
    fn default() -> Self {
        Self {
            dodged: 0,
            destroyed: 0,
            total: 0,
            level: 1,
        }
    }
}

impl Scoreboard {
    /// Add points for an award; returns the new level when it went up.
    ///
    /// The level rises once for every multiple of `POINTS_PER_LEVEL` the
    /// total passes, so a two-point award from 19 still lands one level-up.
    pub fn award(&mut self, award: Award, double_score: bool) -> Option<u32> {
        let points = if double_score { 2 } else { 1 };
        let before = self.total;
        match award {
            Award::Dodge => self.dodged += points,
            Award::Destroy => self.destroyed += points,
        }
        self.total = self.dodged + self.destroyed;

        let crossed = self.total / POINTS_PER_LEVEL - before / POINTS_PER_LEVEL;
        if crossed > 0 {
            self.level += crossed;
            Some(self.level)
        } else {
            None
        }
    }

    pub fn rank_title(&self) -> &'static str {
        rank_title(self.level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_rank_titles() {
        assert_eq!(rank_title(1), "Beginner");
        assert_eq!(rank_title(2), "Beginner");
        assert_eq!(rank_title(3), "Apprentice");
        assert_eq!(rank_title(99), "Eternal Explorer");
        assert_eq!(rank_title(100), "Eternal Explorer");
        assert_eq!(rank_title(10_000), "Eternal Explorer");
    }

    #[test]
    fn test_level_up_at_twenty() {
        let mut board = Scoreboard::default();
        for _ in 0..19 {
            assert_eq!(board.award(Award::Dodge, false), None);
        }
        assert_eq!(board.level, 1);
        assert_eq!(board.award(Award::Destroy, false), Some(2));
        assert_eq!(board.total, 20);
        assert_eq!(board.level, 2);
    }

    #[test]
    fn test_double_score_jump_over_boundary_levels_once() {
        let mut board = Scoreboard {
            dodged: 10,
            destroyed: 9,
            total: 19,
            level: 1,
        };
        assert_eq!(board.award(Award::Destroy, true), Some(2));
        assert_eq!(board.total, 21);
        assert_eq!(board.destroyed, 11);
        assert_eq!(board.level, 2);

        // 21 -> 23 crosses nothing
        assert_eq!(board.award(Award::Dodge, true), None);
        assert_eq!(board.level, 2);
    }

    proptest! {
        #[test]
        fn prop_total_and_level_track_awards(
            awards in prop::collection::vec((any::<bool>(), any::<bool>()), 0..400)
        ) {
            let mut board = Scoreboard::default();
            let mut last_level = board.level;
            for (destroy, double) in awards {
                let kind = if destroy { Award::Destroy } else { Award::Dodge };
                board.award(kind, double);
                prop_assert_eq!(board.total, board.dodged + board.destroyed);
                prop_assert!(board.level >= last_level);
                prop_assert!(board.level - last_level <= 1);
                prop_assert_eq!(board.level, 1 + board.total / POINTS_PER_LEVEL);
                last_level = board.level;
            }
        }

        #[test]
        fn prop_rank_title_always_defined(level in 1u32..100_000) {
            let title = rank_title(level);
            prop_assert!(RANK_TITLES.contains(&title));
        }
    }
}
