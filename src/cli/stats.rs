use std::collections::HashMap;
use std::time::Duration;

use crate::game::game::GameResult;

#[derive(Debug, Default, Clone)]
pub struct GameStats {
    pub wins: HashMap<usize, u32>,
    pub scores_by_seat: HashMap<usize, Vec<u32>>,
    pub games: u32,
    pub total_rounds: u64,
    pub total_winning_score: u64,
    pub total_duration: Duration,
}

impl GameStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_game(&mut self, result: &GameResult, duration: Duration) {
        self.games += 1;
        self.total_duration += duration;
        self.total_rounds += u64::from(result.rounds);

        if let Some(winner) = result.winner {
            *self.wins.entry(winner).or_insert(0) += 1;
            self.total_winning_score += u64::from(result.scores[winner].total());
        }

        for (seat, score) in result.scores.iter().enumerate() {
            self.scores_by_seat
                .entry(seat)
                .or_default()
                .push(score.total());
        }
    }

    pub fn win_rate(&self, seat: usize) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        f64::from(self.wins.get(&seat).copied().unwrap_or(0)) / f64::from(self.games) * 100.0
    }

    pub fn get_avg_score(&self, seat: usize) -> f64 {
        match self.scores_by_seat.get(&seat) {
            Some(scores) if !scores.is_empty() => {
                f64::from(scores.iter().sum::<u32>()) / scores.len() as f64
            }
            _ => 0.0,
        }
    }

    pub fn get_avg_rounds(&self) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        self.total_rounds as f64 / f64::from(self.games)
    }

    pub fn get_avg_winning_score(&self) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        self.total_winning_score as f64 / f64::from(self.games)
    }

    pub fn get_avg_duration(&self) -> Duration {
        if self.games == 0 {
            return Duration::ZERO;
        }
        self.total_duration / self.games
    }
}

pub struct StatisticsAccumulator {
    pub stats: GameStats,
}

impl StatisticsAccumulator {
    pub fn new() -> Self {
        Self {
            stats: GameStats::new(),
        }
    }

    pub fn after(&mut self, result: &GameResult, duration: Duration) {
        self.stats.record_game(result, duration);
    }
}

impl Default for StatisticsAccumulator {
    fn default() -> Self {
        Self::new()
    }
}
