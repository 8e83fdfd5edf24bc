use serde::{Deserialize, Serialize};

/// One criterion's weight (percentage points) paired with the score it received.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightedScore {
    pub weight: f64,
    pub score: f64,
}

impl WeightedScore {
    pub fn new(weight: f64, score: f64) -> Self {
        Self { weight, score }
    }
}

/// Weighted average of the scores, rounded half up once after the division.
///
/// Returns 0 for an empty slice or a non-positive weight total, and never leaves `0..=100`.
pub fn overall_score(scores: &[WeightedScore]) -> u8 {
    let total_weight: f64 = scores.iter().map(|entry| entry.weight).sum();
    if !(total_weight.is_finite() && total_weight > 0.0) {
        return 0;
    }

    let weighted_sum: f64 = scores.iter().map(|entry| entry.score * entry.weight).sum();
    (weighted_sum / total_weight).round().clamp(0.0, 100.0) as u8
}

/// Qualitative label shown next to an overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Excellent,
    VeryGood,
    Good,
    NeedsImprovement,
}

impl ScoreBand {
    pub fn for_score(score: f64) -> Self {
        if score >= 90.0 {
            Self::Excellent
        } else if score >= 75.0 {
            Self::VeryGood
        } else if score >= 60.0 {
            Self::Good
        } else {
            Self::NeedsImprovement
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::VeryGood => "Very Good",
            Self::Good => "Good",
            Self::NeedsImprovement => "Needs Improvement",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_weights_average_the_scores() {
        let scores = [WeightedScore::new(50.0, 80.0), WeightedScore::new(50.0, 60.0)];
        assert_eq!(overall_score(&scores), 70);
    }

    #[test]
    fn degenerate_inputs_score_zero() {
        assert_eq!(overall_score(&[]), 0);
        assert_eq!(overall_score(&[WeightedScore::new(0.0, 90.0)]), 0);
    }

    #[test]
    fn order_does_not_change_the_result() {
        let forward = [
            WeightedScore::new(40.0, 95.0),
            WeightedScore::new(35.0, 62.0),
            WeightedScore::new(25.0, 71.0),
        ];
        let mut reversed = forward;
        reversed.reverse();
        assert_eq!(overall_score(&forward), overall_score(&reversed));
        // (3800 + 2170 + 1775) / 100 = 77.45
        assert_eq!(overall_score(&forward), 77);
    }

    #[test]
    fn rounds_half_up_after_division() {
        let scores = [WeightedScore::new(1.0, 70.0), WeightedScore::new(1.0, 71.0)];
        assert_eq!(overall_score(&scores), 71);
    }

    #[test]
    fn weights_need_not_sum_to_one_hundred() {
        let scores = [WeightedScore::new(30.0, 90.0), WeightedScore::new(10.0, 50.0)];
        assert_eq!(overall_score(&scores), 80);
    }

    #[test]
    fn bands_follow_form_thresholds() {
        assert_eq!(ScoreBand::for_score(90.0), ScoreBand::Excellent);
        assert_eq!(ScoreBand::for_score(89.9), ScoreBand::VeryGood);
        assert_eq!(ScoreBand::for_score(75.0), ScoreBand::VeryGood);
        assert_eq!(ScoreBand::for_score(60.0), ScoreBand::Good);
        assert_eq!(ScoreBand::for_score(59.0), ScoreBand::NeedsImprovement);
    }
}
