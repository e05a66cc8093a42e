/// Completed-review count and average score for one document, computed on read
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoreSummary {
    pub review_count: u64,
    pub average_score: Option<f64>,
}

impl ScoreSummary {
    pub fn from_scores(scores: &[i32]) -> Self {
        if scores.is_empty() {
            return Self::default();
        }
        let total: i64 = scores.iter().map(|s| i64::from(*s)).sum();
        let average = total as f64 / scores.len() as f64;
        Self {
            review_count: scores.len() as u64,
            average_score: Some((average * 100.0).round() / 100.0),
        }
    }
}
