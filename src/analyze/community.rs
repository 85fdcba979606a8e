//! Community signal: votes and views → relevance/accuracy/engagement/popularity.

use crate::model::PartialMetrics;

/// Relevance used when nobody has voted yet.
pub const NEUTRAL_RELEVANCE: f64 = 0.5;

/// Votes for "max engagement".
const ENGAGEMENT_VOTES_CAP: f64 = 10.0;
/// Views for "max popularity".
const POPULARITY_VIEWS_CAP: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommunitySignal {
    pub relevance: f64,
    pub accuracy: Option<f64>,
    pub engagement: Option<f64>,
    pub popularity: Option<f64>,
}

impl CommunitySignal {
    pub fn has_votes(&self) -> bool {
        self.accuracy.is_some()
    }

    /// Shape used by the combiner. Engagement and popularity are informational only.
    pub fn to_partial(&self) -> PartialMetrics {
        PartialMetrics {
            relevance: Some(self.relevance),
            accuracy: self.accuracy,
            ..Default::default()
        }
    }
}

pub fn aggregate(upvotes: u32, downvotes: u32, views: u32) -> CommunitySignal {
    let total = u64::from(upvotes) + u64::from(downvotes);
    if total == 0 {
        return CommunitySignal {
            relevance: NEUTRAL_RELEVANCE,
            accuracy: None,
            engagement: None,
            popularity: None,
        };
    }

    let vote_ratio = f64::from(upvotes) / total as f64;
    let accuracy = if vote_ratio > 0.8 {
        0.9
    } else if vote_ratio > 0.6 {
        0.7
    } else {
        0.5
    };

    CommunitySignal {
        relevance: vote_ratio,
        accuracy: Some(accuracy),
        engagement: Some((total as f64 / ENGAGEMENT_VOTES_CAP).min(1.0)),
        popularity: Some((f64::from(views) / POPULARITY_VIEWS_CAP).min(1.0)),
    }
}
