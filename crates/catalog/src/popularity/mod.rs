pub mod engine;
pub mod handlers;

pub use engine::{
    assign_ranks, score, CommentProxyViews, EngagementSignals, PageViewSource, PassSummary,
    PopularityEngine, ScoringConfig,
};
