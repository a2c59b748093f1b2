//! Review-cycle state machine for one operator session
//!
//! ```text
//! Empty --submit--> Analyzing --ok--> Review --confirm--> Saving --ok--> Empty
//!                       |                                   |
//!                       +--fail--> Empty         Review <--fail
//! ```
//!
//! `discard` returns to `Empty` from any state.

use crate::leads::analysis::LeadAnalysis;
use crate::leads::analyzer::LeadAnalyzer;
use crate::leads::appender::{append_analysis, LeadStore};
use crate::storage::LeadRecord;
use crate::{BlueSdrError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ReviewState {
    #[default]
    Empty,
    Analyzing,
    Review(LeadAnalysis),
    Saving(LeadAnalysis),
}

impl ReviewState {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Analyzing => "analyzing",
            Self::Review(_) => "review",
            Self::Saving(_) => "saving",
        }
    }
}

/// Holds at most one transient analysis between submission and save.
#[derive(Debug, Default)]
pub struct ReviewSession {
    state: ReviewState,
}

impl ReviewSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ReviewState {
        &self.state
    }

    /// The analysis awaiting confirmation, if any
    pub fn current_analysis(&self) -> Option<&LeadAnalysis> {
        match &self.state {
            ReviewState::Review(analysis) | ReviewState::Saving(analysis) => Some(analysis),
            _ => None,
        }
    }

    /// Analyze a transcript. A pending analysis is replaced on success and
    /// dropped on failure.
    pub async fn submit(&mut self, analyzer: &LeadAnalyzer, transcript: &str) -> Result<&LeadAnalysis> {
        if let ReviewState::Saving(_) = self.state {
            return Err(BlueSdrError::InvalidState(
                "cannot analyze while a save is in progress".to_string(),
            ));
        }

        self.state = ReviewState::Analyzing;

        match analyzer.analyze(transcript).await {
            Ok(analysis) => {
                self.state = ReviewState::Review(analysis);
                self.current_analysis().ok_or_else(|| {
                    BlueSdrError::InvalidState("analysis vanished after review".to_string())
                })
            }
            Err(e) => {
                self.state = ReviewState::Empty;
                Err(e)
            }
        }
    }

    /// Append the reviewed analysis. On success the session is emptied so the
    /// same analysis cannot be saved again; on failure it stays in review.
    pub fn confirm<S>(&mut self, store: &S, timestamp: String) -> Result<LeadRecord>
    where
        S: LeadStore + ?Sized,
    {
        let analysis = match std::mem::take(&mut self.state) {
            ReviewState::Review(analysis) => analysis,
            other => {
                let label = other.label();
                self.state = other;
                return Err(BlueSdrError::InvalidState(format!(
                    "nothing to save (session is {})",
                    label
                )));
            }
        };

        self.state = ReviewState::Saving(analysis.clone());

        match append_analysis(store, &analysis, timestamp) {
            Ok(record) => {
                self.state = ReviewState::Empty;
                Ok(record)
            }
            Err(e) => {
                tracing::warn!("Save failed, keeping analysis for retry: {}", e);
                self.state = ReviewState::Review(analysis);
                Err(e)
            }
        }
    }

    /// Drop any pending analysis
    pub fn discard(&mut self) {
        self.state = ReviewState::Empty;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leads::analyzer::tests::analyzer;
    use crate::leads::analyzer::FailurePolicy;
    use crate::leads::parser::GENERATION_SENTINEL;
    use crate::leads::prompt::ResponseFormat;
    use crate::storage::Database;
    use anyhow::anyhow;
    use std::cell::RefCell;

    const ANA: &str = "Ana|Instagram|Hot|Price objection|Send case study|Hi Ana, ...";

    /// Store that fails until `fail_times` reaches zero.
    struct FlakyStore {
        fail_times: RefCell<usize>,
        rows: RefCell<Vec<LeadRecord>>,
    }

    impl FlakyStore {
        fn new(fail_times: usize) -> Self {
            Self {
                fail_times: RefCell::new(fail_times),
                rows: RefCell::new(Vec::new()),
            }
        }
    }

    impl LeadStore for FlakyStore {
        fn append_lead(&self, record: &LeadRecord) -> anyhow::Result<i64> {
            let mut remaining = self.fail_times.borrow_mut();
            if *remaining > 0 {
                *remaining -= 1;
                anyhow::bail!("store unreachable");
            }
            let mut rows = self.rows.borrow_mut();
            rows.push(record.clone());
            Ok(rows.len() as i64)
        }
    }

    fn delimited(responses: Vec<anyhow::Result<String>>) -> LeadAnalyzer {
        analyzer(responses, ResponseFormat::Delimited, FailurePolicy::Propagate)
    }

    #[test]
    fn new_session_is_empty() {
        let session = ReviewSession::new();
        assert_eq!(session.state(), &ReviewState::Empty);
        assert!(session.current_analysis().is_none());
    }

    #[test]
    fn successful_parse_moves_to_review() {
        let analyzer = delimited(vec![Ok(ANA.to_string())]);
        let mut session = ReviewSession::new();

        let analysis = tokio_test::block_on(session.submit(&analyzer, "chat")).unwrap();
        assert_eq!(analysis.name, "Ana");
        assert_eq!(session.state().label(), "review");
    }

    #[test]
    fn parse_failure_returns_to_empty() {
        let analyzer = delimited(vec![Ok(ANA.to_string()), Ok("not enough".to_string())]);
        let mut session = ReviewSession::new();

        tokio_test::block_on(session.submit(&analyzer, "first")).unwrap();
        let err = tokio_test::block_on(session.submit(&analyzer, "second")).unwrap_err();

        assert!(matches!(err, BlueSdrError::InsufficientContext { .. }));
        assert_eq!(session.state(), &ReviewState::Empty);
    }

    #[test]
    fn new_submission_replaces_pending_analysis() {
        let analyzer = delimited(vec![
            Ok(ANA.to_string()),
            Ok("Bruno|Google|Warm|Time|0|Hello".to_string()),
        ]);
        let mut session = ReviewSession::new();

        tokio_test::block_on(session.submit(&analyzer, "first")).unwrap();
        tokio_test::block_on(session.submit(&analyzer, "second")).unwrap();
        assert_eq!(session.current_analysis().unwrap().name, "Bruno");
    }

    #[test]
    fn successful_append_clears_session() {
        let analyzer = delimited(vec![Ok(ANA.to_string())]);
        let store = FlakyStore::new(0);
        let mut session = ReviewSession::new();

        tokio_test::block_on(session.submit(&analyzer, "chat")).unwrap();
        let record = session.confirm(&store, "19/10/2026 10:30".to_string()).unwrap();

        assert_eq!(record.id, 1);
        assert_eq!(session.state(), &ReviewState::Empty);
        assert_eq!(store.rows.borrow().len(), 1);
    }

    #[test]
    fn failed_append_keeps_analysis_for_retry() {
        let analyzer = delimited(vec![Ok(ANA.to_string())]);
        let store = FlakyStore::new(1);
        let mut session = ReviewSession::new();

        tokio_test::block_on(session.submit(&analyzer, "chat")).unwrap();
        let before = session.current_analysis().cloned();

        let err = session.confirm(&store, "t1".to_string()).unwrap_err();
        assert!(matches!(err, BlueSdrError::Append(_)));
        assert_eq!(session.current_analysis().cloned(), before);
        assert_eq!(session.state().label(), "review");

        session.confirm(&store, "t2".to_string()).unwrap();
        assert_eq!(session.state(), &ReviewState::Empty);
        assert_eq!(store.rows.borrow()[0].timestamp, "t2");
    }

    #[test]
    fn confirm_without_analysis_is_rejected() {
        let store = FlakyStore::new(0);
        let mut session = ReviewSession::new();

        let err = session.confirm(&store, "now".to_string()).unwrap_err();
        assert!(matches!(err, BlueSdrError::InvalidState(_)));
        assert!(store.rows.borrow().is_empty());
    }

    #[test]
    fn saved_analysis_cannot_be_saved_twice() {
        let analyzer = delimited(vec![Ok(ANA.to_string())]);
        let store = FlakyStore::new(0);
        let mut session = ReviewSession::new();

        tokio_test::block_on(session.submit(&analyzer, "chat")).unwrap();
        session.confirm(&store, "now".to_string()).unwrap();
        assert!(session.confirm(&store, "now".to_string()).is_err());
        assert_eq!(store.rows.borrow().len(), 1);
    }

    #[test]
    fn discard_drops_pending_analysis() {
        let analyzer = delimited(vec![Ok(ANA.to_string())]);
        let mut session = ReviewSession::new();

        tokio_test::block_on(session.submit(&analyzer, "chat")).unwrap();
        session.discard();
        assert!(session.current_analysis().is_none());
    }

    #[test]
    fn generation_failure_with_sentinel_policy_reaches_review() {
        let analyzer = analyzer(
            vec![Err(anyhow!("auth error"))],
            ResponseFormat::Delimited,
            FailurePolicy::Sentinel,
        );
        let mut session = ReviewSession::new();

        let analysis = tokio_test::block_on(session.submit(&analyzer, "chat")).unwrap();
        assert_eq!(
            analysis.fields().join("|"),
            GENERATION_SENTINEL
        );
    }

    #[test]
    fn confirm_writes_to_database() {
        let analyzer = delimited(vec![Ok(ANA.to_string())]);
        let db = Database::open_memory().unwrap();
        let mut session = ReviewSession::new();

        tokio_test::block_on(session.submit(&analyzer, "chat")).unwrap();
        let record = session.confirm(&db, "19/10/2026 10:30".to_string()).unwrap();

        let stored = db.all_leads().unwrap();
        assert_eq!(stored, vec![record]);
    }
}
