use std::future::Future;

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::errors::{ErrorClass, MacroDataError};
use crate::models::DataSource;

/// Result of one provider fetch inside a view.
#[derive(Clone, Debug, PartialEq)]
pub enum FetchOutcome<T> {
    /// The fetch completed. `None` means the source had no usable data.
    Ready(Option<T>),
    /// The fetch failed in transport; the message is shown for this source.
    Failed(String),
    /// The fetch was abandoned; nothing is reported.
    Cancelled,
}

impl<T> FetchOutcome<T> {
    /// Outcome of one part of a grouped fetch. A failed or cancelled group carries over to
    /// every part.
    pub fn project<U>(&self, part: impl FnOnce(&T) -> Option<U>) -> FetchOutcome<U> {
        match self {
            Self::Ready(data) => FetchOutcome::Ready(data.as_ref().and_then(part)),
            Self::Failed(e) => FetchOutcome::Failed(e.clone()),
            Self::Cancelled => FetchOutcome::Cancelled,
        }
    }
}

/// Runs `fetch` until it completes or `cancel` fires.
///
/// Decode errors become "no data"; transport errors keep their message.
pub async fn run_cancellable<T, F>(
    cancel: &CancellationToken,
    source: DataSource,
    fetch: F,
) -> FetchOutcome<T>
where
    F: Future<Output = Result<Option<T>, MacroDataError>>,
{
    let result = tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(MacroDataError::Cancelled),
        result = fetch => result,
    };

    match result {
        Ok(data) => FetchOutcome::Ready(data),
        Err(e) => match e.class() {
            ErrorClass::Cancelled => FetchOutcome::Cancelled,
            ErrorClass::Decode => {
                warn!("{} payload treated as no data: {}", source, e);
                FetchOutcome::Ready(None)
            }
            ErrorClass::Transport => FetchOutcome::Failed(e.to_string()),
        },
    }
}

/// Where a view keeps one source's data and error.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceSlot<T> {
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> Default for SourceSlot<T> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
        }
    }
}

impl<T> SourceSlot<T> {
    /// Applies an outcome. A cancelled fetch leaves the slot untouched.
    pub fn apply(&mut self, outcome: FetchOutcome<T>) {
        match outcome {
            FetchOutcome::Ready(data) => {
                self.data = data;
                self.error = None;
            }
            FetchOutcome::Failed(message) => self.error = Some(message),
            FetchOutcome::Cancelled => {}
        }
    }

    pub fn from_outcome(outcome: FetchOutcome<T>) -> Self {
        let mut slot = Self::default();
        slot.apply(outcome);
        slot
    }

    pub fn state(&self) -> SourceState {
        match (&self.data, &self.error) {
            (_, Some(_)) => SourceState::Failed,
            (Some(_), None) => SourceState::Ready,
            (None, None) => SourceState::NoData,
        }
    }
}

/// Display state of one source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SourceState {
    Ready,
    NoData,
    Failed,
}

/// Status line reported for one fetch of a view.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceStatus {
    /// Fetch name within the view (`ecb.gdp`, `fred.DGS10`, ...)
    pub key: String,
    pub source: DataSource,
    pub state: SourceState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SourceStatus {
    pub fn of<T>(key: impl Into<String>, source: DataSource, slot: &SourceSlot<T>) -> Self {
        Self {
            key: key.into(),
            source,
            state: slot.state(),
            error: slot.error.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ready_and_no_data() {
        let token = CancellationToken::new();
        let outcome = run_cancellable(&token, DataSource::Ecb, async { Ok(Some(1)) }).await;
        assert_eq!(outcome, FetchOutcome::Ready(Some(1)));

        let outcome: FetchOutcome<i32> =
            run_cancellable(&token, DataSource::Ecb, async { Ok(None) }).await;
        assert_eq!(outcome, FetchOutcome::Ready(None));
    }

    #[tokio::test]
    async fn test_decode_error_is_no_data() {
        let token = CancellationToken::new();
        let outcome: FetchOutcome<i32> = run_cancellable(&token, DataSource::Eurostat, async {
            Err(MacroDataError::decode("EUROSTAT", "bad cube"))
        })
        .await;
        assert_eq!(outcome, FetchOutcome::Ready(None));
    }

    #[tokio::test]
    async fn test_transport_error_keeps_message() {
        let token = CancellationToken::new();
        let outcome: FetchOutcome<i32> = run_cancellable(&token, DataSource::Fred, async {
            Err(MacroDataError::HttpStatus {
                provider: "FRED".to_string(),
                status: 500,
            })
        })
        .await;
        assert_eq!(outcome, FetchOutcome::Failed("HTTP 500 from FRED".to_string()));
    }

    #[tokio::test]
    async fn test_cancelled_before_completion() {
        let token = CancellationToken::new();
        token.cancel();
        let outcome: FetchOutcome<i32> =
            run_cancellable(&token, DataSource::Fmp, std::future::pending()).await;
        assert_eq!(outcome, FetchOutcome::Cancelled);
    }

    #[tokio::test]
    async fn test_cancelled_error_from_fetch() {
        let token = CancellationToken::new();
        let outcome: FetchOutcome<i32> = run_cancellable(&token, DataSource::Ecb, async {
            Err(MacroDataError::Cancelled)
        })
        .await;
        assert_eq!(outcome, FetchOutcome::Cancelled);
    }

    #[test]
    fn test_project_shares_group_result() {
        let group = FetchOutcome::Ready(Some((1, Some(2))));
        assert_eq!(group.project(|g| Some(g.0)), FetchOutcome::Ready(Some(1)));
        assert_eq!(group.project(|g| g.1), FetchOutcome::Ready(Some(2)));

        let failed: FetchOutcome<(i32, Option<i32>)> =
            FetchOutcome::Failed("HTTP 503 from FRED".to_string());
        assert_eq!(
            failed.project(|g| g.1),
            FetchOutcome::Failed("HTTP 503 from FRED".to_string())
        );

        let cancelled: FetchOutcome<(i32, Option<i32>)> = FetchOutcome::Cancelled;
        assert_eq!(cancelled.project(|g| Some(g.0)), FetchOutcome::Cancelled);
    }

    #[test]
    fn test_slot_ignores_cancelled() {
        let mut slot = SourceSlot::from_outcome(FetchOutcome::Ready(Some(7)));
        slot.apply(FetchOutcome::Cancelled);
        assert_eq!(slot.data, Some(7));
        assert_eq!(slot.state(), SourceState::Ready);

        slot.apply(FetchOutcome::Failed("HTTP 503 from ECB".to_string()));
        assert_eq!(slot.state(), SourceState::Failed);
        assert_eq!(slot.error.as_deref(), Some("HTTP 503 from ECB"));
    }

    #[test]
    fn test_slot_no_data_has_no_error() {
        let slot: SourceSlot<i32> = SourceSlot::from_outcome(FetchOutcome::Ready(None));
        assert_eq!(slot.state(), SourceState::NoData);
        assert!(slot.error.is_none());
    }
}
