//! Lookup state for an interactive view
//!
//! The view shows at most one ticker at a time. Lookups may overlap when the
//! user types a new ticker before the previous answer arrives, so every
//! lookup gets a [`RequestId`] and only the most recent one may change what
//! is displayed. A slower, older answer is dropped.

use crate::analysis::Analysis;
use crate::error::AcquisitionError;
use std::fmt;
use tracing::debug;
use uuid::Uuid;

/// Identity of one lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(Uuid);

impl RequestId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What the view is currently showing
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LookupState {
    /// Home view, nothing requested
    #[default]
    Idle,
    Loading {
        request: RequestId,
        ticker: String,
    },
    Loaded(Box<Analysis>),
    Failed {
        ticker: String,
        error: AcquisitionError,
    },
}

/// Last-request-wins state machine over [`LookupState`]
#[derive(Debug, Default)]
pub struct LookupController {
    state: LookupState,
}

impl LookupController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &LookupState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, LookupState::Loading { .. })
    }

    /// Ticker being loaded, shown or failed
    pub fn ticker(&self) -> Option<&str> {
        match &self.state {
            LookupState::Idle => None,
            LookupState::Loading { ticker, .. } | LookupState::Failed { ticker, .. } => {
                Some(ticker)
            }
            LookupState::Loaded(analysis) => Some(&analysis.record.ticker),
        }
    }

    /// Start a lookup, superseding any lookup still in flight
    pub fn begin(&mut self, ticker: impl Into<String>) -> RequestId {
        let request = RequestId::new();
        let ticker = ticker.into();
        if let LookupState::Loading {
            request: previous, ..
        } = &self.state
        {
            debug!(%previous, %request, %ticker, "Superseding lookup in flight");
        }
        self.state = LookupState::Loading { request, ticker };
        request
    }

    /// Apply a finished lookup
    ///
    /// Returns `false`, leaving the state untouched, unless `request` is the
    /// lookup currently loading.
    pub fn complete(
        &mut self,
        request: RequestId,
        result: Result<Analysis, AcquisitionError>,
    ) -> bool {
        let ticker = match &self.state {
            LookupState::Loading {
                request: current,
                ticker,
            } if *current == request => ticker.clone(),
            _ => {
                debug!(%request, "Discarding stale lookup result");
                return false;
            }
        };

        self.state = match result {
            Ok(analysis) => LookupState::Loaded(Box::new(analysis)),
            Err(error) => LookupState::Failed { ticker, error },
        };
        true
    }

    /// Restart the failed lookup
    ///
    /// Returns `None` unless the view is showing a failure.
    pub fn retry(&mut self) -> Option<(RequestId, String)> {
        let LookupState::Failed { ticker, .. } = &self.state else {
            return None;
        };
        let ticker = ticker.clone();
        Some((self.begin(ticker.clone()), ticker))
    }

    /// Back to the home view; results still in flight will be discarded
    pub fn reset(&mut self) {
        self.state = LookupState::Idle;
    }
}
