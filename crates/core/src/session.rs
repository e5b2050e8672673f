//! Load-gated explorer session
//!
//! Every interactive entry point is rejected until the dataset has loaded
//! successfully, and stays rejected after a failed load.

use rand::seq::IndexedRandom;
use rand::Rng;
use serde::Serialize;
use tracing::{debug, error, info};

use crate::dataset::PositionRepository;
use crate::error::{Error, Result};
use crate::filter::{filter_positions, is_visible, FilterChange, FilterState};
use crate::highlight::{Highlight, HighlightTarget};
use crate::stats::aggregate;
use crate::view::{DotView, PositionDetail, ViewModel};

/// Session-scoped filter and highlight selection
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub filter: FilterState,
    pub highlight: Highlight,
}

impl Session {
    pub fn new(repository: &PositionRepository) -> Self {
        Self {
            filter: FilterState::defaults(repository.score_bounds()),
            highlight: Highlight::None,
        }
    }
}

/// Filter, aggregate and mark highlighted dots in one pass
pub fn recompute(repository: &PositionRepository, session: &Session) -> ViewModel {
    let visible = filter_positions(repository.positions(), &session.filter);
    let statistics = aggregate(&visible);

    let dots = visible
        .iter()
        .map(|p| DotView {
            number: p.number(),
            category: p.classification.category,
            color: p.classification.color,
            opacity: p.classification.opacity,
            highlighted: session.highlight.matches(p),
        })
        .collect();

    debug!(visible = statistics.total, "Recomputed view");

    ViewModel {
        dots,
        statistics,
        highlight: session.highlight.clone(),
        filter: session.filter.clone(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "snake_case")]
pub enum LoadStatus {
    Pending,
    Ready,
    Failed(String),
}

enum LoadState {
    Pending,
    Ready {
        repository: PositionRepository,
        session: Session,
    },
    Failed(String),
}

pub struct Explorer {
    state: LoadState,
}

impl Default for Explorer {
    fn default() -> Self {
        Self::new()
    }
}

impl Explorer {
    pub fn new() -> Self {
        Self {
            state: LoadState::Pending,
        }
    }

    /// Convenience for callers that already hold a loaded repository
    pub fn with_repository(repository: PositionRepository) -> Self {
        let session = Session::new(&repository);
        Self {
            state: LoadState::Ready { repository, session },
        }
    }

    /// Resolves the initial dataset fetch. Only the first resolution counts.
    pub fn complete_load(&mut self, result: Result<PositionRepository>) -> Result<()> {
        if !matches!(self.state, LoadState::Pending) {
            return Err(Error::NotReady("dataset load already resolved".to_string()));
        }
        match result {
            Ok(repository) => {
                info!(positions = repository.len(), "Explorer ready");
                let session = Session::new(&repository);
                self.state = LoadState::Ready { repository, session };
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Dataset load failed, interaction disabled");
                let message = e.to_string();
                self.state = LoadState::Failed(message);
                Err(e)
            }
        }
    }

    pub fn status(&self) -> LoadStatus {
        match &self.state {
            LoadState::Pending => LoadStatus::Pending,
            LoadState::Ready { .. } => LoadStatus::Ready,
            LoadState::Failed(message) => LoadStatus::Failed(message.clone()),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, LoadState::Ready { .. })
    }

    fn not_ready(&self) -> Error {
        match &self.state {
            LoadState::Failed(message) => Error::NotReady(format!("dataset failed to load: {}", message)),
            _ => Error::NotReady("dataset still loading".to_string()),
        }
    }

    fn ready(&self) -> Result<(&PositionRepository, &Session)> {
        match &self.state {
            LoadState::Ready { repository, session } => Ok((repository, session)),
            _ => Err(self.not_ready()),
        }
    }

    fn ready_mut(&mut self) -> Result<(&PositionRepository, &mut Session)> {
        if !self.is_ready() {
            return Err(self.not_ready());
        }
        match &mut self.state {
            LoadState::Ready { repository, session } => Ok((&*repository, session)),
            _ => Err(Error::NotReady("dataset still loading".to_string())),
        }
    }

    pub fn repository(&self) -> Result<&PositionRepository> {
        self.ready().map(|(repository, _)| repository)
    }

    pub fn session(&self) -> Result<&Session> {
        self.ready().map(|(_, session)| session)
    }

    pub fn view(&self) -> Result<ViewModel> {
        let (repository, session) = self.ready()?;
        Ok(recompute(repository, session))
    }

    pub fn apply_filter_change(&mut self, change: FilterChange) -> Result<ViewModel> {
        let (repository, session) = self.ready_mut()?;
        debug!(?change, "Applying filter change");
        session.filter.apply(change);
        Ok(recompute(repository, session))
    }

    /// Highlights are independent of filtering and are never cleared by it
    pub fn toggle_highlight(&mut self, target: HighlightTarget) -> Result<ViewModel> {
        let (repository, session) = self.ready_mut()?;
        session.highlight.toggle(target);
        Ok(recompute(repository, session))
    }

    /// Replaces filter and highlight with their defaults
    pub fn reset(&mut self) -> Result<ViewModel> {
        let (repository, session) = self.ready_mut()?;
        *session = Session::new(repository);
        Ok(recompute(repository, session))
    }

    pub fn position(&self, number: u32) -> Result<PositionDetail> {
        let (repository, session) = self.ready()?;
        let p = repository
            .get(number)
            .ok_or(Error::UnknownPosition(number))?;
        Ok(PositionDetail::new(p, is_visible(p, &session.filter)))
    }

    /// Random position from the current visible subset, for drilling
    pub fn practice<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Option<PositionDetail>> {
        let (repository, session) = self.ready()?;
        let visible = filter_positions(repository.positions(), &session.filter);
        Ok(visible.choose(rng).map(|p| PositionDetail::new(p, true)))
    }
}
