//! Resolving a user's choice among suggestions into one routing decision.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::agent::{AgentConnection, AgentId};
use super::engine::SuggestedRoute;
use crate::RoutingError;

/// Where a captured artifact goes. Always exactly one of the two.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RoutingDecision {
    /// Forward the artifact to the given agent.
    RouteToAgent(AgentId),
    /// Keep the artifact on the device only.
    SaveLocally,
}

/// One entry offered to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutingOption {
    /// A suggested destination.
    Suggested(SuggestedRoute),
    /// Keep the artifact local.
    SaveLocally,
}

/// Hands out routing presentations, at most one at a time.
///
/// # Example
///
/// ```
/// use capture_route::{
///     suggest, AgentConnection, CaptureRouting, RoutingDecision, RoutingPresenter, SensorType,
/// };
///
/// let agents = vec![AgentConnection::new("a2", "Interior Designer")];
/// let routing = CaptureRouting::new(SensorType::Lidar);
///
/// let presenter = RoutingPresenter::new();
/// let presentation = presenter.present(suggest(&routing, &agents), &agents).unwrap();
///
/// let choice = presentation.suggestions()[0].clone();
/// let decision = presentation.choose(&choice);
/// assert_eq!(decision, RoutingDecision::RouteToAgent("a2".into()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RoutingPresenter {
    active: Arc<AtomicBool>,
}

impl RoutingPresenter {
    /// Creates a presenter with no active presentation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` while a presentation awaits its decision.
    pub fn is_presenting(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Starts presenting suggestions resolved against the registered agents.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError::PresentationActive`] while another
    /// presentation from this presenter is alive.
    pub fn present<'a>(
        &self,
        suggestions: Vec<SuggestedRoute>,
        agents: &'a [AgentConnection],
    ) -> Result<RoutingPresentation<'a>, RoutingError> {
        if self.active.swap(true, Ordering::SeqCst) {
            return Err(RoutingError::PresentationActive);
        }
        Ok(RoutingPresentation {
            suggestions,
            agents,
            active: Arc::clone(&self.active),
        })
    }
}

/// A single presentation of routing suggestions.
///
/// Every resolving method consumes the presentation, so exactly one
/// [`RoutingDecision`] comes out of it. Dropping it without a decision
/// frees the presenter and decides nothing.
#[derive(Debug)]
pub struct RoutingPresentation<'a> {
    suggestions: Vec<SuggestedRoute>,
    agents: &'a [AgentConnection],
    active: Arc<AtomicBool>,
}

impl RoutingPresentation<'_> {
    /// The suggestions, in engine order.
    pub fn suggestions(&self) -> &[SuggestedRoute] {
        &self.suggestions
    }

    /// Everything the user can pick: the suggestions in engine order, then
    /// saving locally. Without suggestions, saving locally is the only option.
    pub fn options(&self) -> Vec<RoutingOption> {
        self.suggestions
            .iter()
            .cloned()
            .map(RoutingOption::Suggested)
            .chain(std::iter::once(RoutingOption::SaveLocally))
            .collect()
    }

    /// Resolves a picked option.
    pub fn resolve(self, option: &RoutingOption) -> RoutingDecision {
        match option {
            RoutingOption::Suggested(route) => self.choose(route),
            RoutingOption::SaveLocally => self.save_locally(),
        }
    }

    /// Resolves a picked suggestion to its agent.
    ///
    /// The agent is found by exact name. A suggestion that was not presented,
    /// or whose agent is no longer registered, saves locally instead.
    pub fn choose(self, route: &SuggestedRoute) -> RoutingDecision {
        if !self.suggestions.contains(route) {
            tracing::warn!(
                agent = %route.agent_name,
                "chosen route was not presented; saving locally"
            );
            return RoutingDecision::SaveLocally;
        }

        match self.agents.iter().find(|agent| agent.name == route.agent_name) {
            Some(agent) => {
                tracing::info!(agent = %agent.name, id = %agent.id, "routing capture to agent");
                RoutingDecision::RouteToAgent(agent.id.clone())
            }
            None => {
                tracing::warn!(
                    agent = %route.agent_name,
                    "no registered agent matches route; saving locally"
                );
                RoutingDecision::SaveLocally
            }
        }
    }

    /// Keeps the artifact local.
    pub fn save_locally(self) -> RoutingDecision {
        tracing::debug!("saving capture locally");
        RoutingDecision::SaveLocally
    }

    /// Closes the presentation without a pick; the artifact stays local.
    pub fn dismiss(self) -> RoutingDecision {
        tracing::debug!("routing presentation dismissed");
        RoutingDecision::SaveLocally
    }
}

impl Drop for RoutingPresentation<'_> {
    fn drop(&mut self) {
        self.active.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{suggest, CaptureRouting, SensorType};

    fn agents() -> Vec<AgentConnection> {
        vec![
            AgentConnection::new("a1", "Fitness Coach"),
            AgentConnection::new("a2", "Wellness Buddy"),
        ]
    }

    #[test]
    fn test_empty_suggestions_offer_only_save_locally() {
        let agents = agents();
        let presenter = RoutingPresenter::new();
        let presentation = presenter.present(Vec::new(), &agents).unwrap();
        assert_eq!(presentation.options(), vec![RoutingOption::SaveLocally]);

        // A route that was never presented cannot reach an agent
        let stray = suggest(&CaptureRouting::new(SensorType::Motion), &agents)[0].clone();
        assert_eq!(presentation.choose(&stray), RoutingDecision::SaveLocally);
    }

    #[test]
    fn test_options_follow_engine_order() {
        let agents = agents();
        let routes = suggest(&CaptureRouting::new(SensorType::Motion), &agents);
        let presenter = RoutingPresenter::new();
        let presentation = presenter.present(routes.clone(), &agents).unwrap();

        let options = presentation.options();
        assert_eq!(options.len(), routes.len() + 1);
        assert_eq!(options[0], RoutingOption::Suggested(routes[0].clone()));
        assert_eq!(options.last(), Some(&RoutingOption::SaveLocally));
    }

    #[test]
    fn test_choose_resolves_by_exact_name() {
        let agents = agents();
        let routes = suggest(&CaptureRouting::new(SensorType::Motion), &agents);
        let presenter = RoutingPresenter::new();
        let presentation = presenter.present(routes, &agents).unwrap();

        let option = presentation.options()[1].clone();
        assert_eq!(
            presentation.resolve(&option),
            RoutingDecision::RouteToAgent(AgentId::new("a2"))
        );
    }

    #[test]
    fn test_renamed_agent_degrades_to_save_locally() {
        let before = agents();
        let routes = suggest(&CaptureRouting::new(SensorType::Motion), &before);
        let after = vec![AgentConnection::new("a1", "Fitness Coach Pro")];

        let presenter = RoutingPresenter::new();
        let presentation = presenter.present(routes.clone(), &after).unwrap();
        assert_eq!(presentation.choose(&routes[0]), RoutingDecision::SaveLocally);
    }

    #[test]
    fn test_one_presentation_at_a_time() {
        let agents = agents();
        let presenter = RoutingPresenter::new();

        let first = presenter.present(Vec::new(), &agents).unwrap();
        assert!(presenter.is_presenting());
        assert!(matches!(
            presenter.present(Vec::new(), &agents),
            Err(RoutingError::PresentationActive)
        ));

        assert_eq!(first.dismiss(), RoutingDecision::SaveLocally);
        assert!(!presenter.is_presenting());
        assert!(presenter.present(Vec::new(), &agents).is_ok());
    }
}
