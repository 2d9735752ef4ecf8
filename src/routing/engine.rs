//! Routing decision engine.
//!
//! Turns a capture summary and the registered agents into a ranked list of
//! suggested destinations. The engine holds only immutable configuration:
//! identical inputs always give identical, identically ordered output.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::agent::AgentConnection;
use super::rules::{best_rule, rules_for, AffinityRule};
use crate::RoutingConfig;

/// The sensor that produced a capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SensorType {
    /// Room scan from the depth sensor.
    Lidar,
    /// Barcode or QR code.
    Barcode,
    /// One or more photos.
    Camera,
    /// Product recognized by the camera.
    ProductScan,
    /// Proximity beacon event.
    Beacon,
    /// Motion sensor data.
    Motion,
    /// Health readings.
    Health,
}

impl SensorType {
    /// Returns the wire name of the sensor type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lidar => "lidar",
            Self::Barcode => "barcode",
            Self::Camera => "camera",
            Self::ProductScan => "productScan",
            Self::Beacon => "beacon",
            Self::Motion => "motion",
            Self::Health => "health",
        }
    }
}

impl std::fmt::Display for SensorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary of a capture event, as seen by the routing engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureRouting {
    /// Sensor that produced the capture.
    pub sensor_type: SensorType,
    /// Number of photos in a camera capture.
    #[serde(default)]
    pub photo_count: u32,
}

impl CaptureRouting {
    /// Creates a summary for the given sensor with no photos.
    pub fn new(sensor_type: SensorType) -> Self {
        Self {
            sensor_type,
            photo_count: 0,
        }
    }

    /// Creates a camera summary with the given photo count.
    pub fn photos(count: u32) -> Self {
        Self {
            sensor_type: SensorType::Camera,
            photo_count: count,
        }
    }
}

/// Accent color suggested for presenting a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum ColorHint {
    Blue,
    Green,
    Orange,
    Purple,
    Red,
    Teal,
    Indigo,
}

impl ColorHint {
    /// Returns the color name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Orange => "orange",
            Self::Purple => "purple",
            Self::Red => "red",
            Self::Teal => "teal",
            Self::Indigo => "indigo",
        }
    }
}

/// A ranked, justified candidate destination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SuggestedRoute {
    /// Name of the suggested agent.
    pub agent_name: String,
    /// Symbol name for the route's icon.
    pub icon: &'static str,
    /// Accent color for the route.
    pub color_hint: ColorHint,
    /// Why this agent fits the capture.
    pub reason: &'static str,
}

impl SuggestedRoute {
    fn from_rule(agent: &AgentConnection, rule: &AffinityRule) -> Self {
        Self {
            agent_name: agent.name.clone(),
            icon: rule.icon,
            color_hint: rule.color,
            reason: rule.reason,
        }
    }
}

/// Ranks agents for a capture.
///
/// # Example
///
/// ```
/// use capture_route::{AgentConnection, CaptureRouting, RoutingEngine, SensorType};
///
/// let agents = vec![
///     AgentConnection::new("a1", "Travel Planner"),
///     AgentConnection::new("a2", "Interior Designer"),
/// ];
///
/// let engine = RoutingEngine::default();
/// let routes = engine.suggest(&CaptureRouting::new(SensorType::Lidar), &agents);
///
/// assert_eq!(routes.len(), 1);
/// assert_eq!(routes[0].agent_name, "Interior Designer");
/// ```
#[derive(Debug, Clone, Default)]
pub struct RoutingEngine {
    config: RoutingConfig,
}

impl RoutingEngine {
    /// Creates an engine with the given configuration.
    pub fn new(config: RoutingConfig) -> Self {
        Self { config }
    }

    /// Returns the engine configuration.
    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }

    /// Suggests destinations for a capture, best first.
    ///
    /// Agents are ranked by the first affinity rule their name matches;
    /// ties keep registry order and repeated names keep the first agent.
    /// An empty result means there is nothing to choose: save locally.
    pub fn suggest(
        &self,
        routing: &CaptureRouting,
        agents: &[AgentConnection],
    ) -> Vec<SuggestedRoute> {
        let rules = rules_for(routing.sensor_type);
        let mut seen = HashSet::new();

        let mut ranked: Vec<(usize, usize, SuggestedRoute)> = agents
            .iter()
            .enumerate()
            .filter(|&(_, agent)| seen.insert(agent.name.as_str()))
            .filter_map(|(position, agent)| {
                let rank = best_rule(rules, &agent.name)?;
                Some((rank, position, SuggestedRoute::from_rule(agent, &rules[rank])))
            })
            .collect();

        ranked.sort_by_key(|(rank, position, _)| (*rank, *position));
        ranked.truncate(self.config.max_suggestions);

        tracing::debug!(
            sensor = %routing.sensor_type,
            agents = agents.len(),
            suggestions = ranked.len(),
            "ranked routing suggestions"
        );

        ranked.into_iter().map(|(_, _, route)| route).collect()
    }

    /// Returns the presentation title for a capture.
    pub fn title(&self, routing: &CaptureRouting) -> String {
        capture_title(routing)
    }
}

/// Suggests destinations with the default engine configuration.
pub fn suggest(routing: &CaptureRouting, agents: &[AgentConnection]) -> Vec<SuggestedRoute> {
    RoutingEngine::default().suggest(routing, agents)
}

/// Returns the presentation title for a capture.
///
/// ```
/// use capture_route::{capture_title, CaptureRouting};
///
/// assert_eq!(capture_title(&CaptureRouting::photos(1)), "Photo captured!");
/// assert_eq!(capture_title(&CaptureRouting::photos(3)), "3 photos captured!");
/// ```
pub fn capture_title(routing: &CaptureRouting) -> String {
    let title = match routing.sensor_type {
        SensorType::Lidar => "Room scan captured!",
        SensorType::Barcode => "Barcode scanned!",
        SensorType::Camera if routing.photo_count == 1 => "Photo captured!",
        SensorType::Camera => return format!("{} photos captured!", routing.photo_count),
        SensorType::ProductScan => "Product scanned!",
        SensorType::Beacon => "Beacon event captured!",
        SensorType::Motion => "Motion data captured!",
        SensorType::Health => "Health data captured!",
    };
    title.to_string()
}
