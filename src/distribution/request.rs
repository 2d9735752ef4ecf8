//! Link drafts, validation and the outbound request shape.

use serde::{Deserialize, Serialize};

use crate::{DistributionError, ValidationError};

/// How the task links are addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistributionMode {
    /// One personal link per participant.
    #[default]
    Individual,
    /// One shared link for a named group.
    Group,
    /// One anonymous link anybody can open.
    Open,
}

impl DistributionMode {
    /// Returns `true` if the mode addresses named participants.
    pub fn requires_participants(self) -> bool {
        matches!(self, Self::Individual | Self::Group)
    }

    /// Returns the wire name of the mode.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Individual => "individual",
            Self::Group => "group",
            Self::Open => "open",
        }
    }
}

impl std::fmt::Display for DistributionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Splits a comma-separated participant string.
///
/// Entries are trimmed and empty ones dropped.
///
/// ```
/// use capture_route::parse_participants;
///
/// assert_eq!(parse_participants("Alice, Bob, "), vec!["Alice", "Bob"]);
/// assert!(parse_participants(" , ").is_empty());
/// ```
pub fn parse_participants(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect()
}

/// User input for a link request, as typed.
///
/// # Example
///
/// ```
/// use capture_route::{DistributionMode, LinkDraft};
///
/// let draft = LinkDraft::new(DistributionMode::Group)
///     .description("  Label 50 kitchen photos ")
///     .participants("Alice, Bob");
///
/// let request = draft.validate().unwrap();
/// assert_eq!(request.description(), "Label 50 kitchen photos");
/// assert_eq!(request.participants(), Some(&["Alice".to_string(), "Bob".to_string()][..]));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkDraft {
    /// Selected distribution mode.
    pub mode: DistributionMode,
    /// Task description, untrimmed.
    pub description: String,
    /// Comma-separated participant names, untrimmed.
    pub participant_names: String,
}

impl LinkDraft {
    /// Creates an empty draft for the given mode.
    pub fn new(mode: DistributionMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Sets the task description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the raw participant string.
    #[must_use]
    pub fn participants(mut self, names: impl Into<String>) -> Self {
        self.participant_names = names.into();
        self
    }

    /// Validates the draft into a request.
    ///
    /// Participants are checked first, so an individual or group draft with
    /// no participants is rejected whatever its description says. Open
    /// drafts ignore the participant string entirely.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingParticipants`] or
    /// [`ValidationError::EmptyDescription`].
    pub fn validate(&self) -> Result<HitCreationRequest, ValidationError> {
        let participants = if self.mode.requires_participants() {
            let names = parse_participants(&self.participant_names);
            if names.is_empty() {
                return Err(ValidationError::MissingParticipants { mode: self.mode });
            }
            Some(names)
        } else {
            None
        };

        let description = self.description.trim();
        if description.is_empty() {
            return Err(ValidationError::EmptyDescription);
        }

        Ok(HitCreationRequest {
            mode: self.mode,
            description: description.to_string(),
            participants,
        })
    }

    /// Returns `true` if the draft would pass validation.
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

/// A validated request to create task links.
///
/// Only [`LinkDraft::validate`] builds one, so individual and group
/// requests always name participants and open requests never do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HitCreationRequest {
    mode: DistributionMode,
    description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    participants: Option<Vec<String>>,
}

impl HitCreationRequest {
    /// Distribution mode.
    pub fn mode(&self) -> DistributionMode {
        self.mode
    }

    /// Trimmed task description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Participants, present for individual and group requests.
    pub fn participants(&self) -> Option<&[String]> {
        self.participants.as_deref()
    }

    /// Serializes the request body.
    ///
    /// # Errors
    ///
    /// Returns [`DistributionError::MalformedPayload`] if serialization fails.
    pub fn to_json(&self) -> Result<Vec<u8>, DistributionError> {
        Ok(serde_json::to_vec(self)?)
    }
}
