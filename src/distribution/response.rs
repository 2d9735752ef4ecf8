//! Inbound response shape of the link creation service.

use serde::{Deserialize, Serialize};

use crate::DistributionError;

/// A named link for one participant or group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitLink {
    /// Participant or group name.
    pub name: String,
    /// Link to the task.
    pub url: String,
}

/// Response of the creation service.
///
/// Both fields are optional and may both be present; the link list wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitCreationResponse {
    /// Links per participant or group.
    #[serde(default)]
    pub hits: Option<Vec<HitLink>>,
    /// A single link.
    #[serde(default)]
    pub url: Option<String>,
}

impl HitCreationResponse {
    /// Parses a response body.
    ///
    /// # Errors
    ///
    /// Returns [`DistributionError::MalformedPayload`] for invalid JSON.
    pub fn from_json(body: &[u8]) -> Result<Self, DistributionError> {
        Ok(serde_json::from_slice(body)?)
    }

    /// The link to show: the first listed link, else the single url.
    ///
    /// ```
    /// use capture_route::{HitCreationResponse, HitLink};
    ///
    /// let response = HitCreationResponse {
    ///     hits: Some(vec![HitLink { name: "Alice".into(), url: "https://x/1".into() }]),
    ///     url: Some("https://x/top".into()),
    /// };
    /// assert_eq!(response.primary_link(), Some("https://x/1"));
    /// ```
    pub fn primary_link(&self) -> Option<&str> {
        self.hits
            .as_deref()
            .and_then(<[HitLink]>::first)
            .map(|hit| hit.url.as_str())
            .or(self.url.as_deref())
    }
}

/// Links created by a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedLinks {
    /// The link to show first.
    pub primary: String,
    /// Every named link returned, possibly empty.
    pub hits: Vec<HitLink>,
}

impl CreatedLinks {
    /// Interprets a response, or `None` if it carries no link at all.
    pub fn from_response(response: HitCreationResponse) -> Option<Self> {
        let primary = response.primary_link()?.to_string();
        Some(Self {
            primary,
            hits: response.hits.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hits_preferred_over_url() {
        let response = HitCreationResponse::from_json(
            br#"{"hits":[{"name":"Alice","url":"https://x/1"}],"url":"https://x/top"}"#,
        )
        .unwrap();
        assert_eq!(response.primary_link(), Some("https://x/1"));
    }

    #[test]
    fn test_empty_hits_fall_back_to_url() {
        let response =
            HitCreationResponse::from_json(br#"{"hits":[],"url":"https://x/top"}"#).unwrap();
        assert_eq!(response.primary_link(), Some("https://x/top"));
    }

    #[test]
    fn test_no_link_resolved() {
        let response = HitCreationResponse::from_json(b"{}").unwrap();
        assert_eq!(response.primary_link(), None);
        assert_eq!(CreatedLinks::from_response(response), None);
    }

    #[test]
    fn test_created_links_keep_all_hits() {
        let response = HitCreationResponse {
            hits: Some(vec![
                HitLink {
                    name: "Alice".into(),
                    url: "https://x/1".into(),
                },
                HitLink {
                    name: "Bob".into(),
                    url: "https://x/2".into(),
                },
            ]),
            url: None,
        };
        let links = CreatedLinks::from_response(response).unwrap();
        assert_eq!(links.primary, "https://x/1");
        assert_eq!(links.hits.len(), 2);
    }

    #[test]
    fn test_malformed_body() {
        let result = HitCreationResponse::from_json(b"not json");
        assert!(matches!(result, Err(DistributionError::MalformedPayload(_))));
    }
}
