use crate::application_port::{ResolutionResult, ResolverClient};
use crate::domain_model::{DirectLink, Reference};
use crate::logger::*;
use serde::Deserialize;

/// Wire shape of a metadata-service reply. Only the two fields the relay
/// depends on are decoded; anything else in the payload is ignored.
#[derive(Debug, Deserialize)]
struct ResolvePayload {
    #[serde(default)]
    success: bool,
    direct_link: Option<String>,
}

/// Resolver over the external metadata service: one GET per reference, the
/// raw reference text passed as a URL-encoded query parameter. No retries.
pub struct HttpResolverClient {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpResolverClient {
    // TODO: need a timeout; a hung upstream call currently blocks the
    // request's handling for as long as the transport default allows.
    pub fn new(endpoint: impl Into<String>) -> Self {
        HttpResolverClient {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// A reply counts as a resolution only when it is JSON, reports
    /// `success`, and actually ships a direct link. Everything else
    /// normalizes to `Failed`.
    fn interpret_body(body: &[u8]) -> ResolutionResult {
        let payload: ResolvePayload = match serde_json::from_slice(body) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("malformed metadata payload: {}", e);
                return ResolutionResult::Failed;
            }
        };
        match payload {
            ResolvePayload {
                success: true,
                direct_link: Some(link),
            } => ResolutionResult::Resolved {
                direct_link: DirectLink(link),
            },
            payload => {
                warn!("metadata service reported no usable link: {:?}", payload);
                ResolutionResult::Failed
            }
        }
    }
}

#[async_trait::async_trait]
impl ResolverClient for HttpResolverClient {
    async fn resolve(&self, reference: &Reference) -> ResolutionResult {
        let response = match self
            .http
            .get(&self.endpoint)
            .query(&[("data", reference.0.as_str())])
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("metadata service unreachable: {}", e);
                return ResolutionResult::Failed;
            }
        };

        if !response.status().is_success() {
            warn!("metadata service returned {}", response.status());
            return ResolutionResult::Failed;
        }

        match response.bytes().await {
            Ok(body) => Self::interpret_body(&body),
            Err(e) => {
                warn!("reading metadata reply: {}", e);
                ResolutionResult::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_with_link_resolves() {
        let result = HttpResolverClient::interpret_body(
            br#"{"success":true,"direct_link":"https://x"}"#,
        );

        assert_eq!(
            result,
            ResolutionResult::Resolved {
                direct_link: DirectLink("https://x".to_string())
            }
        );
    }

    #[test]
    fn success_without_a_link_is_a_failure() {
        // The upstream `success` flag alone is not trusted.
        let result = HttpResolverClient::interpret_body(br#"{"success":true}"#);

        assert_eq!(result, ResolutionResult::Failed);
    }

    #[test]
    fn reported_failure_is_a_failure_even_with_a_link() {
        let result = HttpResolverClient::interpret_body(
            br#"{"success":false,"direct_link":"https://x"}"#,
        );

        assert_eq!(result, ResolutionResult::Failed);
    }

    #[test]
    fn missing_success_field_defaults_to_failure() {
        let result =
            HttpResolverClient::interpret_body(br#"{"direct_link":"https://x"}"#);

        assert_eq!(result, ResolutionResult::Failed);
    }

    #[test]
    fn extra_fields_are_ignored() {
        let result = HttpResolverClient::interpret_body(
            br#"{"success":true,"direct_link":"https://x","file_name":"a.mp4","size":123}"#,
        );

        assert!(result.is_success());
    }

    #[test]
    fn non_json_and_wrongly_typed_bodies_fail() {
        assert_eq!(
            HttpResolverClient::interpret_body(b"<html>502</html>"),
            ResolutionResult::Failed
        );
        assert_eq!(
            HttpResolverClient::interpret_body(br#"{"success":true,"direct_link":42}"#),
            ResolutionResult::Failed
        );
        assert_eq!(
            HttpResolverClient::interpret_body(b""),
            ResolutionResult::Failed
        );
    }
}
