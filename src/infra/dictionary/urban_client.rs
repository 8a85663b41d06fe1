//! Urban Dictionary API client.

use async_trait::async_trait;
use serde::Deserialize;

use crate::core::dictionary::{DictionaryError, SlangDictionaryClient, SlangEntry};
use crate::infra::http::{RequestSpec, Transport};

pub struct UrbanApiClient {
    transport: Transport,
    search_url: String,
}

impl UrbanApiClient {
    pub fn new(search_url: impl Into<String>, transport: Transport) -> Self {
        Self {
            transport,
            search_url: search_url.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    list: Vec<ApiEntry>,
}

#[derive(Debug, Deserialize)]
struct ApiEntry {
    definition: Option<String>,
    example: Option<String>,
}

#[async_trait]
impl SlangDictionaryClient for UrbanApiClient {
    async fn define(&self, term: &str) -> Result<Vec<SlangEntry>, DictionaryError> {
        let spec = RequestSpec {
            query: vec![("term", term.to_string())],
            ..RequestSpec::default()
        };
        let response: ApiResponse = self
            .transport
            .get_json(&self.search_url, spec)
            .await
            .map_err(|err| DictionaryError::Network(err.to_string()))?;

        Ok(response
            .list
            .into_iter()
            .map(|entry| SlangEntry {
                definition: entry.definition.unwrap_or_default(),
                example: entry.example.unwrap_or_default(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_without_list_parses_empty() {
        let response: ApiResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(response.list.is_empty());
    }

    #[test]
    fn test_entries_parse_with_missing_fields() {
        let response: ApiResponse =
            serde_json::from_str(r#"{"list": [{"definition": "a thing"}]}"#).unwrap();
        assert_eq!(response.list.len(), 1);
        assert_eq!(response.list[0].definition.as_deref(), Some("a thing"));
        assert!(response.list[0].example.is_none());
    }
}
