//! Merriam-Webster collegiate API client. The upstream JSON is deeply
//! nested and shape-shifts between entries and bare suggestion strings;
//! everything is normalized here so the core only ever sees the tagged
//! [`WordLookup`].

use async_trait::async_trait;
use serde_json::Value;

use crate::core::dictionary::{
    DictionaryError, WordDictionaryClient, WordEntry, WordLookup, WordSection, WordSense,
};
use crate::infra::http::{RequestSpec, Transport};

pub struct WebsterApiClient {
    transport: Transport,
    search_url: String,
    api_key: Option<String>,
}

impl WebsterApiClient {
    pub fn new(
        search_url: impl Into<String>,
        api_key: Option<String>,
        transport: Transport,
    ) -> Self {
        Self {
            transport,
            search_url: search_url.into(),
            api_key,
        }
    }
}

#[async_trait]
impl WordDictionaryClient for WebsterApiClient {
    async fn lookup(&self, word: &str) -> Result<WordLookup, DictionaryError> {
        let url = format!("{}/{}", self.search_url, urlencoding::encode(word));
        let mut spec = RequestSpec::default();
        if let Some(key) = &self.api_key {
            spec.query.push(("key", key.clone()));
        }
        let response: Value = self
            .transport
            .get_json(&url, spec)
            .await
            .map_err(|err| DictionaryError::Network(err.to_string()))?;

        Ok(parse_lookup(&response))
    }
}

/// An array of objects is a definition listing; an array of strings is the
/// upstream's "did you mean" list. Decided once, right here.
fn parse_lookup(response: &Value) -> WordLookup {
    let Some(items) = response.as_array() else {
        return WordLookup::Definitions(Vec::new());
    };

    if items.iter().any(|item| item.is_string()) {
        return WordLookup::Suggestions(
            items
                .iter()
                .filter_map(|item| item.as_str())
                .map(str::to_string)
                .collect(),
        );
    }

    WordLookup::Definitions(items.iter().filter_map(parse_entry).collect())
}

fn parse_entry(item: &Value) -> Option<WordEntry> {
    // Entries without both a headword block and definitions are skipped,
    // matching how partial records are ignored upstream.
    let pronunciation = item.get("hwi")?.get("hw")?.as_str()?.to_string();
    let defs = item.get("def")?.as_array()?;

    let sections = defs
        .iter()
        .map(|subcategory| WordSection {
            label: subcategory
                .get("vd")
                .and_then(Value::as_str)
                .unwrap_or("definition")
                .to_string(),
            senses: parse_senses(subcategory),
        })
        .collect();

    Some(WordEntry {
        pronunciation,
        functional_label: item.get("fl").and_then(Value::as_str).map(str::to_string),
        sections,
        etymology: item
            .get("et")
            .and_then(Value::as_array)
            .and_then(|et| et.first())
            .and_then(|pair| pair.get(1))
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}

fn parse_senses(subcategory: &Value) -> Vec<WordSense> {
    let Some(sequence) = subcategory.get("sseq").and_then(Value::as_array) else {
        return Vec::new();
    };

    let mut senses = Vec::new();
    for group in sequence.iter().filter_map(Value::as_array) {
        for meaning in group.iter().filter_map(Value::as_array) {
            // Each meaning is a ["sense", {...}] pair; some variants nest
            // the payload one level deeper inside another array.
            let Some(mut payload) = meaning.get(1) else {
                continue;
            };
            if let Some(inner) = payload.as_array().and_then(|a| a.first()) {
                payload = inner;
            }

            let position = payload
                .get("sn")
                .and_then(Value::as_str)
                .unwrap_or("1")
                .to_string();
            let Some(text) = sense_text(payload) else {
                continue;
            };
            senses.push(WordSense { position, text });
        }
    }
    senses
}

/// Definition text lives under `dt`, or under `sense.dt` for bound senses,
/// or there is no prose at all and the subject labels stand in for it.
fn sense_text(payload: &Value) -> Option<String> {
    if let Some(text) = payload.get("dt").and_then(defining_text) {
        return Some(text);
    }
    if let Some(text) = payload
        .get("sense")
        .and_then(|sense| sense.get("dt"))
        .and_then(defining_text)
    {
        return Some(text);
    }
    payload
        .get("sls")
        .and_then(Value::as_array)
        .map(|labels| {
            labels
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        })
        .filter(|joined| !joined.is_empty())
}

/// `dt` is a list of `["text", "..."]` pairs; the first one wins. One rare
/// variant nests the pair list two arrays deep.
fn defining_text(dt: &Value) -> Option<String> {
    let first = dt.as_array()?.first()?;
    let value = first.as_array()?.get(1)?;
    if let Some(text) = value.as_str() {
        return Some(text.to_string());
    }
    value
        .as_array()?
        .first()?
        .as_array()?
        .get(1)?
        .as_str()
        .map(str::to_string)
}
