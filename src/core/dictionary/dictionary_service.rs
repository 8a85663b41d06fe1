//! Dictionary lookups: a standard dictionary and a slang one, each with its
//! own markup quirks that need scrubbing before Discord will render them
//! nicely.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::core::config::DictionaryAssets;

/// How many slang entries make it into one reply.
const MAX_SLANG_ENTRIES: usize = 3;
/// How many dictionary entries (homographs) are rendered.
const MAX_WORD_ENTRIES: usize = 2;
/// How many spelling suggestions are offered for a miss.
const MAX_SUGGESTIONS: usize = 5;
/// Discord's embed description limit.
const MAX_DESCRIPTION_LEN: usize = 2048;

#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("network error: {0}")]
    Network(String),
}

/// One slang-dictionary entry, raw from the API.
#[derive(Debug, Clone)]
pub struct SlangEntry {
    pub definition: String,
    pub example: String,
}

/// One sense line of a dictionary definition.
#[derive(Debug, Clone)]
pub struct WordSense {
    /// Sense number as the upstream prints it ("1", "2 a", "b").
    pub position: String,
    pub text: String,
}

/// A block of senses under one label ("transitive verb", or just
/// "definition" when the upstream has no divider).
#[derive(Debug, Clone)]
pub struct WordSection {
    pub label: String,
    pub senses: Vec<WordSense>,
}

#[derive(Debug, Clone)]
pub struct WordEntry {
    pub pronunciation: String,
    pub functional_label: Option<String>,
    pub sections: Vec<WordSection>,
    pub etymology: Option<String>,
}

/// A lookup either found real definitions or only spelling suggestions.
/// Decided once at parse time by the client.
#[derive(Debug, Clone)]
pub enum WordLookup {
    Definitions(Vec<WordEntry>),
    Suggestions(Vec<String>),
}

#[async_trait]
pub trait SlangDictionaryClient: Send + Sync {
    async fn define(&self, term: &str) -> Result<Vec<SlangEntry>, DictionaryError>;
}

#[async_trait]
pub trait WordDictionaryClient: Send + Sync {
    async fn lookup(&self, word: &str) -> Result<WordLookup, DictionaryError>;
}

/// Ready-to-embed slang article.
#[derive(Debug, Clone)]
pub struct SlangArticle {
    pub term: String,
    pub url: String,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct WordArticle {
    pub word: String,
    pub url: String,
    pub description: String,
}

#[derive(Debug, Clone)]
pub enum WordLookupResult {
    Found(WordArticle),
    Suggestions(Vec<String>),
    NoResults,
}

pub struct DictionaryService<S, W> {
    slang: S,
    words: W,
    assets: DictionaryAssets,
}

impl<S, W> DictionaryService<S, W>
where
    S: SlangDictionaryClient,
    W: WordDictionaryClient,
{
    pub fn new(slang: S, words: W, assets: DictionaryAssets) -> Self {
        Self {
            slang,
            words,
            assets,
        }
    }

    /// Top slang entries for a term, formatted and clamped for one embed.
    pub async fn search_slang(&self, term: &str) -> Result<Option<SlangArticle>, DictionaryError> {
        let entries = self.slang.define(term).await?;
        if entries.is_empty() {
            return Ok(None);
        }

        let mut description = String::new();
        for (index, entry) in entries.iter().take(MAX_SLANG_ENTRIES).enumerate() {
            description.push_str(&format!(
                "**{}. {}**\n\n",
                index + 1,
                self.clean_slang_markup(&entry.definition)
            ));
            description.push_str(&self.clean_slang_markup(&entry.example));
            description.push_str("\n\n");
        }
        if description.chars().count() > MAX_DESCRIPTION_LEN {
            description = description.chars().take(MAX_DESCRIPTION_LEN).collect();
        }

        Ok(Some(SlangArticle {
            term: term.to_string(),
            url: format!(
                "{}{}",
                self.assets.urban.dictionary_url,
                urlencoding::encode(term)
            ),
            description,
        }))
    }

    /// Standard-dictionary lookup: definitions when the word exists,
    /// spelling suggestions when it almost does, nothing otherwise.
    pub async fn search_word(&self, word: &str) -> Result<WordLookupResult, DictionaryError> {
        match self.words.lookup(word).await? {
            WordLookup::Suggestions(suggestions) => {
                if suggestions.is_empty() {
                    Ok(WordLookupResult::NoResults)
                } else {
                    Ok(WordLookupResult::Suggestions(
                        suggestions.into_iter().take(MAX_SUGGESTIONS).collect(),
                    ))
                }
            }
            WordLookup::Definitions(entries) => {
                if entries.is_empty() {
                    return Ok(WordLookupResult::NoResults);
                }
                Ok(WordLookupResult::Found(WordArticle {
                    word: word.to_string(),
                    url: format!(
                        "{}/{}",
                        self.assets.webster.dictionary_url,
                        urlencoding::encode(word)
                    ),
                    description: format_word_entries(&entries),
                }))
            }
        }
    }

    fn clean_slang_markup(&self, text: &str) -> String {
        clean_slang_markup(text, &self.assets.urban.dictionary_url)
    }
}

fn format_word_entries(entries: &[WordEntry]) -> String {
    let mut description = String::new();
    for entry in entries.iter().take(MAX_WORD_ENTRIES) {
        description.push_str(&format!(
            "►  *{}*",
            entry.pronunciation.replace('*', "・")
        ));
        if let Some(label) = &entry.functional_label {
            description.push_str(&format!("\n\n__**{}**__", label.to_uppercase()));
        }

        for section in &entry.sections {
            let mut lines = String::new();
            for sense in &section.senses {
                let position = if sense
                    .position
                    .chars()
                    .next()
                    .map_or(false, |c| c.is_ascii_digit())
                {
                    sense.position.clone()
                } else {
                    // Indent sub-senses so "a"/"b" hang under their number.
                    format!("\u{3000}{}", sense.position)
                };
                lines.push_str(&format!("{}: {}\n", position, sense.text));
            }
            description.push_str(&format!(
                "\n**{}**\n{}",
                section.label,
                clean_word_markup(&lines)
            ));
        }

        match &entry.etymology {
            Some(etymology) => description.push_str(&format!(
                "\n**etymology**\n{}\n\n",
                clean_word_markup(etymology)
            )),
            None => description.push_str("\n\n"),
        }
    }
    description
}

static SLANG_TERM_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([\w '’]+)\]").expect("term link pattern compiles"));

/// Slang entries cross-reference other terms in square brackets; rewrite
/// those as links and keep literal asterisks from turning into markdown.
fn clean_slang_markup(text: &str, dictionary_url: &str) -> String {
    let escaped = text.replace('*', "\\*");
    SLANG_TERM_LINK
        .replace_all(&escaped, |caps: &regex::Captures<'_>| {
            format!(
                "[{}]({}{})",
                &caps[1],
                dictionary_url,
                urlencoding::encode(&caps[1])
            )
        })
        .into_owned()
}

static WORD_FILLER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{bc\}|\*").expect("filler pattern compiles"));
static WORD_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{[a-z_]+[|}]+([a-zA-ZÀ-ž ,\-]+)(?:\{/[a-z_]*|[a-z0-9 |:()\-]*)\}")
        .expect("token pattern compiles")
});
static WORD_LEFTOVER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{/?[a-z _\-]+\}").expect("leftover pattern compiles"));

/// The standard dictionary wraps cross-references and emphasis in curly
/// tokens like `{d_link|word|ref}`. Surface the inner word, emphasized, and
/// drop everything else.
fn clean_word_markup(text: &str) -> String {
    let mut out = WORD_FILLER.replace_all(text, "").into_owned();
    while WORD_TOKEN.is_match(&out) {
        out = WORD_TOKEN
            .replace_all(&out, |caps: &regex::Captures<'_>| {
                format!("*{}*", caps[1].to_uppercase())
            })
            .into_owned();
    }
    WORD_LEFTOVER.replace_all(&out, "").into_owned()
}
