//! Tag wrangling for image-board embed titles.

use once_cell::sync::Lazy;
use regex::Regex;

/// How many tags of one category make it into a title before the rest are
/// dropped on the floor.
const MAX_TAGS: usize = 5;

static PARENTHETICAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r" \(.*?\)").expect("parenthetical pattern compiles"));

/// Turn a space-separated tag string into a readable list: at most
/// [`MAX_TAGS`] entries, comma-joined with an "and" before the last one,
/// underscores replaced with spaces.
pub fn combine_tags(tag_string: &str) -> String {
    let tags: Vec<&str> = tag_string.split_whitespace().take(MAX_TAGS).collect();
    let joined = match tags.len() {
        0 => String::new(),
        1 => tags[0].to_string(),
        n => format!("{} and {}", tags[..n - 1].join(", "), tags[n - 1]),
    };
    joined.trim().replace('_', " ")
}

/// Character tags often carry a disambiguating suffix like
/// `rin (fate)`; titles read better without it.
pub fn strip_parentheticals(text: &str) -> String {
    PARENTHETICAL.replace_all(text, "").into_owned()
}

/// Assemble a board post title: `{characters} ({copyright}) drawn by
/// {artist}`, with empty segments omitted (a lone copyright stands without
/// parentheses) and `#{id}` as the everything-was-empty fallback. The site
/// name is appended, and the result clamped to `max_len`.
pub fn board_post_title(
    character_tags: &str,
    copyright_tags: &str,
    artist_tags: &str,
    post_id: u64,
    site_name: &str,
    max_len: usize,
) -> String {
    let characters = strip_parentheticals(&combine_tags(character_tags));
    let copyright = combine_tags(copyright_tags);
    let artist = combine_tags(artist_tags);

    let mut title = String::new();
    if !characters.is_empty() {
        title.push_str(&characters);
    }
    if !copyright.is_empty() {
        if characters.is_empty() {
            title.push_str(&copyright);
        } else {
            title.push_str(&format!(" ({})", copyright));
        }
    }
    if !artist.is_empty() {
        title.push_str(&format!(" drawn by {}", artist));
    }
    if characters.is_empty() && copyright.is_empty() && artist.is_empty() {
        title.push_str(&format!("#{}", post_id));
    }
    title.push_str(&format!(" - {}", site_name));

    truncate_title(title, max_len)
}

/// Clamp a title to `max_len` characters, the last three being `...`.
pub fn truncate_title(title: String, max_len: usize) -> String {
    if title.chars().count() <= max_len {
        return title;
    }
    let keep: String = title.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", keep)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combine_caps_at_five_tags() {
        assert_eq!(combine_tags("a b c d e f"), "a, b, c, d and e");
    }

    #[test]
    fn test_combine_single_and_empty() {
        assert_eq!(combine_tags("a"), "a");
        assert_eq!(combine_tags(""), "");
    }

    #[test]
    fn test_combine_replaces_underscores() {
        assert_eq!(combine_tags("long_hair short_hair"), "long hair and short hair");
    }

    #[test]
    fn test_strip_parentheticals() {
        assert_eq!(
            strip_parentheticals("rin (fate) and saber (fate)"),
            "rin and saber"
        );
    }

    #[test]
    fn test_title_with_all_segments() {
        let title = board_post_title(
            "hakurei_reimu",
            "touhou",
            "some_artist",
            1,
            "Danbooru",
            256,
        );
        assert_eq!(title, "hakurei reimu (touhou) drawn by some artist - Danbooru");
    }

    #[test]
    fn test_title_copyright_stands_alone_without_characters() {
        let title = board_post_title("", "touhou", "", 1, "Danbooru", 256);
        assert_eq!(title, "touhou - Danbooru");
    }

    #[test]
    fn test_title_falls_back_to_post_id() {
        let title = board_post_title("", "", "", 4412, "e621", 256);
        assert_eq!(title, "#4412 - e621");
    }

    #[test]
    fn test_truncation_emits_exactly_max_chars() {
        let long = "x".repeat(300);
        let truncated = truncate_title(long, 256);
        assert_eq!(truncated.chars().count(), 256);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn test_titles_at_or_under_max_are_untouched() {
        let exact = "y".repeat(40);
        assert_eq!(truncate_title(exact.clone(), 40), exact);
    }
}
