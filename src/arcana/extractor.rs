//! Arcana Text Extractor
//!
//! Single pass over the description document:
//! 1. Normalize `\r\n` and lone `\r` line endings to `\n`
//! 2. Split into arcana blocks at lines starting with `=== <n> АРКАН`
//! 3. Read the arcana id from each block header (blocks without one are skipped)
//! 4. Cut every `### Сфера: <label> ###` section up to the next section
//!    header, the next arcana header, or the end of the text
//! 5. Classify the label, trim the body, store non-empty bodies
//!
//! Nothing in the input is fatal: unusable blocks and sections are counted
//! in [`ExtractionStats`] and dropped.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

use super::categories::classify_sphere;
use super::descriptions::ArcanaDescriptions;

/// Arcana block header at the start of a line, capturing the id.
static ARCANA_HEADER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^=== (\d+) АРКАН").unwrap());

/// Sphere section header, capturing the label (single line).
static SPHERE_HEADER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"### Сфера: (.*?) ###").unwrap());

/// One sphere section cut out of an arcana block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SphereSection<'a> {
    /// Label between `### Сфера:` and `###`
    pub label: &'a str,
    /// Section text with surrounding whitespace trimmed
    pub body: &'a str,
}

/// Counters describing what a run kept and dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionStats {
    pub blocks: usize,
    pub blocks_without_id: usize,
    pub sections: usize,
    pub unrecognized_sections: usize,
    pub empty_sections: usize,
    pub overwritten_sections: usize,
}

/// Extracted mapping together with its stats.
#[derive(Debug, Clone, Default)]
pub struct ExtractionOutcome {
    pub descriptions: ArcanaDescriptions,
    pub stats: ExtractionStats,
}

/// Convert Windows and old Mac line endings to `\n`.
/// Borrows the input when it contains no `\r`.
pub fn normalize_newlines(text: &str) -> Cow<'_, str> {
    if !text.contains('\r') {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
}

/// Split a document into arcana blocks.
///
/// Each header line stays with the block that follows it. Text before the
/// first header (if any, and not blank) comes back as a block of its own,
/// which has no id.
pub fn split_blocks(document: &str) -> Vec<&str> {
    let mut starts: Vec<usize> = ARCANA_HEADER_REGEX
        .find_iter(document)
        .map(|m| m.start())
        .collect();
    if starts.first() != Some(&0) {
        starts.insert(0, 0);
    }

    let mut blocks = Vec::with_capacity(starts.len());
    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(document.len());
        let block = &document[start..end];
        if !block.trim().is_empty() {
            blocks.push(block);
        }
    }
    blocks
}

/// Leading arcana id of a block, as written in its header.
pub fn parse_block_id(block: &str) -> Option<&str> {
    ARCANA_HEADER_REGEX
        .captures(block)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// All sphere sections of a block, in order.
///
/// A section body ends at the next sphere header, the next arcana header or
/// the end of `block`, whichever comes first.
pub fn extract_sections(block: &str) -> Vec<SphereSection<'_>> {
    let headers: Vec<_> = SPHERE_HEADER_REGEX.captures_iter(block).collect();
    let mut sections = Vec::with_capacity(headers.len());

    for (i, caps) in headers.iter().enumerate() {
        let (Some(whole), Some(label)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let body_start = whole.end();
        let next_section = headers
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map(|m| m.start())
            .unwrap_or(block.len());
        let next_arcana = ARCANA_HEADER_REGEX
            .find_at(block, body_start)
            .map(|m| m.start())
            .unwrap_or(block.len());
        let body_end = next_section.min(next_arcana);

        sections.push(SphereSection {
            label: label.as_str(),
            body: block[body_start..body_end].trim(),
        });
    }
    sections
}

/// Build the arcana → category → text mapping from a whole document.
pub fn extract_descriptions(document: &str) -> ExtractionOutcome {
    let mut outcome = ExtractionOutcome::default();
    let document = normalize_newlines(document);

    for block in split_blocks(&document) {
        outcome.stats.blocks += 1;

        let Some(arcana_id) = parse_block_id(block) else {
            outcome.stats.blocks_without_id += 1;
            tracing::debug!("Skipping block without arcana header ({} bytes)", block.len());
            continue;
        };

        outcome.descriptions.ensure_arcana(arcana_id);

        for section in extract_sections(block) {
            outcome.stats.sections += 1;
            store_section(&mut outcome, arcana_id, section);
        }
    }

    outcome
}

fn store_section(outcome: &mut ExtractionOutcome, arcana_id: &str, section: SphereSection<'_>) {
    let Some(category) = classify_sphere(section.label) else {
        outcome.stats.unrecognized_sections += 1;
        tracing::debug!("Arcana {}: unrecognized sphere '{}'", arcana_id, section.label);
        return;
    };

    if section.body.is_empty() {
        outcome.stats.empty_sections += 1;
        tracing::debug!("Arcana {}: sphere {} has no text", arcana_id, category.as_str());
        return;
    }

    let replaced = outcome
        .descriptions
        .insert(arcana_id, category, section.body.to_string());
    if replaced {
        outcome.stats.overwritten_sections += 1;
        tracing::warn!("Arcana {}: duplicate sphere {}, keeping the later text", arcana_id, category.as_str());
    }

    tracing::debug!(
        "Arcana {}, sphere {}: {} chars",
        arcana_id,
        category.as_str(),
        section.body.chars().count()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arcana::SphereCategory;

    const SAMPLE: &str = "=== 1 АРКАН ===\n### Сфера: ЛИЧНЫЕ КАЧЕСТВА ###\nТекст A\n=== 2 АРКАН ===\n### Сфера: ДЕНЬГИ И БИЗНЕС ###\nТекст B\n";

    #[test]
    fn test_end_to_end_sample() {
        let outcome = extract_descriptions(SAMPLE);
        let json = serde_json::to_value(&outcome.descriptions).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"1": {"qualities": "Текст A"}, "2": {"money": "Текст B"}})
        );
        assert_eq!(outcome.stats.blocks, 2);
        assert_eq!(outcome.stats.sections, 2);
    }

    #[test]
    fn test_split_keeps_header_with_following_block() {
        let blocks = split_blocks(SAMPLE);
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].starts_with("=== 1 АРКАН"));
        assert!(blocks[1].starts_with("=== 2 АРКАН"));
        assert!(blocks[0].ends_with("Текст A\n"));
    }

    #[test]
    fn test_preamble_is_a_block_without_id() {
        let document = format!("Введение\n\n{}", SAMPLE);
        let blocks = split_blocks(&document);
        assert_eq!(blocks.len(), 3);
        assert_eq!(parse_block_id(blocks[0]), None);

        let outcome = extract_descriptions(&document);
        assert_eq!(outcome.stats.blocks_without_id, 1);
        assert_eq!(outcome.descriptions.len(), 2);
    }

    #[test]
    fn test_header_must_start_a_line() {
        let document = "текст === 5 АРКАН ===\n### Сфера: ЗДОРОВЬЕ ###\nX\n";
        assert_eq!(split_blocks(document).len(), 1);
        let outcome = extract_descriptions(document);
        assert!(outcome.descriptions.is_empty());
    }

    #[test]
    fn test_parse_block_id() {
        assert_eq!(parse_block_id("=== 12 АРКАН (Повешенный) ===\n"), Some("12"));
        assert_eq!(parse_block_id("=== АРКАН ===\n"), None);
    }

    #[test]
    fn test_multiple_sections_and_multiline_bodies() {
        let block = "=== 3 АРКАН ===\n\
                     ### Сфера: ТАЛАНТЫ ###\n\nСтрока 1\nСтрока 2\n\n\
                     ### Сфера: ЗДОРОВЬЕ ###\nЗдоровье\n";
        let sections = extract_sections(block);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].label, "ТАЛАНТЫ");
        assert_eq!(sections[0].body, "Строка 1\nСтрока 2");
        assert_eq!(sections[1].label, "ЗДОРОВЬЕ");
        assert_eq!(sections[1].body, "Здоровье");
        assert_eq!(classify_sphere(sections[1].label), Some(SphereCategory::Health));
    }

    #[test]
    fn test_section_stops_at_arcana_header_in_unsplit_text() {
        let sections = extract_sections(SAMPLE);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].body, "Текст A");
    }

    #[test]
    fn test_unknown_and_empty_sections_dropped() {
        let document = "=== 4 АРКАН ===\n\
                        ### Сфера: НЕИЗВЕСТНО ###\nЧто-то\n\
                        ### Сфера: ПРЕДНАЗНАЧЕНИЕ ###\n   \n\
                        ### Сфера: ОТНОШЕНИЯ ###\nЛюбовь\n";
        let outcome = extract_descriptions(document);
        assert_eq!(outcome.descriptions.arcana("4").unwrap().len(), 1);
        assert_eq!(outcome.descriptions.get("4", SphereCategory::Relationships), Some("Любовь"));
        assert_eq!(outcome.stats.unrecognized_sections, 1);
        assert_eq!(outcome.stats.empty_sections, 1);
    }

    #[test]
    fn test_duplicate_category_last_wins() {
        let document = "=== 6 АРКАН ===\n\
                        ### Сфера: ДЕНЬГИ ###\nПервый\n\
                        ### Сфера: БИЗНЕС ###\nВторой\n";
        let outcome = extract_descriptions(document);
        assert_eq!(outcome.descriptions.get("6", SphereCategory::Money), Some("Второй"));
        assert_eq!(outcome.stats.overwritten_sections, 1);
    }

    #[test]
    fn test_repeated_arcana_blocks_merge() {
        let document = "=== 8 АРКАН ===\n### Сфера: ДЕТИ ###\nА\n\
                        === 9 АРКАН ===\n### Сфера: ДЕТИ ###\nБ\n\
                        === 8 АРКАН ===\n### Сфера: ЗДОРОВЬЕ ###\nВ\n";
        let outcome = extract_descriptions(document);
        let ids: Vec<&str> = outcome.descriptions.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["8", "9"]);
        assert_eq!(outcome.descriptions.arcana("8").unwrap().len(), 2);
    }

    #[test]
    fn test_crlf_line_endings() {
        let document = "=== 1 АРКАН ===\r\n### Сфера: ТАЛАНТЫ ###\r\nСтрока 1\r\nСтрока 2\r\n\
                        === 2 АРКАН ===\r### Сфера: ЗДОРОВЬЕ ###\rОдна\rДве\r";
        let outcome = extract_descriptions(document);
        assert_eq!(outcome.descriptions.get("1", SphereCategory::Talents), Some("Строка 1\nСтрока 2"));
        assert_eq!(outcome.descriptions.get("2", SphereCategory::Health), Some("Одна\nДве"));
        assert_eq!(outcome.stats.blocks, 2);
    }

    #[test]
    fn test_normalize_newlines_borrows_clean_text() {
        assert!(matches!(normalize_newlines("a\nb"), Cow::Borrowed("a\nb")));
        assert_eq!(normalize_newlines("a\r\nb\rc\n"), "a\nb\nc\n");
        assert_eq!(normalize_newlines("\r\n\r\n"), "\n\n");
    }

    #[test]
    fn test_empty_document() {
        let outcome = extract_descriptions("");
        assert!(outcome.descriptions.is_empty());
        assert_eq!(outcome.stats, ExtractionStats::default());
    }
}
