//! Entity Extractor
//!
//! Pulls typed fragments out of a message once the intent is known.
//! The extraction is a fixed-priority cascade over the rule tables in
//! [`crate::chat::rules`]: update rewrites first (so their values can
//! veto conflicting title candidates), then structured title/description
//! forms, task ids, dates, free-text title candidates, search keywords,
//! status vocabulary and reference words.
//!
//! Deterministic and side-effect free; a message that matches nothing
//! yields an empty list, never an error.

use regex::Regex;
use tracing::trace;

use crate::chat::rules;
use crate::chat::types::{EntityKind, ExtractedEntity, IntentKind};

/// Compiled form of a `(pattern, group)` extraction rule.
struct FieldRule {
    regex: Regex,
    group: usize,
}

/// Compiled update-rewrite rule: which groups hold the old reference
/// and the new value.
struct RewriteRule {
    regex: Regex,
    old_group: usize,
    new_group: usize,
}

pub struct EntityExtractor {
    update_rewrites: Vec<RewriteRule>,
    update_value_only: Option<Regex>,
    structured: Vec<Regex>,
    titled_description: Option<Regex>,
    task_id: Option<Regex>,
    dates: Vec<Regex>,
    day_month: Option<Regex>,
    titles: Vec<Regex>,
    title_update_general: Option<Regex>,
    delete_references: Vec<FieldRule>,
    separators: Vec<Regex>,
    searches: Vec<Regex>,
    status_filters: Vec<Regex>,
    completions: Vec<Regex>,
    incompletions: Vec<Regex>,
    references: Option<Regex>,
    ordinals: Option<Regex>,
}

impl Default for EntityExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn compile_all<'a>(patterns: impl IntoIterator<Item = &'a str>) -> Vec<Regex> {
    patterns
        .into_iter()
        .filter_map(|p| Regex::new(p).ok())
        .collect()
}

impl EntityExtractor {
    pub fn new() -> Self {
        Self {
            update_rewrites: rules::UPDATE_VALUE_RULES
                .iter()
                .filter_map(|r| {
                    Some(RewriteRule {
                        regex: Regex::new(r.pattern).ok()?,
                        old_group: r.old_group,
                        new_group: r.new_group,
                    })
                })
                .collect(),
            update_value_only: Regex::new(rules::UPDATE_VALUE_ONLY_PATTERN).ok(),
            structured: compile_all(rules::STRUCTURED_PATTERNS.iter().copied()),
            titled_description: Regex::new(rules::TITLED_DESCRIPTION_PATTERN).ok(),
            task_id: Regex::new(rules::TASK_ID_PATTERN).ok(),
            dates: compile_all(rules::date_patterns().iter().map(String::as_str)),
            day_month: Regex::new(&rules::day_month_pattern()).ok(),
            titles: compile_all(rules::TITLE_PATTERNS.iter().copied()),
            title_update_general: Regex::new(rules::TITLE_PATTERN_UPDATE_GENERAL).ok(),
            delete_references: rules::DELETE_REFERENCE_RULES
                .iter()
                .filter_map(|r| {
                    Some(FieldRule {
                        regex: Regex::new(r.pattern).ok()?,
                        group: r.group,
                    })
                })
                .collect(),
            separators: compile_all(rules::SEPARATOR_PATTERNS.iter().copied()),
            searches: compile_all(rules::SEARCH_PATTERNS.iter().copied()),
            status_filters: compile_all(rules::STATUS_FILTER_PATTERNS.iter().copied()),
            completions: compile_all(rules::COMPLETION_PATTERNS.iter().copied()),
            incompletions: compile_all(rules::INCOMPLETION_PATTERNS.iter().copied()),
            references: Regex::new(rules::REFERENCE_PATTERN).ok(),
            ordinals: Regex::new(rules::ORDINAL_PATTERN).ok(),
        }
    }

    /// Extract all entities relevant to `intent` from `message`.
    pub fn extract(&self, message: &str, intent: IntentKind) -> Vec<ExtractedEntity> {
        let lowered = message.to_lowercase();
        let mut entities: Vec<ExtractedEntity> = Vec::new();

        if intent.takes_task_content() {
            if intent == IntentKind::UpdateTask {
                self.extract_update_values(&lowered, &mut entities);
            }

            let structured = self.extract_structured(message, &mut entities);

            self.extract_task_id(message, &mut entities);
            self.extract_dates(message, &mut entities);

            if !structured {
                self.extract_title_candidates(message, &lowered, intent, &mut entities);
                if !entities.iter().any(|e| e.kind == EntityKind::TaskTitle) {
                    self.extract_whole_message_split(message, intent, &mut entities);
                }
            }
        }

        if intent == IntentKind::DeleteTask {
            self.extract_task_id(message, &mut entities);
            self.extract_delete_reference(message, &mut entities);
        }

        if intent == IntentKind::SearchTasks {
            self.extract_search_keywords(message, &mut entities);
        }

        if matches!(intent, IntentKind::ListTasks | IntentKind::SearchTasks) {
            self.extract_status_filters(&lowered, &mut entities);
        }

        if matches!(
            intent,
            IntentKind::CreateTask
                | IntentKind::UpdateTask
                | IntentKind::ListTasks
                | IntentKind::SearchTasks
        ) {
            self.extract_status_vocabulary(&lowered, &mut entities);
        }

        if matches!(intent, IntentKind::UpdateTask | IntentKind::CreateTask) {
            self.extract_completion_phrases(&lowered, &mut entities);
        }

        if intent.takes_references() {
            self.extract_references(&lowered, &mut entities);
        }

        dedup_entities(&mut entities);
        trace!(count = entities.len(), ?intent, "extracted entities");
        entities
    }

    // ── update rewrites ──────────────────────────────────────────

    /// "update X title Y to Z" forms. The old reference becomes a
    /// title entity (to find the task) and the new value an update
    /// value entity (to apply).
    fn extract_update_values(&self, lowered: &str, entities: &mut Vec<ExtractedEntity>) {
        for rule in &self.update_rewrites {
            if let Some(caps) = rule.regex.captures(lowered) {
                let old = caps
                    .get(rule.old_group)
                    .map(|m| m.as_str().trim().to_string())
                    .unwrap_or_default();
                let new = caps
                    .get(rule.new_group)
                    .map(|m| m.as_str().trim().to_string())
                    .unwrap_or_default();

                if !old.is_empty() && old != new {
                    push_unique(
                        entities,
                        ExtractedEntity::new(EntityKind::TaskTitle, old, 0.85),
                    );
                }
                if !new.is_empty() {
                    push_unique(
                        entities,
                        ExtractedEntity::new(EntityKind::UpdateValue, new, 0.90),
                    );
                }
                return;
            }
        }

        // Bare "update the title to X" with no leading reference.
        if let Some(regex) = &self.update_value_only {
            if let Some(caps) = regex.captures(lowered) {
                if let Some(value) = caps.get(1) {
                    push_unique(
                        entities,
                        ExtractedEntity::new(
                            EntityKind::UpdateValue,
                            value.as_str().trim(),
                            0.90,
                        ),
                    );
                }
            }
        }
    }

    // ── structured forms ─────────────────────────────────────────

    fn extract_structured(&self, message: &str, entities: &mut Vec<ExtractedEntity>) -> bool {
        for regex in &self.structured {
            if let Some(caps) = regex.captures(message) {
                let title = caps.get(1).map(|m| m.as_str().trim()).unwrap_or("");
                let description = caps.get(2).map(|m| m.as_str().trim()).unwrap_or("");
                if !title.is_empty() {
                    entities.push(ExtractedEntity::new(EntityKind::TaskTitle, title, 0.95));
                }
                if !description.is_empty() {
                    entities.push(ExtractedEntity::new(
                        EntityKind::TaskDescription,
                        description,
                        0.90,
                    ));
                }
                return true;
            }
        }

        if let Some(regex) = &self.titled_description {
            if let Some(caps) = regex.captures(message) {
                let title = caps.get(1).map(|m| m.as_str().trim()).unwrap_or("");
                let description = caps.get(2).map(|m| m.as_str().trim()).unwrap_or("");
                if !title.is_empty() {
                    entities.push(ExtractedEntity::new(EntityKind::TaskTitle, title, 0.95));
                }
                if !description.is_empty() {
                    entities.push(ExtractedEntity::new(
                        EntityKind::TaskDescription,
                        description,
                        0.90,
                    ));
                }
                return true;
            }
        }

        false
    }

    // ── ids and dates ────────────────────────────────────────────

    fn extract_task_id(&self, message: &str, entities: &mut Vec<ExtractedEntity>) {
        if let Some(regex) = &self.task_id {
            if let Some(caps) = regex.captures(message) {
                if let Some(id) = caps.get(1) {
                    push_unique(
                        entities,
                        ExtractedEntity::new(EntityKind::TaskId, id.as_str().trim(), 0.95),
                    );
                }
            }
        }
    }

    fn extract_dates(&self, message: &str, entities: &mut Vec<ExtractedEntity>) {
        for regex in &self.dates {
            if let Some(caps) = regex.captures(message) {
                if let Some(date) = caps.get(1) {
                    entities.push(ExtractedEntity::new(
                        EntityKind::DateReference,
                        date.as_str().trim(),
                        0.85,
                    ));
                    return;
                }
            }
        }

        // Bare "25 Jan" with no year, only if nothing stronger matched.
        if entities.iter().any(|e| e.kind == EntityKind::DateReference) {
            return;
        }
        if let Some(regex) = &self.day_month {
            if let Some(caps) = regex.captures(message) {
                if let Some(date) = caps.get(1) {
                    entities.push(ExtractedEntity::new(
                        EntityKind::DateReference,
                        date.as_str().trim(),
                        0.80,
                    ));
                }
            }
        }
    }

    // ── free-text title candidates ───────────────────────────────

    /// The ordered title-candidate pass, with the conflict policy:
    /// a candidate overlapping an already-extracted update value is
    /// discarded, not merged.
    fn extract_title_candidates(
        &self,
        message: &str,
        lowered: &str,
        intent: IntentKind,
        entities: &mut Vec<ExtractedEntity>,
    ) {
        let candidates = self.title_candidate_regexes(lowered, intent);

        let main_content = candidates.iter().find_map(|regex| {
            regex.captures_iter(message).find_map(|caps| {
                first_group_value(&caps)
                    .filter(|value| !conflicts_with_update_value(intent, value, entities))
            })
        });

        let Some(content) = main_content else {
            return;
        };

        // A separator inside the candidate splits it into title and
        // description.
        for (i, regex) in self.separators.iter().enumerate() {
            if let Some(caps) = regex.captures(&content) {
                let title = caps.get(1).map(|m| m.as_str().trim()).unwrap_or("");
                let description_group = if i == 1 { 3 } else { 2 };
                let description = caps
                    .get(description_group)
                    .map(|m| m.as_str().trim())
                    .unwrap_or("");
                if !title.is_empty() {
                    push_unique(
                        entities,
                        ExtractedEntity::new(EntityKind::TaskTitle, title, 0.9),
                    );
                }
                if !description.is_empty() {
                    entities.push(ExtractedEntity::new(
                        EntityKind::TaskDescription,
                        description,
                        0.8,
                    ));
                }
                return;
            }
        }

        push_unique(
            entities,
            ExtractedEntity::new(EntityKind::TaskTitle, content, 0.9),
        );
    }

    /// Which title patterns apply for this message and intent.
    fn title_candidate_regexes(&self, lowered: &str, intent: IntentKind) -> Vec<&Regex> {
        let mut candidates: Vec<&Regex> = self.titles.iter().collect();

        if intent != IntentKind::UpdateTask {
            if let Some(general) = &self.title_update_general {
                candidates.push(general);
            }
        }

        // The leading called/named/to/for pattern mis-captures the
        // replacement value in rewrite phrasings; drop it there.
        let has_rewrite_marker = (lowered.contains(" to ") || lowered.contains(" as "))
            && ["update", "change", "modify", "edit"]
                .iter()
                .any(|w| lowered.contains(w));
        if intent == IntentKind::UpdateTask && has_rewrite_marker && !candidates.is_empty() {
            candidates.remove(0);
        }

        candidates
    }

    /// Fallback when no title candidate matched: a separator in the
    /// whole message still yields a title/description split. Skipped
    /// for updates that already carry rewrite entities.
    fn extract_whole_message_split(
        &self,
        message: &str,
        intent: IntentKind,
        entities: &mut Vec<ExtractedEntity>,
    ) {
        if intent == IntentKind::UpdateTask
            && entities
                .iter()
                .any(|e| matches!(e.kind, EntityKind::UpdateValue | EntityKind::TaskId))
        {
            return;
        }

        for (i, regex) in self.separators.iter().enumerate() {
            if let Some(caps) = regex.captures(message) {
                let title = caps.get(1).map(|m| m.as_str().trim()).unwrap_or("");
                let description_group = if i == 1 { 3 } else { 2 };
                let description = caps
                    .get(description_group)
                    .map(|m| m.as_str().trim())
                    .unwrap_or("");
                if !title.is_empty() {
                    push_unique(
                        entities,
                        ExtractedEntity::new(EntityKind::TaskTitle, title, 0.9),
                    );
                }
                if !description.is_empty() {
                    push_unique(
                        entities,
                        ExtractedEntity::new(EntityKind::TaskDescription, description, 0.8),
                    );
                }
                return;
            }
        }
    }

    // ── delete targets ───────────────────────────────────────────

    /// The text after a delete verb names the target task.
    fn extract_delete_reference(&self, message: &str, entities: &mut Vec<ExtractedEntity>) {
        for rule in &self.delete_references {
            if let Some(caps) = rule.regex.captures(message) {
                if let Some(reference) = caps.get(rule.group) {
                    let value = reference.as_str().trim();
                    if !value.is_empty() {
                        push_unique(
                            entities,
                            ExtractedEntity::new(EntityKind::TaskTitle, value, 0.85),
                        );
                    }
                    return;
                }
            }
        }
    }

    // ── search keywords ──────────────────────────────────────────

    fn extract_search_keywords(&self, message: &str, entities: &mut Vec<ExtractedEntity>) {
        for regex in &self.searches {
            for caps in regex.captures_iter(message) {
                if let Some(value) = first_group_value(&caps) {
                    entities.push(ExtractedEntity::new(EntityKind::Keyword, value, 0.8));
                }
            }
        }
    }

    // ── status and references ────────────────────────────────────

    fn extract_status_filters(&self, lowered: &str, entities: &mut Vec<ExtractedEntity>) {
        for regex in &self.status_filters {
            for caps in regex.captures_iter(lowered) {
                if let Some(value) = caps.get(1) {
                    entities.push(ExtractedEntity::new(
                        EntityKind::StatusIndicator,
                        value.as_str().trim(),
                        0.7,
                    ));
                }
            }
        }
    }

    fn extract_status_vocabulary(&self, lowered: &str, entities: &mut Vec<ExtractedEntity>) {
        for vocab in rules::STATUS_VOCABULARY {
            for word in vocab.words {
                if lowered.contains(word) {
                    entities.push(ExtractedEntity::new(
                        EntityKind::StatusIndicator,
                        vocab.category,
                        0.8,
                    ));
                }
            }
        }
    }

    /// "complete this task" phrasing sets the status and points at the
    /// current task via a synthetic "this" reference.
    fn extract_completion_phrases(&self, lowered: &str, entities: &mut Vec<ExtractedEntity>) {
        for regex in &self.completions {
            if regex.is_match(lowered) {
                entities.push(ExtractedEntity::new(
                    EntityKind::StatusIndicator,
                    "complete",
                    0.95,
                ));
                entities.push(ExtractedEntity::new(
                    EntityKind::ReferenceDemonstrative,
                    "this",
                    0.95,
                ));
            }
        }

        for regex in &self.incompletions {
            if regex.is_match(lowered) {
                entities.push(ExtractedEntity::new(
                    EntityKind::StatusIndicator,
                    "incomplete",
                    0.95,
                ));
                entities.push(ExtractedEntity::new(
                    EntityKind::ReferenceDemonstrative,
                    "this",
                    0.95,
                ));
            }
        }
    }

    /// Every reference word occurrence becomes its own entity with a
    /// character span; ordinals score lower.
    fn extract_references(&self, lowered: &str, entities: &mut Vec<ExtractedEntity>) {
        if let Some(regex) = &self.references {
            for caps in regex.captures_iter(lowered) {
                if let Some(m) = caps.get(1) {
                    entities.push(
                        ExtractedEntity::new(EntityKind::ReferenceDemonstrative, m.as_str(), 0.7)
                            .with_span(m.start(), m.end()),
                    );
                }
            }
        }
        if let Some(regex) = &self.ordinals {
            for caps in regex.captures_iter(lowered) {
                if let Some(m) = caps.get(1) {
                    entities.push(
                        ExtractedEntity::new(EntityKind::ReferenceDemonstrative, m.as_str(), 0.6)
                            .with_span(m.start(), m.end()),
                    );
                }
            }
        }
    }
}

// ── policy helpers ───────────────────────────────────────────────

/// A title candidate that contains, or is contained in, an extracted
/// update value is a conflict; discard it rather than guessing.
fn conflicts_with_update_value(
    intent: IntentKind,
    candidate: &str,
    entities: &[ExtractedEntity],
) -> bool {
    if intent != IntentKind::UpdateTask {
        return false;
    }
    let candidate = candidate.to_lowercase();
    entities
        .iter()
        .filter(|e| e.kind == EntityKind::UpdateValue)
        .any(|e| {
            let value = e.value.to_lowercase();
            candidate.contains(&value) || value.contains(&candidate)
        })
}

/// Add only when no entity of the same kind has the same value.
fn push_unique(entities: &mut Vec<ExtractedEntity>, entity: ExtractedEntity) {
    if !entities
        .iter()
        .any(|e| e.kind == entity.kind && e.value == entity.value)
    {
        entities.push(entity);
    }
}

/// Drop later duplicates of an exact (kind, value) pair.
fn dedup_entities(entities: &mut Vec<ExtractedEntity>) {
    let mut seen: Vec<(EntityKind, String)> = Vec::new();
    entities.retain(|e| {
        let key = (e.kind, e.value.clone());
        if seen.contains(&key) {
            false
        } else {
            seen.push(key);
            true
        }
    });
}

/// First non-empty capture group of a match, scanning alternation
/// groups left to right.
fn first_group_value(caps: &regex::Captures<'_>) -> Option<String> {
    for i in 1..caps.len() {
        if let Some(m) = caps.get(i) {
            let value = m.as_str().trim();
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(message: &str, intent: IntentKind) -> Vec<ExtractedEntity> {
        EntityExtractor::new().extract(message, intent)
    }

    fn values_of(entities: &[ExtractedEntity], kind: EntityKind) -> Vec<&str> {
        entities
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| e.value.as_str())
            .collect()
    }

    #[test]
    fn test_create_title_from_to_phrase() {
        let entities = extract("Add a task to buy groceries", IntentKind::CreateTask);
        assert_eq!(
            values_of(&entities, EntityKind::TaskTitle),
            vec!["buy groceries"]
        );
    }

    #[test]
    fn test_structured_title_and_description() {
        let entities = extract(
            "create a task Title: Dentist, Description: book a checkup",
            IntentKind::CreateTask,
        );
        assert_eq!(values_of(&entities, EntityKind::TaskTitle), vec!["Dentist"]);
        assert_eq!(
            values_of(&entities, EntityKind::TaskDescription),
            vec!["book a checkup"]
        );
    }

    #[test]
    fn test_update_rewrite_entities() {
        let entities = extract(
            "update task id 101 title reading to read",
            IntentKind::UpdateTask,
        );
        assert!(values_of(&entities, EntityKind::TaskId).contains(&"101"));
        assert_eq!(
            values_of(&entities, EntityKind::UpdateValue),
            vec!["read"]
        );
        // The old value rides along as a title reference.
        assert!(values_of(&entities, EntityKind::TaskTitle).contains(&"reading"));
    }

    #[test]
    fn test_update_old_and_new_never_identical() {
        let entities = extract(
            "update title reading to reading",
            IntentKind::UpdateTask,
        );
        let titles = values_of(&entities, EntityKind::TaskTitle);
        let updates = values_of(&entities, EntityKind::UpdateValue);
        assert_eq!(updates, vec!["reading"]);
        assert!(!titles.contains(&"reading"));
    }

    #[test]
    fn test_title_candidate_conflict_discarded() {
        // "read" is the update value; a title candidate containing it
        // must not survive as a second title.
        let entities = extract("bath update title to Bath", IntentKind::UpdateTask);
        let updates = values_of(&entities, EntityKind::UpdateValue);
        assert_eq!(updates, vec!["bath"]);
    }

    #[test]
    fn test_delete_reference() {
        let entities = extract("Delete the grocery task", IntentKind::DeleteTask);
        assert_eq!(values_of(&entities, EntityKind::TaskTitle), vec!["grocery"]);
    }

    #[test]
    fn test_delete_by_id() {
        let entities = extract("delete task id 7", IntentKind::DeleteTask);
        assert!(values_of(&entities, EntityKind::TaskId).contains(&"7"));
    }

    #[test]
    fn test_search_keyword() {
        let entities = extract("Find tasks about dentist", IntentKind::SearchTasks);
        assert_eq!(values_of(&entities, EntityKind::Keyword), vec!["dentist"]);
    }

    #[test]
    fn test_search_quoted_keyword() {
        let entities = extract(
            "search for tasks containing \"weekly report\"",
            IntentKind::SearchTasks,
        );
        assert!(values_of(&entities, EntityKind::Keyword).contains(&"weekly report"));
    }

    #[test]
    fn test_date_reference() {
        let entities = extract(
            "add a task to pay rent by 25/01/2026",
            IntentKind::CreateTask,
        );
        assert_eq!(
            values_of(&entities, EntityKind::DateReference),
            vec!["25/01/2026"]
        );
    }

    #[test]
    fn test_bare_day_month_date() {
        let entities = extract("add a task to pay rent on 25 Jan", IntentKind::CreateTask);
        let dates = values_of(&entities, EntityKind::DateReference);
        assert_eq!(dates, vec!["25 Jan"]);
        let date_entity = entities
            .iter()
            .find(|e| e.kind == EntityKind::DateReference)
            .unwrap();
        assert!((date_entity.confidence - 0.80).abs() < f32::EPSILON);
    }

    #[test]
    fn test_completion_phrase() {
        let entities = extract("complete this task", IntentKind::UpdateTask);
        assert!(values_of(&entities, EntityKind::StatusIndicator).contains(&"complete"));
        assert!(values_of(&entities, EntityKind::ReferenceDemonstrative).contains(&"this"));
    }

    #[test]
    fn test_incompletion_phrase() {
        let entities = extract("mark this task as incomplete", IntentKind::UpdateTask);
        assert!(values_of(&entities, EntityKind::StatusIndicator).contains(&"incomplete"));
    }

    #[test]
    fn test_reference_spans() {
        let entities = extract("delete the first one", IntentKind::DeleteTask);
        let refs: Vec<_> = entities
            .iter()
            .filter(|e| e.kind == EntityKind::ReferenceDemonstrative)
            .collect();
        assert!(refs.iter().any(|e| e.value == "first"));
        for r in &refs {
            assert!(r.span.is_some());
        }
    }

    #[test]
    fn test_list_status_filter() {
        let entities = extract("show me my completed tasks", IntentKind::ListTasks);
        let statuses = values_of(&entities, EntityKind::StatusIndicator);
        assert!(statuses.contains(&"completed"));
    }

    #[test]
    fn test_dedup_exact_pairs() {
        let entities = extract("complete this task", IntentKind::UpdateTask);
        let mut seen = std::collections::HashSet::new();
        for e in &entities {
            assert!(
                seen.insert((e.kind, e.value.clone())),
                "duplicate entity {:?}={}",
                e.kind,
                e.value
            );
        }
    }

    #[test]
    fn test_no_entities_for_unknown() {
        let entities = extract("xyz123abc", IntentKind::Unknown);
        assert!(entities.is_empty());
    }

    #[test]
    fn test_title_description_split() {
        let entities = extract(
            "add a task called dentist - book the appointment",
            IntentKind::CreateTask,
        );
        // The split happens once, inside the matched candidate; the
        // whole-message fallback must not add a second title.
        assert_eq!(values_of(&entities, EntityKind::TaskTitle), vec!["dentist"]);
        assert_eq!(
            values_of(&entities, EntityKind::TaskDescription),
            vec!["book the appointment"]
        );
    }

    #[test]
    fn test_whole_message_split_only_without_title_match() {
        let entities = extract("dentist visit - book the appointment", IntentKind::CreateTask);
        assert_eq!(
            values_of(&entities, EntityKind::TaskTitle),
            vec!["dentist visit"]
        );
        assert_eq!(
            values_of(&entities, EntityKind::TaskDescription),
            vec!["book the appointment"]
        );
    }
}
