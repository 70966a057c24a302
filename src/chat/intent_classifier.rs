//! Intent Classifier
//!
//! Deterministic two-stage classification of a user message into one
//! intent:
//! 1. A compound probe runs every intent's pattern set; two or more
//!    distinct hits joined by a conjunction resolve to the first
//!    detected intent at reduced confidence.
//! 2. Single-intent resolution walks the rule table in specificity
//!    order (CREATE last, its patterns being the broadest); the first
//!    regex match wins. A coarse keyword fallback catches what the
//!    patterns miss.
//!
//! The classifier never decides whether its answer is good enough;
//! the confidence gate lives in the orchestrator against the
//! configured threshold.

use regex::Regex;
use tracing::debug;

use crate::chat::rules::{
    IntentRule, CONJUNCTIONS, INTENT_RULES, KEYWORD_RULES, SPECIFICITY_ORDER,
};
use crate::chat::types::{IntentKind, UserIntent};

/// A compiled classification pattern.
struct CompiledRule {
    kind: IntentKind,
    pattern: &'static str,
    regex: Regex,
}

pub struct IntentClassifier {
    /// All rules, in declaration order (compound-probe order).
    rules: Vec<CompiledRule>,
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentClassifier {
    pub fn new() -> Self {
        Self {
            rules: Self::compile_rules(INTENT_RULES),
        }
    }

    fn compile_rules(table: &'static [IntentRule]) -> Vec<CompiledRule> {
        let mut rules = Vec::new();
        for rule in table {
            for pattern in rule.patterns {
                match Regex::new(pattern) {
                    Ok(regex) => rules.push(CompiledRule {
                        kind: rule.kind,
                        pattern,
                        regex,
                    }),
                    Err(_) => continue,
                }
            }
        }
        rules
    }

    /// Classify a message. Entities are attached by the extractor
    /// afterwards; the returned intent carries classification metadata
    /// only.
    pub fn classify(&self, message: &str) -> UserIntent {
        let lowered = message.to_lowercase();
        let lowered = lowered.trim();

        let mut intent = if lowered.is_empty() {
            UserIntent::new(IntentKind::Unknown, 0.1)
        } else {
            let detected = self.detect_intents(lowered);
            if detected.len() > 1 && self.has_conjunction(lowered) {
                self.compound_intent(&detected)
            } else {
                self.single_intent(lowered)
            }
        };

        intent.parameters.original_message = message.to_string();
        debug!(
            kind = ?intent.kind,
            confidence = intent.confidence,
            "classified message"
        );
        intent
    }

    /// All distinct intents with at least one pattern hit, in
    /// declaration order.
    fn detect_intents(&self, lowered: &str) -> Vec<IntentKind> {
        let mut found = Vec::new();
        for rule in &self.rules {
            if !found.contains(&rule.kind) && rule.regex.is_match(lowered) {
                found.push(rule.kind);
            }
        }
        found
    }

    fn has_conjunction(&self, lowered: &str) -> bool {
        CONJUNCTIONS.iter().any(|c| lowered.contains(c))
    }

    /// A compound request resolves to its first detected intent; the
    /// remaining intents are recorded so the caller can tell the user
    /// to send them separately.
    fn compound_intent(&self, detected: &[IntentKind]) -> UserIntent {
        let mut intent = UserIntent::new(detected[0], 0.7);
        intent.parameters.compound_request = true;
        intent.parameters.total_intents_detected = detected.len();
        intent.parameters.all_intents = detected.to_vec();
        intent
    }

    fn single_intent(&self, lowered: &str) -> UserIntent {
        for kind in SPECIFICITY_ORDER {
            for rule in self.rules.iter().filter(|r| r.kind == *kind) {
                if rule.regex.is_match(lowered) {
                    let mut intent = UserIntent::new(*kind, 0.9);
                    intent.parameters.matched_pattern = Some(rule.pattern.to_string());
                    return intent;
                }
            }
        }
        self.keyword_fallback(lowered)
    }

    /// Coarse keyword sets for messages no pattern recognized.
    fn keyword_fallback(&self, lowered: &str) -> UserIntent {
        for rule in KEYWORD_RULES {
            if rule.keywords.iter().any(|k| lowered.contains(k)) {
                return UserIntent::new(rule.kind, 0.8);
            }
        }
        UserIntent::new(IntentKind::Unknown, 0.3)
    }
}
