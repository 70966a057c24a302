//! Ordered rule tables for intent classification and entity extraction.
//!
//! Every pattern the pipeline matches against lives here as data, so
//! precedence is visible in one place and each table can be exercised
//! on its own. The classifier and extractor compile these tables once
//! at construction and then only evaluate them.

use crate::chat::types::IntentKind;

/// Pattern set for one intent, in listed priority order.
pub(crate) struct IntentRule {
    pub kind: IntentKind,
    pub patterns: &'static [&'static str],
}

/// Declaration order: used for the compound probe, where "first
/// detected" means first in this table.
pub(crate) const INTENT_RULES: &[IntentRule] = &[
    IntentRule {
        kind: IntentKind::CreateTask,
        patterns: &[
            r"task\s+(?:to\s+)?(.+)",
            r"(?:add|create|make|new)\s+(?:a\s+)?task\s+(?:called|named|to|for)?\s*(.+)",
            r"(?:add|create|make|new)\s+(?:a\s+)?(?:todo|item)\s+(?:called|named|to|for)?\s*(.+)",
            r"(?:please|can you)\s+(?:add|create|make)\s+(?:a\s+)?task\s+(?:called|named|to|for)?\s*(.+)",
            r"i\s+need\s+to\s+(.+)",
            r"remind\s+me\s+to\s+(.+)",
            r"don'?t\s+forget\s+to\s+(.+)",
        ],
    },
    IntentRule {
        kind: IntentKind::UpdateTask,
        patterns: &[
            r"(?:update|change|modify|edit)\s+(?:the\s+)?(.+)\s+(?:title|description|status)",
            r"(?:update|change|modify|edit)\s+(?:task|the\s+.+?)\s+(?:to|with)\s+(.+)",
            r"(?:make|set)\s+(?:the\s+)?(.+)\s+(?:as\s+)?(?:complete|done|finished|incomplete|pending)",
            r"(?:mark|set)\s+(?:the\s+)?(.+)\s+(?:as\s+)?(?:complete|done|finished|incomplete|pending)",
            r"(?:update|change|modify|edit)\s+(?:the\s+)?(.+)\s+(?:to|and)\s+(?:be\s+)?(?:complete|done|finished|incomplete|pending)",
            r"task\s+update\s+(?:the\s+)?(.+)\s+with\s+(?:title|description)\s+(.+)",
            r"task\s+update\s+(?:the\s+)?(.+?)\s+(?:title|description)\s+(?:to|as)\s+(.+)",
            r"task\s+id\s+\d+\s+(?:update|change|modify|edit)\s+(?:title|description)\s+(?:to|as)\s+(.+)",
            r"task\s+\d+\s+(?:update|change|modify|edit)\s+(?:title|description)\s+(?:to|as)\s+(.+)",
            r"task\s+id\s+\d+\s+(?:update|change|modify|edit)\s+(?:the\s+)?(.+)",
            r"task\s+\d+\s+(?:update|change|modify|edit)\s+(?:the\s+)?(.+)",
            r"task\s+id\s+\d+\s+(?:update|change|modify|edit)\s+(?:title|description)\s+(.+)",
            r"task\s+\d+\s+(?:update|change|modify|edit)\s+(?:title|description)\s+(.+)",
            r#"(?:update|change|modify|edit)\s+['"][^'"]+\s*['"]\s+task\s+(?:to|as)\s+['"][^'"]+\s*['"]"#,
            r"(.+)\s+(?:update|change|modify|edit)\s+(?:title|description)\s+(?:to|as)\s+(.+)",
            r"(.+)\s+(?:title|description)\s+(?:update|change|modify|edit)\s+(?:to|as)\s+(.+)",
            r"(?:update|change|modify|edit)\s+(.+?)\s+task\s+(?:title|description)\s+(?:to|as)\s+(.+)",
            r"(.+?)\s+task\s+(?:title|description)\s+(?:update|change|modify|edit)\s+(.+)",
            r"(?:complete|finish|done|do)\s+(?:this|the)\s+(?:task|it)",
            r"(?:mark|set)\s+(?:this|the)\s+(?:task|it)\s+(?:as\s+)?(?:complete|done|finished)",
        ],
    },
    IntentRule {
        kind: IntentKind::DeleteTask,
        patterns: &[
            r"(?:delete|remove|cancel|drop)\s+(?:the\s+)?(.+)",
            r"(?:delete|remove|cancel|drop)\s+(?:task|item)\s+(?:called|named)?\s*(.+)",
            r"(?:get\s+rid\s+of|dispose\s+of)\s+(?:the\s+)?(.+)",
            r"i\s+want\s+to\s+delete\s+(?:the\s+)?(.+)",
            r"i\s+don'?t\s+need\s+(?:the\s+)?(.+)\s+anymore",
            r"clean\s+up\s+(?:the\s+)?(.+)",
            r"(.+)\s+delete\s+(?:this\s+)?(?:task|it)",
            r#"(?:delete|remove|cancel|drop)\s+['"][^'"]+\s*['"]\s+task"#,
        ],
    },
    IntentRule {
        kind: IntentKind::ListTasks,
        patterns: &[
            r"(?:show|list|display|get|see)\s+(?:me\s+)?(?:all\s+)?(?:my\s+)?tasks?",
            r"what\s+(?:are\s+)?(?:my\s+)?(?:current|pending|incomplete)?\s*tasks?",
            r"what\s+(?:do\s+i\s+have|tasks?\s+do\s+i\s+have)",
            r"(?:show|list|display|get|see)\s+(?:all\s+)?(?:my\s+)?(?:completed|done|finished)?\s*tasks?",
            r"what\s+is\s+on\s+(?:my\s+)?(?:todo|to-do)\s+list",
            r"i\s+want\s+to\s+see\s+(?:all\s+)?(?:my\s+)?tasks?",
            r"show\s+(?:me\s+)?(?:the\s+)?(?:task\s+)?list",
        ],
    },
    IntentRule {
        kind: IntentKind::SearchTasks,
        patterns: &[
            r"(?:find|search|look\s+for|locate)\s+(?:tasks?|items?)\s+(?:about|for|containing|with)\s+(.+)",
            r"(?:find|search|look\s+for|locate)\s+(?:tasks?|items?)\s+(?:that|which)\s+(?:have|contain)\s+(.+)",
            r"show\s+(?:me\s+)?(?:tasks?|items?)\s+(?:about|for|containing|with)\s+(.+)",
            r"i\s+need\s+to\s+find\s+(?:tasks?|items?)\s+(?:about|for|containing|with)\s+(.+)",
            r"do\s+i\s+have\s+(?:any\s+)?tasks?\s+(?:about|for|containing|with)\s+(.+)",
            r"search\s+for\s+(?:tasks?|items?)\s+(?:about|for|containing|with)\s+(.+)",
            r#"(?:search|find)\s+['"][^'"]+\s*['"]\s+task"#,
        ],
    },
    IntentRule {
        kind: IntentKind::GetUserInfo,
        patterns: &[
            r"who\s+am\s+i",
            r"what\s+is\s+my\s+(?:email|name|username|identity)",
            r"tell\s+me\s+about\s+myself",
            r"show\s+(?:me\s+)?(?:my\s+)?(?:profile|account|information)",
            r"what\s+is\s+my\s+(?:user\s+)?(?:name|id|identifier)",
            r"show\s+me\s+my\s+(?:email|profile|details)",
            r"i\s+want\s+to\s+know\s+my\s+(?:email|name|user\s+info)",
            r"what\s+email\s+am\s+i\s+using",
            r"who\s+is\s+logged\s+in",
            r"what\s+(?:is|are)\s+(?:my\s+)?name",
        ],
    },
];

/// Resolution order for single-intent classification, most specific
/// first. CREATE patterns are the broadest, so they go last.
pub(crate) const SPECIFICITY_ORDER: &[IntentKind] = &[
    IntentKind::UpdateTask,
    IntentKind::DeleteTask,
    IntentKind::ListTasks,
    IntentKind::SearchTasks,
    IntentKind::GetUserInfo,
    IntentKind::CreateTask,
];

/// Conjunction markers that suggest a compound request.
pub(crate) const CONJUNCTIONS: &[&str] =
    &["and", "then", "also", "plus", "with", ", and", ", then"];

/// Coarse keyword fallback, evaluated in order when no pattern matched.
pub(crate) struct KeywordRule {
    pub kind: IntentKind,
    pub keywords: &'static [&'static str],
}

pub(crate) const KEYWORD_RULES: &[KeywordRule] = &[
    KeywordRule {
        kind: IntentKind::CreateTask,
        keywords: &["add", "create", "new", "need to", "remind me to"],
    },
    KeywordRule {
        kind: IntentKind::UpdateTask,
        keywords: &["update", "change", "modify", "edit", "mark", "set"],
    },
    KeywordRule {
        kind: IntentKind::DeleteTask,
        keywords: &["delete", "remove", "cancel"],
    },
    KeywordRule {
        kind: IntentKind::ListTasks,
        keywords: &["show", "list", "display", "what do i have"],
    },
    KeywordRule {
        kind: IntentKind::SearchTasks,
        keywords: &["find", "search", "look for"],
    },
    KeywordRule {
        kind: IntentKind::GetUserInfo,
        keywords: &["who am i", "my email", "tell me about myself"],
    },
];

// ============================================================
// Extraction tables
// ============================================================

/// Update-rewrite patterns, tried in order against the lowercased
/// message. `old_group`/`new_group` name which capture holds the
/// current reference and which the replacement value.
pub(crate) struct UpdateValueRule {
    pub pattern: &'static str,
    pub old_group: usize,
    pub new_group: usize,
}

pub(crate) const UPDATE_VALUE_RULES: &[UpdateValueRule] = &[
    UpdateValueRule {
        pattern: r"(?:update|change|modify|edit)\s+(.+?)\s+task\s+(?:title|description)\s+(.+?)\s+(?:to|as)\s+(.+)$",
        old_group: 1,
        new_group: 3,
    },
    UpdateValueRule {
        pattern: r"(.+?)\s+task\s+(?:title|description)\s+(?:update|change|modify|edit)\s+(.+)$",
        old_group: 1,
        new_group: 2,
    },
    UpdateValueRule {
        pattern: r"(?:update|change|modify|edit)\s+(.+?)\s+task\s+title\s+(?:to|as)\s+(.+)$",
        old_group: 1,
        new_group: 2,
    },
    UpdateValueRule {
        pattern: r"(?:update|change|modify|edit).*?(?:title|description)\s+(.+?)\s+(?:to|as)\s+(.+)$",
        old_group: 1,
        new_group: 2,
    },
];

/// Bare "update the title to X" form with no task reference in front.
pub(crate) const UPDATE_VALUE_ONLY_PATTERN: &str =
    r"(?:task\s+id\s+\d+\s+)?(?:update|change|modify|edit)\s+(?:the\s+)?(?:title|description)\s+(?:to|as)\s+(.+)$";

/// Structured "Title: ... Description: ..." forms, matched against the
/// original message case-insensitively.
pub(crate) const STRUCTURED_PATTERNS: &[&str] = &[
    r"(?i).*?(?:Title|Task):\s*(.+?),\s*(?:Description|Desc):\s*(.+?)(?:\.|$)",
    r"(?i).*?(?:Title|Task):\s*(.+?)\s+(?:Description|Desc):\s*(.+?)(?:\.|$)",
    r"(?i)(?:create|add|make|new)\s+(?:a\s+)?(?:task\s+)?title:\s*(.+?)\s+description:\s*(.+?)(?:\.|$| and|\s*$)",
    r"(?i).*?title:\s*(.+?)\s+description:\s*(.+?)(?:\.|$| and|\s*$)",
];

/// "titled 'X' description Y" phrasing.
pub(crate) const TITLED_DESCRIPTION_PATTERN: &str =
    r#"(?i).*?(?:titled|called|named)\s+["']([^"']+)["']\s+description\s+(.+?)(?:\.|$|,|and|\s+with)"#;

pub(crate) const TASK_ID_PATTERN: &str = r"(?i)(?:task\s+id|task)\s+(\d+)";

const MONTHS: &str = "jan|january|feb|february|mar|march|apr|april|may|jun|june|jul|july|aug|august|sep|september|oct|october|nov|november|dec|december";

/// Due-date forms, first match wins.
pub(crate) fn date_patterns() -> Vec<String> {
    vec![
        r"(?i)due date.*?(\d{1,2}\s*[/-]\s*\d{1,2}\s*[/-]\s*\d{2,4})".to_string(),
        r"(?i)due date.*?(\d{1,2}[/-]\d{1,2}[/-]\d{2,4})".to_string(),
        r"(?i)by\s+(\d{1,2}[/-]\d{1,2}[/-]\d{2,4})".to_string(),
        r"(?i)on\s+(\d{1,2}[/-]\d{1,2}[/-]\d{2,4})".to_string(),
        r"(?i)(\d{1,2}[/-]\d{1,2}[/-]\d{2,4})".to_string(),
        format!(r"(?i)due date.*?(\d{{1,2}}\s+(?:{MONTHS})\s+\d{{2,4}})"),
        format!(r"(?i)by\s+(\d{{1,2}}\s+(?:{MONTHS})\s+\d{{2,4}})"),
        format!(r"(?i)on\s+(\d{{1,2}}\s+(?:{MONTHS})\s+\d{{2,4}})"),
        format!(r"(?i)(\d{{1,2}}\s+(?:{MONTHS})\s+\d{{2,4}})"),
        r"(?i)due date.*?(\d{4}-\d{2}-\d{2})".to_string(),
        r"(?i)(\d{4}-\d{2}-\d{2})".to_string(),
    ]
}

/// Bare "25 Jan" day-month form, used only when no stronger date matched.
pub(crate) fn day_month_pattern() -> String {
    format!(r"(?i)(\d{{1,2}}\s+(?:{MONTHS}))")
}

/// Title candidate patterns for create/update content, in priority
/// order. The first successful non-conflicting match wins.
pub(crate) const TITLE_PATTERNS: &[&str] = &[
    r#"(?:called|named|to|for)\s+(?:"([^"]+)"|'([^']+)'|([^.!?]+?)(?:\.|$|,))"#,
    r"(?:add|create|make|new)\s+(?:a\s+)?(?:task|todo|item)\s+(?:called|named|to|for)?\s+(.+?)(?:\.|$|,|and|\s+that)",
    r"task\s+(?:to\s+)?(.+)",
    r"i\s+need\s+to\s+(.+?)(?:\.|$|,|and|\s+so)",
    r"(?:mark|set)\s+(?:the\s+)?(.+?)\s+(?:as|to)",
];

/// Appended to [`TITLE_PATTERNS`] for every intent except UPDATE,
/// where it collides with the rewrite forms.
pub(crate) const TITLE_PATTERN_UPDATE_GENERAL: &str =
    r"(?:update|change|modify|edit)\s+(?:the\s+)?(.+?)\s+(?:to|and|with)";

/// Delete-target phrasing: the text after the delete verb names the
/// task, with an optional trailing "task" noise word.
pub(crate) struct DeleteReferenceRule {
    pub pattern: &'static str,
    pub group: usize,
}

pub(crate) const DELETE_REFERENCE_RULES: &[DeleteReferenceRule] = &[
    DeleteReferenceRule {
        pattern: r#"(?i)(?:delete|remove|cancel|drop)\s+(?:the\s+)?['"]?(.+?)['"]?(?:\s+task)?$"#,
        group: 1,
    },
    DeleteReferenceRule {
        pattern: r"(?i)(.+?)\s+delete\s+(?:this\s+)?(?:task|it)$",
        group: 1,
    },
];

/// Title/description separators, anchored at the start of the text.
/// The connector form keeps the connector in group 2 and the
/// description in group 3.
pub(crate) const SEPARATOR_PATTERNS: &[&str] = &[
    r"^(.+?)\s*[-–—:;]\s+(.+)",
    r"(?i)^(.+?)\s+(because|since|for|so|when)\s+(.+)",
];

/// Search keyword phrasing, matched against the original message.
pub(crate) const SEARCH_PATTERNS: &[&str] = &[
    r#"(?:about|for|containing|with)\s+(?:"([^"]+)"|'([^']+)'|(\w+))"#,
    r"(?:find|search|look for)\s+(?:tasks?|items?)\s+(?:about|for|containing|with)\s+(.+?)(?:\.|$|,)",
    r"(?:do\s+i\s+have|have\s+i\s+got)\s+(?:any\s+)?(?:tasks?|items?)\s+(?:about|for|containing|with)\s+(.+?)(?:\.|$|,)",
];

/// Status-filter words for list/search requests.
pub(crate) const STATUS_FILTER_PATTERNS: &[&str] = &[
    r"\b(completed?|done|finished)\b",
    r"\b(pending|incomplete|not done)\b",
    r"\b(active|current)\b",
];

/// Status vocabulary mapped to its canonical category.
pub(crate) struct StatusVocabulary {
    pub category: &'static str,
    pub words: &'static [&'static str],
}

pub(crate) const STATUS_VOCABULARY: &[StatusVocabulary] = &[
    StatusVocabulary {
        category: "complete",
        words: &["complete", "done", "finished", "completed", "marked done"],
    },
    StatusVocabulary {
        category: "incomplete",
        words: &[
            "incomplete",
            "pending",
            "not done",
            "not finished",
            "todo",
            "to do",
        ],
    },
];

/// Explicit "complete this task" phrasing: marks the referenced task
/// complete and emits a "this" reference to resolve it.
pub(crate) const COMPLETION_PATTERNS: &[&str] = &[
    r"complete\s+(?:this|the)\s+(?:task|it)",
    r"finish\s+(?:this|the)\s+(?:task|it)",
    r"done\s+(?:with|this|the)\s+(?:task|it)",
    r"mark\s+(?:this|the)\s+(?:task|it)\s+as\s+(?:complete|done|finished)",
];

pub(crate) const INCOMPLETION_PATTERNS: &[&str] = &[
    r"incomplete\s+(?:this|the)\s+(?:task|it)",
    r"mark\s+(?:this|the)\s+(?:task|it)\s+as\s+(?:incomplete|pending|not done)",
    r"mark\s+(?:task|it)\s+as\s+(?:incomplete|pending|not done)",
];

pub(crate) const REFERENCE_PATTERN: &str =
    r"\b(this|that|these|those|first|last|next|previous|one|ones)\b";

pub(crate) const ORDINAL_PATTERN: &str =
    r"\b(second|third|fourth|fifth|sixth|seventh|eighth|ninth|tenth)\b";

/// Messages that are exactly one of these get the literal "New Task"
/// title instead of a derived one.
pub(crate) const GENERIC_CREATE_PHRASES: &[&str] = &[
    "create a task",
    "add a task",
    "make a task",
    "create task",
    "add task",
    "make task",
];

/// Phrase-stripping patterns for deriving a create title from the raw
/// message when no title entity was extracted.
pub(crate) const CREATE_TITLE_FALLBACK_PATTERNS: &[&str] = &[
    r"(?:create|add|make)\s+(?:a\s+)?task\s+(?:to|called|for)\s+(.+)",
    r"i\s+need\s+to\s+(.+)",
    r"i\s+want\s+to\s+(.+)",
    r"to\s+(.+)",
];
