//! Signal extraction: raw request text + explicit flags -> ContextSignals
//!
//! Matching is a fixed, case-insensitive set lookup over tokens. No fuzzy
//! matching; the same input always yields the same signals.

use crate::types::*;
use std::collections::BTreeSet;
use tracing::debug;

const AUDIO_KEYWORDS: &[&str] = &[
    "record", "recording", "recorded", "recorder",
    "loop", "looping", "looper",
    "sample", "sampling", "sampled", "sampler",
    "buffer", "overdub", "overdubbing", "tape", "softcut",
];

const HARDWARE_KEYWORDS: &[(&str, HardwareHint)] = &[
    ("grid", HardwareHint::Grid),
    ("arc", HardwareHint::Arc),
    ("midi", HardwareHint::Midi),
];

const SCRIPT_KEYWORDS: &[&str] = &["script", "lua"];
const MOD_KEYWORDS: &[&str] = &["mod", "hook", "system-wide"];
const ENGINE_KEYWORDS: &[&str] = &["engine", "synthdef", "supercollider"];

// First match wins, in this order
const TASK_RULES: &[(TaskKind, &[&str])] = &[
    (TaskKind::Bugfix, &["fix", "bug", "broken", "error", "crash", "debug"]),
    (TaskKind::Enhance, &["add", "improve", "enhance", "extend", "refactor", "optimize"]),
    (TaskKind::Understand, &["explain", "understand", "how", "why", "learn"]),
];

const COMPLEXITY_RULES: &[(Complexity, &[&str])] = &[
    (Complexity::Advanced, &["advanced", "expert"]),
    (Complexity::Intermediate, &["intermediate"]),
    (Complexity::Beginner, &["beginner", "first", "simple", "basic"]),
];

/// Lowercased tokens of the request plus their stems
#[derive(Debug, Default)]
pub struct TokenSet {
    tokens: BTreeSet<String>,
}

impl TokenSet {
    pub fn from_text(text: &str) -> Self {
        let mut tokens = BTreeSet::new();
        let lowered = text.to_lowercase();
        let words = lowered
            .split(|c: char| !(c.is_alphanumeric() || c == '-' || c == '_'))
            .map(|w| w.trim_matches('-'))
            .filter(|w| !w.is_empty());

        for word in words {
            insert_with_stem(&mut tokens, word);
            if word.contains('-') {
                for part in word.split('-').filter(|p| !p.is_empty()) {
                    insert_with_stem(&mut tokens, part);
                }
            }
        }
        Self { tokens }
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.tokens.contains(keyword)
    }

    pub fn any(&self, keywords: &[&str]) -> bool {
        keywords.iter().any(|k| self.contains(k))
    }

    pub fn matches<'a>(&self, keywords: &[&'a str]) -> Vec<&'a str> {
        keywords.iter().copied().filter(|k| self.contains(k)).collect()
    }
}

fn insert_with_stem(tokens: &mut BTreeSet<String>, word: &str) {
    tokens.insert(word.to_string());
    let stem = stem(word);
    if stem != word {
        tokens.insert(stem.to_string());
    }
}

/// Strip a single plural `s` ("loops" -> "loop"; "class" and "bus" stay)
pub fn stem(word: &str) -> &str {
    if word.len() > 3 && word.ends_with('s') && !word.ends_with("ss") {
        &word[..word.len() - 1]
    } else {
        word
    }
}

/// Convert raw context into normalized signals. Pure function of its inputs.
pub fn extract(raw_input: &str, flags: &ExplicitFlags) -> ContextSignals {
    let tokens = TokenSet::from_text(raw_input);

    let audio_matches = tokens.matches(AUDIO_KEYWORDS);
    let audio_manipulation = !audio_matches.is_empty();

    let mut hardware_hints: BTreeSet<HardwareHint> = HARDWARE_KEYWORDS
        .iter()
        .filter(|(keyword, _)| tokens.contains(keyword))
        .map(|(_, hint)| *hint)
        .collect();
    hardware_hints.extend(flags.hardware.iter().copied());

    let engine_hint = tokens.any(ENGINE_KEYWORDS);
    let work_type = flags
        .work_type
        .filter(|w| *w != WorkType::Unspecified)
        .unwrap_or_else(|| infer_work_type(&tokens));

    let task_kind = flags.task_kind.unwrap_or_else(|| {
        TASK_RULES
            .iter()
            .find(|(_, keywords)| tokens.any(keywords))
            .map(|(kind, _)| *kind)
            .unwrap_or(TaskKind::Create)
    });

    let complexity_hint = flags.complexity.unwrap_or_else(|| {
        COMPLEXITY_RULES
            .iter()
            .find(|(_, keywords)| tokens.any(keywords))
            .map(|(level, _)| *level)
            .unwrap_or(Complexity::Unknown)
    });

    debug!(
        "Signals: task={:?} work={:?} audio={:?} hardware={:?} engine_hint={}",
        task_kind, work_type, audio_matches, hardware_hints, engine_hint
    );

    ContextSignals {
        task_kind,
        work_type,
        audio_manipulation,
        hardware_hints,
        complexity_hint,
        engine_hint,
    }
}

/// Keyword fallback, priority script > mod > engine
fn infer_work_type(tokens: &TokenSet) -> WorkType {
    if tokens.any(SCRIPT_KEYWORDS) {
        WorkType::Script
    } else if tokens.any(MOD_KEYWORDS) {
        WorkType::Mod
    } else if tokens.any(ENGINE_KEYWORDS) {
        WorkType::Engine
    } else {
        WorkType::Unspecified
    }
}
