//! Core type definitions for norns context compilation

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Grouping label shared by documents with the same purpose
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Task,
    Reference,
    Hardware,
    Engine,
    Mod,
    Softcut,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Task => "task",
            Category::Reference => "reference",
            Category::Hardware => "hardware",
            Category::Engine => "engine",
            Category::Mod => "mod",
            Category::Softcut => "softcut",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "task" => Some(Category::Task),
            "reference" => Some(Category::Reference),
            "hardware" => Some(Category::Hardware),
            "engine" => Some(Category::Engine),
            "mod" => Some(Category::Mod),
            "softcut" => Some(Category::Softcut),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One loadable content unit of the corpus
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub category: Category,
    pub size_estimate: usize,   // caller and corpus agree on the unit
    #[serde(default)]
    pub requires: Vec<String>,
    #[serde(default)]
    pub conflicts: Vec<String>,
    pub priority_tier: u8,      // 0 = core/always ... 3 = supplementary
    #[serde(default, skip_serializing)]
    pub content: String,
}

impl Document {
    pub fn new(id: impl Into<String>, category: Category, priority_tier: u8, size_estimate: usize) -> Self {
        Self {
            id: id.into(),
            category,
            size_estimate,
            requires: vec![],
            conflicts: vec![],
            priority_tier,
            content: String::new(),
        }
    }

    pub fn requires(mut self, ids: &[&str]) -> Self {
        self.requires = ids.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn conflicts(mut self, ids: &[&str]) -> Self {
        self.conflicts = ids.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }
}

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    Create,
    Understand,
    Enhance,
    Bugfix,
}

impl TaskKind {
    pub const ALL: [TaskKind; 4] = [
        TaskKind::Create,
        TaskKind::Understand,
        TaskKind::Enhance,
        TaskKind::Bugfix,
    ];
}

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkType {
    Script,
    Mod,
    Engine,
    Unspecified,
}

impl WorkType {
    /// Work types the classification table is keyed on
    pub const SPECIFIED: [WorkType; 3] = [WorkType::Script, WorkType::Mod, WorkType::Engine];
}

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HardwareHint {
    Grid,
    Arc,
    Midi,
}

impl HardwareHint {
    pub fn as_str(&self) -> &'static str {
        match self {
            HardwareHint::Grid => "grid",
            HardwareHint::Arc => "arc",
            HardwareHint::Midi => "midi",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Beginner,
    Intermediate,
    Advanced,
    #[default]
    Unknown,
}

/// Flags declared by the caller; they take precedence over keyword heuristics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplicitFlags {
    pub task_kind: Option<TaskKind>,
    pub work_type: Option<WorkType>,
    pub complexity: Option<Complexity>,
    pub hardware: BTreeSet<HardwareHint>,
}

/// Normalized snapshot of one user turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextSignals {
    pub task_kind: TaskKind,
    pub work_type: WorkType,
    pub audio_manipulation: bool,
    pub hardware_hints: BTreeSet<HardwareHint>,
    pub complexity_hint: Complexity,
    /// An engine keyword occurred, whatever work type won
    pub engine_hint: bool,
}

impl ContextSignals {
    pub fn new(task_kind: TaskKind, work_type: WorkType) -> Self {
        Self {
            task_kind,
            work_type,
            audio_manipulation: false,
            hardware_hints: BTreeSet::new(),
            complexity_hint: Complexity::Unknown,
            engine_hint: false,
        }
    }
}

/// Matches a document id exactly or as a dotted prefix (`softcut` -> `softcut.workflow`)
#[derive(Debug, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selector(pub String);

impl Selector {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn matches(&self, id: &str) -> bool {
        id == self.0
            || (id.len() > self.0.len()
                && id.starts_with(self.0.as_str())
                && id.as_bytes()[self.0.len()] == b'.')
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Predicate over signals guarding a conditional selector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Condition {
    Hardware(HardwareHint),
    EngineMentioned,
    AudioManipulation,
    TaskKindIn(Vec<TaskKind>),
}

impl Condition {
    pub fn holds(&self, signals: &ContextSignals) -> bool {
        match self {
            Condition::Hardware(hint) => signals.hardware_hints.contains(hint),
            Condition::EngineMentioned => {
                signals.engine_hint && signals.work_type != WorkType::Engine
            }
            Condition::AudioManipulation => signals.audio_manipulation,
            Condition::TaskKindIn(kinds) => kinds.contains(&signals.task_kind),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Hardware(hint) => write!(f, "hardware hint '{}'", hint.as_str()),
            Condition::EngineMentioned => f.write_str("engine mentioned outside engine work"),
            Condition::AudioManipulation => f.write_str("audio manipulation requested"),
            Condition::TaskKindIn(kinds) => write!(f, "task kind in {:?}", kinds),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionalCategory {
    pub selector: Selector,
    pub condition: Condition,
}

/// Structured ask for the caller to re-prompt the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClarificationRequest {
    pub task_kind: TaskKind,
    pub reason: String,
    pub options: Vec<WorkType>,
}

/// Output of classification; drives resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskPlan {
    pub signals: ContextSignals,
    pub task_kind: TaskKind,
    pub work_type: WorkType,
    pub complexity_hint: Complexity,
    /// Always-loaded orientation material, resolved before the mandatory list
    pub baseline: Vec<Selector>,
    pub mandatory_categories: Vec<Selector>,
    pub conditional_categories: Vec<ConditionalCategory>,
    pub clarification: Option<ClarificationRequest>,
}

/// Why a document ended up in the resolved set
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "via", rename_all = "snake_case")]
pub enum Inclusion {
    Baseline { selector: Selector },
    Mandatory { selector: Selector },
    Conditional { selector: Selector, condition: String },
    Dependency { of: String },
}

impl fmt::Display for Inclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Inclusion::Baseline { selector } => write!(f, "baseline: {}", selector),
            Inclusion::Mandatory { selector } => write!(f, "mandatory: {}", selector),
            Inclusion::Conditional { selector, condition } => {
                write!(f, "conditional: {} ({})", selector, condition)
            }
            Inclusion::Dependency { of } => write!(f, "required by {}", of),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedEntry {
    pub id: String,
    pub category: Category,
    pub priority_tier: u8,
    pub size_estimate: usize,
    pub requires: Vec<String>,
    pub inclusion: Inclusion,
}

/// Ordered, deduplicated, dependency-closed document list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedSet {
    pub entries: Vec<ResolvedEntry>,
    pub complexity_hint: Complexity,
}

impl ResolvedSet {
    pub fn ids(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.id.as_str()).collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&ResolvedEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "missing", rename_all = "snake_case")]
pub enum TruncationReason {
    OverBudget,
    DependencyCut(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PackStatus {
    Included,
    Truncated { cause: TruncationReason },
}

impl PackStatus {
    pub fn is_included(&self) -> bool {
        matches!(self, PackStatus::Included)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackedEntry {
    pub id: String,
    pub category: Category,
    pub priority_tier: u8,
    pub size_estimate: usize,
    pub status: PackStatus,
}

/// Budget decision for every resolved document, in resolved order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackedSet {
    pub entries: Vec<PackedEntry>,
    pub budget: usize,
    pub complexity_hint: Complexity,
}

impl PackedSet {
    pub fn included(&self) -> impl Iterator<Item = &PackedEntry> {
        self.entries.iter().filter(|e| e.status.is_included())
    }

    pub fn included_ids(&self) -> Vec<&str> {
        self.included().map(|e| e.id.as_str()).collect()
    }

    pub fn truncated(&self) -> impl Iterator<Item = &PackedEntry> {
        self.entries.iter().filter(|e| !e.status.is_included())
    }

    pub fn included_size(&self) -> usize {
        self.included().map(|e| e.size_estimate).sum()
    }

    /// Size of the unconditional tier-0 floor
    pub fn floor_size(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.priority_tier == 0)
            .map(|e| e.size_estimate)
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BundleSection {
    pub id: String,
    pub category: Category,
    pub priority_tier: u8,
    pub content: String,
}

/// Final ordered hand-off for the downstream assistant
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bundle {
    pub sections: Vec<BundleSection>,
    pub complexity_hint: Complexity,
    pub total_size: usize,
}

/// Request to compile a context bundle
#[derive(Debug, Clone, Deserialize)]
pub struct CompileRequest {
    pub input: String,
    #[serde(default)]
    pub flags: ExplicitFlags,
    pub budget: usize,
    #[serde(default)]
    pub explain: bool,
}

/// Response from compilation
#[derive(Debug, Serialize)]
pub struct CompileResponse {
    pub bundle: Bundle,
    pub rendered: String,
    pub signals: ContextSignals,
    pub clarification: Option<ClarificationRequest>,
    pub packed: PackedSet,
    pub stats: CompileStats,
    pub rationale: Option<Vec<DocumentExplanation>>,
}

#[derive(Debug, Serialize)]
pub struct CompileStats {
    pub documents_resolved: usize,
    pub documents_included: usize,
    pub documents_truncated: usize,
    pub total_size: usize,
    pub budget: usize,
    pub utilization: f32,
    pub over_budget_floor: bool,
    pub elapsed_us: u64,
}

#[derive(Debug, Serialize)]
pub struct DocumentExplanation {
    pub id: String,
    pub priority_tier: u8,
    pub status: PackStatus,
    pub reasons: Vec<String>,
}
