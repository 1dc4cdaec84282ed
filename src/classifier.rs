//! Classification: ContextSignals -> TaskPlan

use crate::error::ClassificationError;
use crate::types::*;
use tracing::debug;

/// Selectors loaded for every plan
const BASELINE: &[&str] = &["core"];

/// Mandatory selectors per (task kind, work type). `None` for unspecified work.
pub fn mandatory_selectors(task_kind: TaskKind, work_type: WorkType) -> Option<&'static [&'static str]> {
    use TaskKind::*;
    use WorkType::*;

    let selectors: &'static [&'static str] = match (task_kind, work_type) {
        (_, Unspecified) => return None,

        (Create, Script) => &["tasks.create", "reference.api", "reference.patterns"],
        (Create, Mod) => &["tasks.create_mod", "mods.patterns"],
        (Create, Engine) => &["tasks.create_engine", "engines.patterns", "engines.osc_testing"],

        (Understand, Script) => &["tasks.understand", "reference.api", "reference.patterns"],
        (Understand, Mod) => &["tasks.understand", "mods.patterns"],
        (Understand, Engine) => &["tasks.understand", "engines.patterns"],

        (Enhance, Script) => &["tasks.enhance", "reference.api", "reference.patterns"],
        (Enhance, Mod) => &["tasks.enhance", "mods.patterns"],
        (Enhance, Engine) => &["tasks.enhance", "engines.patterns", "engines.osc_testing"],

        (Bugfix, Script) => &["tasks.bugfix", "reference.api", "reference.debugging"],
        (Bugfix, Mod) => &["tasks.bugfix", "mods.patterns", "reference.debugging"],
        (Bugfix, Engine) => &["tasks.bugfix", "engines.osc_testing", "reference.debugging"],
    };
    Some(selectors)
}

/// Conditional rules in evaluation order: hardware, engine, softcut, supplementary
fn conditional_rules() -> Vec<ConditionalCategory> {
    let rule = |selector: &str, condition: Condition| ConditionalCategory {
        selector: Selector::new(selector),
        condition,
    };

    vec![
        rule("hardware.grid", Condition::Hardware(HardwareHint::Grid)),
        rule("hardware.arc", Condition::Hardware(HardwareHint::Arc)),
        rule("hardware.midi", Condition::Hardware(HardwareHint::Midi)),
        rule("engines.integration", Condition::EngineMentioned),
        rule("softcut", Condition::AudioManipulation),
        rule(
            "reference.examples",
            Condition::TaskKindIn(vec![TaskKind::Create, TaskKind::Enhance]),
        ),
    ]
}

/// Map signals to a plan. An ambiguous create request is refused, never defaulted.
pub fn classify(signals: ContextSignals) -> Result<TaskPlan, ClassificationError> {
    let mandatory = mandatory_selectors(signals.task_kind, signals.work_type);

    let clarification = match mandatory {
        Some(_) => None,
        None => {
            let request = ClarificationRequest {
                task_kind: signals.task_kind,
                reason: "could not tell whether this is a script, a mod or an engine".to_string(),
                options: WorkType::SPECIFIED.to_vec(),
            };
            if signals.task_kind == TaskKind::Create {
                debug!("Create request without work type, asking for clarification");
                return Err(ClassificationError::NeedsClarification(request));
            }
            Some(request)
        }
    };

    let mandatory_categories = mandatory
        .unwrap_or_default()
        .iter()
        .map(|s| Selector::new(*s))
        .collect();

    debug!(
        "Classified {:?}/{:?}, complexity {:?}",
        signals.task_kind, signals.work_type, signals.complexity_hint
    );

    Ok(TaskPlan {
        task_kind: signals.task_kind,
        work_type: signals.work_type,
        complexity_hint: signals.complexity_hint,
        baseline: BASELINE.iter().map(|s| Selector::new(*s)).collect(),
        mandatory_categories,
        conditional_categories: conditional_rules(),
        clarification,
        signals,
    })
}
