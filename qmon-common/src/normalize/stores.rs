//! Per-store entry decoders
//!
//! Each function pulls the store's native fields into a [`Draft`];
//! validation of required fields happens in [`Draft::finish`].

use super::fields::{self, entries};
use super::{Draft, SkipReason};
use crate::store::StoreName;
use serde_json::{Map, Value};

type Drafts<'a> = Vec<Result<Draft<'a>, SkipReason>>;

const SCORE_KEYS: &[&str] = &["overall_score", "quality_score", "score"];
const SUCCESS_KEYS: &[&str] = &["success", "pass", "passed"];
const DURATION_KEYS: &[&str] = &["duration_seconds", "duration", "execution_time"];
const ID_KEYS: &[&str] = &["assessment_id"];

fn list_entries(content: &Value, store: StoreName) -> &[Value] {
    entries(content, store.list_key().unwrap_or_default())
}

fn each_object<'a, F>(items: &'a [Value], mut decode: F) -> Drafts<'a>
where
    F: FnMut(&'a Map<String, Value>) -> Draft<'a>,
{
    items
        .iter()
        .map(|item| item.as_object().map(&mut decode).ok_or(SkipReason::NotAnObject))
        .collect()
}

/// Fields shared by the flat record stores
fn flat_draft(obj: &Map<String, Value>) -> Draft<'_> {
    Draft {
        assessment_id: fields::string(obj, ID_KEYS),
        timestamp: fields::first(obj, &["timestamp"]),
        task_type: fields::string(obj, &["task_type"]),
        model: fields::string(obj, &["model_used", "model"]),
        score: fields::first(obj, SCORE_KEYS),
        success: fields::boolean(obj, SUCCESS_KEYS),
        skills_used: fields::string_list(obj, &["skills_used", "skills"]),
        agents_used: fields::string_list(obj, &["agents_used", "agents"]),
        duration: fields::first(obj, DURATION_KEYS),
        auto_generated: fields::boolean(obj, &["auto_generated"]).unwrap_or(false),
    }
}

/// `{"quality_assessments": [...]}`; model nested under `details`
pub fn quality_history(content: &Value) -> Drafts<'_> {
    each_object(list_entries(content, StoreName::QualityHistory), |obj| {
        let nested_model = obj
            .get("details")
            .and_then(Value::as_object)
            .and_then(|details| fields::string(details, &["model_used", "model"]));
        let mut draft = flat_draft(obj);
        draft.model = nested_model.or(draft.model.take());
        draft
    })
}

/// `{"records": [...]}`
pub fn performance_records(content: &Value) -> Drafts<'_> {
    each_object(list_entries(content, StoreName::PerformanceRecords), flat_draft)
}

/// `{"assessments": [...]}`
pub fn assessments(content: &Value) -> Drafts<'_> {
    each_object(list_entries(content, StoreName::Assessments), flat_draft)
}

/// `{"patterns": [...]}`; outcome and execution details nested
pub fn patterns(content: &Value) -> Drafts<'_> {
    each_object(list_entries(content, StoreName::Patterns), |obj| {
        let outcome = obj.get("outcome").and_then(Value::as_object);
        let execution = obj.get("execution").and_then(Value::as_object);

        Draft {
            assessment_id: fields::string(obj, &["pattern_id", "assessment_id"]),
            timestamp: fields::first(obj, &["timestamp"]),
            task_type: fields::string(obj, &["task_type"]),
            model: execution
                .and_then(|e| fields::string(e, &["model_used", "model"]))
                .or_else(|| fields::string(obj, &["model_used", "model"])),
            score: outcome
                .and_then(|o| fields::first(o, SCORE_KEYS))
                .or_else(|| fields::first(obj, SCORE_KEYS)),
            success: outcome
                .and_then(|o| fields::boolean(o, SUCCESS_KEYS))
                .or_else(|| fields::boolean(obj, SUCCESS_KEYS)),
            skills_used: execution
                .map(|e| fields::string_list(e, &["skills_used", "skills"]))
                .unwrap_or_default(),
            agents_used: execution
                .map(|e| fields::string_list(e, &["agents_delegated", "agents_used"]))
                .unwrap_or_default(),
            duration: outcome.and_then(|o| fields::first(o, DURATION_KEYS)),
            auto_generated: fields::boolean(obj, &["auto_generated"]).unwrap_or(true),
        }
    })
}

/// `{"trends": [...]}`; always written by the automatic trend recorder
pub fn trends(content: &Value) -> Drafts<'_> {
    each_object(list_entries(content, StoreName::Trends), |obj| {
        let mut draft = flat_draft(obj);
        draft.auto_generated = true;
        draft
    })
}

/// `{"<model>": {"recent_scores": [...]}}` or `{"<model>": [...]}`
pub fn model_performance(content: &Value) -> Drafts<'_> {
    let Some(models) = content.as_object() else {
        return Vec::new();
    };

    models
        .iter()
        .flat_map(|(model, summary)| {
            let series: &[Value] = match summary {
                Value::Array(items) => items,
                Value::Object(obj) => fields::first(obj, &["recent_scores", "scores", "history"])
                    .and_then(Value::as_array)
                    .map(Vec::as_slice)
                    .unwrap_or(&[]),
                _ => &[],
            };

            each_object(series, move |obj| {
                let mut draft = flat_draft(obj);
                draft.model = Some(model.clone());
                draft.auto_generated = fields::boolean(obj, &["auto_generated"]).unwrap_or(true);
                draft
            })
        })
        .collect()
}
