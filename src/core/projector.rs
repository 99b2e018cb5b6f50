//! Field projection over nested tweet JSON.
//!
//! Field paths are grouped by head key before anything is copied, at every
//! depth. A group whose value is an array is projected element by element
//! with the whole group, so sibling paths below an array land in the same
//! element. Missing keys never fail, they project to `null`.

use crate::domain::model::FieldPath;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectionConflict {
    #[error("cannot select '{segment}' below the scalar value at '{at}', keeping the value")]
    ScalarDescent { at: String, segment: String },
}

/// Result of projecting one record: the reduced value plus any conflicts
/// that were resolved along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub value: Value,
    pub conflicts: Vec<ProjectionConflict>,
}

#[derive(Debug, Clone)]
pub struct Projector {
    paths: Vec<FieldPath>,
}

impl Projector {
    pub fn new(paths: Vec<FieldPath>) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &[FieldPath] {
        &self.paths
    }

    pub fn project(&self, record: &Value) -> Projection {
        let paths: Vec<&[String]> = self.paths.iter().map(FieldPath::segments).collect();
        let mut walk = Walk::default();
        let value = walk.project(record, &paths);

        Projection {
            value,
            conflicts: walk.conflicts,
        }
    }

    /// Paths that are never copied literally because a longer path below
    /// them is also selected (`x` next to `x.y`). Dotted children win.
    pub fn shadowed_literals(&self) -> Vec<&FieldPath> {
        self.paths
            .iter()
            .filter(|literal| {
                self.paths.iter().any(|other| {
                    other.segments().len() > literal.segments().len()
                        && other.segments().starts_with(literal.segments())
                })
            })
            .collect()
    }
}

/// Projects `record` and drops the conflict report.
pub fn project(record: &Value, paths: &[FieldPath]) -> Value {
    Projector::new(paths.to_vec()).project(record).value
}

/// Paths grouped under one head key, in first-seen order. An empty
/// `children` list means only the bare key was selected.
struct Selection<'a> {
    head: &'a str,
    children: Vec<&'a [String]>,
}

fn group_by_head<'a>(paths: &[&'a [String]]) -> Vec<Selection<'a>> {
    let mut groups: Vec<Selection<'a>> = Vec::new();

    for path in paths {
        let Some((head, rest)) = path.split_first() else {
            continue;
        };

        let index = match groups.iter().position(|g| g.head == head.as_str()) {
            Some(index) => index,
            None => {
                groups.push(Selection {
                    head: head.as_str(),
                    children: Vec::new(),
                });
                groups.len() - 1
            }
        };

        if !rest.is_empty() {
            groups[index].children.push(rest);
        }
    }

    groups
}

#[derive(Default)]
struct Walk {
    trail: Vec<String>,
    conflicts: Vec<ProjectionConflict>,
}

impl Walk {
    fn location(&self) -> String {
        if self.trail.is_empty() {
            "<record>".to_string()
        } else {
            self.trail.join(".")
        }
    }

    fn report(&mut self, conflict: ProjectionConflict) {
        if !self.conflicts.contains(&conflict) {
            self.conflicts.push(conflict);
        }
    }

    fn project(&mut self, value: &Value, paths: &[&[String]]) -> Value {
        match value {
            Value::Array(items) => {
                let mut projected = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    self.trail.push(index.to_string());
                    projected.push(self.project(item, paths));
                    self.trail.pop();
                }
                Value::Array(projected)
            }
            Value::Object(record) => Value::Object(self.project_object(record, paths)),
            _ if paths.is_empty() => Value::Object(Map::new()),
            Value::Null => Value::Null,
            scalar => {
                let segment = paths
                    .first()
                    .and_then(|p| p.first())
                    .cloned()
                    .unwrap_or_default();
                let at = self.location();
                self.report(ProjectionConflict::ScalarDescent { at, segment });
                scalar.clone()
            }
        }
    }

    fn project_object(&mut self, record: &Map<String, Value>, paths: &[&[String]]) -> Map<String, Value> {
        let mut result = Map::new();

        for selection in group_by_head(paths) {
            let projected = match record.get(selection.head) {
                None | Some(Value::Null) => Value::Null,
                Some(source) if selection.children.is_empty() => source.clone(),
                Some(source) => {
                    self.trail.push(selection.head.to_string());
                    let projected = self.project(source, &selection.children);
                    self.trail.pop();
                    projected
                }
            };
            result.insert(selection.head.to_string(), projected);
        }

        result
    }
}
