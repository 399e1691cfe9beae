//! Label index: maps label names to instruction positions.

use std::collections::HashMap;

use ippcode_common::Program;

/// Jump targets of an ordered program.
///
/// A label resolves to the position of the instruction after its LABEL.
#[derive(Debug, Clone, Default)]
pub struct LabelIndex {
    positions: HashMap<String, usize>,
}

impl LabelIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every LABEL of an already ordered program.
    ///
    /// When a name is defined twice the later definition wins.
    pub fn build(program: &Program) -> Self {
        let mut index = Self::new();
        for (name, position) in program.labels() {
            if let Some(previous) = index.register(name, position) {
                tracing::warn!(label = name, previous, position, "label redefined");
            }
        }
        index
    }

    /// Record a label. Returns the position it replaced, if any.
    pub fn register(&mut self, name: &str, position: usize) -> Option<usize> {
        self.positions.insert(name.to_string(), position)
    }

    pub fn resolve(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
