//! Variable storage: the global frame, the local-frame stack and the
//! temporary frame.
//!
//! The temporary frame moves through three states:
//!
//! - `Absent`: nothing has been created, or the pending frame was pushed.
//! - `Pending`: CREATEFRAME made a fresh frame; PUSHFRAME may push it.
//! - `Detached`: POPFRAME moved the former top local frame here. It can be
//!   read and written through `TF@`, but never pushed again.

use std::collections::HashMap;
use std::fmt;

use ippcode_common::{FrameKind, TypeTag, Value, VarRef};

use crate::error::FrameError;

/// A named variable and its current value, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub name: String,
    pub value: Option<Value>,
}

impl Variable {
    /// The type of the stored value, `None` while uninitialized.
    pub fn type_tag(&self) -> Option<TypeTag> {
        self.value.as_ref().map(Value::type_tag)
    }
}

/// A set of variables addressed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    vars: HashMap<String, Variable>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.vars.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Variable> {
        self.vars.get_mut(name)
    }

    /// Insert an uninitialized variable. Returns false if the name is taken.
    pub fn define(&mut self, name: &str) -> bool {
        if self.vars.contains_key(name) {
            return false;
        }
        self.vars.insert(
            name.to_string(),
            Variable {
                name: name.to_string(),
                value: None,
            },
        );
        true
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Variables sorted by name, for stable dumps.
    pub fn sorted(&self) -> Vec<&Variable> {
        let mut vars: Vec<&Variable> = self.vars.values().collect();
        vars.sort_by(|a, b| a.name.cmp(&b.name));
        vars
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, var) in self.sorted().into_iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match &var.value {
                Some(value) => write!(f, "{} = {}", var.name, value)?,
                None => write!(f, "{} = <uninitialized>", var.name)?,
            }
        }
        f.write_str("}")
    }
}

/// State of the temporary-frame slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TemporaryFrame {
    #[default]
    Absent,
    Pending(Frame),
    Detached(Frame),
}

impl TemporaryFrame {
    fn frame(&self) -> Option<&Frame> {
        match self {
            TemporaryFrame::Absent => None,
            TemporaryFrame::Pending(frame) | TemporaryFrame::Detached(frame) => Some(frame),
        }
    }

    fn frame_mut(&mut self) -> Option<&mut Frame> {
        match self {
            TemporaryFrame::Absent => None,
            TemporaryFrame::Pending(frame) | TemporaryFrame::Detached(frame) => Some(frame),
        }
    }
}

/// All variable scopes of a running program.
#[derive(Debug, Clone, Default)]
pub struct FrameStore {
    global: Frame,
    locals: Vec<Frame>,
    temporary: TemporaryFrame,
}

impl FrameStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn frame(&self, kind: FrameKind) -> Result<&Frame, FrameError> {
        match kind {
            FrameKind::Global => Some(&self.global),
            FrameKind::Local => self.locals.last(),
            FrameKind::Temporary => self.temporary.frame(),
        }
        .ok_or(FrameError::FrameMissing(kind))
    }

    fn frame_mut(&mut self, kind: FrameKind) -> Result<&mut Frame, FrameError> {
        match kind {
            FrameKind::Global => Some(&mut self.global),
            FrameKind::Local => self.locals.last_mut(),
            FrameKind::Temporary => self.temporary.frame_mut(),
        }
        .ok_or(FrameError::FrameMissing(kind))
    }

    /// DEFVAR: add an uninitialized variable to the addressed frame.
    pub fn define(&mut self, var: &VarRef) -> Result<(), FrameError> {
        if self.frame_mut(var.frame)?.define(&var.name) {
            Ok(())
        } else {
            Err(FrameError::Redefinition(var.clone()))
        }
    }

    /// Look up a variable, initialized or not.
    pub fn read(&self, var: &VarRef) -> Result<&Variable, FrameError> {
        self.frame(var.frame)?
            .get(&var.name)
            .ok_or_else(|| FrameError::VariableMissing(var.clone()))
    }

    /// The value of an initialized variable.
    pub fn value(&self, var: &VarRef) -> Result<&Value, FrameError> {
        self.read(var)?
            .value
            .as_ref()
            .ok_or_else(|| FrameError::Uninitialized(var.clone()))
    }

    /// Assign to an existing variable. Never creates one.
    pub fn write(&mut self, var: &VarRef, value: Value) -> Result<(), FrameError> {
        let slot = self
            .frame_mut(var.frame)?
            .get_mut(&var.name)
            .ok_or_else(|| FrameError::VariableMissing(var.clone()))?;
        slot.value = Some(value);
        Ok(())
    }

    /// CREATEFRAME: replace the temporary slot with a fresh pending frame.
    pub fn create_temporary(&mut self) {
        self.temporary = TemporaryFrame::Pending(Frame::new());
    }

    /// PUSHFRAME: move the pending temporary frame onto the local stack.
    pub fn push_temporary(&mut self) -> Result<(), FrameError> {
        match std::mem::take(&mut self.temporary) {
            TemporaryFrame::Pending(frame) => {
                self.locals.push(frame);
                Ok(())
            }
            other => {
                self.temporary = other;
                Err(FrameError::NothingToPush)
            }
        }
    }

    /// POPFRAME: move the top local frame into the temporary slot.
    pub fn pop_local(&mut self) -> Result<(), FrameError> {
        let frame = self.locals.pop().ok_or(FrameError::NothingToPop)?;
        self.temporary = TemporaryFrame::Detached(frame);
        Ok(())
    }

    /// Number of frames on the local stack.
    pub fn depth(&self) -> usize {
        self.locals.len()
    }

    pub fn temporary(&self) -> &TemporaryFrame {
        &self.temporary
    }
}

/// Multi-line dump of every frame, used by BREAK.
impl fmt::Display for FrameStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "GF: {}", self.global)?;
        match &self.temporary {
            TemporaryFrame::Absent => writeln!(f, "TF: <none>")?,
            TemporaryFrame::Pending(frame) => writeln!(f, "TF: {frame}")?,
            TemporaryFrame::Detached(frame) => writeln!(f, "TF (popped): {frame}")?,
        }
        if self.locals.is_empty() {
            writeln!(f, "LF: <none>")?;
        }
        for (depth, frame) in self.locals.iter().enumerate().rev() {
            writeln!(f, "LF[{depth}]: {frame}")?;
        }
        Ok(())
    }
}
