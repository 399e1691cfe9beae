//! Opcode definitions for the IPPcode24 instruction set.

/// Identifies the operation to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    // Frames and function calls
    /// Copy a value into a variable.
    Move,
    /// Create a new, empty temporary frame (discarding any pending one).
    CreateFrame,
    /// Move the temporary frame onto the local-frame stack.
    PushFrame,
    /// Move the top local frame into the temporary-frame slot.
    PopFrame,
    /// Define an uninitialized variable.
    Defvar,
    /// Save the return position and jump to a label.
    Call,
    /// Jump back to the most recently saved return position.
    Return,

    // Data stack
    /// Push a value onto the data stack.
    Pushs,
    /// Pop the data stack into a variable.
    Pops,

    // Arithmetic, relational, boolean and conversion
    Add,
    Sub,
    Mul,
    /// Integer division. Division by zero is a runtime error.
    Idiv,
    Lt,
    Gt,
    Eq,
    And,
    Or,
    Not,
    /// Integer code point to a one-character string.
    Int2Char,
    /// Code point of the character at an index.
    Stri2Int,

    // Input and output
    /// Read a value of the requested type from input.
    Read,
    /// Print a value to standard output.
    Write,

    // Strings
    Concat,
    Strlen,
    Getchar,
    Setchar,

    // Types
    /// Store the type name of a symbol as a string.
    Type,

    // Control flow
    /// Jump target. No effect when executed.
    Label,
    Jump,
    JumpIfEq,
    JumpIfNeq,
    /// Terminate the program with an exit code in 0..=9.
    Exit,

    // Debugging
    /// Print a value to the diagnostic output.
    Dprint,
    /// Dump interpreter state to the diagnostic output.
    Break,
}

/// The kind of operand an instruction slot accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// A variable reference (destination).
    Var,
    /// A literal or a variable reference.
    Symb,
    /// A label name.
    Label,
    /// A type name.
    Type,
}

/// All valid opcodes, in definition order. Useful for exhaustive testing.
pub const ALL_OPCODES: [Opcode; 35] = [
    Opcode::Move,
    Opcode::CreateFrame,
    Opcode::PushFrame,
    Opcode::PopFrame,
    Opcode::Defvar,
    Opcode::Call,
    Opcode::Return,
    Opcode::Pushs,
    Opcode::Pops,
    Opcode::Add,
    Opcode::Sub,
    Opcode::Mul,
    Opcode::Idiv,
    Opcode::Lt,
    Opcode::Gt,
    Opcode::Eq,
    Opcode::And,
    Opcode::Or,
    Opcode::Not,
    Opcode::Int2Char,
    Opcode::Stri2Int,
    Opcode::Read,
    Opcode::Write,
    Opcode::Concat,
    Opcode::Strlen,
    Opcode::Getchar,
    Opcode::Setchar,
    Opcode::Type,
    Opcode::Label,
    Opcode::Jump,
    Opcode::JumpIfEq,
    Opcode::JumpIfNeq,
    Opcode::Exit,
    Opcode::Dprint,
    Opcode::Break,
];

impl Opcode {
    /// Returns the source mnemonic for this opcode.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Opcode::Move => "MOVE",
            Opcode::CreateFrame => "CREATEFRAME",
            Opcode::PushFrame => "PUSHFRAME",
            Opcode::PopFrame => "POPFRAME",
            Opcode::Defvar => "DEFVAR",
            Opcode::Call => "CALL",
            Opcode::Return => "RETURN",
            Opcode::Pushs => "PUSHS",
            Opcode::Pops => "POPS",
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Mul => "MUL",
            Opcode::Idiv => "IDIV",
            Opcode::Lt => "LT",
            Opcode::Gt => "GT",
            Opcode::Eq => "EQ",
            Opcode::And => "AND",
            Opcode::Or => "OR",
            Opcode::Not => "NOT",
            Opcode::Int2Char => "INT2CHAR",
            Opcode::Stri2Int => "STRI2INT",
            Opcode::Read => "READ",
            Opcode::Write => "WRITE",
            Opcode::Concat => "CONCAT",
            Opcode::Strlen => "STRLEN",
            Opcode::Getchar => "GETCHAR",
            Opcode::Setchar => "SETCHAR",
            Opcode::Type => "TYPE",
            Opcode::Label => "LABEL",
            Opcode::Jump => "JUMP",
            Opcode::JumpIfEq => "JUMPIFEQ",
            Opcode::JumpIfNeq => "JUMPIFNEQ",
            Opcode::Exit => "EXIT",
            Opcode::Dprint => "DPRINT",
            Opcode::Break => "BREAK",
        }
    }

    /// Look up an opcode by mnemonic, ignoring case.
    pub fn from_mnemonic(mnemonic: &str) -> Option<Opcode> {
        ALL_OPCODES
            .iter()
            .find(|op| op.mnemonic().eq_ignore_ascii_case(mnemonic))
            .copied()
    }

    /// The operand slots this opcode takes, in order.
    pub fn signature(&self) -> &'static [Slot] {
        use Slot::*;
        match self {
            Opcode::CreateFrame
            | Opcode::PushFrame
            | Opcode::PopFrame
            | Opcode::Return
            | Opcode::Break => &[],

            Opcode::Defvar | Opcode::Pops => &[Var],

            Opcode::Call | Opcode::Label | Opcode::Jump => &[Label],

            Opcode::Pushs | Opcode::Write | Opcode::Exit | Opcode::Dprint => &[Symb],

            Opcode::Move | Opcode::Not | Opcode::Int2Char | Opcode::Strlen | Opcode::Type => {
                &[Var, Symb]
            }

            Opcode::Read => &[Var, Type],

            Opcode::Add
            | Opcode::Sub
            | Opcode::Mul
            | Opcode::Idiv
            | Opcode::Lt
            | Opcode::Gt
            | Opcode::Eq
            | Opcode::And
            | Opcode::Or
            | Opcode::Stri2Int
            | Opcode::Concat
            | Opcode::Getchar
            | Opcode::Setchar => &[Var, Symb, Symb],

            Opcode::JumpIfEq | Opcode::JumpIfNeq => &[Label, Symb, Symb],
        }
    }

    /// Number of operands this opcode takes.
    pub fn arity(&self) -> usize {
        self.signature().len()
    }
}
