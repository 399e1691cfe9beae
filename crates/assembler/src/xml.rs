//! Loader for the XML program representation.
//!
//! ```xml
//! <program language="IPPcode24">
//!   <instruction order="1" opcode="WRITE">
//!     <arg1 type="string">hello</arg1>
//!   </instruction>
//! </program>
//! ```
//!
//! Operands are built with [`Argument::parse`], so literal coercion matches
//! hand-built programs. Order numbers are kept as declared; the VM sorts and
//! validates them before execution.

use ippcode_common::{Argument, Instruction, Program};
use roxmltree::{Document, Node};

use crate::error::XmlError;

const LANGUAGE: &str = "IPPcode24";

/// Operand elements in slot order.
const ARG_TAGS: [&str; 3] = ["arg1", "arg2", "arg3"];

/// Load an XML document into a program.
pub fn load_xml(text: &str) -> Result<Program, XmlError> {
    let doc = Document::parse(text).map_err(|e| XmlError::Malformed(e.to_string()))?;
    let root = doc.root_element();
    if root.tag_name().name() != "program" || root.attribute("language") != Some(LANGUAGE) {
        return Err(XmlError::NotAProgram);
    }

    let instructions = child_elements(root, "instruction")
        .enumerate()
        .map(|(i, node)| load_instruction(i + 1, node))
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(instructions = instructions.len(), "XML program loaded");
    Ok(Program::new(instructions))
}

fn load_instruction(index: usize, node: Node<'_, '_>) -> Result<Instruction, XmlError> {
    let opcode = node.attribute("opcode").ok_or(XmlError::MissingAttribute {
        index,
        attribute: "opcode",
    })?;
    let order = node.attribute("order").ok_or(XmlError::MissingAttribute {
        index,
        attribute: "order",
    })?;
    // Non-numeric and negative orders become 0, which ordering rejects.
    let order = order.trim().parse::<u32>().unwrap_or(0);

    let args = ARG_TAGS
        .iter()
        .filter_map(|&tag| child_elements(node, tag).next())
        .map(|arg| {
            let kind = arg.attribute("type").unwrap_or("");
            Argument::parse(kind, &text_content(arg))
                .map_err(|source| XmlError::Argument { order, source })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Instruction::from_mnemonic(opcode, args, order))
}

fn child_elements<'a, 'input>(
    node: Node<'a, 'input>,
    tag: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(move |n| n.is_element() && n.tag_name().name() == tag)
}

/// Concatenated text of an element, entities already resolved.
fn text_content(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}
