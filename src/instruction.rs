/*
Copyright 2025 Connor Nolan

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

//! The symbolic instruction model and its packing into machine words.
//!
//! Each instruction packs into one 16 bit word:
//!
//! ```text
//!  15      13 12  11 10          0
//! +----------+------+-------------+
//! | operation | mod  |   operand   |
//! +----------+------+-------------+
//!     3 bits   2 bits    11 bits
//! ```
//!
//! Every modifier space has at most four members, so two bits suffice.
//! Operand indices and instruction addresses are 1-based; `SKIP INSTRUCTION`
//! is the degenerate jump word `0x0000` (no real jump targets address zero).

use serde::{Deserialize, Serialize};

/// Operation codes (3 bits).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    Jump = 0,
    Push = 1,
    Pop = 2,
    Load = 3,
    Store = 4,
    Invoke = 5,
    Execute = 6,
    Handle = 7,
}

/// JUMP modifiers. `Any` is the zero default and is omitted from the
/// canonical text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JumpCondition {
    Any = 0,
    OnNone = 1,
    OnTrue = 2,
    OnFalse = 3,
}

/// PUSH modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PushKind {
    Handler = 0,
    Literal = 1,
    Constant = 2,
    Parameter = 3,
}

/// POP modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PopKind {
    Handler = 0,
    Component = 1,
}

/// LOAD and STORE modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageKind {
    Variable = 0,
    Message = 1,
    Draft = 2,
    Document = 3,
}

impl StorageKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            StorageKind::Variable => "VARIABLE",
            StorageKind::Message => "MESSAGE",
            StorageKind::Draft => "DRAFT",
            StorageKind::Document => "DOCUMENT",
        }
    }
}

/// EXECUTE modifiers. `WithNothing` is the zero default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecuteStyle {
    WithNothing = 0,
    WithArguments = 1,
    OnTarget = 2,
    OnTargetWithArguments = 3,
}

/// HANDLE modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandleKind {
    Exception = 0,
    Result = 1,
}

/// A single symbolic instruction. Operands are still symbolic (label text,
/// literal text, `$`-prefixed symbols); the assembler resolves them to table
/// indices when packing words.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Instruction {
    Skip,
    Jump {
        condition: JumpCondition,
        label: String,
    },
    PushHandler {
        label: String,
    },
    PushLiteral {
        literal: String,
    },
    PushConstant {
        constant: String,
    },
    PushParameter {
        parameter: String,
    },
    Pop {
        kind: PopKind,
    },
    Load {
        kind: StorageKind,
        symbol: String,
    },
    Store {
        kind: StorageKind,
        symbol: String,
    },
    Invoke {
        intrinsic: String,
        count: u8,
    },
    Execute {
        procedure: String,
        style: ExecuteStyle,
    },
    Handle {
        kind: HandleKind,
    },
}

/// One step of an assembly listing: an instruction with an optional label
/// bound to its address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssemblyStep {
    pub label: Option<String>,
    pub instruction: Instruction,
}

/// The widest operand index or address a word can carry (11 bits).
pub const OPERAND_LIMIT: u16 = 0x07FF;

/// Pack an operation, modifier and operand into a machine word.
pub fn word(operation: Operation, modifier: u16, operand: u16) -> u16 {
    ((operation as u16) << 13) | ((modifier & 0x0003) << 11) | (operand & OPERAND_LIMIT)
}

/// Extract the operation code from a machine word.
pub fn operation(word: u16) -> u16 {
    word >> 13
}

/// Extract the modifier from a machine word.
pub fn modifier(word: u16) -> u16 {
    (word >> 11) & 0x0003
}

/// Extract the operand field from a machine word.
pub fn operand(word: u16) -> u16 {
    word & OPERAND_LIMIT
}

/// Serialize a word sequence as bytes, most significant byte first.
pub fn to_bytes(words: &[u16]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(words.len() * 2);
    for word in words {
        bytes.extend_from_slice(&word.to_be_bytes());
    }
    bytes
}

// ------------- unit tests -------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_packing() {
        let packed = word(Operation::Invoke, 2, 42);
        assert_eq!(operation(packed), Operation::Invoke as u16);
        assert_eq!(modifier(packed), 2);
        assert_eq!(operand(packed), 42);
    }

    #[test]
    fn test_operand_is_masked_to_eleven_bits() {
        let packed = word(Operation::Jump, 0, OPERAND_LIMIT);
        assert_eq!(operand(packed), OPERAND_LIMIT);
        assert_eq!(operation(packed), Operation::Jump as u16);
    }

    #[test]
    fn test_skip_is_the_zero_word() {
        assert_eq!(word(Operation::Jump, JumpCondition::Any as u16, 0), 0x0000);
    }

    #[test]
    fn test_big_endian_image() {
        let image = to_bytes(&[0x1234, 0xABCD]);
        assert_eq!(image, vec![0x12, 0x34, 0xAB, 0xCD]);
    }
}
