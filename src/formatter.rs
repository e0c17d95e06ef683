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

//! Pretty-prints symbolic instructions as canonical assembly text.

use crate::instruction::{
    AssemblyStep, ExecuteStyle, HandleKind, Instruction, JumpCondition, PopKind,
};

/// Format a step list as a canonical assembly document. Each line is
/// prefixed by `indentation * 4` spaces; labels occupy their own line and
/// every label except the first is preceded by a blank line.
pub fn format_steps(steps: &[AssemblyStep], indentation: usize) -> String {
    let margin = "    ".repeat(indentation);
    let mut text = String::new();
    for step in steps {
        if let Some(label) = &step.label {
            if !text.is_empty() {
                text.push('\n');
            }
            text.push_str(&margin);
            text.push_str(label);
            text.push_str(":\n");
        }
        text.push_str(&margin);
        text.push_str(&format_instruction(&step.instruction));
        text.push('\n');
    }
    text
}

/// Format a single instruction. Modifiers equal to the zero default are
/// omitted.
pub fn format_instruction(instruction: &Instruction) -> String {
    match instruction {
        Instruction::Skip => "SKIP INSTRUCTION".to_string(),
        Instruction::Jump { condition, label } => match condition {
            JumpCondition::Any => format!("JUMP TO {}", label),
            JumpCondition::OnNone => format!("JUMP TO {} ON NONE", label),
            JumpCondition::OnTrue => format!("JUMP TO {} ON TRUE", label),
            JumpCondition::OnFalse => format!("JUMP TO {} ON FALSE", label),
        },
        Instruction::PushHandler { label } => format!("PUSH HANDLER {}", label),
        Instruction::PushLiteral { literal } => format!("PUSH LITERAL `{}`", literal),
        Instruction::PushConstant { constant } => format!("PUSH CONSTANT {}", constant),
        Instruction::PushParameter { parameter } => format!("PUSH PARAMETER {}", parameter),
        Instruction::Pop { kind } => match kind {
            PopKind::Handler => "POP HANDLER".to_string(),
            PopKind::Component => "POP COMPONENT".to_string(),
        },
        Instruction::Load { kind, symbol } => format!("LOAD {} {}", kind.keyword(), symbol),
        Instruction::Store { kind, symbol } => format!("STORE {} {}", kind.keyword(), symbol),
        Instruction::Invoke { intrinsic, count } => match count {
            0 => format!("INVOKE {}", intrinsic),
            1 => format!("INVOKE {} WITH ARGUMENT", intrinsic),
            _ => format!("INVOKE {} WITH {} ARGUMENTS", intrinsic, count),
        },
        Instruction::Execute { procedure, style } => match style {
            ExecuteStyle::WithNothing => format!("EXECUTE {}", procedure),
            ExecuteStyle::WithArguments => format!("EXECUTE {} WITH ARGUMENTS", procedure),
            ExecuteStyle::OnTarget => format!("EXECUTE {} ON TARGET", procedure),
            ExecuteStyle::OnTargetWithArguments => {
                format!("EXECUTE {} ON TARGET WITH ARGUMENTS", procedure)
            }
        },
        Instruction::Handle { kind } => match kind {
            HandleKind::Exception => "HANDLE EXCEPTION".to_string(),
            HandleKind::Result => "HANDLE RESULT".to_string(),
        },
    }
}

// ------------- unit tests -------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::StorageKind;

    fn step(label: Option<&str>, instruction: Instruction) -> AssemblyStep {
        AssemblyStep {
            label: label.map(str::to_string),
            instruction,
        }
    }

    #[test]
    fn test_zero_modifiers_are_omitted() {
        assert_eq!(
            format_instruction(&Instruction::Jump {
                condition: JumpCondition::Any,
                label: "1.IfStatementDone".to_string(),
            }),
            "JUMP TO 1.IfStatementDone"
        );
        assert_eq!(
            format_instruction(&Instruction::Execute {
                procedure: "$validate".to_string(),
                style: ExecuteStyle::WithNothing,
            }),
            "EXECUTE $validate"
        );
        assert_eq!(
            format_instruction(&Instruction::Invoke {
                intrinsic: "$random".to_string(),
                count: 0,
            }),
            "INVOKE $random"
        );
    }

    #[test]
    fn test_argument_count_spelling() {
        assert_eq!(
            format_instruction(&Instruction::Invoke {
                intrinsic: "$factorial".to_string(),
                count: 1,
            }),
            "INVOKE $factorial WITH ARGUMENT"
        );
        assert_eq!(
            format_instruction(&Instruction::Invoke {
                intrinsic: "$range".to_string(),
                count: 3,
            }),
            "INVOKE $range WITH 3 ARGUMENTS"
        );
    }

    #[test]
    fn test_labels_get_their_own_line_with_a_separating_blank() {
        let steps = vec![
            step(
                Some("1.ReturnStatement"),
                Instruction::PushLiteral {
                    literal: "true".to_string(),
                },
            ),
            step(None, Instruction::Handle {
                kind: HandleKind::Result,
            }),
            step(
                Some("2.EvaluateStatement"),
                Instruction::Load {
                    kind: StorageKind::Variable,
                    symbol: "$$result".to_string(),
                },
            ),
        ];
        let text = format_steps(&steps, 0);
        assert_eq!(
            text,
            "1.ReturnStatement:\nPUSH LITERAL `true`\nHANDLE RESULT\n\n2.EvaluateStatement:\nLOAD VARIABLE $$result\n"
        );
    }

    #[test]
    fn test_indentation_is_four_spaces_per_level() {
        let steps = vec![step(None, Instruction::Skip)];
        assert_eq!(format_steps(&steps, 2), "        SKIP INSTRUCTION\n");
    }
}
