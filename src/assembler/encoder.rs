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

//! Packs one resolved step into a machine word.

use crate::context::{ProcedureContext, TypeContext};
use crate::errors::CompilerError;
use crate::instruction::{
    AssemblyStep, Instruction, OPERAND_LIMIT, Operation, PushKind, word,
};
use crate::intrinsics;
use crate::value::Value;

/// Encode one step, resolving its operand through the context tables.
pub fn encode_step(
    step: &AssemblyStep,
    number: usize,
    context: &mut ProcedureContext,
    types: &mut TypeContext,
) -> Result<u16, CompilerError> {
    match &step.instruction {
        Instruction::Skip => Ok(0x0000),
        Instruction::Jump { condition, label } => {
            let address = resolve_label(context, label, number)?;
            Ok(word(Operation::Jump, *condition as u16, address))
        }
        Instruction::PushHandler { label } => {
            let address = resolve_label(context, label, number)?;
            Ok(word(Operation::Push, PushKind::Handler as u16, address))
        }
        Instruction::PushLiteral { literal } => {
            let index = types.literals.intern(Value::parse(literal));
            let index = check_operand(index, number, literal)?;
            Ok(word(Operation::Push, PushKind::Literal as u16, index))
        }
        Instruction::PushConstant { constant } => {
            let index =
                types
                    .constant_index(constant)
                    .ok_or_else(|| CompilerError::InvalidReference {
                        step: number,
                        text: format!("the constant {} is not defined", constant),
                    })?;
            Ok(word(Operation::Push, PushKind::Constant as u16, index))
        }
        Instruction::PushParameter { parameter } => {
            let index = context.parameters.index_of(parameter).ok_or_else(|| {
                CompilerError::InvalidReference {
                    step: number,
                    text: format!("the parameter {} is not defined", parameter),
                }
            })?;
            Ok(word(Operation::Push, PushKind::Parameter as u16, index))
        }
        Instruction::Pop { kind } => Ok(word(Operation::Pop, *kind as u16, 0)),
        Instruction::Load { kind, symbol } => {
            let index = context.variables.intern(symbol.clone());
            let index = check_operand(index, number, symbol)?;
            Ok(word(Operation::Load, *kind as u16, index))
        }
        Instruction::Store { kind, symbol } => {
            let index = context.variables.intern(symbol.clone());
            let index = check_operand(index, number, symbol)?;
            Ok(word(Operation::Store, *kind as u16, index))
        }
        Instruction::Invoke { intrinsic, count } => {
            let index =
                intrinsics::index_of(intrinsic).ok_or_else(|| CompilerError::InvalidReference {
                    step: number,
                    text: format!("the intrinsic {} is not defined", intrinsic),
                })?;
            Ok(word(Operation::Invoke, *count as u16, index))
        }
        Instruction::Execute { procedure, style } => {
            let index = context.procedures.intern(procedure.clone());
            let index = check_operand(index, number, procedure)?;
            Ok(word(Operation::Execute, *style as u16, index))
        }
        Instruction::Handle { kind } => Ok(word(Operation::Handle, *kind as u16, 0)),
    }
}

fn resolve_label(
    context: &ProcedureContext,
    label: &str,
    number: usize,
) -> Result<u16, CompilerError> {
    let address =
        context
            .addresses
            .address_of(label)
            .ok_or_else(|| CompilerError::InvalidReference {
                step: number,
                text: format!("the label {} is not defined", label),
            })?;
    check_operand(address, number, label)
}

// Operand indices must fit the 11 bit field.
fn check_operand(index: u16, number: usize, text: &str) -> Result<u16, CompilerError> {
    if index > OPERAND_LIMIT {
        return Err(CompilerError::InvalidReference {
            step: number,
            text: format!("the index of {} exceeds the 11 bit operand field", text),
        });
    }
    Ok(index)
}
