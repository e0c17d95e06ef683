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

//! Two-pass assembly of a canonical listing into bytecode words.

mod encoder;

use crate::context::{ProcedureContext, TypeContext};
use crate::errors::CompilerError;
use crate::parser;

/// Assemble the canonical listing held by a procedure context. Pass 1 binds
/// every label to its 1-based instruction address; pass 2 resolves operands
/// through the context tables and packs each step into a machine word. The
/// parsed step list and the word sequence are attached to the context.
pub fn assemble(
    context: &mut ProcedureContext,
    types: &mut TypeContext,
) -> Result<(), CompilerError> {
    let steps = parser::parse_assembly(&context.assembly)?;

    // Pass 1: bind labels. A compile-time address table is rebuilt and must
    // come out identical; labels consume no bytecode slot.
    context.addresses.clear();
    for (index, step) in steps.iter().enumerate() {
        if let Some(label) = &step.label {
            if context.addresses.address_of(label).is_some() {
                return Err(CompilerError::InvalidReference {
                    step: index + 1,
                    text: format!("the label {} is defined twice", label),
                });
            }
            context.addresses.insert(label.clone(), (index + 1) as u16);
        }
    }

    // Pass 2: encode each step.
    let mut bytecode = Vec::with_capacity(steps.len());
    for (index, step) in steps.iter().enumerate() {
        bytecode.push(encoder::encode_step(step, index + 1, context, types)?);
    }

    context.instructions = steps;
    context.bytecode = bytecode;
    Ok(())
}

// ------------- unit tests -------------
