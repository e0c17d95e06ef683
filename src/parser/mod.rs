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

//! Re-parses canonical assembly text into the symbolic step list.

use crate::errors::CompilerError;
use crate::instruction::{
    AssemblyStep, ExecuteStyle, HandleKind, Instruction, JumpCondition, PopKind, StorageKind,
};
use pest::Parser;
use pest::iterators::Pair;
use pest_derive::Parser;

// Derive the parser from our grammar file.
#[derive(Parser)]
#[grammar = "grammar.pest"]
pub struct AssemblyParser;

/// Parse a full assembly document into its steps.
pub fn parse_assembly(source: &str) -> Result<Vec<AssemblyStep>, CompilerError> {
    let pairs = AssemblyParser::parse(Rule::document, source)?;
    let mut steps = Vec::new();

    for step_pair in pairs.flatten().filter(|pair| pair.as_rule() == Rule::step) {
        let step_number = steps.len() + 1;
        let mut label = None;
        let mut instruction = None;

        for inner in step_pair.into_inner() {
            match inner.as_rule() {
                Rule::label_line => {
                    label = inner
                        .into_inner()
                        .next()
                        .map(|pair| pair.as_str().to_string());
                }
                Rule::instruction => {
                    let pair = inner
                        .into_inner()
                        .next()
                        .ok_or_else(|| CompilerError::InvalidOperation {
                            step: step_number,
                            text: "empty instruction".to_string(),
                        })?;
                    instruction = Some(build_instruction(pair, step_number)?);
                }
                _ => {}
            }
        }

        if let Some(instruction) = instruction {
            steps.push(AssemblyStep { label, instruction });
        }
    }

    Ok(steps)
}

// Helper to build an Instruction from a pest Pair.
fn build_instruction(pair: Pair<Rule>, step: usize) -> Result<Instruction, CompilerError> {
    let text = pair.as_str().to_string();
    match pair.as_rule() {
        Rule::skip => Ok(Instruction::Skip),
        Rule::jump => build_jump(pair),
        Rule::push_handler => Ok(Instruction::PushHandler {
            label: operand_text(pair),
        }),
        Rule::push_literal => {
            let quoted = operand_text(pair);
            Ok(Instruction::PushLiteral {
                literal: quoted[1..quoted.len() - 1].to_string(),
            })
        }
        Rule::push_constant => Ok(Instruction::PushConstant {
            constant: operand_text(pair),
        }),
        Rule::push_parameter => Ok(Instruction::PushParameter {
            parameter: operand_text(pair),
        }),
        Rule::pop_handler => Ok(Instruction::Pop {
            kind: PopKind::Handler,
        }),
        Rule::pop_component => Ok(Instruction::Pop {
            kind: PopKind::Component,
        }),
        Rule::load => {
            let (kind, symbol) = build_storage(pair, step, &text)?;
            Ok(Instruction::Load { kind, symbol })
        }
        Rule::store => {
            let (kind, symbol) = build_storage(pair, step, &text)?;
            Ok(Instruction::Store { kind, symbol })
        }
        Rule::invoke => build_invoke(pair, step, &text),
        Rule::execute => build_execute(pair),
        Rule::handle_exception => Ok(Instruction::Handle {
            kind: HandleKind::Exception,
        }),
        Rule::handle_result => Ok(Instruction::Handle {
            kind: HandleKind::Result,
        }),
        _ => Err(CompilerError::InvalidOperation { step, text }),
    }
}

// The first named inner pair of an instruction is its operand.
fn operand_text(pair: Pair<Rule>) -> String {
    pair.into_inner()
        .next()
        .map(|inner| inner.as_str().to_string())
        .unwrap_or_default()
}

fn build_jump(pair: Pair<Rule>) -> Result<Instruction, CompilerError> {
    let mut label = String::new();
    let mut condition = JumpCondition::Any;
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::label => label = inner.as_str().to_string(),
            Rule::on_none => condition = JumpCondition::OnNone,
            Rule::on_true => condition = JumpCondition::OnTrue,
            Rule::on_false => condition = JumpCondition::OnFalse,
            _ => {}
        }
    }
    Ok(Instruction::Jump { condition, label })
}

fn build_storage(
    pair: Pair<Rule>,
    step: usize,
    text: &str,
) -> Result<(StorageKind, String), CompilerError> {
    let mut kind = None;
    let mut symbol = String::new();
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::storage => {
                kind = match inner.as_str() {
                    "VARIABLE" => Some(StorageKind::Variable),
                    "MESSAGE" => Some(StorageKind::Message),
                    "DRAFT" => Some(StorageKind::Draft),
                    "DOCUMENT" => Some(StorageKind::Document),
                    _ => None,
                };
            }
            Rule::symbol => symbol = inner.as_str().to_string(),
            _ => {}
        }
    }
    let kind = kind.ok_or_else(|| CompilerError::InvalidOperation {
        step,
        text: text.to_string(),
    })?;
    Ok((kind, symbol))
}

fn build_invoke(pair: Pair<Rule>, step: usize, text: &str) -> Result<Instruction, CompilerError> {
    let mut intrinsic = String::new();
    let mut count: u8 = 0;
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::symbol => intrinsic = inner.as_str().to_string(),
            Rule::with_argument => count = 1,
            Rule::with_count => {
                let digits = operand_text(inner);
                count = digits
                    .parse()
                    .map_err(|_| CompilerError::InvalidOperation {
                        step,
                        text: text.to_string(),
                    })?;
            }
            _ => {}
        }
    }
    if count > 3 {
        return Err(CompilerError::InvalidOperation {
            step,
            text: text.to_string(),
        });
    }
    Ok(Instruction::Invoke { intrinsic, count })
}

fn build_execute(pair: Pair<Rule>) -> Result<Instruction, CompilerError> {
    let mut procedure = String::new();
    let mut style = ExecuteStyle::WithNothing;
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::symbol => procedure = inner.as_str().to_string(),
            Rule::with_arguments => style = ExecuteStyle::WithArguments,
            Rule::on_target => style = ExecuteStyle::OnTarget,
            Rule::on_target_with_arguments => style = ExecuteStyle::OnTargetWithArguments,
            _ => {}
        }
    }
    Ok(Instruction::Execute { procedure, style })
}

// ------------- unit tests -------------
