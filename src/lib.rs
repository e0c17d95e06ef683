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

//! A compiler and assembler for Quill document-notation procedures.
//!
//! The pipeline has two halves. The compiler walks a procedure syntax tree
//! and emits a canonical assembly listing with symbolic labels, interning
//! literals, constants, parameters, variables and sub-procedures into the
//! context tables as it goes. The assembler re-parses the listing, resolves
//! labels to absolute addresses and packs each instruction into a 16 bit
//! machine word. The word sequence together with the tables forms a
//! self-describing executable image for the Quill virtual processor.

pub mod assembler;
pub mod ast;
pub mod compiler;
pub mod context;
pub mod errors;
pub mod formatter;
pub mod instruction;
pub mod intrinsics;
pub mod parser;
pub mod value;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::context::{ProcedureContext, TypeContext};

extern crate pest;
extern crate pest_derive;

/// Compile a procedure syntax tree into a procedure context carrying the
/// canonical assembly listing and the populated symbol tables.
pub fn compile(
    procedure: &ast::Procedure,
    parameters: &[&str],
    types: &mut TypeContext,
) -> Result<ProcedureContext> {
    compiler::compile(procedure, parameters, types).context("Failed during the compilation stage")
}

/// Assemble the canonical listing held by a procedure context into bytecode
/// words attached to the same context.
pub fn assemble(context: &mut ProcedureContext, types: &mut TypeContext) -> Result<()> {
    assembler::assemble(context, types).context("Failed during the assembly stage")
}

/// Assemble a canonical listing from disk and write the big-endian word
/// image next to it. The listing is assembled against a fresh pair of
/// contexts, so parameter references must already be interned by a compile
/// step and will otherwise surface as invalid references.
pub fn assemble_file(
    input_path: &Path,
    output_path: &Path,
) -> Result<(ProcedureContext, TypeContext)> {
    let source = fs::read_to_string(input_path)
        .with_context(|| format!("Failed to read input file: {}", input_path.display()))?;

    let mut context = ProcedureContext::new();
    let mut types = TypeContext::new();
    context.assembly = source;
    assembler::assemble(&mut context, &mut types).context("Failed during the assembly stage")?;

    let image = instruction::to_bytes(&context.bytecode);
    fs::write(output_path, image)
        .with_context(|| format!("Failed to write output file: {}", output_path.display()))?;

    Ok((context, types))
}
