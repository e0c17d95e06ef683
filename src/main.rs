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

use anyhow::Result;
use clap::Parser as clap_parser;
use quillc::assemble_file;
use std::fs;
use std::path::PathBuf;

#[derive(clap_parser)]
#[clap(version = "0.1.0")]
struct Opts {
    /// A canonical assembly listing (.qasm)
    #[clap(short, long)]
    input: PathBuf,
    /// The bytecode image to write (.qcode), big endian, two bytes per word
    #[clap(short, long)]
    output: PathBuf,
    /// Also write the assembled contexts as JSON
    #[clap(short, long)]
    context: Option<PathBuf>,
}

fn main() -> Result<()> {
    let opts: Opts = Opts::parse();

    let (procedure, types) = assemble_file(&opts.input, &opts.output)?;

    if let Some(context_path) = &opts.context {
        let image = serde_json::json!({
            "procedure": procedure,
            "type": types,
        });
        fs::write(context_path, serde_json::to_string_pretty(&image)?)?;
    }

    println!(
        "Successfully assembled {} to {}",
        opts.input.display(),
        opts.output.display()
    );

    Ok(())
}
