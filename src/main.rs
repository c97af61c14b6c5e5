//! Stencil CLI
//!
//! Usage:
//!   stencil [OPTIONS] [FILE]
//!
//! Options:
//!   -m, --manifest <FILE>  TOML manifest of named templates
//!   -d, --data <FILE>      JSON data context file
//!   -n, --name <NAME>      Render a named manifest template
//!   -g, --grammar          Show directive grammar reference
//!   -h, --help             Print help

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

use clap::Parser;
use serde_json::Value;

use stencil::{directive, Manifest, Template, TemplateRegistry};

#[derive(Parser)]
#[command(name = "stencil")]
#[command(about = "Recursive text-substitution templating engine")]
struct Cli {
    /// Input template file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// TOML manifest of named templates (paths relative to the manifest)
    #[arg(short, long)]
    manifest: Option<PathBuf>,

    /// JSON data context file (defaults to null)
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Render this named template from the manifest instead of FILE/stdin
    #[arg(short, long)]
    name: Option<String>,

    /// List the template names the input references, without rendering
    #[arg(long)]
    deps: bool,

    /// Debug mode: dump classified directives to stderr before rendering
    #[arg(long)]
    debug: bool,

    /// Show directive grammar reference
    #[arg(short, long)]
    grammar: bool,
}

fn main() {
    let cli = Cli::parse();

    if cli.grammar {
        print_grammar();
        return;
    }

    // If no input at all and stdin is a terminal (interactive), show intro help
    if cli.input.is_none() && cli.name.is_none() && io::stdin().is_terminal() {
        print_intro();
        return;
    }

    // Load the registry from the manifest, if any
    let registry = match &cli.manifest {
        Some(path) => {
            let base = path.parent().unwrap_or(Path::new(".")).to_path_buf();
            let manifest = match Manifest::from_file(path) {
                Ok(m) => m,
                Err(e) => {
                    eprintln!("Error loading manifest '{}': {}", path.display(), e);
                    std::process::exit(1);
                }
            };
            match manifest.into_registry(&base) {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("Error loading manifest '{}': {}", path.display(), e);
                    std::process::exit(1);
                }
            }
        }
        None => TemplateRegistry::new(),
    };

    // Load the data context
    let data: Value = match &cli.data {
        Some(path) => {
            let content = match fs::read_to_string(path) {
                Ok(content) => content,
                Err(e) => {
                    eprintln!("Error reading data file '{}': {}", path.display(), e);
                    std::process::exit(1);
                }
            };
            match serde_json::from_str(&content) {
                Ok(value) => value,
                Err(e) => {
                    eprintln!("Error parsing data file '{}': {}", path.display(), e);
                    std::process::exit(1);
                }
            }
        }
        None => Value::Null,
    };

    // Named template from the manifest: no separate input source
    if let Some(name) = &cli.name {
        match registry.render(name, &data) {
            Ok(out) => println!("{}", out),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    // Read the top-level template source
    let (source, filename) = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => (content, path.display().to_string()),
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => (buffer, "<stdin>".to_string()),
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    if cli.deps {
        for name in directive::referenced_templates(&source) {
            println!("{}", name);
        }
        return;
    }

    if cli.debug {
        eprintln!("=== Directives ===");
        for m in directive::scan(&source) {
            eprintln!("{:?} {:?}", m.span, m.directive);
        }
        eprintln!("==================");
    }

    let template = Template::new(filename.clone(), source.clone());
    match template.render(&data, &registry) {
        Ok(out) => println!("{}", out),
        Err(e) => {
            eprintln!("{}", e.format(&source, &filename));
            std::process::exit(1);
        }
    }
}

fn print_intro() {
    println!(
        r#"Stencil - Recursive text-substitution templating engine

USAGE:
    stencil [OPTIONS] [FILE]
    echo '<template>' | stencil -d data.json

OPTIONS:
    -m, --manifest  TOML manifest of named templates
    -d, --data      JSON data context file
    -n, --name      Render a named manifest template
    --deps          List referenced template names without rendering
    --debug         Dump classified directives to stderr
    -g, --grammar   Show directive grammar reference
    -h, --help      Print help

QUICK START:
    echo 'Hello, #{{name}}!' | stencil -d data.json

With data.json containing {{"name": "World"}}, this prints "Hello, World!".
Run --grammar for the directive reference."#
    );
}

fn print_grammar() {
    println!(
        r#"STENCIL DIRECTIVE GRAMMAR
=========================

VARIABLES
---------
#{{key}}                      Interpolate the context value at key.
                             Keys are word characters, hyphens, dots.
                             Missing keys render as empty string.

INCLUDE
-------
#{{include name}}             Splice the named template, rendered with
                             the same context as the including template.

RENDER
------
#{{render name}}              Render the named template with the current
                             context.
#{{render name with key}}     Render with the sub-value at key as context.
                             A sequence renders once per element.

RENDER FOREACH
--------------
#{{render name foreach}}      Render once per element/entry of the context.
#{{render name foreach key}}  Render once per element/entry of the
                             sub-value at key.

LOOP PLACEHOLDERS
-----------------
Inside one iteration's output only:
    #{{@loop.index}}          0-based index (sequences) or entry key
                             (mappings)
    #{{@loop.iteration}}      "even" / "odd", starting even

NOTES
-----
Template names may contain '/', '-', '.', '_' (e.g. blog/post/comments).
Whitespace inside tags is insignificant. Tags that match no directive
form pass through to the output unchanged."#
    );
}
