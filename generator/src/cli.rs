use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser)]
#[clap(version, about)]
pub struct Cli {
    #[clap(value_parser, help = "The schema file to generate code for")]
    pub schema: Option<PathBuf>,

    #[clap(value_parser, help = "The Rust source file to write")]
    pub output: Option<PathBuf>,

    #[clap(value_parser, help = "Dot-separated module path of the generated items")]
    pub namespace: Option<String>,

    #[clap(
        value_parser,
        help = "Path of the runtime crate the generated code uses [default: ::xsdgen_runtime]"
    )]
    pub common_namespace: Option<String>,

    #[clap(long, help = "Allow a XML Document Type Definition (DTD) to occur")]
    pub allow_dtd: bool,

    #[clap(short, long, action = ArgAction::Count, help = "Log more, repeat for even more")]
    pub verbose: u8,
}

impl Cli {
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
