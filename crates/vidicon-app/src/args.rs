// ABOUTME: Command-line arguments for the vidicon binary.
// ABOUTME: Declares the clap parser and the trail option table shown in --help.

use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;
use vidicon_core::{StreamGeometry, OPTIONS};

#[derive(Parser, Debug, Default, PartialEq)]
#[command(
    version,
    about = "Vidicon light trails for raw RGB24 video",
    after_help = option_table()
)]
pub struct Args {
    /// Config file (defaults to vidicon/config.toml in the platform config dir)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Frame size as WIDTHxHEIGHT, overriding [stream] in the config
    #[arg(short, long, value_parser = StreamGeometry::from_str)]
    pub size: Option<StreamGeometry>,

    /// Trail options as key=value pairs separated by ':', applied over [trail]
    #[arg(short, long)]
    pub options: Option<String>,

    /// Use the plain trail law without burn-in
    #[arg(long)]
    pub no_burn: bool,

    /// Raw RGB24 input, stdin when absent or `-`
    pub input: Option<PathBuf>,

    /// Raw RGB24 output, stdout when absent or `-`
    pub output: Option<PathBuf>,
}

/// Every trail option with its help text and accepted range
pub fn option_table() -> String {
    let mut text = String::from("Trail options (e.g. --options fade=0.9:burn=0.5):\n");
    for spec in OPTIONS {
        let range = spec.parameter.range();
        text.push_str(&format!(
            "  {:<8} {:<32} [{}, {}]\n",
            spec.name,
            spec.help,
            range.start(),
            range.end()
        ));
    }
    text
}
