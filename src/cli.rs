// Command-line interface definition

use clap::Parser;

use crate::parallel::DEFAULT_NUM_WORKERS;

/// Colour handling for diagnostics on stderr
#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "reqtrace")]
#[command(about = "Correlate application logs by request id and report failed requests")]
#[command(
    long_about = "Correlate application logs by request id and report failed requests\n\nEvery file ending in .log under the input directory is parsed with the line grammar\n\n  <timestamp> [<level>] <service>: <message>, request_id=<id>, user_id=<id>\n\nRequests with an ERROR or WARN entry are reported with their first failure and full\ntimeline.\n\nCOMMON EXAMPLES:\n  reqtrace -i /var/log/app\n  reqtrace -i logs -o - --compact\n  reqtrace -i logs -j 16 -s"
)]
#[command(version)]
#[command(args_override_self = true)]
pub struct Cli {
    /// Directory scanned recursively for *.log files
    #[arg(
        short = 'i',
        long = "input-dir",
        value_name = "DIR",
        default_value = ".",
        help_heading = "Input Options"
    )]
    pub input_dir: String,

    /// Report destination; "-" writes to stdout
    #[arg(
        short = 'o',
        long = "output-file",
        value_name = "FILE",
        default_value = "results.json",
        help_heading = "Output Options"
    )]
    pub output_file: String,

    /// Write the report as a single line of JSON
    #[arg(long = "compact", help_heading = "Output Options")]
    pub compact: bool,

    /// Number of worker threads reading files
    #[arg(
        short = 'j',
        long = "threads",
        value_name = "N",
        default_value_t = DEFAULT_NUM_WORKERS,
        help_heading = "Performance Options"
    )]
    pub threads: usize,

    /// Print ingestion statistics to stderr when done
    #[arg(short = 's', long = "stats", help_heading = "Diagnostics")]
    pub stats: bool,

    /// More diagnostics (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, help_heading = "Diagnostics")]
    pub verbose: u8,

    /// Fewer diagnostics (-q errors only, -qq silent)
    #[arg(short = 'q', long = "quiet", action = clap::ArgAction::Count, help_heading = "Diagnostics")]
    pub quiet: u8,

    /// Colour diagnostics
    #[arg(
        long = "color",
        value_enum,
        default_value = "auto",
        help_heading = "Diagnostics"
    )]
    pub color: ColorMode,

    /// Specify custom configuration file path
    #[arg(long = "config-file", help_heading = "Configuration Options")]
    pub config_file: Option<String>,

    /// Ignore configuration file
    #[arg(long = "ignore-config", help_heading = "Configuration Options")]
    pub ignore_config: bool,

    /// Show configuration file and exit
    #[arg(long = "show-config", help_heading = "Configuration Options")]
    pub show_config: bool,
}
