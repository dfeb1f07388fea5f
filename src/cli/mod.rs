pub mod commands;
pub mod output;

pub use commands::{
    AnalyzeArgs, CliArgs, Commands, InfoArgs, ListArgs, OutputFormatArg, RefreshArgs, ScaleArg,
    SearchArgs, SuggestArgs,
};
pub use output::{OutputFormat, OutputFormatter, TechnologyInfo};
