use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Technology mention detection and stack analysis for free-form text
#[derive(Parser, Debug)]
#[command(
    name = "stacklens",
    about = "Technology mention detection and stack analysis for free-form text",
    version,
    author,
    long_about = "stacklens finds mentions of known languages, frameworks, databases and tools \
                  in free-form text, scores each match and reports how complete the described \
                  stack is. The technology registry can be inspected, extended from a remote \
                  awesome list, and is saved between runs."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(
        short = 'v',
        long,
        global = true,
        help = "Increase verbosity (can be used multiple times)"
    )]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Identify technologies mentioned in text",
        long_about = "Scans text for known technologies, scores each match and reports stack \
                      completeness and suggestions. Text is read from the argument, from \
                      --file, or from stdin when neither is given.\n\n\
                      Examples:\n  \
                      stacklens analyze \"React frontend with a Django API on PostgreSQL\"\n  \
                      stacklens analyze --file README.md --format json\n  \
                      stacklens analyze --type framework --category backend \"flask or express?\"\n  \
                      cat notes.txt | stacklens analyze"
    )]
    Analyze(AnalyzeArgs),

    #[command(
        about = "Show a registered technology",
        long_about = "Looks up a technology by name or known variation.\n\n\
                      Examples:\n  \
                      stacklens info postgres\n  \
                      stacklens info react --alternatives"
    )]
    Info(InfoArgs),

    #[command(
        about = "List registered technologies",
        long_about = "Lists the technology registry, optionally filtered.\n\n\
                      Examples:\n  \
                      stacklens list\n  \
                      stacklens list --type database\n  \
                      stacklens list --category frontend --format yaml\n  \
                      stacklens list --min-stars 100000"
    )]
    List(ListArgs),

    #[command(
        about = "Search technologies by name or description",
        long_about = "Case-insensitive substring search over registered names and \
                      descriptions.\n\n\
                      Examples:\n  \
                      stacklens search css\n  \
                      stacklens search \"key-value\" --format json"
    )]
    Search(SearchArgs),

    #[command(
        about = "Suggest a stack for a project type",
        long_about = "Groups registered technologies suited to a project type by category, \
                      ranking ones the team already knows first.\n\n\
                      Examples:\n  \
                      stacklens suggest web\n  \
                      stacklens suggest api --expertise python --expertise postgres\n  \
                      stacklens suggest web --exclude-tag legacy\n  \
                      stacklens suggest web --scale large"
    )]
    Suggest(SuggestArgs),

    #[command(
        about = "Add technologies from a remote awesome list",
        long_about = "Fetches the Markdown list at STACKLENS_ENRICHMENT_URL and registers \
                      entries not known yet. A failed fetch leaves the registry unchanged.\n\n\
                      Examples:\n  \
                      STACKLENS_ENRICHMENT_URL=https://raw.githubusercontent.com/troxler/awesome-css-frameworks/master/readme.md \\\n    \
                      stacklens refresh --type library --category frontend"
    )]
    Refresh(RefreshArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct AnalyzeArgs {
    #[arg(value_name = "TEXT", help = "Text to analyze (reads stdin when omitted)")]
    pub text: Option<String>,

    #[arg(
        long,
        value_name = "FILE",
        conflicts_with = "text",
        help = "Read text to analyze from a file"
    )]
    pub file: Option<PathBuf>,

    #[arg(long, value_name = "CONTEXT", default_value = "", help = "Free-form context echoed in the result")]
    pub context: String,

    #[arg(
        short = 't',
        long = "type",
        value_name = "TYPE",
        help = "Only report technologies of this type (repeatable)"
    )]
    pub tech_types: Vec<String>,

    #[arg(
        short = 'c',
        long = "category",
        value_name = "CATEGORY",
        help = "Only report technologies in this category (repeatable)"
    )]
    pub categories: Vec<String>,

    #[arg(long, help = "Disable result caching")]
    pub no_cache: bool,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct InfoArgs {
    #[arg(value_name = "NAME", help = "Technology name or variation")]
    pub name: String,

    #[arg(long, help = "Also list alternatives of the same type and category")]
    pub alternatives: bool,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct ListArgs {
    #[arg(short = 't', long = "type", value_name = "TYPE", help = "Filter by technology type")]
    pub tech_type: Option<String>,

    #[arg(short = 'c', long, value_name = "CATEGORY", help = "Filter by category")]
    pub category: Option<String>,

    #[arg(long, value_name = "STARS", help = "Only technologies with at least this many stars")]
    pub min_stars: Option<u64>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct SearchArgs {
    #[arg(value_name = "QUERY", help = "Text to look for in names and descriptions")]
    pub query: String,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct SuggestArgs {
    #[arg(value_name = "PROJECT_TYPE", help = "Project type, e.g. web, api or mobile")]
    pub project_type: String,

    #[arg(
        short = 's',
        long,
        value_enum,
        default_value = "small",
        help = "Expected project scale; large keeps only scalable technologies"
    )]
    pub scale: ScaleArg,

    #[arg(short = 'e', long, value_name = "NAME", help = "Technology the team knows (repeatable)")]
    pub expertise: Vec<String>,

    #[arg(long = "exclude-tag", value_name = "TAG", help = "Skip technologies with this tag (repeatable)")]
    pub exclude_tags: Vec<String>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct RefreshArgs {
    #[arg(
        short = 't',
        long = "type",
        value_name = "TYPE",
        default_value = "library",
        help = "Type given to fetched technologies"
    )]
    pub tech_type: String,

    #[arg(
        short = 'c',
        long,
        value_name = "CATEGORY",
        default_value = "frontend",
        help = "Category given to fetched technologies"
    )]
    pub category: String,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleArg {
    Small,
    Medium,
    Large,
}

impl From<ScaleArg> for crate::analysis::Scale {
    fn from(arg: ScaleArg) -> Self {
        match arg {
            ScaleArg::Small => crate::analysis::Scale::Small,
            ScaleArg::Medium => crate::analysis::Scale::Medium,
            ScaleArg::Large => crate::analysis::Scale::Large,
        }
    }
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}
