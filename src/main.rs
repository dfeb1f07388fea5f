use stacklens::cli::commands::{
    AnalyzeArgs, CliArgs, Commands, InfoArgs, ListArgs, RefreshArgs, SearchArgs, SuggestArgs,
};
use stacklens::cli::output::{OutputFormat, OutputFormatter, TechnologyInfo};
use stacklens::{
    init_logging, AnalysisRequest, AwesomeListEnricher, Category, LoggingConfig,
    StackRequirements, StacklensConfig, TechAnalyzer, TechType, TechnologyFilter, NAME, VERSION,
};

use clap::Parser;
use std::fs;
use std::process;
use tokio::io::AsyncReadExt;
use tracing::{debug, error, info};

const EXIT_FAILURE: i32 = 1;
const EXIT_USAGE: i32 = 2;

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    init_logging(LoggingConfig::for_cli(
        args.log_level.as_deref(),
        args.verbose,
        args.quiet,
    ));

    debug!("{} v{} starting", NAME, VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Analyze(analyze_args) => handle_analyze(analyze_args).await,
        Commands::Info(info_args) => handle_info(info_args).await,
        Commands::List(list_args) => handle_list(list_args).await,
        Commands::Search(search_args) => handle_search(search_args).await,
        Commands::Suggest(suggest_args) => handle_suggest(suggest_args).await,
        Commands::Refresh(refresh_args) => handle_refresh(refresh_args).await,
    };

    process::exit(exit_code);
}

/// Loads and validates configuration from the environment.
fn load_config() -> Result<StacklensConfig, i32> {
    let config = StacklensConfig::from_env().map_err(|e| {
        error!("Configuration error: {}", e);
        eprintln!("\nPlease check your STACKLENS_* environment variables.");
        EXIT_USAGE
    })?;

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        eprintln!("\nPlease check your STACKLENS_* environment variables.");
        return Err(EXIT_USAGE);
    }

    debug!("Configuration: {}", config);
    Ok(config)
}

async fn open_analyzer() -> Result<TechAnalyzer, i32> {
    let config = load_config()?;
    Ok(TechAnalyzer::from_config(config).await)
}

fn emit(rendered: anyhow::Result<String>, success: bool) -> i32 {
    match rendered {
        Ok(output) => {
            print!("{}", output);
            if success {
                0
            } else {
                EXIT_FAILURE
            }
        }
        Err(e) => {
            error!("Failed to format output: {:#}", e);
            EXIT_FAILURE
        }
    }
}

async fn read_input(args: &AnalyzeArgs) -> Result<String, i32> {
    if let Some(ref text) = args.text {
        return Ok(text.clone());
    }

    if let Some(ref path) = args.file {
        debug!("Reading input from {}", path.display());
        return fs::read_to_string(path).map_err(|e| {
            error!("Failed to read {}: {}", path.display(), e);
            EXIT_USAGE
        });
    }

    debug!("Reading input from stdin");
    let mut text = String::new();
    tokio::io::stdin()
        .read_to_string(&mut text)
        .await
        .map_err(|e| {
            error!("Failed to read stdin: {}", e);
            EXIT_USAGE
        })?;
    Ok(text)
}

async fn handle_analyze(args: &AnalyzeArgs) -> i32 {
    let analyzer = match open_analyzer().await {
        Ok(analyzer) => analyzer,
        Err(code) => return code,
    };
    let text = match read_input(args).await {
        Ok(text) => text,
        Err(code) => return code,
    };

    let mut request = AnalysisRequest::new(text)
        .with_context(args.context.clone())
        .with_tech_types(&args.tech_types)
        .with_categories(&args.categories);
    if args.no_cache {
        debug!("Caching disabled");
        request = request.without_cache();
    }

    info!("Analyzing {} bytes of text", request.text.len());
    let result = analyzer.analyze(&request);

    let formatter = OutputFormatter::new(OutputFormat::from(args.format));
    emit(formatter.format_analysis(&result), result.success)
}

async fn handle_info(args: &InfoArgs) -> i32 {
    let analyzer = match open_analyzer().await {
        Ok(analyzer) => analyzer,
        Err(code) => return code,
    };

    let alternatives = if args.alternatives {
        analyzer.alternatives(&args.name).data
    } else {
        None
    };
    let result = analyzer
        .get_technology(&args.name)
        .map_data(|technology| TechnologyInfo {
            technology,
            alternatives,
        });

    let formatter = OutputFormatter::new(OutputFormat::from(args.format));
    emit(formatter.format_info(&result), result.success)
}

async fn handle_list(args: &ListArgs) -> i32 {
    let tech_type = match args.tech_type.as_deref().map(parse_tech_type).transpose() {
        Ok(t) => t,
        Err(code) => return code,
    };
    let category = match args.category.as_deref().map(parse_category).transpose() {
        Ok(c) => c,
        Err(code) => return code,
    };

    let analyzer = match open_analyzer().await {
        Ok(analyzer) => analyzer,
        Err(code) => return code,
    };

    let records = analyzer.list_technologies(&TechnologyFilter {
        tech_type,
        category,
        min_stars: args.min_stars,
    });

    let formatter = OutputFormatter::new(OutputFormat::from(args.format));
    emit(formatter.format_list(&records), true)
}

async fn handle_search(args: &SearchArgs) -> i32 {
    let analyzer = match open_analyzer().await {
        Ok(analyzer) => analyzer,
        Err(code) => return code,
    };

    let result = analyzer.search(&args.query);

    let formatter = OutputFormatter::new(OutputFormat::from(args.format));
    emit(formatter.format_search(&args.query, &result), result.success)
}

async fn handle_suggest(args: &SuggestArgs) -> i32 {
    let analyzer = match open_analyzer().await {
        Ok(analyzer) => analyzer,
        Err(code) => return code,
    };

    let requirements = StackRequirements::new(args.project_type.clone())
        .with_scale(args.scale.into())
        .with_expertise(&args.expertise)
        .excluding(&args.exclude_tags);
    let result = analyzer.suggest_stack(&requirements);

    let formatter = OutputFormatter::new(OutputFormat::from(args.format));
    emit(formatter.format_suggestion(&result), result.success)
}

async fn handle_refresh(args: &RefreshArgs) -> i32 {
    let tech_type = match parse_tech_type(&args.tech_type) {
        Ok(t) => t,
        Err(code) => return code,
    };
    let category = match parse_category(&args.category) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let config = match load_config() {
        Ok(config) => config,
        Err(code) => return code,
    };
    let Some(url) = config.enrichment_url.clone() else {
        error!("No enrichment source configured");
        eprintln!("\nSet STACKLENS_ENRICHMENT_URL to the raw URL of a Markdown awesome list.");
        return EXIT_USAGE;
    };

    let enricher =
        match AwesomeListEnricher::new(url, tech_type, category, config.enrichment_timeout()) {
            Ok(enricher) => enricher,
            Err(e) => {
                error!("Failed to initialize enrichment client: {}", e);
                return EXIT_FAILURE;
            }
        };

    let analyzer = TechAnalyzer::from_config(config).await;
    info!("Refreshing registry from {}", enricher.url());
    let result = analyzer.refresh(&enricher).await;

    let formatter = OutputFormatter::new(OutputFormat::from(args.format));
    emit(formatter.format_refresh(&result), result.success)
}

fn parse_tech_type(value: &str) -> Result<TechType, i32> {
    TechType::parse(value).ok_or_else(|| {
        error!(
            "Invalid technology type: {}. Valid options: {}",
            value,
            TechType::all_variants()
                .iter()
                .map(|t| t.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        EXIT_USAGE
    })
}

fn parse_category(value: &str) -> Result<Category, i32> {
    Category::parse(value).ok_or_else(|| {
        error!(
            "Invalid category: {}. Valid options: {}",
            value,
            Category::all_variants()
                .iter()
                .map(|c| c.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        EXIT_USAGE
    })
}
