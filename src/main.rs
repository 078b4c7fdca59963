use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use tastehub_engine::calendar::parse_platforms;
use tastehub_engine::config::EngineConfig;
use tastehub_engine::server::{self, AppState};
use tastehub_engine::{
    build_features, format_float, format_percent, plan_calendar, CalendarRequest,
    CalendarRequirements, PostInput, PredictionService,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tastehub", about = "Engagement prediction and content calendar engine")]
struct Cli {
    /// Path to the TOML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Predict the engagement rate of one post.
    Predict(PredictArgs),
    /// Predict a JSON array of posts in one model call.
    Batch(BatchArgs),
    /// Draft and score a content calendar.
    Calendar(CalendarArgs),
    /// Run the HTTP API.
    Serve(ServeArgs),
    /// Write the effective configuration to a file.
    InitConfig(InitConfigArgs),
}

#[derive(Args, Debug, Clone)]
struct PredictArgs {
    #[arg(long, default_value = "instagram")]
    platform: String,
    /// Post date (YYYY-MM-DD); defaults to today.
    #[arg(long)]
    date: Option<String>,
    #[arg(long, default_value = "")]
    title: String,
    /// Caption text; read from stdin when omitted.
    #[arg(long)]
    description: Option<String>,
    #[arg(long, default_value_t = 0.0)]
    posts_last_7_days: f64,
    #[arg(long)]
    followers: Option<f64>,
    #[arg(long)]
    creative_score: Option<f64>,
    #[arg(long)]
    hour: Option<f64>,
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug, Clone)]
struct BatchArgs {
    /// JSON file with an array of posts; stdin when omitted.
    #[arg(long)]
    input: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
struct CalendarArgs {
    #[arg(long)]
    company: String,
    #[arg(long)]
    objective: String,
    /// Repeatable; defaults to all platforms.
    #[arg(long = "platform")]
    platforms: Vec<String>,
    #[arg(long)]
    days: Option<i64>,
    #[arg(long, default_value_t = 5000.0)]
    followers: f64,
    #[arg(long, default_value_t = 0)]
    recent_posts: u64,
    #[arg(long)]
    start_date: Option<String>,
    #[arg(long)]
    no_daily_themes: bool,
    #[arg(long)]
    generic_ideas: bool,
    #[arg(long)]
    no_analytics: bool,
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug, Clone)]
struct ServeArgs {
    #[arg(long)]
    host: Option<String>,
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Args, Debug, Clone)]
struct InitConfigArgs {
    #[arg(long, default_value = "config/tastehub.toml")]
    output: PathBuf,
}

#[tokio::main]
async fn main() {
    load_dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("tastehub_engine=info,tower_http=info")),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), String> {
    let cli = Cli::parse();
    let (config, config_path) = EngineConfig::load(cli.config)?;
    if let Some(path) = config_path.as_ref().filter(|path| path.exists()) {
        tracing::debug!(path = %path.display(), "loaded config");
    }

    match cli.command {
        Command::Predict(args) => run_predict(&config, args).await,
        Command::Batch(args) => run_batch(&config, args).await,
        Command::Calendar(args) => run_calendar(&config, args).await,
        Command::Serve(args) => {
            let host = args.host.unwrap_or_else(|| config.server.host.clone());
            let port = args.port.unwrap_or(config.server.port);
            let state = AppState::new(PredictionService::from_config(&config));
            server::serve(state, &host, port).await
        }
        Command::InitConfig(args) => {
            config.write(&args.output)?;
            println!("Wrote {}", args.output.display());
            Ok(())
        }
    }
}

async fn run_predict(config: &EngineConfig, args: PredictArgs) -> Result<(), String> {
    let description = read_text(args.description)?;
    let post = PostInput {
        platform: args.platform,
        date: args
            .date
            .unwrap_or_else(|| chrono::Local::now().date_naive().to_string()),
        title: args.title,
        description,
        posts_last_7_days: args.posts_last_7_days,
        follower_count: args.followers,
        creative_score: args.creative_score,
        post_hour: args.hour,
    };

    let features = build_features(&post);
    let service = PredictionService::from_config(config);
    let result = service.predict(&features).await;

    if args.json {
        return print_json(&result);
    }

    println!(
        "Predicted engagement: {} (rate {})",
        format_percent(result.rate),
        format_float(result.rate, 4)
    );
    println!(
        "Provider: {} ({})",
        result.provider.label(),
        result.model_version
    );
    if let Some(warning) = result.warning.as_ref() {
        println!("Warning: {}", warning);
    }
    let f = &result.features;
    println!(
        "Features: {} | format {:?} | goal {:?} | campaign {:?} | tone {:?} | cta {:?}",
        f.platform.label(),
        f.format,
        f.goal,
        f.campaign,
        f.tone,
        f.cta_type
    );
    println!(
        "          hashtags {} | hour {} | day {} | caption {} | creative {} | posts/7d {} | followers {}",
        f.hashtags_count,
        f.post_hour,
        f.day_of_week,
        f.caption_length,
        format_float(f.creative_score, 1),
        f.posts_last_7_days,
        f.follower_count
    );
    Ok(())
}

async fn run_batch(config: &EngineConfig, args: BatchArgs) -> Result<(), String> {
    let contents = match args.input.as_ref() {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|err| format!("failed to read {}: {}", path.display(), err))?,
        None => read_stdin()?,
    };
    let posts: Vec<PostInput> = serde_json::from_str(&contents)
        .map_err(|err| format!("failed to parse posts: {}", err))?;

    let features = posts.iter().map(build_features).collect::<Vec<_>>();
    let service = PredictionService::from_config(config);
    let results = service.predict_batch(&features).await;
    print_json(&results)
}

async fn run_calendar(config: &EngineConfig, args: CalendarArgs) -> Result<(), String> {
    let company = args.company.trim();
    if company.is_empty() {
        return Err("--company must not be blank".to_string());
    }
    let objective = args.objective.trim();
    if objective.is_empty() {
        return Err("--objective must not be blank".to_string());
    }

    let mut request = CalendarRequest::new(company, objective);
    request.platforms = parse_platforms(&args.platforms);
    request.days = args.days;
    request.requirements = CalendarRequirements {
        daily_themes: !args.no_daily_themes,
        platform_specific: !args.generic_ideas,
        analytics: !args.no_analytics,
    };
    if let Some(start) = args.start_date.as_deref() {
        let date = NaiveDate::parse_from_str(start, "%Y-%m-%d")
            .map_err(|err| format!("invalid --start-date {}: {}", start, err))?;
        request.start_date = Some(date);
    }

    let service = PredictionService::from_config(config);
    let items = plan_calendar(&service, &request, args.followers, args.recent_posts).await;

    if args.json {
        return print_json(&items);
    }

    for item in &items {
        println!(
            "Day {:>2} {} {:<9} {:>5} {:<24} {:>6}  {}",
            item.draft.day,
            item.draft.date,
            item.draft.platform,
            item.draft.recommended_time,
            item.draft.theme,
            format!("{:.2}%", item.predicted_engagement_percent),
            item.draft.cta
        );
    }
    if let Some(warning) = items.iter().find_map(|item| item.model_warning.as_ref()) {
        println!("\nHeuristic fallback used: {}", warning);
    }
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), String> {
    let payload = serde_json::to_string_pretty(value)
        .map_err(|err| format!("failed to serialize output: {}", err))?;
    println!("{}", payload);
    Ok(())
}

fn read_text(arg: Option<String>) -> Result<String, String> {
    if let Some(text) = arg {
        return Ok(text);
    }
    if io::stdin().is_terminal() {
        return Err("missing post description: pass --description or pipe stdin".to_string());
    }
    Ok(read_stdin()?.trim().to_string())
}

fn read_stdin() -> Result<String, String> {
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|err| format!("failed reading stdin: {}", err))?;
    Ok(buffer)
}

fn load_dotenv() {
    let _ = dotenvy::dotenv();
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let manifest_path = Path::new(manifest_dir).join(".env");
    let _ = dotenvy::from_path(manifest_path);
}
