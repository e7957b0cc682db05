use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use dashboard::{
    format_date, truncate_text, ChartSink, DashboardController, EngagementTier,
    DEFAULT_TRUNCATE_LEN,
};
use fortune_core::{AppConfig, ChartKind, ChartSeries, ErrorReporter, Outcome, ReadingStep};
use reading_flow::{
    BrowserOpener, Capabilities, DesktopNotifier, DirectoryDownloader, ReadingFlowController,
    SystemClipboard, TerminalClipboard,
};
use std::path::PathBuf;
use std::sync::Arc;
use threads_client::ApiClient;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "threads_fortune=info,dashboard=info,reading_flow=info";

#[derive(Parser, Debug)]
#[command(name = "threads-fortune", version, about = "Threads analytics and creator portraits")]
struct Cli {
    /// TOML configuration file. Environment variables still override it.
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load posts and analytics and print the post table.
    Dashboard {
        #[arg(long, default_value = "engagement_rate")]
        sort: String,
        #[arg(long)]
        ascending: bool,
        #[arg(long, default_value = "engagement")]
        chart: String,
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Ask the server to pull fresh posts, then reload.
    Sync,
    /// Analyze the given posts.
    Analyze {
        #[arg(required = true)]
        post_ids: Vec<String>,
    },
    /// Run a creator portrait reading.
    Reading {
        #[arg(long, value_enum)]
        share: Option<ShareTarget>,
    },
    /// Check that the API server is up.
    Health,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ShareTarget {
    Threads,
    Twitter,
    Instagram,
    Copy,
    Download,
}

/// Prints each series as a row of labelled values.
struct LogChartSink;

impl ChartSink for LogChartSink {
    fn render(&self, series: &ChartSeries) {
        info!("Rendering {} chart ({} points)", series.label, series.points.len());
        for point in &series.points {
            println!("  {:<10} {:>12.2}", point.label, point.value);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => AppConfig::from_env().context("reading config from environment")?,
    };

    let client = Arc::new(ApiClient::new(&config.api)?);
    let reporter = ErrorReporter::new();

    let outcome = match cli.command {
        Command::Dashboard {
            sort,
            ascending,
            chart,
            limit,
        } => run_dashboard(client, reporter.clone(), &config, &sort, ascending, &chart, limit).await?,
        Command::Sync => {
            let mut dashboard = dashboard_controller(client, reporter.clone(), &config);
            let outcome = dashboard.sync_data().await;
            println!("{} posts loaded", dashboard.snapshot().posts.len());
            outcome
        }
        Command::Analyze { post_ids } => {
            let mut dashboard = dashboard_controller(client, reporter.clone(), &config);
            dashboard.load_data().await;
            for id in &post_ids {
                dashboard.toggle_selection(id);
            }
            dashboard.analyze_selected().await
        }
        Command::Reading { share } => run_reading(client, reporter.clone(), &config, share).await,
        Command::Health => {
            let health = client.health().await?;
            println!(
                "{} ({})",
                health.status,
                health.timestamp.as_deref().unwrap_or("no timestamp")
            );
            print_request_metrics(&client).await;
            if health.is_healthy() {
                Outcome::Completed
            } else {
                Outcome::Failed
            }
        }
    };

    for diagnostic in reporter.diagnostics() {
        warn!(
            "{} [{}]: {}",
            diagnostic.operation, diagnostic.code, diagnostic.message
        );
    }

    if outcome == Outcome::Failed {
        bail!("operation failed");
    }
    Ok(())
}

async fn print_request_metrics(client: &ApiClient) {
    let metrics = client.get_metrics().await;
    let retries = client.get_retry_metrics();
    for (endpoint, stats) in &metrics.requests_by_endpoint {
        println!(
            "{} {} request(s), {:.0}% ok, avg {:?}, last status {}",
            endpoint,
            stats.request_count,
            stats.success_rate() * 100.0,
            stats.average_response_time(),
            stats
                .last_status
                .map_or_else(|| "none".to_string(), |status| status.to_string())
        );
    }
    if retries.total_retries > 0 {
        println!("{} read retries", retries.total_retries);
    }
}

fn dashboard_controller(
    client: Arc<ApiClient>,
    reporter: ErrorReporter,
    config: &AppConfig,
) -> DashboardController<ApiClient> {
    DashboardController::new(
        client,
        Arc::new(LogChartSink),
        reporter,
        config.dashboard.clone(),
    )
}

async fn run_dashboard(
    client: Arc<ApiClient>,
    reporter: ErrorReporter,
    config: &AppConfig,
    sort: &str,
    ascending: bool,
    chart: &str,
    limit: usize,
) -> Result<Outcome> {
    let chart: ChartKind = chart.parse()?;
    let mut dashboard = dashboard_controller(client, reporter, config).with_chart_kind(chart);

    let outcome = dashboard.init().await;
    if outcome == Outcome::Failed {
        return Ok(outcome);
    }

    if dashboard.snapshot().sort.field.as_str() != sort
        && dashboard.set_sort_field_by_name(sort) == Outcome::Skipped
    {
        bail!("unknown sort field '{}'", sort);
    }
    let current = dashboard.snapshot().sort;
    if current.descending == ascending {
        dashboard.set_sort_field(current.field);
    }

    let state = dashboard.snapshot();
    if !state.analytics.is_empty() {
        println!("Analytics: {}", state.analytics.0);
    }
    for post in state.posts.iter().take(limit) {
        println!(
            "{:<20} {:<10} {:>6.2}% {:>8} views {:>6} likes  {}  {}",
            post.id,
            format_date(post.created_at),
            post.engagement_rate,
            post.views,
            post.likes,
            EngagementTier::from_rate(post.engagement_rate).as_str(),
            truncate_text(&post.content, DEFAULT_TRUNCATE_LEN),
        );
    }
    Ok(outcome)
}

async fn run_reading(
    client: Arc<ApiClient>,
    reporter: ErrorReporter,
    config: &AppConfig,
    share: Option<ShareTarget>,
) -> Outcome {
    let downloader = match &config.share.download_dir {
        Some(dir) => DirectoryDownloader::new(dir.clone()),
        None => DirectoryDownloader::user_downloads(),
    };
    let capabilities = Capabilities::none()
        .with_clipboard(Arc::new(SystemClipboard))
        .with_legacy_clipboard(Arc::new(TerminalClipboard))
        .with_url_opener(Arc::new(BrowserOpener))
        .with_downloader(Arc::new(downloader))
        .with_notifier(Arc::new(DesktopNotifier));

    let mut flow = ReadingFlowController::new(
        client,
        capabilities,
        reporter,
        config.reading.clone(),
        config.share.clone(),
    );

    let mut rx = flow.subscribe();
    let progress = tokio::spawn(async move {
        let mut last = (ReadingStep::Landing, 0);
        while rx.changed().await.is_ok() {
            let current = {
                let state = rx.borrow_and_update();
                (state.step, state.reading_step)
            };
            if current != last {
                info!("Reading: {} (step {})", current.0, current.1);
                last = current;
            }
        }
    });

    flow.start_reading();
    let outcome = flow.connect_threads().await;

    let state = flow.snapshot();
    if let Some(portrait) = &state.portrait {
        println!(
            "{}\n{}",
            portrait.archetype.as_deref().unwrap_or("The Emerging Creator"),
            portrait.mystical_advice.as_deref().unwrap_or_default()
        );
    }
    if let Some(text) = flow.share_text() {
        println!("\n{}", text);
    }

    let outcome = match share {
        Some(ShareTarget::Threads) => flow.share_to_threads().await,
        Some(ShareTarget::Twitter) => flow.share_to_twitter().await,
        Some(ShareTarget::Instagram) => flow.share_to_instagram().await,
        Some(ShareTarget::Copy) => flow.copy_text().await,
        Some(ShareTarget::Download) => flow.download_image().await,
        None => outcome,
    };

    drop(flow);
    let _ = progress.await;
    outcome
}
