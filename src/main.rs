//! Uraaka Downloader - CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use uraaka_downloader::{
    api::UraakaApi,
    cli::Args,
    config::{validate_config, Config},
    error::{exit_codes, Error, Result},
    extract::{
        queued_handle, route_url, run_hashtag, run_info, run_profile_images, run_timeline,
        run_user, ProfileImageKind, Route, ViewKind,
    },
    output::{
        print_banner, print_config_summary, print_error, print_global_stats, print_info,
        print_target_stats, print_warning,
    },
    pipeline::{CrawlStats, DownloadPipeline},
};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(e) => {
            print_error(&format!("{}", e));
            match e {
                Error::Config(_)
                | Error::ConfigValidation { .. }
                | Error::MissingConfig(_)
                | Error::TomlParse(_)
                | Error::UrlParse(_) => ExitCode::from(exit_codes::CONFIG_ERROR as u8),
                Error::Api(_) | Error::UnsupportedUrl(_) | Error::Http(_) => {
                    ExitCode::from(exit_codes::API_ERROR as u8)
                }
                Error::Download(_) => ExitCode::from(exit_codes::DOWNLOAD_ERROR as u8),
                _ => ExitCode::from(exit_codes::UNEXPECTED_ERROR as u8),
            }
        }
    }
}

async fn run() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt().with_env_filter(filter).with_target(false).init();

    print_banner();

    // Load configuration
    let config_path = args.config.clone();
    let mut config = if config_path.exists() {
        Config::load(&config_path)?
    } else {
        print_info("No configuration file found, using defaults with CLI arguments");
        Config::default()
    };

    // Merge CLI arguments into config
    args.merge_into_config(&mut config);
    validate_config(&config)?;

    // Resolve targets into routes up front so bad URLs fail fast
    let mut targets: Vec<(String, Route)> = Vec::new();
    for url in &config.targets.urls {
        targets.push((url.clone(), route_url(url)?));
    }
    for user in &config.targets.users {
        let handle = user.trim_start_matches('@').to_string();
        targets.push((format!("user {}", handle), Route::User(handle)));
    }
    for tag in &config.targets.hashtags {
        let tag = tag.trim_start_matches('#').to_string();
        targets.push((
            format!("hashtag #{}", tag),
            Route::Hashtag { tag, page: None },
        ));
    }

    let labels: Vec<String> = targets.iter().map(|(label, _)| label.clone()).collect();
    print_config_summary(&labels, &config.download_directory().display().to_string());

    // Initialize API client
    let api = UraakaApi::new(
        config.root().to_string(),
        &config.site.user_agent,
        (config.options.delay_min_ms, config.options.delay_max_ms),
    )?;

    let mut global_stats = CrawlStats::default();
    let mut targets_processed = 0u64;
    let mut targets_failed = 0u64;

    for (label, route) in &targets {
        print_info(&format!("Processing {}", label));

        match process_route(&api, &config, route).await {
            Ok(stats) => {
                print_target_stats(label, &stats);
                global_stats.add(&stats);
                targets_processed += 1;
            }
            Err(e) => {
                print_error(&format!("Failed to process {}: {}", label, e));
                targets_failed += 1;
            }
        }
    }

    print_global_stats(&global_stats, targets_processed, targets_failed);

    if targets_failed > 0 {
        return Err(Error::Api(format!("{} target(s) failed", targets_failed)));
    }

    Ok(())
}

/// Process one routed target, including any fan-out the crawl queued.
async fn process_route(api: &UraakaApi, config: &Config, route: &Route) -> Result<CrawlStats> {
    let mut pipeline = DownloadPipeline::new(api, config);

    run_route(api, config, route, &mut pipeline).await?;

    // Hashtag crawls queue user URLs instead of emitting files; run the
    // queued crawls sequentially, isolating per-user failures. Queued URLs
    // carry the configured root, so dispatch follows the view kind instead
    // of re-matching the public site patterns.
    let queued = std::mem::take(&mut pipeline.queued);
    for (url, view) in queued {
        match (view, queued_handle(&url)) {
            (ViewKind::User, Some(handle)) => {
                if let Err(e) = run_user(api, config, handle, &mut pipeline).await {
                    print_warning(&format!("Queued crawl of {} failed: {}", handle, e));
                }
            }
            (ViewKind::User, None) => {
                print_warning(&format!("Dropping queued URL without a handle: {}", url))
            }
            _ => print_warning(&format!("Unexpected queued route: {}", url)),
        }
        // User views never queue further work.
        pipeline.queued.clear();
    }

    Ok(pipeline.stats)
}

/// Run the view a route resolves to.
async fn run_route(
    api: &UraakaApi,
    config: &Config,
    route: &Route,
    pipeline: &mut DownloadPipeline<'_>,
) -> Result<()> {
    match route {
        Route::User(handle) => run_user(api, config, handle, pipeline).await,
        Route::Timeline(handle) => run_timeline(api, config, handle, pipeline).await,
        Route::Info(handle) => run_info(api, config, handle, pipeline).await,
        Route::Avatar(handle) => {
            run_profile_images(api, config, handle, ProfileImageKind::Avatar, pipeline).await
        }
        Route::Background(handle) => {
            run_profile_images(api, config, handle, ProfileImageKind::Background, pipeline).await
        }
        Route::Hashtag { tag, page } => {
            let resume = run_hashtag(api, config, tag, *page, pipeline).await?;
            if let Some(page) = resume {
                print_info(&format!(
                    "Resume this hashtag crawl with: --hashtag {} --page {}",
                    tag, page
                ));
            }
            Ok(())
        }
    }
}
