use anyhow::Context;
use clap::Parser;
use std::io;
use std::path::Path;
use std::process::ExitCode;
use watchtime::{
    analytics::{save_results, WatchTimeCalculator},
    cli::{interactive_setup, print_results, resolve_non_interactive, Args, CliError, Prompter},
    config::ConfigManager,
    utils,
};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // ログ初期化
    let _log_guard = match utils::init_logging(args.verbose, args.log_file.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Error: {:#}", e);
            if let Some(CliError::MissingApiKey) = e.downcast_ref::<CliError>() {
                if args.no_interactive {
                    print_api_key_help();
                }
            } else if !args.no_interactive {
                eprintln!("\nError: {:#}", e);
                eprintln!("Try running with --verbose for more details");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args) -> anyhow::Result<()> {
    // Ctrl+Cシグナルハンドラー
    ctrlc::set_handler(|| {
        eprintln!("\nOperation cancelled by user");
        std::process::exit(1);
    })
    .context("Failed to set signal handler")?;

    let config_manager = match &args.config {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new(),
    };
    let defaults = config_manager.load_config()?;

    let options = if args.no_interactive {
        resolve_non_interactive(args, &defaults)?
    } else {
        let mut prompter = Prompter::new(io::stdin().lock(), io::stdout());
        interactive_setup(args, &defaults, Path::new("."), &mut prompter)?
    };

    let config = &options.config;
    if args.no_interactive {
        println!(
            "Processing YouTube watch history from: {}",
            config.history_file.display()
        );
        println!("Start date: {}", config.start_date);
        if let Some(end) = &config.end_date {
            println!("End date: {}", end);
        }
        println!("Max video duration: {} seconds", config.max_duration);
    } else {
        println!("Processing YouTube watch history...");
    }

    let mut calculator = WatchTimeCalculator::new(options.config)?;
    let stats = calculator.calculate_watch_time().await?;

    print_results(&stats, &mut io::stdout().lock())?;

    if let Some(output) = &options.output {
        save_results(&stats, calculator.config(), output)?;
        println!("\nResults saved to: {}", output.display());
    }

    Ok(())
}

fn print_api_key_help() {
    eprintln!("Error: YouTube API key is required!");
    eprintln!("Either:");
    eprintln!("   1. Use -k/--api-key argument");
    eprintln!("   2. Set YOUTUBE_API_KEY environment variable");
    eprintln!("   3. Run without --no-interactive for guided setup");
    eprintln!("   4. Get a key from: https://console.developers.google.com/");
}
