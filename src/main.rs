use clap::Parser;
use codecombiner::extractor::output_manager::REPORT_FILE_NAME;
use codecombiner::{
    logging, Cli, CodeCombiner, CombinerError, OutputFormatter, OutputMode, TracingSink,
    UserFriendlyError,
};
use std::path::Path;
use std::process;

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    let cli = Cli::parse();

    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    let combiner = match CodeCombiner::from_cli(&cli, &TracingSink) {
        Ok(combiner) => combiner,
        Err(e) => {
            print_startup_error(&e);
            return 1;
        }
    };

    if cli.dry_run {
        return handle_dry_run(&combiner);
    }

    match logging::init_tracing(&combiner.config().logging) {
        Ok(Some(log_path)) => {
            combiner
                .log()
                .debug(&format!("Logging to '{}'.", log_path.display()));
        }
        Ok(None) => {}
        Err(e) => {
            print_startup_error(&e);
            return 1;
        }
    }

    match combiner.run() {
        Ok(report) => {
            combiner.output_formatter().print_run_summary(&report);
        }
        Err(e) => {
            // Artifacts written before the failure stay on disk.
            combiner
                .log()
                .critical(&format!("Unexpected error in main execution: {}", e));
            if let Some(suggestion) = e.suggestion() {
                combiner.log().info(&suggestion);
            }
        }
    }

    0
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "codecombiner.toml".to_string());

    match CodeCombiner::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path);
            println!("\nTo use this configuration:");
            println!("  codecombiner --config {}", config_path);
            println!("\nEdit the file to set the root directory and other settings.");
            0
        }
        Err(e) => {
            eprintln!(
                "Failed to generate configuration file: {}",
                e.user_message()
            );
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn handle_dry_run(combiner: &CodeCombiner) -> i32 {
    let formatter = combiner.output_formatter();
    let config = combiner.config();

    formatter.info("DRY RUN MODE - No files will be written");
    formatter.print_separator();

    let Some(root) = config.source.root.as_deref() else {
        formatter.error("No root directory configured");
        return 1;
    };

    if root.is_dir() {
        formatter.success(&format!("Root directory found: {}", root.display()));
    } else {
        formatter.warning(&format!(
            "Root directory does not exist, outputs would be empty: {}",
            root.display()
        ));
    }

    formatter.info("Configuration that would be used:");
    println!(
        "  Extensions: {}",
        config.source.normalized_extensions().join(", ")
    );
    println!(
        "  Exclusions file: {}{}",
        config.source.exclusions_file.display(),
        describe_presence(&config.source.exclusions_file)
    );
    if !config.source.extra_exclusions.is_empty() {
        println!(
            "  Extra exclusions: {}",
            config.source.extra_exclusions.join(", ")
        );
    }
    println!("  Marker: {}", config.output.marker);
    println!("  Log level: {}", config.logging.level);

    formatter.print_separator();
    formatter.info("Files that would be written:");
    println!("  {}", config.output.combined_path().display());
    println!("  {}", config.output.structure_path().display());
    println!("  {}", config.output.extracted_structure_path().display());
    if config.output.generate_report {
        let report_path = config.output.directory.join(REPORT_FILE_NAME);
        println!("  {}", report_path.display());
    }

    formatter.print_separator();
    formatter.success("Dry run completed successfully");

    0
}

fn describe_presence(path: &Path) -> &'static str {
    if path.exists() {
        ""
    } else {
        " (missing, no exclusions would apply)"
    }
}

fn print_startup_error(error: &CombinerError) {
    let formatter = OutputFormatter::new(OutputMode::Human, false);
    formatter.print_user_friendly_error(error);
}
