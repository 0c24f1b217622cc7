use anyhow::{Context, Result};
use getopts::Options;
use itertools::Itertools;
use std::io::prelude::*;
use std::process::exit;
use std::time::Instant;
use std::{env, fs};

use cli::config_file::read_config_file;
use cli::constants::{
    DEFAULT_MAX_CPUS, DEFAULT_MAX_FILE_SIZE_KB, EXIT_CODE_FAIL_ON_VIOLATION,
    EXIT_CODE_INVALID_CONFIGURATION, EXIT_CODE_INVALID_DIRECTORY, EXIT_CODE_NO_DIRECTORY,
    EXIT_CODE_NO_OUTPUT, EXIT_CODE_UNSAFE_SUBDIRECTORIES,
};
use cli::csv;
use cli::file_utils::{
    are_subdirectories_safe, filter_files_by_size, filter_stylesheet_files, get_files,
    read_files_from_gitignore,
};
use cli::model::cli_configuration::CliConfiguration;
use cli::model::config_file::{ConfigFile, PathConfig};
use cli::model::output_format::OutputFormat;
use cli::violations_table;
use comments_core::constants::CARGO_VERSION;
use comments_core::rule::RuleSeverity;
use comments_core::rules::builtin_rules;
use comments_core::{Engine, EngineBuilder};
use common::analysis_options::AnalysisOptions;
use datadog_css_comment_analyzer::{comment_analysis, count_violations_by_severities};
use tracing_subscriber::EnvFilter;

fn print_usage(program: &str, opts: Options) {
    let brief = format!("Usage: {} [options]", program);
    print!("{}", opts.usage(&brief));
}

fn print_configuration(configuration: &CliConfiguration, engine: &Engine) {
    let configuration_method = if configuration.use_configuration_file {
        "config file (comment-analysis.datadog.[yml|yaml])"
    } else {
        "default rules"
    };

    let output_format_str = match configuration.output_format {
        OutputFormat::Csv => "csv",
        OutputFormat::Json => "json",
    };

    let rule_names: Vec<String> = engine
        .rules()
        .iter()
        .map(|rule| rule.id().to_string())
        .collect();
    let ignore_paths_str = if configuration.path_config.ignore.is_empty() {
        "no ignore path".to_string()
    } else {
        configuration.path_config.ignore.join(",")
    };
    let only_paths_str = match &configuration.path_config.only {
        Some(x) => x.join(","),
        None => "all paths".to_string(),
    };

    println!("Configuration");
    println!("=============");
    println!("version             : {}", CARGO_VERSION);
    println!("config method       : {}", configuration_method);
    println!("cores available     : {}", num_cpus::get());
    println!("cores used          : {}", configuration.num_cpus);
    println!("#rules loaded       : {}", engine.rules().len());
    println!("rules               : {}", rule_names.join(","));
    println!("source directory    : {}", configuration.source_directory);
    println!(
        "subdirectories      : {}",
        configuration.source_subdirectories.clone().join(",")
    );
    println!("output file         : {}", configuration.output_file);
    println!("output format       : {}", output_format_str);
    println!("ignore paths        : {}", ignore_paths_str);
    println!("only paths          : {}", only_paths_str);
    println!("ignore gitignore    : {}", configuration.ignore_gitignore);
    println!("ignore minified     : {}", configuration.ignore_minified_files);
    println!(
        "use config file     : {}",
        configuration.use_configuration_file
    );
    println!("use debug           : {}", configuration.use_debug);
    println!(
        "max file size       : {} kb",
        configuration.max_file_size_kb
    );
}

fn choose_cpu_count(user_input: Option<usize>) -> usize {
    let logical_cores = num_cpus::get();
    let cores = user_input.unwrap_or(DEFAULT_MAX_CPUS);
    usize::min(logical_cores, cores)
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let program = args[0].clone();
    let mut opts = Options::new();
    let mut use_configuration_file = false;
    let mut ignore_gitignore = false;
    let mut max_file_size_kb = DEFAULT_MAX_FILE_SIZE_KB;
    let mut ignore_minified_files = true;

    opts.optopt(
        "i",
        "directory",
        "directory to scan (valid existing directory)",
        "/path/to/code/to/analyze",
    );
    opts.optmulti(
        "u",
        "subdirectory",
        "subdirectory to scan within the repository",
        "sub/directory",
    );
    opts.optopt("d", "debug", "use debug mode", "yes/no");
    opts.optopt("f", "format", "format of the output file", "json/csv");
    opts.optopt("o", "output", "output file name", "output.json");
    opts.optflag(
        "",
        "print-violations",
        "print a list with all the violations that were found",
    );
    opts.optopt(
        "",
        "fail-on-any-violation",
        "exit a non-zero return code if there is one violation",
        "error,warning,notice",
    );
    opts.optopt(
        "c",
        "cpus",
        format!("allow N CPUs at once; if unspecified, defaults to the number of logical cores on the platform or {}, whichever is less", DEFAULT_MAX_CPUS).as_str(),
        "--cpus 5",
    );
    opts.optmulti(
        "p",
        "ignore-path",
        "path to ignore - the value is a glob",
        "**/vendor/*.css (multiple values possible)",
    );
    opts.optflag("h", "help", "print this help");
    opts.optflag("v", "version", "shows the tool version");
    opts.optflag(
        "x",
        "performance-statistics",
        "enable performance statistics",
    );

    let matches = match opts.parse(&args[1..]) {
        Ok(m) => m,
        Err(f) => {
            panic!("error when parsing arguments: {}", f)
        }
    };

    if matches.opt_present("v") {
        println!("Version: {}", CARGO_VERSION);
        exit(0);
    }

    if matches.opt_present("h") {
        print_usage(&program, opts);
        exit(0);
    }

    // initialize the tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if !matches.opt_present("o") {
        eprintln!("output file not specified");
        print_usage(&program, opts);
        exit(EXIT_CODE_NO_OUTPUT);
    }

    let enable_performance_statistics = matches.opt_present("x");
    let print_violations = matches.opt_present("print-violations");
    // if --fail-on-any-violation is specified, get the list of severities to exit with a non-zero code
    let fail_any_violation_severities = match matches.opt_str("fail-on-any-violation") {
        Some(f) => f
            .split(',')
            .map(|s| RuleSeverity::try_from(s).expect("cannot map severity"))
            .collect(),
        None => {
            vec![]
        }
    };

    let output_format = match matches.opt_str("f") {
        Some(f) => match f.as_str() {
            "csv" => OutputFormat::Csv,
            _ => OutputFormat::Json,
        },
        None => OutputFormat::Json,
    };

    let use_debug = *matches
        .opt_str("d")
        .map(|value| value == "yes" || value == "true")
        .get_or_insert(env::var_os("DD_CA_DEBUG").is_some());
    let output_file = matches
        .opt_str("o")
        .context("output file must be specified")?;

    let mut path_config = PathConfig {
        ignore: Vec::new(),
        only: None,
    };
    let ignore_paths_from_options = matches.opt_strs("p");
    let directory_to_analyze_option = matches.opt_str("i");
    let subdirectories_to_analyze = matches.opt_strs("u");

    if directory_to_analyze_option.is_none() {
        eprintln!("no directory passed, specify a directory with option -i");
        print_usage(&program, opts);
        exit(EXIT_CODE_NO_DIRECTORY)
    }

    let directory_to_analyze = directory_to_analyze_option.unwrap();
    let directory_path = std::path::Path::new(&directory_to_analyze);

    if !directory_path.is_dir() {
        eprintln!("directory to analyze is not correct");
        exit(EXIT_CODE_INVALID_DIRECTORY)
    }

    if !are_subdirectories_safe(directory_path, &subdirectories_to_analyze) {
        eprintln!("sub-directories are not safe and point outside of the repository");
        exit(EXIT_CODE_UNSAFE_SUBDIRECTORIES)
    }

    let configuration_file: Option<ConfigFile> =
        match read_config_file(directory_to_analyze.as_str()) {
            Ok(cfg) => cfg,
            Err(err) => {
                eprintln!(
                    "Error reading configuration file from {}:\n  {}",
                    directory_to_analyze, err
                );
                exit(EXIT_CODE_INVALID_CONFIGURATION)
            }
        };

    // start from the built-in rules and apply the rule settings from the configuration file.
    let mut enabled_rules = builtin_rules();
    let mut severity_overrides: Vec<(String, RuleSeverity)> = Vec::new();

    if let Some(conf) = configuration_file {
        use_configuration_file = true;
        ignore_gitignore = conf.ignore_gitignore.unwrap_or(false);
        ignore_minified_files = conf.ignore_minified_files.unwrap_or(true);

        // Get the max file size from the configuration or default to the default constant.
        max_file_size_kb = conf.max_file_size_kb.unwrap_or(DEFAULT_MAX_FILE_SIZE_KB);

        for name in conf.rules.keys() {
            if !enabled_rules.iter().any(|rule| rule.id().as_ref() == name) {
                eprintln!("unknown rule in the configuration file: {}", name);
                exit(EXIT_CODE_INVALID_CONFIGURATION)
            }
        }

        enabled_rules.retain(|rule| {
            conf.rules
                .get(rule.id().as_ref())
                .map(|rule_config| rule_config.enabled)
                .unwrap_or(true)
        });

        severity_overrides.extend(conf.rules.iter().filter_map(|(name, rule_config)| {
            rule_config
                .severity
                .filter(|_| rule_config.enabled)
                .map(|severity| (name.clone(), severity))
        }));

        // copy the only and ignore paths from the configuration file
        path_config.ignore.extend(conf.paths.ignore);
        path_config.only = conf.paths.only;
    }

    let mut engine_builder = EngineBuilder::new().rules(enabled_rules);
    for (name, severity) in severity_overrides {
        engine_builder = engine_builder.severity_override(name, severity);
    }
    let engine = match engine_builder.build() {
        Ok(engine) => engine,
        Err(err) => {
            eprintln!("cannot build the analysis engine: {}", err);
            exit(EXIT_CODE_INVALID_CONFIGURATION)
        }
    };

    // add ignore path from the options
    path_config
        .ignore
        .extend(ignore_paths_from_options.iter().map(|p| p.clone().into()));

    // ignore all directories that are in gitignore
    if !ignore_gitignore {
        let paths_from_gitignore = read_files_from_gitignore(directory_to_analyze.as_str())
            .expect("error when reading gitignore file");
        path_config
            .ignore
            .extend(paths_from_gitignore.iter().map(|p| p.clone().into()));
    }

    let files_in_repository = get_files(
        directory_to_analyze.as_str(),
        subdirectories_to_analyze.clone(),
        &path_config,
    )
    .expect("unable to get the list of files to analyze");

    let num_cores_requested = matches
        .opt_str("c")
        .map(|val| {
            val.parse::<usize>()
                .context("unable to parse `cpus` flag as integer")
        })
        .transpose()?;
    // Select the number of cores to use based on the user's CLI arg (or lack of one)
    let num_cpus = choose_cpu_count(num_cores_requested);

    // build the configuration object that contains how the CLI should behave.
    let configuration = CliConfiguration {
        use_debug,
        use_configuration_file,
        ignore_gitignore,
        source_directory: directory_to_analyze.clone(),
        source_subdirectories: subdirectories_to_analyze.clone(),
        path_config,
        output_format,
        output_file,
        num_cpus,
        max_file_size_kb,
        ignore_minified_files,
        show_performance_statistics: enable_performance_statistics,
    };

    print_configuration(&configuration, &engine);

    rayon::ThreadPoolBuilder::new()
        .num_threads(configuration.num_cpus)
        .build_global()?;

    let analysis_options = AnalysisOptions {
        log_output: true,
        use_debug,
        ignore_minified_files,
    };

    let start_timestamp = Instant::now();

    let stylesheet_files = filter_stylesheet_files(&files_in_repository);
    let files_to_analyze = filter_files_by_size(&stylesheet_files, &configuration);

    println!(
        "Analyzing {} stylesheet files using {} rules",
        files_to_analyze.len(),
        engine.rules().len()
    );

    let analyses = comment_analysis(&engine, &configuration, &analysis_options, &files_to_analyze);

    // If the performance statistics are enabled, we show the slowest files to analyze.
    if configuration.show_performance_statistics {
        println!("Top 100 slowest files to analyze");
        println!("--------------------------------");
        // Show analysis time, in sorted order
        for analysis in analyses
            .iter()
            .sorted_by(|a, b| Ord::cmp(&b.execution_time_ms, &a.execution_time_ms))
            .take(100)
        {
            println!(
                "file {:?}, analysis time {:?} ms",
                analysis.filename, analysis.execution_time_ms
            );
        }
    }

    let total_comments: usize = analyses.iter().map(|analysis| analysis.comment_count).sum();
    let total_violations: usize = analyses
        .iter()
        .map(|analysis| analysis.violations.len())
        .sum();
    let elapsed = start_timestamp.elapsed();
    println!(
        "Analyzed {} files, found {} comments and {} violations in {:.3} seconds",
        analyses.len(),
        total_comments,
        total_violations,
        elapsed.as_secs_f32()
    );

    if print_violations {
        violations_table::print_violations_table(&analyses);
    }

    let value = match configuration.output_format {
        OutputFormat::Csv => csv::generate_csv_results(&analyses),
        OutputFormat::Json => {
            serde_json::to_string(&analyses).expect("error when getting the JSON report")
        }
    };

    // write the reports
    let mut file = fs::File::create(configuration.output_file).context("cannot create file")?;
    file.write_all(value.as_bytes())
        .context("error when writing results")?;

    // if there is any violation at all and --fail-on-any-violation is passed, we exit with an error code
    if !fail_any_violation_severities.is_empty()
        && count_violations_by_severities(&analyses, &fail_any_violation_severities) > 0
    {
        exit(EXIT_CODE_FAIL_ON_VIOLATION);
    }

    Ok(())
}
