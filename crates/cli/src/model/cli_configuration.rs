use crate::model::config_file::PathConfig;
use crate::model::output_format::OutputFormat;

/// represents the CLI configuration
#[derive(Clone)]
pub struct CliConfiguration {
    pub use_debug: bool,
    pub use_configuration_file: bool,
    pub ignore_gitignore: bool,
    pub source_directory: String,
    pub source_subdirectories: Vec<String>,
    pub path_config: PathConfig,
    pub output_format: OutputFormat, // JSON or CSV
    pub output_file: String,
    pub num_cpus: usize, // of cpus to use for parallelism
    pub max_file_size_kb: u64,
    pub ignore_minified_files: bool,
    pub show_performance_statistics: bool,
}
