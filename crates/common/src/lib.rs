pub mod analysis_options;
pub mod model;
