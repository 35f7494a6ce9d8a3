use clap::Parser;
use regress_compare::RunPaths;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "api-regress",
    version,
    about = "Compare analysis API answers between a reference server and a version under test"
)]
pub struct Cli {
    #[arg(
        long,
        env = "API_REGRESS_CONFIG",
        default_value = "config.yaml",
        help = "YAML file with token_url, client_id, client_secret, scope, url_ref, url_version"
    )]
    pub config: PathBuf,

    #[arg(
        long,
        env = "API_REGRESS_USECASES",
        default_value = "usecases.json",
        help = "Use-case fixtures (read only)"
    )]
    pub usecases: PathBuf,

    #[arg(
        long,
        env = "API_REGRESS_RESULTS",
        default_value = "results.json",
        help = "Recorded results, rewritten after every use case"
    )]
    pub results: PathBuf,

    #[arg(
        long,
        env = "API_REGRESS_LOG_FILE",
        default_value = "app.log",
        help = "Log file, truncated at start"
    )]
    pub log_file: PathBuf,

    #[arg(
        long,
        default_value_t = false,
        help = "Exit with status 2 when any use case differed or failed"
    )]
    pub fail_on_diff: bool,
}

impl Cli {
    pub fn paths(&self) -> RunPaths {
        RunPaths {
            config: self.config.clone(),
            use_cases: self.usecases.clone(),
            results: self.results.clone(),
        }
    }
}
