use clap::{CommandFactory, Parser};

#[derive(Debug, Parser)]
#[command(
    name = "genre_predict-tui",
    version,
    about = "Top-N music genre prediction for YouTube links"
)]
pub struct CliArgs {
    /// Submit this URL once without the UI, print the result and exit
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,

    /// Print headless output as JSON
    #[arg(long, requires = "url")]
    pub json: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Override the prediction endpoint
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Override the request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Override the log directory
    #[arg(long = "log-dir", value_name = "PATH")]
    pub log_dir: Option<String>,
}

impl CliArgs {
    pub fn apply_env_overrides(&self) {
        if let Some(endpoint) = &self.endpoint {
            std::env::set_var("PREDICT_ENDPOINT", endpoint);
        }
        if let Some(timeout) = self.timeout {
            std::env::set_var("PREDICT_TIMEOUT_SECS", timeout.to_string());
        }
        if let Some(dir) = &self.log_dir {
            std::env::set_var("GENRE_LOG_DIR", dir);
        }
        if self.debug {
            std::env::set_var("DEBUG", "1");
        }
    }

    pub fn help_text() -> String {
        let mut command = Self::command();
        let mut buffer = Vec::new();
        command.write_help(&mut buffer).ok();
        String::from_utf8_lossy(&buffer).to_string()
    }
}
