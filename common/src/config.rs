use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::{env, fs};

#[derive(Debug, Deserialize)]
pub struct Config {
    pub project_name: String,
    pub log_level: String,
    pub log_file: String,
    /// PrairieLearn server root, e.g. `https://us.prairielearn.com`.
    /// May be empty at startup; the fetch pipeline reports it as a
    /// configuration error when a fetch actually needs it.
    pub pl_base_url: String,
    /// PrairieLearn personal access token (sent as `Private-Token`).
    pub pl_api_token: String,
    /// Course instance the roster and instance caches are scoped to.
    pub course_instance_id: String,
    /// Directory holding the JSON state files (roster, rules, caches).
    pub state_dir: String,
    /// Audit header emission: "off", "basic" or "scores".
    pub include_output_header: String,
}

static CONFIG: OnceCell<Config> = OnceCell::new();

impl Config {
    pub fn init(env_path: &str) -> &'static Self {
        dotenvy::from_filename(env_path).ok();

        CONFIG.get_or_init(|| {
            let project_name = env::var("PROJECT_NAME").unwrap_or_else(|_| "plexport".into());
            let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into());
            let log_file = env::var("LOG_FILE").unwrap_or_else(|_| "logs/plexport.log".into());
            let pl_base_url = env::var("PL_BASE_URL").unwrap_or_default();
            let pl_api_token = env::var("PL_API_TOKEN").unwrap_or_default();
            let course_instance_id = env::var("COURSE_INSTANCE_ID").unwrap_or_default();
            let state_dir = env::var("STATE_DIR").unwrap_or_else(|_| ".plexport".into());
            let include_output_header =
                env::var("INCLUDE_OUTPUT_HEADER").unwrap_or_else(|_| "basic".into());

            if let Some(parent) = std::path::Path::new(&log_file).parent() {
                fs::create_dir_all(parent).expect("Failed to create log directory");
            }

            Config {
                project_name,
                log_level,
                log_file,
                pl_base_url,
                pl_api_token,
                course_instance_id,
                state_dir,
                include_output_header,
            }
        })
    }

    pub fn get() -> &'static Self {
        CONFIG.get().expect("Config not initialized")
    }
}
