use anyhow::{anyhow, Result};
use std::env;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct CodeshareConfig {
    pub api_port: u16,
    pub paths: CodesharePaths,
    pub github: GithubConfig,
}

impl CodeshareConfig {
    pub fn from_env() -> Result<Self> {
        let paths = CodesharePaths::discover()?;
        let api_port = env::var("CODESHARE_API_PORT")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(8080);
        let github = GithubConfig::from_env();
        Ok(Self {
            api_port,
            paths,
            github,
        })
    }

    pub fn new(api_port: u16, paths: CodesharePaths, github: GithubConfig) -> Self {
        Self {
            api_port,
            paths,
            github,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GithubConfig {
    pub token: Option<String>,
    pub request_timeout_secs: u64,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            token: None,
            // One bound for both proxied calls.
            request_timeout_secs: 10,
        }
    }
}

impl GithubConfig {
    pub fn from_env() -> Self {
        let token = env::var("CODESHARE_GITHUB_TOKEN").ok().and_then(|raw| {
            if raw.trim().is_empty() {
                None
            } else {
                Some(raw)
            }
        });
        let request_timeout_secs = env::var("CODESHARE_GITHUB_TIMEOUT_SECS")
            .ok()
            .and_then(|raw| raw.parse::<u64>().ok())
            .unwrap_or(10);
        Self {
            token,
            request_timeout_secs,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CodesharePaths {
    pub base: PathBuf,
    pub data_dir: PathBuf,
    pub db_path: PathBuf,
    pub logs_dir: PathBuf,
}

impl CodesharePaths {
    pub fn discover() -> Result<Self> {
        if let Ok(dir) = env::var("CODESHARE_DATA_DIR") {
            if !dir.trim().is_empty() {
                return Self::from_base_dir(dir);
            }
        }
        let exe_path = std::env::current_exe()
            .map_err(|err| anyhow!("failed to resolve current executable: {err}"))?;
        let base = exe_path
            .parent()
            .ok_or_else(|| anyhow!("executable path missing parent"))?
            .to_path_buf();
        Self::from_base_dir(base)
    }

    pub fn from_base_dir<P: AsRef<Path>>(base: P) -> Result<Self> {
        let base = base.as_ref().to_path_buf();
        let data_dir = base.join("data");
        let db_path = data_dir.join("codeshare.db");
        let logs_dir = base.join("logs");

        Ok(Self {
            base,
            data_dir,
            db_path,
            logs_dir,
        })
    }
}
