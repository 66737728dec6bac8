use std::io::ErrorKind;
use std::path::PathBuf;
use std::{env, fs, io};

use serde::Deserialize;

use crate::category::{CategoryIds, CategoryTable};

#[derive(Deserialize)]
pub struct Site {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_image")]
    pub default_image: String,
    #[serde(default = "default_source")]
    pub default_source: String,
}

fn default_image() -> String {
    "/logo.png".to_string()
}

fn default_source() -> String {
    "Fuente: WordPress".to_string()
}

#[derive(Deserialize)]
pub struct WordPress {
    pub api_url: String,
    pub user_agent: String,
    pub timeout_secs: Option<u64>,
}

#[derive(Deserialize)]
pub struct Paths {
    pub template_dir: PathBuf,
    pub public_dir: PathBuf,
}

#[derive(Deserialize, Clone)]
#[serde(default)]
pub struct Defaults {
    pub page_size: usize,
    pub featured_count: usize,
    pub home_fetch_size: u32,
    pub category_fetch_size: u32,
    pub related_fetch_size: u32,
    pub related_count: usize,
    pub max_page_links: usize,
}

impl Default for Defaults {
    fn default() -> Self {
        Defaults {
            page_size: 10,
            featured_count: 4,
            home_fetch_size: 50,
            category_fetch_size: 100,
            related_fetch_size: 10,
            related_count: 3,
            max_page_links: 5,
        }
    }
}

#[derive(Deserialize)]
pub struct Server {
    pub address: String,
    pub port: u16,
}

#[derive(Deserialize)]
pub struct Log {
    pub level: LogLevel,
    pub log_to_console: bool,
    pub location: Option<PathBuf>,
}

#[derive(Deserialize, Copy, Clone)]
pub enum LogLevel {
    Critical = 0,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Deserialize)]
pub struct Cache {
    pub ttl_secs: i64,
}

#[derive(Deserialize)]
pub struct Config {
    pub site: Site,
    pub wordpress: WordPress,
    #[serde(default)]
    pub categories: CategoryIds,
    pub paths: Paths,
    #[serde(default)]
    pub defaults: Defaults,
    pub server: Server,
    pub log: Option<Log>,
    pub cache: Option<Cache>,
}

impl Config {
    pub fn category_table(&self) -> CategoryTable {
        CategoryTable::new(&self.categories)
    }
}

fn parse_path(path: PathBuf) -> io::Result<PathBuf> {
    if !path.starts_with("${exe_dir}") {
        return Ok(path);
    }

    let cur_exe = env::current_exe()?;
    let exe_dir = cur_exe.parent()
        .ok_or_else(|| io::Error::new(ErrorKind::NotFound, "Executable has no parent directory"))?;
    let str_path = path.to_string_lossy();
    Ok(PathBuf::from(str_path.replace("${exe_dir}", &exe_dir.to_string_lossy())))
}

pub fn parse_config(cfg_content: &str) -> io::Result<Config> {
    let mut cfg: Config = match toml::from_str::<Config>(cfg_content) {
        Ok(cfg) => cfg,
        Err(e) => return Err(io::Error::new(
            ErrorKind::InvalidData, format!("Error parsing configuration file: {}", e))),
    };

    cfg.paths = Paths {
        template_dir: parse_path(cfg.paths.template_dir)?,
        public_dir: parse_path(cfg.paths.public_dir)?,
    };

    if cfg.defaults.page_size == 0 {
        return Err(io::Error::new(ErrorKind::InvalidData, "defaults.page_size must be greater than 0"));
    }

    Ok(cfg)
}

pub fn read_config(cfg_path: &PathBuf) -> io::Result<Config> {
    let cfg_content = match fs::read_to_string(cfg_path) {
        Ok(content) => content,
        Err(e) => return Err(io::Error::new(e.kind(), format!("Error opening configuration file {}: {}", cfg_path.display(), e))),
    };

    parse_config(&cfg_content)
}
