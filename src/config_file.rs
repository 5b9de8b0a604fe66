use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

const PROJECT_FILE_NAME: &str = ".reqtracerc";
const APP_DIR_NAME: &str = "reqtrace";
const USER_FILE_NAME: &str = "config.ini";

/// Default arguments loaded from `.reqtracerc` or the user config file
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    pub defaults: Option<String>,
}

impl ConfigFile {
    /// Find project-level .reqtracerc by walking up from the current directory
    pub fn find_project_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        Self::find_project_config_from(&current)
    }

    pub fn find_project_config_from(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(PROJECT_FILE_NAME))
            .find(|candidate| candidate.is_file())
    }

    /// User config locations in order of preference
    pub fn get_user_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // $XDG_CONFIG_HOME on Linux, Application Support on macOS, %APPDATA% on Windows
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join(APP_DIR_NAME).join(USER_FILE_NAME));
        }
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(PROJECT_FILE_NAME));
        }

        paths
    }

    /// Load with precedence project > user; only the first existing user file is read
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        if let Some(path) = Self::get_user_config_paths().into_iter().find(|p| p.exists()) {
            config = Self::merge_configs(config, Self::load_from_path(&path)?);
        }

        if let Some(project_path) = Self::find_project_config() {
            config = Self::merge_configs(config, Self::load_from_path(&project_path)?);
        }

        Ok(config)
    }

    /// Load an explicit file if given, otherwise search the usual locations
    pub fn load_with_custom_path(custom_path: Option<&str>) -> Result<Self> {
        match custom_path {
            Some(path) => Self::load_from_path(Path::new(path)),
            None => Self::load(),
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Ok(Self::parse_ini_content(&content))
    }

    /// Only the root-level `defaults` key is recognised; sections and other
    /// keys are ignored so files can be shared with future options.
    fn parse_ini_content(content: &str) -> Self {
        let mut defaults = None;
        let mut in_section = false;

        for line in content.lines() {
            let line = line.trim();

            if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
                continue;
            }

            if line.starts_with('[') && line.ends_with(']') {
                in_section = true;
                continue;
            }

            if in_section {
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                if key.trim() == "defaults" {
                    defaults = Some(value.trim().to_string());
                }
            }
        }

        Self { defaults }
    }

    fn merge_configs(base: Self, overlay: Self) -> Self {
        Self {
            defaults: overlay.defaults.or(base.defaults),
        }
    }

    /// Insert the configured defaults right after the program name, so
    /// explicit command-line arguments parsed later take precedence
    pub fn process_args(&self, args: Vec<String>) -> Result<Vec<String>> {
        let Some(defaults) = &self.defaults else {
            return Ok(args);
        };

        let default_args = shell_words::split(defaults)
            .context("Invalid defaults: failed to parse arguments")?;

        let mut args = args.into_iter();
        let mut result = Vec::with_capacity(default_args.len() + args.len());
        result.extend(args.next());
        result.extend(default_args);
        result.extend(args);
        Ok(result)
    }

    /// Print where configuration is searched for and what is active
    pub fn show_config() {
        println!("Configuration precedence: CLI > project .reqtracerc > user config > defaults\n");

        let project_config_path = Self::find_project_config();
        let user_config_paths = Self::get_user_config_paths();
        let user_config_path = user_config_paths.iter().find(|p| p.exists());

        match Self::load() {
            Ok(merged) => {
                if project_config_path.is_none() && user_config_path.is_none() {
                    println!("No configuration files found. Using defaults.");
                } else {
                    println!("Configuration loaded from:");
                    if let Some(path) = &project_config_path {
                        println!("  Project: {}", path.display());
                    }
                    if let Some(path) = user_config_path {
                        println!("  User: {}", path.display());
                    }
                }

                if let Some(defaults) = &merged.defaults {
                    println!("\nActive defaults:");
                    println!("  defaults = {}", defaults);
                }
            }
            Err(e) => {
                eprintln!("Error loading configuration: {:#}", e);
            }
        }

        println!("\nConfiguration search locations (in precedence order):");
        match &project_config_path {
            Some(path) => println!("  1. Project: {} (found)", path.display()),
            None => println!("  1. Project: .reqtracerc (searched up directory tree, not found)"),
        }
        for (i, path) in user_config_paths.iter().enumerate() {
            let status = if path.exists() { "(found)" } else { "(not found)" };
            println!("  {}. User: {} {}", i + 2, path.display(), status);
        }

        if project_config_path.is_none() && user_config_path.is_none() {
            println!("\nExample configuration file (.reqtracerc):");
            println!();
            println!("# Default arguments applied to every reqtrace run");
            println!("defaults = --threads 8 --compact --stats");
        }
    }
}

/// Value given to `--config-file`, as a separate or `=` joined argument
pub fn extract_config_file_arg(args: &[String]) -> Option<String> {
    args.iter().enumerate().find_map(|(i, arg)| {
        if arg == "--config-file" {
            args.get(i + 1).cloned()
        } else {
            arg.strip_prefix("--config-file=").map(str::to_string)
        }
    })
}
