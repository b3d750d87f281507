//! Configuration constants and profile loading for scanline
//!
//! Connection settings live in an INI profile file, one section per profile:
//!
//! ```ini
//! [default]
//! server = http://127.0.0.1:5001
//! user = admin
//! password = secret
//! insecure = false
//! poll_secs = 30
//! export_dir = ~/Downloads
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use ini::Ini;

use crate::cmd_args::CommandLineArgs;

/// Default profile file path for scanline
pub const DEFAULT_PROFILE_PATH: &str = "~/.scanline/profile";

/// Environment variable name for overriding the profile path
pub const PROFILE_PATH_ENV_VAR: &str = "SCANLINE_PROFILE_PATH";

/// Default preferences file (theme)
pub const DEFAULT_PREFS_PATH: &str = "~/.scanline/prefs";

/// Environment variable name for overriding the preferences path
pub const PREFS_PATH_ENV_VAR: &str = "SCANLINE_PREFS_PATH";

/// Log file used while the console owns the terminal
pub const DEFAULT_LOG_PATH: &str = "~/.scanline/scanline.log";

/// Environment variable holding the tracing filter
pub const LOG_LEVEL_ENV_VAR: &str = "SCANLINE_LOG_LEVEL";

/// Server used when no profile says otherwise
pub const DEFAULT_SERVER: &str = "http://127.0.0.1:5001";

fn env_or_default(var: &str, default: &str) -> String {
    std::env::var_os(var)
        .and_then(|val| val.into_string().ok())
        .unwrap_or_else(|| default.to_string())
}

/// Get the profile file path, checking environment variable first, then falling back to default
pub fn get_profile_path() -> String {
    env_or_default(PROFILE_PATH_ENV_VAR, DEFAULT_PROFILE_PATH)
}

/// Get the preferences file path, checking environment variable first
pub fn get_prefs_path() -> String {
    env_or_default(PREFS_PATH_ENV_VAR, DEFAULT_PREFS_PATH)
}

/// Expand `~` and environment variables in a configured path
pub fn expand_path(path: &str) -> PathBuf {
    match shellexpand::full(path) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => PathBuf::from(shellexpand::tilde(path).as_ref()),
    }
}

/// Connection settings for one server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleProfile {
    pub name: String,
    pub server: String,
    pub user: Option<String>,
    pub password: Option<String>,
    /// Skip TLS certificate verification
    pub insecure: bool,
    /// Automatic refresh interval; `None` disables polling
    pub poll_secs: Option<u64>,
    pub export_dir: Option<PathBuf>,
}

impl Default for ConsoleProfile {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            server: DEFAULT_SERVER.to_string(),
            user: None,
            password: None,
            insecure: false,
            poll_secs: None,
            export_dir: None,
        }
    }
}

impl ConsoleProfile {
    /// Directory exports are written to, the working directory by default
    pub fn export_dir(&self) -> PathBuf {
        self.export_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Apply command line overrides on top of the file values
    pub fn with_overrides(mut self, args: &CommandLineArgs) -> Self {
        if let Some(server) = args.server() {
            self.server = server.to_string();
        }
        if let Some(poll_secs) = args.poll_secs() {
            self.poll_secs = if poll_secs == 0 { None } else { Some(poll_secs) };
        }
        if let Some(dir) = args.export_dir() {
            self.export_dir = Some(dir.to_path_buf());
        }
        self
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Profile store backed by an INI file
#[derive(Debug, Clone)]
pub struct IniProfileStore {
    path: PathBuf,
}

impl IniProfileStore {
    pub fn new(path: &str) -> Self {
        Self {
            path: expand_path(path),
        }
    }

    /// Look up a profile by section name; `Ok(None)` when the file or the
    /// section does not exist
    pub fn get_profile(&self, name: &str) -> Result<Option<ConsoleProfile>> {
        if !self.path.exists() {
            tracing::debug!("Profile file {} does not exist", self.path.display());
            return Ok(None);
        }

        let ini = Ini::load_from_file(&self.path)
            .with_context(|| format!("Failed to read profile file {}", self.path.display()))?;
        let Some(section) = ini.section(Some(name)) else {
            return Ok(None);
        };

        let mut profile = ConsoleProfile {
            name: name.to_string(),
            ..ConsoleProfile::default()
        };
        if let Some(server) = section.get("server") {
            profile.server = server.trim().to_string();
        }
        profile.user = section.get("user").map(|v| v.trim().to_string());
        profile.password = section.get("password").map(str::to_string);
        profile.insecure = section.get("insecure").is_some_and(parse_bool);
        if let Some(secs) = section.get("poll_secs") {
            let secs: u64 = secs
                .trim()
                .parse()
                .with_context(|| format!("Invalid poll_secs '{secs}' in profile '{name}'"))?;
            profile.poll_secs = (secs > 0).then_some(secs);
        }
        profile.export_dir = section.get("export_dir").map(|v| expand_path(v.trim()));

        Ok(Some(profile))
    }
}

/// Resolve the profile named on the command line, falling back to defaults
pub fn resolve_profile(args: &CommandLineArgs) -> Result<ConsoleProfile> {
    let profile_path = get_profile_path();
    let name = args.profile();
    tracing::debug!("Loading profile '{}' from '{}'", name, profile_path);

    let profile = match IniProfileStore::new(&profile_path).get_profile(name)? {
        Some(profile) => {
            tracing::debug!("Profile loaded successfully, server: {}", profile.server);
            profile
        }
        None => {
            tracing::debug!("Profile '{}' not found, using defaults", name);
            ConsoleProfile {
                name: name.to_string(),
                ..ConsoleProfile::default()
            }
        }
    };

    Ok(profile.with_overrides(args))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_path() {
        assert_eq!(DEFAULT_PROFILE_PATH, "~/.scanline/profile");
    }

    #[test]
    fn test_env_var_name() {
        assert_eq!(PROFILE_PATH_ENV_VAR, "SCANLINE_PROFILE_PATH");
    }

    #[test]
    fn test_get_profile_path_env_override() {
        // Save current env var state
        let original = std::env::var_os(PROFILE_PATH_ENV_VAR);

        let test_path = "/custom/profile/path";
        std::env::set_var(PROFILE_PATH_ENV_VAR, test_path);
        assert_eq!(get_profile_path(), test_path);

        std::env::remove_var(PROFILE_PATH_ENV_VAR);
        assert_eq!(get_profile_path(), DEFAULT_PROFILE_PATH);

        // Restore original state
        if let Some(val) = original {
            std::env::set_var(PROFILE_PATH_ENV_VAR, val);
        }
    }

    #[test]
    fn test_load_profile_from_ini() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile");
        std::fs::write(
            &path,
            "[default]\nserver = http://localhost:5001\n\n\
             [prod]\nserver = https://sf.example.com\nuser = admin\npassword = s3cret\n\
             insecure = yes\npoll_secs = 15\nexport_dir = /tmp/exports\n",
        )
        .unwrap();

        let store = IniProfileStore::new(path.to_str().unwrap());

        let prod = store.get_profile("prod").unwrap().unwrap();
        assert_eq!(prod.name, "prod");
        assert_eq!(prod.server, "https://sf.example.com");
        assert_eq!(prod.user.as_deref(), Some("admin"));
        assert_eq!(prod.password.as_deref(), Some("s3cret"));
        assert!(prod.insecure);
        assert_eq!(prod.poll_secs, Some(15));
        assert_eq!(prod.export_dir, Some(PathBuf::from("/tmp/exports")));

        let default = store.get_profile("default").unwrap().unwrap();
        assert_eq!(default.server, "http://localhost:5001");
        assert!(!default.insecure);
        assert_eq!(default.poll_secs, None);

        assert!(store.get_profile("missing").unwrap().is_none());
    }

    #[test]
    fn test_missing_profile_file_yields_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = IniProfileStore::new(dir.path().join("nope").to_str().unwrap());
        assert!(store.get_profile("default").unwrap().is_none());
    }

    #[test]
    fn test_invalid_poll_secs_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile");
        std::fs::write(&path, "[default]\npoll_secs = soon\n").unwrap();

        let store = IniProfileStore::new(path.to_str().unwrap());
        assert!(store.get_profile("default").is_err());
    }

    #[test]
    fn test_command_line_overrides_profile() {
        let args = CommandLineArgs::parse_from([
            "program",
            "--server",
            "http://other:8080",
            "--poll-secs",
            "0",
            "--export-dir",
            "/tmp/out",
        ]);
        let profile = ConsoleProfile {
            poll_secs: Some(10),
            ..ConsoleProfile::default()
        }
        .with_overrides(&args);

        assert_eq!(profile.server, "http://other:8080");
        assert_eq!(profile.poll_secs, None);
        assert_eq!(profile.export_dir(), PathBuf::from("/tmp/out"));
    }
}
