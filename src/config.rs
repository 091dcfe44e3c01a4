//! Where things live on disk.

use std::path::PathBuf;

pub const SETTINGS_ENV: &str = "PC_TUNER_SETTINGS";
pub const EXPORT_DIR_ENV: &str = "PC_TUNER_EXPORT_DIR";

const APP_DIR: &str = ".pc-tuner";
const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub settings_path: PathBuf,
    pub export_dir: PathBuf,
}

impl AppConfig {
    /// Resolve from the environment, then the user's home and desktop.
    pub fn from_env() -> Self {
        Self::resolve(
            std::env::var_os(SETTINGS_ENV).map(PathBuf::from),
            std::env::var_os(EXPORT_DIR_ENV).map(PathBuf::from),
            dirs::home_dir(),
            dirs::desktop_dir(),
        )
    }

    fn resolve(
        settings_override: Option<PathBuf>,
        export_override: Option<PathBuf>,
        home: Option<PathBuf>,
        desktop: Option<PathBuf>,
    ) -> Self {
        let home = home.unwrap_or_else(|| PathBuf::from("."));
        let settings_path =
            settings_override.unwrap_or_else(|| home.join(APP_DIR).join(SETTINGS_FILE));
        let export_dir = export_override
            .or(desktop)
            .unwrap_or_else(|| home.clone());
        Self {
            settings_path,
            export_dir,
        }
    }

    pub fn with_settings_path(mut self, path: Option<PathBuf>) -> Self {
        if let Some(p) = path {
            self.settings_path = p;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_live_under_home() {
        let cfg = AppConfig::resolve(None, None, Some(PathBuf::from("/home/u")), None);
        assert_eq!(
            cfg.settings_path,
            PathBuf::from("/home/u").join(".pc-tuner").join("settings.json")
        );
        assert_eq!(cfg.export_dir, PathBuf::from("/home/u"));
    }

    #[test]
    fn desktop_is_preferred_for_exports() {
        let cfg = AppConfig::resolve(
            None,
            None,
            Some(PathBuf::from("/home/u")),
            Some(PathBuf::from("/home/u/Desktop")),
        );
        assert_eq!(cfg.export_dir, PathBuf::from("/home/u/Desktop"));
    }

    #[test]
    fn overrides_win() {
        let cfg = AppConfig::resolve(
            Some(PathBuf::from("/tmp/s.json")),
            Some(PathBuf::from("/tmp/out")),
            Some(PathBuf::from("/home/u")),
            Some(PathBuf::from("/home/u/Desktop")),
        )
        .with_settings_path(Some(PathBuf::from("/cli/s.json")));
        assert_eq!(cfg.settings_path, PathBuf::from("/cli/s.json"));
        assert_eq!(cfg.export_dir, PathBuf::from("/tmp/out"));
    }
}
