// Linkshelf platform paths
// Resolves where the settings file and the SQLite database live on each OS.
//
//   Linux:   $XDG_CONFIG_HOME/linkshelf, $XDG_DATA_HOME/linkshelf
//   macOS:   ~/Library/Application Support/Linkshelf (both)
//   Windows: %APPDATA%\Linkshelf (both)

use std::env;
use std::path::PathBuf;

fn home_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
}

/// Returns the directory holding `settings.json`.
pub fn get_config_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        match env::var("XDG_CONFIG_HOME") {
            Ok(xdg) => PathBuf::from(xdg).join("linkshelf"),
            Err(_) => home_dir().join(".config").join("linkshelf"),
        }
    }
    #[cfg(target_os = "macos")]
    {
        home_dir()
            .join("Library")
            .join("Application Support")
            .join("Linkshelf")
    }
    #[cfg(target_os = "windows")]
    {
        match env::var("APPDATA") {
            Ok(appdata) => PathBuf::from(appdata).join("Linkshelf"),
            Err(_) => home_dir().join("AppData").join("Roaming").join("Linkshelf"),
        }
    }
    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    {
        home_dir().join(".linkshelf")
    }
}

/// Returns the directory holding `linkshelf.db`.
pub fn get_data_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        match env::var("XDG_DATA_HOME") {
            Ok(xdg) => PathBuf::from(xdg).join("linkshelf"),
            Err(_) => home_dir().join(".local").join("share").join("linkshelf"),
        }
    }
    #[cfg(not(target_os = "linux"))]
    {
        get_config_dir()
    }
}
