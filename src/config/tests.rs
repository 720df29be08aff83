use super::load::{default_config_path, default_data_dir, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap()
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_encore_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("ENCORE_CONFIG_PATH", "/tmp/encore-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/encore-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("encore")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("encore")
            .join("config.toml")
    );
}

#[test]
fn data_dir_prefers_explicit_setting_then_xdg_data_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_DATA_HOME", "/tmp/xdg-data-home");

    let s = Settings::default();
    assert_eq!(
        s.data_dir(),
        std::path::PathBuf::from("/tmp/xdg-data-home").join("encore")
    );

    let s = Settings {
        data_dir: Some("/srv/music".into()),
        ..Settings::default()
    };
    assert_eq!(s.data_dir(), std::path::PathBuf::from("/srv/music"));
}

#[test]
fn default_data_dir_falls_back_to_home_local_share() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_DATA_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    assert_eq!(
        default_data_dir().unwrap(),
        std::path::PathBuf::from("/tmp/home-dir/.local/share/encore")
    );
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
data_dir = "/tmp/encore-data"

[library]
import_folder_name = "Inbox"
follow_links = false
import_bucket = "Loose Tracks"

[watch]
enabled = false
coalesce_events = true

[prefs]
bookmarks_key = "Folders"

[log]
level = "debug"

[ui]
header_text = "hello"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("ENCORE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("ENCORE__WATCH__ENABLED");

    let s = Settings::load().unwrap();
    assert_eq!(s.data_dir, Some(std::path::PathBuf::from("/tmp/encore-data")));
    assert_eq!(s.library.import_folder_name, "Inbox");
    assert!(!s.library.follow_links);
    assert_eq!(s.library.import_bucket, "Loose Tracks");
    assert_eq!(s.library.library_file, "library.json");
    assert!(!s.watch.enabled);
    assert!(s.watch.coalesce_events);
    assert_eq!(s.prefs.bookmarks_key, "Folders");
    assert_eq!(s.prefs.file, "prefs.toml");
    assert_eq!(s.log.level, "debug");
    assert_eq!(s.ui.header_text, "hello");
    assert!(s.validate().is_ok());
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[watch]
enabled = true
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("ENCORE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("ENCORE__WATCH__ENABLED", "false");

    let s = Settings::load().unwrap();
    assert!(!s.watch.enabled);
}

#[test]
fn validate_rejects_empty_names() {
    let mut s = Settings::default();
    assert!(s.validate().is_ok());

    s.library.import_folder_name = "  ".into();
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.prefs.bookmarks_key = String::new();
    assert!(s.validate().is_err());
}
