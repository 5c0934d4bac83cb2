//! 主题：light/dark 调色板与用户偏好持久化
//!
//! 偏好存在 config/theme.toml（仅一个 theme 键），启动时读入，
//! Ctrl+T 切换时写回。读写失败不影响运行，退到配置的默认主题。

use std::path::Path;

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// 偏好文件的默认位置
pub const THEME_FILE: &str = "config/theme.toml";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeMode {
    Light,
    Dark,
}

/// 当前主题：持有模式并给出各语义色
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Theme {
    pub mode: ThemeMode,
}

impl Theme {
    pub fn new(mode: ThemeMode) -> Self {
        Self { mode }
    }

    /// 从配置字符串解析，未知值退到 light
    pub fn from_name(name: &str) -> Self {
        let mode = match name.trim().to_lowercase().as_str() {
            "dark" => ThemeMode::Dark,
            _ => ThemeMode::Light,
        };
        Self { mode }
    }

    pub fn toggle(&mut self) {
        self.mode = match self.mode {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        };
    }

    pub fn border(&self) -> Color {
        match self.mode {
            ThemeMode::Light => Color::Blue,
            ThemeMode::Dark => Color::Magenta,
        }
    }

    pub fn user(&self) -> Color {
        Color::Cyan
    }

    pub fn assistant(&self) -> Color {
        Color::Green
    }

    pub fn error(&self) -> Color {
        Color::Red
    }

    pub fn dim(&self) -> Color {
        Color::DarkGray
    }

    pub fn highlight(&self) -> Color {
        Color::Yellow
    }
}

/// 偏好文件内容（toml）
#[derive(Debug, Serialize, Deserialize)]
struct ThemePreference {
    theme: ThemeMode,
}

/// 读取持久化的主题偏好；文件缺失或损坏时返回 None
pub fn load_preference(path: &Path) -> Option<ThemeMode> {
    let raw = std::fs::read_to_string(path).ok()?;
    match toml::from_str::<ThemePreference>(&raw) {
        Ok(pref) => Some(pref.theme),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring malformed theme file");
            None
        }
    }
}

/// 写回主题偏好，父目录不存在时先创建
pub fn save_preference(path: &Path, mode: ThemeMode) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let body = toml::to_string(&ThemePreference { theme: mode })
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    std::fs::write(path, body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preference_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("theme.toml");
        save_preference(&path, ThemeMode::Dark).unwrap();
        assert_eq!(load_preference(&path), Some(ThemeMode::Dark));
    }

    #[test]
    fn test_missing_or_malformed_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_preference(&dir.path().join("absent.toml")), None);

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "theme = 42").unwrap();
        assert_eq!(load_preference(&bad), None);
    }

    #[test]
    fn test_unknown_name_falls_back_to_light() {
        assert_eq!(Theme::from_name("solarized").mode, ThemeMode::Light);
        assert_eq!(Theme::from_name("DARK").mode, ThemeMode::Dark);
    }

    #[test]
    fn test_toggle_flips_mode() {
        let mut theme = Theme::from_name("light");
        theme.toggle();
        assert_eq!(theme.mode, ThemeMode::Dark);
        theme.toggle();
        assert_eq!(theme.mode, ThemeMode::Light);
    }
}
