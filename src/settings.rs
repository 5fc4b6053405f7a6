//! 配置文件（TOML）
//!
//! ```toml
//! automatic_repair = true
//! placement = "end"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::container::ParseOptions;
use crate::splice::Placement;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("{0}")]
    Message(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),

    #[error(transparent)]
    TomlSer(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, SettingsError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// 解析时自动修复流式占位大小
    pub automatic_repair: bool,
    /// `pad` 未指定位置时的默认插入位置
    pub placement: Placement,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            automatic_repair: true,
            placement: Placement::AtEnd,
        }
    }
}

impl Settings {
    /// # Errors
    /// 当配置路径解析或配置文件读取/解析失败时返回错误。
    pub fn load() -> Result<Self> {
        let path = config_path()?;
        Self::load_from(&path)
    }

    /// 文件不存在或为空时返回默认值。
    ///
    /// # Errors
    /// 当配置文件读取或解析失败时返回错误。
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)?;
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        let settings = toml::from_str(&raw)?;
        Ok(settings)
    }

    /// # Errors
    /// 当目录创建或文件写入失败时返回错误。
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = toml::to_string_pretty(self)?;
        fs::write(path, data)?;
        Ok(())
    }

    #[must_use]
    pub const fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            automatic_repair: self.automatic_repair,
        }
    }
}

/// # Errors
/// 当运行环境缺少必要目录环境变量时返回错误。
pub fn config_path() -> Result<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        let base = std::env::var_os("LOCALAPPDATA")
            .or_else(|| std::env::var_os("APPDATA"))
            .ok_or_else(|| SettingsError::Message("LOCALAPPDATA/APPDATA not set".to_string()))?;
        let mut path = PathBuf::from(base);
        path.push("wavsplice");
        path.push("config.toml");
        Ok(path)
    }

    #[cfg(not(target_os = "windows"))]
    {
        let home = std::env::var_os("HOME")
            .ok_or_else(|| SettingsError::Message("HOME not set".to_string()))?;
        let mut path = PathBuf::from(home);
        path.push(".wavsplice");
        path.push("config.toml");
        Ok(path)
    }
}
