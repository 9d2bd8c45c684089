// ==========================================
// 排产仿真快照分析 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写
// 存储: config.json (key → value 字符串)，缺省项回退到默认值
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::i18n::{normalize_locale, DEFAULT_LOCALE};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};

/// 配置目录名
pub const APP_DIR_NAME: &str = "aps-snapshot-analysis";

/// 配置键
pub mod config_keys {
    /// 缺量原因文案语言 (en / ko / zh-CN)
    pub const LOCALE: &str = "locale";
    /// 每天班次数
    pub const SHIFT_COUNT: &str = "shift_count";
    /// 重复换型阈值
    pub const REPEAT_SETUP_THRESHOLD: &str = "repeat_setup_threshold";
    /// 安全库存需求 ID 前缀
    pub const SAFETY_STOCK_PREFIX: &str = "safety_stock_prefix";
}

/// 分析参数（由 ConfigManager 解析后传给各引擎）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub locale: String,
    pub shift_count: u32,
    pub repeat_setup_threshold: usize,
    pub safety_stock_prefix: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            locale: DEFAULT_LOCALE.to_string(),
            shift_count: 2,
            repeat_setup_threshold: 2,
            safety_stock_prefix: "SafetyStock".to_string(),
        }
    }
}

/// 默认配置目录: <系统配置目录>/aps-snapshot-analysis
pub fn default_config_dir() -> ConfigResult<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .ok_or(ConfigError::NoConfigDir)
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl ConfigManager {
    /// 从配置文件加载；文件不存在时为空配置
    pub fn new<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref().to_path_buf();
        let values = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            serde_json::from_str(&raw)?
        } else {
            debug!(path = %path.display(), "配置文件不存在，使用默认配置");
            BTreeMap::new()
        };

        Ok(Self { path, values })
    }

    /// 默认位置的配置
    pub fn open_default() -> ConfigResult<Self> {
        Self::new(default_config_dir()?.join("config.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get_config_value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    fn get_config_or_default(&self, key: &str, default: &str) -> String {
        self.get_config_value(key).unwrap_or(default).to_string()
    }

    fn parse_config<T: FromStr>(&self, key: &str, default: T) -> ConfigResult<T>
    where
        T::Err: std::fmt::Display,
    {
        match self.get_config_value(key) {
            None => Ok(default),
            Some(value) => value.trim().parse::<T>().map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                value: value.to_string(),
                message: e.to_string(),
            }),
        }
    }

    /// 覆写配置（内存中，需调用 save 持久化）
    pub fn set_config_value(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    pub fn save(&self) -> ConfigResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&self.values)?)?;
        info!(path = %self.path.display(), keys = self.values.len(), "配置已保存");
        Ok(())
    }

    /// 所有配置的快照（JSON）
    pub fn get_config_snapshot(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string(&self.values)?)
    }

    /// 从快照恢复，返回恢复的配置项数量
    pub fn restore_config_from_snapshot(&mut self, snapshot_json: &str) -> ConfigResult<usize> {
        let restored: BTreeMap<String, String> = serde_json::from_str(snapshot_json)?;
        let count = restored.len();
        self.values.extend(restored);
        Ok(count)
    }

    // ===== 分析参数 =====

    /// 未知语言回退为 en
    pub fn get_locale(&self) -> String {
        normalize_locale(&self.get_config_or_default(config_keys::LOCALE, DEFAULT_LOCALE))
    }

    pub fn get_shift_count(&self) -> ConfigResult<u32> {
        let count: u32 = self.parse_config(config_keys::SHIFT_COUNT, 2)?;
        if count == 0 {
            return Err(ConfigError::InvalidValue {
                key: config_keys::SHIFT_COUNT.to_string(),
                value: count.to_string(),
                message: "班次数必须大于 0".to_string(),
            });
        }
        Ok(count)
    }

    pub fn get_repeat_setup_threshold(&self) -> ConfigResult<usize> {
        self.parse_config(config_keys::REPEAT_SETUP_THRESHOLD, 2)
    }

    pub fn get_safety_stock_prefix(&self) -> String {
        self.get_config_or_default(config_keys::SAFETY_STOCK_PREFIX, "SafetyStock")
    }

    /// 汇总为 AnalysisConfig
    pub fn analysis_config(&self) -> ConfigResult<AnalysisConfig> {
        Ok(AnalysisConfig {
            locale: self.get_locale(),
            shift_count: self.get_shift_count()?,
            repeat_setup_threshold: self.get_repeat_setup_threshold()?,
            safety_stock_prefix: self.get_safety_stock_prefix(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_when_file_missing() {
        let dir = TempDir::new().unwrap();
        let manager = ConfigManager::new(dir.path().join("config.json")).unwrap();
        assert_eq!(manager.analysis_config().unwrap(), AnalysisConfig::default());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut manager = ConfigManager::new(&path).unwrap();
        manager.set_config_value(config_keys::LOCALE, "ko");
        manager.set_config_value(config_keys::SHIFT_COUNT, "3");
        manager.save().unwrap();

        let reloaded = ConfigManager::new(&path).unwrap();
        let config = reloaded.analysis_config().unwrap();
        assert_eq!(config.locale, "ko");
        assert_eq!(config.shift_count, 3);
        assert_eq!(config.repeat_setup_threshold, 2);
    }

    #[test]
    fn test_invalid_shift_count() {
        let dir = TempDir::new().unwrap();
        let mut manager = ConfigManager::new(dir.path().join("config.json")).unwrap();

        manager.set_config_value(config_keys::SHIFT_COUNT, "two");
        assert!(matches!(
            manager.get_shift_count(),
            Err(ConfigError::InvalidValue { .. })
        ));

        manager.set_config_value(config_keys::SHIFT_COUNT, "0");
        assert!(manager.get_shift_count().is_err());
    }

    #[test]
    fn test_snapshot_restore() {
        let dir = TempDir::new().unwrap();
        let mut source = ConfigManager::new(dir.path().join("a.json")).unwrap();
        source.set_config_value(config_keys::SAFETY_STOCK_PREFIX, "SS_");
        let snapshot = source.get_config_snapshot().unwrap();

        let mut target = ConfigManager::new(dir.path().join("b.json")).unwrap();
        assert_eq!(target.restore_config_from_snapshot(&snapshot).unwrap(), 1);
        assert_eq!(target.get_safety_stock_prefix(), "SS_");
    }
}
