// ==========================================
// 电解铝出铝排产系统 - 配置管理器
// ==========================================
// 职责: 配置加载 (JSON)、缺省回填、加载后校验
// 红线: 未通过校验的配置不得交给引擎
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::planner_config::PlannerConfig;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    config: PlannerConfig,
}

impl ConfigManager {
    /// 使用缺省配置
    pub fn new() -> Self {
        Self {
            config: PlannerConfig::default(),
        }
    }

    /// 从 JSON 文件加载
    ///
    /// # 参数
    /// - path: 配置文件路径
    ///
    /// # 返回
    /// - Ok(ConfigManager): 加载并通过校验
    /// - Err(ConfigError): 读取/解析/校验失败
    pub fn from_json_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let manager = Self::from_json_str(&raw)?;
        info!(path = %path.display(), "规划配置已加载");
        Ok(manager)
    }

    /// 从 JSON 字符串加载 (缺省键回填默认值)
    pub fn from_json_str(raw: &str) -> ConfigResult<Self> {
        let config: PlannerConfig = serde_json::from_str(raw)?;
        Self::from_config(config)
    }

    /// 校验已有配置
    pub fn from_config(config: PlannerConfig) -> ConfigResult<Self> {
        config.validate()?;
        debug!(
            grades = config.grades.iter().count(),
            max_batches = config.capacity.max_batches_per_shift,
            "规划配置校验通过"
        );
        Ok(Self { config })
    }

    /// 当前配置
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// 取出配置
    pub fn into_config(self) -> PlannerConfig {
        self.config
    }

    /// 配置快照 (JSON), 用于规划结果留档
    pub fn config_snapshot(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string(&self.config)?)
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
