use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::BlogError;

/// 默认每页条数
fn default_page_size() -> usize {
    5
}

fn default_unarchived_label() -> String {
    "未归档".to_string()
}

fn default_pending_label() -> String {
    "待定".to_string()
}

fn default_active_offset() -> f64 {
    120.0
}

fn default_jump_gap() -> f64 {
    16.0
}

/// 滚动同步参数 - 顶部导航高度由布局层实时提供，不在此配置
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScrollConfig {
    /// 判断当前月份时加在 scrollY 上的固定偏移
    #[serde(default = "default_active_offset")]
    pub active_offset: f64,
    /// 跳转时在导航高度之外额外留出的间距
    #[serde(default = "default_jump_gap")]
    pub jump_gap: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            active_offset: default_active_offset(),
            jump_gap: default_jump_gap(),
        }
    }
}

/// 视图配置 - 文章列表与归档页共用
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ViewConfig {
    /// 文章列表每页条数
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// 无法解析日期的文章所在的哨兵年份
    #[serde(default = "default_unarchived_label")]
    pub unarchived_label: String,
    /// 文章没有任何日期字段时的展示文本
    #[serde(default = "default_pending_label")]
    pub pending_label: String,
    #[serde(default)]
    pub scroll: ScrollConfig,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            unarchived_label: default_unarchived_label(),
            pending_label: default_pending_label(),
            scroll: ScrollConfig::default(),
        }
    }
}

impl ViewConfig {
    /// 从 JSON 读取配置并校验，缺省字段使用默认值
    pub fn from_json(json: &str) -> Result<Self, BlogError> {
        let config: ViewConfig = serde_json::from_str(json).map_err(|e| BlogError::json("配置", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), BlogError> {
        if self.page_size == 0 {
            warn!("拒绝配置: pageSize 为 0");
            return Err(BlogError::InvalidConfig("pageSize 必须大于 0".to_string()));
        }

        for (name, value) in [
            ("scroll.activeOffset", self.scroll.active_offset),
            ("scroll.jumpGap", self.scroll.jump_gap),
        ] {
            if !value.is_finite() || value < 0.0 {
                warn!(field = name, value, "拒绝配置: 偏移量非法");
                return Err(BlogError::InvalidConfig(format!("{} 必须是非负数: {}", name, value)));
            }
        }

        Ok(())
    }
}
