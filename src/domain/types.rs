// ==========================================
// 排产仿真快照分析 - 领域类型定义
// ==========================================
// 取值与仿真引擎输出快照中的编码保持一致
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 资源分配类型 (Allocation Type)
// ==========================================
// RES_PLAN.ALLOCATION_TYPE
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AllocationType {
    Allocate,      // 生产分配
    Setup,         // 换型
    Other(String), // 其他 (PM / OffTime 等，不参与换型分析)
}

impl AllocationType {
    /// 从快照编码解析（未知编码保留原文）
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "Allocate" => AllocationType::Allocate,
            "Setup" => AllocationType::Setup,
            other => AllocationType::Other(other.to_string()),
        }
    }

    /// 是否参与换型分析
    pub fn is_transition_relevant(&self) -> bool {
        matches!(self, AllocationType::Allocate | AllocationType::Setup)
    }
}

impl fmt::Display for AllocationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocationType::Allocate => write!(f, "Allocate"),
            AllocationType::Setup => write!(f, "Setup"),
            AllocationType::Other(code) => write!(f, "{}", code),
        }
    }
}

// ==========================================
// 缺量原因 (Short Reason)
// ==========================================
// SHORT_LOG.SHORT_REASON
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ShortReason {
    NoOpResourceInfo,       // 工序无可用设备
    NoBwBomPathShort,       // BOM 无法展开到投入
    LackOfResourceCapacity, // 设备产能不足
    RemainingLots,          // 计划期内剩余未生产
    Other(String),          // 未归类
}

impl ShortReason {
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "NoOpResourceInfo" => ShortReason::NoOpResourceInfo,
            "NoBwBomPathShort" => ShortReason::NoBwBomPathShort,
            "LackOfResourceCapacity" => ShortReason::LackOfResourceCapacity,
            "RemainingLots" => ShortReason::RemainingLots,
            other => ShortReason::Other(other.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            ShortReason::NoOpResourceInfo => "NoOpResourceInfo",
            ShortReason::NoBwBomPathShort => "NoBwBomPathShort",
            ShortReason::LackOfResourceCapacity => "LackOfResourceCapacity",
            ShortReason::RemainingLots => "RemainingLots",
            ShortReason::Other(code) => code,
        }
    }
}

impl fmt::Display for ShortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ==========================================
// 班次 (Shift)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Shift {
    Day,   // 白班
    Night, // 夜班
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shift::Day => write!(f, "DAY"),
            Shift::Night => write!(f, "NIGHT"),
        }
    }
}

// ==========================================
// 时间粒度 (Time Grain)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeGrain {
    Day,
    Week, // 周一为周起始
    Month,
}

impl fmt::Display for TimeGrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeGrain::Day => write!(f, "DAY"),
            TimeGrain::Week => write!(f, "WEEK"),
            TimeGrain::Month => write!(f, "MONTH"),
        }
    }
}

impl std::str::FromStr for TimeGrain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" | "daily" => Ok(TimeGrain::Day),
            "week" | "weekly" => Ok(TimeGrain::Week),
            "month" | "monthly" => Ok(TimeGrain::Month),
            other => Err(format!("未知时间粒度: {}", other)),
        }
    }
}
