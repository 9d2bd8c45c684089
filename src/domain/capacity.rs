// ==========================================
// 排产仿真快照分析 - 设备产能实体
// ==========================================
// 来源快照: CAPA_ALLOCATION_INFO / RES_MASTER
// ==========================================

use serde::{Deserialize, Serialize};

/// 产能分配明细（一行 = 一个目标资源在一个时段的产能拆分）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapaAllocation {
    pub res_group_id: String,
    pub target_id: String,
    pub target_type: String,
    pub capa_type: String,
    pub capa: CapaBreakdown,
}

/// 产能拆分: 总产能 = 停机 + 分配 + PM + 换型 + 剩余
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CapaBreakdown {
    pub total_capa: f64,
    pub off_time_capa: f64,
    pub allocation_capa: f64,
    pub pm_capa: f64,
    pub setup_capa: f64,
    pub remain_capa: f64,
}

impl CapaBreakdown {
    pub fn add(&mut self, other: &CapaBreakdown) {
        self.total_capa += other.total_capa;
        self.off_time_capa += other.off_time_capa;
        self.allocation_capa += other.allocation_capa;
        self.pm_capa += other.pm_capa;
        self.setup_capa += other.setup_capa;
        self.remain_capa += other.remain_capa;
    }

    /// 占总产能百分比，总产能为 0 时返回 0
    pub fn pct(&self, part: f64) -> f64 {
        if self.total_capa == 0.0 {
            0.0
        } else {
            part / self.total_capa * 100.0
        }
    }
}

/// 设备主数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceMaster {
    pub res_id: String,
    pub res_name: Option<String>,
}

/// 稼动率汇总行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapaUtilization {
    /// 分组标签 (RES_GROUP_ID 或 RES_NAME_TARGET_ID)
    pub label: String,
    pub capa: CapaBreakdown,
    pub allocation_pct: f64,
    pub setup_pct: f64,
    pub pm_pct: f64,
    pub off_time_pct: f64,
    pub remain_pct: f64,
}

impl CapaUtilization {
    pub fn from_breakdown(label: String, capa: CapaBreakdown) -> Self {
        Self {
            allocation_pct: capa.pct(capa.allocation_capa),
            setup_pct: capa.pct(capa.setup_capa),
            pm_pct: capa.pct(capa.pm_capa),
            off_time_pct: capa.pct(capa.off_time_capa),
            remain_pct: capa.pct(capa.remain_capa),
            label,
            capa,
        }
    }
}
