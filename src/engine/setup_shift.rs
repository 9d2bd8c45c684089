// ==========================================
// 排产仿真快照分析 - 班次换型次数
// ==========================================
// 输入: FACTORY_CONFIG (工厂开工时刻) + RES_PLAN (Setup 行)
// 输出: (资源组, 资源, 计划日, 班次) → 换型次数
// ==========================================
// 班次划分: 班长 = 24h / 班次数
//           白班 = (开工时刻, 开工时刻 + 班长]，其余为夜班，跨零点按 24h 取模
// ==========================================

use crate::domain::{FactoryConfig, ScheduledOperation, Shift, ShiftSetupCount};
use chrono::NaiveTime;
use std::collections::BTreeMap;
use std::num::NonZeroU32;
use tracing::{info, instrument, warn};

const SECONDS_PER_DAY: i64 = 86_400;

/// 班次窗口
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftWindow {
    pub factory_start: NaiveTime,
    pub shift_seconds: i64,
}

impl ShiftWindow {
    pub fn new(factory_start: NaiveTime, shift_count: NonZeroU32) -> Self {
        Self {
            factory_start,
            shift_seconds: SECONDS_PER_DAY / i64::from(shift_count.get()),
        }
    }

    /// 白班结束时刻
    pub fn day_end(&self) -> NaiveTime {
        self.factory_start + chrono::Duration::seconds(self.shift_seconds)
    }

    pub fn classify(&self, time: NaiveTime) -> Shift {
        let offset = time
            .signed_duration_since(self.factory_start)
            .num_seconds()
            .rem_euclid(SECONDS_PER_DAY);
        if offset > 0 && offset <= self.shift_seconds {
            Shift::Day
        } else {
            Shift::Night
        }
    }
}

pub struct ShiftSetupCounter {
    shift_count: NonZeroU32,
}

impl ShiftSetupCounter {
    /// 班次数为 0 时返回 None，由调用方报错
    pub fn new(shift_count: u32) -> Option<Self> {
        NonZeroU32::new(shift_count).map(|shift_count| Self { shift_count })
    }

    /// 从工厂配置得到班次窗口；无开工时刻时返回 None
    pub fn window(&self, config: Option<&FactoryConfig>) -> Option<ShiftWindow> {
        config
            .and_then(|c| c.factory_start_time)
            .map(|start| ShiftWindow::new(start, self.shift_count))
    }

    /// 按结束时刻归班统计 Setup 次数
    ///
    /// 无班次窗口时无法归班，返回空；无结束时刻的 Setup 行不计
    #[instrument(skip_all, fields(operations = operations.len()))]
    pub fn count(
        &self,
        config: Option<&FactoryConfig>,
        operations: &[ScheduledOperation],
    ) -> Vec<ShiftSetupCount> {
        let Some(window) = self.window(config) else {
            warn!("FACTORY_CONFIG 无有效开工时刻，无法划分班次");
            return Vec::new();
        };

        let mut counts: BTreeMap<(String, String, chrono::NaiveDate, Shift), usize> =
            BTreeMap::new();
        let mut skipped = 0usize;
        for op in operations.iter().filter(|op| op.is_setup()) {
            let Some(end) = op.end_datetime else {
                skipped += 1;
                continue;
            };
            let shift = window.classify(end.time());
            *counts
                .entry((op.res_group_id.clone(), op.res_id.clone(), op.plan_date, shift))
                .or_insert(0) += 1;
        }

        info!(
            factory_start = %window.factory_start,
            day_end = %window.day_end(),
            groups = counts.len(),
            skipped,
            "班次换型统计完成"
        );

        counts
            .into_iter()
            .map(|((res_group_id, res_id, plan_date, shift), count)| ShiftSetupCount {
                res_group_id,
                res_id,
                plan_date,
                shift,
                count,
            })
            .collect()
    }
}
