// ==========================================
// 排产仿真快照分析 - 换型前品目检测引擎
// ==========================================
// 输入: RES_PLAN (Allocate / Setup)
// 输出: (资源组, 资源, 计划日, FROM_ITEM_ID) → 换型次数
// ==========================================
// 约定: 分区内按 START_DATETIME 升序排列后，Setup 行的 FROM_ITEM_ID
//       取【下一行】的 ITEM_ID（不是上一行）；分区最后一行不标记
// ==========================================

use crate::domain::{PartitionKey, ScheduledOperation, SetupTransitionCount};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

/// 重复换型视图的默认阈值
pub const DEFAULT_REPEAT_THRESHOLD: usize = 2;

/// 已标记的换型行
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledSetup<'a> {
    pub operation: &'a ScheduledOperation,
    pub from_item_id: String,
}

// ==========================================
// SetupTransitionDetector
// ==========================================
pub struct SetupTransitionDetector {
    repeat_threshold: usize,
}

impl Default for SetupTransitionDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl SetupTransitionDetector {
    pub fn new() -> Self {
        Self {
            repeat_threshold: DEFAULT_REPEAT_THRESHOLD,
        }
    }

    pub fn with_repeat_threshold(mut self, threshold: usize) -> Self {
        self.repeat_threshold = threshold;
        self
    }

    pub fn repeat_threshold(&self) -> usize {
        self.repeat_threshold
    }

    /// 过滤 + 分区 + 分区内按开始时间稳定排序
    pub fn partition<'a>(
        &self,
        operations: &'a [ScheduledOperation],
    ) -> BTreeMap<PartitionKey, Vec<&'a ScheduledOperation>> {
        let mut partitions: BTreeMap<PartitionKey, Vec<&ScheduledOperation>> = BTreeMap::new();
        for op in operations
            .iter()
            .filter(|op| op.allocation_type.is_transition_relevant())
        {
            partitions.entry(op.partition_key()).or_default().push(op);
        }

        // 稳定排序: 开始时间相同的行保持输入顺序，无开始时间的行排最后
        for rows in partitions.values_mut() {
            rows.sort_by_key(|op| (op.start_datetime.is_none(), op.start_datetime));
        }
        partitions
    }

    /// 单个已排序分区的换型标记
    ///
    /// 遍历下标 0..len-1：Setup 行取 rows[i + 1] 的 ITEM_ID；
    /// 下一行没有 ITEM_ID 时不标记（FROM_ITEM_ID 为空的行不输出）
    pub fn label_partition<'a>(rows: &[&'a ScheduledOperation]) -> Vec<LabeledSetup<'a>> {
        let mut labeled = Vec::new();
        if rows.len() < 2 {
            return labeled;
        }

        for i in 0..rows.len() - 1 {
            let current = rows[i];
            if !current.is_setup() {
                continue;
            }
            if let Some(next_item) = rows[i + 1].item_id.as_deref() {
                labeled.push(LabeledSetup {
                    operation: current,
                    from_item_id: next_item.to_string(),
                });
            }
        }
        labeled
    }

    /// 换型前品目计数（按键升序）
    #[instrument(skip_all, fields(operations = operations.len()))]
    pub fn detect(&self, operations: &[ScheduledOperation]) -> Vec<SetupTransitionCount> {
        let partitions = self.partition(operations);

        let mut counts: BTreeMap<(PartitionKey, String), usize> = BTreeMap::new();
        for (key, rows) in &partitions {
            let labeled = Self::label_partition(rows);
            debug!(
                res_id = %key.res_id,
                plan_date = %key.plan_date,
                rows = rows.len(),
                setups = labeled.len(),
                "分区换型标记完成"
            );
            for setup in labeled {
                *counts.entry((key.clone(), setup.from_item_id)).or_insert(0) += 1;
            }
        }

        let result: Vec<SetupTransitionCount> = counts
            .into_iter()
            .map(|((key, from_item_id), count)| SetupTransitionCount {
                res_group_id: key.res_group_id,
                res_id: key.res_id,
                plan_date: key.plan_date,
                from_item_id,
                count,
            })
            .collect();

        info!(
            partitions = partitions.len(),
            groups = result.len(),
            "换型前品目统计完成"
        );
        result
    }

    /// 同资源同日同品目换型次数 >= 阈值的组
    pub fn repeated(&self, counts: &[SetupTransitionCount]) -> Vec<SetupTransitionCount> {
        counts
            .iter()
            .filter(|c| c.count >= self.repeat_threshold)
            .cloned()
            .collect()
    }
}
