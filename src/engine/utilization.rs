// ==========================================
// 排产仿真快照分析 - 设备稼动率
// ==========================================
// 输入: CAPA_ALLOCATION_INFO (+ RES_MASTER)
// 输出: 资源组 / 组内资源 的产能构成及占比，按分配占比降序
// ==========================================

use crate::domain::{CapaAllocation, CapaBreakdown, CapaUtilization, ResourceMaster};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// RES_MASTER 无对应名称时的占位
pub const UNKNOWN_RES_NAME: &str = "Unknown";

/// 行过滤条件；None 表示不限制
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapaFilter {
    pub target_type: Option<String>,
    pub capa_type: Option<String>,
}

impl CapaFilter {
    pub fn new(target_type: &str, capa_type: &str) -> Self {
        Self {
            target_type: Some(target_type.to_string()),
            capa_type: Some(capa_type.to_string()),
        }
    }

    pub fn accepts(&self, row: &CapaAllocation) -> bool {
        self.target_type.as_deref().map_or(true, |t| row.target_type == t)
            && self.capa_type.as_deref().map_or(true, |c| row.capa_type == c)
    }
}

/// 标准视图: (Resource, Time) / (Resource, Quantity) / (AddResource, Time)
pub fn standard_filters() -> Vec<CapaFilter> {
    vec![
        CapaFilter::new("Resource", "Time"),
        CapaFilter::new("Resource", "Quantity"),
        CapaFilter::new("AddResource", "Time"),
    ]
}

/// 按标签汇总并排序（分配占比降序，相同时按标签升序）
fn aggregate<'a, I>(rows: I) -> Vec<CapaUtilization>
where
    I: IntoIterator<Item = (String, &'a CapaBreakdown)>,
{
    let mut sums: BTreeMap<String, CapaBreakdown> = BTreeMap::new();
    for (label, capa) in rows {
        sums.entry(label).or_default().add(capa);
    }

    let mut result: Vec<CapaUtilization> = sums
        .into_iter()
        .map(|(label, capa)| CapaUtilization::from_breakdown(label, capa))
        .collect();
    result.sort_by(|a, b| {
        b.allocation_pct
            .total_cmp(&a.allocation_pct)
            .then_with(|| a.label.cmp(&b.label))
    });
    result
}

/// 资源组稼动率
pub fn group_utilization(rows: &[CapaAllocation], filter: &CapaFilter) -> Vec<CapaUtilization> {
    let result = aggregate(
        rows.iter()
            .filter(|r| filter.accepts(r))
            .map(|r| (r.res_group_id.clone(), &r.capa)),
    );
    debug!(?filter, groups = result.len(), "资源组稼动率汇总完成");
    result
}

/// 组内各资源稼动率，标签为 "RES_NAME_TARGET_ID"
pub fn resource_utilization(
    rows: &[CapaAllocation],
    res_group_id: &str,
    masters: &[ResourceMaster],
) -> Vec<CapaUtilization> {
    let names: HashMap<&str, &str> = masters
        .iter()
        .filter_map(|m| m.res_name.as_deref().map(|n| (m.res_id.as_str(), n)))
        .collect();

    aggregate(
        rows.iter()
            .filter(|r| r.res_group_id == res_group_id)
            .map(|r| {
                let name = names
                    .get(r.target_id.as_str())
                    .copied()
                    .unwrap_or(UNKNOWN_RES_NAME);
                (format!("{}_{}", name, r.target_id), &r.capa)
            }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(group: &str, target: &str, target_type: &str, total: f64, alloc: f64) -> CapaAllocation {
        CapaAllocation {
            res_group_id: group.to_string(),
            target_id: target.to_string(),
            target_type: target_type.to_string(),
            capa_type: "Time".to_string(),
            capa: CapaBreakdown {
                total_capa: total,
                allocation_capa: alloc,
                remain_capa: total - alloc,
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_group_utilization_sorted_by_allocation() {
        let rows = vec![
            row("G1", "R1", "Resource", 100.0, 20.0),
            row("G1", "R2", "Resource", 100.0, 40.0),
            row("G2", "R3", "Resource", 50.0, 45.0),
            row("G3", "R4", "AddResource", 10.0, 10.0),
        ];

        let result = group_utilization(&rows, &CapaFilter::new("Resource", "Time"));
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].label, "G2");
        assert!((result[0].allocation_pct - 90.0).abs() < 1e-9);
        assert_eq!(result[1].label, "G1");
        assert!((result[1].allocation_pct - 30.0).abs() < 1e-9);
        assert!((result[1].remain_pct - 70.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_total_capa_yields_zero_pct() {
        let rows = vec![row("G1", "R1", "Resource", 0.0, 0.0)];
        let result = group_utilization(&rows, &CapaFilter::default());
        assert_eq!(result[0].allocation_pct, 0.0);
    }

    #[test]
    fn test_resource_utilization_labels() {
        let rows = vec![
            row("G1", "R1", "Resource", 100.0, 20.0),
            row("G1", "R2", "Resource", 100.0, 80.0),
            row("G2", "R3", "Resource", 100.0, 50.0),
        ];
        let masters = vec![ResourceMaster {
            res_id: "R1".into(),
            res_name: Some("Press".into()),
        }];

        let result = resource_utilization(&rows, "G1", &masters);
        let labels: Vec<&str> = result.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["Unknown_R2", "Press_R1"]);
    }
}
