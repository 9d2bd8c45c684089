// ==========================================
// 排产仿真快照分析 - 目标 vs 产能
// ==========================================
// 输入: TARGET_PLAN + ROUTING_OPER + OPER_RES
// 输出: 品目目标量、可用设备数、平均单件占用与日最大产出
// ==========================================

use crate::domain::{OperResource, RoutingOper, TargetCapa, TargetPlan};
use std::collections::{BTreeMap, HashMap};
use tracing::info;

/// 日最大产出 = 一天秒数 / 平均单件占用秒数
const SECONDS_PER_DAY: f64 = 86_400.0;

type RouteKey = (String, String);

/// 目标计划中的有效产出行: IN_OUT=Out 且工艺路线、工序非空，
/// 且对应 ROUTING_OPER 的 OPER_TYPE=Operation
pub fn operation_targets<'a>(
    targets: &'a [TargetPlan],
    routing_opers: &[RoutingOper],
) -> Vec<&'a TargetPlan> {
    let oper_types: HashMap<RouteKey, &str> = routing_opers
        .iter()
        .filter_map(|r| {
            r.oper_type
                .as_deref()
                .map(|t| ((r.routing_id.clone(), r.oper_id.clone()), t))
        })
        .collect();

    targets
        .iter()
        .filter(|t| t.in_out.trim() == "Out")
        .filter(|t| {
            let (Some(routing), Some(oper)) = (t.routing_id.as_ref(), t.oper_id.as_ref()) else {
                return false;
            };
            oper_types.get(&(routing.clone(), oper.clone())) == Some(&"Operation")
        })
        .collect()
}

/// 按 (品目, 工艺路线, 工序) 汇总目标量并关联设备统计
pub fn target_capa(
    targets: &[TargetPlan],
    routing_opers: &[RoutingOper],
    oper_resources: &[OperResource],
) -> Vec<TargetCapa> {
    let valid = operation_targets(targets, routing_opers);

    let mut target_sums: BTreeMap<(String, String, String), f64> = BTreeMap::new();
    for t in &valid {
        let key = (
            t.item_id.clone(),
            t.routing_id.clone().unwrap_or_default(),
            t.oper_id.clone().unwrap_or_default(),
        );
        *target_sums.entry(key).or_insert(0.0) += t.target_qty;
    }

    // (行数, 非空占用之和, 非空占用个数)
    let mut usage: HashMap<RouteKey, (usize, f64, usize)> = HashMap::new();
    for r in oper_resources {
        let entry = usage
            .entry((r.routing_id.clone(), r.oper_id.clone()))
            .or_insert((0, 0.0, 0));
        entry.0 += 1;
        if let Some(u) = r.usage_per {
            entry.1 += u;
            entry.2 += 1;
        }
    }

    let result: Vec<TargetCapa> = target_sums
        .into_iter()
        .map(|((item_id, routing_id, oper_id), target_qty)| {
            let (res_count, avg_usage_per) = match usage.get(&(routing_id, oper_id)) {
                Some(&(count, sum, n)) if n > 0 => (count, Some(sum / n as f64)),
                Some(&(count, _, _)) => (count, None),
                None => (0, None),
            };
            let daily_max_output = avg_usage_per
                .filter(|avg| *avg != 0.0)
                .map(|avg| SECONDS_PER_DAY / avg);

            TargetCapa {
                item_id,
                target_qty,
                res_count,
                avg_usage_per,
                daily_max_output,
            }
        })
        .collect();

    info!(
        targets = targets.len(),
        valid = valid.len(),
        rows = result.len(),
        "目标产能对比完成"
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(item: &str, in_out: &str, routing: Option<&str>, oper: Option<&str>, qty: f64) -> TargetPlan {
        TargetPlan {
            item_id: item.to_string(),
            in_out: in_out.to_string(),
            routing_id: routing.map(str::to_string),
            oper_id: oper.map(str::to_string),
            target_qty: qty,
        }
    }

    fn routing(routing: &str, oper: &str, oper_type: &str) -> RoutingOper {
        RoutingOper {
            routing_id: routing.to_string(),
            oper_id: oper.to_string(),
            oper_type: Some(oper_type.to_string()),
        }
    }

    fn res(routing: &str, oper: &str, usage: Option<f64>) -> OperResource {
        OperResource {
            routing_id: routing.to_string(),
            oper_id: oper.to_string(),
            usage_per: usage,
        }
    }

    #[test]
    fn test_target_capa_pipeline() {
        let targets = vec![
            target("A", " Out ", Some("RT1"), Some("OP10"), 100.0),
            target("A", "Out", Some("RT1"), Some("OP10"), 50.0),
            target("A", "In", Some("RT1"), Some("OP10"), 999.0),
            target("A", "Out", Some("RT1"), None, 999.0),
            target("B", "Out", Some("RT1"), Some("OP20"), 999.0),
            target("C", "Out", Some("RT2"), Some("OP10"), 10.0),
        ];
        let routings = vec![
            routing("RT1", "OP10", "Operation"),
            routing("RT1", "OP20", "Transfer"),
            routing("RT2", "OP10", "Operation"),
        ];
        let resources = vec![
            res("RT1", "OP10", Some(40.0)),
            res("RT1", "OP10", Some(80.0)),
            res("RT1", "OP10", None),
        ];

        let result = target_capa(&targets, &routings, &resources);
        assert_eq!(result.len(), 2);

        let a = &result[0];
        assert_eq!(a.item_id, "A");
        assert_eq!(a.target_qty, 150.0);
        assert_eq!(a.res_count, 3);
        assert_eq!(a.avg_usage_per, Some(60.0));
        assert_eq!(a.daily_max_output, Some(1440.0));

        let c = &result[1];
        assert_eq!(c.res_count, 0);
        assert_eq!(c.daily_max_output, None);
    }
}
