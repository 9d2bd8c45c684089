// ==========================================
// 排产仿真快照分析 - 命令行入口
// ==========================================
// 用法:
//   aps-snapshot-analysis <report> <run_folder> [args]
//   aps-snapshot-analysis compare <run_folder_a> <run_folder_b>
//   aps-snapshot-analysis folders list | add <name> <path> | remove <name>
//
// run_folder 可以是路径，也可以是 folders 中登记的名称
// 报表以 JSON 输出到 stdout，日志输出到 stderr
// ==========================================

use anyhow::{bail, Context, Result};
use aps_snapshot_analysis::api::{compare_runs, ReportApi};
use aps_snapshot_analysis::config::{default_config_dir, ConfigManager, FolderRegistry};
use aps_snapshot_analysis::{logging, FolderSnapshotStore};
use serde::Serialize;
use std::path::PathBuf;

const USAGE: &str = "\
usage:
  aps-snapshot-analysis <report> <run_folder> [args]
  aps-snapshot-analysis compare <run_folder_a> <run_folder_b>
  aps-snapshot-analysis folders list | add <name> <path> | remove <name>

reports:
  shortage                   shortage quantity and reason per demand line
  setup                      setup transitions by from-item (+ repeated)
  shift-setup                setup count per shift
  utilization [res_group]    resource group / resource utilization
  demand                     daily / weekly / monthly demand
  item-wip                   lot WIP per item
  buffer-wip                 lot and plan WIP per buffer
  process-output [oper_id]   production operations / output of one operation
  target-capa                target quantity vs. resource capacity";

fn main() -> Result<()> {
    // APS_LOG_FORMAT=json 时输出 JSON 行日志
    match std::env::var("APS_LOG_FORMAT").as_deref() {
        Ok("json") => logging::init_json(),
        _ => logging::init(),
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        eprintln!("{}", USAGE);
        bail!("missing command");
    };

    let config_dir = default_config_dir()?;
    let mut registry = FolderRegistry::load(config_dir.join("folders.json"))?;

    match command.as_str() {
        "folders" => folders(&mut registry, &args[1..]),
        "compare" => {
            let (left, right) = match (args.get(1), args.get(2)) {
                (Some(l), Some(r)) => (resolve_folder(&registry, l), resolve_folder(&registry, r)),
                _ => bail!("compare requires two run folders\n{}", USAGE),
            };
            print_json(&compare_runs(&left, &right)?)
        }
        "-h" | "--help" | "help" => {
            println!("{}", USAGE);
            Ok(())
        }
        report => {
            let folder = args
                .get(1)
                .map(|f| resolve_folder(&registry, f))
                .with_context(|| format!("{} requires a run folder\n{}", report, USAGE))?;
            let config = ConfigManager::open_default()?.analysis_config()?;
            let api = ReportApi::open_folder(&folder, config)?;
            run_report(&api, report, args.get(2).map(String::as_str))
        }
    }
}

fn run_report(
    api: &ReportApi<FolderSnapshotStore>,
    report: &str,
    extra: Option<&str>,
) -> Result<()> {
    match (report, extra) {
        ("shortage", _) => print_json(&api.shortage_attribution()?),
        ("setup", _) => print_json(&api.setup_transitions()?),
        ("shift-setup", _) => print_json(&api.shift_setup_counts()?),
        ("utilization", None) => print_json(&api.group_utilization()?),
        ("utilization", Some(group)) => print_json(&api.resource_utilization(group)?),
        ("demand", _) => print_json(&api.demand_trend()?),
        ("item-wip", _) => print_json(&api.item_wip()?),
        ("buffer-wip", _) => print_json(&api.buffer_wip()?),
        ("process-output", None) => print_json(&api.production_oper_ids()?),
        ("process-output", Some(oper_id)) => print_json(&api.process_output(oper_id)?),
        ("target-capa", _) => print_json(&api.target_capa()?),
        (other, _) => bail!("unknown report: {}\n{}", other, USAGE),
    }
}

fn folders(registry: &mut FolderRegistry, args: &[String]) -> Result<()> {
    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        ["list"] | [] => print_json(&registry.list()),
        ["add", name, path] => {
            let path = PathBuf::from(path);
            if !path.is_dir() {
                bail!("not a directory: {}", path.display());
            }
            registry.register(name, &path);
            registry.save()?;
            println!("registered {} -> {}", name, path.display());
            Ok(())
        }
        ["remove", name] => {
            if registry.remove(name).is_none() {
                bail!("no registered folder named {}", name);
            }
            registry.save()?;
            println!("removed {}", name);
            Ok(())
        }
        _ => bail!("invalid folders command\n{}", USAGE),
    }
}

/// 登记名称优先，否则按路径处理
fn resolve_folder(registry: &FolderRegistry, value: &str) -> PathBuf {
    registry
        .get(value)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(value))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
