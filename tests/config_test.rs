// ==========================================
// 配置层 - 集成测试
// ==========================================

mod test_helpers;

use aps_snapshot_analysis::config::{config_keys, ConfigManager, FolderRegistry};
use aps_snapshot_analysis::domain::Shift;
use aps_snapshot_analysis::ReportApi;
use std::fs;
use tempfile::TempDir;
use test_helpers::{write_setup_scenario, RunFolder};

#[test]
fn test_config_file_drives_report_parameters() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    fs::write(
        &path,
        r#"{"locale":"zh_cn","shift_count":"3","repeat_setup_threshold":"1"}"#,
    )
    .unwrap();

    let config = ConfigManager::new(&path).unwrap().analysis_config().unwrap();
    assert_eq!(config.locale, "zh-CN");
    assert_eq!(config.shift_count, 3);
    assert_eq!(config.repeat_setup_threshold, 1);
    assert_eq!(config.safety_stock_prefix, "SafetyStock");

    let folder = RunFolder::new();
    write_setup_scenario(&folder);
    let api = ReportApi::open_folder(folder.path(), config).unwrap();

    // 阈值 1: 所有换型组都进入重复视图
    let report = api.setup_transitions().unwrap();
    assert_eq!(report.repeated, report.counts);

    // 三班: 白班为 08:00-16:00，Setup 10:00 结束
    let shifts = api.shift_setup_counts().unwrap();
    assert_eq!(shifts[0].shift, Shift::Day);
}

#[test]
fn test_unknown_locale_falls_back_to_english() {
    let dir = TempDir::new().unwrap();
    let mut manager = ConfigManager::new(dir.path().join("config.json")).unwrap();
    manager.set_config_value(config_keys::LOCALE, "fr");
    assert_eq!(manager.get_locale(), "en");
}

#[test]
fn test_malformed_config_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, "not json").unwrap();
    assert!(ConfigManager::new(&path).is_err());
}

#[test]
fn test_folder_registry_round_trip() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("folders.json");
    let run = RunFolder::new();

    let mut registry = FolderRegistry::load(&file).unwrap();
    registry.register("baseline", run.path());
    registry.save().unwrap();

    let reloaded = FolderRegistry::load(&file).unwrap();
    assert_eq!(reloaded.get("baseline"), Some(run.path()));
    assert_eq!(reloaded.list().len(), 1);
}
