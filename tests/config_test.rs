// ==========================================
// ConfigManager 集成测试
// ==========================================
// 测试目标: 验证配置文件加载、缺省回填、校验失败路径
// ==========================================

use potroom_aps::config::{ConfigError, ConfigManager, PlannerConfig};
use potroom_aps::domain::{PotCountRule, ProductGrade};
use potroom_aps::engine::AllocationSession;
use std::io::Write;
use tempfile::NamedTempFile;

/// 创建临时配置文件
fn create_test_config_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes()).expect("Failed to write config");
    file
}

#[test]
fn test_load_config_from_file() {
    let file = create_test_config_file(
        r#"{
            "capacity": {
                "potsPerBatch": {"range": {"min": 2, "max": 6}},
                "maxBatchesPerShift": 12,
                "minWeightPerBatch": 4.0
            },
            "grades": {
                "P1020": {"maxFe": 0.1, "maxSi": 0.1}
            }
        }"#,
    );

    let manager = ConfigManager::from_json_file(file.path()).expect("配置应加载成功");
    let config = manager.config();
    assert_eq!(config.capacity.pots_per_batch, PotCountRule::Range { min: 2, max: 6 });
    assert_eq!(config.capacity.max_batches_per_shift, 12);
    assert_eq!(config.capacity.min_weight_per_batch, Some(4.0));
    assert_eq!(config.capacity.max_weight_per_batch, 10.5, "缺省键应回填默认值");

    // 文件给出的牌号表整体替换默认表
    assert!(config.grades.contains(ProductGrade::P1020));
    assert!(!config.grades.contains(ProductGrade::PfaNt));
    assert_eq!(config.grades.get(ProductGrade::P1020).unwrap().max_vn, None);
}

#[test]
fn test_loaded_config_drives_session() {
    let file = create_test_config_file(r#"{"grades": {"Billet": {"maxFe": 0.1, "maxSi": 0.1}}}"#);
    let config = ConfigManager::from_json_file(file.path()).unwrap().into_config();

    let mut session = AllocationSession::new(vec![], &config).unwrap();
    assert!(session.create_batch(ProductGrade::Billet).is_applied());
    assert!(session.create_batch(ProductGrade::PfaNt).is_rejected(), "未配置牌号应被拒绝");
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = ConfigManager::from_json_file(dir.path().join("missing.json"))
        .err()
        .expect("缺失文件应报错");
    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("missing.json"));
}

#[test]
fn test_semantic_validation_failures() {
    let cases = [
        r#"{"risk": {"feCritical": 0.05, "feModerate": 0.10}}"#,
        r#"{"capacity": {"potsPerBatch": {"range": {"min": 5, "max": 3}}}}"#,
        r#"{"capacity": {"minWeightPerBatch": 20.0}}"#,
        r#"{"grades": {"P1020": {"maxFe": -0.1, "maxSi": 0.1}}}"#,
        r#"{"scoring": {"fe": {"tiers": [{"threshold": 0.1, "points": 5}, {"threshold": 0.18, "points": 30}]}}}"#,
    ];
    for raw in cases {
        let err = ConfigManager::from_json_str(raw).err();
        assert!(
            matches!(err, Some(ConfigError::Invalid { .. })),
            "配置应校验失败: {}",
            raw
        );
    }
}

#[test]
fn test_config_errors_convert_to_anyhow() {
    fn load(raw: &str) -> anyhow::Result<PlannerConfig> {
        Ok(ConfigManager::from_json_str(raw)?.into_config())
    }
    assert!(load("{}").is_ok());
    assert!(load("[").is_err());
}
