// ==========================================
// 电解铝出铝排产系统 - 日志系统初始化
// ==========================================
// 使用 tracing 和 tracing-subscriber
// 库本身只产生事件, 由宿主进程决定安装哪种输出
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// 默认过滤级别
const DEFAULT_DIRECTIVE: &str = "info";

/// 日志输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// 人读格式 (开发/现场终端)
    #[default]
    Pretty,
    /// 每行一条 JSON (接入日志采集)
    Json,
}

/// 过滤器: RUST_LOG 优先, 否则使用给定默认值
fn env_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive))
}

/// 初始化日志系统 (人读格式)
///
/// # 环境变量
/// - RUST_LOG: 日志级别过滤器（默认: info）
///   例如: RUST_LOG=debug 或 RUST_LOG=potroom_aps::engine=trace
///
/// # 示例
/// ```no_run
/// use potroom_aps::logging;
/// logging::init();
/// ```
pub fn init() {
    init_with_format(LogFormat::Pretty);
}

/// 按指定格式初始化日志系统
///
/// 已有全局订阅者时静默跳过
pub fn init_with_format(format: LogFormat) {
    let filter = env_filter(DEFAULT_DIRECTIVE);
    let result = match format {
        LogFormat::Pretty => fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_line_number(true)
            .try_init(),
        LogFormat::Json => fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(true)
            .try_init(),
    };
    if result.is_err() {
        tracing::debug!("日志订阅者已安装, 跳过初始化");
    }
}

/// 初始化测试环境的日志系统
///
/// debug 级别, 输出交给测试框架捕获; 可重复调用
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
