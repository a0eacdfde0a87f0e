//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 合约快照测试
//! - 跨 crate e2e 测试：sandbox -> lifecycle -> dispatcher -> sinks
//! - 在测试可执行文件所在目录验证日志文件沙箱

#[cfg(test)]
mod support;

#[cfg(test)]
mod contract_tests {
    use contracts::{Level, LogRecord};

    #[test]
    fn test_contracts_compile() {
        // 验证 contracts crate 可编译
        let _ = contracts::ConfigVersion::V1;
    }

    #[test]
    fn test_level_order_is_frozen() {
        assert!(Level::Trace < Level::Debug);
        assert!(Level::Debug < Level::Info);
        assert!(Level::Info < Level::Warn);
        assert!(Level::Warn < Level::Error);
    }

    #[test]
    fn test_new_record_is_utc() {
        let record = LogRecord::new(Level::Info, "utc");
        assert_eq!(record.time().timezone(), chrono_tz::Tz::UTC);
        assert!(record.rfc3339().ends_with('Z'));
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::thread;

    use chrono::Offset;
    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::Sink;
    use dispatcher::Dispatcher;
    use multislog::{attr, Level, Multislog, MultislogError};
    use sandbox::SandboxError;
    use tracing_subscriber::layer::SubscriberExt;

    use crate::support::{exe_dir, json_lines, ExeDirFile, TestSink};

    /// 各 sink 只收到阈值允许的级别
    #[test]
    fn test_heterogeneous_thresholds() {
        let trace = TestSink::new("trace", Level::Trace);
        let info = TestSink::new("info", Level::Info);
        let error = TestSink::new("error", Level::Error);
        let mut log = Multislog::builder()
            .sink(trace.shared())
            .sink(info.shared())
            .sink(error.shared())
            .build()
            .unwrap();

        let logger = log.logger();
        logger.trace("t", &[]);
        logger.debug("d", &[]);
        logger.info("i", &[]);
        logger.warn("w", &[]);
        logger.error("e", &[]);

        assert_eq!(trace.messages(), vec!["t", "d", "i", "w", "e"]);
        assert_eq!(info.messages(), vec!["i", "w", "e"]);
        assert_eq!(error.messages(), vec!["e"]);
        log.close();
    }

    /// 禁用级别的 sink 永远不会调用 handle
    #[test]
    fn test_disabled_sink_never_handles() {
        let quiet = TestSink::new("quiet", Level::Error);
        let log = Multislog::builder().sink(quiet.shared()).build().unwrap();

        for _ in 0..10 {
            log.logger().warn("not for you", &[]);
        }

        assert_eq!(quiet.handle_calls(), 0);
        assert_eq!(log.metrics()[0].1.handled_count, 0);

        // Dispatching directly still re-checks the sink's own threshold
        log.dispatcher().dispatch(&contracts::LogRecord::new(Level::Warn, "direct"));
        assert_eq!(quiet.handle_calls(), 0);
        assert_eq!(log.metrics()[0].1.skipped_count, 1);
    }

    /// 时区只改写一次，所有 sink 看到相同时间戳
    #[test]
    fn test_timezone_observed_identically() {
        let first = TestSink::new("first", Level::Info);
        let second = TestSink::new("second", Level::Info);
        let log = Multislog::builder()
            .timezone("Asia/Hong_Kong")
            .sink(first.shared())
            .sink(second.shared())
            .build()
            .unwrap();

        let before = chrono::Utc::now();
        log.logger().info("tz", &[]);

        let a = *first.records()[0].time();
        let b = *second.records()[0].time();
        assert_eq!(a, b);
        assert_eq!(a.timezone(), chrono_tz::Asia::Hong_Kong);
        assert_eq!(a.offset().fix().local_minus_utc(), 8 * 3600);
        assert!(a.with_timezone(&chrono::Utc) >= before);
    }

    /// 派生不修改原 dispatcher
    #[test]
    fn test_derive_does_not_mutate() {
        let sink = TestSink::new("sink", Level::Info);
        let dispatcher = Dispatcher::new([sink.shared()]);
        let derived = dispatcher.with_attrs(&[attr("request_id", 42)]);

        derived.handle(&contracts::LogRecord::new(Level::Info, "derived")).unwrap();
        dispatcher.dispatch(&contracts::LogRecord::new(Level::Info, "original"));

        let seen = sink.seen();
        assert_eq!(seen[0].attrs, vec![attr("request_id", 42)]);
        assert!(seen[1].attrs.is_empty());
    }

    /// 关闭幂等、不抛错；单个 sink 关闭失败不影响其他 sink 与文件
    #[test]
    fn test_teardown_continues_past_failures() {
        let file = ExeDirFile::new("teardown");
        let failing = TestSink::new("failing", Level::Info).failing_close();
        let healthy = TestSink::new("healthy", Level::Info);

        let mut log = Multislog::builder()
            .sink(failing.shared())
            .log_file(Level::Info, file.name(), false, true)
            .sink(healthy.shared())
            .build()
            .unwrap();
        log.logger().info("before close", &[]);

        let report = log.close();
        assert_eq!(report.sinks_failed, 1);
        assert_eq!(report.sinks_closed, 2);
        assert!(report.file_closed);
        assert!(!report.file_failed);
        assert_eq!(healthy.close_calls(), 1);

        let again = log.close();
        assert_eq!(again, multislog::TeardownReport::default());
        assert_eq!(failing.close_calls(), 1);

        // 文件已关闭：后续写入只产生诊断，不影响调用方
        log.logger().info("after close", &[]);
        assert_eq!(json_lines(file.path()).len(), 1);
        assert_eq!(log.metrics()[1].1.failure_count, 1);
    }

    /// 沙箱拒绝越界文件名
    #[test]
    fn test_sandbox_rejects_escapes() {
        for name in ["../evil.log", "/absolute.log", "subdir/file.log", ".."] {
            let err = Multislog::builder()
                .log_file(Level::Info, name, false, false)
                .build()
                .err()
                .unwrap_or_else(|| panic!("'{name}' should be rejected"));
            match err {
                MultislogError::Sandbox(inner) => {
                    assert!(inner.is_policy_violation(), "{name}: {inner}");
                    assert!(matches!(
                        inner,
                        SandboxError::InvalidFileName { .. }
                            | SandboxError::EscapesBaseDirectory { .. }
                    ));
                }
                other => panic!("{name}: unexpected error {other:?}"),
            }
        }
    }

    /// 沙箱接受可执行文件目录下的单纯文件名
    #[test]
    fn test_sandbox_accepts_plain_name_in_exe_dir() {
        let file = ExeDirFile::new("test");
        let mut log = Multislog::builder()
            .log_file(Level::Info, file.name(), false, false)
            .build()
            .unwrap();

        let path = log.log_file_path().unwrap().to_path_buf();
        assert_eq!(path.parent().unwrap(), exe_dir());
        assert_eq!(path.file_name().unwrap().to_str().unwrap(), file.name());
        log.close();
        assert!(path.exists());
    }

    /// 追加模式保留旧内容；截断模式只留新内容
    #[test]
    fn test_append_then_truncate() {
        let file = ExeDirFile::new("modes");

        for msg in ["first", "second"] {
            let mut log = Multislog::builder()
                .log_file(Level::Info, file.name(), false, false)
                .build()
                .unwrap();
            log.logger().info(msg, &[]);
            log.close();
        }
        let msgs: Vec<String> = json_lines(file.path())
            .iter()
            .map(|l| l["msg"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(msgs, vec!["first", "second"]);

        let mut log = Multislog::builder()
            .log_file(Level::Info, file.name(), false, true)
            .build()
            .unwrap();
        log.logger().info("fresh", &[]);
        log.close();

        let lines = json_lines(file.path());
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["msg"], "fresh");
    }

    /// 配置文件 -> facade -> 日志文件
    #[test]
    fn test_config_to_log_file() {
        let file = ExeDirFile::new("config");
        let toml = format!(
            r#"
timezone = "Europe/Berlin"

[log_file]
level = "warn"
filename = "{}"
clear_on_restart = true
"#,
            file.name()
        );
        let config = ConfigLoader::load_from_str(&toml, ConfigFormat::Toml).unwrap();
        let mut log = Multislog::from_config(&config).unwrap();

        let logger = log.logger().with_group("job");
        logger.info("skipped", &[]);
        logger.warn("slow", &[attr("ms", 1200)]);
        log.close();

        let lines = json_lines(file.path());
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["level"], "WARN");
        assert_eq!(lines[0]["job"]["ms"], 1200);
        let time = lines[0]["time"].as_str().unwrap();
        assert!(time.ends_with("+01:00") || time.ends_with("+02:00"), "{time}");
    }

    /// tracing 事件经 layer 进入日志文件
    #[test]
    fn test_tracing_layer_into_file() {
        let file = ExeDirFile::new("layer");
        let mut log = Multislog::builder()
            .log_file(Level::Debug, file.name(), false, true)
            .build()
            .unwrap();

        let subscriber = tracing_subscriber::registry().with(log.layer());
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(target: "billing", invoice = 17u64, "invoice sent");
            tracing::error!(target: contracts::DIAGNOSTIC_TARGET, "ignored");
        });
        log.close();

        let lines = json_lines(file.path());
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["msg"], "invoice sent");
        assert_eq!(lines[0]["invoice"], 17);
        assert_eq!(lines[0]["target"], "billing");
    }

    /// 多线程并发写入同一文件，行不交错
    #[test]
    fn test_concurrent_logging_keeps_lines_whole() {
        let file = ExeDirFile::new("concurrent");
        let mut log = Multislog::builder()
            .log_file(Level::Info, file.name(), false, true)
            .build()
            .unwrap();

        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let logger = log.logger().with_attrs(&[attr("worker", worker)]);
                thread::spawn(move || {
                    for i in 0..50 {
                        logger.info("tick", &[attr("i", i)]);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        log.close();

        let lines = json_lines(file.path());
        assert_eq!(lines.len(), 400);
        assert_eq!(log.metrics()[0].1.handled_count, 400);
    }
}
