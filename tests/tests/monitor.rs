use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use netsweep_common::error::ScanError;
use netsweep_core::monitor::{InterfaceCounters, ProcNetDevSource, RateMonitor, RateSample, StatsSource};

struct Unavailable(&'static str);

impl StatsSource for Unavailable {
    fn name(&self) -> &'static str {
        self.0
    }

    fn read(&self, _interface: &str) -> Option<InterfaceCounters> {
        None
    }
}

/// Adds a fixed amount of traffic on every read.
struct SteadyTraffic {
    reads: AtomicU64,
}

impl StatsSource for SteadyTraffic {
    fn name(&self) -> &'static str {
        "steady"
    }

    fn read(&self, _interface: &str) -> Option<InterfaceCounters> {
        let n = self.reads.fetch_add(1, Ordering::SeqCst) + 1;
        Some(InterfaceCounters {
            in_packets: n * 100,
            out_packets: n * 10,
            in_bytes: n * 102_400,
            out_bytes: n * 1_024,
        })
    }
}

fn proc_file(name: &str, content: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("netsweep-{name}-{}", std::process::id()));
    std::fs::write(&path, content).unwrap();
    path
}

#[tokio::test]
async fn no_source_with_counters_fails_without_samples() {
    let monitor = RateMonitor::new(vec![
        Arc::new(Unavailable("ifconfig")),
        Arc::new(Unavailable("ip -s link")),
        Arc::new(ProcNetDevSource::with_path("/nonexistent/net/dev")),
    ]);

    let mut samples: Vec<RateSample> = Vec::new();
    let result = monitor
        .monitor(
            "eth0",
            Duration::from_millis(50),
            Duration::from_millis(10),
            CancellationToken::new(),
            |sample| samples.push(sample),
        )
        .await;

    assert_eq!(
        result,
        Err(ScanError::StatsUnavailable {
            interface: "eth0".to_string()
        })
    );
    assert!(samples.is_empty());
}

#[test]
fn falls_back_to_proc_net_dev() {
    let path = proc_file(
        "fallback",
        "\
Inter-|   Receive                                                |  Transmit
 face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed
  eth0:  204800     400    0    0    0     0          0         0    51200     200    0    0    0     0       0          0
",
    );
    let monitor = RateMonitor::new(vec![
        Arc::new(Unavailable("ifconfig")),
        Arc::new(ProcNetDevSource::with_path(&path)),
    ]);

    let counters = monitor.sample_once("eth0").unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(
        counters,
        InterfaceCounters {
            in_packets: 400,
            out_packets: 200,
            in_bytes: 204_800,
            out_bytes: 51_200,
        }
    );
}

#[tokio::test]
async fn async_sample_matches_the_first_source_with_counters() {
    let monitor = RateMonitor::new(vec![
        Arc::new(Unavailable("ifconfig")),
        Arc::new(SteadyTraffic {
            reads: AtomicU64::new(0),
        }),
    ]);
    let counters = monitor.sample("eth0").await.unwrap();
    assert_eq!(counters.in_packets, 100);

    let silent = RateMonitor::new(vec![Arc::new(Unavailable("ip -s link"))]);
    assert_eq!(
        silent.sample("wlan0").await,
        Err(ScanError::StatsUnavailable {
            interface: "wlan0".to_string()
        })
    );
}

#[tokio::test]
async fn rates_track_the_counter_deltas() {
    let monitor = RateMonitor::new(vec![Arc::new(SteadyTraffic {
        reads: AtomicU64::new(0),
    })]);

    let mut samples: Vec<RateSample> = Vec::new();
    let produced = monitor
        .monitor(
            "eth0",
            Duration::from_millis(350),
            Duration::from_millis(100),
            CancellationToken::new(),
            |sample| samples.push(sample),
        )
        .await
        .unwrap();

    assert_eq!(produced, samples.len());
    assert!(!samples.is_empty());
    for sample in &samples {
        let secs = sample.elapsed.as_secs_f64();
        assert!((sample.in_pps * secs - 100.0).abs() < 1e-6);
        assert!((sample.out_pps * secs - 10.0).abs() < 1e-6);
        assert!((sample.in_kbps * secs - 100.0).abs() < 1e-6);
        assert!(sample.in_pps > 0.0 && sample.out_kbps > 0.0);
    }

    let last = samples.last().map(|s| s.total_in);
    assert_eq!(last, Some((samples.len() as u64 + 1) * 100));
}
