use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use netsweep_core::aggregate::render_network_scan;
use netsweep_core::orchestrator::{NetScanOptions, NetScanReport, NetScanner, Observer, ScanEvent, ScanPhase};
use netsweep_core::scanner::{PortScanOptions, PortScanner};
use netsweep_integration_tests::{FakeNetwork, FakePorts, lan, lan_ip};

fn home_network() -> NetScanner {
    let discoverer = FakeNetwork::new()
        .host(lan_ip(1), Some("router.lan"))
        .host(lan_ip(20), Some("printer.lan"))
        .host(lan_ip(10), Some("nas.lan"))
        .discoverer();

    let ports = FakePorts::new()
        .open(lan_ip(1), 53, b"")
        .open(lan_ip(1), 22, b"SSH-2.0-dropbear_2022.83\r\n")
        .open(lan_ip(10), 445, b"")
        .open(lan_ip(10), 139, b"");

    NetScanner::new(discoverer, PortScanner::new(Arc::new(ports)))
}

fn opts() -> NetScanOptions {
    NetScanOptions {
        host_concurrency: 2,
        port: PortScanOptions {
            concurrency: 128,
            timeout: Duration::from_millis(50),
        },
        ..NetScanOptions::default()
    }
}

async fn run(scanner: &NetScanner) -> NetScanReport {
    scanner
        .run(lan(), opts(), None, CancellationToken::new())
        .await
        .unwrap()
}

#[tokio::test]
async fn results_are_sorted_by_host_then_port() {
    let report = run(&home_network()).await;

    assert_eq!(report.discovered.len(), 3);
    let hosts: Vec<_> = report.results.iter().map(|r| r.host.ip).collect();
    assert_eq!(hosts, vec![lan_ip(1), lan_ip(10), lan_ip(20)]);

    let router: Vec<u16> = report.results[0].ports.iter().map(|p| p.port).collect();
    assert_eq!(router, vec![22, 53]);
    assert_eq!(report.results[0].ports[0].banner, "SSH-2.0-dropbear_2022.83");

    let nas: Vec<&str> = report.results[1].ports.iter().map(|p| p.service).collect();
    assert_eq!(nas, vec!["netbios-ssn", "microsoft-ds"]);

    assert!(!report.results[2].has_open_ports());
}

#[tokio::test]
async fn rerunning_gives_the_same_report() {
    let scanner = home_network();
    let first = run(&scanner).await;
    let second = run(&scanner).await;

    assert_eq!(first.results, second.results);
}

#[tokio::test]
async fn hosts_without_open_ports_are_left_out_of_the_rendering() {
    let report = run(&home_network()).await;

    let mut out: Vec<u8> = Vec::new();
    render_network_scan(&mut out, &report.results).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.contains("=== Host: 192.168.1.1 (router.lan) ==="));
    assert!(text.contains("=== Host: 192.168.1.10 (nas.lan) ==="));
    assert!(!text.contains("printer.lan"));
    assert!(!text.contains("No open ports found."));
}

#[tokio::test]
async fn observer_sees_every_discovery_and_scan() {
    let events: Arc<Mutex<Vec<ScanEvent>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let observer: Observer = Box::new(move |event| {
        if let Ok(mut events) = sink.lock() {
            events.push(event);
        }
    });

    home_network()
        .run(lan(), opts(), Some(observer), CancellationToken::new())
        .await
        .unwrap();

    let events = events.lock().unwrap();
    let discovered = events
        .iter()
        .filter(|e| matches!(e, ScanEvent::HostDiscovered(_)))
        .count();
    let scanned: Vec<usize> = events
        .iter()
        .filter_map(|e| match e {
            ScanEvent::HostScanned { done, total: 3 } => Some(*done),
            _ => None,
        })
        .collect();

    assert_eq!(discovered, 3);
    assert_eq!(scanned, vec![1, 2, 3]);
    assert_eq!(events.last(), Some(&ScanEvent::PhaseChanged(ScanPhase::Done)));
}

#[tokio::test]
async fn cancelled_before_start_reports_partial_run() {
    let cancel = CancellationToken::new();
    cancel.cancel();

    let report = home_network()
        .run(lan(), opts(), None, cancel)
        .await
        .unwrap();

    assert!(report.cancelled);
    assert!(report.results.len() <= report.discovered.len());
}
