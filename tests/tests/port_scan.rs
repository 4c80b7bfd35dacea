use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use netsweep_common::error::ScanError;
use netsweep_common::network::host::PortRecord;
use netsweep_common::network::ports::PortRange;
use netsweep_core::scanner::{PortScanOptions, PortScanner};
use netsweep_integration_tests::{FakePorts, StallingPorts, lan_ip};

#[tokio::test]
async fn only_open_ports_are_reported() {
    let ports = FakePorts::new().open(lan_ip(10), 22, b"SSH-2.0-OpenSSH_9.6\r\n");
    let scanner = PortScanner::new(Arc::new(ports));

    let open = scanner
        .scan_ports(
            IpAddr::V4(lan_ip(10)),
            PortRange::WELL_KNOWN,
            PortScanOptions::default(),
            CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(open, vec![PortRecord::new(22, "ssh", "SSH-2.0-OpenSSH_9.6".to_string())]);
}

#[test]
fn reversed_range_is_rejected() {
    assert_eq!(
        PortRange::new(2000, 1000),
        Err(ScanError::InvalidPortRange { start: 2000, end: 1000 })
    );
}

#[tokio::test]
async fn ports_outside_the_range_are_never_probed() {
    let ports = Arc::new(
        FakePorts::new()
            .open(lan_ip(5), 21, b"220 ftp ready\r\n")
            .open(lan_ip(5), 80, b"")
            .open(lan_ip(5), 3306, b""),
    );
    let scanner = PortScanner::new(ports.clone());
    let range = PortRange::new(20, 100).unwrap();

    let open = scanner
        .scan_ports(IpAddr::V4(lan_ip(5)), range, PortScanOptions::default(), CancellationToken::new())
        .await
        .unwrap();

    let numbers: Vec<u16> = open.iter().map(|record| record.port).collect();
    assert_eq!(numbers, vec![21, 80]);
    assert_eq!(ports.connects(), range.len());
}

#[tokio::test]
async fn repeated_scans_agree() {
    let scanner = PortScanner::new(Arc::new(
        FakePorts::new()
            .open(lan_ip(7), 443, b"")
            .open(lan_ip(7), 25, b"220 mail.lan ESMTP Postfix (Debian/GNU)\r\n")
            .open(lan_ip(7), 53, b""),
    ));
    let opts = PortScanOptions {
        concurrency: 3,
        ..PortScanOptions::default()
    };

    let first = scanner
        .scan_ports(IpAddr::V4(lan_ip(7)), PortRange::WELL_KNOWN, opts, CancellationToken::new())
        .await
        .unwrap();
    let second = scanner
        .scan_ports(IpAddr::V4(lan_ip(7)), PortRange::WELL_KNOWN, opts, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(first.iter().map(|r| r.port).collect::<Vec<_>>(), vec![25, 53, 443]);
    assert_eq!(first[0].banner, "220 mail.lan ESMTP Postfi...");
}

#[tokio::test]
async fn zero_concurrency_is_rejected() {
    let scanner = PortScanner::new(Arc::new(FakePorts::new()));
    let opts = PortScanOptions {
        concurrency: 0,
        ..PortScanOptions::default()
    };

    let result = scanner
        .scan_ports(IpAddr::V4(lan_ip(1)), PortRange::WELL_KNOWN, opts, CancellationToken::new())
        .await;
    assert_eq!(result, Err(ScanError::InvalidConcurrency));
}

#[tokio::test]
async fn abandoned_scan_stops_connecting() {
    let ports = Arc::new(StallingPorts::new(Duration::from_millis(10)));
    let scanner = PortScanner::new(ports.clone());
    let opts = PortScanOptions {
        concurrency: 50,
        ..PortScanOptions::default()
    };

    let scan = scanner.scan_ports(IpAddr::V4(lan_ip(9)), PortRange::ALL, opts, CancellationToken::new());
    let outcome = tokio::time::timeout(Duration::from_millis(25), scan).await;
    assert!(outcome.is_err());

    let at_drop = ports.connects();
    tokio::time::sleep(Duration::from_millis(300)).await;

    assert!(ports.connects() <= at_drop + opts.concurrency);
    assert!(ports.connects() < 1000);
}

/*************************************************************
                  Real sockets on loopback
**************************************************************/

#[tokio::test]
async fn loopback_listener_banner_is_read() {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
    let port: u16 = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        if let Ok((mut socket, _)) = listener.accept().await {
            let _ = socket.write_all(b"SSH-2.0-OpenSSH_9.6\r\n").await;
            tokio::time::sleep(Duration::from_millis(500)).await;
        }
    });

    let range = PortRange::new(port.into(), port.into()).unwrap();
    let open = PortScanner::default()
        .scan_ports(
            IpAddr::V4(Ipv4Addr::LOCALHOST),
            range,
            PortScanOptions::default(),
            CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(open.len(), 1);
    assert_eq!(open[0].port, port);
    assert_eq!(open[0].banner, "SSH-2.0-OpenSSH_9.6");
}

#[tokio::test]
async fn closed_loopback_port_is_not_reported() {
    let port: u16 = {
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
        listener.local_addr().unwrap().port()
    };

    let range = PortRange::new(port.into(), port.into()).unwrap();
    let open = PortScanner::default()
        .scan_ports(
            IpAddr::V4(Ipv4Addr::LOCALHOST),
            range,
            PortScanOptions::default(),
            CancellationToken::new(),
        )
        .await
        .unwrap();

    assert!(open.is_empty());
}
