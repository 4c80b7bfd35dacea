use colored::*;
use pnet::datalink::{self, NetworkInterface};
use tracing::warn;

use netsweep_common::config::Config;
use netsweep_core::{address, system};

use crate::mprint;
use crate::terminal::{colors, format, print};

pub async fn info(cfg: &Config) -> anyhow::Result<()> {
    print::header("network information", cfg.quiet);
    print_address_space().await;

    mprint!();
    print::header("interfaces", cfg.quiet);
    print_interfaces();

    mprint!();
    print::header("dns servers", cfg.quiet);
    print_nameservers();

    Ok(())
}

async fn print_address_space() {
    let space = match address::resolve_blocking(address::resolve).await {
        Ok(space) => space,
        Err(err) => {
            warn!("{err}");
            return;
        }
    };

    print::set_key_width(&["Interface", "Local IP", "Gateway", "Network", "Broadcast", "Netmask"]);
    print::aligned_line("Interface", space.interface.clone().color(colors::PRIMARY));
    print::aligned_line("Local IP", format::ipv4(space.local_ip));
    print::aligned_line("Gateway", format::optional_ipv4(space.gateway));
    print::aligned_line("Network", format!("{}/{}", space.network(), space.cidr));
    print::aligned_line("Broadcast", format::ipv4(space.broadcast()));
    print::aligned_line("Netmask", space.netmask.to_string());
}

fn print_interfaces() {
    let interfaces: Vec<NetworkInterface> = datalink::interfaces()
        .into_iter()
        .filter(|interface| interface.is_up())
        .collect();

    if interfaces.is_empty() {
        print::print_status("no interfaces are up");
        return;
    }

    for (idx, interface) in interfaces.iter().enumerate() {
        format::print_interface(interface, idx);
        if idx + 1 != interfaces.len() {
            mprint!();
        }
    }
}

fn print_nameservers() {
    match system::nameservers() {
        Ok(servers) if servers.is_empty() => print::print_status("none configured"),
        Ok(servers) => {
            for server in servers {
                print::print_status(format::ip(server).to_string());
            }
        }
        Err(err) => warn!("could not read DNS configuration: {err:#}"),
    }
}
