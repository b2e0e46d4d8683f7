use crate::model::ScanReport;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct HostRow {
    #[tabled(rename = "Host")]
    ip: String,
    #[tabled(rename = "Hostname")]
    hostname: String,
    #[tabled(rename = "OS")]
    os: String,
    #[tabled(rename = "Ports")]
    ports: usize,
    #[tabled(rename = "Open")]
    open: usize,
}

#[derive(Tabled)]
struct OpenPortRow {
    #[tabled(rename = "Host")]
    ip: String,
    #[tabled(rename = "Port")]
    port: String,
    #[tabled(rename = "Service")]
    banner: String,
    #[tabled(rename = "Suggestion")]
    suggestion: String,
}

pub fn print_cli_table(report: &ScanReport) {
    println!();
    println!(
        "Report for {} generated at: {}",
        report.target,
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!();

    let hosts = report.hosts();
    if hosts.is_empty() {
        println!("No hosts reported.");
        return;
    }

    let rows: Vec<HostRow> = hosts
        .iter()
        .map(|h| HostRow {
            ip: h.ip.to_string(),
            hostname: or_dash(h.hostname),
            os: truncate(&or_dash(h.os), 40),
            ports: h.records.len(),
            open: h.open_ports(),
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{}", table);

    let open: Vec<OpenPortRow> = report
        .records
        .iter()
        .filter(|r| r.is_open())
        .map(|r| OpenPortRow {
            ip: r.ip.clone(),
            port: format!("{}/{}", r.port, r.protocol),
            banner: truncate(&or_dash(&r.banner), 30),
            suggestion: truncate(&r.suggestion, 70),
        })
        .collect();

    if !open.is_empty() {
        println!();
        println!("Found {} open ports:", open.len());
        println!();

        let table = Table::new(open).with(Style::rounded()).to_string();
        println!("{}", table);
    }

    println!();
    println!("Summary:");
    println!(
        "  {} hosts, {} ports, {} open",
        hosts.len(),
        report.records.len(),
        report.open_ports()
    );
}

fn or_dash(s: &str) -> String {
    if s.is_empty() {
        "-".to_string()
    } else {
        s.to_string()
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
