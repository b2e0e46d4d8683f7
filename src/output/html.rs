//! HTML report output format.
//!
//! Generates a self-contained HTML report with styling for easy viewing and sharing.

use crate::model::{ScanRecord, ScanReport};

/// Closing reminder printed at the bottom of every report.
pub const NOTICE: &str = "Run further checks manually; do not exploit without permission.";

/// Generate HTML as a string (for file output)
pub fn generate_html_string(report: &ScanReport) -> String {
    let hosts = report.hosts();
    let mut html = String::new();

    html.push_str(&format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>VAPT Report - {}</title>
    <style>
        :root {{
            --bg-color: #1a1a2e;
            --card-bg: #16213e;
            --text-color: #eee;
            --text-muted: #888;
            --border-color: #0f3460;
            --open: #dc3545;
            --accent: #0f3460;
        }}
        * {{ box-sizing: border-box; margin: 0; padding: 0; }}
        body {{
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            background: var(--bg-color);
            color: var(--text-color);
            line-height: 1.6;
            padding: 2rem;
        }}
        .container {{ max-width: 1400px; margin: 0 auto; }}
        header {{
            display: flex;
            justify-content: space-between;
            align-items: center;
            margin-bottom: 2rem;
            padding-bottom: 1rem;
            border-bottom: 1px solid var(--border-color);
        }}
        h1 {{ font-size: 1.75rem; font-weight: 600; }}
        .timestamp {{ color: var(--text-muted); font-size: 0.9rem; }}
        .stats {{
            display: grid;
            grid-template-columns: repeat(auto-fit, minmax(180px, 1fr));
            gap: 1rem;
            margin-bottom: 2rem;
        }}
        .stat-card {{
            background: var(--card-bg);
            padding: 1.25rem;
            border-radius: 8px;
            border: 1px solid var(--border-color);
        }}
        .stat-value {{ font-size: 2rem; font-weight: 700; }}
        .stat-label {{ color: var(--text-muted); font-size: 0.85rem; }}
        section {{ margin-bottom: 2rem; }}
        h2 {{
            font-size: 1.25rem;
            margin-bottom: 1rem;
            padding-bottom: 0.5rem;
            border-bottom: 1px solid var(--border-color);
        }}
        table {{
            width: 100%;
            border-collapse: collapse;
            background: var(--card-bg);
            border-radius: 8px;
            overflow: hidden;
        }}
        th, td {{
            padding: 0.75rem 1rem;
            text-align: left;
            border-bottom: 1px solid var(--border-color);
        }}
        th {{ background: var(--accent); font-weight: 600; }}
        tr:hover {{ background: rgba(255,255,255,0.02); }}
        .state-open {{ color: var(--open); font-weight: 600; }}
        .state-other {{ color: var(--text-muted); }}
        .empty {{ text-align: center; padding: 2rem; color: var(--text-muted); }}
        footer {{ text-align: center; color: var(--text-muted); font-size: 0.8rem; margin-top: 2rem; padding-top: 1rem; border-top: 1px solid var(--border-color); }}
    </style>
</head>
<body>
    <div class="container">
        <header>
            <h1>VAPT Report - {}</h1>
            <span class="timestamp">Generated: {}</span>
        </header>
"#,
        html_escape(&report.target),
        html_escape(&report.target),
        report.generated_at.format("%Y-%m-%d %H:%M UTC")
    ));

    html.push_str(&format!(
        r#"        <div class="stats">
            <div class="stat-card">
                <div class="stat-value">{}</div>
                <div class="stat-label">Hosts</div>
            </div>
            <div class="stat-card">
                <div class="stat-value">{}</div>
                <div class="stat-label">Ports</div>
            </div>
            <div class="stat-card">
                <div class="stat-value">{}</div>
                <div class="stat-label">Open Ports</div>
            </div>
        </div>
"#,
        hosts.len(),
        report.records.len(),
        report.open_ports()
    ));

    // Hosts section
    html.push_str(r#"        <section>
            <h2>Hosts</h2>
"#);

    if hosts.is_empty() {
        html.push_str(r#"            <div class="empty">No hosts reported</div>
"#);
    } else {
        html.push_str(r#"            <table>
                <thead>
                    <tr>
                        <th>IP</th>
                        <th>Hostname</th>
                        <th>OS</th>
                        <th>Ports</th>
                        <th>Open</th>
                    </tr>
                </thead>
                <tbody>
"#);

        for host in &hosts {
            html.push_str(&format!(
                r#"                    <tr>
                        <td>{}</td>
                        <td>{}</td>
                        <td>{}</td>
                        <td>{}</td>
                        <td>{}</td>
                    </tr>
"#,
                html_escape(host.ip),
                or_dash(host.hostname),
                or_dash(host.os),
                host.records.len(),
                host.open_ports()
            ));
        }

        html.push_str(r#"                </tbody>
            </table>
"#);
    }

    html.push_str("        </section>\n");

    // Ports section
    html.push_str(r#"        <section>
            <h2>Ports</h2>
"#);

    if report.records.is_empty() {
        html.push_str(r#"            <div class="empty">No ports reported</div>
"#);
    } else {
        html.push_str(r#"            <table>
                <thead>
                    <tr>
                        <th>IP</th>
                        <th>Hostname</th>
                        <th>OS</th>
                        <th>Port</th>
                        <th>Protocol</th>
                        <th>State</th>
                        <th>Service</th>
                        <th>Version</th>
                        <th>Banner</th>
                        <th>Suggestions</th>
                    </tr>
                </thead>
                <tbody>
"#);

        for record in &report.records {
            html.push_str(&record_row(record));
        }

        html.push_str(r#"                </tbody>
            </table>
"#);
    }

    html.push_str("        </section>\n");

    html.push_str(&format!(
        r#"        <footer>
            <p>{}</p>
            <p>Generated by vaptscan</p>
        </footer>
    </div>
</body>
</html>
"#,
        NOTICE
    ));

    html
}

fn record_row(record: &ScanRecord) -> String {
    let state_class = if record.is_open() {
        "state-open"
    } else {
        "state-other"
    };

    format!(
        r#"                    <tr>
                        <td>{}</td>
                        <td>{}</td>
                        <td>{}</td>
                        <td>{}</td>
                        <td>{}</td>
                        <td class="{}">{}</td>
                        <td>{}</td>
                        <td>{}</td>
                        <td>{}</td>
                        <td>{}</td>
                    </tr>
"#,
        html_escape(&record.ip),
        html_escape(&record.hostname),
        html_escape(&record.os),
        record.port,
        html_escape(&record.protocol),
        state_class,
        html_escape(&record.state),
        html_escape(&record.service),
        html_escape(&record.version),
        html_escape(&record.banner),
        html_escape(&record.suggestion)
    )
}

fn or_dash(s: &str) -> String {
    if s.is_empty() {
        "-".to_string()
    } else {
        html_escape(s)
    }
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn record(ip: &str, port: u16, state: &str, service: &str) -> ScanRecord {
        ScanRecord {
            host_index: 0,
            ip: ip.into(),
            hostname: String::new(),
            os: String::new(),
            port,
            protocol: "tcp".into(),
            state: state.into(),
            service: service.into(),
            version: String::new(),
            banner: service.into(),
            suggestion: String::new(),
        }
    }

    fn report(records: Vec<ScanRecord>) -> ScanReport {
        ScanReport::new("192.0.2.0/24", records)
            .with_time(Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap())
    }

    #[test]
    fn test_header_and_notice() {
        let html = generate_html_string(&report(vec![]));
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>VAPT Report - 192.0.2.0/24</title>"));
        assert!(html.contains("Generated: 2024-05-01 08:30 UTC"));
        assert!(html.contains(NOTICE));
        assert!(html.contains("No ports reported"));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_one_table_row_per_record() {
        let html = generate_html_string(&report(vec![
            record("192.0.2.1", 22, "open", "ssh"),
            record("192.0.2.1", 25, "closed", "smtp"),
            record("192.0.2.2", 80, "open", "http"),
        ]));
        assert_eq!(html.matches("class=\"state-open\"").count(), 2);
        assert_eq!(html.matches("class=\"state-other\"").count(), 1);
        assert!(html.contains("<td>192.0.2.2</td>"));
    }

    #[test]
    fn test_record_content_is_escaped() {
        let mut r = record("192.0.2.1", 80, "open", "http");
        r.banner = "<script>alert(1)</script>".into();
        r.suggestion = "a & b".into();

        let html = generate_html_string(&report(vec![r]));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("a &amp; b"));
    }
}
