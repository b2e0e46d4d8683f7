//! nmap XML (`-oX`) parsing.
//!
//! Walks `nmaprun/host*/ports/port*` and produces one [`ScanRecord`] per
//! port element, in document order. Optional attributes that nmap leaves
//! out become empty strings; a missing or non-numeric `portid` is an error.

use crate::error::{Error, Result};
use crate::model::ScanRecord;
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

const ROOT_ELEMENT: &str = "nmaprun";
const UNKNOWN_ADDRESS: &str = "unknown";

#[derive(Deserialize)]
struct NmapRun {
    #[serde(rename = "host", default)]
    hosts: Vec<XmlHost>,
}

#[derive(Deserialize)]
struct XmlHost {
    #[serde(rename = "address", default)]
    addresses: Vec<XmlAddress>,
    hostnames: Option<XmlHostnames>,
    os: Option<XmlOs>,
    ports: Option<XmlPorts>,
}

#[derive(Deserialize)]
struct XmlAddress {
    #[serde(rename = "@addr")]
    addr: Option<String>,
}

#[derive(Deserialize)]
struct XmlHostnames {
    #[serde(rename = "hostname", default)]
    names: Vec<XmlNamed>,
}

#[derive(Deserialize)]
struct XmlOs {
    #[serde(rename = "osmatch", default)]
    matches: Vec<XmlNamed>,
}

#[derive(Deserialize)]
struct XmlNamed {
    #[serde(rename = "@name")]
    name: Option<String>,
}

#[derive(Deserialize)]
struct XmlPorts {
    #[serde(rename = "port", default)]
    ports: Vec<XmlPort>,
}

#[derive(Deserialize)]
struct XmlPort {
    #[serde(rename = "@portid")]
    portid: u16,
    #[serde(rename = "@protocol")]
    protocol: Option<String>,
    state: Option<XmlState>,
    service: Option<XmlService>,
}

#[derive(Deserialize)]
struct XmlState {
    #[serde(rename = "@state")]
    state: Option<String>,
}

#[derive(Deserialize)]
struct XmlService {
    #[serde(rename = "@name")]
    name: Option<String>,
    #[serde(rename = "@version")]
    version: Option<String>,
}

/// Parses an nmap XML file from disk.
pub fn parse_file(path: &Path) -> Result<Vec<ScanRecord>> {
    let content = std::fs::read_to_string(path)?;
    debug!(path = %path.display(), bytes = content.len(), "read scan output");
    parse_str(&content)
}

/// Parses nmap XML held in memory.
pub fn parse_str(xml: &str) -> Result<Vec<ScanRecord>> {
    let root = root_element(xml)?;
    if root != ROOT_ELEMENT {
        return Err(Error::Parse(format!(
            "expected <{}> root element, found <{}>",
            ROOT_ELEMENT, root
        )));
    }

    let run: NmapRun = quick_xml::de::from_str(xml)?;

    let mut records = Vec::new();
    for (index, host) in run.hosts.into_iter().enumerate() {
        let before = records.len();
        collect_host(index, host, &mut records);
        debug!(ports = records.len() - before, "parsed host");
    }

    Ok(records)
}

fn collect_host(host_index: usize, host: XmlHost, records: &mut Vec<ScanRecord>) {
    let ip = host
        .addresses
        .into_iter()
        .next()
        .and_then(|a| a.addr)
        .unwrap_or_else(|| UNKNOWN_ADDRESS.to_string());
    let hostname = first_name(host.hostnames.map(|h| h.names));
    let os = first_name(host.os.map(|o| o.matches));

    let ports = host.ports.map(|p| p.ports).unwrap_or_default();
    for port in ports {
        let (service, version) = match port.service {
            Some(svc) => (
                svc.name.unwrap_or_default(),
                svc.version.unwrap_or_default(),
            ),
            None => (String::new(), String::new()),
        };

        records.push(ScanRecord {
            host_index,
            ip: ip.clone(),
            hostname: hostname.clone(),
            os: os.clone(),
            port: port.portid,
            protocol: port.protocol.unwrap_or_default(),
            state: port.state.and_then(|s| s.state).unwrap_or_default(),
            banner: ScanRecord::banner_for(&service, &version),
            service,
            version,
            suggestion: String::new(),
        });
    }
}

fn first_name(named: Option<Vec<XmlNamed>>) -> String {
    named
        .and_then(|list| list.into_iter().next())
        .and_then(|n| n.name)
        .unwrap_or_default()
}

/// Returns the name of the document's root element.
///
/// Reads the whole document, so anything after the root element closes
/// other than whitespace, comments, or processing instructions is rejected.
fn root_element(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    let mut root: Option<String> = None;
    let mut depth = 0usize;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| Error::Parse(e.to_string()))?;

        match event {
            Event::Start(e) | Event::Empty(e) if root.is_some() && depth == 0 => {
                return Err(Error::Parse(format!(
                    "unexpected <{}> after root element",
                    String::from_utf8_lossy(e.name().as_ref())
                )));
            }
            Event::Start(e) => {
                if root.is_none() {
                    root = Some(String::from_utf8_lossy(e.name().as_ref()).into_owned());
                }
                depth += 1;
            }
            Event::Empty(e) => {
                if root.is_none() {
                    root = Some(String::from_utf8_lossy(e.name().as_ref()).into_owned());
                }
            }
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Text(t) if depth == 0 && !t.iter().all(|b| b.is_ascii_whitespace()) => {
                return Err(Error::Parse("text outside the root element".into()));
            }
            Event::CData(_) if depth == 0 => {
                return Err(Error::Parse("CDATA outside the root element".into()));
            }
            Event::Eof if depth > 0 => {
                return Err(Error::Parse("document ends inside an open element".into()));
            }
            Event::Eof => {
                return root.ok_or_else(|| Error::Parse("document has no root element".into()));
            }
            _ => {}
        }
    }
}
