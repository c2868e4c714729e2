//! nmap report views and the summary printed by the CLI

use std::fmt;

use anyhow::{Context, Result};
use nmapwrap::cast::{self, TimestampError};
use nmapwrap::{view, Error, ErrorKind, ReadError, View};
use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

view! {
    /// nmap's `<port>` element
    pub struct PortTag {
        protocol: String = attr("protocol"),
        number: u16 = attr("portid"),
        state: String = attr("state.state"),
        service: String = attr("service.name"),
    }
}

view! {
    /// nmap's `<host>` element
    pub struct HostTag {
        start: OffsetDateTime = attr("starttime", cast::unix_timestamp, TimestampError),
        end: OffsetDateTime = attr("endtime", cast::unix_timestamp, TimestampError),
        status: String = attr("status.state"),
        address: String = attr("address.addr"),
        ports: Vec<PortTag> = tags("ports.port"),
    }
}

view! {
    /// Root `<nmaprun>` element of an nmap XML report
    pub struct PortScan {
        protocol: String = attr("scaninfo.protocol"),
        num_services: u32 = attr("scaninfo.numservices"),
        port_range: String = attr("scaninfo.services"),
        hosts: Vec<HostTag> = tags("host"),
    }
}

#[derive(Debug, Serialize)]
pub struct Report {
    pub protocol: String,
    pub num_services: u32,
    pub port_range: String,
    pub hosts: Vec<HostReport>,
}

#[derive(Debug, Serialize)]
pub struct HostReport {
    pub address: String,
    pub status: String,
    /// RFC 3339, UTC; nmap leaves the times out for hosts that are down
    pub start: Option<String>,
    pub end: Option<String>,
    /// Empty when the host has no `<ports>` element
    pub ports: Vec<PortReport>,
}

#[derive(Debug, Serialize)]
pub struct PortReport {
    pub protocol: String,
    pub number: u16,
    pub state: String,
    /// nmap omits `<service>` for ports it could not name
    pub service: Option<String>,
}

impl Report {
    pub fn from_scan(scan: &PortScan) -> Result<Self> {
        let hosts = scan
            .hosts()?
            .iter()
            .map(HostReport::from_host)
            .collect::<Result<_>>()?;
        Ok(Self {
            protocol: scan.protocol()?,
            num_services: scan.num_services()?,
            port_range: scan.port_range()?,
            hosts,
        })
    }
}

impl HostReport {
    fn from_host(host: &HostTag) -> Result<Self> {
        let ports = match host.ports() {
            Ok(ports) => ports
                .iter()
                .map(PortReport::from_port)
                .collect::<Result<_>>()?,
            Err(err) if is_missing(&err) => Vec::new(),
            Err(err) => return Err(err.into()),
        };
        Ok(Self {
            address: host.address()?,
            status: host.status()?,
            start: optional(host.start())?.map(format_time).transpose()?,
            end: optional(host.end())?.map(format_time).transpose()?,
            ports,
        })
    }
}

impl PortReport {
    fn from_port(port: &PortTag) -> Result<Self> {
        Ok(Self {
            protocol: port.protocol()?,
            number: port.number()?,
            state: port.state()?,
            service: optional(port.service())?,
        })
    }
}

fn is_missing(err: &Error) -> bool {
    matches!(
        err.kind(),
        ErrorKind::PathNotFound { .. } | ErrorKind::AttributeNotFound { .. }
    )
}

/// Absent elements or attributes become `None`; cast failures still fail
fn optional<T, E>(
    read: std::result::Result<T, ReadError<E>>,
) -> std::result::Result<Option<T>, ReadError<E>> {
    match read {
        Ok(value) => Ok(Some(value)),
        Err(ReadError::Resolve(err)) if is_missing(&err) => Ok(None),
        Err(err) => Err(err),
    }
}

fn format_time(at: OffsetDateTime) -> Result<String> {
    at.format(&Rfc3339)
        .with_context(|| format!("cannot format timestamp {}", at.unix_timestamp()))
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "protocol: {}", self.protocol)?;
        writeln!(f, "services: {} ({})", self.num_services, self.port_range)?;
        for host in &self.hosts {
            writeln!(f)?;
            writeln!(f, "host {} is {}", host.address, host.status)?;
            writeln!(f, "  start: {}", host.start.as_deref().unwrap_or("-"))?;
            writeln!(f, "  end:   {}", host.end.as_deref().unwrap_or("-"))?;
            for port in &host.ports {
                writeln!(
                    f,
                    "  {}/{:<5} {:<8} {}",
                    port.protocol,
                    port.number,
                    port.state,
                    port.service.as_deref().unwrap_or("unknown")
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCAN: &str = include_str!("../../nmapwrap/tests/fixtures/scan.xml");

    #[test]
    fn test_report_from_fixture() -> Result<()> {
        let report = Report::from_scan(&PortScan::parse(SCAN)?)?;
        assert_eq!(report.protocol, "tcp");
        assert_eq!(report.num_services, 3);
        assert_eq!(report.hosts.len(), 2);

        let local = &report.hosts[0];
        assert_eq!(local.address, "127.0.0.1");
        assert_eq!(local.start.as_deref(), Some("2023-11-14T22:13:20Z"));
        let numbers: Vec<_> = local.ports.iter().map(|p| p.number).collect();
        assert_eq!(numbers, vec![20, 21, 22]);
        Ok(())
    }

    #[test]
    fn test_missing_service_is_not_fatal() -> Result<()> {
        let port = PortTag::parse(r#"<port protocol="udp" portid="53"><state state="open"/></port>"#)?;
        let report = PortReport::from_port(&port)?;
        assert_eq!(report.service, None);
        assert_eq!(report.number, 53);
        Ok(())
    }

    #[test]
    fn test_text_rendering() -> Result<()> {
        let report = Report::from_scan(&PortScan::parse(SCAN)?)?;
        let text = report.to_string();
        assert!(text.starts_with("protocol: tcp\nservices: 3 (20-22)\n"));
        assert!(text.contains("host 203.0.113.7 is up"));
        assert!(text.contains("  tcp/22    open     ssh"));
        Ok(())
    }

    #[test]
    fn test_down_host_without_ports() -> Result<()> {
        let scan = PortScan::parse(
            r#"<nmaprun><scaninfo protocol="tcp" numservices="1" services="22"/>
               <host><status state="down"/><address addr="192.0.2.9"/></host>
               </nmaprun>"#,
        )?;
        let report = Report::from_scan(&scan)?;
        let host = &report.hosts[0];
        assert_eq!(host.status, "down");
        assert_eq!(host.start, None);
        assert!(host.ports.is_empty());
        assert!(report.to_string().contains("host 192.0.2.9 is down\n  start: -\n"));
        Ok(())
    }

    #[test]
    fn test_bad_timestamp_fails_report() -> Result<()> {
        let scan = PortScan::parse(
            r#"<nmaprun><scaninfo protocol="tcp" numservices="1" services="22"/>
               <host starttime="later" endtime="1"><status state="up"/><address addr="::1"/><ports/></host>
               </nmaprun>"#,
        )?;
        let err = Report::from_scan(&scan).unwrap_err();
        assert!(err.to_string().contains("invalid unix timestamp 'later'"));
        Ok(())
    }
}
