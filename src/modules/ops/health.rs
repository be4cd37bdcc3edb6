//! Health rows derived from the latest telemetry sample

use crate::domain::Telemetry;

use super::metrics::CallCounters;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpsStatus {
    Ok,
    Warning,
    Error,
    Unknown,
}

impl OpsStatus {
    pub fn label(&self) -> &'static str {
        match self {
            OpsStatus::Ok => "OK",
            OpsStatus::Warning => "WARN",
            OpsStatus::Error => "ERR",
            OpsStatus::Unknown => "--",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            OpsStatus::Ok => "●",
            OpsStatus::Warning => "◐",
            OpsStatus::Error => "○",
            OpsStatus::Unknown => "?",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HealthItem {
    pub label: &'static str,
    pub value: String,
    pub status: OpsStatus,
}

fn load_status(percent: u64) -> OpsStatus {
    if percent < 70 {
        OpsStatus::Ok
    } else if percent < 90 {
        OpsStatus::Warning
    } else {
        OpsStatus::Error
    }
}

pub fn health_items(latest: Option<Telemetry>, counters: &CallCounters) -> Vec<HealthItem> {
    let percent = |value: Option<u64>| match value {
        Some(v) => (format!("{v}%"), load_status(v)),
        None => ("N/A".to_string(), OpsStatus::Unknown),
    };
    let (cpu, cpu_status) = percent(latest.map(|t| t.cpu));
    let (ram, ram_status) = percent(latest.map(|t| t.ram));

    let net = latest
        .map(|t| format!("{} MB/s", t.net))
        .unwrap_or_else(|| "N/A".to_string());
    let net_status = if latest.is_some() { OpsStatus::Ok } else { OpsStatus::Unknown };

    let link_status = match (counters.total(), counters.last_failed) {
        (0, _) => OpsStatus::Unknown,
        (_, true) => OpsStatus::Error,
        (_, false) if counters.failed > 0 => OpsStatus::Warning,
        _ => OpsStatus::Ok,
    };
    let link = format!("{} ok / {} failed", counters.ok, counters.failed);

    vec![
        HealthItem { label: "cpu", value: cpu, status: cpu_status },
        HealthItem { label: "ram", value: ram, status: ram_status },
        HealthItem { label: "net", value: net, status: net_status },
        HealthItem { label: "neural link", value: link, status: link_status },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds() {
        let items = health_items(
            Some(Telemetry { cpu: 95, ram: 75, net: 3 }),
            &CallCounters { ok: 3, failed: 0, last_failed: false },
        );
        let statuses: Vec<_> = items.iter().map(|i| i.status).collect();
        assert_eq!(
            statuses,
            vec![OpsStatus::Error, OpsStatus::Warning, OpsStatus::Ok, OpsStatus::Ok]
        );
    }

    #[test]
    fn test_no_data_is_unknown() {
        let items = health_items(None, &CallCounters::default());
        assert!(items.iter().all(|i| i.status == OpsStatus::Unknown));
    }

    #[test]
    fn test_recent_failure_flags_link() {
        let items = health_items(None, &CallCounters { ok: 5, failed: 1, last_failed: true });
        assert_eq!(items[3].status, OpsStatus::Error);
        assert_eq!(items[3].value, "5 ok / 1 failed");
    }
}
