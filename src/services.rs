//! Windows services: live listing merged with the Service Catalog, plus
//! start/stop/start-type control.

use crate::catalog::{self, ImpactTier, ServiceDescriptor};
use crate::effect::{Effect, StartType};
use crate::error::MutationError;
use crate::executor::CommandExecutor;
use serde::{Deserialize, Serialize};

const LIST_SCRIPT: &str = "Get-Service | Select-Object Name, DisplayName, \
     @{Name='Status';Expression={[int]$_.Status}} | ConvertTo-Json -Compress";

const UNKNOWN_DISPLAY_NAME: &str = "Dịch vụ không xác định";
const GENERIC_DESCRIPTION: &str = "Dịch vụ hệ thống Windows";
const UNCATEGORIZED: &str = "Khác";

/// Raw record as reported by the service manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveServiceRecord {
    pub name: String,
    pub display_name: String,
    pub status: u32,
    pub start_type: u32,
    pub description: String,
}

/// A live record merged with catalog metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInfo {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub localized_name: String,
    pub status: u32,
    pub status_label: &'static str,
    pub start_type: u32,
    pub start_type_label: &'static str,
    pub category: String,
    pub impact: ImpactTier,
    pub safe_to_disable: bool,
    pub in_catalog: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawService {
    name: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    status: Option<u32>,
}

pub fn status_label(code: u32) -> &'static str {
    match code {
        1 => "Stopped",
        2 => "Start Pending",
        3 => "Stop Pending",
        4 => "Running",
        5 => "Continue Pending",
        6 => "Pause Pending",
        7 => "Paused",
        _ => "Unknown",
    }
}

/// Merge one live record with its catalog entry. Unknown services are never
/// reported as safe to disable.
pub fn reconcile(live: LiveServiceRecord) -> ServiceInfo {
    let descriptor = catalog::lookup(&live.name);
    merge(live, descriptor)
}

fn merge(live: LiveServiceRecord, descriptor: Option<&ServiceDescriptor>) -> ServiceInfo {
    let display_name = first_non_empty(&[
        live.display_name.as_str(),
        descriptor.map(|d| d.display_name).unwrap_or(""),
        live.name.as_str(),
    ])
    .unwrap_or(UNKNOWN_DISPLAY_NAME)
    .to_string();

    let start_type_label = StartType::from_code(live.start_type)
        .map(StartType::label)
        .unwrap_or("Unknown");

    match descriptor {
        Some(d) => ServiceInfo {
            name: live.name,
            display_name,
            description: d.localized_description.to_string(),
            localized_name: d.localized_name.to_string(),
            status: live.status,
            status_label: status_label(live.status),
            start_type: live.start_type,
            start_type_label,
            category: d.category.to_string(),
            impact: d.impact,
            safe_to_disable: d.safe_to_disable,
            in_catalog: true,
        },
        None => {
            let description = first_non_empty(&[live.description.as_str(), display_name.as_str()])
                .unwrap_or(GENERIC_DESCRIPTION)
                .to_string();
            ServiceInfo {
                name: live.name,
                localized_name: display_name.clone(),
                display_name,
                description,
                status: live.status,
                status_label: status_label(live.status),
                start_type: live.start_type,
                start_type_label,
                category: UNCATEGORIZED.to_string(),
                impact: ImpactTier::High,
                safe_to_disable: false,
                in_catalog: false,
            }
        }
    }
}

fn first_non_empty<'a>(candidates: &[&'a str]) -> Option<&'a str> {
    candidates.iter().map(|s| s.trim()).find(|s| !s.is_empty())
}

/// Parse `Get-Service | ConvertTo-Json` output. A single service comes back
/// as an object rather than an array. Windows PowerShell may prefix a BOM
/// once the output encoding is UTF-8.
fn parse_service_list(stdout: &str) -> Result<Vec<RawService>, MutationError> {
    let trimmed = stdout.trim().trim_start_matches('\u{feff}').trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    let parse_err = |e: serde_json::Error| MutationError::Parse {
        query: "Get-Service".to_string(),
        detail: e.to_string(),
    };
    if trimmed.starts_with('[') {
        serde_json::from_str(trimmed).map_err(parse_err)
    } else {
        serde_json::from_str::<RawService>(trimmed)
            .map(|s| vec![s])
            .map_err(parse_err)
    }
}

/// Extract the numeric START_TYPE from `sc qc` output.
fn parse_start_type(stdout: &str) -> Option<u32> {
    stdout
        .lines()
        .find(|l| l.trim_start().starts_with("START_TYPE"))
        .and_then(|l| l.split(':').nth(1))
        .and_then(|rest| rest.split_whitespace().next())
        .and_then(|n| n.parse().ok())
}

/// Start type of one service; Manual when the query fails.
pub fn query_start_type(exec: &dyn CommandExecutor, name: &str) -> u32 {
    match exec.run("sc", &["qc", name]) {
        Ok(out) => parse_start_type(&out.stdout).unwrap_or_else(|| {
            log::debug!("No START_TYPE in sc qc output for {}", name);
            StartType::Manual.code()
        }),
        Err(e) => {
            log::debug!("sc qc {} failed: {}", name, e);
            StartType::Manual.code()
        }
    }
}

/// List every service: one bulk query, then one start-type query per service.
pub fn list_services(exec: &dyn CommandExecutor) -> Result<Vec<ServiceInfo>, MutationError> {
    let output = exec
        .run_script(LIST_SCRIPT)
        .map_err(|e| MutationError::Command {
            effect: "list services".to_string(),
            source: e,
        })?;

    let raw = parse_service_list(&output.stdout)?;
    log::info!("Service manager reported {} services", raw.len());

    let mut services: Vec<ServiceInfo> = raw
        .into_iter()
        .filter(|r| !r.name.trim().is_empty())
        .map(|r| {
            let start_type = query_start_type(exec, &r.name);
            reconcile(LiveServiceRecord {
                display_name: r.display_name.unwrap_or_default(),
                status: r.status.unwrap_or(0),
                start_type,
                description: String::new(),
                name: r.name,
            })
        })
        .collect();

    services.sort_by(|a, b| {
        let running = |s: &ServiceInfo| if s.status == 4 { 0 } else { 1 };
        running(a)
            .cmp(&running(b))
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });

    Ok(services)
}

fn require_safe(name: &str) -> Result<(), MutationError> {
    match catalog::lookup(name) {
        Some(d) if d.safe_to_disable => Ok(()),
        Some(d) => Err(MutationError::Refused(format!(
            "{} ({}) là dịch vụ thiết yếu, không thể tắt",
            d.display_name, d.name
        ))),
        None => Err(MutationError::Refused(format!(
            "{} không có trong danh mục, không thể tắt",
            name
        ))),
    }
}

pub fn start_service(exec: &dyn CommandExecutor, name: &str) -> Result<String, MutationError> {
    Effect::StartService {
        service: name.to_string(),
    }
    .perform(exec)?;
    Ok(format!("Đã khởi động {}", name))
}

/// Stops a service. Only catalog services marked safe to disable.
pub fn stop_service(exec: &dyn CommandExecutor, name: &str) -> Result<String, MutationError> {
    require_safe(name)?;
    Effect::stop(name).perform(exec)?;
    Ok(format!("Đã dừng {}", name))
}

pub fn set_start_type(
    exec: &dyn CommandExecutor,
    name: &str,
    start: StartType,
) -> Result<String, MutationError> {
    if start == StartType::Disabled {
        require_safe(name)?;
    }
    Effect::start_type(name, start).perform(exec)?;
    Ok(format!("Đã đặt {} thành {}", name, start.label()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::fake::FakeExecutor;

    fn live(name: &str, display: &str) -> LiveServiceRecord {
        LiveServiceRecord {
            name: name.into(),
            display_name: display.into(),
            status: 4,
            start_type: 2,
            description: String::new(),
        }
    }

    #[test]
    fn catalog_fields_win_case_insensitively() {
        let info = reconcile(live("bits", "Background Intelligent Transfer Service"));
        let bits = catalog::lookup("BITS").unwrap();
        assert!(info.in_catalog);
        assert_eq!(info.category, bits.category);
        assert_eq!(info.safe_to_disable, bits.safe_to_disable);
        assert_eq!(info.description, bits.localized_description);
    }

    #[test]
    fn windows_update_merges_as_system_update() {
        let info = reconcile(live("wuauserv", "Windows Update"));
        assert_eq!(info.category, "System Update");
        assert!(!info.safe_to_disable);
    }

    #[test]
    fn unknown_service_is_never_safe() {
        let info = reconcile(live("VendorUpdater", "Vendor Updater"));
        assert!(!info.in_catalog);
        assert!(!info.safe_to_disable);
        assert_eq!(info.description, "Vendor Updater");
        assert_eq!(info.category, UNCATEGORIZED);
    }

    #[test]
    fn sparse_records_still_get_text() {
        let info = reconcile(live("", ""));
        assert_eq!(info.display_name, UNKNOWN_DISPLAY_NAME);
        assert!(!info.description.is_empty());

        let info = reconcile(live("x1", "  "));
        assert_eq!(info.display_name, "x1");
        assert_eq!(info.description, "x1");
    }

    #[test]
    fn catalog_display_name_fills_missing_live_one() {
        let info = reconcile(live("WSearch", ""));
        assert_eq!(info.display_name, "Windows Search");
    }

    #[test]
    fn parses_start_type_line() {
        let out = "SERVICE_NAME: wuauserv\n        TYPE               : 20  WIN32_SHARE_PROCESS\n        START_TYPE         : 3   DEMAND_START\n";
        assert_eq!(parse_start_type(out), Some(3));
        assert_eq!(parse_start_type("garbage"), None);
    }

    #[test]
    fn single_object_output_is_accepted() {
        let raw = parse_service_list(r#"{"Name":"BITS","DisplayName":"BITS svc","Status":4}"#)
            .unwrap();
        assert_eq!(raw.len(), 1);
        assert_eq!(raw[0].status, Some(4));
    }

    #[test]
    fn byte_order_mark_before_array_is_ignored() {
        let raw = parse_service_list(
            "\u{feff}[{\"Name\":\"BITS\",\"Status\":4},{\"Name\":\"WSearch\",\"Status\":1}]",
        )
        .unwrap();
        assert_eq!(raw.len(), 2);
        assert_eq!(raw[1].name, "WSearch");
    }

    #[test]
    fn listing_falls_back_to_manual_when_start_type_query_fails() {
        let exec = FakeExecutor::failing_on("sc qc Broken")
            .respond(
                "Get-Service",
                r#"[{"Name":"Broken","DisplayName":"Broken svc","Status":1},
                    {"Name":"wuauserv","DisplayName":"Windows Update","Status":4}]"#,
            )
            .respond("sc qc wuauserv", "        START_TYPE         : 2   AUTO_START");

        let services = list_services(&exec).unwrap();
        assert_eq!(services.len(), 2);
        // running first
        assert_eq!(services[0].name, "wuauserv");
        assert_eq!(services[0].start_type, 2);
        assert_eq!(services[1].name, "Broken");
        assert_eq!(services[1].start_type, StartType::Manual.code());
        // one bulk query plus one per service
        assert_eq!(exec.calls().len(), 3);
    }

    #[test]
    fn bulk_query_failure_is_an_error() {
        let exec = FakeExecutor::failing_on("Get-Service");
        assert!(list_services(&exec).is_err());
    }

    #[test]
    fn essential_services_cannot_be_stopped_or_disabled() {
        let exec = FakeExecutor::new();
        assert!(stop_service(&exec, "wuauserv").is_err());
        assert!(stop_service(&exec, "SomethingUnknown").is_err());
        assert!(set_start_type(&exec, "wuauserv", StartType::Disabled).is_err());
        assert!(exec.calls().is_empty());

        assert!(set_start_type(&exec, "wuauserv", StartType::Manual).is_ok());
        assert!(stop_service(&exec, "diagtrack").is_ok());
    }
}
