//! Option table: every togglable behavior, declared as data.
//!
//! An option id maps to an `Action`. For `Action::Steps` the disable path is
//! derived from the same declaration: each step carries its own reverse.

use crate::effect::{Effect, StartType};
use crate::error::{MutationError, TableError};
use crate::tuning::{self, TuningContext};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

const ADVANCED: &str = "HKCU\\Software\\Microsoft\\Windows\\CurrentVersion\\Explorer\\Advanced";
const EXPLORER: &str = "HKCU\\Software\\Microsoft\\Windows\\CurrentVersion\\Explorer";
const CABINET_STATE: &str =
    "HKCU\\Software\\Microsoft\\Windows\\CurrentVersion\\Explorer\\CabinetState";
const SEARCH: &str = "HKCU\\Software\\Microsoft\\Windows\\CurrentVersion\\Search";
const PERSONALIZE: &str =
    "HKCU\\Software\\Microsoft\\Windows\\CurrentVersion\\Themes\\Personalize";
const VISUAL_EFFECTS: &str =
    "HKCU\\Software\\Microsoft\\Windows\\CurrentVersion\\Explorer\\VisualEffects";
const DESKTOP: &str = "HKCU\\Control Panel\\Desktop";
const WINDOW_METRICS: &str = "HKCU\\Control Panel\\Desktop\\WindowMetrics";
const BLOCKED_EXTENSIONS: &str =
    "HKCU\\Software\\Microsoft\\Windows\\CurrentVersion\\Shell Extensions\\Blocked";
const CLASSIC_MENU_CLSID: &str =
    "HKCU\\Software\\Classes\\CLSID\\{86ca1aa0-34aa-4e8b-a509-50c905bae2a2}";
const CLASSIC_MENU_SERVER: &str =
    "HKCU\\Software\\Classes\\CLSID\\{86ca1aa0-34aa-4e8b-a509-50c905bae2a2}\\InprocServer32";
const TAKE_OWNERSHIP: &str = "HKCU\\Software\\Classes\\*\\shell\\TakeOwnership";
const OPEN_CMD_HERE: &str = "HKCU\\Software\\Classes\\Directory\\Background\\shell\\PcTunerCmd";
const COPY_AS_PATH: &str = "HKCU\\Software\\Classes\\AllFilesystemObjects\\shell\\PcTunerCopyPath";
const MODERN_SHARE_CLSID: &str = "{e2bf9676-5f8f-435c-97eb-11607a5bedf7}";
const GAME_DVR: &str = "HKCU\\Software\\Microsoft\\Windows\\CurrentVersion\\GameDVR";
const GAME_CONFIG_STORE: &str = "HKCU\\System\\GameConfigStore";
const GAME_BAR: &str = "HKCU\\Software\\Microsoft\\GameBar";
const CONTENT_DELIVERY: &str =
    "HKCU\\Software\\Microsoft\\Windows\\CurrentVersion\\ContentDeliveryManager";

const DATA_COLLECTION: &str = "HKLM\\SOFTWARE\\Policies\\Microsoft\\Windows\\DataCollection";
const WINDOWS_SEARCH_POLICY: &str = "HKLM\\SOFTWARE\\Policies\\Microsoft\\Windows\\Windows Search";
const WINDOWS_UPDATE_AU: &str = "HKLM\\SOFTWARE\\Policies\\Microsoft\\Windows\\WindowsUpdate\\AU";
const SYSTEM_POLICY: &str =
    "HKLM\\SOFTWARE\\Microsoft\\Windows\\CurrentVersion\\Policies\\System";
const SESSION_POWER: &str =
    "HKLM\\SYSTEM\\CurrentControlSet\\Control\\Session Manager\\Power";
const ERROR_REPORTING: &str = "HKLM\\SOFTWARE\\Microsoft\\Windows\\Windows Error Reporting";
const GRAPHICS_DRIVERS: &str = "HKLM\\SYSTEM\\CurrentControlSet\\Control\\GraphicsDrivers";
const MULTIMEDIA_PROFILE: &str =
    "HKLM\\SOFTWARE\\Microsoft\\Windows NT\\CurrentVersion\\Multimedia\\SystemProfile";
const DELIVERY_OPTIMIZATION: &str =
    "HKLM\\SOFTWARE\\Policies\\Microsoft\\Windows\\DeliveryOptimization";

pub const HIGH_PERFORMANCE_SCHEME: &str = "8c5e7fda-e8bf-4a96-9a85-a6e23a8c635c";
pub const BALANCED_SCHEME: &str = "381b4222-f694-41f0-9685-ff5bb260df2e";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionCategory {
    Taskbar,
    Explorer,
    ContextMenu,
    System,
    Performance,
    Appearance,
    Network,
}

impl OptionCategory {
    pub fn label(self) -> &'static str {
        match self {
            OptionCategory::Taskbar => "Thanh tác vụ",
            OptionCategory::Explorer => "File Explorer",
            OptionCategory::ContextMenu => "Menu chuột phải",
            OptionCategory::System => "Hệ thống",
            OptionCategory::Performance => "Hiệu năng",
            OptionCategory::Appearance => "Giao diện",
            OptionCategory::Network => "Mạng",
        }
    }
}

/// One forward effect and the effect that undoes it, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub forward: Effect,
    pub reverse: Option<Effect>,
}

pub type Procedure = fn(&TuningContext<'_>, bool) -> Result<String, MutationError>;

#[derive(Clone)]
pub enum Action {
    /// Reversible sequence; disabling runs each step's reverse in order.
    Steps(Vec<Step>),
    /// Runs once when enabled; disabling has nothing to undo.
    OneShot(Vec<Effect>),
    /// Two fixed value sets.
    Presets { on: Vec<Effect>, off: Vec<Effect> },
    /// Logic that inspects the machine before choosing effects.
    Procedure(Procedure),
}

impl std::fmt::Debug for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Steps(steps) => f.debug_tuple("Steps").field(steps).finish(),
            Action::OneShot(effects) => f.debug_tuple("OneShot").field(effects).finish(),
            Action::Presets { on, off } => f
                .debug_struct("Presets")
                .field("on", on)
                .field("off", off)
                .finish(),
            Action::Procedure(_) => f.write_str("Procedure"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OptionSpec {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: OptionCategory,
    pub action: Action,
    pub restart_explorer: bool,
}

impl OptionSpec {
    fn new(
        id: &'static str,
        category: OptionCategory,
        name: &'static str,
        description: &'static str,
        action: Action,
    ) -> Self {
        Self {
            id,
            name,
            description,
            category,
            action,
            restart_explorer: false,
        }
    }

    fn restarts_explorer(mut self) -> Self {
        self.restart_explorer = true;
        self
    }

    /// The static effect plan for one direction. `None` for procedures,
    /// whose effects depend on the machine.
    pub fn plan(&self, enabled: bool) -> Option<Vec<&Effect>> {
        match &self.action {
            Action::Steps(steps) if enabled => Some(steps.iter().map(|s| &s.forward).collect()),
            Action::Steps(steps) => Some(steps.iter().filter_map(|s| s.reverse.as_ref()).collect()),
            Action::OneShot(effects) if enabled => Some(effects.iter().collect()),
            Action::OneShot(_) => Some(Vec::new()),
            Action::Presets { on, .. } if enabled => Some(on.iter().collect()),
            Action::Presets { off, .. } => Some(off.iter().collect()),
            Action::Procedure(_) => None,
        }
    }

    pub fn requires_admin(&self) -> bool {
        match &self.action {
            Action::Procedure(_) => true,
            _ => [true, false]
                .iter()
                .filter_map(|&e| self.plan(e))
                .flatten()
                .any(Effect::needs_elevation),
        }
    }

    pub fn is_one_shot(&self) -> bool {
        matches!(self.action, Action::OneShot(_))
    }
}

/// User-facing toggle with its current enabled state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationOption {
    pub id: String,
    pub name: String,
    pub description: String,
    pub enabled: bool,
    pub category: OptionCategory,
}

impl OptimizationOption {
    pub fn new(id: &str, enabled: bool) -> Self {
        Self {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            enabled,
            category: OptionCategory::System,
        }
    }
}

impl From<&OptionSpec> for OptimizationOption {
    fn from(spec: &OptionSpec) -> Self {
        Self {
            id: spec.id.to_string(),
            name: spec.name.to_string(),
            description: spec.description.to_string(),
            enabled: false,
            category: spec.category,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OptionTable {
    specs: Vec<OptionSpec>,
    index: HashMap<&'static str, usize>,
}

impl OptionTable {
    /// Builds the lookup index. The first declaration wins for duplicate
    /// ids; `validate` reports them.
    pub fn new(specs: Vec<OptionSpec>) -> Self {
        let mut index = HashMap::new();
        for (i, spec) in specs.iter().enumerate() {
            index.entry(spec.id).or_insert(i);
        }
        Self { specs, index }
    }

    pub fn standard() -> Self {
        Self::new(standard_options())
    }

    pub fn get(&self, id: &str) -> Option<&OptionSpec> {
        self.index.get(id).map(|&i| &self.specs[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &OptionSpec> {
        self.specs.iter()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn validate(&self) -> Result<(), Vec<TableError>> {
        let mut errors = Vec::new();
        let mut seen = HashSet::new();

        for spec in &self.specs {
            if !seen.insert(spec.id) {
                errors.push(TableError::DuplicateId(spec.id.to_string()));
            }
            match &spec.action {
                Action::Steps(steps) => {
                    if steps.is_empty() {
                        errors.push(TableError::Empty(spec.id.to_string()));
                    } else if steps.iter().all(|s| s.reverse.is_none()) {
                        errors.push(TableError::MissingReverse(spec.id.to_string()));
                    }
                }
                Action::OneShot(effects) if effects.is_empty() => {
                    errors.push(TableError::Empty(spec.id.to_string()));
                }
                Action::Presets { on, off } => {
                    if on.is_empty() {
                        errors.push(TableError::Empty(spec.id.to_string()));
                    }
                    if off.is_empty() {
                        errors.push(TableError::MissingReverse(spec.id.to_string()));
                    }
                }
                Action::OneShot(_) | Action::Procedure(_) => {}
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
    /// What a full reset issues: one effect per registry value or key that a
    /// reversible step touches, then the Balanced power scheme.
    ///
    /// A step whose reverse is a delete contributes that delete. Values under
    /// `HKCU\Software` and `HKLM\SOFTWARE\Policies` are deleted, since their
    /// absence is the OS default. Any other value is a stock value and gets
    /// the step's reverse. Service steps, one-shots, presets and procedures
    /// are left alone. The first effect for a given value wins.
    pub fn reset_plan(&self) -> Vec<Effect> {
        let mut plan = Vec::new();
        let mut seen = HashSet::new();

        for spec in &self.specs {
            let Action::Steps(steps) = &spec.action else {
                continue;
            };
            for step in steps {
                let Some(reverse) = &step.reverse else {
                    continue;
                };
                let effect = match (&step.forward, reverse) {
                    (
                        _,
                        Effect::DeleteRegistryValue { .. } | Effect::DeleteRegistryKey { .. },
                    ) => reverse.clone(),
                    (Effect::SetRegistryValue { key, name, .. }, _) if absent_is_default(key) => {
                        Effect::delete_value(key, name)
                    }
                    (Effect::SetRegistryValue { .. } | Effect::SetRegistryDefault { .. }, _) => {
                        reverse.clone()
                    }
                    _ => continue,
                };
                if seen.insert(registry_target(&effect)) {
                    plan.push(effect);
                }
            }
        }

        plan.push(Effect::power_scheme(BALANCED_SCHEME));
        plan
    }
}

fn absent_is_default(key: &str) -> bool {
    let upper = key.to_ascii_uppercase();
    upper.starts_with("HKCU\\SOFTWARE\\") || upper.starts_with("HKLM\\SOFTWARE\\POLICIES\\")
}

/// The registry value or key an effect writes, case-folded.
fn registry_target(effect: &Effect) -> String {
    let target = match effect {
        Effect::SetRegistryValue { key, name, .. } | Effect::DeleteRegistryValue { key, name } => {
            format!("{}\\{}", key, name)
        }
        Effect::SetRegistryDefault { key, .. } | Effect::DeleteRegistryKey { key } => key.clone(),
        other => other.to_string(),
    };
    target.to_ascii_lowercase()
}

// ═══════════════════════════════════════════════════════════════════════════════
// Step helpers
// ═══════════════════════════════════════════════════════════════════════════════

fn toggle(key: &str, name: &str, on: u32, off: u32) -> Step {
    Step {
        forward: Effect::dword(key, name, on),
        reverse: Some(Effect::dword(key, name, off)),
    }
}

fn toggle_sz(key: &str, name: &str, on: &str, off: &str) -> Step {
    Step {
        forward: Effect::string(key, name, on),
        reverse: Some(Effect::string(key, name, off)),
    }
}

/// Sets a value; disabling deletes it so the OS default applies again.
fn set_or_delete(key: &str, name: &str, on: u32) -> Step {
    Step {
        forward: Effect::dword(key, name, on),
        reverse: Some(Effect::delete_value(key, name)),
    }
}

fn verb(key: &str, label: &str, command: &str) -> Vec<Step> {
    vec![
        Step {
            forward: Effect::default_value(key, label),
            reverse: Some(Effect::delete_key(key)),
        },
        Step {
            forward: Effect::default_value(&format!("{}\\command", key), command),
            reverse: None,
        },
    ]
}

/// Disable and stop a service; disabling the option puts it back to Manual.
fn disable_services(services: &[&str]) -> Vec<Step> {
    let mut steps = Vec::new();
    for svc in services {
        steps.push(Step {
            forward: Effect::start_type(svc, StartType::Disabled),
            reverse: Some(Effect::start_type(svc, StartType::Manual)),
        });
        steps.push(Step {
            forward: Effect::stop(svc),
            reverse: None,
        });
    }
    steps
}

fn procedure_network(ctx: &TuningContext<'_>, enabled: bool) -> Result<String, MutationError> {
    let effects = if enabled {
        tuning::network_on()
    } else {
        tuning::network_off()
    };
    for effect in &effects {
        effect.perform(ctx.exec)?;
    }
    Ok(format!("{} lệnh mạng đã chạy", effects.len()))
}

// ═══════════════════════════════════════════════════════════════════════════════
// The standard table
// ═══════════════════════════════════════════════════════════════════════════════

fn standard_options() -> Vec<OptionSpec> {
    use Action::{OneShot, Presets, Procedure, Steps};
    use OptionCategory::*;

    vec![
        // ── Taskbar ──
        OptionSpec::new(
            "taskbar_align_left",
            Taskbar,
            "Căn trái thanh tác vụ (kiểu Windows 10)",
            "Đưa nút Start và biểu tượng về bên trái thanh tác vụ.",
            Steps(vec![toggle(ADVANCED, "TaskbarAl", 0, 1)]),
        )
        .restarts_explorer(),
        OptionSpec::new(
            "taskbar_center_icons",
            Taskbar,
            "Căn giữa thanh tác vụ (kiểu Windows 11)",
            "Đặt nút Start và biểu tượng ở giữa thanh tác vụ.",
            Steps(vec![toggle(ADVANCED, "TaskbarAl", 1, 0)]),
        )
        .restarts_explorer(),
        OptionSpec::new(
            "taskbar_hide_search",
            Taskbar,
            "Ẩn ô tìm kiếm",
            "Ẩn ô tìm kiếm trên thanh tác vụ.",
            Steps(vec![toggle(SEARCH, "SearchboxTaskbarMode", 0, 1)]),
        ),
        OptionSpec::new(
            "taskbar_hide_task_view",
            Taskbar,
            "Ẩn nút Task View",
            "Ẩn nút xem tác vụ trên thanh tác vụ.",
            Steps(vec![toggle(ADVANCED, "ShowTaskViewButton", 0, 1)]),
        ),
        OptionSpec::new(
            "taskbar_hide_widgets",
            Taskbar,
            "Ẩn Widgets",
            "Ẩn nút Widgets (tin tức và thời tiết).",
            Steps(vec![toggle(ADVANCED, "TaskbarDa", 0, 1)]),
        ),
        OptionSpec::new(
            "taskbar_hide_chat",
            Taskbar,
            "Ẩn Chat",
            "Ẩn nút Microsoft Teams Chat trên thanh tác vụ.",
            Steps(vec![toggle(ADVANCED, "TaskbarMn", 0, 1)]),
        ),
        OptionSpec::new(
            "taskbar_small_icons",
            Taskbar,
            "Biểu tượng nhỏ",
            "Dùng biểu tượng nhỏ trên thanh tác vụ.",
            Steps(vec![set_or_delete(ADVANCED, "TaskbarSmallIcons", 1)]),
        )
        .restarts_explorer(),
        OptionSpec::new(
            "taskbar_never_combine",
            Taskbar,
            "Không gộp nút",
            "Không bao giờ gộp các cửa sổ cùng ứng dụng trên thanh tác vụ.",
            Steps(vec![toggle(ADVANCED, "TaskbarGlomLevel", 2, 0)]),
        )
        .restarts_explorer(),
        OptionSpec::new(
            "taskbar_show_seconds",
            Taskbar,
            "Hiện giây trên đồng hồ",
            "Hiển thị giây trên đồng hồ khay hệ thống.",
            Steps(vec![toggle(ADVANCED, "ShowSecondsInSystemClock", 1, 0)]),
        )
        .restarts_explorer(),
        // ── Explorer ──
        OptionSpec::new(
            "explorer_show_extensions",
            Explorer,
            "Hiện phần mở rộng tệp",
            "Luôn hiển thị phần mở rộng của tệp (.exe, .txt, ...).",
            Steps(vec![toggle(ADVANCED, "HideFileExt", 0, 1)]),
        ),
        OptionSpec::new(
            "explorer_show_hidden",
            Explorer,
            "Hiện tệp ẩn",
            "Hiển thị tệp và thư mục ẩn.",
            Steps(vec![toggle(ADVANCED, "Hidden", 1, 2)]),
        ),
        OptionSpec::new(
            "explorer_show_system_files",
            Explorer,
            "Hiện tệp hệ thống được bảo vệ",
            "Hiển thị tệp hệ điều hành được bảo vệ.",
            Steps(vec![toggle(ADVANCED, "ShowSuperHidden", 1, 0)]),
        ),
        OptionSpec::new(
            "explorer_open_this_pc",
            Explorer,
            "Mở This PC thay vì Home",
            "File Explorer mở vào This PC.",
            Steps(vec![toggle(ADVANCED, "LaunchTo", 1, 2)]),
        ),
        OptionSpec::new(
            "explorer_hide_recent",
            Explorer,
            "Ẩn tệp gần đây",
            "Không hiển thị tệp và thư mục dùng gần đây trong Quick Access.",
            Steps(vec![
                toggle(EXPLORER, "ShowRecent", 0, 1),
                toggle(EXPLORER, "ShowFrequent", 0, 1),
            ]),
        ),
        OptionSpec::new(
            "explorer_compact_mode",
            Explorer,
            "Chế độ thu gọn",
            "Giảm khoảng cách giữa các mục trong File Explorer.",
            Steps(vec![toggle(ADVANCED, "UseCompactMode", 1, 0)]),
        ),
        OptionSpec::new(
            "explorer_full_path_title",
            Explorer,
            "Hiện đường dẫn đầy đủ",
            "Hiển thị đường dẫn đầy đủ trên thanh tiêu đề.",
            Steps(vec![toggle(CABINET_STATE, "FullPath", 1, 0)]),
        ),
        // ── Context menu ──
        OptionSpec::new(
            "context_classic_menu",
            ContextMenu,
            "Menu chuột phải kiểu cũ",
            "Khôi phục menu chuột phải đầy đủ của Windows 10 trên Windows 11.",
            Steps(vec![Step {
                forward: Effect::default_value(CLASSIC_MENU_SERVER, ""),
                reverse: Some(Effect::delete_key(CLASSIC_MENU_CLSID)),
            }]),
        )
        .restarts_explorer(),
        OptionSpec::new(
            "context_take_ownership",
            ContextMenu,
            "Thêm \"Take Ownership\"",
            "Thêm lệnh chiếm quyền sở hữu tệp vào menu chuột phải.",
            Steps(verb(
                TAKE_OWNERSHIP,
                "Take Ownership",
                "cmd.exe /c takeown /f \"%1\" && icacls \"%1\" /grant administrators:F",
            )),
        ),
        OptionSpec::new(
            "context_open_cmd_here",
            ContextMenu,
            "Thêm \"Mở Command Prompt tại đây\"",
            "Thêm lệnh mở cửa sổ dòng lệnh tại thư mục hiện tại.",
            Steps(verb(
                OPEN_CMD_HERE,
                "Mở Command Prompt tại đây",
                "cmd.exe /s /k pushd \"%V\"",
            )),
        ),
        OptionSpec::new(
            "context_copy_as_path",
            ContextMenu,
            "Thêm \"Sao chép đường dẫn\"",
            "Thêm lệnh sao chép đường dẫn tệp vào menu chuột phải.",
            Steps(verb(
                COPY_AS_PATH,
                "Sao chép đường dẫn",
                "cmd.exe /c echo|set /p=\"%1\"|clip",
            )),
        ),
        OptionSpec::new(
            "context_hide_share",
            ContextMenu,
            "Ẩn mục \"Chia sẻ\"",
            "Ẩn lệnh Chia sẻ hiện đại khỏi menu chuột phải.",
            Steps(vec![Step {
                forward: Effect::string(BLOCKED_EXTENSIONS, MODERN_SHARE_CLSID, ""),
                reverse: Some(Effect::delete_value(BLOCKED_EXTENSIONS, MODERN_SHARE_CLSID)),
            }]),
        )
        .restarts_explorer(),
        // ── System ──
        OptionSpec::new(
            "system_disable_telemetry",
            System,
            "Tắt đo từ xa",
            "Chặn gửi dữ liệu chẩn đoán và tắt dịch vụ DiagTrack.",
            Steps({
                let mut steps = vec![set_or_delete(DATA_COLLECTION, "AllowTelemetry", 0)];
                steps.extend(disable_services(&["DiagTrack", "dmwappushservice"]));
                steps
            }),
        ),
        OptionSpec::new(
            "system_disable_cortana",
            System,
            "Tắt Cortana",
            "Tắt trợ lý Cortana qua chính sách nhóm.",
            Steps(vec![set_or_delete(WINDOWS_SEARCH_POLICY, "AllowCortana", 0)]),
        ),
        OptionSpec::new(
            "system_disable_auto_update",
            System,
            "Tắt tự động cập nhật",
            "Ngăn Windows tự động tải và cài đặt bản cập nhật.",
            Steps(vec![set_or_delete(WINDOWS_UPDATE_AU, "NoAutoUpdate", 1)]),
        ),
        OptionSpec::new(
            "system_disable_uac_dimming",
            System,
            "Tắt làm mờ màn hình UAC",
            "Hộp thoại UAC hiện trên màn hình làm việc thay vì màn hình bảo mật.",
            Steps(vec![toggle(SYSTEM_POLICY, "PromptOnSecureDesktop", 0, 1)]),
        ),
        OptionSpec::new(
            "system_disable_hibernation",
            System,
            "Tắt ngủ đông",
            "Tắt chế độ ngủ đông và xóa hiberfil.sys để giải phóng dung lượng.",
            Steps(vec![Step {
                forward: Effect::powercfg(&["/hibernate", "off"]),
                reverse: Some(Effect::powercfg(&["/hibernate", "on"])),
            }]),
        ),
        OptionSpec::new(
            "system_disable_fast_startup",
            System,
            "Tắt khởi động nhanh",
            "Tắt Fast Startup để máy tắt hẳn khi Shut down.",
            Steps(vec![toggle(SESSION_POWER, "HiberbootEnabled", 0, 1)]),
        ),
        OptionSpec::new(
            "system_disable_error_reporting",
            System,
            "Tắt báo cáo lỗi",
            "Tắt Windows Error Reporting.",
            Steps({
                let mut steps = vec![toggle(ERROR_REPORTING, "Disabled", 1, 0)];
                steps.extend(disable_services(&["WerSvc"]));
                steps
            }),
        ),
        OptionSpec::new(
            "system_disable_sysmain",
            System,
            "Tắt SysMain (Superfetch)",
            "Tắt dịch vụ nạp trước ứng dụng vào bộ nhớ.",
            Steps(disable_services(&["SysMain"])),
        ),
        OptionSpec::new(
            "system_disable_search_indexing",
            System,
            "Tắt lập chỉ mục tìm kiếm",
            "Tắt dịch vụ Windows Search để giảm tải ổ đĩa.",
            Steps(disable_services(&["WSearch"])),
        ),
        OptionSpec::new(
            "system_disable_xbox_services",
            System,
            "Tắt dịch vụ Xbox",
            "Tắt các dịch vụ Xbox Live nếu không chơi game Xbox.",
            Steps(disable_services(&[
                "XblAuthManager",
                "XblGameSave",
                "XboxNetApiSvc",
                "XboxGipSvc",
            ])),
        ),
        OptionSpec::new(
            "system_disable_remote_registry",
            System,
            "Tắt Remote Registry",
            "Không cho phép sửa sổ đăng ký từ xa.",
            Steps(disable_services(&["RemoteRegistry"])),
        ),
        OptionSpec::new(
            "system_disable_tips",
            System,
            "Tắt mẹo và quảng cáo",
            "Tắt gợi ý, mẹo và ứng dụng quảng cáo trong Start.",
            Steps(vec![
                toggle(CONTENT_DELIVERY, "SoftLandingEnabled", 0, 1),
                toggle(CONTENT_DELIVERY, "SubscribedContent-338388Enabled", 0, 1),
                toggle(CONTENT_DELIVERY, "SubscribedContent-310093Enabled", 0, 1),
                toggle(CONTENT_DELIVERY, "SilentInstalledAppsEnabled", 0, 1),
            ]),
        ),
        // ── Performance ──
        OptionSpec::new(
            "performance_high_power_plan",
            Performance,
            "Chế độ nguồn hiệu năng cao",
            "Kích hoạt gói nguồn High Performance.",
            Steps(vec![Step {
                forward: Effect::power_scheme(HIGH_PERFORMANCE_SCHEME),
                reverse: Some(Effect::power_scheme(BALANCED_SCHEME)),
            }]),
        ),
        OptionSpec::new(
            "performance_disable_game_dvr",
            Performance,
            "Tắt Game DVR",
            "Tắt ghi hình nền của Xbox Game Bar.",
            Steps(vec![
                toggle(GAME_DVR, "AppCaptureEnabled", 0, 1),
                toggle(GAME_CONFIG_STORE, "GameDVR_Enabled", 0, 1),
            ]),
        ),
        OptionSpec::new(
            "performance_game_mode",
            Performance,
            "Bật Game Mode",
            "Ưu tiên tài nguyên cho trò chơi đang chạy.",
            Steps(vec![toggle(GAME_BAR, "AutoGameModeEnabled", 1, 0)]),
        ),
        OptionSpec::new(
            "performance_gpu_scheduling",
            Performance,
            "Lập lịch GPU tăng tốc phần cứng",
            "Bật Hardware-accelerated GPU scheduling (cần khởi động lại).",
            Steps(vec![toggle(GRAPHICS_DRIVERS, "HwSchMode", 2, 1)]),
        ),
        OptionSpec::new(
            "performance_menu_delay",
            Performance,
            "Menu hiện tức thì",
            "Bỏ độ trễ khi mở menu.",
            Steps(vec![toggle_sz(DESKTOP, "MenuShowDelay", "0", "400")]),
        ),
        OptionSpec::new(
            "performance_network_throttling",
            Performance,
            "Tắt giới hạn mạng đa phương tiện",
            "Bỏ giới hạn băng thông mạng khi phát đa phương tiện.",
            Steps(vec![
                toggle(MULTIMEDIA_PROFILE, "NetworkThrottlingIndex", u32::MAX, 10),
                toggle(MULTIMEDIA_PROFILE, "SystemResponsiveness", 0, 20),
            ]),
        ),
        OptionSpec::new(
            "performance_ram",
            Performance,
            "Tối ưu RAM",
            "Giữ nhân hệ thống trong RAM và tắt nạp trước.",
            Presets {
                on: tuning::ram_on(),
                off: tuning::ram_off(),
            },
        ),
        OptionSpec::new(
            "performance_cpu",
            Performance,
            "Tối ưu CPU",
            "Giữ xung CPU tối đa và ưu tiên ứng dụng đang dùng.",
            Presets {
                on: tuning::cpu_on(),
                off: tuning::cpu_off(),
            },
        ),
        OptionSpec::new(
            "performance_disk",
            Performance,
            "Tối ưu ổ đĩa",
            "Tắt ghi thời gian truy cập; chống phân mảnh ổ HDD hoặc TRIM ổ SSD.",
            Procedure(tuning::disk_optimization),
        ),
        // ── Appearance ──
        OptionSpec::new(
            "appearance_dark_mode",
            Appearance,
            "Chế độ tối",
            "Dùng giao diện tối cho ứng dụng và hệ thống.",
            Steps(vec![
                toggle(PERSONALIZE, "AppsUseLightTheme", 0, 1),
                toggle(PERSONALIZE, "SystemUsesLightTheme", 0, 1),
            ]),
        ),
        OptionSpec::new(
            "appearance_disable_transparency",
            Appearance,
            "Tắt hiệu ứng trong suốt",
            "Tắt hiệu ứng trong suốt của thanh tác vụ và Start.",
            Steps(vec![toggle(PERSONALIZE, "EnableTransparency", 0, 1)]),
        ),
        OptionSpec::new(
            "appearance_disable_animations",
            Appearance,
            "Tắt hiệu ứng chuyển động",
            "Tắt hoạt ảnh khi thu nhỏ, phóng to cửa sổ và trên thanh tác vụ.",
            Steps(vec![
                toggle_sz(WINDOW_METRICS, "MinAnimate", "0", "1"),
                toggle(ADVANCED, "TaskbarAnimations", 0, 1),
            ]),
        ),
        OptionSpec::new(
            "appearance_best_performance",
            Appearance,
            "Hiệu ứng hình ảnh: ưu tiên hiệu năng",
            "Chọn \"Adjust for best performance\" cho hiệu ứng hình ảnh.",
            Steps(vec![toggle(VISUAL_EFFECTS, "VisualFXSetting", 2, 0)]),
        ),
        // ── Network ──
        OptionSpec::new(
            "network_optimization",
            Network,
            "Tối ưu mạng",
            "Điều chỉnh TCP (auto-tuning, RSS, ECN) và làm mới bộ đệm DNS.",
            Procedure(procedure_network),
        ),
        OptionSpec::new(
            "network_flush_dns",
            Network,
            "Làm mới bộ đệm DNS",
            "Xóa bộ đệm phân giải DNS.",
            OneShot(vec![Effect::program("ipconfig", &["/flushdns"])]),
        ),
        OptionSpec::new(
            "network_reset_winsock",
            Network,
            "Đặt lại Winsock",
            "Đặt lại danh mục Winsock (cần khởi động lại).",
            OneShot(vec![Effect::netsh(&["winsock", "reset"])]),
        ),
        OptionSpec::new(
            "network_disable_delivery_optimization",
            Network,
            "Tắt chia sẻ cập nhật P2P",
            "Không tải hoặc chia sẻ bản cập nhật với máy khác.",
            Steps(vec![set_or_delete(DELIVERY_OPTIMIZATION, "DODownloadMode", 0)]),
        ),
    ]
}
