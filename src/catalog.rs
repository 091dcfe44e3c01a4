//! Service Catalog: editorial metadata for well-known Windows services,
//! in English and Vietnamese.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImpactTier {
    Low,
    Medium,
    High,
}

impl ImpactTier {
    pub fn label(self) -> &'static str {
        match self {
            ImpactTier::Low => "Low",
            ImpactTier::Medium => "Medium",
            ImpactTier::High => "High",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServiceDescriptor {
    pub name: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub localized_name: &'static str,
    pub localized_description: &'static str,
    pub category: &'static str,
    pub impact: ImpactTier,
    pub safe_to_disable: bool,
}

#[allow(clippy::too_many_arguments)]
const fn svc(
    name: &'static str,
    display_name: &'static str,
    description: &'static str,
    localized_name: &'static str,
    localized_description: &'static str,
    category: &'static str,
    impact: ImpactTier,
    safe_to_disable: bool,
) -> ServiceDescriptor {
    ServiceDescriptor {
        name,
        display_name,
        description,
        localized_name,
        localized_description,
        category,
        impact,
        safe_to_disable,
    }
}

use ImpactTier::{High, Low, Medium};

pub static SERVICE_CATALOG: &[ServiceDescriptor] = &[
    // ── Updates ──
    svc(
        "wuauserv",
        "Windows Update",
        "Detects, downloads and installs updates for Windows and other programs.",
        "Cập nhật Windows",
        "Phát hiện, tải xuống và cài đặt các bản cập nhật cho Windows và các chương trình khác.",
        "System Update",
        High,
        false,
    ),
    svc(
        "BITS",
        "Background Intelligent Transfer Service",
        "Transfers files in the background using idle network bandwidth.",
        "Dịch vụ truyền tải thông minh nền",
        "Truyền tệp ở chế độ nền bằng băng thông mạng nhàn rỗi; Windows Update cần dịch vụ này.",
        "System Update",
        High,
        false,
    ),
    svc(
        "UsoSvc",
        "Update Orchestrator Service",
        "Manages Windows Updates scanning, download and installation.",
        "Dịch vụ điều phối cập nhật",
        "Quản lý việc quét, tải xuống và cài đặt bản cập nhật Windows.",
        "System Update",
        High,
        false,
    ),
    svc(
        "DoSvc",
        "Delivery Optimization",
        "Performs content delivery optimization tasks such as peer-to-peer update sharing.",
        "Tối ưu hóa phân phối",
        "Chia sẻ bản cập nhật ngang hàng giữa các máy; có thể tắt nếu mạng bị giới hạn.",
        "System Update",
        Medium,
        true,
    ),
    // ── Telemetry ──
    svc(
        "DiagTrack",
        "Connected User Experiences and Telemetry",
        "Collects and sends usage and diagnostic data to Microsoft.",
        "Trải nghiệm người dùng được kết nối và đo từ xa",
        "Thu thập và gửi dữ liệu sử dụng, chẩn đoán về Microsoft. Tắt an toàn.",
        "Telemetry",
        Low,
        true,
    ),
    svc(
        "dmwappushservice",
        "Device Management WAP Push Message Routing Service",
        "Routes WAP push messages received by the device; used for telemetry.",
        "Định tuyến tin nhắn WAP Push",
        "Định tuyến tin nhắn WAP Push, chủ yếu phục vụ đo từ xa. Tắt an toàn.",
        "Telemetry",
        Low,
        true,
    ),
    svc(
        "diagnosticshub.standardcollector.service",
        "Microsoft Diagnostics Hub Standard Collector Service",
        "Collects real-time ETW events for diagnostics tools.",
        "Bộ thu thập chẩn đoán tiêu chuẩn",
        "Thu thập sự kiện ETW cho các công cụ chẩn đoán. Tắt an toàn với người dùng thông thường.",
        "Telemetry",
        Low,
        true,
    ),
    svc(
        "WerSvc",
        "Windows Error Reporting Service",
        "Allows errors to be reported when programs stop working.",
        "Dịch vụ báo cáo lỗi Windows",
        "Gửi báo cáo lỗi khi chương trình ngừng hoạt động. Tắt an toàn.",
        "Telemetry",
        Low,
        true,
    ),
    // ── Search & performance ──
    svc(
        "WSearch",
        "Windows Search",
        "Provides content indexing, property caching and search results.",
        "Tìm kiếm Windows",
        "Lập chỉ mục nội dung để tìm kiếm nhanh; tắt sẽ giảm tải ổ đĩa nhưng tìm kiếm chậm hơn.",
        "Search",
        Medium,
        true,
    ),
    svc(
        "SysMain",
        "SysMain",
        "Maintains and improves system performance over time (Superfetch).",
        "SysMain (Superfetch)",
        "Nạp trước ứng dụng vào bộ nhớ; ít tác dụng trên ổ SSD.",
        "Performance",
        Medium,
        true,
    ),
    // ── Gaming ──
    svc(
        "XblAuthManager",
        "Xbox Live Auth Manager",
        "Provides authentication and authorization services for Xbox Live.",
        "Trình quản lý xác thực Xbox Live",
        "Xác thực Xbox Live; chỉ cần khi dùng dịch vụ Xbox.",
        "Gaming",
        Low,
        true,
    ),
    svc(
        "XblGameSave",
        "Xbox Live Game Save",
        "Syncs save data for Xbox Live save-enabled games.",
        "Lưu trò chơi Xbox Live",
        "Đồng bộ dữ liệu lưu trò chơi lên đám mây Xbox Live.",
        "Gaming",
        Low,
        true,
    ),
    svc(
        "XboxNetApiSvc",
        "Xbox Live Networking Service",
        "Supports the Windows.Networking.XboxLive application programming interface.",
        "Dịch vụ mạng Xbox Live",
        "Hỗ trợ kết nối mạng cho trò chơi Xbox Live.",
        "Gaming",
        Low,
        true,
    ),
    svc(
        "XboxGipSvc",
        "Xbox Accessory Management Service",
        "Manages connected Xbox accessories.",
        "Quản lý phụ kiện Xbox",
        "Quản lý tay cầm và phụ kiện Xbox đã kết nối.",
        "Gaming",
        Low,
        true,
    ),
    // ── Printing & fax ──
    svc(
        "Spooler",
        "Print Spooler",
        "Spools print jobs and handles interaction with the printer.",
        "Bộ đệm in",
        "Quản lý lệnh in; chỉ tắt nếu bạn không dùng máy in.",
        "Printing",
        Medium,
        true,
    ),
    svc(
        "Fax",
        "Fax",
        "Enables you to send and receive faxes.",
        "Fax",
        "Gửi và nhận fax. Tắt an toàn.",
        "Printing",
        Low,
        true,
    ),
    // ── Remote access ──
    svc(
        "RemoteRegistry",
        "Remote Registry",
        "Enables remote users to modify registry settings on this computer.",
        "Sổ đăng ký từ xa",
        "Cho phép người dùng từ xa sửa sổ đăng ký; nên tắt để tăng bảo mật.",
        "Remote Access",
        Low,
        true,
    ),
    svc(
        "RemoteAccess",
        "Routing and Remote Access",
        "Offers routing services to businesses in local area and wide area network environments.",
        "Định tuyến và truy cập từ xa",
        "Dịch vụ định tuyến cho mạng doanh nghiệp; hiếm khi cần trên máy cá nhân.",
        "Remote Access",
        Low,
        true,
    ),
    svc(
        "TermService",
        "Remote Desktop Services",
        "Allows users to connect interactively to a remote computer.",
        "Dịch vụ Máy tính Từ xa",
        "Cho phép kết nối Remote Desktop tới máy này.",
        "Remote Access",
        Medium,
        true,
    ),
    // ── Media ──
    svc(
        "WMPNetworkSvc",
        "Windows Media Player Network Sharing Service",
        "Shares Windows Media Player libraries to other networked players.",
        "Chia sẻ mạng Windows Media Player",
        "Chia sẻ thư viện Windows Media Player qua mạng. Tắt an toàn.",
        "Media",
        Low,
        true,
    ),
    svc(
        "AudioSrv",
        "Windows Audio",
        "Manages audio for Windows-based programs.",
        "Âm thanh Windows",
        "Quản lý âm thanh cho chương trình; tắt sẽ mất âm thanh.",
        "Audio",
        High,
        false,
    ),
    svc(
        "AudioEndpointBuilder",
        "Windows Audio Endpoint Builder",
        "Manages audio devices for the Windows Audio service.",
        "Trình xây dựng điểm cuối âm thanh",
        "Quản lý thiết bị âm thanh cho dịch vụ Âm thanh Windows.",
        "Audio",
        High,
        false,
    ),
    // ── Location & sensors ──
    svc(
        "lfsvc",
        "Geolocation Service",
        "Monitors the current location of the system and manages geofences.",
        "Dịch vụ định vị",
        "Theo dõi vị trí hệ thống; tắt nếu không dùng ứng dụng cần vị trí.",
        "Location",
        Low,
        true,
    ),
    svc(
        "MapsBroker",
        "Downloaded Maps Manager",
        "Windows service for application access to downloaded maps.",
        "Trình quản lý bản đồ đã tải",
        "Cho ứng dụng truy cập bản đồ ngoại tuyến. Tắt an toàn.",
        "Location",
        Low,
        true,
    ),
    // ── Hardware ──
    svc(
        "bthserv",
        "Bluetooth Support Service",
        "Supports discovery and association of remote Bluetooth devices.",
        "Dịch vụ hỗ trợ Bluetooth",
        "Hỗ trợ thiết bị Bluetooth; chỉ tắt nếu máy không dùng Bluetooth.",
        "Hardware",
        Medium,
        true,
    ),
    svc(
        "TabletInputService",
        "Touch Keyboard and Handwriting Panel Service",
        "Enables touch keyboard and handwriting panel functionality.",
        "Bàn phím cảm ứng và bảng viết tay",
        "Bàn phím cảm ứng và nhập liệu bằng bút; tắt an toàn trên máy không cảm ứng.",
        "Hardware",
        Low,
        true,
    ),
    svc(
        "PlugPlay",
        "Plug and Play",
        "Enables a computer to recognize and adapt to hardware changes.",
        "Cắm và chạy",
        "Nhận diện thiết bị phần cứng; không được tắt.",
        "Hardware",
        High,
        false,
    ),
    // ── Networking ──
    svc(
        "Dhcp",
        "DHCP Client",
        "Registers and updates IP addresses and DNS records for this computer.",
        "Máy khách DHCP",
        "Nhận địa chỉ IP tự động; tắt sẽ mất kết nối mạng.",
        "Networking",
        High,
        false,
    ),
    svc(
        "Dnscache",
        "DNS Client",
        "Caches Domain Name System names and registers the full computer name.",
        "Máy khách DNS",
        "Lưu đệm phân giải tên miền; cần cho kết nối mạng.",
        "Networking",
        High,
        false,
    ),
    svc(
        "NlaSvc",
        "Network Location Awareness",
        "Collects and stores configuration information for the network.",
        "Nhận biết vị trí mạng",
        "Xác định loại mạng đang kết nối; không nên tắt.",
        "Networking",
        High,
        false,
    ),
    svc(
        "iphlpsvc",
        "IP Helper",
        "Provides tunnel connectivity using IPv6 transition technologies.",
        "Trợ giúp IP",
        "Cung cấp kết nối đường hầm IPv6; có thể tắt nếu không dùng IPv6.",
        "Networking",
        Low,
        true,
    ),
    svc(
        "SSDPSRV",
        "SSDP Discovery",
        "Discovers networked devices and services that use the SSDP discovery protocol.",
        "Khám phá SSDP",
        "Tìm thiết bị UPnP trong mạng nội bộ. Tắt an toàn.",
        "Networking",
        Low,
        true,
    ),
    // ── Security ──
    svc(
        "WinDefend",
        "Microsoft Defender Antivirus Service",
        "Helps protect users from malware and other potentially unwanted software.",
        "Dịch vụ chống vi-rút Microsoft Defender",
        "Bảo vệ máy khỏi phần mềm độc hại; không được tắt.",
        "Security",
        High,
        false,
    ),
    svc(
        "mpssvc",
        "Windows Defender Firewall",
        "Helps protect your computer by preventing unauthorized access.",
        "Tường lửa Windows Defender",
        "Chặn truy cập trái phép qua mạng; không được tắt.",
        "Security",
        High,
        false,
    ),
    svc(
        "BFE",
        "Base Filtering Engine",
        "Manages firewall and Internet Protocol security policies.",
        "Công cụ lọc cơ sở",
        "Nền tảng cho tường lửa và IPsec; không được tắt.",
        "Security",
        High,
        false,
    ),
    svc(
        "CryptSvc",
        "Cryptographic Services",
        "Confirms the signatures of Windows files and manages certificates.",
        "Dịch vụ mật mã",
        "Xác minh chữ ký tệp và quản lý chứng chỉ; không được tắt.",
        "Security",
        High,
        false,
    ),
    // ── Core system ──
    svc(
        "RpcSs",
        "Remote Procedure Call (RPC)",
        "The service control manager for COM and DCOM servers.",
        "Gọi thủ tục từ xa (RPC)",
        "Dịch vụ lõi của hệ thống; tắt sẽ làm Windows không khởi động được.",
        "Core System",
        High,
        false,
    ),
    svc(
        "DcomLaunch",
        "DCOM Server Process Launcher",
        "Launches COM and DCOM servers in response to object activation requests.",
        "Trình khởi chạy máy chủ DCOM",
        "Dịch vụ lõi của hệ thống; không được tắt.",
        "Core System",
        High,
        false,
    ),
    svc(
        "Winmgmt",
        "Windows Management Instrumentation",
        "Provides a common interface to access management information.",
        "Công cụ quản lý Windows (WMI)",
        "Cung cấp thông tin quản lý hệ thống; nhiều thành phần phụ thuộc dịch vụ này.",
        "Core System",
        High,
        false,
    ),
    svc(
        "EventLog",
        "Windows Event Log",
        "Manages events and event logs.",
        "Nhật ký sự kiện Windows",
        "Ghi nhật ký sự kiện hệ thống; không được tắt.",
        "Core System",
        High,
        false,
    ),
    svc(
        "Schedule",
        "Task Scheduler",
        "Enables a user to configure and schedule automated tasks.",
        "Trình lập lịch tác vụ",
        "Chạy tác vụ theo lịch; nhiều tác vụ bảo trì hệ thống phụ thuộc dịch vụ này.",
        "Core System",
        High,
        false,
    ),
    svc(
        "Themes",
        "Themes",
        "Provides user experience theme management.",
        "Chủ đề",
        "Quản lý giao diện chủ đề; tắt sẽ chuyển về giao diện cổ điển.",
        "Appearance",
        Medium,
        false,
    ),
];

static BY_NAME: Lazy<HashMap<String, &'static ServiceDescriptor>> = Lazy::new(|| {
    SERVICE_CATALOG
        .iter()
        .map(|d| (d.name.to_lowercase(), d))
        .collect()
});

/// Case-insensitive exact-name lookup.
pub fn lookup(name: &str) -> Option<&'static ServiceDescriptor> {
    BY_NAME.get(&name.trim().to_lowercase()).copied()
}

pub fn all() -> &'static [ServiceDescriptor] {
    SERVICE_CATALOG
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn lookup_ignores_case() {
        let bits = lookup("bits").unwrap();
        assert_eq!(bits.name, "BITS");
        assert_eq!(lookup("BiTs"), Some(bits));
    }

    #[test]
    fn windows_update_is_not_safe_to_disable() {
        let wu = lookup("wuauserv").unwrap();
        assert_eq!(wu.display_name, "Windows Update");
        assert_eq!(wu.category, "System Update");
        assert!(!wu.safe_to_disable);
    }

    #[test]
    fn unknown_names_miss() {
        assert!(lookup("definitely-not-a-service").is_none());
        // no substring matching
        assert!(lookup("Xbl").is_none());
    }

    #[test]
    fn names_are_unique_ignoring_case() {
        let mut seen = HashSet::new();
        for d in all() {
            assert!(seen.insert(d.name.to_lowercase()), "duplicate {}", d.name);
        }
    }

    #[test]
    fn every_entry_has_both_languages() {
        for d in all() {
            assert!(!d.display_name.is_empty(), "{}", d.name);
            assert!(!d.description.is_empty(), "{}", d.name);
            assert!(!d.localized_name.is_empty(), "{}", d.name);
            assert!(!d.localized_description.is_empty(), "{}", d.name);
        }
    }
}
