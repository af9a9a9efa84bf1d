//! Permission usage analysis against the built-in risk taxonomy.

use std::fmt;

use serde::Serialize;

use crate::{
    manifest::{ManifestDocument, StringTable},
    results::{Finding, FindingCategory},
    severity::Severity,
};

/// Protection-risk tier of a permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    /// Granted automatically at install time.
    Normal,
    /// Guards data or resources the user considers sensitive.
    Dangerous,
    /// Only granted to applications signed with the declaring key.
    Signature,
    /// Not part of the built-in taxonomy.
    Unknown,
}

impl RiskTier {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Dangerous => "dangerous",
            Self::Signature => "signature",
            Self::Unknown => "unknown",
        }
    }

    /// Classifies a permission name against the built-in taxonomy.
    ///
    /// Membership is a fixed table: the platform's runtime permissions
    /// for the dangerous tier, common install-time permissions for the
    /// normal tier and platform-key permissions for the signature tier.
    pub fn of(name: &str) -> Self {
        match name {
            "android.permission.ACCEPT_HANDOVER"
            | "android.permission.ACCESS_BACKGROUND_LOCATION"
            | "android.permission.ACCESS_COARSE_LOCATION"
            | "android.permission.ACCESS_FINE_LOCATION"
            | "android.permission.ACCESS_MEDIA_LOCATION"
            | "android.permission.ACTIVITY_RECOGNITION"
            | "android.permission.ANSWER_PHONE_CALLS"
            | "android.permission.BLUETOOTH_ADVERTISE"
            | "android.permission.BLUETOOTH_CONNECT"
            | "android.permission.BLUETOOTH_SCAN"
            | "android.permission.BODY_SENSORS"
            | "android.permission.BODY_SENSORS_BACKGROUND"
            | "android.permission.CALL_PHONE"
            | "android.permission.CAMERA"
            | "android.permission.GET_ACCOUNTS"
            | "android.permission.NEARBY_WIFI_DEVICES"
            | "android.permission.POST_NOTIFICATIONS"
            | "android.permission.PROCESS_OUTGOING_CALLS"
            | "android.permission.READ_CALENDAR"
            | "android.permission.READ_CALL_LOG"
            | "android.permission.READ_CONTACTS"
            | "android.permission.READ_EXTERNAL_STORAGE"
            | "android.permission.READ_MEDIA_AUDIO"
            | "android.permission.READ_MEDIA_IMAGES"
            | "android.permission.READ_MEDIA_VIDEO"
            | "android.permission.READ_PHONE_NUMBERS"
            | "android.permission.READ_PHONE_STATE"
            | "android.permission.READ_SMS"
            | "android.permission.RECEIVE_MMS"
            | "android.permission.RECEIVE_SMS"
            | "android.permission.RECEIVE_WAP_PUSH"
            | "android.permission.RECORD_AUDIO"
            | "android.permission.SEND_SMS"
            | "android.permission.USE_SIP"
            | "android.permission.UWB_RANGING"
            | "android.permission.WRITE_CALENDAR"
            | "android.permission.WRITE_CALL_LOG"
            | "android.permission.WRITE_CONTACTS"
            | "android.permission.WRITE_EXTERNAL_STORAGE"
            | "com.android.voicemail.permission.ADD_VOICEMAIL" => Self::Dangerous,

            "android.permission.BATTERY_STATS"
            | "android.permission.BIND_ACCESSIBILITY_SERVICE"
            | "android.permission.BIND_DEVICE_ADMIN"
            | "android.permission.BIND_INPUT_METHOD"
            | "android.permission.BIND_NOTIFICATION_LISTENER_SERVICE"
            | "android.permission.BIND_VPN_SERVICE"
            | "android.permission.BIND_WALLPAPER"
            | "android.permission.CAPTURE_AUDIO_OUTPUT"
            | "android.permission.CLEAR_APP_CACHE"
            | "android.permission.DELETE_PACKAGES"
            | "android.permission.INSTALL_PACKAGES"
            | "android.permission.MANAGE_DOCUMENTS"
            | "android.permission.MODIFY_PHONE_STATE"
            | "android.permission.MOUNT_UNMOUNT_FILESYSTEMS"
            | "android.permission.PACKAGE_USAGE_STATS"
            | "android.permission.READ_LOGS"
            | "android.permission.REQUEST_INSTALL_PACKAGES"
            | "android.permission.SYSTEM_ALERT_WINDOW"
            | "android.permission.WRITE_SECURE_SETTINGS"
            | "android.permission.WRITE_SETTINGS" => Self::Signature,

            "android.permission.ACCESS_NETWORK_STATE"
            | "android.permission.ACCESS_WIFI_STATE"
            | "android.permission.BLUETOOTH"
            | "android.permission.BLUETOOTH_ADMIN"
            | "android.permission.CHANGE_NETWORK_STATE"
            | "android.permission.CHANGE_WIFI_STATE"
            | "android.permission.EXPAND_STATUS_BAR"
            | "android.permission.FLASHLIGHT"
            | "android.permission.FOREGROUND_SERVICE"
            | "android.permission.HIGH_SAMPLING_RATE_SENSORS"
            | "android.permission.INTERNET"
            | "android.permission.NFC"
            | "android.permission.RECEIVE_BOOT_COMPLETED"
            | "android.permission.USE_BIOMETRIC"
            | "android.permission.USE_FINGERPRINT"
            | "android.permission.VIBRATE"
            | "android.permission.WAKE_LOCK"
            | "com.android.alarm.permission.SET_ALARM" => Self::Normal,

            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One permission requested by the manifest.
#[derive(Debug, Clone, Serialize)]
pub struct PermissionUsage {
    name: String,
    tier: RiskTier,
}

impl PermissionUsage {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tier(&self) -> RiskTier {
        self.tier
    }
}

/// Classifies every requested permission, in declaration order.
///
/// Classification is total: each permission yields exactly one finding,
/// and unknown permissions surface as unclassified instead of being
/// dropped.
pub fn analyze(
    document: &ManifestDocument,
    strings: &StringTable,
) -> (Vec<PermissionUsage>, Vec<Finding>) {
    let mut usages = Vec::with_capacity(document.uses_permissions().len());
    let mut findings = Vec::new();

    for raw in document.uses_permissions() {
        let name = strings.resolve(raw).to_owned();
        let tier = RiskTier::of(&name);
        findings.push(tier_finding(&name, tier));
        usages.push(PermissionUsage { name, tier });
    }

    (usages, findings)
}

fn tier_finding(name: &str, tier: RiskTier) -> Finding {
    let source = Some(name.to_owned());
    match tier {
        RiskTier::Dangerous => Finding::new(
            Severity::Medium,
            FindingCategory::DangerousPermission,
            format!(
                "Dangerous permission `{}` is requested. It guards data or resources the user \
                 considers sensitive.",
                name
            ),
            source,
        ),
        RiskTier::Signature => Finding::new(
            Severity::Info,
            FindingCategory::Informational,
            format!(
                "Signature permission `{}` is requested. It is only granted to applications \
                 signed with the declaring key.",
                name
            ),
            source,
        ),
        RiskTier::Normal => Finding::new(
            Severity::Info,
            FindingCategory::Informational,
            format!("Permission `{}` has a normal protection level.", name),
            source,
        ),
        RiskTier::Unknown => Finding::new(
            Severity::Low,
            FindingCategory::Informational,
            format!(
                "Permission `{}` is not part of the built-in taxonomy and was left \
                 unclassified. Review it manually.",
                name
            ),
            source,
        ),
    }
}
