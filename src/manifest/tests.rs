//! Tests for the manifest document model and the string table.

use std::fs;

use super::{ComponentKind, ManifestDocument, StringTable};
use crate::error::ParseError;

const SAMPLE_MANIFEST: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<manifest xmlns:android="http://schemas.android.com/apk/res/android"
    package="com.example.app">
    <uses-permission android:name="android.permission.CAMERA" />
    <uses-permission android:name="android.permission.INTERNET" />
    <permission
        android:name="com.example.app.permission.PRIVATE"
        android:protectionLevel="signature" />
    <application android:label="@string/app_name">
        <activity android:name=".MainActivity">
            <intent-filter>
                <action android:name="android.intent.action.MAIN" />
                <category android:name="android.intent.category.LAUNCHER" />
            </intent-filter>
            <intent-filter>
                <action android:name="android.intent.action.VIEW" />
                <category android:name="android.intent.category.DEFAULT" />
                <category android:name="android.intent.category.BROWSABLE" />
                <data android:scheme="myapp" android:host="open" />
            </intent-filter>
        </activity>
        <service android:name=".SyncService" android:exported="false" />
        <receiver
            android:name=".BootReceiver"
            android:permission="com.example.app.permission.PRIVATE">
            <intent-filter>
                <action android:name="android.intent.action.BOOT_COMPLETED" />
            </intent-filter>
        </receiver>
        <provider
            android:name=".DataProvider"
            android:authorities="com.example.app.provider"
            android:exported="true"
            android:grantUriPermissions="true"
            android:readPermission="com.example.app.permission.READ" />
    </application>
</manifest>
"#;

#[test]
fn it_parse_document() {
    let document = ManifestDocument::parse(SAMPLE_MANIFEST).unwrap();

    assert_eq!(document.package(), "com.example.app");
    assert_eq!(
        document.uses_permissions(),
        [
            "android.permission.CAMERA".to_owned(),
            "android.permission.INTERNET".to_owned(),
        ]
    );

    assert_eq!(document.permission_decls().len(), 1);
    let decl = &document.permission_decls()[0];
    assert_eq!(decl.name, "com.example.app.permission.PRIVATE");
    assert_eq!(decl.protection_level.as_deref(), Some("signature"));

    assert_eq!(document.components().len(), 4);

    let activity = &document.components()[0];
    assert_eq!(activity.kind, ComponentKind::Activity);
    assert_eq!(activity.name, ".MainActivity");
    assert!(activity.exported.is_none());
    assert_eq!(activity.intent_filters.len(), 2);

    let launcher = &activity.intent_filters[0];
    assert_eq!(launcher.actions, ["android.intent.action.MAIN".to_owned()]);
    assert_eq!(
        launcher.categories,
        ["android.intent.category.LAUNCHER".to_owned()]
    );
    assert!(launcher.data.is_empty());

    let browsable = &activity.intent_filters[1];
    assert_eq!(browsable.actions, ["android.intent.action.VIEW".to_owned()]);
    assert_eq!(browsable.data.len(), 1);
    assert_eq!(browsable.data[0].scheme.as_deref(), Some("myapp"));
    assert_eq!(browsable.data[0].host.as_deref(), Some("open"));

    let service = &document.components()[1];
    assert_eq!(service.kind, ComponentKind::Service);
    assert_eq!(service.exported.as_deref(), Some("false"));
    assert!(service.intent_filters.is_empty());

    let receiver = &document.components()[2];
    assert_eq!(receiver.kind, ComponentKind::Receiver);
    assert_eq!(
        receiver.permission.as_deref(),
        Some("com.example.app.permission.PRIVATE")
    );
    assert_eq!(receiver.intent_filters.len(), 1);

    let provider = &document.components()[3];
    assert_eq!(provider.kind, ComponentKind::Provider);
    assert_eq!(provider.exported.as_deref(), Some("true"));
    assert_eq!(provider.grant_uri_permissions.as_deref(), Some("true"));
    assert_eq!(
        provider.read_permission.as_deref(),
        Some("com.example.app.permission.READ")
    );
}

#[test]
fn it_parse_self_closing_components() {
    let paired = ManifestDocument::parse(
        r#"<manifest package="com.example.app">
            <application>
                <activity android:name=".A"></activity>
            </application>
        </manifest>"#,
    )
    .unwrap();
    let self_closing = ManifestDocument::parse(
        r#"<manifest package="com.example.app">
            <application>
                <activity android:name=".A" />
            </application>
        </manifest>"#,
    )
    .unwrap();

    assert_eq!(paired.components().len(), 1);
    assert_eq!(self_closing.components().len(), 1);
    assert_eq!(paired.components()[0].name, self_closing.components()[0].name);
}

#[test]
fn it_unescapes_attribute_values() {
    let document = ManifestDocument::parse(
        r#"<manifest package="com.example.app">
            <uses-permission android:name="android.permission.A&amp;B" />
        </manifest>"#,
    )
    .unwrap();

    assert_eq!(document.uses_permissions(), ["android.permission.A&B".to_owned()]);
}

#[test]
fn it_signature_protected() {
    let document = ManifestDocument::parse(SAMPLE_MANIFEST).unwrap();

    assert!(document.is_signature_protected("com.example.app.permission.PRIVATE"));
    assert!(!document.is_signature_protected("com.example.app.permission.READ"));
    assert!(!document.is_signature_protected("android.permission.CAMERA"));
}

#[test]
fn it_malformed_manifest() {
    assert!(ManifestDocument::parse(
        "<manifest package=\"com.example.app\"><application></wrong></application></manifest>"
    )
    .is_err());
}

#[test]
fn it_load_missing_manifest() {
    let dir = tempfile::tempdir().unwrap();

    let error = ManifestDocument::load(dir.path().join("AndroidManifest.xml")).unwrap_err();
    assert!(matches!(error, ParseError::Io { .. }));
}

#[test]
fn it_load_malformed_manifest() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("AndroidManifest.xml");
    fs::write(&path, "<manifest><oops></manifest>").unwrap();

    let error = ManifestDocument::load(&path).unwrap_err();
    assert!(matches!(error, ParseError::Xml { .. }));
}

#[test]
fn it_load_manifest_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("AndroidManifest.xml");
    fs::write(&path, SAMPLE_MANIFEST).unwrap();

    let document = ManifestDocument::load(&path).unwrap();
    assert_eq!(document.package(), "com.example.app");
    assert_eq!(document.components().len(), 4);
}

const SAMPLE_STRINGS: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<resources>
    <string name="app_name">Example App</string>
    <string name="scheme_host">links.example.com</string>
    <string name="escaped">Fish &amp; Chips</string>
</resources>
"#;

#[test]
fn it_string_table_parse() {
    let table = StringTable::parse(SAMPLE_STRINGS).unwrap();

    assert_eq!(table.len(), 3);
    assert_eq!(table.get("app_name"), Some("Example App"));
    assert_eq!(table.get("escaped"), Some("Fish & Chips"));
    assert_eq!(table.get("missing"), None);
}

#[test]
fn it_string_table_resolve() {
    let table = StringTable::parse(SAMPLE_STRINGS).unwrap();

    assert_eq!(table.resolve("@string/app_name"), "Example App");
    assert_eq!(table.resolve("@string/missing"), "@string/missing");
    assert_eq!(table.resolve("plain value"), "plain value");
    assert_eq!(table.resolve(""), "");
}

#[test]
fn it_string_table_missing_file() {
    let dir = tempfile::tempdir().unwrap();

    let table = StringTable::load(dir.path().join("strings.xml")).unwrap();
    assert!(table.is_empty());
    assert_eq!(table.resolve("@string/app_name"), "@string/app_name");
}

#[test]
fn it_string_table_malformed_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("strings.xml");
    fs::write(&path, "<resources><string name=\"a\">x</wrong></resources>").unwrap();

    let error = StringTable::load(&path).unwrap_err();
    assert!(matches!(error, ParseError::Xml { .. }));
}
