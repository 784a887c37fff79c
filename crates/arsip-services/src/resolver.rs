//! File resolution state machine
//!
//! Per-request walk of the tier chain, cheapest and most durable first:
//!
//! 1. record store — a hit with non-NULL bytes is served with its stored MIME
//!    type and no `X-Served-From` marker;
//! 2. live admin devices in heartbeat-recency order — first non-empty body wins,
//!    labeled `admin-device`, MIME from the extension table (only bytes are
//!    available here);
//! 3. local disk across the ordered roots, labeled `local-storage`;
//! 4. terminal miss — the metadata catalog is consulted so the 404 can carry the
//!    original name, upload time, and remediation suggestions.
//!
//! Resolution is a pure read: no tier attempt writes anywhere, a failed device is
//! treated as absent for this request only, and the same backing state always
//! yields the same outcome.

use std::sync::Arc;

use arsip_core::{mime, sanitize_filename, AppError, FileCategory, FileMetadataEntry};
use bytes::Bytes;

use crate::tiers::{DeviceDirectory, DeviceFetch, LocalSource, MetadataSource, RecordSource};

/// Remediation steps attached to every diagnosable miss.
pub const NOT_FOUND_SUGGESTIONS: [&str; 4] = [
    "Ask the uploading admin to start their device server so the file can be fetched",
    "Verify the registered device URL is reachable from this host",
    "Run the sync daemon to refresh local storage from the origin",
    "Ask the customer to re-upload the document if no copy remains",
];

/// Which tier produced the bytes. Database hits carry no marker header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServeTier {
    Database,
    AdminDevice,
    LocalStorage,
}

impl ServeTier {
    /// Value for the `X-Served-From` response header, when one applies.
    pub fn header_value(&self) -> Option<&'static str> {
        match self {
            ServeTier::Database => None,
            ServeTier::AdminDevice => Some("admin-device"),
            ServeTier::LocalStorage => Some("local-storage"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServedFile {
    pub bytes: Bytes,
    pub content_type: String,
    /// Name for the `Content-Disposition` header: the original upload name when
    /// the database tier knows it, otherwise the requested filename.
    pub disposition_name: String,
    pub tier: ServeTier,
}

/// Terminal state of one resolution.
#[derive(Debug, Clone)]
pub enum Resolution {
    Served(ServedFile),
    NotFound {
        filename: String,
        metadata: Option<FileMetadataEntry>,
    },
}

pub struct FileResolver {
    records: Arc<dyn RecordSource>,
    devices: Arc<dyn DeviceDirectory>,
    device_fetch: Arc<dyn DeviceFetch>,
    local: Arc<dyn LocalSource>,
    metadata: Arc<dyn MetadataSource>,
}

impl FileResolver {
    pub fn new(
        records: Arc<dyn RecordSource>,
        devices: Arc<dyn DeviceDirectory>,
        device_fetch: Arc<dyn DeviceFetch>,
        local: Arc<dyn LocalSource>,
        metadata: Arc<dyn MetadataSource>,
    ) -> Self {
        Self {
            records,
            devices,
            device_fetch,
            local,
            metadata,
        }
    }

    /// Resolve one `(filename, category)` read to a terminal state.
    #[tracing::instrument(skip(self), fields(operation = "resolve_file"))]
    pub async fn resolve(
        &self,
        filename: &str,
        category: FileCategory,
    ) -> Result<Resolution, AppError> {
        let filename = sanitize_filename(filename);
        if filename.is_empty() {
            return Err(AppError::InvalidInput("Missing file parameter".to_string()));
        }

        if let Some(record) = self.records.get_by_key(&filename, category).await? {
            // get_by_key only returns servable records; NULL-content rows are
            // already filtered out as misses.
            let bytes = Bytes::from(record.file_data.unwrap_or_default());
            tracing::debug!(%filename, %category, size_bytes = bytes.len(), "Served from database");
            return Ok(Resolution::Served(ServedFile {
                bytes,
                content_type: record.mime_type,
                disposition_name: record.original_name,
                tier: ServeTier::Database,
            }));
        }

        if let Some(served) = self.try_devices(&filename, category).await? {
            return Ok(Resolution::Served(served));
        }

        if let Some(served) = self.try_local(&filename, category).await {
            return Ok(Resolution::Served(served));
        }

        let metadata = self.metadata.get_by_key(&filename, category).await?;
        tracing::info!(%filename, %category, has_metadata = metadata.is_some(), "All tiers missed");
        Ok(Resolution::NotFound { filename, metadata })
    }

    /// Device tier: try every live device in recency order; first non-empty body
    /// wins. Any transport condition makes that device absent for this request.
    async fn try_devices(
        &self,
        filename: &str,
        category: FileCategory,
    ) -> Result<Option<ServedFile>, AppError> {
        let devices = self.devices.list_live_devices().await?;

        for device in &devices {
            match self
                .device_fetch
                .fetch(&device.device_url, filename, category)
                .await
            {
                Ok(bytes) => {
                    tracing::debug!(
                        %filename,
                        %category,
                        device_url = %device.device_url,
                        device_name = %device.device_name,
                        size_bytes = bytes.len(),
                        "Served from admin device"
                    );
                    return Ok(Some(ServedFile {
                        bytes,
                        content_type: mime::from_extension(filename).to_string(),
                        disposition_name: filename.to_string(),
                        tier: ServeTier::AdminDevice,
                    }));
                }
                Err(e) if e.is_miss() => {
                    tracing::debug!(device_url = %device.device_url, error = %e, "Device tier miss");
                }
                Err(e) => {
                    tracing::warn!(device_url = %device.device_url, error = %e, "Device fetch failed");
                }
            }
        }

        Ok(None)
    }

    /// Local tier: a read failure here is logged and treated as a miss so the
    /// request still terminates in the diagnostic 404.
    async fn try_local(&self, filename: &str, category: FileCategory) -> Option<ServedFile> {
        match self.local.fetch(filename, category).await {
            Ok(Some(bytes)) => {
                tracing::debug!(%filename, %category, size_bytes = bytes.len(), "Served from local storage");
                Some(ServedFile {
                    bytes,
                    content_type: mime::from_extension(filename).to_string(),
                    disposition_name: filename.to_string(),
                    tier: ServeTier::LocalStorage,
                })
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(%filename, %category, error = %e, "Local tier read failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arsip_core::models::DeviceRegistration;
    use arsip_core::FileRecord;
    use arsip_storage::{TierError, TierResult};
    use async_trait::async_trait;
    use chrono::{Duration, Utc};
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct FakeRecords(HashMap<(String, FileCategory), FileRecord>);

    #[async_trait]
    impl RecordSource for FakeRecords {
        async fn get_by_key(
            &self,
            filename: &str,
            directory: FileCategory,
        ) -> Result<Option<FileRecord>, AppError> {
            Ok(self
                .0
                .get(&(filename.to_string(), directory))
                .filter(|r| r.is_servable())
                .cloned())
        }
    }

    struct FakeDirectory(Vec<DeviceRegistration>);

    #[async_trait]
    impl DeviceDirectory for FakeDirectory {
        async fn list_live_devices(&self) -> Result<Vec<DeviceRegistration>, AppError> {
            let now = Utc::now();
            let mut live: Vec<_> = self.0.iter().filter(|d| d.is_live(now)).cloned().collect();
            live.sort_by(|a, b| b.last_ping.cmp(&a.last_ping));
            Ok(live)
        }
    }

    /// Maps device_url to a canned outcome and records the order of attempts.
    struct FakeFetch {
        outcomes: HashMap<String, TierResult<Bytes>>,
        attempts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl DeviceFetch for FakeFetch {
        async fn fetch(
            &self,
            device_url: &str,
            _filename: &str,
            _category: FileCategory,
        ) -> TierResult<Bytes> {
            self.attempts.lock().unwrap().push(device_url.to_string());
            match self.outcomes.get(device_url) {
                Some(Ok(b)) => Ok(b.clone()),
                Some(Err(TierError::Timeout)) => Err(TierError::Timeout),
                Some(Err(TierError::EmptyBody)) => Err(TierError::EmptyBody),
                Some(Err(e)) => Err(TierError::Backend(e.to_string())),
                None => Err(TierError::Refused("no route".into())),
            }
        }
    }

    struct FakeLocal(HashMap<(String, FileCategory), Bytes>);

    #[async_trait]
    impl LocalSource for FakeLocal {
        async fn fetch(
            &self,
            filename: &str,
            category: FileCategory,
        ) -> TierResult<Option<Bytes>> {
            Ok(self.0.get(&(filename.to_string(), category)).cloned())
        }
    }

    struct FakeMetadata(HashMap<(String, FileCategory), FileMetadataEntry>);

    #[async_trait]
    impl MetadataSource for FakeMetadata {
        async fn get_by_key(
            &self,
            filename: &str,
            directory: FileCategory,
        ) -> Result<Option<FileMetadataEntry>, AppError> {
            Ok(self.0.get(&(filename.to_string(), directory)).cloned())
        }
    }

    fn device(admin_id: i64, url: &str, pinged_secs_ago: i64) -> DeviceRegistration {
        let now = Utc::now();
        DeviceRegistration {
            admin_id,
            device_url: url.to_string(),
            device_name: format!("device-{admin_id}"),
            is_active: true,
            last_ping: now - Duration::seconds(pinged_secs_ago),
            created_at: now - Duration::days(1),
        }
    }

    fn record(filename: &str, directory: FileCategory, data: Option<&[u8]>) -> FileRecord {
        FileRecord {
            filename: filename.to_string(),
            directory,
            original_name: format!("original-{filename}"),
            file_data: data.map(|d| d.to_vec()),
            mime_type: "application/pdf".to_string(),
            file_size: data.map(|d| d.len() as i64).unwrap_or(0),
            uploaded_at: Utc::now(),
        }
    }

    struct Fixture {
        records: HashMap<(String, FileCategory), FileRecord>,
        devices: Vec<DeviceRegistration>,
        outcomes: HashMap<String, TierResult<Bytes>>,
        local: HashMap<(String, FileCategory), Bytes>,
        metadata: HashMap<(String, FileCategory), FileMetadataEntry>,
    }

    impl Fixture {
        fn empty() -> Self {
            Self {
                records: HashMap::new(),
                devices: Vec::new(),
                outcomes: HashMap::new(),
                local: HashMap::new(),
                metadata: HashMap::new(),
            }
        }

        fn build(self) -> (FileResolver, Arc<FakeFetch>) {
            let fetch = Arc::new(FakeFetch {
                outcomes: self.outcomes,
                attempts: Mutex::new(Vec::new()),
            });
            let resolver = FileResolver::new(
                Arc::new(FakeRecords(self.records)),
                Arc::new(FakeDirectory(self.devices)),
                fetch.clone(),
                Arc::new(FakeLocal(self.local)),
                Arc::new(FakeMetadata(self.metadata)),
            );
            (resolver, fetch)
        }
    }

    fn key(filename: &str, cat: FileCategory) -> (String, FileCategory) {
        (filename.to_string(), cat)
    }

    // Scenario A: DB hit wins outright, no X-Served-From marker.
    #[tokio::test]
    async fn database_record_served_regardless_of_other_tiers() {
        let mut fx = Fixture::empty();
        fx.records.insert(
            key("passport_123.pdf", FileCategory::Documents),
            record("passport_123.pdf", FileCategory::Documents, Some(b"X")),
        );
        let (resolver, _) = fx.build();

        let res = resolver
            .resolve("passport_123.pdf", FileCategory::Documents)
            .await
            .unwrap();
        match res {
            Resolution::Served(f) => {
                assert_eq!(&f.bytes[..], b"X");
                assert_eq!(f.tier, ServeTier::Database);
                assert_eq!(f.tier.header_value(), None);
                assert_eq!(f.content_type, "application/pdf");
                assert_eq!(f.disposition_name, "original-passport_123.pdf");
            }
            other => panic!("expected served, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn null_content_record_falls_through_to_devices() {
        let mut fx = Fixture::empty();
        fx.records.insert(
            key("ghost.pdf", FileCategory::Documents),
            record("ghost.pdf", FileCategory::Documents, None),
        );
        fx.devices.push(device(1, "http://dev-a", 10));
        fx.outcomes
            .insert("http://dev-a".into(), Ok(Bytes::from_static(b"from-device")));
        let (resolver, _) = fx.build();

        let res = resolver
            .resolve("ghost.pdf", FileCategory::Documents)
            .await
            .unwrap();
        match res {
            Resolution::Served(f) => assert_eq!(f.tier, ServeTier::AdminDevice),
            other => panic!("expected device serve, got {other:?}"),
        }
    }

    // Scenario B: absent from DB, one live device answers.
    #[tokio::test]
    async fn live_device_serves_with_marker_and_extension_mime() {
        let mut fx = Fixture::empty();
        fx.devices.push(device(1, "http://dev-a", 10));
        fx.outcomes
            .insert("http://dev-a".into(), Ok(Bytes::from_static(b"ABC")));
        let (resolver, _) = fx.build();

        let res = resolver
            .resolve("ktp.jpg", FileCategory::Photos)
            .await
            .unwrap();
        match res {
            Resolution::Served(f) => {
                assert_eq!(&f.bytes[..], b"ABC");
                assert_eq!(f.tier.header_value(), Some("admin-device"));
                assert_eq!(f.content_type, "image/jpeg");
            }
            other => panic!("expected device serve, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn most_recent_device_tried_first_and_wins() {
        let mut fx = Fixture::empty();
        fx.devices.push(device(1, "http://old", 300));
        fx.devices.push(device(2, "http://fresh", 5));
        fx.outcomes
            .insert("http://old".into(), Ok(Bytes::from_static(b"old")));
        fx.outcomes
            .insert("http://fresh".into(), Ok(Bytes::from_static(b"fresh")));
        let (resolver, fetch) = fx.build();

        let res = resolver
            .resolve("a.pdf", FileCategory::Documents)
            .await
            .unwrap();
        match res {
            Resolution::Served(f) => assert_eq!(&f.bytes[..], b"fresh"),
            other => panic!("expected served, got {other:?}"),
        }
        assert_eq!(fetch.attempts.lock().unwrap().as_slice(), ["http://fresh"]);
    }

    #[tokio::test]
    async fn stale_heartbeat_device_is_skipped() {
        let mut fx = Fixture::empty();
        // Active but heartbeated 11 minutes ago: outside the liveness window.
        fx.devices.push(device(1, "http://stale", 11 * 60));
        fx.outcomes
            .insert("http://stale".into(), Ok(Bytes::from_static(b"zzz")));
        let (resolver, fetch) = fx.build();

        let res = resolver
            .resolve("a.pdf", FileCategory::Documents)
            .await
            .unwrap();
        assert!(matches!(res, Resolution::NotFound { .. }));
        assert!(fetch.attempts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn timeout_and_empty_body_fall_through_to_next_device() {
        let mut fx = Fixture::empty();
        fx.devices.push(device(1, "http://wedged", 5));
        fx.devices.push(device(2, "http://empty", 60));
        fx.devices.push(device(3, "http://good", 120));
        fx.outcomes
            .insert("http://wedged".into(), Err(TierError::Timeout));
        fx.outcomes
            .insert("http://empty".into(), Err(TierError::EmptyBody));
        fx.outcomes
            .insert("http://good".into(), Ok(Bytes::from_static(b"ok")));
        let (resolver, fetch) = fx.build();

        let res = resolver
            .resolve("a.pdf", FileCategory::Documents)
            .await
            .unwrap();
        match res {
            Resolution::Served(f) => assert_eq!(&f.bytes[..], b"ok"),
            other => panic!("expected served, got {other:?}"),
        }
        assert_eq!(
            fetch.attempts.lock().unwrap().as_slice(),
            ["http://wedged", "http://empty", "http://good"]
        );
    }

    #[tokio::test]
    async fn local_tier_serves_when_devices_exhausted() {
        let mut fx = Fixture::empty();
        fx.devices.push(device(1, "http://down", 5));
        fx.local.insert(
            key("receipt.png", FileCategory::Payments),
            Bytes::from_static(b"png-bytes"),
        );
        let (resolver, _) = fx.build();

        let res = resolver
            .resolve("receipt.png", FileCategory::Payments)
            .await
            .unwrap();
        match res {
            Resolution::Served(f) => {
                assert_eq!(f.tier.header_value(), Some("local-storage"));
                assert_eq!(f.content_type, "image/png");
            }
            other => panic!("expected local serve, got {other:?}"),
        }
    }

    // Scenario C: every tier misses but the metadata catalog knows the file.
    #[tokio::test]
    async fn exhausted_tiers_yield_diagnostic_not_found() {
        let mut fx = Fixture::empty();
        fx.metadata.insert(
            key("ktp_001.jpg", FileCategory::Photos),
            FileMetadataEntry {
                filename: "ktp_001.jpg".into(),
                directory: FileCategory::Photos,
                original_name: "KTP.jpg".into(),
                file_size: 12345,
                uploaded_at: Utc::now(),
            },
        );
        let (resolver, _) = fx.build();

        let res = resolver
            .resolve("ktp_001.jpg", FileCategory::Photos)
            .await
            .unwrap();
        match res {
            Resolution::NotFound { filename, metadata } => {
                assert_eq!(filename, "ktp_001.jpg");
                assert_eq!(metadata.unwrap().original_name, "KTP.jpg");
                assert!(!NOT_FOUND_SUGGESTIONS.is_empty());
            }
            other => panic!("expected not found, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unknown_file_yields_bare_not_found() {
        let (resolver, _) = Fixture::empty().build();
        let res = resolver
            .resolve("nothing.pdf", FileCategory::Cancellations)
            .await
            .unwrap();
        match res {
            Resolution::NotFound { metadata, .. } => assert!(metadata.is_none()),
            other => panic!("expected not found, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn traversal_input_resolves_under_basename() {
        let mut fx = Fixture::empty();
        fx.records.insert(
            key("passwd", FileCategory::Documents),
            record("passwd", FileCategory::Documents, Some(b"safe")),
        );
        let (resolver, _) = fx.build();

        let res = resolver
            .resolve("../../etc/passwd", FileCategory::Documents)
            .await
            .unwrap();
        match res {
            Resolution::Served(f) => assert_eq!(&f.bytes[..], b"safe"),
            other => panic!("expected served, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_filename_is_invalid_input() {
        let (resolver, _) = Fixture::empty().build();
        let err = resolver
            .resolve("uploads/", FileCategory::Documents)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }
}
