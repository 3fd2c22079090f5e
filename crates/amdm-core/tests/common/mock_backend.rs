//! Scripted in-memory backend for integration tests.
//!
//! Holds the state a real backend would persist (settings, tool installs,
//! cookies, the setup marker) behind plain mutexes, and pushes events on a
//! broadcast channel exactly like the socket transport. Any command can be
//! made to fail once via [`MockBackend::fail_next`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::broadcast;

use amdm_core::bridge::{
    Backend, BackendEvent, BridgeError, CookieStatus, DependencyReport, DownloadId,
    EventSubscription, ToolKind, ToolStatus,
};
use amdm_core::settings::SettingsRecord;

pub struct MockBackend {
    settings: Mutex<SettingsRecord>,
    report: Mutex<DependencyReport>,
    /// What the next `import_cookies` call reports.
    import_outcome: Mutex<CookieStatus>,
    setup_complete: Mutex<bool>,
    next_download_id: AtomicU64,
    /// Command name -> error message, consumed by the next matching call.
    failures: Mutex<HashMap<&'static str, String>>,
    events: broadcast::Sender<BackendEvent>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    /// Fresh backend: nothing installed, no cookies, setup not completed.
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            settings: Mutex::new(SettingsRecord::default()),
            report: Mutex::new(DependencyReport::default()),
            import_outcome: Mutex::new(CookieStatus::valid()),
            setup_complete: Mutex::new(false),
            next_download_id: AtomicU64::new(1),
            failures: Mutex::new(HashMap::new()),
            events,
        }
    }

    /// Makes the next call of `command` fail with a backend error.
    pub fn fail_next(&self, command: &'static str, message: &str) {
        self.failures
            .lock()
            .unwrap()
            .insert(command, message.to_string());
    }

    pub fn set_settings(&self, record: SettingsRecord) {
        *self.settings.lock().unwrap() = record;
    }

    pub fn set_report(&self, report: DependencyReport) {
        *self.report.lock().unwrap() = report;
    }

    pub fn set_import_outcome(&self, status: CookieStatus) {
        *self.import_outcome.lock().unwrap() = status;
    }

    /// Emits an event to every subscriber, as the backend would push it.
    pub fn push_event(&self, event: BackendEvent) {
        let _ = self.events.send(event);
    }

    pub fn stored_settings(&self) -> SettingsRecord {
        self.settings.lock().unwrap().clone()
    }

    pub fn setup_marked_complete(&self) -> bool {
        *self.setup_complete.lock().unwrap()
    }

    fn take_failure(&self, command: &str) -> Result<(), BridgeError> {
        match self.failures.lock().unwrap().remove(command) {
            Some(message) => Err(BridgeError::Backend(message)),
            None => Ok(()),
        }
    }
}

fn tool_status_mut(report: &mut DependencyReport, kind: ToolKind) -> &mut ToolStatus {
    match kind {
        ToolKind::Python => &mut report.python,
        ToolKind::Gamdl => &mut report.gamdl,
        ToolKind::Ffmpeg => &mut report.ffmpeg,
        ToolKind::Mp4decrypt => &mut report.mp4decrypt,
    }
}

fn install_version(kind: ToolKind) -> &'static str {
    match kind {
        ToolKind::Python => "3.12.1",
        ToolKind::Gamdl => "2.4.1",
        ToolKind::Ffmpeg => "7.0",
        ToolKind::Mp4decrypt => "5.0.3",
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn get_settings(&self) -> Result<SettingsRecord, BridgeError> {
        self.take_failure("get_settings")?;
        Ok(self.settings.lock().unwrap().clone())
    }

    async fn save_settings(&self, record: &SettingsRecord) -> Result<(), BridgeError> {
        self.take_failure("save_settings")?;
        *self.settings.lock().unwrap() = record.clone();
        Ok(())
    }

    async fn dependency_report(&self) -> Result<DependencyReport, BridgeError> {
        self.take_failure("dependency_report")?;
        Ok(self.report.lock().unwrap().clone())
    }

    async fn check_tool(&self, tool: ToolKind) -> Result<ToolStatus, BridgeError> {
        self.take_failure("check_tool")?;
        Ok(self.report.lock().unwrap().tool(tool).clone())
    }

    async fn install_tool(&self, tool: ToolKind) -> Result<(), BridgeError> {
        self.take_failure("install_tool")?;
        {
            let mut report = self.report.lock().unwrap();
            *tool_status_mut(&mut report, tool) = ToolStatus::installed(install_version(tool));
        }
        self.push_event(BackendEvent::ToolInstalled { tool });
        Ok(())
    }

    async fn validate_cookies(&self) -> Result<CookieStatus, BridgeError> {
        self.take_failure("validate_cookies")?;
        Ok(self.report.lock().unwrap().cookies.clone())
    }

    async fn import_cookies(&self, path: &str) -> Result<CookieStatus, BridgeError> {
        self.take_failure("import_cookies")?;
        let status = self.import_outcome.lock().unwrap().clone();
        if status.valid {
            self.report.lock().unwrap().cookies = CookieStatus::valid();
            self.settings.lock().unwrap().cookies_path = Some(path.to_string());
        }
        Ok(status)
    }

    async fn enqueue_download(&self, url: &str) -> Result<DownloadId, BridgeError> {
        self.take_failure("enqueue_download")?;
        let id = DownloadId(self.next_download_id.fetch_add(1, Ordering::Relaxed));
        self.push_event(BackendEvent::DownloadQueued {
            id,
            url: url.to_string(),
        });
        Ok(id)
    }

    async fn is_setup_complete(&self) -> Result<bool, BridgeError> {
        self.take_failure("is_setup_complete")?;
        Ok(*self.setup_complete.lock().unwrap())
    }

    async fn mark_setup_complete(&self) -> Result<(), BridgeError> {
        self.take_failure("mark_setup_complete")?;
        *self.setup_complete.lock().unwrap() = true;
        Ok(())
    }

    fn subscribe(&self) -> EventSubscription {
        EventSubscription::new(self.events.subscribe())
    }
}
