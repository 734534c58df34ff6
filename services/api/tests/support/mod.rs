//! Shared fixtures for the API integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use axum::http::{HeaderName, HeaderValue, header::AUTHORIZATION};
use axum_test::TestServer;
use chrono::{DateTime, Utc};
use common::error::{DatabaseError, DatabaseResult};
use media::normalizer::processing_path;
use media::{
    AspectRatio, MediaError, MediaResult, MediaTool, ObjectStore, S3Config, StorageError,
    StorageResult,
};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::Notify;
use tubely_api::{
    AppConfig, AppState, create_router,
    models::Video,
    repositories::{InMemoryVideoRepository, VideoRepository},
};
use uuid::Uuid;

pub const SECRET: &str = "integration-test-secret";
pub const BUCKET: &str = "tubely-test";
pub const REGION: &str = "us-east-2";
pub const BASE_URL: &str = "http://localhost:8091";

/// Stands in for ffprobe/ffmpeg
pub struct FakeMediaTool {
    aspect: Option<AspectRatio>,
    fail_remux: bool,
    hold_inspection: bool,
    probing: Notify,
    release: Notify,
    pub inspections: AtomicUsize,
    pub remuxes: AtomicUsize,
}

impl FakeMediaTool {
    fn build(aspect: Option<AspectRatio>) -> Self {
        Self {
            aspect,
            fail_remux: false,
            hold_inspection: false,
            probing: Notify::new(),
            release: Notify::new(),
            inspections: AtomicUsize::new(0),
            remuxes: AtomicUsize::new(0),
        }
    }

    pub fn classifying(aspect: AspectRatio) -> Self {
        Self::build(Some(aspect))
    }

    /// Every inspection fails, as it would on a corrupt file
    pub fn corrupt() -> Self {
        Self::build(None)
    }

    /// Inspections succeed but every remux fails
    pub fn failing_remux(aspect: AspectRatio) -> Self {
        Self {
            fail_remux: true,
            ..Self::build(Some(aspect))
        }
    }

    /// Inspections block until [`FakeMediaTool::release_inspection`] is called
    pub fn holding_inspection(aspect: AspectRatio) -> Self {
        Self {
            hold_inspection: true,
            ..Self::build(Some(aspect))
        }
    }

    /// Resolves once an inspection has started
    pub async fn wait_for_inspection(&self) {
        self.probing.notified().await;
    }

    pub fn release_inspection(&self) {
        self.release.notify_one();
    }
}

#[async_trait]
impl MediaTool for FakeMediaTool {
    async fn aspect_ratio(&self, _path: &Path) -> MediaResult<AspectRatio> {
        self.inspections.fetch_add(1, Ordering::SeqCst);
        if self.hold_inspection {
            self.probing.notify_one();
            self.release.notified().await;
        }
        self.aspect.ok_or(MediaError::NoVideoStream)
    }

    async fn faststart(&self, path: &Path) -> MediaResult<PathBuf> {
        self.remuxes.fetch_add(1, Ordering::SeqCst);
        if self.fail_remux {
            return Err(MediaError::Io(io::Error::other("remux failed")));
        }
        let output = processing_path(path);
        tokio::fs::copy(path, &output).await?;
        Ok(output)
    }
}

/// In-memory repository whose updates can be switched to fail
#[derive(Default)]
pub struct TestVideoRepository {
    inner: InMemoryVideoRepository,
    fail_updates: AtomicBool,
}

impl TestVideoRepository {
    pub fn fail_updates(&self) {
        self.fail_updates.store(true, Ordering::SeqCst);
    }

    fn check_update(&self) -> DatabaseResult<()> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(DatabaseError::Query(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl VideoRepository for TestVideoRepository {
    async fn create_video(&self, video: &Video) -> DatabaseResult<()> {
        self.inner.create_video(video).await
    }

    async fn get_video(&self, id: Uuid) -> DatabaseResult<Option<Video>> {
        self.inner.get_video(id).await
    }

    async fn set_video_url(
        &self,
        id: Uuid,
        video_url: &str,
        updated_at: DateTime<Utc>,
    ) -> DatabaseResult<Video> {
        self.check_update()?;
        self.inner.set_video_url(id, video_url, updated_at).await
    }

    async fn set_thumbnail_url(
        &self,
        id: Uuid,
        thumbnail_url: &str,
        updated_at: DateTime<Utc>,
    ) -> DatabaseResult<Video> {
        self.check_update()?;
        self.inner.set_thumbnail_url(id, thumbnail_url, updated_at).await
    }
}

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub key: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Object store that keeps puts in memory
pub struct RecordingObjectStore {
    config: S3Config,
    fail: bool,
    puts: Mutex<Vec<StoredObject>>,
}

impl RecordingObjectStore {
    pub fn new() -> Self {
        Self {
            config: S3Config {
                bucket: BUCKET.to_string(),
                region: REGION.to_string(),
                endpoint_url: None,
            },
            fail: false,
            puts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn puts(&self) -> Vec<StoredObject> {
        self.puts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for RecordingObjectStore {
    async fn put_file(&self, key: &str, content_type: &str, path: &Path) -> StorageResult<()> {
        if self.fail {
            return Err(StorageError::Upload {
                key: key.to_string(),
                message: "simulated outage".to_string(),
            });
        }

        let data = tokio::fs::read(path).await.map_err(|e| StorageError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        self.puts.lock().unwrap().push(StoredObject {
            key: key.to_string(),
            content_type: content_type.to_string(),
            data,
        });
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        self.config.public_url(key)
    }
}

pub fn test_config(staging_dir: &Path, assets_root: &Path) -> AppConfig {
    AppConfig {
        jwt_secret: SECRET.to_string(),
        s3_bucket: BUCKET.to_string(),
        s3_region: REGION.to_string(),
        s3_endpoint: None,
        assets_root: assets_root.to_path_buf(),
        staging_dir: Some(staging_dir.to_path_buf()),
        port: 8091,
        public_base_url: Some(BASE_URL.to_string()),
        ffprobe_path: PathBuf::from("ffprobe"),
        ffmpeg_path: PathBuf::from("ffmpeg"),
        media_tool_timeout_secs: 30,
        aspect_tolerance: 0.01,
        portrait_ratio: 9.01 / 16.0,
        thumbnail_cache_capacity: 16,
        thumbnail_cache_max_bytes: 16 * 1024 * 1024,
    }
}

/// A router wired to fakes, plus handles to inspect them
pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    pub videos: Arc<TestVideoRepository>,
    pub store: Arc<RecordingObjectStore>,
    pub tool: Arc<FakeMediaTool>,
    pub staging: TempDir,
    pub assets: TempDir,
}

impl TestApp {
    pub fn new(tool: FakeMediaTool) -> Self {
        Self::with_store(tool, RecordingObjectStore::new())
    }

    pub fn with_store(tool: FakeMediaTool, store: RecordingObjectStore) -> Self {
        let staging = tempfile::tempdir().expect("staging dir");
        let assets = tempfile::tempdir().expect("assets dir");

        let videos = Arc::new(TestVideoRepository::default());
        let store = Arc::new(store);
        let tool = Arc::new(tool);

        let state = AppState::new(
            test_config(staging.path(), assets.path()),
            videos.clone(),
            store.clone(),
            tool.clone(),
        );
        let server = TestServer::new(create_router(state.clone())).expect("test server");

        Self {
            server,
            state,
            videos,
            store,
            tool,
            staging,
            assets,
        }
    }

    pub async fn seed_video(&self, owner: Uuid) -> Video {
        let video = Video::new(owner, "Boots", "A video about boots");
        self.videos.create_video(&video).await.expect("seed video");
        video
    }

    pub async fn stored_video(&self, id: Uuid) -> Video {
        self.videos
            .get_video(id)
            .await
            .expect("lookup")
            .expect("video exists")
    }

    pub fn token_for(&self, user_id: Uuid) -> String {
        self.state
            .jwt
            .issue(user_id, Duration::from_secs(3600))
            .expect("token")
    }

    pub fn staged_files(&self) -> Vec<PathBuf> {
        list_dir(self.staging.path())
    }

    pub fn asset_files(&self) -> Vec<PathBuf> {
        list_dir(self.assets.path())
    }
}

pub fn bearer(token: &str) -> (HeaderName, HeaderValue) {
    (
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", token)).expect("header value"),
    )
}

fn list_dir(dir: &Path) -> Vec<PathBuf> {
    std::fs::read_dir(dir)
        .expect("read dir")
        .map(|entry| entry.expect("dir entry").path())
        .collect()
}
