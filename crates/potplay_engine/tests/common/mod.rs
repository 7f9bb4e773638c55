#![allow(dead_code)]

use std::sync::{Mutex, Once};

use potplay_core::PushRecord;
use potplay_engine::{Relay, RelayError, RelayResponse, MARKER_SELECTOR};
use scraper::Selector;
use tokio::sync::Notify;

pub const PAGE_URL: &str = "http://nas.local:5666/v/movie/42";

pub const INCEPTION_TITLE: &str = "电影 存储空间 /NAS 的文件/Movies/Inception.mkv (1080p)";
pub const INCEPTION_PATH: &str = "存储空间 /NAS 的文件/Movies/Inception.mkv";

pub const DETAIL_PAGE: &str = r#"<html><body>
<div class="relative flex h-[54px] shrink-0 items-center gap-2"><button class="play">播放</button><button class="more">更多</button></div>
<span class="select-text" title="电影">电影</span>
<span class="select-text" title="电影 存储空间 /NAS 的文件/Movies/Inception.mkv (1080p)">Inception</span>
</body></html>"#;

pub const LOADING_PAGE: &str = r#"<html><body><div class="spinner"></div></body></html>"#;

pub const NO_PATH_PAGE: &str = r#"<html><body>
<div class="relative flex h-[54px] shrink-0 items-center gap-2"><button class="play">播放</button></div>
<span class="select-text" title="电影">电影</span>
</body></html>"#;

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(potplay_logging::initialize_for_tests);
}

pub fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap()
}

pub fn marker() -> Selector {
    selector(MARKER_SELECTOR)
}

/// In-process relay. `hold` keeps every send pending until `release` is
/// notified; `fail` turns every send into a transport error.
#[derive(Default)]
pub struct FakeRelay {
    pub calls: Mutex<Vec<PushRecord>>,
    pub hold: bool,
    pub release: Notify,
    pub fail: bool,
}

impl FakeRelay {
    pub fn held() -> Self {
        Self {
            hold: true,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<PushRecord> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Relay for FakeRelay {
    async fn send(&self, record: &PushRecord) -> Result<RelayResponse, RelayError> {
        self.calls.lock().unwrap().push(record.clone());
        if self.hold {
            self.release.notified().await;
        }
        if self.fail {
            return Err(RelayError::Transport("connection refused".to_string()));
        }
        Ok(RelayResponse {
            status: 200,
            body: r#"{"ok":true}"#.to_string(),
        })
    }
}
