use std::collections::HashMap;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use image::{ImageFormat, Rgba, RgbaImage};
use tokio::sync::{Semaphore, oneshot};
use tunes_core::{
    DecodedImage, HttpRequest, HttpResponse, ImageCache, ImageCacheConfig,
    ImageResult, RequestPipeline, SlotToken, Transport, TransportError,
};

#[derive(Debug, Clone)]
pub enum Reply {
    Status(u16, Vec<u8>),
    Fail(TransportError),
}

impl Reply {
    pub fn json(body: &str) -> Self {
        Reply::Status(200, body.as_bytes().to_vec())
    }

    pub fn png(width: u32, height: u32) -> Self {
        Reply::Status(200, png_bytes(width, height))
    }
}

/// Canned transport that counts every exchange.
///
/// While gated, responses are held back until [`StubTransport::open_gate`]
/// is called, which keeps fetches in flight for as long as a test needs.
// Code is used by test modules, but not in this scope
#[allow(unused)]
#[derive(Debug)]
pub struct StubTransport {
    routes: Mutex<HashMap<String, Reply>>,
    requests: Mutex<Vec<String>>,
    calls: AtomicUsize,
    gate: Option<Semaphore>,
}

#[allow(unused)]
impl StubTransport {
    pub fn new() -> Self {
        Self {
            routes: Mutex::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            gate: None,
        }
    }

    pub fn gated() -> Self {
        Self {
            gate: Some(Semaphore::new(0)),
            ..Self::new()
        }
    }

    pub fn route(self, url: &str, reply: Reply) -> Self {
        self.set_route(url, reply);
        self
    }

    pub fn set_route(&self, url: &str, reply: Reply) {
        self.routes
            .lock()
            .expect("routes lock")
            .insert(url.to_string(), reply);
    }

    /// Releases every held and future response.
    pub fn open_gate(&self) {
        if let Some(gate) = &self.gate {
            gate.close();
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn calls_for(&self, url: &str) -> usize {
        self.requests
            .lock()
            .expect("requests lock")
            .iter()
            .filter(|seen| seen.as_str() == url)
            .count()
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("requests lock").clone()
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn send(
        &self,
        request: HttpRequest,
    ) -> Result<HttpResponse, TransportError> {
        let url = request.target.to_string();
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .expect("requests lock")
            .push(url.clone());

        if let Some(gate) = &self.gate {
            // Closing the semaphore is what lets everyone through.
            let _ = gate.acquire().await;
        }

        let reply = self.routes.lock().expect("routes lock").get(&url).cloned();
        match reply {
            Some(Reply::Status(status, body)) => {
                Ok(HttpResponse::new(status, Some(body)))
            }
            Some(Reply::Fail(err)) => Err(err),
            None => Ok(HttpResponse::new(404, Some(b"not found".to_vec()))),
        }
    }
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let pixels =
        RgbaImage::from_pixel(width, height, Rgba([30, 144, 255, 255]));
    let mut out = Cursor::new(Vec::new());
    pixels
        .write_to(&mut out, ImageFormat::Png)
        .expect("encode png");
    out.into_inner()
}

#[allow(unused)]
pub fn cache_over(
    transport: Arc<StubTransport>,
    config: ImageCacheConfig,
) -> ImageCache {
    ImageCache::new(RequestPipeline::new(transport), config)
}

/// Stand-in for a recycled list cell: remembers what was painted into it.
#[allow(unused)]
#[derive(Debug, Clone, Default)]
pub struct DisplaySlot {
    painted: Arc<Mutex<Vec<Arc<DecodedImage>>>>,
}

#[allow(unused)]
impl DisplaySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests `key` for this slot under `token`. The returned receiver
    /// fires after the slot has been painted. Painting re-checks the token
    /// while holding the slot lock.
    pub fn request(
        &self,
        cache: &ImageCache,
        key: &str,
        token: SlotToken,
    ) -> oneshot::Receiver<()> {
        let (done, painted_signal) = oneshot::channel();
        let painted = Arc::clone(&self.painted);
        let binding = cache.clone();
        cache.fetch_with(key, token, move |result: ImageResult| {
            let mut painted = painted.lock().expect("slot lock");
            if let Ok(image) = result
                && binding.is_current(token)
            {
                painted.push(image);
            }
            let _ = done.send(());
        });
        painted_signal
    }

    pub fn painted(&self) -> Vec<Arc<DecodedImage>> {
        self.painted.lock().expect("slot lock").clone()
    }
}
