// file: src/test_helpers.rs
// description: in-memory publishing api and fixtures shared by unit tests
// reference: test doubles for the PublishingApi and MarkdownRenderer seams

use crate::error::{ApiError, PipelineError, Result};
use crate::models::{Category, CreatedPost, NewPost};
use crate::parser::MarkdownRenderer;
use crate::publishing::PublishingApi;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// Records every request; post responses are queued, defaulting to 201.
pub struct FakeApi {
    categories: std::result::Result<Vec<Category>, ApiError>,
    post_responses: Mutex<VecDeque<std::result::Result<CreatedPost, ApiError>>>,
    posts: Mutex<Vec<NewPost>>,
    category_calls: AtomicUsize,
    post_delay: Duration,
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            categories: Ok(Vec::new()),
            post_responses: Mutex::new(VecDeque::new()),
            posts: Mutex::new(Vec::new()),
            category_calls: AtomicUsize::new(0),
            post_delay: Duration::ZERO,
        }
    }

    pub fn with_categories(mut self, categories: &[(u64, &str)]) -> Self {
        self.categories = Ok(categories
            .iter()
            .map(|(id, name)| Category {
                id: *id,
                name: name.to_string(),
            })
            .collect());
        self
    }

    pub fn with_category_error(mut self, error: ApiError) -> Self {
        self.categories = Err(error);
        self
    }

    pub fn with_post_response(self, response: std::result::Result<CreatedPost, ApiError>) -> Self {
        self.post_responses.lock().unwrap().push_back(response);
        self
    }

    pub fn with_post_delay(mut self, delay: Duration) -> Self {
        self.post_delay = delay;
        self
    }

    pub fn posts(&self) -> Vec<NewPost> {
        self.posts.lock().unwrap().clone()
    }

    pub fn post_count(&self) -> usize {
        self.posts.lock().unwrap().len()
    }

    pub fn category_calls(&self) -> usize {
        self.category_calls.load(Ordering::SeqCst)
    }

    /// Polls until `count` posts were received or `timeout` passes.
    pub async fn wait_for_posts(&self, count: usize, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if self.post_count() >= count {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.post_count() >= count
    }
}

impl Default for FakeApi {
    fn default() -> Self {
        Self::new()
    }
}

impl PublishingApi for FakeApi {
    async fn list_categories(&self) -> std::result::Result<Vec<Category>, ApiError> {
        self.category_calls.fetch_add(1, Ordering::SeqCst);
        self.categories.clone()
    }

    async fn create_post(&self, post: &NewPost) -> std::result::Result<CreatedPost, ApiError> {
        if !self.post_delay.is_zero() {
            tokio::time::sleep(self.post_delay).await;
        }

        let queued = self.post_responses.lock().unwrap().pop_front();
        let mut posts = self.posts.lock().unwrap();
        posts.push(post.clone());
        let id = posts.len() as u64;

        queued.unwrap_or_else(|| {
            Ok(CreatedPost {
                id: Some(id),
                link: format!("https://blog.example.com/?p={}", id),
            })
        })
    }
}

pub struct FailingRenderer;

impl MarkdownRenderer for FailingRenderer {
    fn render(&self, _markdown: &str) -> Result<String> {
        Err(PipelineError::Render {
            file: "body".to_string(),
            message: "renderer exploded".to_string(),
        })
    }
}

pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

/// Canned HTTP/1.1 responder on a local port. Answers each connection with
/// the next queued response (500 once the queue is empty) and records the
/// raw request text.
pub struct StubServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
    _task: JoinHandle<()>,
}

impl StubServer {
    pub async fn start(responses: Vec<(u16, &'static str)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&requests);

        let task = tokio::spawn(async move {
            let mut queue: VecDeque<_> = responses.into();
            loop {
                let Ok((mut stream, _)) = listener.accept().await else {
                    return;
                };
                let request = read_request(&mut stream).await;
                recorded.lock().unwrap().push(request);

                let (status, body) = queue.pop_front().unwrap_or((500, "no response queued"));
                let response = format!(
                    "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });

        Self {
            base_url,
            requests,
            _task: task,
        }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

async fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let n = stream.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
            let length = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|value| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + length {
                break;
            }
        }
    }

    String::from_utf8_lossy(&buf).into_owned()
}
