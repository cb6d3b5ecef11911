//! Host facilities the generator hands its result to.
//!
//! A browser offers a clipboard and a download prompt. Other hosts
//! implement these traits with whatever they have; the in-memory
//! implementations here serve tests and headless hosts.

use std::io;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use mime::Mime;

/// A system clipboard.
#[async_trait]
pub trait Clipboard: Send + Sync {
    /// Replaces the clipboard content with `text`.
    async fn write_text(&self, text: &str) -> io::Result<()>;
}

/// A packaged file ready to be handed to the user.
#[derive(Clone, Debug, PartialEq)]
pub struct Download {
    /// Suggested file name.
    pub filename: String,
    /// Media type of `content`.
    pub mime: Mime,
    /// The file content.
    pub content: String,
}

/// Somewhere a [`Download`] can be delivered.
///
/// Implementations must release whatever temporary resource they used to
/// deliver the file before returning, whether they succeed or not.
pub trait DownloadSink: Send + Sync {
    /// Delivers the file and returns where it ended up.
    fn deliver(&self, download: Download) -> io::Result<PathBuf>;
}

/// A clipboard that only lives in memory.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    content: Mutex<Option<String>>,
}

impl MemoryClipboard {
    /// Returns the last text written, if any.
    #[inline]
    pub fn content(&self) -> Option<String> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Option<String>> {
        self.content.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl Clipboard for MemoryClipboard {
    async fn write_text(&self, text: &str) -> io::Result<()> {
        *self.lock() = Some(text.to_owned());
        Ok(())
    }
}

/// A sink that keeps every delivered file in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    delivered: Mutex<Vec<Download>>,
}

impl MemorySink {
    /// Returns the files delivered so far.
    #[inline]
    pub fn delivered(&self) -> Vec<Download> {
        self.delivered
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl DownloadSink for MemorySink {
    fn deliver(&self, download: Download) -> io::Result<PathBuf> {
        let path = PathBuf::from(&download.filename);
        self.delivered
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(download);
        Ok(path)
    }
}
