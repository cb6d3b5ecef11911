//! Clipboard and download sinks for a terminal host.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use ai_desk_core::surface::{Clipboard, Download, DownloadSink};
use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Clipboard commands tried in order by [`CommandClipboard::new`].
const CANDIDATES: &[(&str, &[&str])] = &[
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
    ("pbcopy", &[]),
    ("clip", &[]),
];

/// A clipboard backed by a command that reads the text from its stdin.
#[derive(Clone, Debug)]
pub struct CommandClipboard {
    commands: Vec<(String, Vec<String>)>,
}

impl CommandClipboard {
    /// Uses the first clipboard command found on this system.
    pub fn new() -> Self {
        let commands = CANDIDATES
            .iter()
            .map(|(program, args)| {
                let args = args.iter().map(ToString::to_string).collect();
                (program.to_string(), args)
            })
            .collect();
        Self { commands }
    }

    /// Uses exactly `program` with `args`.
    pub fn with_program<S, I>(program: S, args: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let args = args.into_iter().map(Into::into).collect();
        Self {
            commands: vec![(program.into(), args)],
        }
    }
}

impl Default for CommandClipboard {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Clipboard for CommandClipboard {
    async fn write_text(&self, text: &str) -> io::Result<()> {
        for (program, args) in &self.commands {
            let child = Command::new(program)
                .args(args)
                .stdin(Stdio::piped())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn();
            let mut child = match child {
                Ok(child) => child,
                Err(err) if err.kind() == io::ErrorKind::NotFound => {
                    trace!("{program} is not available");
                    continue;
                }
                Err(err) => return Err(err),
            };

            if let Some(mut stdin) = child.stdin.take() {
                let written = stdin.write_all(text.as_bytes()).await;
                // Closing stdin tells the command we are done.
                drop(stdin);
                if let Err(err) = written {
                    // Reap it, it may still be running.
                    child.kill().await.ok();
                    return Err(err);
                }
            }
            let status = child.wait().await?;
            if !status.success() {
                return Err(io::Error::other(format!(
                    "{program} exited with {status}"
                )));
            }
            debug!("copied {} bytes with {program}", text.len());
            return Ok(());
        }
        Err(io::Error::new(
            io::ErrorKind::NotFound,
            "no clipboard command available",
        ))
    }
}

/// Saves downloads into a directory.
#[derive(Clone, Debug)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// Creates a sink writing into `dir`, which must exist.
    #[inline]
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }
}

impl DownloadSink for DirectorySink {
    fn deliver(&self, download: Download) -> io::Result<PathBuf> {
        // Only the last path component, the name is picked by the widget
        // but nothing should escape the directory.
        let Some(filename) = Path::new(&download.filename).file_name()
        else {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid file name: {:?}", download.filename),
            ));
        };
        let target = self.dir.join(filename);
        let mut partial = target.clone().into_os_string();
        partial.push(".part");
        let partial = PathBuf::from(partial);

        let written = fs::write(&partial, download.content.as_bytes())
            .and_then(|()| fs::rename(&partial, &target));
        if let Err(err) = written {
            fs::remove_file(&partial).ok();
            return Err(err);
        }
        Ok(target)
    }
}
