//! Spawning the search tool and streaming its output.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::{Child, ChildStdout, Command};
use tokio::time::Instant;

use super::error::SearchError;
use super::parse::{LineParser, SearchResultLine};
use crate::config::SearchConfig;

/// Launches one search subprocess per query.
#[derive(Debug, Clone)]
pub struct SearchRunner {
    root: PathBuf,
    program: String,
    extra_args: Vec<String>,
    timeout: Duration,
    max_lines: usize,
    max_line_bytes: usize,
}

impl SearchRunner {
    pub fn new(root: impl Into<PathBuf>, config: &SearchConfig) -> Self {
        Self {
            root: root.into(),
            program: config.program.clone(),
            extra_args: config.extra_args.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            max_lines: config.max_lines,
            max_line_bytes: config.max_line_bytes.max(1),
        }
    }

    /// Arguments passed to the tool for `query` scoped to `scope`.
    ///
    /// Pure-ASCII queries run case-insensitively (`-i`). Anything else runs
    /// in the tool's raw mode, since its case folding is unreliable outside ASCII.
    pub fn command_args(&self, query: &str, scope: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = self.extra_args.iter().map(OsString::from).collect();
        if query.is_ascii() {
            args.push("-i".into());
        }
        args.push("--".into());
        args.push(query.into());
        args.push(scope.as_os_str().to_owned());
        args
    }

    /// Start the tool and return a lazy stream over its output.
    ///
    /// Fails with [`SearchError::ToolUnavailable`] before producing any
    /// output if the binary cannot be found or started.
    pub fn run(&self, query: &str, scope: &Path) -> Result<SearchStream, SearchError> {
        let args = self.command_args(query, scope);
        crate::debug_event!("search", "spawn", "{} {args:?}", self.program);

        let mut child = Command::new(&self.program)
            .args(&args)
            .current_dir(&self.root)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| SearchError::ToolUnavailable {
                tool: self.program.clone(),
                reason: e.to_string(),
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| SearchError::ToolUnavailable {
                tool: self.program.clone(),
                reason: "stdout not captured".to_string(),
            })?;

        Ok(SearchStream {
            child,
            reader: BufReader::new(stdout),
            parser: LineParser::new(&self.root),
            deadline: Instant::now() + self.timeout,
            timeout: self.timeout,
            remaining: self.max_lines,
            max_lines: self.max_lines,
            max_line_bytes: self.max_line_bytes,
            finished: false,
        })
    }
}

/// Lazily parsed output of one search subprocess.
///
/// Owns the child. Dropping the stream before the end kills it.
#[derive(Debug)]
pub struct SearchStream {
    child: Child,
    reader: BufReader<ChildStdout>,
    parser: LineParser,
    deadline: Instant,
    timeout: Duration,
    remaining: usize,
    max_lines: usize,
    max_line_bytes: usize,
    finished: bool,
}

impl SearchStream {
    /// Next parsed line, or `None` once the tool is done.
    ///
    /// When the deadline passes or the line cap is reached the child is
    /// killed and one raw notice line is returned before `None`. Lines
    /// longer than `max_line_bytes` are cut and the remainder skipped.
    pub async fn next_line(&mut self) -> Option<SearchResultLine> {
        if self.finished {
            return None;
        }

        if self.remaining == 0 {
            return self.stop(format!(
                "search stopped: output limit of {} lines reached",
                self.max_lines
            ));
        }

        let mut buf = Vec::new();
        let read = tokio::time::timeout_at(
            self.deadline,
            read_bounded_line(&mut self.reader, &mut buf, self.max_line_bytes),
        );

        match read.await {
            Ok(Ok(0)) => {
                self.finish().await;
                None
            }
            Ok(Ok(_)) => {
                self.remaining -= 1;
                Some(self.parser.parse(&String::from_utf8_lossy(&buf)))
            }
            Ok(Err(e)) => {
                tracing::warn!("[search] read failed: {e}");
                self.finish().await;
                None
            }
            Err(_) => self.stop(format!(
                "search stopped: no result within {}s",
                self.timeout.as_secs()
            )),
        }
    }

    fn stop(&mut self, notice: String) -> Option<SearchResultLine> {
        self.finished = true;
        if let Err(e) = self.child.start_kill() {
            crate::debug_event!("search", "kill", "{e}");
        }
        tracing::warn!("[search] {notice}");
        Some(SearchResultLine::Raw(notice))
    }

    async fn finish(&mut self) {
        self.finished = true;
        match self.child.wait().await {
            Ok(status) => crate::debug_event!("search", "exited", "{status}"),
            Err(e) => tracing::warn!("[search] wait failed: {e}"),
        }
    }
}

/// Read one line of at most `limit` bytes into `buf`.
///
/// A longer line is cut at `limit` and the reader is advanced past its
/// newline, so memory stays bounded however long the line is.
async fn read_bounded_line<R>(reader: &mut R, buf: &mut Vec<u8>, limit: usize) -> std::io::Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let read = (&mut *reader).take(limit as u64).read_until(b'\n', buf).await?;
    if read == limit && buf.last() != Some(&b'\n') {
        skip_past_newline(reader).await?;
    }
    Ok(read)
}

async fn skip_past_newline<R>(reader: &mut R) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        let available = reader.fill_buf().await?;
        if available.is_empty() {
            return Ok(());
        }
        match available.iter().position(|&byte| byte == b'\n') {
            Some(end) => {
                reader.consume(end + 1);
                return Ok(());
            }
            None => {
                let len = available.len();
                reader.consume(len);
            }
        }
    }
}
