//! Line-oriented interactive shell.
//!
//! Each input line becomes one submission, sent exactly as typed: only the
//! line terminator is removed, so surrounding spaces and empty lines are part
//! of the message. The rendered outcome is written back before the next line
//! is read, so submissions never overlap. [`QUIT_COMMAND`] on a line of its
//! own, or end of input, stops the loop.

use std::io::Write;

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use memo_protocol::client::Announcer;
use memo_protocol::submission::{render_outcome, Clock, Submitter};
use memo_protocol::transaction::TransactionFacade;

/// Line that ends the session instead of being sent.
pub const QUIT_COMMAND: &str = ":quit";

/// What the shell remembers between lines.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ShellState {
    /// Last message text submitted.
    pub message: String,
    /// Rendered outcome of the last submission.
    pub last_result: Option<String>,
    pub sent: usize,
    pub failed: usize,
}

/// Runs the read, submit, print loop until `input` is exhausted.
pub async fn run<F, A, C, R, W>(
    submitter: &Submitter<F, A, C>,
    input: R,
    out: &mut W,
) -> Result<ShellState>
where
    F: TransactionFacade,
    A: Announcer,
    C: Clock,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut state = ShellState::default();
    let mut lines = input.lines();

    // `next_line` strips `\n` and `\r\n` and nothing else.
    while let Some(line) = lines.next_line().await? {
        if line == QUIT_COMMAND {
            break;
        }

        let result = submitter.submit(&line).await.map(|s| s.response);
        state.message = line;
        if result.is_ok() {
            state.sent += 1;
        } else {
            state.failed += 1;
        }

        let rendered = render_outcome(&result);
        writeln!(out, "{rendered}")?;
        out.flush()?;
        state.last_result = Some(rendered);
    }

    tracing::info!(sent = state.sent, failed = state.failed, "interactive session ended");
    Ok(state)
}
