//! JSON-lines request loop over stdin/stdout
//!
//! Each input line is `{"id": .., "command": "storage account list",
//! "arguments": {..}}`; each output line is `{"id": .., "response": {..}}`.
//! Up to [`MAX_IN_FLIGHT`] requests run concurrently, so responses may arrive out of order and are
//! matched by `id`.

use std::sync::Arc;
use std::time::Instant;

use cloudcmd_core::registry::split_path;
use cloudcmd_core::RawArgs;
use cloudcmd_domain::constants::TRANSPORT_STDIO;
use cloudcmd_domain::CommandResponse;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::{mpsc, Semaphore};
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, info, warn};

use crate::context::{rejected, AppContext};

/// Requests handled at once; reading pauses while this many are running
pub const MAX_IN_FLIGHT: usize = 64;

#[derive(Debug, Deserialize)]
struct Request {
    #[serde(default)]
    id: Value,
    command: String,
    #[serde(default)]
    arguments: Value,
}

#[derive(Debug, Serialize)]
struct Reply {
    id: Value,
    response: CommandResponse,
}

/// Serve requests from `input` until it reaches end of file
///
/// Returns `output` once every in-flight request has been answered.
///
/// # Errors
/// Reading `input` or writing `output` failed.
pub async fn serve<R, W>(ctx: Arc<AppContext>, input: R, output: W) -> io::Result<W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    info!(transport = TRANSPORT_STDIO, "serving requests");

    let (tx, rx) = mpsc::unbounded_channel::<String>();
    let writer = tokio::spawn(write_replies(rx, output));

    let permits = Arc::new(Semaphore::new(MAX_IN_FLIGHT));
    let mut in_flight = JoinSet::new();
    let mut lines = input.lines();
    let mut received = 0_u64;

    let read_result = loop {
        let line = tokio::select! {
            Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                report_aborted(joined);
                continue;
            }
            line = lines.next_line() => match line {
                Ok(Some(line)) => line,
                Ok(None) => break Ok(()),
                Err(err) => break Err(err),
            },
        };
        if line.trim().is_empty() {
            continue;
        }
        received += 1;

        // Stops reading while the limit is reached; finished tasks release their permit.
        let Ok(permit) = Arc::clone(&permits).acquire_owned().await else {
            break Ok(());
        };
        let ctx = Arc::clone(&ctx);
        let tx = tx.clone();
        in_flight.spawn(async move {
            let _permit = permit;
            let reply = handle_line(&ctx, &line).await;
            match serde_json::to_string(&reply) {
                Ok(encoded) => {
                    // The writer only stops early after an I/O error, which is reported below.
                    let _ = tx.send(encoded);
                }
                Err(err) => warn!(error = %err, "failed to encode reply"),
            }
        });
    };

    while let Some(joined) = in_flight.join_next().await {
        report_aborted(joined);
    }
    drop(tx);

    let output = writer.await.map_err(|err| io::Error::new(io::ErrorKind::Other, err))??;
    read_result?;

    info!(transport = TRANSPORT_STDIO, requests = received, "input closed");
    Ok(output)
}

fn report_aborted(joined: Result<(), JoinError>) {
    if let Err(err) = joined {
        warn!(error = %err, "request task aborted");
    }
}

async fn write_replies<W>(mut rx: mpsc::UnboundedReceiver<String>, mut output: W) -> io::Result<W>
where
    W: AsyncWrite + Unpin,
{
    while let Some(mut line) = rx.recv().await {
        line.push('\n');
        output.write_all(line.as_bytes()).await?;
        output.flush().await?;
    }
    Ok(output)
}

async fn handle_line(ctx: &AppContext, line: &str) -> Reply {
    let started = Instant::now();

    let request: Request = match serde_json::from_str(line) {
        Ok(request) => request,
        Err(err) => {
            debug!(error = %err, "malformed request line");
            let execution =
                rejected(String::new(), format!("Malformed request: {err}"), started.elapsed());
            return Reply { id: Value::Null, response: execution.response };
        }
    };

    let path = split_path(&request.command);
    let raw = match &request.arguments {
        Value::Null => Ok(RawArgs::new()),
        arguments => RawArgs::from_json(arguments),
    };

    let execution = match raw {
        Ok(raw) => ctx.invoke(&path, &raw).await,
        Err(errors) => rejected(path.join(" "), errors.to_string(), started.elapsed()),
    };
    Reply { id: request.id, response: execution.response }
}
