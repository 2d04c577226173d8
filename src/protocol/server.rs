use std::io::{self, BufRead, Write};
use std::thread;

use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::{debug, warn};

use crate::protocol::pool::{Envelope, WorkerPool};
use crate::protocol::{decode_request, encode_response, Response};

/// Counters for one serving session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServeStats {
    /// Non-blank lines read.
    pub requests: usize,
    /// Lines answered with an error frame without reaching a worker.
    pub rejected: usize,
}

/// Read request lines until EOF and write one response line per request.
///
/// Responses are written as workers finish them, so their order follows
/// completion rather than arrival. Returns once every accepted request has
/// been answered.
pub fn serve<R, W>(pool: &WorkerPool, reader: R, writer: W) -> io::Result<ServeStats>
where
    R: BufRead,
    W: Write + Send,
{
    let (replies, completed) = unbounded::<Envelope>();

    thread::scope(|scope| {
        let writer_thread = scope.spawn(move || write_responses(&completed, writer));

        let mut stats = ServeStats::default();
        let read_result = read_requests(pool, reader, &replies, &mut stats);

        // Workers hold clones of `replies` until their jobs finish.
        drop(replies);

        let write_result = writer_thread
            .join()
            .unwrap_or_else(|_| Err(io::Error::new(io::ErrorKind::Other, "writer thread panicked")));

        read_result?;
        write_result?;
        debug!(requests = stats.requests, rejected = stats.rejected, "input closed");
        Ok(stats)
    })
}

fn read_requests<R: BufRead>(
    pool: &WorkerPool,
    reader: R,
    replies: &Sender<Envelope>,
    stats: &mut ServeStats,
) -> io::Result<()> {
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        stats.requests += 1;

        let rejection = match decode_request(&line) {
            Ok((request_id, request)) => {
                match pool.submit_to(request_id.clone(), request, replies.clone()) {
                    Ok(()) => continue,
                    Err(error) => (request_id, error.to_string()),
                }
            }
            Err((request_id, error)) => (request_id, error.to_string()),
        };

        let (request_id, message) = rejection;
        warn!(request_id = %request_id, %message, "rejecting request line");
        stats.rejected += 1;
        let envelope = Envelope {
            request_id,
            response: Response::error(message),
        };
        if replies.send(envelope).is_err() {
            return Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "response writer stopped",
            ));
        }
    }
    Ok(())
}

fn write_responses<W: Write>(completed: &Receiver<Envelope>, mut writer: W) -> io::Result<()> {
    for envelope in completed.iter() {
        let line = encode_response(&envelope.request_id, &envelope.response);
        writeln!(writer, "{line}")?;
        writer.flush()?;
    }
    Ok(())
}
