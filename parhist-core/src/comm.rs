//! Message-passing process group with MPI-style collectives.
//!
//! Every rank runs on its own thread and owns its data outright: the only way
//! values move between ranks is as owned messages over channels. When a rank
//! finishes, fails or panics, its communicator announces the departure to every
//! peer; a rank still waiting on that peer observes
//! [`ParhistError::CollectiveDesync`].

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::debug;
use parhist_common::{ParhistError, Result};
use std::thread;

use crate::partition::partition;

/// Placeholder used to pad a scatter buffer to a multiple of the group size.
/// Never reaches a histogram: receivers drop it before returning.
pub const FILLER: f64 = f64::NAN;

enum Message {
    Scatter { values: Vec<f64>, padding: usize },
    Reduce { from: usize, counts: Vec<u64> },
    Left { rank: usize },
}

impl Message {
    fn kind(&self) -> &'static str {
        match self {
            Message::Scatter { .. } => "scatter",
            Message::Reduce { .. } => "reduce",
            Message::Left { .. } => "leave",
        }
    }
}

/// Root-side input to [`Communicator::scatter`].
pub struct ScatterPayload {
    /// Padded buffer, length a multiple of the group size.
    pub padded: Vec<f64>,
    /// Number of leading real values; everything after is filler.
    pub valid_len: usize,
}

impl ScatterPayload {
    /// Pad `values` with [`FILLER`] up to the next multiple of `size`.
    pub fn pad(values: &[f64], size: usize) -> Self {
        let valid_len = values.len();
        let padded_len = valid_len.div_ceil(size.max(1)) * size.max(1);
        let mut padded = Vec::with_capacity(padded_len);
        padded.extend_from_slice(values);
        padded.resize(padded_len, FILLER);
        Self { padded, valid_len }
    }

    pub fn padding(&self) -> usize {
        self.padded.len() - self.valid_len
    }
}

/// One rank's endpoint into the group.
pub struct Communicator {
    rank: usize,
    size: usize,
    inbox: Receiver<Message>,
    // no sender to self: own contributions never go through the channel
    peers: Vec<Option<Sender<Message>>>,
}

impl Communicator {
    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_root(&self, root: usize) -> bool {
        self.rank == root
    }

    fn send(&self, to: usize, msg: Message) -> Result<()> {
        let kind = msg.kind();
        let Some(tx) = self.peers.get(to).and_then(Option::as_ref) else {
            return Err(ParhistError::CollectiveDesync(format!(
                "rank {} has no channel to rank {to}",
                self.rank
            )));
        };
        tx.send(msg).map_err(|_| {
            ParhistError::CollectiveDesync(format!(
                "rank {to} left before receiving {kind} from rank {}",
                self.rank
            ))
        })
    }

    fn check_root(&self, root: usize) -> Result<()> {
        if root >= self.size {
            return Err(ParhistError::CollectiveDesync(format!(
                "root {root} outside group of {}",
                self.size
            )));
        }
        Ok(())
    }

    /// Next collective message. A departure from a rank in `waiting_on` is a
    /// desync; departures of ranks already done with this collective are skipped.
    fn recv<P>(&self, expecting: &str, waiting_on: P) -> Result<Message>
    where
        P: Fn(usize) -> bool,
    {
        loop {
            let msg = self.inbox.recv().map_err(|_| {
                ParhistError::CollectiveDesync(format!(
                    "rank {} waiting for {expecting}: peers left the group",
                    self.rank
                ))
            })?;
            match msg {
                Message::Left { rank } if waiting_on(rank) => {
                    return Err(ParhistError::CollectiveDesync(format!(
                        "rank {} waiting for {expecting}: rank {rank} left the group",
                        self.rank
                    )))
                }
                Message::Left { .. } => continue,
                other => return Ok(other),
            }
        }
    }

    /// Distribute equal slices of the root's padded buffer, one per rank.
    ///
    /// Only the root passes a payload. Each rank gets back its own slice with
    /// any filler already stripped.
    pub fn scatter(&self, root: usize, payload: Option<ScatterPayload>) -> Result<Vec<f64>> {
        self.check_root(root)?;
        if !self.is_root(root) {
            return match self.recv("scatter", |r| r == root)? {
                Message::Scatter { mut values, padding } => {
                    values.truncate(values.len().saturating_sub(padding));
                    debug!("rank {} received {} values", self.rank, values.len());
                    Ok(values)
                }
                other => Err(ParhistError::CollectiveDesync(format!(
                    "rank {} expected scatter, got {}",
                    self.rank,
                    other.kind()
                ))),
            };
        }

        let payload = payload.ok_or_else(|| {
            ParhistError::CollectiveDesync(format!("root {root} called scatter without a payload"))
        })?;
        if payload.padded.len() % self.size != 0 {
            return Err(ParhistError::CollectiveDesync(format!(
                "scatter buffer of {} values does not divide across {} ranks",
                payload.padded.len(),
                self.size
            )));
        }
        debug!(
            "root {root} scattering {} values ({} filler) across {} ranks",
            payload.valid_len,
            payload.padding(),
            self.size
        );
        let mut own = Vec::new();
        for part in partition(payload.padded.len(), self.size)? {
            let padding = part.end.saturating_sub(part.start.max(payload.valid_len));
            let mut values = part.slice(&payload.padded).to_vec();
            if part.worker == root {
                values.truncate(values.len() - padding);
                own = values;
            } else {
                self.send(part.worker, Message::Scatter { values, padding })?;
            }
        }
        Ok(own)
    }

    /// Element-wise sum of every rank's `counts`, materialized at `root` only.
    ///
    /// Non-root ranks get `Ok(None)` once their contribution is sent.
    pub fn reduce_sum(&self, root: usize, counts: Vec<u64>) -> Result<Option<Vec<u64>>> {
        self.check_root(root)?;
        if !self.is_root(root) {
            self.send(root, Message::Reduce { from: self.rank, counts })?;
            return Ok(None);
        }

        let mut acc = counts;
        let mut seen = vec![false; self.size];
        seen[root] = true;
        for _ in 1..self.size {
            match self.recv("reduce", |r| r < seen.len() && !seen[r])? {
                Message::Reduce { from, counts } => {
                    if from >= self.size || seen[from] {
                        return Err(ParhistError::CollectiveDesync(format!(
                            "unexpected reduce contribution from rank {from}"
                        )));
                    }
                    if counts.len() != acc.len() {
                        return Err(ParhistError::CollectiveDesync(format!(
                            "rank {from} contributed {} counts, root holds {}",
                            counts.len(),
                            acc.len()
                        )));
                    }
                    seen[from] = true;
                    for (a, c) in acc.iter_mut().zip(counts) {
                        *a += c;
                    }
                }
                other => {
                    return Err(ParhistError::CollectiveDesync(format!(
                        "root {root} expected reduce, got {}",
                        other.kind()
                    )))
                }
            }
        }
        debug!("root {root} reduced contributions from {} ranks", self.size);
        Ok(Some(acc))
    }
}

impl Drop for Communicator {
    fn drop(&mut self) {
        // peers that already finished have closed their inbox; nothing to tell them
        for tx in self.peers.iter().flatten() {
            let _ = tx.send(Message::Left { rank: self.rank });
        }
    }
}

/// Fixed-size group of ranks.
#[derive(Debug, Clone, Copy)]
pub struct ProcessGroup {
    size: usize,
}

impl ProcessGroup {
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(ParhistError::InvalidWorkerCount(size));
        }
        Ok(Self { size })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    fn communicators(&self) -> Vec<Communicator> {
        let (senders, receivers): (Vec<_>, Vec<_>) = (0..self.size).map(|_| unbounded()).unzip();
        receivers
            .into_iter()
            .enumerate()
            .map(|(rank, inbox)| Communicator {
                rank,
                size: self.size,
                inbox,
                peers: senders
                    .iter()
                    .enumerate()
                    .map(|(r, tx)| (r != rank).then(|| tx.clone()))
                    .collect(),
            })
            .collect()
        // `senders` drops here so only live ranks keep channels open
    }

    /// Run `f` once per rank, each on its own thread, and wait for all of them.
    ///
    /// Returns every rank's result in rank order. If any rank fails, the run
    /// fails: a panicked rank is reported ahead of the desyncs it caused.
    pub fn run<F, R>(&self, f: F) -> Result<Vec<R>>
    where
        F: Fn(Communicator) -> Result<R> + Sync,
        R: Send,
    {
        let comms = self.communicators();
        let outcomes: Vec<Result<R>> = thread::scope(|s| {
            let handles: Vec<_> = comms
                .into_iter()
                .map(|comm| {
                    let rank = comm.rank;
                    let f = &f;
                    let handle = thread::Builder::new()
                        .name(format!("parhist-rank-{rank}"))
                        .spawn_scoped(s, move || f(comm));
                    (rank, handle)
                })
                .collect();
            handles
                .into_iter()
                .map(|(rank, handle)| match handle {
                    Ok(h) => h.join().unwrap_or_else(|panic| {
                        Err(ParhistError::WorkerFailed {
                            rank,
                            reason: panic_message(panic.as_ref()),
                        })
                    }),
                    Err(e) => Err(ParhistError::WorkerFailed {
                        rank,
                        reason: format!("could not spawn: {e}"),
                    }),
                })
                .collect()
        });

        let mut results = Vec::with_capacity(outcomes.len());
        let mut first_err = None;
        for outcome in outcomes {
            match outcome {
                Ok(r) => results.push(r),
                Err(e @ ParhistError::WorkerFailed { .. }) => {
                    if !matches!(first_err, Some(ParhistError::WorkerFailed { .. })) {
                        first_err = Some(e);
                    }
                }
                Err(e) => {
                    if first_err.is_none() {
                        first_err = Some(e);
                    }
                }
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(results),
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "panicked".into()
    }
}
