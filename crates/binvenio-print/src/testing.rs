// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Test doubles: scripted printers on loopback plus recording collaborators.
//
// Linux routes all of 127.0.0.0/8 to loopback, so a sweep over 127.0.x.y
// exercises real sockets. Hosts nobody listens on refuse immediately. Other
// platforms only answer on 127.0.0.1, so tests that listen anywhere else are
// ignored off Linux.

use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

use binvenio_bridge::{AddressCache, MemoryAddressCache, NetworkAccess, NetworkHandle};
use binvenio_core::config::LinkConfig;
use binvenio_core::types::PrinterAddress;

/// `~HI` reply of a ZD410, with the CR LF real printers append.
pub const HI_ZD410: &[u8] = b"\x02ZD410-203dpi,V84.20.18Z,8,8192KB\x03\r\n";
/// `~HI` reply of a GK420d.
pub const HI_GK420: &[u8] = b"\x02GK420d,V61.17.17Z,8,8176KB\x03\r\n";

/// Config with short timeouts for loopback tests.
pub fn fast_config() -> LinkConfig {
    LinkConfig {
        connect_timeout_ms: 200,
        handshake_timeout_ms: 200,
        print_timeout_ms: 300,
        ..LinkConfig::default()
    }
}

/// `NetworkAccess` that is either always up or always down, optionally with
/// single requests that find no network.
#[derive(Debug, Default)]
pub struct StaticNetwork {
    online: bool,
    drop_outs: Vec<usize>,
    handle_requests: AtomicUsize,
}

impl StaticNetwork {
    pub fn online() -> Self {
        Self {
            online: true,
            ..Self::default()
        }
    }

    pub fn offline() -> Self {
        Self::default()
    }

    /// Answer `None` to the given handle requests, counted from 1.
    /// `has_network` keeps reporting the network as up.
    pub fn dropping_out_on(mut self, requests: &[usize]) -> Self {
        self.drop_outs = requests.to_vec();
        self
    }

    /// How many times a connection asked for the active network.
    pub fn handle_requests(&self) -> usize {
        self.handle_requests.load(Ordering::SeqCst)
    }
}

impl NetworkAccess for StaticNetwork {
    fn active_network(&self) -> Option<NetworkHandle> {
        let request = self.handle_requests.fetch_add(1, Ordering::SeqCst) + 1;
        if self.drop_outs.contains(&request) {
            return None;
        }
        self.online.then(NetworkHandle::any)
    }

    fn has_network(&self) -> bool {
        self.online
    }
}

/// Address cache that remembers every write.
#[derive(Debug, Default)]
pub struct RecordingCache {
    inner: MemoryAddressCache,
    writes: Mutex<Vec<Option<PrinterAddress>>>,
}

impl RecordingCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_address(addr: PrinterAddress) -> Self {
        Self {
            inner: MemoryAddressCache::with_address(addr),
            writes: Mutex::default(),
        }
    }

    pub fn writes(&self) -> Vec<Option<PrinterAddress>> {
        self.writes.lock().unwrap().clone()
    }
}

impl AddressCache for RecordingCache {
    fn get(&self) -> Option<PrinterAddress> {
        self.inner.get()
    }

    fn set(&self, addr: Option<PrinterAddress>) {
        self.writes.lock().unwrap().push(addr);
        self.inner.set(addr);
    }
}

/// A port on `ip` with nothing listening on it.
pub async fn unused_address(ip: Ipv4Addr) -> PrinterAddress {
    let listener = TcpListener::bind((ip, 0)).await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    PrinterAddress::new(ip, port)
}

/// What a fake device does when it sees a trigger.
#[derive(Debug, Clone)]
enum Response {
    Reply(Vec<u8>),
    /// Send `head`, then one filler byte every `every`, until the peer leaves.
    Trickle { head: Vec<u8>, every: Duration },
}

#[derive(Default)]
pub struct FakePrinterBuilder {
    port: u16,
    replies: Vec<(Vec<u8>, Response)>,
}

impl FakePrinterBuilder {
    /// Whenever `trigger` shows up in the input, answer with `reply`.
    pub fn reply(mut self, trigger: &[u8], reply: &[u8]) -> Self {
        self.replies
            .push((trigger.to_vec(), Response::Reply(reply.to_vec())));
        self
    }

    /// On `trigger`, start a reply with `head` and never finish it.
    pub fn trickle(mut self, trigger: &[u8], head: &[u8], every: Duration) -> Self {
        self.replies.push((
            trigger.to_vec(),
            Response::Trickle {
                head: head.to_vec(),
                every,
            },
        ));
        self
    }

    /// Listen on a fixed port instead of an ephemeral one.
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub async fn start(self, ip: Ipv4Addr) -> FakePrinter {
        let listener = TcpListener::bind((ip, self.port)).await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let connections = Arc::new(AtomicUsize::new(0));
        let received = Arc::new(Mutex::new(Vec::new()));

        let replies = Arc::new(self.replies);
        let task = {
            let connections = connections.clone();
            let received = received.clone();
            tokio::spawn(async move {
                while let Ok((socket, _)) = listener.accept().await {
                    connections.fetch_add(1, Ordering::SeqCst);
                    tokio::spawn(serve(socket, replies.clone(), received.clone()));
                }
            })
        };

        FakePrinter {
            addr: PrinterAddress::new(ip, port),
            connections,
            received,
            task,
        }
    }
}

/// A scripted device listening on loopback.
pub struct FakePrinter {
    addr: PrinterAddress,
    connections: Arc<AtomicUsize>,
    received: Arc<Mutex<Vec<u8>>>,
    task: JoinHandle<()>,
}

impl FakePrinter {
    pub fn builder() -> FakePrinterBuilder {
        FakePrinterBuilder::default()
    }

    /// A Zebra that identifies as `hi` and answers nothing else.
    pub fn zebra(hi: &[u8]) -> FakePrinterBuilder {
        Self::builder().reply(b"~HI\n", hi)
    }

    pub fn address(&self) -> PrinterAddress {
        self.addr
    }

    pub fn connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }

    /// Every byte received so far, across connections.
    pub fn received(&self) -> Vec<u8> {
        self.received.lock().unwrap().clone()
    }
}

impl Drop for FakePrinter {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn serve(
    mut socket: TcpStream,
    replies: Arc<Vec<(Vec<u8>, Response)>>,
    received: Arc<Mutex<Vec<u8>>>,
) {
    let mut pending = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => n,
        };
        received.lock().unwrap().extend_from_slice(&chunk[..n]);
        pending.extend_from_slice(&chunk[..n]);

        while let Some((end, response)) = next_trigger(&pending, &replies) {
            pending.drain(..end);
            match response {
                Response::Reply(reply) => {
                    if socket.write_all(&reply).await.is_err() {
                        return;
                    }
                }
                Response::Trickle { head, every } => {
                    if socket.write_all(&head).await.is_err() {
                        return;
                    }
                    loop {
                        tokio::time::sleep(every).await;
                        if socket.write_all(b"x").await.is_err() {
                            return;
                        }
                    }
                }
            }
        }
    }
}

/// Earliest trigger in `pending`: end offset and the response to give.
fn next_trigger(pending: &[u8], replies: &[(Vec<u8>, Response)]) -> Option<(usize, Response)> {
    replies
        .iter()
        .filter_map(|(trigger, reply)| {
            pending
                .windows(trigger.len())
                .position(|w| w == trigger.as_slice())
                .map(|pos| (pos, pos + trigger.len(), reply.clone()))
        })
        .min_by_key(|(pos, _, _)| *pos)
        .map(|(_, end, reply)| (end, reply))
}
