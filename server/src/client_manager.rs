//! Connection management for the room server: client identity assignment,
//! address bookkeeping, per-connection rate limiting, and timeout cleanup.
//!
//! This layer knows nothing about rooms or games; it guards the transport
//! edge so the session manager only ever sees serialized, rate-admitted
//! operations from known connections.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

use log::info;
use shared::ClientId;

/// Window for the per-connection event counter.
pub const RATE_WINDOW: Duration = Duration::from_secs(15);
/// Events admitted per window before a connection is throttled.
pub const RATE_MAX_EVENTS: u32 = 60;
/// Silence threshold after which a connection is presumed dead.
pub const CLIENT_TIMEOUT: Duration = Duration::from_secs(30);

/// A connected client as the transport layer sees it.
#[derive(Debug)]
pub struct Client {
    pub id: ClientId,
    pub addr: SocketAddr,
    pub last_seen: Instant,
    window_start: Instant,
    events_in_window: u32,
}

impl Client {
    pub fn new(id: ClientId, addr: SocketAddr) -> Self {
        let now = Instant::now();
        Self {
            id,
            addr,
            last_seen: now,
            window_start: now,
            events_in_window: 0,
        }
    }

    pub fn touch(&mut self) {
        self.last_seen = Instant::now();
    }

    pub fn is_timed_out(&self, timeout: Duration) -> bool {
        self.last_seen.elapsed() > timeout
    }

    /// Fixed-window admission: counts the event and reports whether the
    /// connection is still under its budget. The window resets on expiry.
    pub fn allow_event(&mut self) -> bool {
        if self.window_start.elapsed() > RATE_WINDOW {
            self.window_start = Instant::now();
            self.events_in_window = 0;
        }
        self.events_in_window += 1;
        self.events_in_window <= RATE_MAX_EVENTS
    }
}

/// All live connections, indexed by client id, capacity-capped.
pub struct ClientManager {
    clients: HashMap<ClientId, Client>,
    next_client_id: ClientId,
    max_clients: usize,
}

impl ClientManager {
    pub fn new(max_clients: usize) -> Self {
        Self {
            clients: HashMap::new(),
            next_client_id: 1,
            max_clients,
        }
    }

    /// Admits a connection unless the server is at capacity.
    pub fn add_client(&mut self, addr: SocketAddr) -> Option<ClientId> {
        if self.clients.len() >= self.max_clients {
            return None;
        }
        let client_id = self.next_client_id;
        self.next_client_id += 1;
        info!("client {client_id} connected from {addr}");
        self.clients.insert(client_id, Client::new(client_id, addr));
        Some(client_id)
    }

    pub fn remove_client(&mut self, client_id: ClientId) -> bool {
        if self.clients.remove(&client_id).is_some() {
            info!("client {client_id} removed");
            true
        } else {
            false
        }
    }

    pub fn find_client_by_addr(&self, addr: SocketAddr) -> Option<ClientId> {
        self.clients
            .iter()
            .find(|(_, client)| client.addr == addr)
            .map(|(id, _)| *id)
    }

    pub fn addr_of(&self, client_id: ClientId) -> Option<SocketAddr> {
        self.clients.get(&client_id).map(|c| c.addr)
    }

    /// Marks activity from a connection.
    pub fn touch(&mut self, client_id: ClientId) {
        if let Some(client) = self.clients.get_mut(&client_id) {
            client.touch();
        }
    }

    /// Admission check for one inbound event from a known connection.
    pub fn allow_event(&mut self, client_id: ClientId) -> bool {
        match self.clients.get_mut(&client_id) {
            Some(client) => {
                client.touch();
                client.allow_event()
            }
            None => false,
        }
    }

    /// Removes every connection that has been silent past the threshold and
    /// returns their ids for session-level cleanup.
    pub fn check_timeouts(&mut self) -> Vec<ClientId> {
        let timed_out: Vec<ClientId> = self
            .clients
            .iter()
            .filter(|(_, client)| client.is_timed_out(CLIENT_TIMEOUT))
            .map(|(id, _)| *id)
            .collect();
        for client_id in &timed_out {
            self.remove_client(*client_id);
        }
        timed_out
    }

    /// Resolves a recipient list to socket addresses for delivery.
    pub fn addrs_for(&self, ids: &[ClientId]) -> Vec<SocketAddr> {
        ids.iter().filter_map(|id| self.addr_of(*id)).collect()
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_addr() -> SocketAddr {
        "127.0.0.1:8080".parse().unwrap()
    }

    fn test_addr2() -> SocketAddr {
        "127.0.0.1:8081".parse().unwrap()
    }

    #[test]
    fn assigns_sequential_ids() {
        let mut manager = ClientManager::new(4);
        assert_eq!(manager.add_client(test_addr()), Some(1));
        assert_eq!(manager.add_client(test_addr2()), Some(2));
        assert_eq!(manager.len(), 2);
    }

    #[test]
    fn enforces_capacity() {
        let mut manager = ClientManager::new(1);
        assert!(manager.add_client(test_addr()).is_some());
        assert!(manager.add_client(test_addr2()).is_none());
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn finds_clients_by_address() {
        let mut manager = ClientManager::new(4);
        let id = manager.add_client(test_addr()).unwrap();
        assert_eq!(manager.find_client_by_addr(test_addr()), Some(id));
        assert_eq!(manager.find_client_by_addr(test_addr2()), None);
        assert_eq!(manager.addr_of(id), Some(test_addr()));
    }

    #[test]
    fn remove_is_idempotent() {
        let mut manager = ClientManager::new(4);
        let id = manager.add_client(test_addr()).unwrap();
        assert!(manager.remove_client(id));
        assert!(!manager.remove_client(id));
        assert!(manager.is_empty());
    }

    #[test]
    fn rate_limiter_throttles_after_the_window_budget() {
        let mut manager = ClientManager::new(4);
        let id = manager.add_client(test_addr()).unwrap();
        for _ in 0..RATE_MAX_EVENTS {
            assert!(manager.allow_event(id));
        }
        assert!(!manager.allow_event(id));
    }

    #[test]
    fn rate_limiter_resets_when_the_window_expires() {
        let mut client = Client::new(1, test_addr());
        for _ in 0..RATE_MAX_EVENTS {
            assert!(client.allow_event());
        }
        assert!(!client.allow_event());
        client.window_start = Instant::now() - RATE_WINDOW - Duration::from_secs(1);
        assert!(client.allow_event());
    }

    #[test]
    fn timeouts_remove_silent_clients() {
        let mut manager = ClientManager::new(4);
        let id = manager.add_client(test_addr()).unwrap();
        assert!(manager.check_timeouts().is_empty());

        manager.clients.get_mut(&id).unwrap().last_seen =
            Instant::now() - CLIENT_TIMEOUT - Duration::from_secs(1);
        assert_eq!(manager.check_timeouts(), vec![id]);
        assert!(manager.is_empty());
    }

    #[test]
    fn addrs_for_skips_unknown_ids() {
        let mut manager = ClientManager::new(4);
        let id = manager.add_client(test_addr()).unwrap();
        assert_eq!(manager.addrs_for(&[id, 999]), vec![test_addr()]);
    }
}
