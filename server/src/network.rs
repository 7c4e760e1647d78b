//! Server network layer: UDP transport adapter in front of the session
//! manager.
//!
//! A receiver task deserializes datagrams into a channel; the main loop
//! consumes them one at a time, so all room and user state is mutated by
//! exactly one handler at a time in arrival order. A sender task drains the
//! outbound queue and fans deliveries out to socket addresses.

use bincode::{deserialize, serialize};
use log::{debug, error, info, warn};
use shared::{ClientId, Packet};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::sync::{mpsc, RwLock};
use tokio::time::interval;

use crate::client_manager::ClientManager;
use crate::session::{Outbound, SessionError, SessionManager};

/// Messages from network tasks to the main server loop.
#[derive(Debug)]
pub enum ServerMessage {
    PacketReceived { packet: Packet, addr: SocketAddr },
    ClientTimeout { client_id: ClientId },
}

/// One outbound delivery for the sender task.
#[derive(Debug)]
pub enum Delivery {
    ToClients { to: Vec<ClientId>, packet: Packet },
    ToAddr { addr: SocketAddr, packet: Packet },
}

/// Main server coordinating the socket, the connection table, and the
/// session manager.
pub struct Server {
    socket: Arc<UdpSocket>,
    clients: Arc<RwLock<ClientManager>>,
    session: SessionManager,

    server_tx: mpsc::UnboundedSender<ServerMessage>,
    server_rx: mpsc::UnboundedReceiver<ServerMessage>,
    out_tx: mpsc::UnboundedSender<Delivery>,
    out_rx: mpsc::UnboundedReceiver<Delivery>,
}

impl Server {
    pub async fn new(
        addr: &str,
        max_clients: usize,
        session: SessionManager,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let socket = Arc::new(UdpSocket::bind(addr).await?);
        info!("server listening on {}", socket.local_addr()?);

        let (server_tx, server_rx) = mpsc::unbounded_channel();
        let (out_tx, out_rx) = mpsc::unbounded_channel();

        Ok(Server {
            socket,
            clients: Arc::new(RwLock::new(ClientManager::new(max_clients))),
            session,
            server_tx,
            server_rx,
            out_tx,
            out_rx,
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Spawns the task that continuously listens for incoming datagrams.
    async fn spawn_network_receiver(&self) {
        let socket = Arc::clone(&self.socket);
        let server_tx = self.server_tx.clone();

        tokio::spawn(async move {
            let mut buffer = [0u8; 4096];
            loop {
                match socket.recv_from(&mut buffer).await {
                    Ok((len, addr)) => {
                        if let Ok(packet) = deserialize::<Packet>(&buffer[0..len]) {
                            if server_tx
                                .send(ServerMessage::PacketReceived { packet, addr })
                                .is_err()
                            {
                                break;
                            }
                        } else {
                            warn!("failed to deserialize packet from {addr}");
                        }
                    }
                    Err(e) => {
                        error!("error receiving packet: {e}");
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    }
                }
            }
        });
    }

    /// Spawns the task that drains the outbound queue.
    async fn spawn_network_sender(&mut self) {
        let socket = Arc::clone(&self.socket);
        let clients = Arc::clone(&self.clients);
        let mut out_rx = std::mem::replace(&mut self.out_rx, mpsc::unbounded_channel().1);

        tokio::spawn(async move {
            while let Some(delivery) = out_rx.recv().await {
                let (addrs, packet) = match delivery {
                    Delivery::ToClients { to, packet } => {
                        let addrs = {
                            let clients_guard = clients.read().await;
                            clients_guard.addrs_for(&to)
                        };
                        (addrs, packet)
                    }
                    Delivery::ToAddr { addr, packet } => (vec![addr], packet),
                };
                let data = match serialize(&packet) {
                    Ok(data) => data,
                    Err(e) => {
                        error!("failed to serialize outbound packet: {e}");
                        continue;
                    }
                };
                for addr in addrs {
                    if let Err(e) = socket.send_to(&data, addr).await {
                        error!("failed to send to {addr}: {e}");
                    }
                }
            }
        });
    }

    /// Spawns the task that monitors client timeouts.
    async fn spawn_timeout_checker(&self) {
        let clients = Arc::clone(&self.clients);
        let server_tx = self.server_tx.clone();

        tokio::spawn(async move {
            let mut tick = interval(Duration::from_secs(1));
            loop {
                tick.tick().await;
                let timed_out = {
                    let mut clients_guard = clients.write().await;
                    clients_guard.check_timeouts()
                };
                for client_id in timed_out {
                    if server_tx
                        .send(ServerMessage::ClientTimeout { client_id })
                        .is_err()
                    {
                        return;
                    }
                }
            }
        });
    }

    fn queue(&self, delivery: Delivery) {
        if self.out_tx.send(delivery).is_err() {
            error!("failed to queue outbound delivery");
        }
    }

    fn queue_outbound(&self, out: Outbound) {
        self.queue(Delivery::ToClients {
            to: out.to,
            packet: out.packet,
        });
    }

    fn queue_all(&self, outs: Vec<Outbound>) {
        for out in outs {
            self.queue_outbound(out);
        }
    }

    fn queue_error(&self, client_id: ClientId, err: SessionError) {
        self.queue(Delivery::ToClients {
            to: vec![client_id],
            packet: Packet::Error {
                message: err.to_string(),
            },
        });
    }

    /// Processes one inbound packet and feeds the resulting deliveries to
    /// the sender task.
    async fn handle_packet(&mut self, packet: Packet, addr: SocketAddr) {
        let known = {
            let clients = self.clients.read().await;
            clients.find_client_by_addr(addr)
        };

        let client_id = match known {
            Some(id) => id,
            None => {
                // Strangers get exactly one way in.
                if !matches!(packet, Packet::Register { .. }) {
                    debug!("dropping packet from unknown source {addr}");
                    return;
                }
                let added = {
                    let mut clients = self.clients.write().await;
                    clients.add_client(addr)
                };
                match added {
                    Some(id) => id,
                    None => {
                        self.queue(Delivery::ToAddr {
                            addr,
                            packet: Packet::Error {
                                message: "Server full".to_string(),
                            },
                        });
                        return;
                    }
                }
            }
        };

        if matches!(packet, Packet::Heartbeat) {
            let mut clients = self.clients.write().await;
            clients.touch(client_id);
            return;
        }

        let allowed = {
            let mut clients = self.clients.write().await;
            clients.allow_event(client_id)
        };
        if !allowed {
            self.queue(Delivery::ToAddr {
                addr,
                packet: Packet::Error {
                    message: "Too many requests — slow down!".to_string(),
                },
            });
            return;
        }

        match packet {
            Packet::Register { username, avatar } => {
                match self.session.register(client_id, &username, &avatar) {
                    Ok(out) => self.queue_outbound(out),
                    Err(err) => self.queue_error(client_id, err),
                }
            }
            Packet::ListRooms => {
                let out = self.session.list_rooms(client_id);
                self.queue_outbound(out);
            }
            Packet::CreateRoom {
                name,
                game_type,
                level,
                is_private,
                password,
            } => {
                match self.session.create_room(
                    client_id,
                    &name,
                    game_type,
                    level,
                    is_private,
                    password.as_deref(),
                ) {
                    Ok(outs) => self.queue_all(outs),
                    Err(err) => self.queue_error(client_id, err),
                }
            }
            Packet::JoinRoom { room_id, password } => {
                match self.session.join_room(client_id, room_id, password.as_deref()) {
                    Ok(outs) => self.queue_all(outs),
                    Err(err) => self.queue_error(client_id, err),
                }
            }
            Packet::LeaveRoom => {
                let outs = self.session.leave_room(client_id);
                self.queue_all(outs);
            }
            Packet::Chat { content } => {
                let outs = self.session.chat(client_id, &content);
                self.queue_all(outs);
            }
            Packet::Ready => {
                let outs = self.session.toggle_ready(client_id);
                self.queue_all(outs);
            }
            Packet::Action(action) => {
                let outs = self.session.game_action(client_id, &action);
                self.queue_all(outs);
            }
            Packet::Rematch => {
                let outs = self.session.rematch(client_id);
                self.queue_all(outs);
            }
            Packet::Disconnect => {
                let outs = self.session.disconnect(client_id);
                {
                    let mut clients = self.clients.write().await;
                    clients.remove_client(client_id);
                }
                self.queue_all(outs);
            }
            _ => {
                warn!("unexpected server-bound packet from {addr}");
            }
        }
    }

    /// Main server loop: packets and timeouts in arrival order, plus a
    /// periodic stats heartbeat in the log.
    pub async fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.spawn_network_receiver().await;
        self.spawn_network_sender().await;
        self.spawn_timeout_checker().await;

        let mut stats_interval = interval(Duration::from_secs(60));
        info!("server started successfully");

        loop {
            tokio::select! {
                message = self.server_rx.recv() => {
                    match message {
                        Some(ServerMessage::PacketReceived { packet, addr }) => {
                            self.handle_packet(packet, addr).await;
                        }
                        Some(ServerMessage::ClientTimeout { client_id }) => {
                            info!("client {client_id} timed out");
                            let outs = self.session.disconnect(client_id);
                            self.queue_all(outs);
                        }
                        None => {
                            info!("server shutting down");
                            break;
                        }
                    }
                }
                _ = stats_interval.tick() => {
                    let connections = {
                        let clients = self.clients.read().await;
                        clients.len()
                    };
                    if connections > 0 {
                        debug!(
                            "{} connection(s), {} user(s), {} room(s)",
                            connections,
                            self.session.user_count(),
                            self.session.room_count()
                        );
                    }
                }
            }
        }

        Ok(())
    }
}
