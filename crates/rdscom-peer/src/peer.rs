use std::collections::HashMap;

use rdscom_frame::{Message, MessageKind};
use rdscom_schema::{Prototype, RESERVED_PROTOTYPE_ID};
use rdscom_transport::Channel;

use crate::config::PeerConfig;
use crate::error::{PeerError, Result};

/// A message handler. Receives the parsed message by shared reference and
/// must not block the tick loop.
pub type Handler = Box<dyn Fn(&Message)>;

/// A sent REQUEST still waiting for its RESPONSE.
struct PendingRequest {
    message: Message,
    time_sent: u64,
    retries: u8,
}

/// Handler lists per prototype id, one table per message kind.
#[derive(Default)]
struct CallbackTable {
    request: HashMap<u8, Vec<Handler>>,
    response: HashMap<u8, Vec<Handler>>,
    error: HashMap<u8, Vec<Handler>>,
}

impl CallbackTable {
    fn map(&self, kind: MessageKind) -> &HashMap<u8, Vec<Handler>> {
        match kind {
            MessageKind::Request => &self.request,
            MessageKind::Response => &self.response,
            MessageKind::Error => &self.error,
        }
    }

    fn map_mut(&mut self, kind: MessageKind) -> &mut HashMap<u8, Vec<Handler>> {
        match kind {
            MessageKind::Request => &mut self.request,
            MessageKind::Response => &mut self.response,
            MessageKind::Error => &mut self.error,
        }
    }
}

/// Reliable request/response endpoint over a [`Channel`].
///
/// Single-threaded and cooperative: the host drives everything by calling
/// [`Peer::tick`] frequently relative to the retry timeout. Each tick drains
/// one inbound frame, dispatches callbacks, and retransmits any pending
/// request whose timeout elapsed, until its retry budget is spent.
pub struct Peer<C> {
    channel: C,
    config: PeerConfig,
    prototypes: HashMap<u8, Prototype>,
    callbacks: CallbackTable,
    pending: HashMap<u16, PendingRequest>,
    last_receive_time: u64,
    on_abandon: Option<Handler>,
}

impl<C: Channel> Peer<C> {
    /// Create a peer with default config (3 retries, 1 s timeout, host
    /// monotonic clock).
    pub fn new(channel: C) -> Self {
        Self::with_config(channel, PeerConfig::default())
    }

    /// Create a peer with explicit config.
    pub fn with_config(channel: C, config: PeerConfig) -> Self {
        Self {
            channel,
            config,
            prototypes: HashMap::new(),
            callbacks: CallbackTable::default(),
            pending: HashMap::new(),
            last_receive_time: 0,
            on_abandon: None,
        }
    }

    /// Register a prototype, replacing any previous one with the same id.
    ///
    /// The reserved id is rejected with a diagnostic and no effect.
    pub fn add_prototype(&mut self, proto: Prototype) -> &mut Self {
        if proto.identifier() == RESERVED_PROTOTYPE_ID {
            tracing::error!(
                id = RESERVED_PROTOTYPE_ID,
                "prototype id is reserved (unset/invalid); registration ignored"
            );
            return self;
        }
        self.prototypes.insert(proto.identifier(), proto);
        self
    }

    /// Look up a registered prototype.
    pub fn get_prototype(&self, id: u8) -> Result<&Prototype> {
        self.prototypes
            .get(&id)
            .ok_or(PeerError::UnknownPrototype(id))
    }

    /// Registered prototype ids, sorted.
    pub fn prototype_ids(&self) -> Vec<u8> {
        let mut ids: Vec<u8> = self.prototypes.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Append a handler for messages of `kind` bearing `prototype_id`.
    ///
    /// Handlers fire in registration order, once per matching message.
    pub fn add_callback(
        &mut self,
        prototype_id: u8,
        kind: MessageKind,
        handler: impl Fn(&Message) + 'static,
    ) -> &mut Self {
        self.callbacks
            .map_mut(kind)
            .entry(prototype_id)
            .or_default()
            .push(Box::new(handler));
        self
    }

    /// Install a hook invoked when a request exhausts its retry budget.
    ///
    /// Abandonment is otherwise silent apart from a log line.
    pub fn on_abandon(&mut self, hook: impl Fn(&Message) + 'static) -> &mut Self {
        self.on_abandon = Some(Box::new(hook));
        self
    }

    /// Serialize and write a message to the channel.
    ///
    /// With `ack_required`, a REQUEST is tracked in the pending table and
    /// retransmitted until a matching RESPONSE arrives or the retry budget is
    /// spent. Requiring an ack for a RESPONSE only earns a diagnostic — the
    /// response *is* the ack. Transport failures are logged, not surfaced;
    /// the link is best-effort and the retry sweep covers lost frames.
    pub fn send_message(&mut self, message: &Message, ack_required: bool) {
        let frame = message.serialize();
        if let Err(err) = self.channel.send(&frame) {
            tracing::error!(error = %err, %message, "send failed; frame dropped");
        }

        if !ack_required {
            return;
        }

        match message.kind() {
            MessageKind::Request => {
                let time_sent = (self.config.clock)();
                self.pending.insert(
                    message.request_number(),
                    PendingRequest {
                        message: message.clone(),
                        time_sent,
                        retries: 0,
                    },
                );
            }
            MessageKind::Response => {
                tracing::warn!(
                    "a response cannot require an ack; the response is the ack"
                );
            }
            MessageKind::Error => {}
        }
    }

    /// Drain one inbound frame and dispatch it.
    ///
    /// Malformed frames and frames bearing unknown prototype ids are dropped
    /// with a diagnostic; a RESPONSE clears its pending request before the
    /// callbacks run.
    pub fn listen(&mut self) {
        let bytes = match self.channel.receive() {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::error!(error = %err, "receive failed");
                return;
            }
        };
        if bytes.is_empty() {
            return;
        }

        let id = Message::peek_prototype_id(&bytes);
        let Some(proto) = self.prototypes.get(&id) else {
            tracing::error!(prototype_id = id, "no prototype for inbound frame; dropping");
            return;
        };

        let message = match Message::from_serialized(proto, &bytes) {
            Ok(message) => message,
            Err(err) => {
                tracing::error!(error = %err, "dropping unparseable frame");
                return;
            }
        };

        self.last_receive_time = (self.config.clock)();
        tracing::debug!(%message, "received");

        if message.kind() == MessageKind::Response
            && self.pending.remove(&message.request_number()).is_some()
        {
            tracing::debug!(
                request_number = message.request_number(),
                "request acknowledged"
            );
        }

        if let Some(handlers) = self.callbacks.map(message.kind()).get(&message.prototype_id()) {
            for handler in handlers {
                handler(&message);
            }
        }
    }

    /// One cooperative iteration: drain inbound, then run the retry sweep.
    pub fn tick(&mut self) {
        self.listen();
        self.sweep_retries();
    }

    fn sweep_retries(&mut self) {
        let now = (self.config.clock)();
        let mut abandoned = Vec::new();

        for (&number, entry) in self.pending.iter_mut() {
            if now - entry.time_sent <= self.config.retry_timeout_ms {
                continue;
            }

            if entry.retries < self.config.max_retries {
                let frame = entry.message.serialize();
                if let Err(err) = self.channel.send(&frame) {
                    tracing::error!(error = %err, request_number = number, "retransmit failed");
                }
                entry.time_sent = now;
                entry.retries += 1;
                tracing::debug!(
                    request_number = number,
                    retries = entry.retries,
                    "retransmitted request"
                );
            } else {
                abandoned.push(number);
            }
        }

        for number in abandoned {
            if let Some(entry) = self.pending.remove(&number) {
                tracing::warn!(
                    request_number = number,
                    "request abandoned; no response within the retry budget"
                );
                if let Some(hook) = &self.on_abandon {
                    hook(&entry.message);
                }
            }
        }
    }

    /// Milliseconds since the last successfully parsed inbound message.
    pub fn time_since_last_received(&self) -> u64 {
        (self.config.clock)() - self.last_receive_time
    }

    /// Number of requests awaiting a response.
    pub fn pending_requests(&self) -> usize {
        self.pending.len()
    }

    /// True when the request with this number is still awaiting a response.
    pub fn is_pending(&self, request_number: u16) -> bool {
        self.pending.contains_key(&request_number)
    }

    /// The engine configuration.
    pub fn config(&self) -> &PeerConfig {
        &self.config
    }
}
