use std::cell::{Cell, RefCell};
use std::io::ErrorKind;
use std::net::{TcpListener, TcpStream};
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rdscom_frame::{Message, MessageKind};
use rdscom_peer::Peer;
use rdscom_schema::Buffer;
use rdscom_transport::StreamChannel;

use crate::cmd::ServeArgs;
use crate::demo::{ping_prototype, PING_PROTOTYPE_ID};
use crate::exit::{io_error, transport_error, CliError, CliResult, INTERNAL, SUCCESS};
use crate::output::OutputFormat;

const ACCEPT_POLL: Duration = Duration::from_millis(25);
const TICK_PAUSE: Duration = Duration::from_millis(1);

pub fn run(args: ServeArgs, _format: OutputFormat) -> CliResult<i32> {
    let listener = TcpListener::bind(&args.addr).map_err(|err| io_error("bind failed", err))?;
    listener
        .set_nonblocking(true)
        .map_err(|err| io_error("bind failed", err))?;
    tracing::info!(addr = %args.addr, "answering pings");

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let mut answered = 0u64;

    while running.load(Ordering::SeqCst) {
        let stream = match listener.accept() {
            Ok((stream, peer_addr)) => {
                tracing::info!(%peer_addr, "peer connected");
                stream
            }
            Err(err) if err.kind() == ErrorKind::WouldBlock => {
                std::thread::sleep(ACCEPT_POLL);
                continue;
            }
            Err(err) => return Err(io_error("accept failed", err)),
        };

        serve_connection(stream, &args, &running, &mut answered)?;

        if let Some(count) = args.count {
            if answered >= count {
                return Ok(SUCCESS);
            }
        }
    }

    Ok(SUCCESS)
}

fn serve_connection(
    stream: TcpStream,
    args: &ServeArgs,
    running: &AtomicBool,
    answered: &mut u64,
) -> CliResult<()> {
    let channel =
        StreamChannel::tcp(stream).map_err(|err| transport_error("channel setup failed", err))?;
    let mut peer = Peer::new(channel);
    peer.add_prototype(ping_prototype());

    // Handlers only see the message; responses are queued and flushed after
    // each tick.
    let outbox: Rc<RefCell<Vec<Message>>> = Rc::default();
    let seen: Rc<Cell<u64>> = Rc::default();
    {
        let outbox = Rc::clone(&outbox);
        let seen = Rc::clone(&seen);
        peer.add_callback(PING_PROTOTYPE_ID, MessageKind::Request, move |msg| {
            let mut response = Message::response_to(msg, Buffer::new(ping_prototype()));
            let _ = response.set::<u32>("seq", msg.get::<u32>("seq").unwrap_or_default());
            let _ = response.set::<u64>(
                "sent_at_ms",
                msg.get::<u64>("sent_at_ms").unwrap_or_default(),
            );
            outbox.borrow_mut().push(response);
            seen.set(seen.get() + 1);
        });
    }

    while running.load(Ordering::SeqCst) {
        peer.tick();
        for response in outbox.borrow_mut().drain(..) {
            peer.send_message(&response, false);
        }

        *answered += seen.replace(0);
        if let Some(count) = args.count {
            if *answered >= count {
                return Ok(());
            }
        }

        if seen_nothing_for_too_long(&peer, args.idle_timeout_ms) {
            tracing::info!("connection idle; waiting for the next peer");
            return Ok(());
        }

        std::thread::sleep(TICK_PAUSE);
    }

    Ok(())
}

fn seen_nothing_for_too_long<C: rdscom_transport::Channel>(
    peer: &Peer<C>,
    idle_timeout_ms: u64,
) -> bool {
    peer.time_since_last_received() > idle_timeout_ms
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))
}
