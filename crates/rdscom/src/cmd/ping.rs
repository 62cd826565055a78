use std::cell::Cell;
use std::net::TcpStream;
use std::rc::Rc;
use std::time::{Duration, Instant};

use rdscom_frame::{Message, MessageKind};
use rdscom_peer::{Peer, PeerConfig};
use rdscom_schema::{check, Buffer};
use rdscom_transport::StreamChannel;

use crate::cmd::PingArgs;
use crate::demo::ping_prototype;
use crate::exit::{io_error, transport_error, CliError, CliResult, INTERNAL, SUCCESS, TIMEOUT};
use crate::output::{print_pong, OutputFormat};

const TICK_PAUSE: Duration = Duration::from_millis(1);

pub fn run(args: PingArgs, format: OutputFormat) -> CliResult<i32> {
    let stream = TcpStream::connect(&args.addr).map_err(|err| io_error("connect failed", err))?;
    let channel =
        StreamChannel::tcp(stream).map_err(|err| transport_error("channel setup failed", err))?;

    let start = Instant::now();
    let now_ms = move || start.elapsed().as_millis() as u64;

    let config = PeerConfig::new(args.max_retries, args.retry_timeout_ms, Box::new(now_ms));
    let mut peer = Peer::with_config(channel, config);
    peer.add_prototype(ping_prototype());

    let acked: Rc<Cell<u32>> = Rc::default();
    let abandoned: Rc<Cell<u32>> = Rc::default();
    {
        let acked = Rc::clone(&acked);
        let addr = args.addr.clone();
        peer.add_callback(
            ping_prototype().identifier(),
            MessageKind::Response,
            move |msg| {
                let seq = msg.get::<u32>("seq").unwrap_or_default();
                let sent_at = msg.get::<u64>("sent_at_ms").unwrap_or_default();
                print_pong(seq, now_ms().saturating_sub(sent_at), &addr, format);
                acked.set(acked.get() + 1);
            },
        );
    }
    {
        let abandoned = Rc::clone(&abandoned);
        peer.on_abandon(move |msg| {
            tracing::warn!(%msg, "ping unanswered after all retries");
            abandoned.set(abandoned.get() + 1);
        });
    }

    for seq in 0..args.count {
        let mut buf = Buffer::new(ping_prototype());
        let failed = check!(
            |report: &str| tracing::error!(%report, "building ping failed"),
            buf.set::<u32>("seq", seq),
            buf.set::<u64>("sent_at_ms", now_ms()),
        );
        if failed {
            return Err(CliError::new(INTERNAL, "building ping failed"));
        }

        peer.send_message(&Message::from_buffer(MessageKind::Request, buf), true);
    }

    let deadline = now_ms() + args.deadline_ms;
    while acked.get() + abandoned.get() < args.count && now_ms() < deadline {
        peer.tick();
        std::thread::sleep(TICK_PAUSE);
    }

    let lost = args.count.saturating_sub(acked.get());
    if lost == 0 {
        Ok(SUCCESS)
    } else {
        Err(CliError::new(
            TIMEOUT,
            format!("{lost} of {} pings unacknowledged", args.count),
        ))
    }
}
