//! Two peers on an in-memory link exchanging person and car records.
//!
//! The "device" side asks for a car with a person REQUEST; the "host" side
//! answers each person request with a car RESPONSE. Both sides are driven by
//! explicit ticks from this single thread, exactly as they would be from an
//! embedded main loop.
//!
//! Run with:
//!   cargo run --example person-car

use std::cell::RefCell;
use std::rc::Rc;

use rdscom::frame::{Message, MessageKind};
use rdscom::peer::Peer;
use rdscom::schema::{Buffer, FieldKind, Prototype};
use rdscom::transport::LoopbackChannel;
use rdscom_schema::check;

const PERSON: u8 = 0;
const CAR: u8 = 1;

fn person_prototype() -> Prototype {
    Prototype::new(PERSON)
        .with_field("id", FieldKind::I8)
        .with_field("age", FieldKind::U8)
}

fn car_prototype() -> Prototype {
    Prototype::new(CAR)
        .with_field("make", FieldKind::Byte)
        .with_field("model", FieldKind::Byte)
        .with_field("year", FieldKind::U16)
}

fn main() {
    let (device_link, host_link) = LoopbackChannel::pair();

    let mut device = Peer::new(device_link);
    let mut host = Peer::new(host_link);
    for peer in [&mut device, &mut host] {
        peer.add_prototype(person_prototype())
            .add_prototype(car_prototype());
    }

    // The host answers each person request with a car response.
    let host_outbox: Rc<RefCell<Vec<Message>>> = Rc::default();
    {
        let outbox = Rc::clone(&host_outbox);
        host.add_callback(PERSON, MessageKind::Request, move |msg| {
            println!(
                "host: person request #{} (id={}, age={})",
                msg.request_number(),
                msg.get::<i8>("id").unwrap_or_default(),
                msg.get::<u8>("age").unwrap_or_default(),
            );

            let mut car = Buffer::new(car_prototype());
            let failed = check!(
                |report: &str| eprintln!("building car failed:\n{report}"),
                car.set::<u8>("make", 1),
                car.set::<u8>("model", 2),
                car.set::<u16>("year", 2020),
            );
            if !failed {
                outbox.borrow_mut().push(Message::response_to(msg, car));
            }
        });
    }

    device.add_callback(CAR, MessageKind::Response, |msg| {
        println!(
            "device: car response #{} (make={}, model={}, year={})",
            msg.request_number(),
            msg.get::<u8>("make").unwrap_or_default(),
            msg.get::<u8>("model").unwrap_or_default(),
            msg.get::<u16>("year").unwrap_or_default(),
        );
    });

    // Ask for a car.
    let mut person = Buffer::new(person_prototype());
    let failed = check!(
        |report: &str| eprintln!("building person failed:\n{report}"),
        person.set::<i8>("id", 1),
        person.set::<u8>("age", 30),
    );
    if failed {
        return;
    }
    device.send_message(&Message::from_buffer(MessageKind::Request, person), true);
    println!("device: request sent, {} pending", device.pending_requests());

    // A few cooperative iterations are plenty on a loopback link.
    for _ in 0..4 {
        device.tick();
        host.tick();
        for response in host_outbox.borrow_mut().drain(..) {
            host.send_message(&response, false);
        }
    }

    println!("device: {} pending after exchange", device.pending_requests());
}
