use std::sync::mpsc;
use std::time::Duration;

use sniffer_core::Reply;

/// A message plus the sender's optional reply channel.
///
/// A handler that must answer asynchronously keeps the sender until its
/// completion event arrives; dropping the sender drops the response
/// silently, which is the relay's best-effort contract.
pub struct Envelope<M> {
    pub msg: M,
    pub reply: Option<mpsc::Sender<Reply>>,
}

pub type Outbox<M> = mpsc::Sender<Envelope<M>>;
pub type Inbox<M> = mpsc::Receiver<Envelope<M>>;

pub fn channel<M>() -> (Outbox<M>, Inbox<M>) {
    mpsc::channel()
}

/// Best-effort send with no reply expected.
pub fn send<M>(outbox: &Outbox<M>, msg: M) {
    let _ = outbox.send(Envelope { msg, reply: None });
}

/// Send and wait for the reply.
///
/// `None` when the receiving context is gone, the handler dropped the
/// reply sender, or the timeout elapsed.
pub fn request<M>(outbox: &Outbox<M>, msg: M, timeout: Duration) -> Option<Reply> {
    let (reply_tx, reply_rx) = mpsc::channel();
    let envelope = Envelope {
        msg,
        reply: Some(reply_tx),
    };
    if outbox.send(envelope).is_err() {
        return None;
    }
    reply_rx.recv_timeout(timeout).ok()
}
