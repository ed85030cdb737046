/// Options applied to every socket created by [`create_socket`](super::create_socket).
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct SocketConfig {
    /// Close with `SO_LINGER {on, 0}`: unsent data is dropped and the peer
    /// sees a reset instead of an orderly FIN.
    pub abort_on_close: bool,
    /// `TCP_QUICKACK`: `true` acknowledges received segments immediately,
    /// `false` lets the kernel delay ACKs. Only applied on Linux and Android.
    pub quick_ack: bool,
}

impl Default for SocketConfig {
    fn default() -> Self {
        Self::GRACEFUL
    }
}

impl SocketConfig {
    pub const GRACEFUL: SocketConfig = SocketConfig {
        abort_on_close: false,
        quick_ack: true,
    };
    /// Preset for race dialers: losers are dropped without lingering.
    pub const ABORT_ON_CLOSE: SocketConfig = SocketConfig {
        abort_on_close: true,
        quick_ack: true,
    };

    pub fn set_abort_on_close(mut self, abort_on_close: bool) -> Self {
        self.abort_on_close = abort_on_close;
        self
    }
    pub fn set_quick_ack(mut self, quick_ack: bool) -> Self {
        self.quick_ack = quick_ack;
        self
    }
}
