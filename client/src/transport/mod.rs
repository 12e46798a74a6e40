/// Outbound half of the connection to the room server.
///
/// Inbound frames are handed to `Client::receive` by whoever owns the socket.
/// Delivery guarantees, channels and retries all live behind this trait.
pub trait Transport {
    /// Sends one complete frame. The slice is only valid for the duration of
    /// the call; the frame buffer is reused for the next message.
    fn send(&mut self, frame: &[u8]);
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn send(&mut self, frame: &[u8]) {
        (**self).send(frame)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&mut self, frame: &[u8]) {
        (**self).send(frame)
    }
}
