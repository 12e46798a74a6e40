pub mod assertions;
pub mod test_client;
pub mod test_scene;
pub mod test_server;

pub use recording_listener::{ListenerEvent, RecordingListener};
pub use test_client::{TestClient, ALICE, BOB, ROOM_ID};
pub use test_scene::TestScene;
pub use test_server::{ClientRequest, TestServer};
