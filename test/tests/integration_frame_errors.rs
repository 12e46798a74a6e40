/// Integration tests for malformed and unexpected incoming frames
/// A bad frame is dropped whole and the session carries on

use tether_client::{ClientError, MessageWriter, Operation, ProtocolError};
use tether_test::{ListenerEvent, TestClient, ALICE, BOB, HEALTH_ENTITY};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn empty_frame_is_rejected() {
    init_logger();
    let mut test_client = TestClient::joined(ALICE.1);

    assert_eq!(
        test_client.client.receive(&[]),
        Err(ClientError::Protocol(ProtocolError::EmptyFrame))
    );
}

#[test]
fn unknown_opcode_is_rejected() {
    init_logger();
    let mut test_client = TestClient::joined(ALICE.1);

    for code in [0u8, 17, 200, 255] {
        assert_eq!(
            test_client.client.receive(&[code, 1, 2, 3]),
            Err(ClientError::Protocol(ProtocolError::UnknownOperation { code }))
        );
    }
}

#[test]
fn truncated_frame_is_malformed() {
    init_logger();
    let mut test_client = TestClient::joined(ALICE.1);
    let mut frame = test_client.server.player_joined(3, "C", "Carol");
    frame.truncate(frame.len() - 2);

    assert_eq!(
        test_client.client.receive(&frame),
        Err(ClientError::Protocol(ProtocolError::Malformed {
            operation: Operation::PlayerJoined
        }))
    );
    assert!(test_client.room().unwrap().player("C").is_none());
}

#[test]
fn client_only_operations_are_unexpected() {
    init_logger();
    let mut test_client = TestClient::joined(ALICE.1);

    for operation in [Operation::LeaveRoom, Operation::SceneIsLoaded] {
        let mut writer = MessageWriter::new();
        writer.begin(operation);
        assert_eq!(
            test_client.client.receive(writer.bytes()),
            Err(ClientError::Protocol(ProtocolError::UnexpectedOperation {
                operation
            }))
        );
    }
}

#[test]
fn session_continues_after_bad_frames() {
    init_logger();
    let mut test_client = TestClient::joined(ALICE.1);

    assert!(test_client.client.receive(&[99]).is_err());
    assert!(test_client.client.receive(&[Operation::JoinSuccess.code()]).is_err());

    let id = test_client.spawn(HEALTH_ENTITY, 4, BOB.0);
    assert!(test_client.entity(id).is_some());
    assert_eq!(
        test_client.listener().events,
        vec![ListenerEvent::EntityCreated(id)]
    );
}

#[test]
fn frames_outside_a_room_are_ignored() {
    init_logger();
    let mut test_client = TestClient::new();

    let joined = test_client.server.player_joined(1, "A", "Alice");
    test_client.receive(&joined);
    let create = test_client.server.create_entity(
        HEALTH_ENTITY,
        Default::default(),
        4,
        1,
        &(),
    );
    test_client.receive(&create);
    let changed = test_client.server.ownership_changed("A");
    test_client.receive(&changed);

    assert!(test_client.room().is_none());
    assert!(test_client.registry().is_empty());
    assert!(test_client.listener().events.is_empty());
}
