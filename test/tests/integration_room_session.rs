/// Integration tests for the room roster and the room-scoped requests

use tether_client::{ExecutionMode, Player, Rejection, Room};
use tether_test::{
    assert_applied, assert_rejected, ClientRequest, ListenerEvent, TestClient, ALICE, BOB, ROOM_ID,
};

#[test]
fn owner_is_known_before_local_player_joins() {
    let mut test_client = TestClient::new();
    let join = test_client.server.join_success(ROOM_ID, "A", "C", 1, 4);
    test_client.receive(&join);

    let joined = test_client.server.player_joined(1, "A", "Alice");
    test_client.receive(&joined);

    let room = test_client.room().unwrap();
    assert_eq!(room.owner().map(Player::id), Some("A"));
    assert!(room.local_player().is_none());

    let joined = test_client.server.player_joined(3, "C", "Carol");
    test_client.receive(&joined);

    let room = test_client.room().unwrap();
    let local = room.local_player().unwrap();
    assert_eq!(local.peer_id(), 3);
    assert!(local.is_local());
    assert!(!local.is_owner());
}

#[test]
fn join_reports_room_description() {
    let mut test_client = TestClient::new();
    let join = test_client.server.join_success("arena", "A", "A", 2, 8);
    test_client.receive(&join);

    let room = test_client.room().unwrap();
    assert_eq!(room.id(), "arena");
    assert_eq!((room.min_players(), room.max_players()), (2, 8));
    assert_eq!(
        test_client.listener().events,
        vec![ListenerEvent::RoomJoined("arena".to_string())]
    );
}

#[test]
fn join_failure_reaches_listener() {
    let mut test_client = TestClient::new();
    let failed = test_client.server.join_failed("room is full");
    test_client.receive(&failed);

    assert!(test_client.room().is_none());
    assert_eq!(
        test_client.listener().events,
        vec![ListenerEvent::JoinFailed("room is full".to_string())]
    );
}

#[test]
fn duplicate_player_changes_nothing() {
    let mut test_client = TestClient::joined(ALICE.1);

    let same_peer = test_client.server.player_joined(ALICE.0, "Z", "Zed");
    test_client.receive(&same_peer);
    let same_id = test_client.server.player_joined(9, BOB.1, "Impostor");
    test_client.receive(&same_id);

    let room = test_client.room().unwrap();
    assert_eq!(room.player_count(), 2);
    assert!(room.player("Z").is_none());
    assert!(room.player_by_peer(9).is_none());
    assert_eq!(room.player(BOB.1).map(Player::name), Some(BOB.1));
    assert!(test_client.listener().events.is_empty());
}

#[test]
fn player_leaving_clears_every_index() {
    let mut test_client = TestClient::joined(ALICE.1);
    let left = test_client.server.player_left(BOB.1);
    test_client.receive(&left);

    let room = test_client.room().unwrap();
    assert!(room.player(BOB.1).is_none());
    assert!(room.player_by_peer(BOB.0).is_none());
    assert_eq!(room.players().map(Player::id).collect::<Vec<_>>(), vec!["A"]);
    assert_eq!(
        test_client.listener().last(),
        Some(&ListenerEvent::PlayerLeft(BOB.1.to_string()))
    );
}

#[test]
fn players_are_listed_in_join_order() {
    let mut test_client = TestClient::joined(ALICE.1);
    let joined = test_client.server.player_joined(3, "C", "Carol");
    test_client.receive(&joined);

    let ids: Vec<_> = test_client
        .room()
        .unwrap()
        .players()
        .map(Player::id)
        .collect();
    assert_eq!(ids, vec!["A", "B", "C"]);
}

#[test]
fn ownership_moves_to_exactly_one_player() {
    let mut test_client = TestClient::joined(BOB.1);
    let changed = test_client.server.ownership_changed(BOB.1);
    test_client.receive(&changed);

    let room = test_client.room().unwrap();
    let owners: Vec<_> = room.players().filter(|player| player.is_owner()).collect();
    assert_eq!(owners.len(), 1);
    assert_eq!(owners[0].id(), BOB.1);
    assert_eq!(
        test_client.listener().last(),
        Some(&ListenerEvent::OwnershipChanged(BOB.1.to_string()))
    );
}

#[test]
fn non_owner_scene_load_sends_nothing() {
    let mut test_client = TestClient::joined(BOB.1);

    assert_rejected!(test_client.load_scene("arena"), Rejection::NotRoomOwner);
    assert!(test_client.inbox.is_empty());
}

#[test]
fn owner_scene_load_and_ack() {
    let mut test_client = TestClient::joined(ALICE.1);

    assert_applied!(test_client.load_scene("arena"));
    assert_applied!(test_client.scene_loaded());
    assert_eq!(
        test_client.sent(),
        vec![
            ClientRequest::LoadScene("arena".to_string()),
            ClientRequest::SceneIsLoaded
        ]
    );
}

#[test]
fn incoming_scene_load_resets_entities() {
    let mut test_client = TestClient::joined(ALICE.1);
    test_client.spawn(tether_test::TRANSFORM_ENTITY, 4, ALICE.0);

    let load = test_client.server.load_scene("arena");
    test_client.receive(&load);

    assert!(test_client.registry().is_empty());
    assert_eq!(
        test_client.listener().last(),
        Some(&ListenerEvent::SceneLoad("arena".to_string()))
    );
}

#[test]
fn leave_room_sends_request_and_forgets_room() {
    let mut test_client = TestClient::joined(ALICE.1);
    test_client.spawn(tether_test::TRANSFORM_ENTITY, 4, ALICE.0);

    assert_applied!(test_client.leave_room());
    assert!(test_client.room().is_none());
    assert!(test_client.registry().is_empty());
    assert_eq!(test_client.sent(), vec![ClientRequest::LeaveRoom]);
    assert_eq!(test_client.listener().last(), Some(&ListenerEvent::RoomLeft));

    assert_rejected!(test_client.leave_room(), Rejection::NotInRoom);
}

#[test]
fn rejoining_starts_from_a_clean_registry() {
    let mut test_client = TestClient::joined(ALICE.1);
    test_client.spawn(tether_test::TRANSFORM_ENTITY, 4, ALICE.0);

    let join = test_client.server.join_success("second", "B", "B", 1, 4);
    test_client.receive(&join);

    assert!(test_client.registry().is_empty());
    assert_eq!(test_client.room().map(Room::id), Some("second"));
    assert_eq!(test_client.room().map(Room::player_count), Some(0));
}

#[test]
fn room_event_local_and_server_sees_frame_bytes() {
    let mut test_client = TestClient::joined(ALICE.1);

    assert_applied!(test_client.send_event(
        12,
        &String::from("ready"),
        ExecutionMode::LocalAndServer
    ));

    let sent = test_client.sent();
    let ClientRequest::Event { code, mode, payload } = &sent[0] else {
        panic!("Expected an event request, got {:?}", sent);
    };
    assert_eq!((*code, *mode), (12, ExecutionMode::LocalAndServer));
    assert_eq!(
        test_client.listener().events,
        vec![ListenerEvent::Event {
            sender: ALICE.0,
            code: 12,
            payload: payload.clone(),
        }]
    );
}

#[test]
fn room_event_local_only_sends_nothing() {
    let mut test_client = TestClient::joined(ALICE.1);

    assert_applied!(test_client.send_event(12, &7u32, ExecutionMode::LocalOnly));
    assert!(test_client.inbox.is_empty());
    assert_eq!(test_client.listener().events.len(), 1);
}

#[test]
fn room_event_server_only_skips_listener() {
    let mut test_client = TestClient::joined(ALICE.1);

    assert_applied!(test_client.send_event(12, &7u32, ExecutionMode::ServerOnly));
    assert_eq!(test_client.inbox.len(), 1);
    assert!(test_client.listener().events.is_empty());
}

#[test]
fn incoming_room_event_reaches_listener() {
    let mut test_client = TestClient::joined(ALICE.1);
    let event = test_client.server.event(3, BOB.0, &[1, 2, 3]);
    test_client.receive(&event);

    assert_eq!(
        test_client.listener().events,
        vec![ListenerEvent::Event {
            sender: BOB.0,
            code: 3,
            payload: vec![1, 2, 3],
        }]
    );
}
