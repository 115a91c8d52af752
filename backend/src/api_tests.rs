use crate::api::{SongId, UserId};

#[test]
fn test_song_id_new() {
    let id = SongId::new(42);
    assert_eq!(id.value(), 42);
}

#[test]
fn test_song_id_equality() {
    let id1 = SongId::new(100);
    let id2 = SongId::new(100);
    let id3 = SongId::new(101);

    assert_eq!(id1, id2);
    assert_ne!(id1, id3);
}

#[test]
fn test_song_id_ordering() {
    let id1 = SongId::new(1);
    let id2 = SongId::new(2);

    assert!(id1 < id2);
    assert!(id2 > id1);
}

#[test]
fn test_song_id_display() {
    assert_eq!(SongId::new(7).to_string(), "7");
}

#[test]
fn test_user_id_ordering_is_lexicographic() {
    let a = UserId::from("alice");
    let b = UserId::from("bob");
    assert!(a < b);
    assert_eq!(a.as_str(), "alice");
}
