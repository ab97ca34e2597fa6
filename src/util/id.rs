//! ID utilities (room ids).

use ulid::Ulid;

/// Generate a short room ID using ULID, truncated for readability.
pub fn new_room_id() -> String {
    let ulid = Ulid::new().to_string();
    // 26-char ULID, take first 10 for brevity. Collisions are extremely unlikely
    // at two players per room.
    ulid.chars().take(10).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_ids_are_short_and_distinct() {
        let a = new_room_id();
        let b = new_room_id();
        assert_eq!(a.len(), 10);
        assert_ne!(a, b);
    }
}
