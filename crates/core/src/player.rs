//! Player identity attached to a match and its persisted results.

use std::hash::Hasher;

use serde::{Deserialize, Serialize};

/// FNV-1a 64-bit, stable across platforms and releases
struct Fnv1aHasher {
    state: u64,
}

impl Fnv1aHasher {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;

    fn new() -> Self {
        Self {
            state: Self::OFFSET_BASIS,
        }
    }
}

impl Hasher for Fnv1aHasher {
    fn finish(&self) -> u64 {
        self.state
    }

    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.state ^= b as u64;
            self.state = self.state.wrapping_mul(Self::PRIME);
        }
    }
}

/// Derive a player id from a display name (trimmed, case-insensitive).
pub fn player_id_for(name: &str) -> u64 {
    let mut hasher = Fnv1aHasher::new();
    hasher.write(name.trim().to_lowercase().as_bytes());
    hasher.finish()
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Player {
    pub id: u64,
    pub name: String,
}

impl Player {
    /// Player whose id is derived from the name
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: player_id_for(&name),
            name,
        }
    }

    pub fn with_id(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Change the display name, keeping the id
    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new("player")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_is_stable_for_the_same_name() {
        assert_eq!(Player::new("Ada").id, Player::new("ada ").id);
        assert_ne!(Player::new("Ada").id, Player::new("Grace").id);
    }

    #[test]
    fn fnv1a_known_vector() {
        // FNV-1a 64 of the empty input is the offset basis.
        assert_eq!(player_id_for(""), 0xcbf29ce484222325);
        assert_eq!(player_id_for("a"), 0xaf63dc4c8601ec8c);
    }

    #[test]
    fn rename_keeps_id() {
        let mut player = Player::new("first");
        let id = player.id;
        player.rename("second");
        assert_eq!(player.id, id);
        assert_eq!(player.name, "second");
    }
}
