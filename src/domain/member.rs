use serde::{Deserialize, Serialize};

/// Which side of the match a value belongs to.
///
/// Most of the domain model is duplicated per team (scores, mirrors, rosters);
/// `TeamId` is the tag used to address "the other team" symmetrically instead
/// of writing `_a`/`_b` twin fields through every function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamId {
    A,
    B,
}

impl TeamId {
    /// The team on the other side of the match.
    pub fn opponent(self) -> TeamId {
        match self {
            TeamId::A => TeamId::B,
            TeamId::B => TeamId::A,
        }
    }
}

/// A player's role for the current round, which governs both round-skill and
/// mirror-skill behavior in the [`crate::resolver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Profession {
    Attacker,
    Defender,
    Supporter,
    None,
}

/// A single roster entry. Rosters are the superset of ids a team's
/// `player_order_ids` must be drawn from (see [`crate::domain::state::MatchState`]'s
/// invariants).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub member_id: i64,
    pub nickname: String,
    pub profession: Profession,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opponent_is_involutive() {
        assert_eq!(TeamId::A.opponent(), TeamId::B);
        assert_eq!(TeamId::B.opponent(), TeamId::A);
        assert_eq!(TeamId::A.opponent().opponent(), TeamId::A);
    }
}
