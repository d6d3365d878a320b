//! Session configuration chosen at setup.

/// Game mode for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum GameMode {
    /// Two humans sharing the board.
    Pvp,
    /// One human against a named AI opponent.
    Pva,
}

impl GameMode {
    /// Wire identifier understood by the arbiter.
    pub fn wire_id(self) -> &'static str {
        match self {
            GameMode::Pvp => "pvp",
            GameMode::Pva => "pva",
        }
    }
}

/// Named AI opponents offered by the arbiter.
///
/// The name maps to a difficulty level server-side; the client only ever
/// forwards the identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum AiOpponent {
    /// Easy.
    Hermes,
    /// Medium.
    #[default]
    Zeus,
    /// Hard.
    Athena,
}

impl AiOpponent {
    /// Wire identifier understood by the arbiter.
    pub fn wire_id(self) -> &'static str {
        match self {
            AiOpponent::Hermes => "hermes",
            AiOpponent::Zeus => "zeus",
            AiOpponent::Athena => "athena",
        }
    }

    /// Display name shown on the score card.
    pub fn display_name(self) -> &'static str {
        match self {
            AiOpponent::Hermes => "Hermes",
            AiOpponent::Zeus => "Zeus",
            AiOpponent::Athena => "Athena",
        }
    }
}

/// Immutable parameters of a game session.
///
/// Created once by the setup flow and consumed by
/// [`GameSession`](crate::GameSession); starting a new session replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Game mode.
    pub mode: GameMode,
    /// Player 1's name (always mark X).
    pub player1_name: String,
    /// Player 2's name (always mark O); absent in AI mode.
    pub player2_name: Option<String>,
    /// Chosen AI opponent; absent in PvP mode.
    pub ai_opponent: Option<AiOpponent>,
}

impl SessionConfig {
    /// Builds a player-vs-player config. Blank names are defaulted rather
    /// than treated as fatal.
    pub fn pvp(player1_name: &str, player2_name: &str) -> Self {
        Self {
            mode: GameMode::Pvp,
            player1_name: named_or(player1_name, "Player 1"),
            player2_name: Some(named_or(player2_name, "Player 2")),
            ai_opponent: None,
        }
    }

    /// Builds a player-vs-AI config. A blank name defaults to "Player".
    pub fn pva(player1_name: &str, ai_opponent: AiOpponent) -> Self {
        Self {
            mode: GameMode::Pva,
            player1_name: named_or(player1_name, "Player"),
            player2_name: None,
            ai_opponent: Some(ai_opponent),
        }
    }

    /// Name to show for player 2 before the arbiter has resolved it.
    pub fn provisional_player2_name(&self) -> String {
        match (&self.player2_name, self.ai_opponent) {
            (Some(name), _) => name.clone(),
            (None, Some(ai)) => ai.display_name().to_string(),
            (None, None) => "Player 2".to_string(),
        }
    }
}

fn named_or(raw: &str, fallback: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_pvp_names_default() {
        let config = SessionConfig::pvp("", "   ");
        assert_eq!(config.player1_name, "Player 1");
        assert_eq!(config.player2_name.as_deref(), Some("Player 2"));
        assert_eq!(config.ai_opponent, None);
    }

    #[test]
    fn blank_pva_name_defaults() {
        let config = SessionConfig::pva("", AiOpponent::Athena);
        assert_eq!(config.player1_name, "Player");
        assert_eq!(config.player2_name, None);
        assert_eq!(config.provisional_player2_name(), "Athena");
    }

    #[test]
    fn given_names_are_trimmed_and_kept() {
        let config = SessionConfig::pvp("  Ada ", "Grace");
        assert_eq!(config.player1_name, "Ada");
        assert_eq!(config.player2_name.as_deref(), Some("Grace"));
    }
}
